use super::prelude::*;

/// Name used when `hello` is called without one
pub const DEFAULT_GREETING_NAME: &str = "MilkyWay";

#[derive(Default)]
pub struct GreetingQueries;

#[Object]
impl GreetingQueries {
    /// Greet the caller
    async fn hello(&self, name: Option<String>) -> String {
        greeting(name.as_deref())
    }
}

/// Empty names fall back to the default, same as an absent one.
pub fn greeting(name: Option<&str>) -> String {
    let name = name.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_GREETING_NAME);
    format!("Hello {}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_defaults() {
        assert_eq!(greeting(None), "Hello MilkyWay");
        assert_eq!(greeting(Some("")), "Hello MilkyWay");
    }

    #[test]
    fn test_greeting_uses_name() {
        assert_eq!(greeting(Some("X")), "Hello X");
    }
}
