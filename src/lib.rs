//! Userbase - GraphQL API over users and their profiles
//!
//! All operations are exposed via a single GraphQL endpoint backed by a
//! SQLite database.

pub mod app;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod graphql;
pub mod orm;
