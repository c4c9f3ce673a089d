//! Domains module containing business logic organized by bounded contexts.
//!
//! The server exposes a single domain: stateless utility tools.

pub mod tools;
