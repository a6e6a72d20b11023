//! ChatReplica application library
//!
//! CLI definition, run modes and the HTTP front end around the exchange engine.

pub use chatreplica_chat as chat;
pub use chatreplica_llm_api as llm_api;
pub use chatreplica_types as types;

pub mod app;
pub mod cli;
pub mod store;
pub mod web;

pub use cli::{Cli, Commands};
pub use store::MessageStore;
