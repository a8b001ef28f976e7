//! Tasklane MCP server.
//!
//! Exposes the Tasklane REST API as action-dispatch tools over the Model
//! Context Protocol, plus the OAuth device-flow login that feeds it a token.

pub mod auth;
pub mod config;
pub mod mcp;
pub mod models;

pub use config::Config;
