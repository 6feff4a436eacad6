pub mod backend;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod init;
pub mod mcp;
pub mod session;

pub use error::GmError;
