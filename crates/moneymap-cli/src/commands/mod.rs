//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `missions` - Offline roadmap preview
//! - `parse` - Offline CSV statement parsing
//! - `serve` - Web server command

pub mod missions;
pub mod parse;
pub mod serve;

// Re-export command functions for main.rs
pub use missions::*;
pub use parse::*;
pub use serve::*;
