//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Single-value commands (classify, color, periods) and config loading
//! - `status` - Full pipeline over budget and transaction files
//! - `icon` - Persisted app icon state

pub mod core;
pub mod icon;
pub mod status;

// Re-export command functions for main.rs
pub use self::core::*;
pub use icon::*;
pub use status::*;

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
