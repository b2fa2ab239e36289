//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, status) and shared utilities (open_db)
//! - `ask` - Analysis query command
//! - `import` - CSV import command
//! - `records` - Daily record commands (list, add)
//! - `reports` - Report generation commands
//! - `schedules` - Report schedule commands
//! - `serve` - Web server command

pub mod ask;
pub mod core;
pub mod import;
pub mod records;
pub mod reports;
pub mod schedules;
pub mod serve;

// Re-export command functions for main.rs
pub use ask::*;
pub use core::*;
pub use import::*;
pub use records::*;
pub use reports::*;
pub use schedules::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
