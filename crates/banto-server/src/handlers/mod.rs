//! HTTP request handlers, organized by domain

mod chat;
mod records;
mod reports;

pub use chat::*;
pub use records::*;
pub use reports::*;
