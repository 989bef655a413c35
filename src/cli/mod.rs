//! CLI module
//!
//! Command-line interface for paging through collections.
//!
//! # Commands
//!
//! - `page` - Fetch one page of an endpoint
//! - `walk` - Fetch consecutive pages
//! - `demo` - Paginate a synthetic collection
//! - `age` - Format an age from a birth date

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{PageSummary, Runner};
