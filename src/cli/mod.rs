//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Task file setup | `init` |
//! | Query | Read the hierarchy | `tree`, `show`, `search` |
//! | Task | Edit the hierarchy | `add`, `link`, `move`, `activate`, `rename` |
//!
//! ## Task References
//!
//! Wherever a command takes a task it accepts a task ID (`t-1a2b3c4`), the
//! word `root`, or the exact name of a task, as long as that name is unique.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! tasktree --verbose deactivate Lunch
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod query;
mod task;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
