//! Plain-text reporting for the scripted subcommands.
//!
//! Formatting is kept apart from computation so output changes stay
//! localized and the aggregation queries remain directly testable.

pub mod format;

pub use format::*;
