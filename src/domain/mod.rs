//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the canonical statistical record (`SportRecord`)
//! - the gender breakdown enumeration (`Breakdown`)
//! - ingestion configuration (`ParseMode`)
//! - the explicit year-label ordering used by all time-series output

pub mod types;

pub use types::*;
