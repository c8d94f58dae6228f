//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed `Country` set and its static ISO/currency lookups
//! - holiday records and the curated `HolidayTable`
//! - the column-oriented `FeatureTable` the features are written into
//! - run configuration (`FeatureConfig`)

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
