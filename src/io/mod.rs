//! Input/output helpers.
//!
//! - sales CSV ingest + validation (`ingest`)
//! - feature table CSV export (`export`)
//! - holiday table JSON read/write (`holidays`)

pub mod export;
pub mod holidays;
pub mod ingest;

pub use export::*;
pub use holidays::*;
pub use ingest::*;
