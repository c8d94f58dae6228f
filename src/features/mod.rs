//! Calendar feature engineering.
//!
//! Responsibilities:
//!
//! - curate raw holidays into the table the kernel is applied to
//! - build the holiday influence kernel
//! - merge shifted holidays onto a target table (`holiday` column)
//! - New Year / Christmas indicator flags and the custom decay column
//! - date expansion and the GDP column

pub mod curation;
pub mod custom;
pub mod gdp;
pub mod kernel;
pub mod merger;
pub mod special;
pub mod time;

pub use curation::*;
pub use custom::*;
pub use gdp::*;
pub use kernel::*;
pub use merger::*;
pub use special::*;
pub use time::*;
