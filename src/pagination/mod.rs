//! Pagination module
//!
//! Offset paging over the search endpoint.
//!
//! # Overview
//!
//! A probe search asking for a single result reports the total number of
//! matching issues. [`PagePlan::pages`] then yields the `startAt` offsets
//! covering `[0, total)`. Preview mode skips the probe and plans one bounded
//! request.

mod pager;
mod types;

pub use pager::QueryPager;
pub use types::{Page, PagePlan, Pages};
