//! Date partitioning of an ordered photo window.
//!
//! Pure functions, no state: groups and rows are rederived from the
//! window on every change rather than patched incrementally.

pub mod date;
pub mod rows;

pub use date::{
    determine_grouping_strategy, group_photos_by_date, DateBucket, DateGroup, GroupingStrategy,
};
pub use rows::split_photos_into_rows;
