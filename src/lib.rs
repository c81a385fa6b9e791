//! Watches a course grade server and reports what changed since the last run.
//!
//! The pipeline logs in, lists the enrolled courses, fetches and repairs each
//! course's grade page in turn, and diffs the resulting [`Snapshot`] against
//! the previous one.

pub mod config;
pub mod models;
pub mod utils;

pub use models::{Changes, CourseRef, CourseSnapshot, Credentials, Grade, Snapshot};
pub use utils::diff::{diff, diff_with, removals, DiffMode};
pub use utils::error::{Error, Result};
pub use utils::snapshot::{fetch_snapshot, run};
