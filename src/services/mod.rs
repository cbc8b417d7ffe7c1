//! GitHub API service implementations.

mod statuses;

pub use statuses::*;
