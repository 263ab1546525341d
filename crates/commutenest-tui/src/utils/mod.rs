//! Utility functions for formatting preferences for display.

pub mod format;

pub use format::{format_budget, format_coordinates, format_minutes, truncate_string};
