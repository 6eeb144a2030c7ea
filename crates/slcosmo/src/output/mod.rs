//! Output formatting for inference results.

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_histogram, format_histogram_with_prior, format_result, format_summary_line};
