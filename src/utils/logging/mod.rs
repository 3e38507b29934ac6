//! Progress reporting for long-running fit loops

pub mod progress;

pub use progress::{add_unit_progress_bar, create_fit_progress, finish_progress_bar};
