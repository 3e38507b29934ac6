//! Progress bars for the fitting loop
//!
//! One main bar counts fit units; an optional spinner per worker shows the
//! unit currently being fit.

use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Style of the main bar
pub const FIT_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} units ({eta}) {msg}";

/// Style of a per-unit spinner
pub const UNIT_TEMPLATE: &str = "  {spinner} [{elapsed_precise}] {msg}";

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Create the progress display and its main bar over `units` fit units
///
/// With `visible` unset everything is drawn to a hidden target, so callers
/// can report progress unconditionally.
#[must_use]
pub fn create_fit_progress(units: u64, visible: bool) -> (MultiProgress, ProgressBar) {
    let mp = if visible {
        MultiProgress::new()
    } else {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    };
    let main = mp.add(ProgressBar::new(units));
    main.set_style(style(FIT_TEMPLATE));
    main.set_message("fitting");
    (mp, main)
}

/// Add a spinner for one fit unit
#[must_use]
pub fn add_unit_progress_bar(mp: &MultiProgress, label: &str) -> ProgressBar {
    let pb = mp.add(ProgressBar::new_spinner());
    pb.set_style(style(UNIT_TEMPLATE));
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a bar, keeping a final message when given
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    match message {
        Some(msg) => pb.finish_with_message(msg.to_string()),
        None => pb.finish(),
    }
}
