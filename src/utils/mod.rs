//! Shared helpers for the pipeline driver

pub mod logging;
