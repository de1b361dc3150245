//! Load, filter and export pipeline

pub mod error;
pub mod exporter;
pub mod loader;
pub mod model;
pub mod progress;
pub mod writer;
