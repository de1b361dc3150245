//! Terminal output and report files

pub mod console;
pub mod report_writer;
