pub mod generator;
pub mod metrics;

pub use generator::{build_report, write_report};
