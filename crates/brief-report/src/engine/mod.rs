//! Report generation engine

pub mod bundle;
pub mod generator;

pub use bundle::{ReportBundle, ReportSet};
pub use generator::ReportGenerator;
