//! Audio analysis: the pluggable backend trait and its boundary
//!
//! The trait abstraction allows swapping backends without changing server
//! code; the boundary guarantees no backend failure escapes as anything but
//! an error-formatted report.

pub mod boundary;
pub mod example;
pub mod placeholder;
pub mod traits;

pub use boundary::run_analysis;
pub use example::ExampleAnalyzer;
pub use placeholder::PlaceholderAnalyzer;
pub use traits::Analyzer;
