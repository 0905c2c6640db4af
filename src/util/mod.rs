//! Utility modules for AskMe.

pub mod highlight;

// Re-export commonly used functions
pub use highlight::*;
