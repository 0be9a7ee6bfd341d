//! Report module - summarizing training and prediction results

pub mod predictions;
pub mod summary;

pub use predictions::*;
pub use summary::*;
