//! Pipeline module - preprocessing steps, classifier, and the drivers around them

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod orchestrator;
pub mod persist;
pub mod predict;
pub mod target;
pub mod train;
pub mod transformers;
pub mod values;

pub use config::*;
pub use error::{PipelineError, PipelineResult};
pub use loader::*;
pub use model::{accuracy, LogisticFit, LogisticRegression};
pub use orchestrator::{NamedStep, Pipeline};
pub use persist::*;
pub use predict::*;
pub use target::*;
pub use train::*;
pub use transformers::{Step, Transform};
pub use values::CategoryValue;
