pub mod config;
pub mod error;
pub mod goal;
pub mod plan;
pub mod store;

pub use error::{Result, StepwiseError};
