pub mod errors;
pub mod models;
pub mod pipeline;

#[cfg(test)]
mod pipeline_tests;

pub use errors::DuotagError;
pub use models::{
    SyncConfig,
    SyncReport,
};
