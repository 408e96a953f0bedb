mod application;
pub mod data;
mod runtime_config;

pub use application::{Application, COMPLETION_MESSAGE};
pub use runtime_config::RuntimeConfig;
