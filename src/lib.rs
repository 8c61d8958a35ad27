pub mod capture;
pub mod config;
pub mod model;
pub mod patch;
pub mod pipeline;
pub mod render;
mod utils;

pub use config::Config;
pub use model::{Badge, CaptureResult};
pub use pipeline::Outcome;
