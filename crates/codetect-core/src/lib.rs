pub mod config;
pub mod labels;

pub use config::AppConfig;
pub use labels::{LabelError, LabelMap};
