pub mod config;
pub use config::*;

pub mod logging;
pub use logging::init_tracing;
