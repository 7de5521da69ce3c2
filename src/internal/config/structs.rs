pub mod download_configuration;
pub mod sink_options;

pub use download_configuration::*;
pub use sink_options::*;
