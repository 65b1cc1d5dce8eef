mod loader;

pub use loader::{AcquisitionConfig, Config, OutputConfig, DEFAULT_CONFIG_PATH};
