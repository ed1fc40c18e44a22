mod loader;
mod model;

pub use loader::load_config;
pub use model::{Config, DEFAULT_REGISTRY_URL, DownloadTuning, OutputConfig, RegistryConfig};
