use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Visual Studio Marketplace gallery endpoint.
pub const DEFAULT_REGISTRY_URL: &str = "https://marketplace.visualstudio.com/_apis/public/gallery";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub registry: RegistryConfig,
    pub output: OutputConfig,
    pub download: DownloadTuning,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct RegistryConfig {
    pub base_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputConfig {
    /// Directory receiving downloaded `.vsix` artifacts.
    pub extensions_dir: PathBuf,
    /// Directory receiving diagnostic payloads of failed downloads.
    pub errors_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extensions_dir: PathBuf::from("extensions"),
            errors_dir: PathBuf::from("errors"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DownloadTuning {
    /// Worker pool size; `None` means one worker per available CPU.
    pub parallelism: Option<usize>,
}
