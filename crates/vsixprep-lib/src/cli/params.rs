use crate::config::RegistryConfig;
use crate::download::DownloadOptions;
use crate::extension::ExtensionRequest;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DownloadParams {
    pub requests: Vec<ExtensionRequest>,
    pub registry: RegistryConfig,
    pub extensions_dir: PathBuf,
    pub errors_dir: PathBuf,
    pub options: DownloadOptions,
}
