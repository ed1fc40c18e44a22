use eyre::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vsixprep_lib::config::RegistryConfig;
use vsixprep_lib::download::DownloadOptions;
use vsixprep_lib::extension::ExtensionRequest;

/// Registry settings pointing at a mock server.
pub fn test_registry(base_url: &str) -> RegistryConfig {
    RegistryConfig {
        base_url: base_url.to_string(),
    }
}

/// Small fixed pool and no progress bars for deterministic test output.
pub fn test_options() -> DownloadOptions {
    DownloadOptions {
        parallelism: 4,
        show_progress: false,
    }
}

pub fn requests(lines: &[&str]) -> Vec<ExtensionRequest> {
    lines
        .iter()
        .map(|line| ExtensionRequest::parse(line))
        .collect()
}

/// Creates a temp dir holding fresh `extensions/` and `errors/` directories.
pub fn setup_download_dirs() -> Result<(TempDir, PathBuf, PathBuf)> {
    let temp = tempfile::tempdir()?;
    let extensions_dir = temp.path().join("extensions");
    let errors_dir = temp.path().join("errors");
    std::fs::create_dir_all(&extensions_dir)?;
    std::fs::create_dir_all(&errors_dir)?;
    Ok((temp, extensions_dir, errors_dir))
}

/// The gallery download path for one extension, as the resolver derives it.
pub fn gallery_path(publisher: &str, name: &str, version: &str) -> String {
    format!("/publishers/{publisher}/vsextensions/{name}/{version}/vspackage")
}

/// Writes a JSON config file pointing the run at a mock registry and
/// test-owned output directories.
pub fn write_config_file(
    path: &Path,
    registry_url: &str,
    extensions_dir: &Path,
    errors_dir: &Path,
) -> Result<()> {
    let config = serde_json::json!({
        "registry": { "base_url": registry_url },
        "output": {
            "extensions_dir": extensions_dir,
            "errors_dir": errors_dir,
        },
    });
    std::fs::write(path, serde_json::to_string_pretty(&config)?)?;
    Ok(())
}
