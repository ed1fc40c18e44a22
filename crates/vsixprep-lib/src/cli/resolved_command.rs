use crate::cli::args::Command;
use crate::cli::params::DownloadParams;
use crate::config::{Config, RegistryConfig, load_config};
use crate::download::{DownloadOptions, default_parallelism};
use crate::error::VsixPrepError;
use crate::extension::load_extension_list;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Download(DownloadParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, VsixPrepError> {
    match command {
        Command::Download {
            config_path,
            list_path,
            output_dir,
            errors_dir,
            registry_url,
            parallelism,
            no_progress,
        } => {
            if parallelism == Some(0) {
                return Err(VsixPrepError::CliArgumentValidation {
                    details: "parallelism must be greater than 0.".to_string(),
                });
            }

            let app_config = match config_path {
                Some(config_path) => load_config(&config_path)?,
                None => Config::default(),
            };

            let registry = RegistryConfig {
                base_url: registry_url.unwrap_or(app_config.registry.base_url),
            };
            Url::parse(&registry.base_url).map_err(|e| VsixPrepError::RegistryUrl {
                url: registry.base_url.clone(),
                reason: e.to_string(),
            })?;

            let extensions_dir = output_dir
                .map(PathBuf::from)
                .unwrap_or(app_config.output.extensions_dir);
            let errors_dir = errors_dir
                .map(PathBuf::from)
                .unwrap_or(app_config.output.errors_dir);

            let parallelism = parallelism
                .or(app_config.download.parallelism)
                .unwrap_or_else(default_parallelism);

            let requests = load_extension_list(Path::new(&list_path))?;

            Ok(ResolvedCommand::Download(DownloadParams {
                requests,
                registry,
                extensions_dir,
                errors_dir,
                options: DownloadOptions {
                    parallelism,
                    show_progress: !no_progress,
                },
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REGISTRY_URL;

    #[derive(Default)]
    struct CommandBuilder {
        config_path: Option<String>,
        list_path: String,
        output_dir: Option<String>,
        errors_dir: Option<String>,
        registry_url: Option<String>,
        parallelism: Option<usize>,
    }

    impl CommandBuilder {
        fn list(mut self, list_path: &str) -> Self {
            self.list_path = list_path.to_string();
            self
        }

        fn build(self) -> Command {
            Command::Download {
                config_path: self.config_path,
                list_path: self.list_path,
                output_dir: self.output_dir,
                errors_dir: self.errors_dir,
                registry_url: self.registry_url,
                parallelism: self.parallelism,
                no_progress: true,
            }
        }
    }

    fn write_list(dir: &Path) -> PathBuf {
        let path = dir.join("extensions.txt");
        std::fs::write(&path, "ms-python.python\n").expect("write list");
        path
    }

    #[test]
    fn test_zero_parallelism_is_rejected() {
        let command = CommandBuilder {
            parallelism: Some(0),
            ..CommandBuilder::default()
        }
        .list("extensions.txt")
        .build();
        assert!(matches!(
            resolve_command(command),
            Err(VsixPrepError::CliArgumentValidation { .. })
        ));
    }

    #[test]
    fn test_defaults_apply_without_config() {
        let temp = tempfile::tempdir().expect("temp dir");
        let list_path = write_list(temp.path());

        let command = CommandBuilder::default()
            .list(list_path.to_str().expect("utf-8 path"))
            .build();
        let ResolvedCommand::Download(params) =
            resolve_command(command).expect("command resolves");

        assert_eq!(params.registry.base_url, DEFAULT_REGISTRY_URL);
        assert_eq!(params.extensions_dir, PathBuf::from("extensions"));
        assert_eq!(params.errors_dir, PathBuf::from("errors"));
        assert!(params.options.parallelism > 0);
        assert!(!params.options.show_progress);
        assert_eq!(params.requests.len(), 1);
    }

    #[test]
    fn test_cli_overrides_win_over_defaults() {
        let temp = tempfile::tempdir().expect("temp dir");
        let list_path = write_list(temp.path());

        let command = CommandBuilder {
            output_dir: Some("custom-extensions".to_string()),
            errors_dir: Some("custom-errors".to_string()),
            registry_url: Some("http://localhost:9000/gallery".to_string()),
            parallelism: Some(3),
            ..CommandBuilder::default()
        }
        .list(list_path.to_str().expect("utf-8 path"))
        .build();
        let ResolvedCommand::Download(params) =
            resolve_command(command).expect("command resolves");

        assert_eq!(params.registry.base_url, "http://localhost:9000/gallery");
        assert_eq!(params.extensions_dir, PathBuf::from("custom-extensions"));
        assert_eq!(params.errors_dir, PathBuf::from("custom-errors"));
        assert_eq!(params.options.parallelism, 3);
    }

    #[test]
    fn test_malformed_registry_url_is_rejected() {
        let temp = tempfile::tempdir().expect("temp dir");
        let list_path = write_list(temp.path());

        let command = CommandBuilder {
            registry_url: Some("not a url".to_string()),
            ..CommandBuilder::default()
        }
        .list(list_path.to_str().expect("utf-8 path"))
        .build();
        assert!(matches!(
            resolve_command(command),
            Err(VsixPrepError::RegistryUrl { .. })
        ));
    }

    #[test]
    fn test_missing_list_file_is_reported() {
        let command = CommandBuilder::default()
            .list("/nonexistent/extensions.txt")
            .build();
        assert!(matches!(
            resolve_command(command),
            Err(VsixPrepError::ExtensionListLoad { .. })
        ));
    }
}
