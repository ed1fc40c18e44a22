use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber;

#[derive(Debug, Clone)]
pub enum Command {
    Download {
        config_path: Option<String>,
        list_path: String,
        output_dir: Option<String>,
        errors_dir: Option<String>,
        registry_url: Option<String>,
        parallelism: Option<usize>,
        no_progress: bool,
    },
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "vsixprep",
    version,
    about = "Download a batch of VS Code extensions from the Visual Studio Marketplace for offline installation"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Read an extension list and download every extension not already present
    Download {
        #[arg(
            short = 'c',
            long = "config",
            value_name = "FILE",
            help = "Optional config file for the registry URL, directories and tuning"
        )]
        config: Option<String>,

        #[arg(
            short = 'l',
            long = "list",
            value_name = "FILE",
            help = "Sets the input extension list path",
            default_value = "extensions.txt"
        )]
        list: String,

        #[arg(
            short = 'o',
            long = "output-dir",
            value_name = "DIR",
            help = "Overrides the directory for downloaded .vsix files"
        )]
        output_dir: Option<String>,

        #[arg(
            long = "errors-dir",
            value_name = "DIR",
            help = "Overrides the directory for diagnostic payloads of failed downloads"
        )]
        errors_dir: Option<String>,

        #[arg(
            long = "registry-url",
            value_name = "URL",
            help = "Overrides the marketplace gallery base URL"
        )]
        registry_url: Option<String>,

        #[arg(
            short = 'p',
            long = "parallelism",
            value_name = "N",
            help = "Maximum number of simultaneous downloads (default: available CPU parallelism)"
        )]
        parallelism: Option<usize>,

        #[arg(
            long = "no-progress",
            help = "Disables per-download progress bars",
            action = ArgAction::SetTrue
        )]
        no_progress: bool,
    },
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    let command = match cli.command {
        CliCommand::Download {
            config,
            list,
            output_dir,
            errors_dir,
            registry_url,
            parallelism,
            no_progress,
        } => Command::Download {
            config_path: config,
            list_path: list,
            output_dir,
            errors_dir,
            registry_url,
            parallelism,
            no_progress,
        },
    };

    Args { command, log_level }
}
