use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use assetpush::config::LoggingConfig;
use assetpush::host;
use assetpush::messages::{HostMessage, StatusLevel};
use assetpush::messenger;
use assetpush::progress::ProgressReporter;
use assetpush::{
    ArchiveHost, Config, DesignHost, DirectoryHost, GitHubClient, RepositoryGateway,
    RepositoryTarget, RunOutcome, TargetOverrides, UiFrame, UploadSummary,
};

#[derive(Parser)]
#[command(name = "assetpush")]
#[command(about = "Export design assets and upload them to a GitHub repository")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a configuration file with the target repository
    Init {
        /// Repository owner
        #[arg(long)]
        owner: Option<String>,

        /// Repository name
        #[arg(long)]
        repo: Option<String>,
    },

    /// Check token, repository, branch and write access without uploading
    Validate {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Export assets from a ZIP export or a directory and upload them
    Push {
        /// ZIP archive exported from the design tool, or a directory of rendered files
        source: PathBuf,

        #[command(flatten)]
        target: TargetArgs,

        /// Skip the connection preflight
        #[arg(long)]
        skip_validation: bool,
    },
}

#[derive(Args, Clone, Default)]
struct TargetArgs {
    /// Repository owner
    #[arg(long)]
    owner: Option<String>,

    /// Repository name
    #[arg(long)]
    repo: Option<String>,

    /// Directory inside the repository [default: assets]; "" uploads to the repository root
    #[arg(long)]
    path: Option<String>,

    /// Branch to commit to
    #[arg(long)]
    branch: Option<String>,

    /// Commit message prefix
    #[arg(short, long)]
    message: Option<String>,

    /// GitHub token (prefer GITHUB_TOKEN or gh auth)
    #[arg(long)]
    token: Option<String>,
}

impl TargetArgs {
    fn overrides(&self) -> TargetOverrides {
        TargetOverrides {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            path: self.path.clone(),
            branch: self.branch.clone(),
            commit_message: self.message.clone(),
            token: self.token.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match (&cli.command, cli.config.as_deref()) {
        (Commands::Init { .. }, Some(path)) if !path.exists() => Config::default(),
        (_, path) => load_config(path)?,
    };
    init_logging(cli.verbose, &config.logging)?;
    info!("Starting assetpush v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Init { owner, repo } => cmd_init(owner, repo, cli.config.as_deref(), &config),
        Commands::Validate { target } => cmd_validate(&target, &config).await,
        Commands::Push {
            source,
            target,
            skip_validation,
        } => cmd_push(&source, &target, skip_validation, &config).await,
    }
}

/// Initialize logging based on verbosity level and the logging config
fn init_logging(verbose: bool, logging: &LoggingConfig) -> Result<()> {
    let default_level = if verbose { "debug" } else { logging.level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(logging.color);
    let layer = match logging.format.as_str() {
        "pretty" => layer.pretty().boxed(),
        "full" => layer.boxed(),
        _ => layer.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(),
    }
}

/// Write the configuration with the given repository coordinates
fn cmd_init(
    owner: Option<String>,
    repo: Option<String>,
    config_path: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let mut new_config = config.clone();
    if owner.is_some() {
        new_config.github.owner = owner;
    }
    if repo.is_some() {
        new_config.github.repo = repo;
    }

    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }
    new_config.save(&config_path)?;

    println!("✅ assetpush initialized");
    println!("   Config: {:?}", config_path);
    if new_config.github.owner.is_none() || new_config.github.repo.is_none() {
        println!("   Next: set github.owner and github.repo, then run 'assetpush validate'");
    } else {
        println!("   Next: export GITHUB_TOKEN and run 'assetpush validate'");
    }

    Ok(())
}

fn github_client(target: &TargetArgs, config: &Config) -> Result<(RepositoryTarget, GitHubClient)> {
    let target = RepositoryTarget::resolve(config, &target.overrides())?;
    let client = GitHubClient::new(target.clone(), &config.github.api_url)
        .context("Failed to create GitHub client")?;
    Ok((target, client))
}

/// Run the connection preflight only
async fn cmd_validate(target: &TargetArgs, config: &Config) -> Result<()> {
    let (target, client) = github_client(target, config)?;

    println!(
        "🔍 Testing connection to {} ({})...",
        target.full_name(),
        target.branch
    );
    let outcome = client.preflight().await;

    if outcome.valid {
        println!("✅ Connection OK: token valid, repository and branch found, write access granted");
        Ok(())
    } else {
        let error = outcome.error.unwrap_or_default();
        println!("❌ {}", error);
        Err(anyhow!(error))
    }
}

async fn open_source(source: &Path) -> Result<Box<dyn DesignHost>> {
    if source.is_dir() {
        Ok(Box::new(DirectoryHost::new(source)))
    } else {
        let archive = ArchiveHost::open(source)
            .await
            .with_context(|| format!("Failed to open export archive {:?}", source))?;
        Ok(Box::new(archive))
    }
}

/// Export from `source` and upload every file
async fn cmd_push(
    source: &Path,
    target: &TargetArgs,
    skip_validation: bool,
    config: &Config,
) -> Result<()> {
    let (target, client) = github_client(target, config)?;
    let design_host = open_source(source).await?;

    let (host_endpoint, ui_endpoint) = messenger::channel();
    let mut frame = UiFrame::new(
        &client,
        &target,
        ui_endpoint,
        ProgressReporter::new(print_message),
    );
    if skip_validation || !config.upload.validate {
        frame = frame.skip_validation();
    }

    let ui = async move {
        let outcome = frame.run().await;
        frame.close();
        outcome
    };
    let (outcome, ()) = tokio::join!(ui, host::serve(design_host.as_ref(), host_endpoint));

    match outcome? {
        RunOutcome::ValidationFailed(error) => {
            println!("❌ {}", error);
            Err(anyhow!(error))
        }
        RunOutcome::NoAssets => {
            println!("⚠️  No elements with export profiles found on this page");
            Ok(())
        }
        RunOutcome::NothingToUpload => {
            println!("⚠️  No files to upload");
            Ok(())
        }
        RunOutcome::ExportFailed(error) => {
            println!("❌ {}", error);
            Err(anyhow!(error))
        }
        RunOutcome::Uploaded(summary) => {
            print_results(&summary);
            if summary.success {
                Ok(())
            } else {
                Err(anyhow!("Upload stopped after a failed file"))
            }
        }
    }
}

/// Print progress and status messages as they arrive
fn print_message(message: HostMessage) {
    match message {
        HostMessage::ExportProgress { percent, message } => {
            println!("   [{:>3.0}%] {}", percent, message);
        }
        HostMessage::ExportStatus { message, status } => {
            let icon = match status {
                StatusLevel::Info => "ℹ️ ",
                StatusLevel::Success => "✅",
                StatusLevel::Error => "❌",
            };
            println!("{} {}", icon, message);
        }
        _ => {}
    }
}

/// Print the upload results list
fn print_results(summary: &UploadSummary) {
    if summary.success {
        println!("\n🎉 Successfully uploaded {} assets!", summary.succeeded());
    }

    println!("\n📊 Upload Results");
    println!(
        "   {} succeeded, {} failed",
        summary.succeeded(),
        summary.failed()
    );
    for result in &summary.results {
        if result.success {
            println!("   ✓ {}", result.path);
        } else {
            println!(
                "   ✗ {}: {}",
                result.path,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    if summary.skipped() > 0 {
        println!("   ⏭️  {} files not attempted", summary.skipped());
    }
}
