use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use qapi_core::config::{self, CONFIG_FILE_NAME, QapiConfig};
use qapi_core::load::{GithubLoader, LocalLoader, Loader, RepositoryHost};
use qapi_core::prov::recorder_for;
use qapi_core::source::SourceRef;
use qapi_core::{build, swagger};

#[derive(Parser)]
#[command(
    name = "qapi",
    about = "Build Swagger 2.0 API descriptions from SPARQL query files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the API document of a query source
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the specification items of a query source as JSON
    Items {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Initialize a new qapi configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Repository owner on the hosting platform
    #[arg(long, requires = "repo", conflicts_with = "local")]
    owner: Option<String>,

    /// Repository name on the hosting platform
    #[arg(long, requires = "owner")]
    repo: Option<String>,

    /// Commit to build from (defaults to the latest)
    #[arg(long, requires = "owner")]
    sha: Option<String>,

    /// Local directory of query files (defaults to the current directory)
    #[arg(long)]
    local: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            source,
            format,
            output,
        } => cmd_build(source, format, output),

        Commands::Items { source } => cmd_items(source),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "qapi", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load `.qapi.yaml` from the current directory, falling back to defaults.
fn load_config() -> Result<QapiConfig> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let cfg = config::load_config(&config_path)
        .map_err(|e| anyhow::anyhow!(e))?
        .unwrap_or_default();
    Ok(cfg.with_env_overrides())
}

/// The source selected on the command line and its loader.
enum ResolvedSource {
    Hosted(SourceRef, GithubLoader),
    Local(SourceRef, LocalLoader),
}

impl ResolvedSource {
    fn from_args(args: SourceArgs, cfg: &QapiConfig) -> Result<Self> {
        match (args.owner, args.repo) {
            (Some(owner), Some(repo)) => {
                let loader = GithubLoader::new(&owner, &repo, args.sha.clone(), &cfg.github)
                    .context("failed to create hosting platform client")?;
                let mut source = SourceRef::hosted(owner, repo);
                if let Some(sha) = args.sha {
                    source = source.at_revision(sha);
                }
                Ok(ResolvedSource::Hosted(source, loader))
            }
            _ => {
                let dir = args.local.unwrap_or_else(|| PathBuf::from("."));
                let dir = dir
                    .canonicalize()
                    .with_context(|| format!("failed to resolve {}", dir.display()))?;
                Ok(ResolvedSource::Local(SourceRef::Local, LocalLoader::new(dir)))
            }
        }
    }

    fn source(&self) -> &SourceRef {
        match self {
            ResolvedSource::Hosted(source, _) | ResolvedSource::Local(source, _) => source,
        }
    }

    fn loader(&self) -> &dyn Loader {
        match self {
            ResolvedSource::Hosted(_, loader) => loader,
            ResolvedSource::Local(_, loader) => loader,
        }
    }

    fn host(&self) -> Option<&dyn RepositoryHost> {
        match self {
            ResolvedSource::Hosted(_, loader) => Some(loader),
            ResolvedSource::Local(..) => None,
        }
    }
}

fn cmd_build(args: SourceArgs, format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    let cfg = load_config()?;
    let resolved = ResolvedSource::from_args(args, &cfg)?;
    let source = resolved.source();
    let mut recorder = recorder_for(source);

    let doc = build::build_document(
        source,
        resolved.loader(),
        resolved.host(),
        recorder.as_mut(),
        &cfg,
    )
    .with_context(|| format!("failed to build API document for {}", source.identifier()))?;

    let rendered = match format {
        OutputFormat::Json => swagger::to_json(&doc)?,
        OutputFormat::Yaml => swagger::to_yaml(&doc)?,
    };

    match output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} operations to {}",
                doc.paths.len(),
                path.display()
            );
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn cmd_items(args: SourceArgs) -> Result<()> {
    let cfg = load_config()?;
    let resolved = ResolvedSource::from_args(args, &cfg)?;
    let mut recorder = recorder_for(resolved.source());

    let items = build::build_spec(resolved.loader(), &cfg, recorder.as_mut())
        .context("failed to build specification items")?;

    println!("{}", serde_json::to_string_pretty(&items)?);
    eprintln!("{} items", items.len());
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
