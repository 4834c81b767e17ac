use sentim::analysis::{Analyzer, ChartKind, RunOutcome, Sentiment};
use sentim::backend::HttpBackend;
use sentim::cli::{Cli, Commands, ConfigAction};
use sentim::config::Config;
use sentim::error::{Result, SentimError};
use sentim::render::{render_json, render_text, write_charts};
use sentim::session::DashboardSession;
use sentim::video_id::extract_video_id;
use sentim::youtube::YouTubeClient;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            url,
            filter,
            json,
            charts_dir,
        } => cmd_analyze(cli.config, cli.profile, &url, filter, json, charts_dir),
        Commands::VideoId { url } => cmd_video_id(&url),
        Commands::Config { action } => cmd_config(cli.config, cli.profile, action),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "sentim=debug" } else { "sentim=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_analyze(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    url: &str,
    filter: Option<Sentiment>,
    json: bool,
    charts_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path, profile)?;

    let source = YouTubeClient::from_config(&config)?;
    let backend = HttpBackend::from_config(&config)?;
    let analyzer = Analyzer::new(source, backend);
    let session = DashboardSession::new();

    let rt = tokio::runtime::Runtime::new().map_err(|e| SentimError::Io {
        source: e,
        context: "Failed to create tokio runtime".to_string(),
    })?;

    let report = match rt.block_on(analyzer.run(url, &session)) {
        RunOutcome::Complete(report) => report,
        RunOutcome::Failed(e) => return Err(e),
        RunOutcome::Superseded => {
            return Err(SentimError::Other(anyhow::anyhow!(
                "analysis was superseded by a newer run"
            )))
        }
    };
    session.select_filter(filter);

    let missing = report.charts.missing();
    if missing.len() == ChartKind::ALL.len() {
        tracing::warn!("No charts available: every chart request failed");
    } else if !missing.is_empty() {
        let names: Vec<_> = missing.iter().map(|k| k.name()).collect();
        tracing::warn!("Some charts are not available: {}", names.join(", "));
    }

    let dir = charts_dir.unwrap_or_else(|| config.output.chart_dir.clone());
    let paths = write_charts(&report.charts, &dir)?;

    let filter = session.snapshot().filter;
    if json {
        println!("{}", render_json(&report, filter, &paths)?);
    } else {
        print!("{}", render_text(&report, filter, &paths));
    }

    Ok(())
}

fn cmd_video_id(url: &str) -> Result<()> {
    let id = extract_video_id(url).ok_or(SentimError::InvalidVideoUrl)?;
    println!("{}", id);
    Ok(())
}

fn cmd_config(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, profile)?;
            let json = serde_json::to_string_pretty(&config).map_err(|e| SentimError::Json {
                source: e,
                context: "Failed to serialize config".to_string(),
            })?;
            println!("{}", json);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(p) => p,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
            match config.api_key() {
                Ok(_) => println!("  Credential: {} is set", config.youtube.api_key_env),
                Err(e) => println!("  Warning: {}", e),
            }
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(p) => p,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| SentimError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let path = match config_path {
        Some(p) => p,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::warn!(
            "Config file not found, using defaults. Run 'sentim config init' to create one."
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        if let Some(profile) = profile {
            config.apply_profile(&profile)?;
        }
        sentim::config::ConfigValidator::validate(&config)?;
        return Ok(config);
    }

    match profile {
        Some(profile) => Config::load_with_profile(&path, &profile),
        None => Config::load(&path),
    }
}
