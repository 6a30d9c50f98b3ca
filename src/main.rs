//! plan-assets CLI entrypoint.
//!
//! This is the main entrypoint for the plan-assets command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use plan_assets::ancestry::{AncestryResolver, OfflineAncestry, ResourceManagerClient};
use plan_assets::assets::digest;
use plan_assets::cli::{Cli, Commands, LogFormat, OutputFormatter};
use plan_assets::config::{
    ConfigParser, ConfigValidator, Overrides, PlanAssetsConfig, Settings, ValidationResult,
    discover_config_file,
};
use plan_assets::convert::ConvertContext;
use plan_assets::convert::google::default_registry;
use plan_assets::engine::Converter;
use plan_assets::error::{AncestryError, Result};
use plan_assets::plan::PlanDocument;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system. Logs always go to stderr.
fn init_logging(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Convert {
            plan,
            project,
            ancestry,
            offline,
            output_file,
        } => {
            let overrides = Overrides {
                project,
                ancestry,
                offline,
            };
            cmd_convert(
                cli.config.as_deref(),
                &plan,
                &overrides,
                output_file.as_deref(),
                &formatter,
            )
            .await
        }
        Commands::Resources => {
            cmd_resources(&formatter);
            Ok(())
        }
        Commands::Config { warnings } => {
            cmd_config(cli.config.as_deref(), warnings, &formatter)
        }
    }
}

/// Convert a plan into assets.
async fn cmd_convert(
    config_path: Option<&Path>,
    plan_path: &Path,
    overrides: &Overrides,
    output_file: Option<&Path>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let (_, config, _) = load_config(config_path)?;
    let settings = Settings::from_env(&config, overrides)?;

    // Ancestry is resolved once, before any record is converted
    let resolver = build_resolver(&settings)?;
    debug!("Resolving ancestry with the {} resolver", resolver.resolver_type());
    let ancestry = resolver.resolve(&settings.project).await?;
    info!("Ancestry for {}: {ancestry}", settings.project);

    let context = ConvertContext::new(settings.project.clone(), ancestry, settings.offline);
    let document = PlanDocument::from_path(plan_path)?;

    let registry = default_registry();
    let mut converter = Converter::new(&registry, context);
    let report = converter.add_resource_changes(&document.resource_changes)?;

    let assets = converter.sorted_assets();
    let digest = digest(&assets)?;
    info!("Asset digest: {digest}");

    let json = OutputFormatter::format_assets(&assets)?;
    match output_file {
        Some(path) => {
            std::fs::write(path, &json)?;
            info!("Wrote {} assets to {}", assets.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.flush()?;
        }
    }

    eprintln!("{}", formatter.format_summary(&report, &assets, &digest));
    Ok(())
}

/// List the supported resource types.
fn cmd_resources(formatter: &OutputFormatter) {
    let registry = default_registry();
    eprintln!("{}", formatter.format_resources(&registry.resource_types()));
}

/// Show the effective configuration.
fn cmd_config(
    config_path: Option<&Path>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let (source, config, validation) = load_config(config_path)?;
    let settings = Settings::from_env(&config, &Overrides::default())?;

    eprintln!(
        "{}",
        formatter.format_config(&settings, source.as_deref(), &validation, show_warnings)
    );
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Locates, loads and validates the configuration.
///
/// An explicit path must exist. Without one, the configuration is discovered,
/// and running without any file is allowed.
fn load_config(
    config_path: Option<&Path>,
) -> Result<(Option<PathBuf>, PlanAssetsConfig, ValidationResult)> {
    let source = config_path.map_or_else(|| discover_config_file("."), |p| Some(p.to_path_buf()));

    let base = source
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    let parser = ConfigParser::new().with_base_path(base);
    parser.load_dotenv()?;

    match &source {
        Some(path) => debug!("Loading configuration from: {}", path.display()),
        None => debug!("No configuration file found"),
    }
    let config = parser.load_with_env(source.as_deref())?;

    let validation = ConfigValidator::new().validate(&config)?;
    Ok((source, config, validation))
}

/// Chooses the ancestry resolver for the settings.
fn build_resolver(settings: &Settings) -> Result<Box<dyn AncestryResolver>> {
    if settings.offline {
        return Ok(Box::new(OfflineAncestry::new(settings.ancestry.clone())));
    }

    if !settings.ancestry.is_empty() {
        debug!("Ancestry configured, skipping Resource Manager lookup");
        return Ok(Box::new(OfflineAncestry::new(settings.ancestry.clone())));
    }

    let token = settings
        .credentials
        .access_token()
        .ok_or(AncestryError::MissingAccessToken)?;
    let client = ResourceManagerClient::with_base_url(token, &settings.resource_manager_url)?;
    Ok(Box::new(client))
}
