use clap::Parser;
use portal_widgets::{
    html_document, tree, EditorContext, PortalConfig, RenderMode, VersionMap, WidgetError, WidgetInstance,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validate dashboard widget trees and render them to HTML
#[derive(Debug, Parser)]
#[command(name = "portal-render", version)]
struct Cli {
    /// Render with edit-mode affordances
    #[arg(long)]
    edit: bool,

    /// Node id to mark as selected in edit mode
    #[arg(long, value_name = "ID")]
    selected: Option<String>,

    /// YAML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write each rendered tree as an HTML document to stdout
    #[arg(long)]
    html: bool,

    /// Print the property panel of this node as JSON
    #[arg(long, value_name = "ID")]
    panel: Option<String>,

    /// Load cube definitions from the cube service before building panels
    #[arg(long)]
    cubes: bool,

    /// Fetch a stored dashboard from the dashboard service
    #[arg(long, value_name = "ID")]
    dashboard: Option<String>,

    /// Dashboard JSON files
    #[arg(required_unless_present = "dashboard")]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match PortalConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .with_writer(io::stderr)
        .init();

    let context = match load_context(&cli, &config).await {
        Ok(context) => context,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut sources: Vec<(String, Result<String, WidgetError>)> = cli
        .files
        .iter()
        .map(|path| (path.display().to_string(), read_file(path)))
        .collect();
    if let Some(id) = &cli.dashboard {
        sources.push((format!("dashboard '{}'", id), fetch_dashboard(&config, id).await));
    }

    // Status lines move to stderr when stdout carries output.
    let quiet_stdout = cli.html || cli.panel.is_some();
    let mut failed = false;

    for (name, content) in sources {
        match content.and_then(|content| process(&cli, &context, &name, &content)) {
            Ok(()) if quiet_stdout => eprintln!("✓ {} is valid", name),
            Ok(()) => println!("✓ {} is valid", name),
            Err(e) => {
                eprintln!("✗ {} has errors:", name);
                print_error(&context, &e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn load_context(cli: &Cli, config: &PortalConfig) -> Result<EditorContext, WidgetError> {
    if !cli.cubes {
        return Ok(EditorContext::bootstrap());
    }
    let cubes = config.cube_service()?.list_cubes().await?;
    info!(count = cubes.len(), url = %config.cube_base_url, "loaded cube definitions");
    Ok(EditorContext::bootstrap_with_cubes(cubes))
}

fn read_file(path: &Path) -> Result<String, WidgetError> {
    fs::read_to_string(path).map_err(|e| WidgetError::Config(format!("Failed to read file: {}", e)))
}

async fn fetch_dashboard(config: &PortalConfig, id: &str) -> Result<String, WidgetError> {
    let dashboard = config.dashboard_service()?.find_by_id(id).await?;
    dashboard
        .configuration
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| WidgetError::Config(format!("dashboard '{}' has no stored configuration", id)))
}

fn process(cli: &Cli, context: &EditorContext, name: &str, content: &str) -> Result<(), WidgetError> {
    let root = context.types.parse_str(content)?;

    if let Some(id) = &cli.panel {
        print_panel(context, &root, id)?;
    }
    if cli.html {
        let mode = if cli.edit { RenderMode::Edit } else { RenderMode::Runtime };
        let versions = VersionMap::new();
        let body = context
            .renderer(&versions, mode)
            .with_selected(cli.selected.as_deref())
            .render(&root);
        print!("{}", html_document(name, &body));
    }
    Ok(())
}

fn print_panel(context: &EditorContext, root: &WidgetInstance, id: &str) -> Result<(), WidgetError> {
    let node = tree::find_by_id(root, id).ok_or_else(|| WidgetError::NodeNotFound { id: id.to_string() })?;
    let view = context.panel().build(node);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn print_error(context: &EditorContext, error: &WidgetError) {
    match error {
        WidgetError::MissingType => {
            eprintln!("  Parse error:");
            eprintln!("    every widget object needs a 'type' field");
        }
        WidgetError::UnknownWidgetType { name } => {
            eprintln!("  Unknown widget type '{}'", name);
            eprintln!("    Known types: {}", context.types.type_names().join(", "));
        }
        WidgetError::InvalidField { widget, field, reason } => {
            eprintln!("  Invalid field '{}' for widget '{}':", field, widget);
            eprintln!("    {}", reason);
        }
        WidgetError::DuplicateId { id } => {
            eprintln!("  Duplicate widget id '{}'", id);
            eprintln!("    Ids must be unique within a dashboard");
        }
        WidgetError::InvalidJson(msg) => {
            eprintln!("  JSON error:");
            eprintln!("    {}", msg);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
