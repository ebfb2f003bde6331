use clap::{Parser, ValueEnum};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use bim_explorer::export::{export_csv, export_json, write_csv};
use bim_explorer::model::{Output, ProjectHandle};
use bim_explorer::project::{CommitCache, Explorer, ProjectRegistry};
use bim_explorer::source::SpeckleSource;
use bim_explorer::ui::App;

/// How a table is printed to stdout.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Format {
    #[default]
    Csv,
    /// List of row objects
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "bim-explorer")]
#[command(about = "BIM Explorer - flatten Speckle model data into tables")]
#[command(version)]
struct Args {
    /// Project name from the registry (default: first registered project)
    #[arg(short, long, conflicts_with = "url")]
    project: Option<String>,

    /// Speckle model URL, used without a registry entry
    #[arg(long)]
    url: Option<String>,

    /// Project registry file (default: $BIM_EXPLORER_REGISTRY or ./projects.toml)
    #[arg(long, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Speckle personal access token
    #[arg(long, env = "SPECKLE_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print the registered projects
    #[arg(long)]
    list_projects: bool,

    /// Print the categories of the project
    #[arg(long)]
    list_categories: bool,

    /// Print the parameter names of a category
    #[arg(long, value_name = "CATEGORY")]
    list_parameters: Option<String>,

    /// Print the project information block
    #[arg(long)]
    metadata: bool,

    /// Category to tabulate (printed to stdout unless --csv is given)
    #[arg(long, value_name = "CATEGORY")]
    category: Option<String>,

    /// Restrict the table to these parameters (repeatable)
    #[arg(long = "param", value_name = "NAME", requires = "category")]
    params: Vec<String>,

    /// Output format of a table printed to stdout
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Export the table to CSV
    #[arg(long, value_name = "FILE", requires = "category")]
    csv: Option<PathBuf>,

    /// Export the commit's object tree to JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

const NO_PROJECT: &str = "no project given: use --project, --url or a projects.toml";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let args = Args::parse();

    let registry = ProjectRegistry::discover(args.registry.as_deref())?;

    if args.list_projects {
        for project in registry.iter() {
            println!("{}\t{}", project.name, project.source_url);
        }
        return Ok(());
    }

    let mut explorer = Explorer::new(SpeckleSource::new(), registry, Arc::new(CommitCache::new()));
    if let Some(token) = &args.token {
        explorer = explorer.with_token(token.clone());
    }

    let handle = if let Some(url) = &args.url {
        let handle = ProjectHandle::new(url.clone(), url.clone());
        explorer.register(handle.clone())?;
        handle
    } else if let Some(name) = &args.project {
        explorer.resolve(name)?
    } else {
        explorer
            .registry()
            .default_project()
            .cloned()
            .ok_or_else(|| eyre!(NO_PROJECT))?
    };

    let mut done = false;

    if args.list_categories {
        for category in explorer.categories(&handle)? {
            println!("{category}");
        }
        done = true;
    }

    if let Some(category) = &args.list_parameters {
        for parameter in explorer.parameters(&handle, category)? {
            println!("{parameter}");
        }
        done = true;
    }

    if args.metadata {
        for (name, value) in explorer.project_metadata(&handle)?.iter() {
            println!("{name}\t{value}");
        }
        done = true;
    }

    if let Some(category) = &args.category {
        let parameters = (!args.params.is_empty()).then_some(args.params.as_slice());
        let table = explorer.table(&handle, category, parameters)?;
        if let Some(csv_path) = &args.csv {
            export_csv(&table, csv_path)?;
            println!("Exported to CSV: {}", csv_path.display());
        } else {
            match args.format {
                Format::Csv => write_csv(&table, std::io::stdout().lock())?,
                Format::Json => {
                    let output = Output::from(table);
                    println!("{}", serde_json::to_string_pretty(&output.to_json())?);
                }
            }
        }
        done = true;
    }

    if let Some(json_path) = &args.json {
        let graph = explorer.fetch_commit(&handle)?;
        export_json(&graph.root, json_path)?;
        println!("Exported to JSON: {}", json_path.display());
        done = true;
    }

    if done {
        return Ok(());
    }

    let app = App::new(&explorer, handle)?;
    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}
