//! LDTP - Linked Data Templates processor CLI
//!
//! Matches request URIs against the sitemap and skolemizes Turtle data
//! from the command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

use ldt_processor::ontology::parse_graph;
use ldt_processor::Application;

#[derive(Parser)]
#[command(name = "ldtp")]
#[command(version)]
#[command(about = "Linked Data Templates processor", long_about = None)]
struct Cli {
    /// Processor configuration (YAML)
    #[arg(long, short = 'c', global = true, default_value = "ldt.yaml")]
    config: PathBuf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the template handling a request URI
    Match {
        /// Absolute request URI under the configured base URI
        uri: String,
        /// List every matching template with captured values
        #[arg(long)]
        all: bool,
    },
    /// Assign URIs to the blank nodes of a Turtle document
    Skolemize {
        /// Turtle file to skolemize
        data: PathBuf,
        /// Absolute request URI used as the base for skolem templates
        #[arg(long)]
        path: String,
    },
    /// List the templates of every ontology in the sitemap
    Templates,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn handle_match(app: &Application, uri: &str, all: bool, as_json: bool) -> Result<bool> {
    if all {
        let matches = app.match_all(uri)?;
        if as_json {
            let entries: Vec<_> = matches
                .iter()
                .flat_map(|(uri_template, found)| {
                    found.iter().map(move |m| {
                        json!({
                            "uriTemplate": uri_template.as_str(),
                            "template": m.template.class,
                            "bindings": m.bindings,
                        })
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for (uri_template, found) in &matches {
                for m in found {
                    println!("{:<32} <{}> {:?}", uri_template, m.template.class, m.bindings);
                }
            }
        }
        return Ok(!matches.is_empty());
    }

    match app.match_uri(uri)? {
        Some(template) => {
            if as_json {
                println!("{}", serde_json::to_string_pretty(&*template)?);
            } else {
                println!("Template: <{}>", template.class);
                if let Some(path) = &template.path {
                    println!("  Path: {}", path);
                }
                if let Some(ontology) = &template.is_defined_by {
                    println!("  Defined by: <{}>", ontology);
                }
            }
            Ok(true)
        }
        None => {
            eprintln!("No template matches {}", uri);
            Ok(false)
        }
    }
}

fn handle_skolemize(app: &Application, data: &Path, path: &str) -> Result<()> {
    let turtle = fs::read_to_string(data).with_context(|| format!("Failed to read {}", data.display()))?;
    let graph = parse_graph(&turtle, Some(path))?;
    let skolemized = app.skolemize(graph, path)?;

    let mut lines: Vec<String> = skolemized.iter().map(|triple| format!("{} .", triple)).collect();
    lines.sort();
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn handle_templates(app: &Application, as_json: bool) -> Result<()> {
    let sitemap = app.sitemap()?;

    if as_json {
        let ontologies: Vec<_> = sitemap
            .ontologies()
            .into_iter()
            .map(|ontology| {
                json!({
                    "ontology": ontology.iri,
                    "imports": ontology.imports,
                    "templates": ontology.templates.iter().map(|t| t.as_ref()).collect::<Vec<_>>(),
                    "restrictions": ontology.restrictions,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&ontologies)?);
        return Ok(());
    }

    for ontology in sitemap.ontologies() {
        println!("<{}>", ontology.iri);
        for import in &ontology.imports {
            println!("  imports <{}>", import);
        }
        for template in &ontology.templates {
            let path = template.path.as_ref().map(|p| p.as_str()).unwrap_or("-");
            match &template.skolem_template {
                Some(skolem) => println!("  {:<32} <{}> skolem: {}", path, template.class, skolem),
                None => println!("  {:<32} <{}>", path, template.class),
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let app = Application::from_config_file(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;

    match cli.command {
        Commands::Match { uri, all } => {
            if !handle_match(&app, &uri, all, cli.json)? {
                std::process::exit(1);
            }
        }
        Commands::Skolemize { data, path } => {
            if !path.contains(':') {
                bail!("--path must be an absolute URI, got '{}'", path);
            }
            handle_skolemize(&app, &data, &path)?;
        }
        Commands::Templates => handle_templates(&app, cli.json)?,
    }

    Ok(())
}
