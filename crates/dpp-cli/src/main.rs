//! # dpp-cli
//!
//! Command-line front end for the passport mapping engine.
//!
//! Maps passports through registered schemas, inspects the registry, and
//! builds the classifier tables that configure the mappers.

mod sample;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dpp_classifier::{
    Classifier, CorpusScan, EclassArtifact, EclassCorpus, Isa95Artifact, Isa95Corpus,
    write_artifact,
};
use dpp_model::{DigitalProductPassport, Part};
use dpp_schema::{SchemaInfo, SchemaRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dpp")]
#[command(about = "Digital Product Passport schema mapper")]
#[command(version)]
struct Cli {
    /// Directory holding the per-schema mapping files
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered schemas with their aliases
    Schemas,

    /// Show metadata for a schema or alias
    Info {
        /// Schema name or alias
        schema: String,
    },

    /// Map a passport into a target schema
    Map {
        /// Schema name or alias
        #[arg(short, long)]
        schema: String,

        /// Passport file (.json, .yaml or .yml); the built-in sample if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file; stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Emit the built-in sample passport as JSON
    Sample {
        /// Output file; stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a domain mapping table from a taxonomy corpus
    Classify {
        /// Taxonomy to read
        #[arg(value_enum)]
        ontology: Ontology,

        /// Corpus directory (*.xml for ECLASS, *.xsd for ISA-95)
        #[arg(short, long)]
        dir: PathBuf,

        /// Mapping file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Also write one example part per domain as JSON
        #[arg(long)]
        examples: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Ontology {
    Eclass,
    Isa95,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut registry = SchemaRegistry::with_builtin(&cli.config_dir);

    match cli.command {
        Commands::Schemas => {
            for name in registry.list_schemas() {
                let aliases = registry.list_aliases(&name);
                if aliases.is_empty() {
                    println!("{name}");
                } else {
                    println!("{name} (aliases: {})", aliases.join(", "));
                }
            }
            Ok(())
        }
        Commands::Info { schema } => {
            let info = registry.info(&schema)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            if let SchemaInfo::Missing { error } = info {
                bail!(error);
            }
            Ok(())
        }
        Commands::Map {
            schema,
            input,
            output,
        } => {
            let passport = match input {
                Some(path) => read_passport(&path)?,
                None => sample::sample_passport(),
            };
            info!(
                "Mapping {} ({} parts) with {}",
                passport.identity.display_name(),
                passport.structure.parts.len(),
                schema
            );
            let document = registry.map_dpp(&schema, &passport)?;
            write_output(output.as_deref(), &document.to_json_pretty()?)
        }
        Commands::Sample { output } => {
            write_output(output.as_deref(), &sample::sample_passport().to_json_pretty()?)
        }
        Commands::Classify {
            ontology,
            dir,
            output,
            examples,
        } => classify(ontology, &dir, &output, examples.as_deref()),
    }
}

fn read_passport(path: &Path) -> Result<DigitalProductPassport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read passport {}", path.display()))?;
    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    let passport = if is_yaml {
        DigitalProductPassport::from_yaml_str(&text)
    } else {
        DigitalProductPassport::from_json_str(&text)
    };
    passport.with_context(|| format!("Invalid passport {}", path.display()))
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn classify(
    ontology: Ontology,
    dir: &Path,
    output: &Path,
    examples: Option<&Path>,
) -> Result<()> {
    let (scan, classified, total, parts) = match ontology {
        Ontology::Eclass => {
            let (corpus, scan) = EclassCorpus::scan_dir(dir);
            let artifact = EclassArtifact::build(&corpus, &Classifier::eclass());
            write_artifact(output, &artifact)?;
            for (kind, entry) in artifact.domain_mappings.iter() {
                println!(
                    "{kind}: {} classes, {} items",
                    entry.eclass_class_ids.len(),
                    entry.eclass_case_item_ids.len()
                );
            }
            let parts = examples.map(|_| artifact.example_parts()).transpose()?;
            (scan, artifact.classified(), artifact.total_classes, parts)
        }
        Ontology::Isa95 => {
            let (corpus, scan) = Isa95Corpus::scan_dir(dir);
            let artifact = Isa95Artifact::build(&corpus, &Classifier::isa95());
            write_artifact(output, &artifact)?;
            for (kind, entry) in artifact.domain_mappings.iter() {
                println!("{kind}: {} types", entry.isa95_type_ids.len());
            }
            let parts = examples.map(|_| artifact.example_parts()).transpose()?;
            (scan, artifact.classified(), artifact.total_definitions, parts)
        }
    };

    if let (Some(path), Some(parts)) = (examples, parts) {
        write_examples(path, &parts)?;
    }
    print_summary(&scan, classified, total);
    Ok(())
}

fn write_examples(path: &Path, parts: &[Part]) -> Result<()> {
    let json = serde_json::to_string_pretty(parts)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} example parts to {}", parts.len(), path.display());
    Ok(())
}

fn print_summary(scan: &CorpusScan, classified: usize, total: usize) {
    for skipped in &scan.skipped {
        eprintln!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    eprintln!(
        "Classify summary: files={}, parsed={}, skipped={}, classified={}/{}",
        scan.files_found,
        scan.parsed,
        scan.skipped.len(),
        classified,
        total
    );
}
