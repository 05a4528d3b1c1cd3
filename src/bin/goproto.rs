use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use goproto_core::config::{SourceRoot, TranspilerConfig};
use goproto_core::extractors::{extract_source_model, Overrides};
use goproto_core::writers::{write_proto_files, SchemaWriter};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate proto3 schemas and a service definition from a Go interface and
/// every local package it reaches.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// JSON transpiler config
    #[arg(short, long)]
    config: PathBuf,

    /// Entry file relative to $GOPATH/src (overrides the config)
    #[arg(short, long)]
    entry: Option<String>,

    /// Output directory (overrides the config)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Also write the extracted model as JSON to this file
    #[arg(long)]
    model_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,goproto=info,goproto_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = TranspilerConfig::load(&cli.config)?;
    if let Some(entry) = cli.entry {
        config.entry_file = entry;
    }
    if let Some(out_dir) = cli.out_dir {
        config.out_dir = out_dir;
    }

    let source_root = SourceRoot::from_env()?;
    let overrides = Overrides::from_config(&config);
    let model = extract_source_model(&source_root, &config, &overrides)
        .with_context(|| format!("failed to extract model from {}", config.entry_file))?;

    if let Some(path) = &cli.model_json {
        let json = model.result.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write model to '{}'", path.display()))?;
    }

    let writer = SchemaWriter::new(&model.graph, &config);
    let mut files = writer.proto_files(&model.result)?;
    files.push(writer.service_file(&model.result)?);
    let written = write_proto_files(&config.out_dir, &files)?;

    info!(
        "Wrote {} proto files to {} ({} fields and {} enum entries overridden)",
        written.len(),
        config.out_dir.display(),
        model.overrides.fields_rewritten,
        model.overrides.enums_rewritten
    );
    Ok(())
}
