//! Command implementations.
//!
//! Every command prints its results as JSON lines on the given writer.
//! Logs go to stderr so stdout stays machine-readable.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use fulltext_search::FullTextService;
use fulltext_storage::{GraphDb, GraphSnapshot};
use fulltext_types::{IndexKind, NodeId, Settings};

use crate::cli::{Cli, Commands};

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(index_root) = &cli.index_root {
        settings.index_root = index_root.clone();
    }
    if let Some(graph_path) = &cli.graph_path {
        settings.graph_path = graph_path.clone();
    }
    if let Some(analyzer) = cli.analyzer {
        settings.analyzer = analyzer;
    }
    if let Some(log_level) = &cli.log_level {
        settings.log_level = log_level.clone();
    }

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Load configuration, install logging and run the parsed command.
pub fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    init_logging(&settings.log_level)?;

    info!(
        index_root = %settings.index_root,
        graph_path = %settings.graph_path,
        analyzer = ?settings.analyzer,
        "Configuration loaded"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli.command, &settings, &mut out)
}

fn open_graph(settings: &Settings) -> Result<GraphDb> {
    let path = settings.graph_path_buf();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create graph directory")?;
    }
    GraphDb::open(&path).with_context(|| format!("Failed to open graph at {:?}", path))
}

fn emit<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn emit_all<T: Serialize>(out: &mut dyn Write, values: &[T]) -> Result<()> {
    for value in values {
        emit(out, value)?;
    }
    Ok(())
}

/// Run one command against the configured index root and graph.
pub fn execute(command: Commands, settings: &Settings, out: &mut dyn Write) -> Result<()> {
    let service = FullTextService::new(settings.index_root_path(), settings.engine_config());

    match command {
        Commands::Import { path } => {
            let snapshot = GraphSnapshot::from_path(Path::new(&path))
                .with_context(|| format!("Failed to read snapshot {}", path))?;
            let graph = open_graph(settings)?;
            let imported = graph.import(&snapshot).context("Failed to import snapshot")?;
            emit(out, &json!({ "imported": imported }))?;
        }
        Commands::Search { label, query } => {
            let ids = service.search(&label, &query).context("Search failed")?;
            for id in ids {
                emit(out, &json!({ "id": id }))?;
            }
        }
        Commands::Rank {
            index,
            query,
            limit,
        } => {
            let graph = open_graph(settings)?;
            let results = service
                .search_ranked(&graph, &index, &query, limit)
                .context("Search failed")?;
            emit_all(out, &results)?;
        }
        Commands::Index { id, keys } => {
            let graph = open_graph(settings)?;
            let stats = service
                .index(&graph, NodeId(id), &keys)
                .with_context(|| format!("Failed to index node {}", id))?;
            emit(out, &stats)?;
        }
        Commands::AddIndex { name, label, keys } => {
            let graph = open_graph(settings)?;
            let stats = service
                .add_index(&graph, &name, &label, &keys)
                .with_context(|| format!("Failed to build index {}", name))?;
            emit(out, &stats)?;
        }
        Commands::IndexLabel { label } => {
            let graph = open_graph(settings)?;
            let stats = service
                .add_nodes_index_by_label(&graph, &label)
                .with_context(|| format!("Failed to index label {}", label))?;
            emit(out, &stats)?;
        }
        Commands::IndexLabels { labels } => {
            let graph = open_graph(settings)?;
            let stats = service
                .add_nodes_index_by_labels(&graph, &labels)
                .context("Failed to index labels")?;
            emit(out, &stats)?;
        }
        Commands::IndexAll => {
            let graph = open_graph(settings)?;
            let stats = service
                .add_nodes_index(&graph)
                .context("Failed to index graph")?;
            emit(out, &stats)?;
        }
        Commands::IndexProperties { properties } => {
            let graph = open_graph(settings)?;
            let stats = service
                .add_nodes_index_by_properties(&graph, &properties)
                .context("Failed to index properties")?;
            emit(out, &stats)?;
        }
        Commands::QueryProperty {
            index,
            value,
            fields,
            min_score,
        } => {
            let graph = open_graph(settings)?;
            let results = service
                .query_by_property(&graph, &index, &fields, &value, min_score)
                .context("Query failed")?;
            emit_all(out, &results)?;
        }
        Commands::QueryLabel {
            value,
            labels,
            min_score,
            limit,
        } => {
            let graph = open_graph(settings)?;
            let results = service
                .query_by_label(&graph, &labels, &value, min_score, limit)
                .context("Query failed")?;
            emit_all(out, &results)?;
        }
        Commands::QueryValue {
            value,
            min_score,
            limit,
        } => {
            let graph = open_graph(settings)?;
            let results = service
                .query_by_value(&graph, &value, min_score, limit)
                .context("Query failed")?;
            emit_all(out, &results)?;
        }
        Commands::List { kind } => {
            let names = service
                .list_indexes(IndexKind::from(kind))
                .context("Failed to list indexes")?;
            emit_all(out, &names)?;
        }
        Commands::Remove { name } => {
            let removed = service
                .remove_index_by_label(&name)
                .with_context(|| format!("Failed to remove index {}", name))?;
            emit_all(out, &removed)?;
        }
        Commands::RemoveAll => {
            let removed = service.remove_index().context("Failed to remove indexes")?;
            emit_all(out, &removed)?;
        }
    }

    Ok(())
}
