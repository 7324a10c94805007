//! CLI argument parsing for the `fulltext` binary.
//!
//! Global flags override every other configuration source.

use clap::{Parser, Subcommand, ValueEnum};

use fulltext_types::{AnalyzerPreset, IndexKind};

/// Graph full-text indexing
///
/// Builds per-label full-text indexes over a property graph and answers
/// ranked queries against them. Results are printed as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "fulltext")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/graph-fulltext/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override the index root directory
    #[arg(long, global = true)]
    pub index_root: Option<String>,

    /// Override the graph database path
    #[arg(long, global = true)]
    pub graph_path: Option<String>,

    /// Analyzer for newly created indexes (standard, cjk, exact)
    #[arg(long, global = true)]
    pub analyzer: Option<AnalyzerPreset>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Index kind selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindArg {
    #[default]
    Node,
    Relationship,
}

impl From<KindArg> for IndexKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Node => IndexKind::Node,
            KindArg::Relationship => IndexKind::Relationship,
        }
    }
}

/// Commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load a JSON graph snapshot into the graph database
    Import {
        /// Snapshot file
        path: String,
    },

    /// Print ids of nodes in a label's index matching a query
    Search {
        /// Label (index name)
        label: String,

        /// Query string
        query: String,
    },

    /// Print the top documents of an index for a query, with scores
    Rank {
        /// Index name
        index: String,

        /// Query string
        query: String,

        /// Maximum results
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Re-index one node under every label it carries
    Index {
        /// Node id
        id: u64,

        /// Property keys to index (default: all)
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,
    },

    /// Build a named index from the nodes of one label
    AddIndex {
        /// Index name
        name: String,

        /// Label whose nodes are indexed
        label: String,

        /// Property keys to index (default: all)
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,
    },

    /// Index every property of every node with a label
    IndexLabel {
        /// Label
        label: String,
    },

    /// Index several labels
    IndexLabels {
        /// Labels
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Index every label in the graph
    IndexAll,

    /// Index only the listed properties, per label
    IndexProperties {
        /// Property keys
        #[arg(required = true)]
        properties: Vec<String>,
    },

    /// Query one index over given property fields
    QueryProperty {
        /// Index name
        index: String,

        /// Query value; wrap in double quotes for an exact match
        value: String,

        /// Property fields to search
        #[arg(short, long, value_delimiter = ',', required = true)]
        fields: Vec<String>,

        /// Keep only results scoring above this
        #[arg(long)]
        min_score: Option<f64>,
    },

    /// Query the indexes of several labels
    QueryLabel {
        /// Query value; wrap in double quotes for an exact match
        value: String,

        /// Labels to query
        #[arg(short = 'L', long = "label", required = true)]
        labels: Vec<String>,

        /// Keep only results scoring above this
        #[arg(long)]
        min_score: Option<f64>,

        /// Maximum results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Query the indexes of every label in the graph
    QueryValue {
        /// Query value; wrap in double quotes for an exact match
        value: String,

        /// Keep only results scoring above this
        #[arg(long)]
        min_score: Option<f64>,

        /// Maximum results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// List index names
    List {
        /// Index kind
        #[arg(long, value_enum, default_value_t = KindArg::Node)]
        kind: KindArg,
    },

    /// Remove one node index
    Remove {
        /// Index name
        name: String,
    },

    /// Remove every index
    RemoveAll,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_search() {
        let cli = Cli::parse_from(["fulltext", "search", "Person", "alice"]);
        match cli.command {
            Commands::Search { label, query } => {
                assert_eq!(label, "Person");
                assert_eq!(query, "alice");
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_global_overrides() {
        let cli = Cli::parse_from([
            "fulltext",
            "--config",
            "/path/to/config.toml",
            "index-all",
            "--index-root",
            "/tmp/idx",
            "--analyzer",
            "cjk",
        ]);
        assert_eq!(cli.config, Some("/path/to/config.toml".to_string()));
        assert_eq!(cli.index_root, Some("/tmp/idx".to_string()));
        assert_eq!(cli.analyzer, Some(AnalyzerPreset::Cjk));
        assert!(matches!(cli.command, Commands::IndexAll));
    }

    #[test]
    fn test_cli_add_index_keys() {
        let cli = Cli::parse_from([
            "fulltext", "add-index", "people", "Person", "--keys", "name,city",
        ]);
        match cli.command {
            Commands::AddIndex { name, label, keys } => {
                assert_eq!(name, "people");
                assert_eq!(label, "Person");
                assert_eq!(keys, vec!["name", "city"]);
            }
            _ => panic!("Expected AddIndex command"),
        }
    }

    #[test]
    fn test_cli_query_property() {
        let cli = Cli::parse_from([
            "fulltext",
            "query-property",
            "City",
            "\"New York\"",
            "-f",
            "name,motto",
            "--min-score",
            "0.1",
        ]);
        match cli.command {
            Commands::QueryProperty {
                index,
                value,
                fields,
                min_score,
            } => {
                assert_eq!(index, "City");
                assert_eq!(value, "\"New York\"");
                assert_eq!(fields, vec!["name", "motto"]);
                assert_eq!(min_score, Some(0.1));
            }
            _ => panic!("Expected QueryProperty command"),
        }
    }

    #[test]
    fn test_cli_query_label_repeated() {
        let cli = Cli::parse_from([
            "fulltext", "query-label", "york", "-L", "City", "-L", "Band", "-n", "5",
        ]);
        match cli.command {
            Commands::QueryLabel { labels, limit, .. } => {
                assert_eq!(labels, vec!["City", "Band"]);
                assert_eq!(limit, Some(5));
            }
            _ => panic!("Expected QueryLabel command"),
        }
    }

    #[test]
    fn test_cli_list_kind() {
        let cli = Cli::parse_from(["fulltext", "list"]);
        assert!(matches!(cli.command, Commands::List { kind: KindArg::Node }));

        let cli = Cli::parse_from(["fulltext", "list", "--kind", "relationship"]);
        assert!(matches!(
            cli.command,
            Commands::List { kind: KindArg::Relationship }
        ));
    }

    #[test]
    fn test_cli_rank_default_limit() {
        let cli = Cli::parse_from(["fulltext", "rank", "Person", "key:name AND alice"]);
        match cli.command {
            Commands::Rank { limit, .. } => assert_eq!(limit, 10),
            _ => panic!("Expected Rank command"),
        }
    }

    #[test]
    fn test_cli_requires_labels() {
        assert!(Cli::try_parse_from(["fulltext", "index-labels"]).is_err());
        assert!(Cli::try_parse_from(["fulltext", "query-property", "City", "x"]).is_err());
    }
}
