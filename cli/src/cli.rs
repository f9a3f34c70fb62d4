use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "fcrepo")]
/// Fedora Commons repository metadata and search index toolkit
pub struct Args {
    /// Log to stderr, filtered by RUST_LOG (default "info")
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the Elasticsearch index mapping of a model
    Mapping {
        /// JSON file describing the model
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        schema: PathBuf,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Compile a search over a model into an Elasticsearch body or Solr parameters
    Compile {
        /// JSON file describing the model
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        schema: PathBuf,
        /// JSON file with the search: filter tree, start, end, ordering and facets
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        query: Option<PathBuf>,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Print the SPARQL update turning one description of a resource into another
    Diff {
        /// IRI of the described resource, also the base IRI of both files
        #[arg(long, value_hint = ValueHint::Url)]
        subject: String,
        /// The current description
        #[arg(long, value_hint = ValueHint::FilePath)]
        before: PathBuf,
        /// The wanted description
        #[arg(long, value_hint = ValueHint::FilePath)]
        after: PathBuf,
        /// The format of both files
        ///
        /// It can be an extension like "ttl" or a MIME type like "text/turtle".
        ///
        /// By default the format is guessed from the file extensions.
        #[arg(long)]
        format: Option<String>,
    },
}

/// Selects the search engine and its settings.
#[derive(clap::Args)]
pub struct SearchArgs {
    /// JSON repository configuration
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Overrides the search engine of the configuration
    #[arg(short, long)]
    pub engine: Option<Engine>,
    /// Overrides the languages of the configuration
    #[arg(short, long, value_delimiter = ',')]
    pub languages: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Engine {
    Elasticsearch,
    Solr,
}
