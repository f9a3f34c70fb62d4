use crate::cli::{Args, Command, Engine, SearchArgs};
use anyhow::{bail, Context};
use clap::Parser;
use fcrepo::config::{RepositoryConfig, SearchEngine};
use fcrepo::indexer::{indexer_for, ElasticIndexer};
use fcrepo::io::{diff, load_metadata, RdfFormat};
use fcrepo::model::{ModelSchema, ResourceMetadata};
use fcrepo::schema::SchemaDefinition;
use fcrepo::update::UpdateSerializer;
use fcrepo::SearchRequest;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, stdin, stdout, BufReader, Read, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod cli;

const DEFAULT_REPOSITORY_URL: &str = "http://localhost:8080/rest";
const DEFAULT_SEARCH_URL: &str = "http://localhost:9200/repository";

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(io::stderr)
            .init();
    }

    match args.command {
        Command::Mapping { schema, search } => {
            let config = load_config(&search)?;
            if config.search_engine != SearchEngine::Elasticsearch {
                bail!("Index mappings are only generated for Elasticsearch")
            }
            let schema = load_schema(&schema)?;
            let mapping = ElasticIndexer::new(&config)?.index_mapping(&schema)?;
            write_json(&mapping)
        }
        Command::Compile {
            schema,
            query,
            search,
        } => {
            let config = load_config(&search)?;
            let schema = load_schema(&schema)?;
            let query = match query {
                Some(file) => fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read the query {}", file.display()))?,
                None => {
                    let mut query = String::new();
                    stdin().lock().read_to_string(&mut query)?;
                    query
                }
            };
            let request = search_request(&schema, &query)?;
            if let Some(pk) = request.repository_pk() {
                tracing::info!(%pk, "the search can be answered by the repository directly");
            }
            let compiled = indexer_for(&config)?.compile(&schema, &request)?;
            write_json(&compiled.to_json())
        }
        Command::Diff {
            subject,
            before,
            after,
            format,
        } => {
            let format = format.as_deref().map(rdf_format_from_name).transpose()?;
            let before = load_file(&before, format, &subject)?;
            let after = load_file(&after, format, &subject)?;
            let update = diff(&before, &after, &UpdateSerializer::default());
            let mut stdout = stdout().lock();
            write!(stdout, "{update}")?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn load_config(args: &SearchArgs) -> anyhow::Result<RepositoryConfig> {
    let mut config = match &args.config {
        Some(file) => {
            let json = fs::read_to_string(file)
                .with_context(|| format!("Failed to read the configuration {}", file.display()))?;
            RepositoryConfig::from_json(&json)
                .with_context(|| format!("Invalid configuration {}", file.display()))?
        }
        None => RepositoryConfig::new(DEFAULT_REPOSITORY_URL, DEFAULT_SEARCH_URL),
    };
    if let Some(engine) = args.engine {
        config = config.with_search_engine(match engine {
            Engine::Elasticsearch => SearchEngine::Elasticsearch,
            Engine::Solr => SearchEngine::Solr,
        });
    }
    if !args.languages.is_empty() {
        config = config.with_languages(args.languages.iter().cloned());
    }
    config.validate()?;
    Ok(config)
}

fn load_schema(file: &Path) -> anyhow::Result<ModelSchema> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read the schema {}", file.display()))?;
    SchemaDefinition::from_json(&json)
        .and_then(|definition| definition.to_schema())
        .with_context(|| format!("Invalid schema {}", file.display()))
}

/// The model of the query file defaults to the model of the schema.
fn search_request(schema: &ModelSchema, query: &str) -> anyhow::Result<SearchRequest> {
    let mut query: Value = serde_json::from_str(query).context("The query is not valid JSON")?;
    if let Some(object) = query.as_object_mut() {
        object
            .entry("model")
            .or_insert_with(|| Value::from(schema.model_name()));
    }
    Ok(SearchRequest::from_json(&query.to_string())?)
}

fn load_file(
    file: &Path,
    format: Option<RdfFormat>,
    subject: &str,
) -> anyhow::Result<ResourceMetadata> {
    let format = match format {
        Some(format) => format,
        None => rdf_format_from_path(file)?,
    };
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
    );
    load_metadata(format, reader, subject)
        .with_context(|| format!("Failed to load {}", file.display()))
}

fn write_json(value: &Value) -> anyhow::Result<()> {
    let mut stdout = stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

fn rdf_format_from_path(path: &Path) -> anyhow::Result<RdfFormat> {
    if let Some(ext) = path.extension().and_then(OsStr::to_str) {
        RdfFormat::from_extension(ext)
            .with_context(|| format!("The file extension '{ext}' is unknown"))
    } else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    }
}

fn rdf_format_from_name(name: &str) -> anyhow::Result<RdfFormat> {
    if let Some(t) = RdfFormat::from_extension(name) {
        return Ok(t);
    }
    if let Some(t) = RdfFormat::from_media_type(name) {
        return Ok(t);
    }
    bail!("The file format '{name}' is unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use assert_fs::NamedTempFile;
    use predicates::prelude::*;

    const SCHEMA: &str = r#"{
        "model": "thesis.models.Thesis",
        "fields": [
            {"name": "title", "predicate": "http://purl.org/dc/elements/1.1/title", "kind": "language"},
            {"name": "creator", "predicate": "http://purl.org/dc/elements/1.1/creator", "kind": "text"}
        ]
    }"#;

    fn cli_command() -> Command {
        let mut command = Command::new(env!("CARGO"));
        command.arg("run").arg("--bin").arg("fcrepo").arg("--");
        command
    }

    fn schema_file() -> Result<NamedTempFile> {
        let file = NamedTempFile::new("thesis.json")?;
        file.write_str(SCHEMA)?;
        Ok(file)
    }

    #[test]
    fn cli_help() {
        cli_command()
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn cli_mapping() -> Result<()> {
        let schema = schema_file()?;
        cli_command()
            .arg("mapping")
            .arg("--schema")
            .arg(schema.path())
            .arg("--languages")
            .arg("cs")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""_1creator__exact""#))
            .stdout(predicate::str::contains(r#""analyzer": "czech""#))
            .stdout(predicate::str::contains("english").not());
        Ok(())
    }

    #[test]
    fn cli_mapping_requires_elasticsearch() -> Result<()> {
        let schema = schema_file()?;
        cli_command()
            .arg("mapping")
            .arg("--schema")
            .arg(schema.path())
            .arg("--engine")
            .arg("solr")
            .assert()
            .failure()
            .stderr(predicate::str::contains("only generated for Elasticsearch"));
        Ok(())
    }

    #[test]
    fn cli_compile_solr_from_stdin() -> Result<()> {
        let schema = schema_file()?;
        cli_command()
            .arg("compile")
            .arg("--schema")
            .arg(schema.path())
            .arg("--engine")
            .arg("solr")
            .write_stdin(r#"{"filter": {"lookup": "creator__fulltext", "value": "Smith"}}"#)
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""creator_ts:Smith""#));
        Ok(())
    }

    #[test]
    fn cli_compile_unknown_field() -> Result<()> {
        let schema = schema_file()?;
        cli_command()
            .arg("compile")
            .arg("--schema")
            .arg(schema.path())
            .write_stdin(r#"{"filter": {"lookup": "year__gte", "value": 2010}}"#)
            .assert()
            .failure()
            .stderr(predicate::str::contains("year"));
        Ok(())
    }

    #[test]
    fn cli_diff() -> Result<()> {
        let before = NamedTempFile::new("before.ttl")?;
        before.write_str(r#"<> <http://purl.org/dc/elements/1.1/title> "Old" ."#)?;
        let after = NamedTempFile::new("after.nt")?;
        after.write_str(
            "<http://localhost:8080/rest/a> <http://purl.org/dc/elements/1.1/title> \"New\" .\n",
        )?;
        cli_command()
            .arg("diff")
            .arg("--subject")
            .arg("http://localhost:8080/rest/a")
            .arg("--before")
            .arg(before.path())
            .arg("--after")
            .arg(after.path())
            .assert()
            .success()
            .stdout("PREFIX dc: <http://purl.org/dc/elements/1.1/>\nDELETE {\n    <> dc:title \"Old\" .\n}\nINSERT {\n    <> dc:title \"New\" .\n}\nWHERE { }\n");
        Ok(())
    }

    #[test]
    fn format_names() {
        assert!(matches!(rdf_format_from_name("ttl"), Ok(RdfFormat::Turtle)));
        assert!(matches!(
            rdf_format_from_name("application/n-triples"),
            Ok(RdfFormat::NTriples)
        ));
        assert!(matches!(rdf_format_from_name("docx"), Err(_)));
    }

    #[test]
    fn clap_debug() {
        use clap::CommandFactory;

        Args::command().debug_assert()
    }
}
