use std::path::PathBuf;

use clap::Parser;

use crate::config::ExtractConfig;

mod log;

pub(crate) use log::LogLevel;

#[derive(Debug, Parser)]
#[command(name = "extract-gql", version)]
#[command(arg_required_else_help = true)]
/// Extracts GraphQL queries and mutations into a persisted query map
pub(crate) struct Args {
    /// A GraphQL file, a code file, or a directory to crawl
    pub input: PathBuf,
    /// Where to write the query map. Defaults to extracted_queries.json
    pub output: Option<PathBuf>,
    /// Add a `__typename` field to every nested selection set before computing keys
    #[arg(long)]
    pub add_typename: bool,
    /// Read GraphQL from tagged template literals in code files
    #[arg(long)]
    pub js: bool,
    /// Only files with this extension are read. Defaults to `graphql`
    #[arg(long)]
    pub extension: Option<String>,
    /// Tag of the template literals holding GraphQL. Defaults to `gql`
    #[arg(long)]
    pub literal_tag: Option<String>,
    /// Path to a TOML configuration file with an `[extract]` table
    #[arg(long, short, env = "EXTRACT_GQL_CONFIG_PATH")]
    pub config: Option<PathBuf>,
    /// Set the logging level
    #[arg(long = "log", env = "EXTRACT_GQL_LOG", value_enum, default_value_t)]
    pub log_level: LogLevel,
}

impl Args {
    /// The configuration file, if any, with command line flags applied on top.
    pub fn config(&self) -> anyhow::Result<ExtractConfig> {
        let mut config = match self.config.as_deref() {
            Some(path) => ExtractConfig::load(path)?,
            None => ExtractConfig::default(),
        };

        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }

        if let Some(extension) = &self.extension {
            config.extension.clone_from(extension);
        }

        if let Some(literal_tag) = &self.literal_tag {
            config.literal_tag.clone_from(literal_tag);
        }

        config.add_typename |= self.add_typename;
        config.js |= self.js;

        Ok(config)
    }
}

pub(crate) fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "extract-gql",
            "src",
            "queries.json",
            "--js",
            "--extension",
            "tsx",
            "--add-typename",
            "--log",
            "debug",
        ])
        .unwrap();

        let config = args.config().unwrap();

        assert_eq!(config.output, PathBuf::from("queries.json"));
        assert_eq!(config.extension, "tsx");
        assert_eq!(config.literal_tag, "gql");
        assert!(config.js);
        assert!(config.add_typename);
        assert_eq!(args.log_level, LogLevel::Debug);
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["extract-gql", "queries.graphql"]).unwrap();

        assert_eq!(args.config().unwrap(), ExtractConfig::default());
        assert_eq!(args.log_level, LogLevel::Info);
    }
}
