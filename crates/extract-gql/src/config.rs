use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use persisted_queries::{AddTypename, Pipeline};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    extract: ExtractConfig,
}

/// Settings of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ExtractConfig {
    /// Where the query map is written
    pub output: PathBuf,
    /// Only files with this extension are read
    pub extension: String,
    /// Read tagged template literals instead of raw GraphQL
    pub js: bool,
    /// The template literal tag marking GraphQL
    pub literal_tag: String,
    /// Apply the `__typename` transformer
    pub add_typename: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("extracted_queries.json"),
            extension: "graphql".to_string(),
            js: false,
            literal_tag: "gql".to_string(),
            add_typename: false,
        }
    }
}

impl ExtractConfig {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    pub(crate) fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.extract)
    }

    pub(crate) fn pipeline(&self) -> Pipeline {
        let mut pipeline = Pipeline::new();

        if self.add_typename {
            pipeline.push(AddTypename);
        }

        pipeline
    }
}
