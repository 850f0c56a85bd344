use std::{fs, path::Path};

use anyhow::{bail, Context};
use persisted_queries::{extract::extract_from_code, OutputMap, OutputMapBuilder};
use walkdir::WalkDir;

use crate::config::ExtractConfig;

/// Reads every matching file under `input` and collects all of their operations into one map,
/// so ids are unique across files.
pub(crate) fn extract(input: &Path, config: &ExtractConfig) -> anyhow::Result<OutputMap> {
    let source = read_input_path(input, config)?;

    let mut builder = OutputMapBuilder::new(config.pipeline());
    builder
        .add_source(&source)
        .with_context(|| format!("extracting queries from {}", input.display()))?;

    Ok(builder.finish())
}

/// The GraphQL text of a file, or of every matching file below a directory in file name order,
/// joined by newlines.
pub(crate) fn read_input_path(input: &Path, config: &ExtractConfig) -> anyhow::Result<String> {
    if !input.exists() {
        bail!("input path {} does not exist", input.display());
    }

    if input.is_dir() {
        tracing::info!("Crawling {}...", input.display());
    }

    let mut sources = Vec::new();

    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!("skipping unreadable entry: {error}");
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), &config.extension) {
            continue;
        }

        tracing::debug!(path = %entry.path().display(), "reading file");

        let contents =
            fs::read_to_string(entry.path()).with_context(|| format!("reading {}", entry.path().display()))?;

        if config.js {
            let extracted = extract_from_code(&contents, &config.literal_tag)
                .with_context(|| format!("extracting template literals from {}", entry.path().display()))?;

            sources.push(extracted);
        } else {
            sources.push(contents);
        }
    }

    Ok(sources.join("\n"))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|extension| extension.to_str()) == Some(extension)
}
