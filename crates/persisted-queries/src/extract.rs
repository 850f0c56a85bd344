//! Finds GraphQL documents embedded as tagged template literals in application code.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

static INTERPOLATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{[\s\S]+?\}").unwrap());

/// The bodies of every `` tag`...` `` literal in the code, in source order.
pub fn find_tagged_template_literals<'a>(code: &'a str, tag: &str) -> crate::Result<Vec<&'a str>> {
    let literal = Regex::new(&format!(r"{}\s*`([\s\S]+?)`", regex::escape(tag)))?;

    Ok(literal
        .captures_iter(code)
        .filter_map(|captures| captures.get(1))
        .map(|body| body.as_str())
        .collect())
}

/// Removes every `${...}` placeholder from a template literal body. Interpolated fragments
/// are expected to be part of the extracted text elsewhere.
pub fn eliminate_interpolations(contents: &str) -> Cow<'_, str> {
    INTERPOLATION.replace_all(contents, "")
}

/// The GraphQL text of every literal tagged with `tag`, placeholders removed, one per line.
pub fn extract_from_code(code: &str, tag: &str) -> crate::Result<String> {
    let text = find_tagged_template_literals(code, tag)?
        .into_iter()
        .map(eliminate_interpolations)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(text)
}
