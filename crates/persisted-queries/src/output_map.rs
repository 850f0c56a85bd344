use std::{collections::HashSet, fmt};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    apply_query_transformers,
    ast::{self, Document},
    canonical_key, reduce_document_for_operation, Error, Pipeline,
};

/// Identifier of a persisted query. Ids generated by [`OutputMapBuilder`] are integers, maps
/// written by other tools may use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryId {
    /// A generated, monotonically increasing id
    Int(u64),
    /// An externally assigned id, e.g. a hash
    String(String),
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryId::Int(id) => write!(f, "{id}"),
            QueryId::String(id) => f.write_str(id),
        }
    }
}

impl From<u64> for QueryId {
    fn from(id: u64) -> Self {
        QueryId::Int(id)
    }
}

impl From<String> for QueryId {
    fn from(id: String) -> Self {
        QueryId::String(id)
    }
}

impl From<&str> for QueryId {
    fn from(id: &str) -> Self {
        QueryId::String(id.to_string())
    }
}

/// A persisted query: its id and the document the id stands for, after the transformer
/// pipeline and the fragment sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRecord {
    /// The id sent over the wire instead of the document
    pub id: QueryId,
    /// The document to execute for this id
    #[serde(with = "document_text")]
    pub transformed_query: Document,
}

/// Map from canonical query key to persisted query, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputMap {
    entries: IndexMap<String, QueryRecord>,
}

impl OutputMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a map from its JSON form.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The compact JSON form of the map.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of persisted queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The persisted query stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&QueryRecord> {
        self.entries.get(key)
    }

    /// The persisted query stored under `key`, or [`Error::KeyNotFound`].
    pub fn lookup(&self, key: &str) -> crate::Result<&QueryRecord> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// True if `key` has an entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys and records, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryRecord)> {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }

    /// Adds every entry of `other` whose key is not present yet. The added entries get fresh
    /// integer ids following the largest integer id of this map, so ids stay unique even when
    /// both maps were numbered from 1. Ids are compared by their text, so an integer id is
    /// skipped when a string id with the same text is already taken.
    pub fn merge(&mut self, other: OutputMap) {
        let mut taken: HashSet<String> = self.entries.values().map(|record| record.id.to_string()).collect();
        let mut last_id = self.max_int_id();

        for (key, record) in other.entries {
            if self.entries.contains_key(&key) {
                continue;
            }

            last_id += 1;

            while !taken.insert(last_id.to_string()) {
                last_id += 1;
            }

            let record = QueryRecord {
                id: QueryId::Int(last_id),
                ..record
            };

            self.entries.insert(key, record);
        }
    }

    fn max_int_id(&self) -> u64 {
        self.entries
            .values()
            .filter_map(|record| match record.id {
                QueryId::Int(id) => Some(id),
                QueryId::String(_) => None,
            })
            .max()
            .unwrap_or(0)
    }
}

/// Collects the operations of one or more documents into an [`OutputMap`], numbering new keys
/// from 1. One builder is one numbering scope: documents added to the same builder never share
/// an id.
#[derive(Debug, Default)]
pub struct OutputMapBuilder {
    pipeline: Pipeline,
    last_id: u64,
    map: OutputMap,
}

impl OutputMapBuilder {
    /// A builder applying `pipeline` to every document it is given.
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            last_id: 0,
            map: OutputMap::new(),
        }
    }

    /// The transformers applied before keys are computed.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Adds every operation of the document. Operations whose key is already known keep their
    /// id. If any operation fails, nothing from this document is added.
    pub fn add_document(&mut self, document: &Document) -> crate::Result<()> {
        let transformed = apply_query_transformers(document, &self.pipeline)?;

        let reduced = ast::operation_definitions(&transformed)
            .map(|operation| {
                let reduced = reduce_document_for_operation(&transformed, operation)?;
                Ok((canonical_key(&reduced), reduced))
            })
            .collect::<crate::Result<Vec<_>>>()?;

        for (key, transformed_query) in reduced {
            if self.map.contains_key(&key) {
                continue;
            }

            self.last_id += 1;

            let record = QueryRecord {
                id: QueryId::Int(self.last_id),
                transformed_query,
            };

            self.map.entries.insert(key, record);
        }

        Ok(())
    }

    /// Parses the source text and adds its operations. Blank sources add nothing.
    pub fn add_source(&mut self, source: &str) -> crate::Result<()> {
        if source.trim().is_empty() {
            return Ok(());
        }

        self.add_document(&ast::parse(source)?)
    }

    /// The entries collected so far.
    pub fn map(&self) -> &OutputMap {
        &self.map
    }

    /// Returns the collected map.
    pub fn finish(self) -> OutputMap {
        self.map
    }
}

/// Builds the map of a single document.
pub fn build_output_map(document: &Document, pipeline: Pipeline) -> crate::Result<OutputMap> {
    let mut builder = OutputMapBuilder::new(pipeline);
    builder.add_document(document)?;

    Ok(builder.finish())
}

// the parser AST has no serde support, documents are stored printed
mod document_text {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::ast::{self, Document};

    pub(super) fn serialize<S: Serializer>(document: &Document, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(document)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Document, D::Error> {
        let text = String::deserialize(deserializer)?;
        ast::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(key: &str, id: impl Into<QueryId>) -> OutputMap {
        let mut map = OutputMap::new();

        map.entries.insert(
            key.to_string(),
            QueryRecord {
                id: id.into(),
                transformed_query: ast::parse(key).unwrap(),
            },
        );

        map
    }

    #[test]
    fn ids_serialize_untagged() {
        let ids: Vec<QueryId> = serde_json::from_str(r#"[1, "abc"]"#).unwrap();

        assert_eq!(ids, [QueryId::Int(1), QueryId::from("abc")]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[1,"abc"]"#);
        assert_eq!(ids[0].to_string(), "1");
        assert_eq!(ids[1].to_string(), "abc");
    }

    #[test]
    fn merge_renumbers_new_keys() {
        let mut map = single("query A { a }", 1u64);
        map.merge(single("query A { a }", 1u64));
        map.merge(single("query B { b }", 1u64));
        map.merge(single("query C { c }", "external"));

        let ids: Vec<(&str, String)> = map.iter().map(|(key, record)| (key, record.id.to_string())).collect();

        assert_eq!(
            ids,
            [
                ("query A { a }", "1".to_string()),
                ("query B { b }", "2".to_string()),
                ("query C { c }", "3".to_string()),
            ]
        );
    }

    #[test]
    fn merge_skips_ids_taken_as_strings() {
        let mut map = single("query A { a }", 1u64);
        map.entries.extend(single("query B { b }", "2").entries);
        map.merge(single("query C { c }", 1u64));

        let ids: Vec<String> = map.iter().map(|(_, record)| record.id.to_string()).collect();

        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn lookup_miss() {
        let map = single("query A { a }", 1u64);

        assert!(map.lookup("query A { a }").is_ok());
        assert!(matches!(map.lookup("query B { b }"), Err(Error::KeyNotFound)));
    }

    #[test]
    fn invalid_stored_document() {
        let error = OutputMap::from_json(r#"{ "key": { "id": 1, "transformedQuery": "query {" } }"#).unwrap_err();
        assert!(matches!(error, Error::Json(_)));
    }
}
