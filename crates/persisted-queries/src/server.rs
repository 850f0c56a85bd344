//! Server side of persisted queries: turn a request id back into the query document.

use std::{
    borrow::Cow,
    collections::{hash_map::Entry, HashMap},
};

use crate::{
    client::{GraphqlRequest, PersistedRequest},
    Error, OutputMap, QueryId,
};

/// Source of persisted query documents, e.g. a map file or a database table.
pub trait QueryStore {
    /// The printed query document stored for `id`, or [`Error::IdNotFound`].
    fn fetch(&self, id: &QueryId) -> crate::Result<Cow<'_, str>>;
}

/// In-memory store indexed by id, built from an extracted map.
#[derive(Debug, Clone, Default)]
pub struct StaticQueryStore {
    queries: HashMap<String, String>,
}

impl StaticQueryStore {
    /// Indexes every record of the map by the text of its id. Fails with
    /// [`Error::DuplicateId`] if two records share an id.
    pub fn from_output_map(map: &OutputMap) -> crate::Result<Self> {
        let mut queries = HashMap::with_capacity(map.len());

        for (_, record) in map.iter() {
            match queries.entry(record.id.to_string()) {
                Entry::Occupied(_) => return Err(Error::DuplicateId { id: record.id.clone() }),
                Entry::Vacant(entry) => {
                    entry.insert(record.transformed_query.to_string());
                }
            }
        }

        Ok(Self { queries })
    }

    /// Number of stored queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl QueryStore for StaticQueryStore {
    // ids are compared by their text, so 1 and "1" are the same query
    fn fetch(&self, id: &QueryId) -> crate::Result<Cow<'_, str>> {
        self.queries
            .get(&id.to_string())
            .map(|query| Cow::Borrowed(query.as_str()))
            .ok_or_else(|| Error::IdNotFound { id: id.clone() })
    }
}

/// Resolves incoming persisted requests into full GraphQL requests.
#[derive(Debug, Clone)]
pub struct PersistedQueryResolver<S> {
    store: S,
    enabled: bool,
}

impl<S: QueryStore> PersistedQueryResolver<S> {
    /// A resolver with persisted queries enabled.
    pub fn new(store: S) -> Self {
        Self { store, enabled: true }
    }

    /// When disabled, request bodies pass through unchanged and persisted requests are
    /// rejected.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fills in the query document for the request id. Fails with
    /// [`Error::PersistedQueriesDisabled`] when the resolver is disabled.
    pub fn resolve(&self, request: PersistedRequest) -> crate::Result<GraphqlRequest> {
        if !self.enabled {
            return Err(Error::PersistedQueriesDisabled);
        }

        let query = self.store.fetch(&request.id)?.into_owned();

        Ok(GraphqlRequest {
            query,
            variables: request.variables,
            operation_name: request.operation_name,
        })
    }

    /// Adds a `query` field to a JSON request body carrying an `id`. Bodies without an id, and
    /// every body when the resolver is disabled, are returned unchanged.
    pub fn resolve_body(&self, mut body: serde_json::Value) -> crate::Result<serde_json::Value> {
        if !self.enabled {
            return Ok(body);
        }

        let id: QueryId = match body.get("id") {
            Some(id) => serde_json::from_value(id.clone())?,
            None => return Ok(body),
        };

        let query = self.store.fetch(&id)?.into_owned();

        if let Some(fields) = body.as_object_mut() {
            fields.insert("query".to_string(), serde_json::Value::String(query));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{build_output_map, Pipeline};

    fn resolver() -> PersistedQueryResolver<StaticQueryStore> {
        let document = crate::ast::parse("query A { a } query B { b }").unwrap();
        let map = build_output_map(&document, Pipeline::new()).unwrap();

        PersistedQueryResolver::new(StaticQueryStore::from_output_map(&map).unwrap())
    }

    #[test]
    fn resolves_ids() {
        let resolver = resolver();

        let request = resolver
            .resolve(PersistedRequest {
                id: QueryId::Int(2),
                variables: Some(json!({ "x": 1 })),
                operation_name: Some("B".to_string()),
            })
            .unwrap();

        assert_eq!(request.query, "query B {\n  b\n}\n");
        assert_eq!(request.variables, Some(json!({ "x": 1 })));
        assert_eq!(request.operation_name.as_deref(), Some("B"));
    }

    #[test]
    fn string_and_integer_ids_match() {
        let resolver = resolver();

        let by_int = resolver.store().fetch(&QueryId::Int(1)).unwrap().into_owned();
        let by_string = resolver.store().fetch(&QueryId::from("1")).unwrap().into_owned();

        assert_eq!(by_int, by_string);
    }

    #[test]
    fn unknown_id() {
        let error = resolver()
            .resolve(PersistedRequest {
                id: QueryId::Int(42),
                variables: None,
                operation_name: None,
            })
            .unwrap_err();

        assert!(matches!(error, Error::IdNotFound { id: QueryId::Int(42) }));
        assert_eq!(error.to_string(), "could not find a query with id `42`");
    }

    #[test]
    fn body_gets_a_query() {
        let body = resolver()
            .resolve_body(json!({ "id": 1, "variables": {}, "operationName": "A" }))
            .unwrap();

        assert_eq!(
            body,
            json!({ "id": 1, "variables": {}, "operationName": "A", "query": "query A {\n  a\n}\n" })
        );
    }

    #[test]
    fn body_without_id_passes_through() {
        let body = json!({ "query": "{ a }" });
        assert_eq!(resolver().resolve_body(body.clone()).unwrap(), body);
    }

    #[test]
    fn disabled_passes_through() {
        let body = json!({ "id": 42 });
        assert_eq!(resolver().enabled(false).resolve_body(body.clone()).unwrap(), body);
    }

    #[test]
    fn disabled_rejects_persisted_requests() {
        let error = resolver()
            .enabled(false)
            .resolve(PersistedRequest {
                id: QueryId::Int(1),
                variables: None,
                operation_name: None,
            })
            .unwrap_err();

        assert!(matches!(error, Error::PersistedQueriesDisabled));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let map = OutputMap::from_json(
            r#"{
                "query A {\n  a\n}\n": { "id": 2, "transformedQuery": "query A { a }" },
                "query B {\n  b\n}\n": { "id": "2", "transformedQuery": "query B { b }" }
            }"#,
        )
        .unwrap();

        let error = StaticQueryStore::from_output_map(&map).unwrap_err();

        assert!(matches!(error, Error::DuplicateId { id: QueryId::String(ref id) } if id == "2"));
    }
}
