//! Client side of persisted queries: replace the query document of a request with its id.

use serde::{Deserialize, Serialize};

use crate::{ast, request_key, OutputMap, Pipeline, QueryId};

/// A regular GraphQL request carrying the full query document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    /// The query document text
    pub query: String,
    /// Variables, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    /// Operation name, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

/// A request carrying the id of a persisted query instead of its document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRequest {
    /// Id of the persisted query
    pub id: QueryId,
    /// Variables, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    /// Operation name, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

/// What the client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outgoing {
    /// Persisted queries are enabled: only the id is sent
    Persisted(PersistedRequest),
    /// Persisted queries are disabled: the request goes out as is
    Full(GraphqlRequest),
}

/// Maps outgoing requests to persisted query ids.
#[derive(Debug)]
pub struct PersistedQueryClient {
    map: OutputMap,
    pipeline: Pipeline,
    enabled: bool,
}

impl PersistedQueryClient {
    /// A client resolving ids from `map`, without transformers and with persisted queries
    /// enabled.
    pub fn new(map: OutputMap) -> Self {
        Self {
            map,
            pipeline: Pipeline::new(),
            enabled: true,
        }
    }

    /// Transformers applied to outgoing documents before their key is computed. Must produce
    /// the same documents the extraction did.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// When disabled, requests are sent with their full document.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The id of the persisted query matching `query`.
    pub fn query_id(&self, query: &str) -> crate::Result<&QueryId> {
        let document = ast::parse(query)?;
        let key = request_key(&document, &self.pipeline)?;

        Ok(&self.map.lookup(&key)?.id)
    }

    /// Replaces the document of the request with its id. Fails before anything is sent if the
    /// document holds more than one operation or if the query is not in the map.
    pub fn prepare(&self, request: GraphqlRequest) -> crate::Result<Outgoing> {
        if !self.enabled {
            return Ok(Outgoing::Full(request));
        }

        let id = self.query_id(&request.query)?.clone();

        Ok(Outgoing::Persisted(PersistedRequest {
            id,
            variables: request.variables,
            operation_name: request.operation_name,
        }))
    }
}
