//! # Persisted Queries
//!
//! Instead of sending a full GraphQL document over the wire, a client can send a small
//! identifier that the server resolves back into the document it stands for. This crate
//! holds the logic both sides share:
//!
//! - Find every operation in a document together with the fragments it transitively uses
//! - Reduce a document to one operation and exactly its fragment closure
//! - Run the reduced document through an ordered pipeline of query transformers
//! - Sort fragment definitions by name and print, giving a key that does not depend on
//!   whitespace or on the order fragments were written in
//! - Assign monotonically increasing ids to those keys, and look them up again at request
//!   time from the client (key to id) or from the server (id to document)

#![deny(missing_docs)]
#![cfg_attr(test, allow(unused_crate_dependencies))]

pub mod ast;
pub mod client;
mod error;
pub mod extract;
mod fragments;
mod key;
mod output_map;
mod reduce;
pub mod server;
pub mod transform;


pub use error::{Error, Result};
pub use fragments::fragment_names;
pub use key::{
    apply_fragment_definition_sort, canonical_key, query_document_key, query_key, request_key,
    sort_fragments_by_name,
};
pub use output_map::{build_output_map, OutputMap, OutputMapBuilder, QueryId, QueryRecord};
pub use reduce::{document_from_operation, reduce_document_for_operation};
pub use transform::{apply_query_transformers, AddTypename, Pipeline, QueryTransformer};
