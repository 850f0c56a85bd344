use std::cmp::Ordering;

use crate::{
    apply_query_transformers,
    ast::{self, Definition, Document, OperationDefinition},
    document_from_operation, reduce_document_for_operation, Error, Pipeline,
};

/// Orders definitions so that operations keep their relative order and come first, and
/// fragments follow sorted by name.
pub fn sort_fragments_by_name(a: &Definition, b: &Definition) -> Ordering {
    match (a, b) {
        (Definition::Operation(_), Definition::Operation(_)) => Ordering::Equal,
        (Definition::Operation(_), Definition::Fragment(_)) => Ordering::Less,
        (Definition::Fragment(_), Definition::Operation(_)) => Ordering::Greater,
        (Definition::Fragment(a), Definition::Fragment(b)) => a.name.cmp(&b.name),
    }
}

/// Stable sort of the document definitions with [`sort_fragments_by_name`].
pub fn apply_fragment_definition_sort(mut document: Document) -> Document {
    document.definitions.sort_by(sort_fragments_by_name);
    document
}

/// Sorts and prints a document that has already been through the transformer pipeline.
pub fn canonical_key(document: &Document) -> String {
    apply_fragment_definition_sort(document.clone()).to_string()
}

/// The key of a document holding one operation and the fragments it uses: the pipeline is
/// applied, fragments are sorted by name and the result is printed.
pub fn query_document_key(document: &Document, pipeline: &Pipeline) -> crate::Result<String> {
    let transformed = apply_query_transformers(document, pipeline)?;
    Ok(apply_fragment_definition_sort(transformed).to_string())
}

/// The key of a lone operation, without any fragment definitions.
pub fn query_key(operation: &OperationDefinition, pipeline: &Pipeline) -> crate::Result<String> {
    let mut transformed = apply_query_transformers(&document_from_operation(operation), pipeline)?;
    transformed.definitions.truncate(1);

    Ok(transformed.to_string())
}

/// The key of a document sent with a request. The document must contain exactly one
/// operation; fragments it does not use are ignored.
pub fn request_key(document: &Document, pipeline: &Pipeline) -> crate::Result<String> {
    let mut operations = ast::operation_definitions(document);

    let operation = match (operations.next(), operations.count()) {
        (Some(operation), 0) => operation,
        (Some(_), rest) => return Err(Error::MultipleOperations { count: rest + 1 }),
        (None, _) => return Err(Error::MissingOperation),
    };

    let reduced = reduce_document_for_operation(document, operation)?;
    query_document_key(&reduced, pipeline)
}
