//! Query transformers rewrite a document before its key is computed.
//!
//! A transformer borrows its input and returns a new document, so the same input can be keyed
//! again, or fed to other transformers, afterwards.

use graphql_parser::Pos;

use crate::ast::{self, Definition, Document, Field, Selection, SelectionSet};

const TYPENAME_FIELD: &str = "__typename";

/// A pure document to document rewrite.
pub trait QueryTransformer: Send + Sync {
    /// Name used when reporting failures.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Returns the rewritten document. An error aborts key computation for the document.
    fn transform(&self, document: &Document) -> crate::Result<Document>;
}

impl<F> QueryTransformer for F
where
    F: Fn(&Document) -> crate::Result<Document> + Send + Sync,
{
    fn transform(&self, document: &Document) -> crate::Result<Document> {
        self(document)
    }
}

/// An ordered list of transformers, applied first to last.
#[derive(Default)]
pub struct Pipeline {
    transformers: Vec<Box<dyn QueryTransformer>>,
}

impl Pipeline {
    /// A pipeline without transformers. Documents pass through unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a transformer to the end of the pipeline.
    pub fn with(mut self, transformer: impl QueryTransformer + 'static) -> Self {
        self.push(transformer);
        self
    }

    /// Adds a transformer to the end of the pipeline.
    pub fn push(&mut self, transformer: impl QueryTransformer + 'static) {
        self.transformers.push(Box::new(transformer));
    }

    /// Number of registered transformers.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// True if no transformer is registered.
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.transformers.iter().map(|transformer| transformer.name()))
            .finish()
    }
}

/// Folds the document through every transformer of the pipeline, left to right.
pub fn apply_query_transformers(document: &Document, pipeline: &Pipeline) -> crate::Result<Document> {
    let mut current = document.clone();

    for transformer in &pipeline.transformers {
        current = transformer.transform(&current)?;
    }

    Ok(current)
}

/// Adds a `__typename` field to every nested selection set that does not select it already.
/// The root selection sets of operations and fragments are left alone. Spreads are not
/// followed: their fragment definitions are rewritten at their own root.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddTypename;

impl QueryTransformer for AddTypename {
    fn name(&self) -> &str {
        "add_typename"
    }

    fn transform(&self, document: &Document) -> crate::Result<Document> {
        let mut document = document.clone();

        for definition in &mut document.definitions {
            let selection_set = match definition {
                Definition::Operation(operation) => ast::operation_selection_set_mut(operation),
                Definition::Fragment(fragment) => &mut fragment.selection_set,
            };

            add_typename(selection_set, true);
        }

        Ok(document)
    }
}

fn add_typename(selection_set: &mut SelectionSet, is_root: bool) {
    // leaf fields have an empty selection set
    if selection_set.items.is_empty() {
        return;
    }

    if !is_root && !selection_set.items.iter().any(is_typename) {
        let position = selection_set.span.1;
        selection_set.items.push(Selection::Field(typename_field(position)));
    }

    for selection in &mut selection_set.items {
        match selection {
            Selection::Field(field) => add_typename(&mut field.selection_set, false),
            Selection::InlineFragment(fragment) => add_typename(&mut fragment.selection_set, false),
            Selection::FragmentSpread(_) => (),
        }
    }
}

fn is_typename(selection: &Selection) -> bool {
    matches!(selection, Selection::Field(field) if field.name == TYPENAME_FIELD)
}

fn typename_field(position: Pos) -> Field {
    Field {
        position,
        alias: None,
        name: TYPENAME_FIELD.to_string(),
        arguments: Vec::new(),
        directives: Vec::new(),
        selection_set: SelectionSet {
            span: (position, position),
            items: Vec::new(),
        },
    }
}
