use std::collections::HashSet;

use crate::{
    ast::{self, Definition, Document, OperationDefinition},
    fragment_names, sort_fragments_by_name,
};

/// Wraps a single operation into a document of its own.
pub fn document_from_operation(operation: &OperationDefinition) -> Document {
    Document {
        definitions: vec![Definition::Operation(operation.clone())],
    }
}

/// Builds a self-contained document holding `operation` first, followed by the fragment
/// definitions of `document` it transitively depends on, sorted by name. Fragments defined
/// more than once keep their first definition only.
pub fn reduce_document_for_operation(document: &Document, operation: &OperationDefinition) -> crate::Result<Document> {
    let names = fragment_names(ast::operation_selection_set(operation), document)?;
    let mut seen = HashSet::with_capacity(names.len());

    let mut fragments: Vec<Definition> = ast::fragment_definitions(document)
        .filter(|fragment| names.contains(fragment.name.as_str()) && seen.insert(fragment.name.as_str()))
        .cloned()
        .map(Definition::Fragment)
        .collect();

    fragments.sort_by(sort_fragments_by_name);

    let mut reduced = document_from_operation(operation);
    reduced.definitions.extend(fragments);

    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use indoc::indoc;

    use super::*;
    use crate::ast::{operation_definitions, parse};

    fn reduce_nth(source: &str, index: usize) -> Document {
        let document = parse(source).unwrap();
        let operation = operation_definitions(&document).nth(index).unwrap();

        reduce_document_for_operation(&document, operation).unwrap()
    }

    #[test]
    fn unused_fragments_are_dropped() {
        let reduced = reduce_nth("query { author { name } } fragment unused on Author { id }", 0);

        assert_eq!(reduced.definitions.len(), 1);
        assert!(ast::is_operation_definition(&reduced.definitions[0]));
    }

    #[test]
    fn operation_first_then_sorted_fragments() {
        let reduced = reduce_nth(
            indoc! {r"
                fragment zeta on Author { id }
                fragment alpha on Author { name }
                query ListAuthors { author { ...zeta ...alpha } }
                fragment unrelated on Post { title }
            "},
            0,
        );

        let expected = expect![[r#"
            query ListAuthors {
              author {
                ...zeta
                ...alpha
              }
            }

            fragment alpha on Author {
              name
            }

            fragment zeta on Author {
              id
            }
        "#]];

        expected.assert_eq(&reduced.to_string());
    }

    #[test]
    fn duplicate_fragment_names_keep_the_first() {
        let reduced = reduce_nth(
            indoc! {r"
                query { author { ...details } }
                fragment details on Author { firstName }
                fragment details on Author { lastName }
            "},
            0,
        );

        let expected = expect![[r#"
            query {
              author {
                ...details
              }
            }

            fragment details on Author {
              firstName
            }
        "#]];

        expected.assert_eq(&reduced.to_string());
    }

    #[test]
    fn shared_fragment_appears_once_per_operation() {
        let source = indoc! {r"
            query Authors { author { ...shared ...shared } }
            query Editors { editor { ...shared } }
            fragment shared on Person { name }
        "};

        for index in 0..2 {
            let reduced = reduce_nth(source, index);
            let fragments = ast::fragment_definitions(&reduced).count();

            assert_eq!(fragments, 1);
        }
    }

    #[test]
    fn missing_fragment_propagates() {
        let document = parse("query { author { ...missing } }").unwrap();
        let operation = operation_definitions(&document).next().unwrap();

        assert!(matches!(
            reduce_document_for_operation(&document, operation),
            Err(crate::Error::MissingFragment { .. })
        ));
    }
}
