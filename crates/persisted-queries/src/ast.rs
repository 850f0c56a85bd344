//! Owned GraphQL executable document types and the predicates used to classify their nodes.
//!
//! All documents handled by this crate are `graphql-parser` documents with `'static`
//! lifetime and `String` text, so they can be stored in maps and moved between threads.

/// A parsed executable document.
pub type Document = graphql_parser::query::Document<'static, String>;
/// A top-level definition: an operation or a fragment.
pub type Definition = graphql_parser::query::Definition<'static, String>;
/// A query, mutation, subscription or anonymous selection set.
pub type OperationDefinition = graphql_parser::query::OperationDefinition<'static, String>;
/// A named fragment definition.
pub type FragmentDefinition = graphql_parser::query::FragmentDefinition<'static, String>;
/// A braced list of selections.
pub type SelectionSet = graphql_parser::query::SelectionSet<'static, String>;
/// A field, fragment spread or inline fragment.
pub type Selection = graphql_parser::query::Selection<'static, String>;
/// A field selection.
pub type Field = graphql_parser::query::Field<'static, String>;
/// A `...Name` reference to a fragment definition.
pub type FragmentSpread = graphql_parser::query::FragmentSpread<'static, String>;
/// A `... on Type { }` selection.
pub type InlineFragment = graphql_parser::query::InlineFragment<'static, String>;

/// Parses an executable document into its owned form.
pub fn parse(source: &str) -> crate::Result<Document> {
    Ok(graphql_parser::parse_query::<String>(source)?.into_static())
}

/// True for queries, mutations, subscriptions and anonymous operations.
pub fn is_operation_definition(definition: &Definition) -> bool {
    matches!(definition, Definition::Operation(_))
}

/// True for `query` operations, including the anonymous `{ ... }` shorthand.
pub fn is_query_definition(definition: &Definition) -> bool {
    matches!(
        definition,
        Definition::Operation(OperationDefinition::Query(_) | OperationDefinition::SelectionSet(_))
    )
}

/// True for named fragment definitions.
pub fn is_fragment_definition(definition: &Definition) -> bool {
    matches!(definition, Definition::Fragment(_))
}

/// True for `...Name` selections.
pub fn is_fragment_spread(selection: &Selection) -> bool {
    matches!(selection, Selection::FragmentSpread(_))
}

/// True for field selections.
pub fn is_field(selection: &Selection) -> bool {
    matches!(selection, Selection::Field(_))
}

/// True for `... on Type` selections.
pub fn is_inline_fragment(selection: &Selection) -> bool {
    matches!(selection, Selection::InlineFragment(_))
}

/// The root selection set of an operation, whatever its kind.
pub fn operation_selection_set(operation: &OperationDefinition) -> &SelectionSet {
    match operation {
        OperationDefinition::SelectionSet(selection_set) => selection_set,
        OperationDefinition::Query(query) => &query.selection_set,
        OperationDefinition::Mutation(mutation) => &mutation.selection_set,
        OperationDefinition::Subscription(subscription) => &subscription.selection_set,
    }
}

pub(crate) fn operation_selection_set_mut(operation: &mut OperationDefinition) -> &mut SelectionSet {
    match operation {
        OperationDefinition::SelectionSet(selection_set) => selection_set,
        OperationDefinition::Query(query) => &mut query.selection_set,
        OperationDefinition::Mutation(mutation) => &mut mutation.selection_set,
        OperationDefinition::Subscription(subscription) => &mut subscription.selection_set,
    }
}

/// All operations of the document, in document order.
pub fn operation_definitions(document: &Document) -> impl Iterator<Item = &OperationDefinition> {
    document.definitions.iter().filter_map(|definition| match definition {
        Definition::Operation(operation) => Some(operation),
        Definition::Fragment(_) => None,
    })
}

/// All query operations of the document, in document order.
pub fn query_definitions(document: &Document) -> impl Iterator<Item = &OperationDefinition> {
    document
        .definitions
        .iter()
        .filter(|definition| is_query_definition(definition))
        .filter_map(|definition| match definition {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        })
}

/// All fragment definitions of the document, in document order.
pub fn fragment_definitions(document: &Document) -> impl Iterator<Item = &FragmentDefinition> {
    document.definitions.iter().filter_map(|definition| match definition {
        Definition::Fragment(fragment) => Some(fragment),
        Definition::Operation(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions(source: &str) -> Vec<Definition> {
        parse(source).unwrap().definitions
    }

    #[test]
    fn classifies_definitions() {
        let definitions = definitions(
            "query A { a } mutation B { b } subscription C { c } { d } fragment F on T { e }",
        );

        let operations: Vec<bool> = definitions.iter().map(is_operation_definition).collect();
        let queries: Vec<bool> = definitions.iter().map(is_query_definition).collect();
        let fragments: Vec<bool> = definitions.iter().map(is_fragment_definition).collect();

        assert_eq!(operations, [true, true, true, true, false]);
        assert_eq!(queries, [true, false, false, true, false]);
        assert_eq!(fragments, [false, false, false, false, true]);
    }

    #[test]
    fn classifies_selections() {
        let document = parse("{ field ...Spread ... on T { inline } }").unwrap();
        let operation = operation_definitions(&document).next().unwrap();
        let items = &operation_selection_set(operation).items;

        assert!(is_field(&items[0]));
        assert!(is_fragment_spread(&items[1]));
        assert!(is_inline_fragment(&items[2]));
        assert!(!is_field(&items[1]) && !is_field(&items[2]));
        assert!(!is_fragment_spread(&items[0]) && !is_inline_fragment(&items[0]));
    }

    #[test]
    fn finds_operations_and_fragments_in_order() {
        let document = parse("fragment F on T { a } query A { ...F } mutation B { b } fragment G on T { b }").unwrap();

        assert_eq!(operation_definitions(&document).count(), 2);
        assert_eq!(query_definitions(&document).count(), 1);

        let names: Vec<&str> = fragment_definitions(&document).map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["F", "G"]);
    }
}
