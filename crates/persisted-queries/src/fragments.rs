use std::collections::{HashMap, HashSet};

use crate::{
    ast::{self, Document, FragmentDefinition, Selection, SelectionSet},
    Error,
};

/// Names of every fragment reachable from `selection_set`, following spreads through the
/// fragment definitions of `document`.
///
/// A spread contributes its own name and the names reachable from its definition. Fields and
/// inline fragments contribute only what their nested selection sets reach. Each fragment is
/// visited once, so cyclic spreads terminate.
pub fn fragment_names<'a>(selection_set: &'a SelectionSet, document: &'a Document) -> crate::Result<HashSet<&'a str>> {
    let mut fragments = HashMap::new();

    for fragment in ast::fragment_definitions(document) {
        fragments.entry(fragment.name.as_str()).or_insert(fragment);
    }

    let mut names = HashSet::new();
    collect(selection_set, &fragments, &mut names)?;

    Ok(names)
}

fn collect<'a>(
    selection_set: &'a SelectionSet,
    fragments: &HashMap<&'a str, &'a FragmentDefinition>,
    names: &mut HashSet<&'a str>,
) -> crate::Result<()> {
    for selection in &selection_set.items {
        match selection {
            Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name.as_str();

                let Some(&fragment) = fragments.get(name) else {
                    return Err(Error::MissingFragment { name: name.to_string() });
                };

                if names.insert(name) {
                    collect(&fragment.selection_set, fragments, names)?;
                }
            }
            Selection::Field(field) => collect(&field.selection_set, fragments, names)?,
            Selection::InlineFragment(fragment) => collect(&fragment.selection_set, fragments, names)?,
        }
    }

    Ok(())
}
