//! Cross-file merge: combine namespace fragments by name.
//!
//! MrDocs may spread one namespace over several files. Fragments are folded
//! into the model in the order they were parsed, so classes and functions
//! keep their discovery order.

use crate::model::{Model, Namespace};
use std::collections::btree_map::Entry;

/// Fold `fragments` into `model`.
///
/// Classes and functions are appended. An existing brief or description is
/// kept; a later fragment only fills them in when they are still empty.
pub fn merge_into(model: &mut Model, fragments: impl IntoIterator<Item = Namespace>) {
    for fragment in fragments {
        match model.entry(fragment.name.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(fragment);
            }
            Entry::Occupied(mut entry) => {
                let namespace = entry.get_mut();
                if namespace.brief.is_empty() {
                    namespace.brief = fragment.brief;
                }
                if namespace.description.is_empty() {
                    namespace.description = fragment.description;
                }
                namespace.classes.extend(fragment.classes);
                namespace.functions.extend(fragment.functions);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Class, Function};

    fn fragment(name: &str, class: Option<&str>, function: Option<&str>) -> Namespace {
        let mut ns = Namespace::new(name);
        if let Some(c) = class {
            ns.classes.push(Class { name: c.into(), ..Default::default() });
        }
        if let Some(f) = function {
            ns.functions.push(Function { name: f.into(), ..Default::default() });
        }
        ns
    }

    #[test]
    fn appends_in_order() {
        let mut model = Model::new();
        merge_into(&mut model, [fragment("allure", Some("A"), Some("f"))]);
        merge_into(
            &mut model,
            [fragment("allure", Some("B"), None), fragment("other", None, Some("g"))],
        );

        let allure = &model["allure"];
        let classes: Vec<_> = allure.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(classes, ["A", "B"]);
        assert_eq!(allure.functions.len(), 1);
        assert_eq!(model["other"].functions[0].name, "g");
    }

    #[test]
    fn first_documentation_wins() {
        let mut first = Namespace::new("allure");
        first.brief = "First brief".into();
        let mut second = Namespace::new("allure");
        second.brief = "Second brief".into();
        second.description = "Only description".into();

        let mut model = Model::new();
        merge_into(&mut model, [first, second]);

        assert_eq!(model["allure"].brief, "First brief");
        assert_eq!(model["allure"].description, "Only description");
    }
}
