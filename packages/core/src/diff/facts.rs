use crate::{
    facts::{Facts, Str, Value},
    patch::FactsDiff,
};
use indexmap::IndexMap;
use std::borrow::Cow;

/// Clearing a text property writes the empty string instead of removing it.
static EMPTY_TEXT: Value = Value::Text(Cow::Borrowed(""));

/// Facts whose live value can drift away from the last rendered one through user input.
fn is_volatile(name: &str) -> bool {
    matches!(name, "value" | "checked")
}

/// Compare the facts of two nodes, returning `None` when nothing changed.
pub(crate) fn diff_facts<'a>(x: &'a Facts, y: &'a Facts) -> Option<FactsDiff<'a>> {
    let mut diff = FactsDiff::default();

    diff_category(
        &x.events,
        &y.events,
        &mut diff.events,
        |name, handler| (name, Some(handler)),
        |name, _| (name, None),
    );
    diff_category(
        &x.styles,
        &y.styles,
        &mut diff.styles,
        |name, value| (name, value.as_ref()),
        |name, _| (name, ""),
    );
    diff_category(
        &x.properties,
        &y.properties,
        &mut diff.properties,
        |name, value| (name, Some(value)),
        |name, old| match old {
            Value::Text(_) => (name, Some(&EMPTY_TEXT)),
            _ => (name, None),
        },
    );
    diff_category(
        &x.attributes,
        &y.attributes,
        &mut diff.attributes,
        |name, value| (name, Some(value.as_ref())),
        |name, _| (name, None),
    );
    diff_category(
        &x.attributes_ns,
        &y.attributes_ns,
        &mut diff.attributes_ns,
        |name, (namespace, value)| (name, namespace.as_ref(), Some(value.as_ref())),
        |name, (namespace, _)| (name, namespace.as_ref(), None),
    );

    (!diff.is_empty()).then_some(diff)
}

/// Walk the old keys in order (clearing removed ones, updating changed ones), then add the keys only found in `y`.
fn diff_category<'a, V: PartialEq, O>(
    x: &'a IndexMap<Str, V>,
    y: &'a IndexMap<Str, V>,
    out: &mut Vec<O>,
    set: impl Fn(&'a str, &'a V) -> O,
    clear: impl Fn(&'a str, &'a V) -> O,
) {
    for (name, old) in x {
        match y.get(name) {
            None => out.push(clear(name, old)),
            Some(new) if new != old || is_volatile(name) => out.push(set(name, new)),
            Some(_) => {}
        }
    }

    for (name, new) in y {
        if !x.contains_key(name) {
            out.push(set(name, new));
        }
    }
}

impl<'a> FactsDiff<'a> {
    /// Every fact of a node, as if it was compared against an empty node.
    pub fn full(facts: &'a Facts) -> Self {
        Self {
            events: facts.events.iter().map(|(k, v)| (k.as_ref(), Some(v))).collect(),
            styles: facts.styles.iter().map(|(k, v)| (k.as_ref(), v.as_ref())).collect(),
            properties: facts.properties.iter().map(|(k, v)| (k.as_ref(), Some(v))).collect(),
            attributes: facts
                .attributes
                .iter()
                .map(|(k, v)| (k.as_ref(), Some(v.as_ref())))
                .collect(),
            attributes_ns: facts
                .attributes_ns
                .iter()
                .map(|(k, (ns, v))| (k.as_ref(), ns.as_ref(), Some(v.as_ref())))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::Handler,
        facts::{organize_facts, Directive},
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn unchanged_facts_produce_nothing() {
        let facts = organize_facts([
            Directive::attribute("id", "a"),
            Directive::style("color", "red"),
        ]);
        assert!(diff_facts(&facts, &facts.clone()).is_none());
    }

    #[test]
    fn removed_facts_are_cleared() {
        let x = organize_facts([
            Directive::attribute("id", "a"),
            Directive::style("color", "red"),
            Directive::property("title", "hello"),
            Directive::property("tabIndex", 1i64),
            Directive::attribute_ns("http://www.w3.org/1999/xlink", "href", "#a"),
        ]);
        let y = Facts::default();

        let diff = diff_facts(&x, &y).unwrap();
        assert_eq!(diff.attributes, [("id", None)]);
        assert_eq!(diff.styles, [("color", "")]);
        assert_eq!(
            diff.properties,
            [("title", Some(&Value::from(""))), ("tabIndex", None)]
        );
        assert_eq!(
            diff.attributes_ns,
            [("href", "http://www.w3.org/1999/xlink", None)]
        );
    }

    #[test]
    fn changed_and_added_facts_are_set() {
        let x = organize_facts([
            Directive::attribute("id", "a"),
            Directive::attribute("title", "t"),
        ]);
        let y = organize_facts([
            Directive::attribute("lang", "en"),
            Directive::attribute("title", "t"),
            Directive::attribute("id", "b"),
        ]);

        let diff = diff_facts(&x, &y).unwrap();
        assert_eq!(diff.attributes, [("id", Some("b")), ("lang", Some("en"))]);
    }

    #[test]
    fn value_and_checked_are_always_written() {
        let x = organize_facts([
            Directive::property("value", "typed"),
            Directive::property("checked", true),
            Directive::property("title", "same"),
        ]);
        let y = x.clone();
        let diff = diff_facts(&x, &y).unwrap();
        assert_eq!(
            diff.properties,
            [("value", Some(&Value::from("typed"))), ("checked", Some(&Value::Bool(true)))]
        );
    }

    #[test]
    fn handlers_compare_by_identity() {
        let handler = Handler::always(1);
        let x = organize_facts([Directive::on("click", handler.clone())]);
        let same = organize_facts([Directive::on("click", handler)]);
        assert!(diff_facts(&x, &same).is_none());

        let fresh = organize_facts([Directive::on("click", Handler::always(1))]);
        let diff = diff_facts(&x, &fresh).unwrap();
        assert_eq!(diff.events.len(), 1);
        assert_eq!(diff.events[0].0, "click");
    }
}
