//! Facts: everything about an element that is not its tag or its children.
//!
//! Views describe facts as a flat, ordered list of [`Directive`]s. Before a node is stored the list is organized
//! into [`Facts`], a record with one map per category, so that diffing can compare category by category.

use crate::{events::Handler, sanitize};
use indexmap::IndexMap;
use std::{borrow::Cow, fmt::Formatter};

/// A string that is usually known at compile time.
pub type Str = Cow<'static, str>;

/// The value of a property on a display node.
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(untagged))]
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Value {
    Text(Str),
    Bool(bool),
    Int(i64),
    Float(f64),
    Null,
}

impl Value {
    /// The text of this value, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The boolean of this value, if it is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(a) => write!(f, "{}", a),
            Value::Bool(a) => write!(f, "{}", a),
            Value::Int(a) => write!(f, "{}", a),
            Value::Float(a) => write!(f, "{}", a),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Text(Cow::Borrowed(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Cow::Owned(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// One fact about an element, as written in a view.
///
/// Prefer the constructor functions ([`Directive::attribute`], [`Directive::style`], ...) over building the
/// variants directly: they sanitize names and values that could smuggle script into the display tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// An event listener, such as `click`.
    Event {
        /// The event name, without an `on` prefix
        name: Str,
        /// Turns the event payload into a message
        handler: Handler,
    },
    /// A single style property, such as `color: red`.
    Style {
        /// The CSS property name
        name: Str,
        /// The CSS value, the empty string clears the property
        value: Str,
    },
    /// A property of the display node, such as `value` or `className`.
    Property {
        /// The property name as the display node spells it
        name: Str,
        /// The value to assign
        value: Value,
    },
    /// An attribute, such as `id="my-thing"`.
    Attribute {
        /// The attribute name
        name: Str,
        /// The attribute value
        value: Str,
    },
    /// A namespaced attribute, such as `xlink:href`.
    AttributeNs {
        /// The namespace URI
        namespace: Str,
        /// The qualified attribute name
        name: Str,
        /// The attribute value
        value: Str,
    },
}

impl Directive {
    /// Listen for an event.
    pub fn on(name: impl Into<Str>, handler: Handler) -> Self {
        Directive::Event {
            name: name.into(),
            handler,
        }
    }

    /// Set a style property.
    pub fn style(name: impl Into<Str>, value: impl Into<Str>) -> Self {
        Directive::Style {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Set a property on the display node.
    pub fn property(name: impl Into<Str>, value: impl Into<Value>) -> Self {
        Directive::Property {
            name: sanitize::property_name(name.into()),
            value: value.into(),
        }
    }

    /// Set an attribute.
    pub fn attribute(name: impl Into<Str>, value: impl Into<Str>) -> Self {
        Directive::Attribute {
            name: sanitize::attribute_name(name.into()),
            value: sanitize::attribute_value(value.into()),
        }
    }

    /// Set a namespaced attribute.
    pub fn attribute_ns(
        namespace: impl Into<Str>,
        name: impl Into<Str>,
        value: impl Into<Str>,
    ) -> Self {
        Directive::AttributeNs {
            namespace: namespace.into(),
            name: sanitize::attribute_name(name.into()),
            value: sanitize::attribute_value(value.into()),
        }
    }

    /// Add a class through the `className` property. Repeated classes accumulate.
    pub fn class(value: impl Into<Str>) -> Self {
        Directive::Property {
            name: Cow::Borrowed(CLASS_NAME),
            value: Value::Text(value.into()),
        }
    }
}

const CLASS_NAME: &str = "className";
const CLASS: &str = "class";

/// The organized facts of one element.
///
/// Every map keeps the order in which its keys were first declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Facts {
    /// Event listeners by event name.
    pub events: IndexMap<Str, Handler>,
    /// Style properties by property name.
    pub styles: IndexMap<Str, Str>,
    /// Display-node properties by property name.
    pub properties: IndexMap<Str, Value>,
    /// Attributes by name.
    pub attributes: IndexMap<Str, Str>,
    /// Namespaced attributes by name, with their namespace.
    pub attributes_ns: IndexMap<Str, (Str, Str)>,
}

impl Facts {
    /// Check if no category holds anything.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
            && self.styles.is_empty()
            && self.properties.is_empty()
            && self.attributes.is_empty()
            && self.attributes_ns.is_empty()
    }
}

/// Group a list of directives into [`Facts`].
///
/// `class` attributes and `className` properties are joined with spaces in declaration order instead of
/// overwriting each other. Any other key declared twice in the same category keeps its last value.
pub fn organize_facts(directives: impl IntoIterator<Item = Directive>) -> Facts {
    let mut facts = Facts::default();

    for directive in directives {
        match directive {
            Directive::Event { name, handler } => {
                facts.events.insert(name, handler);
            }
            Directive::Style { name, value } => {
                facts.styles.insert(name, value);
            }
            Directive::Property { name, value } => {
                if name == CLASS_NAME {
                    if let Value::Text(class) = &value {
                        if let Some(Value::Text(existing)) = facts.properties.get_mut(&name) {
                            add_class(existing, class);
                            continue;
                        }
                    }
                }
                facts.properties.insert(name, value);
            }
            Directive::Attribute { name, value } => {
                if name == CLASS {
                    if let Some(existing) = facts.attributes.get_mut(&name) {
                        add_class(existing, &value);
                        continue;
                    }
                }
                facts.attributes.insert(name, value);
            }
            Directive::AttributeNs {
                namespace,
                name,
                value,
            } => {
                facts.attributes_ns.insert(name, (namespace, value));
            }
        }
    }

    facts
}

fn add_class(existing: &mut Str, class: &str) {
    let joined = existing.to_mut();
    joined.push(' ');
    joined.push_str(class);
}
