use crate::{ElementData, MemoryDom, NodeId, NodeKind};
use askama_escape::{escape, Html};
use std::fmt::Write;
use trellis_core::Value;

impl MemoryDom {
    /// Serialize a node and everything below it to HTML.
    ///
    /// Attributes, styles and properties are written in name order, so two trees with the same content always
    /// serialize the same way no matter the order their facts were set in. Listeners are not serialized.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut buf = String::new();
        // writing to a String never fails
        let _ = self.render_to(&mut buf, id);
        buf
    }

    /// Serialize a node and everything below it into `buf`.
    pub fn render_to(&self, buf: &mut impl Write, id: NodeId) -> std::fmt::Result {
        let Some(node) = self.get(id) else {
            return Ok(());
        };

        match &node.kind {
            NodeKind::Text(text) => write!(buf, "{}", escape(text, Html))?,
            NodeKind::Fragment => {
                for child in node.children() {
                    self.render_to(buf, *child)?;
                }
            }
            NodeKind::Element(el) => {
                write!(buf, "<{}", el.tag)?;
                write_facts(buf, el)?;
                write!(buf, ">")?;
                for child in node.children() {
                    self.render_to(buf, *child)?;
                }
                write!(buf, "</{}>", el.tag)?;
            }
        }

        Ok(())
    }
}

fn write_facts(buf: &mut impl Write, el: &ElementData) -> std::fmt::Result {
    for (name, value) in &el.attributes {
        write!(buf, " {name}=\"{}\"", escape(value, Html))?;
    }

    for (name, (namespace, value)) in &el.attributes_ns {
        write!(
            buf,
            " {name}=\"{}\" data-ns-{name}=\"{}\"",
            escape(value, Html),
            escape(namespace, Html)
        )?;
    }

    if !el.styles.is_empty() {
        write!(buf, " style=\"")?;
        for (i, (name, value)) in el.styles.iter().enumerate() {
            if i > 0 {
                write!(buf, " ")?;
            }
            write!(buf, "{name}: {};", escape(value, Html))?;
        }
        write!(buf, "\"")?;
    }

    // properties are shown with a leading dot so they cannot be confused with attributes
    for (name, value) in &el.properties {
        match value {
            Value::Bool(true) => write!(buf, " .{name}")?,
            Value::Bool(false) | Value::Null => {}
            Value::Text(text) => write!(buf, " .{name}=\"{}\"", escape(text, Html))?,
            other => write!(buf, " .{name}=\"{other}\"")?,
        }
    }

    Ok(())
}
