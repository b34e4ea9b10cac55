//! The browser DOM as a trellis display tree.
//!
//! Display nodes are plain `web_sys::Node`s. Whatever trellis needs to remember about a node (its listeners and the
//! event root of a mapped subtree) lives on the Rust side, in a map keyed by a numeric id stored on the node itself.

use crate::{Config, WebError};
use js_sys::Reflect;
use rustc_hash::FxHashMap;
use trellis_core::{Dom, EventRoot, Listener, Value};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{AddEventListenerOptions, CssStyleDeclaration, Document, Element, Event, Node};

/// The expando property holding a node's id.
const ID_KEY: &str = "__trellisId";

#[derive(Debug)]
struct Registered {
    listener: Listener,
    callback: Closure<dyn FnMut(Event)>,
}

#[derive(Debug)]
struct NodeData {
    node: Node,
    listeners: FxHashMap<String, Registered>,
    event_root: Option<EventRoot>,
}

/// A display tree backed by the browser's document.
#[derive(Debug)]
pub struct WebDom {
    document: Document,
    passive_listeners: bool,
    next_id: u32,
    data: FxHashMap<u32, NodeData>,
}

impl WebDom {
    /// Create a backend for the current window's document.
    pub fn new(config: &Config) -> Result<Self, WebError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(WebError::NoDocument)?;

        Ok(Self {
            document,
            passive_listeners: config.passive_listeners,
            next_id: 0,
            data: FxHashMap::default(),
        })
    }

    /// The document nodes are created in.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The number of nodes trellis keeps listeners or event roots for.
    pub fn tracked(&self) -> usize {
        self.data.len()
    }

    /// Forget every node that is no longer inside `root`, unregistering its listeners.
    ///
    /// Detached nodes are kept around after patching because keyed moves put them back. Call this between updates
    /// to release the closures of nodes that are gone for good. Returns how many nodes were forgotten.
    pub fn collect_garbage(&mut self, root: &Node) -> usize {
        let before = self.data.len();
        self.data.retain(|_, data| {
            if root.contains(Some(&data.node)) {
                return true;
            }
            for (event, registered) in &data.listeners {
                let _ = data.node.remove_event_listener_with_callback(
                    event,
                    registered.callback.as_ref().unchecked_ref(),
                );
            }
            false
        });

        let freed = before - self.data.len();
        tracing::debug!(freed, "released detached nodes");
        freed
    }

    fn id(&self, node: &Node) -> Option<u32> {
        let id = Reflect::get(node, &JsValue::from_str(ID_KEY)).ok()?.as_f64()?;
        Some(id as u32)
    }

    fn data(&self, node: &Node) -> Option<&NodeData> {
        self.data.get(&self.id(node)?)
    }

    fn data_mut(&mut self, node: &Node) -> Result<&mut NodeData, WebError> {
        let id = match self.id(node) {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                Reflect::set(node, &JsValue::from_str(ID_KEY), &JsValue::from(id))?;
                id
            }
        };

        Ok(self.data.entry(id).or_insert_with(|| NodeData {
            node: node.clone(),
            listeners: FxHashMap::default(),
            event_root: None,
        }))
    }
}

fn element(node: &Node) -> Result<&Element, WebError> {
    node.dyn_ref::<Element>()
        .ok_or_else(|| WebError::NotAnElement(node.node_name()))
}

fn to_js(value: &Value) -> JsValue {
    match value {
        Value::Text(text) => JsValue::from_str(text),
        Value::Bool(b) => JsValue::from_bool(*b),
        Value::Int(i) => JsValue::from_f64(*i as f64),
        Value::Float(f) => JsValue::from_f64(*f),
        Value::Null => JsValue::NULL,
    }
}

fn from_js(value: &JsValue) -> Option<Value> {
    if let Some(text) = value.as_string() {
        return Some(Value::from(text));
    }
    if let Some(b) = value.as_bool() {
        return Some(Value::Bool(b));
    }
    if let Some(f) = value.as_f64() {
        // numbers read back from the browser are integers whenever they can be
        if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            return Some(Value::Int(f as i64));
        }
        return Some(Value::Float(f));
    }
    value.is_null().then_some(Value::Null)
}

impl Dom for WebDom {
    type Node = Node;
    type Error = WebError;

    fn create_element(&mut self, tag: &str, namespace: Option<&str>) -> Result<Node, WebError> {
        let element = match namespace {
            Some(namespace) => self.document.create_element_ns(Some(namespace), tag)?,
            None => self.document.create_element(tag)?,
        };
        Ok(element.into())
    }

    fn create_text_node(&mut self, text: &str) -> Result<Node, WebError> {
        Ok(self.document.create_text_node(text).into())
    }

    fn create_fragment(&mut self) -> Result<Node, WebError> {
        Ok(self.document.create_document_fragment().into())
    }

    fn set_text(&mut self, node: &Node, text: &str) -> Result<(), WebError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) -> Result<(), WebError> {
        Ok(element(node)?.set_attribute(name, value)?)
    }

    fn remove_attribute(&mut self, node: &Node, name: &str) -> Result<(), WebError> {
        Ok(element(node)?.remove_attribute(name)?)
    }

    fn set_attribute_ns(
        &mut self,
        node: &Node,
        namespace: &str,
        name: &str,
        value: &str,
    ) -> Result<(), WebError> {
        Ok(element(node)?.set_attribute_ns(Some(namespace), name, value)?)
    }

    fn remove_attribute_ns(
        &mut self,
        node: &Node,
        namespace: &str,
        name: &str,
    ) -> Result<(), WebError> {
        // removal goes by local name, without the prefix
        let local = name.rsplit(':').next().unwrap_or(name);
        Ok(element(node)?.remove_attribute_ns(Some(namespace), local)?)
    }

    fn set_style(&mut self, node: &Node, name: &str, value: &str) -> Result<(), WebError> {
        let style: CssStyleDeclaration = Reflect::get(node, &JsValue::from_str("style"))?
            .dyn_into()
            .map_err(|_| WebError::NotAnElement(node.node_name()))?;

        if value.is_empty() {
            style.remove_property(name)?;
        } else {
            style.set_property(name, value)?;
        }
        Ok(())
    }

    fn property(&self, node: &Node, name: &str) -> Option<Value> {
        from_js(&Reflect::get(node, &JsValue::from_str(name)).ok()?)
    }

    fn set_property(
        &mut self,
        node: &Node,
        name: &str,
        value: Option<&Value>,
    ) -> Result<(), WebError> {
        let value = value.map(to_js).unwrap_or(JsValue::NULL);
        Reflect::set(node, &JsValue::from_str(name), &value)?;
        Ok(())
    }

    fn event_listener(&self, node: &Node, event: &str) -> Option<Listener> {
        let registered = self.data(node)?.listeners.get(event)?;
        Some(registered.listener.clone())
    }

    fn add_event_listener(
        &mut self,
        node: &Node,
        event: &str,
        listener: Listener,
    ) -> Result<(), WebError> {
        let passive = self.passive_listeners && listener.is_passive();

        let callback = {
            let listener = listener.clone();
            Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                let outcome = listener.handle(&event);
                if outcome.stop_propagation {
                    event.stop_propagation();
                }
                if outcome.prevent_default {
                    event.prevent_default();
                }
            })
        };

        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        node.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;

        tracing::trace!(event, passive, "registered listener");

        let registered = Registered { listener, callback };
        if let Some(old) = self.data_mut(node)?.listeners.insert(event.to_string(), registered) {
            node.remove_event_listener_with_callback(event, old.callback.as_ref().unchecked_ref())?;
        }
        Ok(())
    }

    fn remove_event_listener(&mut self, node: &Node, event: &str) -> Result<(), WebError> {
        let Some(data) = self.id(node).and_then(|id| self.data.get_mut(&id)) else {
            return Ok(());
        };
        if let Some(old) = data.listeners.remove(event) {
            node.remove_event_listener_with_callback(event, old.callback.as_ref().unchecked_ref())?;
        }
        Ok(())
    }

    fn event_root(&self, node: &Node) -> Option<EventRoot> {
        self.data(node)?.event_root.clone()
    }

    fn set_event_root(&mut self, node: &Node, root: EventRoot) -> Result<(), WebError> {
        self.data_mut(node)?.event_root = Some(root);
        Ok(())
    }

    fn child(&self, parent: &Node, index: usize) -> Option<Node> {
        parent.child_nodes().get(u32::try_from(index).ok()?)
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> Result<(), WebError> {
        parent.append_child(child)?;
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: &Node,
        child: &Node,
        reference: Option<&Node>,
    ) -> Result<(), WebError> {
        parent.insert_before(child, reference)?;
        Ok(())
    }

    fn remove_child(&mut self, parent: &Node, child: &Node) -> Result<(), WebError> {
        parent.remove_child(child)?;
        Ok(())
    }

    fn replace_child(&mut self, parent: &Node, new: &Node, old: &Node) -> Result<(), WebError> {
        parent.replace_child(new, old)?;
        Ok(())
    }
}
