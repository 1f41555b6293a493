//! Surface-independent markup tree.
//!
//! Renderers build data-only elements (tag, class, attributes, children).
//! Text is stored raw and escaped at the edge: `to_html()` escapes every
//! text node and attribute value, the terminal surface never interprets it.
//! No event handlers live in the markup; elements carry `data-*`
//! identifiers and the surface attaches behavior by id.

use std::fmt::Write as _;

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with a tag, optional class and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub class: Option<&'static str>,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            class: None,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `<div class="...">`
    pub fn div(class: &'static str) -> Self {
        Self::new("div").with_class(class)
    }

    /// `<span class="...">text</span>`
    pub fn span(class: &'static str, text: impl Into<String>) -> Self {
        Self::new("span").with_class(class).with_text(text)
    }

    pub fn with_class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| *k == name)
    }

    /// Set or replace an attribute.
    pub fn set_attr(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| *k != name);
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Concatenated text of this element's subtree.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First direct child element with the given class.
    pub fn child_with_class(&self, class: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.class == Some(class))
    }

    /// Depth-first search by `id` attribute.
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.attr("id") == Some(id) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Element(e) = child {
                if let Some(found) = e.find_by_id_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.attr("id") == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|e| e.find_by_id(id))
    }

    /// Count elements with the given class in this subtree (including self).
    pub fn count_class(&self, class: &str) -> usize {
        let own = usize::from(self.class == Some(class));
        own + self
            .child_elements()
            .map(|e| e.count_class(class))
            .sum::<usize>()
    }

    /// Serialize as HTML. All text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_html(self, &mut out);
        out
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

fn write_html(el: &Element, out: &mut String) {
    let _ = write!(out, "<{}", el.tag);
    if let Some(class) = el.class {
        let _ = write!(out, " class=\"{}\"", escape_html(class));
    }
    for (name, value) in &el.attrs {
        let _ = write!(out, " {name}=\"{}\"", escape_html(value));
    }
    out.push('>');
    for child in &el.children {
        match child {
            Node::Text(t) => out.push_str(&escape_html(t)),
            Node::Element(e) => write_html(e, out),
        }
    }
    let _ = write!(out, "</{}>", el.tag);
}

/// Escape text for insertion into HTML text or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
