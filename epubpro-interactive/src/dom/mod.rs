//! Document model.
//!
//! Content documents are parsed into a `kuchikikiki` tree. Each node belongs
//! to exactly one parent; moving a node is a `detach` followed by an insert,
//! so the tree never aliases a node in two places. This module adds the
//! typed predicates the passes need on top of the raw tree: tag checks,
//! [`ClassList`] membership, attribute access and fragment (de)serialisation.
mod class_list;
mod serialize;

use std::sync::OnceLock;

pub use class_list::ClassList;
use kuchikikiki::{
  Attribute,
  ExpandedName,
  NodeRef,
  ParseOpts,
  traits::TendrilSink,
};
use markup5ever::{LocalName, QualName, ns};
use regex::Regex;

/// A parsed content document.
#[derive(Debug, Clone)]
pub struct Document {
  root: NodeRef,
}

impl Document {
  /// Parse a full XHTML/HTML document.
  ///
  /// Parsing never fails: malformed markup is repaired the way an HTML5
  /// parser repairs it.
  #[must_use]
  pub fn parse(markup: &str) -> Self {
    let markup = keep_leading_newlines(&expand_self_closing(markup));
    Self {
      root: parse_tree(&markup),
    }
  }

  #[must_use]
  pub fn head(&self) -> Option<NodeRef> {
    self.first_element("head")
  }

  #[must_use]
  pub fn body(&self) -> Option<NodeRef> {
    self.first_element("body")
  }

  /// First element named `tag` in document order.
  #[must_use]
  pub fn first_element(&self, tag: &str) -> Option<NodeRef> {
    self.root.descendants().find(|node| is_tag(node, &[tag]))
  }

  /// Snapshot of every element in document order.
  #[must_use]
  pub fn elements(&self) -> Vec<NodeRef> {
    self
      .root
      .descendants()
      .filter(|node| node.as_element().is_some())
      .collect()
  }

  /// Snapshot of every element named one of `tags`, in document order.
  #[must_use]
  pub fn elements_named(&self, tags: &[&str]) -> Vec<NodeRef> {
    self
      .root
      .descendants()
      .filter(|node| is_tag(node, tags))
      .collect()
  }

  /// Snapshot of every element carrying the class token `class`.
  #[must_use]
  pub fn elements_with_class(&self, class: &str) -> Vec<NodeRef> {
    self
      .root
      .descendants()
      .filter(|node| has_class(node, class))
      .collect()
  }

  /// Serialise the whole document as XHTML.
  #[must_use]
  pub fn to_xhtml(&self) -> String {
    let mut out = String::new();
    serialize::write_node(&self.root, &mut out);
    out
  }
}

/// Parse markup into a document node.
///
/// Scripting is off so that `noscript` children are parsed as markup rather
/// than kept as one opaque text node.
fn parse_tree(markup: &str) -> NodeRef {
  let mut options = ParseOpts::default();
  options.tree_builder.scripting_enabled = false;
  kuchikikiki::parse_html_with_options(options).one(markup)
}

/// HTML parsers drop one newline right after a `pre`, `listing` or
/// `textarea` start tag, while in XHTML it is content. Doubling it keeps the
/// original newline through the parse.
fn keep_leading_newlines(markup: &str) -> String {
  static LEADING_NEWLINE: OnceLock<Regex> = OnceLock::new();
  let re = LEADING_NEWLINE.get_or_init(|| {
    Regex::new(r"(?i)(<(?:pre|listing|textarea)(?:\s[^>]*)?>)(\r?\n)")
      .unwrap_or_else(|_| crate::never_matching_regex())
  });
  re.replace_all(markup, "${1}${2}${2}").into_owned()
}

/// HTML parsers ignore the self-closing flag on non-void elements, so an
/// XHTML `<a id="x"/>` would swallow its following siblings. Rewrite such
/// tags as an explicit open/close pair before parsing.
fn expand_self_closing(markup: &str) -> std::borrow::Cow<'_, str> {
  static SELF_CLOSING: OnceLock<Regex> = OnceLock::new();
  let re = SELF_CLOSING.get_or_init(|| {
    Regex::new(r#"<([A-Za-z][A-Za-z0-9:_-]*)((?:\s+[^\s<>/="']+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s<>"']+))?)*)\s*/>"#)
      .unwrap_or_else(|_| crate::never_matching_regex())
  });

  re.replace_all(markup, |caps: &regex::Captures<'_>| {
    let tag = &caps[1];
    let attrs = caps.get(2).map_or("", |m| m.as_str());
    if serialize::is_void(tag) {
      format!("<{tag}{attrs}/>")
    } else {
      format!("<{tag}{attrs}></{tag}>")
    }
  })
}

/// Local tag name of an element node.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<&str> {
  node.as_element().map(|element| &*element.name.local)
}

/// Whether `node` is an element named one of `tags`.
#[must_use]
pub fn is_tag(node: &NodeRef, tags: &[&str]) -> bool {
  tag_name(node).is_some_and(|name| tags.contains(&name))
}

#[must_use]
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
  node
    .as_element()
    .and_then(|element| element.attributes.borrow().get(name).map(str::to_owned))
}

/// The element's classes. Empty for non-elements.
#[must_use]
pub fn class_list(node: &NodeRef) -> ClassList {
  attr(node, "class")
    .map(|raw| ClassList::parse(&raw))
    .unwrap_or_default()
}

/// Replace the element's `class` attribute; an empty list removes it.
pub fn set_class_list(node: &NodeRef, classes: &ClassList) {
  let Some(element) = node.as_element() else {
    return;
  };
  let mut attributes = element.attributes.borrow_mut();
  if classes.is_empty() {
    attributes.remove("class");
  } else {
    attributes.insert("class", classes.to_string());
  }
}

/// Whether the element carries the class token `class`.
#[must_use]
pub fn has_class(node: &NodeRef, class: &str) -> bool {
  class_list(node).contains(class)
}

/// Add a class token to the element. Returns `true` if it was not present.
pub fn add_class(node: &NodeRef, class: &str) -> bool {
  if node.as_element().is_none() {
    return false;
  }
  let mut classes = class_list(node);
  let changed = classes.insert(class);
  if changed {
    set_class_list(node, &classes);
  }
  changed
}

/// Whether any descendant of `node` is an element named `tag`.
#[must_use]
pub fn has_descendant(node: &NodeRef, tag: &str) -> bool {
  node.descendants().any(|child| is_tag(&child, &[tag]))
}

/// Nearest ancestor element named one of `tags`.
#[must_use]
pub fn ancestor_named(node: &NodeRef, tags: &[&str]) -> Option<NodeRef> {
  node.ancestors().find(|ancestor| is_tag(ancestor, tags))
}

/// Snapshot of the element siblings following `node`. Text and comment
/// siblings are skipped.
#[must_use]
pub fn following_elements(node: &NodeRef) -> Vec<NodeRef> {
  node
    .following_siblings()
    .filter(|sibling| sibling.as_element().is_some())
    .collect()
}

/// Create a detached HTML element.
#[must_use]
pub fn new_element(tag: &str, attributes: &[(&str, &str)]) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), LocalName::from(tag)),
    attributes.iter().map(|(name, value)| {
      (
        ExpandedName::new("", *name),
        Attribute {
          prefix: None,
          value:  (*value).to_owned(),
        },
      )
    }),
  )
}

/// Create a detached element holding a single text child.
#[must_use]
pub fn new_text_element(
  tag: &str,
  attributes: &[(&str, &str)],
  text: &str,
) -> NodeRef {
  let element = new_element(tag, attributes);
  element.append(NodeRef::new_text(text));
  element
}

/// Serialised markup of `node`'s children.
#[must_use]
pub fn inner_markup(node: &NodeRef) -> String {
  let mut out = String::new();
  serialize::write_children(node, &mut out);
  out
}

/// Serialised markup of a list of sibling nodes.
#[must_use]
pub fn nodes_markup(nodes: &[NodeRef]) -> String {
  let mut out = String::new();
  for node in nodes {
    serialize::write_node(node, &mut out);
  }
  out
}

/// Parse a markup fragment into detached nodes, ready to be inserted
/// elsewhere.
#[must_use]
pub fn parse_fragment(markup: &str) -> Vec<NodeRef> {
  let wrapped = format!(
    "<body>{}</body>",
    keep_leading_newlines(&expand_self_closing(markup))
  );
  let document = parse_tree(&wrapped);
  let Some(body) = document.descendants().find(|node| is_tag(node, &["body"]))
  else {
    return Vec::new();
  };

  let children: Vec<NodeRef> = body.children().collect();
  for child in &children {
    child.detach();
  }
  children
}

/// Append every node of `nodes` to `parent`, in order.
pub fn append_all(parent: &NodeRef, nodes: Vec<NodeRef>) {
  for node in nodes {
    parent.append(node);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn self_closing_anchor_does_not_swallow_siblings() {
    let doc = Document::parse(
      "<html><body><p><a id=\"p1\"/>Texto</p><p>Outro</p></body></html>",
    );
    let out = doc.to_xhtml();
    assert!(out.contains("<p><a id=\"p1\"></a>Texto</p><p>Outro</p>"));
  }

  #[test]
  fn class_helpers_round_trip() {
    let doc = Document::parse(
      "<html><body><div class=\"Inline-Figure\">x</div></body></html>",
    );
    let div = doc.first_element("div").expect("div");
    assert!(has_class(&div, "Inline-Figure"));
    assert!(add_class(&div, "ec"));
    assert!(!add_class(&div, "ec"));
    assert_eq!(attr(&div, "class").as_deref(), Some("Inline-Figure ec"));
  }

  #[test]
  fn fragment_nodes_are_detached() {
    let nodes = parse_fragment("<strong>C</strong> texto");
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|node| node.parent().is_none()));
    assert_eq!(nodes_markup(&nodes), "<strong>C</strong> texto");
  }

  #[test]
  fn following_elements_skip_text() {
    let doc = Document::parse(
      "<html><body><p id=\"a\">1</p>\n<p id=\"b\">2</p> <div id=\"c\"></div></body></html>",
    );
    let first = doc.first_element("p").expect("p");
    let ids: Vec<_> = following_elements(&first)
      .iter()
      .filter_map(|node| attr(node, "id"))
      .collect();
    assert_eq!(ids, vec!["b", "c"]);
  }
}
