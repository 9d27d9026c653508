//! XHTML serialisation of a `kuchikikiki` tree.
//!
//! The stock serializer in `kuchikikiki` writes HTML5 syntax, which EPUB
//! reading systems reject for XHTML content documents (`<br>` instead of
//! `<br/>`, XML declarations lost). This writer emits well-formed XHTML:
//!
//! - void elements are self-closed (`<hr class="resposta"/>`)
//! - text inside raw text elements (`script`, `style` and friends) is
//!   written verbatim
//! - namespace declarations on inline SVG and MathML keep their bare
//!   `xmlns` name
//! - XML declarations, which `html5ever` keeps as bogus comments of the form
//!   `?xml ...?`, are written back as processing instructions
use kuchikikiki::NodeRef;

const VOID_ELEMENTS: &[&str] = &[
  "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
  "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] =
  &["iframe", "noembed", "noframes", "script", "style", "xmp"];

/// Whether `tag` is an HTML void element, in any letter case.
pub(super) fn is_void(tag: &str) -> bool {
  VOID_ELEMENTS
    .iter()
    .any(|void| void.eq_ignore_ascii_case(tag))
}

/// Serialise `node` and its subtree into `out`.
pub fn write_node(node: &NodeRef, out: &mut String) {
  if let Some(element) = node.as_element() {
    let name: &str = &element.name.local;
    out.push('<');
    out.push_str(name);

    for (expanded, attribute) in &element.attributes.borrow().map {
      out.push(' ');
      // Foreign content stores `xmlns` with an empty prefix
      if let Some(prefix) =
        attribute.prefix.as_ref().filter(|prefix| !prefix.is_empty())
      {
        out.push_str(prefix);
        out.push(':');
      }
      out.push_str(&expanded.local);
      out.push_str("=\"");
      out.push_str(&html_escape::encode_double_quoted_attribute(
        &attribute.value,
      ));
      out.push('"');
    }

    if is_void(name) {
      out.push_str("/>");
      return;
    }

    out.push('>');
    let raw = RAW_TEXT_ELEMENTS.contains(&name);
    for child in node.children() {
      match child.as_text() {
        Some(text) if raw => out.push_str(&text.borrow()),
        _ => write_node(&child, out),
      }
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
  } else if let Some(text) = node.as_text() {
    out.push_str(&html_escape::encode_text(&*text.borrow()));
  } else if let Some(comment) = node.as_comment() {
    let comment = comment.borrow();
    match comment.strip_prefix('?').and_then(|c| c.strip_suffix('?')) {
      Some(instruction) => {
        out.push_str("<?");
        out.push_str(instruction);
        out.push_str("?>");
      },
      None => {
        out.push_str("<!--");
        out.push_str(&comment);
        out.push_str("-->");
      },
    }
  } else if let Some(doctype) = node.as_doctype() {
    out.push_str("<!DOCTYPE ");
    out.push_str(&doctype.name);
    if !doctype.public_id.is_empty() {
      out.push_str(" PUBLIC \"");
      out.push_str(&doctype.public_id);
      out.push('"');
      if !doctype.system_id.is_empty() {
        out.push_str(" \"");
        out.push_str(&doctype.system_id);
        out.push('"');
      }
    } else if !doctype.system_id.is_empty() {
      out.push_str(" SYSTEM \"");
      out.push_str(&doctype.system_id);
      out.push('"');
    }
    out.push('>');
    out.push('\n');
  } else {
    // Document and fragment roots
    write_children(node, out);
  }
}

/// Serialise only the children of `node` (its "inner markup").
pub fn write_children(node: &NodeRef, out: &mut String) {
  for child in node.children() {
    write_node(&child, out);
  }
}
