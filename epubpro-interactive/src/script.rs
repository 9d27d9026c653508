//! The client-side toggling script.
//!
//! The generated `onclick` handlers call `showMe(show, hide, hide, hide)`;
//! that function lives in a script appended once to each document head.
use kuchikikiki::NodeRef;
use log::trace;

use crate::dom::{self, Document};

/// Text whose presence in the head means the script is already there.
pub const SCRIPT_MARKER: &str = "showMe";

/// jQuery build the zoom handlers in [`INLINE_SCRIPT`] are written against.
pub const JQUERY_SRC: &str =
  "https://ajax.googleapis.com/ajax/libs/jquery/3.2.1/jquery.min.js";

/// `showMe`, `showDesdobr` and the inline-figure zoom handlers.
pub const INLINE_SCRIPT: &str = include_str!("../assets/interactivity.js");

/// Whether the head already carries the toggling script.
#[must_use]
pub fn has_script(head: &NodeRef) -> bool {
  head.descendants().any(|node| {
    node
      .as_text()
      .is_some_and(|text| text.borrow().contains(SCRIPT_MARKER))
  })
}

/// Append the script to the document head unless it is already present.
///
/// Returns `true` when the head was changed. A document without a head is
/// left alone.
pub fn ensure_script(document: &Document) -> bool {
  let Some(head) = document.head() else {
    trace!("No <head>; toggling script not added");
    return false;
  };
  if has_script(&head) {
    return false;
  }

  head.append(dom::new_element("script", &[
    ("src", JQUERY_SRC),
    ("type", "text/javascript"),
  ]));
  head.append(dom::new_text_element(
    "script",
    &[("type", "text/javascript")],
    &format!("\n{INLINE_SCRIPT}"),
  ));
  true
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn script_is_added_once() {
    let doc = Document::parse(
      "<html><head><title>t</title></head><body></body></html>",
    );
    assert!(ensure_script(&doc));
    assert!(!ensure_script(&doc));

    let out = doc.to_xhtml();
    assert_eq!(out.matches("function showMe").count(), 1);
    assert_eq!(out.matches("jquery.min.js").count(), 1);
    assert!(out.contains("//<![CDATA["));
  }

  #[test]
  fn existing_marker_is_respected() {
    let doc = Document::parse(
      "<html><head><script>function showMe(a, b, c, d) {}</script></head><body></body></html>",
    );
    assert!(!ensure_script(&doc));
  }

  #[test]
  fn inline_script_defines_the_toggle() {
    assert!(INLINE_SCRIPT.contains("function showMe(par1, par2, par3, par4)"));
  }
}
