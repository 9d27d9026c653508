use std::{path::Path, sync::OnceLock};

use color_eyre::eyre::Result;
use epubpro_interactive::{Document, dom, never_matching_regex};
use kuchikikiki::NodeRef;
use log::info;
use regex::Regex;

use crate::files;

const SKIPPED_PARENTS: &[&str] = &["a", "script", "style"];

fn url_pattern() -> &'static Regex {
  static URL: OnceLock<Regex> = OnceLock::new();
  URL.get_or_init(|| {
    Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#)
      .unwrap_or_else(|_| never_matching_regex())
  })
}

/// Wrap bare `http(s)://` URLs found in body text in
/// `<a href="…" target="_blank">` links.
///
/// Text already inside a link, script or style element is left alone.
/// Returns the number of links created.
pub fn link_urls(document: &Document) -> usize {
  let Some(body) = document.body() else {
    return 0;
  };

  let text_nodes: Vec<NodeRef> = body
    .descendants()
    .filter(|node| node.as_text().is_some())
    .filter(|node| dom::ancestor_named(node, SKIPPED_PARENTS).is_none())
    .collect();

  text_nodes.iter().map(link_text_node).sum()
}

fn link_text_node(node: &NodeRef) -> usize {
  let Some(text) = node.as_text().map(|text| text.borrow().clone()) else {
    return 0;
  };
  let pattern = url_pattern();
  if !pattern.is_match(&text) {
    return 0;
  }

  let mut pieces = Vec::new();
  let mut last = 0;
  for found in pattern.find_iter(&text) {
    if found.start() > last {
      pieces.push(NodeRef::new_text(&text[last..found.start()]));
    }
    let url = found.as_str();
    pieces.push(dom::new_text_element(
      "a",
      &[("href", url), ("target", "_blank")],
      url,
    ));
    last = found.end();
  }
  if last < text.len() {
    pieces.push(NodeRef::new_text(&text[last..]));
  }

  let links = pieces.iter().filter(|piece| dom::is_tag(piece, &["a"])).count();
  for piece in pieces {
    node.insert_before(piece);
  }
  node.detach();
  links
}

/// Run [`link_urls`] over every content document.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written.
pub fn run(content_dir: &Path) -> Result<usize> {
  info!("Processing URLs in body content...");

  let mut links = 0;
  let changed = files::rewrite_content_files(content_dir, |_, content| {
    let document = Document::parse(content);
    let created = link_urls(&document);
    links += created;
    Ok((created > 0).then(|| document.to_xhtml()))
  })?;

  info!("URL linking completed: {links} link(s) in {changed} file(s)");
  Ok(links)
}
