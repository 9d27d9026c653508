use std::path::Path;

use color_eyre::eyre::Result;
use epubpro_interactive::{Document, dom};
use log::info;

use crate::files;

const INLINE_FIGURE: &str = "Inline-Figure";

/// Add the figure layout classes around inline images.
///
/// For an `img` whose nearest `div` carries a class starting with
/// `Inline-Figure`:
///
/// - nested figure (`div.Inline-Figure > div.Inline-Figure* > img`): the
///   `div` wrapping the outer figure gets `Figura`, the image `figmed`;
/// - plain figure (`div.Inline-Figure > img`): the figure gets `ec esq`, the
///   image `figmed`.
///
/// Returns the number of images handled.
pub fn apply_figure_classes(document: &Document) -> usize {
  let mut handled = 0;

  for img in document.elements_named(&["img"]) {
    let Some(figure) = dom::ancestor_named(&img, &["div"]) else {
      continue;
    };
    let figure_classes = dom::class_list(&figure);
    if !figure_classes.any_starts_with(INLINE_FIGURE) {
      continue;
    }

    let outer = dom::ancestor_named(&figure, &["div"])
      .filter(|outer| dom::has_class(outer, INLINE_FIGURE));
    if let Some(outer) = outer {
      if let Some(wrapper) = dom::ancestor_named(&outer, &["div"]) {
        dom::add_class(&wrapper, "Figura");
        dom::add_class(&img, "figmed");
        handled += 1;
      }
      continue;
    }

    if figure_classes.contains(INLINE_FIGURE) {
      dom::add_class(&figure, "ec");
      dom::add_class(&figure, "esq");
      dom::add_class(&img, "figmed");
      handled += 1;
    }
  }

  handled
}

/// Apply [`apply_figure_classes`] to every content document.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written.
pub fn run(content_dir: &Path) -> Result<usize> {
  info!("Applying structure updates in {}...", content_dir.display());

  let changed = files::rewrite_content_files(content_dir, |_, content| {
    let document = Document::parse(content);
    Ok((apply_figure_classes(&document) > 0).then(|| document.to_xhtml()))
  })?;

  info!("Structure updates completed in {changed} file(s)");
  Ok(changed)
}
