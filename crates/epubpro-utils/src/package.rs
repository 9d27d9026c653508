//! OPF package document reader.
use crate::error::ArchiveError;

/// One `<item>` of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
  pub id:         String,
  pub href:       String,
  pub media_type: String,
}

/// The parts of a package document the pipeline stages read.
///
/// `manifest` and `spine` are `None` when the element is missing, which is
/// distinct from an element with no children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
  pub identifier: Option<String>,
  pub title:      Option<String>,
  pub manifest:   Option<Vec<ManifestItem>>,
  pub spine:      Option<Vec<String>>,
}

/// Parse XML, accepting a DOCTYPE.
///
/// # Errors
///
/// Returns an error if `text` is not well-formed.
pub fn parse_xml(text: &str) -> Result<roxmltree::Document<'_>, roxmltree::Error> {
  roxmltree::Document::parse_with_options(text, roxmltree::ParsingOptions {
    allow_dtd: true,
    ..roxmltree::ParsingOptions::default()
  })
}

fn trimmed_text(node: roxmltree::Node<'_, '_>) -> Option<String> {
  let text: String = node
    .descendants()
    .filter(roxmltree::Node::is_text)
    .filter_map(|child| child.text())
    .collect();
  let text = text.trim();
  (!text.is_empty()).then(|| text.to_owned())
}

impl Package {
  /// # Errors
  ///
  /// Returns [`ArchiveError::Package`] if `opf` is not well-formed XML.
  pub fn parse(opf: &str) -> Result<Self, ArchiveError> {
    let document = parse_xml(opf)?;
    let root = document.root_element();

    let identifiers: Vec<roxmltree::Node<'_, '_>> = document
      .descendants()
      .filter(|node| node.tag_name().name() == "identifier")
      .collect();
    let unique = root.attribute("unique-identifier").and_then(|reference| {
      identifiers
        .iter()
        .find(|node| node.attribute("id") == Some(reference))
    });
    let identifier = unique
      .or_else(|| identifiers.first())
      .and_then(|node| trimmed_text(*node));

    let title = document
      .descendants()
      .find(|node| node.tag_name().name() == "title")
      .and_then(trimmed_text);

    let manifest = document
      .descendants()
      .find(|node| node.tag_name().name() == "manifest")
      .map(|manifest| {
        manifest
          .children()
          .filter(|node| node.tag_name().name() == "item")
          .filter_map(|node| {
            Some(ManifestItem {
              id:         node.attribute("id")?.to_owned(),
              href:       node.attribute("href")?.to_owned(),
              media_type: node.attribute("media-type").unwrap_or_default().to_owned(),
            })
          })
          .collect()
      });

    let spine = document
      .descendants()
      .find(|node| node.tag_name().name() == "spine")
      .map(|spine| {
        spine
          .children()
          .filter(|node| node.tag_name().name() == "itemref")
          .filter_map(|node| node.attribute("idref"))
          .map(str::to_owned)
          .collect()
      });

    Ok(Self {
      identifier,
      title,
      manifest,
      spine,
    })
  }

  /// Manifest item with the given id.
  #[must_use]
  pub fn item(&self, id: &str) -> Option<&ManifestItem> {
    self.manifest.as_ref()?.iter().find(|item| item.id == id)
  }

  /// First manifest item with the given media type.
  #[must_use]
  pub fn item_with_media_type(&self, media_type: &str) -> Option<&ManifestItem> {
    self
      .manifest
      .as_ref()?
      .iter()
      .find(|item| item.media_type == media_type)
  }

  /// Hrefs of the spine entries, in reading order. Entries whose idref is
  /// not in the manifest are skipped.
  #[must_use]
  pub fn spine_hrefs(&self) -> Vec<&str> {
    self
      .spine
      .iter()
      .flatten()
      .filter_map(|idref| self.item(idref))
      .map(|item| item.href.as_str())
      .collect()
  }
}
