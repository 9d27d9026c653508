use std::{fmt::Write as _, fs, path::Path};

use color_eyre::eyre::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::{error, info};

use crate::package::Package;

const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";
const DEFAULT_NCX: &str = "toc.ncx";
const FALLBACK_IDENTIFIER: &str = "urn:uuid:12345678-1234-1234-1234-123456789012";
const FALLBACK_TITLE: &str = "ePub Automation";

/// Render an NCX navigation document for `package`.
///
/// One `navPoint` is written per spine entry that points at an
/// `.xhtml`/`.html` document, labelled with the file stem. Returns `None`
/// when the package has no manifest or no spine.
#[must_use]
pub fn render_ncx(package: &Package) -> Option<String> {
  if package.manifest.is_none() || package.spine.is_none() {
    return None;
  }

  let identifier = package.identifier.as_deref().unwrap_or(FALLBACK_IDENTIFIER);
  let title = package.title.as_deref().unwrap_or(FALLBACK_TITLE);

  let mut out = String::new();
  out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
  out.push_str(
    "<!DOCTYPE ncx PUBLIC \"-//NISO//DTD ncx 2005-1//EN\" \
     \"http://www.daisy.org/z3986/2005/ncx-2005-1.dtd\">\n",
  );
  out.push_str(
    "<ncx xmlns=\"http://www.daisy.org/z3986/2005/ncx/\" version=\"2005-1\">\n",
  );
  out.push_str("  <head>\n");
  let _ = writeln!(
    out,
    "    <meta name=\"dtb:uid\" content=\"{}\" />",
    encode_double_quoted_attribute(identifier)
  );
  out.push_str("    <meta name=\"dtb:depth\" content=\"1\" />\n");
  out.push_str("    <meta name=\"dtb:totalPageCount\" content=\"0\" />\n");
  out.push_str("    <meta name=\"dtb:maxPageNumber\" content=\"0\" />\n");
  out.push_str("  </head>\n");
  out.push_str("  <docTitle>\n");
  let _ = writeln!(out, "    <text>{}</text>", encode_text(title));
  out.push_str("  </docTitle>\n");
  out.push_str("  <navMap>\n");

  let documents = package
    .spine_hrefs()
    .into_iter()
    .filter(|href| href.ends_with(".xhtml") || href.ends_with(".html"));
  for (index, href) in documents.enumerate() {
    let order = index + 1;
    let label = Path::new(href)
      .file_stem()
      .map_or_else(|| href.to_owned(), |stem| stem.to_string_lossy().into_owned());

    let _ = writeln!(
      out,
      "    <navPoint id=\"navPoint-{order}\" playOrder=\"{order}\">"
    );
    let _ = writeln!(
      out,
      "      <navLabel><text>{}</text></navLabel>",
      encode_text(&label)
    );
    let _ = writeln!(
      out,
      "      <content src=\"{}\" />",
      encode_double_quoted_attribute(href)
    );
    out.push_str("    </navPoint>\n");
  }

  out.push_str("  </navMap>\n");
  out.push_str("</ncx>");
  Some(out)
}

/// Regenerate the NCX of the package at `opf_path`.
///
/// The NCX is written where the manifest's NCX item points, or to
/// `toc.ncx` next to the OPF. Returns `false` when the package lacks a
/// manifest or spine and nothing was written.
///
/// # Errors
///
/// Returns an error if the OPF cannot be read or parsed, or the NCX cannot
/// be written.
pub fn run(opf_path: &Path) -> Result<bool> {
  info!("Updating/Generating NCX...");

  let opf = fs::read_to_string(opf_path)
    .wrap_err_with(|| format!("Failed to read {}", opf_path.display()))?;
  let package = Package::parse(&opf)
    .wrap_err_with(|| format!("Failed to parse {}", opf_path.display()))?;

  let Some(ncx) = render_ncx(&package) else {
    error!("Manifest or spine missing in {}", opf_path.display());
    return Ok(false);
  };

  let href = package.item_with_media_type(NCX_MEDIA_TYPE).map_or_else(
    || {
      info!("NCX not found in manifest, using default {DEFAULT_NCX}");
      DEFAULT_NCX
    },
    |item| item.href.as_str(),
  );
  let ncx_path = opf_path
    .parent()
    .map_or_else(|| Path::new(href).to_path_buf(), |dir| dir.join(href));

  fs::write(&ncx_path, ncx)
    .wrap_err_with(|| format!("Failed to write {}", ncx_path.display()))?;

  info!(
    "NCX generated with identifier {}",
    package.identifier.as_deref().unwrap_or(FALLBACK_IDENTIFIER)
  );
  Ok(true)
}
