//! Font embedding.
//!
//! Fonts are copied into `<content>/Fonts` and registered in the OPF
//! manifest. The manifest is edited as text, inserting new `<item>` elements
//! right before its closing tag, so the rest of the package document keeps
//! its exact formatting.
use std::{
  collections::HashSet,
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use color_eyre::eyre::{Context, Result};
use epubpro_interactive::never_matching_regex;
use log::{debug, error, info, warn};
use regex::Regex;

use crate::{error::ArchiveError, package::Package};

/// Directory, relative to the OPF, that receives the fonts.
pub const FONTS_DIR: &str = "Fonts";

fn manifest_end() -> &'static Regex {
  static MANIFEST_END: OnceLock<Regex> = OnceLock::new();
  MANIFEST_END.get_or_init(|| {
    Regex::new(r"</(?P<prefix>[\w-]+:)?manifest\s*>")
      .unwrap_or_else(|_| never_matching_regex())
  })
}

/// Media type for a font file, or `None` if `path` is not a font.
#[must_use]
pub fn font_media_type(path: &Path) -> Option<&'static str> {
  let ext = path.extension()?.to_str()?.to_ascii_lowercase();
  match ext.as_str() {
    "ttf" => Some("font/ttf"),
    "otf" => Some("font/otf"),
    "woff" => Some("font/woff"),
    "woff2" => Some("font/woff2"),
    _ => None,
  }
}

/// Manifest id for a font file name: dots and dashes become underscores.
#[must_use]
pub fn manifest_id(file_name: &str) -> String {
  file_name.replace(['.', '-'], "_")
}

fn font_files(fonts_dir: &Path) -> Result<Vec<PathBuf>> {
  let mut fonts: Vec<PathBuf> = fs::read_dir(fonts_dir)
    .wrap_err_with(|| format!("Failed to read {}", fonts_dir.display()))?
    .filter_map(std::result::Result::ok)
    .map(|entry| entry.path())
    .filter(|path| path.is_file() && font_media_type(path).is_some())
    .collect();
  fonts.sort();
  Ok(fonts)
}

/// Copy the fonts of `fonts_dir` into the EPUB and register them in the
/// manifest of `opf_path`.
///
/// Returns the number of manifest entries added.
///
/// # Errors
///
/// Returns an error if the fonts cannot be copied or the OPF cannot be read
/// or written.
pub fn run(content_dir: &Path, opf_path: &Path, fonts_dir: &Path) -> Result<usize> {
  info!("Injecting fonts...");

  if !fonts_dir.is_dir() {
    warn!("Fonts directory not found: {}", fonts_dir.display());
    return Ok(0);
  }

  let fonts = font_files(fonts_dir)?;
  if fonts.is_empty() {
    info!("No fonts found to copy");
    return Ok(0);
  }

  let target = content_dir.join(FONTS_DIR);
  fs::create_dir_all(&target)
    .wrap_err_with(|| format!("Failed to create {}", target.display()))?;

  let options = fs_extra::dir::CopyOptions::new().overwrite(true);
  fs_extra::copy_items(&fonts, &target, &options)
    .wrap_err("Failed to copy fonts")?;
  info!("Copied {} font(s) to {}", fonts.len(), target.display());

  let names: Vec<String> = fonts
    .iter()
    .filter_map(|path| path.file_name())
    .map(|name| name.to_string_lossy().into_owned())
    .collect();

  let opf = fs::read_to_string(opf_path)
    .wrap_err_with(|| format!("Failed to read {}", opf_path.display()))?;
  let Some((updated, added)) = register_fonts(&opf, &names)? else {
    return Ok(0);
  };

  if added > 0 {
    fs::write(opf_path, updated)
      .wrap_err_with(|| format!("Failed to write {}", opf_path.display()))?;
    info!("OPF manifest updated with {added} font(s)");
  }
  Ok(added)
}

/// Add a manifest item for every font in `names` whose `Fonts/<name>` href
/// is not listed yet.
///
/// Returns the updated package document and the number of items added, or
/// `None` when the document has no manifest.
///
/// # Errors
///
/// Returns an error if the package document is not well-formed XML.
pub fn register_fonts(
  opf: &str,
  names: &[String],
) -> Result<Option<(String, usize)>, ArchiveError> {
  let package = Package::parse(opf)?;
  let Some(manifest) = package.manifest else {
    error!("Could not find <manifest> in OPF file");
    return Ok(None);
  };
  let existing: HashSet<&str> =
    manifest.iter().map(|item| item.href.as_str()).collect();

  let Some(end) = manifest_end().captures(opf) else {
    error!("Could not find the end of <manifest> in OPF file");
    return Ok(None);
  };
  let prefix = end.name("prefix").map_or("", |found| found.as_str());
  let Some(whole) = end.get(0) else {
    return Ok(None);
  };

  let mut items = String::new();
  let mut added = 0;
  for name in names {
    let href = format!("{FONTS_DIR}/{name}");
    if existing.contains(href.as_str()) {
      debug!("Font already in manifest: {href}");
      continue;
    }
    let media_type =
      font_media_type(Path::new(name)).unwrap_or("application/octet-stream");
    items.push_str(&format!(
      "  <{prefix}item id=\"{}\" href=\"{}\" media-type=\"{media_type}\"/>\n  ",
      manifest_id(name),
      html_escape::encode_double_quoted_attribute(&href),
    ));
    info!("Added {name} to manifest");
    added += 1;
  }

  let mut updated = String::with_capacity(opf.len() + items.len());
  updated.push_str(&opf[..whole.start()]);
  updated.push_str(&items);
  updated.push_str(&opf[whole.start()..]);
  Ok(Some((updated, added)))
}
