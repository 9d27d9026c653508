#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{
  fs::{self, File},
  io::{Read, Write},
  path::Path,
};

use epubpro_config::cleaner::CleanerConfig;
use epubpro_utils::{cleaner, extract_epub, ncx, package_epub, structure};
use zip::{ZipArchive, ZipWriter, write::SimpleFileOptions};

const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="uid" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:fixture</dc:identifier>
    <dc:title>Fixture</dc:title>
  </metadata>
  <manifest>
    <item id="c1" href="Text/chapter.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine><itemref idref="c1"/></spine>
</package>"#;

const CHAPTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="pt-BR" lang="pt-BR">
<head><title>Cap</title></head>
<body>
<p id="_idP1" class="corpo">Texto <span class="negrito">forte</span>.</p>
<div class="Inline-Figure"><img src="../Images/a.png" alt=""/></div>
</body>
</html>"#;

fn write_fixture(path: &Path) {
  let mut zip = ZipWriter::new(File::create(path).expect("create epub"));
  let options = SimpleFileOptions::default();
  for (name, body) in [
    ("mimetype", "application/epub+zip"),
    ("META-INF/container.xml", CONTAINER),
    ("OEBPS/content.opf", OPF),
    ("OEBPS/Text/chapter.xhtml", CHAPTER),
  ] {
    zip.start_file(name, options).expect("start entry");
    zip.write_all(body.as_bytes()).expect("write entry");
  }
  zip.finish().expect("finish zip");
}

#[test]
fn extract_process_and_repackage() {
  let dir = tempfile::tempdir().expect("tempdir");
  let input = dir.path().join("in.epub");
  write_fixture(&input);

  let extracted = extract_epub(&input, &dir.path().join("work")).expect("extract");
  assert!(extracted.opf_path.ends_with("OEBPS/content.opf"));
  assert!(extracted.content_dir.ends_with("OEBPS"));

  cleaner::run(&extracted.content_dir, &CleanerConfig::default()).expect("clean");
  structure::run(&extracted.content_dir).expect("structure");
  assert!(ncx::run(&extracted.opf_path).expect("ncx"));

  let chapter = fs::read_to_string(extracted.content_dir.join("Text/chapter.xhtml"))
    .expect("read chapter");
  assert!(!chapter.contains("_idP1"));
  assert!(!chapter.contains("lang="));
  assert!(!chapter.contains("negrito"));
  assert!(chapter.contains("figmed"));
  assert!(extracted.content_dir.join("toc.ncx").is_file());

  let output = dir.path().join("out.epub");
  package_epub(&extracted.root, &output).expect("package");

  let mut archive = ZipArchive::new(File::open(&output).expect("open output"))
    .expect("read output");
  {
    let mut first = archive.by_index(0).expect("first entry");
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), zip::CompressionMethod::Stored);
    let mut mimetype = String::new();
    first.read_to_string(&mut mimetype).expect("read mimetype");
    assert_eq!(mimetype, "application/epub+zip");
  }
  let names: Vec<String> = archive.file_names().map(str::to_owned).collect();
  assert_eq!(names.iter().filter(|name| *name == "mimetype").count(), 1);
  assert!(names.contains(&"OEBPS/Text/chapter.xhtml".to_owned()));
  assert!(names.contains(&"OEBPS/toc.ncx".to_owned()));
}

#[test]
fn mimetype_is_created_when_missing() {
  let dir = tempfile::tempdir().expect("tempdir");
  let source = dir.path().join("book");
  fs::create_dir_all(source.join("OEBPS")).expect("mkdir");
  fs::write(source.join("OEBPS/content.opf"), OPF).expect("write opf");

  let output = dir.path().join("book.epub");
  package_epub(&source, &output).expect("package");

  let mut archive =
    ZipArchive::new(File::open(&output).expect("open")).expect("read zip");
  assert_eq!(archive.by_index(0).expect("entry").name(), "mimetype");
  assert_eq!(archive.len(), 2);
}
