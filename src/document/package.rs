// src/document/package.rs

use super::xml::{document_xml, XmlOut};
use super::Document;
use crate::error::{AppError, Result};
use crate::utils::replace_contents;
use chrono::{DateTime, Utc};
use std::{
    fs,
    io::{Cursor, Write},
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

const CT_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const APP_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";

/// A package part with its content type and the relationship type that
/// links it from the package root.
struct PartKind {
    name: &'static str,
    content_type: &'static str,
    rel_type: &'static str,
}

const DOCUMENT_PART: PartKind = PartKind {
    name: "word/document.xml",
    content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
    rel_type: "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
};
const CORE_PART: PartKind = PartKind {
    name: "docProps/core.xml",
    content_type: "application/vnd.openxmlformats-package.core-properties+xml",
    rel_type: "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
};
const APP_PART: PartKind = PartKind {
    name: "docProps/app.xml",
    content_type: "application/vnd.openxmlformats-officedocument.extended-properties+xml",
    rel_type: "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties",
};

const PARTS: [&PartKind; 3] = [&DOCUMENT_PART, &CORE_PART, &APP_PART];

/// `[Content_Types].xml`: defaults by extension, an override per part.
fn content_types_xml() -> Result<Vec<u8>> {
    let mut out = XmlOut::new()?;
    out.open("Types", &[("xmlns", CT_NS)])?;
    out.empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    out.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for part in PARTS {
        let part_name = format!("/{}", part.name);
        out.empty(
            "Override",
            &[
                ("PartName", part_name.as_str()),
                ("ContentType", part.content_type),
            ],
        )?;
    }
    out.close("Types")?;
    Ok(out.finish())
}

/// `_rels/.rels`: the package root points at every part.
fn package_rels_xml() -> Result<Vec<u8>> {
    let mut out = XmlOut::new()?;
    out.open("Relationships", &[("xmlns", REL_NS)])?;
    for (idx, part) in PARTS.iter().enumerate() {
        let id = format!("rId{}", idx + 1);
        out.empty(
            "Relationship",
            &[
                ("Id", id.as_str()),
                ("Type", part.rel_type),
                ("Target", part.name),
            ],
        )?;
    }
    out.close("Relationships")?;
    Ok(out.finish())
}

fn app_xml() -> Result<Vec<u8>> {
    let application = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let mut out = XmlOut::new()?;
    out.open("Properties", &[("xmlns", APP_NS)])?;
    out.text_element("Application", &[], &application)?;
    out.close("Properties")?;
    Ok(out.finish())
}

/// Metadata written to `docProps/core.xml`.
#[derive(Debug, Clone)]
pub struct CoreProperties {
    pub title: String,
    pub creator: String,
    pub created: DateTime<Utc>,
}

fn core_xml(props: &CoreProperties) -> Result<Vec<u8>> {
    let stamp = props.created.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let mut out = XmlOut::new()?;
    out.open(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    out.text_element("dc:title", &[], &props.title)?;
    out.text_element("dc:creator", &[], &props.creator)?;
    let w3cdtf = [("xsi:type", "dcterms:W3CDTF")];
    out.text_element("dcterms:created", &w3cdtf, &stamp)?;
    out.text_element("dcterms:modified", &w3cdtf, &stamp)?;
    out.close("cp:coreProperties")?;
    Ok(out.finish())
}

/// Render the complete `.docx` package in memory.
pub fn to_docx_bytes(doc: &Document, props: &CoreProperties) -> Result<Vec<u8>> {
    let parts: [(&str, Vec<u8>); 5] = [
        ("[Content_Types].xml", content_types_xml()?),
        ("_rels/.rels", package_rels_xml()?),
        (CORE_PART.name, core_xml(props)?),
        (APP_PART.name, app_xml()?),
        (DOCUMENT_PART.name, document_xml(doc)?),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in &parts {
        zip.start_file(*name, options)?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// File name for document number `number`.
pub fn file_name(number: u64) -> String {
    format!("Документ №{}.docx", number)
}

/// Store a rendered package as `out_dir/Документ №{number}.docx`.
/// The directory is created first; the file appears only once complete.
#[tracing::instrument(level = "info", skip(bytes, out_dir), fields(out = %out_dir.as_ref().display()))]
pub fn write_docx<P: AsRef<Path>>(bytes: &[u8], out_dir: P, number: u64) -> Result<PathBuf> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|e| AppError::write(out_dir, e))?;

    let path = out_dir.join(file_name(number));
    if path.exists() {
        warn!(path = %path.display(), "overwriting existing document");
    }
    replace_contents(&path, bytes)?;
    info!(path = %path.display(), size = bytes.len(), "document written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Paragraph, Run};
    use anyhow::Result;
    use chrono::TimeZone;
    use std::io::Read;
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn props() -> CoreProperties {
        CoreProperties {
            title: "Fire & safety".into(),
            creator: "Ivanov Ivan".into(),
            created: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> Result<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entry = archive.by_name(name)?;
        let mut s = String::new();
        entry.read_to_string(&mut s)?;
        Ok(s)
    }

    #[test]
    fn test_package_parts() -> Result<()> {
        let mut doc = Document::default();
        doc.push(Block::Paragraph(Paragraph::new().with_run(Run::plain("hi"))));
        let bytes = to_docx_bytes(&doc, &props())?;

        let archive = ZipArchive::new(Cursor::new(bytes.as_slice()))?;
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/app.xml",
                "docProps/core.xml",
                "word/document.xml"
            ]
        );

        let core = read_part(&bytes, "docProps/core.xml")?;
        assert!(core.contains("<dc:title>Fire &amp; safety</dc:title>"));
        assert!(core.contains(
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">2024-03-01T09:30:00Z</dcterms:created>"#
        ));

        let body = read_part(&bytes, "word/document.xml")?;
        assert!(body.contains(">hi</w:t>"));

        let types = read_part(&bytes, "[Content_Types].xml")?;
        assert!(types.contains("/word/document.xml"));
        Ok(())
    }

    #[test]
    fn test_every_part_is_typed_and_linked() -> Result<()> {
        let bytes = to_docx_bytes(&Document::default(), &props())?;
        let types = read_part(&bytes, "[Content_Types].xml")?;
        let rels = read_part(&bytes, "_rels/.rels")?;

        assert!(types.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(types.contains(
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#
        ));
        for part in PARTS {
            assert!(
                types.contains(&format!(
                    r#"<Override PartName="/{}" ContentType="{}"/>"#,
                    part.name, part.content_type
                )),
                "no override for {}",
                part.name
            );
            assert!(
                rels.contains(&format!(r#"Target="{}""#, part.name)),
                "no relationship for {}",
                part.name
            );
        }
        assert!(rels.contains(&format!(
            r#"<Relationship Id="rId1" Type="{}" Target="word/document.xml"/>"#,
            DOCUMENT_PART.rel_type
        )));

        let app = read_part(&bytes, "docProps/app.xml")?;
        assert!(app.contains(&format!(
            "<Application>{}/{}</Application>",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )));
        Ok(())
    }

    #[test]
    fn test_write_creates_out_dir() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("out");
        let path = write_docx(b"PK", &out, 7)?;

        assert_eq!(path, out.join("Документ №7.docx"));
        assert_eq!(fs::read(&path)?, b"PK");
        Ok(())
    }

    #[test]
    fn test_write_into_unusable_dir_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("out");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_docx(b"PK", &blocker, 1).unwrap_err();
        assert!(matches!(err, AppError::Write { .. }));
    }
}
