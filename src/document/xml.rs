// src/document/xml.rs

use super::{Block, Document, Paragraph, Run, Table, TableCell};
use crate::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Full page width in fiftieths of a percent.
const TABLE_WIDTH_PCT: &str = "5000";
/// Thin single line, in eighths of a point.
const BORDER_SIZE: &str = "6";

/// Thin wrapper over the quick-xml writer with element helpers.
pub(crate) struct XmlOut {
    w: Writer<Vec<u8>>,
}

impl XmlOut {
    pub(crate) fn new() -> Result<Self> {
        let mut w = Writer::new(Vec::new());
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(XmlOut { w })
    }

    pub(crate) fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        self.w.write_event(Event::Start(start))?;
        Ok(())
    }

    pub(crate) fn close(&mut self, name: &str) -> Result<()> {
        self.w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        self.w.write_event(Event::Empty(start))?;
        Ok(())
    }

    /// `<name attrs>text</name>` with the text escaped.
    pub(crate) fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<()> {
        self.open(name, attrs)?;
        self.w.write_event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.w.into_inner()
    }
}

/// Serialize `doc` as the `word/document.xml` part.
pub fn document_xml(doc: &Document) -> Result<Vec<u8>> {
    let mut out = XmlOut::new()?;
    out.open("w:document", &[("xmlns:w", W_NS)])?;
    out.open("w:body", &[])?;
    for block in &doc.body {
        match block {
            Block::Paragraph(p) => write_paragraph(&mut out, p)?,
            Block::Table(t) => write_table(&mut out, t)?,
        }
    }
    out.close("w:body")?;
    out.close("w:document")?;
    Ok(out.finish())
}

fn write_paragraph(out: &mut XmlOut, p: &Paragraph) -> Result<()> {
    out.open("w:p", &[])?;
    if p.centered {
        out.open("w:pPr", &[])?;
        out.empty("w:jc", &[("w:val", "center")])?;
        out.close("w:pPr")?;
    }
    for run in &p.runs {
        write_run(out, run)?;
    }
    out.close("w:p")
}

fn write_run(out: &mut XmlOut, run: &Run) -> Result<()> {
    out.open("w:r", &[])?;
    if run.bold || run.size.is_some() {
        out.open("w:rPr", &[])?;
        if run.bold {
            out.empty("w:b", &[])?;
        }
        if let Some(size) = run.size {
            let size = size.to_string();
            out.empty("w:sz", &[("w:val", size.as_str())])?;
        }
        out.close("w:rPr")?;
    }
    // run-boundary spaces are significant in the signature line
    out.text_element("w:t", &[("xml:space", "preserve")], &run.text)?;
    out.close("w:r")
}

fn write_table(out: &mut XmlOut, table: &Table) -> Result<()> {
    out.open("w:tbl", &[])?;

    out.open("w:tblPr", &[])?;
    out.empty("w:tblW", &[("w:w", TABLE_WIDTH_PCT), ("w:type", "pct")])?;
    out.close("w:tblPr")?;

    out.open("w:tblGrid", &[])?;
    for _ in 0..table.grid_columns() {
        out.empty("w:gridCol", &[])?;
    }
    out.close("w:tblGrid")?;

    for row in &table.rows {
        out.open("w:tr", &[])?;
        for cell in &row.cells {
            write_cell(out, cell)?;
        }
        out.close("w:tr")?;
    }
    out.close("w:tbl")
}

fn write_cell(out: &mut XmlOut, cell: &TableCell) -> Result<()> {
    out.open("w:tc", &[])?;
    out.open("w:tcPr", &[])?;
    if cell.span > 1 {
        let span = cell.span.to_string();
        out.empty("w:gridSpan", &[("w:val", span.as_str())])?;
    }
    out.open("w:tcBorders", &[])?;
    for side in ["w:top", "w:left", "w:bottom", "w:right"] {
        out.empty(side, &[("w:val", "single"), ("w:sz", BORDER_SIZE)])?;
    }
    out.close("w:tcBorders")?;
    out.close("w:tcPr")?;
    write_paragraph(out, &cell.paragraph)?;
    out.close("w:tc")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TableRow;

    fn render(doc: &Document) -> String {
        String::from_utf8(document_xml(doc).unwrap()).unwrap()
    }

    #[test]
    fn test_paragraph_markup() {
        let mut doc = Document::default();
        doc.push(Block::Paragraph(
            Paragraph::centered().with_run(Run::bold("Title").sized(36)),
        ));
        let xml = render(&doc);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.contains(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/><w:sz w:val="36"/></w:rPr><w:t xml:space="preserve">Title</w:t></w:r></w:p>"#
        ));
    }

    #[test]
    fn test_text_is_escaped_and_spaces_kept() {
        let mut doc = Document::default();
        doc.push(Block::Paragraph(
            Paragraph::new().with_run(Run::plain(" a < b & c ")),
        ));
        let xml = render(&doc);
        assert!(xml.contains(r#"<w:t xml:space="preserve"> a &lt; b &amp; c </w:t>"#));
        // plain runs carry no run properties
        assert!(!xml.contains("<w:rPr>"));
    }

    #[test]
    fn test_cell_borders_and_span() {
        let table = Table {
            rows: vec![TableRow {
                cells: vec![TableCell::new(Paragraph::new().with_run(Run::plain("x"))).spanning(3)],
            }],
        };
        let mut doc = Document::default();
        doc.push(Block::Table(table));
        let xml = render(&doc);

        assert!(xml.contains(r#"<w:tblW w:w="5000" w:type="pct"/>"#));
        assert_eq!(xml.matches("<w:gridCol/>").count(), 3);
        assert!(xml.contains(r#"<w:tcPr><w:gridSpan w:val="3"/><w:tcBorders><w:top w:val="single" w:sz="6"/><w:left w:val="single" w:sz="6"/><w:bottom w:val="single" w:sz="6"/><w:right w:val="single" w:sz="6"/></w:tcBorders></w:tcPr>"#));
    }
}
