// src/document/layout.rs

use super::{Block, Document, Paragraph, Run, Table, TableCell, TableRow};
use crate::config::{Config, Employee};
use crate::error::{AppError, Result};
use crate::table::RawTable;

pub const PROTOCOL_LABEL: &str = "Протокол";
pub const NUMBER_HEADER: &str = "№";
pub const SIGNATURE_LEAD: &str = "Обучение провел ";
pub const SIGNATURE_TAIL: &str = " ___________ (подпись)";

/// 18pt.
const TITLE_SIZE: u32 = 36;
const BLANK_LINES: usize = 3;

/// Build the fixed protocol layout: title, table, spacing, signature.
pub fn compose(config: &Config, table: &RawTable) -> Result<Document> {
    let mut doc = Document::default();
    doc.push(Block::Paragraph(title(&config.document_title)));
    doc.push(Block::Table(protocol_table(table)));
    for _ in 0..BLANK_LINES {
        doc.push(Block::Paragraph(Paragraph::new().with_run(Run::plain(" "))));
    }
    doc.push(Block::Paragraph(signature(&config.employee)?));
    Ok(doc)
}

fn title(text: &str) -> Paragraph {
    Paragraph::centered().with_run(Run::bold(text).sized(TITLE_SIZE))
}

fn cell(text: &str, bold: bool) -> TableCell {
    let run = if bold { Run::bold(text) } else { Run::plain(text) };
    TableCell::new(Paragraph::centered().with_run(run))
}

/// Merged "Протокол" row, header row with a leading "№", then numbered data rows.
/// Row lengths are emitted as they are; nothing is padded or cut.
pub fn protocol_table(data: &RawTable) -> Table {
    let mut rows = Vec::with_capacity(data.rows.len() + 2);

    rows.push(TableRow {
        cells: vec![cell(PROTOCOL_LABEL, true).spanning(data.headers.len() + 1)],
    });

    let mut header = vec![cell(NUMBER_HEADER, true)];
    header.extend(data.headers.iter().map(|h| cell(h, true)));
    rows.push(TableRow { cells: header });

    for (idx, values) in data.rows.iter().enumerate() {
        let mut cells = vec![cell(&(idx + 1).to_string(), false)];
        cells.extend(values.iter().map(|v| cell(v, false)));
        rows.push(TableRow { cells });
    }

    Table { rows }
}

/// "Обучение провел " + bold "{position} {last} {F}.{M}. " + signature line.
pub fn signature(employee: &Employee) -> Result<Paragraph> {
    let first = initial(&employee.first_name, "firstName")?;
    let middle = initial(&employee.middle_name, "middleName")?;
    let name = format!(
        "{} {} {}.{}. ",
        employee.position, employee.last_name, first, middle
    );
    Ok(Paragraph::centered()
        .with_run(Run::plain(SIGNATURE_LEAD))
        .with_run(Run::bold(name))
        .with_run(Run::plain(SIGNATURE_TAIL)))
}

fn initial(value: &str, field: &'static str) -> Result<char> {
    value
        .chars()
        .next()
        .ok_or(AppError::IncompleteEmployee { field })
}
