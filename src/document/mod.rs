// src/document/mod.rs
//! In-memory WordprocessingML tree: just the subset the protocol layout uses.

pub mod layout;
pub mod package;
pub mod xml;

pub use layout::compose;
pub use package::{to_docx_bytes, write_docx, CoreProperties};

/// A text run with optional bold and size (half-points, as Word stores it).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub size: Option<u32>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            bold: true,
            size: None,
        }
    }

    pub fn sized(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub centered: bool,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn centered() -> Self {
        Paragraph {
            centered: true,
            runs: Vec::new(),
        }
    }

    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A bordered table cell holding a single paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub paragraph: Paragraph,
    /// Number of grid columns this cell covers.
    pub span: usize,
}

impl TableCell {
    pub fn new(paragraph: Paragraph) -> Self {
        TableCell { paragraph, span: 1 }
    }

    pub fn spanning(mut self, columns: usize) -> Self {
        self.span = columns.max(1);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.paragraph.text()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Grid width: the widest row, counting spans.
    pub fn grid_columns(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.span).sum::<usize>())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Body content in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub body: Vec<Block>,
}

impl Document {
    pub fn push(&mut self, block: Block) {
        self.body.push(block);
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }
}
