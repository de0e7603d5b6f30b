// src/run.rs

use crate::{
    config::load_config,
    counter::DocumentCounter,
    document::{self, CoreProperties},
    error::Result,
    table::load_table,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fixed file layout under the project root.
#[derive(Debug, Clone)]
pub struct Layout {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub counter_path: PathBuf,
    pub out_dir: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Layout {
            config_path: root.join("resources").join("config.json"),
            counter_path: root.join("resources").join("counter.txt"),
            out_dir: root.join("out"),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub number: u64,
    pub path: PathBuf,
}

/// Produce one protocol document.
///
/// Inputs are read and the package is rendered in memory before the counter
/// is touched. The counter only advances after the file is in place, so a
/// failed run never consumes a number.
#[tracing::instrument(level = "info", skip(layout), fields(root = %layout.root.display()))]
pub fn run(layout: &Layout) -> Result<Outcome> {
    // ─── 1) inputs ───────────────────────────────────────────────────
    let config = load_config(&layout.config_path)?;
    let table = load_table(config.data_path(layout.root()))?;
    if config.strict_columns {
        table.check_arity()?;
    }

    // ─── 2) render in memory ─────────────────────────────────────────
    let doc = document::compose(&config, &table)?;
    let props = CoreProperties {
        title: config.document_title.clone(),
        creator: format!(
            "{} {}",
            config.employee.last_name, config.employee.first_name
        )
        .trim()
        .to_string(),
        created: Utc::now(),
    };
    let bytes = document::to_docx_bytes(&doc, &props)?;
    debug!(size = bytes.len(), "package rendered");

    // ─── 3) commit: number → file → counter ──────────────────────────
    let reservation = DocumentCounter::new(&layout.counter_path).reserve()?;
    let number = reservation.number();
    let path = document::write_docx(&bytes, &layout.out_dir, number)?;
    reservation.commit()?;

    info!(number, path = %path.display(), "document issued");
    Ok(Outcome { number, path })
}
