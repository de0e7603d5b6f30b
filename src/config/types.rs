// src/config/types.rs

use serde::{Deserialize, Serialize};

/// The person who signs the protocol.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Employee {
    #[serde(alias = "LastName")]
    pub last_name: String,
    #[serde(alias = "FirstName")]
    pub first_name: String,
    #[serde(alias = "MiddleName")]
    pub middle_name: String,
    #[serde(alias = "Position")]
    pub position: String,
}

/// Run parameters read from `resources/config.json`.
/// Missing keys fall back to empty values.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    #[serde(alias = "Employee")]
    pub employee: Employee,
    #[serde(alias = "DocumentTitle")]
    pub document_title: String,
    #[serde(alias = "CsvFilePath")]
    pub csv_file_path: String,
    /// Reject data rows whose cell count differs from the header.
    #[serde(alias = "StrictColumns")]
    pub strict_columns: bool,
}
