//! Protocol document generator: reads a JSON config and a CSV file and
//! writes a numbered `.docx` protocol with a title, a table and a signature.

pub mod config;
pub mod counter;
pub mod document;
pub mod error;
pub mod run;
pub mod table;
pub mod utils;

pub use error::AppError;
pub use run::{run, Layout, Outcome};
