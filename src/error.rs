use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised by catalog operations.
///
/// The user-facing variants display exactly the message the menu prints.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required field was left blank when adding a book
    #[error("All fields are required.")]
    MissingField(&'static str),
    /// A book with this ISBN is already catalogued
    #[error("Book with this ISBN already exists.")]
    DuplicateIsbn(String),
    /// No book carries this ISBN
    #[error("Book not found.")]
    NotFound(String),
    /// Issue requested for a book that is already out
    #[error("Book already issued.")]
    AlreadyIssued(String),
    /// Return requested for a book that is on the shelf
    #[error("Book is not issued.")]
    NotIssued(String),
    /// A status token other than `available` or `issued`
    #[error("Unknown book status `{0}`")]
    UnknownStatus(String),
    /// The catalog file exists but could not be read
    #[error("Error loading file {}: {source}", .path.display())]
    Load {
        /// Catalog file
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },
    /// The catalog file could not be rewritten
    #[error("Error saving file {}: {source}", .path.display())]
    Save {
        /// Catalog file
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },
    /// The configuration file could not be read
    #[error("Error reading config {}: {source}", .path.display())]
    ConfigRead {
        /// Configuration file
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },
    /// The configuration file is not valid TOML for this program
    #[error("Invalid config {}: {source}", .path.display())]
    ConfigParse {
        /// Configuration file
        path: PathBuf,
        /// Parser diagnostics
        source: toml::de::Error,
    },
    /// The catalog could not be serialized as JSON
    #[error("Error exporting catalog: {0}")]
    Export(#[from] serde_json::Error),
    /// The JSON snapshot file could not be created or written
    #[error("Error writing export {}: {source}", .path.display())]
    ExportWrite {
        /// Export file
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },
    /// Reading a prompt or writing to the terminal failed
    #[error("Terminal I/O error: {0}")]
    Terminal(#[from] io::Error),
}

impl CatalogError {
    /// True when an in-memory change went through but was not written to disk.
    ///
    /// Memory and file disagree until the next successful save.
    #[must_use]
    pub fn is_unsaved_change(&self) -> bool {
        matches!(self, Self::Save { .. })
    }
}
