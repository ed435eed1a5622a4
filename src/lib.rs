//! Personal library catalog backed by a flat text file.
//!
//! This crate keeps an insertion-ordered list of books in memory, mirrors it
//! to a pipe-delimited file after every change, and drives an interactive
//! menu for adding, issuing, returning and searching books.

pub mod book;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod inventory;
pub mod logging;
pub mod observers;
pub mod persistence;

pub use book::{Book, BookStatus};
pub use cli::Menu;
pub use config::CatalogConfig;
pub use error::CatalogError;
pub use events::InventoryChange;
pub use inventory::{Inventory, Listing, LoadSummary};
pub use persistence::SaveMode;
