use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::{
    book::{Book, BookStatus},
    error::CatalogError,
    events::InventoryChange,
    observers::InventoryObserver,
    persistence::{self, SaveMode},
};

/// Default catalog file name
pub const DEFAULT_FILE: &str = "books.txt";

/// Result of listing the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing<'a> {
    /// The catalog holds no books
    Empty,
    /// Every book in insertion order
    Books(&'a [Book]),
}

/// Outcome of a successful load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records now held in memory
    pub loaded: usize,
    /// Malformed lines that were dropped
    pub skipped: usize,
}

/// Insertion-ordered book store mirrored to a text file.
///
/// Every mutation rewrites the whole file. When a rewrite fails the
/// in-memory change is kept and the file lags behind until the next
/// successful save.
pub struct Inventory {
    /// Books in insertion order
    books: Vec<Book>,
    /// Backing catalog file
    path: PathBuf,
    /// How the file is replaced on save
    save_mode: SaveMode,
    /// Registered change observers
    observers: Vec<Box<dyn InventoryObserver>>,
}

// Manual implementation of Debug for Inventory
impl fmt::Debug for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inventory")
            .field("books", &self.books)
            .field("path", &self.path)
            .field("save_mode", &self.save_mode)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Inventory {
    /// Create an empty inventory bound to `path`. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            books: Vec::new(),
            path: path.into(),
            save_mode: SaveMode::default(),
            observers: Vec::new(),
        }
    }

    /// Choose how the backing file is replaced on save
    #[must_use]
    pub fn with_save_mode(mut self, save_mode: SaveMode) -> Self {
        self.save_mode = save_mode;
        self
    }

    /// Register an observer to be notified of changes
    pub fn register_observer(&mut self, observer: Box<dyn InventoryObserver>) {
        self.observers.push(observer);
    }

    /// Backing catalog file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of books held
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the catalog holds no books
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Replace the in-memory list with the contents of the backing file.
    ///
    /// A missing file is an empty catalog. Malformed lines are dropped
    /// silently and only counted in the summary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Load` if the file exists but cannot be read.
    /// The in-memory list is left empty in that case.
    pub fn load(&mut self) -> Result<LoadSummary, CatalogError> {
        match persistence::read_records(&self.path) {
            Ok(decoded) => {
                self.books = decoded.books;
                info!(path = %self.path.display(), loaded = self.books.len(), skipped = decoded.skipped, "catalog loaded");
                Ok(LoadSummary { loaded: self.books.len(), skipped: decoded.skipped })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.books.clear();
                info!(path = %self.path.display(), "no catalog file yet, starting empty");
                Ok(LoadSummary::default())
            }
            Err(source) => {
                self.books.clear();
                warn!(path = %self.path.display(), error = %source, "failed to load catalog");
                Err(CatalogError::Load { path: self.path.clone(), source })
            }
        }
    }

    /// Rewrite the backing file from the in-memory list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Save` if the file cannot be written.
    pub fn save(&self) -> Result<(), CatalogError> {
        persistence::write_records(&self.path, &self.books, self.save_mode).map_err(|source| {
            warn!(path = %self.path.display(), error = %source, "failed to save catalog");
            CatalogError::Save { path: self.path.clone(), source }
        })
    }

    /// Append a book and rewrite the file.
    ///
    /// ISBN uniqueness is not checked here; callers that care should use
    /// [`Inventory::search_by_isbn`] first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Save` if the rewrite fails. The book stays in
    /// memory regardless.
    pub fn add(&mut self, book: Book) -> Result<(), CatalogError> {
        let change = InventoryChange::Added { isbn: book.isbn().to_string() };
        self.books.push(book);
        self.notify(&change);
        self.save()
    }

    /// All books whose title contains `needle`, ignoring case, in insertion order.
    ///
    /// An empty needle matches every book.
    #[must_use]
    pub fn search_by_title(&self, needle: &str) -> Vec<&Book> {
        let needle = needle.to_lowercase();
        self.books.iter().filter(|book| book.title().to_lowercase().contains(&needle)).collect()
    }

    /// The first book whose ISBN equals `isbn` exactly
    #[must_use]
    pub fn search_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn() == isbn)
    }

    /// Every book, or `Listing::Empty` when there are none
    #[must_use]
    pub fn list_all(&self) -> Listing<'_> {
        if self.books.is_empty() { Listing::Empty } else { Listing::Books(&self.books) }
    }

    /// Mark the book with `isbn` as issued and rewrite the file.
    ///
    /// # Errors
    ///
    /// - `CatalogError::NotFound` if no book has this ISBN
    /// - `CatalogError::AlreadyIssued` if the book is already out
    /// - `CatalogError::Save` if the rewrite fails after the status changed
    pub fn issue(&mut self, isbn: &str) -> Result<(), CatalogError> {
        self.transition(isbn, BookStatus::Issued)
    }

    /// Mark the book with `isbn` as available and rewrite the file.
    ///
    /// # Errors
    ///
    /// - `CatalogError::NotFound` if no book has this ISBN
    /// - `CatalogError::NotIssued` if the book is already on the shelf
    /// - `CatalogError::Save` if the rewrite fails after the status changed
    pub fn return_book(&mut self, isbn: &str) -> Result<(), CatalogError> {
        self.transition(isbn, BookStatus::Available)
    }

    /// Write every record as a pretty-printed JSON array
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Export` if serialization or the write fails.
    pub fn export_json<W: Write>(&self, writer: &mut W) -> Result<(), CatalogError> {
        serde_json::to_writer_pretty(writer, &self.books)?;
        Ok(())
    }

    /// Write a JSON snapshot of the catalog to `path`, replacing any file there
    ///
    /// # Errors
    ///
    /// - `CatalogError::ExportWrite` if the file cannot be created or flushed
    /// - `CatalogError::Export` if serialization fails
    pub fn export_to_file(&self, path: &Path) -> Result<(), CatalogError> {
        let export_write =
            |source: io::Error| CatalogError::ExportWrite { path: path.to_path_buf(), source };

        let mut writer = BufWriter::new(File::create(path).map_err(export_write)?);
        self.export_json(&mut writer)?;
        writeln!(writer).map_err(export_write)?;
        writer.flush().map_err(export_write)?;

        info!(path = %path.display(), records = self.books.len(), "catalog exported");
        Ok(())
    }

    /// Move the first book with `isbn` to `target`, refusing no-op transitions
    fn transition(&mut self, isbn: &str, target: BookStatus) -> Result<(), CatalogError> {
        let Some(book) = self.books.iter_mut().find(|book| book.isbn() == isbn) else {
            return Err(CatalogError::NotFound(isbn.to_string()));
        };

        if book.status() == target {
            return Err(match target {
                BookStatus::Issued => CatalogError::AlreadyIssued(isbn.to_string()),
                BookStatus::Available => CatalogError::NotIssued(isbn.to_string()),
            });
        }

        book.set_status(target);
        let change = match target {
            BookStatus::Issued => InventoryChange::Issued { isbn: isbn.to_string() },
            BookStatus::Available => InventoryChange::Returned { isbn: isbn.to_string() },
        };
        self.notify(&change);
        self.save()
    }

    /// Tell every observer about a change
    fn notify(&self, change: &InventoryChange) {
        for observer in &self.observers {
            observer.on_change(change);
        }
    }
}
