//! Line codec and whole-file storage for the catalog.
//!
//! One record per line, four fields separated by `|`:
//!
//! ```text
//! title|author|isbn|status
//! ```
//!
//! Fields are written verbatim. A field containing `|` or a newline will not
//! survive a reload: the line splits into the wrong number of fields and is
//! dropped, and an embedded newline also breaks the record that follows.

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::book::{Book, BookStatus};

/// Field separator used in the catalog file
pub const DELIMITER: char = '|';

/// How the catalog file is replaced on save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveMode {
    /// Write a temporary file next to the target, then rename it over the target
    Atomic,
    /// Truncate the target and write it in place
    #[default]
    Overwrite,
}

/// Records read back from a catalog file
#[derive(Debug, Default)]
pub struct Decoded {
    /// Well-formed records in file order
    pub books: Vec<Book>,
    /// Non-blank lines that could not be parsed
    pub skipped: usize,
}

/// Render a book as a single catalog line, without the trailing newline
#[must_use]
pub fn encode(book: &Book) -> String {
    format!(
        "{title}{DELIMITER}{author}{DELIMITER}{isbn}{DELIMITER}{status}",
        title = book.title(),
        author = book.author(),
        isbn = book.isbn(),
        status = book.status(),
    )
}

/// Parse one catalog line.
///
/// Returns `None` for blank lines and lines that do not have exactly four
/// fields. The status token is read leniently, see
/// [`BookStatus::from_record_token`].
#[must_use]
pub fn decode(line: &str) -> Option<Book> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let [title, author, isbn, status] = fields.as_slice() else {
        return None;
    };
    if status.parse::<BookStatus>().is_err() {
        debug!(isbn = *isbn, token = *status, "non-standard status token");
    }

    Some(Book::with_status(title, author, isbn, BookStatus::from_record_token(status)))
}

/// Read every record from `path`.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be read, including
/// `NotFound` when it does not exist. Callers decide how to treat that.
pub fn read_records(path: &Path) -> io::Result<Decoded> {
    let contents = fs::read_to_string(path)?;
    let mut decoded = Decoded::default();

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode(line) {
            Some(book) => decoded.books.push(book),
            None => {
                decoded.skipped = decoded.skipped.saturating_add(1);
                debug!(path = %path.display(), line = idx.saturating_add(1), "skipping malformed record");
            }
        }
    }

    Ok(decoded)
}

/// Write one line per book to `writer`
fn write_lines<W: Write>(writer: W, books: &[Book]) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    for book in books {
        writeln!(writer, "{}", encode(book))?;
    }
    writer.flush()
}

/// Replace the contents of `path` with `books`.
///
/// # Errors
///
/// Returns the underlying I/O error if the file (or, in atomic mode, the
/// temporary file beside it) cannot be created, written or renamed.
pub fn write_records(path: &Path, books: &[Book], mode: SaveMode) -> io::Result<()> {
    match mode {
        SaveMode::Atomic => {
            // Replace the file a symlink points at, not the link itself
            let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

            // A first save creates the file so it gets the usual umask mode
            if !target.exists() {
                fs::File::create(&target)?;
            }

            let dir = target
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));

            let mut tmp = NamedTempFile::new_in(dir)?;
            write_lines(&mut tmp, books)?;
            tmp.as_file().sync_all()?;
            tmp.as_file().set_permissions(fs::metadata(&target)?.permissions())?;

            tmp.persist(&target).map_err(|e| e.error)?;
        }
        SaveMode::Overwrite => {
            let file = fs::File::create(path)?;
            write_lines(file, books)?;
        }
    }

    debug!(path = %path.display(), records = books.len(), "catalog written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_encode_line() {
        let book = Book::new("Dune", "Frank Herbert", "111");
        assert_eq!(encode(&book), "Dune|Frank Herbert|111|available");
    }

    #[test]
    fn test_decode_line() {
        let book = decode("  Emma|Jane Austen|222|issued \n");
        assert_eq!(book, Some(Book::with_status("Emma", "Jane Austen", "222", BookStatus::Issued)));
    }

    #[test]
    fn test_decode_rejects_wrong_field_count() {
        assert_eq!(decode("Emma|Jane Austen|222"), None);
        assert_eq!(decode("Emma|Jane|Austen|222|available"), None);
        assert_eq!(decode("   "), None);
    }

    #[test]
    fn test_decode_keeps_non_standard_status() {
        let issued = Book::with_status("Emma", "Jane Austen", "222", BookStatus::Issued);
        assert_eq!(decode("Emma|Jane Austen|222|Issued"), Some(issued));

        let available = Book::new("Emma", "Jane Austen", "222");
        assert_eq!(decode("Emma|Jane Austen|222|lost"), Some(available));
    }

    #[test]
    fn test_read_counts_skipped_lines() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("books.txt");
        fs::write(&path, "A|a|1|available\n\nbroken line\nB|b|2|issued\n\n")?;

        let decoded = read_records(&path)?;
        assert_eq!(decoded.books.len(), 2);
        // Blank lines are not counted as malformed
        assert_eq!(decoded.skipped, 1);
        Ok(())
    }

    #[test]
    fn test_read_missing_file_is_not_found() -> io::Result<()> {
        let dir = tempdir()?;
        let result = read_records(&dir.path().join("absent.txt"));
        assert!(matches!(result, Err(ref e) if e.kind() == io::ErrorKind::NotFound));
        Ok(())
    }

    #[test]
    fn test_write_modes_produce_same_file() -> io::Result<()> {
        let dir = tempdir()?;
        let books = vec![
            Book::new("Dune", "Frank Herbert", "111"),
            Book::with_status("Emma", "Jane Austen", "222", BookStatus::Issued),
        ];
        let expected = "Dune|Frank Herbert|111|available\nEmma|Jane Austen|222|issued\n";

        let atomic = dir.path().join("atomic.txt");
        write_records(&atomic, &books, SaveMode::Atomic)?;
        assert_eq!(fs::read_to_string(&atomic)?, expected);

        let overwrite = dir.path().join("overwrite.txt");
        fs::write(&overwrite, "stale contents that are longer than the new file\n".repeat(10))?;
        write_records(&overwrite, &books, SaveMode::Overwrite)?;
        assert_eq!(fs::read_to_string(&overwrite)?, expected);
        Ok(())
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("books.txt");
        write_records(&path, &[Book::new("Dune", "Frank Herbert", "111")], SaveMode::Atomic)?;
        write_records(&path, &[], SaveMode::Atomic)?;

        let entries = fs::read_dir(dir.path())?.count();
        assert_eq!(entries, 1);
        assert_eq!(fs::read_to_string(&path)?, "");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_first_save_uses_default_mode() -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let reference = dir.path().join("reference.txt");
        fs::File::create(&reference)?;

        let path = dir.path().join("books.txt");
        write_records(&path, &[Book::new("Dune", "Frank Herbert", "111")], SaveMode::Atomic)?;

        let mode = |p: &Path| fs::metadata(p).map(|meta| meta.permissions().mode() & 0o777);
        assert_eq!(mode(&path)?, mode(&reference)?);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_save_follows_symlink() -> io::Result<()> {
        let dir = tempdir()?;
        let real = dir.path().join("real.txt");
        fs::write(&real, "")?;
        let link = dir.path().join("books.txt");
        std::os::unix::fs::symlink(&real, &link)?;

        write_records(&link, &[Book::new("Dune", "Frank Herbert", "111")], SaveMode::Atomic)?;

        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real)?, "Dune|Frank Herbert|111|available\n");
        Ok(())
    }

    #[test]
    fn test_default_mode_rewrites_in_place() {
        assert_eq!(SaveMode::default(), SaveMode::Overwrite);
    }

    #[test]
    fn test_write_into_missing_directory_fails() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("no-such-dir").join("books.txt");
        assert!(write_records(&path, &[], SaveMode::Atomic).is_err());
        assert!(write_records(&path, &[], SaveMode::Overwrite).is_err());
        Ok(())
    }
}
