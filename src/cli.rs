//! Interactive numbered menu over an [`Inventory`].
//!
//! The menu reads one line per prompt from any `BufRead` and prints to any
//! `Write`, so a whole session can be scripted.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::{
    book::Book,
    error::CatalogError,
    inventory::{Inventory, Listing},
};

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuChoice {
    /// Catalogue a new book
    AddBook,
    /// Lend a book out
    IssueBook,
    /// Take a book back
    ReturnBook,
    /// Print the whole catalog
    ViewAll,
    /// Open the search sub-menu
    Search,
    /// Leave the program
    Exit,
}

impl MenuChoice {
    /// Every entry in display order
    pub const ALL: [Self; 6] =
        [Self::AddBook, Self::IssueBook, Self::ReturnBook, Self::ViewAll, Self::Search, Self::Exit];

    /// Parse the text typed at the main prompt
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.key() == input.trim())
    }

    /// The number the user types for this entry
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::AddBook => "1",
            Self::IssueBook => "2",
            Self::ReturnBook => "3",
            Self::ViewAll => "4",
            Self::Search => "5",
            Self::Exit => "6",
        }
    }

    /// Menu label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AddBook => "Add Book",
            Self::IssueBook => "Issue Book",
            Self::ReturnBook => "Return Book",
            Self::ViewAll => "View All Books",
            Self::Search => "Search",
            Self::Exit => "Exit",
        }
    }
}

/// Entries of the search sub-menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchChoice {
    /// Case-insensitive title substring
    Title,
    /// Exact ISBN
    Isbn,
}

impl SearchChoice {
    /// Parse the text typed at the search prompt
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Title),
            "2" => Some(Self::Isbn),
            _ => None,
        }
    }
}

/// Check the fields of a book about to be added.
///
/// # Errors
///
/// - `CatalogError::MissingField` if any field is blank
/// - `CatalogError::DuplicateIsbn` if the inventory already holds the ISBN
pub fn new_book(
    inventory: &Inventory,
    title: &str,
    author: &str,
    isbn: &str,
) -> Result<Book, CatalogError> {
    for (field, value) in [("title", title), ("author", author), ("isbn", isbn)] {
        if value.trim().is_empty() {
            return Err(CatalogError::MissingField(field));
        }
    }
    if inventory.search_by_isbn(isbn).is_some() {
        return Err(CatalogError::DuplicateIsbn(isbn.to_string()));
    }
    Ok(Book::new(title, author, isbn))
}

/// Signature shared by [`Inventory::issue`] and [`Inventory::return_book`]
type StatusAction = fn(&mut Inventory, &str) -> Result<(), CatalogError>;

/// Menu session bound to one inventory
#[derive(Debug)]
pub struct Menu<'a, R, W> {
    /// Store the menu operates on
    inventory: &'a mut Inventory,
    /// Line source for prompts
    input: R,
    /// Destination for everything printed
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    /// Create a session reading from `input` and printing to `output`
    pub fn new(inventory: &'a mut Inventory, input: R, output: W) -> Self {
        Self { inventory, input, output }
    }

    /// Loop over the main menu until Exit is chosen or input runs out.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Enter your choice (1-6): ")? else {
                writeln!(self.output)?;
                break;
            };

            match MenuChoice::parse(&choice) {
                Some(MenuChoice::AddBook) => self.add_book()?,
                Some(MenuChoice::IssueBook) => {
                    self.change_status("Enter ISBN to issue: ", Inventory::issue, "Book issued.")?;
                }
                Some(MenuChoice::ReturnBook) => {
                    self.change_status(
                        "Enter ISBN to return: ",
                        Inventory::return_book,
                        "Book returned.",
                    )?;
                }
                Some(MenuChoice::ViewAll) => self.view_all()?,
                Some(MenuChoice::Search) => self.search()?,
                Some(MenuChoice::Exit) => break,
                None => self.refuse("Invalid choice.")?,
            }
        }

        writeln!(self.output, "Goodbye.")?;
        self.output.flush()
    }

    /// Print the numbered main menu
    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "--- Library Menu ---".bold())?;
        for choice in MenuChoice::ALL {
            writeln!(self.output, "{}. {}", choice.key(), choice.label())?;
        }
        Ok(())
    }

    /// Print `label`, then read one trimmed line. `None` means end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Print a success message
    fn confirm(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.green())
    }

    /// Print a refusal or error message
    fn refuse(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.red())
    }

    /// Report the outcome of a mutation.
    ///
    /// An unsaved change still happened in memory, so the save error is shown
    /// followed by the normal confirmation.
    fn report(&mut self, result: Result<(), CatalogError>, done: &str) -> io::Result<()> {
        match result {
            Ok(()) => self.confirm(done),
            Err(e) if e.is_unsaved_change() => {
                self.refuse(&e.to_string())?;
                self.confirm(done)
            }
            Err(e) => self.refuse(&e.to_string()),
        }
    }

    /// Prompt for the three fields and add the book
    fn add_book(&mut self) -> io::Result<()> {
        let Some(title) = self.prompt("Enter title: ")? else { return Ok(()) };
        let Some(author) = self.prompt("Enter author: ")? else { return Ok(()) };
        let Some(isbn) = self.prompt("Enter ISBN: ")? else { return Ok(()) };

        let result = new_book(&*self.inventory, &title, &author, &isbn)
            .and_then(|book| self.inventory.add(book));
        self.report(result, "Book added.")
    }

    /// Prompt for an ISBN and apply an issue or return
    fn change_status(&mut self, label: &str, action: StatusAction, done: &str) -> io::Result<()> {
        let Some(isbn) = self.prompt(label)? else { return Ok(()) };
        let result = action(&mut *self.inventory, &isbn);
        self.report(result, done)
    }

    /// Print every book, or a note that there are none
    fn view_all(&mut self) -> io::Result<()> {
        match self.inventory.list_all() {
            Listing::Empty => writeln!(self.output, "{}", "No books in library.".yellow()),
            Listing::Books(books) => {
                for book in books {
                    writeln!(self.output, "{book}")?;
                }
                Ok(())
            }
        }
    }

    /// Run the search sub-menu
    fn search(&mut self) -> io::Result<()> {
        writeln!(self.output, "1. Search by title")?;
        writeln!(self.output, "2. Search by ISBN")?;
        let Some(choice) = self.prompt("Enter choice: ")? else { return Ok(()) };

        match SearchChoice::parse(&choice) {
            Some(SearchChoice::Title) => {
                let Some(title) = self.prompt("Enter title: ")? else { return Ok(()) };
                let results = self.inventory.search_by_title(&title);
                if results.is_empty() {
                    writeln!(self.output, "{}", "No books found.".yellow())?;
                }
                for book in results {
                    writeln!(self.output, "{book}")?;
                }
                Ok(())
            }
            Some(SearchChoice::Isbn) => {
                let Some(isbn) = self.prompt("Enter ISBN: ")? else { return Ok(()) };
                match self.inventory.search_by_isbn(&isbn) {
                    Some(book) => writeln!(self.output, "{book}"),
                    None => writeln!(self.output, "{}", "No book found.".yellow()),
                }
            }
            None => self.refuse("Invalid choice."),
        }
    }
}
