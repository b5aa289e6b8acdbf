use std::{
    collections::HashSet,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

mod book;

pub use book::{Book, BookId};

/// Name of the reading-list document within the documents directory.
pub const FILE_NAME: &str = "ReadingList.plist";

#[derive(Error, Debug)]
#[error("error in persisting reading list at {path}: {kind}")]
pub struct StoreError {
    path: PathBuf,
    #[source]
    kind: StoreErrorKind,
}

impl StoreError {
    fn new(path: &Path, kind: StoreErrorKind) -> Self {
        StoreError {
            path: path.to_owned(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> &StoreErrorKind {
        &self.kind
    }
}

#[derive(Error, Debug)]
pub enum StoreErrorKind {
    #[error("I/O error reading document: {0}")]
    Read(std::io::Error),
    #[error("I/O error writing document: {0}")]
    Write(std::io::Error),
    #[error("I/O error creating directory: {0}")]
    CreateDir(std::io::Error),
    #[error("error decoding property list: {0}")]
    Decode(plist::Error),
    #[error("error encoding property list: {0}")]
    Encode(plist::Error),
}

/// Default location of the document: `ReadingList.plist` in the user's
/// documents directory, if the platform has one.
pub fn default_path() -> Option<PathBuf> {
    dirs::document_dir().map(|dir| dir.join(FILE_NAME))
}

/// The reading list: an ordered list of books, mirrored to a property-list
/// document after every change.
///
/// Persistence is best-effort. A failed save or load is logged and the
/// in-memory list stays authoritative; none of the mutating operations
/// report an error.
#[derive(Debug)]
pub struct ReadingListStore {
    books: Vec<Book>,
    path: Option<PathBuf>,
}

impl ReadingListStore {
    /// Open the store at [`default_path`].
    /// If no documents directory is available, the store is kept in memory only.
    pub fn open() -> Self {
        match default_path() {
            Some(path) => Self::at(path),
            None => {
                tracing::warn!("no documents directory available; reading list will not be saved");
                Self::in_memory()
            }
        }
    }

    /// Open the store backed by the document at `path`, loading it if it exists.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let mut store = ReadingListStore {
            books: Vec::new(),
            path: Some(path.into()),
        };
        store.load();
        store
    }

    /// A store with no backing document.
    pub fn in_memory() -> Self {
        ReadingListStore {
            books: Vec::new(),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All books, in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn read_books(&self) -> impl Iterator<Item = &Book> + '_ {
        self.books.iter().filter(|book| book.has_been_read)
    }

    pub fn unread_books(&self) -> impl Iterator<Item = &Book> + '_ {
        self.books.iter().filter(|book| !book.has_been_read)
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id() == id)
    }

    fn position(&self, book: &Book) -> Option<usize> {
        self.books.iter().position(|b| b == book)
    }

    /// Add a new book to the end of the list and save.
    /// Returns a copy of the stored book.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        reason_to_read: impl Into<String>,
        has_been_read: bool,
    ) -> Book {
        let book = Book::new(title.into(), reason_to_read.into(), has_been_read);
        self.books.push(book.clone());
        self.save();
        book
    }

    /// Remove the book with the same identity, if present, and save.
    pub fn delete(&mut self, book: &Book) {
        let Some(index) = self.position(book) else {
            return;
        };
        self.books.remove(index);
        self.save();
    }

    /// Flip the read flag of the book with the same identity, if present, and save.
    pub fn toggle_read(&mut self, book: &Book) {
        let Some(index) = self.position(book) else {
            return;
        };
        let stored = &mut self.books[index];
        stored.has_been_read = !stored.has_been_read;
        self.save();
    }

    /// Copy the title and reason of `book` onto the stored book with the same
    /// identity, if present, and save. The read flag is left alone.
    pub fn update_details(&mut self, book: &Book) {
        let Some(index) = self.position(book) else {
            return;
        };
        let stored = &mut self.books[index];
        stored.title.clone_from(&book.title);
        stored.reason_to_read.clone_from(&book.reason_to_read);
        self.save();
    }

    /// Write the whole list to the backing document, logging any failure.
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            tracing::error!("{e}");
        }
    }

    /// Replace the list with the contents of the backing document, logging
    /// any failure. On failure the list is unchanged.
    pub fn load(&mut self) {
        if let Err(e) = self.try_load() {
            tracing::error!("{e}");
        }
    }

    /// Write the whole list to the backing document, replacing it.
    /// A store without a backing document does nothing.
    pub fn try_save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut encoded = Vec::new();
        plist::to_writer_binary(&mut encoded, &self.books)
            .map_err(|e| StoreError::new(path, StoreErrorKind::Encode(e)))?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| StoreError::new(path, StoreErrorKind::CreateDir(e)))?;
        }
        fs::write(path, encoded).map_err(|e| StoreError::new(path, StoreErrorKind::Write(e)))?;
        tracing::debug!("saved {} books to {}", self.books.len(), path.display());
        Ok(())
    }

    /// Replace the list with the contents of the backing document.
    /// A missing document, or a store without one, leaves the list as it is.
    pub fn try_load(&mut self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let encoded = match fs::read(path) {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no reading list at {}", path.display());
                return Ok(());
            }
            Err(e) => return Err(StoreError::new(path, StoreErrorKind::Read(e))),
        };
        let books: Vec<Book> = plist::from_bytes(&encoded)
            .map_err(|e| StoreError::new(path, StoreErrorKind::Decode(e)))?;

        let mut seen = HashSet::new();
        self.books = books
            .into_iter()
            .filter(|book| {
                let fresh = seen.insert(book.id());
                if !fresh {
                    tracing::warn!("dropping duplicate entry {} from {}", book.id(), path.display());
                }
                fresh
            })
            .collect();
        tracing::debug!("loaded {} books from {}", self.books.len(), path.display());
        Ok(())
    }
}
