use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    str::FromStr,
};
use uuid::Uuid;

/// Identity of a [`Book`]. Assigned once, when the book is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    fn fresh() -> Self {
        BookId(Uuid::new_v4())
    }
}

impl Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BookId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(BookId)
    }
}

/// Entry in the reading list.
///
/// Equality is by identity: two books with the same title and reason are
/// still different books.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    // Documents written without identities get a new one per entry on load.
    #[serde(default = "BookId::fresh")]
    id: BookId,
    pub title: String,
    pub reason_to_read: String,
    #[serde(default)]
    pub has_been_read: bool,
}

impl Book {
    pub(crate) fn new(title: String, reason_to_read: String, has_been_read: bool) -> Self {
        Book {
            id: BookId::fresh(),
            title,
            reason_to_read,
            has_been_read,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = if self.has_been_read { 'x' } else { ' ' };
        write!(f, "[{mark}] {} -- {}", self.title, self.reason_to_read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_identity() {
        let a = Book::new("Dune".to_owned(), "recommended by a friend".to_owned(), false);
        let b = Book::new("Dune".to_owned(), "recommended by a friend".to_owned(), false);
        assert_ne!(a, b);

        let mut edited = a.clone();
        edited.title = "Dune Messiah".to_owned();
        edited.has_been_read = true;
        assert_eq!(a, edited);
    }

    #[test]
    fn id_parses_from_its_display_form() {
        let book = Book::new("Dune".to_owned(), String::new(), false);
        let parsed: BookId = book.id().to_string().parse().unwrap();
        assert_eq!(parsed, book.id());
        assert!("not-a-uuid".parse::<BookId>().is_err());
    }

    #[test]
    fn display_marks_read_books() {
        let mut book = Book::new("Dune".to_owned(), "sand".to_owned(), false);
        assert_eq!(book.to_string(), "[ ] Dune -- sand");
        book.has_been_read = true;
        assert_eq!(book.to_string(), "[x] Dune -- sand");
    }
}
