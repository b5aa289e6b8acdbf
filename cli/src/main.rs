use clap::{Parser, Subcommand};
use reading_list::{Book, BookId, ReadingListStore};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
struct Args {
    /// Path of the reading-list document.
    /// If unspecified (default), use ReadingList.plist in the documents directory.
    #[arg(long, short = 'f', env = "READING_LIST_FILE")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the books on the list.
    List {
        /// Only books that have been read.
        #[arg(long, conflicts_with = "unread")]
        read: bool,
        /// Only books that have not been read yet.
        #[arg(long)]
        unread: bool,
    },
    /// Add a book to the end of the list.
    Add {
        title: String,
        reason: String,
        /// Mark the book as already read.
        #[arg(long)]
        read: bool,
    },
    /// Remove a book.
    Remove { id: BookId },
    /// Flip a book between read and unread.
    Toggle { id: BookId },
    /// Change a book's title or reason to read.
    Edit {
        id: BookId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        reason: Option<String>,
    },
}

fn print_books<'a>(books: impl Iterator<Item = &'a Book>) {
    for book in books {
        println!("{}  {book}", book.id());
    }
}

fn lookup(store: &ReadingListStore, id: BookId) -> Result<Book, ExitCode> {
    store.get(id).cloned().ok_or_else(|| {
        eprintln!("no book with id {id}");
        ExitCode::FAILURE
    })
}

fn run(store: &mut ReadingListStore, command: Command) -> Result<(), ExitCode> {
    match command {
        Command::List { read: true, .. } => print_books(store.read_books()),
        Command::List { unread: true, .. } => print_books(store.unread_books()),
        Command::List { .. } => print_books(store.books().iter()),
        Command::Add {
            title,
            reason,
            read,
        } => {
            let book = store.create(title, reason, read);
            println!("{}", book.id());
        }
        Command::Remove { id } => {
            let book = lookup(store, id)?;
            store.delete(&book);
        }
        Command::Toggle { id } => {
            let book = lookup(store, id)?;
            store.toggle_read(&book);
        }
        Command::Edit { id, title, reason } => {
            let mut book = lookup(store, id)?;
            if let Some(title) = title {
                book.title = title;
            }
            if let Some(reason) = reason {
                book.reason_to_read = reason;
            }
            store.update_details(&book);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let args: Args = Args::parse();

    let mut store = match args.file {
        Some(path) => {
            tracing::debug!("using reading list at {}", path.display());
            ReadingListStore::at(path)
        }
        None => ReadingListStore::open(),
    };

    match run(&mut store, args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}
