//! Interactive console menu.
//!
//! Reads choices from any `BufRead` and writes prompts to any `Write`, so the
//! loop can be driven from a terminal or from a test.

use std::io::{self, BufRead, Write};

use crate::codec::PhoneBook;
use crate::contacts::{self, AddOutcome, SearchOutcome};
use crate::error::PhonevaultError;
use crate::store::Store;

/// How the menu loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// The user chose exit and the book was saved.
    Saved,
    /// Input ended before the user chose exit. Nothing was saved.
    EndOfInput,
}

/// Run the add / search / exit loop until the user exits or input ends.
///
/// A failed save on exit is reported and the loop continues with the book
/// still in memory, so the user can retry.
pub fn run<R: BufRead, W: Write>(
    store: &mut Store,
    book: &mut PhoneBook,
    input: &mut R,
    output: &mut W,
) -> io::Result<MenuExit> {
    writeln!(output, "Found {} contacts.", book.len())?;

    loop {
        writeln!(output)?;
        writeln!(output, "Phone Book Menu:")?;
        writeln!(output, "1. Add Contact")?;
        writeln!(output, "2. Search Contact")?;
        writeln!(output, "3. Exit")?;

        let Some(choice) = prompt(input, output, "Enter your choice (1/2/3): ")? else {
            return Ok(MenuExit::EndOfInput);
        };

        match choice.as_str() {
            "1" => {
                let Some(name) = prompt(input, output, "Enter contact name: ")? else {
                    return Ok(MenuExit::EndOfInput);
                };
                let Some(number) = prompt(input, output, "Enter contact number: ")? else {
                    return Ok(MenuExit::EndOfInput);
                };
                match contacts::add(book, &name, &number) {
                    Ok(AddOutcome::Added) => {
                        writeln!(output, "Contact {name} added with number {number}.")?;
                    }
                    Ok(AddOutcome::Replaced { previous }) => {
                        writeln!(output, "Contact {name} updated from {previous} to {number}.")?;
                    }
                    Err(err) => writeln!(output, "Could not add contact: {err}.")?,
                }
            }
            "2" => {
                let Some(query) = prompt(input, output, "Enter contact name to search: ")? else {
                    return Ok(MenuExit::EndOfInput);
                };
                write_search(output, &query, &contacts::search(book, &query))?;
            }
            "3" => match store.save(book) {
                Ok(()) => {
                    writeln!(output, "Phone book saved. Goodbye!")?;
                    return Ok(MenuExit::Saved);
                }
                Err(err) => {
                    writeln!(output, "Could not save phone book: {}.", describe(&err))?;
                    writeln!(output, "Your contacts are still in memory; choose 3 to retry.")?;
                }
            },
            _ => writeln!(output, "Invalid choice. Please enter 1, 2, or 3.")?,
        }
    }
}

fn write_search<W: Write>(
    output: &mut W,
    query: &str,
    outcome: &SearchOutcome<'_>,
) -> io::Result<()> {
    match outcome {
        SearchOutcome::EmptyBook => writeln!(output, "The phone book is empty."),
        SearchOutcome::NoHits => writeln!(output, "No entries for query '{query}'"),
        SearchOutcome::Hits(hits) => {
            writeln!(output, "Found {} hits:", hits.len())?;
            for hit in hits {
                writeln!(output, "- {}: {}", hit.name, hit.number)?;
            }
            Ok(())
        }
    }
}

/// Print `message` and read one line. `None` at end of input.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the
/// session, so unsaved contacts survive a stray byte on the terminal.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<Option<String>> {
    write!(output, "{message}")?;
    output.flush()?;
    let mut line = Vec::new();
    if input.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    let text = String::from_utf8_lossy(&line);
    Ok(Some(text.trim_end_matches(['\r', '\n']).to_string()))
}

/// Error text including the underlying cause, e.g. the OS error for `Io`.
fn describe(err: &PhonevaultError) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}
