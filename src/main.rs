use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use phonevault::contacts::{self, AddOutcome, SearchOutcome};
use phonevault::journal::FileEventSink;
use phonevault::menu::{self, MenuExit};
use phonevault::{EncryptionKey, PhoneBook, PhonevaultError, Store, StoreConfig};

/// Environment variable holding the key as hex.
const KEY_ENV: &str = "PHONEVAULT_KEY";

#[derive(Parser)]
#[command(name = "phonevault")]
#[command(about = "Encrypted phone book", long_about = None)]
struct Cli {
    /// Encrypted phone book file
    #[arg(short, long, env = "PHONEVAULT_FILE", default_value = "data/phonebook.bin")]
    file: PathBuf,

    /// File containing the 16-byte key as hex. Falls back to $PHONEVAULT_KEY,
    /// then to an interactive prompt.
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// Append store events as JSON lines to this file
    #[arg(long, env = "PHONEVAULT_JOURNAL")]
    journal: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive add / search menu (default)
    Menu,

    /// Print a new random key as hex
    Keygen,

    /// Add or update a contact, then save
    Add {
        name: String,
        number: String,
    },

    /// Search contacts by name substring
    Search {
        query: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

/// 2 for a bad key, 3 for a store that will not decrypt, 1 otherwise.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<PhonevaultError>() {
        Some(PhonevaultError::InvalidKeyInput(_)) => 2,
        Some(PhonevaultError::WrongKeyOrCorruptData { .. }) => 3,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        file,
        key_file,
        journal,
        command,
    } = cli;

    let load_key = || read_key(key_file.as_ref());
    match command.unwrap_or(Commands::Menu) {
        Commands::Keygen => {
            let key = EncryptionKey::generate()?;
            println!("{}", key.to_hex().as_str());
        }
        Commands::Menu => {
            let (mut store, mut book) = open_store(file, journal.as_ref(), load_key)?;
            let stdin = io::stdin();
            let stdout = io::stdout();
            let exit = menu::run(&mut store, &mut book, &mut stdin.lock(), &mut stdout.lock())?;
            if exit == MenuExit::EndOfInput {
                eprintln!("Input closed before exit; changes were not saved.");
            }
        }
        Commands::Add { name, number } => {
            let (mut store, mut book) = open_store(file, journal.as_ref(), load_key)?;
            match contacts::add(&mut book, &name, &number)? {
                AddOutcome::Added => println!("Contact {name} added with number {number}."),
                AddOutcome::Replaced { previous } => {
                    println!("Contact {name} updated from {previous} to {number}.");
                }
            }
            store.save(&book)?;
        }
        Commands::Search { query } => {
            let (_, book) = open_store(file, journal.as_ref(), load_key)?;
            match contacts::search(&book, &query) {
                SearchOutcome::EmptyBook => println!("The phone book is empty."),
                SearchOutcome::NoHits => println!("No entries for query '{query}'"),
                SearchOutcome::Hits(hits) => {
                    println!("Found {} hits:", hits.len());
                    for hit in hits {
                        println!("- {}: {}", hit.name, hit.number);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Build the store and load its book. The key is resolved before the
/// journal or the store file is touched.
fn open_store(
    file: PathBuf,
    journal: Option<&PathBuf>,
    key: impl FnOnce() -> Result<EncryptionKey>,
) -> Result<(Store, PhoneBook)> {
    let key = key()?;
    let mut store = Store::new(StoreConfig::new(file, key));
    if let Some(path) = journal {
        let sink = FileEventSink::new(path)
            .with_context(|| format!("opening journal {}", path.display()))?;
        store.add_event_sink(Box::new(sink));
    }
    let book = store.load()?;
    Ok((store, book))
}

/// Read the key from `--key-file`, the environment, or a hidden prompt.
fn read_key(key_file: Option<&PathBuf>) -> Result<EncryptionKey> {
    let env_key = std::env::var(KEY_ENV).ok().map(Zeroizing::new);
    resolve_key(key_file, env_key, || rpassword::prompt_password("Enter key as HEX: "))
}

/// Pick the first available key source: key file, then environment, then
/// the prompt. The prompt only runs when neither of the others is set.
fn resolve_key(
    key_file: Option<&PathBuf>,
    env_key: Option<Zeroizing<String>>,
    prompt: impl FnOnce() -> io::Result<String>,
) -> Result<EncryptionKey> {
    let text = if let Some(path) = key_file {
        Zeroizing::new(
            fs::read_to_string(path)
                .with_context(|| format!("reading key file {}", path.display()))?,
        )
    } else if let Some(text) = env_key {
        text
    } else {
        Zeroizing::new(prompt().context("reading key")?)
    };
    Ok(EncryptionKey::from_hex(&text)?)
}
