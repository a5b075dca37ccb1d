// command line interface

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

use crate::core::{
    Client, DEFAULT_ENDPOINT, Diagnostics, Document, FormHandler, LogLevel, SubmitEvent,
};
use crate::core::{cards, markup};
use crate::tui::{self, ThemeKind};
use crate::Error;

#[derive(Parser)]
#[command(name = "ankiform", about = "Turn text into question cards")]
struct Cli {
    /// question endpoint url
    #[arg(
        long,
        short,
        env = "ANKIFORM_ENDPOINT",
        default_value = DEFAULT_ENDPOINT,
        global = true
    )]
    endpoint: String,

    /// tui theme (detected from the terminal when omitted)
    #[arg(long, value_enum)]
    theme: Option<ThemeKind>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// submit text once and print the output markup
    Ask {
        #[command(flatten)]
        source: Source,

        /// print the rendered text instead of raw markup
        #[arg(long)]
        plain: bool,
    },

    /// submit text once and write the returned cards as csv
    Cards {
        #[command(flatten)]
        source: Source,

        /// tag column for every card
        #[arg(long, short = 'T', default_value = "")]
        tag: String,

        /// csv file to write, `-` for stdout [default: output/<timestamp>.csv]
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

/// The text to submit, given inline or read from a file.
#[derive(Args)]
struct Source {
    /// text to submit
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    text: Option<String>,

    /// read the text from a plain text file
    #[arg(long, short)]
    file: Option<PathBuf>,
}

impl Source {
    fn read(self) -> Result<String, Error> {
        match (self.text, self.file) {
            (Some(text), _) => Ok(text),
            (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
            (None, None) => Ok(String::new()),
        }
    }
}

pub async fn run() -> Result<()> {
    // a missing .env is fine, the real environment still applies
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = Client::new(&cli.endpoint)?;
    let diagnostics = Diagnostics::new();
    let page = Document::form_page();
    let handler = FormHandler::bind(&page, client, diagnostics)?;

    match cli.command {
        None => {
            let theme = cli.theme.unwrap_or_else(tui::detect_theme);
            Ok(tui::run(handler, theme).await?)
        }

        Some(Commands::Ask { source, plain }) => {
            init_tracing();
            let markup = submit_once(&handler, source.read()?).await?;
            if plain {
                println!("{}", markup::plain_text(&markup));
            } else {
                println!("{markup}");
            }
            Ok(())
        }

        Some(Commands::Cards { source, tag, out }) => {
            init_tracing();
            let markup = submit_once(&handler, source.read()?).await?;
            let found = cards::parse(&markup::plain_text(&markup));
            if found.is_empty() {
                return Err(miette::miette!("no cards in output"));
            }

            let csv = cards::to_csv(&found, &tag)?;
            match write_cards(&csv, out.as_deref(), Path::new(cards::OUTPUT_DIR))? {
                Some(path) => eprintln!("wrote {} cards to {}", found.len(), path.display()),
                None => print!("{csv}"),
            }
            Ok(())
        }
    }
}

// `None` means the caller should print to stdout
fn write_cards(
    csv: &str,
    out: Option<&Path>,
    default_dir: &Path,
) -> Result<Option<PathBuf>, Error> {
    match out {
        Some(path) if path == Path::new("-") => Ok(None),
        Some(path) => {
            std::fs::write(path, csv)?;
            Ok(Some(path.to_path_buf()))
        }
        None => cards::save(default_dir, csv).map(Some),
    }
}

// stderr logging, RUST_LOG wins over the default
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// the handler only logs failures, so compare the log before and after
async fn submit_once(handler: &FormHandler, text: String) -> Result<String> {
    handler.input().set_value(text);
    let errors_before = handler.diagnostics().count(LogLevel::Error);

    handler.submit(&mut SubmitEvent::new()).await;

    if handler.diagnostics().count(LogLevel::Error) > errors_before {
        return Err(miette::miette!("submission failed, see log above"));
    }
    Ok(handler.output().inner_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(args: &[&str]) -> Result<Source, clap::Error> {
        let argv: Vec<&str> = ["ankiform", "ask"].into_iter().chain(args.iter().copied()).collect();
        let cli = Cli::try_parse_from(argv)?;
        match cli.command {
            Some(Commands::Ask { source, .. }) => Ok(source),
            _ => unreachable!(),
        }
    }

    #[test]
    fn text_or_file_but_not_both() {
        assert!(source(&["some text"]).is_ok());
        assert!(source(&["--file", "notes.txt"]).is_ok());
        assert!(source(&["some text", "--file", "notes.txt"]).is_err());
        assert!(source(&[]).is_err());
    }

    #[test]
    fn file_source_reads_the_whole_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "line one\nline two\n").unwrap();

        let text = source(&["-f", path.to_str().unwrap()]).unwrap().read().unwrap();
        assert_eq!(text, "line one\nline two\n");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = source(&["--file", "/nonexistent/notes.txt"])
            .unwrap()
            .read()
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn cards_default_to_the_output_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("output");

        let path = write_cards("a,b,\n", None, &dir).unwrap().unwrap();
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a,b,\n");

        let named = tmp.path().join("deck.csv");
        assert_eq!(
            write_cards("a,b,\n", Some(&named), &dir).unwrap(),
            Some(named.clone())
        );
        assert!(named.exists());

        assert_eq!(write_cards("a,b,\n", Some(Path::new("-")), &dir).unwrap(), None);
    }
}
