//! xmlfmt -- parse XML files and write them back out re-indented.
//!
//! Each input is read through the chunked parser, any diagnostics are
//! logged to stderr, and the document is written to stdout (or `--output`)
//! with the requested indentation.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use littlexml::error::{ErrorKind, ParseError};
use littlexml::parser::{self, BufferSource, ParseOptions};
use littlexml::serial::{write_document, SerializeOptions};
use littlexml::tree::{Collection, Document};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// xmlfmt -- parse XML files and write them back out re-indented.
#[derive(Parser, Debug)]
#[command(name = "xmlfmt", version, about, long_about = None)]
struct Cli {
    /// XML files to process (use `-` for stdin).
    #[arg(required = true)]
    files: Vec<String>,

    /// Log parser progress (sets the default log level to `debug`).
    #[arg(long, short)]
    verbose: bool,

    // -- Parsing options ---------------------------------------------------
    /// Drop whitespace-only text instead of keeping it as inner text.
    #[arg(long = "no-blanks")]
    no_blanks: bool,

    /// Bytes read from the input per chunk.
    #[arg(long, value_name = "BYTES", default_value_t = 4096)]
    chunk_size: usize,

    /// Maximum element nesting depth.
    #[arg(long, value_name = "DEPTH", default_value_t = 256)]
    max_depth: u32,

    // -- Output options ----------------------------------------------------
    /// Spaces per nesting level in the output.
    #[arg(long, value_name = "SPACES", default_value_t = 2)]
    indent: usize,

    /// Do not output the result tree.
    #[arg(long)]
    noout: bool,

    /// Save output to a file instead of stdout (single input only).
    #[arg(long, short, value_name = "FILE")]
    output: Option<String>,

    /// Instead of the tree, list the top element's immediate children with
    /// this tag.
    #[arg(long, value_name = "TAG")]
    select: Option<String>,

    /// With `--select`, print only this attribute of each selected child.
    #[arg(long, value_name = "KEY", requires = "select")]
    attr: Option<String>,
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

const EXIT_SUCCESS: u8 = 0;
const EXIT_PARSE_ERROR: u8 = 1;
const EXIT_IO_ERROR: u8 = 2;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.output.is_some() && cli.files.len() > 1 {
        eprintln!("--output accepts a single input file");
        return ExitCode::from(EXIT_IO_ERROR);
    }

    let mut worst_exit: u8 = EXIT_SUCCESS;
    for file in &cli.files {
        let exit = process_file(&cli, file);
        if exit > worst_exit {
            worst_exit = exit;
        }
    }

    ExitCode::from(worst_exit)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Processes a single input file and returns an exit code.
fn process_file(cli: &Cli, filename: &str) -> u8 {
    let options = ParseOptions::default()
        .chunk_size(cli.chunk_size)
        .no_blanks(cli.no_blanks)
        .max_depth(cli.max_depth);

    // -- Parse -------------------------------------------------------------
    let doc = if filename == "-" {
        let mut buf = Vec::new();
        if let Err(e) = io::stdin().read_to_end(&mut buf) {
            eprintln!("{filename}: failed to read: {e}");
            return EXIT_IO_ERROR;
        }
        parser::load(BufferSource::new(buf), &options)
    } else {
        parser::load_path(filename, &options)
    };

    if let Some(err) = doc.error() {
        eprintln!("{filename}: {err}");
        return exit_code_for(err);
    }

    // -- Output ------------------------------------------------------------
    if let Some(tag) = &cli.select {
        print_selection(&doc, tag, cli.attr.as_deref());
        return EXIT_SUCCESS;
    }

    if cli.noout {
        return EXIT_SUCCESS;
    }

    let serial = SerializeOptions::default().indent(cli.indent);
    let written = match &cli.output {
        Some(path) => doc.write_to_path(path, cli.indent),
        None => write_document(&mut io::stdout().lock(), &doc, &serial),
    };
    if let Err(e) = written {
        let target = cli.output.as_deref().unwrap_or("stdout");
        eprintln!("{target}: failed to write: {e}");
        return EXIT_IO_ERROR;
    }

    EXIT_SUCCESS
}

/// Maps a failed load to an exit code: unreadable input is an I/O error,
/// everything else a parse error.
fn exit_code_for(err: &ParseError) -> u8 {
    match err.kind {
        ErrorKind::Io { .. } => EXIT_IO_ERROR,
        _ => EXIT_PARSE_ERROR,
    }
}

/// Prints the top element's immediate children tagged `tag`, one per line.
fn print_selection(doc: &Document, tag: &str, attr: Option<&str>) {
    let Some(top) = doc.root_element() else {
        return;
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for child in doc.children_by_tag_name(top, tag) {
        let line = match attr {
            Some(key) => doc.attribute_value(child, key).unwrap_or_default(),
            None => doc
                .attributes(child)
                .iter()
                .map(|a| format!("{}=\"{}\"", a.key, a.value))
                .collect::<Vec<_>>()
                .join(" "),
        };
        // A closed stdout (e.g. piped into `head`) just ends the listing.
        if writeln!(out, "{line}").is_err() {
            return;
        }
    }
}
