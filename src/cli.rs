// File: ./src/cli.rs
//! Command-line argument handling and help text.
use anyhow::{Result, bail};
use chrono::NaiveDate;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Extract {
        file: PathBuf,
        today: Option<NaiveDate>,
    },
    Parse {
        file: PathBuf,
    },
    Ask {
        file: PathBuf,
        question: String,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub root: Option<PathBuf>,
    pub verbose: bool,
}

/// Parses everything after the binary name. Global flags may appear anywhere.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut root = None;
    let mut verbose = false;
    let mut today = None;
    let mut positional: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => {
                return Ok(CliArgs {
                    command: Command::Help,
                    root,
                    verbose,
                });
            }
            "-r" | "--root" => {
                let Some(path) = iter.next() else {
                    bail!("{} requires a path", arg);
                };
                root = Some(PathBuf::from(path));
            }
            "-v" | "--verbose" => verbose = true,
            "--today" => {
                let Some(raw) = iter.next() else {
                    bail!("--today requires a date (YYYY-MM-DD)");
                };
                let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") else {
                    bail!("Invalid --today date '{}', expected YYYY-MM-DD", raw);
                };
                today = Some(date);
            }
            other => positional.push(other),
        }
    }

    let command = match positional.as_slice() {
        [] => Command::Help,
        ["extract", file] => Command::Extract {
            file: PathBuf::from(*file),
            today,
        },
        ["parse", file] => Command::Parse {
            file: PathBuf::from(*file),
        },
        ["ask", file, question @ ..] if !question.is_empty() => Command::Ask {
            file: PathBuf::from(*file),
            question: question.join(" "),
        },
        [cmd, ..] => bail!("Unknown or incomplete command '{}'. See --help.", cmd),
    };

    Ok(CliArgs {
        command,
        root,
        verbose,
    })
}

/// Writes streamed answer fragments, flushing after each. The first write error
/// is logged and every later fragment is discarded.
pub struct AnswerWriter<W: Write> {
    out: W,
    closed: bool,
}

impl<W: Write> AnswerWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, closed: false }
    }

    pub fn write_chunk(&mut self, chunk: &str) {
        if self.closed {
            return;
        }
        if let Err(e) = self
            .out
            .write_all(chunk.as_bytes())
            .and_then(|_| self.out.flush())
        {
            log::warn!("Stopped writing answer: {}", e);
            self.closed = true;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

pub fn print_help(binary_name: &str) {
    println!(
        "TeamSync v{} - Extract todos and calendar dates from chat exports",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} extract <chat.txt> [--today YYYY-MM-DD]", binary_name);
    println!("    {} parse <chat.txt>", binary_name);
    println!("    {} ask <chat.txt> <question...>", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config.");
    println!("    -v, --verbose         Log debug output to stderr.");
    println!("    --today <date>        Reference date for relative and past-date filtering.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("COMMANDS:");
    println!("    extract    Print todos and calendar entries as JSON (uses the model API)");
    println!("    parse      Print the parsed messages as JSON (offline)");
    println!("    ask        Stream an answer about the chat to stdout (uses the model API)");
    println!();
    println!("CONFIG:");
    println!("    The API key is read from the variable named by `api_key_env`");
    println!("    (default GOOGLE_API_KEY) unless `api_key` is set in config.toml.");
}
