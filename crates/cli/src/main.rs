mod batch;
mod config;
mod pretty;

use config::{Config, RecognizerKind};

use std::io::{self, Read};
use std::sync::Arc;

use clap::Parser;
use colored::{control::set_override, Colorize};
use datesift_core::producers::PatternMatcher;
use datesift_core::{
    signal, AsReference, CandidateProducer, ContextRecognizer, DateSift, EntityRecognizer,
    ExtractionConfig, NullRecognizer, ReferenceTimestamp,
};
use is_terminal::IsTerminal;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::pretty::PrettyConfig;

const LONG_ABOUT: &str = r##"
Datesift pulls structured signal out of chat messages and tweets: the dates
they talk about, links, $TICKERS and a one-line title.

Dates are resolved against the time the message was posted (--at), so
"next Friday" and "in 3 days" become calendar dates. Only dates from two
days before the post up to two years after it are kept.

DATE STRATEGIES:
  pattern          12/25/2024, 5th Nov 2024, 2024-12-25, next week, in 3 days
  entity           next Friday, the 5th of November, end of the month, Q3
  month-inference  "in March" counts as March 1st

EXAMPLES:
  datesift "Mint goes live next Friday!" --at 2024-11-05T00:00:00Z
  datesift "WL closes 12/25/2024" --dates-only
  datesift "Raffle in 3 days" --explain
  echo "gm, AMA tomorrow" | datesift --json

BATCH MODE:
  Read one JSON object per line and write one result per line:
    cat messages.jsonl | datesift --batch
  Input lines look like {"text": "...", "timestamp": "2024-11-05T00:00:00Z"}.

CONFIGURATION:
  Settings can be configured via CLI flags, environment variables, or config file.
  Precedence: CLI args > Environment vars > Config file > Defaults

  Setting     | CLI flag        | Env var             | Default
  ------------|-----------------|---------------------|---------
  no_color    | -C, --no-color  | DATESIFT_NO_COLOR   | false
  json        | -j, --json      | DATESIFT_JSON       | false
  disabled    | --disable       | DATESIFT_DISABLE    | []
  recognizer  | --recognizer    | DATESIFT_RECOGNIZER | context

  Config file location: datesift --config-path
  Generate default config: datesift --config-init

  Note: NO_COLOR env var is also respected (https://no-color.org/)"##;

#[derive(Parser)]
#[command(name = "datesift")]
#[command(version)]
#[command(about = "Extract dates, links, tickers and a title from chat messages")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    /// The message text to analyze
    ///
    /// Read from stdin when omitted and stdin is piped.
    #[arg(value_name = "TEXT")]
    input: Option<String>,

    /// Reference timestamp the message was posted at
    ///
    /// RFC 3339 / ISO 8601 (offset optional), a bare date, or Unix epoch
    /// seconds. Defaults to the current local time.
    #[arg(long, short = 'a', value_name = "TIMESTAMP")]
    at: Option<String>,

    /// Output results as JSON (for scripting/piping)
    #[arg(long, short = 'j')]
    json: bool,

    /// Print only the filtered dates, one per line
    #[arg(long, short = 'd')]
    dates_only: bool,

    /// Show every candidate with its strategy and resolution
    #[arg(long, short = 'e')]
    explain: bool,

    /// Print the aggregated dates without the window filter
    #[arg(long)]
    no_window: bool,

    /// Batch mode: read JSON lines from stdin, write one result per line
    #[arg(long, short = 'b')]
    batch: bool,

    /// Turn off extraction strategies (comma-separated ids or aliases)
    ///
    /// Examples: --disable month  or  --disable ner,month
    /// Use --strategies to see available ids and aliases.
    #[arg(long, value_delimiter = ',', value_name = "STRATEGY")]
    disable: Option<Vec<String>>,

    /// Entity recognizer backing the entity strategy (context, none)
    #[arg(long, value_name = "KIND")]
    recognizer: Option<RecognizerKind>,

    /// List all extraction strategies
    #[arg(long)]
    strategies: bool,

    /// Disable colored output
    #[arg(long, short = 'C')]
    no_color: bool,

    /// Enable verbose logging (use multiple times for more detail)
    ///
    /// -v shows debug messages, -vv shows trace messages.
    /// Useful for understanding why a date was or wasn't kept.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Show config file path
    #[arg(long)]
    config_path: bool,

    /// Generate default config file (see --config-path for location)
    #[arg(long)]
    config_init: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), message);
    std::process::exit(1);
}

fn print_strategies(sift: &DateSift) {
    println!("{}", "Extraction Strategies".bold().underline());
    println!();

    for info in sift.producer_infos() {
        print!("  {} {}", "→".cyan(), info.id.yellow());
        if !info.description.is_empty() {
            print!(" - {}", info.description);
        }
        println!();
        if !info.aliases.is_empty() {
            println!("      {}", format!("aliases: {}", info.aliases.join(", ")).dimmed());
        }
        if !info.examples.is_empty() {
            let examples: Vec<_> = info
                .examples
                .iter()
                .take(3)
                .map(|e| e.green().to_string())
                .collect();
            println!("      {}", format!("e.g. {}", examples.join(", ")).dimmed());
        }
        if info.id == PatternMatcher.id() {
            for pattern in PatternMatcher::patterns() {
                println!(
                    "      {} {:<20} {}",
                    "·".dimmed(),
                    pattern.name,
                    pattern.example.green()
                );
            }
        }
    }
}

fn build_engine(recognizer: RecognizerKind, disabled: Vec<String>) -> DateSift {
    let recognizer: Arc<dyn EntityRecognizer> = match recognizer {
        RecognizerKind::Context => Arc::new(ContextRecognizer),
        RecognizerKind::None => Arc::new(NullRecognizer),
    };
    let sift = DateSift::with_recognizer(recognizer);

    for name in &disabled {
        if !sift.is_valid_strategy(name) {
            fail(format!(
                "Unknown strategy '{}'. Valid ids: {}",
                name,
                sift.producer_ids().join(", ")
            ));
        }
    }

    if disabled.is_empty() {
        sift
    } else {
        sift.set_config(ExtractionConfig { disabled })
    }
}

fn main() {
    let cli = Cli::parse();

    // Handle --config-path
    if cli.config_path {
        match Config::path() {
            Some(path) => println!("{}", path.display()),
            None => fail("Cannot determine config directory"),
        }
        return;
    }

    // Handle --config-init
    if cli.config_init {
        match config::init_config() {
            Ok(path) => println!("Created config file: {}", path.display()),
            Err(e) => fail(e),
        }
        return;
    }

    // Initialize tracing based on verbosity level (before config loading for logging)
    let level = match cli.verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    // Load config file and merge with CLI args
    // Precedence: CLI args > Environment vars > Config file > Defaults
    let file_config = Config::load();

    if let Some(path) = Config::path() {
        if path.exists() {
            tracing::debug!("Loaded config from: {}", path.display());
        } else {
            tracing::trace!("No config file at: {}", path.display());
        }
    }

    let no_color = if cli.no_color {
        tracing::debug!("no_color = true (from CLI)");
        true
    } else {
        let nc = file_config.no_color();
        if nc {
            let source = if std::env::var("NO_COLOR").is_ok() {
                "env NO_COLOR"
            } else if std::env::var("DATESIFT_NO_COLOR").is_ok() {
                "env DATESIFT_NO_COLOR"
            } else {
                "config file"
            };
            tracing::debug!("no_color = true (from {})", source);
        }
        nc
    };
    if no_color || !io::stdout().is_terminal() {
        set_override(false);
    }

    let json = if cli.json {
        tracing::debug!("json = true (from CLI)");
        true
    } else {
        let j = file_config.json();
        let source = if std::env::var("DATESIFT_JSON").is_ok() {
            "env DATESIFT_JSON"
        } else if file_config.json.is_some() {
            "config file"
        } else {
            "default"
        };
        tracing::debug!("json = {} (from {})", j, source);
        j
    };

    let disabled = if let Some(d) = cli.disable {
        tracing::debug!("disabled = {:?} (from CLI)", d);
        d
    } else {
        let d = file_config.disabled();
        let source = if std::env::var("DATESIFT_DISABLE").is_ok() {
            "env DATESIFT_DISABLE"
        } else if file_config.disabled.is_some() {
            "config file"
        } else {
            "default"
        };
        tracing::debug!("disabled = {:?} (from {})", d, source);
        d
    };

    let recognizer = if let Some(r) = cli.recognizer {
        tracing::debug!("recognizer = {:?} (from CLI)", r);
        r
    } else {
        let r = file_config.recognizer();
        let source = if std::env::var("DATESIFT_RECOGNIZER").is_ok() {
            "env DATESIFT_RECOGNIZER"
        } else if file_config.recognizer.is_some() {
            "config file"
        } else {
            "default"
        };
        tracing::debug!("recognizer = {:?} (from {})", r, source);
        r
    };

    let sift = build_engine(recognizer, disabled);

    if cli.strategies {
        print_strategies(&sift);
        return;
    }

    let stdin_is_pipe = !io::stdin().is_terminal();

    if cli.batch {
        if let Err(e) = batch::run_batch_mode(&sift) {
            fail(format!("Failed to read stdin: {}", e));
        }
        return;
    }

    let text = if let Some(input) = cli.input {
        input
    } else if stdin_is_pipe {
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            fail(format!("Failed to read stdin: {}", e));
        }
        let trimmed = buffer.trim().to_string();
        if trimmed.is_empty() {
            fail("Empty input");
        }
        trimmed
    } else {
        eprintln!("{}: No input provided", "error".red().bold());
        eprintln!();
        eprintln!("Usage: {} <TEXT> [--at <TIMESTAMP>]", "datesift".bold());
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  datesift \"Mint next Friday\" --at 2024-11-05   Resolve against a post time");
        eprintln!("  datesift \"WL closes 12/25/2024\" -d           Dates only");
        eprintln!("  echo \"AMA tomorrow\" | datesift              Pipe text input");
        eprintln!("  cat messages.jsonl | datesift --batch       JSON lines in and out");
        eprintln!();
        eprintln!("Run {} for more information.", "datesift --help".bold());
        std::process::exit(1);
    };

    let reference = match cli.at.as_deref() {
        Some(at) => ReferenceTimestamp::parse(at).unwrap_or_else(|e| fail(e)),
        None => chrono::Local::now()
            .to_reference()
            .unwrap_or_else(|e| fail(e)),
    };
    tracing::debug!("reference = {}", reference);

    let pretty = PrettyConfig { color: !no_color };

    if cli.explain || cli.no_window {
        let cleaned = signal::remove_urls(&signal::clean_content(&text));
        let extraction = sift.extract(&cleaned, &reference);

        if cli.no_window {
            let dates = extraction.aggregated.to_iso_strings();
            if json {
                print_json(&dates);
            } else {
                for date in dates {
                    println!("{}", date);
                }
            }
        } else if json {
            print_json(&extraction);
        } else {
            print!("{}", pretty::explain_report(&extraction, &pretty));
        }
        return;
    }

    let signal = signal::analyze(&sift, &text, &reference);

    if cli.dates_only {
        if json {
            print_json(&signal.filtered_dates);
        } else {
            for date in &signal.filtered_dates {
                println!("{}", date);
            }
        }
    } else if json {
        print_json(&signal);
    } else {
        print!("{}", pretty::signal_report(&signal, &pretty));
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}
