mod commands;
mod output;
mod replay;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use threadmark_core::Tier;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "threadmark",
    version,
    about = "Extract validated clothing-item tags from outfit critique text"
)]
struct Cli {
    /// Log pipeline decisions to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tagging pipeline over a feedback text file
    Extract {
        /// Path to the feedback text
        feedback_file: PathBuf,

        /// Quality tier: basic, medium or advanced (default from config)
        #[arg(short, long)]
        tier: Option<Tier>,

        /// Maximum number of tags to emit
        #[arg(short = 'n', long)]
        max_items: Option<usize>,

        /// Suggestion passed to the AI extractor (repeatable)
        #[arg(short, long = "suggestion", value_name = "TEXT")]
        suggestions: Vec<String>,

        /// Garment catalog JSON file used as a dataset matcher (repeatable)
        #[arg(short, long = "catalog", value_name = "FILE")]
        catalogs: Vec<PathBuf>,

        /// Use the built-in "staples" catalog as a dataset matcher
        #[arg(long)]
        builtin_catalog: bool,

        /// Recorded AI extractor response ({"success", "extractedItems"}) to replay
        #[arg(long, value_name = "FILE")]
        ai_response: Option<PathBuf>,

        /// Custom vocabulary JSON file (default: built-in garments)
        #[arg(long, value_name = "FILE")]
        vocab: Option<PathBuf>,

        /// Pipeline config JSON file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Validate a single candidate name and print every reason
    Check {
        /// Candidate name, e.g. "Navy Scarf"
        name: String,

        /// Feedback text whose Style section grounds the candidate
        #[arg(short, long, value_name = "FILE")]
        feedback: PathBuf,

        /// Pre-validation confidence
        #[arg(long, default_value = "0.95")]
        confidence: Decimal,

        /// Descriptor attached to the candidate (repeatable)
        #[arg(short, long = "descriptor", value_name = "WORD")]
        descriptors: Vec<String>,

        #[arg(long, value_name = "FILE")]
        vocab: Option<PathBuf>,

        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate vocabularies
    Vocab {
        #[command(subcommand)]
        action: VocabAction,
    },
}

#[derive(Subcommand)]
enum VocabAction {
    /// List built-in vocabularies and catalogs
    List,
    /// Print the tables of a built-in vocabulary
    Explain {
        /// Preset name (e.g., "garments")
        #[arg(default_value = "garments")]
        preset: String,
    },
    /// Validate a custom vocabulary file
    Validate {
        /// Path to JSON vocabulary file
        file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !verbose && !has_rust_log {
        return;
    }
    let filter = if has_rust_log {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("threadmark_core=debug,threadmark=debug")
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            feedback_file,
            tier,
            max_items,
            suggestions,
            catalogs,
            builtin_catalog,
            ai_response,
            vocab,
            config,
            output,
        } => {
            let args = commands::extract::ExtractArgs {
                feedback_file,
                tier,
                max_items,
                suggestions,
                catalogs,
                builtin_catalog,
                ai_response,
                vocab,
                config,
            };
            tokio::runtime::Runtime::new()
                .map_err(threadmark_core::ThreadmarkError::from)
                .and_then(|rt| rt.block_on(commands::extract::run(args, &output)))
        }
        Commands::Check {
            name,
            feedback,
            confidence,
            descriptors,
            vocab,
            config,
            output,
        } => commands::check::run(
            &name,
            &feedback,
            confidence,
            descriptors,
            vocab.as_deref(),
            config.as_deref(),
            &output,
        ),
        Commands::Vocab { action } => match action {
            VocabAction::List => commands::vocab::list(),
            VocabAction::Explain { preset } => commands::vocab::explain(&preset),
            VocabAction::Validate { file } => commands::vocab::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
