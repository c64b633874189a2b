use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "doc2txt",
    version,
    about = "Convert a folder of PDF and Word documents to plain text",
    after_help = "Settings are read from ./doc2txt.toml when present (see `doc2txt init`). \
                  Command-line flags override the file. Set RUST_LOG to change log verbosity."
)]
pub struct Cli {
    /// Use this settings file instead of ./doc2txt.toml
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert every .pdf and .docx in the input folder to .txt.
    ///
    /// The input folder is not searched recursively. Files already converted
    /// at their current modification time are skipped. Failures of single
    /// files are listed in the report and do not stop the run.
    Convert {
        /// Input folder (default: input_folder)
        #[arg(short, long)]
        input: Option<String>,
        /// Output folder, created if missing (default: output_folder)
        #[arg(short, long)]
        output: Option<String>,
        /// Ledger database file (default: file_history.db)
        #[arg(long)]
        ledger: Option<String>,
        /// Worker threads (default: available parallelism)
        #[arg(short = 'j', long)]
        threads: Option<usize>,
        /// Do not OCR PDF pages without a text layer
        #[arg(long)]
        no_ocr: bool,
        /// Pretty-print the run report
        #[arg(long)]
        pretty: bool,
    },

    /// List files recorded in the ledger
    History {
        /// Only show records whose path contains this text
        #[arg(short, long)]
        path: Option<String>,
        /// Ledger database file (default: file_history.db)
        #[arg(long)]
        ledger: Option<String>,
    },

    /// List supported document extensions
    Supported,

    /// Write a doc2txt.toml with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
