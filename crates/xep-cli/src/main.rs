/// XEP element command-line tool: decode, validate, encode and stream the
/// protocol elements and stanzas the codec understands.
///
/// # Command overview
///
/// ```text
/// xep <COMMAND> [OPTIONS]
///
/// Commands:
///   decode     Decode one element (or stanza) and print it as JSON
///   validate   Check that a file holds one decodable element
///   encode     Build wire text from a JSON manifest of elements
///   stream     Decode a capture of concatenated stanzas, one line each
///   help       Print help information
///
/// Global options:
///   -v, --verbose        Debug logging on stderr (RUST_LOG overrides)
///   --max-depth <N>      Nesting limit while decoding (default 32)
///   --max-input <BYTES>  Largest element or stanza accepted (default 1 MiB)
///   -h, --help           Print help
///   -V, --version        Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                    |
/// |------|--------------------------------------------|
/// | 0    | Success                                    |
/// | 1    | Error (I/O failure, undecodable input, …)  |
///
/// Diagnostics and logs go to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use xep_decoder::DecoderConfig;
use xep_decoder::config::DEFAULT_MAX_INPUT_LEN;
use xep_types::IqType;

mod cmd_decode;
mod cmd_encode;
mod cmd_stream;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "xep", version, about = "XEP element codec CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Maximum element nesting depth accepted while decoding.
    #[arg(long, global = true, default_value_t = 32)]
    max_depth: u32,

    /// Maximum size in bytes of one element or stanza.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_INPUT_LEN)]
    max_input: usize,
}

impl Cli {
    fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig::default()
            .with_max_depth(self.max_depth)
            .with_max_input_len(self.max_input)
    }
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode one element (or stanza) and print it as JSON.
    Decode(DecodeArgs),
    /// Check that a file holds one decodable element.
    Validate(ValidateArgs),
    /// Build wire text from a JSON manifest.
    Encode(EncodeArgs),
    /// Decode every stanza of a capture, one JSON line each.
    Stream(StreamArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `xep decode`.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// File holding exactly one element (or stanza with `--stanza`).
    pub file: PathBuf,

    /// Treat the root as an `iq`/`message`/`presence` stanza.
    #[arg(long)]
    pub stanza: bool,

    /// Print single-line JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for `xep validate`.
///
/// Decodes the file and prints `✓` lines on success or a `✗` diagnostic
/// on failure (exit code 1).
#[derive(clap::Args)]
pub struct ValidateArgs {
    pub file: PathBuf,

    /// Treat the root as a stanza.
    #[arg(long)]
    pub stanza: bool,
}

/// Arguments for `xep encode`.
///
/// ```text
/// ┌──────────┬────────────────────────────────────────────────────────┐
/// │ Flag     │ Effect                                                 │
/// ├──────────┼────────────────────────────────────────────────────────┤
/// │ --iq T   │ wrap the elements in an iq of type T                   │
/// │ --id ID  │ stanza id (required with --iq)                         │
/// │ --to JID │ stanza recipient                                       │
/// │ -o FILE  │ write to FILE instead of stdout                        │
/// └──────────┴────────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// Path to the JSON manifest.
    pub input: PathBuf,

    #[arg(long, value_enum)]
    pub iq: Option<IqArg>,

    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub to: Option<String>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `xep stream`.
#[derive(clap::Args)]
pub struct StreamArgs {
    /// Capture of concatenated stanzas, optionally inside `<stream:stream>`.
    pub file: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum IqArg {
    Get,
    Set,
    Result,
    Error,
}

impl From<IqArg> for IqType {
    fn from(arg: IqArg) -> Self {
        match arg {
            IqArg::Get => IqType::Get,
            IqArg::Set => IqType::Set,
            IqArg::Result => IqType::Result,
            IqArg::Error => IqType::Error,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.decoder_config();

    let result = match &cli.command {
        Commands::Decode(args) => cmd_decode::run(args, &config),
        Commands::Validate(args) => cmd_validate::run(args, &config),
        Commands::Encode(args) => cmd_encode::run(args),
        Commands::Stream(args) => cmd_stream::run(args, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
