/// Implementation of `xep decode`.
///
/// Reads the file, decodes exactly one protocol element (or one stanza
/// with `--stanza`) and prints it as JSON on stdout.
///
/// ```text
/// $ xep decode retry.xml
/// {
///   "element": "retry",
///   "stamp": "2024-01-01T00:00:00Z"
/// }
/// ```
use std::fs;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;
use xep_decoder::{DecoderConfig, ElementDecoder};

use crate::DecodeArgs;

/// # Errors
///
/// Returns an error if the file cannot be read or does not decode.
pub fn run(args: &DecodeArgs, config: &DecoderConfig) -> Result<()> {
    let input = fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    debug!(bytes = input.len(), stanza = args.stanza, "decoding");

    let json = if args.stanza {
        let stanza = ElementDecoder::decode_stanza_with_config(&input, config)
            .with_context(|| format!("cannot decode stanza in {}", args.file.display()))?;
        render(&stanza, args.compact)?
    } else {
        let element = ElementDecoder::decode_with_config(&input, config)
            .with_context(|| format!("cannot decode element in {}", args.file.display()))?;
        render(&element, args.compact)?
    };

    println!("{json}");
    Ok(())
}

fn render<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}
