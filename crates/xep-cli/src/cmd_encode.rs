/// Implementation of `xep encode`.
///
/// Reads a JSON manifest of protocol elements and writes their wire text.
/// Without `--iq` each element is written on its own line; with `--iq`
/// they become the payload of one iq stanza.
///
/// # Manifest format
///
/// Elements use the same JSON shape `xep decode` prints:
///
/// ```json
/// {
///   "elements": [
///     { "element": "request", "version": "0.3+",
///       "filename": "a.jpg", "size": 23456, "content_type": "image/jpeg" }
///   ],
///   "error": "not-acceptable"
/// }
/// ```
///
/// `error` is optional and only valid together with `--iq error`.
use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;
use xep_encoder::{StanzaEncoder, StanzaErrorCondition};
use xep_types::{IqType, ProtocolElement};

use crate::EncodeArgs;

// ── Manifest serde types ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Manifest {
    elements: Vec<ProtocolElement>,
    #[serde(default)]
    error: Option<StanzaErrorCondition>,
}

/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, or if the
/// stanza it describes breaks the stanza rules.
pub fn run(args: &EncodeArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let manifest: Manifest = serde_json::from_str(&text)
        .with_context(|| format!("invalid manifest {}", args.input.display()))?;

    let wire = match args.iq {
        Some(iq) => encode_iq(args, iq.into(), manifest)?,
        None => manifest
            .elements
            .iter()
            .map(ProtocolElement::encode)
            .collect::<Vec<_>>()
            .join("\n"),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &wire).with_context(|| format!("cannot write {}", path.display()))?;
            eprintln!("wrote {} bytes to {}", wire.len(), path.display());
        }
        None => println!("{wire}"),
    }
    Ok(())
}

fn encode_iq(args: &EncodeArgs, iq_type: IqType, manifest: Manifest) -> Result<String> {
    let mut encoder = StanzaEncoder::iq(iq_type);
    if let Some(id) = &args.id {
        encoder.id(id.as_str());
    }
    if let Some(to) = &args.to {
        encoder.to(to.as_str());
    }
    if let Some(condition) = manifest.error {
        encoder.error(condition);
    }
    for element in manifest.elements {
        encoder.add(element);
    }
    encoder.encode().context("cannot build iq stanza")
}
