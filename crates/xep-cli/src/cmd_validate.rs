/// Implementation of `xep validate`.
///
/// # Success output
///
/// ```text
/// ✓ Element: <slot> in urn:xmpp:http:upload:0
/// ✓ Decoded: all required fields present
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: missing required attribute `host`
/// ```
use std::fs;

use anyhow::{Context, Result, anyhow};
use xep_decoder::{DecoderConfig, ElementDecoder, ReadError};
use xep_types::{DecodeError, ProtocolElement};

use crate::ValidateArgs;

/// # Errors
///
/// Returns an error if the file cannot be read or fails to decode.
pub fn run(args: &ValidateArgs, config: &DecoderConfig) -> Result<()> {
    let input = fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;

    let report = if args.stanza {
        ElementDecoder::decode_stanza_with_config(&input, config).map(|stanza| {
            vec![
                format!(
                    "Stanza: <{}> id={} type={}",
                    stanza.kind,
                    stanza.id.as_deref().unwrap_or("-"),
                    stanza.stanza_type.as_deref().unwrap_or("-")
                ),
                format!(
                    "Elements: {} recognised, {} unrecognised",
                    stanza.elements.len(),
                    stanza.unknown.len()
                ),
            ]
        })
    } else {
        ElementDecoder::decode_with_config(&input, config).map(|element| {
            vec![
                format!("Element: {}", describe(&element)),
                "Decoded: all required fields present".to_owned(),
            ]
        })
    };

    match report {
        Ok(lines) => {
            for line in lines {
                println!("✓ {line}");
            }
            Ok(())
        }
        Err(e) => {
            println!("✗ Error: {}", diagnostic(&e));
            Err(anyhow!("validation failed"))
        }
    }
}

fn describe(element: &ProtocolElement) -> String {
    let node = element.to_node();
    format!("<{}> in {}", node.name(), node.attribute("xmlns").unwrap_or("no namespace"))
}

/// Human-readable message for each failure, naming the offending field.
///
/// ```text
/// ┌──────────────────────────┬──────────────────────────────────────────┐
/// │ Failure                  │ Message                                  │
/// ├──────────────────────────┼──────────────────────────────────────────┤
/// │ MissingRequiredAttribute │ "missing required attribute `f`"         │
/// │ TruncatedInput           │ "input ends before the element closes"   │
/// │ NoElement                │ "file contains no element"               │
/// │ everything else          │ "<error Display>"                        │
/// └──────────────────────────┴──────────────────────────────────────────┘
/// ```
fn diagnostic(e: &ReadError) -> String {
    match e {
        ReadError::Decode(DecodeError::MissingRequiredAttribute { field }) => {
            format!("missing required attribute `{field}`")
        }
        ReadError::Decode(DecodeError::TruncatedInput) => {
            "input ends before the element closes".to_owned()
        }
        ReadError::NoElement => "file contains no element".to_owned(),
        other => other.to_string(),
    }
}
