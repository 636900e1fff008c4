/// Implementation of `xep stream`.
///
/// Feeds a capture file through the streaming decoder and prints one JSON
/// line per stanza. Stanzas that fail to decode are reported on stderr and
/// counted; the command fails if any did.
///
/// ```text
/// $ xep stream session.xml
/// {"kind":"iq","id":"u1","type":"result","elements":[{"element":"slot",…}]}
/// {"kind":"presence","elements":[]}
/// ```
use anyhow::{Context, Result, bail};
use tokio::fs::File;
use tokio::io::BufReader;
use xep_decoder::{DecoderConfig, StreamingDecoder};

use crate::StreamArgs;

/// # Errors
///
/// Returns an error if the file cannot be opened or any stanza fails.
pub fn run(args: &StreamArgs, config: DecoderConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")?;
    runtime.block_on(stream(args, config))
}

async fn stream(args: &StreamArgs, config: DecoderConfig) -> Result<()> {
    let file = File::open(&args.file)
        .await
        .with_context(|| format!("cannot open {}", args.file.display()))?;
    let mut decoder = StreamingDecoder::with_config(BufReader::new(file), config);

    let mut total = 0usize;
    let mut failed = 0usize;
    while let Some(item) = decoder.next().await {
        total += 1;
        match item {
            Ok(stanza) => println!("{}", serde_json::to_string(&stanza)?),
            Err(e) => {
                failed += 1;
                eprintln!("✗ stanza {total}: {e}");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {total} stanzas failed to decode");
    }
    Ok(())
}
