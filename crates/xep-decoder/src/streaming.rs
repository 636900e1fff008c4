use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;
use xep_types::DecodeError;

use crate::config::DecoderConfig;
use crate::decoder::ElementDecoder;
use crate::error::ReadError;
use crate::frame::{Frame, extract_stanza};
use crate::stanza::DecodedStanza;

const READ_CHUNK: usize = 4096;

/// Asynchronous stanza decoder over a byte stream.
///
/// Bytes are read into an internal buffer until it holds a complete
/// top-level element, which is then decoded with
/// [`ElementDecoder::decode_stanza`] and removed from the buffer. Stream
/// open/close tags and top-level filler (whitespace, comments, processing
/// instructions) are consumed silently. Only one stanza is buffered at
/// a time, so memory is bounded by `max_input_len` regardless of how long
/// the stream runs.
///
/// ```text
///   Reading ──(complete stanza)──→ yield Ok(stanza), stay Reading
///      │
///      ├──(stanza fails to decode)──→ yield Err, stay Reading
///      ├──(EOF, buffer blank)──→ Done
///      └──(EOF mid-stanza / I/O / not XML / too large)──→ yield Err, Done
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use xep_decoder::StreamingDecoder;
/// use tokio::io::AsyncRead;
///
/// async fn dump(reader: impl AsyncRead + Unpin) {
///     let mut stream = StreamingDecoder::new(reader);
///     while let Some(stanza) = stream.next().await {
///         println!("{:?}", stanza.map(|s| s.kind));
///     }
/// }
/// ```
pub struct StreamingDecoder<R> {
  reader: R,
  config: DecoderConfig,
  state: StreamState,
  /// Bytes read but not yet framed. Drained as stanzas are yielded.
  buf: Vec<u8>,
  stanzas: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
  Reading,
  Done,
}

impl<R: AsyncRead + Unpin> StreamingDecoder<R> {
  #[must_use]
  pub fn new(reader: R) -> Self {
    Self::with_config(reader, DecoderConfig::default())
  }

  #[must_use]
  pub fn with_config(reader: R, config: DecoderConfig) -> Self {
    Self {
      reader,
      config,
      state: StreamState::Reading,
      buf: Vec::with_capacity(READ_CHUNK),
      stanzas: 0,
    }
  }

  /// Number of stanzas yielded so far, successful or not.
  pub fn stanzas_read(&self) -> usize {
    self.stanzas
  }

  /// Read the next stanza from the stream.
  ///
  /// Returns `Some(Ok(stanza))` for each decoded stanza, `Some(Err(_))`
  /// when one fails, and `None` once the stream is exhausted. A stanza
  /// that fails to decode does not end the stream; truncation, I/O
  /// errors and input that is not XML do.
  pub async fn next(&mut self) -> Option<Result<DecodedStanza, ReadError>> {
    while self.state == StreamState::Reading {
      match self.take_frame() {
        Ok(Some(result)) => {
          self.stanzas += 1;
          return Some(result);
        }
        Ok(None) => {}
        Err(err) => return Some(Err(self.finish(err))),
      }

      if let Err(err) = self.config.check_len(self.buf.len()) {
        return Some(Err(self.finish(err)));
      }

      match self.fill().await {
        Ok(0) if self.buf.iter().all(u8::is_ascii_whitespace) => {
          debug!(stanzas = self.stanzas, "stream ended");
          self.state = StreamState::Done;
        }
        Ok(0) => return Some(Err(self.finish(DecodeError::TruncatedInput.into()))),
        Ok(_) => {}
        Err(err) => return Some(Err(self.finish(err.into()))),
      }
    }
    None
  }

  /// Frame and decode the next stanza already in the buffer.
  ///
  /// `Ok(None)` means more bytes are needed. Stream boundaries and filler
  /// are dropped here so callers only ever see stanzas.
  fn take_frame(&mut self) -> Result<Option<Result<DecodedStanza, ReadError>>, ReadError> {
    loop {
      let Some((frame, consumed)) = extract_stanza(&self.buf)? else {
        return Ok(None);
      };
      let decoded = match frame {
        Frame::Stanza(text) => Some(ElementDecoder::decode_stanza_with_config(text, &self.config)),
        Frame::StreamBoundary | Frame::Filler => None,
      };
      self.buf.drain(..consumed);
      if decoded.is_some() {
        return Ok(decoded);
      }
    }
  }

  async fn fill(&mut self) -> std::io::Result<usize> {
    let mut chunk = [0u8; READ_CHUNK];
    let n = self.reader.read(&mut chunk).await?;
    self.buf.extend_from_slice(&chunk[..n]);
    Ok(n)
  }

  fn finish(&mut self, err: ReadError) -> ReadError {
    self.state = StreamState::Done;
    self.buf.clear();
    err
  }
}
