//! Body buffering.
//!
//! # Responsibilities
//! - Read a body to completion so its bytes can be logged
//! - Hand back a replay body carrying exactly the same bytes
//! - Turn captured bytes into loggable text
//!
//! # Design Decisions
//! - A stream error is replayed too: the recipient sees the chunks read before
//!   the error followed by the same error, never a silently shortened body
//! - Past the buffer limit capturing stops; the chunks already read are
//!   replayed and the rest of the stream is passed through untouched
//! - Invalid UTF-8 is decoded lossily; logging never fails on encoding

use axum::body::{Body, Bytes};
use futures_util::{stream, StreamExt};

/// What the auditor got to see of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyCapture<'a> {
    /// The whole body (possibly empty).
    Bytes(&'a [u8]),
    /// Larger than the buffer limit; content not captured.
    Oversized,
}

impl<'a> From<Option<&'a [u8]>> for BodyCapture<'a> {
    fn from(bytes: Option<&'a [u8]>) -> Self {
        match bytes {
            Some(bytes) => BodyCapture::Bytes(bytes),
            None => BodyCapture::Oversized,
        }
    }
}

/// A body that has been read (up to a limit) and can be replayed once.
pub struct BufferedBody {
    captured: Option<Bytes>,
    replay: Body,
}

impl BufferedBody {
    /// Read `body` to its end, its first error, or until more than `limit`
    /// bytes have arrived. A `limit` of 0 means no limit.
    pub async fn capture(body: Body, limit: usize) -> Self {
        let mut frames = body.into_data_stream();
        let mut chunks: Vec<Bytes> = Vec::new();
        let mut read = 0usize;

        while let Some(frame) = frames.next().await {
            match frame {
                Ok(chunk) => {
                    read += chunk.len();
                    chunks.push(chunk);
                    if limit != 0 && read > limit {
                        tracing::debug!(limit, read, "Body exceeds buffer limit, streaming the rest");
                        let head = stream::iter(chunks.into_iter().map(Ok::<Bytes, axum::Error>));
                        return Self {
                            captured: None,
                            replay: Body::from_stream(head.chain(frames)),
                        };
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, captured = read, "Body stream failed while buffering");
                    let bytes = concat(&chunks);
                    let items = chunks
                        .into_iter()
                        .map(Ok::<Bytes, axum::Error>)
                        .chain(std::iter::once(Err(e)));
                    return Self {
                        captured: Some(bytes),
                        replay: Body::from_stream(stream::iter(items)),
                    };
                }
            }
        }

        let bytes = concat(&chunks);
        Self {
            replay: Body::from(bytes.clone()),
            captured: Some(bytes),
        }
    }

    /// Captured bytes, or `None` when the body was over the limit.
    pub fn bytes(&self) -> Option<&Bytes> {
        self.captured.as_ref()
    }

    /// Split into the captured bytes and the body for the real recipient.
    pub fn into_parts(self) -> (Option<Bytes>, Body) {
        (self.captured, self.replay)
    }
}

fn concat(chunks: &[Bytes]) -> Bytes {
    match chunks {
        [] => Bytes::new(),
        [single] => single.clone(),
        _ => Bytes::from(chunks.concat()),
    }
}

/// Decode captured bytes as text; empty captures are absent.
pub fn body_text(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Cap logged text at `max` bytes on a char boundary. `0` disables the cap.
pub fn truncate_for_log(mut text: String, max: usize) -> String {
    if max == 0 || text.len() <= max {
        return text;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let dropped = text.len() - cut;
    text.truncate(cut);
    text.push_str(&format!("...({} bytes truncated)", dropped));
    text
}
