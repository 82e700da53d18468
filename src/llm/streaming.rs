//! Streaming response handling.
//!
//! Both vendor families deliver streamed completions as server-sent events
//! whose `data:` payloads are JSON. This module reassembles the SSE framing
//! from the raw body and hands each payload to a family-specific decoder.

use crate::llm::error::LLMError;
use crate::llm::request::TextStream;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use std::fmt;

/// What a family decoder made of one SSE `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseFrame {
    /// A non-empty text fragment to yield
    Text(String),
    /// A payload carrying no text (role headers, pings, empty deltas)
    Skip,
    /// The vendor's end-of-stream marker
    Done,
}

/// Turns an SSE byte stream into a [`TextStream`].
///
/// Empty payloads are ignored. The stream ends at the first `Done` frame,
/// when the body ends, or after yielding the first error.
pub(crate) fn text_stream<S, B, E, F>(byte_stream: S, label: &'static str, decode: F) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
    F: Fn(&str) -> Result<SseFrame, LLMError> + Send + 'static,
{
    let out = async_stream::stream! {
        let mut events = Box::pin(byte_stream.eventsource());

        while let Some(item) = events.next().await {
            let event = match item {
                Ok(event) => event,
                Err(e) => {
                    yield Err(LLMError::stream_error(format!("SSE stream error ({label}): {e}")));
                    return;
                }
            };

            let data = event.data.trim();
            if data.is_empty() {
                continue;
            }

            match decode(data) {
                Ok(SseFrame::Text(text)) => {
                    if !text.is_empty() {
                        yield Ok(text);
                    }
                }
                Ok(SseFrame::Skip) => {}
                Ok(SseFrame::Done) => return,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
    };

    Box::pin(out)
}

/// Drains a [`TextStream`] into one string, in arrival order.
///
/// # Errors
///
/// Returns the first error the stream yields; text received before it is
/// discarded.
pub async fn collect_text(mut stream: TextStream) -> Result<String, LLMError> {
    let mut content = String::new();
    while let Some(chunk) = stream.next().await {
        content.push_str(&chunk?);
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn body(parts: &[&str]) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send {
        let parts: Vec<Result<Vec<u8>, std::io::Error>> =
            parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect();
        stream::iter(parts)
    }

    fn echo(data: &str) -> Result<SseFrame, LLMError> {
        match data {
            "[DONE]" => Ok(SseFrame::Done),
            "skip" => Ok(SseFrame::Skip),
            "boom" => Err(LLMError::stream_error("boom")),
            other => Ok(SseFrame::Text(other.to_string())),
        }
    }

    #[tokio::test]
    async fn yields_text_in_order() {
        let s = text_stream(body(&["data: A\n\n", "data: B\n\ndata: C\n\n"]), "test", echo);
        assert_eq!(collect_text(s).await.unwrap(), "ABC");
    }

    #[tokio::test]
    async fn reassembles_events_split_across_chunks() {
        let s = text_stream(body(&["da", "ta: Hel", "lo\n", "\n"]), "test", echo);
        let chunks: Vec<_> = s.collect().await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap(), "Hello");
    }

    #[tokio::test]
    async fn skips_empty_and_skip_frames() {
        let s = text_stream(
            body(&["data: A\n\n", "data: skip\n\n", "data:\n\n", ": ping\n\n", "data: B\n\n"]),
            "test",
            echo,
        );
        let chunks: Vec<String> = s.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn stops_at_done_marker() {
        let s = text_stream(body(&["data: A\n\ndata: [DONE]\n\ndata: late\n\n"]), "test", echo);
        let chunks: Vec<String> = s.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks, vec!["A"]);
    }

    #[tokio::test]
    async fn stops_after_first_error() {
        let s = text_stream(body(&["data: A\n\ndata: boom\n\ndata: B\n\n"]), "test", echo);
        let chunks: Vec<_> = s.collect().await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].is_err());
    }

    #[tokio::test]
    async fn transport_error_is_stream_error() {
        let parts: Vec<Result<Vec<u8>, std::io::Error>> = vec![
            Ok(b"data: A\n\n".to_vec()),
            Err(std::io::Error::other("reset")),
        ];
        let s = text_stream(stream::iter(parts), "test", echo);
        let err = collect_text(s).await.unwrap_err();
        assert!(err.to_string().contains("reset"));
    }
}
