use lingua_types::Explanation;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::model::GenerateChunk;

pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinkState {
    Answering,
    Thinking,
}

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Malformed stream line: {0}")]
    ParseError(String),

    #[error("Model error: {0}")]
    RemoteError(String),

    #[error("Stream read failed: {0}")]
    IoError(#[from] std::io::Error),
}

/// Splits a token sequence into reasoning and answer text.
///
/// `<think>` switches to thinking before it is accumulated, `</think>` switches
/// back after, so both markers land in the thinking buffer.
#[derive(Debug)]
pub struct TokenAccumulator {
    state: ThinkState,
    thinking: String,
    answer: String,
}

impl TokenAccumulator {
    pub fn new() -> Self {
        Self {
            state: ThinkState::Answering,
            thinking: String::new(),
            answer: String::new(),
        }
    }

    pub fn state(&self) -> ThinkState {
        self.state
    }

    /// Accumulate one token and return the record for it.
    ///
    /// The record carries the full text of the side that grew and an empty other side.
    pub fn push(&mut self, token: &str, elapsed_nanos: u64) -> Explanation {
        if token == THINK_OPEN {
            self.state = ThinkState::Thinking;
        }

        let record = match self.state {
            ThinkState::Thinking => {
                self.thinking.push_str(token);
                Explanation {
                    thinking_text: self.thinking.clone(),
                    answer_text: String::new(),
                    elapsed_nanos,
                    is_thinking: true,
                }
            }
            ThinkState::Answering => {
                self.answer.push_str(token);
                Explanation {
                    thinking_text: String::new(),
                    answer_text: self.answer.clone(),
                    elapsed_nanos,
                    is_thinking: false,
                }
            }
        };

        if token == THINK_CLOSE {
            self.state = ThinkState::Answering;
        }

        record
    }
}

impl Default for TokenAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a streamed generation into Explanation records.
///
/// Finite and single-use. Cancellation is checked at every line boundary.
pub struct StreamingResponseParser<R> {
    lines: Option<Lines<R>>,
    accumulator: TokenAccumulator,
    cancel: CancellationToken,
    opened_at: Instant,
}

impl<R: AsyncBufRead + Unpin> StreamingResponseParser<R> {
    pub fn new(reader: R, cancel: CancellationToken) -> Self {
        Self {
            lines: Some(reader.lines()),
            accumulator: TokenAccumulator::new(),
            cancel,
            opened_at: Instant::now(),
        }
    }

    /// Next record, `None` once the stream has ended
    pub async fn next_record(&mut self) -> Option<Result<Explanation, StreamError>> {
        loop {
            let lines = self.lines.as_mut()?;

            let line = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                line = lines.next_line() => Some(line),
            };

            let line = match line {
                None => {
                    tracing::debug!("[STREAM] Cancelled, releasing stream");
                    self.lines = None;
                    return Some(Err(StreamError::Cancelled));
                }
                Some(Ok(Some(line))) => line,
                Some(Ok(None)) => {
                    self.lines = None;
                    return None;
                }
                Some(Err(e)) => {
                    self.lines = None;
                    return Some(Err(StreamError::IoError(e)));
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            return Some(self.handle_line(&line));
        }
    }

    fn handle_line(&mut self, line: &str) -> Result<Explanation, StreamError> {
        let chunk: GenerateChunk = serde_json::from_str(line).map_err(|e| {
            self.lines = None;
            StreamError::ParseError(e.to_string())
        })?;

        if let Some(error) = chunk.error {
            self.lines = None;
            return Err(StreamError::RemoteError(error));
        }

        let Some(token) = chunk.response else {
            self.lines = None;
            return Err(StreamError::ParseError("missing response field".into()));
        };

        if chunk.done {
            self.lines = None;
        }

        let elapsed_nanos = chunk
            .total_duration
            .unwrap_or_else(|| self.opened_at.elapsed().as_nanos() as u64);

        Ok(self.accumulator.push(&token, elapsed_nanos))
    }
}
