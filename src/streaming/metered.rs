//! Byte accounting for relayed segments.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures_util::stream::{BoxStream, Stream, StreamExt};

use crate::observability::metrics;

/// How a relayed stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Upstream body fully forwarded.
    Completed,
    /// Upstream read failed mid-stream.
    Failed,
    /// Dropped before the end, usually a client disconnect.
    Abandoned,
}

impl StreamOutcome {
    fn as_str(self) -> &'static str {
        match self {
            StreamOutcome::Completed => "completed",
            StreamOutcome::Failed => "failed",
            StreamOutcome::Abandoned => "abandoned",
        }
    }
}

/// Final numbers for one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub bytes_sent: u64,
    pub elapsed: Duration,
    pub outcome: StreamOutcome,
}

/// Per-response counters, reported exactly once.
///
/// Dropping unfinished counters reports them as abandoned, so every exit
/// path (completion, error, client disconnect) is logged.
#[derive(Debug)]
pub struct StreamCounters {
    path: String,
    bytes_sent: u64,
    started: Instant,
    finished: bool,
}

impl StreamCounters {
    /// `started` is when the upstream fetch began.
    pub fn new(path: impl Into<String>, started: Instant) -> Self {
        Self {
            path: path.into(),
            bytes_sent: 0,
            started,
            finished: false,
        }
    }

    pub fn record(&mut self, n: usize) {
        self.bytes_sent += n as u64;
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Report the counters. Only the first call returns a summary.
    pub fn finish(&mut self, outcome: StreamOutcome) -> Option<StreamSummary> {
        if self.finished {
            return None;
        }
        self.finished = true;

        let summary = StreamSummary {
            bytes_sent: self.bytes_sent,
            elapsed: self.started.elapsed(),
            outcome,
        };

        tracing::info!(
            path = %self.path,
            bytes = summary.bytes_sent,
            elapsed_secs = format_args!("{:.2}", summary.elapsed.as_secs_f64()),
            outcome = outcome.as_str(),
            "Segment relayed"
        );
        metrics::record_segment(summary.bytes_sent, outcome.as_str());

        Some(summary)
    }
}

impl Drop for StreamCounters {
    fn drop(&mut self) {
        self.finish(StreamOutcome::Abandoned);
    }
}

/// Byte stream that feeds a [`StreamCounters`] as it is polled.
pub struct MeteredStream<E> {
    inner: BoxStream<'static, Result<Bytes, E>>,
    counters: StreamCounters,
}

impl<E> MeteredStream<E> {
    pub fn new(inner: BoxStream<'static, Result<Bytes, E>>, counters: StreamCounters) -> Self {
        Self { inner, counters }
    }

    pub fn counters(&self) -> &StreamCounters {
        &self.counters
    }
}

impl<E> Stream for MeteredStream<E> {
    type Item = Result<Bytes, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.counters.is_finished() {
            return Poll::Ready(None);
        }

        match self.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                self.counters.record(chunk.len());
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                self.counters.finish(StreamOutcome::Failed);
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.counters.finish(StreamOutcome::Completed);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
