//! Body streaming.
//!
//! Segment and pass-through bodies are never buffered whole: the response
//! writer polls one chunk at a time, so a slow client throttles upstream
//! reads. There is no deadline on this phase; a stalled upstream keeps the
//! stream open until either side closes it.

pub mod chunker;
pub mod metered;

pub use chunker::rechunk;
pub use metered::{MeteredStream, StreamCounters, StreamOutcome, StreamSummary};
