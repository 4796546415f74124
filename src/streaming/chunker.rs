//! Fixed-size re-chunking of a byte stream.

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, BoxStream, Stream, StreamExt};

struct ChunkState<E> {
    inner: BoxStream<'static, Result<Bytes, E>>,
    buf: BytesMut,
    done: bool,
}

/// Re-slice `inner` into chunks of exactly `chunk_size` bytes.
///
/// Only the final chunk may be shorter. Upstream frames are pulled one at a
/// time, so at most `chunk_size - 1` bytes plus one frame are held. After an
/// error the stream ends.
pub fn rechunk<S, E>(inner: S, chunk_size: usize) -> BoxStream<'static, Result<Bytes, E>>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Send + 'static,
{
    debug_assert!(chunk_size > 0);

    let state = ChunkState {
        inner: inner.boxed(),
        buf: BytesMut::with_capacity(chunk_size),
        done: false,
    };

    stream::unfold(state, move |mut state| async move {
        loop {
            if state.buf.len() >= chunk_size {
                let chunk = state.buf.split_to(chunk_size).freeze();
                return Some((Ok(chunk), state));
            }
            if state.done {
                if state.buf.is_empty() {
                    return None;
                }
                let rest = state.buf.split().freeze();
                return Some((Ok(rest), state));
            }
            match state.inner.next().await {
                Some(Ok(frame)) => state.buf.extend_from_slice(&frame),
                Some(Err(e)) => {
                    state.done = true;
                    state.buf.clear();
                    return Some((Err(e), state));
                }
                None => state.done = true,
            }
        }
    })
    .boxed()
}
