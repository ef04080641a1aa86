//! The read loop: transport chunks in, sink calls out.
//!
//! [`deliver`] owns the byte stream for the whole reply. It checks the
//! cancellation token before every read and races each read against it, so
//! a blocked read is interrupted rather than waited out. The byte stream is
//! dropped before returning on every path, which closes the underlying
//! connection.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use parley_core::{CancellationToken, ChatError, DeltaSink, Finish, StreamOutcome};

use crate::decoder::StreamDecoder;

/// Drive `byte_stream` to completion, pushing every delta to `sink`.
///
/// Returns how the loop ended. Cancellation is not an error: it yields
/// [`Finish::Cancelled`] with whatever was delivered so far. A transport
/// error that arrives after `cancel` fired is taken to be the abort our own
/// cancellation caused and is swallowed; any other transport error is
/// returned.
pub async fn deliver<S, K>(
    byte_stream: S,
    sink: &mut K,
    cancel: &CancellationToken,
) -> Result<StreamOutcome, ChatError>
where
    S: Stream<Item = Result<Bytes, ChatError>> + Send,
    K: DeltaSink + ?Sized,
{
    let mut bytes_stream = Box::pin(byte_stream);
    let mut decoder = StreamDecoder::new();
    let mut delivered = 0usize;

    let finish = loop {
        if cancel.is_cancelled() {
            break Finish::Cancelled;
        }

        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => break Finish::Cancelled,
            next = bytes_stream.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                for delta in decoder.feed(&chunk) {
                    sink.push(&delta);
                    delivered += 1;
                }
                if decoder.is_done() {
                    break Finish::Done;
                }
            }
            Some(Err(err)) if cancel.is_cancelled() => {
                tracing::debug!(error = %err, "transport aborted by cancellation");
                break Finish::Cancelled;
            }
            Some(Err(err)) => {
                drop(bytes_stream);
                return Err(err);
            }
            None => {
                for delta in decoder.finish() {
                    sink.push(&delta);
                    delivered += 1;
                }
                break Finish::EndOfStream;
            }
        }
    };

    drop(bytes_stream);
    tracing::debug!(delivered, ?finish, "stream delivery finished");

    Ok(StreamOutcome {
        delivered,
        finish,
        finish_reason: decoder.finish_reason().map(str::to_string),
    })
}
