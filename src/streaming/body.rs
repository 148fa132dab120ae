//! Length-checked response body stream.
//!
//! The response advertises `Content-Length` before the first byte is read.
//! If the file shrinks underneath us the reader hits EOF early; this wrapper
//! turns that into an error so the connection is aborted instead of ending
//! cleanly with a short body.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;

/// Stream adapter that fails unless exactly `expected` bytes are produced.
pub struct ExactLengthStream<S> {
    inner: S,
    remaining: u64,
    done: bool,
}

impl<S> ExactLengthStream<S>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
{
    pub fn new(inner: S, expected: u64) -> Self {
        Self {
            inner,
            remaining: expected,
            done: false,
        }
    }
}

impl<S> Stream for ExactLengthStream<S>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
{
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                let len = chunk.len() as u64;
                if len > this.remaining {
                    this.done = true;
                    return Poll::Ready(Some(Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "stream produced more bytes than advertised",
                    ))));
                }
                this.remaining -= len;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.done = true;
                if this.remaining > 0 {
                    Poll::Ready(Some(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("file ended {} bytes early", this.remaining),
                    ))))
                } else {
                    Poll::Ready(None)
                }
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
