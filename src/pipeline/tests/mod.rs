//! Tests for the streaming pipeline
//!
//! Drive the full bytes to summary path over in-memory sources, including
//! sources that fail part way through.

pub mod conversion;
pub mod error_handling;

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Assert two reals agree to within `1e-9`
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Serves `prefix`, then fails every later read
pub struct FailingReader {
    prefix: &'static [u8],
}

impl FailingReader {
    pub fn new(prefix: &'static [u8]) -> Self {
        Self { prefix }
    }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.prefix.is_empty() {
            return Poll::Ready(Err(io::Error::other("source went away")));
        }
        let prefix = self.prefix;
        let (head, tail) = prefix.split_at(prefix.len().min(buf.remaining()));
        buf.put_slice(head);
        self.prefix = tail;
        Poll::Ready(Ok(()))
    }
}

/// Counts reads issued against the wrapped source
pub struct CountingReader {
    inner: &'static [u8],
    reads: Arc<AtomicUsize>,
}

impl CountingReader {
    pub fn new(inner: &'static [u8]) -> (Self, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                reads: Arc::clone(&reads),
            },
            reads,
        )
    }
}

impl AsyncRead for CountingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}
