//! Byte source and line splitting stages.
//!
//! The byte source hands out chunks of at most `chunk_size` bytes. The line
//! stage buffers partial lines across chunk boundaries and only asks for
//! the next chunk once every complete line in its buffer has been taken.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};
use std::io;
use tokio::io::AsyncRead;
use tokio_util::codec::Decoder;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

/// Splits a byte buffer into non-empty lines.
///
/// Accepts `\n` and `\r\n` terminators. An unterminated fragment left at
/// end of input is discarded rather than emitted as a final line.
#[derive(Debug, Default)]
pub struct LineDecoder;

impl LineDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for LineDecoder {
    type Item = Bytes;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        while let Some(index) = memchr::memchr(b'\n', src) {
            let mut line = src.split_to(index + 1);
            line.truncate(index);
            if line.last() == Some(&b'\r') {
                line.truncate(index - 1);
            }
            if !line.is_empty() {
                return Ok(Some(line.freeze()));
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if !src.is_empty() {
            warn!(
                "Discarding unterminated trailing fragment of {} bytes",
                src.len()
            );
            src.clear();
        }
        Ok(None)
    }
}

/// Byte chunks of at most `chunk_size` bytes
pub fn chunk_stream<R: AsyncRead>(reader: R, chunk_size: usize) -> ReaderStream<R> {
    ReaderStream::with_capacity(reader, chunk_size)
}

struct LineSource<R> {
    chunks: ReaderStream<R>,
    decoder: LineDecoder,
    buffer: BytesMut,
    exhausted: bool,
}

/// Non-empty lines of `reader`, in source order
pub fn line_stream<R>(reader: R, chunk_size: usize) -> impl Stream<Item = io::Result<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let source = LineSource {
        chunks: chunk_stream(reader, chunk_size),
        decoder: LineDecoder::new(),
        buffer: BytesMut::new(),
        exhausted: false,
    };

    stream::unfold(source, |mut source| async move {
        loop {
            if source.exhausted {
                return match source.decoder.decode_eof(&mut source.buffer) {
                    Ok(Some(line)) => Some((Ok(line), source)),
                    Ok(None) => None,
                    Err(err) => {
                        source.buffer.clear();
                        Some((Err(err), source))
                    }
                };
            }

            if let Some(line) = source.decoder.decode(&mut source.buffer).transpose() {
                return Some((line, source));
            }

            match source.chunks.next().await {
                Some(Ok(chunk)) => {
                    debug!("Read chunk of {} bytes", chunk.len());
                    source.buffer.extend_from_slice(&chunk);
                }
                Some(Err(err)) => {
                    source.buffer.clear();
                    source.exhausted = true;
                    return Some((Err(err), source));
                }
                None => {
                    debug!("Byte source exhausted");
                    source.exhausted = true;
                }
            }
        }
    })
}
