//! Byte-level program I/O

use std::io::{self, ErrorKind, Read, Write};
use tracing::warn;

/// Buffers program output and hands it to `inner` in chunks.
pub struct OutputSink<W: Write> {
    inner: W,
    buffer: Vec<u8>,
    threshold: usize,
    written: u64,
}

impl<W: Write> OutputSink<W> {
    pub fn new(inner: W, threshold: usize) -> Self {
        OutputSink {
            inner,
            buffer: Vec::with_capacity(threshold),
            threshold,
            written: 0,
        }
    }

    /// Append one byte, flushing once the buffer reaches the threshold.
    #[inline]
    pub fn push(&mut self, byte: u8) -> io::Result<()> {
        self.buffer.push(byte);
        self.written += 1;
        if self.buffer.len() >= self.threshold {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.write_all(&self.buffer)?;
        self.buffer.clear();
        self.inner.flush()
    }

    /// Bytes pushed so far, flushed or not
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Bytes waiting for the next flush
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Unwrap the destination. Anything still buffered is dropped.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Reads program input one byte at a time.
pub struct InputSource<R: Read> {
    inner: R,
    consumed: u64,
}

impl<R: Read> InputSource<R> {
    pub fn new(inner: R) -> Self {
        InputSource { inner, consumed: 0 }
    }

    /// Next byte, or 0 once input is exhausted or unreadable.
    pub fn read_byte(&mut self) -> u8 {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return 0,
                Ok(_) => {
                    self.consumed += 1;
                    return byte[0];
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!(error = %err, "input read failed, substituting 0");
                    return 0;
                }
            }
        }
    }

    /// Bytes actually read from the source
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}
