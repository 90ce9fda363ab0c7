//! Incremental encoding and decoding over [`std::io`] streams.
//!
//! Both adapters drive the same packing state as the one-shot functions, so chunk boundaries are arbitrary:
//! they need not fall on byte, symbol, or pair boundaries, and the output is identical to encoding or
//! decoding the concatenated input in one go.

use std::io::{self, Read, Write};
use log::{debug, trace};
use crate::*;

/// Size of the chunks a [`Decoder`] pulls from its source.
const CHUNK_LEN: usize = 1024;

impl Encoding {
    /// Wraps a sink in an [`Encoder`] using this alphabet.
    pub fn encoder<W: Write>(&self, sink: W) -> Encoder<'_, W> {
        Encoder::new(self, sink)
    }

    /// Wraps a source in a [`Decoder`] using this alphabet.
    pub fn decoder<R: Read>(&self, source: R) -> Decoder<'_, R> {
        Decoder::new(self, source)
    }
}

/// Encodes everything written to it and writes the symbols to a sink.
///
/// Symbols are queued internally and written out at the start of the next [`write`](Write::write), on
/// [`flush`](Write::flush), and on [`finish`](Encoder::finish). The last few symbols depend on where the input
/// ends, so the encoding is only complete once the encoder is finished. Dropping an unfinished encoder
/// finishes it, ignoring any errors.
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// let mut encoder = base91::STANDARD.encoder(Vec::new());
/// encoder.write_all(b"te")?;
/// encoder.write_all(b"st")?;
/// let encoded = encoder.finish()?;
///
/// assert_eq!(encoded, b"fPNKd");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Encoder<'e, W: Write> {
    encoding: &'e Encoding,
    /// Taken only when the encoder is finished.
    sink: Option<W>,
    packer: Packer,
    /// Symbols not yet accepted by the sink.
    queue: Vec<u8>,
}

impl<'e, W: Write> Encoder<'e, W> {
    /// Creates an encoder writing to `sink`.
    pub fn new(encoding: &'e Encoding, sink: W) -> Self {
        Encoder {
            encoding,
            sink: Some(sink),
            packer: Packer::default(),
            queue: Vec::new(),
        }
    }

    /// Returns a reference to the sink.
    pub fn get_ref(&self) -> &W {
        self.sink.as_ref().expect("Sink is present until finished")
    }

    /// Returns a mutable reference to the sink. Writing to it directly interleaves with the encoded output.
    pub fn get_mut(&mut self) -> &mut W {
        self.sink.as_mut().expect("Sink is present until finished")
    }

    /// Writes the final symbols, flushes the sink, and returns it.
    pub fn finish(mut self) -> io::Result<W> {
        self.close()?;
        Ok(self.sink.take().expect("Sink is present until finished"))
    }

    /// Emits the trailing symbols and writes out everything queued.
    fn close(&mut self) -> io::Result<()> {
        self.packer.finish(self.encoding, &mut self.queue);
        trace!("closing encoder with {} queued symbols", self.queue.len());
        self.drain()?;
        self.get_mut().flush()
    }

    /// Writes queued symbols to the sink until the queue is empty or the sink fails.
    ///
    /// Whatever the sink accepted is removed from the queue even on failure, so a retry resumes where this
    /// left off.
    fn drain(&mut self) -> io::Result<()> {
        let sink = self.sink.as_mut().expect("Sink is present until finished");
        let mut written = 0;

        let result = loop {
            if written == self.queue.len() {
                break Ok(())
            }
            match sink.write(&self.queue[written..]) {
                Ok(0) => break Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "sink stopped accepting encoded symbols",
                )),
                Ok(len) => written += len,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => break Err(error),
            }
        };
        self.queue.drain(..written);

        if !self.queue.is_empty() {
            trace!("{} symbols still queued after a failed write", self.queue.len());
        }
        result
    }
}

impl<W: Write> Write for Encoder<'_, W> {
    /// Accepts all of `data` once the symbols queued by earlier calls have been written out. If that fails,
    /// none of `data` is accepted.
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.drain()?;
        self.packer.extend(self.encoding, data, &mut self.queue);
        Ok(data.len())
    }

    /// Writes out all queued symbols and flushes the sink. Bits that do not yet form a full pair are held
    /// until more data arrives or the encoder is finished.
    fn flush(&mut self) -> io::Result<()> {
        self.drain()?;
        self.get_mut().flush()
    }
}

impl<W: Write> Drop for Encoder<'_, W> {
    fn drop(&mut self) {
        if self.sink.is_some() && !std::thread::panicking() {
            // errors cannot be reported from drop
            let _ = self.close();
        }
    }
}

/// Reads symbols from a source and yields the decoded bytes.
///
/// Line breaks are removed by a [`LineBreakFilter`] before the symbols reach the decoder. Decoded bytes that
/// do not fit in the caller's buffer are kept for the next read.
///
/// An invalid symbol fails the read with [`io::ErrorKind::InvalidData`], wrapping a [`CorruptInput`] whose
/// offset counts symbols from the start of the stream. Bytes decoded before the invalid symbol are still
/// returned first, and every read after the error fails the same way.
///
/// # Examples
///
/// ```
/// use std::io::Read;
///
/// let mut decoder = base91::STANDARD.decoder(&b"fPN\r\nKd"[..]);
/// let mut decoded = Vec::new();
/// decoder.read_to_end(&mut decoded)?;
///
/// assert_eq!(decoded, b"test");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Decoder<'e, R> {
    encoding: &'e Encoding,
    source: LineBreakFilter<R>,
    unpacker: Unpacker,
    chunk: Box<[u8]>,
    /// Decoded bytes, of which those before `cursor` have been handed out.
    queue: Vec<u8>,
    cursor: usize,
    state: State,
}

/// Progress of a [`Decoder`] through its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Reading,
    Finished,
    Failed(CorruptInput),
}

impl<'e, R: Read> Decoder<'e, R> {
    /// Creates a decoder reading from `source`.
    pub fn new(encoding: &'e Encoding, source: R) -> Self {
        Decoder {
            encoding,
            source: LineBreakFilter::new(source),
            unpacker: Unpacker::default(),
            chunk: vec![0; CHUNK_LEN].into_boxed_slice(),
            queue: Vec::new(),
            cursor: 0,
            state: State::Reading,
        }
    }

    /// Returns a reference to the source.
    pub fn get_ref(&self) -> &R {
        self.source.get_ref()
    }

    /// Returns the source. Decoded bytes not yet read are lost.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }

    /// Pulls the next chunk from the source and decodes it into the queue.
    fn refill(&mut self) -> io::Result<()> {
        let len = self.source.read(&mut self.chunk)?;

        if len == 0 {
            self.unpacker.finish(&mut self.queue);
            self.state = State::Finished;
            trace!("source exhausted, {} trailing bytes", self.queue.len());
            return Ok(())
        }
        if let Err(error) = self.unpacker.extend(self.encoding, &self.chunk[..len], &mut self.queue) {
            debug!("{error}");
            self.state = State::Failed(error);
        }
        Ok(())
    }
}

impl<R: Read> Read for Decoder<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0)
        }
        loop {
            let queued = &self.queue[self.cursor..];

            if !queued.is_empty() {
                let len = queued.len().min(buf.len());
                buf[..len].copy_from_slice(&queued[..len]);
                self.cursor += len;
                return Ok(len)
            }
            self.queue.clear();
            self.cursor = 0;

            match self.state {
                State::Reading => self.refill()?,
                State::Finished => return Ok(0),
                State::Failed(error) => return Err(io::Error::new(io::ErrorKind::InvalidData, error)),
            }
        }
    }
}

/// Removes line breaks (`\r` and `\n`) from everything read through it.
///
/// Each chunk read from the source is compacted in place. A chunk consisting only of line breaks is never
/// reported as a zero-length read, which would look like the end of the stream; the filter reads again
/// instead.
#[derive(Debug)]
pub struct LineBreakFilter<R> {
    inner: R,
}

impl<R: Read> LineBreakFilter<R> {
    /// Creates a filter reading from `inner`.
    pub fn new(inner: R) -> Self {
        LineBreakFilter { inner }
    }

    /// Returns a reference to the source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns a mutable reference to the source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Returns the source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for LineBreakFilter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0)
        }
        loop {
            let len = self.inner.read(buf)?;
            if len == 0 {
                return Ok(0)
            }
            let kept = strip_line_breaks(&mut buf[..len]);
            if kept > 0 {
                return Ok(kept)
            }
            trace!("skipped {len} line breaks");
        }
    }
}

/// Moves every byte that is not a line break to the front of `buf`, returning how many there are.
fn strip_line_breaks(buf: &mut [u8]) -> usize {
    let mut kept = 0;

    for i in 0..buf.len() {
        let byte = buf[i];
        if !is_line_break(byte) {
            buf[kept] = byte;
            kept += 1;
        }
    }
    kept
}
