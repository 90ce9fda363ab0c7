use thiserror::Error;
use crate::*;

/// Error type for decoding data.
///
/// Decoding stops at the first byte that is neither a symbol of the alphabet nor a line break; nothing
/// decoded up to that point is returned.
#[derive(Error, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[error("Illegal base91 symbol {byte:#04x} at offset {offset}")]
pub struct CorruptInput {
    /// Position of the offending byte, counting symbols only; line breaks before it are not included.
    pub offset: usize,
    /// The offending byte.
    pub byte: u8,
}

/// Result of decoding data.
pub type Result<T> = std::result::Result<T, CorruptInput>;

/// Decodes text produced with the [standard](STANDARD) alphabet.
///
/// Line breaks (`\r` and `\n`) anywhere in the input are ignored.
///
/// # Examples
///
/// ```
/// let decoded = base91::decode("fP\r\nNKd")?;
///
/// assert_eq!(decoded, b"test");
/// # Ok::<(), base91::CorruptInput>(())
/// ```
pub fn decode(text: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    STANDARD.decode(text)
}

/// Returns an upper bound on the number of bytes produced when decoding `len` symbols.
///
/// Every digit pair carries at most 14 bits, and an unpaired trailing symbol yields one byte.
pub const fn max_decoded_len(len: usize) -> usize {
    match len {
        0 => 0,
        len => len / 8 * 7 + (len % 8 * 7) / 8 + 1,
    }
}

/// Returns whether a byte is a line break, which carries no data and is skipped when decoding.
#[inline]
pub(crate) const fn is_line_break(byte: u8) -> bool {
    matches!(byte, b'\r' | b'\n')
}

impl Encoding {
    /// Decodes text produced with this alphabet. Line breaks are ignored.
    pub fn decode(&self, text: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        // factored out non-generic code to reduce code size
        self.decode_mono(text.as_ref())
    }

    /// Decodes text, appending the bytes to `out` and returning how many were appended.
    ///
    /// On error, `out` is truncated back to its original length.
    pub fn decode_into(&self, text: impl AsRef<[u8]>, out: &mut Vec<u8>) -> Result<usize> {
        let text = text.as_ref();
        let start = out.len();
        out.reserve(max_decoded_len(text.len()));

        let mut unpacker = Unpacker::default();

        match unpacker.extend(self, text, out) {
            Ok(()) => {
                unpacker.finish(out);
                Ok(out.len() - start)
            }
            Err(error) => {
                out.truncate(start);
                Err(error)
            }
        }
    }

    /// Monomorphised decode implementation.
    #[inline(never)]
    fn decode_mono(&self, text: &[u8]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.decode_into(text, &mut buffer)?;
        Ok(buffer)
    }
}

/// Rebuilds bytes from symbols one-by-one.
///
/// Shared by [`Encoding::decode`] and the streaming [`Decoder`]; symbols may arrive in arbitrary chunks, the
/// pending digit carries a half-read pair over from one chunk to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Unpacker {
    /// Decoded bits not yet emitted, least significant first.
    bits: u32,
    /// Number of valid bits in [`Unpacker::bits`]. Never above 7 between pairs.
    len: u32,
    /// First digit of the current pair.
    pending: Option<u32>,
    /// Number of symbols consumed so far.
    offset: usize,
}

impl Unpacker {
    /// Consumes one digit, emitting bytes once a pair is complete.
    #[inline]
    fn push(&mut self, digit: u32, out: &mut Vec<u8>) {
        let Some(low) = self.pending.take() else {
            self.pending = Some(digit);
            return
        };
        let value = low + digit * 91;

        // same threshold as the encoder: values whose low 13 bits exceed 88 were packed from 13-bit windows
        self.bits |= value << self.len;
        self.len += if (value & 0x1FFF) > 88 { 13 } else { 14 };

        while self.len > 7 {
            out.push(self.bits as u8);
            self.bits >>= 8;
            self.len -= 8;
        }
    }

    /// Consumes a slice of text, skipping line breaks.
    ///
    /// Bytes decoded before an invalid symbol is found are still appended to `out`.
    pub fn extend(&mut self, encoding: &Encoding, text: &[u8], out: &mut Vec<u8>) -> Result<()> {
        for &byte in text {
            if is_line_break(byte) {
                continue
            }
            let digit = encoding
                .index_of(byte)
                .ok_or(CorruptInput { offset: self.offset, byte })?;

            self.offset += 1;
            self.push(digit as u32, out);
        }
        Ok(())
    }

    /// Emits the final byte if the text ended on an unpaired symbol.
    ///
    /// The encoder only ends on a single symbol when the leftover bits fit in one digit, so that digit is
    /// placed directly above the bits still held. Leftover bits with no pending digit are padding.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        let Unpacker { bits, len, pending, .. } = *self;
        *self = Unpacker {
            offset: self.offset,
            ..Unpacker::default()
        };

        if let Some(low) = pending {
            out.push((bits | low << len) as u8);
        }
    }
}
