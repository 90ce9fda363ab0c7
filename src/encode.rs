use crate::*;

/// Encodes data using the [standard](STANDARD) alphabet.
///
/// # Examples
///
/// ```
/// assert_eq!(base91::encode(b"test"), "fPNKd");
/// ```
pub fn encode(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// Returns an upper bound on the number of symbols produced when encoding `len` bytes.
///
/// Every digit pair carries at least 13 bits, and the trailing bits take at most two more symbols.
pub const fn max_encoded_len(len: usize) -> usize {
    match len {
        0 => 0,
        len => len / 13 * 16 + (len % 13 * 8 / 13) * 2 + 2,
    }
}

impl Encoding {
    /// Encodes data as a string of symbols from this alphabet.
    pub fn encode(&self, data: impl AsRef<[u8]>) -> String {
        // factored out non-generic code to reduce code size
        self.encode_mono(data.as_ref())
    }

    /// Encodes data, appending the symbols to `out`.
    pub fn encode_into(&self, data: impl AsRef<[u8]>, out: &mut Vec<u8>) {
        let data = data.as_ref();
        out.reserve(max_encoded_len(data.len()));

        let mut packer = Packer::default();
        packer.extend(self, data, out);
        packer.finish(self, out);
    }

    /// Monomorphised encode implementation.
    #[inline(never)]
    fn encode_mono(&self, data: &[u8]) -> String {
        let mut buffer = Vec::new();
        self.encode_into(data, &mut buffer);
        String::from_utf8(buffer).expect("All symbols are ASCII")
    }
}

/// Packs bytes into digit pairs one-by-one.
///
/// This is all the state an encoder needs between bytes, so the streaming [`Encoder`] drives the exact same
/// packer as [`Encoding::encode`], only over several chunks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Packer {
    /// Input bits not yet emitted, least significant first.
    bits: u32,
    /// Number of valid bits in [`Packer::bits`]. Never above 13 between bytes.
    len: u32,
}

impl Packer {
    /// Absorbs one byte, emitting a digit pair once more than 13 bits are held.
    #[inline]
    fn push(&mut self, encoding: &Encoding, byte: u8, out: &mut Vec<u8>) {
        self.bits |= (byte as u32) << self.len;
        self.len += 8;

        if self.len > 13 {
            // a 13-bit window only wastes code space when its value fits in a single digit, in which case
            // the window is widened by one bit
            let mut value = self.bits & 0x1FFF;
            let width = if value > 88 {
                13
            } else {
                value = self.bits & 0x3FFF;
                14
            };
            self.bits >>= width;
            self.len -= width;
            encoding.push_pair(value, out);
        }
    }

    /// Absorbs a slice of bytes.
    pub fn extend(&mut self, encoding: &Encoding, data: &[u8], out: &mut Vec<u8>) {
        for &byte in data {
            self.push(encoding, byte, out);
        }
    }

    /// Emits the remaining bits, which take one symbol if they fit in a single digit and two otherwise.
    ///
    /// The packer is left empty, so finishing twice emits nothing the second time.
    pub fn finish(&mut self, encoding: &Encoding, out: &mut Vec<u8>) {
        let Packer { bits, len } = std::mem::take(self);

        if len > 0 {
            out.push(encoding.symbol((bits % 91) as u8));
            if len > 7 || bits > 90 {
                out.push(encoding.symbol((bits / 91) as u8));
            }
        }
    }
}
