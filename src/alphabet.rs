//! The symbol table shared by the encoder and decoder.

use std::fmt;
use thiserror::Error;

/// Number of symbols in a base91 alphabet.
pub const ALPHABET_LEN: usize = 91;

/// The symbols of the [standard](STANDARD) alphabet, in index order.
///
/// These are the printable ASCII characters except space, `-`, `'`, and `\`.
pub const STANDARD_ALPHABET: &[u8; ALPHABET_LEN] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!#$%&()*+,./:;<=>?@[]^_`{|}~\"";

/// The standard base91 encoding, using [`STANDARD_ALPHABET`].
pub static STANDARD: Encoding = Encoding::from_table(STANDARD_ALPHABET);

/// Reverse-lookup sentinel for bytes that are not part of the alphabet.
const INVALID: u8 = 0xFF;

/// Error type for constructing an [`Encoding`] from a custom alphabet.
#[derive(Error, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum InvalidAlphabet {
    /// The alphabet did not contain exactly 91 symbols.
    #[error("Alphabet must contain exactly 91 symbols, got {0}")]
    Length(usize),

    /// A symbol was not a graphic ASCII character.
    #[error("Symbol {byte:#04x} at index {index} is not a graphic ASCII character")]
    Unprintable { index: usize, byte: u8 },

    /// The same symbol occurred twice.
    #[error("Symbol {byte:#04x} occurs at both index {first} and index {second}")]
    Duplicate { byte: u8, first: usize, second: usize },
}

/// A base91 alphabet together with its reverse lookup.
///
/// The lookup is built once on construction; encoding and decoding never allocate tables of their own. An
/// `Encoding` is immutable, so a single value can be shared by any number of threads.
///
/// # Examples
///
/// ```
/// use base91::{Encoding, STANDARD_ALPHABET};
///
/// // the standard symbols in reverse order
/// let mut symbols = *STANDARD_ALPHABET;
/// symbols.reverse();
///
/// let reversed = Encoding::new(symbols)?;
/// let encoded = reversed.encode(b"test");
///
/// assert_ne!(encoded, base91::encode(b"test"));
/// assert_eq!(reversed.decode(&encoded).unwrap(), b"test");
/// # Ok::<(), base91::InvalidAlphabet>(())
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Encoding {
    /// Index to symbol.
    symbols: [u8; ALPHABET_LEN],
    /// Byte value to index, or [`INVALID`].
    lookup: [u8; 256],
}

impl Encoding {
    /// Creates an encoding from a custom alphabet.
    ///
    /// The alphabet must consist of exactly 91 distinct graphic ASCII characters. Space and the line breaks
    /// `\r` and `\n` are never valid symbols, since the decoder discards line breaks.
    pub fn new(alphabet: impl AsRef<[u8]>) -> Result<Encoding, InvalidAlphabet> {
        let alphabet = alphabet.as_ref();
        let symbols: &[u8; ALPHABET_LEN] = alphabet
            .try_into()
            .map_err(|_| InvalidAlphabet::Length(alphabet.len()))?;

        let mut seen: [Option<usize>; 256] = [None; 256];

        for (index, &byte) in symbols.iter().enumerate() {
            if !byte.is_ascii_graphic() {
                return Err(InvalidAlphabet::Unprintable { index, byte });
            }
            if let Some(first) = seen[byte as usize] {
                return Err(InvalidAlphabet::Duplicate { byte, first, second: index });
            }
            seen[byte as usize] = Some(index);
        }
        Ok(Encoding::from_table(symbols))
    }

    /// Builds the reverse lookup for an alphabet that is already known to be valid.
    ///
    /// Evaluated at compile time for [`STANDARD`], where the assertions reject a malformed table outright.
    const fn from_table(symbols: &[u8; ALPHABET_LEN]) -> Encoding {
        let mut lookup = [INVALID; 256];
        let mut i = 0;

        while i < ALPHABET_LEN {
            let byte = symbols[i];
            assert!(byte.is_ascii_graphic(), "symbols must be graphic ASCII");
            assert!(lookup[byte as usize] == INVALID, "symbols must be distinct");
            lookup[byte as usize] = i as u8;
            i += 1;
        }
        Encoding {
            symbols: *symbols,
            lookup,
        }
    }

    /// Returns the symbols of the alphabet, in index order.
    pub const fn symbols(&self) -> &[u8; ALPHABET_LEN] {
        &self.symbols
    }

    /// Gets the symbol for a digit.
    ///
    /// # Panics
    ///
    /// If `index` is not below 91.
    pub const fn symbol(&self, index: u8) -> u8 {
        self.symbols[index as usize]
    }

    /// Gets the digit represented by a symbol, or `None` if the byte is not part of the alphabet.
    pub const fn index_of(&self, byte: u8) -> Option<u8> {
        match self.lookup[byte as usize] {
            INVALID => None,
            index => Some(index),
        }
    }

    /// Appends the two symbols of a digit pair, low digit first.
    #[inline]
    pub(crate) fn push_pair(&self, value: u32, out: &mut Vec<u8>) {
        out.push(self.symbols[(value % 91) as usize]);
        out.push(self.symbols[(value / 91) as usize]);
    }
}

impl Default for Encoding {
    fn default() -> Self {
        STANDARD.clone()
    }
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // symbols are validated ascii
        let alphabet = String::from_utf8_lossy(&self.symbols);
        f.debug_tuple("Encoding").field(&alphabet).finish()
    }
}
