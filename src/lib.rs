//! Compact binary-to-text encoding with base91!
//!
//! base91 encodes binary data as printable ASCII using an alphabet of 91 symbols. Where base64 turns every 3
//! bytes into 4 characters (an overhead of 33%), base91 needs at most 16 characters for every 13 bytes plus
//! two at the end, an overhead of about 23%. The output stays safe for text-oriented transports such as
//! email bodies or terminals.
//!
//! Using the [standard](STANDARD) alphabet, the bytes of "Hello, World!" get encoded as:
//! ```text
//! >OwJh>}AQ;r@@Y?F
//! ```
//!
//!
//! # Overview
//!
//! - One-shot [`encode`] and [`decode`] on the standard alphabet, and the same on any custom [`Encoding`].
//! - Appending variants, [`Encoding::encode_into`] and [`Encoding::decode_into`], for reusing buffers.
//! - Streaming over [`std::io`] with [`Encoder`] and [`Decoder`]; chunks may be split anywhere.
//! - Line breaks (`\r` and `\n`) in encoded text are ignored, so wrapped text decodes as-is.
//! - Invalid symbols are reported with their [offset](CorruptInput::offset); decoding never guesses.
//!
//!
//! # Serde
//!
//! Enable the `serde` feature and base91 can be used to serialize/deserialize fields that implement
//! `AsRef<[u8]>` and `From<Vec<u8>>`:
//! ```text
//! #[derive(Serialize, Deserialize)]
//! struct Blob {
//!     #[serde(with = "base91")]
//!     payload: Vec<u8>,
//!     name: String,
//! }
//! ```
//!
//! Serde always uses the [standard](STANDARD) alphabet.
//!
//!
//! # Examples
//!
//! Basic usage with the standard alphabet:
//! ```
//! let encoded = base91::encode(b"test");
//! let decoded = base91::decode(&encoded)?;
//!
//! assert_eq!(encoded, "fPNKd");
//! assert_eq!(decoded, b"test");
//! # Ok::<(), base91::CorruptInput>(())
//! ```
//!
//! Custom alphabet:
//! ```
//! use base91::{Encoding, STANDARD_ALPHABET};
//!
//! // swap '"' for '-', which is friendlier to quoted strings
//! let mut symbols = *STANDARD_ALPHABET;
//! symbols[90] = b'-';
//!
//! let encoding = Encoding::new(symbols)?;
//! let encoded = encoding.encode([0xFF, 0xFF, 0xFF]);
//!
//! assert!(!encoded.contains('"'));
//! assert_eq!(encoding.decode(&encoded).unwrap(), [0xFF, 0xFF, 0xFF]);
//! # Ok::<(), base91::InvalidAlphabet>(())
//! ```
//!
//! Streaming:
//! ```
//! use std::io::{Read, Write};
//!
//! let mut encoder = base91::STANDARD.encoder(Vec::new());
//! for chunk in ["Hello", ", ", "World!"] {
//!     encoder.write_all(chunk.as_bytes())?;
//! }
//! let encoded = encoder.finish()?;
//!
//! let mut decoded = String::new();
//! base91::STANDARD.decoder(&encoded[..]).read_to_string(&mut decoded)?;
//!
//! assert_eq!(decoded, "Hello, World!");
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//!
//! # How it works
//!
//! A pair of base91 digits can represent 91² = 8281 values, a little more than the 8192 values of 13 bits
//! but well short of the 16384 values of 14 bits. Packing 13 bits into every pair is simple, but leaves
//! those 89 extra values unused.
//!
//! The encoder instead keeps an accumulator of input bits, least significant first. Once it holds more than
//! 13 bits, it looks at the low 13 of them:
//! - If their value is above 88, those 13 bits become the next pair.
//! - Otherwise they are at most 88, so the 14th bit can be included as well; 8192 + 88 = 8280 is still
//! below 8281. These 14 bits become the next pair.
//!
//! A pair is written low digit first, `alphabet[value % 91]` then `alphabet[value / 91]`. When the input
//! runs out, any leftover bits are written as one digit if they fit in one (at most 7 bits and a value of
//! at most 90), and as a pair otherwise.
//!
//! The decoder reverses this. It reads a pair, rebuilds the value, and runs the same threshold test on it.
//! A 13-bit value is always above 88, while a value from a 14-bit window is at most 88 in its low 13 bits,
//! so the test tells the decoder how many bits the pair carries. Whole bytes are then shifted out of the
//! accumulator as soon as they are complete. A single trailing digit holds the last byte's remaining bits.

mod alphabet;
mod encode;
mod decode;
mod stream;
mod serde;

pub use alphabet::*;
pub use encode::*;
pub use decode::*;
pub use stream::*;

#[cfg(feature = "serde")]
pub use self::serde::*;

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use rand::{rngs::SmallRng, seq::SliceRandom, Rng, RngCore, SeedableRng};
    use crate::*;

    fn round_trip(data: &[u8], encoding: &Encoding) {
        let encoded = encoding.encode(data);
        assert!(encoded.bytes().all(|byte| encoding.index_of(byte).is_some()), "{data:?}");

        let decoded = encoding.decode(&encoded);
        assert_eq!(decoded.as_deref(), Ok(data), "{data:?}, {encoded:?}");
    }

    fn round_trip_stream(data: &[u8], encoding: &Encoding, rng: &mut SmallRng) {
        let mut encoder = encoding.encoder(Vec::new());
        let mut rest = data;
        while !rest.is_empty() {
            let (chunk, tail) = rest.split_at(rng.gen_range(1..=rest.len()));
            encoder.write_all(chunk).unwrap();
            rest = tail;
        }
        let encoded = encoder.finish().unwrap();
        assert_eq!(encoded, encoding.encode(data).as_bytes(), "{data:?}");

        let mut decoded = Vec::new();
        encoding.decoder(&encoded[..]).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, data, "{data:?}");
    }

    fn stress(n: usize) {
        let mut rng = SmallRng::seed_from_u64(1452698513470938102);
        let mut shuffled = *STANDARD_ALPHABET;
        shuffled.shuffle(&mut rng);

        let encodings = [STANDARD.clone(), Encoding::new(shuffled).unwrap()];
        let sizes = [0, 1, 2, 3, 4, 12, 13, 14, 15, 26, 27, 28, 31, 32, 64, 100, 250, 509, 510];

        for size in sizes {
            for _ in 0..n {
                let mut data = vec![0; size];
                rng.fill_bytes(&mut data);

                for encoding in &encodings {
                    round_trip(&data, encoding);
                    round_trip_stream(&data, encoding, &mut rng);
                }
            }
        }
    }

    #[test]
    fn stress_medium() {
        stress(200);
    }

    #[test]
    fn threshold_edges() {
        // low 13 bits of 88 and 89 take the 14-bit and 13-bit branch respectively
        for value in [0u16, 88, 89, 90, 91, 8191, 8192, 8280, 16383] {
            for high in [0x00, 0x5A, 0xFF] {
                let data = [value as u8, (value >> 8) as u8, high];
                round_trip(&data, &STANDARD);
                round_trip(&data[..2], &STANDARD);
            }
        }
    }

    #[test]
    fn uniform_inputs() {
        for len in 0..64 {
            for byte in [0x00, 0x01, 0x58, 0x59, 0x7F, 0x80, 0xFF] {
                round_trip(&vec![byte; len], &STANDARD);
            }
        }
    }

    #[test]
    fn long_text() {
        let text = "https://dl.google.com/tag/s/appguid%3D%7B8A69D345-D564-463C-AFF1-A69D9E530F96%7D%26iid%3D\
            %7B1286A4E6-C3EC-E4C5-608C-0318FEE0C519%7D%26lang%3Dzh-CN%26browser%3D4%26usagestats%3D0%26appname\
            %3DGoogle%2520Chrome%26needsadmin%3Dprefers%26ap%3Dx64-stable%26brand%3DCHWL%26installdataindex\
            %3Ddefaultbrowser/update2/installers/ChromeStandaloneSetup64.exe";
        round_trip(text.as_bytes(), &STANDARD);
    }
}
