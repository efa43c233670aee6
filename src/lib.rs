//! # huffkit
//!
//! Huffman coding over any hashable symbol type: text characters, pixel
//! intensities, byte streams.
//!
//! ```rust
//! use huffkit::HuffmanCodec;
//!
//! let text: Vec<char> = "abracadabra".chars().collect();
//! let codec = HuffmanCodec::from_symbols(&text)?;
//! let bits = codec.encode(&text)?;
//! assert_eq!(bits.len(), 23);
//! assert_eq!(codec.decode(&bits)?, text);
//! # Ok::<(), huffkit::CodingError>(())
//! ```

pub mod config;
pub mod engine;
pub mod image;

pub use engine::{
    CodeBook, CodingError, CodingStats, EncodedBits, ErrorKind, FrequencyTable, HuffmanCodec,
    HuffmanTree,
};
