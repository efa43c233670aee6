use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::bits::EncodedBits;
use crate::engine::codebook::CodeBook;
use crate::engine::decoder;
use crate::engine::encoder;
use crate::engine::error::CodingError;
use crate::engine::frequency::FrequencyTable;
use crate::engine::tree::HuffmanTree;

/// Summary of one encoding run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodingStats {
    pub symbols: usize,
    pub distinct_symbols: usize,
    pub encoded_bits: usize,
    pub fixed_width_bits: usize,
    pub compression_ratio: f64,
    pub average_code_length: f64,
    pub entropy_bits: f64,
}

/// A tree plus the codebook derived from it.
///
/// The tree is the one artifact both directions need; the codebook only
/// speeds up encoding.
#[derive(Debug, Clone)]
pub struct HuffmanCodec<S> {
    frequencies: FrequencyTable<S>,
    tree: HuffmanTree<S>,
    codebook: CodeBook<S>,
}

impl<S> HuffmanCodec<S>
where
    S: Eq + Hash + Clone + Debug,
{
    pub fn from_symbols(symbols: &[S]) -> Result<Self, CodingError> {
        Self::from_frequencies(FrequencyTable::from_symbols(symbols))
    }

    pub fn from_frequencies(frequencies: FrequencyTable<S>) -> Result<Self, CodingError> {
        let tree = HuffmanTree::build(&frequencies)?;
        let codebook = CodeBook::from_tree(&tree);
        info!(
            distinct = frequencies.len(),
            total = frequencies.total(),
            max_code_len = codebook.max_len(),
            "huffman codec ready"
        );
        Ok(Self {
            frequencies,
            tree,
            codebook,
        })
    }

    pub fn encode(&self, symbols: &[S]) -> Result<EncodedBits, CodingError> {
        encoder::encode(symbols, &self.codebook)
    }

    pub fn decode(&self, bits: &EncodedBits) -> Result<Vec<S>, CodingError> {
        decoder::decode(bits.as_bits(), &self.tree)
    }

    pub fn tree(&self) -> &HuffmanTree<S> {
        &self.tree
    }

    pub fn codebook(&self) -> &CodeBook<S> {
        &self.codebook
    }

    pub fn frequencies(&self) -> &FrequencyTable<S> {
        &self.frequencies
    }

    /// Bits per symbol a fixed-width code over the same alphabet would use.
    pub fn fixed_width(&self) -> usize {
        let distinct = self.frequencies.len();
        let mut width = 1;
        while (1usize << width) < distinct {
            width += 1;
        }
        width
    }

    /// Statistics for `encoded`, assumed to be the encoding of a sequence
    /// counted by this codec's frequency table.
    pub fn stats(&self, encoded: &EncodedBits) -> CodingStats {
        let symbols = self.frequencies.total();
        let fixed_width_bits = symbols * self.fixed_width();
        let encoded_bits = encoded.len();
        let compression_ratio = if fixed_width_bits > 0 {
            encoded_bits as f64 / fixed_width_bits as f64
        } else {
            0.0
        };
        let average_code_length = if symbols > 0 {
            encoded_bits as f64 / symbols as f64
        } else {
            0.0
        };

        CodingStats {
            symbols,
            distinct_symbols: self.frequencies.len(),
            encoded_bits,
            fixed_width_bits,
            compression_ratio,
            average_code_length,
            entropy_bits: self.frequencies.entropy_bits(),
        }
    }
}
