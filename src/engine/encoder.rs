use std::fmt::Debug;
use std::hash::Hash;

use tracing::trace;

use crate::engine::bits::EncodedBits;
use crate::engine::codebook::CodeBook;
use crate::engine::error::CodingError;

/// Concatenates the codeword of every symbol, in input order.
///
/// Fails on the first symbol the codebook does not cover; that only happens
/// when the codebook was derived from a different input.
pub fn encode<S>(symbols: &[S], codebook: &CodeBook<S>) -> Result<EncodedBits, CodingError>
where
    S: Eq + Hash + Clone + Debug,
{
    let mut bits = EncodedBits::with_capacity(symbols.len() * codebook.max_len().max(1));

    for (position, symbol) in symbols.iter().enumerate() {
        match codebook.get(symbol) {
            Some(code) => bits.extend_from_bits(code),
            None => {
                return Err(CodingError::UnknownSymbol {
                    position,
                    symbol: format!("{:?}", symbol),
                })
            }
        }
    }

    trace!(symbols = symbols.len(), bits = bits.len(), "encoded sequence");
    Ok(bits)
}
