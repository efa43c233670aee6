use std::fmt::Debug;
use std::hash::Hash;

use tracing::trace;

use crate::engine::bits::Bits;
use crate::engine::error::CodingError;
use crate::engine::tree::{HuffmanNode, HuffmanTree};

/// Replays the tree walk over `bits`, emitting a symbol at every leaf.
///
/// The cursor lives only for the duration of this call, so one tree can
/// serve any number of decoders at once. The bits must be an exact
/// concatenation of codewords: ending mid-path is an error, never a partial
/// result.
pub fn decode<S>(bits: &Bits, tree: &HuffmanTree<S>) -> Result<Vec<S>, CodingError>
where
    S: Eq + Hash + Clone + Debug,
{
    if let HuffmanNode::Leaf { symbol, .. } = tree.root_node() {
        return decode_single(bits, symbol);
    }

    let root = tree.root();
    let mut out = Vec::new();
    let mut cursor = root;
    let mut pending = 0usize;

    for bit in bits.iter().by_vals() {
        cursor = match tree.node(cursor) {
            HuffmanNode::Internal { left, right, .. } => if bit { *right } else { *left },
            // cursor is reset to the root after every leaf
            HuffmanNode::Leaf { .. } => unreachable!("cursor rests on a leaf"),
        };
        pending += 1;

        if let HuffmanNode::Leaf { symbol, .. } = tree.node(cursor) {
            out.push(symbol.clone());
            cursor = root;
            pending = 0;
        }
    }

    if pending > 0 {
        return Err(CodingError::TruncatedCode {
            decoded: out.len(),
            dangling_bits: pending,
        });
    }

    trace!(bits = bits.len(), symbols = out.len(), "decoded sequence");
    Ok(out)
}

/// The lone symbol owns the codeword `0`; a `1` has nowhere to go.
fn decode_single<S: Clone>(bits: &Bits, symbol: &S) -> Result<Vec<S>, CodingError> {
    if let Some(position) = bits.first_one() {
        return Err(CodingError::UnexpectedBit { position });
    }
    Ok(vec![symbol.clone(); bits.len()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bits::EncodedBits;
    use crate::engine::error::ErrorKind;
    use crate::engine::frequency::FrequencyTable;

    fn tree_for(text: &str) -> HuffmanTree<char> {
        let symbols: Vec<char> = text.chars().collect();
        HuffmanTree::build(&FrequencyTable::from_symbols(&symbols)).unwrap()
    }

    fn bits(s: &str) -> EncodedBits {
        s.parse().unwrap()
    }

    #[test]
    fn decodes_abracadabra() {
        let tree = tree_for("abracadabra");
        let out = decode(bits("01101110100010101101110").as_bits(), &tree).unwrap();
        assert_eq!(out.into_iter().collect::<String>(), "abracadabra");
    }

    #[test]
    fn empty_bits_decode_to_empty() {
        let tree = tree_for("abracadabra");
        assert!(decode(EncodedBits::new().as_bits(), &tree).unwrap().is_empty());
    }

    #[test]
    fn truncated_codeword_is_malformed() {
        let tree = tree_for("abracadabra");
        // drop the final "0" (a) and the last bit of "111" (r)
        let err = decode(bits("011011101000101011011").as_bits(), &tree).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err, CodingError::TruncatedCode { decoded: 9, dangling_bits: 2 });
    }

    #[test]
    fn cut_on_codeword_boundary_still_decodes() {
        let tree = tree_for("abracadabra");
        let out = decode(bits("0110111010001010110111").as_bits(), &tree).unwrap();
        assert_eq!(out.into_iter().collect::<String>(), "abracadabr");
    }

    #[test]
    fn single_leaf_counts_zero_bits() {
        let tree = tree_for("aaaa");
        let out = decode(bits("0000").as_bits(), &tree).unwrap();
        assert_eq!(out, vec!['a'; 4]);
    }

    #[test]
    fn single_leaf_rejects_one_bits() {
        let tree = tree_for("aaaa");
        let err = decode(bits("0010").as_bits(), &tree).unwrap_err();
        assert_eq!(err, CodingError::UnexpectedBit { position: 2 });
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn independent_calls_share_no_cursor() {
        let tree = tree_for("abracadabra");
        assert!(decode(bits("11").as_bits(), &tree).is_err());
        let out = decode(bits("0110").as_bits(), &tree).unwrap();
        assert_eq!(out, vec!['a', 'b']);
    }
}
