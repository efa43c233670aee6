use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use crate::engine::bits::{Bits, Codeword};
use crate::engine::frequency::FrequencyTable;
use crate::engine::tree::{HuffmanNode, HuffmanTree};

/// Symbol to codeword mapping derived from a [`HuffmanTree`].
///
/// Each derivation builds a fresh mapping; nothing is shared between trees.
#[derive(Debug, Clone)]
pub struct CodeBook<S> {
    entries: Vec<(S, Codeword)>,
    index: HashMap<S, usize>,
}

impl<S> CodeBook<S>
where
    S: Eq + Hash + Clone + Debug,
{
    /// Walks the tree depth-first (left = 0, right = 1) and records one
    /// codeword per leaf. A single-leaf tree gets the codeword `0`.
    pub fn from_tree(tree: &HuffmanTree<S>) -> Self {
        let mut book = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };

        if let HuffmanNode::Leaf { symbol, .. } = tree.root_node() {
            let mut code = Codeword::new();
            code.push(false);
            book.insert(symbol.clone(), code);
            return book;
        }

        let mut stack = vec![(tree.root(), Codeword::new())];
        while let Some((id, prefix)) = stack.pop() {
            match tree.node(id) {
                HuffmanNode::Leaf { symbol, .. } => book.insert(symbol.clone(), prefix),
                HuffmanNode::Internal { left, right, .. } => {
                    let mut right_code = prefix.clone();
                    right_code.push(true);
                    let mut left_code = prefix;
                    left_code.push(false);
                    stack.push((*right, right_code));
                    stack.push((*left, left_code));
                }
            }
        }

        debug!(symbols = book.len(), max_len = book.max_len(), "codebook derived");
        book
    }

    fn insert(&mut self, symbol: S, code: Codeword) {
        self.index.insert(symbol.clone(), self.entries.len());
        self.entries.push((symbol, code));
    }

    pub fn get(&self, symbol: &S) -> Option<&Bits> {
        self.index
            .get(symbol)
            .map(|&slot| self.entries[slot].1.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in traversal order (leftmost leaf first).
    pub fn iter(&self) -> impl Iterator<Item = (&S, &Bits)> {
        self.entries
            .iter()
            .map(|(symbol, code)| (symbol, code.as_bitslice()))
    }

    pub fn max_len(&self) -> usize {
        self.entries.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// Sum of frequency times codeword length over every counted symbol.
    /// Symbols missing from the codebook contribute nothing.
    pub fn encoded_len(&self, frequencies: &FrequencyTable<S>) -> usize {
        frequencies
            .iter()
            .filter_map(|(symbol, count)| self.get(symbol).map(|code| count * code.len()))
            .sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Bits> = self
            .entries
            .iter()
            .map(|(_, code)| code.as_bitslice())
            .collect();
        codes.sort();
        // After sorting, a prefix sorts immediately before some word it prefixes
        codes.windows(2).all(|pair| {
            let (shorter, longer) = (pair[0], pair[1]);
            !longer.starts_with(shorter)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::*;
    use crate::engine::bits::bit_string;

    fn book_for(text: &str) -> (FrequencyTable<char>, CodeBook<char>) {
        let symbols: Vec<char> = text.chars().collect();
        let table = FrequencyTable::from_symbols(&symbols);
        let tree = HuffmanTree::build(&table).unwrap();
        (table, CodeBook::from_tree(&tree))
    }

    fn code(book: &CodeBook<char>, c: char) -> String {
        bit_string(book.get(&c).unwrap())
    }

    #[test]
    fn abracadabra_codes() {
        let (table, book) = book_for("abracadabra");
        assert_eq!(book.len(), 5);
        assert_eq!(code(&book, 'a'), "0");
        assert_eq!(code(&book, 'c'), "100");
        assert_eq!(code(&book, 'd'), "101");
        assert_eq!(code(&book, 'b'), "110");
        assert_eq!(code(&book, 'r'), "111");
        assert_eq!(book.encoded_len(&table), 23);
        assert_eq!(book.max_len(), 3);
    }

    #[test]
    fn most_frequent_symbol_gets_shortest_code() {
        let (table, book) = book_for("abracadabra");
        let shortest = book.iter().map(|(_, c)| c.len()).min().unwrap();
        assert_eq!(book.get(&'a').unwrap().len(), shortest);

        for (s, count) in table.iter() {
            for (t, other) in table.iter() {
                if count > other {
                    assert!(book.get(s).unwrap().len() <= book.get(t).unwrap().len());
                }
            }
        }
    }

    #[test]
    fn codes_are_prefix_free() {
        let (_, book) = book_for("the quick brown fox jumps over the lazy dog");
        assert!(book.is_prefix_free());
        let (_, book) = book_for("abracadabra");
        assert!(book.is_prefix_free());
    }

    #[test]
    fn detects_prefix_violation() {
        let mut book = CodeBook::<char> {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        book.insert('a', bitvec![u8, Msb0; 0]);
        book.insert('b', bitvec![u8, Msb0; 0, 1]);
        assert!(!book.is_prefix_free());
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let (table, book) = book_for("aaaa");
        assert_eq!(code(&book, 'a'), "0");
        assert_eq!(book.encoded_len(&table), 4);
    }

    #[test]
    fn fresh_book_per_tree() {
        let (_, first) = book_for("ab");
        let (_, second) = book_for("xyz");
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 3);
        assert!(second.get(&'a').is_none());
    }

    #[test]
    fn classic_distribution_is_optimal() {
        // Textbook example with a known optimal cost of 224 bits
        let table = FrequencyTable::from_counts(vec![
            ('a', 45),
            ('b', 13),
            ('c', 12),
            ('d', 16),
            ('e', 9),
            ('f', 5),
        ])
        .unwrap();
        let tree = HuffmanTree::build(&table).unwrap();
        let book = CodeBook::from_tree(&tree);
        assert_eq!(book.encoded_len(&table), 224);
    }
}
