use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::engine::error::CodingError;

/// Occurrence counts per distinct symbol.
///
/// Entries keep first-occurrence order. Tree construction uses that order as
/// the creation sequence of the leaves, which makes equal-weight merges
/// reproducible from one run to the next.
#[derive(Debug, Clone)]
pub struct FrequencyTable<S> {
    entries: Vec<(S, usize)>,
    index: HashMap<S, usize>,
}

impl<S> FrequencyTable<S>
where
    S: Eq + Hash + Clone + Debug,
{
    pub fn from_symbols(symbols: &[S]) -> Self {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for symbol in symbols {
            // a count never exceeds the slice length
            let _ = table.bump(symbol, 1);
        }
        table
    }

    /// Builds a table from precomputed counts, summing duplicate keys.
    ///
    /// The grand total must fit in a `usize`, since it becomes the root
    /// weight of the tree.
    pub fn from_counts<I>(counts: I) -> Result<Self, CodingError>
    where
        I: IntoIterator<Item = (S, usize)>,
    {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        let mut total = 0usize;
        for (symbol, count) in counts {
            if count == 0 {
                return Err(CodingError::ZeroFrequency {
                    symbol: format!("{:?}", symbol),
                });
            }
            total = total.checked_add(count).ok_or(CodingError::WeightOverflow)?;
            table.bump(&symbol, count)?;
        }
        Ok(table)
    }

    fn bump(&mut self, symbol: &S, by: usize) -> Result<(), CodingError> {
        match self.index.get(symbol) {
            Some(&slot) => {
                let count = &mut self.entries[slot].1;
                *count = count.checked_add(by).ok_or(CodingError::WeightOverflow)?;
            }
            None => {
                self.index.insert(symbol.clone(), self.entries.len());
                self.entries.push((symbol.clone(), by));
            }
        }
        Ok(())
    }

    pub fn count(&self, symbol: &S) -> Option<usize> {
        self.index.get(symbol).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, usize)> {
        self.entries.iter().map(|(symbol, count)| (symbol, *count))
    }

    /// Shannon entropy in bits per symbol.
    pub fn entropy_bits(&self) -> f64 {
        let total = self.total() as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.entries
            .iter()
            .map(|(_, count)| {
                let p = *count as f64 / total;
                -p * p.log2()
            })
            .sum()
    }
}
