//! Frequent itemsets and the level-wise search that finds them.

pub mod count;

pub use count::generate_frequent_itemsets;

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Identifier, Itemset, ItemsetLength, SupportCount};

/// A frequent itemset with its support.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemsetRecord<I> {
    pub itemset: Itemset<I>,
    /// Fraction of baskets containing every item of `itemset`.
    pub support: f64,
    /// Number of baskets containing every item of `itemset`.
    pub count: SupportCount,
}

/// Every frequent itemset of one mining run.
///
/// Records are ordered by itemset size, then lexically by items.
#[derive(Debug, Clone)]
pub struct FrequentItemsets<I> {
    total_baskets: usize,
    records: Vec<ItemsetRecord<I>>,
    lookup: HashMap<Itemset<I>, usize>,
}

impl<I: Identifier> FrequentItemsets<I> {
    pub fn empty(total_baskets: usize) -> Self {
        Self {
            total_baskets,
            records: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Wrap records mined elsewhere. Records are put in canonical order; a
    /// repeated itemset keeps its first record.
    pub fn from_records(total_baskets: usize, mut records: Vec<ItemsetRecord<I>>) -> Self {
        records.sort_by(|a, b| {
            a.itemset
                .len()
                .cmp(&b.itemset.len())
                .then_with(|| a.itemset.cmp(&b.itemset))
        });
        records.dedup_by(|later, earlier| later.itemset == earlier.itemset);

        let lookup = records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.itemset.clone(), position))
            .collect();

        Self {
            total_baskets,
            records,
            lookup,
        }
    }

    /// Support denominator of the run.
    pub fn total_baskets(&self) -> usize {
        self.total_baskets
    }

    pub fn records(&self) -> &[ItemsetRecord<I>] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ItemsetRecord<I>> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, itemset: &Itemset<I>) -> Option<&ItemsetRecord<I>> {
        self.lookup
            .get(itemset)
            .map(|&position| &self.records[position])
    }

    pub fn contains(&self, itemset: &Itemset<I>) -> bool {
        self.lookup.contains_key(itemset)
    }

    pub fn support(&self, itemset: &Itemset<I>) -> Option<f64> {
        self.get(itemset).map(|record| record.support)
    }

    /// Records whose itemset has exactly `size` items.
    pub fn of_size(&self, size: ItemsetLength) -> impl Iterator<Item = &ItemsetRecord<I>> + '_ {
        self.records
            .iter()
            .filter(move |record| record.itemset.len() == size)
    }

    /// Size of the largest frequent itemset, zero when nothing is frequent.
    pub fn max_len(&self) -> ItemsetLength {
        self.records
            .last()
            .map_or(0, |record| record.itemset.len())
    }
}

impl<I: Identifier> PartialEq for FrequentItemsets<I> {
    fn eq(&self, other: &Self) -> bool {
        self.total_baskets == other.total_baskets && self.records == other.records
    }
}
