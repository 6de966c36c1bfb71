use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Display, Formatter},
    hash::Hash,
    iter::FromIterator,
    sync::Arc,
};

use serde::Serialize;

/// Dense item id. Ids are assigned in item order, so sorting ids sorts items.
pub type ItemId = usize;
/// Dense basket id, assigned in first-seen order.
pub type BasketId = usize;
/// Sorted item ids of one candidate or frequent itemset.
pub type Pattern = Vec<ItemId>;

pub type ItemsetLength = usize;
pub type SupportCount = usize;

pub type PatternCounts = BTreeMap<Pattern, SupportCount>;
/// Frequent patterns of every size, keyed by size.
pub type FrequentPatterns = BTreeMap<ItemsetLength, PatternCounts>;

/// An opaque basket or item identifier.
///
/// Identifiers only need equality, hashing and a total order. The order makes
/// mining output deterministic and drives the lexical tie-break when ranking.
pub trait Identifier: Clone + Eq + Hash + Ord + Debug + Send + Sync {
    /// Whether the identifier carries no value at all, e.g. an empty string.
    fn is_blank(&self) -> bool {
        false
    }
}

impl Identifier for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Identifier for &str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Identifier for Box<str> {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Identifier for Arc<str> {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

/// Identifiers that are never blank.
macro_rules! plain_identifier {
    ($($t:ty),*) => {
        $(impl Identifier for $t {})*
    };
}

plain_identifier!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char);

/// An immutable set of distinct items, stored sorted.
///
/// Two itemsets are equal iff they hold the same items, whatever order they
/// were discovered in. Itemsets compare lexicographically over their items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Itemset<I>(Vec<I>);

impl<I: Ord> Itemset<I> {
    pub fn new<T: IntoIterator<Item = I>>(items: T) -> Self {
        let mut items: Vec<I> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Itemset(items)
    }

    /// Caller guarantees `items` is strictly increasing.
    pub(crate) fn from_sorted(items: Vec<I>) -> Self {
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Itemset(items)
    }

    pub fn contains(&self, item: &I) -> bool {
        self.0.binary_search(item).is_ok()
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.iter().all(|item| other.contains(item))
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        !self.0.iter().any(|item| other.contains(item))
    }
}

impl<I> Itemset<I> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[I] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<I> {
        self.0
    }
}

impl<I: Ord> FromIterator<I> for Itemset<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Itemset::new(iter)
    }
}

impl<I: Ord> From<Vec<I>> for Itemset<I> {
    fn from(items: Vec<I>) -> Self {
        Itemset::new(items)
    }
}

impl<I> AsRef<[I]> for Itemset<I> {
    fn as_ref(&self) -> &[I] {
        &self.0
    }
}

impl<'a, I> IntoIterator for &'a Itemset<I> {
    type Item = &'a I;
    type IntoIter = std::slice::Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Display> Display for Itemset<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}
