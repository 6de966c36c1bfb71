use std::mem::size_of;

use bitvec::vec::BitVec;
use itertools::Either;

use crate::types::BasketId;

const BASKET_ID_BITS: usize = size_of::<BasketId>() * 8;

/// Baskets containing one item.
///
/// A rare item keeps its sorted basket ids; an item common enough that one bit
/// per basket is smaller keeps a bit vector instead. Either way a tidset costs
/// at most one basket id per (basket, item) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tidset {
    len: usize,
    repr: Repr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    Sparse(Vec<BasketId>),
    Dense(BitVec),
}

impl Tidset {
    /// `basket_ids` must be strictly increasing and below `num_baskets`.
    pub fn from_sorted(basket_ids: Vec<BasketId>, num_baskets: usize) -> Self {
        debug_assert!(basket_ids.windows(2).all(|w| w[0] < w[1]));

        let len = basket_ids.len();
        let repr = if len * BASKET_ID_BITS > num_baskets {
            let mut bits = BitVec::repeat(false, num_baskets);
            for &basket_id in &basket_ids {
                bits.set(basket_id, true);
            }
            Repr::Dense(bits)
        } else {
            Repr::Sparse(basket_ids)
        };
        Tidset { len, repr }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_dense(&self) -> bool {
        matches!(self.repr, Repr::Dense(_))
    }

    /// Bytes held by the basket ids or bits.
    pub fn heap_bytes(&self) -> usize {
        match &self.repr {
            Repr::Sparse(ids) => ids.len() * size_of::<BasketId>(),
            Repr::Dense(bits) => bits.as_raw_slice().len() * size_of::<usize>(),
        }
    }

    /// Basket ids in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = BasketId> + '_ {
        match &self.repr {
            Repr::Sparse(ids) => Either::Left(ids.iter().copied()),
            Repr::Dense(bits) => Either::Right(bits.iter_ones()),
        }
    }

    pub fn contains(&self, basket_id: BasketId) -> bool {
        self.probe().contains(basket_id)
    }

    fn probe(&self) -> Probe<'_> {
        match &self.repr {
            Repr::Sparse(ids) => Probe::Sparse(ids),
            Repr::Dense(bits) => Probe::Dense(bits),
        }
    }
}

/// Number of baskets in every one of `tidsets`.
///
/// The smallest tidset drives; the others are probed in increasing basket
/// order, sparse ones by galloping forward. No tidsets means no baskets.
pub fn intersection_len(mut tidsets: Vec<&Tidset>) -> usize {
    tidsets.sort_by_key(|tidset| tidset.len());
    let (smallest, rest) = match tidsets.split_first() {
        Some(split) => split,
        None => return 0,
    };

    let mut probes: Vec<Probe<'_>> = rest.iter().map(|tidset| tidset.probe()).collect();
    smallest
        .iter()
        .filter(|&basket_id| probes.iter_mut().all(|probe| probe.contains(basket_id)))
        .count()
}

/// Membership test for increasing basket ids.
enum Probe<'a> {
    Sparse(&'a [BasketId]),
    Dense(&'a BitVec),
}

impl Probe<'_> {
    fn contains(&mut self, basket_id: BasketId) -> bool {
        match self {
            Probe::Sparse(ids) => gallop_to(ids, basket_id),
            Probe::Dense(bits) => bits.get(basket_id).map_or(false, |bit| *bit),
        }
    }
}

/// Drop the ids below `target` and report whether `target` is next.
fn gallop_to(ids: &mut &[BasketId], target: BasketId) -> bool {
    let mut step = 1;
    while step < ids.len() && ids[step] < target {
        step *= 2;
    }
    let end = (step + 1).min(ids.len());
    let skip = match ids[..end].binary_search(&target) {
        Ok(position) | Err(position) => position,
    };
    *ids = &ids[skip..];
    ids.first() == Some(&target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse(ids: Vec<BasketId>) -> Tidset {
        let tidset = Tidset::from_sorted(ids, 1_000);
        assert!(!tidset.is_dense());
        tidset
    }

    #[test]
    fn representation_follows_density() {
        assert!(!Tidset::from_sorted(vec![3], 100).is_dense());
        assert!(Tidset::from_sorted((0..100).collect(), 100).is_dense());
        assert!(Tidset::from_sorted(vec![], 0).is_empty());
    }

    #[test]
    fn both_representations_hold_the_same_baskets() {
        let ids: Vec<BasketId> = vec![0, 2, 3, 7, 64, 65, 99];
        let dense = Tidset::from_sorted(ids.clone(), 100);
        let sparse = Tidset::from_sorted(ids.clone(), 10_000);
        assert!(dense.is_dense() && !sparse.is_dense());

        for tidset in &[&dense, &sparse] {
            assert_eq!(tidset.len(), 7);
            assert_eq!(tidset.iter().collect::<Vec<_>>(), ids);
            assert!(tidset.contains(64));
            assert!(!tidset.contains(63));
            assert!(!tidset.contains(5_000));
        }
    }

    #[test]
    fn gallop_skips_ahead() {
        let ids: Vec<BasketId> = (0..100).map(|x| x * 3).collect();
        let mut rest: &[BasketId] = &ids;

        assert!(gallop_to(&mut rest, 0));
        assert!(!gallop_to(&mut rest, 40));
        assert_eq!(rest[0], 42);
        assert!(gallop_to(&mut rest, 201));
        assert!(!gallop_to(&mut rest, 1_000));
        assert!(rest.is_empty());
    }

    #[test]
    fn intersection_of_mixed_tidsets() {
        let evens = Tidset::from_sorted((0..1_000).step_by(2).collect(), 1_000);
        let threes = sparse((0..1_000).step_by(3).take(10).collect());
        let few = sparse(vec![0, 6, 7, 12, 999]);
        assert!(evens.is_dense());

        // multiples of 6 below 27
        assert_eq!(intersection_len(vec![&evens, &threes]), 5);
        assert_eq!(intersection_len(vec![&threes, &few, &evens]), 3);
        assert_eq!(intersection_len(vec![&few]), 5);
        assert_eq!(intersection_len(vec![]), 0);
    }
}
