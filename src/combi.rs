use itertools::Itertools;

use crate::types::{ItemId, Pattern, PatternCounts};

fn prefix_of(itemset: &[ItemId]) -> &[ItemId] {
    &itemset[..itemset.len().saturating_sub(1)]
}

/// Join step: build k-candidates from the frequent (k-1)-itemsets.
///
/// Two itemsets are joined only when they share their first k-2 items, so each
/// candidate is produced exactly once. Candidates come out sorted, and so do the
/// items inside each candidate.
///
/// https://github.com/tommyod/Efficient-Apriori/blob/master/efficient_apriori/itemsets.py
pub fn join_step<'a, T>(itemsets: T) -> Vec<Pattern>
where
    T: IntoIterator<Item = &'a Pattern>,
{
    let mut itemsets: Vec<&Pattern> = itemsets.into_iter().collect();
    if itemsets.is_empty() {
        return vec![];
    }
    itemsets.sort_unstable();
    itemsets.dedup();

    let mut candidates: Vec<Pattern> = Vec::new();
    let mut tail_items: Vec<ItemId> = Vec::with_capacity(itemsets.len());

    let mut start = 0;
    while start < itemsets.len() {
        let prefix = prefix_of(itemsets[start]);
        let end = itemsets[start..]
            .iter()
            .position(|itemset| prefix_of(itemset) != prefix)
            .map_or(itemsets.len(), |offset| start + offset);

        tail_items.clear();
        tail_items.extend(
            itemsets[start..end]
                .iter()
                .filter_map(|itemset| itemset.last().copied()),
        );

        for (&a, &b) in tail_items.iter().tuple_combinations() {
            let mut candidate = Vec::with_capacity(prefix.len() + 2);
            candidate.extend_from_slice(prefix);
            candidate.push(a);
            candidate.push(b);
            candidates.push(candidate);
        }

        start = end;
    }

    candidates
}

/// Prune step: drop candidates with a (k-1)-subset that is not frequent.
///
/// Support is anti-monotone, so such a candidate cannot be frequent and is
/// never counted. Dropping either of the last two items yields one of the two
/// joined parents, which are frequent by construction; only the other subsets
/// are looked up.
pub fn prune_step(candidates: Vec<Pattern>, frequent: &PatternCounts) -> Vec<Pattern> {
    let mut subset: Pattern = Vec::new();

    candidates
        .into_iter()
        .filter(|candidate| {
            let size = candidate.len();
            (0..size.saturating_sub(2)).all(|skip| {
                subset.clear();
                subset.extend(
                    candidate
                        .iter()
                        .enumerate()
                        .filter(|&(position, _)| position != skip)
                        .map(|(_, &item)| item),
                );
                frequent.contains_key(subset.as_slice())
            })
        })
        .collect()
}
