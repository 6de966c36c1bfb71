#![allow(non_snake_case)]

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    combi::{join_step, prune_step},
    config::MinerConfig,
    error::{Error, Result},
    index::TransactionIndex,
    itemsets::{FrequentItemsets, ItemsetRecord},
    types::{
        FrequentPatterns, Identifier, Itemset, ItemsetLength, Pattern, PatternCounts,
        SupportCount,
    },
};

/// Generate every itemset whose support reaches `config.min_support`.
///
/// Level k is built from level k-1 by the join and prune steps, then counted
/// by tidset intersection. The search stops at the first empty level, when
/// fewer than two itemsets are left to join, or at `config.max_len`.
pub fn generate_frequent_itemsets<B, I>(
    index: &TransactionIndex<B, I>,
    config: &MinerConfig,
) -> Result<FrequentItemsets<I>>
where
    B: Identifier,
    I: Identifier,
{
    config.validate()?;

    let N = index.num_baskets();
    if N == 0 {
        info!("no baskets to mine");
        return Ok(FrequentItemsets::empty(0));
    }

    let all_frequent_itemsets = generate_frequent_patterns(index, config)?;
    let records = convert_to_records(all_frequent_itemsets, index);

    info!(
        baskets = N,
        itemsets = records.len(),
        min_support = config.min_support,
        "mined frequent itemsets"
    );

    Ok(FrequentItemsets::from_records(N, records))
}

/// Level-wise search over item ids.
fn generate_frequent_patterns<B, I>(
    index: &TransactionIndex<B, I>,
    config: &MinerConfig,
) -> Result<FrequentPatterns>
where
    B: Identifier,
    I: Identifier,
{
    let started = Instant::now();
    let max_len = config.max_len.unwrap_or(usize::MAX);
    let mut all_frequent_itemsets: FrequentPatterns = BTreeMap::new();

    // 1-itemset
    let frequent_1_itemset_counts = generate_frequent_1_itemset_counts(index, config.min_support);
    check_deadline(started, config.time_limit, 1)?;
    debug!(
        size = 1,
        candidates = index.num_items(),
        kept = frequent_1_itemset_counts.len(),
        "counted level"
    );
    if frequent_1_itemset_counts.is_empty() {
        return Ok(all_frequent_itemsets);
    }
    all_frequent_itemsets.insert(1, frequent_1_itemset_counts);

    // k-itemset, k >= 2
    let mut size: ItemsetLength = 2;
    while size <= max_len {
        let prev = match all_frequent_itemsets.get(&(size - 1)) {
            Some(prev) if prev.len() >= 2 => prev,
            _ => break,
        };

        let joined = join_step(prev.keys());
        let num_joined = joined.len();
        let candidates = prune_step(joined, prev);
        let num_candidates = candidates.len();

        let frequent_itemset_counts = generate_frequent_k_itemset_counts(
            candidates,
            index,
            config.min_support,
            config.parallel,
        );
        // a level that ran past the deadline is discarded
        check_deadline(started, config.time_limit, size)?;

        debug!(
            size,
            candidates = num_candidates,
            pruned = num_joined - num_candidates,
            kept = frequent_itemset_counts.len(),
            "counted level"
        );

        if frequent_itemset_counts.is_empty() {
            break;
        }
        all_frequent_itemsets.insert(size, frequent_itemset_counts);
        size += 1;
    }

    Ok(all_frequent_itemsets)
}

fn is_frequent(count: SupportCount, N: usize, min_support: f64) -> bool {
    count as f64 / N as f64 >= min_support
}

fn check_deadline(
    started: Instant,
    time_limit: Option<Duration>,
    level: ItemsetLength,
) -> Result<()> {
    match time_limit {
        Some(limit) if started.elapsed() >= limit => {
            warn!(level, limit_ms = limit.as_millis() as u64, "mining deadline exceeded");
            Err(Error::DeadlineExceeded {
                level,
                limit_ms: limit.as_millis(),
            })
        }
        _ => Ok(()),
    }
}

/// 1-itemset
fn generate_frequent_1_itemset_counts<B, I>(
    index: &TransactionIndex<B, I>,
    min_support: f64,
) -> PatternCounts
where
    B: Identifier,
    I: Identifier,
{
    let N = index.num_baskets();

    (0..index.num_items())
        .map(|item_id| (item_id, index.item_count(item_id)))
        .filter(|&(_, count)| is_frequent(count, N, min_support))
        .map(|(item_id, count)| (vec![item_id], count))
        .collect()
}

/// Count pruned candidates and keep the frequent ones.
///
/// With `parallel` set, candidates are counted on the rayon pool. The counts
/// are collected in candidate order before anything is filtered, so the level
/// comes out the same either way.
fn generate_frequent_k_itemset_counts<B, I>(
    candidates: Vec<Pattern>,
    index: &TransactionIndex<B, I>,
    min_support: f64,
    parallel: bool,
) -> PatternCounts
where
    B: Identifier,
    I: Identifier,
{
    let N = index.num_baskets();
    let count = |candidate: Pattern| {
        let candidate_count = index.support_count(&candidate);
        (candidate, candidate_count)
    };

    let candidate_counts: Vec<(Pattern, SupportCount)> = if parallel {
        candidates.into_par_iter().map(count).collect()
    } else {
        candidates.into_iter().map(count).collect()
    };

    candidate_counts
        .into_iter()
        .filter(|&(_, candidate_count)| is_frequent(candidate_count, N, min_support))
        .collect()
}

fn convert_to_records<B, I>(
    all_frequent_itemsets: FrequentPatterns,
    index: &TransactionIndex<B, I>,
) -> Vec<ItemsetRecord<I>>
where
    B: Identifier,
    I: Identifier,
{
    let N = index.num_baskets() as f64;
    let inventory = index.items();

    all_frequent_itemsets
        .into_iter()
        .flat_map(|(_, itemset_counts)| itemset_counts.into_iter())
        .map(|(pattern, count)| ItemsetRecord {
            itemset: Itemset::from_sorted(
                pattern
                    .into_iter()
                    .map(|item_id| inventory[item_id].clone())
                    .collect(),
            ),
            support: count as f64 / N,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;

    const A: &str = "Item A";
    const B: &str = "Item B";
    const C: &str = "Item C";
    const D: &str = "Item D";

    fn index_of(transactions: Vec<Vec<&'static str>>) -> TransactionIndex<usize, &'static str> {
        let pairs = transactions
            .into_iter()
            .enumerate()
            .flat_map(|(basket, items)| items.into_iter().map(move |item| (basket + 1, item)));
        TransactionIndex::from_pairs(pairs).unwrap()
    }

    fn counts(frequent: &FrequentItemsets<&'static str>) -> BTreeMap<Vec<&'static str>, usize> {
        frequent
            .records()
            .iter()
            .map(|record| (record.itemset.as_slice().to_vec(), record.count))
            .collect()
    }

    fn mine(
        transactions: Vec<Vec<&'static str>>,
        config: MinerConfig,
    ) -> FrequentItemsets<&'static str> {
        generate_frequent_itemsets(&index_of(transactions), &config).unwrap()
    }

    #[test]
    fn test_generate_frequent_itemsets_001_minsupport() {
        let transactions = vec![vec![A, B], vec![A, C], vec![A, B, C], vec![B, D]];
        let frequent = mine(transactions, MinerConfig::with_min_support(0.01));

        let expected = btreemap! {
            vec![A] => 3,
            vec![B] => 3,
            vec![C] => 2,
            vec![D] => 1,
            vec![A, B] => 2,
            vec![A, C] => 2,
            vec![B, C] => 1,
            vec![B, D] => 1,
            vec![A, B, C] => 1,
        };

        assert_eq!(counts(&frequent), expected);
        assert_eq!(frequent.max_len(), 3);
    }

    #[test]
    fn test_generate_frequent_itemsets_05_minsupport() {
        let transactions = vec![vec![A, B], vec![A, C], vec![A, B, C], vec![B, D]];
        let frequent = mine(transactions, MinerConfig::with_min_support(0.5));

        let expected = btreemap! {
            vec![A] => 3,
            vec![B] => 3,
            vec![C] => 2,
            vec![A, B] => 2,
            vec![A, C] => 2,
        };

        assert_eq!(counts(&frequent), expected);
    }

    #[test]
    fn test_generate_frequent_itemsets_05_minsupport_large_k() {
        let transactions = vec![vec![A, B], vec![A, C], vec![A, B, C], vec![B, C]];
        let config = MinerConfig {
            min_support: 0.5,
            max_len: Some(5),
            ..MinerConfig::default()
        };
        let frequent = mine(transactions, config);

        let expected = btreemap! {
            vec![A] => 3,
            vec![B] => 3,
            vec![C] => 3,
            vec![A, B] => 2,
            vec![A, C] => 2,
            vec![B, C] => 2,
        };

        assert_eq!(counts(&frequent), expected);
    }

    #[test]
    fn max_len_stops_the_search() {
        let transactions = vec![vec![A, B], vec![A, B], vec![A, C]];
        let config = MinerConfig {
            min_support: 0.5,
            max_len: Some(1),
            ..MinerConfig::default()
        };
        let frequent = mine(transactions, config);

        assert_eq!(counts(&frequent), btreemap! { vec![A] => 3, vec![B] => 2 });
    }

    #[test]
    fn support_is_fraction_of_baskets() {
        let transactions = vec![vec![A, B], vec![A, B], vec![A, C]];
        let frequent = mine(transactions, MinerConfig::with_min_support(0.5));

        let supports: Vec<(Vec<&str>, f64)> = frequent
            .records()
            .iter()
            .map(|r| (r.itemset.as_slice().to_vec(), r.support))
            .collect();
        assert_eq!(
            supports,
            vec![
                (vec![A], 1.0),
                (vec![B], 2.0 / 3.0),
                (vec![A, B], 2.0 / 3.0),
            ]
        );
    }

    #[test]
    fn threshold_of_one_keeps_only_universal_items() {
        let transactions = vec![vec![A, B], vec![A, C], vec![A, B, C]];
        let frequent = mine(transactions, MinerConfig::with_min_support(1.0));
        assert_eq!(counts(&frequent), btreemap! { vec![A] => 3 });
    }

    #[test]
    fn nothing_frequent_is_not_an_error() {
        let transactions = vec![vec![A], vec![B], vec![C]];
        let frequent = mine(transactions, MinerConfig::with_min_support(0.9));
        assert!(frequent.is_empty());
        assert_eq!(frequent.total_baskets(), 3);
    }

    #[test]
    fn empty_index_gives_empty_result() {
        let frequent = mine(vec![], MinerConfig::with_min_support(0.5));
        assert!(frequent.is_empty());
        assert_eq!(frequent.total_baskets(), 0);
    }

    #[test]
    fn invalid_min_support_is_rejected() {
        let index = index_of(vec![vec![A]]);
        for &bad in &[0.0, 1.5] {
            let err = generate_frequent_itemsets(&index, &MinerConfig::with_min_support(bad))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { .. }));
        }
    }

    #[test]
    fn parallel_and_sequential_counting_agree() {
        let transactions = vec![
            vec![A, B, C, D],
            vec![A, B, C],
            vec![A, B, D],
            vec![B, C, D],
            vec![A, C, D],
            vec![A, B, C, D],
        ];
        let parallel = mine(transactions.clone(), MinerConfig::with_min_support(0.3));
        let sequential = mine(
            transactions,
            MinerConfig {
                min_support: 0.3,
                parallel: false,
                ..MinerConfig::default()
            },
        );
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.max_len(), 4);
    }

    #[test]
    fn zero_deadline_aborts_without_partial_results() {
        let index = index_of(vec![vec![A, B], vec![A, B]]);
        let config = MinerConfig {
            min_support: 0.5,
            time_limit: Some(Duration::from_secs(0)),
            ..MinerConfig::default()
        };
        let err = generate_frequent_itemsets(&index, &config).unwrap_err();
        assert!(matches!(err, Error::DeadlineExceeded { level: 1, .. }));
    }
}
