use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    config::{Metric, RuleConfig},
    error::{Error, Result},
    itemsets::{FrequentItemsets, ItemsetRecord},
    rules::rule::Rule,
    types::{Identifier, Itemset},
};

/// Generate rules based on frequent itemsets.
///
/// Every frequent itemset of two or more items is split into every
/// antecedent/consequent pair; a rule is kept when its `config.metric`
/// reaches `config.min_threshold`. Rules come out grouped by the itemset they
/// were split from, in record order, then by antecedent size and items.
pub fn generate_rules<I: Identifier>(
    frequent: &FrequentItemsets<I>,
    config: &RuleConfig,
) -> Result<Vec<Rule<I>>> {
    config.validate()?;

    let mut rules = Vec::new();
    for record in frequent.records().iter().filter(|r| r.itemset.len() >= 2) {
        // every split of an itemset shares the support of the whole itemset
        if config.metric == Metric::Support && record.support < config.min_threshold {
            continue;
        }
        rules.extend(rules_from_itemset(record, frequent, config)?);
    }

    info!(
        itemsets = frequent.len(),
        rules = rules.len(),
        metric = config.metric.as_str(),
        min_threshold = config.min_threshold,
        "generated rules"
    );

    Ok(rules)
}

/// Given a frequent itemset, find the rules that can be generated from it.
///
/// Antecedents are visited from largest to smallest. With confidence gating,
/// an antecedent that fails the threshold blacklists all of its subsets:
/// shrinking the antecedent can only raise its support, which lowers confidence.
pub fn rules_from_itemset<I: Identifier>(
    record: &ItemsetRecord<I>,
    frequent: &FrequentItemsets<I>,
    config: &RuleConfig,
) -> Result<Vec<Rule<I>>> {
    let combi = record.itemset.as_slice();
    let mut blacklist: Vec<Itemset<I>> = vec![];
    let mut final_rules = vec![];

    for size in (1..combi.len()).rev() {
        for positions in (0..combi.len()).combinations(size) {
            let antecedent: Itemset<I> =
                Itemset::from_sorted(positions.iter().map(|&p| combi[p].clone()).collect());

            if blacklist
                .iter()
                .any(|blacklisted| antecedent.is_subset(blacklisted))
            {
                continue;
            }

            let consequent: Itemset<I> = Itemset::from_sorted(
                combi
                    .iter()
                    .enumerate()
                    .filter(|(p, _)| !positions.contains(p))
                    .map(|(_, item)| item.clone())
                    .collect(),
            );

            let antecedent_support = subset_support(frequent, &antecedent, record)?;
            let consequent_support = subset_support(frequent, &consequent, record)?;
            let rule = Rule::from_supports(
                antecedent,
                consequent,
                antecedent_support,
                consequent_support,
                record.support,
            );

            if rule.metric(config.metric) >= config.min_threshold {
                final_rules.push(rule);
            } else if config.metric == Metric::Confidence {
                blacklist.push(rule.antecedent);
            }
        }
    }

    if !blacklist.is_empty() {
        debug!(
            itemset = ?record.itemset,
            blacklisted = blacklist.len(),
            "skipped low-confidence antecedents"
        );
    }

    final_rules.sort_by(|a, b| {
        a.antecedent
            .len()
            .cmp(&b.antecedent.len())
            .then_with(|| a.antecedent.cmp(&b.antecedent))
    });
    Ok(final_rules)
}

fn subset_support<I: Identifier>(
    frequent: &FrequentItemsets<I>,
    subset: &Itemset<I>,
    record: &ItemsetRecord<I>,
) -> Result<f64> {
    frequent.support(subset).ok_or_else(|| {
        Error::InternalInvariant(format!(
            "subset {:?} of frequent itemset {:?} has no support record",
            subset.as_slice(),
            record.itemset.as_slice()
        ))
    })
}
