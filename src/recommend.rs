use std::{cmp::Ordering, collections::HashSet};

use tracing::debug;

use crate::{
    error::{Error, Result},
    rules::Rule,
    types::Identifier,
};

/// Ranking order of rules: lift, confidence and support descending, then the
/// consequent and antecedent items ascending. The order is total, so ranking
/// the same rules always gives the same sequence.
///
/// Items compare by their own `Ord`: strings lexically, integers numerically
/// (`9` before `10`).
pub fn by_rank<I: Ord>(a: &Rule<I>, b: &Rule<I>) -> Ordering {
    b.lift
        .total_cmp(&a.lift)
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| b.support.total_cmp(&a.support))
        .then_with(|| a.consequent.cmp(&b.consequent))
        .then_with(|| a.antecedent.cmp(&b.antecedent))
}

/// Recommend up to `count` items for `seed` from the rules whose antecedent
/// contains it, best ranked first.
///
/// Finding fewer than `count` items, or none at all, is not an error.
pub fn recommend<I: Identifier>(rules: &[Rule<I>], seed: &I, count: usize) -> Result<Vec<I>> {
    validate_count(count)?;

    let mut matching: Vec<&Rule<I>> = rules
        .iter()
        .filter(|rule| rule.antecedent.contains(seed))
        .collect();
    matching.sort_by(|a, b| by_rank(a, b));

    Ok(collect_consequents(matching, seed, count))
}

fn validate_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::invalid_parameter("count", "must be at least 1"));
    }
    Ok(())
}

/// Walk ranked rules and gather consequent items, first seen wins.
fn collect_consequents<'r, I, T>(ranked: T, seed: &I, count: usize) -> Vec<I>
where
    I: Identifier + 'r,
    T: IntoIterator<Item = &'r Rule<I>>,
{
    let mut seen: HashSet<&I> = HashSet::with_capacity(count);
    let mut recommendations = Vec::with_capacity(count);
    let mut rules_used = 0;

    'rules: for rule in ranked {
        rules_used += 1;
        for item in rule.consequent.iter() {
            if item == seed || !seen.insert(item) {
                continue;
            }
            recommendations.push(item.clone());
            if recommendations.len() == count {
                break 'rules;
            }
        }
    }

    debug!(
        seed = ?seed,
        rules_used,
        recommended = recommendations.len(),
        "collected recommendations"
    );

    recommendations
}

/// A rule set ranked once, queried for many seeds.
#[derive(Debug, Clone)]
pub struct Recommender<I> {
    rules: Vec<Rule<I>>,
}

impl<I: Identifier> Recommender<I> {
    pub fn new(mut rules: Vec<Rule<I>>) -> Self {
        rules.sort_by(by_rank);
        Self { rules }
    }

    /// Rules in rank order.
    pub fn rules(&self) -> &[Rule<I>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn recommend(&self, seed: &I, count: usize) -> Result<Vec<I>> {
        validate_count(count)?;
        let matching = self
            .rules
            .iter()
            .filter(|rule| rule.antecedent.contains(seed));
        Ok(collect_consequents(matching, seed, count))
    }
}

impl<I: Identifier> From<Vec<Rule<I>>> for Recommender<I> {
    fn from(rules: Vec<Rule<I>>) -> Self {
        Recommender::new(rules)
    }
}
