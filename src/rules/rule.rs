use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::{config::Metric, types::Itemset};

/// An association rule `antecedent => consequent`.
///
/// Antecedent and consequent are disjoint and non-empty, and their union is a
/// frequent itemset. `support` is the support of the union.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule<I> {
    pub antecedent: Itemset<I>,
    pub consequent: Itemset<I>,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    pub support: f64,
    /// support / antecedent_support
    pub confidence: f64,
    /// confidence / consequent_support
    pub lift: f64,
    /// support - antecedent_support * consequent_support
    pub leverage: f64,
    /// (1 - consequent_support) / (1 - confidence), infinite when confidence is 1
    pub conviction: f64,
}

impl<I> Rule<I> {
    pub fn from_supports(
        antecedent: Itemset<I>,
        consequent: Itemset<I>,
        antecedent_support: f64,
        consequent_support: f64,
        support: f64,
    ) -> Self {
        let confidence = support / antecedent_support;
        let lift = confidence / consequent_support;
        let leverage = support - antecedent_support * consequent_support;
        let conviction = if confidence >= 1.0 {
            f64::INFINITY
        } else {
            (1.0 - consequent_support) / (1.0 - confidence)
        };

        Self {
            antecedent,
            consequent,
            antecedent_support,
            consequent_support,
            support,
            confidence,
            lift,
            leverage,
            conviction,
        }
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Support => self.support,
            Metric::Confidence => self.confidence,
            Metric::Lift => self.lift,
        }
    }
}

impl<I: Ord + Clone> Rule<I> {
    /// The frequent itemset the rule was split from.
    pub fn union(&self) -> Itemset<I> {
        self.antecedent
            .iter()
            .chain(self.consequent.iter())
            .cloned()
            .collect()
    }
}

impl<I: Display> Display for Rule<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} => {} (support {:.4}, confidence {:.4}, lift {:.4})",
            self.antecedent, self.consequent, self.support, self.confidence, self.lift
        )
    }
}
