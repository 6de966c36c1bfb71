//! The four mining stages chained behind one validated [`Config`].
//!
//! ```
//! use basket_rules::{Config, Pipeline};
//!
//! let pairs = vec![("B1", "a"), ("B1", "b"), ("B2", "a"), ("B2", "b"), ("B3", "a"), ("B3", "c")];
//! let mut config = Config::default();
//! config.miner.min_support = 0.5;
//!
//! let mined = Pipeline::new(config).unwrap().run(pairs).unwrap();
//! assert_eq!(mined.recommend(&"a", 3).unwrap(), vec!["b"]);
//! ```

use tracing::info_span;

use crate::{
    config::Config,
    error::Result,
    index::TransactionIndex,
    itemsets::{generate_frequent_itemsets, FrequentItemsets},
    recommend::Recommender,
    rules::{generate_rules, Rule},
    types::Identifier,
};

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Index `pairs`, mine them and rank the resulting rules.
    pub fn run<B, I, T>(&self, pairs: T) -> Result<Mined<I>>
    where
        B: Identifier,
        I: Identifier,
        T: IntoIterator<Item = (B, I)>,
    {
        let span = info_span!("mining run", min_support = self.config.miner.min_support);
        let _enter = span.enter();

        let index = TransactionIndex::from_pairs(pairs)?;
        self.run_index(&index)
    }

    /// Mine an index built elsewhere.
    pub fn run_index<B, I>(&self, index: &TransactionIndex<B, I>) -> Result<Mined<I>>
    where
        B: Identifier,
        I: Identifier,
    {
        let itemsets = generate_frequent_itemsets(index, &self.config.miner)?;
        let rules = generate_rules(&itemsets, &self.config.rules)?;

        Ok(Mined {
            itemsets,
            recommender: Recommender::new(rules),
        })
    }
}

/// Output of one mining run.
#[derive(Debug, Clone)]
pub struct Mined<I> {
    itemsets: FrequentItemsets<I>,
    recommender: Recommender<I>,
}

impl<I: Identifier> Mined<I> {
    pub fn itemsets(&self) -> &FrequentItemsets<I> {
        &self.itemsets
    }

    /// Rules in rank order.
    pub fn rules(&self) -> &[Rule<I>] {
        self.recommender.rules()
    }

    pub fn recommender(&self) -> &Recommender<I> {
        &self.recommender
    }

    pub fn recommend(&self, seed: &I, count: usize) -> Result<Vec<I>> {
        self.recommender.recommend(seed, count)
    }
}
