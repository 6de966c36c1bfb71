//! Frequent itemset mining, association rules and rule-based recommendations
//! over baskets of items.
//!
//! The stages run in order, each consuming only the previous stage's output:
//!
//! 1. [`TransactionIndex`] indexes `(basket, item)` pairs,
//! 2. [`generate_frequent_itemsets`] runs the level-wise (Apriori) search,
//! 3. [`generate_rules`] splits frequent itemsets into rules,
//! 4. [`recommend`] / [`Recommender`] rank rules by lift for a seed item.
//!
//! [`Pipeline`] chains all of them behind one [`Config`].
//!
//! ```
//! use basket_rules::{
//!     generate_frequent_itemsets, generate_rules, recommend, MinerConfig, RuleConfig,
//!     TransactionIndex,
//! };
//!
//! let index = TransactionIndex::from_pairs(vec![
//!     ("7256_2017-08", "9_4"),
//!     ("7256_2017-08", "46_4"),
//!     ("7256_2017-10", "9_4"),
//!     ("7256_2017-10", "38_4"),
//!     ("1_2018-01", "9_4"),
//!     ("1_2018-01", "46_4"),
//! ])
//! .unwrap();
//!
//! let itemsets = generate_frequent_itemsets(&index, &MinerConfig::with_min_support(0.3)).unwrap();
//! let rules = generate_rules(&itemsets, &RuleConfig::default()).unwrap();
//! assert_eq!(recommend(&rules, &"9_4", 2).unwrap(), vec!["46_4", "38_4"]);
//! ```

pub mod combi;
pub mod config;
pub mod error;
pub mod index;
pub mod itemsets;
pub mod pipeline;
pub mod recommend;
pub mod rules;
pub mod types;

#[cfg(feature = "python")]
mod wrapper;

pub use config::{Config, Metric, MinerConfig, RuleConfig};
pub use error::{Error, Result};
pub use index::TransactionIndex;
pub use itemsets::{generate_frequent_itemsets, FrequentItemsets, ItemsetRecord};
pub use pipeline::{Mined, Pipeline};
pub use recommend::{recommend, Recommender};
pub use rules::{generate_rules, Rule};
pub use types::{Identifier, Itemset};
