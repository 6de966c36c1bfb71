//! Association rules derived from frequent itemsets.

pub mod rule;
pub mod search;

pub use rule::Rule;
pub use search::generate_rules;
