//! Python extension module, built with the `python` feature.

use pyo3::{
    exceptions::{PyRuntimeError, PyValueError},
    prelude::*,
    wrap_pyfunction,
};

use crate::{
    config::{Config, Metric, MinerConfig, RuleConfig},
    error::Error,
    pipeline::Pipeline,
    rules::Rule,
};

/// (antecedent, consequent, support, confidence, lift)
type PyRule = (Vec<String>, Vec<String>, f64, f64, f64);

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        if err.is_user_error() {
            PyValueError::new_err(err.to_string())
        } else {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}

fn build_pipeline(
    min_support: f64,
    metric: &str,
    min_threshold: f64,
    max_len: Option<usize>,
) -> PyResult<Pipeline> {
    let config = Config {
        miner: MinerConfig {
            min_support,
            max_len,
            ..MinerConfig::default()
        },
        rules: RuleConfig::new(metric.parse::<Metric>()?, min_threshold),
    };
    Ok(Pipeline::new(config)?)
}

fn convert_rule(rule: &Rule<String>) -> PyRule {
    (
        rule.antecedent.as_slice().to_vec(),
        rule.consequent.as_slice().to_vec(),
        rule.support,
        rule.confidence,
        rule.lift,
    )
}

/// Mine association rules from (basket, item) pairs, best lift first.
#[pyfunction]
#[pyo3(text_signature = "(pairs, min_support, metric, min_threshold, max_len)")]
fn association_rules(
    pairs: Vec<(String, String)>,
    min_support: f64,
    metric: &str,
    min_threshold: f64,
    max_len: Option<usize>,
) -> PyResult<Vec<PyRule>> {
    let mined = build_pipeline(min_support, metric, min_threshold, max_len)?.run(pairs)?;
    Ok(mined.rules().iter().map(convert_rule).collect())
}

/// Recommend up to `count` items for `seed` from (basket, item) pairs.
#[pyfunction]
#[pyo3(text_signature = "(pairs, seed, count, min_support, metric, min_threshold)")]
fn recommend(
    pairs: Vec<(String, String)>,
    seed: String,
    count: usize,
    min_support: f64,
    metric: &str,
    min_threshold: f64,
) -> PyResult<Vec<String>> {
    let mined = build_pipeline(min_support, metric, min_threshold, None)?.run(pairs)?;
    Ok(mined.recommend(&seed, count)?)
}

#[pymodule]
fn basket_rules(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(association_rules, m)?)?;
    m.add_function(wrap_pyfunction!(recommend, m)?)?;
    Ok(())
}
