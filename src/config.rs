//! Mining parameters.
//!
//! Every stage takes a plain, `serde`-derived parameter struct. Defaults
//! reproduce the thresholds used by the service-recommendation workload this
//! crate was built for: support >= 1% for itemsets and rules.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_MIN_SUPPORT: f64 = 0.01;
pub const DEFAULT_MIN_THRESHOLD: f64 = 0.01;

/// Parameters of the frequent itemset search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Minimum fraction of baskets an itemset must appear in, in (0, 1].
    pub min_support: f64,
    /// Largest itemset size to search for. `None` searches until a level is empty.
    pub max_len: Option<usize>,
    /// Count the candidates of a level on the rayon pool.
    pub parallel: bool,
    /// Abort the search once this much time has been spent.
    pub time_limit: Option<Duration>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            max_len: None,
            parallel: true,
            time_limit: None,
        }
    }
}

impl MinerConfig {
    pub fn with_min_support(min_support: f64) -> Self {
        Self {
            min_support,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        // NaN fails both comparisons, so test for the valid range
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(Error::invalid_parameter(
                "min_support",
                format!("must be in (0, 1], got {}", self.min_support),
            ));
        }
        if self.max_len == Some(0) {
            return Err(Error::invalid_parameter("max_len", "must be at least 1"));
        }
        Ok(())
    }
}

/// Rule statistic used to decide whether a rule is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Support,
    Confidence,
    Lift,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Support => "support",
            Metric::Confidence => "confidence",
            Metric::Lift => "lift",
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Support
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "support" => Ok(Metric::Support),
            "confidence" => Ok(Metric::Confidence),
            "lift" => Ok(Metric::Lift),
            other => Err(Error::invalid_parameter(
                "metric",
                format!("expected support, confidence or lift, got {:?}", other),
            )),
        }
    }
}

/// Parameters of rule generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub metric: Metric,
    pub min_threshold: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            min_threshold: DEFAULT_MIN_THRESHOLD,
        }
    }
}

impl RuleConfig {
    pub fn new(metric: Metric, min_threshold: f64) -> Self {
        Self {
            metric,
            min_threshold,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_threshold.is_finite() && self.min_threshold >= 0.0) {
            return Err(Error::invalid_parameter(
                "min_threshold",
                format!("must be a finite value >= 0, got {}", self.min_threshold),
            ));
        }
        Ok(())
    }
}

/// Parameters of a whole mining run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub miner: MinerConfig,
    pub rules: RuleConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.miner.validate()?;
        self.rules.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.miner.min_support, 0.01);
        assert_eq!(config.rules.metric, Metric::Support);
    }

    #[test]
    fn min_support_out_of_range() {
        for bad in [0.0, -0.1, 1.01, f64::NAN].iter() {
            let err = MinerConfig::with_min_support(*bad).validate().unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidParameter {
                    name: "min_support",
                    ..
                }
            ));
        }
        assert!(MinerConfig::with_min_support(1.0).validate().is_ok());
    }

    #[test]
    fn zero_max_len_is_rejected() {
        let config = MinerConfig {
            max_len: Some(0),
            ..MinerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn min_threshold_out_of_range() {
        assert!(RuleConfig::new(Metric::Lift, -1.0).validate().is_err());
        assert!(RuleConfig::new(Metric::Lift, f64::INFINITY).validate().is_err());
        assert!(RuleConfig::new(Metric::Lift, 0.0).validate().is_ok());
    }

    #[test]
    fn metric_parses_case_insensitively() {
        assert_eq!("Lift".parse::<Metric>().unwrap(), Metric::Lift);
        assert_eq!(" confidence ".parse::<Metric>().unwrap(), Metric::Confidence);
        assert!("leverage".parse::<Metric>().is_err());
    }

    #[test]
    fn config_deserializes_with_partial_fields() {
        let config: Config = serde_json::from_str(
            r#"{ "miner": { "min_support": 0.5, "max_len": 3 }, "rules": { "metric": "lift" } }"#,
        )
        .unwrap();
        assert_eq!(config.miner.min_support, 0.5);
        assert_eq!(config.miner.max_len, Some(3));
        assert!(config.miner.parallel);
        assert_eq!(config.rules.metric, Metric::Lift);
        assert_eq!(config.rules.min_threshold, DEFAULT_MIN_THRESHOLD);
    }
}
