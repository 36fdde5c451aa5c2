//! Widget configuration read from HTML data attributes.
//!
//! # Design
//! - The page owns configuration: every widget names its endpoint via `data-path`.
//! - Optional polling knobs fall back to [`PollPolicy::default`].
//! - Parsing takes an attribute lookup closure so it runs without a document.

use crate::core::poll::PollPolicy;
use thiserror::Error;

/// Class marking an element as a range control.
pub const RANGE_CLASS: &str = "range";
/// Id of the pathway starter container.
pub const STARTER_CONTAINER_ID: &str = "pathway-starter";
/// Attribute holding a widget's backend path.
pub const PATH_ATTRIBUTE: &str = "data-path";
/// Optional cap on starter poll attempts.
pub const POLL_MAX_ATTEMPTS_ATTRIBUTE: &str = "data-poll-max-attempts";
/// Optional first retry delay in milliseconds.
pub const POLL_BASE_DELAY_ATTRIBUTE: &str = "data-poll-base-delay-ms";
/// Optional retry delay ceiling in milliseconds.
pub const POLL_MAX_DELAY_ATTRIBUTE: &str = "data-poll-max-delay-ms";

/// Structured errors raised while reading widget configuration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The element has no usable `data-path`.
    #[error("{element} is missing a non-empty data-path attribute")]
    MissingPath {
        /// Human readable element description.
        element: String,
    },
    /// A numeric attribute did not parse.
    #[error("attribute '{attribute}' must be a non-negative integer, got '{value}'")]
    InvalidNumber {
        /// Offending attribute.
        attribute: &'static str,
        /// Raw attribute value.
        value: String,
    },
    /// The attempt cap was zero.
    #[error("data-poll-max-attempts must be at least 1")]
    ZeroAttempts,
    /// The base delay exceeded the ceiling.
    #[error("poll base delay {base_ms}ms exceeds max delay {max_ms}ms")]
    DelayOrder {
        /// Configured base delay.
        base_ms: u32,
        /// Configured maximum delay.
        max_ms: u32,
    },
}

/// One range control on the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeConfig {
    /// Endpoint for GET (initial value) and POST (`value=N`).
    pub path: String,
    /// Ordinal of the control in document order.
    pub index: usize,
}

impl RangeConfig {
    /// Read the configuration of the range control at `index`.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingPath`] when `data-path` is absent or blank.
    pub fn from_attributes<F>(index: usize, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = required_path(&lookup, || format!("range control #{index}"))?;
        Ok(Self { path, index })
    }
}

/// The pathway starter panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarterConfig {
    /// Endpoint for POST (raw text) and GET (polled response).
    pub path: String,
    /// Polling limits.
    pub poll: PollPolicy,
}

impl StarterConfig {
    /// Read the starter configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the path is missing or a polling attribute is invalid.
    pub fn from_attributes<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = required_path(&lookup, || format!("#{STARTER_CONTAINER_ID}"))?;
        let defaults = PollPolicy::default();
        let poll = PollPolicy {
            max_attempts: optional_u32(&lookup, POLL_MAX_ATTEMPTS_ATTRIBUTE)?
                .unwrap_or(defaults.max_attempts),
            base_delay_ms: optional_u32(&lookup, POLL_BASE_DELAY_ATTRIBUTE)?
                .unwrap_or(defaults.base_delay_ms),
            max_delay_ms: optional_u32(&lookup, POLL_MAX_DELAY_ATTRIBUTE)?
                .unwrap_or(defaults.max_delay_ms),
        };
        if poll.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if poll.base_delay_ms > poll.max_delay_ms {
            return Err(ConfigError::DelayOrder {
                base_ms: poll.base_delay_ms,
                max_ms: poll.max_delay_ms,
            });
        }
        Ok(Self { path, poll })
    }
}

fn required_path<F, D>(lookup: &F, describe: D) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    D: FnOnce() -> String,
{
    lookup(PATH_ATTRIBUTE)
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
        .ok_or_else(|| ConfigError::MissingPath {
            element: describe(),
        })
}

fn optional_u32<F>(lookup: &F, attribute: &'static str) -> Result<Option<u32>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(attribute) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber {
            attribute,
            value: raw.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn attrs(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn range_config_requires_a_path() {
        let config = RangeConfig::from_attributes(2, attrs(&[("data-path", " /sim/rate ")]));
        assert_eq!(
            config,
            Ok(RangeConfig {
                path: "/sim/rate".into(),
                index: 2
            })
        );
        assert_eq!(
            RangeConfig::from_attributes(0, attrs(&[("data-path", "  ")])),
            Err(ConfigError::MissingPath {
                element: "range control #0".into()
            })
        );
    }

    #[test]
    fn starter_defaults_poll_policy() {
        let config = StarterConfig::from_attributes(attrs(&[("data-path", "/sim/start")]));
        assert_eq!(
            config,
            Ok(StarterConfig {
                path: "/sim/start".into(),
                poll: PollPolicy::default()
            })
        );
    }

    #[test]
    fn starter_reads_poll_overrides() {
        let config = StarterConfig::from_attributes(attrs(&[
            ("data-path", "/sim/start"),
            ("data-poll-max-attempts", "5"),
            ("data-poll-base-delay-ms", "100"),
            ("data-poll-max-delay-ms", "800"),
        ]))
        .expect("valid config");
        assert_eq!(
            config.poll,
            PollPolicy {
                max_attempts: 5,
                base_delay_ms: 100,
                max_delay_ms: 800
            }
        );
    }

    #[test]
    fn starter_rejects_bad_poll_settings() {
        assert_eq!(
            StarterConfig::from_attributes(attrs(&[
                ("data-path", "/s"),
                ("data-poll-max-attempts", "many"),
            ])),
            Err(ConfigError::InvalidNumber {
                attribute: POLL_MAX_ATTEMPTS_ATTRIBUTE,
                value: "many".into()
            })
        );
        assert_eq!(
            StarterConfig::from_attributes(attrs(&[
                ("data-path", "/s"),
                ("data-poll-max-attempts", "0"),
            ])),
            Err(ConfigError::ZeroAttempts)
        );
        assert_eq!(
            StarterConfig::from_attributes(attrs(&[
                ("data-path", "/s"),
                ("data-poll-base-delay-ms", "900"),
                ("data-poll-max-delay-ms", "100"),
            ])),
            Err(ConfigError::DelayOrder {
                base_ms: 900,
                max_ms: 100
            })
        );
    }

    #[test]
    fn missing_starter_path_names_the_container() {
        let err = StarterConfig::from_attributes(attrs(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "#pathway-starter is missing a non-empty data-path attribute"
        );
    }
}
