//! Behavior configuration loading and checks.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors in behavior parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {behavior} config: {source}")]
    Parse {
        behavior: &'static str,
        source: serde_json::Error,
    },

    #[error("Invalid {behavior} config: {field} {reason}")]
    Invalid {
        behavior: &'static str,
        field: &'static str,
        reason: String,
    },
}

/// Parse a behavior config from JSON. Missing fields take their defaults.
pub(crate) fn from_json<T: DeserializeOwned>(
    behavior: &'static str,
    json: &str,
) -> Result<T, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::Parse { behavior, source })
}

/// Accumulates field checks for one behavior; reports the first failure.
pub(crate) struct Checker {
    behavior: &'static str,
    failure: Option<ConfigError>,
}

impl Checker {
    pub(crate) fn new(behavior: &'static str) -> Self {
        Self {
            behavior,
            failure: None,
        }
    }

    pub(crate) fn ensure(mut self, ok: bool, field: &'static str, reason: &str) -> Self {
        if !ok && self.failure.is_none() {
            self.failure = Some(ConfigError::Invalid {
                behavior: self.behavior,
                field,
                reason: reason.to_string(),
            });
        }
        self
    }

    pub(crate) fn non_negative(self, value: f32, field: &'static str) -> Self {
        self.ensure(
            value.is_finite() && value >= 0.0,
            field,
            "must be finite and not negative",
        )
    }

    pub(crate) fn positive(self, value: f32, field: &'static str) -> Self {
        self.ensure(
            value.is_finite() && value > 0.0,
            field,
            "must be finite and positive",
        )
    }

    pub(crate) fn finish(self) -> Result<(), ConfigError> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checker_reports_first_failure() {
        let result = Checker::new("lamp")
            .positive(1.0, "speed")
            .non_negative(-1.0, "range")
            .positive(0.0, "force")
            .finish();

        match result {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "range"),
            other => panic!("expected invalid range, got {other:?}"),
        }
    }

    #[test]
    fn checker_rejects_non_finite_values() {
        for value in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            assert!(Checker::new("lamp").non_negative(value, "wait").finish().is_err());
            assert!(Checker::new("lamp").positive(value, "speed").finish().is_err());
        }
        assert!(Checker::new("lamp").non_negative(0.0, "wait").finish().is_ok());
    }

    #[test]
    fn parse_errors_name_the_behavior() {
        let err = from_json::<serde_json::Value>("door", "{ not json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse door config"));
    }
}
