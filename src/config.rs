use std::num::NonZeroU32;

pub const MAX_AGREEMENT_ATTEMPTS_VAR: &str = "MONEYMATCHR_MAX_AGREEMENT_ATTEMPTS";

pub const DEFAULT_MAX_AGREEMENT_ATTEMPTS: NonZeroU32 = NonZeroU32::new(3).unwrap();

/// Deployment settings consumed by [`crate::engine::SettlementEngine`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Consecutive disputed rounds after which a match is frozen.
    pub max_agreement_attempts: NonZeroU32,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var} value={value:?}, expected a positive integer")]
    InvalidMaxAgreementAttempts { var: &'static str, value: String },
    #[error("{var} is not valid unicode")]
    NotUnicode { var: &'static str },
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_agreement_attempts: DEFAULT_MAX_AGREEMENT_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(MAX_AGREEMENT_ATTEMPTS_VAR) {
            Ok(value) => Self::from_max_agreement_attempts(&value),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode {
                var: MAX_AGREEMENT_ATTEMPTS_VAR,
            }),
        }
    }

    fn from_max_agreement_attempts(value: &str) -> Result<Self, ConfigError> {
        let max_agreement_attempts =
            value
                .trim()
                .parse::<NonZeroU32>()
                .map_err(|_| ConfigError::InvalidMaxAgreementAttempts {
                    var: MAX_AGREEMENT_ATTEMPTS_VAR,
                    value: value.to_owned(),
                })?;
        Ok(Self { max_agreement_attempts })
    }
}
