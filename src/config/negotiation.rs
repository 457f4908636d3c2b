//! Negotiation behaviour configuration

use serde::Deserialize;

use crate::domain::negotiation::NegotiationPolicy;

use super::error::ValidationError;

/// Negotiation rules and real-time delivery settings
#[derive(Debug, Clone, Deserialize)]
pub struct NegotiationConfig {
    /// Accept offers on a completed session
    #[serde(default)]
    pub allow_offers_after_completion: bool,

    /// Let participants accept their own offers
    #[serde(default = "default_true")]
    pub allow_self_acceptance: bool,

    /// Per-connection outbound queue capacity, in messages
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl NegotiationConfig {
    pub fn policy(&self) -> NegotiationPolicy {
        NegotiationPolicy {
            allow_offers_after_completion: self.allow_offers_after_completion,
            allow_self_acceptance: self.allow_self_acceptance,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.outbound_buffer == 0 || self.outbound_buffer > 4096 {
            return Err(ValidationError::InvalidOutboundBuffer);
        }
        Ok(())
    }
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            allow_offers_after_completion: false,
            allow_self_acceptance: default_true(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_outbound_buffer() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy_defaults() {
        let config = NegotiationConfig::default();
        assert_eq!(config.policy(), NegotiationPolicy::default());
        assert_eq!(config.outbound_buffer, 64);
    }

    #[test]
    fn test_outbound_buffer_bounds() {
        let zero = NegotiationConfig {
            outbound_buffer: 0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(ValidationError::InvalidOutboundBuffer));

        let huge = NegotiationConfig {
            outbound_buffer: 10_000,
            ..Default::default()
        };
        assert!(huge.validate().is_err());
    }
}
