//! Business rules that are configurable per deployment.

/// Switches for the two behaviours the negotiation protocol leaves open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationPolicy {
    /// Accept new offers after the session has completed.
    ///
    /// Off by default: a completed session rejects offers with `SessionClosed`.
    pub allow_offers_after_completion: bool,

    /// Let a participant accept an offer they submitted themselves.
    pub allow_self_acceptance: bool,
}

impl Default for NegotiationPolicy {
    fn default() -> Self {
        Self {
            allow_offers_after_completion: false,
            allow_self_acceptance: true,
        }
    }
}
