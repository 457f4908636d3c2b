//! Offer entity and its amount value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    OfferId, OfferStatus, StateMachine, Timestamp, UserId, ValidationError,
};

/// Monetary amount proposed in an offer.
///
/// # Invariants
///
/// - finite (no NaN, no infinities)
/// - non-negative
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct OfferAmount(f64);

impl OfferAmount {
    /// Validates and wraps a raw amount.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::invalid_amount("offerAmount", value));
        }
        // Normalise -0.0 so it never leaks onto the wire.
        Ok(Self(value.abs()))
    }

    /// Returns the raw amount.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for OfferAmount {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OfferAmount> for f64 {
    fn from(amount: OfferAmount) -> Self {
        amount.0
    }
}

/// A single proposed amount with its own accept/decline lifecycle.
///
/// The submitter's display name is captured at submission time so offer
/// history renders without consulting the identity provider again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    id: OfferId,
    amount: OfferAmount,
    offered_by: UserId,
    offered_by_name: String,
    status: OfferStatus,
    submitted_at: Timestamp,
}

impl Offer {
    /// Creates a new pending offer.
    pub fn new(amount: OfferAmount, offered_by: UserId, offered_by_name: impl Into<String>) -> Self {
        Self {
            id: OfferId::new(),
            amount,
            offered_by,
            offered_by_name: offered_by_name.into(),
            status: OfferStatus::Pending,
            submitted_at: Timestamp::now(),
        }
    }

    /// Reconstitute an offer from persistence.
    pub fn reconstitute(
        id: OfferId,
        amount: OfferAmount,
        offered_by: UserId,
        offered_by_name: String,
        status: OfferStatus,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            id,
            amount,
            offered_by,
            offered_by_name,
            status,
            submitted_at,
        }
    }

    pub fn id(&self) -> &OfferId {
        &self.id
    }

    pub fn amount(&self) -> OfferAmount {
        self.amount
    }

    pub fn offered_by(&self) -> &UserId {
        &self.offered_by
    }

    pub fn offered_by_name(&self) -> &str {
        &self.offered_by_name
    }

    pub fn status(&self) -> OfferStatus {
        self.status
    }

    pub fn submitted_at(&self) -> &Timestamp {
        &self.submitted_at
    }

    /// Moves the offer to a terminal status.
    ///
    /// Callers check `status().is_pending()` first to report a domain error;
    /// this only guards the transition table.
    pub(crate) fn transition(&mut self, target: OfferStatus) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(target)?;
        Ok(())
    }
}
