//! WebSocket message types for real-time negotiation.
//!
//! Every frame is a JSON text frame of the form
//! `{"event": "<name>", "data": <payload>}`:
//! - Client → Server: joinSession, newOffer, acceptOffer, declineOffer, ping
//! - Server → Client: connected, currentOffers, offerUpdate, negotiationEnded, error, pong

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp, UserId};
use crate::domain::negotiation::{NegotiationError, NegotiationEvent, OfferView};

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Connection authenticated and registered.
    Connected(ConnectedMessage),

    /// Offer history sent when someone joins.
    CurrentOffers(Vec<OfferView>),

    /// Offer history after a change.
    OfferUpdate(Vec<OfferView>),

    /// An offer was accepted; the negotiation is over.
    NegotiationEnded(NegotiationEndedMessage),

    /// A command from this connection was rejected.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Greeting sent once after the handshake.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub connection_id: String,
    pub user_id: UserId,
    pub display_name: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationEndedMessage {
    pub accepted_offer: OfferView,
    pub by_user: String,
}

/// Error delivered to the originating connection only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    pub timestamp: Timestamp,
}

impl ErrorMessage {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            session_id: None,
            timestamp: Timestamp::now(),
        }
    }

    pub fn for_session(mut self, session_id: &SessionId) -> Self {
        self.session_id = Some(session_id.clone());
        self
    }

    /// Frame-level problem: bad JSON, unknown event, missing field.
    pub fn malformed(reason: impl std::fmt::Display) -> Self {
        Self::new("VALIDATION_FAILED", format!("Malformed message: {}", reason))
    }
}

impl From<&NegotiationError> for ErrorMessage {
    fn from(err: &NegotiationError) -> Self {
        Self::new(err.wire_code(), err.user_message())
    }
}

/// Heartbeat response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongMessage {
    pub timestamp: Timestamp,
}

impl From<NegotiationEvent> for ServerMessage {
    fn from(event: NegotiationEvent) -> Self {
        match event {
            NegotiationEvent::CurrentOffers(offers) => ServerMessage::CurrentOffers(offers),
            NegotiationEvent::OfferUpdate(offers) => ServerMessage::OfferUpdate(offers),
            NegotiationEvent::NegotiationEnded {
                accepted_offer,
                by_user,
            } => ServerMessage::NegotiationEnded(NegotiationEndedMessage {
                accepted_offer,
                by_user,
            }),
        }
    }
}

impl ServerMessage {
    /// Serialize to a text frame payload.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Wire name of the event, for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::Connected(_) => "connected",
            ServerMessage::CurrentOffers(_) => "currentOffers",
            ServerMessage::OfferUpdate(_) => "offerUpdate",
            ServerMessage::NegotiationEnded(_) => "negotiationEnded",
            ServerMessage::Error(_) => "error",
            ServerMessage::Pong(_) => "pong",
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All commands that can be received from a client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientCommand {
    #[serde(rename_all = "camelCase")]
    JoinSession { session_id: SessionId },

    #[serde(rename_all = "camelCase")]
    NewOffer {
        session_id: SessionId,
        offer_amount: AmountInput,
    },

    #[serde(rename_all = "camelCase")]
    AcceptOffer {
        session_id: SessionId,
        offer_id: String,
    },

    #[serde(rename_all = "camelCase")]
    DeclineOffer {
        session_id: SessionId,
        offer_id: String,
    },

    /// Heartbeat request.
    Ping,
}

impl ClientCommand {
    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Session the command targets, if any.
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            ClientCommand::JoinSession { session_id }
            | ClientCommand::NewOffer { session_id, .. }
            | ClientCommand::AcceptOffer { session_id, .. }
            | ClientCommand::DeclineOffer { session_id, .. } => Some(session_id),
            ClientCommand::Ping => None,
        }
    }
}

/// Offer amount as sent by a client: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// Numeric value; unparseable text yields NaN so validation rejects it.
    pub fn value(&self) -> f64 {
        match self {
            AmountInput::Number(n) => *n,
            AmountInput::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_join_session() {
        let cmd = ClientCommand::parse(r#"{"event":"joinSession","data":{"sessionId":"s1"}}"#)
            .unwrap();
        assert_eq!(
            cmd,
            ClientCommand::JoinSession {
                session_id: SessionId::new("s1").unwrap()
            }
        );
    }

    #[test]
    fn parses_new_offer_with_number_or_string() {
        let numeric = ClientCommand::parse(
            r#"{"event":"newOffer","data":{"sessionId":"s1","offerAmount":100.5}}"#,
        )
        .unwrap();
        let text = ClientCommand::parse(
            r#"{"event":"newOffer","data":{"sessionId":"s1","offerAmount":" 42 "}}"#,
        )
        .unwrap();

        match (numeric, text) {
            (
                ClientCommand::NewOffer { offer_amount: a, .. },
                ClientCommand::NewOffer { offer_amount: b, .. },
            ) => {
                assert_eq!(a.value(), 100.5);
                assert_eq!(b.value(), 42.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn non_numeric_text_amount_is_nan() {
        assert!(AmountInput::Text("abc".to_string()).value().is_nan());
        assert!(AmountInput::Text(String::new()).value().is_nan());
    }

    #[test]
    fn parses_ping_without_data() {
        assert_eq!(
            ClientCommand::parse(r#"{"event":"ping"}"#).unwrap(),
            ClientCommand::Ping
        );
    }

    #[test]
    fn rejects_unknown_event_and_missing_fields() {
        assert!(ClientCommand::parse(r#"{"event":"teleport","data":{}}"#).is_err());
        assert!(ClientCommand::parse(r#"{"event":"acceptOffer","data":{"sessionId":"s1"}}"#).is_err());
        assert!(ClientCommand::parse(r#"{"event":"joinSession","data":{"sessionId":"  "}}"#).is_err());
        assert!(ClientCommand::parse("not json").is_err());
    }

    #[test]
    fn error_serializes_with_event_envelope() {
        let msg = ServerMessage::Error(
            ErrorMessage::new("OFFER_NOT_FOUND", "Offer not found.")
                .for_session(&SessionId::new("s1").unwrap()),
        );
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();

        assert_eq!(value["event"], "error");
        assert_eq!(value["data"]["code"], "OFFER_NOT_FOUND");
        assert_eq!(value["data"]["message"], "Offer not found.");
        assert_eq!(value["data"]["sessionId"], "s1");
    }

    #[test]
    fn negotiation_error_maps_to_wire_code() {
        let err = NegotiationError::already_processed("o1");
        let msg = ErrorMessage::from(&err);
        assert_eq!(msg.code, "OFFER_ALREADY_PROCESSED");
        assert_eq!(msg.message, "Offer already processed.");
    }

    #[test]
    fn offer_update_serializes_as_array() {
        let msg = ServerMessage::from(NegotiationEvent::OfferUpdate(vec![]));
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"event": "offerUpdate", "data": []}));
    }
}
