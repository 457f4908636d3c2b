//! Dealroom - Real-time two-party negotiation service
//!
//! Participants join a session, submit offers, and accept or decline the
//! other side's pending offers. Every state change is broadcast to all
//! connections in the session.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
