//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Sender of a message in a conversation or generation request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model
    #[display("system")]
    System,
    /// The customer
    #[display("user")]
    User,
    /// The support agent (model output)
    #[display("assistant")]
    Assistant,
}
