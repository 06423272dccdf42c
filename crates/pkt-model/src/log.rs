//! Delivery log entries recorded after a packet is sent or exported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a packet left the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
    Share,
    Export,
}

impl DeliveryMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Share => "Share",
            Self::Export => "Export",
        }
    }
}

/// One row of the recipient log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub recipient_name: String,
    pub template_name: String,
    pub output_filename: String,
    pub sent_at: DateTime<Utc>,
    pub method: DeliveryMethod,
}
