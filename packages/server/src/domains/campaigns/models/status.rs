use std::fmt;

use serde::{Deserialize, Serialize};

/// Campaign lifecycle: draft → sent → replied, with closed reachable from
/// any other state and never left.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Sent,
    Replied,
    Closed,
}

/// Direction of a campaign message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "message_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Sent,
    Received,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Sent => "sent",
            CampaignStatus::Replied => "replied",
            CampaignStatus::Closed => "closed",
        }
    }

    /// Status after recording a message.
    ///
    /// Never moves backwards: a send on a replied campaign stays replied,
    /// and a closed campaign stays closed whatever arrives.
    pub fn after_message(self, message_type: MessageType) -> Self {
        match (self, message_type) {
            (CampaignStatus::Closed, _) => CampaignStatus::Closed,
            (_, MessageType::Received) => CampaignStatus::Replied,
            (CampaignStatus::Draft, MessageType::Sent) => CampaignStatus::Sent,
            (current, MessageType::Sent) => current,
        }
    }

    /// Only drafts may be sent with the synthesized outreach message
    pub fn can_send(self) -> bool {
        self == CampaignStatus::Draft
    }

    pub fn can_close(self) -> bool {
        self != CampaignStatus::Closed
    }

    /// Name, subject and body are frozen once the campaign leaves draft
    pub fn is_editable(self) -> bool {
        self == CampaignStatus::Draft
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Sent => "sent",
            MessageType::Received => "received",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
