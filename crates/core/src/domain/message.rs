use crate::domain::portfolio::PortfolioResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    PlainText,
    PortfolioResult,
}

/// What a message says. A portfolio result always carries its payload, so there is no
/// way to build a plain-text message with a portfolio attached or the reverse.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageContent {
    PlainText {
        body: String,
    },
    PortfolioResult {
        body: String,
        payload: PortfolioResult,
    },
}

impl MessageContent {
    pub fn text(body: impl Into<String>) -> Self {
        Self::PlainText { body: body.into() }
    }

    pub fn portfolio(body: impl Into<String>, payload: PortfolioResult) -> Self {
        Self::PortfolioResult {
            body: body.into(),
            payload,
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::PlainText { .. } => MessageKind::PlainText,
            Self::PortfolioResult { .. } => MessageKind::PortfolioResult,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Self::PlainText { body } | Self::PortfolioResult { body, .. } => body,
        }
    }

    pub fn payload(&self) -> Option<&PortfolioResult> {
        match self {
            Self::PlainText { .. } => None,
            Self::PortfolioResult { payload, .. } => Some(payload),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub origin: Origin,
    #[serde(flatten)]
    pub content: MessageContent,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::User,
            content: MessageContent::text(text),
            sent_at: Utc::now(),
        }
    }

    pub fn assistant(content: MessageContent) -> Self {
        Self {
            origin: Origin::Assistant,
            content,
            sent_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.content.kind()
    }

    pub fn body(&self) -> &str {
        self.content.body()
    }

    pub fn payload(&self) -> Option<&PortfolioResult> {
        self.content.payload()
    }
}
