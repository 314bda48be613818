//! Ephemeral chat session.
//!
//! `Idle --submit--> AwaitingResponse --reply--> Idle`. The transcript lives
//! only as long as the session and is never persisted.

use crate::chooser::Chooser;
use crate::classifier::{classify, Classification};
use crate::greeting::welcome_message;
use crate::responses::reply_for;
use chrono::{DateTime, Utc};
use innerzen_core::ResponseStyle;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub is_emergency: bool,
}

impl Message {
    fn new(content: String, sender: Sender, timestamp: DateTime<Utc>, is_emergency: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            sender,
            timestamp,
            is_emergency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingResponse { pending: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("still waiting for the previous reply")]
    AwaitingResponse,
    #[error("no message is waiting for a reply")]
    NothingPending,
}

/// Outcome of one completed exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub reply: Message,
    pub classification: Classification,
    /// Crisis detected and the user opted into crisis support
    pub raise_banner: bool,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    style: ResponseStyle,
    crisis_support: bool,
    state: ConversationState,
    transcript: Vec<Message>,
    crisis_banner: bool,
}

impl Conversation {
    /// Open a session with the style's welcome message.
    pub fn open(style: ResponseStyle, crisis_support: bool, now: DateTime<Utc>) -> Self {
        let welcome = Message::new(welcome_message(style).to_string(), Sender::Bot, now, false);
        Self {
            style,
            crisis_support,
            state: ConversationState::Idle,
            transcript: vec![welcome],
            crisis_banner: false,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn style(&self) -> ResponseStyle {
        self.style
    }

    /// Stays raised for the rest of the session once shown.
    pub fn crisis_banner(&self) -> bool {
        self.crisis_banner
    }

    /// Record the user's message and wait for a reply.
    pub fn submit(&mut self, text: &str, now: DateTime<Utc>) -> Result<&Message, ConversationError> {
        if matches!(self.state, ConversationState::AwaitingResponse { .. }) {
            return Err(ConversationError::AwaitingResponse);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }

        self.transcript
            .push(Message::new(text.to_string(), Sender::User, now, false));
        self.state = ConversationState::AwaitingResponse {
            pending: text.to_string(),
        };
        Ok(&self.transcript[self.transcript.len() - 1])
    }

    /// Produce the reply to the pending message and return to idle.
    pub fn reply(&mut self, chooser: &dyn Chooser, now: DateTime<Utc>) -> Result<Turn, ConversationError> {
        let pending = match std::mem::replace(&mut self.state, ConversationState::Idle) {
            ConversationState::AwaitingResponse { pending } => pending,
            ConversationState::Idle => return Err(ConversationError::NothingPending),
        };

        let classification = classify(&pending);
        let text = reply_for(&pending, &classification, self.style, chooser).text;

        let raise_banner = classification.is_crisis && self.crisis_support;
        if raise_banner && !self.crisis_banner {
            tracing::info!("Crisis banner raised for this session");
        }
        self.crisis_banner |= raise_banner;

        let reply = Message::new(text, Sender::Bot, now, classification.is_crisis);
        self.transcript.push(reply.clone());
        Ok(Turn {
            reply,
            classification,
            raise_banner,
        })
    }

    /// Submit and reply in one step.
    pub fn exchange(
        &mut self,
        text: &str,
        chooser: &dyn Chooser,
        now: DateTime<Utc>,
    ) -> Result<Turn, ConversationError> {
        self.submit(text, now)?;
        self.reply(chooser, now)
    }
}
