//! # Project Chat
//!
//! A running conversation with a carpentry-focused language model.
//!
//! The assistant keeps two lists:
//! - `transcript`: everything shown to the user, starting with the greeting
//!   and including apology replies
//! - `conversation`: the turns the backend actually saw, sent back in full on
//!   every request so the model keeps context
//!
//! Backend failures never reach the caller. They are logged and replaced by
//! a fixed apology.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::{AssistError, AssistResult};

pub const SYSTEM_INSTRUCTION: &str = "You are an expert carpenter and lumber estimator.
Your goal is to help users understand lumber species (Western Red Cedar, Incense Cedar, Douglas Fir) and plan their deck or fence projects.
Focus on construction advice, material selection, and estimating quantities.
Do not mention specific store names or store hours unless asked about general lumber yard operations.
Always emphasize that estimates should be verified with local building codes.";

pub const GREETING: &str =
    "Hello! I'm your lumber project assistant. Ask me about wood selection, grades, or tips for your deck or fence!";

pub const APOLOGY: &str =
    "I'm having trouble connecting to the sawdust servers right now. Please try again later.";

pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One message in the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        ChatMessage::new(Role::Model, text)
    }
}

/// A text-generation backend.
///
/// `history` ends with the user message being answered.
pub trait TextBackend: Send + Sync {
    fn complete(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
    ) -> impl Future<Output = AssistResult<String>> + Send;
}

pub struct ChatAssistant<B> {
    backend: B,
    transcript: Vec<ChatMessage>,
    conversation: Vec<ChatMessage>,
}

impl<B: TextBackend> ChatAssistant<B> {
    pub fn new(backend: B) -> Self {
        ChatAssistant {
            backend,
            transcript: vec![ChatMessage::model(GREETING)],
            conversation: Vec::new(),
        }
    }

    /// Everything shown to the user so far, greeting first
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Send a user message and return the reply text.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the reply is the
    /// model's text, [`EMPTY_REPLY`] if it had nothing to say, or [`APOLOGY`]
    /// if the backend failed.
    pub async fn send(&mut self, message: &str) -> Option<String> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        let user = ChatMessage::user(message);
        self.transcript.push(user.clone());

        let mut request = self.conversation.clone();
        request.push(user);

        let reply = match self.backend.complete(SYSTEM_INSTRUCTION, &request).await {
            Ok(text) => {
                let text = if text.trim().is_empty() {
                    EMPTY_REPLY.to_string()
                } else {
                    text
                };
                request.push(ChatMessage::model(text.clone()));
                self.conversation = request;
                debug!(turns = self.conversation.len(), "chat reply received");
                text
            }
            Err(AssistError::EmptyResponse { model }) => {
                debug!(%model, "model returned no text");
                EMPTY_REPLY.to_string()
            }
            Err(e) => {
                error!(error = %e, code = e.error_code(), "chat backend failed");
                APOLOGY.to_string()
            }
        };

        self.transcript.push(ChatMessage::model(reply.clone()));
        Some(reply)
    }
}
