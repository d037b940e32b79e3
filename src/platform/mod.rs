pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;
use tracing::error;
use url::Url;

use crate::commands::command_name;
use crate::messages;

/// Who sent an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Platform user ID, absent for messages sent on behalf of a chat
    pub user_id: Option<u64>,
    /// Name used when greeting the sender
    pub first_name: String,
}

impl Sender {
    /// Sender of a message posted on behalf of a chat rather than a user.
    /// Private chats are greeted by first name, groups and channels by title.
    pub fn for_chat(first_name: Option<&str>, title: Option<&str>) -> Self {
        Self {
            user_id: None,
            first_name: first_name.or(title).unwrap_or_default().to_string(),
        }
    }
}

/// One inbound message, already classified by content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundUpdate {
    TextCommand {
        name: String,
        raw_text: String,
        sender: Sender,
    },
    WebAppPayload {
        raw_json: String,
        sender: Sender,
    },
    PlainMessage {
        raw_text: String,
        sender: Sender,
    },
}

impl InboundUpdate {
    /// Classify a message from its text, media caption and web app payload.
    ///
    /// A web app payload always wins. Commands are recognised in captions
    /// too; messages with neither text nor caption become an empty
    /// `PlainMessage`.
    pub fn from_parts(
        text: Option<&str>,
        caption: Option<&str>,
        web_app_data: Option<&str>,
        sender: Sender,
        bot_username: Option<&str>,
    ) -> Self {
        if let Some(raw_json) = web_app_data {
            return InboundUpdate::WebAppPayload {
                raw_json: raw_json.to_string(),
                sender,
            };
        }

        let raw_text = text.or(caption).unwrap_or_default().to_string();
        match command_name(&raw_text, bot_username) {
            Some(name) => InboundUpdate::TextCommand {
                name: name.to_string(),
                raw_text: raw_text.clone(),
                sender,
            },
            None => InboundUpdate::PlainMessage { raw_text, sender },
        }
    }

    pub fn sender(&self) -> &Sender {
        match self {
            InboundUpdate::TextCommand { sender, .. }
            | InboundUpdate::WebAppPayload { sender, .. }
            | InboundUpdate::PlainMessage { sender, .. } => sender,
        }
    }

    /// Short description for logging.
    pub fn describe(&self) -> String {
        match self {
            InboundUpdate::TextCommand { name, .. } => format!("command /{}", name),
            InboundUpdate::WebAppPayload { .. } => "web app payload".to_string(),
            InboundUpdate::PlainMessage { .. } => "message".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// Inline button that opens the mini app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub label: String,
    pub url: Url,
}

/// Exactly one of these is sent per inbound update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub text: String,
    pub format: TextFormat,
    pub launcher: Option<Launcher>,
}

impl OutboundReply {
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            launcher: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            launcher: None,
        }
    }

    pub fn with_launcher(mut self, label: &str, url: &Url) -> Self {
        self.launcher = Some(Launcher {
            label: label.to_string(),
            url: url.clone(),
        });
        self
    }

    pub fn processing_error() -> Self {
        Self::html(messages::PROCESSING_ERROR)
    }
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send_reply(&self, chat_id: i64, reply: &OutboundReply) -> Result<()>;
}

/// What happened to a reply handed to [`deliver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// The reply was rejected and the processing-error notice went out instead.
    Fallback,
    /// Neither the reply nor the notice could be sent.
    Failed,
}

/// Send `reply`, substituting the processing-error notice if the send fails.
///
/// Never returns an error: a failing chat must not stop the receive loop.
pub async fn deliver<C>(client: &C, chat_id: i64, reply: &OutboundReply) -> Delivery
where
    C: ChatClient + ?Sized,
{
    let err = match client.send_reply(chat_id, reply).await {
        Ok(()) => return Delivery::Sent,
        Err(e) => e,
    };
    error!("Failed to send reply to chat {}: {:#}", chat_id, err);

    match client
        .send_reply(chat_id, &OutboundReply::processing_error())
        .await
    {
        Ok(()) => Delivery::Fallback,
        Err(e) => {
            error!("Failed to send error notice to chat {}: {:#}", chat_id, e);
            Delivery::Failed
        }
    }
}
