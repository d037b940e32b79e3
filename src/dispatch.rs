use tracing::{error, info};
use url::Url;

use crate::commands::Command;
use crate::messages;
use crate::platform::{InboundUpdate, OutboundReply};
use crate::webapp::WebAppEvent;

/// Routes each inbound update to exactly one reply.
///
/// Holds nothing but the web app URL, so one instance is shared by every
/// concurrently running handler.
#[derive(Debug, Clone)]
pub struct UpdateDispatcher {
    webapp_url: Url,
}

impl UpdateDispatcher {
    pub fn new(webapp_url: Url) -> Self {
        Self { webapp_url }
    }

    pub fn handle(&self, update: &InboundUpdate) -> OutboundReply {
        match update {
            InboundUpdate::TextCommand { name, sender, .. } => match Command::from_name(name) {
                Some(Command::Start) => OutboundReply::html(messages::greeting(&sender.first_name))
                    .with_launcher(messages::OPEN_WEBAPP_LABEL, &self.webapp_url),
                Some(Command::Webapp) => OutboundReply::html(messages::WEBAPP_PROMPT)
                    .with_launcher(messages::WEBAPP_COMMAND_LABEL, &self.webapp_url),
                Some(Command::Help) => OutboundReply::html(messages::HELP),
                Some(Command::About) => OutboundReply::html(messages::ABOUT),
                None => self.fallback(),
            },
            InboundUpdate::WebAppPayload { raw_json, .. } => {
                info!("Received WebApp data: {}", raw_json);
                match WebAppEvent::parse(raw_json) {
                    Ok(event) => {
                        info!("WebApp event: {}", event.kind());
                        OutboundReply::html(event.render())
                    }
                    Err(e) => {
                        error!("Error processing WebApp data: {}", e);
                        OutboundReply::processing_error()
                    }
                }
            }
            InboundUpdate::PlainMessage { .. } => self.fallback(),
        }
    }

    fn fallback(&self) -> OutboundReply {
        OutboundReply::plain(messages::FALLBACK)
            .with_launcher(messages::OPEN_WEBAPP_LABEL, &self.webapp_url)
    }
}
