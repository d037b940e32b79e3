use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, Me, MenuButton, ParseMode, WebAppInfo,
};
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::commands::Command;
use crate::config::Config;
use crate::dispatch::UpdateDispatcher;
use crate::messages;
use crate::platform::{deliver, Delivery, InboundUpdate, Launcher, OutboundReply, Sender, TextFormat};

fn launcher_keyboard(launcher: &Launcher) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::web_app(
        launcher.label.clone(),
        WebAppInfo {
            url: launcher.url.clone(),
        },
    )]])
}

#[async_trait]
impl super::ChatClient for Bot {
    async fn send_reply(&self, chat_id: i64, reply: &OutboundReply) -> Result<()> {
        let mut request = self.send_message(ChatId(chat_id), reply.text.clone());
        if reply.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(launcher) = &reply.launcher {
            request = request.reply_markup(launcher_keyboard(launcher));
        }
        request.await.context("sendMessage failed")?;
        Ok(())
    }
}

/// Publish the command list shown in the client's `/` menu. Best-effort.
async fn register_commands(bot: &Bot) {
    match bot.set_my_commands(Command::bot_commands()).await {
        Ok(_) => info!("Bot commands set successfully"),
        Err(e) => error!("Error setting bot commands: {}", e),
    }
}

/// Replace the default chat menu button with one that opens the web app. Best-effort.
async fn set_menu_button(bot: &Bot, webapp_url: &Url) {
    let button = MenuButton::WebApp {
        text: messages::OPEN_WEBAPP_LABEL.to_string(),
        web_app: WebAppInfo {
            url: webapp_url.clone(),
        },
    };
    match bot.set_chat_menu_button().menu_button(button).await {
        Ok(_) => info!("Menu button set successfully"),
        Err(e) => error!("Error setting menu button: {}", e),
    }
}

/// Run the Telegram bot until interrupted
pub async fn run(config: Arc<Config>) -> Result<()> {
    let bot = Bot::new(&config.bot_token);

    info!("Starting Telegram platform...");

    register_commands(&bot).await;
    set_menu_button(&bot, &config.webapp_url).await;

    let dispatcher = Arc::new(UpdateDispatcher::new(config.webapp_url.clone()));
    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");
    Ok(())
}

fn sender_of(msg: &Message) -> Sender {
    match msg.from.as_ref() {
        Some(user) => Sender {
            user_id: Some(user.id.0),
            first_name: user.first_name.clone(),
        },
        None => Sender::for_chat(msg.chat.first_name(), msg.chat.title()),
    }
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    me: Me,
    dispatcher: Arc<UpdateDispatcher>,
) -> ResponseResult<()> {
    let update = InboundUpdate::from_parts(
        msg.text(),
        msg.caption(),
        msg.web_app_data().map(|d| d.data.as_str()),
        sender_of(&msg),
        me.user.username.as_deref(),
    );

    let sender = update.sender();
    info!(
        "Telegram {} from {} ({:?}) in chat {}",
        update.describe(),
        sender.first_name,
        sender.user_id,
        msg.chat.id
    );

    let reply = dispatcher.handle(&update);
    match deliver(&bot, msg.chat.id.0, &reply).await {
        Delivery::Sent => debug!("Reply sent to chat {}", msg.chat.id),
        Delivery::Fallback => warn!("Sent error notice to chat {} instead of reply", msg.chat.id),
        Delivery::Failed => error!("No reply could be delivered to chat {}", msg.chat.id),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launcher_keyboard_has_single_web_app_button() {
        let launcher = Launcher {
            label: messages::OPEN_WEBAPP_LABEL.to_string(),
            url: Url::parse("https://gifts.example.com/app").unwrap(),
        };
        let keyboard = launcher_keyboard(&launcher);

        assert_eq!(keyboard.inline_keyboard.len(), 1);
        assert_eq!(keyboard.inline_keyboard[0].len(), 1);
        let button = &keyboard.inline_keyboard[0][0];
        assert_eq!(button.text, messages::OPEN_WEBAPP_LABEL);
        assert_eq!(
            button.kind,
            teloxide::types::InlineKeyboardButtonKind::WebApp(WebAppInfo {
                url: launcher.url.clone(),
            })
        );
    }
}
