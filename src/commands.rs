use teloxide::utils::command::BotCommands;

/// Commands registered with Telegram and shown in the client's command menu.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "🏠 Главное меню")]
    Start,
    #[command(description = "🌐 Открыть WebApp")]
    Webapp,
    #[command(description = "🆘 Помощь")]
    Help,
    #[command(description = "ℹ️ О приложении")]
    About,
}

impl Command {
    /// Look up a command by its bare name (no leading slash, no `@bot` suffix).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::parse(&format!("/{}", name), "").ok()
    }
}

/// Split `/name@bot args` into the command name.
///
/// Returns `None` for text that is not a command, or for a command
/// explicitly addressed to a different bot.
pub fn command_name<'a>(text: &'a str, bot_username: Option<&str>) -> Option<&'a str> {
    let token = text.strip_prefix('/')?.split_whitespace().next()?;
    let (name, mention) = match token.split_once('@') {
        Some((name, mention)) => (name, Some(mention)),
        None => (token, None),
    };
    if name.is_empty() {
        return None;
    }
    match (mention, bot_username) {
        (Some(mention), Some(me)) if !mention.is_empty() && !mention.eq_ignore_ascii_case(me) => {
            None
        }
        _ => Some(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_command_names() {
        let names: Vec<String> = Command::bot_commands()
            .into_iter()
            .map(|c| c.command.trim_start_matches('/').to_string())
            .collect();
        assert_eq!(names, vec!["start", "webapp", "help", "about"]);
    }

    #[test]
    fn test_every_command_has_description() {
        for cmd in Command::bot_commands() {
            assert!(!cmd.description.is_empty(), "{} has no description", cmd.command);
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Command::from_name("start"), Some(Command::Start));
        assert_eq!(Command::from_name("webapp"), Some(Command::Webapp));
        assert_eq!(Command::from_name("help"), Some(Command::Help));
        assert_eq!(Command::from_name("about"), Some(Command::About));
        assert_eq!(Command::from_name("settings"), None);
    }

    #[test]
    fn test_command_name_plain() {
        assert_eq!(command_name("/start", None), Some("start"));
        assert_eq!(command_name("/help extra words", Some("gift_bot")), Some("help"));
    }

    #[test]
    fn test_command_name_with_mention() {
        assert_eq!(command_name("/start@Gift_Bot", Some("gift_bot")), Some("start"));
        assert_eq!(command_name("/start@other_bot", Some("gift_bot")), None);
    }

    #[test]
    fn test_command_name_with_empty_mention() {
        assert_eq!(command_name("/start@", Some("gift_bot")), Some("start"));
        assert_eq!(command_name("/start@ now", None), Some("start"));
    }

    #[test]
    fn test_command_name_rejects_non_commands() {
        assert_eq!(command_name("hello", None), None);
        assert_eq!(command_name("/", None), None);
        assert_eq!(command_name("/@gift_bot", Some("gift_bot")), None);
    }
}
