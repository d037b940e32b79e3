//! Static reply copy. Everything here except `FALLBACK` is sent with HTML
//! parse mode.

use teloxide::utils::html;

pub const OPEN_WEBAPP_LABEL: &str = "🚀 Открыть WebApp";
pub const WEBAPP_COMMAND_LABEL: &str = "🌐 Открыть WebApp";

pub const WEBAPP_PROMPT: &str = "🌐 <b>Открыть WebApp приложение:</b>";

pub const HELP: &str = "🆘 <b>Помощь по боту</b>

📋 <b>Доступные команды:</b>
• /start - Главное меню
• /webapp - Открыть WebApp
• /help - Показать эту справку
• /about - О приложении

🔗 <b>Как пользоваться:</b>
1. Нажмите на кнопку \"Открыть WebApp\"
2. Приложение покажет ваш профиль
3. Наслаждайтесь современным интерфейсом!

💡 <b>Совет:</b> Приложение автоматически адаптируется под вашу тему Telegram (светлая/темная).";

pub const ABOUT: &str = "ℹ️ <b>О приложении</b>

🔧 <b>Технологии:</b>
• Frontend: React + TypeScript + Tailwind CSS v4
• Backend: Rust + teloxide
• Hosting: Vercel/Netlify

⚡ <b>Особенности:</b>
• Быстрая загрузка и работа
• Адаптивный дизайн
• Поддержка темной темы
• Современные анимации

👨‍💻 <b>Разработчик:</b> Ваше имя
📅 <b>Версия:</b> 1.0.0";

/// Plain text, no markup.
pub const FALLBACK: &str = "🤖 Привет! Я бот для работы с WebApp.\n\n\
    📱 Нажмите кнопку ниже, чтобы открыть приложение, \
    или используйте команду /help для получения справки.";

pub const PROCESSING_ERROR: &str = "❌ <b>Ошибка обработки данных</b>";

/// `/start` greeting addressed to `first_name`.
pub fn greeting(first_name: &str) -> String {
    format!(
        "👋 <b>Привет, {}!</b>

🌟 Добро пожаловать в наш Telegram WebApp!

✨ <b>Что умеет приложение:</b>
• Показывает ваш профиль и аватар
• Адаптируется под тему Telegram
• Современный и красивый интерфейс
• Быстрая и плавная работа

🚀 <b>Нажмите кнопку ниже, чтобы открыть приложение!</b>",
        html::escape(first_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_includes_name() {
        let text = greeting("Анна");
        assert!(text.contains("Привет, Анна!"));
    }

    #[test]
    fn test_greeting_escapes_name() {
        let text = greeting("<script>");
        assert!(text.contains("&lt;script&gt;"));
        assert!(!text.contains("<script>"));
    }

    #[test]
    fn test_help_lists_every_command() {
        for cmd in ["/start", "/webapp", "/help", "/about"] {
            assert!(HELP.contains(cmd), "help is missing {}", cmd);
        }
    }
}
