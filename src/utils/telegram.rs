use log::info;
use teloxide::prelude::{ChatId, Requester};
use teloxide::Bot;

use super::error::Result;
use crate::models::Changes;

// Builds the notification text: one block per course that changed.
pub fn render_message(changes: &Changes) -> String {
    let mut message = String::from("📚 Grade updates 📚\n");
    for (class_name, messages) in changes.iter().filter(|(_, m)| !m.is_empty()) {
        message.push_str(&format!("\n{class_name}\n"));
        for line in messages {
            message.push_str(&format!("• {line}\n"));
        }
    }
    message
}

// Sends `message` to `chat_id` through the bot identified by `bot_token`.
pub async fn send(bot_token: &str, chat_id: i64, message: &str) -> Result<()> {
    let bot = Bot::new(bot_token);
    let sent = bot.send_message(ChatId(chat_id), message).await?;
    info!("Notification sent {:?}", sent.id);
    Ok(())
}
