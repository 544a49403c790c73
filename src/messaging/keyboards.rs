use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

/// A single-button keyboard that opens `url`.
pub fn build_open_app_keyboard(button_text: &str, url: Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(button_text.to_string(), url)]])
}
