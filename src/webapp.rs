//! Events sent by the mini app through `Telegram.WebApp.sendData`.
//!
//! The payload is a single JSON object with an `action` field. Text that is
//! not JSON at all is kept verbatim as [`WebAppEvent::RawText`]. Valid JSON
//! whose root, `gift` or `data` is not an object is a [`PayloadError`].

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};
use teloxide::utils::html;
use thiserror::Error;

const DEFAULT_GIFT_NAME: &str = "Unknown Gift";
const DEFAULT_RARITY: &str = "common";
const UNKNOWN: &str = "unknown";

const ACTION_GIFT_WON: &str = "gift_won";
const ACTION_USER_INTERACTION: &str = "user_interaction";

/// A JSON value from the payload whose type the mini app does not pin down.
///
/// Strings render without quotes, everything else in compact JSON form.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueValue(pub Value);

impl fmt::Display for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

/// Well-formed JSON that cannot be read as an event.
#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("expected {field} to be a JSON object, got {found}")]
    NotAnObject { field: &'static str, found: String },
    #[error("expected gift rarity to be a string, got {0}")]
    RarityNotText(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WebAppEvent {
    GiftWon {
        gift_name: String,
        rarity: String,
        spins_left: OpaqueValue,
    },
    UserInteraction {
        action: String,
        timestamp: OpaqueValue,
    },
    Unknown {
        action: String,
        raw_json: String,
    },
    RawText {
        raw_json: String,
    },
}

/// Top-level fields. `null` counts as absent.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    action: Option<Value>,
    #[serde(default)]
    gift: Option<Value>,
    #[serde(default, rename = "spinsLeft")]
    spins_left: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
}

fn json_type(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
    .to_string()
}

fn as_object(field: &'static str, value: Option<Value>) -> Result<Map<String, Value>, PayloadError> {
    match value {
        None => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(PayloadError::NotAnObject {
            field,
            found: json_type(&other),
        }),
    }
}

/// Scalar rendered as text, `default` when missing or `null`.
fn text_field(map: &Map<String, Value>, key: &str, default: &str) -> String {
    match map.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(value) => OpaqueValue(value.clone()).to_string(),
    }
}

impl WebAppEvent {
    /// Interpret a raw payload. Text that is not JSON never fails.
    pub fn parse(raw_json: &str) -> Result<Self, PayloadError> {
        let value = match serde_json::from_str::<Value>(raw_json) {
            Ok(value) => value,
            Err(_) => {
                return Ok(WebAppEvent::RawText {
                    raw_json: raw_json.to_string(),
                })
            }
        };
        if !value.is_object() {
            return Err(PayloadError::NotAnObject {
                field: "payload",
                found: json_type(&value),
            });
        }
        // Every field is an Option<Value>, so any object decodes.
        let envelope: Envelope =
            serde_json::from_value(value).map_err(|_| PayloadError::NotAnObject {
                field: "payload",
                found: "an unreadable object".to_string(),
            })?;

        let action = envelope
            .action
            .map(|v| OpaqueValue(v).to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let event = match action.as_str() {
            ACTION_GIFT_WON => {
                let gift = as_object("gift", envelope.gift)?;
                let rarity = match gift.get("rarity") {
                    None | Some(Value::Null) => DEFAULT_RARITY.to_string(),
                    Some(Value::String(rarity)) => rarity.clone(),
                    Some(other) => return Err(PayloadError::RarityNotText(json_type(other))),
                };
                WebAppEvent::GiftWon {
                    gift_name: text_field(&gift, "name", DEFAULT_GIFT_NAME),
                    rarity,
                    spins_left: OpaqueValue(envelope.spins_left.unwrap_or_else(|| Value::from(0))),
                }
            }
            ACTION_USER_INTERACTION => {
                let data = as_object("data", envelope.data)?;
                WebAppEvent::UserInteraction {
                    action: text_field(&data, "action", UNKNOWN),
                    timestamp: OpaqueValue(
                        envelope
                            .timestamp
                            .unwrap_or_else(|| Value::from(UNKNOWN)),
                    ),
                }
            }
            _ => WebAppEvent::Unknown {
                action,
                raw_json: raw_json.to_string(),
            },
        };
        Ok(event)
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            WebAppEvent::GiftWon { .. } => "gift_won",
            WebAppEvent::UserInteraction { .. } => "user_interaction",
            WebAppEvent::Unknown { .. } => "unknown",
            WebAppEvent::RawText { .. } => "raw_text",
        }
    }

    /// HTML reply text for this event. User-supplied fragments are escaped.
    pub fn render(&self) -> String {
        match self {
            WebAppEvent::GiftWon {
                gift_name,
                rarity,
                spins_left,
            } => {
                let mut text = format!(
                    "🎉 <b>Поздравляем с выигрышем!</b>\n\n\
                     🎁 <b>Подарок:</b> {}\n\
                     {} <b>Редкость:</b> {}\n\
                     🎰 <b>Спинов осталось:</b> {}",
                    html::escape(gift_name),
                    rarity_symbol(rarity),
                    html::escape(&title_case(rarity)),
                    html::escape(&spins_left.to_string()),
                );
                if rarity == "legendary" {
                    text.push_str("\n\n🎊 <b>ЛЕГЕНДАРНЫЙ ПОДАРОК!</b> Невероятная удача!");
                }
                text
            }
            WebAppEvent::UserInteraction { action, timestamp } => format!(
                "📊 <b>Взаимодействие зафиксировано</b>\n\n\
                 🔧 <b>Действие:</b> {}\n\
                 ⏰ <b>Время:</b> {}",
                html::escape(action),
                html::escape(&timestamp.to_string()),
            ),
            WebAppEvent::Unknown { action, raw_json } => format!(
                "✅ <b>Данные получены от WebApp!</b>\n\n\
                 📊 <b>Действие:</b> {}\n\
                 📝 <b>Данные:</b> <code>{}</code>",
                html::escape(action),
                html::escape(raw_json),
            ),
            WebAppEvent::RawText { raw_json } => format!(
                "✅ <b>Данные получены от WebApp!</b>\n\n📊 <code>{}</code>",
                html::escape(raw_json),
            ),
        }
    }
}

/// Badge shown next to a gift's rarity. Unrecognised rarities get the common badge.
pub fn rarity_symbol(rarity: &str) -> &'static str {
    match rarity {
        "rare" => "🔵",
        "epic" => "🟣",
        "legendary" => "🟡",
        _ => "⚪",
    }
}

/// Uppercase the first letter of every word, lowercase the rest.
/// A word starts after any non-alphabetic character.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
