//! Telegram Bot API gateway implementation.
//!
//! Covers the small slice of the Bot API the bot needs: long-poll update
//! fetching, message send/edit, callback acknowledgement and the
//! group-membership probe.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use eagle_core::UserId;

use crate::keyboards::{InlineKeyboard, ReplyKeyboard, ReplyMarkup};

use super::{GatewayError, MemberStatus, MessagingGateway, OutgoingMessage};

// =============================================================================
// Wire types (incoming)
// =============================================================================

/// One long-poll update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update id; the next poll offset is `update_id + 1`.
    pub update_id: i64,

    /// An inbound message, if this update carries one.
    #[serde(default)]
    pub message: Option<Message>,

    /// An inline-button press, if this update carries one.
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,

    /// A group membership transition, if this update carries one.
    #[serde(default)]
    pub chat_member: Option<ChatMemberUpdated>,
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Platform message id, used for edits.
    pub message_id: i64,

    /// The sender. Absent for channel posts, which the bot ignores.
    #[serde(default)]
    pub from: Option<User>,

    /// The chat the message arrived in.
    pub chat: Chat,

    /// Message text. Absent for stickers, photos and other non-text content.
    #[serde(default)]
    pub text: Option<String>,
}

/// A platform user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Numeric user id.
    pub id: i64,

    /// Display first name.
    #[serde(default)]
    pub first_name: Option<String>,
}

/// A chat (private or group).
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Numeric chat id. Negative for groups.
    pub id: i64,
}

/// An inline-button press.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    /// Callback id, needed for the acknowledgement call.
    pub id: String,

    /// Who pressed the button.
    pub from: User,

    /// The message the button was attached to.
    #[serde(default)]
    pub message: Option<Message>,

    /// The button's callback payload.
    #[serde(default)]
    pub data: Option<String>,
}

/// A member's status change in a chat.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMemberUpdated {
    /// The chat in which the status changed.
    pub chat: Chat,

    /// Status before the change.
    pub old_chat_member: ChatMemberInfo,

    /// Status after the change.
    pub new_chat_member: ChatMemberInfo,
}

/// A user's status within a chat.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMemberInfo {
    /// The member.
    pub user: User,

    /// Raw status string from the API.
    pub status: String,
}

impl ChatMemberInfo {
    /// Parse the raw status into a [`MemberStatus`].
    ///
    /// Unknown statuses map to [`MemberStatus::Left`]: the gate fails
    /// closed, so an unrecognized value must not grant access.
    #[must_use]
    pub fn member_status(&self) -> MemberStatus {
        parse_status(&self.status)
    }
}

fn parse_status(status: &str) -> MemberStatus {
    match status {
        "creator" => MemberStatus::Creator,
        "administrator" => MemberStatus::Administrator,
        "member" => MemberStatus::Member,
        "restricted" => MemberStatus::Restricted,
        "kicked" => MemberStatus::Kicked,
        _ => MemberStatus::Left,
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Me {
    username: String,
}

// =============================================================================
// Markup serialization
// =============================================================================

#[derive(Debug, Serialize)]
struct WireInlineButton<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

fn inline_markup_json(keyboard: &InlineKeyboard) -> serde_json::Value {
    let rows: Vec<Vec<WireInlineButton<'_>>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| WireInlineButton {
                    text: &b.text,
                    callback_data: b.callback_data.as_deref(),
                    url: b.url.as_deref(),
                })
                .collect()
        })
        .collect();
    json!({ "inline_keyboard": rows })
}

fn reply_markup_json(keyboard: &ReplyKeyboard) -> serde_json::Value {
    let rows: Vec<Vec<serde_json::Value>> = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(|label| json!({ "text": label })).collect())
        .collect();
    json!({ "keyboard": rows, "resize_keyboard": true })
}

fn markup_json(markup: &ReplyMarkup) -> serde_json::Value {
    match markup {
        ReplyMarkup::Inline(keyboard) => inline_markup_json(keyboard),
        ReplyMarkup::Reply(keyboard) => reply_markup_json(keyboard),
    }
}

// =============================================================================
// Client
// =============================================================================

/// Timeout for every call except the long poll (send, edit, probe).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram Bot API client.
#[derive(Debug, Clone)]
pub struct TelegramGateway {
    client: Client,
    base_url: String,
    poll_timeout_seconds: u64,
}

impl TelegramGateway {
    /// Create a gateway for the given bot token.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(token: &str, poll_timeout_seconds: u64) -> Self {
        Self::with_base_url("https://api.telegram.org", token, poll_timeout_seconds)
    }

    /// Create a gateway against a custom API host (used by tests).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_base_url(api_host: &str, token: &str, poll_timeout_seconds: u64) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: format!("{}/bot{token}", api_host.trim_end_matches('/')),
            poll_timeout_seconds,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<T, GatewayError> {
        let url = format!("{}/{method}", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let api: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !api.ok {
            return Err(GatewayError::Api {
                description: api.description.unwrap_or_else(|| "unknown error".into()),
            });
        }

        api.result.ok_or_else(|| GatewayError::Api {
            description: "missing result".into(),
        })
    }

    async fn call_short<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, GatewayError> {
        self.call(method, body, REQUEST_TIMEOUT).await
    }

    /// Fetch the next batch of updates, long-polling up to the configured
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure; the caller backs off and
    /// retries.
    pub async fn poll_updates(&self, offset: i64) -> Result<Vec<Update>, GatewayError> {
        // The request timeout must outlast the server-side long poll.
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": self.poll_timeout_seconds,
                "allowed_updates": ["message", "callback_query", "chat_member"],
            }),
            Duration::from_secs(self.poll_timeout_seconds + 10),
        )
        .await
    }

    /// Fetch the bot's own username, used to build referral links.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or API failure.
    pub async fn bot_username(&self) -> Result<String, GatewayError> {
        let me: Me = self.call_short("getMe", &json!({})).await?;
        Ok(me.username)
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn send_message(
        &self,
        chat: UserId,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError> {
        let mut body = json!({
            "chat_id": chat.get(),
            "text": message.text,
        });
        if let Some(markup) = &message.markup {
            body["reply_markup"] = markup_json(markup);
        }

        self.call_short::<serde_json::Value>("sendMessage", &body).await?;
        Ok(())
    }

    async fn edit_message(
        &self,
        chat: UserId,
        message_id: i64,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError> {
        let mut body = json!({
            "chat_id": chat.get(),
            "message_id": message_id,
            "text": message.text,
        });
        if let Some(markup) = &message.markup {
            body["reply_markup"] = markup_json(markup);
        }

        self.call_short::<serde_json::Value>("editMessageText", &body)
            .await?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), GatewayError> {
        let mut body = json!({ "callback_query_id": callback_id });
        if let Some(text) = text {
            body["text"] = json!(text);
        }

        // answerCallbackQuery returns a bare boolean result.
        self.call_short::<serde_json::Value>("answerCallbackQuery", &body)
            .await?;
        Ok(())
    }

    async fn member_status(
        &self,
        chat: UserId,
        user: UserId,
    ) -> Result<MemberStatus, GatewayError> {
        let info: ChatMemberInfo = self
            .call_short(
                "getChatMember",
                &json!({ "chat_id": chat.get(), "user_id": user.get() }),
            )
            .await?;
        Ok(info.member_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboards::InlineButton;

    #[test]
    fn status_parsing() {
        assert_eq!(parse_status("creator"), MemberStatus::Creator);
        assert_eq!(parse_status("administrator"), MemberStatus::Administrator);
        assert_eq!(parse_status("member"), MemberStatus::Member);
        assert_eq!(parse_status("restricted"), MemberStatus::Restricted);
        assert_eq!(parse_status("kicked"), MemberStatus::Kicked);
        assert_eq!(parse_status("left"), MemberStatus::Left);
        // Unknown statuses must not grant access.
        assert!(!parse_status("something_new").is_present());
    }

    #[test]
    fn inline_markup_shape() {
        let keyboard = InlineKeyboard::default().row(vec![
            InlineButton::callback("<<", "/page x -1"),
            InlineButton::link("site", "https://example.com"),
        ]);
        let value = inline_markup_json(&keyboard);
        assert_eq!(value["inline_keyboard"][0][0]["text"], "<<");
        assert_eq!(value["inline_keyboard"][0][0]["callback_data"], "/page x -1");
        assert!(value["inline_keyboard"][0][0].get("url").is_none());
        assert_eq!(value["inline_keyboard"][0][1]["url"], "https://example.com");
    }

    #[test]
    fn reply_markup_shape() {
        let keyboard = ReplyKeyboard {
            rows: vec![vec!["A".into(), "B".into()]],
        };
        let value = reply_markup_json(&keyboard);
        assert_eq!(value["keyboard"][0][1]["text"], "B");
        assert_eq!(value["resize_keyboard"], true);
    }

    #[test]
    fn update_deserializes_minimal_message() {
        let update: Update = serde_json::from_value(serde_json::json!({
            "update_id": 7,
            "message": {
                "message_id": 1,
                "from": {"id": 42, "first_name": "A"},
                "chat": {"id": 42},
                "text": "hello"
            }
        }))
        .unwrap();
        assert_eq!(update.update_id, 7);
        assert_eq!(update.message.unwrap().text.as_deref(), Some("hello"));
    }
}
