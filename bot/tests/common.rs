//! Common test utilities for eagle-bot integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use eagle_bot::events::{normalize, ButtonAction, EventKind, InboundEvent};
use eagle_bot::gateway::telegram::{Chat, Message, Update, User};
use eagle_bot::gateway::{GatewayError, MemberStatus, MessagingGateway, OutgoingMessage};
use eagle_bot::keyboards::ReplyMarkup;
use eagle_bot::{AppState, BotConfig, GroupCheck, SessionRouter};
use eagle_core::UserId;
use eagle_store::RocksStore;

/// The primary admin in all test configurations.
pub const ADMIN: UserId = UserId::new(1);

/// Scripted answer for the membership probe.
#[derive(Debug, Clone, Copy)]
pub enum MembershipAnswer {
    /// Report this status.
    Status(MemberStatus),
    /// Fail the probe with a transport error.
    Fail,
}

/// In-memory gateway that records everything outbound.
#[derive(Default)]
pub struct RecordingGateway {
    /// Sent messages, in order.
    pub sent: Mutex<Vec<(UserId, OutgoingMessage)>>,
    /// Edited messages, in order.
    pub edited: Mutex<Vec<(UserId, i64, OutgoingMessage)>>,
    /// Answered callbacks, in order.
    pub answered: Mutex<Vec<(String, Option<String>)>>,
    /// Per-user membership answers; users not listed are members.
    pub membership: Mutex<HashMap<UserId, MembershipAnswer>>,
}

impl RecordingGateway {
    /// Script the membership probe for one user.
    pub fn set_membership(&self, user: UserId, answer: MembershipAnswer) {
        self.membership.lock().unwrap().insert(user, answer);
    }

    /// All message texts sent to a chat, in order.
    pub fn texts_to(&self, chat: UserId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == chat)
            .map(|(_, m)| m.text.clone())
            .collect()
    }

    /// The last message text sent to a chat.
    pub fn last_text_to(&self, chat: UserId) -> Option<String> {
        self.texts_to(chat).pop()
    }

    /// The markup of the last message sent to a chat that carried one.
    pub fn last_markup_to(&self, chat: UserId) -> Option<ReplyMarkup> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(c, m)| *c == chat && m.markup.is_some())
            .and_then(|(_, m)| m.markup.clone())
    }

    /// The text of the last edit applied in a chat.
    pub fn last_edit_in(&self, chat: UserId) -> Option<OutgoingMessage> {
        self.edited
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(c, _, _)| *c == chat)
            .map(|(_, _, m)| m.clone())
    }

    /// Drop all recorded traffic.
    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
        self.edited.lock().unwrap().clear();
        self.answered.lock().unwrap().clear();
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send_message(
        &self,
        chat: UserId,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError> {
        self.sent.lock().unwrap().push((chat, message));
        Ok(())
    }

    async fn edit_message(
        &self,
        chat: UserId,
        message_id: i64,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError> {
        self.edited.lock().unwrap().push((chat, message_id, message));
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), GatewayError> {
        self.answered
            .lock()
            .unwrap()
            .push((callback_id.to_string(), text.map(str::to_string)));
        Ok(())
    }

    async fn member_status(
        &self,
        _chat: UserId,
        user: UserId,
    ) -> Result<MemberStatus, GatewayError> {
        match self.membership.lock().unwrap().get(&user) {
            Some(MembershipAnswer::Status(status)) => Ok(*status),
            Some(MembershipAnswer::Fail) => {
                Err(GatewayError::Transport("probe unavailable".into()))
            }
            None => Ok(MemberStatus::Member),
        }
    }
}

/// Test harness: router over a fresh database, a recording gateway and a
/// mock Lookup Service.
pub struct TestHarness {
    /// The router under test.
    pub router: SessionRouter,
    /// Records outbound traffic and scripts membership probes.
    pub gateway: RecordingGateway,
    /// The mock Lookup Service.
    pub lookup: MockServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Harness with the group check disabled.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Harness with the group check enabled against the recording gateway.
    pub async fn with_group() -> Self {
        Self::with_config(|config| {
            config.group = GroupCheck::Enabled {
                chat_id: UserId::new(-1000),
                handle: Some("eagle_group".into()),
            };
        })
        .await
    }

    /// Harness with arbitrary configuration tweaks.
    pub async fn with_config(tweak: impl FnOnce(&mut BotConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));
        let lookup = MockServer::start().await;

        let mut config = BotConfig {
            bot_token: "test-bot-token".into(),
            lookup_url: lookup.uri(),
            lookup_token: "test-lookup-token".into(),
            admin_user_id: ADMIN,
            admin_contact: "eagle_admin".into(),
            group: GroupCheck::Disabled,
            lang: "en".into(),
            result_limit: 300,
            initial_credits: 4,
            referrals_per_credit: 5,
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            lookup_timeout_seconds: 2,
            poll_timeout_seconds: 1,
        };
        tweak(&mut config);

        let state =
            AppState::new(config, store, "eagle_test_bot".into()).expect("Failed to build state");

        Self {
            router: SessionRouter::new(state),
            gateway: RecordingGateway::default(),
            lookup,
            _temp_dir: temp_dir,
        }
    }

    // =========================================================================
    // Event injection
    // =========================================================================

    /// Deliver a text message from a user, through the real normalization
    /// path (commands and free text alike).
    pub async fn send_text(&self, user: UserId, text: &str) {
        let update = Update {
            update_id: 0,
            message: Some(Message {
                message_id: 1,
                from: Some(User {
                    id: user.get(),
                    first_name: Some("Test".into()),
                }),
                chat: Chat { id: user.get() },
                text: Some(text.into()),
            }),
            callback_query: None,
            chat_member: None,
        };
        let event = normalize(update).expect("message should normalize");
        self.router
            .handle(&self.gateway, event)
            .await
            .expect("event handling failed");
    }

    /// Deliver a slash command from a user.
    pub async fn send_command(&self, user: UserId, text: &str) {
        self.send_text(user, text).await;
    }

    /// Deliver a button press from a user.
    pub async fn press_button(&self, user: UserId, action: ButtonAction) {
        let event = InboundEvent {
            user,
            chat: user,
            first_name: Some("Test".into()),
            kind: EventKind::ButtonPress {
                callback_id: "test-callback".into(),
                message_id: Some(1),
                action,
            },
        };
        self.router
            .handle(&self.gateway, event)
            .await
            .expect("event handling failed");
    }

    /// Register a user through the welcome flow.
    pub async fn register(&self, user: UserId) {
        self.send_command(user, "/start").await;
    }

    /// Current credit balance of a user, straight from the ledger.
    pub fn balance(&self, user: UserId) -> Option<i64> {
        self.router.state().ledger.get(user).map(|a| a.credits)
    }

    // =========================================================================
    // Lookup Service scripting
    // =========================================================================

    /// Mount a result response with one record per named database.
    pub async fn mock_results(&self, databases: &[&str]) {
        let mut list = serde_json::Map::new();
        for name in databases {
            list.insert(
                (*name).to_string(),
                serde_json::json!({
                    "InfoLeak": format!("{name} attribution"),
                    "Data": [{"Email": "found@example.com"}]
                }),
            );
        }
        self.mock_response(serde_json::json!({ "List": list })).await;
    }

    /// Mount the explicit no-results sentinel.
    pub async fn mock_no_results(&self) {
        self.mock_response(serde_json::json!({
            "List": { "No results found": {} }
        }))
        .await;
    }

    /// Mount an upstream error envelope.
    pub async fn mock_upstream_error(&self) {
        self.mock_response(serde_json::json!({ "Error code": "boom" }))
            .await;
    }

    /// Mount a raw JSON response for every lookup call.
    pub async fn mock_response(&self, body: serde_json::Value) {
        self.lookup.reset().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.lookup)
            .await;
    }

    /// Make every lookup call fail at the HTTP level.
    pub async fn mock_transport_failure(&self) {
        self.lookup.reset().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&self.lookup)
            .await;
    }
}
