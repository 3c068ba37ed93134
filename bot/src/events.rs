//! Inbound event normalization.
//!
//! Raw gateway updates are flattened here into one normalized descriptor the
//! router can dispatch on, with command and callback payloads parsed up
//! front.

use std::str::FromStr;

use eagle_core::{SessionId, UserId};

use crate::gateway::telegram::Update;
use crate::gateway::MemberStatus;
use crate::keyboards::callbacks;

/// One normalized inbound event.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// The user the event originates from.
    pub user: UserId,

    /// The chat to respond in (the private chat for everything the bot
    /// handles).
    pub chat: UserId,

    /// Sender's display name, for the welcome text.
    pub first_name: Option<String>,

    /// What happened.
    pub kind: EventKind,
}

/// The normalized event kinds the router dispatches on.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// A slash command.
    Command(Command),

    /// Plain text: a menu button label or a search query.
    FreeText(String),

    /// An inline-button press.
    ButtonPress {
        /// Callback id for the acknowledgement call.
        callback_id: String,
        /// The message the button was attached to, for in-place edits.
        message_id: Option<i64>,
        /// The parsed button action.
        action: ButtonAction,
    },

    /// A group membership transition.
    MembershipChange {
        /// The group chat the transition happened in.
        group: UserId,
        /// Status before.
        old: MemberStatus,
        /// Status after.
        new: MemberStatus,
    },
}

/// Parsed slash commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`, optionally carrying a referral payload.
    Start {
        /// The deep-link payload, e.g. `ref_12345`.
        payload: Option<String>,
    },

    /// `/credits` — balance inquiry.
    Credits,

    /// `/admin` — open the admin panel.
    AdminPanel,

    /// `/set_credits <user_id> <amount>`.
    SetCredits {
        /// Raw arguments after the command name.
        args: String,
    },

    /// `/blacklist <user_id>`.
    Blacklist {
        /// Raw arguments after the command name.
        args: String,
    },

    /// `/unblacklist <user_id>`.
    Unblacklist {
        /// Raw arguments after the command name.
        args: String,
    },

    /// Any other slash command; falls through to the search path.
    Other {
        /// The full original text.
        text: String,
    },
}

/// Parsed inline-button actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Navigate to a report page.
    Page {
        /// The report session to page through.
        session: SessionId,
        /// Requested page index; may be out of range and wraps.
        page: i64,
    },

    /// The inert center pagination button.
    PageNoop,

    /// Show the pricing text.
    ShowPricing,

    /// Re-run the membership check and welcome flow.
    VerifyMembership,

    /// Return to the main menu.
    BackToMainMenu,

    /// Admin: list all users.
    AdminViewUsers,

    /// Admin: usage hint for setting credits.
    AdminManageCredits,

    /// Admin: usage hint for blacklisting.
    AdminBlacklist,

    /// Admin: usage hint for unblacklisting.
    AdminUnblacklist,

    /// Admin: start the add-admin flow.
    AdminAddAdmin,

    /// Anything unrecognized; acknowledged and dropped.
    Unknown,
}

/// Flatten a raw update into a normalized event.
///
/// Returns `None` for updates the bot does not handle (channel posts,
/// non-text content from unknown senders, malformed callbacks).
#[must_use]
pub fn normalize(update: Update) -> Option<InboundEvent> {
    if let Some(message) = update.message {
        let from = message.from?;
        let text = message.text?;
        let kind = if text.starts_with('/') {
            EventKind::Command(parse_command(&text))
        } else {
            EventKind::FreeText(text)
        };
        return Some(InboundEvent {
            user: UserId::new(from.id),
            chat: UserId::new(message.chat.id),
            first_name: from.first_name,
            kind,
        });
    }

    if let Some(callback) = update.callback_query {
        let action = callback
            .data
            .as_deref()
            .map_or(ButtonAction::Unknown, parse_callback);
        let (chat, message_id) = callback
            .message
            .as_ref()
            .map_or((UserId::new(callback.from.id), None), |m| {
                (UserId::new(m.chat.id), Some(m.message_id))
            });
        return Some(InboundEvent {
            user: UserId::new(callback.from.id),
            chat,
            first_name: callback.from.first_name,
            kind: EventKind::ButtonPress {
                callback_id: callback.id,
                message_id,
                action,
            },
        });
    }

    if let Some(transition) = update.chat_member {
        let user = &transition.new_chat_member.user;
        return Some(InboundEvent {
            user: UserId::new(user.id),
            // The welcome flow responds in the user's private chat.
            chat: UserId::new(user.id),
            first_name: user.first_name.clone(),
            kind: EventKind::MembershipChange {
                group: UserId::new(transition.chat.id),
                old: transition.old_chat_member.member_status(),
                new: transition.new_chat_member.member_status(),
            },
        });
    }

    None
}

fn parse_command(text: &str) -> Command {
    let trimmed = text.trim();
    let (name, args) = match trimmed.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim().to_string()),
        None => (trimmed, String::new()),
    };

    match name {
        "/start" => Command::Start {
            payload: args.split_whitespace().next().map(str::to_string),
        },
        "/credits" => Command::Credits,
        "/admin" => Command::AdminPanel,
        "/set_credits" => Command::SetCredits { args },
        "/blacklist" => Command::Blacklist { args },
        "/unblacklist" => Command::Unblacklist { args },
        _ => Command::Other {
            text: text.to_string(),
        },
    }
}

fn parse_callback(data: &str) -> ButtonAction {
    if let Some(payload) = data.strip_prefix(callbacks::PAGE_PREFIX) {
        let mut parts = payload.split_whitespace();
        let session = parts.next().and_then(|s| SessionId::from_str(s).ok());
        let page = parts.next().and_then(|s| s.parse::<i64>().ok());
        return match (session, page) {
            (Some(session), Some(page)) => ButtonAction::Page { session, page },
            _ => ButtonAction::Unknown,
        };
    }

    match data {
        callbacks::PAGE_NOOP => ButtonAction::PageNoop,
        callbacks::SHOW_PRICING => ButtonAction::ShowPricing,
        callbacks::VERIFY_MEMBERSHIP => ButtonAction::VerifyMembership,
        callbacks::BACK_TO_MAIN_MENU => ButtonAction::BackToMainMenu,
        callbacks::ADMIN_VIEW_USERS => ButtonAction::AdminViewUsers,
        callbacks::ADMIN_MANAGE_CREDITS => ButtonAction::AdminManageCredits,
        callbacks::ADMIN_BLACKLIST => ButtonAction::AdminBlacklist,
        callbacks::ADMIN_UNBLACKLIST => ButtonAction::AdminUnblacklist,
        callbacks::ADMIN_ADD_ADMIN => ButtonAction::AdminAddAdmin,
        _ => ButtonAction::Unknown,
    }
}

/// Extract a referrer id from a `/start` deep-link payload.
///
/// Payloads look like `ref_12345`; anything else yields `None`.
#[must_use]
pub fn parse_referral_payload(payload: &str) -> Option<UserId> {
    let id = payload.strip_prefix("ref_")?;
    UserId::from_str(id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_with_referral_payload() {
        let command = parse_command("/start ref_777");
        assert_eq!(
            command,
            Command::Start {
                payload: Some("ref_777".into())
            }
        );
        assert_eq!(parse_referral_payload("ref_777"), Some(UserId::new(777)));
    }

    #[test]
    fn bare_start() {
        assert_eq!(parse_command("/start"), Command::Start { payload: None });
    }

    #[test]
    fn referral_payload_rejects_garbage() {
        assert_eq!(parse_referral_payload("ref_abc"), None);
        assert_eq!(parse_referral_payload("bonus_5"), None);
    }

    #[test]
    fn set_credits_keeps_raw_args() {
        assert_eq!(
            parse_command("/set_credits 123 10"),
            Command::SetCredits {
                args: "123 10".into()
            }
        );
    }

    #[test]
    fn unknown_command_falls_through() {
        assert_eq!(
            parse_command("/frobnicate now"),
            Command::Other {
                text: "/frobnicate now".into()
            }
        );
    }

    #[test]
    fn page_callback_roundtrip() {
        let session = SessionId::generate();
        let action = parse_callback(&format!("/page {session} -1"));
        assert_eq!(action, ButtonAction::Page { session, page: -1 });
    }

    #[test]
    fn malformed_page_callback_is_unknown() {
        assert_eq!(parse_callback("/page nonsense"), ButtonAction::Unknown);
        assert_eq!(parse_callback("/page "), ButtonAction::Unknown);
    }

    #[test]
    fn fixed_callbacks_parse() {
        assert_eq!(parse_callback("show_pricing"), ButtonAction::ShowPricing);
        assert_eq!(parse_callback("page_list_noop"), ButtonAction::PageNoop);
        assert_eq!(parse_callback("admin_add_admin"), ButtonAction::AdminAddAdmin);
        assert_eq!(parse_callback("whatever"), ButtonAction::Unknown);
    }
}
