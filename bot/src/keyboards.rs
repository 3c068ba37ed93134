//! Keyboard construction and menu labels.
//!
//! Pure presentation glue: button labels, the main menu, pagination
//! controls and the admin panel. The router matches inbound free text
//! against these labels before treating it as a search query.

use eagle_core::SessionId;

/// Main-menu button labels.
pub mod labels {
    /// Balance inquiry.
    pub const CHECK_CREDITS: &str = "Check My Credits";
    /// Pricing text.
    pub const BUY_CREDIT: &str = "Buy Credit";
    /// Referral link and stats.
    pub const REFERRAL_SYSTEM: &str = "Referral System";
    /// Admin contact pointer.
    pub const CONTACT_ADMIN: &str = "Contact Admin";
    /// Re-send the welcome flow.
    pub const MAIN_MENU: &str = "Main Menu";
    /// Admin panel (only rendered for admins).
    pub const ADMIN_PANEL: &str = "Admin Panel";
}

/// Callback payloads for inline buttons.
pub mod callbacks {
    /// Pagination payload prefix: `/page <session> <index>`.
    pub const PAGE_PREFIX: &str = "/page ";
    /// The inert center "n/m" pagination button.
    pub const PAGE_NOOP: &str = "page_list_noop";
    /// Show the pricing text.
    pub const SHOW_PRICING: &str = "show_pricing";
    /// Re-run the membership check.
    pub const VERIFY_MEMBERSHIP: &str = "verify_group_membership";
    /// Return to the main menu.
    pub const BACK_TO_MAIN_MENU: &str = "back_to_main_menu";
    /// Admin: list all users.
    pub const ADMIN_VIEW_USERS: &str = "admin_view_users";
    /// Admin: how to set credits.
    pub const ADMIN_MANAGE_CREDITS: &str = "admin_manage_credits";
    /// Admin: how to blacklist.
    pub const ADMIN_BLACKLIST: &str = "admin_blacklist";
    /// Admin: how to unblacklist.
    pub const ADMIN_UNBLACKLIST: &str = "admin_unblacklist";
    /// Admin: start the add-admin flow.
    pub const ADMIN_ADD_ADMIN: &str = "admin_add_admin";
}

/// One inline button: either a callback or an external link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    /// Button caption.
    pub text: String,
    /// Callback payload delivered back to the bot when pressed.
    pub callback_data: Option<String>,
    /// External URL opened when pressed.
    pub url: Option<String>,
}

impl InlineButton {
    /// A button that fires a callback payload.
    #[must_use]
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            url: None,
        }
    }

    /// A button that opens an external link.
    #[must_use]
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            url: Some(url.into()),
        }
    }
}

/// An inline keyboard attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    /// Button rows.
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// Append a row of buttons.
    pub fn row(mut self, buttons: Vec<InlineButton>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// Whether the keyboard has any buttons at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A persistent reply keyboard (the main menu).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyKeyboard {
    /// Rows of button labels.
    pub rows: Vec<Vec<String>>,
}

/// Keyboard attachment for an outgoing message.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyMarkup {
    /// Inline buttons under the message.
    Inline(InlineKeyboard),
    /// Persistent reply keyboard.
    Reply(ReplyKeyboard),
}

/// Build the main menu keyboard, with the admin row for admins.
#[must_use]
pub fn main_menu(is_admin: bool) -> ReplyKeyboard {
    let mut rows = vec![
        vec![labels::CHECK_CREDITS.into(), labels::BUY_CREDIT.into()],
        vec![labels::REFERRAL_SYSTEM.into(), labels::CONTACT_ADMIN.into()],
        vec![labels::MAIN_MENU.into()],
    ];
    if is_admin {
        rows.push(vec![labels::ADMIN_PANEL.into()]);
    }
    ReplyKeyboard { rows }
}

/// Build the pagination row for a report page.
///
/// A single-page report gets no controls at all.
#[must_use]
pub fn pagination(session: SessionId, page: usize, count: usize) -> InlineKeyboard {
    if count <= 1 {
        return InlineKeyboard::default();
    }

    let prev = page as i64 - 1;
    let next = page as i64 + 1;
    InlineKeyboard::default().row(vec![
        InlineButton::callback("<<", format!("{}{session} {prev}", callbacks::PAGE_PREFIX)),
        InlineButton::callback(format!("{}/{count}", page + 1), callbacks::PAGE_NOOP),
        InlineButton::callback(">>", format!("{}{session} {next}", callbacks::PAGE_PREFIX)),
    ])
}

/// The join-group prompt: a link to the group plus a verify button.
#[must_use]
pub fn join_group(handle: Option<&str>) -> InlineKeyboard {
    let mut keyboard = InlineKeyboard::default();
    if let Some(handle) = handle {
        keyboard = keyboard.row(vec![InlineButton::link(
            "Join Our Group",
            format!("https://t.me/{handle}"),
        )]);
    }
    keyboard.row(vec![InlineButton::callback(
        "VERIFY",
        callbacks::VERIFY_MEMBERSHIP,
    )])
}

/// The contact-admin button used by pricing and balance replies.
#[must_use]
pub fn contact_admin(admin_contact: &str) -> InlineKeyboard {
    InlineKeyboard::default().row(vec![InlineButton::link(
        "CONTACT ADMIN",
        format!("https://t.me/{admin_contact}"),
    )])
}

/// The admin panel.
#[must_use]
pub fn admin_panel() -> InlineKeyboard {
    InlineKeyboard::default()
        .row(vec![InlineButton::callback(
            "View All Users",
            callbacks::ADMIN_VIEW_USERS,
        )])
        .row(vec![InlineButton::callback(
            "Manage Credits",
            callbacks::ADMIN_MANAGE_CREDITS,
        )])
        .row(vec![InlineButton::callback(
            "Blacklist User",
            callbacks::ADMIN_BLACKLIST,
        )])
        .row(vec![InlineButton::callback(
            "Unblacklist User",
            callbacks::ADMIN_UNBLACKLIST,
        )])
        .row(vec![InlineButton::callback(
            "Add Admin",
            callbacks::ADMIN_ADD_ADMIN,
        )])
}

/// A lone "back to main menu" button.
#[must_use]
pub fn back_to_menu() -> InlineKeyboard {
    InlineKeyboard::default().row(vec![InlineButton::callback(
        "Back to Main Menu",
        callbacks::BACK_TO_MAIN_MENU,
    )])
}
