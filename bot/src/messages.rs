//! User-facing message text.
//!
//! Presentation glue, kept in one place so the router reads as dispatch
//! logic rather than string formatting.

use eagle_core::{UserAccount, UserId};

/// Telegram's hard message-length ceiling, used by the admin user listing.
pub const MESSAGE_CHAR_LIMIT: usize = 4000;

/// The welcome banner sent on `/start`.
#[must_use]
pub fn welcome(first_name: Option<&str>) -> String {
    format!(
        "Hello, {}!\n\
         This bot searches open data sources for emails, phones, names, \
         nicknames, IPs, domains and more.\n\
         Sensitive fields are partially hidden. Any malicious use is \
         strictly prohibited.",
        first_name.unwrap_or("there")
    )
}

/// Balance, referral count and referral link summary.
#[must_use]
pub fn account_summary(
    account: &UserAccount,
    bot_username: &str,
    referrals_per_credit: u32,
) -> String {
    format!(
        "YOUR CREDITS = {}\n\
         TOTAL REFERRALS = {}\n\
         YOUR REFERRAL LINK = {}\n\
         (NB: {referrals_per_credit} referrals = 1 credit)\n\n\
         Send any text to start a search, e.g. an email address or a phone \
         number.",
        account.credits,
        account.referral_count,
        referral_link(bot_username, account.user_id),
    )
}

/// The deep link that credits this user for referrals.
#[must_use]
pub fn referral_link(bot_username: &str, user: UserId) -> String {
    format!("https://t.me/{bot_username}?start=ref_{user}")
}

/// Pricing text shown by the buy-credit flows.
#[must_use]
pub fn pricing() -> String {
    "Access pricing:\n\n\
     1 week access = 300 INR / 150 stars\n\
     1 month access = 600 INR / 300 stars\n\
     3 month access = 1000 INR / 500 stars\n\
     Lifetime access (API) = 3000 INR\n\n\
     Contact the admin to purchase:"
        .into()
}

/// Contact-admin text.
#[must_use]
pub fn contact_admin(admin_contact: &str) -> String {
    format!(
        "Need help or have a question?\n\
         Contact our admin directly: @{admin_contact}\n\n\
         We'll get back to you as soon as possible!"
    )
}

/// Referral-system explainer.
#[must_use]
pub fn referral_info(
    account: &UserAccount,
    bot_username: &str,
    referrals_per_credit: u32,
) -> String {
    format!(
        "Referral system\n\n\
         Invite your friends and earn credits!\n\
         YOUR REFERRAL LINK = {}\n\
         TOTAL REFERRALS = {}\n\n\
         When a new user starts the bot through your link your referral \
         count goes up. Every {referrals_per_credit} referrals earn you 1 \
         credit automatically.",
        referral_link(bot_username, account.user_id),
        account.referral_count,
    )
}

/// Join-the-group prompt for gated users.
#[must_use]
pub fn join_group(handle: Option<&str>) -> String {
    match handle {
        Some(handle) => format!(
            "To use this bot you must join our group: @{handle}\n\
             Please join and press VERIFY."
        ),
        None => "To use this bot you must join our group, then press VERIFY.".into(),
    }
}

/// Admin listing of all user accounts, truncated to the message limit.
#[must_use]
pub fn user_listing(accounts: &[(UserAccount, bool)]) -> String {
    if accounts.is_empty() {
        return "All users:\n\nNo users found in the database.".into();
    }

    let mut text = String::from("All users:\n\n");
    for (account, blacklisted) in accounts {
        let mark = if *blacklisted { " [blacklisted]" } else { "" };
        text.push_str(&format!(
            "ID: {} | Credits: {} | Referrals: {}{mark}\n",
            account.user_id, account.credits, account.referral_count,
        ));
    }

    if text.chars().count() > MESSAGE_CHAR_LIMIT {
        let mut truncated: String = text.chars().take(MESSAGE_CHAR_LIMIT).collect();
        truncated.push_str("\n... (truncated)");
        return truncated;
    }
    text
}
