//! Router-level tests: welcome, referrals, admin actions and pagination.

mod common;

use std::str::FromStr;

use common::{MembershipAnswer, TestHarness, ADMIN};

use eagle_bot::events::ButtonAction;
use eagle_bot::gateway::MemberStatus;
use eagle_bot::keyboards::ReplyMarkup;
use eagle_core::{SessionId, UserId};

const USER: UserId = UserId::new(100);

fn extract_session(markup: &ReplyMarkup) -> SessionId {
    let ReplyMarkup::Inline(keyboard) = markup else {
        panic!("expected inline markup");
    };
    let data = keyboard.rows[0][0]
        .callback_data
        .as_ref()
        .expect("expected pagination callback");
    let sid = data
        .split_whitespace()
        .nth(1)
        .expect("expected session id in payload");
    SessionId::from_str(sid).expect("valid session id")
}

// ============================================================================
// Welcome and account creation
// ============================================================================

#[tokio::test]
async fn start_creates_account_with_initial_grant() {
    let harness = TestHarness::new().await;
    harness.send_command(USER, "/start").await;

    assert_eq!(harness.balance(USER), Some(4));
    let texts = harness.gateway.texts_to(USER);
    assert!(texts.iter().any(|t| t.contains("Hello, Test!")));
    assert!(texts.iter().any(|t| t.contains("YOUR CREDITS = 4")));
    assert!(texts
        .iter()
        .any(|t| t.contains("https://t.me/eagle_test_bot?start=ref_100")));
}

#[tokio::test]
async fn start_is_idempotent_for_existing_accounts() {
    let harness = TestHarness::new().await;
    harness.send_command(USER, "/start").await;
    harness.mock_results(&["SomeDB"]).await;
    harness.send_text(USER, "query").await;
    assert_eq!(harness.balance(USER), Some(3));

    // A second /start does not reset the balance.
    harness.send_command(USER, "/start").await;
    assert_eq!(harness.balance(USER), Some(3));
}

#[tokio::test]
async fn non_member_gets_join_prompt_and_no_account() {
    let harness = TestHarness::with_group().await;
    harness
        .gateway
        .set_membership(USER, MembershipAnswer::Status(MemberStatus::Left));

    harness.send_command(USER, "/start").await;

    assert!(harness.balance(USER).is_none());
    let last = harness.gateway.last_text_to(USER).unwrap();
    assert!(last.contains("join our group"));
}

#[tokio::test]
async fn membership_transition_retriggers_welcome() {
    let harness = TestHarness::with_group().await;
    harness
        .gateway
        .set_membership(USER, MembershipAnswer::Status(MemberStatus::Member));

    let event = eagle_bot::events::InboundEvent {
        user: USER,
        chat: USER,
        first_name: Some("Test".into()),
        kind: eagle_bot::events::EventKind::MembershipChange {
            group: UserId::new(-1000),
            old: MemberStatus::Left,
            new: MemberStatus::Member,
        },
    };
    harness.router.handle(&harness.gateway, event).await.unwrap();

    assert_eq!(harness.balance(USER), Some(4));
}

#[tokio::test]
async fn transition_in_unrelated_group_is_ignored() {
    let harness = TestHarness::with_group().await;
    let event = eagle_bot::events::InboundEvent {
        user: USER,
        chat: USER,
        first_name: Some("Test".into()),
        kind: eagle_bot::events::EventKind::MembershipChange {
            group: UserId::new(-2000),
            old: MemberStatus::Left,
            new: MemberStatus::Member,
        },
    };
    harness.router.handle(&harness.gateway, event).await.unwrap();

    assert!(harness.balance(USER).is_none());
    assert!(harness.gateway.texts_to(USER).is_empty());
}

// ============================================================================
// Referrals
// ============================================================================

#[tokio::test]
async fn fifth_referral_awards_exactly_one_credit() {
    let harness = TestHarness::new().await;
    let referrer = UserId::new(200);
    harness.register(referrer).await;
    assert_eq!(harness.balance(referrer), Some(4));

    for i in 1..=4 {
        harness
            .send_command(UserId::new(300 + i), "/start ref_200")
            .await;
    }
    let account = harness.router.state().ledger.get(referrer).unwrap();
    assert_eq!(account.referral_count, 4);
    assert_eq!(account.credits, 4);

    harness.send_command(UserId::new(305), "/start ref_200").await;
    let account = harness.router.state().ledger.get(referrer).unwrap();
    assert_eq!(account.referral_count, 5);
    assert_eq!(account.credits, 5);

    // The referrer was notified about the reward.
    let texts = harness.gateway.texts_to(referrer);
    assert!(texts.iter().any(|t| t.contains("received 1 credit")));

    // A sixth referral does not award again.
    harness.send_command(UserId::new(306), "/start ref_200").await;
    let account = harness.router.state().ledger.get(referrer).unwrap();
    assert_eq!(account.referral_count, 6);
    assert_eq!(account.credits, 5);
}

#[tokio::test]
async fn self_referral_is_ignored() {
    let harness = TestHarness::new().await;
    harness.send_command(USER, "/start ref_100").await;

    let account = harness.router.state().ledger.get(USER).unwrap();
    assert_eq!(account.referral_count, 0);
    assert_eq!(account.credits, 4);
    assert!(account.referred_by.is_none());
}

#[tokio::test]
async fn referral_from_returning_user_does_not_count_again() {
    let harness = TestHarness::new().await;
    let referrer = UserId::new(200);
    harness.register(referrer).await;
    harness.send_command(USER, "/start ref_200").await;

    // The referred user restarts; no second attribution.
    harness.send_command(USER, "/start ref_200").await;
    let account = harness.router.state().ledger.get(referrer).unwrap();
    assert_eq!(account.referral_count, 1);
}

#[tokio::test]
async fn referral_to_unknown_referrer_is_harmless() {
    let harness = TestHarness::new().await;
    harness.send_command(USER, "/start ref_999").await;

    assert_eq!(harness.balance(USER), Some(4));
    assert!(harness.router.state().ledger.get(UserId::new(999)).is_none());
}

// ============================================================================
// Credit inquiry and menu
// ============================================================================

#[tokio::test]
async fn credits_button_reports_balance() {
    let harness = TestHarness::new().await;
    harness.register(USER).await;
    harness.send_text(USER, "Check My Credits").await;

    let last = harness.gateway.last_text_to(USER).unwrap();
    assert!(last.contains("4 credits left"));
}

#[tokio::test]
async fn menu_labels_do_not_cost_credits() {
    let harness = TestHarness::new().await;
    harness.register(USER).await;
    harness.mock_results(&["SomeDB"]).await;

    for label in [
        "Check My Credits",
        "Buy Credit",
        "Referral System",
        "Contact Admin",
        "Main Menu",
    ] {
        harness.send_text(USER, label).await;
    }

    assert_eq!(harness.balance(USER), Some(4));
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn multi_page_report_navigates_circularly() {
    let harness = TestHarness::new().await;
    harness.register(USER).await;
    harness.mock_results(&["DB_A", "DB_B", "DB_C"]).await;
    harness.send_text(USER, "query").await;

    let markup = harness.gateway.last_markup_to(USER).unwrap();
    let session = extract_session(&markup);

    // Three sections, three pages; fetch confirms.
    let pages = harness.router.state().reports.fetch(session).unwrap();
    assert_eq!(pages.len(), 3);

    // page = -1 wraps to the last page.
    harness
        .press_button(USER, ButtonAction::Page { session, page: -1 })
        .await;
    let edit = harness.gateway.last_edit_in(USER).unwrap();
    assert!(edit.text.contains("DB_C"));

    // page = 3 wraps to the first page.
    harness
        .press_button(USER, ButtonAction::Page { session, page: 3 })
        .await;
    let edit = harness.gateway.last_edit_in(USER).unwrap();
    assert!(edit.text.contains("DB_A"));
}

#[tokio::test]
async fn single_page_report_has_no_pagination_row() {
    let harness = TestHarness::new().await;
    harness.register(USER).await;
    harness.mock_results(&["OnlyDB"]).await;
    harness.send_text(USER, "query").await;

    let ReplyMarkup::Inline(keyboard) = harness.gateway.last_markup_to(USER).unwrap() else {
        panic!("expected inline markup");
    };
    // Only the back-to-menu row remains.
    assert_eq!(keyboard.rows.len(), 1);
    assert!(keyboard.rows[0][0].text.contains("Back"));
}

#[tokio::test]
async fn pagination_against_unknown_session_renders_expired() {
    let harness = TestHarness::new().await;
    harness.register(USER).await;

    harness
        .press_button(
            USER,
            ButtonAction::Page {
                session: SessionId::generate(),
                page: 1,
            },
        )
        .await;

    let edit = harness.gateway.last_edit_in(USER).unwrap();
    assert!(edit.text.contains("expired"));
}

// ============================================================================
// Admin actions
// ============================================================================

#[tokio::test]
async fn set_credits_requires_known_user() {
    let harness = TestHarness::new().await;
    harness.register(ADMIN).await;

    harness.send_command(ADMIN, "/set_credits 999 10").await;
    let last = harness.gateway.last_text_to(ADMIN).unwrap();
    assert!(last.contains("not found"));
}

#[tokio::test]
async fn set_credits_is_an_absolute_set() {
    let harness = TestHarness::new().await;
    harness.register(ADMIN).await;
    harness.register(USER).await;
    harness.mock_results(&["SomeDB"]).await;
    harness.send_text(USER, "query").await;
    harness.send_text(USER, "query2").await;
    assert_eq!(harness.balance(USER), Some(2));

    harness
        .send_command(ADMIN, &format!("/set_credits {USER} 10"))
        .await;

    assert_eq!(harness.balance(USER), Some(10));
    // The affected user is notified.
    let texts = harness.gateway.texts_to(USER);
    assert!(texts.iter().any(|t| t.contains("updated to 10")));
}

#[tokio::test]
async fn set_credits_rejects_malformed_arguments() {
    let harness = TestHarness::new().await;
    harness.register(ADMIN).await;

    harness.send_command(ADMIN, "/set_credits banana").await;
    let last = harness.gateway.last_text_to(ADMIN).unwrap();
    assert!(last.contains("Usage: /set_credits"));
}

#[tokio::test]
async fn set_credits_rejects_negative_amounts() {
    let harness = TestHarness::new().await;
    harness.register(ADMIN).await;
    harness.register(USER).await;

    harness
        .send_command(ADMIN, &format!("/set_credits {USER} -5"))
        .await;

    assert_eq!(harness.balance(USER), Some(4));
    let last = harness.gateway.last_text_to(ADMIN).unwrap();
    assert!(last.contains("Invalid amount"));
}

#[tokio::test]
async fn non_admin_cannot_set_credits() {
    let harness = TestHarness::new().await;
    harness.register(USER).await;

    harness.send_command(USER, "/set_credits 100 50").await;

    assert_eq!(harness.balance(USER), Some(4));
    let last = harness.gateway.last_text_to(USER).unwrap();
    assert!(last.contains("not authorized"));
}

#[tokio::test]
async fn blacklist_command_blocks_and_unblacklist_restores() {
    let harness = TestHarness::new().await;
    harness.register(ADMIN).await;
    harness.register(USER).await;

    harness.send_command(ADMIN, &format!("/blacklist {USER}")).await;
    assert!(harness.router.state().ledger.is_blacklisted(USER));

    harness.mock_results(&["SomeDB"]).await;
    harness.send_text(USER, "query").await;
    assert_eq!(harness.balance(USER), Some(4)); // denied, no debit

    harness
        .send_command(ADMIN, &format!("/unblacklist {USER}"))
        .await;
    assert!(!harness.router.state().ledger.is_blacklisted(USER));

    harness.send_text(USER, "query").await;
    assert_eq!(harness.balance(USER), Some(3));
}

#[tokio::test]
async fn add_admin_flow_awaits_the_next_message() {
    let harness = TestHarness::new().await;
    harness.register(ADMIN).await;

    harness.press_button(ADMIN, ButtonAction::AdminAddAdmin).await;
    let last = harness.gateway.last_text_to(ADMIN).unwrap();
    assert!(last.contains("send the User ID"));

    // The next message is consumed as the new admin's id, not as a search.
    harness.send_text(ADMIN, "500").await;
    assert!(harness.router.state().ledger.is_admin(UserId::new(500)));
    let texts = harness.gateway.texts_to(UserId::new(500));
    assert!(texts.iter().any(|t| t.contains("admin access")));
}

#[tokio::test]
async fn add_admin_rejects_non_numeric_input() {
    let harness = TestHarness::new().await;
    harness.register(ADMIN).await;

    harness.press_button(ADMIN, ButtonAction::AdminAddAdmin).await;
    harness.send_text(ADMIN, "not a number").await;

    let last = harness.gateway.last_text_to(ADMIN).unwrap();
    assert!(last.contains("Invalid User ID"));
}

#[tokio::test]
async fn add_admin_reports_existing_admins() {
    let harness = TestHarness::new().await;
    harness.register(ADMIN).await;

    harness.press_button(ADMIN, ButtonAction::AdminAddAdmin).await;
    harness.send_text(ADMIN, &ADMIN.to_string()).await;

    let last = harness.gateway.last_text_to(ADMIN).unwrap();
    assert!(last.contains("already an admin"));
}

#[tokio::test]
async fn non_admin_admin_button_is_refused_via_callback() {
    let harness = TestHarness::new().await;
    harness.register(USER).await;

    harness.press_button(USER, ButtonAction::AdminViewUsers).await;

    let answered = harness.gateway.answered.lock().unwrap();
    let (_, text) = answered.last().unwrap();
    assert_eq!(text.as_deref(), Some("You are not authorized to use this option."));
}

#[tokio::test]
async fn view_users_lists_accounts_with_blacklist_marker() {
    let harness = TestHarness::new().await;
    harness.register(ADMIN).await;
    harness.register(USER).await;
    harness.router.state().ledger.blacklist(USER).unwrap();

    harness.press_button(ADMIN, ButtonAction::AdminViewUsers).await;

    let last = harness.gateway.last_text_to(ADMIN).unwrap();
    assert!(last.contains(&format!("ID: {USER}")));
    assert!(last.contains("[blacklisted]"));
}

#[tokio::test]
async fn added_admin_sees_admin_menu() {
    let harness = TestHarness::new().await;
    harness.register(ADMIN).await;
    harness.register(USER).await;

    harness.press_button(ADMIN, ButtonAction::AdminAddAdmin).await;
    harness.send_text(ADMIN, &USER.to_string()).await;

    // The promoted user can now open the admin panel.
    harness.send_text(USER, "Admin Panel").await;
    let last = harness.gateway.last_text_to(USER).unwrap();
    assert!(last.contains("Admin Panel"));
}
