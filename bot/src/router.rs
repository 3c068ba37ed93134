//! The session router.
//!
//! Pure dispatch: maps normalized inbound events to the matching handler —
//! welcome/account creation, credit inquiry, referral link, admin actions,
//! pagination navigation — with the query dispatcher as the default for
//! free text that matches no menu label. Admin actions verify `is_admin`
//! first and answer explicitly instead of dropping silently.

use std::collections::HashMap;
use std::sync::Mutex;

use eagle_core::{
    report, DenyReason, EagleError, Result, SessionId, UserAccount, UserId,
};

use crate::dispatch::SearchOutcome;
use crate::events::{ButtonAction, Command, EventKind, InboundEvent};
use crate::gate::GateDecision;
use crate::gateway::{MessagingGateway, OutgoingMessage};
use crate::keyboards::{self, labels, ReplyMarkup};
use crate::messages;
use crate::state::AppState;

/// Short-lived conversational continuation, per user.
///
/// The add-admin flow waits for a follow-up message carrying the new
/// admin's id; that wait is explicit state here, consumed by the next free
/// text from the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    AwaitingAdminId,
}

/// Routes inbound events to handlers.
pub struct SessionRouter {
    state: AppState,
    pending: Mutex<HashMap<UserId, Pending>>,
}

impl SessionRouter {
    /// Create a router over the shared application state.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// The state, exposed for the polling loop and tests.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Handle one inbound event to completion.
    ///
    /// # Errors
    ///
    /// Errors are caught at the event boundary by the polling loop: they
    /// are logged and never crash the loop.
    pub async fn handle(&self, gateway: &dyn MessagingGateway, event: InboundEvent) -> Result<()> {
        let InboundEvent {
            user,
            chat,
            first_name,
            kind,
        } = event;
        let name = first_name.as_deref();

        match kind {
            EventKind::Command(command) => {
                self.handle_command(gateway, user, chat, name, command).await
            }
            EventKind::FreeText(text) => self.handle_free_text(gateway, user, chat, name, &text).await,
            EventKind::ButtonPress {
                callback_id,
                message_id,
                action,
            } => {
                self.handle_button(gateway, user, chat, name, &callback_id, message_id, action)
                    .await
            }
            EventKind::MembershipChange { group, old, new } => {
                self.handle_membership_change(gateway, user, chat, name, group, old, new)
                    .await
            }
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    async fn handle_command(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
        name: Option<&str>,
        command: Command,
    ) -> Result<()> {
        match command {
            Command::Start { payload } => {
                let referrer = payload.as_deref().and_then(crate::events::parse_referral_payload);
                self.welcome(gateway, user, chat, name, referrer).await
            }
            Command::Credits => self.credits_inquiry(gateway, user, chat).await,
            Command::AdminPanel => self.admin_panel(gateway, user, chat).await,
            Command::SetCredits { args } => self.admin_set_credits(gateway, user, chat, &args).await,
            Command::Blacklist { args } => {
                self.admin_blacklist(gateway, user, chat, &args, true).await
            }
            Command::Unblacklist { args } => {
                self.admin_blacklist(gateway, user, chat, &args, false).await
            }
            // Unknown commands fall through to the search path, like any
            // other text.
            Command::Other { text } => self.search(gateway, user, chat, &text).await,
        }
    }

    // =========================================================================
    // Free text
    // =========================================================================

    async fn handle_free_text(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
        name: Option<&str>,
        text: &str,
    ) -> Result<()> {
        // A pending add-admin flow consumes the next message outright.
        let pending = self.pending.lock().expect("pending lock poisoned").remove(&user);
        if pending == Some(Pending::AwaitingAdminId) {
            return self.process_add_admin(gateway, user, chat, text).await;
        }

        match text {
            labels::CHECK_CREDITS => self.credits_inquiry(gateway, user, chat).await,
            labels::BUY_CREDIT => self.pricing(gateway, user, chat).await,
            labels::CONTACT_ADMIN => self.contact_admin(gateway, user, chat).await,
            labels::REFERRAL_SYSTEM => self.referral_info(gateway, user, chat).await,
            labels::MAIN_MENU => self.welcome(gateway, user, chat, name, None).await,
            labels::ADMIN_PANEL => self.admin_panel(gateway, user, chat).await,
            query => self.search(gateway, user, chat, query).await,
        }
    }

    async fn search(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
        query: &str,
    ) -> Result<()> {
        let outcome = self.state.dispatcher.execute(gateway, user, query).await?;

        match outcome {
            SearchOutcome::Denied(reason) => self.render_denial(gateway, chat, &reason).await,
            SearchOutcome::OutOfCredits => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::with_markup(
                        "You have no credits left. Please buy more to continue searching.",
                        ReplyMarkup::Inline(keyboards::contact_admin(
                            &self.state.config.admin_contact,
                        )),
                    ),
                )
                .await
            }
            SearchOutcome::ProcessingError { balance } => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::with_markup(
                        format!(
                            "The bot is unable to process your request at the moment. \
                             Please try again later.\n\
                             Your credit has been refunded. Current credits: {balance}"
                        ),
                        ReplyMarkup::Inline(keyboards::back_to_menu()),
                    ),
                )
                .await
            }
            SearchOutcome::NoResults { balance } => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::with_markup(
                        format!(
                            "No results found for your query.\n\
                             Your credit has been refunded. Current credits: {balance}"
                        ),
                        ReplyMarkup::Inline(keyboards::back_to_menu()),
                    ),
                )
                .await
            }
            SearchOutcome::Success {
                session,
                page_count,
                ..
            } => {
                let Some(pages) = self.state.reports.fetch(session) else {
                    // Freshly stored; a miss here would be a bug, not an
                    // expired session.
                    return Err(EagleError::SessionExpired);
                };
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::with_markup(
                        pages[0].clone(),
                        self.page_markup(session, 0, page_count),
                    ),
                )
                .await
            }
        }
    }

    // =========================================================================
    // Buttons
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    async fn handle_button(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
        name: Option<&str>,
        callback_id: &str,
        message_id: Option<i64>,
        action: ButtonAction,
    ) -> Result<()> {
        match action {
            ButtonAction::Page { session, page } => {
                self.navigate_page(gateway, chat, callback_id, message_id, session, page)
                    .await
            }
            ButtonAction::PageNoop => {
                self.answer(gateway, callback_id, Some("This is the current page."))
                    .await
            }
            ButtonAction::ShowPricing => {
                self.answer(gateway, callback_id, None).await?;
                self.pricing(gateway, user, chat).await
            }
            ButtonAction::VerifyMembership => {
                self.answer(gateway, callback_id, Some("Checking membership..."))
                    .await?;
                self.welcome(gateway, user, chat, name, None).await
            }
            ButtonAction::BackToMainMenu => {
                self.answer(gateway, callback_id, None).await?;
                self.main_menu_return(gateway, user, chat).await
            }
            ButtonAction::AdminViewUsers
            | ButtonAction::AdminManageCredits
            | ButtonAction::AdminBlacklist
            | ButtonAction::AdminUnblacklist
            | ButtonAction::AdminAddAdmin => {
                self.handle_admin_button(gateway, user, chat, callback_id, action)
                    .await
            }
            ButtonAction::Unknown => self.answer(gateway, callback_id, Some("Unknown action.")).await,
        }
    }

    async fn navigate_page(
        &self,
        gateway: &dyn MessagingGateway,
        chat: UserId,
        callback_id: &str,
        message_id: Option<i64>,
        session: SessionId,
        page: i64,
    ) -> Result<()> {
        let Some(pages) = self.state.reports.fetch(session) else {
            tracing::debug!(session_id = %session, "pagination against expired session");
            let expired = OutgoingMessage::text(
                "The results of this request have expired or were deleted.",
            );
            match message_id {
                Some(message_id) => {
                    self.edit(gateway, chat, message_id, expired).await?;
                }
                None => self.send(gateway, chat, expired).await?,
            }
            self.send(
                gateway,
                chat,
                OutgoingMessage::with_markup(
                    "Please try another query or select an option:",
                    ReplyMarkup::Inline(keyboards::back_to_menu()),
                ),
            )
            .await?;
            return self.answer(gateway, callback_id, None).await;
        };

        let index = report::wrap_page_index(page, pages.len());
        let rendered = OutgoingMessage::with_markup(
            pages[index].clone(),
            self.page_markup(session, index, pages.len()),
        );
        match message_id {
            Some(message_id) => self.edit(gateway, chat, message_id, rendered).await?,
            None => self.send(gateway, chat, rendered).await?,
        }
        self.answer(gateway, callback_id, None).await
    }

    async fn handle_admin_button(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
        callback_id: &str,
        action: ButtonAction,
    ) -> Result<()> {
        if !self.state.ledger.is_admin(user) {
            return self
                .answer(
                    gateway,
                    callback_id,
                    Some("You are not authorized to use this option."),
                )
                .await;
        }

        match action {
            ButtonAction::AdminViewUsers => {
                let accounts: Vec<(UserAccount, bool)> = self
                    .state
                    .ledger
                    .all_accounts()
                    .into_iter()
                    .map(|a| {
                        let blacklisted = self.state.ledger.is_blacklisted(a.user_id);
                        (a, blacklisted)
                    })
                    .collect();
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::text(messages::user_listing(&accounts)),
                )
                .await?;
                self.answer(gateway, callback_id, Some("Users list generated."))
                    .await
            }
            ButtonAction::AdminManageCredits => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::text(
                        "To set credits, send: /set_credits <user_id> <amount>\n\
                         Example: /set_credits 123456789 10",
                    ),
                )
                .await?;
                self.answer(gateway, callback_id, None).await
            }
            ButtonAction::AdminBlacklist => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::text(
                        "To blacklist a user, send: /blacklist <user_id>\n\
                         Example: /blacklist 987654321",
                    ),
                )
                .await?;
                self.answer(gateway, callback_id, None).await
            }
            ButtonAction::AdminUnblacklist => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::text(
                        "To unblacklist a user, send: /unblacklist <user_id>\n\
                         Example: /unblacklist 987654321",
                    ),
                )
                .await?;
                self.answer(gateway, callback_id, None).await
            }
            ButtonAction::AdminAddAdmin => {
                self.pending
                    .lock()
                    .expect("pending lock poisoned")
                    .insert(user, Pending::AwaitingAdminId);
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::text(
                        "Please send the User ID of the person you want to add as an admin.",
                    ),
                )
                .await?;
                self.answer(gateway, callback_id, None).await
            }
            _ => self.answer(gateway, callback_id, Some("Unknown action.")).await,
        }
    }

    // =========================================================================
    // Membership transitions
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    async fn handle_membership_change(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
        name: Option<&str>,
        group: UserId,
        old: crate::gateway::MemberStatus,
        new: crate::gateway::MemberStatus,
    ) -> Result<()> {
        let crate::config::GroupCheck::Enabled { chat_id, .. } = &self.state.config.group else {
            return Ok(());
        };
        if group != *chat_id {
            return Ok(());
        }

        // A transition into the group re-triggers the welcome flow; the
        // gate re-probes membership, so a stale event cannot grant access.
        if !old.is_present() && new.is_present() {
            tracing::info!(user_id = %user, "user joined the group, re-running welcome");
            return self.welcome(gateway, user, chat, name, None).await;
        }
        Ok(())
    }

    // =========================================================================
    // User-facing flows
    // =========================================================================

    /// The welcome flow: gate, create the account if needed, run referral
    /// attribution, then render the menu.
    async fn welcome(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
        name: Option<&str>,
        referrer: Option<UserId>,
    ) -> Result<()> {
        let gate = self.state.dispatcher.gate();
        if let GateDecision::Deny(reason) = gate.evaluate(&self.state.ledger, gateway, user).await {
            return self.render_denial(gateway, chat, &reason).await;
        }

        // A user may not refer themselves.
        let referrer = referrer.filter(|r| *r != user);
        let outcome = self.state.ledger.create_if_absent(user, referrer)?;

        if outcome.created {
            if let Some(referrer_id) = referrer {
                self.reward_referrer(gateway, referrer_id).await?;
            }
        }

        self.send(gateway, chat, OutgoingMessage::text(messages::welcome(name)))
            .await?;
        self.send(
            gateway,
            chat,
            OutgoingMessage::text(messages::account_summary(
                &outcome.account,
                &self.state.bot_username,
                self.state.config.referrals_per_credit,
            )),
        )
        .await?;
        self.send(
            gateway,
            chat,
            OutgoingMessage::with_markup(
                "What would you like to do next?",
                ReplyMarkup::Reply(keyboards::main_menu(self.state.ledger.is_admin(user))),
            ),
        )
        .await
    }

    /// Credit the referrer for a successful referral and notify them.
    async fn reward_referrer(
        &self,
        gateway: &dyn MessagingGateway,
        referrer_id: UserId,
    ) -> Result<()> {
        let Some(outcome) = self.state.ledger.record_referral_success(referrer_id)? else {
            return Ok(());
        };

        self.notify(
            gateway,
            referrer_id,
            format!(
                "One of your referrals just started the bot! You now have {} referrals.",
                outcome.referral_count
            ),
        )
        .await;

        if outcome.credit_awarded {
            let balance = self
                .state
                .ledger
                .get(referrer_id)
                .map_or(0, |a| a.credits);
            self.notify(
                gateway,
                referrer_id,
                format!(
                    "Congratulations! You've reached {} referrals and received 1 credit. \
                     Your new balance is {balance}.",
                    self.state.config.referrals_per_credit
                ),
            )
            .await;
        }
        Ok(())
    }

    async fn credits_inquiry(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
    ) -> Result<()> {
        if let Some(reason) = self.gate_denial(gateway, user).await {
            return self.render_denial(gateway, chat, &reason).await;
        }

        let account = self.state.ledger.create_if_absent(user, None)?.account;
        self.send(
            gateway,
            chat,
            OutgoingMessage::with_markup(
                format!(
                    "You currently have {} credits left.\n\
                     You have {} successful referrals.",
                    account.credits, account.referral_count
                ),
                ReplyMarkup::Inline(keyboards::contact_admin(&self.state.config.admin_contact)),
            ),
        )
        .await
    }

    async fn pricing(&self, gateway: &dyn MessagingGateway, user: UserId, chat: UserId) -> Result<()> {
        if let Some(reason) = self.gate_denial(gateway, user).await {
            return self.render_denial(gateway, chat, &reason).await;
        }

        let mut keyboard = keyboards::contact_admin(&self.state.config.admin_contact);
        keyboard.rows.extend(keyboards::back_to_menu().rows);
        self.send(
            gateway,
            chat,
            OutgoingMessage::with_markup(messages::pricing(), ReplyMarkup::Inline(keyboard)),
        )
        .await
    }

    async fn contact_admin(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
    ) -> Result<()> {
        if let Some(reason) = self.gate_denial(gateway, user).await {
            return self.render_denial(gateway, chat, &reason).await;
        }

        self.send(
            gateway,
            chat,
            OutgoingMessage::with_markup(
                messages::contact_admin(&self.state.config.admin_contact),
                ReplyMarkup::Inline(keyboards::contact_admin(&self.state.config.admin_contact)),
            ),
        )
        .await
    }

    async fn referral_info(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
    ) -> Result<()> {
        if let Some(reason) = self.gate_denial(gateway, user).await {
            return self.render_denial(gateway, chat, &reason).await;
        }

        let account = self.state.ledger.create_if_absent(user, None)?.account;
        self.send(
            gateway,
            chat,
            OutgoingMessage::text(messages::referral_info(
                &account,
                &self.state.bot_username,
                self.state.config.referrals_per_credit,
            )),
        )
        .await
    }

    async fn main_menu_return(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
    ) -> Result<()> {
        let account = self.state.ledger.create_if_absent(user, None)?.account;
        self.send(
            gateway,
            chat,
            OutgoingMessage::text(format!(
                "Welcome back to the main menu!\n\n{}",
                messages::account_summary(
                    &account,
                    &self.state.bot_username,
                    self.state.config.referrals_per_credit,
                )
            )),
        )
        .await?;
        self.send(
            gateway,
            chat,
            OutgoingMessage::with_markup(
                "What would you like to do?",
                ReplyMarkup::Reply(keyboards::main_menu(self.state.ledger.is_admin(user))),
            ),
        )
        .await
    }

    // =========================================================================
    // Admin actions
    // =========================================================================

    async fn admin_panel(&self, gateway: &dyn MessagingGateway, user: UserId, chat: UserId) -> Result<()> {
        if !self.state.ledger.is_admin(user) {
            return self
                .send(
                    gateway,
                    chat,
                    OutgoingMessage::text("You are not authorized to access the admin panel."),
                )
                .await;
        }

        self.send(
            gateway,
            chat,
            OutgoingMessage::with_markup(
                "Welcome to the Admin Panel! Please select an option:",
                ReplyMarkup::Inline(keyboards::admin_panel()),
            ),
        )
        .await
    }

    async fn admin_set_credits(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
        args: &str,
    ) -> Result<()> {
        if !self.state.ledger.is_admin(user) {
            return self
                .send(
                    gateway,
                    chat,
                    OutgoingMessage::text("You are not authorized to use this command."),
                )
                .await;
        }

        let (target, amount) = match parse_set_credits_args(args) {
            Ok(parsed) => parsed,
            Err(usage) => {
                return self.send(gateway, chat, OutgoingMessage::text(usage)).await;
            }
        };

        match self.state.ledger.set_credits(target, amount) {
            Ok(_) => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::text(format!("Credits for user {target} set to {amount}.")),
                )
                .await?;
                self.notify(
                    gateway,
                    target,
                    format!("Your credits have been updated to {amount} by the admin."),
                )
                .await;
                Ok(())
            }
            Err(EagleError::UserNotFound { user_id }) => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::text(format!("User {user_id} not found in database.")),
                )
                .await
            }
            Err(EagleError::InvalidArgument(reason)) => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::text(format!("Invalid amount: {reason}.")),
                )
                .await
            }
            Err(e) => Err(e),
        }
    }

    async fn admin_blacklist(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
        args: &str,
        blacklist: bool,
    ) -> Result<()> {
        if !self.state.ledger.is_admin(user) {
            return self
                .send(
                    gateway,
                    chat,
                    OutgoingMessage::text("You are not authorized to use this command."),
                )
                .await;
        }

        let usage = if blacklist {
            "Usage: /blacklist <user_id>"
        } else {
            "Usage: /unblacklist <user_id>"
        };
        let Ok(target) = args.trim().parse::<UserId>() else {
            return self
                .send(
                    gateway,
                    chat,
                    OutgoingMessage::text(format!("Invalid user id. {usage}")),
                )
                .await;
        };

        if blacklist {
            self.state.ledger.blacklist(target)?;
            self.send(
                gateway,
                chat,
                OutgoingMessage::text(format!("User {target} has been blacklisted.")),
            )
            .await?;
            self.notify(
                gateway,
                target,
                "You have been blacklisted and can no longer use this bot.".to_string(),
            )
            .await;
        } else {
            self.state.ledger.unblacklist(target)?;
            self.send(
                gateway,
                chat,
                OutgoingMessage::text(format!("User {target} has been unblacklisted.")),
            )
            .await?;
            self.notify(
                gateway,
                target,
                "You have been unblacklisted and can now use this bot.".to_string(),
            )
            .await;
        }
        Ok(())
    }

    async fn process_add_admin(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        chat: UserId,
        text: &str,
    ) -> Result<()> {
        // Re-check: admin status may have been revoked since the prompt.
        if !self.state.ledger.is_admin(user) {
            return self
                .send(
                    gateway,
                    chat,
                    OutgoingMessage::text("You are not authorized to perform this action."),
                )
                .await;
        }

        let Ok(new_admin) = text.trim().parse::<UserId>() else {
            return self
                .send(
                    gateway,
                    chat,
                    OutgoingMessage::text("Invalid User ID. Please send a valid numeric User ID."),
                )
                .await;
        };

        if self.state.ledger.add_admin(new_admin)? {
            self.send(
                gateway,
                chat,
                OutgoingMessage::text(format!("User {new_admin} has been added as an admin.")),
            )
            .await?;
            self.notify(
                gateway,
                new_admin,
                "You have been granted admin access to the bot!".to_string(),
            )
            .await;
        } else {
            self.send(
                gateway,
                chat,
                OutgoingMessage::text(format!("User {new_admin} is already an admin.")),
            )
            .await?;
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn gate_denial(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
    ) -> Option<DenyReason> {
        let gate = self.state.dispatcher.gate();
        match gate.evaluate(&self.state.ledger, gateway, user).await {
            GateDecision::Allow => None,
            GateDecision::Deny(reason) => Some(reason),
        }
    }

    async fn render_denial(
        &self,
        gateway: &dyn MessagingGateway,
        chat: UserId,
        reason: &DenyReason,
    ) -> Result<()> {
        match reason {
            DenyReason::Blacklisted => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::text("You are blacklisted and cannot use this bot."),
                )
                .await
            }
            DenyReason::NotMember { group_handle } => {
                self.send(
                    gateway,
                    chat,
                    OutgoingMessage::with_markup(
                        messages::join_group(group_handle.as_deref()),
                        ReplyMarkup::Inline(keyboards::join_group(group_handle.as_deref())),
                    ),
                )
                .await
            }
        }
    }

    fn page_markup(&self, session: SessionId, page: usize, count: usize) -> ReplyMarkup {
        let mut keyboard = keyboards::pagination(session, page, count);
        keyboard.rows.extend(keyboards::back_to_menu().rows);
        ReplyMarkup::Inline(keyboard)
    }

    async fn send(
        &self,
        gateway: &dyn MessagingGateway,
        chat: UserId,
        message: OutgoingMessage,
    ) -> Result<()> {
        gateway
            .send_message(chat, message)
            .await
            .map_err(|e| EagleError::Gateway(e.to_string()))
    }

    async fn edit(
        &self,
        gateway: &dyn MessagingGateway,
        chat: UserId,
        message_id: i64,
        message: OutgoingMessage,
    ) -> Result<()> {
        gateway
            .edit_message(chat, message_id, message)
            .await
            .map_err(|e| EagleError::Gateway(e.to_string()))
    }

    async fn answer(
        &self,
        gateway: &dyn MessagingGateway,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<()> {
        gateway
            .answer_callback(callback_id, text)
            .await
            .map_err(|e| EagleError::Gateway(e.to_string()))
    }

    /// Best-effort notification; the target may have blocked the bot.
    async fn notify(&self, gateway: &dyn MessagingGateway, chat: UserId, text: String) {
        if let Err(e) = gateway.send_message(chat, OutgoingMessage::text(text)).await {
            tracing::debug!(chat = %chat, error = %e, "best-effort notification failed");
        }
    }
}

/// Parse `/set_credits <user_id> <amount>` arguments.
fn parse_set_credits_args(args: &str) -> std::result::Result<(UserId, i64), &'static str> {
    const USAGE: &str = "Usage: /set_credits <user_id> <amount>";

    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(USAGE);
    }
    let target = parts[0].parse::<UserId>().map_err(|_| USAGE)?;
    let amount = parts[1].parse::<i64>().map_err(|_| USAGE)?;
    Ok((target, amount))
}
