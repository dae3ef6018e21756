//! Session manager: the imperative shell around [`Session`].
//!
//! Applies host events to the session state, runs the intent router for
//! accepted user messages, appends exactly one bot reply per accepted
//! message, and keeps the inactivity watchdog armed while the widget is open.
//! Nothing here returns an error to the host: rejected input is absorbed and
//! collaborator failures become canned replies.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use concierge_core::{ConciergeConfig, QuickAction, Visibility};
use tracing::{debug, error, info, warn};

use crate::email::EmailDraft;
use crate::ports::{EmailHandoff, FreeTextResponder, IdentityProvider, ProfileLookup};
use crate::quick_action::{Dispatch, QuickActionCatalog};
use crate::replies::{self, Reply};
use crate::router::IntentRouter;
use crate::session::{Session, SessionSnapshot};
use crate::watchdog::InactivityWatchdog;

/// Collaborators a session manager is wired to.
#[derive(Clone)]
pub struct SessionServices {
    pub profiles: Arc<dyn ProfileLookup>,
    pub responder: Arc<dyn FreeTextResponder>,
    pub identity: Arc<dyn IdentityProvider>,
    pub email: Arc<dyn EmailHandoff>,
}

/// Session state plus the watchdog guarding it. Locked as one unit.
struct SessionInner {
    session: Session,
    watchdog: InactivityWatchdog,
}

impl SessionInner {
    /// Restart the idle window after activity, if the widget is open.
    fn touch(&mut self) {
        if self.session.visibility() == Visibility::Open && !self.session.is_ended() {
            self.watchdog.reset();
        }
    }

    fn end(&mut self) -> bool {
        let ended = self.session.end(replies::FAREWELL);
        if ended {
            self.watchdog.disarm();
        }
        ended
    }

    /// Append a reply started in `epoch`. Replies outliving a reset are dropped.
    fn deliver(&mut self, epoch: u64, reply: Reply) {
        if self.session.epoch() != epoch {
            debug!(
                started = epoch,
                current = self.session.epoch(),
                "Dropping reply from a reset session"
            );
            return;
        }
        self.session.append_bot(reply.text, reply.options);
        self.session.finish_reply();
        self.touch();
    }
}

fn lock(inner: &Mutex<SessionInner>) -> MutexGuard<'_, SessionInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One support-chat session as seen by its host.
///
/// Methods that spawn work (opening, sending) must run inside a tokio
/// runtime. Dropping the manager disarms the watchdog.
pub struct SessionManager {
    inner: Arc<Mutex<SessionInner>>,
    router: IntentRouter,
    identity: Arc<dyn IdentityProvider>,
    email: Arc<dyn EmailHandoff>,
    catalog: QuickActionCatalog,
    draft: EmailDraft,
}

impl SessionManager {
    /// Create a closed session wired to the given collaborators.
    pub fn new(config: &ConciergeConfig, services: SessionServices) -> Self {
        let timeout = Duration::from_secs(config.chat.idle_timeout_secs);
        let inner = Arc::new_cyclic(|weak: &Weak<Mutex<SessionInner>>| {
            let weak = weak.clone();
            Mutex::new(SessionInner {
                session: Session::new(),
                watchdog: InactivityWatchdog::new(timeout, move || {
                    if let Some(inner) = weak.upgrade() {
                        let mut inner = lock(&inner);
                        if !inner.watchdog.is_expired() {
                            return;
                        }
                        if inner.session.visibility() == Visibility::Open && inner.end() {
                            info!("Chat session ended after inactivity");
                        }
                    }
                }),
            })
        });

        Self {
            inner,
            router: IntentRouter::new(
                services.profiles,
                services.responder,
                config.support.email.clone(),
            ),
            identity: services.identity,
            email: services.email,
            catalog: QuickActionCatalog::from_config(&config.chat),
            draft: EmailDraft::from_config(&config.support),
        }
    }

    // -----------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------

    /// Show the widget; an empty session gets the welcome sequence.
    pub fn open(&self) -> bool {
        let mut inner = lock(&self.inner);
        let opened = inner.session.open(&replies::WELCOME);
        if opened {
            inner.touch();
        }
        opened
    }

    pub fn minimize(&self) -> bool {
        let mut inner = lock(&self.inner);
        let minimized = inner.session.minimize();
        if minimized {
            inner.watchdog.disarm();
        }
        minimized
    }

    pub fn restore(&self) -> bool {
        let mut inner = lock(&self.inner);
        let restored = inner.session.restore();
        if restored {
            inner.touch();
        }
        restored
    }

    /// Hide the widget. An ended session is cleared on the way out.
    pub fn close(&self) -> bool {
        let mut inner = lock(&self.inner);
        let closed = inner.session.close();
        if closed {
            inner.watchdog.disarm();
        }
        closed
    }

    // -----------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------

    /// Returns `false` when the session has ended and the text was ignored.
    pub fn set_pending_input(&self, text: &str) -> bool {
        lock(&self.inner).session.set_pending_input(text)
    }

    /// Post a user message and wait for the bot's reply to be appended.
    ///
    /// Returns `false` when the input was absorbed (empty, busy, or ended).
    /// The reply lands even if this future is dropped before it resolves.
    pub async fn send_message(&self, text: &str) -> bool {
        let Some(epoch) = self.accept_user(text) else {
            return false;
        };
        let router = self.router.clone();
        let identity = self.identity.current();
        let utterance = text.to_string();
        self.deliver(epoch, async move {
            router.route(&utterance, identity.as_ref()).await
        })
        .await;
        true
    }

    /// A clicked quick-reply option behaves like typed input.
    pub async fn click_option(&self, text: &str) -> bool {
        self.send_message(text).await
    }

    /// Post a quick action's label as the user's message and answer it.
    pub async fn click_quick_action(&self, id: &str) -> bool {
        match self.catalog.dispatch(id) {
            Ok(Dispatch::Route(label)) => self.send_message(label).await,
            Ok(Dispatch::DirectHelp(label)) => {
                let mut inner = lock(&self.inner);
                if let Err(e) = inner.session.append_user(label) {
                    debug!(error = %e, "Ignoring quick action");
                    return false;
                }
                inner.session.begin_reply();
                let epoch = inner.session.epoch();
                inner.deliver(epoch, replies::help());
                true
            }
            Err(e) => {
                debug!(error = %e, "Ignoring quick action");
                false
            }
        }
    }

    /// Manual "End Chat". No-op if already ended.
    pub fn end_chat(&self) -> bool {
        let ended = lock(&self.inner).end();
        if ended {
            info!("Chat session ended by user");
        }
        ended
    }

    /// Hand the support email template to the mail client.
    ///
    /// Returns the `mailto:` link on success.
    pub fn compose_support_email(&self) -> Option<String> {
        match self.email.compose(&self.draft) {
            Ok(()) => Some(self.draft.mailto_url()),
            Err(e) => {
                warn!(error = %e, "Support email handoff failed");
                None
            }
        }
    }

    // -----------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.inner).session.snapshot()
    }

    /// Open and not ended: the only state in which the watchdog can still
    /// end the session on its own.
    pub fn is_active(&self) -> bool {
        let inner = lock(&self.inner);
        inner.session.visibility() == Visibility::Open && !inner.session.is_ended()
    }

    pub fn quick_actions(&self) -> &[QuickAction] {
        self.catalog.actions()
    }

    /// Cancel the watchdog. Call when the owning view goes away.
    pub fn shutdown(&self) {
        lock(&self.inner).watchdog.disarm();
        debug!("Chat session torn down");
    }

    // -- Private helpers --

    /// Post the user message and mark a reply in flight. Returns the
    /// session epoch the reply belongs to.
    fn accept_user(&self, text: &str) -> Option<u64> {
        let mut inner = lock(&self.inner);
        match inner.session.append_user(text) {
            Ok(_) => {
                inner.session.begin_reply();
                inner.touch();
                Some(inner.session.epoch())
            }
            Err(e) => {
                debug!(error = %e, "Ignoring user input");
                None
            }
        }
    }

    /// Build the reply on its own task and append it.
    ///
    /// A panic while building becomes the "trouble processing" reply, so the
    /// busy flag always clears and the user always gets an answer.
    async fn deliver<F>(&self, epoch: u64, reply: F)
    where
        F: Future<Output = Reply> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let reply = match tokio::spawn(reply).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(error = %e, "Reply construction failed");
                    replies::processing_trouble()
                }
            };
            lock(&inner).deliver(epoch, reply);
        });
        if let Err(e) = task.await {
            error!(error = %e, "Reply delivery task failed");
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::SharedIdentity;
    use crate::test_support::{FakeProfiles, FakeResponder, RecordingHandoff};
    use concierge_core::{Identity, Sender, VerificationFlag};
    use tokio::sync::Notify;

    struct Harness {
        manager: Arc<SessionManager>,
        profiles: Arc<FakeProfiles>,
        responder: Arc<FakeResponder>,
        identity: Arc<SharedIdentity>,
        email: Arc<RecordingHandoff>,
    }

    fn harness_with(profiles: FakeProfiles, responder: FakeResponder) -> Harness {
        let profiles = Arc::new(profiles);
        let responder = Arc::new(responder);
        let identity = Arc::new(SharedIdentity::new());
        let email = Arc::new(RecordingHandoff::default());
        let services = SessionServices {
            profiles: profiles.clone(),
            responder: responder.clone(),
            identity: identity.clone(),
            email: email.clone(),
        };
        let manager = Arc::new(SessionManager::new(&ConciergeConfig::default(), services));
        Harness {
            manager,
            profiles,
            responder,
            identity,
            email,
        }
    }

    fn harness() -> Harness {
        harness_with(
            FakeProfiles::verified(VerificationFlag::Verified),
            FakeResponder::replying("Generated answer"),
        )
    }

    fn bot_texts(snapshot: &SessionSnapshot) -> Vec<String> {
        snapshot
            .transcript
            .iter()
            .filter(|m| m.sender == Sender::Bot)
            .map(|m| m.text.clone())
            .collect()
    }

    async fn advance_secs(secs: u64) {
        tokio::time::advance(Duration::from_secs(secs)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    // ---- Opening ----

    #[tokio::test]
    async fn test_open_shows_welcome_sequence() {
        let h = harness();
        assert!(h.manager.open());
        let snap = h.manager.snapshot();
        assert_eq!(snap.visibility, Visibility::Open);
        assert_eq!(bot_texts(&snap), replies::WELCOME.to_vec());
        assert!(!snap.is_loading);
    }

    #[tokio::test]
    async fn test_reopen_does_not_replay_welcome() {
        let h = harness();
        h.manager.open();
        h.manager.send_message("hello there").await;
        h.manager.close();
        h.manager.open();
        assert_eq!(h.manager.snapshot().transcript.len(), 5);
    }

    // ---- Sending ----

    #[tokio::test]
    async fn test_send_appends_exactly_one_reply() {
        let h = harness();
        h.manager.open();
        assert!(h.manager.send_message("where should I travel?").await);

        let snap = h.manager.snapshot();
        assert_eq!(snap.transcript.len(), 5);
        assert_eq!(snap.transcript[3].sender, Sender::User);
        assert_eq!(snap.transcript[3].text, "where should I travel?");
        assert_eq!(snap.transcript[4].sender, Sender::Bot);
        assert_eq!(snap.transcript[4].text, "Generated answer");
        assert!(!snap.is_loading);
    }

    #[tokio::test]
    async fn test_empty_or_whitespace_message_is_noop() {
        let h = harness();
        h.manager.open();
        assert!(!h.manager.send_message("").await);
        assert!(!h.manager.send_message("   \t ").await);
        assert_eq!(h.manager.snapshot().transcript.len(), 3);
        assert_eq!(h.responder.calls(), 0);
    }

    #[tokio::test]
    async fn test_send_clears_pending_input() {
        let h = harness();
        h.manager.open();
        assert!(h.manager.set_pending_input("main menu"));
        assert_eq!(h.manager.snapshot().pending_input, "main menu");
        h.manager.send_message("main menu").await;
        assert!(h.manager.snapshot().pending_input.is_empty());
    }

    #[tokio::test]
    async fn test_send_while_loading_is_noop() {
        let gate = Arc::new(Notify::new());
        let h = harness_with(
            FakeProfiles::missing(),
            FakeResponder::gated(gate.clone(), "slow answer"),
        );
        h.manager.open();

        let manager = h.manager.clone();
        let first = tokio::spawn(async move { manager.send_message("first question").await });
        while !h.manager.snapshot().is_loading {
            tokio::task::yield_now().await;
        }

        assert!(!h.manager.send_message("second question").await);
        assert!(!h.manager.click_option("Report an issue").await);
        assert_eq!(h.manager.snapshot().transcript.len(), 4);

        gate.notify_one();
        assert!(first.await.unwrap());

        let snap = h.manager.snapshot();
        assert_eq!(snap.transcript.len(), 5);
        assert_eq!(snap.transcript[4].text, "slow answer");
        assert_eq!(h.responder.calls(), 1);
        assert!(!snap.is_loading);
    }

    #[tokio::test]
    async fn test_reply_lands_after_close() {
        let gate = Arc::new(Notify::new());
        let h = harness_with(
            FakeProfiles::missing(),
            FakeResponder::gated(gate.clone(), "late answer"),
        );
        h.manager.open();

        let manager = h.manager.clone();
        let pending = tokio::spawn(async move { manager.send_message("question").await });
        while !h.manager.snapshot().is_loading {
            tokio::task::yield_now().await;
        }

        assert!(h.manager.close());
        gate.notify_one();
        pending.await.unwrap();

        let snap = h.manager.snapshot();
        assert_eq!(snap.visibility, Visibility::Closed);
        assert_eq!(snap.transcript.last().unwrap().text, "late answer");
    }

    #[tokio::test]
    async fn test_reply_from_before_reset_is_dropped() {
        let gate = Arc::new(Notify::new());
        let h = harness_with(
            FakeProfiles::missing(),
            FakeResponder::gated(gate.clone(), "stale answer"),
        );
        h.manager.open();

        let manager = h.manager.clone();
        let pending = tokio::spawn(async move { manager.send_message("question").await });
        while !h.manager.snapshot().is_loading {
            tokio::task::yield_now().await;
        }

        assert!(h.manager.end_chat());
        assert!(h.manager.close());
        assert!(h.manager.open());
        assert!(!h.manager.snapshot().is_loading);

        gate.notify_one();
        assert!(pending.await.unwrap());

        let snap = h.manager.snapshot();
        assert_eq!(bot_texts(&snap), replies::WELCOME.to_vec());
        assert_eq!(snap.transcript.len(), replies::WELCOME.len());
        assert!(!snap.is_loading);

        gate.notify_one();
        assert!(h.manager.send_message("new question").await);
        let last = h.manager.snapshot().transcript.last().cloned().unwrap();
        assert_eq!(last.text, "stale answer");
        assert_eq!(h.manager.snapshot().transcript.len(), replies::WELCOME.len() + 2);
    }

    #[tokio::test]
    async fn test_reply_lands_when_caller_drops_future() {
        let gate = Arc::new(Notify::new());
        let h = harness_with(
            FakeProfiles::missing(),
            FakeResponder::gated(gate.clone(), "kept answer"),
        );
        h.manager.open();

        let manager = h.manager.clone();
        let pending = tokio::spawn(async move { manager.send_message("question").await });
        while !h.manager.snapshot().is_loading {
            tokio::task::yield_now().await;
        }
        pending.abort();
        let _ = pending.await;

        gate.notify_one();
        while h.manager.snapshot().is_loading {
            tokio::task::yield_now().await;
        }
        assert_eq!(h.manager.snapshot().transcript.last().unwrap().text, "kept answer");
    }

    #[tokio::test]
    async fn test_panicking_responder_yields_trouble_reply() {
        let h = harness_with(FakeProfiles::missing(), FakeResponder::panicking());
        h.manager.open();
        assert!(h.manager.send_message("anything at all").await);

        let snap = h.manager.snapshot();
        let last = snap.transcript.last().unwrap();
        assert_eq!(last.text, replies::PROCESSING_TROUBLE);
        assert_eq!(last.options, replies::help().options);
        assert!(!snap.is_loading);
        assert_eq!(snap.transcript.len(), 5);
    }

    #[tokio::test]
    async fn test_failing_responder_yields_not_sure_reply() {
        let h = harness_with(FakeProfiles::missing(), FakeResponder::failing());
        h.manager.open();
        h.manager.send_message("tell me a joke").await;
        let last = h.manager.snapshot().transcript.last().cloned().unwrap();
        assert_eq!(last.text, replies::NOT_SURE);
        assert_eq!(last.options, vec!["Report an issue", "Contact support team"]);
    }

    // ---- Identity-dependent rules ----

    #[tokio::test]
    async fn test_status_without_identity_prompts_login() {
        let h = harness();
        h.manager.open();
        h.manager.send_message("check my status").await;
        let last = h.manager.snapshot().transcript.last().cloned().unwrap();
        assert_eq!(last.text, replies::LOGIN_REQUIRED);
        assert_eq!(h.profiles.calls(), 0);
        assert_eq!(h.responder.calls(), 0);
    }

    #[tokio::test]
    async fn test_status_with_identity_reports_verified() {
        let h = harness();
        h.identity.sign_in(Identity::new("uid-9"));
        h.manager.open();
        h.manager.send_message("status").await;
        let last = h.manager.snapshot().transcript.last().cloned().unwrap();
        assert_eq!(last.text, replies::VERIFIED);
        assert_eq!(h.profiles.calls(), 1);
    }

    #[tokio::test]
    async fn test_credit_spend_lookup_failure_is_canned() {
        let h = harness_with(FakeProfiles::failing(), FakeResponder::replying("x"));
        h.identity.sign_in(Identity::new("uid-9"));
        h.manager.open();
        assert!(h.manager.send_message("credit spend").await);
        let last = h.manager.snapshot().transcript.last().cloned().unwrap();
        assert_eq!(last.text, replies::UNABLE_TO_CHECK);
        assert!(last.options.is_empty());
    }

    // ---- Quick actions ----

    #[tokio::test]
    async fn test_quick_action_account_status_routes() {
        let h = harness();
        h.identity.sign_in(Identity::new("uid-1"));
        h.manager.open();
        assert!(h.manager.click_quick_action("account-status").await);

        let snap = h.manager.snapshot();
        assert_eq!(snap.transcript[3].sender, Sender::User);
        assert_eq!(snap.transcript[3].text, "Account Status");
        assert_eq!(snap.transcript[4].text, replies::VERIFIED);
    }

    #[tokio::test]
    async fn test_quick_action_help_answers_directly() {
        let h = harness();
        h.manager.open();
        assert!(h.manager.click_quick_action("help-support").await);

        let snap = h.manager.snapshot();
        assert_eq!(snap.transcript[3].text, "Help & Support");
        assert_eq!(snap.transcript[4].text, replies::HELP_GREETING);
        assert_eq!(snap.transcript[4].options, replies::help().options);
        assert!(!snap.is_loading);
        assert_eq!(h.responder.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_quick_action_is_noop() {
        let h = harness();
        h.manager.open();
        assert!(!h.manager.click_quick_action("refunds").await);
        assert_eq!(h.manager.snapshot().transcript.len(), 3);
    }

    #[tokio::test]
    async fn test_click_option_routes_like_typed_input() {
        let h = harness();
        h.manager.open();
        assert!(h.manager.click_option("Contact support team").await);
        let last = h.manager.snapshot().transcript.last().cloned().unwrap();
        assert!(last.text.contains("support@example.com"));
    }

    #[test]
    fn test_quick_actions_exposed() {
        let h = harness();
        let labels: Vec<&str> = h
            .manager
            .quick_actions()
            .iter()
            .map(|a| a.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Account Status", "Credit Spend", "Help & Support"]);
    }

    // ---- Ending ----

    #[tokio::test]
    async fn test_end_chat_blocks_input_until_reset() {
        let h = harness();
        h.manager.open();
        assert!(h.manager.end_chat());
        assert!(!h.manager.end_chat());

        assert!(!h.manager.send_message("hello?").await);
        assert!(!h.manager.click_quick_action("help-support").await);
        assert!(!h.manager.set_pending_input("typing"));
        let snap = h.manager.snapshot();
        assert!(snap.ended);
        assert_eq!(bot_texts(&snap).iter().filter(|t| *t == replies::FAREWELL).count(), 1);

        h.manager.close();
        h.manager.open();
        let snap = h.manager.snapshot();
        assert!(!snap.ended);
        assert_eq!(bot_texts(&snap), replies::WELCOME.to_vec());
        assert!(h.manager.send_message("hello again").await);
    }

    #[tokio::test]
    async fn test_is_active_only_while_open_and_not_ended() {
        let h = harness();
        assert!(!h.manager.is_active());
        h.manager.open();
        assert!(h.manager.is_active());
        h.manager.minimize();
        assert!(!h.manager.is_active());
        h.manager.restore();
        h.manager.end_chat();
        assert!(!h.manager.is_active());
    }

    // ---- Watchdog ----

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_ends_once() {
        let h = harness();
        h.manager.open();

        advance_secs(299).await;
        assert!(!h.manager.snapshot().ended);

        advance_secs(1).await;
        let snap = h.manager.snapshot();
        assert!(snap.ended);
        assert_eq!(snap.transcript.last().unwrap().text, replies::FAREWELL);

        advance_secs(3600).await;
        let snap = h.manager.snapshot();
        assert_eq!(bot_texts(&snap).iter().filter(|t| *t == replies::FAREWELL).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_resets_idle_window() {
        let h = harness();
        h.manager.open();

        advance_secs(200).await;
        h.manager.send_message("still here").await;
        advance_secs(200).await;
        assert!(!h.manager.snapshot().ended);

        advance_secs(100).await;
        assert!(h.manager.snapshot().ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_minimized_session_does_not_time_out() {
        let h = harness();
        h.manager.open();
        h.manager.minimize();
        advance_secs(1000).await;
        assert!(!h.manager.snapshot().ended);

        h.manager.restore();
        advance_secs(300).await;
        assert!(h.manager.snapshot().ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_session_does_not_time_out() {
        let h = harness();
        h.manager.open();
        h.manager.close();
        advance_secs(1000).await;
        assert!(!h.manager.snapshot().ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_watchdog() {
        let h = harness();
        h.manager.open();
        h.manager.shutdown();
        advance_secs(1000).await;
        assert!(!h.manager.snapshot().ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_end_then_timeout_adds_no_second_farewell() {
        let h = harness();
        h.manager.open();
        h.manager.end_chat();
        advance_secs(1000).await;
        let snap = h.manager.snapshot();
        assert_eq!(bot_texts(&snap).iter().filter(|t| *t == replies::FAREWELL).count(), 1);
    }

    // ---- Email handoff ----

    #[test]
    fn test_compose_support_email_returns_link() {
        let h = harness();
        let url = h.manager.compose_support_email().unwrap();
        assert!(url.starts_with("mailto:support@example.com?subject=Support%20Request"));
        assert_eq!(h.email.drafts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_compose_support_email_failure_is_absorbed() {
        let profiles = Arc::new(FakeProfiles::missing());
        let services = SessionServices {
            profiles,
            responder: Arc::new(FakeResponder::replying("x")),
            identity: Arc::new(SharedIdentity::new()),
            email: Arc::new(RecordingHandoff {
                fail: true,
                ..RecordingHandoff::default()
            }),
        };
        let manager = SessionManager::new(&ConciergeConfig::default(), services);
        assert!(manager.compose_support_email().is_none());
    }

    // ---- Ordering ----

    #[tokio::test]
    async fn test_transcript_order_matches_append_order() {
        let h = harness();
        h.manager.open();
        for i in 0..5 {
            h.manager.send_message(&format!("question {}", i)).await;
        }
        let snap = h.manager.snapshot();
        let tail = &snap.transcript[3..];
        assert_eq!(tail.len(), 10);
        for (i, pair) in tail.chunks(2).enumerate() {
            assert_eq!(pair[0].sender, Sender::User);
            assert_eq!(pair[0].text, format!("question {}", i));
            assert_eq!(pair[1].sender, Sender::Bot);
        }
    }
}
