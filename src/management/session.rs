use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, MutexGuard, watch};

use crate::{
    error::{SessionError, StoreError},
    exchange::TokenExchange,
    info,
    management::{
        entry::{EntryPoint, ExitCause},
        scheduler::{RefreshTask, refresh_delay, restored_refresh_delay},
        store::{
            ACCESS_TOKEN_KEY, CredentialStore, EXPIRES_IN_KEY, OBTAINED_AT_KEY,
            REFRESH_TOKEN_KEY, SESSION_KEYS,
        },
    },
    types::{Session, SessionState},
    utils, warning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A complete session was loaded; its refresh is due after `refresh_in`.
    Restored { refresh_in: Duration },
    /// Nothing usable was persisted.
    Incomplete,
    /// A session is already held or another transition is in progress.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Authenticated,
    /// A token is already held or an exchange is already outstanding.
    Skipped,
}

/// Owns the token pair for the lifetime of the client.
///
/// The manager acquires tokens by exchanging an authorization code, restores
/// them from the credential store at startup, refreshes them one minute
/// before the declared expiry and ends the session on logout or on the first
/// failed exchange or refresh. Consumers read the current access token with
/// [`SessionManager::subscribe`].
///
/// Clones share the same session.
#[derive(Clone)]
pub struct SessionManager {
    shared: Arc<Shared>,
}

struct Shared {
    exchange: Arc<dyn TokenExchange>,
    store: Arc<dyn CredentialStore>,
    entry: Arc<dyn EntryPoint>,
    cell: Mutex<SessionCell>,
    token_tx: watch::Sender<Option<String>>,
    state_tx: watch::Sender<SessionState>,
}

struct SessionCell {
    state: SessionState,
    session: Session,
    // bumped whenever a session is installed or ended
    generation: u64,
    timer: Option<RefreshTask>,
}

impl SessionManager {
    pub fn new(
        exchange: Arc<dyn TokenExchange>,
        store: Arc<dyn CredentialStore>,
        entry: Arc<dyn EntryPoint>,
    ) -> Self {
        let (token_tx, _) = watch::channel(None);
        let (state_tx, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            shared: Arc::new(Shared {
                exchange,
                store,
                entry,
                cell: Mutex::new(SessionCell {
                    state: SessionState::Unauthenticated,
                    session: Session::default(),
                    generation: 0,
                    timer: None,
                }),
                token_tx,
                state_tx,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.shared.state_tx.borrow()
    }

    pub fn access_token(&self) -> Option<String> {
        self.shared.token_tx.borrow().clone()
    }

    /// Current access token, `None` until authenticated and again once the
    /// session ends.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.shared.token_tx.subscribe()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.shared.state_tx.subscribe()
    }

    pub async fn session(&self) -> Session {
        self.shared.cell.lock().await.session.clone()
    }

    /// Time until the pending refresh fires, if one is armed.
    pub async fn refresh_due_in(&self) -> Option<Duration> {
        self.shared
            .cell
            .lock()
            .await
            .timer
            .as_ref()
            .map(RefreshTask::remaining)
    }

    /// Seeds the session from the credential store without any network call.
    ///
    /// Only acts while unauthenticated. When the persisted issue time shows
    /// the token is already past its refresh point, the refresh is armed with
    /// no delay.
    pub async fn restore(&self) -> RestoreOutcome {
        self.shared.restore(true).await
    }

    /// Same as [`SessionManager::restore`] but never arms the refresh, so a
    /// token that is due is reported as due and left alone.
    ///
    /// For commands that only inspect the session.
    pub async fn restore_passive(&self) -> RestoreOutcome {
        self.shared.restore(false).await
    }

    /// Exchanges an authorization code delivered by the redirect.
    ///
    /// A no-op while a token is held or a transition is outstanding, so a
    /// repeated redirect never issues a second exchange.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ExchangeFailed`] when the exchange service
    /// rejects the code or cannot be reached. The session is then `Failed`
    /// and the entry point has been notified.
    pub async fn authorize(&self, code: &str) -> Result<ExchangeOutcome, SessionError> {
        self.shared.authorize(code).await
    }

    /// Ends the session from any state and clears the credential store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if an entry could not be removed.
    /// The in-memory session is cleared regardless.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.shared.logout().await
    }

    /// Cancels the pending refresh without touching the session or storage.
    pub async fn shutdown(&self) {
        let mut cell = self.shared.cell.lock().await;
        if let Some(timer) = cell.timer.take() {
            timer.cancel();
        }
    }
}

impl Shared {
    fn set_state(&self, cell: &mut SessionCell, state: SessionState) {
        cell.state = state;
        self.state_tx.send_replace(state);
    }

    fn arm(self: &Arc<Self>, cell: &mut SessionCell, delay: Duration) {
        let weak = Arc::downgrade(self);
        let generation = cell.generation;
        let task = RefreshTask::spawn(delay, async move {
            if let Some(shared) = weak.upgrade() {
                shared.refresh(generation).await;
            }
        });
        if let Some(previous) = cell.timer.replace(task) {
            previous.cancel();
        }
    }

    async fn restore(self: &Arc<Self>, arm: bool) -> RestoreOutcome {
        let mut cell = self.cell.lock().await;
        if cell.session.has_access_token() || cell.state != SessionState::Unauthenticated {
            return RestoreOutcome::Skipped;
        }
        self.set_state(&mut cell, SessionState::Restoring);

        let session = match self.load_persisted().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                self.set_state(&mut cell, SessionState::Unauthenticated);
                return RestoreOutcome::Incomplete;
            }
            Err(e) => {
                warning!("Cannot read persisted session: {}", e);
                self.set_state(&mut cell, SessionState::Unauthenticated);
                return RestoreOutcome::Incomplete;
            }
        };

        let expires_in = session.expires_in.unwrap_or_default();
        let delay = restored_refresh_delay(expires_in, session.obtained_at, utils::now_timestamp());

        cell.generation += 1;
        let token = session.access_token.clone();
        cell.session = session;
        self.set_state(&mut cell, SessionState::Authenticated);
        self.token_tx.send_replace(token);
        if arm {
            self.arm(&mut cell, delay);
        }

        RestoreOutcome::Restored { refresh_in: delay }
    }

    async fn load_persisted(&self) -> Result<Option<Session>, StoreError> {
        let access_token = self.store.get(ACCESS_TOKEN_KEY).await?;
        let refresh_token = self.store.get(REFRESH_TOKEN_KEY).await?;
        let expires_in = self.store.get(EXPIRES_IN_KEY).await?;
        let obtained_at = self.store.get(OBTAINED_AT_KEY).await?;

        let (Some(access_token), Some(refresh_token), Some(expires_in)) =
            (access_token, refresh_token, expires_in)
        else {
            return Ok(None);
        };
        if access_token.is_empty() || refresh_token.is_empty() {
            return Ok(None);
        }
        let Ok(expires_in) = expires_in.trim().parse::<u64>() else {
            return Ok(None);
        };

        Ok(Some(Session {
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
            expires_in: Some(expires_in),
            obtained_at: obtained_at.and_then(|v| v.trim().parse::<i64>().ok()),
        }))
    }

    async fn persist(&self, session: &Session, include_refresh: bool) -> Result<(), StoreError> {
        if let Some(token) = &session.access_token {
            self.store.set(ACCESS_TOKEN_KEY, token).await?;
        }
        if include_refresh {
            if let Some(token) = &session.refresh_token {
                self.store.set(REFRESH_TOKEN_KEY, token).await?;
            }
        }
        if let Some(expires_in) = session.expires_in {
            self.store
                .set(EXPIRES_IN_KEY, &expires_in.to_string())
                .await?;
        }
        if let Some(obtained_at) = session.obtained_at {
            self.store
                .set(OBTAINED_AT_KEY, &obtained_at.to_string())
                .await?;
        }
        Ok(())
    }

    async fn clear_store(&self) -> Result<(), StoreError> {
        let mut first_error = None;
        for key in SESSION_KEYS {
            if let Err(e) = self.store.remove(key).await {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn authorize(self: &Arc<Self>, code: &str) -> Result<ExchangeOutcome, SessionError> {
        let generation = {
            let mut cell = self.cell.lock().await;
            let busy = matches!(
                cell.state,
                SessionState::Restoring | SessionState::Exchanging | SessionState::Refreshing
            );
            if busy || cell.session.has_access_token() {
                return Ok(ExchangeOutcome::Skipped);
            }
            cell.generation += 1;
            self.set_state(&mut cell, SessionState::Exchanging);
            cell.generation
        };

        let result = self.exchange.login(code).await;

        let mut cell = self.cell.lock().await;
        if cell.generation != generation || cell.state != SessionState::Exchanging {
            // ended while the exchange was in flight
            return Ok(ExchangeOutcome::Skipped);
        }

        let pair = match result {
            Ok(pair) => pair,
            Err(e) => {
                let message = e.to_string();
                self.fail(cell, SessionError::ExchangeFailed(message.clone()))
                    .await;
                return Err(SessionError::ExchangeFailed(message));
            }
        };

        cell.session = Session {
            access_token: Some(pair.access_token.clone()),
            refresh_token: Some(pair.refresh_token),
            expires_in: Some(pair.expires_in),
            obtained_at: Some(utils::now_timestamp()),
        };
        if let Err(e) = self.persist(&cell.session, true).await {
            warning!("Failed to persist session: {}", e);
        }
        self.set_state(&mut cell, SessionState::Authenticated);
        self.token_tx.send_replace(Some(pair.access_token));
        self.arm(&mut cell, refresh_delay(pair.expires_in));

        Ok(ExchangeOutcome::Authenticated)
    }

    async fn refresh(self: Arc<Self>, generation: u64) {
        let refresh_token = {
            let mut cell = self.cell.lock().await;
            if cell.generation != generation || cell.state != SessionState::Authenticated {
                return;
            }
            if let Some(timer) = cell.timer.take() {
                timer.detach();
            }
            let Some(refresh_token) = cell.session.refresh_token.clone() else {
                return;
            };
            self.set_state(&mut cell, SessionState::Refreshing);
            refresh_token
        };

        let result = self.exchange.refresh(&refresh_token).await;

        let mut cell = self.cell.lock().await;
        if cell.generation != generation || cell.state != SessionState::Refreshing {
            return;
        }

        let refreshed = match result {
            Ok(refreshed) => refreshed,
            Err(e) => {
                self.fail(cell, SessionError::RefreshFailed(e.to_string()))
                    .await;
                return;
            }
        };

        let rotated = refreshed.refresh_token.is_some();
        cell.session.access_token = Some(refreshed.access_token.clone());
        cell.session.expires_in = Some(refreshed.expires_in);
        cell.session.obtained_at = Some(utils::now_timestamp());
        if let Some(token) = refreshed.refresh_token {
            cell.session.refresh_token = Some(token);
        }
        if let Err(e) = self.persist(&cell.session, rotated).await {
            warning!("Failed to persist refreshed session: {}", e);
        }

        let delay = refresh_delay(refreshed.expires_in);
        self.set_state(&mut cell, SessionState::Authenticated);
        self.token_tx.send_replace(Some(refreshed.access_token));
        self.arm(&mut cell, delay);
        info!(
            "Access token refreshed, next refresh in {}",
            utils::format_duration(delay)
        );
    }

    /// Terminal failure: clears memory and storage, then redirects.
    async fn fail(&self, mut cell: MutexGuard<'_, SessionCell>, error: SessionError) {
        if let Some(timer) = cell.timer.take() {
            timer.cancel();
        }
        cell.generation += 1;
        cell.session = Session::default();
        if let Err(e) = self.clear_store().await {
            warning!("Failed to clear persisted session: {}", e);
        }
        self.set_state(&mut cell, SessionState::Failed);
        self.token_tx.send_replace(None);
        drop(cell);

        self.entry.redirect(&ExitCause::Failed(error));
    }

    async fn logout(&self) -> Result<(), SessionError> {
        let result = {
            let mut cell = self.cell.lock().await;
            if let Some(timer) = cell.timer.take() {
                timer.cancel();
            }
            cell.generation += 1;
            cell.session = Session::default();
            let result = self.clear_store().await;
            self.set_state(&mut cell, SessionState::Unauthenticated);
            self.token_tx.send_replace(None);
            result
        };

        self.entry.redirect(&ExitCause::Logout);
        result.map_err(SessionError::from)
    }
}
