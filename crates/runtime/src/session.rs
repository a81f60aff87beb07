use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use ting_shell_core::{keys, SessionState, UserProfile};
use ting_shell_gateways::{GatewayError, Notifier, PersistentKeyStore, SessionGateway};

/// Injectable container for the process-wide session. Reads go through
/// `current`/`subscribe`; the only mutators are bootstrap success and
/// teardown. The epoch decides the bootstrap/logout race: teardown bumps it,
/// and a bootstrap response that started under an older epoch is discarded.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<SessionState>>,
    epoch: Arc<AtomicU64>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::default());
        Self {
            tx: Arc::new(tx),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    fn set_session(&self, user: UserProfile, token: String) {
        let _ = self.tx.send(SessionState {
            user: Some(user),
            token: Some(token),
        });
    }

    fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx.send(SessionState::default());
    }
}

/// One-shot session restore at startup. Absent remember marker means a fresh
/// client and no gateway call. Any restore failure self-heals: both persisted
/// markers are removed and the process continues logged out — the failure is
/// logged, never surfaced.
pub async fn bootstrap(
    store: &SessionStore,
    keystore: &dyn PersistentKeyStore,
    gateway: &dyn SessionGateway,
) {
    if keystore.get(keys::REMEMBER).is_none() {
        return;
    }

    let epoch = store.epoch();
    match gateway.fetch_profile().await {
        Ok(profile) => {
            if store.epoch() != epoch {
                info!("session restore superseded by logout; discarding profile");
                return;
            }
            keystore.set(keys::AUTH_TOKEN, &profile.token);
            info!(user = %profile.user.nickname, "session restored");
            store.set_session(profile.user, profile.token);
        }
        Err(err) => {
            warn!(error = %err, "session restore failed; clearing persisted markers");
            keystore.remove(keys::REMEMBER);
            keystore.remove(keys::AUTH_TOKEN);
        }
    }
}

/// Explicit logout. A gateway failure is returned to the caller with no state
/// change; on success the in-memory session and both persisted markers are
/// cleared together and the user is notified.
pub async fn logout(
    store: &SessionStore,
    keystore: &dyn PersistentKeyStore,
    gateway: &dyn SessionGateway,
    notifier: &dyn Notifier,
) -> Result<(), GatewayError> {
    gateway.logout().await?;
    store.clear();
    keystore.remove(keys::REMEMBER);
    keystore.remove(keys::AUTH_TOKEN);
    notifier.success("logged out");
    Ok(())
}
