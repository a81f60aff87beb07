use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use ting_shell_core::{Category, SessionState};
use ting_shell_engine::{PlayerView, ResolvedCategoryState};
use ting_shell_gateways::{
    CategoryGateway, GatewayError, Navigator, Notifier, PersistentKeyStore, PlaybackGateway,
    SessionGateway,
};

mod category;
mod playback;
mod session;

pub use category::{select_category, spawn_category_driver};
pub use session::{bootstrap, logout, SessionStore};

use playback::PlaybackCommand;

/// Collaborators the shell orchestrates. All are externally owned; the shell
/// only subscribes and issues commands.
pub struct ShellGateways {
    pub keystore: Arc<dyn PersistentKeyStore>,
    pub session: Arc<dyn SessionGateway>,
    pub category: Arc<dyn CategoryGateway>,
    pub playback: Arc<dyn PlaybackGateway>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

/// The orchestration layer itself: owns the session store and the two
/// continuous drivers, exposes their state for reading, and carries the
/// user-facing commands. Dropping the shell releases every gateway
/// subscription; no further state is produced after that.
pub struct Shell {
    session: SessionStore,
    category_rx: watch::Receiver<ResolvedCategoryState>,
    player_rx: watch::Receiver<PlayerView>,
    playback_cmds: mpsc::UnboundedSender<PlaybackCommand>,
    gateways: ShellGateways,
    album_path_prefix: String,
    tasks: Vec<JoinHandle<()>>,
}

impl Shell {
    pub fn new(gateways: ShellGateways, album_path_prefix: impl Into<String>) -> Self {
        let (category_rx, category_task) = spawn_category_driver(gateways.category.as_ref());
        let (player_rx, playback_cmds, playback_task) =
            playback::spawn_playback_driver(gateways.playback.as_ref());

        Self {
            session: SessionStore::new(),
            category_rx,
            player_rx,
            playback_cmds,
            gateways,
            album_path_prefix: album_path_prefix.into(),
            tasks: vec![category_task, playback_task],
        }
    }

    /// One-shot startup restore; see `session::bootstrap`.
    pub async fn bootstrap(&self) {
        bootstrap(
            &self.session,
            self.gateways.keystore.as_ref(),
            self.gateways.session.as_ref(),
        )
        .await;
    }

    pub async fn logout(&self) -> Result<(), GatewayError> {
        logout(
            &self.session,
            self.gateways.keystore.as_ref(),
            self.gateways.session.as_ref(),
            self.gateways.notifier.as_ref(),
        )
        .await
    }

    /// Dismisses the player: tells the gateway to drop its queue and resets
    /// the visibility latch.
    pub fn clear_playback_ui(&self) {
        self.gateways.playback.clear();
        if self
            .playback_cmds
            .send(PlaybackCommand::ResetVisibility)
            .is_err()
        {
            warn!("playback driver already stopped");
        }
    }

    pub fn select_category(&self, category: &Category) {
        select_category(
            self.gateways.navigator.as_ref(),
            &self.album_path_prefix,
            category,
        );
    }

    pub fn session(&self) -> SessionState {
        self.session.current()
    }

    pub fn watch_session(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }

    pub fn category_state(&self) -> ResolvedCategoryState {
        self.category_rx.borrow().clone()
    }

    pub fn watch_categories(&self) -> watch::Receiver<ResolvedCategoryState> {
        self.category_rx.clone()
    }

    pub fn player_view(&self) -> PlayerView {
        self.player_rx.borrow().clone()
    }

    pub fn watch_player(&self) -> watch::Receiver<PlayerView> {
        self.player_rx.clone()
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Shell, ShellGateways};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use ting_shell_core::{Category, CategorySelection, Track};
    use ting_shell_gateways::{
        ChannelCategoryGateway, ChannelPlaybackGateway, LogNotifier, MemoryKeyStore, Navigator,
        NullSessionGateway,
    };

    #[derive(Default)]
    struct RecordingNavigator {
        paths: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate_to(&self, path: &str) {
            self.paths.lock().unwrap().push(path.to_string());
        }
    }

    struct Fixture {
        shell: Shell,
        category: Arc<ChannelCategoryGateway>,
        playback: Arc<ChannelPlaybackGateway>,
        navigator: Arc<RecordingNavigator>,
    }

    fn fixture() -> Fixture {
        let category = Arc::new(ChannelCategoryGateway::new(16));
        let playback = Arc::new(ChannelPlaybackGateway::new(16));
        let navigator = Arc::new(RecordingNavigator::default());
        let shell = Shell::new(
            ShellGateways {
                keystore: Arc::new(MemoryKeyStore::new()),
                session: Arc::new(NullSessionGateway),
                category: category.clone(),
                playback: playback.clone(),
                navigator: navigator.clone(),
                notifier: Arc::new(LogNotifier),
            },
            "/albums/",
        );
        Fixture {
            shell,
            category,
            playback,
            navigator,
        }
    }

    fn track(id: u64) -> Track {
        Track {
            id,
            name: format!("track-{id}"),
            album_id: 1,
            duration_ms: None,
            play_url: None,
        }
    }

    fn publish_full_playback(playback: &ChannelPlaybackGateway, tracks: Vec<Track>) {
        let first = tracks.first().cloned();
        playback.publish_track_list(tracks);
        playback.publish_current_index(0);
        playback.publish_current_track(first);
        playback.publish_album(None);
        playback.publish_playing(true);
    }

    async fn wait<T: Clone, F: FnMut(&T) -> bool>(
        rx: &mut tokio::sync::watch::Receiver<T>,
        predicate: F,
    ) -> T {
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
            .await
            .expect("timed out waiting for state")
            .expect("driver stopped")
            .clone()
    }

    #[tokio::test]
    async fn category_state_flows_to_watchers() {
        let fx = fixture();
        let mut rx = fx.shell.watch_categories();

        fx.category.publish_selection(CategorySelection {
            pinyin: "talk".to_string(),
            sub_categories: vec!["news".to_string()],
        });
        let pending = wait(&mut rx, |s| s.sub_categories == ["news"]).await;
        assert_eq!(pending.current_category, None);

        fx.category.publish_categories(vec![
            Category {
                id: 1,
                pinyin: "music".to_string(),
                display_name: "Music".to_string(),
            },
            Category {
                id: 2,
                pinyin: "talk".to_string(),
                display_name: "Talk".to_string(),
            },
        ]);
        let resolved = wait(&mut rx, |s| s.current_category.is_some()).await;
        assert_eq!(
            resolved.current_category.map(|c| c.pinyin),
            Some("talk".to_string())
        );
    }

    #[tokio::test]
    async fn player_view_appears_after_all_facets_and_latches() {
        let fx = fixture();
        let mut rx = fx.shell.watch_player();

        publish_full_playback(&fx.playback, vec![track(1)]);
        let view = wait(&mut rx, |v| v.snapshot.is_some()).await;
        assert!(view.visible);
        assert_eq!(view.snapshot.unwrap().track_list.len(), 1);

        // Emptying the queue keeps the player visible.
        fx.playback.publish_track_list(Vec::new());
        let emptied = wait(&mut rx, |v| {
            v.snapshot
                .as_ref()
                .is_some_and(|s| s.track_list.is_empty())
        })
        .await;
        assert!(emptied.visible);
    }

    #[tokio::test]
    async fn clear_playback_ui_hides_the_player() {
        let fx = fixture();
        let mut rx = fx.shell.watch_player();

        publish_full_playback(&fx.playback, vec![track(1)]);
        wait(&mut rx, |v| v.visible).await;

        fx.shell.clear_playback_ui();
        let cleared = wait(&mut rx, |v| !v.visible).await;
        assert!(!cleared.visible);
    }

    #[tokio::test]
    async fn select_category_issues_navigation() {
        let fx = fixture();
        fx.shell.select_category(&Category {
            id: 2,
            pinyin: "talk".to_string(),
            display_name: "Talk".to_string(),
        });
        assert_eq!(
            fx.navigator.paths.lock().unwrap().as_slice(),
            ["/albums/talk"]
        );
    }
}
