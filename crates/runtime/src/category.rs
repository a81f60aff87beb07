use futures_util::stream::{self, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use ting_shell_core::{nav, Category};
use ting_shell_engine::{CategoryEvent, CategorySynchronizer, ResolvedCategoryState};
use ting_shell_gateways::{CategoryGateway, Navigator};

/// Subscribes to the catalog and selection streams and publishes resolved
/// category state for the lifetime of the returned task. Subscriptions are
/// taken before the task is spawned so no emission published after this call
/// returns can be missed.
pub fn spawn_category_driver(
    gateway: &dyn CategoryGateway,
) -> (watch::Receiver<ResolvedCategoryState>, JoinHandle<()>) {
    let catalog = gateway.categories().map(CategoryEvent::Catalog);
    let selection = gateway.selection().map(CategoryEvent::Selection);

    let (tx, rx) = watch::channel(ResolvedCategoryState::default());
    let handle = tokio::spawn(async move {
        let mut events = stream::select(catalog, selection);
        let mut synchronizer = CategorySynchronizer::new();
        while let Some(event) = events.next().await {
            if tx.send(synchronizer.apply(event)).is_err() {
                break;
            }
        }
        debug!("category streams ended");
    });

    (rx, handle)
}

/// Issues the navigation for an explicitly chosen category. A pure command:
/// no return value, no retry.
pub fn select_category(navigator: &dyn Navigator, prefix: &str, category: &Category) {
    navigator.navigate_to(&nav::album_path(prefix, &category.pinyin));
}
