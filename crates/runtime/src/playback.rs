use futures_util::stream::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use ting_shell_engine::{combine_latest, PlaybackAggregator, PlaybackFacet, PlayerView};
use ting_shell_gateways::PlaybackGateway;

#[derive(Debug)]
pub(crate) enum PlaybackCommand {
    ResetVisibility,
}

/// Joins the five playback facet streams through the combine-latest primitive
/// and publishes the resulting player view. The command channel carries the
/// visibility reset issued by `clear_playback_ui`.
pub(crate) fn spawn_playback_driver(
    gateway: &dyn PlaybackGateway,
) -> (
    watch::Receiver<PlayerView>,
    mpsc::UnboundedSender<PlaybackCommand>,
    JoinHandle<()>,
) {
    let facets = vec![
        gateway.track_list().map(PlaybackFacet::TrackList).boxed(),
        gateway
            .current_index()
            .map(PlaybackFacet::CurrentIndex)
            .boxed(),
        gateway
            .current_track()
            .map(PlaybackFacet::CurrentTrack)
            .boxed(),
        gateway.album().map(PlaybackFacet::Album).boxed(),
        gateway.playing().map(PlaybackFacet::Playing).boxed(),
    ];

    let (view_tx, view_rx) = watch::channel(PlayerView::default());
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let mut combined = combine_latest(facets);
        let mut aggregator = PlaybackAggregator::new();
        loop {
            tokio::select! {
                row = combined.next() => match row {
                    Some(facets) => {
                        aggregator.apply(facets);
                        if view_tx.send(aggregator.view()).is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                cmd = cmd_rx.recv() => match cmd {
                    Some(PlaybackCommand::ResetVisibility) => {
                        aggregator.reset_visibility();
                        if view_tx.send(aggregator.view()).is_err() {
                            break;
                        }
                    }
                    // Command sender gone means the owning shell is gone.
                    None => break,
                },
            }
        }
        debug!("playback streams ended");
    });

    (view_rx, cmd_tx, handle)
}
