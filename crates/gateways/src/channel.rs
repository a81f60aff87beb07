use futures_util::stream::{BoxStream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

use crate::{CategoryGateway, PlaybackGateway};
use ting_shell_core::{AlbumInfo, Category, CategorySelection, Track};

fn fanout<T: Clone + Send + 'static>(tx: &broadcast::Sender<T>) -> BoxStream<'static, T> {
    BroadcastStream::new(tx.subscribe())
        .filter_map(|item| async move {
            match item {
                Ok(value) => Some(value),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    // A slow subscriber loses intermediate emissions, never
                    // the subscription itself.
                    warn!(skipped, "gateway subscriber lagged");
                    None
                }
            }
        })
        .boxed()
}

/// In-process category gateway fed by whatever owns the catalog and the
/// route; each subscriber gets an independent fanout of every emission.
pub struct ChannelCategoryGateway {
    categories: broadcast::Sender<Vec<Category>>,
    selection: broadcast::Sender<CategorySelection>,
}

impl ChannelCategoryGateway {
    pub fn new(buffer: usize) -> Self {
        let (categories, _) = broadcast::channel(buffer);
        let (selection, _) = broadcast::channel(buffer);
        Self {
            categories,
            selection,
        }
    }

    pub fn publish_categories(&self, categories: Vec<Category>) {
        let _ = self.categories.send(categories);
    }

    pub fn publish_selection(&self, selection: CategorySelection) {
        let _ = self.selection.send(selection);
    }
}

impl CategoryGateway for ChannelCategoryGateway {
    fn categories(&self) -> BoxStream<'static, Vec<Category>> {
        fanout(&self.categories)
    }

    fn selection(&self) -> BoxStream<'static, CategorySelection> {
        fanout(&self.selection)
    }
}

pub struct ChannelPlaybackGateway {
    track_list: broadcast::Sender<Vec<Track>>,
    current_index: broadcast::Sender<usize>,
    current_track: broadcast::Sender<Option<Track>>,
    album: broadcast::Sender<Option<AlbumInfo>>,
    playing: broadcast::Sender<bool>,
}

impl ChannelPlaybackGateway {
    pub fn new(buffer: usize) -> Self {
        let (track_list, _) = broadcast::channel(buffer);
        let (current_index, _) = broadcast::channel(buffer);
        let (current_track, _) = broadcast::channel(buffer);
        let (album, _) = broadcast::channel(buffer);
        let (playing, _) = broadcast::channel(buffer);
        Self {
            track_list,
            current_index,
            current_track,
            album,
            playing,
        }
    }

    pub fn publish_track_list(&self, tracks: Vec<Track>) {
        let _ = self.track_list.send(tracks);
    }

    pub fn publish_current_index(&self, index: usize) {
        let _ = self.current_index.send(index);
    }

    pub fn publish_current_track(&self, track: Option<Track>) {
        let _ = self.current_track.send(track);
    }

    pub fn publish_album(&self, album: Option<AlbumInfo>) {
        let _ = self.album.send(album);
    }

    pub fn publish_playing(&self, playing: bool) {
        let _ = self.playing.send(playing);
    }
}

impl PlaybackGateway for ChannelPlaybackGateway {
    fn track_list(&self) -> BoxStream<'static, Vec<Track>> {
        fanout(&self.track_list)
    }

    fn current_index(&self) -> BoxStream<'static, usize> {
        fanout(&self.current_index)
    }

    fn current_track(&self) -> BoxStream<'static, Option<Track>> {
        fanout(&self.current_track)
    }

    fn album(&self) -> BoxStream<'static, Option<AlbumInfo>> {
        fanout(&self.album)
    }

    fn playing(&self) -> BoxStream<'static, bool> {
        fanout(&self.playing)
    }

    fn clear(&self) {
        let _ = self.track_list.send(Vec::new());
        let _ = self.current_index.send(0);
        let _ = self.current_track.send(None);
        let _ = self.album.send(None);
        let _ = self.playing.send(false);
    }
}
