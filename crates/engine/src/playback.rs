use serde::{Deserialize, Serialize};
use ting_shell_core::{AlbumInfo, Track};

#[derive(Debug, Clone)]
pub enum PlaybackFacet {
    TrackList(Vec<Track>),
    CurrentIndex(usize),
    CurrentTrack(Option<Track>),
    Album(Option<AlbumInfo>),
    Playing(bool),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub track_list: Vec<Track>,
    pub current_index: usize,
    pub current_track: Option<Track>,
    pub album: Option<AlbumInfo>,
    pub playing: bool,
}

/// What the player surface renders: the latest snapshot, if one exists yet,
/// and whether the player is shown at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PlayerView {
    pub snapshot: Option<PlaybackSnapshot>,
    pub visible: bool,
}

/// Joins the five playback facets into one snapshot. No snapshot exists
/// until every facet has emitted at least once; after that each facet value
/// is stale-until-overwritten. Visibility is a one-way latch: a non-empty
/// track list turns it on, and only an explicit reset turns it off — an
/// empty list arriving later does not hide the player.
#[derive(Debug, Default)]
pub struct PlaybackAggregator {
    track_list: Option<Vec<Track>>,
    current_index: Option<usize>,
    current_track: Option<Option<Track>>,
    album: Option<Option<AlbumInfo>>,
    playing: Option<bool>,
    visible: bool,
}

impl PlaybackAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply<I>(&mut self, facets: I) -> Option<PlaybackSnapshot>
    where
        I: IntoIterator<Item = PlaybackFacet>,
    {
        for facet in facets {
            match facet {
                PlaybackFacet::TrackList(tracks) => self.track_list = Some(tracks),
                PlaybackFacet::CurrentIndex(index) => self.current_index = Some(index),
                PlaybackFacet::CurrentTrack(track) => self.current_track = Some(track),
                PlaybackFacet::Album(album) => self.album = Some(album),
                PlaybackFacet::Playing(playing) => self.playing = Some(playing),
            }
        }
        let snapshot = self.snapshot()?;
        if !snapshot.track_list.is_empty() {
            self.visible = true;
        }
        Some(snapshot)
    }

    pub fn snapshot(&self) -> Option<PlaybackSnapshot> {
        Some(PlaybackSnapshot {
            track_list: self.track_list.clone()?,
            current_index: self.current_index?,
            current_track: self.current_track.clone()?,
            album: self.album.clone()?,
            playing: self.playing?,
        })
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            snapshot: self.snapshot(),
            visible: self.visible,
        }
    }

    /// The only path that hides the player; see `PlaybackAggregator` docs.
    pub fn reset_visibility(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{PlaybackAggregator, PlaybackFacet};
    use ting_shell_core::Track;

    fn track(id: u64) -> Track {
        Track {
            id,
            name: format!("track-{id}"),
            album_id: 7,
            duration_ms: Some(180_000),
            play_url: None,
        }
    }

    #[test]
    fn no_snapshot_until_all_facets_emit() {
        let mut agg = PlaybackAggregator::new();
        assert!(agg.apply([PlaybackFacet::TrackList(vec![])]).is_none());
        assert!(agg.apply([PlaybackFacet::CurrentIndex(0)]).is_none());
        assert!(agg.apply([PlaybackFacet::CurrentTrack(None)]).is_none());
        assert!(agg.apply([PlaybackFacet::Album(None)]).is_none());

        let snapshot = agg.apply([PlaybackFacet::Playing(false)]).unwrap();
        assert!(snapshot.track_list.is_empty());
        assert_eq!(snapshot.current_index, 0);
        assert!(!snapshot.playing);
        assert!(!agg.visible());
    }

    #[test]
    fn later_facets_overwrite_only_their_slot() {
        let mut agg = PlaybackAggregator::new();
        agg.apply([
            PlaybackFacet::TrackList(vec![track(1), track(2)]),
            PlaybackFacet::CurrentIndex(0),
            PlaybackFacet::CurrentTrack(Some(track(1))),
            PlaybackFacet::Album(None),
            PlaybackFacet::Playing(true),
        ]);

        let snapshot = agg.apply([PlaybackFacet::CurrentIndex(1)]).unwrap();
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.track_list.len(), 2);
        assert_eq!(snapshot.current_track, Some(track(1)));
        assert!(snapshot.playing);
    }

    #[test]
    fn visibility_latches_on_non_empty_track_list() {
        let mut agg = PlaybackAggregator::new();
        agg.apply([
            PlaybackFacet::TrackList(vec![track(1)]),
            PlaybackFacet::CurrentIndex(0),
            PlaybackFacet::CurrentTrack(Some(track(1))),
            PlaybackFacet::Album(None),
            PlaybackFacet::Playing(true),
        ]);
        assert!(agg.visible());

        // An emptied queue does not hide the player.
        agg.apply([PlaybackFacet::TrackList(vec![])]);
        assert!(agg.visible());

        agg.reset_visibility();
        assert!(!agg.visible());

        agg.apply([PlaybackFacet::TrackList(vec![track(2)])]);
        assert!(agg.visible());
    }
}
