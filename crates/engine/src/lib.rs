pub mod category;
pub mod combine;
pub mod playback;

pub use category::{CategoryEvent, CategorySynchronizer, ResolvedCategoryState};
pub use combine::combine_latest;
pub use playback::{PlaybackAggregator, PlaybackFacet, PlaybackSnapshot, PlayerView};
