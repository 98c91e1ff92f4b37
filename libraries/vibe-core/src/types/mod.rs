mod episode;
mod ids;
mod media;
mod play_state;
mod timestamp;
mod track;

pub use episode::Episode;
pub use ids::ItemId;
pub use media::{MediaItem, MediaKind};
pub use play_state::{EpisodeProgress, PlayStats};
pub use timestamp::parse_timestamp;
pub use track::Track;
pub(crate) use timestamp::null_as_default;
