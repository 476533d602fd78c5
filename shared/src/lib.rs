pub mod appearance;
pub mod controller;
pub mod feed;
pub mod jobs;
pub mod rankings;
pub mod view;

pub use appearance::{AvatarRenderer, AvatarState, CharacterApiRenderer, CharacterAppearance};
pub use controller::{RankingQueryController, TRANSITION_DEBOUNCE, Transition, TransitionTicket};
pub use feed::{FetchError, LoadStatus, RankingsFeed, RankingsSource};
pub use jobs::JobCategory;
pub use rankings::*;
