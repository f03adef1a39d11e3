//! Screen-ready view records produced by the normalizer.

mod favorite;
mod fixture;
mod head_to_head;
mod ids;
mod league;
mod player;
mod prediction;
mod standing;
mod transfer;

pub use favorite::*;
pub use fixture::*;
pub use head_to_head::*;
pub use ids::*;
pub use league::*;
pub use player::*;
pub use prediction::*;
pub use standing::*;
pub use transfer::*;
