pub mod favorites;
pub mod fixtures;
pub mod leagues;
pub mod meta;
pub mod players;
