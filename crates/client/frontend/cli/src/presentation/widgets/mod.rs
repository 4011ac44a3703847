//! Widgets composing the arena screen.
pub mod actor_card;
pub mod footer;
pub mod header;
pub mod messages;
pub mod status;
