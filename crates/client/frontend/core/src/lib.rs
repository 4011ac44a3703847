//! Cross-frontend primitives for presenting the arena.
//!
//! Houses the message log, the view consumer that turns controller snapshots
//! into log entries, and view-model types that both the CLI and future
//! graphical clients can reuse.
pub mod config;
pub mod event;
pub mod frontend;
pub mod message;
pub mod view_model;

pub use config::{FrontendConfig, MessageConfig, NoticeVisibility};
pub use event::{BattleNarrator, ViewConsumer, ViewImpact};
pub use frontend::Frontend;
pub use view_model::{ActorCard, ArenaViewModel, PresentationMapper};
