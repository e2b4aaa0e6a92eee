//! Whiteout: the narrative and animation core of a short snowfield vignette.
//!
//! A penguin walks toward distant mountains while narration plays. The narration
//! clock drives subtitles and, at a fixed moment, a one-shot ending: the title
//! words drop and bounce, the camera looks up, and the character either keeps
//! running (win) or falls and freezes (lose). Rendering, input mapping, and asset
//! decoding belong to the host; it feeds frame deltas into [`Session::update`]
//! and draws [`Session::snapshot`].

pub mod camera;
pub mod config;
pub mod drop_text;
pub mod ending;
pub mod error;
pub mod footprints;
pub mod guidance;
pub mod i18n;
pub mod loading;
pub mod movement;
pub mod narrative;
pub mod overlay;
pub mod prefs;
pub mod scheduler;
pub mod session;
pub mod shake;
pub mod triggers;
pub mod tuning;
pub mod typewriter;
mod update;

pub use config::VignetteConfig;
pub use ending::EndingMode;
pub use error::{Result, VignetteError};
pub use i18n::{Language, LocaleHints};
pub use narrative::{NarrativeState, Outcome};
pub use overlay::Overlay;
pub use session::{FrameSnapshot, MoveKey, Session};
