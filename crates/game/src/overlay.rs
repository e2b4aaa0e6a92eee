//! UI overlay collaborator.
//!
//! The session pushes display state through this trait. Every method defaults to
//! a no-op so a host only implements the parts of the overlay it actually has.

use crate::narrative::Outcome;

pub trait Overlay {
    /// `None` hides the subtitle line.
    fn set_subtitle(&mut self, _text: Option<&str>) {}
    /// `None` hides the narration timer.
    fn set_narration_timer(&mut self, _text: Option<&str>) {}
    /// Show the result screen with its heading; the message follows via
    /// `set_result_message` as it is typed.
    fn show_result(&mut self, _outcome: Outcome, _heading: &str) {}
    fn set_result_message(&mut self, _text: &str, _typing: bool) {}
    fn set_restart_visible(&mut self, _visible: bool) {}
    /// Loading progress in percent.
    fn set_loading_progress(&mut self, _percent: u8) {}
    fn hide_loading(&mut self) {}
    fn show_audio_unlock(&mut self, _visible: bool) {}
}
