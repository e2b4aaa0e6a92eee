//! Start/unlock/volume policy on top of the playback contracts.

use crate::levels::{clamp_volume, AudioLevels};
use crate::playback::{Playback, PlaybackStatus, SfxPlayer, SoundCue};

/// Latches tracking which tracks have successfully started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioState {
    pub narration_started: bool,
    pub music_started: bool,
    pub unlocked: bool,
}

/// Owns the optional tracks and cue player.
///
/// Playback rejections are logged and swallowed; the only retry path is user
/// driven (another key press, or the unlock gesture).
pub struct AudioDirector {
    levels: AudioLevels,
    state: AudioState,
    narration: Option<Box<dyn Playback>>,
    music: Option<Box<dyn Playback>>,
    ambient: Option<Box<dyn Playback>>,
    sfx: Option<Box<dyn SfxPlayer>>,
    last_step_time: Option<f32>,
}

impl AudioDirector {
    pub fn new(levels: AudioLevels) -> Self {
        Self {
            levels,
            state: AudioState::default(),
            narration: None,
            music: None,
            ambient: None,
            sfx: None,
            last_step_time: None,
        }
    }

    /// A director with no tracks at all; every call is a no-op.
    pub fn silent() -> Self {
        Self::new(AudioLevels::default())
    }

    pub fn with_narration(mut self, mut track: Box<dyn Playback>) -> Self {
        track.set_volume(clamp_volume(self.levels.narration_volume));
        self.narration = Some(track);
        self
    }

    pub fn with_music(mut self, mut track: Box<dyn Playback>) -> Self {
        track.set_volume(clamp_volume(self.levels.music_volume));
        track.set_looping(true);
        self.music = Some(track);
        self
    }

    pub fn with_ambient(mut self, mut track: Box<dyn Playback>) -> Self {
        track.set_volume(clamp_volume(self.levels.ambient_volume));
        track.set_looping(true);
        self.ambient = Some(track);
        self
    }

    pub fn with_sfx(mut self, sfx: Box<dyn SfxPlayer>) -> Self {
        self.sfx = Some(sfx);
        self
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn levels(&self) -> &AudioLevels {
        &self.levels
    }

    pub fn has_narration(&self) -> bool {
        self.narration.is_some()
    }

    /// Narration clock, or `None` when there is no narration track.
    pub fn narration_status(&self) -> Option<PlaybackStatus> {
        self.narration.as_ref().map(|n| n.status())
    }

    /// Start narration once. Returns true if it is (now) running.
    pub fn start_narration_if_needed(&mut self) -> bool {
        if self.state.narration_started {
            return true;
        }
        let Some(narration) = self.narration.as_mut() else {
            return false;
        };
        match narration.play() {
            Ok(()) => {
                self.state.narration_started = true;
                log::info!("Narration started");
                true
            }
            Err(e) => {
                log::info!("Narration play failed: {e}");
                false
            }
        }
    }

    /// Start the music loop once; rejections are ignored until the next attempt.
    pub fn start_music_if_needed(&mut self) {
        if self.state.music_started {
            return;
        }
        if let Some(music) = self.music.as_mut() {
            match music.play() {
                Ok(()) => self.state.music_started = true,
                Err(e) => log::debug!("Music play blocked: {e}"),
            }
        }
    }

    /// User gesture path: start the ambient loop. On failure the unlock flag is
    /// cleared again so the gesture can be retried.
    pub fn unlock(&mut self) -> bool {
        self.state.unlocked = true;
        let level = clamp_volume(self.levels.ambient_volume);
        let Some(ambient) = self.ambient.as_mut() else {
            self.state.unlocked = false;
            return false;
        };
        ambient.set_volume(level);
        match ambient.play() {
            Ok(()) => true,
            Err(e) => {
                log::info!("Ambient audio still locked: {e}");
                self.state.unlocked = false;
                false
            }
        }
    }

    /// Volume slider: `slider` in 0..=100 drives narration and music together.
    pub fn set_master_volume(&mut self, slider: f32) {
        let volume = clamp_volume(slider / 100.0);
        if let Some(n) = self.narration.as_mut() {
            n.set_volume(volume);
        }
        if let Some(m) = self.music.as_mut() {
            m.set_volume(volume);
        }
    }

    /// Footstep, throttled to one per `step_interval` seconds of `now`.
    /// Returns true if a sound was requested.
    pub fn play_step(&mut self, now: f32) -> bool {
        if let Some(last) = self.last_step_time {
            if now - last < self.levels.step_interval {
                return false;
            }
        }
        self.last_step_time = Some(now);
        self.play_cue(SoundCue::Step, self.levels.step_volume);
        true
    }

    pub fn play_title_impact(&mut self) {
        self.play_cue(SoundCue::TitleImpact, self.levels.impact_volume);
    }

    fn play_cue(&mut self, cue: SoundCue, volume: f32) {
        if let Some(sfx) = self.sfx.as_mut() {
            if let Err(e) = sfx.play(cue, clamp_volume(volume)) {
                log::debug!("Cue {cue:?} not played: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::AudioError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Probe {
        volume: f32,
        looping: bool,
        plays: u32,
        reject: bool,
    }

    struct FakeTrack(Rc<RefCell<Probe>>);

    impl Playback for FakeTrack {
        fn status(&self) -> PlaybackStatus {
            PlaybackStatus {
                current_time: 0.0,
                duration: 60.0,
                paused: self.0.borrow().plays == 0,
                ended: false,
            }
        }
        fn play(&mut self) -> Result<(), AudioError> {
            let mut p = self.0.borrow_mut();
            p.plays += 1;
            if p.reject {
                Err(AudioError::Rejected("autoplay".into()))
            } else {
                Ok(())
            }
        }
        fn pause(&mut self) {}
        fn set_volume(&mut self, volume: f32) {
            self.0.borrow_mut().volume = volume;
        }
        fn set_looping(&mut self, looping: bool) {
            self.0.borrow_mut().looping = looping;
        }
    }

    struct CountingSfx(Rc<RefCell<Vec<(SoundCue, f32)>>>);

    impl SfxPlayer for CountingSfx {
        fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), AudioError> {
            self.0.borrow_mut().push((cue, volume));
            Ok(())
        }
    }

    #[test]
    fn missing_tracks_are_no_ops() {
        let mut audio = AudioDirector::silent();
        assert!(!audio.start_narration_if_needed());
        audio.start_music_if_needed();
        audio.set_master_volume(50.0);
        audio.play_title_impact();
        assert!(!audio.unlock());
        assert_eq!(audio.narration_status(), None);
    }

    #[test]
    fn attach_applies_clamped_levels() {
        let probe = Rc::new(RefCell::new(Probe::default()));
        let _audio = AudioDirector::silent().with_ambient(Box::new(FakeTrack(probe.clone())));
        assert_eq!(probe.borrow().volume, 1.0);
        assert!(probe.borrow().looping);
    }

    #[test]
    fn rejected_narration_retries_on_next_request() {
        let probe = Rc::new(RefCell::new(Probe {
            reject: true,
            ..Default::default()
        }));
        let mut audio = AudioDirector::silent().with_narration(Box::new(FakeTrack(probe.clone())));
        assert!(!audio.start_narration_if_needed());
        probe.borrow_mut().reject = false;
        assert!(audio.start_narration_if_needed());
        assert!(audio.start_narration_if_needed());
        assert_eq!(probe.borrow().plays, 2);
    }

    #[test]
    fn failed_unlock_clears_flag() {
        let probe = Rc::new(RefCell::new(Probe {
            reject: true,
            ..Default::default()
        }));
        let mut audio = AudioDirector::silent().with_ambient(Box::new(FakeTrack(probe)));
        assert!(!audio.unlock());
        assert!(!audio.state().unlocked);
    }

    #[test]
    fn volume_slider_clamps_non_finite() {
        let probe = Rc::new(RefCell::new(Probe::default()));
        let mut audio = AudioDirector::silent().with_music(Box::new(FakeTrack(probe.clone())));
        audio.set_master_volume(f32::NAN);
        assert_eq!(probe.borrow().volume, 0.0);
        audio.set_master_volume(250.0);
        assert_eq!(probe.borrow().volume, 1.0);
    }

    #[test]
    fn steps_are_throttled() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut audio = AudioDirector::silent().with_sfx(Box::new(CountingSfx(log.clone())));
        assert!(audio.play_step(1.0));
        assert!(!audio.play_step(1.3));
        assert!(audio.play_step(1.5));
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(log.borrow()[0], (SoundCue::Step, 0.2));
    }
}
