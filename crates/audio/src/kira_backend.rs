//! Kira-backed implementations of the playback contracts.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    sound::PlaybackState,
    tween::Tween,
};

use crate::playback::{AudioError, Playback, PlaybackStatus, SfxPlayer, SoundCue};

type SharedManager = Rc<RefCell<AudioManager<DefaultBackend>>>;

/// Owns the Kira manager and hands out tracks and a cue player sharing it.
pub struct KiraAudio {
    manager: SharedManager,
}

impl KiraAudio {
    pub fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        Ok(Self {
            manager: Rc::new(RefCell::new(manager)),
        })
    }

    /// Load a streaming-style track (decoded up front) from a file.
    pub fn track(&self, path: &Path) -> Result<KiraTrack> {
        let data = StaticSoundData::from_file(path)?;
        Ok(KiraTrack {
            manager: self.manager.clone(),
            data,
            handle: None,
            volume: 1.0,
            looping: false,
        })
    }

    /// Build a cue player from `(cue, file)` pairs.
    pub fn sfx(&self, cues: &[(SoundCue, &Path)]) -> Result<KiraSfx> {
        let mut sounds = HashMap::new();
        for (cue, path) in cues {
            sounds.insert(*cue, StaticSoundData::from_file(path)?);
        }
        Ok(KiraSfx {
            manager: self.manager.clone(),
            sounds,
        })
    }
}

pub struct KiraTrack {
    manager: SharedManager,
    data: StaticSoundData,
    handle: Option<StaticSoundHandle>,
    volume: f32,
    looping: bool,
}

impl KiraTrack {
    fn settings(&self) -> StaticSoundSettings {
        let settings = StaticSoundSettings::new().volume(self.volume as f64);
        if self.looping {
            settings.loop_region(..)
        } else {
            settings
        }
    }
}

impl Playback for KiraTrack {
    fn status(&self) -> PlaybackStatus {
        let duration = self.data.duration().as_secs_f64();
        match &self.handle {
            Some(handle) => {
                let state = handle.state();
                PlaybackStatus {
                    current_time: handle.position(),
                    duration,
                    paused: !matches!(state, PlaybackState::Playing),
                    ended: state == PlaybackState::Stopped,
                }
            }
            None => PlaybackStatus {
                current_time: 0.0,
                duration,
                paused: true,
                ended: false,
            },
        }
    }

    fn play(&mut self) -> Result<(), AudioError> {
        if let Some(handle) = self.handle.as_mut() {
            if handle.state() != PlaybackState::Stopped {
                let _ = handle.resume(Tween::default());
                return Ok(());
            }
        }
        let sound = self.data.clone().with_settings(self.settings());
        let handle = self
            .manager
            .borrow_mut()
            .play(sound)
            .map_err(|e| AudioError::Backend(e.to_string()))?;
        self.handle = Some(handle);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let _ = handle.pause(Tween::default());
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(handle) = self.handle.as_mut() {
            let _ = handle.set_volume(volume as f64, Tween::default());
        }
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}

pub struct KiraSfx {
    manager: SharedManager,
    sounds: HashMap<SoundCue, StaticSoundData>,
}

impl SfxPlayer for KiraSfx {
    fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), AudioError> {
        let data = self.sounds.get(&cue).ok_or(AudioError::MissingSound(cue))?;
        let sound = data
            .clone()
            .with_settings(StaticSoundSettings::new().volume(volume as f64));
        self.manager
            .borrow_mut()
            .play(sound)
            .map(|_| ())
            .map_err(|e| AudioError::Backend(e.to_string()))
    }
}
