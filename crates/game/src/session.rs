//! Session: owns every component of one play-through and the collaborators
//! (audio, overlay, preferences). All mutable state lives here, so independent
//! sessions can coexist in tests.

use audio::{AudioDirector, AudioState};
use engine_core::{Color, Entity, MaterialColor, MeshPart, Time, Transform, Vec3, World};
use rand::{rngs::StdRng, SeedableRng};

use crate::camera::{CameraMode, CameraPose, CameraRig};
use crate::config::VignetteConfig;
use crate::drop_text::DropText;
use crate::ending::{EndingMode, EndingMotion};
use crate::error::Result;
use crate::footprints::FootprintTrail;
use crate::guidance::GuidancePath;
use crate::i18n::{Language, UiText, LANGUAGE_KEY};
use crate::movement::{MoveInput, Movement};
use crate::narrative::{NarrativeController, NarrativeState, Outcome};
use crate::overlay::Overlay;
use crate::prefs::PreferenceStore;
use crate::shake::Shake;
use crate::triggers::{PositionTrigger, TriggerSet};
use crate::tuning::{self, TuningEffect};
use crate::typewriter::Typewriter;

/// Movement keys, after the host has mapped its key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Forward,
    Back,
}

/// Final title as the renderer should draw it this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleSnapshot {
    pub words: [&'static str; 2],
    pub x: [f32; 2],
    pub offset_y: [f32; 2],
    pub scale: [Vec3; 2],
    pub group_offset_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuidanceSnapshot {
    pub visible: bool,
    pub color: Color,
    pub opacity: f32,
    /// Index count to render.
    pub draw_range: usize,
}

/// Everything an external renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub camera: CameraPose,
    pub camera_mode: CameraMode,
    pub character: Transform,
    pub walk_paused: bool,
    /// Vertical offset of the ground mesh (ground shake).
    pub ground_offset_y: f32,
    pub title: Option<TitleSnapshot>,
    pub guidance: GuidanceSnapshot,
    pub subtitle: Option<String>,
    pub narration_timer: Option<String>,
}

pub struct Session {
    pub(crate) config: VignetteConfig,
    pub(crate) time: Time,
    pub(crate) language: Language,
    pub(crate) world: World,
    pub(crate) character: Transform,
    pub(crate) movement: Movement,
    pub(crate) input: MoveInput,
    pub(crate) ending: EndingMotion,
    pub(crate) narrative: NarrativeController,
    pub(crate) drop_text: DropText,
    pub(crate) guidance: GuidancePath,
    pub(crate) camera: CameraRig,
    pub(crate) camera_shake: Shake,
    pub(crate) ground_shake: Shake,
    pub(crate) ground_offset_y: f32,
    pub(crate) rng: StdRng,
    pub(crate) triggers: TriggerSet,
    pub(crate) footprints: FootprintTrail,
    pub(crate) typewriter: Typewriter,
    pub(crate) audio: AudioDirector,
    pub(crate) overlay: Option<Box<dyn Overlay>>,
    pub(crate) prefs: Option<Box<dyn PreferenceStore>>,
    pub(crate) loading_hidden: bool,
    pub(crate) game_over: bool,
    pub(crate) title_visible: bool,
    pub(crate) result: Option<Outcome>,
    pub(crate) restart_visible: bool,
    pub(crate) subtitle: Option<String>,
    pub(crate) narration_timer: Option<String>,
}

impl Session {
    pub fn new(mut config: VignetteConfig, language: Language) -> Self {
        config.sanitize();
        let movement = Movement::new(config.movement.clone());
        let character = movement.spawn();

        let mut guidance = GuidancePath::new(config.guidance.clone());
        guidance.set_start_from_character(character.position);

        Self {
            time: Time::new(),
            language,
            world: World::new(),
            character,
            movement,
            input: MoveInput::default(),
            ending: EndingMotion::new(config.ending.clone(), config.drop_text.gravity),
            narrative: NarrativeController::new(config.narrative.clone(), language.subtitles()),
            drop_text: DropText::new(config.drop_text.clone(), config.final_scene.clone(), language),
            guidance,
            camera: CameraRig::new(config.camera.clone(), config.final_scene.clone()),
            camera_shake: Shake::default(),
            ground_shake: Shake::default(),
            ground_offset_y: 0.0,
            rng: StdRng::from_entropy(),
            triggers: TriggerSet::default(),
            footprints: FootprintTrail::new(config.footprints.clone()),
            typewriter: Typewriter::new(),
            audio: AudioDirector::new(config.audio.clone()),
            overlay: None,
            prefs: None,
            loading_hidden: false,
            game_over: false,
            title_visible: false,
            result: None,
            restart_visible: false,
            subtitle: None,
            narration_timer: None,
            config,
        }
    }

    pub fn with_audio(mut self, audio: AudioDirector) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_overlay(mut self, overlay: Box<dyn Overlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn with_preferences(mut self, prefs: Box<dyn PreferenceStore>) -> Self {
        self.prefs = Some(prefs);
        self
    }

    /// Reseed shake randomness for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Register a mesh of the character model; returns its stable id.
    pub fn add_mesh_part(&mut self, name: &str, color: Color) -> Entity {
        self.world.spawn((MeshPart::new(name), MaterialColor(color)))
    }

    pub fn add_trigger(&mut self, trigger: PositionTrigger) {
        self.triggers.add(trigger);
    }

    pub fn overlay_mut(&mut self) -> Option<&mut dyn Overlay> {
        match &mut self.overlay {
            Some(o) => Some(o.as_mut()),
            None => None,
        }
    }

    /// Dismiss the loading screen and start the intro flight. Later calls are no-ops.
    pub fn finish_loading(&mut self) {
        if self.loading_hidden {
            return;
        }
        self.loading_hidden = true;
        if let Some(o) = self.overlay.as_deref_mut() {
            o.hide_loading();
        }
        self.camera.start_intro();
        log::info!("Loading finished, intro started");
    }

    /// User gesture: start ambient audio. On success the loading screen goes away,
    /// otherwise the unlock prompt stays up for another try.
    pub fn unlock_audio(&mut self) -> bool {
        let ok = self.audio.unlock();
        if let Some(o) = self.overlay.as_deref_mut() {
            o.show_audio_unlock(!ok);
        }
        if ok {
            self.finish_loading();
        }
        ok
    }

    pub fn key_down(&mut self, key: MoveKey) {
        let forward = key == MoveKey::Forward;
        if !self.movement.accepts(forward) {
            return;
        }
        self.finish_loading();
        if !self.camera.intro_playing() {
            self.audio.start_narration_if_needed();
        }
        match key {
            MoveKey::Forward => self.input.forward = true,
            MoveKey::Back => self.input.back = true,
        }
    }

    pub fn key_up(&mut self, key: MoveKey) {
        match key {
            MoveKey::Forward => self.input.forward = false,
            MoveKey::Back => self.input.back = false,
        }
    }

    /// Volume slider in 0..=100.
    pub fn set_volume(&mut self, slider: f32) {
        self.audio.set_master_volume(slider);
    }

    /// Switch language, persist it, and rebuild text-dependent state.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        if let Some(p) = self.prefs.as_deref_mut() {
            p.set(LANGUAGE_KEY, language.code());
        }
        self.narrative.set_subtitles(language.subtitles());
        self.drop_text.set_language(language);
        log::info!("Language set to {}", language.code());
    }

    /// Start the win run. Free movement stops for good so the ending motion
    /// is the only thing moving the character.
    pub fn start_win(&mut self) -> Result<()> {
        self.ending.start_win()?;
        self.hand_over_to_ending();
        Ok(())
    }

    pub fn start_lose(&mut self) -> Result<()> {
        self.ending.start_lose(&self.world)?;
        self.hand_over_to_ending();
        Ok(())
    }

    pub(crate) fn hand_over_to_ending(&mut self) {
        self.game_over = true;
        self.movement.disable();
        self.input = Default::default();
    }

    /// Debug panel hook: set a named field and rebuild whatever depends on it.
    pub fn tune(&mut self, name: &str, value: f32) -> Result<TuningEffect> {
        let followed = self.guidance.config();
        self.config.guidance.start_x = followed.start_x;
        self.config.guidance.start_z = followed.start_z;
        let effect = tuning::set(&mut self.config, name, value)?;
        self.config.sanitize();
        match effect {
            TuningEffect::RebuildGuidance => self.guidance.reconfigure(self.config.guidance.clone()),
            TuningEffect::RebuildDropLayout => self.drop_text.reconfigure(
                self.config.drop_text.clone(),
                self.config.final_scene.clone(),
                self.language,
            ),
            TuningEffect::Live => {
                self.movement.set_speed(self.config.movement.move_speed);
                self.guidance.set_opacity(self.config.guidance.opacity);
                self.camera
                    .reconfigure(self.config.camera.clone(), self.config.final_scene.clone());
            }
        }
        Ok(effect)
    }

    pub fn config(&self) -> &VignetteConfig {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn character(&self) -> &Transform {
        &self.character
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn ending_mode(&self) -> EndingMode {
        self.ending.mode()
    }

    pub fn narrative_state(&self) -> NarrativeState {
        self.narrative.state()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.narrative.outcome()
    }

    pub fn result_shown(&self) -> Option<Outcome> {
        self.result
    }

    pub fn restart_visible(&self) -> bool {
        self.restart_visible
    }

    pub fn intro_playing(&self) -> bool {
        self.camera.intro_playing()
    }

    pub fn movement_disabled(&self) -> bool {
        self.movement.is_disabled()
    }

    pub fn audio_state(&self) -> AudioState {
        self.audio.state()
    }

    pub fn guidance(&self) -> &GuidancePath {
        &self.guidance
    }

    pub fn drop_text(&self) -> &DropText {
        &self.drop_text
    }

    pub fn footprints(&self) -> &FootprintTrail {
        &self.footprints
    }

    pub fn camera_shake(&self) -> &Shake {
        &self.camera_shake
    }

    pub fn elapsed(&self) -> f32 {
        self.time.elapsed_seconds()
    }

    pub(crate) fn text(&self, key: UiText) -> &'static str {
        self.language.text(key)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let title = self.title_visible.then(|| {
            let layout = self.drop_text.layout();
            let words = self.drop_text.words();
            TitleSnapshot {
                words: layout.words,
                x: layout.x,
                offset_y: [words[0].offset_y, words[1].offset_y],
                scale: [self.drop_text.scale(0), self.drop_text.scale(1)],
                group_offset_y: self.drop_text.group_offset_y(),
            }
        });
        let walk_paused = if self.ending.is_active() {
            self.ending.walk_paused()
        } else {
            self.movement.walk_paused()
        };
        FrameSnapshot {
            camera: self.camera.pose(),
            camera_mode: self.camera.mode(),
            character: self.character,
            walk_paused,
            ground_offset_y: self.ground_offset_y,
            title,
            guidance: GuidanceSnapshot {
                visible: self.guidance.is_visible(),
                color: self.guidance.color(),
                opacity: self.guidance.opacity(),
                draw_range: self.guidance.draw_range(),
            },
            subtitle: self.subtitle.clone(),
            narration_timer: self.narration_timer.clone(),
        }
    }
}
