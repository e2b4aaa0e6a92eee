//! Whiteout - headless run of the snowfield vignette.
//!
//! Loads config and assets, plays the story at a fixed 60 Hz step, and logs what a
//! renderer and overlay would show. `--win` walks the penguin to the goal before
//! the ending fires; without it the penguin stays put and the lose branch plays.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use audio::{AudioDirector, AudioError, AudioLevels, Playback, PlaybackStatus};
use engine_core::Color;
use procgen::{GroundConfig, GroundMesh};
use whiteout::loading::{load_all, AssetKind, AssetRequest, DirectorySource};
use whiteout::narrative::Outcome;
use whiteout::prefs::{FilePreferences, PreferenceStore};
use whiteout::triggers::PositionTrigger;
use whiteout::{Language, LocaleHints, MoveKey, Overlay, Session, VignetteConfig};

const STEP: f32 = 1.0 / 60.0;
const PREFS_FILE: &str = "whiteout_prefs.ron";
const NARRATION_LENGTH: f64 = 40.0;
const MAX_SIM_SECONDS: f32 = 120.0;

#[derive(Parser)]
#[command(name = "whiteout", version)]
#[command(about = "Whiteout - headless run of the snowfield vignette")]
struct Options {
    /// Walk the penguin to the goal before the ending fires
    #[arg(long)]
    win: bool,

    /// Pace frames at wall-clock speed instead of simulating as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Use the low-density ground mesh
    #[arg(long)]
    low_detail: bool,

    /// Language (overrides and updates the stored preference)
    #[arg(long, value_enum)]
    lang: Option<LangArg>,

    /// Asset directory
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum LangArg {
    En,
    Tr,
}

impl From<LangArg> for Language {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::En => Language::En,
            LangArg::Tr => Language::Tr,
        }
    }
}

/// Narration clock driven by the simulation step instead of a sound device.
#[derive(Clone)]
struct SimulatedNarration(Rc<RefCell<PlaybackStatus>>);

impl SimulatedNarration {
    fn new(length: f64) -> Self {
        Self(Rc::new(RefCell::new(PlaybackStatus {
            current_time: 0.0,
            duration: length,
            paused: true,
            ended: false,
        })))
    }

    fn advance(&self, dt: f32) {
        let mut s = self.0.borrow_mut();
        if s.paused || s.ended {
            return;
        }
        s.current_time += dt as f64;
        if s.current_time >= s.duration {
            s.current_time = s.duration;
            s.ended = true;
        }
    }
}

impl Playback for SimulatedNarration {
    fn status(&self) -> PlaybackStatus {
        *self.0.borrow()
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.0.borrow_mut().paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.borrow_mut().paused = true;
    }

    fn set_volume(&mut self, _volume: f32) {}
}

/// Overlay that writes everything to the log.
struct LogOverlay;

impl Overlay for LogOverlay {
    fn set_subtitle(&mut self, text: Option<&str>) {
        if let Some(t) = text {
            log::info!("[subtitle] {}", t);
        }
    }

    fn show_result(&mut self, outcome: Outcome, heading: &str) {
        log::info!("[result] {:?}: {}", outcome, heading);
    }

    fn set_result_message(&mut self, text: &str, typing: bool) {
        if !typing {
            log::info!("[result] {}", text);
        }
    }

    fn set_restart_visible(&mut self, visible: bool) {
        if visible {
            log::info!("[result] restart available");
        }
    }

    fn set_loading_progress(&mut self, percent: u8) {
        log::info!("[loading] {}%", percent);
    }

    fn hide_loading(&mut self) {
        log::info!("[loading] done");
    }
}

#[cfg(feature = "kira")]
fn build_audio(levels: AudioLevels, assets: &std::path::Path) -> (AudioDirector, Option<SimulatedNarration>) {
    use audio::kira_backend::KiraAudio;
    use audio::SoundCue;

    let kira = match KiraAudio::new() {
        Ok(k) => k,
        Err(e) => {
            log::warn!("No audio device ({}), using simulated narration", e);
            return build_simulated(levels);
        }
    };
    let mut director = AudioDirector::new(levels);
    match kira.track(&assets.join("audio/narration.mp3")) {
        Ok(t) => director = director.with_narration(Box::new(t)),
        Err(e) => {
            log::error!("Narration failed to load: {}", e);
            return build_simulated(director.levels().clone());
        }
    }
    match kira.track(&assets.join("audio/music.mp3")) {
        Ok(t) => director = director.with_music(Box::new(t)),
        Err(e) => log::error!("Music failed to load: {}", e),
    }
    match kira.track(&assets.join("audio/winter.mp3")) {
        Ok(t) => director = director.with_ambient(Box::new(t)),
        Err(e) => log::error!("Ambient audio failed to load: {}", e),
    }
    let step = assets.join("audio/step.mp3");
    let impact = assets.join("audio/impact.mp3");
    match kira.sfx(&[(SoundCue::Step, step.as_path()), (SoundCue::TitleImpact, impact.as_path())]) {
        Ok(sfx) => director = director.with_sfx(Box::new(sfx)),
        Err(e) => log::error!("Sound effects failed to load: {}", e),
    }
    (director, None)
}

#[cfg(not(feature = "kira"))]
fn build_audio(levels: AudioLevels, _assets: &std::path::Path) -> (AudioDirector, Option<SimulatedNarration>) {
    build_simulated(levels)
}

fn build_simulated(levels: AudioLevels) -> (AudioDirector, Option<SimulatedNarration>) {
    let narration = SimulatedNarration::new(NARRATION_LENGTH);
    let director = AudioDirector::new(levels).with_narration(Box::new(narration.clone()));
    (director, Some(narration))
}

fn locale_hints() -> LocaleHints {
    LocaleHints {
        language: std::env::var("LC_ALL")
            .ok()
            .or_else(|| std::env::var("LANG").ok())
            .filter(|s| !s.is_empty()),
        timezone: std::env::var("TZ").ok().filter(|s| !s.is_empty()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════╗");
    println!("║                  WHITEOUT                    ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  --win        walk to the goal first         ║");
    println!("║  --lang en|tr choose the language            ║");
    println!("║  --realtime   pace frames at wall-clock      ║");
    println!("╚══════════════════════════════════════════════╝");

    let opts = Options::parse();
    let config = VignetteConfig::load();

    let mut prefs = FilePreferences::open(PREFS_FILE);
    let language = match opts.lang.map(Language::from) {
        Some(lang) => {
            prefs.set(whiteout::i18n::LANGUAGE_KEY, lang.code());
            lang
        }
        None => Language::detect(Some(&prefs as &dyn PreferenceStore), &locale_hints()),
    };
    log::info!("Language: {}", language.code());

    let ground_config = if opts.low_detail {
        GroundConfig::low_detail()
    } else {
        GroundConfig::default()
    };
    let ground = GroundMesh::generate(ground_config);
    log::info!("Ground: {} vertices", ground.vertices.len());

    let (audio, simulated) = build_audio(config.audio.clone(), &opts.assets);
    let mut session = Session::new(config, language)
        .with_audio(audio)
        .with_overlay(Box::new(LogOverlay))
        .with_preferences(Box::new(prefs));

    for (name, hex) in [("body", "#1b1e24"), ("belly", "#f2f2ee"), ("beak", "#f2a33a"), ("feet", "#e58b2e")] {
        session.add_mesh_part(name, Color::from_hex(hex).unwrap_or(Color::WHITE));
    }
    session.add_trigger(PositionTrigger::new("halfway", glam::Vec3::new(-50.0, 0.0, 0.0)).with_radius(3.0));

    let requests = [
        AssetRequest::new(AssetKind::Model, "models/penguin.fbx"),
        AssetRequest::new(AssetKind::Font, "fonts/title.typeface.json"),
        AssetRequest::new(AssetKind::Texture, "textures/snow.png"),
    ];
    let source = DirectorySource::new(&opts.assets);
    let report = pollster::block_on(load_all(&source, &requests, session.overlay_mut()));
    if !report.tracker.failed().is_empty() {
        log::warn!("{} asset(s) missing, continuing without them", report.tracker.failed().len());
    }

    if !session.unlock_audio() {
        session.finish_loading();
    }

    let mut sim_time = 0.0;
    let mut last = Instant::now();
    while sim_time < MAX_SIM_SECONDS {
        let dt = if opts.realtime {
            std::thread::sleep(Duration::from_secs_f32(STEP));
            let now = Instant::now();
            let dt = (now - last).as_secs_f32();
            last = now;
            dt
        } else {
            STEP
        };

        if !session.intro_playing() && !session.audio_state().narration_started {
            // The first key press after the intro starts narration.
            session.key_down(MoveKey::Forward);
            if !opts.win {
                session.key_up(MoveKey::Forward);
            }
        }
        if opts.win && session.character().position.x <= session.config().narrative.goal_x_threshold - 1.0 {
            session.key_up(MoveKey::Forward);
        }

        if let Some(n) = &simulated {
            n.advance(dt);
        }
        session.update(dt);
        sim_time += dt;

        if session.restart_visible() {
            break;
        }
    }

    let snap = session.snapshot();
    let p = snap.character.position;
    println!("Outcome: {:?}", session.outcome());
    println!("Character: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
    println!("Camera: {:?} at {:?}", snap.camera_mode, snap.camera.position);
    println!("Footprints on the ground: {}", session.footprints().prints().len());
    println!("Simulated {:.1}s", sim_time);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let opts = Options::try_parse_from(["whiteout"]).unwrap();
        assert!(!opts.win && !opts.realtime && !opts.low_detail);
        assert!(opts.lang.is_none());
        assert_eq!(opts.assets, PathBuf::from("assets"));
    }

    #[test]
    fn language_flag_maps_to_language() {
        let opts = Options::try_parse_from(["whiteout", "--lang", "tr", "--win"]).unwrap();
        assert_eq!(opts.lang.map(Language::from), Some(Language::Tr));
        assert!(opts.win);
    }

    #[test]
    fn unknown_language_and_flags_are_rejected() {
        assert!(Options::try_parse_from(["whiteout", "--lang", "xx"]).is_err());
        assert!(Options::try_parse_from(["whiteout", "--fast"]).is_err());
    }
}
