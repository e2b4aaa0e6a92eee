//! Final title: two words dropped under gravity that bounce to rest.
//!
//! Contacts are reported back to the caller, which raises the camera and ground
//! shakes and plays the impact cue. With physics disabled the whole group runs a
//! one-shot eased rise instead, with no contacts at all.

use engine_core::{ease, Easing, Vec3};

use crate::config::{DropConfig, FinalSceneConfig};
use crate::i18n::Language;

/// Simulation steps are clamped to this range so a hitch cannot tunnel a word
/// through the ground.
pub const MIN_STEP: f32 = 0.001;
pub const MAX_STEP: f32 = 0.033;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DropWord {
    pub offset_y: f32,
    pub velocity: f32,
    /// Terminal: a landed word never moves again until the next `start`.
    pub landed: bool,
    pub squash_timer: f32,
    pub impact_played: bool,
}

/// A ground contact during this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impact {
    pub word: usize,
    /// True only for the word's first contact since `start`.
    pub first: bool,
}

/// Horizontal placement and text of both words for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct DropLayout {
    pub words: [&'static str; 2],
    pub x: [f32; 2],
}

impl DropLayout {
    pub fn new(language: Language, config: &DropConfig) -> Self {
        let half = config.word_spacing / 2.0;
        Self {
            words: language.title_words(),
            x: [
                -half + language.left_word_extra_x(config.left_extra_x),
                half + config.right_extra_x,
            ],
        }
    }
}

#[derive(Debug)]
pub struct DropText {
    config: DropConfig,
    scene: FinalSceneConfig,
    layout: DropLayout,
    words: [DropWord; 2],
    active: bool,
    elapsed: f32,
    group_offset_y: f32,
}

impl DropText {
    pub fn new(config: DropConfig, scene: FinalSceneConfig, language: Language) -> Self {
        let layout = DropLayout::new(language, &config);
        Self {
            group_offset_y: scene.rise_from_offset_y,
            config,
            scene,
            layout,
            words: [DropWord::default(); 2],
            active: false,
            elapsed: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn words(&self) -> &[DropWord; 2] {
        &self.words
    }

    pub fn layout(&self) -> &DropLayout {
        &self.layout
    }

    pub fn group_offset_y(&self) -> f32 {
        self.group_offset_y
    }

    pub fn all_landed(&self) -> bool {
        self.words.iter().all(|w| w.landed)
    }

    /// Rebuild the per-language layout. Motion state is untouched.
    pub fn set_language(&mut self, language: Language) {
        self.layout = DropLayout::new(language, &self.config);
    }

    /// Apply new drop parameters and rebuild the layout for `language`.
    pub fn reconfigure(&mut self, config: DropConfig, scene: FinalSceneConfig, language: Language) {
        self.config = config;
        self.scene = scene;
        self.set_language(language);
    }

    fn delay(&self, word: usize) -> f32 {
        if word == 0 {
            0.0
        } else {
            self.config.right_delay
        }
    }

    fn drop_height(&self, word: usize) -> f32 {
        if word == 0 {
            self.config.left_drop_height
        } else {
            self.config.right_drop_height
        }
    }

    /// Begin (or restart) the drop. Always a full reset.
    pub fn start(&mut self) {
        self.active = true;
        self.elapsed = 0.0;
        self.group_offset_y = self.scene.rise_from_offset_y;
        for i in 0..self.words.len() {
            self.words[i] = DropWord {
                offset_y: self.drop_height(i),
                ..Default::default()
            };
        }
    }

    /// Advance one frame and return this frame's contacts.
    pub fn update(&mut self, dt: f32) -> Vec<Impact> {
        if !self.active {
            return Vec::new();
        }
        if !self.config.enabled {
            self.update_fallback(dt);
            return Vec::new();
        }

        let dt = if dt.is_finite() { dt.clamp(MIN_STEP, MAX_STEP) } else { MIN_STEP };
        self.group_offset_y = self.scene.rise_to_offset_y;
        self.elapsed += dt;

        let g = self.config.gravity;
        let bounce = self.config.bounce.clamp(0.0, 0.95);
        let stop_velocity = self.config.stop_velocity.max(1.0);

        let mut impacts = Vec::new();
        for i in 0..self.words.len() {
            let started = self.elapsed >= self.delay(i);
            let word = &mut self.words[i];
            if started && !word.landed {
                word.velocity -= g * dt;
                word.offset_y += word.velocity * dt;
                if word.offset_y <= 0.0 {
                    word.offset_y = 0.0;
                    if word.velocity.abs() < stop_velocity {
                        word.velocity = 0.0;
                        word.landed = true;
                    } else {
                        word.velocity = -word.velocity * bounce;
                    }
                    word.squash_timer = self.config.squash_duration;
                    impacts.push(Impact {
                        word: i,
                        first: !word.impact_played,
                    });
                    word.impact_played = true;
                }
            }
            word.squash_timer = (word.squash_timer - dt).max(0.0);
        }
        impacts
    }

    fn update_fallback(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
        let t = self.elapsed / self.scene.rise_duration.max(0.01);
        self.group_offset_y = ease(
            self.scene.rise_from_offset_y,
            self.scene.rise_to_offset_y,
            t,
            Easing::QuadInOut,
        );
        if t >= 1.0 {
            self.active = false;
        }
    }

    /// Squash-and-stretch scale of a word: wider and shorter right after a
    /// contact, easing back to 1 over the squash duration.
    pub fn scale(&self, word: usize) -> Vec3 {
        let Some(w) = self.words.get(word) else {
            return Vec3::ONE;
        };
        if w.squash_timer <= 0.0 {
            return Vec3::ONE;
        }
        let s = self.config.squash * w.squash_timer / self.config.squash_duration.max(0.0001);
        Vec3::new(1.0 + s, 1.0 - s, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_text() -> DropText {
        DropText::new(DropConfig::default(), FinalSceneConfig::default(), Language::En)
    }

    #[test]
    fn bounce_peaks_strictly_decrease_and_word_lands() {
        let mut text = drop_text();
        text.start();

        let mut peaks = Vec::new();
        let mut peak = 0.0_f32;
        let mut rising = false;
        let mut steps = 0;
        while !text.words()[0].landed {
            text.update(1.0 / 60.0);
            let w = text.words()[0];
            if w.velocity > 0.0 {
                rising = true;
                peak = peak.max(w.offset_y);
            } else if rising {
                peaks.push(peak);
                peak = 0.0;
                rising = false;
            }
            steps += 1;
            assert!(steps < 10_000, "word never landed");
        }
        assert!(!peaks.is_empty());
        for pair in peaks.windows(2) {
            assert!(pair[1] < pair[0], "peaks {:?} not decreasing", peaks);
        }
        assert!(peaks[0] < 80.0);
    }

    #[test]
    fn lands_with_zero_restitution() {
        let mut text = DropText::new(
            DropConfig {
                bounce: 0.0,
                ..Default::default()
            },
            FinalSceneConfig::default(),
            Language::En,
        );
        text.start();
        let mut contacts = 0;
        for _ in 0..2000 {
            contacts += text.update(0.016).iter().filter(|i| i.word == 0).count();
            if text.words()[0].landed {
                break;
            }
        }
        assert!(text.words()[0].landed);
        assert!(contacts >= 1);
    }

    #[test]
    fn impact_flag_is_set_once_per_word() {
        let mut text = drop_text();
        text.start();
        let mut all = Vec::new();
        for _ in 0..2000 {
            all.extend(text.update(0.016));
        }
        assert!(text.all_landed());
        for word in 0..2 {
            let firsts = all.iter().filter(|i| i.word == word && i.first).count();
            let total = all.iter().filter(|i| i.word == word).count();
            assert_eq!(firsts, 1);
            assert!(total > 1, "word {word} should bounce at least once");
        }
    }

    #[test]
    fn right_word_waits_for_its_delay() {
        let mut text = drop_text();
        text.start();
        text.update(0.1);
        assert!(text.words()[0].velocity < 0.0);
        assert_eq!(text.words()[1].velocity, 0.0);
        assert_eq!(text.words()[1].offset_y, 80.0);
        for _ in 0..10 {
            text.update(0.1);
        }
        assert!(text.words()[1].velocity != 0.0 || text.words()[1].landed);
    }

    #[test]
    fn restart_mid_flight_fully_resets() {
        let mut text = drop_text();
        text.start();
        for _ in 0..40 {
            text.update(0.016);
        }
        text.start();
        for w in text.words() {
            assert_eq!(w.offset_y, 80.0);
            assert_eq!(w.velocity, 0.0);
            assert!(!w.landed);
            assert!(!w.impact_played);
            assert_eq!(w.squash_timer, 0.0);
        }
    }

    #[test]
    fn squash_eases_back_to_identity() {
        let mut text = drop_text();
        text.start();
        let mut squashed = false;
        for _ in 0..200 {
            if !text.update(0.016).iter().any(|i| i.word == 0) {
                continue;
            }
            let s = text.scale(0);
            assert!(s.x > 1.0 && s.y < 1.0);
            assert!((s.x - 1.0 - (1.0 - s.y)).abs() < 1e-5);
            squashed = true;
            break;
        }
        assert!(squashed);
        for _ in 0..20 {
            text.update(0.016);
        }
        if text.words()[0].squash_timer == 0.0 {
            assert_eq!(text.scale(0), Vec3::ONE);
        }
    }

    #[test]
    fn fallback_tween_has_no_contacts() {
        let mut text = DropText::new(
            DropConfig {
                enabled: false,
                ..Default::default()
            },
            FinalSceneConfig::default(),
            Language::En,
        );
        text.start();
        assert_eq!(text.group_offset_y(), 150.0);
        text.update(2.5);
        assert!((text.group_offset_y() - (150.0 - 185.0)).abs() < 1e-3);
        for _ in 0..10 {
            assert!(text.update(0.5).is_empty());
        }
        assert_eq!(text.group_offset_y(), -220.0);
        assert!(!text.is_active());
    }

    #[test]
    fn physics_pins_group_offset() {
        let mut text = drop_text();
        text.start();
        text.update(0.016);
        assert_eq!(text.group_offset_y(), -220.0);
    }

    #[test]
    fn layout_depends_on_language() {
        let config = DropConfig::default();
        let en = DropLayout::new(Language::En, &config);
        let tr = DropLayout::new(Language::Tr, &config);
        assert_eq!(en.words, ["BUT", "WHY?"]);
        assert_eq!(en.x, [-17.0, 9.0]);
        assert_eq!(tr.words, ["AMA", "NEDEN?"]);
        assert_eq!(tr.x, [-24.0, 9.0]);
    }
}
