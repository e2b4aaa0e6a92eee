//! Per-frame session update.
//!
//! One call advances every subsystem in a fixed order: clock, intro, movement,
//! ending motion, guidance, footprints, result typing, narrative timeline, title
//! drop, shakes, camera. Nothing here blocks; deferred work lives in the
//! narrative scheduler.

use crate::i18n::UiText;
use crate::narrative::{narration_timer, NarrativeEvent, Outcome};
use crate::Session;

impl Session {
    /// Advance the session by `dt` seconds of frame time.
    pub fn update(&mut self, dt: f32) {
        self.time.advance(dt);
        let dt = self.time.delta_seconds();
        let now = self.time.elapsed_seconds();

        update_intro(self, dt);
        update_movement(self, dt, now);
        self.ending.update(dt, &mut self.character, &mut self.world);
        self.guidance
            .update(dt, self.character.position, self.camera.intro_playing());
        self.footprints.update(dt);
        update_typing(self, dt);
        update_narrative(self, dt);
        update_title(self, dt);

        let shake = self.camera_shake.random_offset(&mut self.rng);
        self.ground_offset_y = self.ground_shake.wave_offset();
        self.camera
            .compose(dt, &self.character, self.ending.is_active(), shake);
    }
}

fn update_intro(s: &mut Session, dt: f32) {
    if !s.camera.advance_intro(dt) {
        return;
    }
    s.narrative.finish_intro();
    if !s.guidance.draw_ever_started() {
        s.guidance.start_draw();
    }
    log::info!("Intro finished");
}

fn update_movement(s: &mut Session, dt: f32, now: f32) {
    let blocked = s.game_over || s.camera.intro_playing();
    let step = s.movement.update(dt, s.input, &mut s.character, blocked);
    if !step.moved {
        return;
    }
    s.audio.start_music_if_needed();
    s.triggers.update(s.character.position);
    if s.footprints.walk(dt, s.character.position) {
        s.audio.play_step(now);
    }
}

fn update_typing(s: &mut Session, dt: f32) {
    let Some(typed) = s.typewriter.advance(dt) else {
        return;
    };
    if let Some(o) = s.overlay.as_deref_mut() {
        o.set_result_message(&typed.text, !typed.done);
    }
    if typed.done {
        show_restart(s);
    }
}

fn update_narrative(s: &mut Session, dt: f32) {
    let status = s.audio.narration_status();
    let events = s.narrative.update(
        dt,
        status.as_ref(),
        s.character.position.x,
        !s.ending.is_active(),
    );
    for event in events {
        match event {
            NarrativeEvent::FinalMoment { outcome } => begin_final_moment(s, outcome),
            NarrativeEvent::FadeOutGuidance => s.guidance.start_fade_out(),
            NarrativeEvent::ShowResult(outcome) => show_result(s, outcome),
        }
    }

    let subtitle = s.narrative.subtitle(status.as_ref()).map(str::to_owned);
    if subtitle != s.subtitle {
        s.subtitle = subtitle;
        if let Some(o) = s.overlay.as_deref_mut() {
            o.set_subtitle(s.subtitle.as_deref());
        }
    }

    let final_active = s.narrative.final_moment_active();
    let timer = status.and_then(|st| narration_timer(&st, final_active));
    if timer != s.narration_timer {
        s.narration_timer = timer;
        if let Some(o) = s.overlay.as_deref_mut() {
            o.set_narration_timer(s.narration_timer.as_deref());
        }
    }
}

fn begin_final_moment(s: &mut Session, outcome: Outcome) {
    s.hand_over_to_ending();
    s.title_visible = true;
    s.drop_text.start();
    s.camera_shake = Default::default();
    s.ground_shake = Default::default();
    s.camera.begin_final();

    let started = match outcome {
        Outcome::Win => s.ending.start_win(),
        Outcome::Lose => s.ending.start_lose(&s.world),
    };
    if let Err(e) = started {
        log::warn!("{}", e);
    }
}

fn show_result(s: &mut Session, outcome: Outcome) {
    s.result = Some(outcome);
    let (heading, message) = match outcome {
        Outcome::Win => (s.text(UiText::HeadingWin), s.text(UiText::EndingWin)),
        Outcome::Lose => (s.text(UiText::HeadingLose), s.text(UiText::EndingLose)),
    };
    log::info!("Result: {}", heading);

    s.restart_visible = false;
    let Some(o) = s.overlay.as_deref_mut() else {
        show_restart(s);
        return;
    };
    o.show_result(outcome, heading);
    o.set_restart_visible(false);
    s.typewriter.start(message);
    if let Some(first) = s.typewriter.advance(0.0) {
        o.set_result_message(&first.text, !first.done);
    }
}

fn show_restart(s: &mut Session) {
    s.restart_visible = true;
    if let Some(o) = s.overlay.as_deref_mut() {
        o.set_restart_visible(true);
    }
}

fn update_title(s: &mut Session, dt: f32) {
    let d = &s.config.drop_text;
    for impact in s.drop_text.update(dt) {
        s.camera_shake.raise(d.impact_shake, d.impact_shake_duration);
        s.ground_shake.raise(d.ground_shake, d.ground_shake_duration);
        if impact.first {
            s.audio.play_title_impact();
        }
    }
    s.camera_shake.advance(dt);
    s.ground_shake.advance(dt);
}
