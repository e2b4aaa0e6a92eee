//! Narration-driven story timeline.
//!
//! The controller polls the narration clock every frame. It picks the active
//! subtitle, fires the ending exactly once when playback enters the trigger
//! window, and owns the deferred follow-ups (guidance fade, result overlay) as
//! frame-delta countdowns.

use audio::PlaybackStatus;

use crate::config::NarrativeConfig;
use crate::scheduler::Scheduler;

/// One timed line of narration text.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtitle {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Subtitle {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

/// First subtitle whose closed interval contains `time`.
pub fn active_subtitle(subtitles: &[Subtitle], time: f64) -> Option<&Subtitle> {
    subtitles.iter().find(|s| s.contains(time))
}

/// `m:ss` of the remaining narration, or `None` when the timer should be hidden.
pub fn narration_timer(status: &PlaybackStatus, final_moment_active: bool) -> Option<String> {
    if final_moment_active || status.ended || !status.is_playing() {
        return None;
    }
    let remain = status.remaining()?;
    let minutes = (remain / 60.0).floor() as u64;
    let seconds = (remain % 60.0).floor() as u64;
    Some(format!("{minutes}:{seconds:02}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrativeState {
    #[default]
    Intro,
    Narrating,
    EndingTriggerWindow,
    /// Result overlay shown.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeEvent {
    /// The ending window was entered. Fired once per session.
    FinalMoment { outcome: Outcome },
    FadeOutGuidance,
    ShowResult(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    FadeOutGuidance,
    ShowResult(Outcome),
}

#[derive(Debug)]
pub struct NarrativeController {
    config: NarrativeConfig,
    subtitles: Vec<Subtitle>,
    state: NarrativeState,
    outcome: Option<Outcome>,
    tasks: Scheduler<Deferred>,
}

impl NarrativeController {
    pub fn new(config: NarrativeConfig, subtitles: Vec<Subtitle>) -> Self {
        Self {
            config,
            subtitles,
            state: NarrativeState::Intro,
            outcome: None,
            tasks: Scheduler::new(),
        }
    }

    pub fn state(&self) -> NarrativeState {
        self.state
    }

    /// The latched outcome, once the ending fired.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn final_moment_active(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    pub fn set_subtitles(&mut self, subtitles: Vec<Subtitle>) {
        self.subtitles = subtitles;
    }

    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    /// Intro finished; the story proper begins.
    pub fn finish_intro(&mut self) {
        if self.state == NarrativeState::Intro {
            self.state = NarrativeState::Narrating;
        }
    }

    /// Whether `time` lies in the inclusive ending window.
    pub fn in_window(&self, time: f64) -> bool {
        let [start, end] = self.config.ending_window;
        start <= time && time <= end
    }

    /// Win iff the character has crossed the goal threshold.
    pub fn decide(&self, character_x: f32) -> Outcome {
        if character_x <= self.config.goal_x_threshold {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }

    /// Subtitle to show for this narration state, if any.
    pub fn subtitle(&self, status: Option<&PlaybackStatus>) -> Option<&str> {
        if self.final_moment_active() {
            return None;
        }
        let status = status.filter(|s| s.is_playing())?;
        active_subtitle(&self.subtitles, status.current_time).map(|s| s.text.as_str())
    }

    /// Per-frame step. `status` is `None` without a narration track, in which
    /// case only already-scheduled follow-ups advance. `ending_idle` is false
    /// once any ending motion has been started elsewhere.
    pub fn update(
        &mut self,
        dt: f32,
        status: Option<&PlaybackStatus>,
        character_x: f32,
        ending_idle: bool,
    ) -> Vec<NarrativeEvent> {
        let mut events = Vec::new();

        if let Some(status) = status {
            let can_fire = self.state == NarrativeState::Narrating
                && self.outcome.is_none()
                && ending_idle
                && !self.config.debug_always_show
                && self.in_window(status.current_time);
            if can_fire {
                let outcome = self.decide(character_x);
                log::info!(
                    "Ending window reached at {:.2}s: x = {:.2}, threshold = {:.2} -> {:?}",
                    status.current_time,
                    character_x,
                    self.config.goal_x_threshold,
                    outcome
                );
                self.outcome = Some(outcome);
                self.state = NarrativeState::EndingTriggerWindow;
                self.tasks
                    .schedule(self.config.guidance_fade_delay, Deferred::FadeOutGuidance);
                self.tasks
                    .schedule(self.config.result_delay, Deferred::ShowResult(outcome));
                events.push(NarrativeEvent::FinalMoment { outcome });
            }
        }

        for task in self.tasks.advance(dt) {
            match task {
                Deferred::FadeOutGuidance => events.push(NarrativeEvent::FadeOutGuidance),
                Deferred::ShowResult(outcome) => {
                    self.state = NarrativeState::Ended;
                    events.push(NarrativeEvent::ShowResult(outcome));
                }
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(t: f64) -> PlaybackStatus {
        PlaybackStatus {
            current_time: t,
            duration: 60.0,
            paused: false,
            ended: false,
        }
    }

    fn controller() -> NarrativeController {
        NarrativeController::new(
            NarrativeConfig::default(),
            vec![Subtitle::new(0.0, 4.0, "A"), Subtitle::new(5.5, 10.0, "B")],
        )
    }

    #[test]
    fn subtitle_lookup() {
        let subs = vec![Subtitle::new(0.0, 4.0, "A"), Subtitle::new(5.5, 10.0, "B")];
        assert_eq!(active_subtitle(&subs, 4.5), None);
        assert_eq!(active_subtitle(&subs, 2.0).map(|s| s.text.as_str()), Some("A"));
        assert_eq!(active_subtitle(&subs, 6.0).map(|s| s.text.as_str()), Some("B"));
    }

    #[test]
    fn overlapping_entries_resolve_by_order() {
        let subs = vec![Subtitle::new(0.0, 5.0, "first"), Subtitle::new(4.0, 8.0, "second")];
        assert_eq!(active_subtitle(&subs, 4.5).map(|s| s.text.as_str()), Some("first"));
    }

    #[test]
    fn subtitles_only_while_playing() {
        let c = controller();
        let mut paused = playing(2.0);
        paused.paused = true;
        assert_eq!(c.subtitle(Some(&paused)), None);
        assert_eq!(c.subtitle(None), None);
        assert_eq!(c.subtitle(Some(&playing(2.0))), Some("A"));
    }

    #[test]
    fn ending_fires_once_and_never_flips() {
        let mut c = controller();
        c.finish_intro();
        assert!(c.update(0.016, Some(&playing(35.9)), -120.0, true).is_empty());

        let events = c.update(0.016, Some(&playing(36.0)), -120.0, true);
        assert_eq!(events, vec![NarrativeEvent::FinalMoment { outcome: Outcome::Win }]);
        assert_eq!(c.state(), NarrativeState::EndingTriggerWindow);

        // Still in the window, now on the losing side: nothing new fires.
        for _ in 0..10 {
            let again = c.update(0.01, Some(&playing(37.0)), 50.0, true);
            assert!(!again.iter().any(|e| matches!(e, NarrativeEvent::FinalMoment { .. })));
        }
        // Narration restarted without a full reset.
        let replay = c.update(0.01, Some(&playing(36.5)), 50.0, true);
        assert!(!replay.iter().any(|e| matches!(e, NarrativeEvent::FinalMoment { .. })));
        assert_eq!(c.outcome(), Some(Outcome::Win));
    }

    #[test]
    fn follow_ups_fire_after_their_delays() {
        let mut c = controller();
        c.finish_intro();
        c.update(0.0, Some(&playing(37.0)), 0.0, true);
        let mut fired = Vec::new();
        for _ in 0..40 {
            fired.extend(c.update(0.1, None, 0.0, true));
        }
        assert_eq!(
            fired,
            vec![NarrativeEvent::FadeOutGuidance, NarrativeEvent::ShowResult(Outcome::Lose)]
        );
        assert_eq!(c.state(), NarrativeState::Ended);
    }

    #[test]
    fn busy_ending_or_debug_blocks_trigger() {
        let mut c = controller();
        c.finish_intro();
        assert!(c.update(0.0, Some(&playing(36.5)), 0.0, false).is_empty());

        let mut debug = NarrativeController::new(
            NarrativeConfig {
                debug_always_show: true,
                ..Default::default()
            },
            Vec::new(),
        );
        debug.finish_intro();
        assert!(debug.update(0.0, Some(&playing(36.5)), 0.0, true).is_empty());
    }

    #[test]
    fn ending_waits_for_the_intro_to_finish() {
        let mut c = controller();
        assert!(c.update(0.016, Some(&playing(36.5)), -120.0, true).is_empty());
        assert_eq!(c.state(), NarrativeState::Intro);

        c.finish_intro();
        let events = c.update(0.016, Some(&playing(36.5)), -120.0, true);
        assert_eq!(events, vec![NarrativeEvent::FinalMoment { outcome: Outcome::Win }]);
        assert_eq!(c.state(), NarrativeState::EndingTriggerWindow);
    }

    #[test]
    fn missing_narration_is_a_noop() {
        let mut c = controller();
        assert!(c.update(1.0, None, -500.0, true).is_empty());
        assert_eq!(c.outcome(), None);
    }

    #[test]
    fn timer_formatting_and_gating() {
        let status = playing(50.5);
        assert_eq!(narration_timer(&status, false).as_deref(), Some("0:09"));
        assert_eq!(narration_timer(&status, true), None);

        let long = PlaybackStatus {
            current_time: 1.0,
            duration: 130.0,
            paused: false,
            ended: false,
        };
        assert_eq!(narration_timer(&long, false).as_deref(), Some("2:09"));

        let unknown = PlaybackStatus {
            duration: f64::NAN,
            ..playing(3.0)
        };
        assert_eq!(narration_timer(&unknown, false), None);
    }
}
