//! Game state and core simulation types
//!
//! Only canonical state is stored. Anything derivable (the evasive condition,
//! which heart is running, the collected count) is computed on demand.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::motion::spawn_heart;
use crate::field_center;
use crate::settings::Settings;

/// Linear progression of the game. There are no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    /// "Do you wanna be my Valentine?" fake-out
    Intro,
    /// Response line to the intro answer, with a start button
    IntroResponse,
    /// Hearts are clickable
    Playing,
    /// All hearts collected, final prompt is up
    Unlocked,
    /// Final prompt accepted (terminal)
    Accepted,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Intro => "intro",
            Stage::IntroResponse => "intro-response",
            Stage::Playing => "playing",
            Stage::Unlocked => "unlocked",
            Stage::Accepted => "accepted",
        }
    }
}

/// Answer picked on the intro card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntroChoice {
    Yes,
    No,
}

/// A heart target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heart {
    pub id: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Diameter in field units
    pub size: f32,
    /// Once set, never cleared
    pub collected: bool,
    pub message: String,
}

impl Heart {
    /// Pin the heart to the field center with no velocity
    pub fn freeze_at_center(&mut self) {
        self.pos = field_center();
        self.vel = Vec2::ZERO;
    }
}

/// Helper affordance flags shown during the last-heart chase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HelperState {
    /// Help button visible
    pub ready: bool,
    /// Help was used; the runner is frozen at the center
    pub active: bool,
    /// Token of the currently armed delay timer (bumped on every arm)
    pub token: u32,
    /// Evasive condition as of the last sync, for edge detection
    #[serde(skip)]
    pub(crate) was_evasive: bool,
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub stage: Stage,
    pub hearts: Vec<Heart>,
    /// Message overlay text, if one is open
    pub note: Option<String>,
    /// Response line chosen by the intro answer
    pub intro_line: String,
    /// Last known pointer position in field coordinates
    pub pointer: Vec2,
    pub helper: HelperState,
    #[serde(skip)]
    pub(crate) settings: Settings,
}

impl GameState {
    /// Create a fresh session with randomly placed hearts
    pub fn new<R: Rng + ?Sized>(settings: Settings, rng: &mut R) -> Self {
        let settings = settings.sanitized();
        let hearts = (0..settings.total_hearts)
            .map(|id| spawn_heart(id, settings.message_for(id), rng))
            .collect();

        Self {
            stage: Stage::Intro,
            hearts,
            note: None,
            intro_line: String::new(),
            pointer: field_center(),
            helper: HelperState::default(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn total(&self) -> usize {
        self.hearts.len()
    }

    pub fn collected_count(&self) -> usize {
        self.hearts.iter().filter(|h| h.collected).count()
    }

    /// True while exactly one heart is left and the game is still in play
    pub fn evasive_condition(&self) -> bool {
        self.stage == Stage::Playing && self.collected_count() + 1 == self.total()
    }

    /// Id of the heart that flees the cursor, if the evasive condition holds
    pub fn runner(&self) -> Option<usize> {
        if !self.evasive_condition() {
            return None;
        }
        self.hearts.iter().find(|h| !h.collected).map(|h| h.id)
    }

    /// Runner is pinned to the center (help was used)
    pub fn runner_frozen(&self) -> bool {
        self.helper.active && self.evasive_condition()
    }

    /// Hearts are drawn from the moment play starts
    pub fn hearts_visible(&self) -> bool {
        self.stage >= Stage::Playing
    }

    /// Help button should be shown
    pub fn helper_visible(&self) -> bool {
        self.evasive_condition() && self.helper.ready && !self.helper.active
    }

    /// Badge text, e.g. "Collected: 3/7"
    pub fn progress_label(&self) -> String {
        let total = self.total();
        format!("Collected: {}/{}", self.collected_count().min(total), total)
    }

    /// Record the latest pointer position (last write wins)
    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn new_state() -> GameState {
        let mut rng = Pcg32::seed_from_u64(7);
        GameState::new(Settings::default(), &mut rng)
    }

    #[test]
    fn test_new_state() {
        let state = new_state();
        assert_eq!(state.stage, Stage::Intro);
        assert_eq!(state.total(), 7);
        assert_eq!(state.collected_count(), 0);
        assert!(state.note.is_none());
        assert_eq!(state.pointer, field_center());
        for (i, h) in state.hearts.iter().enumerate() {
            assert_eq!(h.id, i);
            assert!(!h.collected);
        }
        assert!(state.hearts[0].message.starts_with("Reason #1"));
        assert!(state.hearts[6].message.starts_with("Reason #7"));
    }

    #[test]
    fn test_evasive_condition_needs_playing_stage() {
        let mut state = new_state();
        for h in state.hearts.iter_mut().take(6) {
            h.collected = true;
        }
        assert!(!state.evasive_condition());
        assert_eq!(state.runner(), None);

        state.stage = Stage::Playing;
        assert!(state.evasive_condition());
        assert_eq!(state.runner(), Some(6));
    }

    #[test]
    fn test_runner_is_lowest_uncollected() {
        let mut state = new_state();
        state.stage = Stage::Playing;
        for id in [0, 1, 2, 4, 5, 6] {
            state.hearts[id].collected = true;
        }
        assert_eq!(state.runner(), Some(3));
    }

    #[test]
    fn test_progress_label() {
        let mut state = new_state();
        state.hearts[0].collected = true;
        state.hearts[3].collected = true;
        assert_eq!(state.progress_label(), "Collected: 2/7");
    }

    #[test]
    fn test_messages_wrap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let settings = Settings {
            total_hearts: 4,
            messages: vec!["a".into(), "b".into(), "c".into()],
            ..Default::default()
        };
        let state = GameState::new(settings, &mut rng);
        let messages: Vec<&str> = state.hearts.iter().map(|h| h.message.as_str()).collect();
        assert_eq!(messages, ["a", "b", "c", "a"]);
    }
}
