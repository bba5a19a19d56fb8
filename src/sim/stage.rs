//! Stage controller
//!
//! Discrete user events and timer callbacks come in as `Action`s. State is
//! updated synchronously and the host gets back a list of `GameEvent`s, the
//! side effects it must carry out (timers, shake, confetti).

use super::state::{GameState, IntroChoice, Stage};

/// A discrete event from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Intro card answer
    Answer(IntroChoice),
    /// "Start the game" on the response card
    StartGame,
    /// Click on heart `id`
    ClickHeart(usize),
    /// Close the message overlay (close button or backdrop)
    CloseNote,
    /// Help button pressed
    RequestHelp,
    /// "Yes" on the final prompt
    Accept,
    /// "No" on the final prompt
    Decline,
    /// Help delay timer elapsed
    HelperTimerFired(u32),
    /// Page went into the background (bfcache, unload); pending timers stop
    Suspend,
    /// Page came back from the back/forward cache
    Resume,
}

/// Side effect for the host to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    StageChanged { from: Stage, to: Stage },
    NoteOpened { heart: usize },
    NoteClosed,
    /// Start a one-shot timer that dispatches `HelperTimerFired(token)`
    ArmHelperTimer { token: u32, delay_ms: u32 },
    /// Cancel the timer armed with `token`
    CancelHelperTimer { token: u32 },
    HelperShown,
    RunnerFrozen { heart: usize },
    /// Wiggle the final prompt card
    ShakePrompt,
    /// Fire the celebration bursts
    Celebrate,
}

impl GameState {
    /// Apply one action and return the side effects it produced
    pub fn dispatch(&mut self, action: Action) -> Vec<GameEvent> {
        let mut events = Vec::new();

        match action {
            Action::Answer(choice) => {
                if self.stage == Stage::Intro {
                    self.intro_line = match choice {
                        IntroChoice::Yes => self.settings.intro_yes_line.clone(),
                        IntroChoice::No => self.settings.intro_no_line.clone(),
                    };
                    log::debug!("Intro answered {:?}", choice);
                    self.advance(Stage::IntroResponse, &mut events);
                }
            }
            Action::StartGame => {
                if self.stage == Stage::IntroResponse {
                    self.advance(Stage::Playing, &mut events);
                }
            }
            Action::ClickHeart(id) => self.click_heart(id, &mut events),
            Action::CloseNote => {
                if self.note.take().is_some() {
                    events.push(GameEvent::NoteClosed);
                }
            }
            Action::RequestHelp => self.request_help(&mut events),
            Action::Accept => {
                if self.stage == Stage::Unlocked {
                    self.advance(Stage::Accepted, &mut events);
                    events.push(GameEvent::Celebrate);
                    log::info!("Accepted! 💘");
                }
            }
            Action::Decline => {
                if self.stage == Stage::Unlocked && !self.settings.reduced_motion {
                    events.push(GameEvent::ShakePrompt);
                }
            }
            Action::HelperTimerFired(token) => {
                if token == self.helper.token
                    && self.evasive_condition()
                    && !self.helper.active
                    && !self.helper.ready
                {
                    self.helper.ready = true;
                    events.push(GameEvent::HelperShown);
                    log::info!("Help offered");
                } else {
                    log::debug!("Ignoring stale helper timer {}", token);
                }
            }
            Action::Suspend => {
                if self.helper_timer_pending() {
                    log::debug!("Suspended, helper timer {} cancelled", self.helper.token);
                    events.push(GameEvent::CancelHelperTimer {
                        token: self.helper.token,
                    });
                }
            }
            Action::Resume => {
                // Restarts the full delay; the old token is dead
                if self.helper_timer_pending() {
                    self.arm_helper(&mut events);
                }
            }
        }

        self.sync_helper(&mut events);
        events
    }

    fn advance(&mut self, to: Stage, events: &mut Vec<GameEvent>) {
        let from = self.stage;
        self.stage = to;
        log::info!("Stage {} -> {}", from.as_str(), to.as_str());
        events.push(GameEvent::StageChanged { from, to });
    }

    fn click_heart(&mut self, id: usize, events: &mut Vec<GameEvent>) {
        if self.stage != Stage::Playing || self.note.is_some() {
            return;
        }
        let Some(heart) = self.hearts.get_mut(id) else {
            return;
        };
        if heart.collected {
            return;
        }

        heart.collected = true;
        let message = heart.message.clone();
        let collected = self.collected_count();
        log::debug!("Heart {} collected ({}/{})", id, collected, self.total());

        if collected >= self.total() {
            self.note = None;
            self.advance(Stage::Unlocked, events);
            return;
        }

        self.note = Some(message);
        events.push(GameEvent::NoteOpened { heart: id });
    }

    fn request_help(&mut self, events: &mut Vec<GameEvent>) {
        if !self.helper_visible() {
            return;
        }
        let Some(runner) = self.runner() else {
            return;
        };

        self.helper.active = true;
        self.helper.ready = false;
        self.hearts[runner].freeze_at_center();
        log::info!("Help used, heart {} frozen", runner);
        events.push(GameEvent::RunnerFrozen { heart: runner });
    }

    /// A help delay should be counting down
    pub fn helper_timer_pending(&self) -> bool {
        self.evasive_condition() && !self.helper.ready && !self.helper.active
    }

    fn arm_helper(&mut self, events: &mut Vec<GameEvent>) {
        self.helper.token = self.helper.token.wrapping_add(1);
        log::debug!("Last heart is running, helper timer {} armed", self.helper.token);
        events.push(GameEvent::ArmHelperTimer {
            token: self.helper.token,
            delay_ms: self.settings.help_delay_ms,
        });
    }

    /// Arm or cancel the help delay on edges of the evasive condition
    fn sync_helper(&mut self, events: &mut Vec<GameEvent>) {
        let evasive = self.evasive_condition();
        if evasive == self.helper.was_evasive {
            return;
        }
        self.helper.was_evasive = evasive;

        if evasive {
            self.helper.ready = false;
            self.arm_helper(events);
        } else {
            self.helper.ready = false;
            self.helper.active = false;
            log::debug!("Chase over, helper timer {} cancelled", self.helper.token);
            events.push(GameEvent::CancelHelperTimer {
                token: self.helper.token,
            });
        }
    }
}
