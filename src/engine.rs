use std::time::Duration;

use log::{debug, warn};
use rand::Rng;

use crate::bank::QuestionBank;
use crate::error::ConfigError;
use crate::game::{Effect, Game, GameEvent, GameSettings, Phase, Session, SessionConfig, Sound};
use crate::schedule::Delay;
use crate::timer::{announcement, CountdownTimer, TimerNotice, TimerState};

/// Presentation-only output for the front end (sounds, music, confetti,
/// timer announcements)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Sound(Sound),
    StartMusic,
    StopMusic,
    Celebrate,
    Announce(String),
}

/// Drives a [`Game`]: runs the countdown and feedback delay it asks for and
/// feeds their expiry back in as events.
#[derive(Debug)]
pub struct Engine {
    game: Game,
    timer: CountdownTimer,
    feedback: Delay,
    cues: Vec<Cue>,
    muted: bool,
    music_wanted: bool,
}

impl Engine {
    pub fn new(bank: QuestionBank, settings: GameSettings) -> Self {
        Self {
            game: Game::new(bank, settings),
            timer: CountdownTimer::new(),
            feedback: Delay::default(),
            cues: Vec::new(),
            muted: false,
            music_wanted: false,
        }
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn session(&self) -> &Session {
        self.game.session()
    }

    pub fn phase(&self) -> Phase {
        self.game.phase()
    }

    pub fn timer(&self) -> TimerState {
        self.timer.state()
    }

    pub fn bank(&self) -> &QuestionBank {
        self.game.bank()
    }

    pub fn settings(&self) -> GameSettings {
        self.game.settings()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn feedback_pending(&self) -> bool {
        self.feedback.is_pending()
    }

    pub fn start_game<R: Rng + ?Sized>(
        &mut self,
        config: SessionConfig,
        rng: &mut R,
    ) -> Result<(), ConfigError> {
        match self.game.start_game(config, rng) {
            Ok(effects) => {
                self.apply(effects);
                Ok(())
            }
            Err(e) => {
                warn!("cannot start game: {e}");
                Err(e)
            }
        }
    }

    pub fn select_answer(&mut self, option_index: usize) {
        self.dispatch(GameEvent::SelectAnswer(option_index));
    }

    pub fn play_again(&mut self) {
        self.dispatch(GameEvent::PlayAgain);
    }

    pub fn quit(&mut self) {
        self.dispatch(GameEvent::Quit);
    }

    pub fn dispatch(&mut self, event: GameEvent) {
        let effects = self.game.handle(event);
        self.apply(effects);
    }

    /// Feed elapsed real time to the countdown and the feedback delay
    pub fn on_elapsed(&mut self, elapsed: Duration) {
        // a delay scheduled by this call's timer expiry starts counting next call
        let feedback_was_pending = self.feedback.is_pending();

        for notice in self.timer.advance(elapsed) {
            match notice {
                TimerNotice::Tick(remaining) => {
                    if let Some(text) = announcement(remaining) {
                        self.cues.push(Cue::Announce(text));
                    }
                }
                TimerNotice::Expired => self.dispatch(GameEvent::TimerExpired),
            }
        }

        if feedback_was_pending && self.feedback.advance(elapsed) {
            self.dispatch(GameEvent::Advance);
        }
    }

    /// Flip the mute preference; returns the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if self.music_wanted {
            self.cues.push(if muted {
                Cue::StopMusic
            } else {
                Cue::StartMusic
            });
        }
    }

    /// Take the cues queued since the last call
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            debug!("effect {effect:?}");
            match effect {
                Effect::StartTimer(secs) => {
                    self.timer.stop();
                    self.timer = CountdownTimer::started(secs);
                    if let Some(text) = announcement(secs) {
                        self.cues.push(Cue::Announce(text));
                    }
                }
                Effect::StopTimer => self.timer.stop(),
                Effect::ScheduleAdvance(after) => self.feedback.schedule(after),
                Effect::CancelAdvance => self.feedback.cancel(),
                Effect::Sound(sound) => {
                    if !self.muted {
                        self.cues.push(Cue::Sound(sound));
                    }
                }
                Effect::StartMusic => {
                    self.music_wanted = true;
                    if !self.muted {
                        self.cues.push(Cue::StartMusic);
                    }
                }
                Effect::StopMusic => {
                    if self.music_wanted && !self.muted {
                        self.cues.push(Cue::StopMusic);
                    }
                    self.music_wanted = false;
                }
                Effect::Celebrate => self.cues.push(Cue::Celebrate),
            }
        }
    }
}
