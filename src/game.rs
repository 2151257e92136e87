use std::collections::BTreeSet;
use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::bank::{Difficulty, QuestionBank, QuestionRecord};
use crate::error::ConfigError;
use crate::selector;

pub const DEFAULT_QUESTION_SECS: u32 = 30;
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(2_000);

/// Tunables that were fixed constants in the browser game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub question_secs: u32,
    pub feedback_delay: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            question_secs: DEFAULT_QUESTION_SECS,
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
        }
    }
}

/// What the player submitted on the setup screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub categories: BTreeSet<String>,
    pub music_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Phase {
    #[default]
    Setup,
    Question,
    Feedback,
    GameOver,
}

/// Result of the last question, shown during feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Correct { points: u32 },
    Wrong { correct_answer: String },
    TimeUp { correct_answer: String },
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::Correct { points } => format!("✨ Correct! +{points}"),
            Outcome::Wrong { correct_answer } => {
                format!("👻 Wrong! Correct answer: {correct_answer}")
            }
            Outcome::TimeUp { correct_answer } => {
                format!("⏰ Time's up! Correct answer: {correct_answer}")
            }
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Start,
    Correct,
    Incorrect,
    Congrats,
}

/// Side effects requested by a transition; the engine carries them out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    StartTimer(u32),
    StopTimer,
    ScheduleAdvance(Duration),
    CancelAdvance,
    Sound(Sound),
    StartMusic,
    StopMusic,
    Celebrate,
}

/// In-game events. Starting a game is separate since it can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    SelectAnswer(usize),
    TimerExpired,
    Advance,
    PlayAgain,
    Quit,
}

/// One play-through, from setup to game over
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub config: Option<SessionConfig>,
    pub questions: Vec<QuestionRecord>,
    pub current_index: usize,
    pub score: u32,
    pub correct_answers: usize,
    pub phase: Phase,
    pub last_outcome: Option<Outcome>,
}

impl Session {
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        match self.phase {
            Phase::Question | Phase::Feedback => self.questions.get(self.current_index),
            Phase::Setup | Phase::GameOver => None,
        }
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Best possible score for this session
    pub fn max_score(&self) -> u32 {
        let per_question = self
            .config
            .as_ref()
            .map_or(0, |c| c.difficulty.points());
        per_question * self.questions.len() as u32
    }
}

/// The quiz state machine.
///
/// Transitions only mutate the session and return the effects they need;
/// timers, sounds and rendering happen elsewhere.
#[derive(Debug, Clone)]
pub struct Game {
    bank: QuestionBank,
    settings: GameSettings,
    session: Session,
}

impl Game {
    pub fn new(bank: QuestionBank, settings: GameSettings) -> Self {
        Self {
            bank,
            settings,
            session: Session::default(),
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Validate the setup and begin the first question. On error nothing
    /// changes and the game stays in setup.
    pub fn start_game<R: Rng + ?Sized>(
        &mut self,
        mut config: SessionConfig,
        rng: &mut R,
    ) -> Result<Vec<Effect>, ConfigError> {
        if self.session.phase != Phase::Setup {
            return Ok(Vec::new());
        }

        config.player_name = config.player_name.trim().to_string();
        if config.player_name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if config.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        let questions = selector::select(
            &self.bank,
            config.difficulty,
            config.categories.iter().map(String::as_str),
            rng,
        )?;

        info!(
            "{} starts a {} game with {} questions from {:?}",
            config.player_name,
            config.difficulty,
            questions.len(),
            config.categories
        );

        let mut effects = vec![Effect::Sound(Sound::Start)];
        if config.music_enabled {
            effects.push(Effect::StartMusic);
        }
        effects.push(Effect::StartTimer(self.settings.question_secs));

        self.session = Session {
            config: Some(config),
            questions,
            phase: Phase::Question,
            ..Session::default()
        };
        Ok(effects)
    }

    pub fn handle(&mut self, event: GameEvent) -> Vec<Effect> {
        match event {
            GameEvent::SelectAnswer(idx) => self.select_answer(idx),
            GameEvent::TimerExpired => self.timer_expired(),
            GameEvent::Advance => self.advance(),
            GameEvent::PlayAgain => self.play_again(),
            GameEvent::Quit => self.quit(),
        }
    }

    pub fn select_answer(&mut self, option_index: usize) -> Vec<Effect> {
        if self.session.phase != Phase::Question {
            return Vec::new();
        }
        let Some(question) = self.session.questions.get(self.session.current_index) else {
            return Vec::new();
        };
        if option_index >= question.options.len() {
            return Vec::new();
        }

        let outcome = if question.correct_index() == Some(option_index) {
            let points = self.difficulty().points();
            self.session.score += points;
            self.session.correct_answers += 1;
            Outcome::Correct { points }
        } else {
            Outcome::Wrong {
                correct_answer: question.correct_answer.clone(),
            }
        };
        let sound = if outcome.is_correct() {
            Sound::Correct
        } else {
            Sound::Incorrect
        };
        self.enter_feedback(outcome, sound)
    }

    pub fn timer_expired(&mut self) -> Vec<Effect> {
        if self.session.phase != Phase::Question {
            return Vec::new();
        }
        let Some(question) = self.session.questions.get(self.session.current_index) else {
            return Vec::new();
        };
        let outcome = Outcome::TimeUp {
            correct_answer: question.correct_answer.clone(),
        };
        self.enter_feedback(outcome, Sound::Incorrect)
    }

    pub fn advance(&mut self) -> Vec<Effect> {
        if self.session.phase != Phase::Feedback {
            return Vec::new();
        }
        self.session.current_index += 1;
        if self.session.current_index >= self.session.questions.len() {
            self.session.phase = Phase::GameOver;
            info!(
                "game over: {} scored {}",
                self.player_name(),
                self.session.score
            );
            vec![
                Effect::StopMusic,
                Effect::Sound(Sound::Congrats),
                Effect::Celebrate,
            ]
        } else {
            self.session.phase = Phase::Question;
            debug!(
                "question {}/{}",
                self.session.current_index + 1,
                self.session.questions.len()
            );
            vec![Effect::StartTimer(self.settings.question_secs)]
        }
    }

    pub fn play_again(&mut self) -> Vec<Effect> {
        if self.session.phase != Phase::GameOver {
            return Vec::new();
        }
        self.session = Session::default();
        debug!("back to setup");
        vec![Effect::StopTimer, Effect::CancelAdvance]
    }

    pub fn quit(&mut self) -> Vec<Effect> {
        vec![Effect::StopTimer, Effect::CancelAdvance, Effect::StopMusic]
    }

    fn enter_feedback(&mut self, outcome: Outcome, sound: Sound) -> Vec<Effect> {
        debug!(
            "question {} answered: {:?}",
            self.session.current_index + 1,
            outcome
        );
        self.session.phase = Phase::Feedback;
        self.session.last_outcome = Some(outcome);
        vec![
            Effect::StopTimer,
            Effect::Sound(sound),
            Effect::ScheduleAdvance(self.settings.feedback_delay),
        ]
    }

    fn difficulty(&self) -> Difficulty {
        self.session
            .config
            .as_ref()
            .map(|c| c.difficulty)
            .unwrap_or_default()
    }

    fn player_name(&self) -> &str {
        self.session
            .config
            .as_ref()
            .map_or("", |c| c.player_name.as_str())
    }
}
