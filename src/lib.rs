// Library surface for the binary and for headless/integration tests.
// Nothing in here touches the terminal except `runtime` and `audio`.
pub mod app_dirs;
pub mod audio;
pub mod bank;
pub mod celebration;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod logging;
pub mod runtime;
pub mod schedule;
pub mod selector;
pub mod setup;
pub mod timer;

pub use bank::{Difficulty, QuestionBank, QuestionRecord};
pub use engine::{Cue, Engine};
pub use error::{BankError, ConfigError};
pub use game::{Game, GameSettings, Phase, Session, SessionConfig};
