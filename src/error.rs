use thiserror::Error;

/// Reasons a game cannot be started from the setup screen.
///
/// None of these change the game phase; the front end shows the message and
/// stays on the setup screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("please enter your name")]
    EmptyName,
    #[error("please select at least one category")]
    NoCategories,
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("no questions found for the selected categories and difficulty")]
    NoQuestions,
}

/// Failures while loading a question bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("could not read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid question {index} in category '{category}': {reason}")]
    InvalidQuestion {
        category: String,
        index: usize,
        reason: String,
    },
    #[error("question bank has no categories")]
    Empty,
}
