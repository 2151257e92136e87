use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};

use crate::error::BankError;

static ASSETS_DIR: Dir = include_dir!("assets");

const DEFAULT_BANK_FILE: &str = "questions.json";

/// Question difficulty, also the difficulty a player picks for a session
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Points awarded for a correct answer at this difficulty
    pub fn points(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

/// A single multiple choice question as stored in the bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    /// Absent means the question is offered at every difficulty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl QuestionRecord {
    /// Position of the correct answer within `options`
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_answer)
    }

    /// Whether this question is offered when playing at `difficulty`
    pub fn matches(&self, difficulty: Difficulty) -> bool {
        self.difficulty.map_or(true, |d| d == difficulty)
    }

    fn validate(&self) -> Result<(), String> {
        if self.options.len() < 2 {
            return Err("needs at least 2 options".to_string());
        }
        match self
            .options
            .iter()
            .filter(|o| **o == self.correct_answer)
            .count()
        {
            0 => Err(format!(
                "correct answer '{}' is not one of the options",
                self.correct_answer
            )),
            1 => Ok(()),
            _ => Err(format!(
                "correct answer '{}' appears more than once",
                self.correct_answer
            )),
        }
    }
}

/// Category name to ordered questions. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionBank {
    categories: BTreeMap<String, Vec<QuestionRecord>>,
}

impl QuestionBank {
    /// The bank shipped inside the binary
    pub fn embedded() -> Result<Self, BankError> {
        let file = ASSETS_DIR.get_file(DEFAULT_BANK_FILE).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("embedded {DEFAULT_BANK_FILE} missing"),
            )
        })?;
        let contents = file.contents_utf8().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("embedded {DEFAULT_BANK_FILE} is not utf-8"),
            )
        })?;
        Self::from_json_str(contents)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(s: &str) -> Result<Self, BankError> {
        let categories: BTreeMap<String, Vec<QuestionRecord>> = serde_json::from_str(s)?;
        Self::new(categories)
    }

    pub fn new(categories: BTreeMap<String, Vec<QuestionRecord>>) -> Result<Self, BankError> {
        if categories.is_empty() {
            return Err(BankError::Empty);
        }
        for (category, questions) in &categories {
            for (index, question) in questions.iter().enumerate() {
                question
                    .validate()
                    .map_err(|reason| BankError::InvalidQuestion {
                        category: category.clone(),
                        index,
                        reason,
                    })?;
            }
        }
        Ok(Self { categories })
    }

    /// Category names in sorted order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn get(&self, category: &str) -> Option<&[QuestionRecord]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn embedded_bank_loads() {
        let bank = QuestionBank::embedded().unwrap();
        assert!(!bank.is_empty());
        for category in bank.categories() {
            assert!(!bank.get(category).unwrap().is_empty());
        }
    }

    #[test]
    fn parses_optional_difficulty() {
        let json = r#"
        {
            "monsters": [
                {"question": "Q1", "options": ["a", "b"], "correct_answer": "a", "difficulty": "hard"},
                {"question": "Q2", "options": ["a", "b"], "correct_answer": "b"}
            ]
        }
        "#;
        let bank = QuestionBank::from_json_str(json).unwrap();
        let questions = bank.get("monsters").unwrap();

        assert_eq!(questions[0].prompt, "Q1");
        assert_eq!(questions[0].difficulty, Some(Difficulty::Hard));
        assert_eq!(questions[1].difficulty, None);
        assert_eq!(questions[1].correct_index(), Some(1));
    }

    #[test]
    fn missing_difficulty_matches_everything() {
        let q = QuestionRecord {
            prompt: "Q".into(),
            options: vec!["a".into(), "b".into()],
            correct_answer: "a".into(),
            difficulty: None,
        };
        assert!(Difficulty::ALL.iter().all(|d| q.matches(*d)));

        let hard = QuestionRecord {
            difficulty: Some(Difficulty::Hard),
            ..q
        };
        assert!(hard.matches(Difficulty::Hard));
        assert!(!hard.matches(Difficulty::Easy));
    }

    #[test]
    fn rejects_answer_outside_options() {
        let json = r#"{"candy": [{"question": "Q", "options": ["a", "b"], "correct_answer": "c"}]}"#;
        assert_matches!(
            QuestionBank::from_json_str(json),
            Err(BankError::InvalidQuestion { category, index: 0, .. }) if category == "candy"
        );
    }

    #[test]
    fn rejects_single_option() {
        let json = r#"{"candy": [{"question": "Q", "options": ["a"], "correct_answer": "a"}]}"#;
        assert_matches!(
            QuestionBank::from_json_str(json),
            Err(BankError::InvalidQuestion { .. })
        );
    }

    #[test]
    fn rejects_ambiguous_answer() {
        let json =
            r#"{"candy": [{"question": "Q", "options": ["a", "a", "b"], "correct_answer": "a"}]}"#;
        assert_matches!(
            QuestionBank::from_json_str(json),
            Err(BankError::InvalidQuestion { .. })
        );
    }

    #[test]
    fn rejects_empty_bank_and_bad_json() {
        assert_matches!(QuestionBank::from_json_str("{}"), Err(BankError::Empty));
        assert_matches!(QuestionBank::from_json_str("[1, 2"), Err(BankError::Parse(_)));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            QuestionBank::from_path(dir.path().join("nope.json")),
            Err(BankError::Io(_))
        );
    }

    #[test]
    fn difficulty_points_and_cycling() {
        assert_eq!(Difficulty::Easy.points(), 1);
        assert_eq!(Difficulty::Medium.points(), 2);
        assert_eq!(Difficulty::Hard.points(), 3);
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.previous(), Difficulty::Hard);
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }
}
