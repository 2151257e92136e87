use std::collections::BTreeSet;

use unicode_width::UnicodeWidthStr;

use crate::bank::{Difficulty, QuestionBank};
use crate::game::SessionConfig;

pub const MAX_NAME_WIDTH: usize = 24;

/// Focusable rows of the setup screen, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Difficulty,
    Category(usize),
    Music,
}

/// Editable state of the setup screen
#[derive(Debug, Clone, PartialEq)]
pub struct SetupForm {
    pub name: String,
    pub difficulty: Difficulty,
    /// Every bank category with its checked state; all start checked
    pub categories: Vec<(String, bool)>,
    pub music_enabled: bool,
    pub focus: Field,
    pub error: Option<String>,
}

impl SetupForm {
    pub fn new(bank: &QuestionBank) -> Self {
        Self {
            name: String::new(),
            difficulty: Difficulty::default(),
            categories: bank.categories().map(|c| (c.to_string(), true)).collect(),
            music_enabled: true,
            focus: Field::Name,
            error: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_music(mut self, enabled: bool) -> Self {
        self.music_enabled = enabled;
        self
    }

    /// Check exactly the given categories. Unknown names are kept so that
    /// starting the game reports them.
    pub fn with_categories<I, S>(mut self, selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selected: BTreeSet<String> = selected.into_iter().map(Into::into).collect();
        for (name, checked) in &mut self.categories {
            *checked = selected.contains(name);
        }
        for name in selected {
            if !self.categories.iter().any(|(c, _)| *c == name) {
                self.categories.push((name, true));
            }
        }
        self
    }

    pub fn push_char(&mut self, c: char) {
        if self.focus != Field::Name || c.is_control() {
            return;
        }
        let mut candidate = self.name.clone();
        candidate.push(c);
        if candidate.width() <= MAX_NAME_WIDTH {
            self.name = candidate;
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if self.focus == Field::Name {
            self.name.pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::Difficulty,
            Field::Difficulty if self.categories.is_empty() => Field::Music,
            Field::Difficulty => Field::Category(0),
            Field::Category(i) if i + 1 < self.categories.len() => Field::Category(i + 1),
            Field::Category(_) => Field::Music,
            Field::Music => Field::Name,
        };
    }

    pub fn focus_previous(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::Music,
            Field::Difficulty => Field::Name,
            Field::Category(0) => Field::Difficulty,
            Field::Category(i) => Field::Category(i - 1),
            Field::Music if self.categories.is_empty() => Field::Difficulty,
            Field::Music => Field::Category(self.categories.len() - 1),
        };
    }

    /// Left/right on the difficulty row
    pub fn cycle_difficulty(&mut self, forward: bool) {
        if self.focus == Field::Difficulty {
            self.difficulty = if forward {
                self.difficulty.next()
            } else {
                self.difficulty.previous()
            };
        }
    }

    /// Space on a checkbox row
    pub fn toggle(&mut self) {
        match self.focus {
            Field::Category(i) => {
                if let Some((_, checked)) = self.categories.get_mut(i) {
                    *checked = !*checked;
                    self.error = None;
                }
            }
            Field::Music => self.music_enabled = !self.music_enabled,
            Field::Name | Field::Difficulty => {}
        }
    }

    pub fn selected_categories(&self) -> BTreeSet<String> {
        self.categories
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn to_config(&self) -> SessionConfig {
        SessionConfig {
            player_name: self.name.clone(),
            difficulty: self.difficulty,
            categories: self.selected_categories(),
            music_enabled: self.music_enabled,
        }
    }

    /// Fresh form for a replay, keeping the previous choices except the name
    pub fn reset_for_replay(&mut self) {
        self.name.clear();
        self.focus = Field::Name;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn bank() -> QuestionBank {
        let q = crate::bank::QuestionRecord {
            prompt: "Q".into(),
            options: vec!["a".into(), "b".into()],
            correct_answer: "a".into(),
            difficulty: None,
        };
        let mut categories = BTreeMap::new();
        categories.insert("candy".to_string(), vec![q.clone()]);
        categories.insert("movies".to_string(), vec![q]);
        QuestionBank::new(categories).unwrap()
    }

    #[test]
    fn starts_with_every_category_checked() {
        let form = SetupForm::new(&bank());
        assert_eq!(
            form.selected_categories(),
            BTreeSet::from(["candy".to_string(), "movies".to_string()])
        );
        assert_eq!(form.focus, Field::Name);
        assert!(form.music_enabled);
    }

    #[test]
    fn typing_only_edits_the_name_field() {
        let mut form = SetupForm::new(&bank());
        for c in "Al".chars() {
            form.push_char(c);
        }
        form.push_char('\n');
        assert_eq!(form.name, "Al");

        form.focus_next();
        form.push_char('x');
        form.backspace();
        assert_eq!(form.name, "Al");
    }

    #[test]
    fn name_width_is_capped() {
        let mut form = SetupForm::new(&bank());
        for _ in 0..40 {
            form.push_char('w');
        }
        assert_eq!(form.name.width(), MAX_NAME_WIDTH);
    }

    #[test]
    fn focus_walks_every_row_and_wraps() {
        let mut form = SetupForm::new(&bank());
        let mut seen = vec![form.focus];
        for _ in 0..4 {
            form.focus_next();
            seen.push(form.focus);
        }
        assert_eq!(
            seen,
            vec![
                Field::Name,
                Field::Difficulty,
                Field::Category(0),
                Field::Category(1),
                Field::Music
            ]
        );
        form.focus_next();
        assert_eq!(form.focus, Field::Name);
        form.focus_previous();
        assert_eq!(form.focus, Field::Music);
        form.focus_previous();
        assert_eq!(form.focus, Field::Category(1));
    }

    #[test]
    fn toggles_and_difficulty_follow_focus() {
        let mut form = SetupForm::new(&bank());
        form.cycle_difficulty(true);
        assert_eq!(form.difficulty, Difficulty::Medium);

        form.focus_next();
        form.cycle_difficulty(true);
        assert_eq!(form.difficulty, Difficulty::Hard);

        form.focus_next();
        form.toggle();
        assert_eq!(
            form.selected_categories(),
            BTreeSet::from(["movies".to_string()])
        );

        form.focus = Field::Music;
        form.toggle();
        assert!(!form.to_config().music_enabled);
    }

    #[test]
    fn builder_preselects_categories() {
        let form = SetupForm::new(&bank())
            .with_name("Al")
            .with_difficulty(Difficulty::Easy)
            .with_categories(["movies", "ghosts"])
            .with_music(false);
        let config = form.to_config();

        assert_eq!(config.player_name, "Al");
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(
            config.categories,
            BTreeSet::from(["ghosts".to_string(), "movies".to_string()])
        );
        assert!(!config.music_enabled);
    }
}
