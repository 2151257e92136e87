mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::warn;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use spookquiz::{
    audio::{AudioSink, TerminalBell},
    celebration::{banner, Confetti},
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
    setup::{Field, SetupForm},
    Cue, Difficulty, Engine, Phase, QuestionBank,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// spooky trivia in your terminal
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A Halloween trivia quiz: pick your categories and difficulty, beat the countdown on every question, and earn 1/2/3 points per correct answer on easy/medium/hard."
)]
pub struct Cli {
    /// question bank json to use instead of the built-in one
    #[clap(short = 'b', long)]
    bank: Option<PathBuf>,

    /// seconds allowed per question
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    secs: Option<u32>,

    /// how long the correct/wrong message stays up, in milliseconds
    #[clap(long)]
    feedback_ms: Option<u64>,

    /// prefill the player name
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// prefill the difficulty
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// preselect a category (repeatable); all are selected when omitted
    #[clap(short = 'c', long = "category")]
    categories: Vec<String>,

    /// start with background music off
    #[clap(long)]
    no_music: bool,

    /// mute all sounds (remembered for next time)
    #[clap(short = 'm', long)]
    mute: bool,
}

impl Cli {
    /// Persisted preferences with this run's flags layered on top
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(secs) = self.secs {
            config.question_secs = secs;
        }
        if let Some(ms) = self.feedback_ms {
            config.feedback_delay_ms = ms;
        }
        if let Some(name) = &self.name {
            config.player_name = name.clone();
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if self.no_music {
            config.music_enabled = false;
        }
        if self.mute {
            config.muted = true;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub engine: Engine,
    pub form: SetupForm,
    pub confetti: Confetti,
    pub audio: Box<dyn AudioSink>,
    /// Preferences in effect for this run, CLI flags included
    pub config: Config,
    /// Preferences as persisted; only player choices are written back
    pub stored: Config,
    pub store: Option<Box<dyn ConfigStore>>,
    pub selected_option: usize,
    pub announcement: Option<String>,
    pub area: (u16, u16),
}

impl App {
    pub fn new(
        cli: &Cli,
        bank: QuestionBank,
        stored: Config,
        store: Option<Box<dyn ConfigStore>>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let config = cli.apply_to(stored.clone());
        let mut stored = stored;
        if cli.mute {
            stored.muted = true;
        }
        let mut form = SetupForm::new(&bank)
            .with_name(config.player_name.clone())
            .with_difficulty(config.difficulty)
            .with_music(config.music_enabled);
        if !cli.categories.is_empty() {
            form = form.with_categories(cli.categories.iter().cloned());
        }

        Self {
            engine: Engine::new(bank, config.game_settings()).with_muted(config.muted),
            form,
            confetti: Confetti::new(),
            audio,
            config,
            stored,
            store,
            selected_option: 0,
            announcement: None,
            area: (80, 24),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.engine.quit();
            self.flush_cues();
            return Control::Quit;
        }

        let typing_name = self.engine.phase() == Phase::Setup && self.form.focus == Field::Name;
        if key.code == KeyCode::Char('m') && !typing_name {
            self.toggle_mute();
            return Control::Continue;
        }

        match self.engine.phase() {
            Phase::Setup => self.on_setup_key(key),
            Phase::Question => self.on_question_key(key),
            Phase::Feedback => {}
            Phase::GameOver => {
                if matches!(key.code, KeyCode::Char('r') | KeyCode::Enter) {
                    self.engine.play_again();
                    self.form.reset_for_replay();
                    self.confetti.stop();
                    self.announcement = None;
                }
            }
        }
        self.flush_cues();
        Control::Continue
    }

    fn on_setup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.start_game(),
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_previous(),
            KeyCode::Left => self.form.cycle_difficulty(false),
            KeyCode::Right => self.form.cycle_difficulty(true),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(' ') if self.form.focus != Field::Name => self.form.toggle(),
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
    }

    fn on_question_key(&mut self, key: KeyEvent) {
        let options = self
            .engine
            .session()
            .current_question()
            .map_or(0, |q| q.options.len());
        match key.code {
            KeyCode::Char(c @ '1'..='9') => self.answer(c as usize - '1' as usize),
            KeyCode::Char(c @ 'a'..='i') => self.answer(c as usize - 'a' as usize),
            KeyCode::Up => self.selected_option = self.selected_option.saturating_sub(1),
            KeyCode::Down if self.selected_option + 1 < options => self.selected_option += 1,
            KeyCode::Enter => self.answer(self.selected_option),
            _ => {}
        }
    }

    fn answer(&mut self, option_index: usize) {
        self.engine.select_answer(option_index);
        if self.engine.phase() == Phase::Feedback {
            self.selected_option = 0;
        }
    }

    fn start_game(&mut self) {
        match self
            .engine
            .start_game(self.form.to_config(), &mut rand::thread_rng())
        {
            Ok(()) => {
                self.form.error = None;
                self.selected_option = 0;
                // --no-music only sticks if the player flips the checkbox
                if self.form.music_enabled != self.config.music_enabled {
                    self.stored.music_enabled = self.form.music_enabled;
                }
                for config in [&mut self.config, &mut self.stored] {
                    config.player_name = self.form.name.trim().to_string();
                    config.difficulty = self.form.difficulty;
                }
                self.config.music_enabled = self.form.music_enabled;
                self.save_config();
            }
            Err(e) => self.form.error = Some(e.to_string()),
        }
    }

    fn toggle_mute(&mut self) {
        self.config.muted = self.engine.toggle_mute();
        self.stored.muted = self.config.muted;
        self.save_config();
        self.flush_cues();
    }

    fn save_config(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.stored) {
                warn!("could not save preferences: {e}");
            }
        }
    }

    /// Advance timers and animations by the real time that passed
    pub fn on_elapsed(&mut self, elapsed: Duration, width: u16, height: u16) {
        self.area = (width, height);
        self.engine.on_elapsed(elapsed);
        self.confetti.update(elapsed.as_secs_f64());
        self.flush_cues();
    }

    fn flush_cues(&mut self) {
        for cue in self.engine.drain_cues() {
            self.audio.handle(&cue);
            match cue {
                Cue::Celebrate => {
                    let session = self.engine.session();
                    let text = banner(session.score, session.max_score());
                    self.confetti.start(self.area.0, self.area.1, text);
                }
                Cue::Announce(text) => self.announcement = Some(text),
                Cue::Sound(_) | Cue::StartMusic | Cue::StopMusic => {}
            }
        }
        if self.engine.phase() != Phase::Question {
            self.announcement = None;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init();

    let loaded = match &cli.bank {
        Some(path) => QuestionBank::from_path(path),
        None => QuestionBank::embedded(),
    };
    let bank = match loaded {
        Ok(bank) => bank,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e).exit();
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let stored = store.load();
    let mut app = App::new(
        &cli,
        bank,
        stored,
        Some(Box::new(store)),
        Box::new(TerminalBell::stdout()),
    );
    // --mute should stick like the in-game toggle does
    if cli.mute {
        app.save_config();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        let step = runner.step();
        let size = terminal.size().unwrap_or_default();
        app.on_elapsed(step.elapsed, size.width, size.height);

        if let QuizEvent::Key(key) = step.event {
            if app.on_key(key) == Control::Quit {
                break;
            }
        }

        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
