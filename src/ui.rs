use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use spookquiz::{
    celebration::Confetti,
    game::{Outcome, Session},
    setup::{Field, SetupForm},
    Phase,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 3;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Min(1),    // body
                Constraint::Length(1), // legend
            ])
            .split(area);

        render_header(self, chunks[0], buf);

        let session = self.engine.session();
        let legend = match session.phase {
            Phase::Setup => {
                render_setup(&self.form, chunks[1], buf);
                "(tab/↑↓) move  (←/→) difficulty  (space) toggle  (enter) start  (m)ute  (esc)ape"
            }
            Phase::Question | Phase::Feedback => {
                render_question(self, chunks[1], buf);
                "(1-9 / a-i) answer  (↑/↓ enter) pick  (m)ute  (esc)ape"
            }
            Phase::GameOver => {
                render_game_over(session, chunks[1], buf);
                "(r)eplay / (m)ute / (esc)ape"
            }
        };

        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[2], buf);

        if self.confetti.is_active {
            render_confetti(&self.confetti, area, buf);
        }
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let session = app.engine.session();

    Paragraph::new(Span::styled(
        "🎃 spookquiz",
        bold.fg(Color::Rgb(255, 140, 0)),
    ))
    .render(area, buf);

    let mut status = Vec::new();
    if session.phase != Phase::Setup {
        status.push(Span::styled(format!("Score: {}", session.score), bold));
        status.push(Span::raw("  "));
    }
    if app.audio.music_playing() {
        status.push(Span::raw("♪ "));
    }
    status.push(Span::raw(if app.engine.is_muted() {
        "🔇"
    } else {
        "🔊"
    }));

    Paragraph::new(Line::from(status))
        .alignment(Alignment::Right)
        .render(area, buf);
}

fn render_setup(form: &SetupForm, area: Rect, buf: &mut Buffer) {
    let focused = |field: Field| {
        if form.focus == field {
            Span::styled("▸ ", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("  ")
        }
    };
    let checkbox = |checked: bool| if checked { "[x]" } else { "[ ]" };
    let label = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            "Enter your name and choose difficulty to begin.",
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::default(),
        Line::from(vec![
            focused(Field::Name),
            Span::styled("Name:        ", label),
            Span::raw(form.name.clone()),
            Span::styled(
                if form.focus == Field::Name { "_" } else { "" },
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ),
        ]),
        Line::from(vec![
            focused(Field::Difficulty),
            Span::styled("Difficulty:  ", label),
            Span::raw(format!("◂ {} ▸", form.difficulty)),
        ]),
        Line::from(vec![Span::raw("  "), Span::styled("Categories:", label)]),
    ];

    for (i, (name, checked)) in form.categories.iter().enumerate() {
        lines.push(Line::from(vec![
            focused(Field::Category(i)),
            Span::raw(format!("  {} {}", checkbox(*checked), name.to_uppercase())),
        ]));
    }

    lines.push(Line::from(vec![
        focused(Field::Music),
        Span::styled("Music:       ", label),
        Span::raw(checkbox(form.music_enabled)),
    ]));

    if let Some(error) = &form.error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Setup "))
        .render(area, buf);
}

fn render_question(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.engine.session();
    let Some(question) = session.current_question() else {
        return;
    };
    let timer = app.engine.timer();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // progress
            Constraint::Length(1), // countdown gauge
            Constraint::Length(1), // announcer
            Constraint::Min(1),    // prompt and options
            Constraint::Length(1), // feedback message
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!(
            "Question {}/{}",
            session.current_index + 1,
            session.total_questions()
        ),
        bold,
    ))
    .render(chunks[0], buf);

    let ratio = timer.ratio().clamp(0.0, 1.0);
    let gauge_color = if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.2 {
        Color::Yellow
    } else {
        Color::Red
    };
    Gauge::default()
        .gauge_style(Style::default().fg(gauge_color))
        .ratio(ratio)
        .label(format!("{}s", timer.remaining))
        .render(chunks[1], buf);

    if let Some(text) = &app.announcement {
        Paragraph::new(Span::styled(
            text.as_str(),
            Style::default().add_modifier(Modifier::DIM),
        ))
        .render(chunks[2], buf);
    }

    let correct = question.correct_index();
    let mut lines = vec![Line::from(Span::styled(question.prompt.clone(), bold)), Line::default()];
    for (i, option) in question.options.iter().enumerate() {
        let style = match session.phase {
            Phase::Feedback if Some(i) == correct => {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            }
            Phase::Feedback => Style::default().add_modifier(Modifier::DIM),
            _ if i == app.selected_option => Style::default().add_modifier(Modifier::REVERSED),
            _ => Style::default(),
        };
        lines.push(Line::from(Span::styled(
            format!("{}) {}", i + 1, option),
            style,
        )));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    if session.phase == Phase::Feedback {
        if let Some(outcome) = &session.last_outcome {
            let color = match outcome {
                Outcome::Correct { .. } => Color::Green,
                Outcome::Wrong { .. } => Color::Red,
                Outcome::TimeUp { .. } => Color::Yellow,
            };
            Paragraph::new(Span::styled(
                outcome.message(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .render(chunks[4], buf);
        }
    }
}

fn render_game_over(session: &Session, area: Rect, buf: &mut Buffer) {
    let name = session
        .config
        .as_ref()
        .map_or("", |c| c.player_name.as_str());
    let categories = session
        .config
        .iter()
        .flat_map(|c| c.categories.iter())
        .map(|c| c.to_uppercase())
        .join(", ");
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            format!("🎃 Final Score: {} 🎃", session.score),
            Style::default()
                .fg(Color::Rgb(255, 140, 0))
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(format!(
            "{name}: {}/{} correct (best possible {})",
            session.correct_answers,
            session.total_questions(),
            session.max_score()
        )),
        Line::from(Span::styled(
            categories,
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Game Over "))
        .render(area, buf);
}

/// Draw confetti on top of whatever is already in the buffer
fn render_confetti(confetti: &Confetti, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::LightYellow,
        Color::Rgb(255, 140, 0),
    ];

    for particle in &confetti.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let fade = 1.0 - particle.age / particle.max_age;
        let style = if particle.is_text || fade > 0.6 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if fade > 0.25 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spookquiz::celebration::ConfettiParticle;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn setup_lists_categories_and_marks_focus() {
        let bank = spookquiz::QuestionBank::embedded().unwrap();
        let form = SetupForm::new(&bank).with_name("Al");
        let area = Rect::new(0, 0, 70, 20);
        let mut buf = Buffer::empty(area);

        render_setup(&form, area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Name:"));
        assert!(text.contains("Al_"));
        assert!(text.contains("[x] CANDY"));
        assert!(text.contains("◂ medium ▸"));
    }

    #[test]
    fn game_over_reports_totals() {
        let session = Session {
            score: 4,
            correct_answers: 2,
            phase: Phase::GameOver,
            ..Session::default()
        };
        let area = Rect::new(0, 0, 60, 8);
        let mut buf = Buffer::empty(area);

        render_game_over(&session, area, &mut buf);

        assert!(buffer_text(&buf).contains("Final Score: 4"));
    }

    #[test]
    fn confetti_outside_the_area_is_skipped() {
        let mut confetti = Confetti::new();
        confetti.is_active = true;
        confetti.particles.push(ConfettiParticle {
            x: 2.0,
            y: 1.0,
            vel_x: 0.0,
            vel_y: 0.0,
            symbol: '*',
            color_index: 0,
            age: 0.0,
            max_age: 1.0,
            is_text: false,
            target_x: 2.0,
            target_y: 1.0,
        });
        confetti.particles.push(ConfettiParticle {
            x: 500.0,
            y: -3.0,
            ..confetti.particles[0].clone()
        });
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);

        render_confetti(&confetti, area, &mut buf);

        assert_eq!(buf[(2, 1)].symbol(), "*");
        assert_eq!(buffer_text(&buf).matches('*').count(), 1);
    }
}
