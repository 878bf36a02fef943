//! Terminal User Interface module using Ratatui.
//!
//! A single-screen form: dataset preview and model status on the left,
//! the five traffic inputs and the prediction verdict on the right.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::config::Config;
use crate::dataset::{DatasetGenerator, TrainingDataset};
use crate::error::Result;
use crate::export::format_percent;
use crate::session::{ClassifierSession, PredictionOutcome, TrainingReport};
use crate::traffic::{Feature, TrafficRecord};

/// Terminal type alias for convenience.
type Term = Terminal<CrosstermBackend<Stdout>>;

/// Last action result shown in the status panels.
#[derive(Debug, Clone)]
pub enum Status {
    Idle,
    Trained(TrainingReport),
    Predicted {
        outcome: PredictionOutcome,
        attack_probability: Option<f64>,
    },
    Reset,
    Error(String),
}

/// UI state.
pub struct App {
    dataset: TrainingDataset,
    session: ClassifierSession,
    /// Committed input values.
    input: TrafficRecord,
    /// Index of the focused form field.
    selected: usize,
    /// Text being typed into the focused field.
    edit_buffer: Option<String>,
    status: Status,
    preview_rows: usize,
    show_help: bool,
    running: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            dataset: DatasetGenerator::from_config(&config.dataset).generate(),
            session: ClassifierSession::new(config.model.clone()),
            input: TrafficRecord::default(),
            selected: 0,
            edit_buffer: None,
            status: Status::Idle,
            preview_rows: config.ui.preview_rows,
            show_help: false,
            running: true,
        }
    }

    /// Handles keyboard input.
    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc if self.edit_buffer.is_some() => self.edit_buffer = None,
            KeyCode::Esc if self.show_help => self.show_help = false,
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('?') | KeyCode::Char('h') => self.show_help = !self.show_help,
            KeyCode::Char('t') => self.train(),
            KeyCode::Char('p') => self.predict(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('d') => {
                self.edit_buffer = None;
                self.input = TrafficRecord::default();
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(Feature::ALL.len() - 1)
            }
            KeyCode::Right | KeyCode::Char('+') => self.step(1.0),
            KeyCode::Left | KeyCode::Char('-') => self.step(-1.0),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.edit_buffer.get_or_insert_with(String::new).push(c);
            }
            KeyCode::Backspace => {
                if let Some(buf) = self.edit_buffer.as_mut() {
                    buf.pop();
                }
            }
            KeyCode::Enter => {
                self.commit_edit();
            }
            _ => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn input(&self) -> &TrafficRecord {
        &self.input
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn selected_feature(&self) -> Feature {
        Feature::ALL[self.selected]
    }

    fn move_selection(&mut self, offset: usize) {
        self.commit_edit();
        self.selected = (self.selected + offset) % Feature::ALL.len();
    }

    fn step(&mut self, direction: f64) {
        if !self.commit_edit() {
            return;
        }
        let feature = self.selected_feature();
        let value = self.input.get(feature) + direction * feature.step();
        self.input.set_clamped(feature, value);
    }

    /// Applies the typed value, clamped into the field's range. Returns
    /// false and sets an error status when the text is not a number.
    fn commit_edit(&mut self) -> bool {
        let Some(buffer) = self.edit_buffer.take() else {
            return true;
        };
        if buffer.is_empty() {
            return true;
        }

        let feature = self.selected_feature();
        match buffer.parse::<f64>() {
            Ok(value) => {
                self.input.set_clamped(feature, value);
                true
            }
            Err(_) => {
                self.status = Status::Error(format!("Invalid value for {}: '{}'", feature, buffer));
                false
            }
        }
    }

    fn train(&mut self) {
        if !self.commit_edit() {
            return;
        }
        self.status = match self.session.train(&self.dataset) {
            Ok(report) => Status::Trained(report),
            Err(e) => Status::Error(format!("Training failed: {}", e)),
        };
    }

    fn predict(&mut self) {
        if !self.commit_edit() {
            return;
        }
        self.status = match self.session.assess(&self.input) {
            Ok(outcome) => Status::Predicted {
                outcome,
                attack_probability: self.session.attack_probability(&self.input).ok(),
            },
            Err(e) => Status::Error(format!("Prediction failed: {}", e)),
        };
        debug!(status = ?self.status, "Predict action");
    }

    fn reset(&mut self) {
        self.session.reset();
        self.status = Status::Reset;
    }
}

/// Initializes the terminal for TUI rendering.
pub fn init_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let setup = || -> Result<Term> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        Ok(Terminal::new(CrosstermBackend::new(stdout))?)
    };
    setup().map_err(|e| {
        // Leave the shell usable if setup fails halfway.
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        e
    })
}

/// Restores the terminal to its original state. Every step runs even if an
/// earlier one fails; the first failure is returned.
pub fn restore_terminal(terminal: &mut Term) -> Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    raw?;
    screen?;
    cursor?;
    Ok(())
}

/// Main UI rendering function.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Body
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(
                u16::try_from(app.preview_rows)
                    .unwrap_or(u16::MAX)
                    .saturating_add(4),
            ),
            Constraint::Min(6),
        ])
        .split(body[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Feature::ALL.len() as u16 + 2),
            Constraint::Min(4),
        ])
        .split(body[1]);

    render_preview(frame, left[0], app);
    render_model(frame, left[1], app);
    render_form(frame, right[0], app);
    render_verdict(frame, right[1], app);
    render_footer(frame, chunks[2]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = vec![
        Span::styled(
            "  NIDS-LAB",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            "Network Intrusion Detection (Random Forest)",
            Style::default().fg(Color::Gray),
        ),
    ];

    let header = Paragraph::new(Line::from(title)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

fn render_preview(frame: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["packet_size", "duration", "src_bytes", "dst_bytes", "count", "label"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).bold()));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows: Vec<Row> = app
        .dataset
        .head(app.preview_rows)
        .iter()
        .map(|r| {
            let label_style = if r.label.as_u8() == 1 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            Row::new(vec![
                Cell::from(r.record.packet_size.to_string()),
                Cell::from(format!("{:.3}", r.record.duration)),
                Cell::from(r.record.src_bytes.to_string()),
                Cell::from(r.record.dst_bytes.to_string()),
                Cell::from(r.record.count.to_string()),
                Cell::from(r.label.as_u8().to_string()).style(label_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!(
                " Simulated Network Traffic ({} records) ",
                app.dataset.len()
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    frame.render_widget(table, area);
}

fn render_model(frame: &mut Frame, area: Rect, app: &App) {
    let lines = match app.session.last_report() {
        Some(report) => vec![
            Line::from(vec![
                Span::styled("Status:    ", Style::default().fg(Color::Gray)),
                Span::styled("TRAINED", Style::default().fg(Color::Green).bold()),
            ]),
            Line::from(vec![
                Span::styled("Accuracy:  ", Style::default().fg(Color::Gray)),
                Span::raw(format!("{:.2}", report.accuracy)),
                Span::styled(
                    format!("  (baseline {:.2})", report.baseline_accuracy),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(vec![
                Span::styled("Trees:     ", Style::default().fg(Color::Gray)),
                Span::raw(report.n_estimators.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Split:     ", Style::default().fg(Color::Gray)),
                Span::raw(format!("{} train / {} eval", report.train_size, report.test_size)),
            ]),
            Line::from(vec![
                Span::styled("Recall:    ", Style::default().fg(Color::Gray)),
                Span::raw(format_percent(report.confusion.recall())),
            ]),
        ],
        None => vec![
            Line::from(vec![
                Span::styled("Status:    ", Style::default().fg(Color::Gray)),
                Span::styled("NOT TRAINED", Style::default().fg(Color::Yellow).bold()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press 't' to train the model.",
                Style::default().fg(Color::DarkGray).italic(),
            )),
        ],
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Model ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    frame.render_widget(panel, area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = Feature::ALL
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            let focused = i == app.selected;
            let value = match (&app.edit_buffer, focused) {
                (Some(buf), true) => format!("{}_", buf),
                _ => feature.format_value(app.input.get(*feature)),
            };
            let marker = if focused { ">> " } else { "   " };
            let value_style = if focused {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(format!("{:<20}", feature.label()), Style::default().fg(Color::Gray)),
                Span::styled(format!(" {:>8} ", value), value_style),
                Span::styled(
                    format!(
                        "  [{} - {}]",
                        feature.format_value(feature.min()),
                        feature.format_value(feature.max())
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(" Live Traffic Simulator ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(form, area);
}

fn render_verdict(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = match &app.status {
        Status::Idle => (
            "Press 'p' to predict the traffic type.".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Status::Trained(report) => (
            format!("Model trained successfully! Accuracy: {:.2}", report.accuracy),
            Style::default().fg(Color::Green),
        ),
        Status::Predicted {
            outcome,
            attack_probability,
        } => {
            let color = match outcome {
                PredictionOutcome::Untrained => Color::Yellow,
                PredictionOutcome::Normal => Color::Green,
                PredictionOutcome::Attack => Color::Red,
            };
            let text = match attack_probability {
                Some(p) => format!("{}  (attack probability: {})", outcome.message(), format_percent(*p)),
                None => outcome.message().to_string(),
            };
            (text, Style::default().fg(color).bold())
        }
        Status::Reset => (
            "Model discarded. Train again before predicting.".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        Status::Error(msg) => (msg.clone(), Style::default().fg(Color::Red)),
    };

    let verdict = Paragraph::new(Line::from(Span::styled(text, style)))
        .block(
            Block::default()
                .title(" Result ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(verdict, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" t", Style::default().fg(Color::Yellow)),
        Span::raw(": Train  "),
        Span::styled("p", Style::default().fg(Color::Yellow)),
        Span::raw(": Predict  "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(": Field  "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(": Adjust  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(": Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(": Quit"),
    ]))
    .style(Style::default().fg(Color::Gray))
    .block(Block::default().borders(Borders::TOP));

    frame.render_widget(footer, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<11}", k), Style::default().fg(Color::Yellow)),
            Span::raw(desc),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().bold().fg(Color::Cyan),
        )),
        Line::from(""),
        key("t", "Train model now"),
        key("p", "Predict traffic type"),
        key("r", "Discard the trained model"),
        key("↑ / k", "Previous field"),
        key("↓ / j / Tab", "Next field"),
        key("← / -", "Decrease value"),
        key("→ / +", "Increase value"),
        key("0-9 .", "Type a value"),
        key("Enter", "Apply typed value"),
        key("d", "Restore default inputs"),
        key("? / h", "Toggle this help"),
        key("q / Esc", "Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            "Typed values are clamped to the field range.",
            Style::default().fg(Color::DarkGray).italic(),
        )),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Helper to create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Main UI event loop.
pub fn run_ui(config: &Config) -> Result<()> {
    let mut app = App::new(config);
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms.max(10));

    let mut terminal = init_terminal()?;
    run_then_restore(
        &mut terminal,
        |t| event_loop(t, &mut app, tick_rate),
        restore_terminal,
    )
}

/// Runs `run`, then always runs `restore`. The error from `run` wins.
fn run_then_restore<T>(
    target: &mut T,
    run: impl FnOnce(&mut T) -> Result<()>,
    restore: impl FnOnce(&mut T) -> Result<()>,
) -> Result<()> {
    let result = run(target);
    let restored = restore(target);
    result.and(restored)
}

fn event_loop(terminal: &mut Term, app: &mut App, tick_rate: Duration) -> Result<()> {
    while app.is_running() {
        terminal.draw(|f| render(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn small_app() -> App {
        let mut config = Config::default();
        config.dataset.size = 200;
        config.model.n_estimators = 10;
        App::new(&config)
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 36)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_predict_before_train_shows_warning() {
        let mut app = small_app();
        app.handle_key(KeyCode::Char('p'));
        assert!(matches!(
            app.status(),
            Status::Predicted {
                outcome: PredictionOutcome::Untrained,
                attack_probability: None
            }
        ));
        assert!(screen(&app).contains("Please train the model first."));
    }

    #[test]
    fn test_train_and_predict() {
        let mut app = small_app();
        app.handle_key(KeyCode::Char('t'));
        assert!(matches!(app.status(), Status::Trained(_)));
        assert!(screen(&app).contains("TRAINED"));

        app.handle_key(KeyCode::Char('p'));
        match app.status() {
            Status::Predicted { outcome, .. } => assert_ne!(*outcome, PredictionOutcome::Untrained),
            other => panic!("unexpected status: {:?}", other),
        }

        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Char('p'));
        assert!(matches!(
            app.status(),
            Status::Predicted {
                outcome: PredictionOutcome::Untrained,
                ..
            }
        ));
    }

    #[test]
    fn test_field_navigation_and_stepping() {
        let mut app = small_app();
        assert_eq!(app.selected_feature(), Feature::PacketSize);

        app.handle_key(KeyCode::Right);
        assert_eq!(app.input().packet_size, 510);

        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected_feature(), Feature::Count);
        for _ in 0..200 {
            app.handle_key(KeyCode::Right);
        }
        assert_eq!(app.input().count, 100);

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.selected_feature(), Feature::PacketSize);
    }

    #[test]
    fn test_typed_value_is_clamped() {
        let mut app = small_app();
        app.handle_key(KeyCode::Down);
        type_keys(&mut app, "2.5");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.input().duration, 2.5);

        app.handle_key(KeyCode::Down);
        type_keys(&mut app, "99999");
        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.input().src_bytes, 9999);

        type_keys(&mut app, "12345");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.input().src_bytes, 10_000);
    }

    #[test]
    fn test_invalid_typed_value_keeps_previous() {
        let mut app = small_app();
        type_keys(&mut app, "1..2");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.input().packet_size, 500);
        assert!(matches!(app.status(), Status::Error(_)));
    }

    #[test]
    fn test_invalid_typed_value_blocks_predict_and_train() {
        let mut app = small_app();
        app.handle_key(KeyCode::Char('t'));
        assert!(app.session.is_trained());

        type_keys(&mut app, "1..2");
        app.handle_key(KeyCode::Char('p'));
        assert!(matches!(app.status(), Status::Error(_)));
        assert_eq!(app.input().packet_size, 500);

        type_keys(&mut app, "4..");
        app.handle_key(KeyCode::Char('t'));
        assert!(matches!(app.status(), Status::Error(_)));
        assert_eq!(app.session.trainings(), 1);

        type_keys(&mut app, "..");
        app.handle_key(KeyCode::Right);
        assert!(matches!(app.status(), Status::Error(_)));
        assert_eq!(app.input().packet_size, 500);
    }

    #[test]
    fn test_restore_runs_after_loop_error() {
        let mut calls = Vec::new();
        let err = run_then_restore(
            &mut calls,
            |c| {
                c.push("loop");
                Err(anyhow::anyhow!("draw failed"))
            },
            |c| {
                c.push("restore");
                Err(anyhow::anyhow!("restore failed"))
            },
        )
        .unwrap_err();
        assert_eq!(calls, vec!["loop", "restore"]);
        assert_eq!(err.to_string(), "draw failed");

        let err = run_then_restore(&mut calls, |_| Ok(()), |_| Err(anyhow::anyhow!("restore failed")))
            .unwrap_err();
        assert_eq!(err.to_string(), "restore failed");
    }

    #[test]
    fn test_render_with_oversized_preview_rows() {
        let mut config = Config::default();
        config.dataset.size = 20;
        config.model.n_estimators = 5;
        config.ui.preview_rows = 100_000;
        let app = App::new(&config);
        assert!(screen(&app).contains("NIDS-LAB"));
    }

    #[test]
    fn test_escape_cancels_edit_then_quits() {
        let mut app = small_app();
        type_keys(&mut app, "77");
        app.handle_key(KeyCode::Esc);
        assert!(app.is_running());
        assert_eq!(app.input().packet_size, 500);

        app.handle_key(KeyCode::Char('?'));
        app.handle_key(KeyCode::Esc);
        assert!(app.is_running());

        app.handle_key(KeyCode::Char('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_defaults_restore_inputs() {
        let mut app = small_app();
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Char('d'));
        assert_eq!(*app.input(), TrafficRecord::default());
    }

    #[test]
    fn test_render_shows_preview_and_form() {
        let app = small_app();
        let text = screen(&app);
        assert!(text.contains("NIDS-LAB"));
        assert!(text.contains("Simulated Network Traffic (200 records)"));
        assert!(text.contains("Connection Count"));
        assert!(text.contains("NOT TRAINED"));
    }
}
