//! Ratatui-based terminal UI.
//!
//! The TUI is a small form: diameter, length and the sixteen gauge readings on
//! the left, the four results and the dial diagram on the right. Field text is
//! coerced the forgiving way (blank or junk counts as 0) so the form never
//! blocks on input.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::domain::{AlignmentInput, AlignmentResult, Readings, RunConfig, STATION_COUNT, Station};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::io::ingest::coerce_reading;
use crate::plot::{MIN_DIAL_SIZE, render_dial};

/// Diameter, length, then eight PGB and eight UGB readings.
const FIELD_COUNT: usize = 2 + 2 * STATION_COUNT;

/// Start the TUI.
pub fn run(config: RunConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_RUNTIME,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// One editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Diameter,
    Length,
    Pgb(Station),
    Ugb(Station),
}

impl Field {
    fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Field::Diameter),
            1 => Some(Field::Length),
            i if i < 2 + STATION_COUNT => Station::new(i - 2).map(Field::Pgb),
            i if i < FIELD_COUNT => Station::new(i - 2 - STATION_COUNT).map(Field::Ugb),
            _ => None,
        }
    }

    fn label(self) -> String {
        match self {
            Field::Diameter => "Diameter (mm)".to_string(),
            Field::Length => "Length (mm)".to_string(),
            Field::Pgb(s) => format!("PGB {}", s.label()),
            Field::Ugb(s) => format!("UGB {}", s.label()),
        }
    }
}

struct App {
    config: RunConfig,
    fields: Vec<String>,
    selected: usize,
    last: Option<(AlignmentInput, AlignmentResult)>,
    status: String,
    export_dir: PathBuf,
}

impl App {
    fn new(config: RunConfig) -> Self {
        let mut fields = vec!["0".to_string(); FIELD_COUNT];
        fields[0] = config.default_diameter.to_string();
        fields[1] = config.default_length.to_string();
        Self {
            config,
            fields,
            selected: 0,
            last: None,
            status: "Enter readings, then press Enter to calculate.".to_string(),
            export_dir: PathBuf::from("."),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read()
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::BackTab => {
                self.selected = self.selected.checked_sub(1).unwrap_or(FIELD_COUNT - 1);
            }
            KeyCode::Down | KeyCode::Tab => {
                self.selected = (self.selected + 1) % FIELD_COUNT;
            }
            KeyCode::Enter | KeyCode::Char('c') => self.calculate(),
            KeyCode::Char('x') => self.export(),
            KeyCode::Backspace => {
                self.fields[self.selected].pop();
            }
            KeyCode::Delete => self.fields[self.selected].clear(),
            KeyCode::Char(ch) if is_number_char(ch) => self.fields[self.selected].push(ch),
            _ => {}
        }
        false
    }

    /// Coerce the form text into a solver input.
    fn build_input(&self) -> AlignmentInput {
        let mut pgb = [0.0; STATION_COUNT];
        let mut ugb = [0.0; STATION_COUNT];
        for (i, text) in self.fields.iter().enumerate() {
            let value = coerce_reading(text);
            match Field::from_index(i) {
                Some(Field::Pgb(s)) => pgb[s.index()] = value,
                Some(Field::Ugb(s)) => ugb[s.index()] = value,
                _ => {}
            }
        }
        AlignmentInput::new(
            coerce_reading(&self.fields[0]),
            coerce_reading(&self.fields[1]),
            Readings::new(pgb),
            Readings::new(ugb),
        )
    }

    fn calculate(&mut self) {
        let input = self.build_input();
        match crate::solver::solve(&input, self.config.length_policy) {
            Ok(result) => {
                self.status = "Calculated.".to_string();
                self.last = Some((input, result));
            }
            Err(err) => {
                self.status = format!("Error: {err}");
                self.last = None;
            }
        }
    }

    fn export(&mut self) {
        let Some((input, result)) = &self.last else {
            self.status = "Nothing to export yet: calculate first.".to_string();
            return;
        };
        let name = format!("align-report-{}.json", Local::now().format("%Y%m%d-%H%M%S"));
        let path = self.export_dir.join(name);
        self.status = match crate::io::export::write_report_json(&path, input, result) {
            Ok(()) => format!("Wrote report: {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("align", Style::default().fg(Color::Cyan)),
            Span::raw(" | combined shaft alignment | zero length: "),
            Span::styled(
                format!("{:?}", self.config.length_policy).to_lowercase(),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);

        self.draw_form(frame, chunks[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(chunks[1]);

        self.draw_results(frame, right[0]);
        self.draw_dial(frame, right[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let label = Field::from_index(i).map(Field::label).unwrap_or_default();
                let cursor = if i == self.selected { "_" } else { "" };
                ListItem::new(format!("{label:<14} {text}{cursor}"))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Inputs").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Results").borders(Borders::ALL);
        let Some((_, result)) = &self.last else {
            let msg = Paragraph::new("Press Enter to calculate.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let f = result.formatted();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let row = |label: &'static str, value: String| {
            Line::from(vec![Span::raw(label), Span::styled(value, bold)])
        };
        let lines = vec![
            row("Resultant (R) : ", format!("{} mm", f.resultant_r)),
            row("Runout        : ", format!("{} mm", f.runout)),
            row("Angle         : ", format!("{}°", f.angle)),
            row("Shim thickness: ", format!("{} mm", f.shim_thickness)),
        ];
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_dial(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Dial").borders(Borders::ALL);
        let Some((input, result)) = &self.last else {
            frame.render_widget(block, area);
            return;
        };

        // Header and legend take two rows inside the border.
        let rows = (area.height as usize).saturating_sub(4);
        let size = self.config.plot_size.min(rows).max(MIN_DIAL_SIZE);
        let text = render_dial(input, result, size);
        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  type to edit  Del clear  Enter calculate  x export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E')
}
