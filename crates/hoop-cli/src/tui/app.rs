//! TUI application state and key handling.

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;

use hoop_core::export::{ExportFormat, write_export};
use hoop_core::profile::{Day, HOURS_STEP};
use hoop_core::{Advance, Level, PlanRequest, Position, Step, TimeOfDay, Wizard};

/// What the event loop must do after a key press.
#[derive(Debug, PartialEq)]
pub enum Action {
    None,
    /// Start generating a plan for this request.
    Submit(PlanRequest),
    Quit,
}

/// Application state for the TUI.
pub struct App {
    pub wizard: Wizard,
    pub position_cursor: usize,
    pub level_cursor: usize,
    pub day_cursor: usize,
    /// Index into the plan's `workoutSchedule` shown on the result step.
    pub result_day: usize,
    pub loading_message: &'static str,
    pub tick: usize,
    pub tick_rate: Duration,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub export_dir: PathBuf,
}

impl App {
    pub fn new(export_dir: PathBuf) -> Self {
        Self {
            wizard: Wizard::new(),
            position_cursor: 0,
            level_cursor: 0,
            day_cursor: 0,
            result_day: 0,
            loading_message: "",
            tick: 0,
            tick_rate: Duration::from_millis(250),
            should_quit: false,
            status_message: None,
            export_dir,
        }
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Action::Quit;
        }
        if self.wizard.is_loading() {
            return Action::None;
        }

        let step = self.wizard.step();
        match (step, key.code) {
            (Step::Result, _) => self.handle_result_key(key.code),
            (_, KeyCode::Enter) => self.advance(),
            (_, KeyCode::Esc) => {
                if !self.wizard.back() {
                    self.should_quit = true;
                    return Action::Quit;
                }
                Action::None
            }
            (Step::Name | Step::Age | Step::Improvement, code) => {
                self.edit_text(step, code);
                Action::None
            }
            (Step::Position, code) => {
                self.choose_position(code);
                Action::None
            }
            (Step::Level, code) => {
                self.choose_level(code);
                Action::None
            }
            (Step::Schedule, code) => {
                self.edit_schedule(code);
                Action::None
            }
        }
    }

    /// Record the outcome of a background generation.
    pub fn finish_generation(&mut self, outcome: Result<Value, String>) {
        self.loading_message = "";
        if let Err(e) = self.wizard.finish_generation(outcome) {
            self.status_message = Some(e.to_string());
        } else if self.wizard.step() == Step::Result {
            self.result_day = 0;
            self.status_message = Some("Workout plan ready".to_string());
        }
    }

    // -- Input steps --

    fn advance(&mut self) -> Action {
        match self.wizard.next() {
            Ok(Advance::Submit(request)) => Action::Submit(request),
            Ok(Advance::Moved(_) | Advance::Stay) => Action::None,
            Err(e) => {
                self.status_message = Some(e.to_string());
                Action::None
            }
        }
    }

    fn edit_text(&mut self, step: Step, code: KeyCode) {
        let draft = self.wizard.draft();
        let mut value = match step {
            Step::Name => draft.name.clone(),
            Step::Age => draft.age.clone(),
            _ => draft.improvement.clone(),
        };
        match code {
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Char(c) if step == Step::Age => {
                if c.is_ascii_digit() && value.len() < 3 {
                    value.push(c);
                }
            }
            KeyCode::Char(c) => value.push(c),
            _ => return,
        }
        match step {
            Step::Name => self.wizard.set_name(value),
            Step::Age => self.wizard.set_age(value),
            _ => self.wizard.set_improvement(value),
        }
    }

    fn choose_position(&mut self, code: KeyCode) {
        if let Some(cursor) = move_cursor(self.position_cursor, Position::ALL.len(), code) {
            self.position_cursor = cursor;
            self.wizard.set_position(Position::ALL[cursor]);
        }
    }

    fn choose_level(&mut self, code: KeyCode) {
        if let Some(cursor) = move_cursor(self.level_cursor, Level::ALL.len(), code) {
            self.level_cursor = cursor;
            self.wizard.set_level(Level::ALL[cursor]);
        }
    }

    fn edit_schedule(&mut self, code: KeyCode) {
        let day = Day::ALL[self.day_cursor];
        let hours = self.wizard.draft().schedule.get(day).hours;
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.day_cursor = self.day_cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.day_cursor = (self.day_cursor + 1).min(Day::ALL.len() - 1);
            }
            KeyCode::Char(' ') => self.wizard.toggle_day(day),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('l') => {
                self.wizard.set_hours(day, hours + HOURS_STEP);
            }
            KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => {
                self.wizard.set_hours(day, hours - HOURS_STEP);
            }
            KeyCode::Char('m') => self.wizard.toggle_time_of_day(day, TimeOfDay::Morning),
            KeyCode::Char('a') => self.wizard.toggle_time_of_day(day, TimeOfDay::Afternoon),
            KeyCode::Char('e') => self.wizard.toggle_time_of_day(day, TimeOfDay::Evening),
            _ => {}
        }
    }

    // -- Result step --

    fn handle_result_key(&mut self, code: KeyCode) -> Action {
        let days = self
            .wizard
            .workout_plan()
            .map(|p| p.workout_schedule.len())
            .unwrap_or(0);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return Action::Quit;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if days > 0 {
                    self.result_day = (self.result_day + days - 1) % days;
                }
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                if days > 0 {
                    self.result_day = (self.result_day + 1) % days;
                }
            }
            KeyCode::Char('e') => self.export(ExportFormat::Markdown),
            KeyCode::Char('x') => self.export(ExportFormat::Json),
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
        Action::None
    }

    fn export(&mut self, format: ExportFormat) {
        let Some(plan) = self.wizard.plan() else {
            return;
        };
        let path = self
            .export_dir
            .join(export_file_name(&self.wizard.draft().name, format));
        self.status_message = Some(match write_export(&path, plan, format) {
            Ok(()) => format!("Plan exported to {}", path.display()),
            Err(e) => format!("Export failed: {e:#}"),
        });
    }

    fn restart(&mut self) {
        self.wizard.restart();
        self.position_cursor = 0;
        self.level_cursor = 0;
        self.day_cursor = 0;
        self.result_day = 0;
        self.status_message = None;
    }
}

/// New cursor position for an Up/Down/Space key in a list of `len` items, or
/// `None` when the key is not a list key.
fn move_cursor(cursor: usize, len: usize, code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(cursor.saturating_sub(1)),
        KeyCode::Down | KeyCode::Char('j') => Some((cursor + 1).min(len.saturating_sub(1))),
        KeyCode::Char(' ') => Some(cursor),
        _ => None,
    }
}

/// `hoopbuddy-jordan-smith-workout-plan.md`
pub fn export_file_name(name: &str, format: ExportFormat) -> String {
    let mut slug = String::new();
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        format!("hoopbuddy-workout-plan.{}", format.extension())
    } else {
        format!("hoopbuddy-{slug}-workout-plan.{}", format.extension())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
