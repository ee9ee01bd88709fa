//! Intake wizard state machine.
//!
//! Holds the profile draft and the current step, and enforces the step
//! graph:
//!
//! ```text
//! name -> age -> position -> schedule -> level -> improvement
//!   <-     <-        <-          <-         <-
//! improvement --(generation succeeds)--> result
//! any step    --(restart)-------------> name
//! ```
//!
//! Leaving the improvement step forward does not move the wizard; it hands
//! back a [`PlanRequest`] and enters the loading phase until
//! [`Wizard::finish_generation`] is called.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::plan::WorkoutPlan;
use crate::profile::{Day, Level, PlanRequest, Position, Schedule, TimeOfDay};

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    #[default]
    Name,
    Age,
    Position,
    Schedule,
    Level,
    Improvement,
    Result,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Self::Name,
        Self::Age,
        Self::Position,
        Self::Schedule,
        Self::Level,
        Self::Improvement,
        Self::Result,
    ];

    /// Number of steps that collect input (everything before the result).
    pub const INPUT_STEPS: usize = 6;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Name => "Welcome to HoopBuddy",
            Self::Age => "How old are you?",
            Self::Position => "What position do you play?",
            Self::Schedule => "When can you work out?",
            Self::Level => "What level do you play at?",
            Self::Improvement => "What do you want to improve?",
            Self::Result => "Your Personalized Workout Plan",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Name => "Your personal basketball workout assistant",
            Self::Age => "This helps us tailor your workout plan",
            Self::Position => "Select your primary position on the court",
            Self::Schedule => "Select days, hours, and preferred time of day",
            Self::Level => "This helps us determine the intensity of your workouts",
            Self::Improvement => "Be honest about what you feel you lack in your game",
            Self::Result => "A custom basketball training program built from your profile",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Position => "position",
            Self::Schedule => "schedule",
            Self::Level => "level",
            Self::Improvement => "improvement",
            Self::Result => "result",
        };
        f.write_str(s)
    }
}

/// Errors from wizard operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("a workout plan is already being generated")]
    GenerationInFlight,

    #[error("no workout plan generation is in progress")]
    NotGenerating,

    #[error("invalid wizard transition: {from} -> {to}")]
    InvalidTransition { from: Step, to: Step },
}

/// Outcome of [`Wizard::next`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved forward to the given step.
    Moved(Step),
    /// The improvement step was completed: generate a plan for this request.
    Submit(PlanRequest),
    /// Nothing to advance to (already on the result step).
    Stay,
}

/// The profile being filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub name: String,
    pub age: String,
    pub position: Option<Position>,
    pub level: Option<Level>,
    pub improvement: String,
    pub schedule: Schedule,
}

impl Draft {
    /// Submission payload: the profile plus selected days only.
    pub fn to_request(&self) -> PlanRequest {
        PlanRequest {
            name: self.name.clone(),
            age: self.age.clone(),
            position: self.position.map(|p| p.as_str().to_owned()).unwrap_or_default(),
            level: self.level.map(|l| l.as_str().to_owned()).unwrap_or_default(),
            improvement: self.improvement.clone(),
            available_days: self.schedule.selected_days(),
        }
    }
}

/// Wizard session state.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: Step,
    draft: Draft,
    loading: bool,
    plan: Option<Value>,
    error: Option<String>,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `from -> to` is an edge of the step graph (restart excluded).
    pub fn is_valid_transition(from: Step, to: Step) -> bool {
        let (f, t) = (from.index(), to.index());
        let forward = t == f + 1 && t < Step::Result.index();
        let back = t + 1 == f && from != Step::Result;
        let generated = from == Step::Improvement && to == Step::Result;
        forward || back || generated
    }

    fn transition(&mut self, to: Step) -> Result<(), WizardError> {
        let from = self.step;
        if !Self::is_valid_transition(from, to) {
            return Err(WizardError::InvalidTransition { from, to });
        }
        self.step = to;
        Ok(())
    }

    // -- Accessors --

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Raw plan JSON from the last successful generation.
    pub fn plan(&self) -> Option<&Value> {
        self.plan.as_ref()
    }

    /// Typed view of the plan, when its shape allows one.
    pub fn workout_plan(&self) -> Option<WorkoutPlan> {
        self.plan.as_ref().and_then(|v| WorkoutPlan::from_value(v).ok())
    }

    /// Message from the last failed generation, cleared on resubmission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // -- Field mutation --

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_age(&mut self, age: impl Into<String>) {
        self.draft.age = age.into();
    }

    pub fn set_position(&mut self, position: Position) {
        self.draft.position = Some(position);
    }

    pub fn set_level(&mut self, level: Level) {
        self.draft.level = Some(level);
    }

    pub fn set_improvement(&mut self, improvement: impl Into<String>) {
        self.draft.improvement = improvement.into();
    }

    pub fn toggle_day(&mut self, day: Day) {
        self.draft.schedule.toggle_day(day);
    }

    pub fn set_hours(&mut self, day: Day, hours: f64) {
        self.draft.schedule.set_hours(day, hours);
    }

    pub fn toggle_time_of_day(&mut self, day: Day, time: TimeOfDay) {
        self.draft.schedule.toggle_time_of_day(day, time);
    }

    // -- Navigation --

    /// Advance one step, or submit from the improvement step.
    ///
    /// Submitting sets the loading flag; a second `next` before
    /// [`Self::finish_generation`] fails with
    /// [`WizardError::GenerationInFlight`].
    pub fn next(&mut self) -> Result<Advance, WizardError> {
        if self.loading {
            return Err(WizardError::GenerationInFlight);
        }
        match self.step {
            Step::Result => Ok(Advance::Stay),
            Step::Improvement => {
                self.loading = true;
                self.error = None;
                Ok(Advance::Submit(self.draft.to_request()))
            }
            current => {
                let to = Step::from_index(current.index() + 1).unwrap_or(Step::Result);
                self.transition(to)?;
                Ok(Advance::Moved(to))
            }
        }
    }

    /// Step back. Returns `false` when there is nowhere to go (first step,
    /// result step, or while loading).
    pub fn back(&mut self) -> bool {
        if self.loading {
            return false;
        }
        let current = self.step;
        match current.index().checked_sub(1).and_then(Step::from_index) {
            Some(to) => self.transition(to).is_ok(),
            None => false,
        }
    }

    /// Record the outcome of the in-flight generation.
    ///
    /// Success stores the plan and moves to the result step; failure keeps
    /// the wizard on the improvement step with the message set.
    pub fn finish_generation(&mut self, outcome: Result<Value, String>) -> Result<(), WizardError> {
        if !self.loading {
            return Err(WizardError::NotGenerating);
        }
        self.loading = false;
        match outcome {
            Ok(plan) => {
                self.plan = Some(plan);
                self.transition(Step::Result)
            }
            Err(message) => {
                self.error = Some(message);
                Ok(())
            }
        }
    }

    /// Start over with an empty draft.
    pub fn restart(&mut self) {
        *self = Self::default();
    }
}
