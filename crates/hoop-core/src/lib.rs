//! HoopBuddy core: profile model, intake wizard, and workout plan generation.
//!
//! The crate is split into two halves that meet at [`PlanRequest`]:
//!
//! ```text
//! Wizard (draft + step navigation)
//!     |
//!     | next() on the improvement step
//!     v
//! PlanRequest { profile, availableDays }
//!     |
//!     v
//! Planner --PlanGenerator--> prompt --> TextModel (Gemini) --> response parsing
//!        \--RemotePlanner--> POST /api/generate-workout
//! ```
//!
//! Nothing here persists state; a wizard lives for one session and a
//! generation for one request.

pub mod error;
pub mod export;
pub mod generator;
pub mod loading;
pub mod model;
pub mod plan;
pub mod profile;
pub mod prompt;
pub mod remote;
pub mod response;
pub mod wizard;

pub use error::GenerateError;
pub use export::ExportFormat;
pub use generator::{PlanGenerator, Planner};
pub use loading::LoadingTicker;
pub use plan::{DaySchedule, Exercise, WorkoutPlan};
pub use profile::{
    AvailableDay, Day, DayAvailability, Level, PlanRequest, Position, Schedule, TimeOfDay,
};
pub use remote::RemotePlanner;
pub use wizard::{Advance, Step, Wizard, WizardError};
