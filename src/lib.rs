#![forbid(unsafe_code)]
//! Schichtplan — génération locale d'un planning mensuel de shifts (sans BD).
//!
//! - Calendrier du mois déplié depuis un template hebdomadaire.
//! - Affectation gloutonne en une passe, départage par l'ordre des workers.
//! - Créneaux non pourvus rendus comme données, jamais comme erreurs.
//! - Import CSV des workers ; export JSON/CSV ; audit d'un planning sauvegardé.

pub mod calendar;
pub mod io;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod storage;

pub use calendar::{
    export_template_json, generate_calendar, load_template_from_file, parse_month,
    CalendarOptions, EmptyDays, ShiftDef, ShiftTemplate,
};
pub use model::{
    CalendarDay, Schedule, ShiftRange, Slot, UnfilledSlot, Weekday, Worker, WorkerName,
};
pub use report::{ScheduleRenderer, TextReport};
pub use scheduler::{
    detect_violations, EligibilityPath, SchedError, Scheduler, Violation, ViolationKind,
};
pub use storage::{JsonStorage, Storage};
