use crate::model::WorkerName;
use chrono::{NaiveDate, NaiveTime};
use std::fmt;
use thiserror::Error;

/// Chemin par lequel un worker est devenu éligible pour un créneau.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityPath {
    Floater,
    MinimumFill,
    ConsecutiveDay,
}

impl fmt::Display for EligibilityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EligibilityPath::Floater => "floater",
            EligibilityPath::MinimumFill => "minimum-fill",
            EligibilityPath::ConsecutiveDay => "consecutive-day",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    OverCapacity,
    DoubleBooking,
    Unavailable,
    OffFixedDay,
    UnknownWorker,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::OverCapacity => "over-capacity",
            ViolationKind::DoubleBooking => "double-booking",
            ViolationKind::Unavailable => "unavailable",
            ViolationKind::OffFixedDay => "off-fixed-day",
            ViolationKind::UnknownWorker => "unknown-worker",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Violation {
    pub worker: WorkerName,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub kind: ViolationKind,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid month: {0:?} (examples: 8, aug, Okt)")]
    InvalidMonth(String),
    #[error("invalid year: {0}")]
    InvalidYear(i32),
    #[error("invalid worker configuration for {worker:?}: {reason}")]
    Configuration { worker: String, reason: String },
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
}

impl SchedError {
    pub(crate) fn configuration<W: Into<String>, R: Into<String>>(worker: W, reason: R) -> Self {
        SchedError::Configuration {
            worker: worker.into(),
            reason: reason.into(),
        }
    }
}
