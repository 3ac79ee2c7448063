mod assignment;
mod conflicts;
mod types;
mod util;

pub use conflicts::detect_violations;
pub use types::{EligibilityPath, SchedError, Violation, ViolationKind};

use crate::model::{CalendarDay, Schedule, Worker};

/// Scheduler : encapsule un run d'affectation sur un calendrier du mois.
///
/// Les workers sont parcourus dans l'ordre fourni ; cet ordre sert aussi
/// de départage entre candidats éligibles.
#[derive(Debug, Default)]
pub struct Scheduler {
    schedule: Schedule,
}

impl Scheduler {
    /// Prépare un run : compteurs remis à zéro, créneaux vidés.
    ///
    /// Un planning déjà produit peut donc être rejoué tel quel ; les noms
    /// de workers doivent être uniques (`SchedError::Configuration` sinon).
    pub fn new(
        mut workers: Vec<Worker>,
        mut days: Vec<CalendarDay>,
    ) -> Result<Self, SchedError> {
        for (i, worker) in workers.iter().enumerate() {
            if workers[..i].iter().any(|w| w.name == worker.name) {
                return Err(SchedError::configuration(
                    worker.name.as_str(),
                    "duplicate worker name",
                ));
            }
        }
        workers.iter_mut().for_each(Worker::reset_assignments);
        for slot in days.iter_mut().flat_map(|day| day.slots.iter_mut()) {
            slot.assigned = None;
        }
        Ok(Self {
            schedule: Schedule {
                days,
                workers,
                unfilled: Vec::new(),
            },
        })
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Remplit tous les créneaux en une passe et rend le planning final.
    pub fn run(mut self) -> Schedule {
        assignment::fill_slots(&mut self);
        self.schedule
    }
}
