use super::{Violation, ViolationKind};
use crate::model::{Schedule, WorkerName};
use std::collections::{BTreeMap, BTreeSet};

/// Re-vérifie un planning (fraîchement produit ou rechargé depuis le disque).
pub fn detect_violations(schedule: &Schedule) -> Vec<Violation> {
    let mut out = Vec::new();
    let mut totals: BTreeMap<&WorkerName, u32> = BTreeMap::new();

    for day in &schedule.days {
        let mut seen: BTreeSet<&WorkerName> = BTreeSet::new();

        for slot in &day.slots {
            let Some(name) = slot.assigned.as_ref() else {
                continue;
            };
            let violation = |kind| Violation {
                worker: name.clone(),
                date: Some(slot.date),
                start_time: Some(slot.start_time),
                kind,
            };

            let Some(worker) = schedule.find_worker(name) else {
                out.push(violation(ViolationKind::UnknownWorker));
                continue;
            };
            *totals.entry(name).or_default() += 1;

            if !seen.insert(name) {
                out.push(violation(ViolationKind::DoubleBooking));
            }
            if !worker.is_available_on(slot.date, slot.weekday) {
                out.push(violation(ViolationKind::Unavailable));
            }
            if !worker.may_work_on(slot.weekday) {
                out.push(violation(ViolationKind::OffFixedDay));
            }
        }
    }

    for (name, total) in totals {
        let over = schedule
            .find_worker(name)
            .map_or(false, |w| total > w.shifts.max());
        if over {
            out.push(Violation {
                worker: name.clone(),
                date: None,
                start_time: None,
                kind: ViolationKind::OverCapacity,
            });
        }
    }

    out
}
