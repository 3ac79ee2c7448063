use super::{types::EligibilityPath, util, Scheduler};
use crate::model::{CalendarDay, Slot, UnfilledSlot, Worker, WorkerName};
use chrono::NaiveDate;
use std::collections::HashMap;

pub(super) fn fill_slots(scheduler: &mut Scheduler) {
    let schedule = &mut scheduler.schedule;
    let index = util::day_index(&schedule.days);

    for day_idx in 0..schedule.days.len() {
        let mut day_assigned: Vec<WorkerName> = Vec::new();

        for slot_idx in 0..schedule.days[day_idx].slots.len() {
            let candidate = schedule.days[day_idx].slots[slot_idx].clone();

            let chosen = schedule.workers.iter().position(|worker| {
                match eligibility(worker, &candidate, &day_assigned, &schedule.days, &index) {
                    Some(path) => {
                        tracing::debug!(
                            worker = %worker.name,
                            date = %candidate.date,
                            start = %candidate.start_time,
                            path = %path,
                            "slot assigned"
                        );
                        true
                    }
                    None => false,
                }
            });

            match chosen {
                Some(worker_idx) => {
                    let worker = &mut schedule.workers[worker_idx];
                    worker.record_assignment();
                    day_assigned.push(worker.name.clone());
                    schedule.days[day_idx].slots[slot_idx].assigned = Some(worker.name.clone());
                }
                None => {
                    tracing::warn!(
                        date = %candidate.date,
                        weekday = %candidate.weekday,
                        start = %candidate.start_time,
                        "could not fill slot"
                    );
                    schedule.unfilled.push(UnfilledSlot::from(&candidate));
                }
            }
        }
    }

    tracing::info!(
        slots = schedule.slot_count(),
        filled = schedule.filled_count(),
        unfilled = schedule.unfilled.len(),
        "assignment finished"
    );
}

/// Contraintes dures d'abord, puis le premier chemin d'éligibilité qui s'applique.
fn eligibility(
    worker: &Worker,
    slot: &Slot,
    day_assigned: &[WorkerName],
    days: &[CalendarDay],
    index: &HashMap<NaiveDate, usize>,
) -> Option<EligibilityPath> {
    if day_assigned.contains(&worker.name) {
        return None;
    }
    if !worker.is_available_on(slot.date, slot.weekday) {
        return None;
    }
    if !worker.may_work_on(slot.weekday) {
        return None;
    }
    if !worker.has_capacity() {
        return None;
    }

    if worker.floater {
        return Some(EligibilityPath::Floater);
    }
    if worker.below_minimum() {
        return Some(EligibilityPath::MinimumFill);
    }
    if worker.allows_consecutive_day
        && util::worked_previous_day(days, index, slot.date, &worker.name)
    {
        return Some(EligibilityPath::ConsecutiveDay);
    }

    None
}
