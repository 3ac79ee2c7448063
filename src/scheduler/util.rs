use crate::model::{CalendarDay, WorkerName};
use chrono::NaiveDate;
use std::collections::HashMap;

pub(super) fn day_index(days: &[CalendarDay]) -> HashMap<NaiveDate, usize> {
    days.iter().enumerate().map(|(idx, d)| (d.date, idx)).collect()
}

/// Vrai si `worker` tient un créneau le jour calendaire précédant `date`.
/// Un jour absent du calendrier (jour de repos, jour vide écarté) compte comme non travaillé.
pub(super) fn worked_previous_day(
    days: &[CalendarDay],
    index: &HashMap<NaiveDate, usize>,
    date: NaiveDate,
    worker: &WorkerName,
) -> bool {
    date.pred_opt()
        .and_then(|prev| index.get(&prev))
        .map_or(false, |&idx| days[idx].has_worker(worker))
}
