use crate::model::Schedule;

/// Permet de customiser le rendu du planning (texte, mail, etc.).
pub trait ScheduleRenderer {
    fn render(&self, schedule: &Schedule) -> String;
}

/// Rendu texte : un créneau par ligne, puis les créneaux vides et le bilan par worker.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

impl ScheduleRenderer for TextReport {
    fn render(&self, schedule: &Schedule) -> String {
        let mut out = String::new();

        for day in &schedule.days {
            if day.slots.is_empty() {
                out.push_str(&format!("{} {:<10} -\n", day.date, day.weekday));
            }
            for slot in &day.slots {
                let who = slot.assigned.as_ref().map_or("(unfilled)", |n| n.as_str());
                out.push_str(&format!(
                    "{} {:<10} {} {}\n",
                    slot.date,
                    slot.weekday,
                    slot.start_time.format("%H:%M"),
                    who
                ));
            }
        }

        if !schedule.unfilled.is_empty() {
            out.push_str(&format!("\nUnfilled slots: {}\n", schedule.unfilled.len()));
            for slot in &schedule.unfilled {
                out.push_str(&format!(
                    "  {} {} {}\n",
                    slot.date,
                    slot.weekday,
                    slot.start_time.format("%H:%M")
                ));
            }
        }

        out.push_str("\nWorkers:\n");
        for worker in &schedule.workers {
            let note = if worker.below_minimum() {
                " (below minimum)"
            } else {
                ""
            };
            out.push_str(&format!(
                "  {}: {} [{}-{}]{}\n",
                worker.name,
                worker.assigned_shift_count(),
                worker.shifts.min(),
                worker.shifts.max(),
                note
            ));
        }

        out
    }
}
