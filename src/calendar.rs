use crate::model::{CalendarDay, Slot, Weekday};
use crate::scheduler::SchedError;
use crate::storage::write_atomic;
use anyhow::{Context, Result};
use chrono::{Datelike, Month, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Définition d'un shift récurrent : seule l'heure de début l'identifie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDef {
    pub start_time: NaiveTime,
}

impl From<NaiveTime> for ShiftDef {
    fn from(start_time: NaiveTime) -> Self {
        Self { start_time }
    }
}

fn hm(hour: u32, minute: u32) -> ShiftDef {
    ShiftDef::from(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default())
}

/// Shifts par jour de semaine, dans l'ordre où ils sont pourvus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    #[serde(default)]
    pub shifts: BTreeMap<Weekday, Vec<ShiftDef>>,
}

impl Default for ShiftTemplate {
    /// Un shift en soirée du lundi au jeudi, deux le vendredi et le samedi, rien le dimanche.
    fn default() -> Self {
        let mut shifts = BTreeMap::new();
        for day in [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
        ] {
            shifts.insert(day, vec![hm(15, 30)]);
        }
        shifts.insert(Weekday::Friday, vec![hm(15, 30), hm(19, 30)]);
        shifts.insert(Weekday::Saturday, vec![hm(13, 30), hm(19, 30)]);
        Self { shifts }
    }
}

impl ShiftTemplate {
    pub fn empty() -> Self {
        Self {
            shifts: BTreeMap::new(),
        }
    }

    pub fn with_day<I>(mut self, weekday: Weekday, starts: I) -> Self
    where
        I: IntoIterator<Item = NaiveTime>,
    {
        self.shifts
            .insert(weekday, starts.into_iter().map(ShiftDef::from).collect());
        self
    }

    pub fn shifts_for(&self, weekday: Weekday) -> &[ShiftDef] {
        self.shifts.get(&weekday).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn validate(&self) -> Result<(), SchedError> {
        for (weekday, defs) in &self.shifts {
            let mut seen = BTreeSet::new();
            for def in defs {
                if !seen.insert(def.start_time) {
                    return Err(SchedError::InvalidTemplate(format!(
                        "duplicate start time {} on {weekday}",
                        def.start_time
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Sort des jours sans créneau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyDays {
    #[default]
    Drop,
    Keep,
}

#[derive(Debug, Clone, Copy)]
pub struct CalendarOptions {
    /// Jour de repos : jamais de créneau, même si le template en définit.
    pub rest_day: Weekday,
    pub empty_days: EmptyDays,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            rest_day: Weekday::Sunday,
            empty_days: EmptyDays::Drop,
        }
    }
}

const GERMAN_MONTHS: [(&str, Month); 12] = [
    ("januar", Month::January),
    ("februar", Month::February),
    ("mär", Month::March),
    ("märz", Month::March),
    ("maerz", Month::March),
    ("mai", Month::May),
    ("juni", Month::June),
    ("juli", Month::July),
    ("okt", Month::October),
    ("oktober", Month::October),
    ("dez", Month::December),
    ("dezember", Month::December),
];

/// Numéro (`8`, `08`), nom anglais (`aug`, `August`) ou allemand (`Okt`, `Dezember`).
pub fn parse_month(raw: &str) -> Result<Month, SchedError> {
    let token = raw.trim().to_lowercase();
    let invalid = || SchedError::InvalidMonth(raw.trim().to_string());

    if let Ok(number) = token.parse::<u8>() {
        return Month::try_from(number).map_err(|_| invalid());
    }
    if let Ok(month) = token.parse::<Month>() {
        return Ok(month);
    }
    GERMAN_MONTHS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, month)| *month)
        .ok_or_else(invalid)
}

/// Déplie un mois en jours datés et leurs créneaux, dans l'ordre du calendrier.
pub fn generate_calendar(
    year: i32,
    month: &str,
    template: &ShiftTemplate,
    opts: &CalendarOptions,
) -> Result<Vec<CalendarDay>, SchedError> {
    let month = parse_month(month)?;
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
        .ok_or(SchedError::InvalidYear(year))?;

    let mut days = Vec::new();
    for date in first.iter_days().take_while(|d| d.month() == first.month()) {
        let weekday = Weekday::from(date.weekday());
        let slots: Vec<Slot> = if weekday == opts.rest_day {
            Vec::new()
        } else {
            template
                .shifts_for(weekday)
                .iter()
                .map(|def| Slot::new(date, weekday, def.start_time))
                .collect()
        };

        if slots.is_empty() && opts.empty_days == EmptyDays::Drop {
            continue;
        }
        days.push(CalendarDay {
            date,
            weekday,
            slots,
        });
    }

    tracing::debug!(
        year,
        month = month.name(),
        days = days.len(),
        slots = days.iter().map(|d| d.slots.len()).sum::<usize>(),
        "calendar generated"
    );
    Ok(days)
}

pub fn export_template_json<P: AsRef<Path>>(path: P, template: &ShiftTemplate) -> Result<()> {
    let json = serde_json::to_vec_pretty(template)?;
    write_atomic(path.as_ref(), &json)
}

pub fn load_template_from_file<P: AsRef<Path>>(path: P) -> Result<ShiftTemplate> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading template {}", path.display()))?;
    let template: ShiftTemplate = serde_json::from_slice(&data)
        .with_context(|| format!("parsing template {}", path.display()))?;
    template.validate()?;
    Ok(template)
}
