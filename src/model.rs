use crate::scheduler::SchedError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Jour de la semaine, sérialisé avec son nom allemand (`Montag` … `Sonntag`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Montag", alias = "Monday")]
    Monday,
    #[serde(rename = "Dienstag", alias = "Tuesday")]
    Tuesday,
    #[serde(rename = "Mittwoch", alias = "Wednesday")]
    Wednesday,
    #[serde(rename = "Donnerstag", alias = "Thursday")]
    Thursday,
    #[serde(rename = "Freitag", alias = "Friday")]
    Friday,
    #[serde(rename = "Samstag", alias = "Saturday")]
    Saturday,
    #[serde(rename = "Sonntag", alias = "Sunday")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Nom allemand, tel qu'il apparaît dans les feuilles de saisie.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Montag",
            Weekday::Tuesday => "Dienstag",
            Weekday::Wednesday => "Mittwoch",
            Weekday::Thursday => "Donnerstag",
            Weekday::Friday => "Freitag",
            Weekday::Saturday => "Samstag",
            Weekday::Sunday => "Sonntag",
        }
    }

    fn english(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Accepte les noms allemands et anglais (insensible à la casse) ainsi que
/// les abréviations anglaises sur trois lettres.
impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let english = day.english();
                needle == day.name().to_lowercase() || needle == english || needle == english[..3]
            })
            .ok_or_else(|| format!("unknown weekday: {}", s.trim()))
    }
}

/// Identifiant fort pour Worker : le nom, unique dans un planning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerName(String);

impl WorkerName {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Bornes inclusives du nombre de créneaux du mois, écrites `"min-max"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShiftRange {
    min: u32,
    max: u32,
}

impl ShiftRange {
    pub fn new(min: u32, max: u32) -> Result<Self, String> {
        if min > max {
            return Err(format!("minimum {min} is greater than maximum {max}"));
        }
        Ok(Self { min, max })
    }
    pub fn min(&self) -> u32 {
        self.min
    }
    pub fn max(&self) -> u32 {
        self.max
    }
}

impl FromStr for ShiftRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected \"min-max\", got {:?}", s.trim()))?;
        let min = min
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("non-numeric minimum in {:?}", s.trim()))?;
        let max = max
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("non-numeric maximum in {:?}", s.trim()))?;
        ShiftRange::new(min, max)
    }
}

impl TryFrom<String> for ShiftRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShiftRange> for String {
    fn from(range: ShiftRange) -> Self {
        format!("{}-{}", range.min, range.max)
    }
}

/// Personne planifiable et ses contraintes pour le mois.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub name: WorkerName,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub unavailable_weekdays: BTreeSet<Weekday>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub unavailable_dates: BTreeSet<NaiveDate>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub fixed_weekdays: BTreeSet<Weekday>,
    pub shifts: ShiftRange,
    #[serde(default)]
    pub floater: bool,
    #[serde(default)]
    pub allows_consecutive_day: bool,
    #[serde(default)]
    assigned_shift_count: u32,
}

impl Worker {
    /// Crée un worker sans contrainte de disponibilité ; le nom ne peut pas être vide.
    pub fn new<N: AsRef<str>>(name: N, shifts: ShiftRange) -> Result<Self, SchedError> {
        let name = WorkerName::new(name);
        if name.as_str().is_empty() {
            return Err(SchedError::configuration("", "name cannot be empty"));
        }
        Ok(Self {
            name,
            unavailable_weekdays: BTreeSet::new(),
            unavailable_dates: BTreeSet::new(),
            fixed_weekdays: BTreeSet::new(),
            shifts,
            floater: false,
            allows_consecutive_day: false,
            assigned_shift_count: 0,
        })
    }

    pub fn assigned_shift_count(&self) -> u32 {
        self.assigned_shift_count
    }

    pub fn is_available_on(&self, date: NaiveDate, weekday: Weekday) -> bool {
        !self.unavailable_dates.contains(&date) && !self.unavailable_weekdays.contains(&weekday)
    }

    pub fn may_work_on(&self, weekday: Weekday) -> bool {
        self.fixed_weekdays.is_empty() || self.fixed_weekdays.contains(&weekday)
    }

    pub fn has_capacity(&self) -> bool {
        self.assigned_shift_count < self.shifts.max()
    }

    pub fn below_minimum(&self) -> bool {
        self.assigned_shift_count < self.shifts.min()
    }

    pub(crate) fn record_assignment(&mut self) {
        debug_assert!(self.has_capacity());
        self.assigned_shift_count += 1;
    }

    pub(crate) fn reset_assignments(&mut self) {
        self.assigned_shift_count = 0;
    }
}

/// Créneau daté : une instance de shift à une date et une heure de début.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub assigned: Option<WorkerName>,
}

impl Slot {
    pub fn new(date: NaiveDate, weekday: Weekday, start_time: NaiveTime) -> Self {
        Self {
            date,
            weekday,
            start_time,
            assigned: None,
        }
    }
}

/// Jour du calendrier et ses créneaux, dans l'ordre du template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl CalendarDay {
    pub fn has_worker(&self, name: &WorkerName) -> bool {
        self.slots.iter().any(|s| s.assigned.as_ref() == Some(name))
    }
}

/// Créneau resté vide après le passage du moteur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfilledSlot {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub start_time: NaiveTime,
}

impl From<&Slot> for UnfilledSlot {
    fn from(slot: &Slot) -> Self {
        Self {
            date: slot.date,
            weekday: slot.weekday,
            start_time: slot.start_time,
        }
    }
}

/// Planning complet produit par un run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Schedule {
    pub days: Vec<CalendarDay>,
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub unfilled: Vec<UnfilledSlot>,
}

impl Schedule {
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.days.iter().flat_map(|d| d.slots.iter())
    }
    pub fn slot_count(&self) -> usize {
        self.slots().count()
    }
    pub fn filled_count(&self) -> usize {
        self.slots().filter(|s| s.assigned.is_some()).count()
    }
    pub fn find_worker<'a>(&'a self, name: &WorkerName) -> Option<&'a Worker> {
        self.workers.iter().find(|w| &w.name == name)
    }
    /// Workers restés sous leur minimum à la fin du run.
    pub fn below_minimum(&self) -> Vec<&Worker> {
        self.workers.iter().filter(|w| w.below_minimum()).collect()
    }
}
