use crate::model::{Schedule, ShiftRange, UnfilledSlot, Weekday, Worker, WorkerName};
use crate::scheduler::SchedError;
use crate::storage::write_atomic;
use anyhow::{bail, Context};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;

/// Colonnes de la feuille de saisie, repérées par le début de leur en-tête
/// (les en-têtes d'origine portent un indice, ex. `Anz-Tage [Min.-Max. (zBsp.: 0-4)]`).
const COL_NAME: &str = "Name";
const COL_NO_GO: &str = "No-Go-Schichten";
const COL_FREE_DAYS: &str = "Frei-Tage";
const COL_FIXED_DAYS: &str = "Fix-Tage";
const COL_RANGE: &str = "Anz-Tage";
const COL_FLOATER: &str = "Springer";
const COL_NEXT_DAY: &str = "Folgetag";

struct Columns {
    name: usize,
    no_go: Option<usize>,
    free_days: Option<usize>,
    fixed_days: Option<usize>,
    range: usize,
    floater: Option<usize>,
    next_day: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> anyhow::Result<Self> {
        let find = |prefix: &str| headers.iter().position(|h| h.trim().starts_with(prefix));
        Ok(Self {
            name: find(COL_NAME).with_context(|| format!("missing column {COL_NAME}"))?,
            no_go: find(COL_NO_GO),
            free_days: find(COL_FREE_DAYS),
            fixed_days: find(COL_FIXED_DAYS),
            range: find(COL_RANGE).with_context(|| format!("missing column {COL_RANGE}"))?,
            floater: find(COL_FLOATER),
            next_day: find(COL_NEXT_DAY),
        })
    }
}

/// Import des workers ; `.ods`, `.xlsx`, `.xls` et `.xlsb` passent par le
/// classeur (première feuille), tout le reste est lu comme CSV.
pub fn import_workers<P: AsRef<Path>>(path: P, year: i32) -> anyhow::Result<Vec<Worker>> {
    let path = path.as_ref();
    let is_sheet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SHEET_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
    if is_sheet {
        import_workers_sheet(path, year)
    } else {
        import_workers_csv(path, year)
    }
}

const SHEET_EXTENSIONS: [&str; 4] = ["ods", "xlsx", "xls", "xlsb"];

/// Import des workers depuis un CSV ; `year` complète les dates `15.08.`.
pub fn import_workers_csv<P: AsRef<Path>>(path: P, year: i32) -> anyhow::Result<Vec<Worker>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("reading {}", path.display()))?;
    read_workers_csv(file, year)
}

pub fn read_workers_csv<R: std::io::Read>(reader: R, year: i32) -> anyhow::Result<Vec<Worker>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    collect_workers(
        &headers,
        rdr.records().map(|r| r.map_err(anyhow::Error::from)),
        year,
    )
}

/// Import depuis la première feuille d'un classeur (ODS ou Excel).
pub fn import_workers_sheet<P: AsRef<Path>>(path: P, year: i32) -> anyhow::Result<Vec<Worker>> {
    let path = path.as_ref();
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("reading {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("no worksheet in {}", path.display()))?
        .with_context(|| format!("reading first worksheet of {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = range.height(), "worker sheet loaded");
    read_workers_range(&range, year)
}

/// Lecture d'une plage déjà chargée ; la première ligne porte les en-têtes.
pub fn read_workers_range(range: &Range<Data>, year: i32) -> anyhow::Result<Vec<Worker>> {
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<StringRecord>());
    let headers = rows.next().context("empty worksheet")?;
    collect_workers(&headers, rows.map(Ok), year)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        // date ODS : `2025-08-15` ou `2025-08-15T00:00:00`
        Data::DateTimeIso(s) => s.split('T').next().unwrap_or_default().to_string(),
        other => other.to_string(),
    }
}

fn collect_workers<I>(headers: &StringRecord, records: I, year: i32) -> anyhow::Result<Vec<Worker>>
where
    I: Iterator<Item = anyhow::Result<StringRecord>>,
{
    let cols = Columns::locate(headers)?;

    let mut out: Vec<Worker> = Vec::new();
    for (line, rec) in records.enumerate() {
        let rec = rec?;
        if rec.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let worker = parse_worker(&rec, &cols, year)
            .with_context(|| format!("invalid worker row {}", line + 1))?;
        if out.iter().any(|w| w.name == worker.name) {
            bail!(SchedError::configuration(
                worker.name.as_str(),
                "duplicate worker name"
            ));
        }
        out.push(worker);
    }
    tracing::debug!(workers = out.len(), "workers parsed");
    Ok(out)
}

fn field(rec: &StringRecord, col: Option<usize>) -> &str {
    col.and_then(|c| rec.get(c)).unwrap_or("").trim()
}

fn tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn parse_worker(rec: &StringRecord, cols: &Columns, year: i32) -> Result<Worker, SchedError> {
    let name = field(rec, Some(cols.name));
    if name.is_empty() {
        return Err(SchedError::configuration("", "missing name"));
    }
    let bad = |reason: String| SchedError::configuration(name, reason);

    let range = field(rec, Some(cols.range));
    if range.is_empty() {
        return Err(bad("missing shift-count range".to_string()));
    }
    let shifts: ShiftRange = range.parse().map_err(bad)?;
    let mut worker = Worker::new(name, shifts)?;

    worker.unavailable_weekdays = parse_no_go(field(rec, cols.no_go)).map_err(bad)?;
    worker.unavailable_dates = tokens(field(rec, cols.free_days))
        .map(|t| parse_free_day(t, year))
        .collect::<Result<_, _>>()
        .map_err(bad)?;
    worker.fixed_weekdays = tokens(field(rec, cols.fixed_days))
        .map(str::parse::<Weekday>)
        .collect::<Result<_, _>>()
        .map_err(bad)?;
    worker.floater = parse_flag(field(rec, cols.floater)).map_err(bad)?;
    worker.allows_consecutive_day = parse_flag(field(rec, cols.next_day)).map_err(bad)?;
    Ok(worker)
}

/// `Montag-1600, Freitag-1930` : seul le jour est retenu, l'heure est ignorée.
fn parse_no_go(raw: &str) -> Result<BTreeSet<Weekday>, String> {
    tokens(raw)
        .map(|t| t.split_once('-').map_or(t, |(day, _)| day).parse::<Weekday>())
        .collect()
}

fn parse_free_day(raw: &str, year: i32) -> Result<NaiveDate, String> {
    let invalid = || format!("invalid free day: {raw}");
    if raw.ends_with('.') {
        return NaiveDate::parse_from_str(&format!("{raw}{year}"), "%d.%m.%Y")
            .map_err(|_| invalid());
    }
    NaiveDate::parse_from_str(raw, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| invalid())
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "" | "nein" | "n" | "false" | "0" | "no" => Ok(false),
        "ja" | "j" | "true" | "1" | "yes" | "y" => Ok(true),
        other => Err(format!("expected Ja/Nein, got {other:?}")),
    }
}

#[derive(Serialize)]
struct SlotEntry<'a> {
    start_time: NaiveTime,
    assigned_worker: Option<&'a WorkerName>,
}

#[derive(Serialize)]
struct DayEntry<'a> {
    weekday: Weekday,
    slot_count: usize,
    slots: Vec<SlotEntry<'a>>,
}

#[derive(Serialize)]
struct ScheduleDocument<'a> {
    workdays_and_slots: BTreeMap<String, DayEntry<'a>>,
    workers: &'a [Worker],
    unfilled: &'a [UnfilledSlot],
}

/// Document JSON indexé par date (`YYYY-MM-DD`), suivi du bilan par worker.
pub fn render_schedule_json(schedule: &Schedule) -> anyhow::Result<String> {
    let workdays_and_slots = schedule
        .days
        .iter()
        .map(|day| {
            let entry = DayEntry {
                weekday: day.weekday,
                slot_count: day.slots.len(),
                slots: day
                    .slots
                    .iter()
                    .map(|s| SlotEntry {
                        start_time: s.start_time,
                        assigned_worker: s.assigned.as_ref(),
                    })
                    .collect(),
            };
            (day.date.format("%Y-%m-%d").to_string(), entry)
        })
        .collect();
    let doc = ScheduleDocument {
        workdays_and_slots,
        workers: &schedule.workers,
        unfilled: &schedule.unfilled,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn export_schedule_json<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    write_atomic(path.as_ref(), render_schedule_json(schedule)?.as_bytes())
}

/// Export CSV des créneaux: header `date,weekday,start_time,assigned_worker`
pub fn export_slots_csv<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    w.write_record(["date", "weekday", "start_time", "assigned_worker"])?;
    for s in schedule.slots() {
        let date = s.date.format("%Y-%m-%d").to_string();
        let start = s.start_time.format("%H:%M").to_string();
        w.write_record([
            date.as_str(),
            s.weekday.name(),
            start.as_str(),
            s.assigned.as_ref().map_or("", |n| n.as_str()),
        ])?;
    }
    let bytes = w.into_inner().map_err(|e| e.into_error())?;
    write_atomic(path.as_ref(), &bytes)
}
