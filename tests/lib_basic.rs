#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use schichtplan::{
    detect_violations, generate_calendar, CalendarDay, CalendarOptions, EmptyDays, SchedError,
    Schedule, ScheduleRenderer, Scheduler, ShiftRange, ShiftTemplate, Slot, TextReport,
    ViolationKind, Weekday, Worker, WorkerName,
};

fn worker(name: &str, min: u32, max: u32) -> Worker {
    Worker::new(name, ShiftRange::new(min, max).unwrap()).unwrap()
}

fn floater(name: &str, max: u32) -> Worker {
    let mut w = worker(name, 0, max);
    w.floater = true;
    w
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn single_day(date: NaiveDate, weekday: Weekday, starts: &[NaiveTime]) -> Vec<CalendarDay> {
    vec![CalendarDay {
        date,
        weekday,
        slots: starts.iter().map(|&s| Slot::new(date, weekday, s)).collect(),
    }]
}

fn count_for(schedule: &Schedule, name: &str) -> u32 {
    schedule
        .find_worker(&WorkerName::new(name))
        .unwrap()
        .assigned_shift_count()
}

#[test]
fn four_mondays_go_to_the_only_worker() {
    let template = ShiftTemplate::empty().with_day(Weekday::Monday, [t(18, 0)]);
    // août 2025 : lundis 4, 11, 18, 25
    let days = generate_calendar(2025, "aug", &template, &CalendarOptions::default()).unwrap();
    assert_eq!(days.len(), 4);

    let schedule = Scheduler::new(vec![floater("anna", 10)], days).unwrap().run();

    assert!(schedule.unfilled.is_empty());
    assert_eq!(count_for(&schedule, "anna"), 4);
    assert!(schedule
        .slots()
        .all(|s| s.assigned == Some(WorkerName::new("anna"))));
}

#[test]
fn worker_with_zero_minimum_needs_another_path() {
    let template = ShiftTemplate::empty().with_day(Weekday::Monday, [t(18, 0)]);
    let days = generate_calendar(2025, "aug", &template, &CalendarOptions::default()).unwrap();

    let schedule = Scheduler::new(vec![worker("ben", 0, 10)], days).unwrap().run();

    assert_eq!(count_for(&schedule, "ben"), 0);
    assert_eq!(schedule.unfilled.len(), 4);
}

#[test]
fn fixed_day_worker_skips_other_weekdays() {
    let thursday = d(2025, 8, 7);
    let mut fixed = floater("fix", 10);
    fixed.fixed_weekdays.insert(Weekday::Friday);

    let schedule = Scheduler::new(
        vec![fixed.clone()],
        single_day(thursday, Weekday::Thursday, &[t(15, 30)]),
    )
    .unwrap()
    .run();
    assert_eq!(schedule.unfilled.len(), 1);
    assert_eq!(schedule.unfilled[0].date, thursday);
    assert_eq!(count_for(&schedule, "fix"), 0);

    let schedule = Scheduler::new(
        vec![fixed, floater("other", 10)],
        single_day(thursday, Weekday::Thursday, &[t(15, 30)]),
    )
    .unwrap()
    .run();
    assert!(schedule.unfilled.is_empty());
    assert_eq!(
        schedule.days[0].slots[0].assigned,
        Some(WorkerName::new("other"))
    );
}

#[test]
fn worker_at_maximum_is_skipped() {
    let template = ShiftTemplate::empty().with_day(Weekday::Monday, [t(18, 0)]);
    let days = generate_calendar(2025, "aug", &template, &CalendarOptions::default()).unwrap();

    let schedule = Scheduler::new(vec![floater("solo", 1)], days).unwrap().run();

    assert_eq!(count_for(&schedule, "solo"), 1);
    assert_eq!(schedule.days[0].slots[0].assigned, Some(WorkerName::new("solo")));
    assert_eq!(schedule.unfilled.len(), 3);
    assert_eq!(schedule.unfilled[0].date, d(2025, 8, 11));
}

#[test]
fn roster_order_breaks_ties() {
    let monday = d(2025, 8, 4);
    let a = floater("a", 5);
    let b = worker("b", 1, 5);

    let schedule = Scheduler::new(
        vec![a.clone(), b.clone()],
        single_day(monday, Weekday::Monday, &[t(18, 0)]),
    )
    .unwrap()
    .run();
    assert_eq!(schedule.days[0].slots[0].assigned, Some(WorkerName::new("a")));
    assert_eq!(count_for(&schedule, "b"), 0);
    assert!(schedule.below_minimum().iter().any(|w| w.name.as_str() == "b"));

    let schedule = Scheduler::new(vec![b, a], single_day(monday, Weekday::Monday, &[t(18, 0)]))
        .unwrap()
        .run();
    assert_eq!(schedule.days[0].slots[0].assigned, Some(WorkerName::new("b")));
}

#[test]
fn no_double_booking_within_a_day() {
    let friday = d(2025, 8, 1);
    let schedule = Scheduler::new(
        vec![floater("anna", 10)],
        single_day(friday, Weekday::Friday, &[t(15, 30), t(19, 30)]),
    )
    .unwrap()
    .run();

    assert_eq!(count_for(&schedule, "anna"), 1);
    assert_eq!(schedule.unfilled.len(), 1);
    assert_eq!(schedule.unfilled[0].start_time, t(19, 30));
}

#[test]
fn unavailable_dates_and_weekdays_are_respected() {
    let template = ShiftTemplate::empty()
        .with_day(Weekday::Monday, [t(18, 0)])
        .with_day(Weekday::Tuesday, [t(18, 0)]);
    let days = generate_calendar(2025, "sep", &template, &CalendarOptions::default()).unwrap();

    let mut picky = floater("picky", 20);
    picky.unavailable_weekdays.insert(Weekday::Tuesday);
    picky.unavailable_dates.insert(d(2025, 9, 8));
    let backup = floater("backup", 20);

    let schedule = Scheduler::new(vec![picky, backup], days).unwrap().run();

    for slot in schedule.slots() {
        let expected = if slot.weekday == Weekday::Tuesday || slot.date == d(2025, 9, 8) {
            "backup"
        } else {
            "picky"
        };
        assert_eq!(slot.assigned, Some(WorkerName::new(expected)), "{}", slot.date);
    }
}

#[test]
fn consecutive_day_path_needs_work_on_previous_calendar_day() {
    let template = ShiftTemplate::empty()
        .with_day(Weekday::Monday, [t(18, 0)])
        .with_day(Weekday::Tuesday, [t(18, 0)]);
    // septembre 2025 commence un lundi
    let days = generate_calendar(2025, "9", &template, &CalendarOptions::default()).unwrap();

    let mut chain = worker("chain", 1, 5);
    chain.allows_consecutive_day = true;
    let schedule = Scheduler::new(vec![chain], days.clone()).unwrap().run();

    // 1er : minimum ; 2 : lendemain ; 8 : le 7 (dimanche) n'est pas au calendrier
    assert_eq!(count_for(&schedule, "chain"), 2);
    assert_eq!(schedule.days[0].slots[0].assigned, Some(WorkerName::new("chain")));
    assert_eq!(schedule.days[1].slots[0].assigned, Some(WorkerName::new("chain")));
    assert!(schedule.days[2..].iter().all(|day| day.slots[0].assigned.is_none()));

    let schedule = Scheduler::new(vec![worker("plain", 1, 5)], days).unwrap().run();
    assert_eq!(count_for(&schedule, "plain"), 1);
}

#[test]
fn consecutive_day_path_is_false_after_an_empty_rest_day() {
    let template = ShiftTemplate::empty()
        .with_day(Weekday::Saturday, [t(13, 30)])
        .with_day(Weekday::Sunday, [t(13, 30)])
        .with_day(Weekday::Monday, [t(18, 0)]);
    let opts = CalendarOptions {
        empty_days: EmptyDays::Keep,
        ..CalendarOptions::default()
    };
    let days = generate_calendar(2025, "aug", &template, &opts).unwrap();

    let mut chain = worker("chain", 1, 10);
    chain.allows_consecutive_day = true;
    let schedule = Scheduler::new(vec![chain], days).unwrap().run();

    // samedi 2 : minimum ; dimanche 3 : aucun créneau ; lundi 4 : la veille est vide
    assert_eq!(count_for(&schedule, "chain"), 1);
    let monday = schedule.days.iter().find(|day| day.date == d(2025, 8, 4)).unwrap();
    assert!(monday.slots[0].assigned.is_none());
}

fn mixed_roster() -> Vec<Worker> {
    let mut anna = worker("anna", 2, 6);
    anna.fixed_weekdays.insert(Weekday::Friday);
    anna.fixed_weekdays.insert(Weekday::Saturday);
    let mut ben = worker("ben", 4, 8);
    ben.unavailable_weekdays.insert(Weekday::Monday);
    ben.allows_consecutive_day = true;
    let mut cara = floater("cara", 10);
    cara.unavailable_dates.insert(d(2025, 8, 15));
    let dan = worker("dan", 3, 3);
    vec![anna, ben, cara, dan]
}

#[test]
fn full_month_respects_hard_constraints() {
    let days =
        generate_calendar(2025, "aug", &ShiftTemplate::default(), &CalendarOptions::default())
            .unwrap();
    let schedule = Scheduler::new(mixed_roster(), days).unwrap().run();

    assert!(detect_violations(&schedule).is_empty());
    for w in &schedule.workers {
        assert!(w.assigned_shift_count() <= w.shifts.max(), "{}", w.name);
    }
    assert_eq!(
        schedule.filled_count() + schedule.unfilled.len(),
        schedule.slot_count()
    );
    let total: u32 = schedule.workers.iter().map(|w| w.assigned_shift_count()).sum();
    assert_eq!(total as usize, schedule.filled_count());
}

#[test]
fn identical_inputs_give_identical_schedules() {
    let run = || {
        let days =
            generate_calendar(2025, "aug", &ShiftTemplate::default(), &CalendarOptions::default())
                .unwrap();
        Scheduler::new(mixed_roster(), days).unwrap().run()
    };
    assert_eq!(run(), run());
}

#[test]
fn rerunning_on_a_finished_schedule_starts_from_scratch() {
    let template = ShiftTemplate::empty().with_day(Weekday::Monday, [t(18, 0)]);
    let days = generate_calendar(2025, "aug", &template, &CalendarOptions::default()).unwrap();
    let first = Scheduler::new(vec![floater("anna", 4)], days.clone())
        .unwrap()
        .run();
    assert_eq!(count_for(&first, "anna"), 4);

    let again = Scheduler::new(first.workers.clone(), days).unwrap().run();
    assert_eq!(again, first);

    // créneaux déjà remplis et compteurs déjà à 4
    let replay = Scheduler::new(first.workers.clone(), first.days.clone())
        .unwrap()
        .run();
    assert!(replay.unfilled.is_empty());
    assert_eq!(count_for(&replay, "anna"), 4);
    assert_eq!(replay, first);
}

#[test]
fn duplicate_worker_names_are_rejected() {
    let monday = d(2025, 8, 4);
    let err = Scheduler::new(
        vec![floater("x", 1), worker("x", 0, 2)],
        single_day(monday, Weekday::Monday, &[t(18, 0)]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SchedError::Configuration { ref worker, ref reason }
            if worker == "x" && reason == "duplicate worker name"
    ));
}

#[test]
fn audit_flags_tampered_schedule() {
    let days =
        generate_calendar(2025, "aug", &ShiftTemplate::default(), &CalendarOptions::default())
            .unwrap();
    let mut schedule = Scheduler::new(mixed_roster(), days).unwrap().run();

    // 2025-08-04 est un lundi : anna est fixée au vendredi/samedi, ben indisponible le lundi
    let monday = schedule
        .days
        .iter_mut()
        .find(|day| day.date == d(2025, 8, 4))
        .unwrap();
    monday.slots[0].assigned = Some(WorkerName::new("anna"));
    let friday = schedule
        .days
        .iter_mut()
        .find(|day| day.date == d(2025, 8, 8))
        .unwrap();
    friday.slots[0].assigned = Some(WorkerName::new("ben"));
    friday.slots[1].assigned = Some(WorkerName::new("ben"));
    let saturday = schedule
        .days
        .iter_mut()
        .find(|day| day.date == d(2025, 8, 9))
        .unwrap();
    saturday.slots[0].assigned = Some(WorkerName::new("ghost"));

    let kinds: Vec<ViolationKind> = detect_violations(&schedule)
        .into_iter()
        .map(|v| v.kind)
        .collect();
    assert!(kinds.contains(&ViolationKind::OffFixedDay));
    assert!(kinds.contains(&ViolationKind::DoubleBooking));
    assert!(kinds.contains(&ViolationKind::UnknownWorker));
}

#[test]
fn audit_flags_over_capacity() {
    let monday = d(2025, 8, 4);
    let mut schedule = Scheduler::new(
        vec![floater("solo", 1)],
        vec![
            CalendarDay {
                date: monday,
                weekday: Weekday::Monday,
                slots: vec![Slot::new(monday, Weekday::Monday, t(18, 0))],
            },
            CalendarDay {
                date: d(2025, 8, 5),
                weekday: Weekday::Tuesday,
                slots: vec![Slot::new(d(2025, 8, 5), Weekday::Tuesday, t(18, 0))],
            },
        ],
    )
    .unwrap()
    .run();
    assert!(detect_violations(&schedule).is_empty());

    schedule.days[1].slots[0].assigned = Some(WorkerName::new("solo"));
    let violations = detect_violations(&schedule);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::OverCapacity);
}

#[test]
fn text_report_lists_unfilled_slots() {
    let friday = d(2025, 9, 5);
    let schedule = Scheduler::new(
        vec![floater("Anna", 1), worker("Ben", 2, 4)],
        single_day(friday, Weekday::Friday, &[t(15, 30), t(19, 30)]),
    )
    .unwrap()
    .run();

    insta::assert_snapshot!(TextReport.render(&schedule), @r###"
    2025-09-05 Freitag    15:30 Anna
    2025-09-05 Freitag    19:30 Ben

    Workers:
      Anna: 1 [0-1]
      Ben: 1 [2-4] (below minimum)
    "###);

    let schedule = Scheduler::new(
        vec![floater("Anna", 1)],
        single_day(friday, Weekday::Friday, &[t(15, 30), t(19, 30)]),
    )
    .unwrap()
    .run();
    let report = TextReport.render(&schedule);
    assert!(report.contains("2025-09-05 Freitag    19:30 (unfilled)"));
    assert!(report.contains("Unfilled slots: 1\n  2025-09-05 Freitag 19:30\n"));
}
