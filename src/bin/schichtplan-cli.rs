#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use schichtplan::{
    calendar::{self, CalendarOptions, EmptyDays, ShiftTemplate},
    io,
    model::Weekday,
    report::{ScheduleRenderer, TextReport},
    scheduler::{detect_violations, Scheduler},
    storage::{JsonStorage, Storage},
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification mensuelle des shifts (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le planning d'un mois
    Generate {
        /// Feuille des workers, CSV ou ODS/XLSX (Name, No-Go-Schichten, Frei-Tage, Fix-Tage, Anz-Tage, Springer, Folgetag)
        #[arg(long)]
        workers: String,
        #[arg(long)]
        year: i32,
        /// Numéro ou nom court du mois (8, aug, Okt)
        #[arg(long)]
        month: String,
        /// Template JSON ; template intégré par défaut
        #[arg(long)]
        template: Option<String>,
        /// Jour de repos, jamais planifié
        #[arg(long, default_value = "Sonntag")]
        rest_day: String,
        /// Garde les jours sans créneau dans le calendrier
        #[arg(long)]
        keep_empty_days: bool,
        /// Sauvegarde du planning (rechargeable par `check`)
        #[arg(long)]
        out: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier un planning sauvegardé
    Check {
        #[arg(long, default_value = "schedule.json")]
        schedule: String,
    },

    /// Exporter le template intégré
    Template {
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Generate {
            workers,
            year,
            month,
            template,
            rest_day,
            keep_empty_days,
            out,
            out_json,
            out_csv,
        } => {
            let template = match template {
                Some(path) => calendar::load_template_from_file(path)?,
                None => ShiftTemplate::default(),
            };
            let opts = CalendarOptions {
                rest_day: rest_day
                    .parse::<Weekday>()
                    .map_err(anyhow::Error::msg)
                    .context("--rest-day")?,
                empty_days: if keep_empty_days {
                    EmptyDays::Keep
                } else {
                    EmptyDays::Drop
                },
            };
            let days = calendar::generate_calendar(year, &month, &template, &opts)?;
            let workers = io::import_workers(&workers, year)?;

            let schedule = Scheduler::new(workers, days)?.run();

            if let Some(path) = out {
                JsonStorage::open(path)?.save(&schedule)?;
            }
            if let Some(path) = out_json {
                io::export_schedule_json(path, &schedule)?;
            }
            if let Some(path) = out_csv {
                io::export_slots_csv(path, &schedule)?;
            }
            print!("{}", TextReport.render(&schedule));

            if schedule.unfilled.is_empty() {
                0
            } else {
                eprintln!("Warning: {} slot(s) could not be filled", schedule.unfilled.len());
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Check { schedule } => {
            let schedule = JsonStorage::open(&schedule)?.load()?;
            let violations = detect_violations(&schedule);
            if violations.is_empty() {
                println!(
                    "OK: no violations ({}/{} slots filled)",
                    schedule.filled_count(),
                    schedule.slot_count()
                );
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                for v in &violations {
                    let when = match (v.date, v.start_time) {
                        (Some(d), Some(t)) => format!("{d} {}", t.format("%H:%M")),
                        _ => "-".to_string(),
                    };
                    eprintln!("  {} {} {}", v.kind.as_str(), v.worker, when);
                }
                2
            }
        }
        Commands::Template { out } => {
            calendar::export_template_json(&out, &ShiftTemplate::default())?;
            println!("Template written to {out}");
            0
        }
    };

    std::process::exit(code);
}
