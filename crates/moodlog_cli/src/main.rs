//! Inspection CLI over a MoodLog journal database.
//!
//! # Responsibility
//! - Verify `moodlog_core` linkage (`ping`).
//! - Print reports, profile summaries and calendar months for one account
//!   without the mobile UI.

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use moodlog_core::{
    default_log_level, format_date, init_logging, open_db, parse_date, AccountRepository, Month,
    ProfileService, QuoteService, ReportPeriod, ReportService, SqliteAccountRepository,
    SqliteEntryRepository, SqliteSettingsRepository, UserProfile,
};
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moodlog")]
#[command(version)]
#[command(about = "Inspect a MoodLog journal database", long_about = None)]
struct Cli {
    /// Journal database file.
    #[arg(long, env = "MOODLOG_DB_PATH", global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging stays off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Day treated as "today" (`YYYY-MM-DD`); defaults to the local date.
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core ping and version
    Ping,
    /// Energy report for the last 7, 30 or 90 days
    Report {
        #[arg(long)]
        email: String,
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long)]
        json: bool,
    },
    /// Profile summary: streaks, style and coaching lines
    Profile {
        #[arg(long)]
        email: String,
        #[arg(long)]
        json: bool,
    },
    /// Calendar month (`YYYY-MM`) of one account
    Month {
        #[arg(long)]
        email: String,
        #[arg(long)]
        month: Option<String>,
    },
    /// Today's quote (read-only: the daily quote cache is left untouched)
    Quote {
        #[arg(long)]
        email: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(default_log_level(), log_dir).context("failed to start logging")?;
    }

    let today = match cli.today.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };

    match cli.command {
        Commands::Ping => {
            println!("moodlog_core ping={}", moodlog_core::ping());
            println!("moodlog_core version={}", moodlog_core::core_version());
            Ok(())
        }
        Commands::Report { email, days, json } => {
            let conn = open_journal(cli.db)?;
            let user = find_user(&conn, &email)?;
            let period = ReportPeriod::from_days(days)
                .ok_or_else(|| anyhow!("--days must be 7, 30 or 90, got {days}"))?;
            let report = ReportService::new(SqliteEntryRepository::try_new(&conn)?)
                .build_report(user.uid, period, today)?;
            if json {
                return print_json(&report);
            }

            println!(
                "Report {} .. {} ({} days)",
                format_date(report.start),
                format_date(report.end),
                days
            );
            println!(
                "Written days: {}  Average energy: {:.1}/5  Trend: {}",
                report.written_days,
                report.average_energy,
                report.trend.label()
            );
            let series: Vec<String> = report
                .series
                .iter()
                .map(|point| format!("{}={}", point.label, point.energy))
                .collect();
            println!("Energy: {}", series.join(" "));
            for slice in &report.mood_pie {
                println!("  mood {}: {}", slice.label, slice.value);
            }
            for bar in &report.topic_bars {
                println!("  topic {}: {}", bar.topic, bar.value);
            }
            println!();
            for line in report
                .summary_lines
                .iter()
                .chain(&report.best_worst_lines)
                .chain([&report.mood_energy_line, &report.topic_energy_line])
            {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Profile { email, json } => {
            let conn = open_journal(cli.db)?;
            let user = find_user(&conn, &email)?;
            let summary = ProfileService::new(SqliteEntryRepository::try_new(&conn)?)
                .build_profile(&user, today)?;
            if json {
                return print_json(&summary);
            }

            println!("{}", summary.display_name.as_deref().unwrap_or(&summary.email));
            println!(
                "Member since: {}",
                summary.member_since.map_or_else(|| "-".to_string(), format_date)
            );
            println!(
                "Entries: {}  Last entry: {}",
                summary.all_time_count,
                summary
                    .last_entry_date
                    .map_or_else(|| "-".to_string(), format_date)
            );
            println!(
                "Streak: {} (best {})  Average energy: {:.1}/5  Trend: {}",
                summary.streaks.current,
                summary.streaks.best,
                summary.average_energy,
                summary.trend.label()
            );
            println!("{}", summary.coach_line);
            for line in &summary.style_lines {
                println!("  {line}");
            }
            println!("{}", summary.mood_energy_line);
            println!("{}", summary.topic_coach_line);
            Ok(())
        }
        Commands::Month { email, month } => {
            let conn = open_journal(cli.db)?;
            let user = find_user(&conn, &email)?;
            let month = match month.as_deref() {
                Some(raw) => Month::parse(raw)?,
                None => Month::of(today),
            };
            let view = moodlog_core::DiaryService::new(SqliteEntryRepository::try_new(&conn)?)
                .month_view(user.uid, month)?;

            println!("{} ({} entries)", view.month, view.entries.len());
            for entry in &view.entries {
                println!(
                    "{} {} energy={} topic={}",
                    format_date(entry.date),
                    entry.mood.badge(),
                    entry.energy_score(),
                    if entry.has_topic() { entry.topic.as_str() } else { "-" }
                );
            }
            Ok(())
        }
        Commands::Quote { email } => {
            let conn = open_journal(cli.db)?;
            let uid = match email.as_deref() {
                Some(email) => Some(find_user(&conn, email)?.uid),
                None => None,
            };
            let quote = QuoteService::new(SqliteSettingsRepository::try_new(&conn)?)
                .peek_quote(uid, today)?;
            match quote {
                Some(quote) => match quote.author {
                    Some(author) => println!("\"{}\" - {author}", quote.text),
                    None => println!("\"{}\"", quote.text),
                },
                None => println!("No quote available."),
            }
            Ok(())
        }
    }
}

/// Opens an existing journal. Pending migrations still run on open.
fn open_journal(db: Option<PathBuf>) -> Result<Connection> {
    let Some(path) = db else {
        bail!("no journal database; pass --db or set MOODLOG_DB_PATH");
    };
    if !path.is_file() {
        bail!("journal database {} does not exist", path.display());
    }
    open_db(&path).with_context(|| format!("failed to open journal at {}", path.display()))
}

fn find_user(conn: &Connection, email: &str) -> Result<UserProfile> {
    SqliteAccountRepository::try_new(conn)?
        .find_by_email(email)?
        .ok_or_else(|| anyhow!("no account registered for {email}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
