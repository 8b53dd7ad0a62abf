//! Command-line front end for `lazyhabit_core`.
//!
//! # Responsibility
//! - Resolve configuration (file, then `LAZYHABIT_*` env, then flags).
//! - Create habits, toggle completions and print weekly/monthly reviews.
//!
//! # Commands
//!
//! - `add <TITLE>` - Create a habit
//! - `list` - List habits in creation order
//! - `toggle <HABIT>` - Flip completion for a habit on a date
//! - `week` - Weekly consistency review
//! - `month` - Monthly calendar review
//! - `board` - Per-habit board for the current week

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use lazyhabit_core::{
    init_logging, open_db, CoreConfig, CountingPolicy, DayStatus, Habit, HabitIcon, HabitId,
    LogLevel, MonthlyReview, NewHabit, ReviewService, SqliteHabitStore, WeekBoard, WeeklyReview,
    WeeklySchedule, WEEKDAY_LABELS,
};
use log::info;
use std::path::PathBuf;

/// Habit tracking with weekly and monthly consistency reviews.
#[derive(Parser)]
#[command(name = "lazyhabit", version)]
#[command(about = "Habit schedules and consistency reviews", long_about = None)]
struct Cli {
    /// JSON config file; fields omitted there keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// all_logs|scheduled_only
    #[arg(long, global = true)]
    policy: Option<CountingPolicy>,

    /// Reference date (YYYY-MM-DD); defaults to the local date
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a habit.
    Add {
        title: String,

        #[arg(long)]
        subtitle: Option<String>,

        /// Brain|Dumbbell|Coffee|Book|Activity|Check
        #[arg(long)]
        icon: Option<String>,

        /// `daily`, `weekdays`, `weekends`, `never`, a Monday-first mask
        /// like `1010100`, or day names like `mon,wed,fri`
        #[arg(long, default_value = "daily")]
        schedule: WeeklySchedule,
    },

    /// List habits in creation order.
    List,

    /// Flip completion for one habit on one of its scheduled dates.
    Toggle {
        /// Habit id or exact title
        habit: String,

        /// Defaults to the reference date
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Weekly consistency review.
    Week,

    /// Monthly calendar review.
    Month,

    /// Per-habit board for the current week.
    Board,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir)
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))?;
    let service = ReviewService::new(SqliteHabitStore::new(&conn), config.counting_policy);
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    info!(
        "event=cli_command module=cli status=start policy={} today={today}",
        config.counting_policy
    );

    match cli.command {
        Commands::Add {
            title,
            subtitle,
            icon,
            schedule,
        } => {
            let mut request = NewHabit::new(title).with_schedule(schedule);
            if let Some(subtitle) = subtitle {
                request = request.with_subtitle(subtitle);
            }
            if let Some(icon) = icon {
                request = request.with_icon(icon);
            }
            let habit = service.create_habit(&request)?;
            println!("created {} {}", habit.id, habit.title);
        }
        Commands::List => {
            for habit in service.list_habits()? {
                print_habit(&habit);
            }
        }
        Commands::Toggle { habit, date } => {
            let habits = service.list_habits()?;
            let habit = find_habit(&habits, &habit)?;
            let date = date.unwrap_or(today);
            ensure_due(habit, date)?;
            let outcome = service.toggle(habit.id, date)?;
            let state = if outcome.completed { "done" } else { "not done" };
            println!("{} on {date}: {state}", habit.title);
        }
        Commands::Week => print_week(&service.weekly_review(today)?),
        Commands::Month => print_month(&service.monthly_review(today)?),
        Commands::Board => print_board(&service.week_board(today)?),
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig> {
    let base = match cli.config.as_deref() {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    let mut config = base.with_env_overrides(|key| std::env::var(key).ok())?;

    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(policy) = cli.policy {
        config.counting_policy = policy;
    }
    Ok(config)
}

fn find_habit<'a>(habits: &'a [Habit], needle: &str) -> Result<&'a Habit> {
    if let Ok(id) = HabitId::parse_str(needle) {
        return habits
            .iter()
            .find(|habit| habit.id == id)
            .ok_or_else(|| anyhow!("no habit with id {id}"));
    }
    let mut matches = habits.iter().filter(|habit| habit.title == needle);
    match (matches.next(), matches.next()) {
        (Some(habit), None) => Ok(habit),
        (Some(_), Some(_)) => bail!("several habits are titled `{needle}`; use the id"),
        (None, _) => bail!("no habit titled `{needle}`"),
    }
}

/// Rejects completions on days the habit is not scheduled for.
fn ensure_due(habit: &Habit, date: NaiveDate) -> Result<()> {
    if !habit.is_due_on(date) {
        bail!(
            "`{}` is not scheduled on {date} ({}); due days: {}",
            habit.title,
            date.format("%A"),
            schedule_line(&habit.schedule)
        );
    }
    Ok(())
}

fn schedule_line(schedule: &WeeklySchedule) -> String {
    WEEKDAY_LABELS
        .iter()
        .zip(schedule.days())
        .map(|(label, due)| if due { *label } else { "-" })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_habit(habit: &Habit) {
    let icon = HabitIcon::from_key(Some(habit.icon.as_str()));
    println!(
        "{} {} {} ({}) [{}]",
        habit.id,
        icon.glyph(),
        habit.title,
        habit.subtitle,
        schedule_line(&habit.schedule)
    );
}

fn status_mark(status: DayStatus) -> &'static str {
    match status {
        DayStatus::None => ".",
        DayStatus::Low => "o",
        DayStatus::Medium => "O",
        DayStatus::High => "#",
    }
}

fn print_week(review: &WeeklyReview) {
    let report = &review.report;
    println!("Week of {} ({})", report.window.start(), report.policy);
    for stat in &report.days {
        println!(
            "  {} {}  {}/{}  {:>3}%  {}",
            stat.label(),
            stat.date,
            stat.completed,
            stat.scheduled,
            stat.percent,
            stat.status.as_str()
        );
    }
    println!("Consistency: {}%", report.consistency);
    println!("Active days: {}/{}", report.active_days, report.days.len());
    println!("Perfect days: {}", report.perfect_days);
    println!("Insight: {}", review.best_day_message());
}

fn print_month(review: &MonthlyReview) {
    println!("{}", review.title);
    println!(" S  M  T  W  T  F  S");
    let mut line = "   ".repeat(review.leading_empty_slots);
    let mut column = review.leading_empty_slots;
    for cell in &review.cells {
        line.push_str(&format!("{:>2}{}", cell.day, status_mark(cell.status)));
        column += 1;
        if column % 7 == 0 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
    println!(
        "Score: {}%  Active days: {}/{}",
        review.score(),
        review.report.active_days,
        review.total_days()
    );
}

fn print_board(board: &WeekBoard) {
    println!("Week of {}", board.window.start());
    println!("{:<24} {}", "", WEEKDAY_LABELS.join(" "));
    for row in &board.rows {
        let cells = row
            .due
            .iter()
            .zip(row.checked)
            .map(|(due, checked)| match (*due, checked) {
                (_, true) => "x",
                (true, false) => "_",
                (false, false) => " ",
            })
            .collect::<Vec<_>>()
            .join(" ");
        let title = format!("{} {}", row.icon.glyph(), row.title);
        println!("{title:<24} {cells}  {:>3}%", row.progress);
    }
    println!(
        "Success rate: {}% ({}/{})",
        board.success_rate, board.total_completed, board.total_opportunities
    );
}
