mod cli;

use chrono::{Datelike, Local};
use clap::Parser;
use cli::{Cli, Commands, LogArgs, LogCommand, RainfallCommand, RecommendCommand};
use smartrice::config::Config;
use smartrice::db::Database;
use smartrice::error::{Result, SmartRiceError};
use smartrice::logic::{
    duplicate_policy, import_logs_json, import_rainfall_json, ComparisonReport,
    ComparisonService, RainfallIndex, RecommendationCalendar,
};
use smartrice::models::{
    format_date, month_name, parse_calendar_date, AgriculturalLog, ComparisonOutcome,
    CroppingPhase, LogKind, PlantingRecommendation, RainfallCategory,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    if let Commands::Init = cli.command {
        Config::setup_interactive(config_path)?;
        return Ok(());
    }

    let config = Config::load_or_default(config_path)?;
    let db_path = config.db_path(cli.data_dir.as_deref())?;
    let db = Database::open(&db_path)?;
    tracing::debug!(path = %db_path.display(), "Opened database");

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Check => check(&config, config_path, &db),
        Commands::Rainfall(cmd) => rainfall(cmd, &config, &db),
        Commands::Log(cmd) => log(cmd, &db),
        Commands::Recommend(cmd) => recommend(cmd, &db),
        Commands::Compare { kind, json } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let service = ComparisonService::new(db, config.rainfall.duplicate_dates);
            let report = service.run(kind).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Commands::Advise {
            date,
            rainfall,
            phase,
        } => {
            let date = match date {
                Some(d) => parse_calendar_date("date", &d)?,
                None => Local::now().date_naive(),
            };
            let phase = phase
                .as_deref()
                .map(|p| {
                    CroppingPhase::from_str(p)
                        .ok_or_else(|| SmartRiceError::InvalidData(format!("unknown phase: {}", p)))
                })
                .transpose()?;
            if let Some(mm) = rainfall {
                validate_amount(mm)?;
            }

            let service = ComparisonService::new(db, config.rainfall.duplicate_dates);
            let advisory = service.advise(date, phase, rainfall).await?;

            println!("{}  {}", format_date(advisory.date), advisory.season);
            println!("Phase: {}", advisory.phase);
            println!(
                "Rainfall: {:.1} mm ({})",
                advisory.rainfall_mm, advisory.category
            );
            println!();
            println!("{} {}", advisory.level.symbol(), advisory.text);
            println!();
            for point in &advisory.data_points {
                println!("  {:<10} {:<28} {}", point.label, point.value, point.source);
            }
            Ok(())
        }
    }
}

fn check(config: &Config, config_path: Option<&Path>, db: &Database) -> Result<()> {
    if Config::exists(config_path) {
        println!("Config:       OK");
    } else {
        println!("Config:       not found, using defaults (run `smartrice init`)");
    }
    println!("Farm:         {} ({})", config.farm.name, config.farm.location);
    println!("Duplicates:   {}", config.rainfall.duplicate_dates);
    println!("Database:     {}", db.path().display());

    let rainfall_days = db.get_rainfall_observations()?.len();
    let logs = db.get_logs(None)?.len();
    let recommendations = db.get_recommendations()?.len();
    println!("Rainfall:     {} days", rainfall_days);
    println!("Logs:         {}", logs);
    println!("Recommended:  {}", recommendations);
    Ok(())
}

fn rainfall(cmd: RainfallCommand, config: &Config, db: &Database) -> Result<()> {
    match cmd {
        RainfallCommand::Add { date, amount_mm } => {
            let date = parse_calendar_date("date", &date)?;
            validate_amount(amount_mm)?;
            db.upsert_rainfall(date, Some(amount_mm))?;
            println!("Recorded {:.1} mm for {}", amount_mm, format_date(date));
        }
        RainfallCommand::Import { file, duplicates } => {
            let policy = duplicate_policy(duplicates.as_deref(), config.rainfall.duplicate_dates)?;
            let content = std::fs::read_to_string(&file)?;
            let summary = import_rainfall_json(db, &content, policy)?;
            println!(
                "Imported {} of {} readings from {}",
                summary.saved,
                summary.read,
                file.display()
            );
        }
        RainfallCommand::List { limit } => {
            let observations = db.get_rainfall_observations()?;
            if observations.is_empty() {
                println!("No rainfall recorded");
            }
            for obs in observations.iter().take(limit) {
                match obs.amount_mm {
                    Some(mm) => println!(
                        "{:<12} {:>8.1} mm  {}",
                        obs.date,
                        mm,
                        RainfallCategory::from_amount(mm)
                    ),
                    None => println!("{:<12} {:>8} mm", obs.date, "-"),
                }
            }
        }
        RainfallCommand::Monthly { year } => {
            let year = year.unwrap_or_else(|| Local::now().year());
            let observations = db.get_rainfall_for_year(year)?;
            let index = RainfallIndex::build(&observations, config.rainfall.duplicate_dates)?;

            println!("Rainfall {}", year);
            for row in index.monthly_report(year) {
                println!(
                    "  {:<10} {:>8.1} mm  ({} days)",
                    row.name, row.total_mm, row.days
                );
            }
            println!("  {:<10} {:>8.1} mm", "Total", index.yearly_total(year));
        }
        RainfallCommand::Delete { date } => {
            let date = parse_calendar_date("date", &date)?;
            db.delete_rainfall(date)?;
            println!("Deleted reading for {}", format_date(date));
        }
    }
    Ok(())
}

fn log(cmd: LogCommand, db: &Database) -> Result<()> {
    match cmd {
        LogCommand::Add(args) => {
            let log = build_log(args)?;
            db.insert_log(&log)?;
            println!("Recorded {} log {}", log.kind, log.id);
        }
        LogCommand::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let summary = import_logs_json(db, &content)?;
            println!("Imported {} logs from {}", summary.saved, file.display());
        }
        LogCommand::List { kind } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let logs = db.get_logs(kind)?;
            if logs.is_empty() {
                println!("No logs recorded");
            }
            for log in &logs {
                println!(
                    "{}  {:<8} {:<12} {:<12} rec {:<12} {}",
                    log.id,
                    log.kind.as_str(),
                    log.crop_type,
                    log.actual_date,
                    log.recommended().unwrap_or("-"),
                    log.notes.as_deref().unwrap_or("")
                );
            }
        }
        LogCommand::Delete { id } => {
            db.delete_log(&id)?;
            println!("Deleted log {}", id);
        }
    }
    Ok(())
}

fn build_log(args: LogArgs) -> Result<AgriculturalLog> {
    let kind = parse_kind(&args.kind)?;
    parse_calendar_date("actual_date", &args.date)?;
    if let Some(ref rec) = args.recommended {
        parse_calendar_date("recommended_date", rec)?;
    }

    let mut log = AgriculturalLog::new(kind, &args.crop, &args.date);
    if let Some(ref time) = args.time {
        log = log.with_time(time);
    }
    if let Some(ref rec) = args.recommended {
        log = log.with_recommended(rec);
    }
    if let Some(ref notes) = args.notes {
        log = log.with_notes(notes);
    }
    Ok(log)
}

fn recommend(cmd: RecommendCommand, db: &Database) -> Result<()> {
    match cmd {
        RecommendCommand::Add {
            planting,
            harvesting,
        } => {
            if planting.is_none() && harvesting.is_none() {
                return Err(SmartRiceError::InvalidData(
                    "give --planting, --harvesting or both".into(),
                ));
            }
            if let Some(ref d) = planting {
                parse_calendar_date("planting_date", d)?;
            }
            if let Some(ref d) = harvesting {
                parse_calendar_date("harvesting_date", d)?;
            }
            let rec = PlantingRecommendation::new(planting.as_deref(), harvesting.as_deref());
            db.insert_recommendation(&rec)?;
            println!("Recorded recommendation {}", rec.id);
        }
        RecommendCommand::List => {
            let recs = db.get_recommendations()?;
            if recs.is_empty() {
                println!("No recommendations recorded");
            }
            for rec in &recs {
                println!(
                    "{}  plant {:<12} harvest {:<12}",
                    rec.id,
                    rec.planting_date.as_deref().unwrap_or("-"),
                    rec.harvesting_date.as_deref().unwrap_or("-")
                );
            }
        }
        RecommendCommand::Calendar { year, month } => {
            let today = Local::now().date_naive();
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            if !(1..=12).contains(&month) {
                return Err(SmartRiceError::InvalidData(format!(
                    "month must be 1-12, got {}",
                    month
                )));
            }

            let recs = db.get_recommendations()?;
            let calendar = RecommendationCalendar::for_month(&recs, year, month);
            println!("{} {}", month_name(month), year);
            if calendar.is_empty() {
                println!("  No recommended dates");
            }
            for (date, what) in calendar.marked_days() {
                println!("  {}  {}", format_date(date), what);
            }
        }
        RecommendCommand::Delete { id } => {
            db.delete_recommendation(&id)?;
            println!("Deleted recommendation {}", id);
        }
    }
    Ok(())
}

fn print_report(report: &ComparisonReport) {
    if report.outcomes.is_empty() {
        println!("No logs to compare");
        return;
    }

    println!(
        "{:<12} {:<8} {:<12} {:<12} {:<16} {:>9}  {:<8} Impact",
        "Crop", "Kind", "Actual", "Recommended", "Timing", "Rain mm", "Rel."
    );
    for outcome in &report.outcomes {
        match outcome {
            ComparisonOutcome::Compared(result) => println!(
                "{:<12} {:<8} {:<12} {:<12} {:<16} {:>9.1}  {:<8} {}",
                result.log.crop_type,
                result.log.kind.as_str(),
                result.log.actual_date,
                result.log.recommended().unwrap_or("-"),
                result.timing_label(),
                result.rainfall_during_period,
                result.rainfall_relevance,
                result.weather_impact
            ),
            ComparisonOutcome::Unavailable { log, reason } => println!(
                "{:<12} {:<8} {:<12} {:<12} unavailable: {}",
                log.crop_type,
                log.kind.as_str(),
                log.actual_date,
                log.recommended().unwrap_or("-"),
                reason
            ),
        }
    }

    let summary = &report.summary;
    println!();
    println!("Records:              {}", summary.total_count);
    println!("Crops:                {}", summary.distinct_crop_count);
    println!(
        "Avg timing difference: {} days",
        summary.average_absolute_timing_difference
    );
    println!("High weather impact:  {}", summary.high_impact_count);
    if summary.unavailable_count > 0 {
        println!("Unavailable:          {}", summary.unavailable_count);
    }
}

fn parse_kind(value: &str) -> Result<LogKind> {
    LogKind::from_str(value)
        .ok_or_else(|| SmartRiceError::InvalidData(format!("unknown log kind: {}", value)))
}

fn validate_amount(mm: f64) -> Result<()> {
    if !mm.is_finite() || mm < 0.0 {
        return Err(SmartRiceError::InvalidData(format!(
            "rainfall must be a non-negative number, got {}",
            mm
        )));
    }
    Ok(())
}
