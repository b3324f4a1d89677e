use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "smartrice",
    version,
    about = "Rice harvest and planting timing analysis against rainfall"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run interactive setup
    Init,
    /// Validate config and open the database
    Check,
    /// Daily rainfall observations
    #[command(subcommand)]
    Rainfall(RainfallCommand),
    /// Planting and harvest logs
    #[command(subcommand)]
    Log(LogCommand),
    /// Planting and harvesting recommendations
    #[command(subcommand)]
    Recommend(RecommendCommand),
    /// Compare logged dates with recommendations and rainfall
    Compare {
        /// Only compare one kind of log (planting or harvest)
        #[arg(short, long)]
        kind: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Field-work advice for a day's cropping phase and rainfall
    Advise {
        /// Day to advise on (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Rainfall in mm, defaults to the latest stored reading
        #[arg(long)]
        rainfall: Option<f64>,
        /// Cropping phase, defaults to the phase for the date
        #[arg(long)]
        phase: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RainfallCommand {
    /// Record the rainfall for one day
    Add {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Amount in mm
        amount_mm: f64,
    },
    /// Import a JSON array of `{ "date", "rainfall_amount" }` readings
    Import {
        file: PathBuf,
        /// How to resolve repeated dates (last-wins, sum, reject)
        #[arg(long)]
        duplicates: Option<String>,
    },
    /// List stored readings, newest first
    List {
        #[arg(short, long, default_value_t = 30)]
        limit: usize,
    },
    /// Monthly totals for a year
    Monthly {
        /// Defaults to the current year
        year: Option<i32>,
    },
    /// Remove the reading for one day
    Delete { date: String },
}

#[derive(Subcommand)]
pub enum LogCommand {
    /// Record a planting or harvest
    Add(LogArgs),
    /// Import a JSON array of logs
    Import { file: PathBuf },
    /// List logs, newest first
    List {
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Delete a log and its stored analysis
    Delete { id: String },
}

#[derive(Args)]
pub struct LogArgs {
    /// planting or harvest
    #[arg(short, long, default_value = "harvest")]
    pub kind: String,
    /// Crop or variety, e.g. RC222
    #[arg(long)]
    pub crop: String,
    /// Date the work was done (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,
    /// Time of day (HH:MM)
    #[arg(long)]
    pub time: Option<String>,
    /// Recommended date (YYYY-MM-DD)
    #[arg(long)]
    pub recommended: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum RecommendCommand {
    /// Store a recommended planting and/or harvesting date
    Add {
        #[arg(long)]
        planting: Option<String>,
        #[arg(long)]
        harvesting: Option<String>,
    },
    /// List stored recommendations
    List,
    /// Recommended days in one month
    Calendar {
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        /// Defaults to the current month
        #[arg(long)]
        month: Option<u32>,
    },
    Delete { id: String },
}
