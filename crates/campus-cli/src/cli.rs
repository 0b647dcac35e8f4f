//! CLI argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::commands::attendance::AttendanceCommand;
use crate::commands::auth::AuthCommand;
use crate::commands::courses::CoursesCommand;
use crate::commands::grades::GradesCommand;

/// Command-line client for the campus portal.
#[derive(Parser, Debug)]
#[command(name = "campus")]
#[command(author, version = env!("CAMPUS_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub backend: BackendArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where portal calls go.
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Talk to the live API or serve fixtures from memory
    #[arg(long, value_enum, env = "CAMPUS_MODE", default_value_t = Mode::Live, global = true)]
    pub mode: Mode,

    /// Base URL of the portal API
    #[arg(long, env = "CAMPUS_API_BASE", default_value = "http://127.0.0.1:8000", global = true)]
    pub api_base: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "CAMPUS_TIMEOUT_MS", default_value_t = 10_000, global = true)]
    pub timeout_ms: u64,

    /// Answer mock calls without artificial latency
    #[arg(long, global = true)]
    pub instant: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Mock,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, register and inspect the session
    Auth(AuthCommand),

    /// Browse, enroll in and manage courses
    Courses(CoursesCommand),

    /// Gradebooks, grade items and reports
    Grades(GradesCommand),

    /// Attendance sessions
    Attendance(AttendanceCommand),
}
