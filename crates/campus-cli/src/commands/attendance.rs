//! `campus attendance` commands.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Args, Subcommand};

use campus_core::{CourseId, NewSession, SessionId};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct AttendanceCommand {
    #[command(subcommand)]
    pub command: AttendanceSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AttendanceSubcommand {
    /// List attendance sessions
    List(ListArgs),

    /// Open a session for a course
    Start(StartArgs),

    /// Close a session
    End { session: SessionId },

    /// Mark yourself present
    Mark { session: SessionId },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only sessions still open
    #[arg(long, conflicts_with = "ended")]
    pub active: bool,

    /// Only closed sessions
    #[arg(long)]
    pub ended: bool,

    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StartArgs {
    pub course: CourseId,

    /// Require students to be on site
    #[arg(long)]
    pub require_location: bool,

    /// Start time (RFC 3339); defaults to now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

pub async fn handle(cmd: AttendanceCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        AttendanceSubcommand::List(args) => list(args, ctx).await,
        AttendanceSubcommand::Start(args) => start(args, ctx).await,
        AttendanceSubcommand::End { session } => end(session, ctx).await,
        AttendanceSubcommand::Mark { session } => mark(session, ctx).await,
    }
}

async fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let store = ctx.portal.attendance();
    store
        .fetch_sessions()
        .await
        .context("Failed to load attendance sessions")?;

    let sessions = if args.active {
        store.active_sessions()
    } else if args.ended {
        store.ended_sessions()
    } else {
        store.sessions()
    };

    if args.json {
        return output::json_lines(&sessions);
    }
    for session in &sessions {
        println!("{}", output::session_row(session));
    }
    Ok(())
}

async fn start(args: StartArgs, ctx: &Context) -> Result<()> {
    let new = NewSession {
        course_id: args.course,
        start_time: args.at.unwrap_or_else(Utc::now),
        require_location: args.require_location,
    };
    let session = ctx
        .portal
        .attendance()
        .create_session(&new)
        .await
        .context("Failed to create attendance session")?;

    output::success(&format!("Session {} opened", session.id));
    println!("{}", output::session_row(&session));
    Ok(())
}

async fn end(session: SessionId, ctx: &Context) -> Result<()> {
    ctx.portal
        .attendance()
        .end_session(session)
        .await
        .context("Failed to end session")?;
    output::success(&format!("Session {session} ended"));
    Ok(())
}

async fn mark(session: SessionId, ctx: &Context) -> Result<()> {
    let store = ctx.portal.attendance();
    let at = store
        .mark_attendance(session)
        .await
        .context("Failed to mark attendance")?;

    output::success("Attendance marked");
    output::field(
        "Time",
        &at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    if let Some(current) = store.sessions().iter().find(|s| s.id == session) {
        output::field(
            "Present",
            &format!("{}/{}", current.present_count, current.total_students),
        );
    }
    Ok(())
}
