//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use campus_core::{AttendanceSession, Course, CourseStatus, Gradebook};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print each item as one line of JSON.
pub fn json_lines<T: Serialize>(items: &[T]) -> Result<()> {
    for item in items {
        json(item)?;
    }
    Ok(())
}

/// A whole-number percentage, or a dash when there is none.
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.0}%"),
        None => "-".to_string(),
    }
}

pub fn course_row(course: &Course) -> String {
    let status = match course.status {
        CourseStatus::Active => "active".green(),
        CourseStatus::Upcoming => "upcoming".yellow(),
        CourseStatus::Completed => "completed".dimmed(),
    };
    let seats = format!("{}/{}", course.enrolled, course.capacity);
    let seats = if course.has_available_spots() {
        seats.normal()
    } else {
        seats.red()
    };
    format!(
        "{:>3}  {:<8} {:<40} {:>9}  {}",
        course.id,
        course.code.bold(),
        course.title,
        seats,
        status
    )
}

pub fn gradebook_row(book: &Gradebook) -> String {
    let state = if book.published {
        "published".green()
    } else {
        "draft".yellow()
    };
    format!(
        "{:>3}  {:<8} {:<40} {:<20} {}",
        book.id,
        book.code.bold(),
        book.name,
        book.lecturer,
        state
    )
}

pub fn session_row(session: &AttendanceSession) -> String {
    let status = if session.is_active() {
        "active".green()
    } else {
        "ended".dimmed()
    };
    format!(
        "{:>4}  {:<30} {}  {}/{}  {}",
        session.id,
        session.course.title,
        session.start_time.format("%Y-%m-%d %H:%M"),
        session.present_count,
        session.total_students,
        status
    )
}
