//! `campus grades` commands.

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;

use campus_core::{CourseId, GradeItemDraft, GradeItemId, GradeItemUpdate, StudentId};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct GradesCommand {
    #[command(subcommand)]
    pub command: GradesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum GradesSubcommand {
    /// List gradebooks
    List(ListArgs),

    /// One student's grades and final grade in a course
    Report(ReportArgs),

    /// Add a grade item to a course
    AddItem(AddItemArgs),

    /// Change a grade item
    UpdateItem(UpdateItemArgs),

    /// Record a student's score and publish the course's grades
    Score(ScoreArgs),

    /// Publish a course's grades as they stand
    Publish { course: CourseId },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only courses this student is enrolled in
    #[arg(long, conflicts_with = "lecturer")]
    pub student: Option<StudentId>,

    /// Only courses taught by this lecturer
    #[arg(long)]
    pub lecturer: Option<String>,

    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    pub course: CourseId,
    pub student: StudentId,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddItemArgs {
    pub course: CourseId,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub max_score: f64,

    #[arg(long)]
    pub weight: f64,
}

#[derive(Args, Debug)]
pub struct UpdateItemArgs {
    pub course: CourseId,
    pub item: GradeItemId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub max_score: Option<f64>,

    #[arg(long)]
    pub weight: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    pub course: CourseId,
    pub student: StudentId,
    pub item: GradeItemId,

    /// The score; omit together with --clear to remove it
    #[arg(required_unless_present = "clear")]
    pub score: Option<f64>,

    /// Remove the recorded score
    #[arg(long, conflicts_with = "score")]
    pub clear: bool,
}

pub async fn handle(cmd: GradesCommand, ctx: &Context) -> Result<()> {
    let store = ctx.portal.grades();
    store.fetch_grades().await.context("Failed to load grades")?;

    match cmd.command {
        GradesSubcommand::List(args) => list(args, ctx),
        GradesSubcommand::Report(args) => report(args, ctx),
        GradesSubcommand::AddItem(args) => add_item(args, ctx).await,
        GradesSubcommand::UpdateItem(args) => update_item(args, ctx).await,
        GradesSubcommand::Score(args) => score(args, ctx).await,
        GradesSubcommand::Publish { course } => publish(course, ctx).await,
    }
}

fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let store = ctx.portal.grades();
    let books = match (args.student, &args.lecturer) {
        (Some(student), _) => store.courses_by_student(student),
        (None, Some(lecturer)) => store.courses_by_lecturer(lecturer),
        (None, None) => store.gradebooks(),
    };

    if args.json {
        return output::json_lines(&books);
    }
    for book in &books {
        println!("{}", output::gradebook_row(book));
    }
    Ok(())
}

fn report(args: ReportArgs, ctx: &Context) -> Result<()> {
    let report = ctx
        .portal
        .grades()
        .student_grades(args.course, args.student)
        .with_context(|| format!("No gradebook for course {}", args.course))?;

    if args.json {
        return output::json_pretty(&report);
    }

    let info = &report.course_info;
    println!("{} {} ({})", info.code.bold(), info.name, info.lecturer);
    println!();
    for detail in &report.grades {
        let score = detail
            .score
            .map(|s| format!("{s}/{}", detail.item.max_score))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<20} {:>10} {:>6}  weight {}",
            detail.item.name,
            score,
            output::percent(detail.percentage),
            detail.item.weight
        );
    }
    println!();
    output::field("Final grade", &output::percent(report.final_grade));
    Ok(())
}

async fn add_item(args: AddItemArgs, ctx: &Context) -> Result<()> {
    let draft = GradeItemDraft {
        name: args.name,
        max_score: args.max_score,
        weight: args.weight,
    };
    let item = ctx
        .portal
        .grades()
        .create_grade_item(args.course, &draft)
        .await
        .context("Failed to create grade item")?;

    output::success(&format!("Added {} (id {})", item.name, item.id));
    Ok(())
}

async fn update_item(args: UpdateItemArgs, ctx: &Context) -> Result<()> {
    let update = GradeItemUpdate {
        name: args.name,
        max_score: args.max_score,
        weight: args.weight,
    };
    let item = ctx
        .portal
        .grades()
        .update_grade_item(args.course, args.item, &update)
        .await
        .context("Failed to update grade item")?;

    output::success(&format!("Updated {}", item.name));
    output::json_pretty(&item)
}

async fn score(args: ScoreArgs, ctx: &Context) -> Result<()> {
    let store = ctx.portal.grades();
    let score = if args.clear { None } else { args.score };

    if !store.record_score(args.course, args.student, args.item, score)? {
        bail!("No gradebook for course {}", args.course);
    }
    store
        .publish_grades(args.course)
        .await
        .context("Failed to publish grades")?;

    output::success("Score recorded and published");
    if let Some(final_grade) = store.final_grade(args.course, args.student) {
        output::field("Final grade", &output::percent(Some(final_grade)));
    }
    Ok(())
}

async fn publish(course: CourseId, ctx: &Context) -> Result<()> {
    ctx.portal
        .grades()
        .publish_grades(course)
        .await
        .context("Failed to publish grades")?;
    output::success(&format!("Published grades for course {course}"));
    Ok(())
}
