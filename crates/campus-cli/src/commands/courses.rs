//! `campus courses` commands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use campus_core::{CourseDraft, CourseId, CourseStatus, CourseUpdate, Lecturer};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct CoursesCommand {
    #[command(subcommand)]
    pub command: CoursesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CoursesSubcommand {
    /// List the course catalogue
    List(ListArgs),

    /// Show one course as JSON
    Show { id: CourseId },

    /// Enroll the signed-in user in a course
    Enroll { id: CourseId },

    /// Create a course taught by the signed-in user
    Create(CreateArgs),

    /// Change fields of an existing course
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only courses with free seats
    #[arg(long, conflicts_with_all = ["active", "upcoming"])]
    pub available: bool,

    /// Only active courses
    #[arg(long, conflicts_with = "upcoming")]
    pub active: bool,

    /// Only upcoming courses
    #[arg(long)]
    pub upcoming: bool,

    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub code: String,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub capacity: u32,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, default_value = "active")]
    pub status: CourseStatus,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: CourseId,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub capacity: Option<u32>,

    #[arg(long)]
    pub status: Option<CourseStatus>,

    #[arg(long)]
    pub rating: Option<f32>,
}

pub async fn handle(cmd: CoursesCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        CoursesSubcommand::List(args) => list(args, ctx).await,
        CoursesSubcommand::Show { id } => show(id, ctx).await,
        CoursesSubcommand::Enroll { id } => enroll(id, ctx).await,
        CoursesSubcommand::Create(args) => create(args, ctx).await,
        CoursesSubcommand::Update(args) => update(args, ctx).await,
    }
}

async fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let store = ctx.portal.courses();
    store.fetch_courses().await.context("Failed to fetch courses")?;

    let courses = if args.available {
        store.available_courses()
    } else if args.active {
        store.active_courses()
    } else if args.upcoming {
        store.upcoming_courses()
    } else {
        store.courses()
    };

    if args.json {
        return output::json_lines(&courses);
    }
    for course in &courses {
        println!("{}", output::course_row(course));
    }
    Ok(())
}

async fn show(id: CourseId, ctx: &Context) -> Result<()> {
    let store = ctx.portal.courses();
    store.fetch_courses().await.context("Failed to fetch courses")?;
    let course = store
        .course_by_id(id)
        .with_context(|| format!("Course {id} not found"))?;
    output::json_pretty(&course)
}

async fn enroll(id: CourseId, ctx: &Context) -> Result<()> {
    let store = ctx.portal.courses();
    store.fetch_courses().await.context("Failed to fetch courses")?;
    store.enroll_in_course(id).await?;

    let course = store
        .course_by_id(id)
        .with_context(|| format!("Course {id} not found"))?;
    output::success(&format!("Enrolled in {}", course.code));
    output::field("Seats", &format!("{}/{}", course.enrolled, course.capacity));
    Ok(())
}

async fn create(args: CreateArgs, ctx: &Context) -> Result<()> {
    let user = ctx
        .session()
        .user()
        .context("No active session. Run 'campus auth login' first.")?;

    let mut draft = CourseDraft::new(
        args.code,
        args.title,
        Lecturer {
            id: user.id,
            name: user.name,
        },
        args.capacity,
    );
    draft.description = args.description;
    draft.status = args.status;

    let course = ctx
        .portal
        .courses()
        .create_course(&draft)
        .await
        .context("Failed to create course")?;
    output::success(&format!("Created course {}", course.code));
    output::json_pretty(&course)
}

async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let update = CourseUpdate {
        title: args.title,
        description: args.description,
        capacity: args.capacity,
        status: args.status,
        rating: args.rating,
        thumbnail: None,
    };

    let course = ctx
        .portal
        .courses()
        .update_course(args.id, &update)
        .await
        .context("Failed to update course")?;
    output::success(&format!("Updated course {}", course.code));
    output::json_pretty(&course)
}
