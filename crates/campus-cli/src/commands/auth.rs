//! `campus auth` commands.

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;

use campus_core::{Registration, Role, User};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Sign in with email and password
    Login(LoginArgs),

    /// Create an account and sign in
    Register(RegisterArgs),

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in user, checking the token with the server
    Whoami(WhoamiArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// student or lecturer
    #[arg(long, default_value = "student")]
    pub role: Role,
}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the user as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(cmd: AuthCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login(args, ctx).await,
        AuthSubcommand::Register(args) => register(args, ctx).await,
        AuthSubcommand::Logout => logout(ctx).await,
        AuthSubcommand::Whoami(args) => whoami(args, ctx).await,
    }
}

async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    eprintln!("{}", "Logging in...".dimmed());

    let user = ctx
        .portal
        .auth()
        .login(&args.email, &args.password)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    print_user(&user);
    Ok(())
}

async fn register(args: RegisterArgs, ctx: &Context) -> Result<()> {
    let registration = Registration::new(
        args.first_name,
        args.last_name,
        args.email,
        args.password,
        args.role,
    );

    let user = ctx
        .portal
        .auth()
        .register(&registration)
        .await
        .context("Failed to register")?;

    output::success("Account created");
    println!();
    print_user(&user);
    Ok(())
}

async fn logout(ctx: &Context) -> Result<()> {
    if !ctx.session().has_credential() {
        output::success("Already logged out");
        return Ok(());
    }
    ctx.portal.auth().logout().await;
    output::success("Logged out");
    Ok(())
}

async fn whoami(args: WhoamiArgs, ctx: &Context) -> Result<()> {
    if !ctx.session().has_credential() {
        bail!("No active session. Run 'campus auth login' first.");
    }
    if !ctx.portal.auth().check_auth().await {
        bail!("The saved session is no longer valid.");
    }
    let user = ctx
        .portal
        .auth()
        .user()
        .context("No active session. Run 'campus auth login' first.")?;

    if args.json {
        output::json_pretty(&user)
    } else {
        print_user(&user);
        Ok(())
    }
}

fn print_user(user: &User) {
    output::field("Name", &user.name);
    output::field("Email", &user.email);
    output::field("Role", user.role.as_str());
}
