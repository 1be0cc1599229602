//! CLI module for the CultBrawl command-line client.
//!
//! Provides subcommands for talking to a CultBrawl backend:
//! - `login` / `register` / `logout` / `whoami` - Session management
//! - `profile` - Show and edit the logged-in user's profile
//! - `entities` / `movies` - Browse and grow the catalogue
//! - `battles` - List, create, watch and vote in battles
//! - `leaderboard` - User and entity rankings
//! - `config check` - Validate configuration file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiError;
use crate::config::Config;
use crate::models::{
    Battle, Entity, EntityStanding, Id, NewEntity, Profile, ProfileField, UserStanding, VoteTally,
};
use crate::polling::Poller;
use crate::services::DEFAULT_DURATION_HOURS;
use crate::session::FileStorage;
use crate::ui::{ConsoleNavigator, ConsoleNotifier, Notifier, Toast};
use crate::AppContext;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "cultbrawl")]
#[command(author, version, about = "Vote in movie battles from the terminal", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cultbrawl.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Backend API URL, including the /api prefix
    #[arg(long, env = "CULTBRAWL_API_URL")]
    pub api_url: Option<String>,

    /// OMDb API key used by movie search
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    pub omdb_key: Option<String>,

    /// Directory holding the saved session
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and save the session
    Login {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Password confirmation (read from stdin when omitted)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// End the session and forget the saved token
    Logout,

    /// Show who is logged in
    Whoami,

    /// Profile commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Entity catalogue commands
    #[command(subcommand)]
    Entities(EntityCommands),

    /// Movie search (OMDb)
    #[command(subcommand)]
    Movies(MovieCommands),

    /// Battle commands
    #[command(subcommand)]
    Battles(BattleCommands),

    /// Show user and entity rankings
    Leaderboard {
        /// Keep refreshing until interrupted
        #[arg(short, long)]
        watch: bool,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show a profile (yours when no ID is given)
    Show { id: Option<String> },
    /// Change one profile field
    Set {
        /// firstname, lastname, email or image-url
        field: ProfileField,
        value: String,
    },
    /// Upload an image and use it as your avatar
    Avatar { path: PathBuf },
}

/// Entity subcommands
#[derive(Subcommand, Debug)]
pub enum EntityCommands {
    /// List all entities
    List,
    /// Add a custom entity
    Add {
        name: String,
        /// Entity type
        #[arg(long = "type", default_value = "movie")]
        kind: String,
        /// Image URL
        #[arg(long, conflicts_with = "image_file")]
        image: Option<String>,
        /// Local image to upload
        #[arg(long)]
        image_file: Option<PathBuf>,
    },
    /// Entities ranked by wins
    Leaderboard,
}

/// Movie subcommands
#[derive(Subcommand, Debug)]
pub enum MovieCommands {
    /// Search OMDb by title
    Search { query: String },
    /// Search OMDb and add a result to the catalogue
    Add {
        query: String,
        /// Which search result to add (1-based)
        #[arg(long, default_value = "1")]
        pick: usize,
    },
}

/// Battle subcommands
#[derive(Subcommand, Debug)]
pub enum BattleCommands {
    /// List all battles
    List,
    /// Start a battle between two entities
    Create {
        first: String,
        second: String,
        /// Battle duration in hours
        #[arg(long, default_value_t = DEFAULT_DURATION_HOURS)]
        hours: u32,
    },
    /// Show the vote split for a battle
    Votes { battle: String },
    /// Vote for an entity in a battle
    Vote { battle: String, entity: String },
    /// Keep the battle list refreshed until interrupted
    Watch,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

impl Cli {
    /// Apply command-line and environment overrides to a loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(key) = &self.omdb_key {
            config.omdb.api_key = Some(key.clone());
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

/// Build the application context the CLI runs against.
pub async fn build_context(config: Config) -> Result<AppContext> {
    let storage = Arc::new(FileStorage::new(config.storage.data_dir.clone()));
    let context = AppContext::new(
        config,
        storage,
        Arc::new(ConsoleNavigator),
        Arc::new(ConsoleNotifier),
    )?;

    if let Some(user) = context.session.load().await {
        tracing::debug!(username = %user.username(), "Restored session");
    }

    Ok(context)
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: Config) -> Result<()> {
    if let Commands::Config(ConfigCommands::Check) = &cli.command {
        return cmd_config_check(cli);
    }

    let ctx = build_context(config).await?;

    match &cli.command {
        Commands::Login { username, password } => {
            cmd_login(&ctx, username, password.as_deref()).await
        }
        Commands::Register {
            username,
            password,
            confirm,
        } => cmd_register(&ctx, username, password.as_deref(), confirm.as_deref()).await,
        Commands::Logout => cmd_logout(&ctx).await,
        Commands::Whoami => cmd_whoami(&ctx).await,
        Commands::Profile(ProfileCommands::Show { id }) => {
            cmd_profile_show(&ctx, id.as_deref()).await
        }
        Commands::Profile(ProfileCommands::Set { field, value }) => {
            cmd_profile_set(&ctx, *field, value).await
        }
        Commands::Profile(ProfileCommands::Avatar { path }) => cmd_profile_avatar(&ctx, path).await,
        Commands::Entities(EntityCommands::List) => cmd_entities_list(&ctx).await,
        Commands::Entities(EntityCommands::Add {
            name,
            kind,
            image,
            image_file,
        }) => {
            cmd_entities_add(&ctx, name, kind, image.as_deref(), image_file.as_deref()).await
        }
        Commands::Entities(EntityCommands::Leaderboard) => {
            let standings = ctx.entities.leaderboard().await?;
            print_entity_standings(&standings);
            Ok(())
        }
        Commands::Movies(MovieCommands::Search { query }) => cmd_movies_search(&ctx, query).await,
        Commands::Movies(MovieCommands::Add { query, pick }) => {
            cmd_movies_add(&ctx, query, *pick).await
        }
        Commands::Battles(BattleCommands::List) => {
            let battles = ctx.battles.list().await?;
            print_battles(&battles);
            Ok(())
        }
        Commands::Battles(BattleCommands::Create {
            first,
            second,
            hours,
        }) => cmd_battles_create(&ctx, first, second, *hours).await,
        Commands::Battles(BattleCommands::Votes { battle }) => {
            cmd_battles_votes(&ctx, battle).await
        }
        Commands::Battles(BattleCommands::Vote { battle, entity }) => {
            cmd_battles_vote(&ctx, battle, entity).await
        }
        Commands::Battles(BattleCommands::Watch) => {
            let battles = ctx.battles.clone();
            watch(
                ctx.config.polling.interval(),
                move || {
                    let battles = battles.clone();
                    async move { battles.list().await }
                },
                |list: &Vec<Battle>| print_battles(list),
            )
            .await
        }
        Commands::Leaderboard { watch: false } => {
            let (users, entities) =
                futures::try_join!(ctx.users.leaderboard(), ctx.entities.leaderboard())?;
            print_user_standings(&users);
            print_entity_standings(&entities);
            Ok(())
        }
        Commands::Leaderboard { watch: true } => {
            let users = ctx.users.clone();
            let entities = ctx.entities.clone();
            watch(
                ctx.config.polling.interval(),
                move || {
                    let users = users.clone();
                    let entities = entities.clone();
                    async move { tokio::try_join!(users.leaderboard(), entities.leaderboard()) }
                },
                |(users, entities): &(Vec<UserStanding>, Vec<EntityStanding>)| {
                    print_user_standings(users);
                    print_entity_standings(entities);
                },
            )
            .await
        }
        Commands::Config(ConfigCommands::Check) => cmd_config_check(cli),
    }
}

// ============================================================================
// Session
// ============================================================================

async fn cmd_login(ctx: &AppContext, username: &str, password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(password) => password.to_string(),
        None => prompt("Password")?,
    };

    let outcome = ctx.auth.login(username, &password).await?;
    ConsoleNotifier.notify(Toast::success("Login", &outcome.message));
    if let Some(user) = outcome.user {
        println!("Logged in as {}", user.username());
    }
    Ok(())
}

async fn cmd_register(
    ctx: &AppContext,
    username: &str,
    password: Option<&str>,
    confirm: Option<&str>,
) -> Result<()> {
    let password = match password {
        Some(password) => password.to_string(),
        None => prompt("Password")?,
    };
    let confirm = match confirm {
        Some(confirm) => confirm.to_string(),
        None => prompt("Confirm password")?,
    };

    let outcome = ctx.auth.register(username, &password, &confirm).await?;
    ConsoleNotifier.notify(Toast::success("Register", &outcome.message));
    match outcome.user {
        Some(user) => println!("Logged in as {}", user.username()),
        None => println!("Run `cultbrawl login {}` to start a session.", username.trim()),
    }
    Ok(())
}

async fn cmd_logout(ctx: &AppContext) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    ctx.auth.logout().await;
    println!("Logged out.");
    Ok(())
}

async fn cmd_whoami(ctx: &AppContext) -> Result<()> {
    // Refresh redirects to login on its own when there is no usable session
    let Some(user) = ctx.session.refresh(&ctx.api).await else {
        bail!("Not logged in");
    };

    println!("{}", user.username());
    if let Some(id) = user.id() {
        println!("ID: {}", id);
    }
    Ok(())
}

// ============================================================================
// Profile
// ============================================================================

async fn cmd_profile_show(ctx: &AppContext, id: Option<&str>) -> Result<()> {
    let profile = match id {
        Some(id) => ctx.users.profile(&Id::from(id)).await?,
        None => match ctx.session.refresh(&ctx.api).await {
            Some(user) => user.profile.clone(),
            None => bail!("Not logged in"),
        },
    };

    print_profile(&profile);
    Ok(())
}

async fn cmd_profile_set(ctx: &AppContext, field: ProfileField, value: &str) -> Result<()> {
    let user = ctx.users.update_field(field, value).await?;
    ConsoleNotifier.notify(Toast::success("Profile", format!("{} updated.", field)));
    print_profile(&user.profile);
    Ok(())
}

async fn cmd_profile_avatar(ctx: &AppContext, path: &Path) -> Result<()> {
    if !ctx.session.is_authenticated() {
        bail!("Not logged in");
    }

    let url = ctx.uploads.image(path).await?;
    let user = ctx.users.update_field(ProfileField::ImageUrl, &url).await?;
    ConsoleNotifier.notify(Toast::success("Profile", "Avatar updated."));
    print_profile(&user.profile);
    Ok(())
}

fn print_profile(profile: &Profile) {
    let id = profile.id.as_ref().map(Id::to_string);
    println!();
    println!("=== Profile: {} ===", profile.username);
    println!();
    println!("ID:        {}", id.as_deref().unwrap_or("-"));
    println!("Username:  {}", profile.username);
    println!("Email:     {}", profile.email.as_deref().unwrap_or("-"));
    println!("Firstname: {}", profile.firstname.as_deref().unwrap_or("-"));
    println!("Lastname:  {}", profile.lastname.as_deref().unwrap_or("-"));
    println!("Avatar:    {}", profile.image_url.as_deref().unwrap_or("-"));
    println!();
}

// ============================================================================
// Entities and movies
// ============================================================================

async fn cmd_entities_list(ctx: &AppContext) -> Result<()> {
    let entities = ctx.entities.list().await?;
    if entities.is_empty() {
        println!("No entities found.");
        return Ok(());
    }

    println!();
    println!("{:<10}  {:<40}  {:<8}  {:<12}", "ID", "NAME", "TYPE", "SOURCE");
    println!("{}", "-".repeat(76));
    for entity in &entities {
        print_entity_row(entity);
    }
    println!();
    Ok(())
}

fn print_entity_row(entity: &Entity) {
    println!(
        "{:<10}  {:<40}  {:<8}  {:<12}",
        truncate(&entity.id.to_string(), 10),
        truncate(&entity.name, 40),
        truncate(&entity.kind, 8),
        entity.source.as_deref().unwrap_or("-")
    );
}

async fn cmd_entities_add(
    ctx: &AppContext,
    name: &str,
    kind: &str,
    image: Option<&str>,
    image_file: Option<&Path>,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Entity name cannot be empty");
    }

    let image_url = match (image, image_file) {
        (_, Some(path)) => ctx.uploads.image(path).await?,
        (Some(url), None) => url.to_string(),
        (None, None) => ctx.movies.placeholder().to_string(),
    };

    let entity = NewEntity {
        name: name.to_string(),
        api_id: format!("custom-{}", uuid::Uuid::new_v4()),
        kind: kind.to_string(),
        image_url,
        source: "CUSTOM".to_string(),
    };

    let created = ctx.entities.create(&entity).await?;
    ConsoleNotifier.notify(Toast::success("Entity", format!("{} added.", created.name)));
    print_entity_row(&created);
    Ok(())
}

async fn cmd_movies_search(ctx: &AppContext, query: &str) -> Result<()> {
    let movies = ctx.movies.search(query).await?;
    if movies.is_empty() {
        println!("No movies found.");
        return Ok(());
    }

    println!();
    println!("{:<4}  {:<12}  {:<44}  {:<6}", "#", "IMDB ID", "TITLE", "YEAR");
    println!("{}", "-".repeat(72));
    for (i, movie) in movies.iter().enumerate() {
        println!(
            "{:<4}  {:<12}  {:<44}  {:<6}",
            i + 1,
            movie.imdb_id,
            truncate(&movie.title, 44),
            movie.year
        );
    }
    println!();
    Ok(())
}

async fn cmd_movies_add(ctx: &AppContext, query: &str, pick: usize) -> Result<()> {
    let movies = ctx.movies.search(query).await?;
    let movie = pick
        .checked_sub(1)
        .and_then(|i| movies.get(i))
        .with_context(|| format!("No search result #{} for '{}'", pick, query))?;

    let created = ctx
        .entities
        .create(&movie.to_new_entity(ctx.movies.placeholder()))
        .await?;
    ConsoleNotifier.notify(Toast::success("Entity", format!("{} added.", created.name)));
    print_entity_row(&created);
    Ok(())
}

// ============================================================================
// Battles
// ============================================================================

fn print_battles(battles: &[Battle]) {
    if battles.is_empty() {
        println!("No battles found.");
        return;
    }

    println!();
    println!("{:<10}  {:<50}  {:<10}  {:<8}", "ID", "BATTLE", "STATUS", "HOURS");
    println!("{}", "-".repeat(84));
    for battle in battles {
        let hours = battle
            .duration_hours
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10}  {:<50}  {:<10}  {:<8}",
            truncate(&battle.id.to_string(), 10),
            truncate(&battle.label(), 50),
            battle.status,
            hours
        );
    }
    println!();
}

async fn cmd_battles_create(ctx: &AppContext, first: &str, second: &str, hours: u32) -> Result<()> {
    let created = ctx
        .battles
        .create(&Id::from(first), &Id::from(second), hours)
        .await?;

    let id = match created.get("id") {
        Some(serde_json::Value::String(id)) => id.clone(),
        Some(id) if !id.is_null() => id.to_string(),
        _ => "-".to_string(),
    };
    ConsoleNotifier.notify(Toast::success("Battle", "Battle created."));
    println!("Battle ID: {}", id);
    Ok(())
}

async fn cmd_battles_votes(ctx: &AppContext, battle_id: &str) -> Result<()> {
    let battle = ctx.battles.get(&Id::from(battle_id)).await?;
    let tally = ctx.battles.votes(&battle.id).await?;
    print_tally(&battle, &tally);

    if ctx.session.is_authenticated() {
        let mine = ctx.battles.user_vote(&battle.id).await?;
        match mine.voted_entity_id {
            Some(id) => println!("Your vote: {}", participant_name(&battle, &id)),
            None => println!("You have not voted yet."),
        }
    }
    Ok(())
}

async fn cmd_battles_vote(ctx: &AppContext, battle_id: &str, entity_id: &str) -> Result<()> {
    if !ctx.session.is_authenticated() {
        bail!("Log in to vote");
    }

    let battle = ctx.battles.get(&Id::from(battle_id)).await?;
    let entity_id = Id::from(entity_id);
    let tally = ctx.battles.vote(&battle, &entity_id).await?;

    ConsoleNotifier.notify(Toast::success(
        "Vote",
        format!("Voted for {}.", participant_name(&battle, &entity_id)),
    ));
    print_tally(&battle, &tally);
    Ok(())
}

fn participant_name(battle: &Battle, id: &Id) -> String {
    battle
        .participants
        .iter()
        .find(|p| p.id() == Some(id))
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| id.to_string())
}

fn print_tally(battle: &Battle, tally: &VoteTally) {
    let (left, right) = tally.percentages();
    let name = |i: usize| {
        battle
            .participants
            .get(i)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| format!("Entity {}", i + 1))
    };

    println!();
    println!("=== {} ({}) ===", battle.label(), battle.status);
    println!();
    println!(
        "{:<40}  {:>6}  {:>4}%",
        truncate(&name(0), 40),
        tally.entity1_votes,
        left
    );
    println!(
        "{:<40}  {:>6}  {:>4}%",
        truncate(&name(1), 40),
        tally.entity2_votes,
        right
    );
    println!("Total votes: {}", tally.total());
    println!();
}

// ============================================================================
// Leaderboards
// ============================================================================

fn print_user_standings(standings: &[UserStanding]) {
    println!();
    println!("=== Top users ===");
    println!();
    if standings.is_empty() {
        println!("No rankings yet.");
        return;
    }
    println!("{:<4}  {:<30}  {:>8}", "#", "USER", "POINTS");
    println!("{}", "-".repeat(46));
    for (i, standing) in standings.iter().enumerate() {
        println!(
            "{:<4}  {:<30}  {:>8}",
            i + 1,
            truncate(&standing.username, 30),
            standing.points
        );
    }
    println!();
}

fn print_entity_standings(standings: &[EntityStanding]) {
    println!();
    println!("=== Top entities ===");
    println!();
    if standings.is_empty() {
        println!("No rankings yet.");
        return;
    }
    println!("{:<4}  {:<40}  {:>6}", "#", "ENTITY", "WINS");
    println!("{}", "-".repeat(54));
    for (i, standing) in standings.iter().enumerate() {
        println!(
            "{:<4}  {:<40}  {:>6}",
            i + 1,
            truncate(&standing.name, 40),
            standing.wins
        );
    }
    println!();
}

/// Poll `fetch` and re-render on every successful refresh until Ctrl+C.
async fn watch<T, F, Fut, R>(period: Duration, fetch: F, render: R) -> Result<()>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    R: Fn(&T),
{
    let poller = Poller::new(period);
    let mut updates = poller.subscribe();
    poller.start(fetch);

    eprintln!(
        "Refreshing every {}s, press Ctrl+C to stop.",
        period.as_secs()
    );

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(value) = updates.borrow_and_update().as_ref() {
                    render(value);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Interrupted, stopping refresh");
                break;
            }
        }
    }

    poller.stop();
    Ok(())
}

// ============================================================================
// Config
// ============================================================================

fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("Defaults will be used.");
        println!("To create a custom configuration, copy cultbrawl.example.toml to cultbrawl.toml");
        return Ok(());
    }

    match Config::load(config_path) {
        Ok(mut config) => {
            cli.apply_overrides(&mut config);

            println!("[OK] Configuration file is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("API:");
            println!("  Base URL:     {}", config.api.base_url);
            println!("  Timeout:      {} ms", config.api.timeout_ms);
            println!();
            println!("Storage:");
            println!("  Data Dir:     {}", config.storage.data_dir.display());
            println!("  Session File: {}", config.session_file().display());
            println!();
            println!("Client:");
            println!("  Log Level:    {}", config.logging.level);
            println!("  Poll Every:   {}s", config.polling.interval().as_secs());
            println!(
                "  Toasts:       {}",
                if config.notifications.enabled {
                    "Enabled"
                } else {
                    "Disabled"
                }
            );
            println!(
                "  Movie Search: {}",
                if config.omdb.api_key.is_some() {
                    "Enabled"
                } else {
                    "Disabled (no OMDb API key)"
                }
            );
            println!();

            let mut warnings = Vec::new();

            if config.api.base_url.starts_with("http://")
                && !config.api.base_url.contains("localhost")
                && !config.api.base_url.contains("127.0.0.1")
            {
                warnings.push("API URL is not HTTPS - the session token is sent in plaintext");
            }

            if config.omdb.api_key.is_none() {
                warnings.push("No OMDb API key set - `movies` commands will fail");
            }

            if !warnings.is_empty() {
                println!("Warnings:");
                for warning in warnings {
                    println!("  [!] {}", warning);
                }
                println!();
            }

            Ok(())
        }
        Err(e) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {:#}", e);
            println!();
            println!("Please check the configuration file syntax and try again.");
            bail!("Invalid configuration file");
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Read one line from stdin after printing a prompt to stderr
fn prompt(label: &str) -> Result<String> {
    eprint!("{}: ", label);
    std::io::stderr().flush().ok();

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

/// Truncate a string to max length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Alien", 10), "Alien");
        assert_eq!(truncate("The Good, the Bad and the Ugly", 10), "The Goo...");
        assert_eq!(truncate("Amélie Amélie", 8), "Améli...");
    }

    #[test]
    fn test_parse_vote_command() {
        let cli = Cli::try_parse_from(["cultbrawl", "battles", "vote", "7", "2"]).unwrap();
        match cli.command {
            Commands::Battles(BattleCommands::Vote { battle, entity }) => {
                assert_eq!(Id::from(battle.as_str()), Id::Num(7));
                assert_eq!(Id::from(entity.as_str()), Id::Num(2));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_profile_field() {
        let cli =
            Cli::try_parse_from(["cultbrawl", "profile", "set", "avatar", "https://img/a.png"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Profile(ProfileCommands::Set {
                field: ProfileField::ImageUrl,
                ..
            })
        ));

        assert!(Cli::try_parse_from(["cultbrawl", "profile", "set", "password", "x"]).is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let cli = Cli::try_parse_from([
            "cultbrawl",
            "--api-url",
            "https://brawl.example/api",
            "--omdb-key",
            "k1",
            "--data-dir",
            "/tmp/cb",
            "whoami",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.api.base_url, "https://brawl.example/api");
        assert_eq!(config.omdb.api_key.as_deref(), Some("k1"));
        assert_eq!(config.session_file(), PathBuf::from("/tmp/cb/user.json"));
    }

    #[test]
    fn test_create_defaults_to_one_hour() {
        let cli = Cli::try_parse_from(["cultbrawl", "battles", "create", "1", "2"]).unwrap();
        match cli.command {
            Commands::Battles(BattleCommands::Create { hours, .. }) => {
                assert_eq!(hours, DEFAULT_DURATION_HOURS)
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
