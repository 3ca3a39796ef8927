use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tincan_core::model::{Activity, Channel, GuildId, Member, Message, Role, User};
use tincan_core::{FetchRequest, MemoryStore, RenderConfig, RenderContext, Renderer, RichText};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Render chat markdown to rich text JSON
#[derive(Parser, Debug)]
#[command(name = "tincan")]
#[command(about = "Render chat markdown into rich text segments", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (defaults to <config dir>/tincan/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// JSON snapshot of users, members, roles and channels used to resolve mentions
    #[arg(long, value_name = "PATH", global = true)]
    store: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render markdown source (reads stdin when no file is given)
    Markdown {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Guild that scopes mentions
        #[arg(long)]
        guild: Option<u64>,
    },
    /// Render a message JSON document with its embeds and attachments
    Message {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Render a presence activity JSON document
    Activity {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snapshot {
    users: Vec<User>,
    members: Vec<GuildMember>,
    roles: Vec<GuildRole>,
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct GuildMember {
    guild_id: GuildId,
    #[serde(flatten)]
    member: Member,
}

#[derive(Debug, Deserialize)]
struct GuildRole {
    guild_id: GuildId,
    #[serde(flatten)]
    role: Role,
}

#[derive(Debug, Serialize)]
struct Output {
    #[serde(flatten)]
    rich: RichText,
    /// Fetches the renderer queued for data missing from the store
    #[serde(skip_serializing_if = "Vec::is_empty")]
    requests: Vec<FetchRequest>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let (store, mut requests) = MemoryStore::with_requests();
    if let Some(path) = &args.store {
        load_snapshot(&store, path)?;
    }

    let renderer = Renderer::new(&config);
    let rich = match &args.command {
        Command::Markdown { file, guild } => {
            let source = read_input(file.as_deref())?;
            let mut scope = Message::new(0, 0, User::new(0, ""), source);
            scope.guild_id = guild.map(GuildId);
            renderer.render_source(&scope.content, RenderContext::for_message(&scope, &store))
        }
        Command::Message { file } => {
            let input = read_input(file.as_deref())?;
            let message: Message =
                serde_json::from_str(&input).context("Failed to parse message JSON")?;
            renderer.render_message(&message, Some(&store))
        }
        Command::Activity { file } => {
            let input = read_input(file.as_deref())?;
            let activity: Activity =
                serde_json::from_str(&input).context("Failed to parse activity JSON")?;
            renderer.render_activity(&activity)
        }
    };

    let mut output = Output {
        rich,
        requests: Vec::new(),
    };
    while let Ok(request) = requests.try_recv() {
        output.requests.push(request);
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    match path {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => match RenderConfig::default_path() {
            Some(path) => RenderConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config from {}", path.display())),
            None => Ok(RenderConfig::default()),
        },
    }
}

fn load_snapshot(store: &MemoryStore, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read store snapshot {}", path.display()))?;
    let snapshot: Snapshot =
        serde_json::from_str(&content).context("Failed to parse store snapshot")?;

    tracing::debug!(
        users = snapshot.users.len(),
        members = snapshot.members.len(),
        roles = snapshot.roles.len(),
        channels = snapshot.channels.len(),
        "Loaded store snapshot"
    );
    for user in snapshot.users {
        store.insert_user(user);
    }
    for GuildMember { guild_id, member } in snapshot.members {
        store.insert_member(guild_id, member);
    }
    for GuildRole { guild_id, role } in snapshot.roles {
        store.insert_role(guild_id, role);
    }
    for channel in snapshot.channels {
        store.insert_channel(channel);
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}
