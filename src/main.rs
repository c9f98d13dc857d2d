//! whsheet - Whitehack character sheet manager

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whsheet::advancement::{self, CharacterClass};
use whsheet::character::Character;
use whsheet::normalize::normalize;
use whsheet::roster::default_export_file_name;
use whsheet::{Config, Sheets};

/// Whitehack character sheet manager
#[derive(Parser, Debug)]
#[command(name = "whsheet", version, about = "Manage Whitehack character sheets")]
struct Args {
    /// Config file (defaults to whsheet.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all characters
    List,
    /// Print one character as JSON
    Show { id: String },
    /// Create a new level 1 character
    New {
        name: String,
        #[arg(short, long, default_value = "Deft")]
        class: String,
        #[arg(short, long)]
        player: Option<String>,
    },
    /// Delete a character
    Delete { id: String },
    /// Change a character's level, resizing class slots
    SetLevel { id: String, level: i64 },
    /// Add experience, levelling up when the XP allows it
    AddXp { id: String, xp: u32 },
    /// Import characters from a file, or from stdin when no file is given
    Import { file: Option<PathBuf> },
    /// Export all characters (defaults to a dated file name)
    Export { file: Option<PathBuf> },
    /// Show advancement stats for a class and level
    Stats { class: String, level: i64 },
    /// Show the level reached by a class with some XP
    Level { class: String, xp: i64 },
    /// Print the canonical form of a character file
    Normalize { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Table lookups and file conversion don't touch storage
    match &args.command {
        Command::Stats { class, level } => return print_stats(class, *level),
        Command::Level { class, xp } => {
            println!("{}", advancement::level_for_xp(class, *xp));
            return Ok(());
        }
        Command::Normalize { file } => {
            let bytes = tokio::fs::read(file).await?;
            let raw: serde_json::Value = serde_json::from_slice(&bytes)?;
            let normalized = normalize(&raw);
            eprintln!("Detected {} format", normalized.format);
            println!("{}", serde_json::to_string_pretty(&normalized.value)?);
            return Ok(());
        }
        _ => {}
    }

    let sheets = Sheets::open(config).await?;
    let roster = sheets.roster();

    match args.command {
        Command::List => {
            for c in roster.characters() {
                println!(
                    "{}  {:<20} {:<9} L{:<2} {}",
                    c.id, c.name, c.character_class, c.level, c.player_name
                );
            }
        }
        Command::Show { id } => {
            let character = find(&sheets, &id)?;
            println!("{}", serde_json::to_string_pretty(&character)?);
        }
        Command::New {
            name,
            class,
            player,
        } => {
            let class = CharacterClass::parse(&class)
                .ok_or_else(|| anyhow!("Unknown class '{}'", class))?;
            let mut character = Character::new(&name, class);
            character.player_name = player.unwrap_or_default();
            let saved = roster.save_character(character).await?;
            println!("{}", saved.id);
        }
        Command::Delete { id } => {
            if !roster.delete(&id).await? {
                bail!("No character with id {}", id);
            }
        }
        Command::SetLevel { id, level } => {
            let updated = roster.update(&id, |c| c.with_level(level)).await?;
            println!("{} is now level {}", updated.name, updated.level);
        }
        Command::AddXp { id, xp } => {
            let updated = roster
                .update(&id, |c| c.with_experience_gained(xp))
                .await?;
            println!(
                "{} has {} XP (level {})",
                updated.name, updated.experience, updated.level
            );
        }
        Command::Import { file } => {
            let imported = match file {
                Some(path) => roster.import_file(&path).await?,
                None => {
                    let mut text = String::new();
                    tokio::io::stdin().read_to_string(&mut text).await?;
                    roster.import_text(&text).await?
                }
            };
            println!("Imported {} characters", imported.len());
        }
        Command::Export { file } => {
            let path = file.unwrap_or_else(|| {
                PathBuf::from(default_export_file_name(chrono::Local::now().date_naive()))
            });
            let count = roster.export_file(&path).await?;
            println!("Exported {} characters to {}", count, path.display());
        }
        Command::Stats { .. } | Command::Level { .. } | Command::Normalize { .. } => {}
    }

    Ok(())
}

fn find(sheets: &Sheets, id: &str) -> Result<Character> {
    sheets
        .roster()
        .get(id)
        .ok_or_else(|| anyhow!("No character with id {}", id))
}

fn print_stats(class: &str, level: i64) -> Result<()> {
    let Some(class) = CharacterClass::parse(class) else {
        bail!("Unknown class '{}'", class);
    };
    let stats = class.stats(level);
    let hit_dice = stats.parsed_hit_dice()?;
    println!("{} level {}", class, level.clamp(1, 10));
    println!("  Hit dice:  {} ({})", stats.hit_dice, hit_dice.notation());
    println!("  HP range:  {}-{}", hit_dice.min(), hit_dice.max());
    println!("  Attack:    {}", stats.attack_value);
    println!("  Saving:    {}", stats.saving_value);
    println!("  Slots:     {}", stats.slots);
    println!("  Groups:    {}", stats.groups);
    println!("  Raises:    {}", stats.raises);
    if level < 10 {
        println!("  Next at:   {} XP", class.xp_requirement(level.max(1) + 1));
    }
    Ok(())
}
