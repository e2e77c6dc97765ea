// Gallery CLI - admin client for the artwork catalog

mod client;
mod draft;
mod local;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use gallery_catalog::{inquiry_link, ArtCategory, Artwork, Catalog, Session};

use client::{ApiClient, DEFAULT_API_URL};
use draft::ArtworkArgs;
use local::LocalWorkspace;

/// Gallery - manage the artwork catalog locally or on a gallery server
#[derive(Parser)]
#[command(name = "gallery")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with the catalog stored on this machine
    Local {
        /// Directory holding the local catalog (defaults to ~/.gallery)
        #[arg(long, env = "GALLERY_DATA_DIR")]
        data_dir: Option<PathBuf>,

        #[command(subcommand)]
        action: LocalAction,
    },
    /// Work with the catalog on a gallery server
    Remote {
        /// Base URL of the gallery server
        #[arg(long, env = "GALLERY_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,

        /// Admin bearer token for mutations
        #[arg(long, env = "GALLERY_ADMIN_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Prompt for the admin token instead of passing it on the command line
        #[arg(long, conflicts_with = "token")]
        ask_token: bool,

        #[command(subcommand)]
        action: RemoteAction,
    },
}

#[derive(Subcommand)]
enum LocalAction {
    /// List artworks, newest first
    List {
        /// Only show one category ("Painting", "Pencil Work" or "All")
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one artwork
    Show { id: String },
    /// Create an artwork, or update it when --id names an existing one
    Save(ArtworkArgs),
    /// Remove an artwork
    Remove { id: String },
    /// Discard local changes and restore the seed catalog
    Reset {
        /// Skip the confirmation notice
        #[arg(short, long)]
        force: bool,
    },
    /// Print the purchase inquiry link for an artwork
    Inquire {
        id: String,

        /// Phone number the inquiry is addressed to
        #[arg(long, default_value = gallery_catalog::inquiry::DEFAULT_WHATSAPP_NUMBER)]
        phone: String,
    },
}

#[derive(Subcommand)]
enum RemoteAction {
    /// List artworks, newest first
    List {
        /// Only show one category ("Painting", "Pencil Work" or "All")
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one artwork
    Show { id: String },
    /// Create an artwork, or update it when --id names an existing one
    Save(ArtworkArgs),
    /// Remove an artwork
    Remove { id: String },
    /// Upload an image file and print the stored image URL
    Upload { path: PathBuf },
    /// Print the purchase inquiry link for an artwork
    Inquire { id: String },
    /// Check server and database health
    Health,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Local { data_dir, action } => handle_local(data_dir, action),
        Commands::Remote {
            api_url,
            token,
            ask_token,
            action,
        } => resolve_token(token, ask_token)
            .and_then(|token| handle_remote(ApiClient::new(&api_url, token), action)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn resolve_token(token: Option<String>, ask: bool) -> anyhow::Result<Option<String>> {
    if !ask {
        return Ok(token);
    }
    let entered = rpassword::prompt_password("Admin token: ")?;
    let entered = entered.trim();
    if entered.is_empty() {
        anyhow::bail!("Admin token cannot be empty");
    }
    Ok(Some(entered.to_string()))
}

/// Parses a category filter; "All" (any case) means no filter.
fn parse_category(raw: Option<&str>) -> anyhow::Result<Option<ArtCategory>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(all) if all.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => value
            .parse::<ArtCategory>()
            .map(Some)
            .map_err(|v| anyhow::anyhow!("Unknown category '{}' (expected Painting or Pencil Work)", v)),
    }
}

fn handle_local(data_dir: Option<PathBuf>, action: LocalAction) -> anyhow::Result<()> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => local::default_data_dir()?,
    };
    let mut workspace = LocalWorkspace::open(&dir);

    let result = run_local(&mut workspace, &dir, action);
    for warning in workspace.warnings() {
        eprintln!("{} {}", "!".yellow().bold(), warning.yellow());
    }
    result
}

fn run_local(workspace: &mut LocalWorkspace, dir: &Path, action: LocalAction) -> anyhow::Result<()> {
    let catalog = &mut workspace.catalog;
    match action {
        LocalAction::List { category } => {
            let category = parse_category(category.as_deref())?;
            print_listing(&catalog.by_category(category));
            Ok(())
        }
        LocalAction::Show { id } => {
            let artwork = catalog
                .get(&id)?
                .ok_or_else(|| anyhow::anyhow!("Artwork not found: {}", id))?;
            print_artwork(&artwork);
            Ok(())
        }
        LocalAction::Save(args) => {
            let saved = catalog.save(args.into_draft()?)?;
            println!("{} Saved {} ({})", "✓".green().bold(), saved.title.bold(), saved.id);
            Ok(())
        }
        LocalAction::Remove { id } => {
            if !catalog.remove(&id) {
                anyhow::bail!("Artwork not found: {}", id);
            }
            println!("{} Removed {}", "✓".green().bold(), id);
            Ok(())
        }
        LocalAction::Reset { force } => {
            if !force {
                println!(
                    "This discards every local change in {}. Re-run with --force to continue.",
                    dir.display()
                );
                return Ok(());
            }
            let count = catalog.reset().len();
            println!("{} Restored seed catalog ({} artworks)", "✓".green().bold(), count);
            Ok(())
        }
        LocalAction::Inquire { id, phone } => {
            let artwork = catalog
                .get(&id)?
                .ok_or_else(|| anyhow::anyhow!("Artwork not found: {}", id))?;
            println!("{}", inquiry_link(&artwork, &phone));
            Ok(())
        }
    }
}

fn handle_remote(mut client: ApiClient, action: RemoteAction) -> anyhow::Result<()> {
    match action {
        RemoteAction::List { category } => {
            let category = parse_category(category.as_deref())?;
            let artworks = client.list(category)?;
            print_listing(&artworks.iter().collect::<Vec<_>>());
            Ok(())
        }
        RemoteAction::Show { id } => {
            let mut session = Session::new(client);
            let artwork = session.fetch(&id)?;
            print_artwork(&artwork);
            Ok(())
        }
        RemoteAction::Save(args) => {
            let mut session = Session::new(client);
            session.refresh()?;
            match session.save(args.into_draft()?) {
                Ok(saved) => {
                    println!("{} Saved {} ({})", "✓".green().bold(), saved.title.bold(), saved.id);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("{} {}", "✗".red().bold(), "Save failed, catalog unchanged".red());
                    Err(e.into())
                }
            }
        }
        RemoteAction::Remove { id } => {
            let mut session = Session::new(client);
            session.refresh()?;
            session.delete(&id)?;
            println!(
                "{} Removed {} ({} artworks remain)",
                "✓".green().bold(),
                id,
                session.working().len()
            );
            Ok(())
        }
        RemoteAction::Upload { path } => {
            let data_uri = draft::image_data_uri(&path)?;
            let image_url = client.upload_image(&data_uri)?;
            println!("{} Image accepted ({} bytes)", "✓".green().bold(), image_url.len());
            println!("{}", image_url);
            Ok(())
        }
        RemoteAction::Inquire { id } => {
            let url = client
                .inquiry_link(&id)?
                .ok_or_else(|| anyhow::anyhow!("Artwork not found: {}", id))?;
            println!("{}", url);
            Ok(())
        }
        RemoteAction::Health => {
            let health = client.health()?;
            let database = health["database"].as_str().unwrap_or("unknown");
            let marker = if database == "connected" {
                "✓".green().bold()
            } else {
                "✗".red().bold()
            };
            println!("{} {} (database: {})", marker, client.base_url(), database);
            Ok(())
        }
    }
}

fn print_listing(artworks: &[&Artwork]) {
    if artworks.is_empty() {
        println!("{}", "No artworks.".dimmed());
        return;
    }
    for artwork in artworks {
        let status = if artwork.available {
            "available".green()
        } else {
            "sold".red()
        };
        println!(
            "{:<16} {:<32} {:<12} {:>10} {}",
            artwork.id,
            truncate(&artwork.title, 32),
            artwork.category.as_str(),
            format!("${:.2}", artwork.price),
            status
        );
    }
}

fn print_artwork(artwork: &Artwork) {
    println!("{}", artwork.title.bold());
    println!("  Id:         {}", artwork.id);
    println!("  Artist:     {}", artwork.artist);
    println!("  Category:   {}", artwork.category);
    println!("  Price:      ${:.2}", artwork.price);
    println!("  Dimensions: {}", artwork.dimensions);
    println!("  Year:       {}", artwork.year);
    println!(
        "  Available:  {}",
        if artwork.available { "yes".green() } else { "no".red() }
    );
    if let Some(created_at) = artwork.created_at {
        println!("  Created:    {}", created_at.to_rfc3339());
    }
    println!("  Image:      {}", truncate(&artwork.image_url, 60));
    if !artwork.description.is_empty() {
        println!();
        println!("  {}", artwork.description);
    }
}

/// Shortens long text (such as embedded data URIs) for display.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
