// src/bin/docuvault.rs
//! DocuVault command line front end

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use docu_vault::payload::NewVersion;
use docu_vault::{recovery_kit, Config, Secret, SessionState, VaultSession};
use rpassword::prompt_password;
use tracing::{info, warn};

/// DocuVault encrypted document vault
#[derive(Parser, Debug)]
#[command(name = "docuvault")]
#[command(about = "Encrypted document vault", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Show whether a vault exists
    Status,
    /// Create a new vault
    Init,
    /// Unlock and list contents
    Unlock {
        /// Use the recovery key instead of the password
        #[arg(long)]
        recovery: bool,
    },
    /// Change the vault password
    Passwd,
    /// Add a document
    Add {
        file: PathBuf,
        /// Name of an existing folder to place the document in
        #[arg(long)]
        folder: Option<String>,
    },
    /// Create a folder
    Mkdir { name: String },
    /// Write the recovery key file
    ExportKey { path: PathBuf },
    /// Delete the vault (irreversible)
    Reset,
}

/// Extension to MIME type, matched case-insensitively.
const MIME_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("txt", "text/plain"),
    ("json", "application/json"),
];

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    let session = VaultSession::from_config(config)
        .await
        .context("Failed to open vault storage")?;

    let outcome = run(&session, cli.cmd).await;

    // Always close so a pending autosave gets written.
    let closed = session.close().await.context("Could not save vault");
    outcome.and(closed)
}

async fn run(session: &VaultSession, cmd: Command) -> Result<()> {
    match cmd {
        Command::Status => status(session).await,
        Command::Init => init(session).await,
        Command::Unlock { recovery } => {
            unlock(session, recovery).await?;
            list(session).await
        }
        Command::Passwd => passwd(session).await,
        Command::Add { file, folder } => add(session, &file, folder.as_deref()).await,
        Command::Mkdir { name } => mkdir(session, &name).await,
        Command::ExportKey { path } => export_key(session, &path).await,
        Command::Reset => reset(session).await,
    }
}

fn ask(prompt: &str) -> Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_owned())
}

fn read_secret(prompt: &str) -> Result<Secret> {
    Ok(Secret::new(prompt_password(prompt)?))
}

fn read_new_password() -> Result<Secret> {
    let first = read_secret("New password: ")?;
    let second = read_secret("Repeat password: ")?;
    if first.expose_secret() != second.expose_secret() {
        bail!("Passwords do not match");
    }
    Ok(first)
}

async fn status(session: &VaultSession) -> Result<()> {
    let state = session.state().await;
    match state {
        SessionState::Setup => println!("No vault yet. Run `docuvault init`."),
        SessionState::Locked => println!("Vault present and locked."),
        SessionState::LegacyRequiresReset => {
            println!("Vault uses an old format that can no longer be opened. Run `docuvault reset`.")
        }
        other => println!("Vault state: {other}"),
    }
    Ok(())
}

async fn init(session: &VaultSession) -> Result<()> {
    let password = read_new_password()?;
    let phrase = session.setup(password.expose_secret()).await?;

    println!("\nYour recovery key:\n\n    {phrase}\n");
    println!("Write it down. It is the only way back in if you forget your password.");
    let answer = ask("Save it to a file in the current directory too? [y/N] ")?;
    if answer.eq_ignore_ascii_case("y") {
        let path = recovery_kit::default_path(Path::new("."));
        recovery_kit::write_to(&path, &phrase)?;
        println!("Saved to {}", path.display());
    }

    loop {
        if ask("Type YES once the recovery key is stored safely: ")? == "YES" {
            break;
        }
    }
    session.acknowledge_recovery_key().await?;
    info!("Vault created");
    Ok(())
}

async fn unlock(session: &VaultSession, use_recovery: bool) -> Result<()> {
    match session.state().await {
        SessionState::Locked => {}
        SessionState::Setup => bail!("No vault yet. Run `docuvault init`."),
        SessionState::LegacyRequiresReset => {
            bail!("Vault uses an old format and must be reset (`docuvault reset`).")
        }
        other => bail!("Cannot unlock while {other}"),
    }

    let prompt = if use_recovery { "Recovery key: " } else { "Password: " };
    let secret = read_secret(prompt)?;
    if !session.unlock(secret.expose_secret(), use_recovery).await {
        bail!("Incorrect password or recovery key");
    }

    if session.requires_password_change().await {
        println!("Unlocked with the recovery key. Choose a new password to continue.");
        let password = read_new_password()?;
        session.change_password(password.expose_secret()).await?;
        println!("Password changed.");
    }
    Ok(())
}

async fn list(session: &VaultSession) -> Result<()> {
    let payload = session.payload().await?;

    println!("Folders ({}):", payload.folders.len());
    for folder in &payload.folders {
        let parent = folder
            .parent_id
            .as_deref()
            .and_then(|id| payload.folder(id))
            .map(|p| format!(" (in {})", p.name))
            .unwrap_or_default();
        println!("  {}{}", folder.name, parent);
    }

    println!("Documents ({}):", payload.documents.len());
    for doc in &payload.documents {
        let latest = doc.latest_version().map(|v| v.file_name.as_str()).unwrap_or("-");
        println!("  {}  [{} version(s), latest {}]", doc.name, doc.versions.len(), latest);
    }
    Ok(())
}

async fn passwd(session: &VaultSession) -> Result<()> {
    unlock(session, false).await?;
    let password = read_new_password()?;
    session.change_password(password.expose_secret()).await?;
    println!("Password changed.");
    Ok(())
}

async fn add(session: &VaultSession, file: &Path, folder: Option<&str>) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .context("non-UTF8 file name")?
        .to_owned();
    let file_type = mime_for(file).to_owned();

    unlock(session, false).await?;

    let payload = session.payload().await?;
    let folder_id = match folder {
        Some(name) => Some(
            payload
                .folders
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.id.clone())
                .with_context(|| format!("No folder named {name:?}"))?,
        ),
        None => None,
    };

    let version = NewVersion {
        file_data_url: format!("data:{};base64,{}", file_type, STANDARD.encode(&bytes)),
        file_name: file_name.clone(),
        file_type,
        version_notes: String::new(),
    };
    session
        .update(|p| p.add_document(&file_name, folder_id.as_deref(), version))
        .await?;
    println!("Added {file_name}");
    Ok(())
}

async fn mkdir(session: &VaultSession, name: &str) -> Result<()> {
    unlock(session, false).await?;
    session.update(|p| p.create_folder(name, None)).await?;
    println!("Created folder {name}");
    Ok(())
}

async fn export_key(session: &VaultSession, path: &Path) -> Result<()> {
    unlock(session, false).await?;
    let phrase = session
        .recovery_phrase()
        .await?
        .context("This vault does not hold a copy of its recovery key")?;
    recovery_kit::write_to(path, &phrase)?;
    println!("Recovery key written to {}", path.display());
    warn!("{} contains your recovery key in plaintext", path.display());
    Ok(())
}

async fn reset(session: &VaultSession) -> Result<()> {
    session.request_reset().await?;
    println!("This permanently deletes every document in the vault.");
    if ask("Type RESET to continue: ")? != "RESET" {
        session.cancel_reset().await?;
        println!("Cancelled.");
        return Ok(());
    }
    session.confirm_reset().await?;
    println!("Vault deleted.");
    Ok(())
}

fn mime_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_MIME_TYPE;
    };
    MIME_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(DEFAULT_MIME_TYPE, |&(_, mime)| mime)
}
