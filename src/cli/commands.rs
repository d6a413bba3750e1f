// Pillbox — CLI Command Handlers
//
// The store is opened once per invocation and handed to the application
// facade; every command goes through the facade so it gets the same
// deadline handling as any other host. The handle is released when
// `execute` returns.

use crate::app::App;
use crate::config::Config;
use crate::error::PillboxError;
use crate::store::{Credential, Database, NewCredential, RedbCredentialStore};

use super::{Cli, Commands};

/// Execute the parsed CLI command.
pub async fn execute(cli: Cli) -> Result<(), PillboxError> {
    let config = Config::resolve(cli.home, cli.timeout_secs)?;
    let app = open_app(&config)?;

    match cli.command {
        Commands::Add {
            label,
            location,
            method,
            macaroon,
            preimage,
            invoice,
            kind,
        } => {
            cmd_add(
                &app,
                NewCredential {
                    label: label.trim().to_string(),
                    location: location.trim().to_string(),
                    method,
                    macaroon: macaroon.trim().to_string(),
                    preimage: preimage.trim().to_string(),
                    invoice: invoice.trim().to_string(),
                    kind,
                },
            )
            .await
        }
        Commands::Get { id } => cmd_get(&app, id).await,
        Commands::List => cmd_list(&app).await,
        Commands::Token { id } => cmd_token(&app, id).await,
    }
}

// ─── Add ─────────────────────────────────────────────────────────────────────

async fn cmd_add(app: &App<RedbCredentialStore>, new: NewCredential) -> Result<(), PillboxError> {
    let cred = app.add_credential(new).await?;

    println!("✓ Credential stored");
    println!("  ID:       {}", cred.id);
    println!("  Label:    {}", cred.label);
    println!("  Location: {}", cred.location);

    Ok(())
}

// ─── Get ─────────────────────────────────────────────────────────────────────

async fn cmd_get(app: &App<RedbCredentialStore>, id: u64) -> Result<(), PillboxError> {
    match app.get_credential(id).await {
        Ok(cred) => {
            print_details(&cred);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("Credential not found: {}", id);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn print_details(cred: &Credential) {
    println!("Credential details:\n");
    println!("  ID:       {}", cred.id);
    println!("  Label:    {}", cred.label);
    println!("  Location: {}", cred.location);
    println!("  Method:   {}", cred.method);
    println!("  Type:     {}", cred.kind);
    println!("  Macaroon: {}", cred.macaroon);
    println!("  Preimage: {}", cred.preimage);
    println!("  Invoice:  {}", cred.invoice);
    println!("  Created:  {}", cred.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

// ─── List ────────────────────────────────────────────────────────────────────

async fn cmd_list(app: &App<RedbCredentialStore>) -> Result<(), PillboxError> {
    let credentials = app.list_credentials().await?;

    if credentials.is_empty() {
        println!("No credentials stored yet.");
        println!("Add one with: pillbox add --label <name> --location <url> --macaroon <hex> --preimage <hex> --invoice <bolt11>");
        return Ok(());
    }

    println!("Stored credentials ({}):\n", credentials.len());
    for cred in &credentials {
        println!(
            "  {:>4} │ {:6} │ {:7} │ {:20} │ {}",
            cred.id,
            cred.method,
            cred.kind,
            truncate(&cred.label, 20),
            cred.location,
        );
    }

    Ok(())
}

// ─── Token ───────────────────────────────────────────────────────────────────

async fn cmd_token(app: &App<RedbCredentialStore>, id: u64) -> Result<(), PillboxError> {
    let cred = app.get_credential(id).await?;
    println!("Authorization: {}", cred.authorization_header());
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Open the store at the configured path and wrap it in the facade.
fn open_app(config: &Config) -> Result<App<RedbCredentialStore>, PillboxError> {
    let db = Database::open(&config.db_path())?;
    tracing::debug!(home = %config.home().display(), "Using data directory");
    Ok(App::new(RedbCredentialStore::new(db), config.timeout()))
}

/// Shorten `text` to at most `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
