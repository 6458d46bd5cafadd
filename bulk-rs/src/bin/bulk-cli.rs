//! Command line front-end for contact lists and message templates
//!
//! # Usage
//!
//! ```bash
//! # Check a contact file and print the parsed recipients
//! bulk-cli parse contacts.csv
//!
//! # Print the personalised message for every contact
//! bulk-cli render contacts.csv --template "Hi {name}!"
//!
//! # Write the sample contact file
//! bulk-cli demo-csv --output demo-contacts.csv
//!
//! # Dry-run a bulk send through the logging transport
//! bulk-cli send contacts.csv --template "Hi {name}!"
//! ```

use anyhow::Context;
use bulk_rs::campaigns::{BulkSender, CampaignManager};
use bulk_rs::config::LoggingConfig;
use bulk_rs::contacts::{demo_csv, parse_contacts, validate_upload, Recipient, MAX_UPLOAD_BYTES};
use bulk_rs::delivery::LogTransport;
use bulk_rs::session::Session;
use bulk_rs::templates::{MessageTemplate, SubstitutionMode, TemplateRenderer};
use bulk_rs::{db, BulkError};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bulk-cli")]
#[command(about = "Parse contact lists and render bulk messages", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Substitution {
    First,
    All,
}

impl From<Substitution> for SubstitutionMode {
    fn from(value: Substitution) -> Self {
        match value {
            Substitution::First => SubstitutionMode::FirstOccurrence,
            Substitution::All => SubstitutionMode::All,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a contact file and print the recipients as JSON
    Parse {
        /// CSV file
        file: PathBuf,
    },
    /// Print the rendered message for every recipient
    Render {
        /// CSV file
        file: PathBuf,
        /// Message with {name} / {email} placeholders
        #[arg(short, long)]
        template: String,
        #[arg(long, value_enum, default_value = "first")]
        substitution: Substitution,
    },
    /// Write the sample contact file
    DemoCsv {
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a bulk send through the logging transport
    Send {
        /// CSV file
        file: PathBuf,
        /// Message with {name} / {email} placeholders
        #[arg(short, long)]
        template: String,
        #[arg(long, value_enum, default_value = "first")]
        substitution: Substitution,
        /// Pause before each recipient, in milliseconds
        #[arg(long, default_value_t = 100)]
        delay_ms: u64,
    },
}

fn load_contacts(path: &Path) -> anyhow::Result<Vec<Recipient>> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    validate_upload(path.to_str(), None, data.len(), MAX_UPLOAD_BYTES)?;

    let recipients = parse_contacts(&String::from_utf8_lossy(&data))?;
    if recipients.is_empty() {
        return Err(BulkError::NoValidContacts.into());
    }

    Ok(recipients)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    bulk_rs::logging::init(&LoggingConfig {
        level: cli.log_level.clone(),
        format: "compact".to_string(),
    });

    match cli.command {
        Commands::Parse { file } => {
            let recipients = load_contacts(&file)?;
            println!("{}", serde_json::to_string_pretty(&recipients)?);
            eprintln!("{} contacts", recipients.len());
        }
        Commands::Render {
            file,
            template,
            substitution,
        } => {
            let recipients = load_contacts(&file)?;
            let template = MessageTemplate::new(template)?;

            for recipient in &recipients {
                let text = TemplateRenderer::render(&template, recipient, substitution.into());
                println!("{} ({}): {}", recipient.name, recipient.phone, text);
            }
        }
        Commands::DemoCsv { output } => match output {
            Some(path) => {
                std::fs::write(&path, demo_csv())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Demo CSV written to {}", path.display());
            }
            None => println!("{}", demo_csv()),
        },
        Commands::Send {
            file,
            template,
            substitution,
            delay_ms,
        } => {
            let recipients = load_contacts(&file)?;
            let template = MessageTemplate::new(template)?;

            let pool = db::connect("sqlite::memory:").await?;
            db::init_schema(&pool).await?;

            let campaigns = Arc::new(CampaignManager::new(pool));
            let sender = BulkSender::new(
                campaigns,
                Arc::new(LogTransport::new()),
                Duration::from_millis(delay_ms),
                substitution.into(),
            );

            let session = Session::new()
                .with_recipients(recipients)
                .with_template(template)
                .with_connection(true);

            let report = sender.send_all("cli", &session).await?;
            println!("Messages sent to {} contacts ({})", report.delivered, report.message_id);
        }
    }

    Ok(())
}
