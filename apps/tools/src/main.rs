use anyhow::Result;
use clap::{Parser, Subcommand};
use server_api::{list_contact_requests, ApiContext};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/contact.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the most recent contact requests, newest first.
    ListContacts {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    CountContacts,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = ApiContext {
        storage: Storage::new(&cli.database_url).await?,
    };

    match cli.command {
        Command::ListContacts { limit } => {
            let records = list_contact_requests(&ctx, limit)
                .await
                .map_err(|e| anyhow::anyhow!(e.message))?;
            for record in records {
                println!(
                    "#{} {} <{}> phone={} subject={:?} at {}",
                    record.id.0,
                    record.full_name,
                    record.email,
                    record.phone_number.as_deref().unwrap_or("-"),
                    record.subject,
                    record.created_at.to_rfc3339(),
                );
            }
        }
        Command::CountContacts => {
            let count = ctx.storage.count_contact_requests().await?;
            println!("contact requests: {count}");
        }
    }

    Ok(())
}
