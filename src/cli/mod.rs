use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod decode_key;
pub mod report;
pub mod send;
pub mod serve;
pub mod simulate;

use crate::core::{PushConfig, init_tracing};

#[derive(Subcommand)]
enum Command {
    /// Run the development server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "8000")]
        port: String,
    },
    /// Run the service worker's notification handler on a payload
    Simulate {
        /// Push message text, leave out to simulate a push without data
        #[arg(long)]
        payload: Option<String>,
        /// Also click the notification
        #[arg(long, action, default_value = "false")]
        click: bool,
        /// URL of an open window that accepts focus
        #[arg(long = "client")]
        clients: Vec<String>,
        /// URL of an open window that refuses focus
        #[arg(long = "closed-client")]
        closed_clients: Vec<String>,
    },
    /// Report a subscription to a server the way the page does
    Report {
        #[arg(long)]
        base_url: String,
        /// JSON file holding the browser's subscription
        #[arg(long)]
        subscription: String,
        #[arg(long, default_value = "")]
        csrf_token: String,
    },
    /// Decode and check a VAPID public key
    DecodeKey {
        #[arg(long)]
        key: String,
    },
    /// Send a push notification to a subscription
    Send {
        /// JSON file holding the browser's subscription
        #[arg(long)]
        subscription: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        /// URL to open when the notification is clicked
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        urgency: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// Print the payload instead of sending it
        #[arg(long, action, default_value = "false")]
        dry_run: bool,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = PushConfig::from_env();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Simulate {
            payload,
            click,
            clients,
            closed_clients,
        }) => {
            init_tracing();
            simulate::run(payload, click, clients, closed_clients, &config).await?;
        }
        Some(Command::Report {
            base_url,
            subscription,
            csrf_token,
        }) => {
            init_tracing();
            report::run(&base_url, &subscription, &csrf_token, &config).await?;
        }
        Some(Command::DecodeKey { key }) => {
            decode_key::run(&key)?;
        }
        Some(Command::Send {
            subscription,
            title,
            body,
            url,
            urgency,
            tag,
            dry_run,
        }) => {
            init_tracing();
            let message = send::Message {
                title,
                body,
                url,
                urgency,
                tag,
            };
            send::run(&subscription, message, dry_run, &config).await?;
        }
        None => {}
    }

    Ok(())
}
