use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::debug;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use jenkins_client::config::AppConfig;
use jenkins_client::{
    parse, BuildServerClient, CredentialChoice, Credentials, InMemoryCredentialStore, ReqwestHttpClient,
    RequestOptions,
};

#[derive(Parser, Debug)]
#[clap(version = env!("JENKINS_CLIENT_VERSION"), author = env!("CARGO_PKG_AUTHORS"))]
pub struct Opts {
    /// Configuration file (defaults to the per-user location)
    #[clap(long, short = 'c')]
    config: Option<PathBuf>,

    /// User name to authenticate with
    #[clap(long, short = 'u')]
    user: Option<String>,

    /// Password or API token for --user
    #[clap(long, short = 'p', requires = "user")]
    password: Option<String>,

    /// Never send credentials, even configured ones
    #[clap(long, conflicts_with = "user")]
    anonymous: bool,

    /// Per-request timeout in seconds
    #[clap(long)]
    timeout_secs: Option<u64>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// GET a URL and print the response body
    Get {
        url: Url,
        /// Pretty-print the body as JSON
        #[clap(long)]
        json: bool,
    },
    /// Print the console log of a build
    Console {
        /// Build URL, e.g. http://ci.example.com/job/foo/42/
        url: Url,
        /// Offset to start reading from
        #[clap(long, default_value_t = 0)]
        start: u64,
        /// Keep polling while the build is running
        #[clap(long, short = 'f')]
        follow: bool,
        /// Delay between two polls
        #[clap(long, default_value_t = 1000)]
        interval_ms: u64,
    },
    /// POST plain text to a URL and print the response body
    Post {
        url: Url,
        #[clap(long, short = 'd', default_value = "")]
        data: String,
    },
}

impl Opts {
    fn credential_choice(&self) -> CredentialChoice {
        if self.anonymous {
            return CredentialChoice::Anonymous;
        }
        match &self.user {
            Some(user) => CredentialChoice::Explicit(Credentials::new(
                user.clone(),
                self.password.clone().unwrap_or_default(),
            )),
            None => CredentialChoice::UseCached,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let config = AppConfig::load(opts.config.as_deref())?;
    debug!("Loaded configuration with {} auth rule(s)", config.auth_rules.len());

    let timeout = opts.timeout_secs.map(Duration::from_secs).or(config.timeout());
    let credentials = Arc::new(InMemoryCredentialStore::from_rules(config.auth_rules)?);
    let client =
        BuildServerClient::new(credentials, Arc::new(ReqwestHttpClient::new())).with_default_timeout(timeout);

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });
    let options = RequestOptions::new().with_cancellation(token.clone());
    let choice = opts.credential_choice();

    match &opts.command {
        Command::Get { url, json } => {
            let body = client.fetch_text(url, choice, &options).await?;
            if *json {
                match parse::<serde_json::Value>(&body)? {
                    Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                    None => info!("{} returned an empty body", url),
                }
            } else {
                println!("{}", body);
            }
        }
        Command::Console {
            url,
            start,
            follow,
            interval_ms,
        } => {
            let mut offset = *start;
            let mut stdout = std::io::stdout();
            loop {
                let output = client.fetch_console_output(url, offset, choice.clone(), &options).await?;
                stdout.write_all(output.text.as_bytes())?;
                stdout.flush()?;
                offset = output.offset;

                if !*follow || !output.is_building {
                    break;
                }
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(*interval_ms)) => {}
                    _ = token.cancelled() => break,
                }
            }
            debug!("Stopped reading {} at offset {}", url, offset);
        }
        Command::Post { url, data } => {
            let body = client.submit_data(url, data.clone(), choice, &options).await?;
            println!("{}", body);
        }
    }

    Ok(())
}
