//! Oncoscope CLI
//!
//! Command-line front end for the prediction API:
//! - Log in and out
//! - Request a risk prediction
//! - Chat with the AI assistant
//! - Upload a medical report for analysis

use anyhow::Context;
use clap::{Parser, Subcommand};
use oncoscope::config::{generate_default_config, Config};
use oncoscope::{
    ApiClient, ApiError, ClientConfig, Conversation, Credentials, LoggingConfig, LoginReply,
    Prediction, PredictionForm, ReportFile, ReportShelf, Session,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "oncoscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the early cancer-risk prediction API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API server URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Remove the stored session token
    Logout,

    /// Show session state
    Status,

    /// Request a cancer-risk prediction
    Predict {
        /// Age at diagnosis
        #[arg(long)]
        age: String,
        /// Mutation count
        #[arg(long)]
        mutations: String,
        /// Number of samples per patient
        #[arg(long)]
        samples: String,
        /// Tumor mutational burden (nonsynonymous)
        #[arg(long)]
        tmb: String,
        /// Sex (Male, Female)
        #[arg(long, default_value = "Male")]
        sex: String,
    },

    /// Ask the AI assistant
    Chat {
        /// Question (omit with --interactive)
        message: Vec<String>,
        /// Image to upload and discuss
        #[arg(short, long)]
        image: Option<PathBuf>,
        /// Interactive session; `/image <path>` attaches an image, `/quit` exits
        #[arg(long)]
        interactive: bool,
    },

    /// Upload a report (PDF, JPEG, PNG) for analysis
    Upload {
        /// Path to the report file
        path: PathBuf,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);

    let session = Session::file(config.session.token_path());
    let client = ApiClient::new(ClientConfig::from(&config.api), session.clone())?;
    let json = cli.format == "json";

    match cli.command {
        Commands::Login { email, password } => {
            let body = client
                .login(&Credentials::new(&email, password))
                .await
                .unwrap_or_else(|e| fail(&e));

            match LoginReply::from_value(&body).token() {
                Some(token) => {
                    session.set_token(token).context("Failed to store session token")?;
                    println!("Logged in as {}", email);
                }
                None => {
                    eprintln!("Login succeeded but the server returned no token");
                }
            }
        }

        Commands::Logout => {
            client.logout().context("Failed to remove session token")?;
            println!("Logged out");
        }

        Commands::Status => {
            println!("Oncoscope v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("API: {}", client.config().base_url);
            println!("Token file: {}", config.session.token_path().display());
            println!(
                "Session: {}",
                if session.is_authenticated() {
                    "authenticated"
                } else {
                    "not logged in"
                }
            );
        }

        Commands::Predict {
            age,
            mutations,
            samples,
            tmb,
            sex,
        } => {
            let form = PredictionForm {
                diagnosis_age: age,
                mutation_count: mutations,
                samples_per_patient: samples,
                tmb_nonsynonymous: tmb,
                sex,
            };
            let request = form.into_request()?;

            let payload = client.predict(&request).await.unwrap_or_else(|e| fail(&e));
            let prediction = Prediction::from_value(&payload);

            if json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                println!("Risk assessment: {}", prediction.display);
                println!("Level: {} ({})", prediction.risk, prediction.risk.color());
            }
        }

        Commands::Chat {
            message,
            image,
            interactive,
        } => {
            if interactive {
                run_interactive_chat(&client).await?;
            } else {
                let text = message.join(" ");
                let image = match image {
                    Some(path) => Some(ReportFile::from_path(&path).await?),
                    None => None,
                };

                let mut conversation = Conversation::new();
                match conversation.send(&client, &text, image.as_ref()).await {
                    Some(answer) if json => println!("{}", serde_json::to_string_pretty(answer)?),
                    Some(answer) => println!("{}", answer.text),
                    None => {
                        eprintln!("Nothing to send: provide a message or --image");
                        std::process::exit(1);
                    }
                }
            }
        }

        Commands::Upload { path } => {
            let file = ReportFile::from_path(&path).await?;
            let mut shelf = ReportShelf::new();
            let report = shelf.upload(&client, &file).await.unwrap_or_else(|e| fail(&e));

            if json {
                println!("{}", serde_json::to_string_pretty(report)?);
            } else {
                println!("{} ({}, {})", report.name, report.kind, report.date);
                println!();
                println!("Summary: {}", report.summary);
                if !report.abnormal_markers.is_empty() {
                    println!();
                    println!("Abnormal markers:");
                    for marker in &report.abnormal_markers {
                        println!("  - {}", marker);
                    }
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }
    }

    Ok(())
}

/// Line-oriented chat loop over stdin
async fn run_interactive_chat(client: &ApiClient) -> anyhow::Result<()> {
    let mut conversation = Conversation::new();
    let mut pending_image: Option<ReportFile> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if let Some(greeting) = conversation.last() {
        println!("ai> {}", greeting.text);
    }

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        if line == "/quit" || line == "/exit" {
            break;
        }

        if let Some(path) = line.strip_prefix("/image ") {
            match ReportFile::from_path(&PathBuf::from(path.trim())).await {
                Ok(file) => {
                    println!("(attached {})", file.name());
                    pending_image = Some(file);
                }
                Err(e) => eprintln!("{}", e),
            }
            continue;
        }

        let image = pending_image.take();
        if let Some(answer) = conversation.send(client, line, image.as_ref()).await {
            println!("ai> {}", answer.text);
        }
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("oncoscope={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn fail(err: &ApiError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}
