use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use insights_gateway::identity::{encode_principal, PRINCIPAL_HEADER};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Call the insights gateway the way the signed-in front end does", long_about = None)]
struct Cli {
    /// Gateway base URL including the route prefix.
    #[arg(short, long, default_value = "http://localhost:7071/api")]
    url: String,

    /// Display name placed in the synthesised identity header.
    #[arg(short = 'U', long, default_value = "dev@localhost")]
    user: String,

    /// Send requests without an identity header.
    #[arg(long)]
    anonymous: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call the greeting handler
    Greet {
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Fetch account insights through the proxy
    Insights,
    /// Upload a recording
    Upload { file: PathBuf },
    /// Check gateway status
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !cli.anonymous {
        headers.insert(PRINCIPAL_HEADER, HeaderValue::from_str(&encode_principal(&cli.user))?);
    }

    let res = match cli.command {
        Commands::Greet { name } => {
            let mut req = client
                .get(format!("{}/HttpTrigger", cli.url))
                .headers(headers);
            if let Some(name) = name {
                req = req.query(&[("name", name)]);
            }
            req.send().await?
        }
        Commands::Insights => {
            client
                .get(format!("{}/abn_insights", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Upload { file } => {
            let bytes = tokio::fs::read(&file).await?;
            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name("audio.webm")
                .mime_str("audio/webm")?;
            let form = reqwest::multipart::Form::new().part("audio", part);
            client
                .post(format!("{}/upload_audio", cli.url))
                .headers(headers)
                .multipart(form)
                .send()
                .await?
        }
        Commands::Health => {
            client
                .get(format!("{}/health", cli.url))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let is_json = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    if is_json {
        let json: Value = serde_json::from_str(&text)?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}
