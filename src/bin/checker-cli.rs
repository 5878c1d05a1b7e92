use clap::{Parser, Subcommand};
use network_state_checker::ClusterState;

#[derive(Parser)]
#[command(name = "checker-cli")]
#[command(about = "Query a running network state checker", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:80")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the raw cluster snapshot and its health code
    Status,
    /// One line per monitored server
    Servers,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    // The health endpoint answers with the health code, which may be any status.
    let res = client.get(format!("{}/", cli.url.trim_end_matches('/'))).send().await?;
    let status = res.status();
    let body = res.text().await?;

    let state: ClusterState = match serde_json::from_str(&body) {
        Ok(state) => state,
        Err(_) => {
            eprintln!("Error: checker returned status {}", status);
            eprintln!("Response: {}", body);
            return Ok(());
        }
    };

    match cli.command {
        Commands::Status => {
            println!("HTTP {}", status.as_u16());
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::Servers => {
            println!("health code: {}", state.health_code);
            for (position, slot) in state.servers.iter().enumerate() {
                match slot {
                    Some(record) => println!(
                        "#{:<3} {:<24} {:<9} code={:<3} tests={} failed={} succeeded={}",
                        record.monitor_id,
                        record.display_name.as_deref().unwrap_or("-"),
                        record.verdict,
                        record.verdict_code,
                        record.total,
                        record.failed,
                        record.succeeded,
                    ),
                    None => println!("#{:<3} (no results yet)", position),
                }
            }
        }
    }

    Ok(())
}
