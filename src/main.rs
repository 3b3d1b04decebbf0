use clap::{Parser, Subcommand};
use iec62056_rs::{init_logger, log_info, MeterDeviceHandle, MeterError, SerialConfig};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "iec62056-cli")]
#[command(about = "CLI tool for IEC 62056-21 Mode A meter read-out")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Read {
        #[arg(default_value = "/dev/cuaU3")]
        port: String,
        #[arg(short, long, default_value = "300")]
        baudrate: u32,
        #[arg(short, long, default_value = "3")]
        timeout_secs: u64,
        /// Print the reading as JSON instead of the plain report
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), MeterError> {
    init_logger();

    let cli = Cli::parse();

    match cli.command {
        Commands::Read {
            port,
            baudrate,
            timeout_secs,
            json,
        } => {
            let config = SerialConfig {
                baudrate,
                timeout: Duration::from_secs(timeout_secs),
            };
            let mut handle = MeterDeviceHandle::connect_with_config(&port, config).await?;
            log_info(&format!("Connected to meter on {port}"));
            let reading = handle.query().await?;

            if json {
                let rendered = serde_json::to_string_pretty(&reading)
                    .map_err(|e| MeterError::Other(e.to_string()))?;
                println!("{rendered}");
            } else {
                println!("{:>16}: {}", "identifier", reading.identifier);
                println!();
                for item in &reading.items {
                    match item.values.as_slice() {
                        [value, unit] => println!("{:>16}: {value} [{unit}]", item.tag),
                        [value] => println!("{:>16}: {value}", item.tag),
                        values => println!("{:>16}: {values:?}", item.tag),
                    }
                }
            }
        }
    }

    Ok(())
}
