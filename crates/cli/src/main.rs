//! Energy Consumption Predictor CLI
//!
//! A command-line tool for requesting consumption predictions and checking
//! the prediction service.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{predict, status};

/// Energy Consumption Predictor CLI
#[derive(Parser)]
#[command(name = "ecp")]
#[command(author, version, about = "CLI for the Energy Consumption Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via ECP_API_URL env var)
    #[arg(long, env = "ECP_API_URL", default_value = "http://localhost:5001")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Request an energy consumption prediction
    Predict {
        /// Raw JSON request body; overrides every field flag
        #[arg(long)]
        json: Option<String>,

        /// Hour of day [0-23]
        #[arg(long)]
        hour: Option<u32>,

        /// Day of week, Monday = 0
        #[arg(long)]
        day_of_week: Option<u32>,

        /// Month [1-12]
        #[arg(long)]
        month: Option<u32>,

        /// Outdoor temperature in Celsius
        #[arg(long)]
        temperature: Option<f64>,

        /// Relative humidity percentage
        #[arg(long)]
        humidity: Option<f64>,

        /// Building size in square feet
        #[arg(long)]
        square_footage: Option<f64>,

        /// Number of occupants
        #[arg(long)]
        occupancy: Option<f64>,

        /// Renewable energy contribution in kWh
        #[arg(long)]
        renewable_energy: Option<f64>,

        /// HVAC is running
        #[arg(long)]
        hvac: bool,

        /// Lighting is on
        #[arg(long)]
        lighting: bool,

        /// The day is a holiday
        #[arg(long)]
        holiday: bool,
    },

    /// Show service health
    Health,

    /// Show loaded model information
    ModelInfo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    match cli.command {
        Commands::Predict {
            json,
            hour,
            day_of_week,
            month,
            temperature,
            humidity,
            square_footage,
            occupancy,
            renewable_energy,
            hvac,
            lighting,
            holiday,
        } => {
            let body = predict::build_request(
                json,
                predict::Fields {
                    hour,
                    day_of_week,
                    month,
                    temperature,
                    humidity,
                    square_footage,
                    occupancy,
                    renewable_energy,
                    hvac,
                    lighting,
                    holiday,
                },
            )?;
            predict::run(&client, &body, cli.format).await?;
        }
        Commands::Health => {
            status::show_health(&client, cli.format).await?;
        }
        Commands::ModelInfo => {
            status::show_model_info(&client, cli.format).await?;
        }
    }

    Ok(())
}
