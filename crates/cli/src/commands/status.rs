//! Service status CLI commands

use anyhow::Result;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{color_status, print_info, print_success, print_warning, OutputFormat};

/// Row for the health table
#[derive(Tabled)]
struct HealthRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Model Loaded")]
    model_loaded: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
}

/// Row for the model info table
#[derive(Tabled)]
struct ModelInfoRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Loaded")]
    loaded: String,
    #[tabled(rename = "Features")]
    features: String,
    #[tabled(rename = "Scaler X")]
    scaler_x: String,
    #[tabled(rename = "Scaler Y")]
    scaler_y: String,
}

fn yes_no(value: bool) -> String {
    if value {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

/// Show service health
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health = client.health().await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&health)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let row = HealthRow {
                status: color_status(&health.status),
                model_loaded: yes_no(health.model_loaded),
                timestamp: health.timestamp.clone(),
            };

            let table = tabled::Table::new(vec![row])
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            if health.status == "healthy" {
                print_success("Service is healthy");
            } else {
                print_warning("Service is not healthy");
            }
        }
    }

    Ok(())
}

/// Show loaded model information
pub async fn show_model_info(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let info = client.model_info().await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&info)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let row = ModelInfoRow {
                model: info.model_descriptor.clone(),
                loaded: yes_no(info.model_loaded),
                features: info.num_features.to_string(),
                scaler_x: yes_no(info.scalers_available.x),
                scaler_y: yes_no(info.scalers_available.y),
            };

            let table = tabled::Table::new(vec![row])
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            if !info.model_loaded {
                print_info("Predictions are currently served by the fallback heuristic");
            }
        }
    }

    Ok(())
}
