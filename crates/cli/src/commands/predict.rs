//! Prediction CLI command

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{color_confidence, format_kwh, print_error, print_info, OutputFormat};

/// Field flags accepted by the `predict` subcommand
#[derive(Debug, Default)]
pub struct Fields {
    pub hour: Option<u32>,
    pub day_of_week: Option<u32>,
    pub month: Option<u32>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub square_footage: Option<f64>,
    pub occupancy: Option<f64>,
    pub renewable_energy: Option<f64>,
    pub hvac: bool,
    pub lighting: bool,
    pub holiday: bool,
}

/// Row for the prediction result table
#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Prediction")]
    prediction: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Quality")]
    quality: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Features")]
    features: String,
    #[tabled(rename = "Fallback")]
    fallback: String,
}

/// Build the request body from either a raw JSON string or the field flags.
///
/// Only flags the user actually set are included; the service fills in its
/// own defaults for everything else.
pub fn build_request(json_override: Option<String>, fields: Fields) -> Result<Value> {
    if let Some(raw) = json_override {
        return serde_json::from_str(&raw).context("Invalid --json body");
    }

    let mut body = Map::new();
    if let Some(hour) = fields.hour {
        body.insert("hour".into(), json!(hour));
    }
    if let Some(day_of_week) = fields.day_of_week {
        body.insert("dayOfWeek".into(), json!(day_of_week));
    }
    if let Some(month) = fields.month {
        body.insert("month".into(), json!(month));
    }
    if let Some(temperature) = fields.temperature {
        body.insert("temperature".into(), json!(temperature));
    }
    if let Some(humidity) = fields.humidity {
        body.insert("humidity".into(), json!(humidity));
    }
    if let Some(square_footage) = fields.square_footage {
        body.insert("squareFootage".into(), json!(square_footage));
    }
    if let Some(occupancy) = fields.occupancy {
        body.insert("occupancy".into(), json!(occupancy));
    }
    if let Some(renewable_energy) = fields.renewable_energy {
        body.insert("renewableEnergy".into(), json!(renewable_energy));
    }
    if fields.hvac {
        body.insert("hvacUsage".into(), json!(true));
    }
    if fields.lighting {
        body.insert("lightingUsage".into(), json!(true));
    }
    if fields.holiday {
        body.insert("isHoliday".into(), json!(true));
    }

    Ok(Value::Object(body))
}

/// Request a prediction and print the result
pub async fn run(client: &ApiClient, body: &Value, format: OutputFormat) -> Result<()> {
    let response = client.predict(body).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&response)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            if !response.success {
                print_error(&format!(
                    "Prediction failed: {}",
                    response.error.as_deref().unwrap_or("unknown error")
                ));
                anyhow::bail!("prediction request rejected");
            }

            let row = PredictionRow {
                prediction: format_kwh(response.prediction.unwrap_or_default()),
                confidence: color_confidence(response.confidence.unwrap_or_default()),
                quality: response.quality.clone().unwrap_or_default(),
                model: response.model_descriptor.clone().unwrap_or_default(),
                features: response.features_used.unwrap_or_default().to_string(),
                fallback: if response.fallback_mode.unwrap_or(false) {
                    "yes".to_string()
                } else {
                    "no".to_string()
                },
            };

            let table = tabled::Table::new(vec![row])
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            if response.fallback_mode.unwrap_or(false) {
                print_info("Served by the fallback heuristic; no trained model is loaded");
            }
        }
    }

    Ok(())
}
