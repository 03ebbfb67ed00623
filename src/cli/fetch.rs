use crate::core::credentials::Credential;
use crate::core::models::CycleOutcome;
use crate::core::settings::Settings;
use crate::daemon::fetch_with_backoff;
use crate::providers::{GraphApi, GraphClient};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct FetchOutput {
    payload: Value,
    backoffs: u32,
    #[serde(with = "chrono::serde::ts_seconds")]
    fetched_at: DateTime<Utc>,
}

pub async fn run(json: bool) -> Result<()> {
    let settings = Settings::load()?;
    let credential = Credential::from_env(&settings.credential_env)?;
    let client = GraphClient::new(&settings.api)?;

    let output = fetch_once(&client, &credential, &settings).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text_output(&output);
    }

    Ok(())
}

async fn fetch_once(
    api: &dyn GraphApi,
    credential: &Credential,
    settings: &Settings,
) -> Result<FetchOutput> {
    match fetch_with_backoff(api, credential, &settings.backoff).await {
        CycleOutcome::Success { payload, backoffs } => Ok(FetchOutput {
            payload,
            backoffs,
            fetched_at: Utc::now(),
        }),
        CycleOutcome::Failed { error, backoffs } => {
            anyhow::bail!("Fetch failed after {} backoff(s): {}", backoffs, error)
        }
    }
}

fn print_text_output(output: &FetchOutput) {
    match &output.payload {
        Value::Object(fields) => {
            for (key, value) in fields {
                match value {
                    Value::String(s) => println!("{}: {}", key, s),
                    other => println!("{}: {}", key, other),
                }
            }
        }
        other => println!("{}", other),
    }

    if output.backoffs > 0 {
        println!("(rate limited {} time(s) before succeeding)", output.backoffs);
    }
}
