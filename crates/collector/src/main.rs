use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use collector::Collector;
use common::{config::AppConfig, logging};
use gh_client::RestGithubClient;
use serde::Serialize;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging("info");
    let config = AppConfig::load()?;

    if config.github.token.is_none() {
        warn!("no GitHub token configured; anonymous requests are rate limited to 60/hr");
    }

    let client = Arc::new(RestGithubClient::new(
        config.github.token.clone(),
        &config.github.user_agent,
        Duration::from_secs(config.collector.cache_ttl_secs),
    )?);
    let collector = Collector::new(client, config.collector.clone());

    let output_dir = Path::new(&config.collector.output_dir);
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let now = Utc::now();
    for hackathon in &config.hackathons {
        let output_path = output_dir.join(format!("{}.json", hackathon.slug));
        // Ended hackathons keep their historical snapshot static.
        if !hackathon.is_active(now) && output_path.exists() {
            info!(slug = %hackathon.slug, "skipping ended hackathon with existing snapshot");
            continue;
        }

        match collector.run_hackathon(hackathon).await {
            Ok(snapshot) => {
                let json = serde_json::to_string_pretty(&snapshot)?;
                tokio::fs::write(&output_path, json)
                    .await
                    .with_context(|| format!("writing {}", output_path.display()))?;
                info!(slug = %hackathon.slug, path = %output_path.display(), "saved hackathon snapshot");
            }
            Err(err) => {
                warn!(slug = %hackathon.slug, error = %err, "hackathon aggregation failed");
            }
        }
    }

    write_summary(&config)?;
    Ok(())
}

#[derive(Serialize)]
struct SummaryHackathon<'a> {
    slug: &'a str,
    name: &'a str,
    #[serde(rename = "startTime")]
    start_time: chrono::DateTime<Utc>,
    #[serde(rename = "endTime")]
    end_time: chrono::DateTime<Utc>,
}

#[derive(Serialize)]
struct Summary<'a> {
    #[serde(rename = "lastUpdated")]
    last_updated: chrono::DateTime<Utc>,
    repositories: usize,
    #[serde(rename = "hackathonName")]
    hackathon_name: &'a str,
    #[serde(rename = "startTime")]
    start_time: Option<chrono::DateTime<Utc>>,
    #[serde(rename = "endTime")]
    end_time: Option<chrono::DateTime<Utc>>,
    hackathons: Vec<SummaryHackathon<'a>>,
}

fn write_summary(config: &AppConfig) -> Result<()> {
    let mut repos: Vec<&str> = config
        .hackathons
        .iter()
        .flat_map(|hackathon| hackathon.repositories.iter().map(String::as_str))
        .collect();
    repos.sort_unstable();
    repos.dedup();

    // The first configured hackathon is the primary one surfaced at the
    // top level of the summary.
    let primary = config.hackathons.first();
    let summary = Summary {
        last_updated: Utc::now(),
        repositories: repos.len(),
        hackathon_name: primary.map(|hackathon| hackathon.name.as_str()).unwrap_or(""),
        start_time: primary.map(|hackathon| hackathon.start_time),
        end_time: primary.map(|hackathon| hackathon.end_time),
        hackathons: config
            .hackathons
            .iter()
            .map(|hackathon| SummaryHackathon {
                slug: &hackathon.slug,
                name: &hackathon.name,
                start_time: hackathon.start_time,
                end_time: hackathon.end_time,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&summary)?;
    std::fs::write("stats.json", json).context("writing stats.json")?;
    info!("updated stats.json");
    Ok(())
}
