// src/bin/seed_locations.rs
// DOCUMENTATION: Seeds the state / city / area hierarchy through the running API
// PURPOSE: Reads a JSON tree and creates whatever is missing, using the admin token

use anyhow::{anyhow, bail, Context, Result};
use dotenv::dotenv;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colours ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

const DEFAULT_SEED_FILE: &str = "data/locations.json";

// --- Seed file ---

#[derive(Debug, Deserialize)]
struct StateSeed {
    name: String,
    #[serde(default)]
    cities: Vec<CitySeed>,
}

#[derive(Debug, Deserialize)]
struct CitySeed {
    name: String,
    #[serde(default)]
    areas: Vec<String>,
}

// --- API payloads ---

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct NamedRecord {
    id: String,
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewState<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewCity<'a> {
    name: &'a str,
    state_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewArea<'a> {
    name: &'a str,
    city_id: &'a str,
}

#[derive(Debug, Default)]
struct Tally {
    created: u32,
    existing: u32,
    failed: u32,
}

#[derive(Debug, Default)]
struct SeedSummary {
    states: Tally,
    cities: Tally,
    areas: Tally,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn index_by_name(records: Vec<NamedRecord>) -> HashMap<String, String> {
    records
        .into_iter()
        .map(|r| (name_key(&r.name), r.id))
        .collect()
}

// --- Seeder ---

struct LocationSeeder {
    base_url: String,
    admin_token: String,
    client: Client,
    summary: SeedSummary,
}

impl LocationSeeder {
    fn new(base_url: String, admin_token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_token,
            client,
            summary: SeedSummary::default(),
        })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn get_list(&self, path: &str) -> Result<Vec<NamedRecord>> {
        let response = self
            .client
            .get(format!("{}/api{}", self.base_url, path))
            .send()
            .await?;
        let envelope: Envelope<Vec<NamedRecord>> = Self::parse(response).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<NamedRecord> {
        let response = self
            .client
            .post(format!("{}/api{}", self.base_url, path))
            .header("X-Admin-Token", &self.admin_token)
            .json(body)
            .send()
            .await?;
        let envelope: Envelope<NamedRecord> = Self::parse(response).await?;
        envelope
            .data
            .ok_or_else(|| anyhow!("Response for {} carried no data", path))
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .context("Failed to parse response JSON");
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
            bail!("HTTP {} - check ADMIN_TOKEN ({})", status, body);
        }
        bail!("HTTP {} - {}", status, body)
    }

    /// Existing id for `name`, or the id of a freshly created record
    async fn ensure<B: Serialize>(
        &self,
        existing: &HashMap<String, String>,
        name: &str,
        path: &str,
        body: &B,
    ) -> Result<(String, bool)> {
        if let Some(id) = existing.get(&name_key(name)) {
            return Ok((id.clone(), false));
        }
        let record = self.post(path, body).await?;
        Ok((record.id, true))
    }

    fn record(tally: &mut Tally, label: &str, name: &str, outcome: &Result<(String, bool)>, depth: usize) {
        let indent = "  ".repeat(depth);
        match outcome {
            Ok((_, true)) => {
                tally.created += 1;
                println!("{}{}✅ {} {} created{}", indent, GREEN, label, name, RESET);
            }
            Ok((_, false)) => {
                tally.existing += 1;
                println!("{}{}• {} {} already present{}", indent, YELLOW, label, name, RESET);
            }
            Err(e) => {
                tally.failed += 1;
                println!("{}{}❌ {} {}: {}{}", indent, RED, label, name, e, RESET);
            }
        }
    }

    async fn seed(&mut self, states: &[StateSeed]) -> Result<()> {
        let known_states = index_by_name(self.get_list("/states").await?);

        for (i, state) in states.iter().enumerate() {
            println!(
                "\n{}[{}/{}] {}{}",
                CYAN,
                i + 1,
                states.len(),
                state.name,
                RESET
            );
            let outcome = self
                .ensure(&known_states, &state.name, "/state", &NewState { name: &state.name })
                .await;
            Self::record(&mut self.summary.states, "State", &state.name, &outcome, 1);
            let Ok((state_id, _)) = outcome else { continue };

            let known_cities = index_by_name(self.get_list(&format!("/cities/{}", state_id)).await?);
            for city in &state.cities {
                let outcome = self
                    .ensure(
                        &known_cities,
                        &city.name,
                        "/city",
                        &NewCity { name: &city.name, state_id: &state_id },
                    )
                    .await;
                Self::record(&mut self.summary.cities, "City", &city.name, &outcome, 2);
                let Ok((city_id, _)) = outcome else { continue };

                let known_areas = index_by_name(self.get_list(&format!("/areas/{}", city_id)).await?);
                for area in &city.areas {
                    let outcome = self
                        .ensure(
                            &known_areas,
                            area,
                            "/area",
                            &NewArea { name: area, city_id: &city_id },
                        )
                        .await;
                    Self::record(&mut self.summary.areas, "Area", area, &outcome, 3);
                }
            }
        }
        Ok(())
    }

    fn print_header(&self, seed_file: &str, state_count: usize) {
        println!("{}╔══════════════════════════════════════════════════════════════╗{}", CYAN, RESET);
        println!("{}║   🗺️  Location Seeder - states, cities and areas              ║{}", CYAN, RESET);
        println!("{}╚══════════════════════════════════════════════════════════════╝{}", CYAN, RESET);
        println!("\n{}📄 Seed file: {}{}", BOLD, seed_file, RESET);
        println!("{}📊 States in file: {}{}", BOLD, state_count, RESET);
    }

    fn print_summary(&self, elapsed: Duration) {
        println!("\n\n{}📋 Seeding Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────────────────");
        println!("{:<12} {:>10} {:>10} {:>10}", "Level", "Created", "Existing", "Failed");
        println!("──────────────────────────────────────────────────────");
        for (label, tally) in [
            ("States", &self.summary.states),
            ("Cities", &self.summary.cities),
            ("Areas", &self.summary.areas),
        ] {
            println!(
                "{:<12} {}{:>10}{} {}{:>10}{} {}{:>10}{}",
                label,
                GREEN, tally.created, RESET,
                YELLOW, tally.existing, RESET,
                RED, tally.failed, RESET
            );
        }
        println!("──────────────────────────────────────────────────────");
        println!(
            "{}⏱  Total Duration: {:.1}s{}",
            BLUE,
            elapsed.as_secs_f64(),
            RESET
        );
    }

    fn failures(&self) -> u32 {
        self.summary.states.failed + self.summary.cities.failed + self.summary.areas.failed
    }
}

fn load_seed_file(path: &str) -> Result<Vec<StateSeed>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a valid location tree", path))
}

async fn run() -> Result<u32> {
    dotenv().ok();

    let admin_token = env::var("ADMIN_TOKEN").context("ADMIN_TOKEN must be set in .env")?;
    let base_url = env::var("HOROO_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    let seed_file = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SEED_FILE.to_string());

    let states = load_seed_file(&seed_file)?;
    let mut seeder = LocationSeeder::new(base_url, admin_token)?;

    println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
    if !seeder.check_service_health().await {
        bail!("Service unavailable at {}", seeder.base_url);
    }
    println!("{}✅ Service available{}\n", GREEN, RESET);

    seeder.print_header(&seed_file, states.len());
    let started = Instant::now();
    seeder.seed(&states).await?;
    seeder.print_summary(started.elapsed());

    Ok(seeder.failures())
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(0) => println!("\n{}✨ Seeding completed{}", GREEN, RESET),
        Ok(failed) => {
            println!("\n{}⚠️  Seeding finished with {} failures{}", YELLOW, failed, RESET);
            process::exit(2);
        }
        Err(e) => {
            println!("{}❌ {:#}{}", RED, e, RESET);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_tree_parses_with_optional_children() {
        let raw = r#"[
            {"name": "Madhya Pradesh", "cities": [
                {"name": "Jabalpur", "areas": ["Napier Town", "Wright Town"]},
                {"name": "Bhopal"}
            ]},
            {"name": "Goa"}
        ]"#;
        let states: Vec<StateSeed> = serde_json::from_str(raw).unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].cities[0].areas.len(), 2);
        assert!(states[0].cities[1].areas.is_empty());
        assert!(states[1].cities.is_empty());
    }

    #[test]
    fn test_existing_records_match_case_insensitively() {
        let index = index_by_name(vec![NamedRecord {
            id: "abc".to_string(),
            name: "Jabalpur ".to_string(),
        }]);
        assert_eq!(index.get(&name_key("jabalpur")), Some(&"abc".to_string()));
    }

    #[test]
    fn test_city_payload_uses_camel_case() {
        let body = serde_json::to_value(NewCity { name: "Jabalpur", state_id: "s1" }).unwrap();
        assert_eq!(body["stateId"], "s1");
    }
}
