// Leaderboard REST client
// GET /scores?limit=N and POST /scores on the shared score service

use std::fmt;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const MAX_NAME_LEN: usize = 32;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Score for a finished match: goals by the better side, plus time played
pub fn compute_match_score(player1: u32, player2: u32, duration_secs: u32, remaining_secs: u32) -> i64 {
    let goals = player1.max(player2) as i64;
    let played = duration_secs.saturating_sub(remaining_secs) as i64;
    goals * 100 + played * 5
}

/// Services disagree on whether ids are numbers or strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub id: EntryId,
    pub player_name: String,
    pub score: i64,
    #[serde(default)]
    pub time_in_seconds: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScore {
    pub player_name: String,
    pub score: i64,
    pub time_in_seconds: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    EmptyName,
    NameTooLong(usize),
    InvalidScore,
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::EmptyName => write!(f, "Player name is required"),
            ScoreError::NameTooLong(len) => {
                write!(f, "Player name is {} characters, max is {}", len, MAX_NAME_LEN)
            }
            ScoreError::InvalidScore => write!(f, "Score must be a non-negative number"),
        }
    }
}

impl std::error::Error for ScoreError {}

/// Checked before anything is sent
pub fn validate_submission(name: &str, score: f64, time_in_seconds: u32) -> Result<NewScore, ScoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ScoreError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ScoreError::NameTooLong(len));
    }
    if !score.is_finite() || score < 0.0 {
        return Err(ScoreError::InvalidScore);
    }

    Ok(NewScore {
        player_name: name.to_string(),
        score: score.round() as i64,
        time_in_seconds,
    })
}

pub struct LeaderboardClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl LeaderboardClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Highest scores first
    pub fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreEntry>> {
        let url = format!("{}/scores", self.base_url);
        let mut entries: Vec<ScoreEntry> = self
            .http
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()?
            .json()
            .context("Leaderboard returned malformed scores")?;

        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }

    pub fn submit(&self, score: &NewScore) -> Result<ScoreEntry> {
        let url = format!("{}/scores", self.base_url);
        let entry = self
            .http
            .post(&url)
            .json(score)
            .send()
            .with_context(|| format!("POST {} failed", url))?
            .error_for_status()?
            .json()
            .context("Leaderboard returned a malformed entry")?;

        info!("Submitted score {} for {}", score.score, score.player_name);
        Ok(entry)
    }
}

/// Submit off the game thread. The receiver yields one result, already
/// phrased for the player.
pub fn submit_in_background(base_url: String, score: NewScore) -> mpsc::Receiver<Result<String, String>> {
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("score-submit".to_string())
        .spawn({
            let tx = tx.clone();
            move || {
                let outcome = LeaderboardClient::new(&base_url)
                    .and_then(|client| client.submit(&score))
                    .map(|entry| format!("Score saved: {} pts", entry.score))
                    .map_err(|e| {
                        warn!("Score submission failed: {:#}", e);
                        "Failed to save score".to_string()
                    });
                let _ = tx.send(outcome);
            }
        });

    if let Err(e) = spawned {
        warn!("Failed to spawn score submission: {}", e);
        let _ = tx.send(Err("Failed to save score".to_string()));
    }

    rx
}

/// Fetch off the UI thread; the receiver yields one result
pub fn fetch_in_background(base_url: String, limit: usize) -> mpsc::Receiver<Result<Vec<ScoreEntry>, String>> {
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("score-fetch".to_string())
        .spawn({
            let tx = tx.clone();
            move || {
                let outcome = LeaderboardClient::new(&base_url)
                    .and_then(|client| client.fetch_top(limit))
                    .map_err(|e| {
                        warn!("Leaderboard fetch failed: {:#}", e);
                        e.to_string()
                    });
                let _ = tx.send(outcome);
            }
        });

    if let Err(e) = spawned {
        let _ = tx.send(Err(e.to_string()));
    }

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{Json, Router};

    #[test]
    fn test_match_score_formula() {
        assert_eq!(compute_match_score(3, 1, 90, 0), 300 + 450);
        assert_eq!(compute_match_score(0, 2, 90, 60), 200 + 150);
        assert_eq!(compute_match_score(0, 0, 90, 90), 0);
    }

    #[test]
    fn test_validation() {
        assert_eq!(validate_submission("   ", 10.0, 5), Err(ScoreError::EmptyName));
        assert_eq!(
            validate_submission(&"x".repeat(40), 10.0, 5),
            Err(ScoreError::NameTooLong(40))
        );
        assert_eq!(validate_submission("Ana", -1.0, 5), Err(ScoreError::InvalidScore));
        assert_eq!(validate_submission("Ana", f64::NAN, 5), Err(ScoreError::InvalidScore));

        let ok = validate_submission("  Ana ", 750.0, 90).unwrap();
        assert_eq!(ok.player_name, "Ana");
        assert_eq!(ok.score, 750);
    }

    #[test]
    fn test_entries_accept_both_id_styles() {
        let json = r#"[
            {"id": 4, "playerName": "a", "score": 10, "createdAt": "2024-01-01"},
            {"id": "f3c1", "playerName": "b", "score": 20, "timeInSeconds": 90}
        ]"#;
        let entries: Vec<ScoreEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries[0].id, EntryId::Number(4));
        assert_eq!(entries[1].id, EntryId::Text("f3c1".to_string()));
        assert_eq!(entries[1].time_in_seconds, Some(90));
        assert_eq!(entries[1].created_at, None);
    }

    fn fake_service() -> (tokio::runtime::Runtime, String) {
        async fn list() -> Json<serde_json::Value> {
            Json(serde_json::json!([
                {"id": 1, "playerName": "low", "score": 100},
                {"id": 2, "playerName": "high", "score": 900},
                {"id": 3, "playerName": "mid", "score": 500}
            ]))
        }

        async fn create(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
            let mut entry = body;
            entry["id"] = serde_json::json!("new-id");
            Json(entry)
        }

        let rt = tokio::runtime::Runtime::new().unwrap();
        let listener = rt
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/scores", get(list).post(create));
        rt.spawn(async move { axum::serve(listener, app).await });

        (rt, format!("http://{}/", addr))
    }

    #[test]
    fn test_fetch_top_sorts_descending() {
        let (_rt, base_url) = fake_service();
        let client = LeaderboardClient::new(&base_url).unwrap();

        let top = client.fetch_top(2).unwrap();
        let names: Vec<&str> = top.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid"]);

        let rx = fetch_in_background(base_url, 3);
        let all = rx.recv_timeout(Duration::from_secs(10)).unwrap().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].score, 900);
    }

    #[test]
    fn test_background_submit_reports_outcome() {
        let (_rt, base_url) = fake_service();
        let score = validate_submission("Ana", 350.0, 90).unwrap();

        let rx = submit_in_background(base_url, score.clone());
        let outcome = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(outcome, Ok("Score saved: 350 pts".to_string()));

        // nothing listening on port 9
        let rx = submit_in_background("http://127.0.0.1:9".to_string(), score);
        let outcome = rx.recv_timeout(Duration::from_secs(15)).unwrap();
        assert_eq!(outcome, Err("Failed to save score".to_string()));
    }
}
