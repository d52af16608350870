//! Best-distance leaderboard
//!
//! Persisted to LocalStorage, one entry per username, top 20 distances.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of entries to keep
pub const MAX_HIGH_SCORES: usize = 20;
/// Longest accepted username (characters)
pub const MAX_USERNAME_LEN: usize = 20;

/// Why a score was not recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Username blank after trimming
    UsernameRequired,
    /// Username longer than [`MAX_USERNAME_LEN`]
    UsernameTooLong,
    /// The player already holds an equal or better distance
    NotImproved { best: u64 },
    /// Not good enough for a full table
    DoesNotQualify,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::UsernameRequired => {
                write!(f, "please enter a username to submit your score")
            }
            SubmitError::UsernameTooLong => {
                write!(f, "usernames are limited to {MAX_USERNAME_LEN} characters")
            }
            SubmitError::NotImproved { best } => {
                write!(f, "your best score is {best}m, beat it to update the leaderboard")
            }
            SubmitError::DoesNotQualify => write!(f, "score is below the leaderboard cut-off"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub username: String,
    /// Defaults to the username when none was given
    pub wallet_address: String,
    /// Distance in metres
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Summary line under the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardStats {
    pub best: u64,
    pub players: usize,
    /// Rounded mean distance
    pub average: u64,
}

/// Best-distance leaderboard, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_drift_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Best recorded distance for a username
    pub fn best_for(&self, username: &str) -> Option<u64> {
        let username = username.trim();
        self.entries
            .iter()
            .find(|e| e.username == username)
            .map(|e| e.score)
    }

    /// Check if a score would make the table (ignoring per-player bests)
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a run, replacing the player's previous entry
    ///
    /// Returns the rank achieved (1-indexed).
    pub fn submit(
        &mut self,
        username: &str,
        wallet_address: &str,
        score: u64,
        timestamp: f64,
    ) -> Result<usize, SubmitError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(SubmitError::UsernameRequired);
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(SubmitError::UsernameTooLong);
        }

        let existing = self.entries.iter().position(|e| e.username == username);
        match existing {
            Some(i) if self.entries[i].score >= score => {
                return Err(SubmitError::NotImproved {
                    best: self.entries[i].score,
                });
            }
            Some(i) => {
                self.entries.remove(i);
            }
            None if !self.qualifies(score) => return Err(SubmitError::DoesNotQualify),
            None => {}
        }

        let wallet_address = match wallet_address.trim() {
            "" => username,
            wallet => wallet,
        };
        let entry = HighScoreEntry {
            username: username.to_owned(),
            wallet_address: wallet_address.to_owned(),
            score,
            timestamp,
        };

        // Ties keep the earlier entry ahead
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("{} recorded {}m at rank {}", username, score, rank);

        Ok(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best, player count and mean distance (None when empty)
    pub fn stats(&self) -> Option<LeaderboardStats> {
        let best = self.top_score()?;
        let players = self.entries.len();
        let total: u64 = self.entries.iter().map(|e| e.score).sum();
        let average = (total as f64 / players as f64).round() as u64;
        Some(LeaderboardStats {
            best,
            players,
            average,
        })
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HighScores>(&json) {
                    Ok(scores) => {
                        log::info!("Loaded {} high scores", scores.entries.len());
                        return scores;
                    }
                    Err(e) => log::warn!("Discarding unreadable high scores: {}", e),
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("LocalStorage rejected high scores");
                    } else {
                        log::info!("High scores saved ({} entries)", self.entries.len());
                    }
                }
                Err(e) => log::warn!("Could not encode high scores: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Shorten `0x` wallet addresses to `0x1234...abcd`
pub fn format_wallet_address(address: &str) -> String {
    if address.starts_with("0x") && address.len() > 10 && address.is_ascii() {
        format!("{}...{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_owned()
    }
}

/// How long ago `timestamp` was, relative to `now` (both Unix ms)
pub fn format_age(timestamp: f64, now: f64) -> String {
    let minutes = ((now - timestamp) / 60_000.0).max(0.0).floor() as u64;
    let hours = minutes / 60;
    let days = hours / 24;

    match (days, hours, minutes) {
        (0, 0, 0) => "Just now".to_string(),
        (0, 0, 1) => "1 minute ago".to_string(),
        (0, 0, m) => format!("{} minutes ago", m),
        (0, 1, _) => "1 hour ago".to_string(),
        (0, h, _) => format!("{} hours ago", h),
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) if d < 7 => format!("{} days ago", d),
        (d, _, _) if d < 14 => "1 week ago".to_string(),
        (d, _, _) => format!("{} weeks ago", d / 7),
    }
}

/// Age of a leaderboard entry as of now
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    format_age(timestamp, js_sys::Date::now())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(timestamp: f64) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(timestamp);
    format_age(timestamp, now)
}

/// Medal for the podium, `#n` below it
pub fn rank_label(index: usize) -> String {
    match index {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        _ => format!("#{}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age() {
        const MIN: f64 = 60_000.0;
        const HOUR: f64 = 60.0 * MIN;
        const DAY: f64 = 24.0 * HOUR;
        let now = 1_700_000_000_000.0;

        assert_eq!(format_age(now - 10_000.0, now), "Just now");
        assert_eq!(format_age(now - MIN, now), "1 minute ago");
        assert_eq!(format_age(now - 45.0 * MIN, now), "45 minutes ago");
        assert_eq!(format_age(now - 90.0 * MIN, now), "1 hour ago");
        assert_eq!(format_age(now - 5.0 * HOUR, now), "5 hours ago");
        assert_eq!(format_age(now - 30.0 * HOUR, now), "Yesterday");
        assert_eq!(format_age(now - 3.0 * DAY, now), "3 days ago");
        assert_eq!(format_age(now - 10.0 * DAY, now), "1 week ago");
        assert_eq!(format_age(now - 30.0 * DAY, now), "4 weeks ago");
        // Clock skew never yields a negative age
        assert_eq!(format_age(now + HOUR, now), "Just now");
    }

    #[test]
    fn test_submitted_entry_reads_as_recent() {
        let mut scores = HighScores::new();
        let now = 1_700_000_000_000.0;
        scores.submit("ada", "", 500, now).unwrap();
        assert_eq!(format_age(scores.entries[0].timestamp, now + 2.0 * 3_600_000.0), "2 hours ago");
    }

    #[test]
    fn test_submit_ranks_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.submit("ada", "", 500, 1.0), Ok(1));
        assert_eq!(scores.submit("bob", "", 900, 2.0), Ok(1));
        assert_eq!(scores.submit("cy", "", 700, 3.0), Ok(2));

        let order: Vec<&str> = scores.entries.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(order, ["bob", "cy", "ada"]);
        assert_eq!(scores.top_score(), Some(900));
    }

    #[test]
    fn test_username_required() {
        let mut scores = HighScores::new();
        assert_eq!(scores.submit("   ", "0xabc", 10, 0.0), Err(SubmitError::UsernameRequired));
        assert_eq!(
            scores.submit(&"x".repeat(21), "", 10, 0.0),
            Err(SubmitError::UsernameTooLong)
        );
        assert!(scores.is_empty());
    }

    #[test]
    fn test_one_entry_per_player() {
        let mut scores = HighScores::new();
        scores.submit("ada", "", 500, 1.0).unwrap();

        assert_eq!(
            scores.submit("ada", "", 500, 2.0),
            Err(SubmitError::NotImproved { best: 500 })
        );
        assert_eq!(
            scores.submit(" ada ", "", 300, 2.0),
            Err(SubmitError::NotImproved { best: 500 })
        );

        assert_eq!(scores.submit("ada", "0x1", 800, 3.0), Ok(1));
        assert_eq!(scores.entries.len(), 1);
        assert_eq!(scores.best_for("ada"), Some(800));
        assert_eq!(scores.entries[0].wallet_address, "0x1");
    }

    #[test]
    fn test_wallet_defaults_to_username() {
        let mut scores = HighScores::new();
        scores.submit("  neon  ", "  ", 42, 0.0).unwrap();
        assert_eq!(scores.entries[0].username, "neon");
        assert_eq!(scores.entries[0].wallet_address, "neon");
    }

    #[test]
    fn test_table_is_capped() {
        let mut scores = HighScores::new();
        for i in 0..MAX_HIGH_SCORES as u64 {
            scores.submit(&format!("p{i}"), "", 100 + i, 0.0).unwrap();
        }
        assert_eq!(scores.submit("late", "", 50, 0.0), Err(SubmitError::DoesNotQualify));

        assert_eq!(scores.submit("late", "", 1000, 0.0), Ok(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(101));
    }

    #[test]
    fn test_stats() {
        let mut scores = HighScores::new();
        assert_eq!(scores.stats(), None);

        scores.submit("a", "", 100, 0.0).unwrap();
        scores.submit("b", "", 201, 0.0).unwrap();
        let stats = scores.stats().unwrap();
        assert_eq!(stats.best, 201);
        assert_eq!(stats.players, 2);
        // 150.5 rounds away from zero
        assert_eq!(stats.average, 151);
    }

    #[test]
    fn test_format_wallet_address() {
        assert_eq!(
            format_wallet_address("0xceCBFF203C8B6044F52CE23D914A1bfD997541A4"),
            "0xceCB...41A4"
        );
        assert_eq!(format_wallet_address("0x12345678"), "0x12345678");
        assert_eq!(format_wallet_address("driftking"), "driftking");
    }

    #[test]
    fn test_rank_label() {
        assert_eq!(rank_label(0), "🥇");
        assert_eq!(rank_label(2), "🥉");
        assert_eq!(rank_label(3), "#4");
    }

    #[test]
    fn test_error_messages() {
        let err = SubmitError::NotImproved { best: 321 };
        assert_eq!(
            err.to_string(),
            "your best score is 321m, beat it to update the leaderboard"
        );
    }
}
