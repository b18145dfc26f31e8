//! Recording simulated trial runs for offline analysis.
//!
//! # Storage Format
//!
//! Each session is a directory `<timestamp>-<experiment>/` containing:
//! - `trials.csv` — one row per trial (`trial,setting,outcome`)
//! - `session.json` — metadata written by [`SessionWriter::finish`]

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Session metadata written to session.json at the end of recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMeta {
    pub version: u32,
    pub id: String,
    pub experiment: String,
    pub seed: Option<u64>,
    pub started_at: String,
    pub ended_at: String,
    pub duration_ms: u64,
    pub total_trials: u64,
    /// Trials per outcome label.
    pub counts: BTreeMap<String, u64>,
    pub tags: HashMap<String, String>,
    pub note: Option<String>,
    pub quantumlab_version: String,
}

/// Configuration for a recording session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Experiment name, used in the directory name.
    pub experiment: String,
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
    pub tags: HashMap<String, String>,
    pub note: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            experiment: "experiment".to_string(),
            seed: None,
            output_dir: PathBuf::from("sessions"),
            tags: HashMap::new(),
            note: None,
        }
    }
}

/// Incremental writer for one session directory.
pub struct SessionWriter {
    session_dir: PathBuf,
    csv_writer: BufWriter<File>,
    total_trials: u64,
    counts: BTreeMap<String, u64>,
    started_at: SystemTime,
    started_instant: Instant,
    session_id: String,
    config: SessionConfig,
}

impl SessionWriter {
    /// Create the session directory and `trials.csv`.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let session_id = Uuid::new_v4().to_string();
        let started_at = SystemTime::now();
        let ts = started_at.duration_since(UNIX_EPOCH).unwrap_or_default();
        let dir_name = format!("{}-{}", format_iso8601_compact(ts), slug(&config.experiment));

        let session_dir = config.output_dir.join(dir_name);
        fs::create_dir_all(&session_dir)?;

        let csv_file = File::create(session_dir.join("trials.csv"))?;
        let mut csv_writer = BufWriter::new(csv_file);
        writeln!(csv_writer, "trial,setting,outcome")?;

        log::debug!("recording session {session_id} in {}", session_dir.display());

        Ok(Self {
            session_dir,
            csv_writer,
            total_trials: 0,
            counts: BTreeMap::new(),
            started_at,
            started_instant: Instant::now(),
            session_id,
            config,
        })
    }

    /// Append one trial. `setting` describes the configuration (may be empty).
    pub fn write_trial(&mut self, setting: &str, outcome: &impl std::fmt::Display) -> Result<()> {
        let label = outcome.to_string();
        writeln!(
            self.csv_writer,
            "{},{},{}",
            self.total_trials,
            csv_field(setting),
            csv_field(&label)
        )?;
        self.total_trials += 1;
        *self.counts.entry(label).or_insert(0) += 1;
        Ok(())
    }

    /// Flush the CSV and write session.json. Returns the session directory.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.csv_writer.flush()?;

        let ended_at = SystemTime::now();
        let meta = SessionMeta {
            version: 1,
            id: self.session_id,
            experiment: self.config.experiment.clone(),
            seed: self.config.seed,
            started_at: format_iso8601(
                self.started_at
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default(),
            ),
            ended_at: format_iso8601(ended_at.duration_since(UNIX_EPOCH).unwrap_or_default()),
            duration_ms: self.started_instant.elapsed().as_millis() as u64,
            total_trials: self.total_trials,
            counts: std::mem::take(&mut self.counts),
            tags: self.config.tags.clone(),
            note: self.config.note.clone(),
            quantumlab_version: crate::VERSION.to_string(),
        };

        let json = serde_json::to_string_pretty(&meta)?;
        fs::write(self.session_dir.join("session.json"), json)?;
        Ok(self.session_dir)
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    pub fn total_trials(&self) -> u64 {
        self.total_trials
    }

    pub fn elapsed(&self) -> Duration {
        self.started_instant.elapsed()
    }
}

/// Read `session.json` from a session directory.
pub fn load_session_meta(session_dir: &Path) -> Result<SessionMeta> {
    let text = fs::read_to_string(session_dir.join("session.json"))?;
    Ok(serde_json::from_str(&text)?)
}

/// Lowercase alphanumerics and dashes only.
fn slug(name: &str) -> String {
    let s: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let s = s.trim_matches('-');
    if s.is_empty() { "session".to_string() } else { s.to_string() }
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// `2026-02-15T013000Z`, for directory names.
fn format_iso8601_compact(since_epoch: Duration) -> String {
    let (y, mo, d, h, mi, s) = civil_utc(since_epoch.as_secs());
    format!("{y:04}-{mo:02}-{d:02}T{h:02}{mi:02}{s:02}Z")
}

/// `2026-02-15T01:30:00Z`.
fn format_iso8601(since_epoch: Duration) -> String {
    let (y, mo, d, h, mi, s) = civil_utc(since_epoch.as_secs());
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}Z")
}

/// Seconds since the Unix epoch to UTC calendar fields (proleptic Gregorian,
/// no leap seconds).
fn civil_utc(secs: u64) -> (i64, u32, u32, u32, u32, u32) {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (h, mi, s) = ((rem / 3600) as u32, ((rem / 60) % 60) as u32, (rem % 60) as u32);

    // Shift the epoch to 0000-03-01 so leap days fall at the end of an era-year.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let mo = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let y = yoe + era * 400 + if mo <= 2 { 1 } else { 0 };
    (y, mo, d, h, mi, s)
}
