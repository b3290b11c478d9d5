//! Run reports exported by headless sessions.
//!
//! A report summarises one run: world setup, creature population churn,
//! player vitals and inventory activity. Reports are written as pretty JSON
//! so CI can diff them between seeds or builds.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run label.
    pub run_name: String,

    /// Timestamp when the report was built (RFC 3339).
    pub timestamp: String,

    /// World seed used.
    pub seed: u64,

    /// Overall outcome.
    pub result: RunResult,

    /// Terrain summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrain: Option<TerrainSummary>,

    /// Creature population summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creatures: Option<CreatureSummary>,

    /// Player summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerSummary>,

    /// Simulated time and steps.
    pub execution: ExecutionSummary,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunResult {
    /// Ran for the requested duration.
    Completed,
    /// Stopped early because the player died.
    PlayerDied,
}

/// Generated terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainSummary {
    /// Blocks placed.
    pub blocks: usize,
    /// Trees grown.
    pub trees: usize,
    /// Diamond blocks buried.
    pub diamonds: usize,
}

/// Creature churn over the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatureSummary {
    /// Spawned, by species name.
    pub spawned: BTreeMap<String, usize>,
    /// Killed, by species name.
    pub killed: BTreeMap<String, usize>,
    /// Alive when the run ended.
    pub alive_at_end: usize,
    /// Arrows loosed by ranged creatures.
    pub arrows_fired: usize,
}

/// Player state at the end of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    /// Remaining hit points.
    pub hp: u32,
    /// Total damage taken.
    pub damage_taken: u32,
    /// Items crafted.
    pub crafted: usize,
    /// Distinct item kinds held at the end.
    pub kinds_held: usize,
}

/// Execution totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// Simulated seconds.
    pub simulated_seconds: f64,
    /// Fixed steps executed.
    pub steps: u64,
    /// Events emitted.
    pub events: usize,
}

/// Builder for run reports.
pub struct RunReportBuilder {
    report: RunReport,
}

impl RunReportBuilder {
    /// Start a report for `run_name` on `seed`.
    pub fn new(run_name: impl Into<String>, seed: u64) -> Self {
        Self {
            report: RunReport {
                run_name: run_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                seed,
                result: RunResult::Completed,
                terrain: None,
                creatures: None,
                player: None,
                execution: ExecutionSummary::default(),
            },
        }
    }

    /// Set the outcome.
    pub fn result(mut self, result: RunResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set the terrain summary.
    pub fn terrain(mut self, summary: TerrainSummary) -> Self {
        self.report.terrain = Some(summary);
        self
    }

    /// Set the creature summary.
    pub fn creatures(mut self, summary: CreatureSummary) -> Self {
        self.report.creatures = Some(summary);
        self
    }

    /// Set the player summary.
    pub fn player(mut self, summary: PlayerSummary) -> Self {
        self.report.player = Some(summary);
        self
    }

    /// Set execution totals.
    pub fn execution(mut self, summary: ExecutionSummary) -> Self {
        self.report.execution = summary;
        self
    }

    /// Finish the report.
    pub fn build(self) -> RunReport {
        self.report
    }
}

/// Writes run reports as pretty JSON.
pub struct ReportSink {
    path: PathBuf,
}

impl ReportSink {
    /// Create a sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Ok(Self { path })
    }

    /// Write `report`, replacing any previous file.
    pub fn write(&self, report: &RunReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write report {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn run_report_roundtrip() {
        let mut creatures = CreatureSummary::default();
        creatures.spawned.insert("cow".into(), 3);
        creatures.killed.insert("cow".into(), 1);
        creatures.alive_at_end = 2;

        let report = RunReportBuilder::new("smoke", 42)
            .creatures(creatures)
            .player(PlayerSummary {
                hp: 18,
                damage_taken: 2,
                crafted: 1,
                kinds_held: 3,
            })
            .execution(ExecutionSummary {
                simulated_seconds: 5.0,
                steps: 100,
                events: 7,
            })
            .build();

        let json = serde_json::to_string(&report).expect("serializes");
        assert!(!json.contains("terrain"));
        let back: RunReport = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, report);
    }

    #[test]
    fn report_sink_writes_pretty_json() {
        let dir = std::env::temp_dir().join(format!(
            "voxelwild-report-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let path = dir.join("run.json");
        let sink = ReportSink::create(&path).expect("sink");
        sink.write(
            &RunReportBuilder::new("early-death", 1)
                .result(RunResult::PlayerDied)
                .build(),
        )
        .expect("write");

        let text = fs::read_to_string(&path).expect("readable");
        assert!(text.contains("\"result\": \"player_died\""));
        let _ = fs::remove_dir_all(&dir);
    }
}
