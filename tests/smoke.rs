use std::time::{SystemTime, UNIX_EPOCH};
use voxelwild::{GameConfig, HeadlessConfig};
use voxelwild_testkit::{read_jsonl, RunResult};

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("voxelwild_{name}_{nanos}"))
}

#[test]
fn headless_run_writes_events_and_report() {
    let dir = scratch_dir("smoke");
    let events = dir.join("events.jsonl");
    let report_path = dir.join("report.json");

    let mut cfg = HeadlessConfig::new(GameConfig::default());
    cfg.run_name = "smoke".to_string();
    cfg.seconds = Some(5.0);
    cfg.events = Some(events.clone());
    cfg.report = Some(report_path.clone());

    let report = voxelwild::run(cfg).expect("headless run");
    assert_eq!(report.run_name, "smoke");
    assert_eq!(report.result, RunResult::Completed);
    assert_eq!(report.execution.steps, 100);

    let lines = read_jsonl(&events).expect("events readable");
    assert_eq!(lines.len(), report.execution.events);
    assert!(lines
        .iter()
        .any(|line| line["kind"] == "inventory_changed" && line["tick"] == 0));
    assert!(lines
        .iter()
        .all(|line| line["payload"]["kind"] == line["kind"]));

    let written = std::fs::read_to_string(&report_path).expect("report written");
    assert!(written.contains("\"result\": \"completed\""));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn same_seed_same_run() {
    let run = || {
        let mut game = GameConfig::default();
        game.world.seed = 42;
        let mut cfg = HeadlessConfig::new(game);
        cfg.seconds = Some(20.0);
        voxelwild::run(cfg).expect("headless run")
    };
    let (a, b) = (run(), run());
    assert_eq!(a.creatures, b.creatures);
    assert_eq!(a.player, b.player);
    assert_eq!(a.terrain, b.terrain);
}
