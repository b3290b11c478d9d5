//! Fixed-step headless runs with an optional autopilot, event stream and run report.

use crate::config::GameConfig;
use crate::session::{Session, SessionError};
use anyhow::Result;
use glam::{IVec3, Vec3};
use std::path::PathBuf;
use tracing::{debug, info};
use voxelwild_core::ItemKind;
use voxelwild_physics::BlockGrid;
use voxelwild_testkit::{
    CreatureSummary, EventRecord, ExecutionSummary, JsonlSink, PlayerSummary, ReportSink,
    RunReport, RunReportBuilder, RunResult, TerrainSummary,
};
use voxelwild_ui::{DropOutcome, SlotRef, TransferMode, MIRRORED_SLOTS};

/// Foods the autopilot eats, in order of preference.
const FOODS: [ItemKind; 2] = [ItemKind::Beef, ItemKind::Pork];

pub struct HeadlessConfig {
    pub game: GameConfig,
    pub run_name: String,
    /// Overrides the configured run length.
    pub seconds: Option<f32>,
    /// JSONL destination for session events.
    pub events: Option<PathBuf>,
    /// JSON destination for the run report.
    pub report: Option<PathBuf>,
}

impl HeadlessConfig {
    pub fn new(game: GameConfig) -> Self {
        Self {
            game,
            run_name: "headless".to_string(),
            seconds: None,
            events: None,
            report: None,
        }
    }
}

pub fn run(cfg: HeadlessConfig) -> Result<RunReport> {
    let dt = cfg.game.step();
    let seconds = cfg.seconds.unwrap_or(cfg.game.session.seconds).max(0.0);
    let steps = (seconds / dt).ceil() as u64;
    let seed = cfg.game.world.seed;
    let autopilot = cfg.game.session.autopilot;

    let mut session = Session::new(cfg.game)?;
    let mut sink = cfg.events.as_ref().map(JsonlSink::create).transpose()?;
    let mut pilot = autopilot.then(Autopilot::default);

    info!(steps, dt, autopilot, "Starting headless run");

    let mut events = record_events(&mut session, sink.as_mut())?;
    let mut taken = 0;
    let mut result = RunResult::Completed;
    for _ in 0..steps {
        if let Some(pilot) = pilot.as_mut() {
            pilot.act(&mut session);
        }
        session.tick(dt);
        taken += 1;
        events += record_events(&mut session, sink.as_mut())?;

        if session.player().is_dead() {
            result = RunResult::PlayerDied;
            break;
        }
    }
    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }

    let report = build_report(&cfg.run_name, seed, result, &session, taken, dt, events);
    if let Some(path) = &cfg.report {
        ReportSink::create(path)?.write(&report)?;
    }
    info!(steps = taken, ?result, events, "Headless run finished");
    Ok(report)
}

fn record_events(session: &mut Session, sink: Option<&mut JsonlSink>) -> Result<usize> {
    let tick = session.tick_count();
    let events = session.drain_events();
    let count = events.len();
    if let Some(sink) = sink {
        for event in &events {
            sink.write(&EventRecord {
                tick,
                kind: event.label(),
                payload: serde_json::to_value(event)?,
            })?;
        }
    }
    Ok(count)
}

fn build_report(
    run_name: &str,
    seed: u64,
    result: RunResult,
    session: &Session,
    steps: u64,
    dt: f32,
    events: usize,
) -> RunReport {
    let terrain = session.terrain();
    let stats = session.stats();
    let player = session.player();
    RunReportBuilder::new(run_name, seed)
        .result(result)
        .terrain(TerrainSummary {
            blocks: terrain.len(),
            trees: terrain.trees().len(),
            diamonds: terrain.count(ItemKind::Diamond),
        })
        .creatures(CreatureSummary {
            spawned: stats.spawned.clone(),
            killed: stats.killed.clone(),
            alive_at_end: session.creatures().count(),
            arrows_fired: stats.arrows_fired,
        })
        .player(PlayerSummary {
            hp: player.hp(),
            damage_taken: stats.damage_taken,
            crafted: session.screen().crafted(),
            kinds_held: session.inventory().kinds(),
        })
        .execution(ExecutionSummary {
            simulated_seconds: steps as f64 * dt as f64,
            steps,
            events,
        })
        .build()
}

/// Scripted player: crafts planks once, eats when hurt, chases and swings at the
/// nearest creature and digs into the block ahead when nothing is around.
#[derive(Debug, Default)]
struct Autopilot {
    crafted: bool,
}

impl Autopilot {
    fn act(&mut self, session: &mut Session) {
        if session.player().is_dead() {
            return;
        }
        if !self.crafted {
            self.crafted = true;
            match craft_planks(session) {
                Some(count) => info!(count, "Autopilot crafted planks"),
                None => debug!("Autopilot could not craft planks"),
            }
        }

        let player = session.player();
        if !player.is_eating() && player.hp() * 2 <= player.max_hp() {
            if let Some(food) = FOODS.into_iter().find(|kind| session.inventory().has(*kind, 1)) {
                if let Err(err) = session.eat(food) {
                    debug!(%err, "Autopilot could not eat");
                }
            }
        }

        let reach = session.config().session.attack_reach;
        match session.nearest_creature() {
            Some((id, distance)) if distance <= reach => {
                session.walk_player(Vec3::ZERO);
                match session.attack_creature(id) {
                    Ok(_) | Err(SessionError::OnCooldown { .. } | SessionError::Eating) => {}
                    Err(err) => debug!(%err, "Autopilot attack refused"),
                }
            }
            Some((id, _)) => {
                let target = session.creature(id).map(|creature| creature.position());
                if let Some(target) = target {
                    session.walk_player(target - session.player().position);
                }
            }
            None => {
                session.walk_player(Vec3::ZERO);
                dig_ahead(session);
            }
        }
    }
}

/// Hit the first breakable block ahead of the player, or the one underfoot.
fn dig_ahead(session: &mut Session) {
    let feet = BlockGrid::cell_of(session.player().position);
    let Some(cell) = [feet + IVec3::X, feet + IVec3::X - IVec3::Y, feet - IVec3::Y]
        .into_iter()
        .find(|cell| {
            session
                .terrain()
                .get(*cell)
                .is_some_and(|block| block.hardness().is_some())
        })
    else {
        return;
    };
    match session.harvest_block(cell) {
        Ok(Some(item)) => debug!(item = item.as_str(), "Autopilot harvested a block"),
        Ok(None) | Err(SessionError::OnCooldown { .. } | SessionError::Eating) => {}
        Err(err) => debug!(%err, "Autopilot dig refused"),
    }
}

/// Drag one wood into the centre cell and claim the planks.
fn craft_planks(session: &mut Session) -> Option<u32> {
    let wood = (0..MIRRORED_SLOTS)
        .filter_map(SlotRef::from_mirrored_index)
        .find(|slot| {
            session
                .screen()
                .slot(*slot)
                .is_some_and(|stack| stack.kind == ItemKind::Wood)
        })?;

    if !session.screen().is_panel_open() {
        session.toggle_panel();
    }
    let crafted = place_and_claim(session, wood);
    session.toggle_panel();
    crafted
}

fn place_and_claim(session: &mut Session, wood: SlotRef) -> Option<u32> {
    session.pointer_down(wood).ok()?;
    let placed = session.pointer_up(Some(SlotRef::Craft(4)), TransferMode::One);
    if session.screen().is_dragging() {
        session.pointer_up(None, TransferMode::All);
    }
    if !matches!(placed, DropOutcome::Placed { .. }) {
        return None;
    }

    let result = session.screen().pending_result()?;
    session.pointer_down(SlotRef::CraftResult).ok()?;
    session.pointer_up(None, TransferMode::All);
    Some(result.count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionEvent;
    use voxelwild_world::TerrainConfig;

    fn quick() -> GameConfig {
        let mut game = GameConfig::default();
        game.world.terrain = TerrainConfig {
            width: 10,
            depth: 10,
            ..TerrainConfig::default()
        };
        game.animal_spawner.bounds_max = [10, 10];
        game.monster_spawner.bounds_max = [10, 10];
        game
    }

    #[test]
    fn autopilot_crafts_planks_on_the_first_step() {
        let mut cfg = HeadlessConfig::new(quick());
        cfg.seconds = Some(0.05);
        let report = run(cfg).expect("run");
        assert_eq!(report.player.as_ref().map(|p| p.crafted), Some(1));
        assert_eq!(report.execution.steps, 1);
        assert_eq!(report.result, RunResult::Completed);
    }

    #[test]
    fn zero_seconds_runs_no_steps() {
        let mut cfg = HeadlessConfig::new(quick());
        cfg.seconds = Some(0.0);
        cfg.game.session.autopilot = false;
        let report = run(cfg).expect("run");
        assert_eq!(report.execution.steps, 0);
        assert_eq!(report.player.as_ref().map(|p| p.crafted), Some(0));
    }

    #[test]
    fn autopilot_digs_when_nothing_is_around() {
        let mut game = quick();
        game.animal_spawner.spawn_chance = 0.0;
        game.monster_spawner.spawn_chance = 0.0;
        let mut session = Session::new(game).expect("session");
        let mut pilot = Autopilot::default();
        for _ in 0..200 {
            pilot.act(&mut session);
            session.tick(0.05);
        }
        assert!(session.stats().blocks_harvested > 0);
        assert!(session
            .drain_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::BlockHarvested { .. })));
    }
}
