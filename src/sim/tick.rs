//! Per-frame simulation step
//!
//! The driver owns scheduling: it derives a clamped `dt` from its clock and
//! calls [`tick`] once per frame with the input events gathered since the
//! last frame. Nothing here schedules itself.

use super::collision::{collect_coins, falling_bomb_hit, static_hazard_hit};
use super::state::{GameEvent, GamePhase, GameState, Outcome};
use crate::consts::MAX_FRAME_DT;

/// Discrete input signals, already mapped from keys/buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    LaneLeft,
    LaneRight,
    PauseToggle,
    CameraToggle,
    Start,
    Restart,
}

/// Turns monotonic millisecond timestamps into clamped frame deltas.
///
/// The clock advances on every frame, paused or not, so resuming never sees
/// the paused interval as one huge step.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous call in seconds, clamped to `[0, MAX_FRAME_DT]`.
    /// The first call returns 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_nan() {
            return 0.0;
        }
        dt.clamp(0.0, MAX_FRAME_DT)
    }
}

/// A dt outside `[0, MAX_FRAME_DT]` (or NaN) becomes 0
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if (0.0..=MAX_FRAME_DT).contains(&dt) { dt } else { 0.0 }
}

/// Apply one input event to the phase machine
fn handle_input(state: &mut GameState, event: InputEvent) {
    match (event, state.phase) {
        (InputEvent::Start, GamePhase::NotStarted) => {
            state.phase = GamePhase::Running;
            state.events.push(GameEvent::Started);
            log::info!("Run started (seed {})", state.seed);
        }
        (InputEvent::PauseToggle, GamePhase::Running) => {
            state.phase = GamePhase::Paused;
            state.events.push(GameEvent::Paused);
        }
        (InputEvent::PauseToggle, GamePhase::Paused) => {
            state.phase = GamePhase::Running;
            state.events.push(GameEvent::Resumed);
        }
        (InputEvent::Restart, GamePhase::Paused | GamePhase::GameOver | GamePhase::Victory) => {
            state.reset_run();
            state.phase = GamePhase::Running;
            state.events.push(GameEvent::Restarted);
            log::info!("Run restarted");
        }
        (InputEvent::LaneLeft, GamePhase::Running) => state.player.steer_left(),
        (InputEvent::LaneRight, GamePhase::Running) => state.player.steer_right(),
        (InputEvent::CameraToggle, GamePhase::Running) => {
            state.camera = state.camera.toggled();
            state.events.push(GameEvent::CameraChanged(state.camera));
        }
        _ => {}
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, inputs: &[InputEvent], dt: f32) {
    for &event in inputs {
        handle_input(state, event);
    }

    if state.phase != GamePhase::Running {
        return;
    }
    let dt = sanitize_dt(dt);

    update(state, dt);
}

/// Gameplay pipeline for a running, unpaused frame
fn update(state: &mut GameState, dt: f32) {
    let GameState {
        rng,
        tuning,
        player,
        world,
        ..
    } = state;

    player.ramp_speed(dt, tuning);

    // Streaming, then recentering, before the player moves
    world.ensure_streamed_ahead(player.pos.z, tuning, rng);
    world.cleanup(player.pos.z, tuning);
    if let Some(shift) = world.recenter_if_needed(player, tuning) {
        state.events.push(GameEvent::Recentered { shift });
    }

    let travelled = player.integrate(dt, tuning);
    state.distance += travelled;
    state.elapsed_secs += dt;

    if let Some(finish) = tuning.finish_distance {
        if state.distance >= finish {
            state.end_run(Outcome::Victory);
            return;
        }
    }

    // Collisions against what is on the track this frame
    let collected = collect_coins(player, &mut world.coins);
    if collected > 0 {
        state.events.push(GameEvent::CoinCollected {
            total: player.coins_collected,
        });
    }
    if let Some(kind) = static_hazard_hit(player, world) {
        log::info!("Hit {:?} at z={:.2}", kind, player.pos.z);
        state.end_run(Outcome::GameOver);
        return;
    }

    world.update_bombs(player, dt, tuning, rng);
    if let Some(kind) = falling_bomb_hit(player, world) {
        log::info!("Hit {:?} at z={:.2}", kind, player.pos.z);
        state.end_run(Outcome::GameOver);
        return;
    }

    world.animate(dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraMode;
    use crate::sim::state::Hazard;
    use crate::tuning::Tuning;
    use glam::Vec3;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(&mut state, &[InputEvent::Start], 0.0);
        assert_eq!(state.phase, GamePhase::Running);
        state
    }

    /// Empty track: no chunk spawning and no falling bombs
    fn empty_track(seed: u64) -> GameState {
        let tuning = Tuning {
            spawn_interval: 1.0e6,
            first_spawn_z: -1.0e7,
            bomb_interval: 1.0e6,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(seed, tuning).expect("valid tuning");
        tick(&mut state, &[InputEvent::Start], 0.0);
        state
    }

    #[test]
    fn test_not_started_ignores_gameplay() {
        let mut state = GameState::new(1);
        tick(&mut state, &[InputEvent::LaneLeft, InputEvent::PauseToggle], 0.05);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.player.target_lane, 1);
        assert_eq!(state.player.pos.z, -1.0);
        assert_eq!(state.world.entity_count(), 0);
    }

    #[test]
    fn test_first_tick_streams_ahead() {
        let mut state = running(1);
        tick(&mut state, &[], 0.016);
        assert!(state.world.next_spawn_z <= state.player.pos.z - 120.0 + 5.0);
        assert!(state.world.entity_count() > 0);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = running(1);
        tick(&mut state, &[InputEvent::PauseToggle], 0.05);
        assert_eq!(state.phase, GamePhase::Paused);

        let z = state.player.pos.z;
        tick(&mut state, &[], 0.05);
        assert_eq!(state.player.pos.z, z);

        tick(&mut state, &[InputEvent::PauseToggle], 0.05);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.player.pos.z < z);
    }

    #[test]
    fn test_lane_input_only_while_running() {
        let mut state = running(1);
        tick(&mut state, &[InputEvent::LaneLeft, InputEvent::LaneLeft, InputEvent::LaneLeft], 0.0);
        assert_eq!(state.player.target_lane, 0);

        tick(&mut state, &[InputEvent::PauseToggle, InputEvent::LaneRight], 0.0);
        assert_eq!(state.player.target_lane, 0);
    }

    #[test]
    fn test_camera_toggle() {
        let mut state = running(1);
        assert_eq!(state.camera, CameraMode::ThirdPerson);
        tick(&mut state, &[InputEvent::CameraToggle], 0.0);
        assert_eq!(state.camera, CameraMode::FirstPerson);
        assert!(state.events.contains(&GameEvent::CameraChanged(CameraMode::FirstPerson)));
    }

    #[test]
    fn test_fatal_obstacle_scenario() {
        let mut state = empty_track(3);
        let dt = 0.05;
        // Player ends this tick at z = -1 - 6.005 * 0.05; put the barrel 0.8 ahead
        let z_after = -1.0 - (6.0 + 0.1 * dt) * dt;
        state
            .world
            .obstacles
            .push(Hazard::obstacle(Vec3::new(0.0, 0.5, z_after - 0.8)));

        tick(&mut state, &[], dt);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.forward_speed, 0.0);

        let z = state.player.pos.z;
        tick(&mut state, &[], dt);
        state.player.advance(dt, &state.tuning.clone());
        assert_eq!(state.player.pos.z, z);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::RunEnded { outcome: Outcome::GameOver, .. })));
    }

    #[test]
    fn test_coin_pickup_in_tick() {
        let mut state = empty_track(3);
        let dt = 0.05;
        let z_after = -1.0 - (6.0 + 0.1 * dt) * dt;
        state.world.coins.push(crate::sim::state::Coin {
            pos: Vec3::new(0.0, 0.5, z_after - 0.3),
            active: true,
            rotation: 0.0,
        });

        tick(&mut state, &[], dt);
        assert_eq!(state.player.coins_collected, 1);
        assert!(!state.world.coins[0].active);
        tick(&mut state, &[], dt);
        assert_eq!(state.player.coins_collected, 1);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = empty_track(3);
        state.player.coins_collected = 9;
        state.end_run(Outcome::GameOver);

        tick(&mut state, &[InputEvent::Restart], 0.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.coins_collected, 0);
        assert_eq!(state.player.pos.z, -1.0);
        assert!(!state.player.halted);
        assert_eq!(state.world.entity_count(), 0);
        assert_eq!(state.elapsed_secs, 0.0);
    }

    #[test]
    fn test_restart_from_pause() {
        let mut state = empty_track(3);
        for _ in 0..20 {
            tick(&mut state, &[], 0.05);
        }
        state.player.coins_collected = 2;
        state.player.target_lane = 0;
        tick(&mut state, &[InputEvent::PauseToggle], 0.0);
        assert_eq!(state.phase, GamePhase::Paused);

        tick(&mut state, &[InputEvent::Restart], 0.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.coins_collected, 0);
        assert_eq!(state.player.target_lane, 1);
        assert_eq!(state.player.pos.z, -1.0);
        assert_eq!(state.player.forward_speed, 6.0);
        assert_eq!(state.elapsed_secs, 0.0);
        assert_eq!(state.distance, 0.0);
        assert!(state.events.contains(&GameEvent::Restarted));
        assert!(!state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::RunEnded { .. })));
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut state = running(1);
        tick(&mut state, &[], 0.05);
        let z = state.player.pos.z;
        tick(&mut state, &[InputEvent::Restart], 0.0);
        assert_eq!(state.player.pos.z, z);
    }

    #[test]
    fn test_finish_distance_triggers_victory() {
        let tuning = Tuning {
            finish_distance: Some(1.0),
            spawn_interval: 1.0e6,
            first_spawn_z: -1.0e7,
            bomb_interval: 1.0e6,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(5, tuning).expect("valid tuning");
        tick(&mut state, &[InputEvent::Start], 0.0);
        for _ in 0..10 {
            tick(&mut state, &[], 0.05);
        }
        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(state.player.forward_speed, 0.0);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut state = empty_track(3);
        for dt in [f32::NAN, -1.0, 0.2, f32::INFINITY] {
            tick(&mut state, &[], dt);
        }
        assert_eq!(state.player.pos.z, -1.0);
        assert_eq!(state.elapsed_secs, 0.0);
    }

    #[test]
    fn test_recenter_during_long_run() {
        let mut state = empty_track(3);
        let mut recentered = false;
        for _ in 0..600 {
            tick(&mut state, &[], 0.05);
            assert!(state.player.pos.z >= -100.0 - 1.0);
            recentered |= state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Recentered { .. }));
        }
        assert!(recentered);
        assert!(state.distance > 100.0);
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), 0.0);
        assert!((clock.delta(1016.0) - 0.016).abs() < 1e-6);
        assert_eq!(clock.delta(5000.0), MAX_FRAME_DT);
        assert_eq!(clock.delta(4000.0), 0.0);
        assert_eq!(clock.delta(f64::NAN), 0.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = running(99);
        let mut b = running(99);
        let inputs = [
            vec![InputEvent::LaneLeft],
            vec![],
            vec![InputEvent::LaneRight, InputEvent::LaneRight],
            vec![],
        ];
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input, 0.05);
                tick(&mut b, input, 0.05);
            }
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.world.coins, b.world.coins);
        assert_eq!(a.world.obstacles, b.world.obstacles);
    }
}
