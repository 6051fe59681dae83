//!
//! The simulation module ties the paddle and ball plugins together into a single game
//! session. It owns the session state (spawn timer, active ball count and running flag),
//! releases new balls on a fixed wall-clock interval, and ends the whole session as soon
//! as any ball leaves the field.
//!
//! All paddle and ball update systems are gated on the running flag, so nothing moves
//! once the session has ended, even before the app actually exits.
//!

// -------------------------------------------------------------------------------------------------
// Included Symbols

use bevy::prelude::*;

use crate::ball::{self, BallOutOfBounds, BallReleased, ReleaseBall};
use crate::config::SimConfig;
use crate::paddle;

// -------------------------------------------------------------------------------------------------
// Public API

///
/// Plugin that inserts the SimConfig and SimulationState resources and drives ball
/// release and termination. The config field can be replaced before the plugin is
/// added to run with different tunables. An invalid config makes the app exit with
/// an error status during Startup.
///
/// Requires the PaddlePlugin and BallPlugin.
///
pub struct SimulationPlugin {
    pub config: SimConfig,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        SimulationPlugin {
            config: SimConfig::default(),
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(SimulationState::new(&self.config))
            .add_systems(
                Startup,
                (
                    validate_config.in_set(Systems::ValidateConfig),
                    release_initial_balls
                        .in_set(Systems::InitialRelease)
                        .run_if(simulation_running),
                ),
            )
            .add_systems(
                Update,
                (
                    tick_ball_spawner.in_set(Systems::SpawnBalls),
                    log_ball_releases.after(ball::Systems::ReleaseBallRcvr),
                    handle_ball_out_of_bounds.in_set(Systems::Terminate),
                ),
            )
            .configure_sets(
                Startup,
                (
                    Systems::ValidateConfig
                        .before(paddle::Systems::PaddleCreation)
                        .before(ball::Systems::BallCreation),
                    (paddle::Systems::PaddleCreation, ball::Systems::BallCreation)
                        .distributive_run_if(simulation_running),
                    Systems::InitialRelease.after(ball::Systems::BallCreation),
                ),
            )
            .configure_sets(
                Update,
                (
                    (
                        paddle::Systems::HandleInput,
                        paddle::Systems::Move,
                        Systems::SpawnBalls,
                        ball::Systems::ReleaseBallRcvr,
                        ball::Systems::MoveAndCollide,
                        Systems::Terminate,
                    )
                        .distributive_run_if(simulation_running),
                    Systems::SpawnBalls
                        .after(paddle::Systems::Move)
                        .before(ball::Systems::ReleaseBallRcvr),
                    Systems::Terminate.after(ball::Systems::MoveAndCollide),
                ),
            );
    }
}

/// System sets exposed by the SimulationPlugin for ordering.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Systems {
    ///
    /// Startup check of the SimConfig. Runs before any paddle or ball is created, and
    /// nothing is created at all when the check fails.
    ///
    ValidateConfig,

    /// Startup release of the balls that are in play from the first frame.
    InitialRelease,

    /// Update systems that release another ball each time the spawn interval elapses.
    SpawnBalls,

    /// Update systems that end the session when a ball leaves the field.
    Terminate,
}

///
/// State of the current session. The spawn timer runs on the real (wall) clock,
/// the active ball count only ever grows (up to SimConfig::max_balls), and the
/// running flag is cleared once and never set again.
///
#[derive(Resource, Debug)]
pub struct SimulationState {
    spawn_timer: Timer,
    active_balls: usize,
    running: bool,
}

impl SimulationState {
    /// Fresh state for a session using the given config.
    pub fn new(config: &SimConfig) -> Self {
        SimulationState {
            spawn_timer: Timer::new(config.spawn_interval, TimerMode::Repeating),
            active_balls: config.initial_balls.min(config.max_balls),
            running: true,
        }
    }

    /// Number of balls released so far.
    pub fn active_balls(&self) -> usize {
        self.active_balls
    }

    /// False once the session has ended.
    pub fn running(&self) -> bool {
        self.running
    }
}

/// Run condition which is true while the session is still running.
pub fn simulation_running(state: Res<SimulationState>) -> bool {
    state.running
}

// -------------------------------------------------------------------------------------------------
// Private Systems

//
// Rejects an unusable config. The session is stopped and the app is asked to exit with
// an error status, which main hands back to the caller.
//
fn validate_config(
    config: Res<SimConfig>,
    mut state: ResMut<SimulationState>,
    mut exit: MessageWriter<AppExit>,
) {
    if let Err(err) = config.validate() {
        error!("Invalid simulation config: {err}");
        state.running = false;
        exit.write(AppExit::error());
    }
}

// Puts the initially active balls into play, starting from the first slot.
fn release_initial_balls(state: Res<SimulationState>, mut release: MessageWriter<ReleaseBall>) {
    for index in 0..state.active_balls {
        release.write(ReleaseBall(index));
    }
    info!("Game started with {} ball(s) in play", state.active_balls);
}

//
// Ticks the spawn timer with the real clock's frame delta, which is neither capped nor
// paused like the virtual clock, and releases the next unused ball for every elapsed
// interval until every allocated ball is in play.
//
fn tick_ball_spawner(
    time: Res<Time<Real>>,
    config: Res<SimConfig>,
    mut state: ResMut<SimulationState>,
    mut release: MessageWriter<ReleaseBall>,
) {
    state.spawn_timer.tick(time.delta());

    for _ in 0..state.spawn_timer.times_finished_this_tick() {
        if state.active_balls >= config.max_balls {
            return;
        }

        release.write(ReleaseBall(state.active_balls));
        state.active_balls += 1;
    }
}

// Logs every ball that was actually put into play
fn log_ball_releases(mut messages: MessageReader<BallReleased>, config: Res<SimConfig>) {
    for released in messages.read() {
        info!(
            "Ball {} of {} in play with velocity {}",
            released.index + 1,
            config.max_balls,
            released.velocity
        );
    }
}

//
// Ends the session on the first ball that leaves the field. Leaving the field is the
// normal end of a game, so the app exits with a success status.
//
fn handle_ball_out_of_bounds(
    mut messages: MessageReader<BallOutOfBounds>,
    mut state: ResMut<SimulationState>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(first) = messages.read().next().copied() else {
        return;
    };
    messages.clear();

    if !state.running {
        return;
    }

    info!(
        "Ball {} left the field at x={:.1}, game over",
        first.index, first.x
    );
    state.running = false;
    exit.write(AppExit::Success);
}

// -------------------------------------------------------------------------------------------------
// Unit Tests

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_test_helpers::prelude::*;
    use std::time::Duration;

    #[test]
    fn test_plugin_inserts_resources() {
        let config = SimConfig {
            max_balls: 2,
            initial_balls: 2,
            ..default()
        };
        let mut app = App::new();
        app.add_plugins(SimulationPlugin {
            config: config.clone(),
        });

        let world = app.world();
        assert_eq!(
            *world.resource::<SimConfig>(),
            config,
            "Expected plugin to insert its config as a resource"
        );
        let state = world.resource::<SimulationState>();
        assert!(state.running(), "Expected session to start running");
        assert_eq!(state.active_balls(), 2, "Expected initial balls to count as active");
    }

    #[test]
    fn test_plugin_added_sys_validate() {
        validate_sys_in_plugin(
            SimulationPlugin::default(),
            Startup,
            validate_config,
            Some(Systems::ValidateConfig),
        );
    }

    #[test]
    fn test_plugin_added_sys_initial_release() {
        validate_sys_in_plugin(
            SimulationPlugin::default(),
            Startup,
            release_initial_balls,
            Some(Systems::InitialRelease),
        );
    }

    #[test]
    fn test_plugin_added_sys_spawner() {
        validate_sys_in_plugin(
            SimulationPlugin::default(),
            Update,
            tick_ball_spawner,
            Some(Systems::SpawnBalls),
        );
    }

    #[test]
    fn test_plugin_added_sys_log_releases() {
        validate_sys_in_plugin(
            SimulationPlugin::default(),
            Update,
            log_ball_releases,
            None::<Systems>,
        );
    }

    #[test]
    fn test_log_releases_consumes_messages() {
        let mut world = spawner_world(SimConfig::default());
        world.write_message(BallReleased {
            index: 1,
            velocity: Vec2::new(-190.0, -240.0),
        });

        let log_sys = world.register_system(log_ball_releases);
        world.run_system(log_sys).unwrap();

        assert_eq!(
            drain_messages::<BallReleased>(&mut world).len(),
            1,
            "Expected the release message to stay readable by other modules"
        );
    }

    #[test]
    fn test_plugin_added_sys_terminate() {
        validate_sys_in_plugin(
            SimulationPlugin::default(),
            Update,
            handle_ball_out_of_bounds,
            Some(Systems::Terminate),
        );
    }

    #[test]
    fn test_state_caps_initial_balls() {
        let state = SimulationState::new(&SimConfig {
            max_balls: 2,
            initial_balls: 4,
            ..default()
        });
        assert_eq!(state.active_balls(), 2, "Expected active balls never above max_balls");
    }

    #[test]
    fn test_validate_config_accepts_default() {
        let mut world = spawner_world(SimConfig::default());

        let validate_sys = world.register_system(validate_config);
        world.run_system(validate_sys).unwrap();

        assert!(world.resource::<SimulationState>().running(), "Expected session to keep running");
        assert!(
            drain_messages::<AppExit>(&mut world).is_empty(),
            "Expected no exit request for a valid config"
        );
    }

    #[test]
    fn test_validate_config_rejects_and_exits_with_error() {
        let mut world = spawner_world(SimConfig {
            spawn_interval: Duration::ZERO,
            ..default()
        });

        let validate_sys = world.register_system(validate_config);
        world.run_system(validate_sys).unwrap();

        assert!(
            !world.resource::<SimulationState>().running(),
            "Expected invalid config to stop the session"
        );
        assert_eq!(
            drain_messages::<AppExit>(&mut world),
            vec![AppExit::error()],
            "Expected an error exit request for an invalid config"
        );
    }

    #[test]
    fn test_release_initial_balls() {
        let mut world = spawner_world(SimConfig {
            initial_balls: 2,
            ..default()
        });

        let release_sys = world.register_system(release_initial_balls);
        world.run_system(release_sys).unwrap();

        assert_eq!(
            drain_messages::<ReleaseBall>(&mut world),
            vec![ReleaseBall(0), ReleaseBall(1)],
            "Expected the first two slots to be released"
        );
    }

    #[test]
    fn test_spawner_waits_for_interval() {
        let mut world = spawner_world(SimConfig::default());
        let spawn_sys = world.register_system(tick_ball_spawner);

        run_system_after(&mut world, spawn_sys, Duration::from_secs(29));
        assert!(
            drain_messages::<ReleaseBall>(&mut world).is_empty(),
            "Expected no release before the spawn interval elapsed"
        );

        run_system_after(&mut world, spawn_sys, Duration::from_secs(1));
        assert_eq!(
            drain_messages::<ReleaseBall>(&mut world),
            vec![ReleaseBall(1)],
            "Expected the second ball released after 30s"
        );
        assert_eq!(world.resource::<SimulationState>().active_balls(), 2);
    }

    #[test]
    fn test_spawner_uses_unclamped_delta() {
        let mut world = spawner_world(SimConfig {
            spawn_interval: Duration::from_millis(100),
            ..default()
        });
        let spawn_sys = world.register_system(tick_ball_spawner);

        // Far beyond max_frame_delta_secs, so only wall-clock ticking releases 2 balls here
        run_system_after(&mut world, spawn_sys, Duration::from_millis(250));

        assert_eq!(
            drain_messages::<ReleaseBall>(&mut world),
            vec![ReleaseBall(1), ReleaseBall(2)],
            "Expected one release per elapsed interval"
        );
    }

    #[test]
    fn test_spawner_follows_real_clock() {
        let mut world = spawner_world(SimConfig::default());
        world.init_resource::<Time>();
        world.init_resource::<Time<Real>>();

        // Only the real clock moves, as when the virtual clock is capped or paused
        world
            .resource_mut::<Time<Real>>()
            .advance_by(Duration::from_secs(31));
        let spawn_sys = world.register_system(tick_ball_spawner);
        world.run_system(spawn_sys).unwrap();

        assert_eq!(
            drain_messages::<ReleaseBall>(&mut world),
            vec![ReleaseBall(1)],
            "Expected a release once 30s of real time have passed"
        );
        assert_eq!(world.resource::<SimulationState>().active_balls(), 2);
    }

    #[test]
    fn test_ball_count_monotonic_and_capped() {
        let mut world = spawner_world(SimConfig {
            spawn_interval: Duration::from_secs(1),
            max_balls: 3,
            ..default()
        });
        let spawn_sys = world.register_system(tick_ball_spawner);

        let mut prev_count = world.resource::<SimulationState>().active_balls();
        let mut released = Vec::new();
        for delta_ms in [400u64, 700, 16, 2500, 50, 1000, 3000, 16, 900] {
            run_system_after(&mut world, spawn_sys, Duration::from_millis(delta_ms));
            let count = world.resource::<SimulationState>().active_balls();
            assert!(count >= prev_count, "Expected ball count never to decrease");
            assert!(count <= 3, "Expected ball count never above max_balls, got {count}");
            prev_count = count;
            released.extend(drain_messages::<ReleaseBall>(&mut world));
        }

        assert_eq!(prev_count, 3, "Expected every allocated ball eventually in play");
        assert_eq!(
            released,
            vec![ReleaseBall(1), ReleaseBall(2)],
            "Expected each remaining slot released once, in order"
        );
    }

    #[test]
    fn test_out_of_bounds_terminates() {
        let mut world = spawner_world(SimConfig::default());
        world.write_message(BallOutOfBounds { index: 0, x: -2.0 });
        world.write_message(BallOutOfBounds { index: 1, x: 1030.0 });

        let terminate_sys = world.register_system(handle_ball_out_of_bounds);
        world.run_system(terminate_sys).unwrap();

        assert!(
            !world.resource::<SimulationState>().running(),
            "Expected a ball leaving the field to end the session"
        );
        assert_eq!(
            drain_messages::<AppExit>(&mut world),
            vec![AppExit::Success],
            "Expected a single successful exit request"
        );

        world.write_message(BallOutOfBounds { index: 2, x: -1.0 });
        world.run_system(terminate_sys).unwrap();
        assert!(
            drain_messages::<AppExit>(&mut world).is_empty(),
            "Expected no further exit requests once the session ended"
        );
    }

    #[test]
    fn test_no_out_of_bounds_keeps_running() {
        let mut world = spawner_world(SimConfig::default());

        let terminate_sys = world.register_system(handle_ball_out_of_bounds);
        world.run_system(terminate_sys).unwrap();

        assert!(world.resource::<SimulationState>().running(), "Expected session still running");
        assert!(drain_messages::<AppExit>(&mut world).is_empty());
    }

    #[test]
    fn test_run_condition_follows_state() {
        let mut world = spawner_world(SimConfig::default());
        let cond_sys = world.register_system(simulation_running);

        assert!(world.run_system(cond_sys).unwrap(), "Expected fresh session to run");
        world.resource_mut::<SimulationState>().running = false;
        assert!(!world.run_system(cond_sys).unwrap(), "Expected ended session to stop");
    }

    // --- Helper Functions ---

    fn spawner_world(config: SimConfig) -> World {
        let mut world = World::default();
        world.insert_resource(SimulationState::new(&config));
        world.insert_resource(config);
        world.init_resource::<Messages<ReleaseBall>>();
        world.init_resource::<Messages<BallReleased>>();
        world.init_resource::<Messages<BallOutOfBounds>>();
        world.init_resource::<Messages<AppExit>>();
        world
    }
}
