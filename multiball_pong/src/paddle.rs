//!
//! Contains code to setup and manage the paddles on either side of the field. Input is
//! sampled into a per-paddle direction first, and the paddles are then moved by that
//! direction using the clamped frame delta, so other modules always see the latest position.
//!

// -------------------------------------------------------------------------------------------------
// Included Symbols

use bevy::prelude::*;

use crate::common::*;
use crate::config::SimConfig;

// -------------------------------------------------------------------------------------------------
// Constants

const P1_UP_KEY: KeyCode = KeyCode::KeyW;
const P1_DOWN_KEY: KeyCode = KeyCode::KeyS;
const P2_UP_KEY: KeyCode = KeyCode::KeyI;
const P2_DOWN_KEY: KeyCode = KeyCode::KeyK;

// -------------------------------------------------------------------------------------------------
// Public API

///
/// The PaddlePlugin adds 2 paddles to the field, one on each side.
/// Player 1 moves with W/S and player 2 with I/K. Paddle positions are readable by
/// other modules through the Paddle component and its Transform.
///
/// Requires a SimConfig resource, which the SimulationPlugin provides.
///
pub struct PaddlePlugin;

impl Plugin for PaddlePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_paddles.in_set(Systems::PaddleCreation))
            .add_systems(
                Update,
                (
                    sample_paddle_input.in_set(Systems::HandleInput),
                    move_paddles.in_set(Systems::Move),
                ),
            )
            .configure_sets(Update, Systems::HandleInput.before(Systems::Move));
    }
}

/// These SystemSets are used to control any system ordering dependencies on this plugin
#[derive(SystemSet, Debug, Clone, Hash, PartialEq, Eq)]
pub enum Systems {
    /// Creates the paddle entities. Must be in Startup.
    PaddleCreation,

    /// Reads the keyboard and stores the requested direction on each paddle. Must be in Update.
    HandleInput,

    ///
    /// Moves each paddle by its stored direction and clamps it inside the walls.
    /// Must be in Update. Runs after HandleInput.
    ///
    Move,
}

///
/// Component present on both paddle entities. Other modules can read which player
/// a paddle belongs to, and use Without<Paddle> to keep their queries disjoint.
///
#[derive(Component, Debug)]
pub struct Paddle {
    player: PlayerId,
    direction: MoveDirection,
}

impl Paddle {
    // Private constructor for a stationary paddle owned by the given player.
    fn new(player: PlayerId) -> Self {
        Paddle {
            player,
            direction: MoveDirection::None,
        }
    }

    /// The player controlling this paddle.
    pub fn player(&self) -> PlayerId {
        self.player
    }
}

/// The direction a paddle was asked to move in by the latest input sample.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDirection {
    /// No key (or both keys) held.
    None,
    /// Towards the top wall (positive Y).
    Up,
    /// Towards the bottom wall (negative Y).
    Down,
}

impl MoveDirection {
    /// The direction as -1, 0 or +1 along the Y axis.
    pub fn sign(self) -> f32 {
        match self {
            MoveDirection::None => 0f32,
            MoveDirection::Up => 1f32,
            MoveDirection::Down => -1f32,
        }
    }

    // Builds a direction from the state of an up/down key pair. Both held cancels out.
    fn from_keys(up: bool, down: bool) -> Self {
        match (up, down) {
            (true, false) => MoveDirection::Up,
            (false, true) => MoveDirection::Down,
            _ => MoveDirection::None,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Private Systems

//
// Creates two paddles - one for each player. One paddle sits just inside the left edge
// of the field, one just inside the right edge. They are vertically centered to start.
//
fn setup_paddles(mut commands: Commands, config: Res<SimConfig>) {
    let paddle_size = Vec3::new(WALL_THICKNESS, config.paddle_height, 0f32);

    for player in [Player1, Player2] {
        commands.spawn((
            Paddle::new(player),
            Sprite {
                color: Color::WHITE,
                custom_size: Some(Vec2::ONE),
                ..default()
            },
            Transform {
                translation: Vec3::new(config.paddle_x(player), FIELD_CENTER.y, Z_FOREGROUND),
                scale: paddle_size,
                ..default()
            },
        ));
    }
}

// Samples the keyboard and records the requested direction on each paddle.
fn sample_paddle_input(mut paddles: Query<&mut Paddle>, keys: Res<ButtonInput<KeyCode>>) {
    for mut paddle in &mut paddles {
        paddle.direction = match paddle.player {
            Player1 => MoveDirection::from_keys(keys.pressed(P1_UP_KEY), keys.pressed(P1_DOWN_KEY)),
            Player2 => MoveDirection::from_keys(keys.pressed(P2_UP_KEY), keys.pressed(P2_DOWN_KEY)),
        };
    }
}

//
// Moves each paddle by direction * speed * dt, using the clamped frame delta, then
// keeps its center within a half-height plus wall thickness of the field edges.
//
fn move_paddles(
    time: Res<Time>,
    config: Res<SimConfig>,
    mut paddles: Query<(&Paddle, &mut Transform)>,
) {
    let delta = config.clamp_delta(time.delta_secs());

    for (paddle, mut paddle_tf) in &mut paddles {
        if paddle.direction == MoveDirection::None {
            continue;
        }

        let new_y = paddle_tf.translation.y + (paddle.direction.sign() * config.paddle_speed * delta);
        paddle_tf.translation.y = new_y.clamp(config.paddle_min_y(), config.paddle_max_y());
    }
}

// -------------------------------------------------------------------------------------------------
// Unit Tests
