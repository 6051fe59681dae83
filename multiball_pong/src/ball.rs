//!
//! This module contains code to manage the balls within the game, including their
//! creation, release, movement, and collision with the walls and paddles. All balls are
//! allocated up front and kept hidden until released. It exposes messages so other modules
//! can react when a ball is released and when a ball leaves the field.
//!

// -------------------------------------------------------------------------------------------------
// Included Symbols

use bevy::prelude::*;
use rand::Rng;

use crate::common::*;
use crate::config::SimConfig;
use crate::paddle::{self, Paddle};

// -------------------------------------------------------------------------------------------------
// Constants

const BALL_SIZE: f32 = WALL_THICKNESS;
const BALL_COLOR: Color = Color::WHITE;

// -------------------------------------------------------------------------------------------------
// Public API

///
/// This plugin pre-allocates the balls and implements their movement and physics. Balls
/// are released by other modules through the ReleaseBall message and report leaving the
/// field through the BallOutOfBounds message. The exposed system sets should be used to
/// order senders and receivers within the same frame.
///
/// Requires a SimConfig resource, which the SimulationPlugin provides.
///
pub struct BallPlugin;

impl Plugin for BallPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ReleaseBall>()
            .add_message::<BallReleased>()
            .add_message::<BallOutOfBounds>()
            .add_systems(Startup, setup_balls.in_set(Systems::BallCreation))
            .add_systems(
                Update,
                (
                    handle_release_ball.in_set(Systems::ReleaseBallRcvr),
                    move_and_collide.in_set(Systems::MoveAndCollide),
                ),
            )
            .configure_sets(
                Update,
                (
                    paddle::Systems::Move.before(Systems::MoveAndCollide),
                    Systems::ReleaseBallRcvr.before(Systems::MoveAndCollide),
                ),
            );
    }
}

///
/// A single ball in the ordered collection. Position is kept in the entity's Transform.
/// The component is exposed to allow disjoint queries using With<Ball> or Without<Ball>.
///
#[derive(Component, Debug)]
pub struct Ball {
    // Slot of this ball in the release order, starting from 0.
    index: usize,

    // Current velocity in world units per second.
    velocity: Vec2,

    // Whether the ball has been released. Balls not in play are hidden and never move.
    in_play: bool,
}

impl Ball {
    /// Slot of this ball in the release order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the ball has been released into the field.
    pub fn in_play(&self) -> bool {
        self.in_play
    }
}

///
/// System sets to allow modules consuming this plugin to create ordering constraints
/// based on functionality exposed in the API of the Plugin.
///
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Systems {
    /// Startup systems which allocate every ball. After this, SimConfig::max_balls Balls exist.
    BallCreation,

    ///
    /// Update systems which react to ReleaseBall messages and write BallReleased messages.
    /// To release a ball in the same frame, the sender should be ordered before this set.
    ///
    ReleaseBallRcvr,

    ///
    /// Update systems which move the balls, collide them, and write BallOutOfBounds
    /// messages. Runs after paddle movement, so collisions see this frame's paddle positions.
    ///
    MoveAndCollide,
}

///
/// This message should be written by another module to put the ball in the given slot
/// into play. The ball is recentered and launched with a freshly jittered velocity.
/// Releasing a slot that is already in play, or does not exist, is ignored.
///
#[derive(Message, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReleaseBall(pub usize);

/// Written by the BallPlugin once a ball has actually been put into play.
#[derive(Message, Clone, Copy, PartialEq, Debug)]
pub struct BallReleased {
    pub index: usize,
    pub velocity: Vec2,
}

///
/// Written by the BallPlugin when a ball in play has crossed the left or right edge of
/// the field without being returned by a paddle.
///
#[derive(Message, Clone, Copy, PartialEq, Debug)]
pub struct BallOutOfBounds {
    pub index: usize,
    pub x: f32,
}

///
/// Picks a launch velocity: the configured base velocity with each component offset by
/// a whole number drawn uniformly from [-launch_jitter, launch_jitter].
///
pub fn launch_velocity<R: Rng + ?Sized>(rng: &mut R, config: &SimConfig) -> Vec2 {
    let jitter = config.launch_jitter;
    let offset = Vec2::new(
        rng.random_range(-jitter..=jitter) as f32,
        rng.random_range(-jitter..=jitter) as f32,
    );
    config.base_launch_velocity + offset
}

// -------------------------------------------------------------------------------------------------
// Private Types

// Outcome of advancing a single ball by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StepOutcome {
    InPlay,
    OutOfBounds,
}

// -------------------------------------------------------------------------------------------------
// Private Systems

//
// Allocates every ball the game will ever use, hidden and parked in the center of the
// field. They are put into play later through ReleaseBall messages.
//
fn setup_balls(mut commands: Commands, config: Res<SimConfig>) {
    for index in 0..config.max_balls {
        commands.spawn((
            Ball {
                index,
                velocity: Vec2::ZERO,
                in_play: false,
            },
            Sprite {
                color: BALL_COLOR,
                custom_size: Some(Vec2::ONE),
                ..default()
            },
            Transform {
                translation: FIELD_CENTER.extend(Z_FOREGROUND),
                scale: Vec3::new(BALL_SIZE, BALL_SIZE, 0f32),
                ..default()
            },
            Visibility::Hidden,
        ));
    }
}

//
// Handles ReleaseBall messages by recentering the requested ball, launching it and
// making it visible. Each successful release is announced with a BallReleased message.
//
fn handle_release_ball(
    mut messages: MessageReader<ReleaseBall>,
    mut released: MessageWriter<BallReleased>,
    config: Res<SimConfig>,
    mut balls: Query<(&mut Ball, &mut Transform, &mut Visibility)>,
) {
    if messages.is_empty() {
        return;
    }

    let mut rng = rand::rng();
    for ReleaseBall(index) in messages.read() {
        let Some((mut ball, mut ball_tf, mut vis)) =
            balls.iter_mut().find(|(ball, _, _)| ball.index == *index)
        else {
            warn!("Ignoring release of ball {index}, no such ball was allocated");
            continue;
        };

        if ball.in_play {
            warn!("Ignoring release of ball {index}, it is already in play");
            continue;
        }

        ball.velocity = launch_velocity(&mut rng, &config);
        ball.in_play = true;
        ball_tf.translation.x = FIELD_CENTER.x;
        ball_tf.translation.y = FIELD_CENTER.y;
        *vis = Visibility::Visible;

        released.write(BallReleased {
            index: *index,
            velocity: ball.velocity,
        });
    }
}

//
// This system advances every ball in play by one frame using the clamped frame delta,
// bounces it off the walls and paddles, and reports balls that left the field. It runs
// after paddle movement so collisions use the paddle positions of this frame.
//
fn move_and_collide(
    time: Res<Time>,
    config: Res<SimConfig>,
    mut balls: Query<(&mut Ball, &mut Transform), Without<Paddle>>,
    paddles: Query<(&Paddle, &Transform)>,
    mut out_of_bounds: MessageWriter<BallOutOfBounds>,
) {
    let delta = config.clamp_delta(time.delta_secs());
    let paddle_ys = paddles
        .iter()
        .map(|(paddle, paddle_tf)| (paddle.player(), paddle_tf.translation.y))
        .as_per_player();

    for (mut ball, mut ball_tf) in &mut balls {
        if !ball.in_play {
            continue;
        }

        let mut position = ball_tf.translation.xy();
        let outcome = step_ball(&mut position, &mut ball.velocity, paddle_ys, delta, &config);
        ball_tf.translation.x = position.x;
        ball_tf.translation.y = position.y;

        if outcome == StepOutcome::OutOfBounds {
            out_of_bounds.write(BallOutOfBounds {
                index: ball.index,
                x: position.x,
            });
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Private Functions

//
// Advances one ball by a single frame. The position is integrated first, then:
//  - vertical velocity is reflected when touching the top or bottom wall while moving into it
//  - horizontal velocity is reflected when inside a paddle's contact band, within half a paddle
//    height of its center, and moving towards it
//  - otherwise a ball past the left or right edge is reported as out of bounds
// The direction checks mean a ball overlapping a wall or paddle for several frames only
// bounces once.
//
fn step_ball(
    position: &mut Vec2,
    velocity: &mut Vec2,
    paddle_ys: (f32, f32),
    delta: f32,
    config: &SimConfig,
) -> StepOutcome {
    *position += *velocity * delta;

    if position.y <= WALL_THICKNESS && velocity.y < 0f32 {
        velocity.y = -velocity.y;
    } else if position.y >= (FIELD_HEIGHT - WALL_THICKNESS) && velocity.y > 0f32 {
        velocity.y = -velocity.y;
    }

    let half_height = config.paddle_height / 2f32;
    let touching = |player: PlayerId, paddle_y: f32| {
        let (band_min, band_max) = config.contact_band(player);
        (paddle_y - position.y).abs() <= half_height
            && position.x >= band_min
            && position.x <= band_max
    };

    if touching(Player1, paddle_ys.0) && velocity.x < 0f32 {
        velocity.x = -velocity.x;
    } else if touching(Player2, paddle_ys.1) && velocity.x > 0f32 {
        velocity.x = -velocity.x;
    } else if position.x <= 0f32 || position.x >= FIELD_WIDTH {
        return StepOutcome::OutOfBounds;
    }

    StepOutcome::InPlay
}

// -------------------------------------------------------------------------------------------------
// Unit Tests
