//!
//! Tunable parameters for the simulation. The defaults reproduce the classic
//! multiball layout on a 1024x768 field; a different SimConfig can be handed to
//! the SimulationPlugin before the app starts.
//!

// -------------------------------------------------------------------------------------------------
// Included Symbols

use std::error::Error;
use std::fmt;
use std::time::Duration;

use bevy::prelude::*;

use crate::common::*;

// -------------------------------------------------------------------------------------------------
// Constants

const PADDLE_HEIGHT: f32 = 100.0;
const PADDLE_SPEED: f32 = 300.0;
const PADDLE_INSET: f32 = 10.0;
const CONTACT_BAND_WIDTH: f32 = 5.0;
const MAX_FRAME_DELTA_SECS: f32 = 0.05;
const BALL_SPAWN_INTERVAL: Duration = Duration::from_secs(30);
const MAX_BALLS: usize = 5;
const INITIAL_BALLS: usize = 1;
const BASE_LAUNCH_VELOCITY: Vec2 = Vec2::new(-200.0, -235.0);
const LAUNCH_JITTER: i32 = 20;

// -------------------------------------------------------------------------------------------------
// Public API

///
/// All tunables of the simulation step. It is inserted as a Resource by the
/// SimulationPlugin and read by the paddle, ball and simulation systems.
///
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Height of each paddle in world units.
    pub paddle_height: f32,
    /// Paddle travel speed in world units per second.
    pub paddle_speed: f32,
    /// Gap between the side edge of the field and the outer face of a paddle.
    pub paddle_inset: f32,
    /// Width of the x-range in front of each paddle where a ball is considered in contact.
    pub contact_band_width: f32,
    /// Upper bound applied to the frame delta before it drives motion.
    pub max_frame_delta_secs: f32,
    /// Wall-clock time between ball releases.
    pub spawn_interval: Duration,
    /// Number of pre-allocated balls, and so the most that can ever be in play.
    pub max_balls: usize,
    /// Balls released immediately at startup.
    pub initial_balls: usize,
    /// Launch velocity every ball starts from before jitter is applied.
    pub base_launch_velocity: Vec2,
    /// Each launch velocity component is offset by a whole number in [-jitter, jitter].
    pub launch_jitter: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_inset: PADDLE_INSET,
            contact_band_width: CONTACT_BAND_WIDTH,
            max_frame_delta_secs: MAX_FRAME_DELTA_SECS,
            spawn_interval: BALL_SPAWN_INTERVAL,
            max_balls: MAX_BALLS,
            initial_balls: INITIAL_BALLS,
            base_launch_velocity: BASE_LAUNCH_VELOCITY,
            launch_jitter: LAUNCH_JITTER,
        }
    }
}

impl SimConfig {
    /// Smallest y the center of a paddle may reach.
    pub fn paddle_min_y(&self) -> f32 {
        (self.paddle_height / 2f32) + WALL_THICKNESS
    }

    /// Largest y the center of a paddle may reach.
    pub fn paddle_max_y(&self) -> f32 {
        FIELD_HEIGHT - self.paddle_min_y()
    }

    /// The frame delta in seconds, capped at max_frame_delta_secs.
    pub fn clamp_delta(&self, delta_secs: f32) -> f32 {
        delta_secs.min(self.max_frame_delta_secs)
    }

    /// X coordinate of the center of the given player's paddle.
    pub fn paddle_x(&self, player: PlayerId) -> f32 {
        let offset = self.paddle_inset + (WALL_THICKNESS / 2f32);
        match player {
            Player1 => offset,
            Player2 => FIELD_WIDTH - offset,
        }
    }

    ///
    /// The inclusive x-range in front of the given player's paddle in which a ball
    /// counts as touching it. The range ends at the paddle's inner face.
    ///
    pub fn contact_band(&self, player: PlayerId) -> (f32, f32) {
        let face = self.paddle_inset + WALL_THICKNESS;
        match player {
            Player1 => (face - self.contact_band_width, face),
            Player2 => (FIELD_WIDTH - face, FIELD_WIDTH - face + self.contact_band_width),
        }
    }

    ///
    /// Checks that the configuration describes a playable field. Any error here
    /// is an initialization failure and should abort startup.
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_balls == 0 {
            return Err(ConfigError::NoBalls);
        }
        if self.initial_balls > self.max_balls {
            return Err(ConfigError::TooManyInitialBalls {
                initial: self.initial_balls,
                max: self.max_balls,
            });
        }
        if self.spawn_interval.is_zero() {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        if !(self.max_frame_delta_secs > 0f32) {
            return Err(ConfigError::NonPositive("max_frame_delta_secs"));
        }
        if !(self.paddle_speed > 0f32) {
            return Err(ConfigError::NonPositive("paddle_speed"));
        }
        if !(self.paddle_height > 0f32) || self.paddle_min_y() > self.paddle_max_y() {
            return Err(ConfigError::PaddleTooTall(self.paddle_height));
        }
        if self.launch_jitter < 0 {
            return Err(ConfigError::NegativeJitter(self.launch_jitter));
        }
        Ok(())
    }
}

/// Reasons a SimConfig can be rejected at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoBalls,
    TooManyInitialBalls { initial: usize, max: usize },
    ZeroSpawnInterval,
    NonPositive(&'static str),
    PaddleTooTall(f32),
    NegativeJitter(i32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoBalls => write!(f, "max_balls must be at least 1"),
            ConfigError::TooManyInitialBalls { initial, max } => write!(
                f,
                "initial_balls ({initial}) cannot exceed max_balls ({max})"
            ),
            ConfigError::ZeroSpawnInterval => write!(f, "spawn_interval must be non-zero"),
            ConfigError::NonPositive(field) => write!(f, "{field} must be greater than zero"),
            ConfigError::PaddleTooTall(height) => write!(
                f,
                "paddle_height {height} does not fit between the walls of a {FIELD_HEIGHT} tall field"
            ),
            ConfigError::NegativeJitter(jitter) => {
                write!(f, "launch_jitter must not be negative, got {jitter}")
            }
        }
    }
}

impl Error for ConfigError {}

// -------------------------------------------------------------------------------------------------
// Unit Tests
