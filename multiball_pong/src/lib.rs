//!
//! Multiball pong: two paddles, a growing set of balls, and a session that ends as
//! soon as any ball gets past a paddle. Each concern lives in its own plugin, and
//! PongPlugins puts the whole game together.
//!

// -------------------------------------------------------------------------------------------------
// Included Symbols

use bevy::prelude::*;

pub mod ball;
pub mod common;
pub mod config;
pub mod field;
pub mod frame;
pub mod paddle;
pub mod simulation;
pub mod window;

use ball::BallPlugin;
use field::FieldPlugin;
use frame::FramePacePlugin;
use paddle::PaddlePlugin;
use simulation::SimulationPlugin;
use window::PongWindowPlugin;

// -------------------------------------------------------------------------------------------------
// Public API

///
/// Adds every plugin needed to run the game with the default SimConfig, including the
/// engine's DefaultPlugins (through the PongWindowPlugin).
///
pub struct PongPlugins;

impl Plugin for PongPlugins {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            PongWindowPlugin,
            FramePacePlugin::default(),
            FieldPlugin,
            PaddlePlugin,
            BallPlugin,
            SimulationPlugin::default(),
        ));
    }
}

// -------------------------------------------------------------------------------------------------
// Unit Tests
