//!
//! This module contains a subset of items that are relevant across the multiball pong
//! codebase and will be included by many of the core modules.
//!

// -------------------------------------------------------------------------------------------------
// Included Symbols

use bevy::prelude::*;

// -------------------------------------------------------------------------------------------------
// Constants

/// Width of the playing field in world units (one unit per window pixel)
pub const FIELD_WIDTH: f32 = 1024.0;
/// Height of the playing field in world units (one unit per window pixel)
pub const FIELD_HEIGHT: f32 = 768.0;
/// Thickness of the top and bottom walls. Paddles and balls share this size.
pub const WALL_THICKNESS: f32 = 15.0;
/// Center point of the field, where every ball is released from
pub const FIELD_CENTER: Vec2 = Vec2::new(FIELD_WIDTH / 2f32, FIELD_HEIGHT / 2f32);

/// Z index for background
pub const Z_BACKGROUND: f32 = -2f32;
/// Z index for static scenery drawn over the background (walls)
pub const Z_SCENERY: f32 = -1f32;
/// Z index for components in the foreground (paddles and balls)
pub const Z_FOREGROUND: f32 = 1f32;

// -------------------------------------------------------------------------------------------------
// Re-Exports

pub use PlayerId::Player1;
pub use PlayerId::Player2;

// -------------------------------------------------------------------------------------------------
// Public Types

/// PlayerId to differentiate between the left (1) and right (2) side of the field
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlayerId {
    Player1,
    Player2,
}

// -------------------------------------------------------------------------------------------------
// Public Traits and Blanket Impls

///
/// A trait that can be implemented for any type that contains some data T for both
/// of the 2 players in the game. It allows retrieval of the data per-player.
///
pub trait AsPerPlayerData<T> {
    ///
    /// Consumes the value and returns a tuple of T types for players 1 and 2.
    /// The first tuple item is for player 1. The second is for player 2.
    ///
    fn as_per_player(self) -> (T, T);
}

impl<T, U> AsPerPlayerData<T> for U
where
    U: Iterator<Item = (PlayerId, T)>,
{
    ///
    /// Consumes the iterator (assuming it contains exactly 1 entry for each player)
    /// and sorts the two entries into (player 1, player 2) order. Panics if the
    /// iterator does not hold exactly one entry per player.
    ///
    fn as_per_player(mut self) -> (T, T) {
        let (Some(first), Some(second), None) = (self.next(), self.next(), self.next()) else {
            panic!("Expected exactly 1 iterator entry for each player");
        };

        match (first.0, second.0) {
            (Player1, Player2) => (first.1, second.1),
            (Player2, Player1) => (second.1, first.1),
            (pid, _) => panic!("Expected 1 iterator entry for each player. Got 2 for {pid:?}"),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Unit Tests
