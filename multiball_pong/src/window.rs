//!
//! The window module contains code to set up the base engine and create the fixed size
//! window in which the game is played, along with the key that quits it.
//!

// -------------------------------------------------------------------------------------------------
// Included Symbols

use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::window::WindowMode;
use bevy::window::WindowResolution;

use crate::common::*;

// -------------------------------------------------------------------------------------------------
// Constants

const PONG_WINDOW_TITLE: &str = "Multiball Pong";
const EXIT_WINDOW_KEY: KeyCode = KeyCode::Escape;

// -------------------------------------------------------------------------------------------------
// Public API

///
/// The PongWindowPlugin adds the engine's DefaultPlugins with a single window sized
/// exactly to the field. The window cannot be resized and never goes fullscreen.
/// Pressing Escape exits the app. Frame pacing is left to the FramePacePlugin, so
/// vsync is turned off.
///
pub struct PongWindowPlugin;

impl Plugin for PongWindowPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(primary_window()),
            ..default()
        }))
        .add_systems(Update, handle_exit_pressed);
    }
}

// -------------------------------------------------------------------------------------------------
// Private Systems

// Detects when the exit key is pressed, and gracefully shuts down the window and app
fn handle_exit_pressed(keys: Res<ButtonInput<KeyCode>>, mut exit_msgs: MessageWriter<AppExit>) {
    if keys.just_pressed(EXIT_WINDOW_KEY) {
        info!("Exit requested from keyboard");
        exit_msgs.write(AppExit::Success);
    }
}

// -------------------------------------------------------------------------------------------------
// Private Functions

// Window settings for the one and only game window
fn primary_window() -> Window {
    Window {
        title: PONG_WINDOW_TITLE.to_string(),
        resolution: WindowResolution::new(FIELD_WIDTH as u32, FIELD_HEIGHT as u32),
        resizable: false,
        mode: WindowMode::Windowed,
        present_mode: PresentMode::AutoNoVsync,
        ..default()
    }
}

// -------------------------------------------------------------------------------------------------
// Unit Tests
