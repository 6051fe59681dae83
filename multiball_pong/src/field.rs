//!
//! The field module sets up the scene the game is played in: the 2d camera looking at
//! the field, the black background, and the solid walls along the top and bottom edges.
//! The left and right edges are open.
//!

// -------------------------------------------------------------------------------------------------
// Included Symbols

use bevy::prelude::*;

use crate::common::*;

// -------------------------------------------------------------------------------------------------
// Public API

///
/// The FieldPlugin adds a single 2d camera centered on the field, a black background
/// rectangle of FIELD_WIDTH x FIELD_HEIGHT, and a WALL_THICKNESS tall white wall along
/// the top and bottom edges. One world unit maps to one window pixel.
///
pub struct FieldPlugin;

impl Plugin for FieldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera.in_set(Systems::CameraSetup))
            .add_systems(Startup, setup_field.in_set(Systems::FieldSetup));
    }
}

/// These SystemSets are used to control any system ordering dependencies on this plugin
#[derive(SystemSet, Debug, Clone, Hash, PartialEq, Eq)]
pub enum Systems {
    /// Creates the 2d camera entity. Must be in Startup.
    CameraSetup,

    /// Creates the background and wall entities. Must be in Startup.
    FieldSetup,
}

/// Marker for the two wall entities.
#[derive(Component, Debug)]
pub struct Wall;

// -------------------------------------------------------------------------------------------------
// Private Systems

// Sets up the 2D camera with the bottom-left corner of the field at the bottom-left of the window
fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, Transform::from_translation(FIELD_CENTER.extend(0f32))));
}

// Sets up the background and the top and bottom walls
fn setup_field(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn((
        Mesh2d(meshes.add(Rectangle::new(FIELD_WIDTH, FIELD_HEIGHT))),
        MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::BLACK))),
        Transform::from_translation(FIELD_CENTER.extend(Z_BACKGROUND)),
    ));

    let wall_mesh = meshes.add(Rectangle::new(FIELD_WIDTH, WALL_THICKNESS));
    let wall_material = materials.add(ColorMaterial::from_color(Color::WHITE));
    for wall_y in wall_centers() {
        commands.spawn((
            Wall,
            Mesh2d(wall_mesh.clone()),
            MeshMaterial2d(wall_material.clone()),
            Transform::from_translation(Vec3::new(FIELD_CENTER.x, wall_y, Z_SCENERY)),
        ));
    }
}

// -------------------------------------------------------------------------------------------------
// Private Functions

// Y coordinates of the centers of the bottom and top walls
fn wall_centers() -> [f32; 2] {
    let half = WALL_THICKNESS / 2f32;
    [half, FIELD_HEIGHT - half]
}

// -------------------------------------------------------------------------------------------------
// Unit Tests
