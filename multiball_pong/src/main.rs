use bevy::prelude::*;

use multiball_pong::PongPlugins;

fn main() -> AppExit {
    App::new().add_plugins(PongPlugins).run()
}
