//!
//! This crate contains helper functions to drive and validate bevy systems from unit
//! tests, without building a full App: checking plugin wiring, stepping a system with a
//! simulated frame delta, faking keyboard state, and draining buffered messages.
//!

// -------------------------------------------------------------------------------------------------
// Included Symbols

use std::time::Duration;

use bevy::ecs::message::Message;
use bevy::ecs::schedule::ScheduleBuildError;
use bevy::ecs::schedule::ScheduleLabel;
use bevy::ecs::system::SystemId;
use bevy::prelude::*;

use core::any::type_name;

// -------------------------------------------------------------------------------------------------
// Public API

/// The prelude includes all basic members of this crate and should be included with prelude::*
pub mod prelude {
    pub use super::{drain_messages, press_keys, run_system_after, validate_sys_in_plugin};
}

///
/// Validates the presence of the given system, within the given schedule, after installing
/// the given plugin in a new App. Optionally (if not None), a system set may be specified
/// too, in which case this function also validates the system was added as part of
/// the given set during the plugin build.
///
pub fn validate_sys_in_plugin<P, L, S, Marker, SS>(
    plugin: P,
    schedule: L,
    system: S,
    set: Option<SS>,
) where
    P: Plugin,
    L: ScheduleLabel + Clone,
    S: IntoSystemSet<Marker>,
    SS: SystemSet,
{
    let mut app = App::new();
    app.add_plugins(plugin);

    let found_system = app
        .get_schedule(schedule.clone())
        .unwrap_or_else(|| {
            panic!(
                "Expected {} schedule to exist in app after adding {} plugin",
                type_name::<L>(),
                type_name::<P>(),
            )
        })
        .graph()
        .systems
        .iter()
        .any(|(_, boxed_sys, _)| boxed_sys.name().to_string() == type_name::<S>());

    assert!(
        found_system,
        "Expected to find system {} in schedule {} after adding {} plugin",
        type_name::<S>(),
        type_name::<L>(),
        type_name::<P>(),
    );

    let Some(set) = set else {
        return;
    };

    // Ordering a set before one of its own members is a build error, so a failed build
    // here proves the system is in the set.
    app.configure_sets(schedule.clone(), set.before(system));
    let init_result = app
        .world_mut()
        .try_schedule_scope(schedule, |world, sched| sched.initialize(world))
        .unwrap_or_else(|err| panic!("Expected schedule to exist in app, got {err}"));
    let Err(ScheduleBuildError::SetsHaveOrderButIntersect(..)) = init_result else {
        panic!(
            concat!(
                "Expected {} schedule build to fail, ",
                "since {} should be in {} system set. But it succeeded unexpectedly, ",
                "suggesting the system is not in the set as it should be"
            ),
            type_name::<L>(),
            type_name::<S>(),
            type_name::<SS>(),
        );
    };
}

///
/// Advances the world's Time and Time<Real> resources by the given delta (adding them
/// first if they are missing) and then runs the registered system once. This mimics one
/// frame of the Update schedule for a single system, whichever clock it reads.
///
pub fn run_system_after<O: 'static>(world: &mut World, system: SystemId<(), O>, delta: Duration) -> O {
    if !world.contains_resource::<Time>() {
        world.init_resource::<Time>();
    }
    if !world.contains_resource::<Time<Real>>() {
        world.init_resource::<Time<Real>>();
    }
    world.resource_mut::<Time>().advance_by(delta);
    world.resource_mut::<Time<Real>>().advance_by(delta);

    world
        .run_system(system)
        .unwrap_or_else(|err| panic!("Expected system to run successfully, got {err}"))
}

///
/// Replaces the world's keyboard state with one where exactly the given keys are held.
///
pub fn press_keys(world: &mut World, keys: &[KeyCode]) {
    let mut button_input = ButtonInput::<KeyCode>::default();
    for key in keys {
        button_input.press(*key);
    }
    world.insert_resource(button_input);
}

///
/// Reads every message of type M currently buffered in the world, in write order,
/// and clears the buffer. The Messages<M> resource is added if it is missing.
///
pub fn drain_messages<M: Message + Clone>(world: &mut World) -> Vec<M> {
    if !world.contains_resource::<Messages<M>>() {
        world.init_resource::<Messages<M>>();
    }
    world.resource_mut::<Messages<M>>().drain().collect()
}

// -------------------------------------------------------------------------------------------------
// Unit Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Message, Clone, Debug, PartialEq)]
    struct Ping(u32);

    #[derive(Resource, Default)]
    struct Seen(Vec<f32>);

    fn record_delta(time: Res<Time>, mut seen: ResMut<Seen>) {
        seen.0.push(time.delta_secs());
    }

    fn record_real_delta(time: Res<Time<Real>>, mut seen: ResMut<Seen>) {
        seen.0.push(time.delta_secs());
    }

    #[test]
    fn test_run_system_after_advances_time() {
        let mut world = World::default();
        world.init_resource::<Seen>();
        let sys = world.register_system(record_delta);

        run_system_after(&mut world, sys, Duration::from_millis(20));
        run_system_after(&mut world, sys, Duration::from_millis(40));

        let seen = &world.resource::<Seen>().0;
        assert_eq!(seen.len(), 2, "Expected system to run twice");
        assert!((seen[0] - 0.02).abs() < 0.00001, "Expected first delta 20ms, got {}", seen[0]);
        assert!((seen[1] - 0.04).abs() < 0.00001, "Expected second delta 40ms, got {}", seen[1]);
    }

    #[test]
    fn test_run_system_after_advances_real_time() {
        let mut world = World::default();
        world.init_resource::<Seen>();
        let sys = world.register_system(record_real_delta);

        run_system_after(&mut world, sys, Duration::from_secs(31));

        let seen = &world.resource::<Seen>().0;
        assert_eq!(seen, &vec![31f32], "Expected the real clock advanced by the full delta");
    }

    #[test]
    fn test_press_keys() {
        let mut world = World::default();
        press_keys(&mut world, &[KeyCode::KeyA]);
        press_keys(&mut world, &[KeyCode::KeyB]);

        let keys = world.resource::<ButtonInput<KeyCode>>();
        assert!(!keys.pressed(KeyCode::KeyA), "Expected earlier key state to be replaced");
        assert!(keys.pressed(KeyCode::KeyB), "Expected KeyB to be held");
    }

    #[test]
    fn test_drain_messages() {
        let mut world = World::default();
        assert!(
            drain_messages::<Ping>(&mut world).is_empty(),
            "Expected no messages in a fresh world"
        );

        world.write_message(Ping(1));
        world.write_message(Ping(2));
        assert_eq!(drain_messages::<Ping>(&mut world), vec![Ping(1), Ping(2)]);
        assert!(
            drain_messages::<Ping>(&mut world).is_empty(),
            "Expected messages to be gone after draining"
        );
    }
}
