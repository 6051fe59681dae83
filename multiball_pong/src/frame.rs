//!
//! Frame pacing for the game loop. At the end of every frame, the remaining part of the
//! frame budget (if any) is slept away on a monotonic clock, which caps the frame rate
//! without spinning the CPU. Frames that already ran over budget start the next frame
//! immediately.
//!

// -------------------------------------------------------------------------------------------------
// Included Symbols

use std::thread;
use std::time::{Duration, Instant};

use bevy::prelude::*;

// -------------------------------------------------------------------------------------------------
// Constants

const DEFAULT_FRAME_TIME: Duration = Duration::from_millis(16);

// -------------------------------------------------------------------------------------------------
// Public API

///
/// Plugin which holds every frame to at least frame_time. It adds a FrameLimiter resource
/// and a system at the end of the Last schedule which sleeps out the rest of the budget.
///
pub struct FramePacePlugin {
    pub frame_time: Duration,
}

impl Default for FramePacePlugin {
    fn default() -> Self {
        FramePacePlugin {
            frame_time: DEFAULT_FRAME_TIME,
        }
    }
}

impl Plugin for FramePacePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(FrameLimiter::new(self.frame_time))
            .add_systems(Last, limit_frame_rate.in_set(Systems::Limit));
    }
}

/// System sets exposed by the FramePacePlugin.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Systems {
    /// The system that sleeps out the frame budget. Runs in Last.
    Limit,
}

///
/// Tracks when the previous frame was released, so the limiter can tell how much of
/// the budget for the current frame is left.
///
#[derive(Resource, Debug)]
pub struct FrameLimiter {
    frame_time: Duration,
    last_frame: Option<Instant>,
}

impl FrameLimiter {
    /// New limiter with the given per-frame budget. The first frame is never delayed.
    pub fn new(frame_time: Duration) -> Self {
        FrameLimiter {
            frame_time,
            last_frame: None,
        }
    }

    /// The per-frame budget.
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    ///
    /// Part of the budget still left at the given instant, measured from the end of the
    /// previous frame. Zero before the first frame and once the budget is used up.
    ///
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_frame {
            Some(last) => self.frame_time.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    // Marks the given instant as the start of the next frame.
    fn mark(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }
}

// -------------------------------------------------------------------------------------------------
// Private Systems

// Sleeps away whatever is left of this frame's budget, then starts the clock for the next one
fn limit_frame_rate(mut limiter: ResMut<FrameLimiter>) {
    let wait = limiter.remaining(Instant::now());
    if !wait.is_zero() {
        thread::sleep(wait);
    }
    limiter.mark(Instant::now());
}

// -------------------------------------------------------------------------------------------------
// Unit Tests
