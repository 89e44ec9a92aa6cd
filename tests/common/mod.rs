//! Shared helpers for integration tests.

use smartstate::core::{Transform, Vec3};
use smartstate::world::{Body, Targets};

/// Route engine logs to the test harness. Safe to call from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// World with the player at `player` and nothing else tracked.
#[allow(dead_code)]
pub fn player_at(player: Vec3) -> Targets {
    Targets::new([player])
}

/// A body with no behavior of its own.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(dead_code)]
pub struct Crate {
    pub transform: Transform,
}

impl Body for Crate {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }
}
