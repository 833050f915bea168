//! Bevy test app builders.

use bevy::prelude::*;
use nectar_core::config::NectarConfig;

/// Create a minimal test app with only the core plugin.
///
/// Provides `NectarSet` system ordering, `NectarConfig` and `SeedHierarchy`
/// but no arena systems.
pub fn minimal_test_app() -> App {
    configured_test_app(NectarConfig::default())
}

/// Minimal test app with a caller-supplied config inserted before the core
/// plugin builds.
pub fn configured_test_app(config: NectarConfig) -> App {
    let mut app = App::new();
    app.insert_resource(config);
    app.add_plugins(nectar_core::NectarCorePlugin);
    app.finish();
    app.cleanup();
    app
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
