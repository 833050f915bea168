//! Arena builder for constructing a fully configured Bevy [`App`].
//!
//! [`ArenaBuilder`] composes a simulation from a [`NectarConfig`], an
//! [`ArenaLayout`] and any number of foragers.
//!
//! # Example
//!
//! ```no_run
//! use nectar_agent::HomingPolicy;
//! use nectar_sim::{ArenaBuilder, ArenaLayout};
//!
//! let arena = ArenaBuilder::new()
//!     .with_layout(ArenaLayout::ring(4, 3, 3.0))
//!     .with_forager(HomingPolicy::default())
//!     .build()
//!     .unwrap();
//! ```

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use nectar_agent::Forager;
use nectar_core::config::NectarConfig;
use nectar_core::error::NectarError;
use nectar_core::traits::DecisionSource;
use nectar_physics::PointMassBody;

use crate::NectarSimPlugin;
use crate::components::{Brain, ContactMemory, ManualControl, PendingAction, StepReport};
use crate::layout::ArenaLayout;

// ---------------------------------------------------------------------------
// SpawnedArena
// ---------------------------------------------------------------------------

/// Result of building an arena: the Bevy app plus the forager entities.
pub struct SpawnedArena {
    /// The fully configured Bevy application.
    pub app: App,
    /// Forager entities in the order they were added.
    pub foragers: Vec<Entity>,
}

impl SpawnedArena {
    /// Run `n` ticks.
    pub fn step_n(&mut self, n: usize) {
        for _ in 0..n {
            self.app.update();
        }
    }

    pub fn forager(&self, index: usize) -> Option<&Forager> {
        let entity = *self.foragers.get(index)?;
        self.app.world().get::<Forager>(entity)
    }
}

// ---------------------------------------------------------------------------
// ForagerEntry
// ---------------------------------------------------------------------------

/// Internal representation of a forager to spawn.
struct ForagerEntry {
    brain: Option<Brain>,
    manual: bool,
}

// ---------------------------------------------------------------------------
// ArenaBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for a complete arena.
pub struct ArenaBuilder {
    config: NectarConfig,
    layout: ArenaLayout,
    foragers: Vec<ForagerEntry>,
    log_level: Option<Level>,
}

impl Default for ArenaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: NectarConfig::default(),
            layout: ArenaLayout::default(),
            foragers: Vec::new(),
            log_level: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: NectarConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: ArenaLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Install Bevy's log subscriber at `level`. Without this the app emits
    /// nothing unless the caller sets up its own subscriber.
    #[must_use]
    pub fn with_logging(mut self, level: Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Add a forager driven by `source`.
    #[must_use]
    pub fn with_forager(mut self, source: impl DecisionSource) -> Self {
        self.foragers.push(ForagerEntry {
            brain: Some(Brain::new(source)),
            manual: false,
        });
        self
    }

    /// Add a forager steered from the `ManualInput` resource.
    #[must_use]
    pub fn with_manual_forager(mut self) -> Self {
        self.foragers.push(ForagerEntry {
            brain: None,
            manual: true,
        });
        self
    }

    /// Build the Bevy [`App`] with all plugins, resources and foragers.
    ///
    /// # Errors
    ///
    /// Returns [`NectarError`] if the config is invalid or the layout does
    /// not form a valid flower field.
    pub fn build(self) -> Result<SpawnedArena, NectarError> {
        self.config.validate()?;
        let field = self.layout.build_field(&self.config.arena)?;
        let scene = self.layout.build_scene(&self.config.arena, &field);

        let mut app = App::new();
        if let Some(level) = self.log_level {
            app.add_plugins(LogPlugin {
                level,
                ..default()
            });
        }
        app.insert_resource(self.config.clone())
            .insert_resource(field)
            .insert_resource(scene)
            .add_plugins(NectarSimPlugin);

        app.finish();
        app.cleanup();

        let mut foragers = Vec::with_capacity(self.foragers.len());
        for entry in self.foragers {
            let mut entity = app.world_mut().spawn((
                Forager::from_config(&self.config)?,
                PointMassBody::from_config(&self.config.agent),
                PendingAction::default(),
                ContactMemory::default(),
                StepReport::default(),
            ));
            if let Some(brain) = entry.brain {
                entity.insert(brain);
            }
            if entry.manual {
                entity.insert(ManualControl);
            }
            foragers.push(entity.id());
        }
        info!(
            "Arena built: {} flowers, {} forager(s), training {}",
            self.layout.flowers.len(),
            foragers.len(),
            self.config.training_mode
        );

        Ok(SpawnedArena { app, foragers })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
