//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`RIGID2D_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use rigid2d_math::Vec2;
use rigid2d_physics::{PhysicsConfig, ReactionType};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// Simulation loop configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsSection,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl SimConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`RIGID2D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        // Load default config (required)
        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // RIGID2D_SIMULATION__TICKS=100 -> simulation.ticks = 100
        figment = figment.merge(Env::prefixed("RIGID2D_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Simulation loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed timestep in seconds
    pub timestep: f64,
    /// Number of ticks to run
    pub ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            ticks: 600,
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSection {
    /// Gravitational acceleration [x, y]
    pub gravity: [f64; 2],
    /// Collision reaction mode
    pub reaction: ReactionType,
}

impl Default for PhysicsSection {
    fn default() -> Self {
        Self {
            gravity: [0.0, -20.0],
            reaction: ReactionType::FrictionAndImpulse,
        }
    }
}

impl PhysicsSection {
    /// The world-level physics configuration this section describes.
    pub fn to_physics_config(&self) -> PhysicsConfig {
        PhysicsConfig {
            gravity: Vec2::new(self.gravity[0], self.gravity[1]),
            reaction: self.reaction,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log every body's position each tick
    pub trace_bodies: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trace_bodies: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
