//! Configuration system
//!
//! Physics configuration is supplied by the surrounding world: the world
//! bounds that root every quadtree and the subdivision granularity.
//! Files are read as TOML or RON depending on their extension.

pub use serde::{Serialize, Deserialize};

use crate::geom::Rectangle;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        log::info!("Loading configuration from {}", path);

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value parsed correctly but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default quadtree granularity (decent on both large and small worlds)
pub const DEFAULT_WORLD_DIVISIONS: u32 = 6;

/// Rectangle the collision world lives in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width in world units
    pub width: f32,
    /// Height in world units
    pub height: f32,
}

impl WorldBounds {
    /// Create bounds from position and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Convert to a geometry rectangle
    pub fn to_rectangle(self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.width, self.height)
    }

    /// Check that the bounds describe a usable, non-degenerate area
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all_finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());

        if !all_finite {
            return Err(ConfigError::Invalid(format!(
                "world bounds must be finite, got {:?}",
                self
            )));
        }

        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "world bounds must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }

        Ok(())
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 800.0, 600.0)
    }
}

/// Physics configuration consumed by the collision system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Bounds every overlap check builds its quadtree over
    pub world_bounds: WorldBounds,

    /// Quadtree granularity; nodes stop splitting once both sides are
    /// below `(width + height) / (2 * divisions)` of the root
    pub world_divisions: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            world_bounds: WorldBounds::default(),
            world_divisions: DEFAULT_WORLD_DIVISIONS,
        }
    }
}

impl Config for PhysicsConfig {}

impl PhysicsConfig {
    /// Check every field, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world_bounds.validate()?;

        if self.world_divisions == 0 {
            return Err(ConfigError::Invalid(
                "world_divisions must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
