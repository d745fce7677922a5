//! Tunables read by the engine at the start of every tick.
//!
//! The engine treats a [`Parameters`] value as immutable for the duration of
//! a tick and never checks it. Collaborators that build one from user input
//! call [`Parameters::validate`] first.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Separations below this are treated as coincident and produce no force.
pub const DISTANCE_EPSILON: f64 = 1e-8;

/// Squared separation below which a contact normal is undefined.
pub const CONTACT_EPSILON_SQ: f64 = 1e-9;

/// Number of active coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    /// x and y only; z is left untouched.
    Planar,
    #[default]
    Volumetric,
}

impl Space {
    pub fn axes(self) -> usize {
        match self {
            Space::Planar => 2,
            Space::Volumetric => 3,
        }
    }
}

/// What happens when a body leaves the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Clamp inside the walls and send the velocity component back inwards.
    #[default]
    Reflect,
    /// Re-enter through the opposite face.
    Wrap,
}

/// Radial profile of the strong-force analogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrongFalloff {
    /// `k / d³`
    #[default]
    InverseCube,
    /// `k / d³ · exp(-(d - inner) / inner)`
    Screened,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub coulomb_constant: f64,
    pub strong_constant: f64,
    pub strong_inner_radius: f64,
    pub strong_outer_radius: f64,
    pub strong_falloff: StrongFalloff,
    pub gravity_constant: f64,

    pub max_speed: f64,
    /// Velocity multiplier applied after every velocity integration.
    pub drag: f64,

    /// The domain is the cube `[-half_extent, half_extent]` on every active axis.
    pub half_extent: f64,
    pub boundary: BoundaryPolicy,
    pub wall_restitution: f64,

    pub collision_restitution: f64,

    /// Extra reach beyond touching radii within which the swirl term acts.
    pub swirl_margin: f64,
    /// Tangential swirl magnitude as a fraction of the Coulomb magnitude.
    pub swirl_ratio: f64,

    pub time_step: f64,
    pub space: Space,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            coulomb_constant: 4e5,
            strong_constant: 6e5,
            strong_inner_radius: 9.0,
            strong_outer_radius: 27.0,
            strong_falloff: StrongFalloff::InverseCube,
            gravity_constant: 1e1,
            max_speed: 1e4,
            drag: 0.90,
            half_extent: 500.0,
            boundary: BoundaryPolicy::Reflect,
            wall_restitution: 1.0,
            collision_restitution: 0.7,
            swirl_margin: 20.0,
            swirl_ratio: 0.5,
            time_step: 1.0 / 60.0,
            space: Space::Volumetric,
        }
    }
}

impl Parameters {
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Rejects values the engine would accept but that make no physical sense.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("coulomb_constant", self.coulomb_constant),
            ("strong_constant", self.strong_constant),
            ("strong_inner_radius", self.strong_inner_radius),
            ("strong_outer_radius", self.strong_outer_radius),
            ("gravity_constant", self.gravity_constant),
            ("max_speed", self.max_speed),
            ("drag", self.drag),
            ("half_extent", self.half_extent),
            ("wall_restitution", self.wall_restitution),
            ("collision_restitution", self.collision_restitution),
            ("swirl_margin", self.swirl_margin),
            ("swirl_ratio", self.swirl_ratio),
            ("time_step", self.time_step),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(invalid(name, "must be finite"));
            }
            if value < 0.0 {
                return Err(invalid(name, "must not be negative"));
            }
        }

        for (name, value) in [
            ("half_extent", self.half_extent),
            ("max_speed", self.max_speed),
            ("time_step", self.time_step),
            ("strong_inner_radius", self.strong_inner_radius),
        ] {
            if value == 0.0 {
                return Err(invalid(name, "must be positive"));
            }
        }

        if self.strong_inner_radius > self.strong_outer_radius {
            return Err(invalid(
                "strong_inner_radius",
                "must not exceed strong_outer_radius",
            ));
        }

        for (name, value) in [
            ("drag", self.drag),
            ("wall_restitution", self.wall_restitution),
            ("collision_restitution", self.collision_restitution),
        ] {
            if value > 1.0 {
                return Err(invalid(name, "must lie in [0, 1]"));
            }
        }

        Ok(())
    }
}

fn invalid(name: &'static str, reason: &'static str) -> SimError {
    SimError::InvalidParameter { name, reason }
}
