use serde::{Deserialize, Serialize};
use ultraviolet::DVec3;

use crate::params::{BoundaryPolicy, Parameters, Space};

/// Closed classification deciding which pair terms apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Electron,
    Proton,
    Neutron,
    Generic,
}

impl Species {
    pub fn is_nucleon(self) -> bool {
        matches!(self, Species::Proton | Species::Neutron)
    }

    pub fn is_electron(self) -> bool {
        matches!(self, Species::Electron)
    }

    pub fn label(self) -> &'static str {
        match self {
            Species::Electron => "electron",
            Species::Proton => "proton",
            Species::Neutron => "neutron",
            Species::Generic => "generic",
        }
    }

    /// Default `(charge, mass)`; `Generic` has none and gets a neutral unit body.
    pub fn defaults(self) -> (f64, f64) {
        match self {
            Species::Electron => (-1.0, 10.0),
            Species::Proton => (1.0, 100.0),
            Species::Neutron => (0.0, 100.0),
            Species::Generic => (0.0, 1.0),
        }
    }

    fn radius(self, charge: f64, mass: f64) -> f64 {
        match self {
            Species::Proton | Species::Neutron => 9.0,
            Species::Electron => 3.0,
            Species::Generic => (3.0 + (mass + charge) * 0.05).max(MIN_RADIUS),
        }
    }
}

const MIN_RADIUS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: DVec3,
    pub vel: DVec3,
    force: DVec3,
    mass: f64,
    charge: f64,
    species: Species,
    radius: f64,
}

impl Body {
    pub fn new(species: Species, pos: DVec3, vel: DVec3) -> Self {
        let (charge, mass) = species.defaults();
        Self::with_charge_and_mass(species, pos, vel, charge, mass)
    }

    pub fn electron(pos: DVec3, vel: DVec3) -> Self {
        Self::new(Species::Electron, pos, vel)
    }

    pub fn proton(pos: DVec3, vel: DVec3) -> Self {
        Self::new(Species::Proton, pos, vel)
    }

    pub fn neutron(pos: DVec3, vel: DVec3) -> Self {
        Self::new(Species::Neutron, pos, vel)
    }

    /// A `Generic` body whose radius grows with mass and charge.
    pub fn custom(pos: DVec3, vel: DVec3, charge: f64, mass: f64) -> Self {
        Self::with_charge_and_mass(Species::Generic, pos, vel, charge, mass)
    }

    /// Any species with explicit charge and mass. Mass is not checked.
    pub fn with_charge_and_mass(
        species: Species,
        pos: DVec3,
        vel: DVec3,
        charge: f64,
        mass: f64,
    ) -> Self {
        Self {
            pos,
            vel,
            force: DVec3::zero(),
            mass,
            charge,
            species,
            radius: species.radius(charge, mass),
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn net_force(&self) -> DVec3 {
        self.force
    }

    pub fn momentum(&self) -> DVec3 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.mag_sq()
    }

    pub fn reset_force(&mut self) {
        self.force = DVec3::zero();
    }

    pub fn add_force(&mut self, force: DVec3) {
        self.force += force;
    }

    /// `v += F/m · dt`, then drag. Massless bodies are left alone.
    pub fn integrate_velocity(&mut self, dt: f64, params: &Parameters) {
        if self.mass == 0.0 {
            return;
        }
        let acc = self.force / self.mass;
        self.vel += acc * dt;
        self.vel *= params.drag;
        if params.space == Space::Planar {
            self.vel.z = 0.0;
        }
    }

    /// Clamps speed, advances position and applies the boundary policy.
    pub fn integrate_position(&mut self, dt: f64, params: &Parameters) {
        let speed = self.vel.mag();
        if speed > params.max_speed {
            self.vel *= params.max_speed / speed;
        }

        self.pos += self.vel * dt;

        let h = params.half_extent;
        let axes = params.space.axes();
        let radius = self.radius;
        let restitution = params.wall_restitution;
        for (pos, vel) in axes_mut(&mut self.pos, &mut self.vel).into_iter().take(axes) {
            match params.boundary {
                BoundaryPolicy::Reflect => reflect(pos, vel, h, radius, restitution),
                BoundaryPolicy::Wrap => *pos = wrap(*pos, h),
            }
        }
    }
}

fn axes_mut<'a>(pos: &'a mut DVec3, vel: &'a mut DVec3) -> [(&'a mut f64, &'a mut f64); 3] {
    [
        (&mut pos.x, &mut vel.x),
        (&mut pos.y, &mut vel.y),
        (&mut pos.z, &mut vel.z),
    ]
}

fn reflect(pos: &mut f64, vel: &mut f64, h: f64, radius: f64, restitution: f64) {
    let lo = -h + radius;
    let hi = h - radius;
    if *pos < lo {
        *pos = lo;
        *vel = vel.abs() * restitution;
    } else if *pos > hi {
        *pos = hi;
        *vel = -vel.abs() * restitution;
    }
}

fn wrap(pos: f64, h: f64) -> f64 {
    let width = 2.0 * h;
    let wrapped = (pos + h).rem_euclid(width) - h;
    // rem_euclid can round up to exactly `width` for tiny negative inputs
    if wrapped >= h {
        -h
    } else {
        wrapped
    }
}
