//! Pairwise force law.
//!
//! Every term returns the force acting on `a`; the scheduler applies the
//! negated sum to `b`. Terms are summed in a fixed order because the swirl
//! adjustment rewrites whatever has been accumulated before it.

use ultraviolet::DVec3;

use crate::body::Body;
use crate::params::{Parameters, Space, StrongFalloff, DISTANCE_EPSILON};

/// Geometry shared by all terms of one pair.
#[derive(Debug, Clone, Copy)]
pub struct Separation {
    /// Unit vector from `a` towards `b`.
    pub dir: DVec3,
    pub dist: f64,
    pub dist_sq: f64,
}

impl Separation {
    /// `None` when the bodies are coincident.
    pub fn between(a: &Body, b: &Body) -> Option<Self> {
        let delta = b.pos - a.pos;
        let dist_sq = delta.mag_sq();
        let dist = dist_sq.sqrt();
        if dist < DISTANCE_EPSILON {
            return None;
        }
        Some(Self {
            dir: delta / dist,
            dist,
            dist_sq,
        })
    }
}

/// Net force on `a` from `b`.
pub fn compute_force(a: &Body, b: &Body, params: &Parameters) -> DVec3 {
    let Some(sep) = Separation::between(a, b) else {
        return DVec3::zero();
    };

    let mut force = coulomb(&sep, a, b, params);
    swirl(&mut force, &sep, a, b, params);
    force += strong(&sep, a, b, params);
    force += gravity(&sep, a, b, params);
    force
}

/// Signed Coulomb magnitude; positive means repulsion.
pub fn coulomb_magnitude(sep: &Separation, a: &Body, b: &Body, params: &Parameters) -> f64 {
    params.coulomb_constant * a.charge() * b.charge() / sep.dist_sq
}

pub fn coulomb(sep: &Separation, a: &Body, b: &Body, params: &Parameters) -> DVec3 {
    sep.dir * -coulomb_magnitude(sep, a, b, params)
}

/// Which member of the pair is the orbiting electron, if the pair swirls at all.
fn swirling_electron<'a>(a: &'a Body, b: &'a Body) -> Option<(&'a Body, f64)> {
    if a.species().is_electron() && b.charge() > 0.0 {
        Some((a, 1.0))
    } else if b.species().is_electron() && a.charge() > 0.0 {
        Some((b, -1.0))
    } else {
        None
    }
}

/// Near an electron/positive pair, flips the force accumulated so far and
/// adds a tangential push along the electron's existing motion.
pub fn swirl(force: &mut DVec3, sep: &Separation, a: &Body, b: &Body, params: &Parameters) {
    let Some((electron, side)) = swirling_electron(a, b) else {
        return;
    };
    if sep.dist >= a.radius() + b.radius() + params.swirl_margin {
        return;
    }

    *force = -*force;

    let Some(mut tangent) = tangent(sep.dir, params.space) else {
        return;
    };
    if tangent.dot(electron.vel) < 0.0 {
        tangent = -tangent;
    }

    let magnitude = params.swirl_ratio * coulomb_magnitude(sep, a, b, params).abs();
    *force += tangent * (magnitude * side);
}

fn tangent(dir: DVec3, space: Space) -> Option<DVec3> {
    let raw = match space {
        Space::Planar => DVec3::new(-dir.y, dir.x, 0.0),
        Space::Volumetric => dir.cross(DVec3::unit_y()),
    };
    let mag = raw.mag();
    if mag < DISTANCE_EPSILON {
        None
    } else {
        Some(raw / mag)
    }
}

pub fn strong_magnitude(dist: f64, params: &Parameters) -> f64 {
    let inverse_cube = params.strong_constant / (dist * dist * dist);
    match params.strong_falloff {
        StrongFalloff::InverseCube => inverse_cube,
        StrongFalloff::Screened => {
            let inner = params.strong_inner_radius;
            inverse_cube * (-(dist - inner) / inner).exp()
        }
    }
}

/// Nucleon-only well: repulsive inside the inner radius, attractive out to
/// the outer radius, zero beyond.
pub fn strong(sep: &Separation, a: &Body, b: &Body, params: &Parameters) -> DVec3 {
    let nucleons = a.species().is_nucleon() && b.species().is_nucleon();
    if !nucleons || sep.dist > params.strong_outer_radius {
        return DVec3::zero();
    }

    let magnitude = strong_magnitude(sep.dist, params);
    if sep.dist < params.strong_inner_radius {
        sep.dir * -magnitude
    } else {
        sep.dir * magnitude
    }
}

pub fn gravity(sep: &Separation, a: &Body, b: &Body, params: &Parameters) -> DVec3 {
    sep.dir * (params.gravity_constant * a.mass() * b.mass() / sep.dist_sq)
}
