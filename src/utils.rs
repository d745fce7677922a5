use crate::body::{Body, Species};
use ultraviolet::DVec3;

/// Offset between the members of one seeded electron/proton/neutron triplet.
const TRIPLET_SPACING: f64 = 100.0;
const SPAWN_SPEED: f64 = 5.0;

fn symmetric(rng: &mut fastrand::Rng, half: f64) -> f64 {
    (rng.f64() * 2.0 - 1.0) * half
}

fn random_point(rng: &mut fastrand::Rng, half_extent: f64) -> DVec3 {
    DVec3::new(
        symmetric(rng, half_extent),
        symmetric(rng, half_extent),
        symmetric(rng, half_extent),
    )
}

fn random_velocity(rng: &mut fastrand::Rng) -> DVec3 {
    DVec3::new(
        symmetric(rng, SPAWN_SPEED),
        symmetric(rng, SPAWN_SPEED),
        symmetric(rng, SPAWN_SPEED),
    )
}

/// `count` bodies of one species scattered uniformly through the domain.
pub fn scatter(
    species: Species,
    count: usize,
    half_extent: f64,
    rng: &mut fastrand::Rng,
) -> Vec<Body> {
    (0..count)
        .map(|_| {
            let pos = random_point(rng, half_extent);
            Body::new(species, pos, random_velocity(rng))
        })
        .collect()
}

/// Electron at a random point, proton and neutron offset diagonally either
/// side of it. Members may start outside the domain; the first tick pulls
/// them back in.
pub fn triplet_cloud(count: usize, half_extent: f64, rng: &mut fastrand::Rng) -> Vec<Body> {
    let offset = DVec3::broadcast(TRIPLET_SPACING);
    let mut bodies = Vec::with_capacity(count * 3);

    for _ in 0..count {
        let p = random_point(rng, half_extent);
        bodies.push(Body::electron(p, random_velocity(rng)));
        bodies.push(Body::proton(p + offset, random_velocity(rng)));
        bodies.push(Body::neutron(p - offset, random_velocity(rng)));
    }

    bodies
}

/// Zeroes the z component for planar runs.
pub fn flatten(bodies: &mut [Body]) {
    for body in bodies {
        body.pos.z = 0.0;
        body.vel.z = 0.0;
    }
}
