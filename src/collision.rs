use crate::body::Body;
use crate::params::{Parameters, CONTACT_EPSILON_SQ};

/// Overlapping but not coincident.
pub fn in_contact(a: &Body, b: &Body) -> bool {
    let dist_sq = (b.pos - a.pos).mag_sq();
    let reach = a.radius() + b.radius();
    dist_sq < reach * reach && dist_sq > CONTACT_EPSILON_SQ
}

/// Separates overlapping bodies and applies a restitution impulse if they are
/// still approaching. Returns whether the pair was in contact.
pub fn resolve_collision(a: &mut Body, b: &mut Body, params: &Parameters) -> bool {
    if !in_contact(a, b) {
        return false;
    }

    let delta = b.pos - a.pos;
    let dist_sq = delta.mag_sq();
    let reach = a.radius() + b.radius();

    let dist = dist_sq.sqrt();
    let overlap = reach - dist;
    // points from a towards b
    let normal = delta / dist;

    let total_mass = a.mass() + b.mass();
    let (share_a, share_b) = if total_mass > 0.0 {
        (b.mass() / total_mass, a.mass() / total_mass)
    } else {
        (0.5, 0.5)
    };
    a.pos -= normal * (overlap * share_a);
    b.pos += normal * (overlap * share_b);

    let closing = (b.vel - a.vel).dot(normal);
    if closing < 0.0 && total_mass > 0.0 {
        let scale = (1.0 + params.collision_restitution) * closing / total_mass;
        let impulse = normal * scale;
        a.vel += impulse * b.mass();
        b.vel -= impulse * a.mass();
    }

    true
}
