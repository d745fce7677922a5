use charged_particles::{
    resolve_collision, Body, BoundaryPolicy, DVec3, Parameters, Space, Species,
};
use proptest::prelude::*;

fn species() -> impl Strategy<Value = Species> {
    prop_oneof![
        Just(Species::Electron),
        Just(Species::Proton),
        Just(Species::Neutron),
        Just(Species::Generic),
    ]
}

fn vec3(range: f64) -> impl Strategy<Value = DVec3> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

proptest! {
    #[test]
    fn reflect_keeps_bodies_inside_and_under_speed_cap(
        species in species(),
        pos in vec3(1000.0),
        vel in vec3(1e5),
        max_speed in 1.0f64..5000.0,
        restitution in 0.0f64..=1.0,
        dt in 0.001f64..0.2,
    ) {
        let params = Parameters {
            half_extent: 500.0,
            max_speed,
            wall_restitution: restitution,
            ..Parameters::default()
        };
        let mut body = Body::new(species, pos, vel);
        body.integrate_position(dt, &params);

        let limit = params.half_extent - body.radius();
        for c in [body.pos.x, body.pos.y, body.pos.z] {
            prop_assert!(c >= -limit && c <= limit, "{} outside ±{}", c, limit);
        }
        prop_assert!(body.vel.mag() <= max_speed * (1.0 + 1e-12));
    }

    #[test]
    fn wrap_keeps_bodies_in_domain(
        pos in vec3(500.0),
        vel in vec3(1e4),
        dt in 0.001f64..0.2,
        planar in any::<bool>(),
    ) {
        let params = Parameters {
            half_extent: 500.0,
            boundary: BoundaryPolicy::Wrap,
            space: if planar { Space::Planar } else { Space::Volumetric },
            ..Parameters::default()
        };
        let mut body = Body::electron(pos, vel);
        body.integrate_position(dt, &params);

        let wrapped = [body.pos.x, body.pos.y, body.pos.z];
        for c in wrapped.iter().take(params.space.axes()) {
            prop_assert!(*c >= -500.0 && *c < 500.0, "{} escaped", c);
        }
        prop_assert!(body.vel.mag() <= params.max_speed * (1.0 + 1e-12));
    }

    #[test]
    fn massless_velocity_never_changes(vel in vec3(100.0), force in vec3(1e9)) {
        let mut body = Body::custom(DVec3::zero(), vel, 1.0, 0.0);
        body.add_force(force);
        body.integrate_velocity(0.1, &Parameters::default());
        prop_assert_eq!(body.vel, vel);
    }

    #[test]
    fn separated_pairs_are_not_collided(
        a in species(),
        b in species(),
        dir in vec3(1.0),
        gap in 0.0f64..100.0,
        va in vec3(50.0),
        vb in vec3(50.0),
    ) {
        prop_assume!(dir.mag() > 1e-3);
        let params = Parameters::default();
        let mut first = Body::new(a, DVec3::zero(), va);
        let sized = Body::new(b, DVec3::zero(), vb);
        let dist = first.radius() + sized.radius() + gap + 1e-6;
        let mut second = Body::new(b, dir.normalized() * dist, vb);
        let (before_first, before_second) = (first, second);

        prop_assert!(!resolve_collision(&mut first, &mut second, &params));
        prop_assert_eq!(first, before_first);
        prop_assert_eq!(second, before_second);
    }
}
