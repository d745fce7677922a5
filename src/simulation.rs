use ultraviolet::DVec3;

use crate::body::{Body, Species};
use crate::error::Result;
use crate::params::{Parameters, Space};
use crate::scheduler::{Execution, Scheduler, TickReport};
use crate::snapshot::Snapshot;
use crate::utils;

/// Owns the body collection and advances it one tick at a time.
///
/// Spawning and clearing take `&mut self`, so they can never overlap a tick.
/// Callers sharing a simulation across threads wrap it in a
/// `parking_lot::Mutex` and hold the lock for the whole tick.
pub struct Simulation {
    bodies: Vec<Body>,
    params: Parameters,
    scheduler: Scheduler,
    ticks: u64,
}

impl Simulation {
    pub fn new(params: Parameters, scheduler: Scheduler) -> Self {
        Self {
            bodies: Vec::new(),
            params,
            scheduler,
            ticks: 0,
        }
    }

    pub fn with_execution(params: Parameters, execution: Execution) -> Result<Self> {
        Ok(Self::new(params, Scheduler::new(execution, None)?))
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Direct access for collaborators that edit bodies between ticks.
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Takes effect from the next tick.
    pub fn set_parameters(&mut self, params: Parameters) {
        self.params = params;
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn spawn(&mut self, mut body: Body) {
        if self.params.space == Space::Planar {
            utils::flatten(std::slice::from_mut(&mut body));
        }
        self.bodies.push(body);
    }

    pub fn extend(&mut self, bodies: impl IntoIterator<Item = Body>) {
        for body in bodies {
            self.spawn(body);
        }
    }

    /// `count` bodies at random positions inside the domain.
    pub fn spawn_random(&mut self, species: Species, count: usize, rng: &mut fastrand::Rng) {
        let bodies = utils::scatter(species, count, self.params.half_extent, rng);
        self.extend(bodies);
        log::debug!("spawned {count} {}(s), {} bodies total", species.label(), self.len());
    }

    pub fn clear(&mut self) {
        log::debug!("cleared {} bodies", self.len());
        self.bodies.clear();
    }

    /// One step of `params.time_step`.
    pub fn tick(&mut self) -> TickReport {
        let dt = self.params.time_step;
        let report = self.scheduler.step(&mut self.bodies, &self.params, dt);
        self.ticks += 1;
        report
    }

    pub fn total_momentum(&self) -> DVec3 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.bodies, self.params.space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> Simulation {
        Simulation::with_execution(Parameters::default(), Execution::Sequential).unwrap()
    }

    #[test]
    fn spawn_and_clear() {
        let mut sim = sim();
        let mut rng = fastrand::Rng::with_seed(11);
        sim.spawn_random(Species::Electron, 5, &mut rng);
        sim.spawn(Body::proton(DVec3::zero(), DVec3::zero()));
        assert_eq!(sim.len(), 6);
        assert_eq!(sim.bodies()[5].species(), Species::Proton);

        sim.clear();
        assert!(sim.is_empty());
        assert_eq!(sim.tick(), TickReport::default());
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn planar_spawns_are_flattened() {
        let params = Parameters {
            space: Space::Planar,
            ..Parameters::default()
        };
        let mut sim = Simulation::with_execution(params, Execution::Sequential).unwrap();
        sim.spawn_random(Species::Neutron, 10, &mut fastrand::Rng::with_seed(2));
        assert!(sim.bodies().iter().all(|b| b.pos.z == 0.0 && b.vel.z == 0.0));
        assert_eq!(sim.snapshot().records[0].position.len(), 2);
    }

    #[test]
    fn parameter_changes_apply_next_tick() {
        let mut sim = sim();
        sim.spawn(Body::electron(DVec3::zero(), DVec3::new(100.0, 0.0, 0.0)));
        sim.set_parameters(Parameters {
            max_speed: 1.0,
            ..Parameters::default()
        });
        sim.tick();
        assert!(sim.bodies()[0].vel.mag() <= 1.0 + 1e-12);
    }
}
