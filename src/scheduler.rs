//! One tick of the engine.
//!
//! A tick runs four phases separated by full barriers:
//! 1. reset every net-force accumulator,
//! 2. visit every unordered pair `i < j`: accumulate forces and resolve contact,
//! 3. integrate velocities,
//! 4. integrate positions.
//!
//! In parallel mode phase 2 splits the outer index range into contiguous
//! chunks, one per worker. Each worker sums forces into its own scratch array
//! and the arrays are merged into the bodies once every worker has joined.
//! Force evaluation only reads bodies, so it runs under shared guards.
//! Contact resolution writes bodies directly and takes exclusive guards on
//! both bodies, lower index first, only for pairs found overlapping.

use std::ops::Range;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use ultraviolet::DVec3;

use crate::body::Body;
use crate::collision::{in_contact, resolve_collision};
use crate::error::Result;
use crate::forces::compute_force;
use crate::params::Parameters;

pub static HARDWARE_WORKERS: Lazy<usize> = Lazy::new(|| {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    Sequential,
    #[default]
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub pairs: usize,
    pub collisions: usize,
}

pub struct Scheduler {
    execution: Execution,
    /// Only built for parallel execution.
    pool: Option<rayon::ThreadPool>,
}

impl Scheduler {
    /// `workers` defaults to the available hardware concurrency.
    pub fn new(execution: Execution, workers: Option<usize>) -> Result<Self> {
        let pool = match execution {
            Execution::Sequential => None,
            Execution::Parallel => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers.unwrap_or(*HARDWARE_WORKERS).max(1))
                    .thread_name(|i| format!("pair-worker-{i}"))
                    .build()?,
            ),
        };
        let scheduler = Self { execution, pool };
        log::debug!(
            "scheduler ready: {:?} on {} worker(s)",
            execution,
            scheduler.workers()
        );
        Ok(scheduler)
    }

    pub fn sequential() -> Result<Self> {
        Self::new(Execution::Sequential, None)
    }

    pub fn parallel() -> Result<Self> {
        Self::new(Execution::Parallel, None)
    }

    pub fn execution(&self) -> Execution {
        self.execution
    }

    pub fn workers(&self) -> usize {
        self.pool.as_ref().map_or(1, |pool| pool.current_num_threads())
    }

    /// Advances `bodies` by one tick of length `dt`. Blocks until every
    /// phase has finished, so no work from this tick outlives the call.
    pub fn step(&self, bodies: &mut [Body], params: &Parameters, dt: f64) -> TickReport {
        let report = match &self.pool {
            None => {
                bodies.iter_mut().for_each(Body::reset_force);
                let report = accumulate_sequential(bodies, params);
                bodies
                    .iter_mut()
                    .for_each(|body| body.integrate_velocity(dt, params));
                bodies
                    .iter_mut()
                    .for_each(|body| body.integrate_position(dt, params));
                report
            }
            Some(pool) => pool.install(|| {
                bodies.par_iter_mut().for_each(Body::reset_force);
                let report = accumulate_parallel(bodies, params, pool.current_num_threads());
                bodies
                    .par_iter_mut()
                    .for_each(|body| body.integrate_velocity(dt, params));
                bodies
                    .par_iter_mut()
                    .for_each(|body| body.integrate_position(dt, params));
                report
            }),
        };
        log::trace!(
            "tick: {} bodies, {} pairs, {} collisions",
            bodies.len(),
            report.pairs,
            report.collisions
        );
        report
    }
}

/// Force on `a` for this pair, after which the pair's contact is resolved.
fn interact(a: &mut Body, b: &mut Body, params: &Parameters) -> (DVec3, bool) {
    let force = compute_force(a, b, params);
    let collided = resolve_collision(a, b, params);
    (force, collided)
}

fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

pub fn accumulate_sequential(bodies: &mut [Body], params: &Parameters) -> TickReport {
    let mut collisions = 0;
    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            let (force, collided) = interact(a, b, params);
            a.add_force(force);
            b.add_force(-force);
            collisions += collided as usize;
        }
    }
    TickReport {
        pairs: pair_count(bodies.len()),
        collisions,
    }
}

/// Contiguous outer-index ranges, the last one absorbing the remainder.
pub fn partition(n: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.clamp(1, n.max(1));
    let chunk = n / workers;
    (0..workers)
        .map(|w| {
            let start = w * chunk;
            let end = if w == workers - 1 { n } else { start + chunk };
            start..end
        })
        .collect()
}

pub fn accumulate_parallel(
    bodies: &mut [Body],
    params: &Parameters,
    workers: usize,
) -> TickReport {
    let n = bodies.len();
    if n < 2 {
        return TickReport::default();
    }

    let cells: Vec<RwLock<&mut Body>> = bodies.iter_mut().map(RwLock::new).collect();
    let partials: Vec<(Vec<DVec3>, usize)> = partition(n, workers)
        .into_par_iter()
        .map(|outer| {
            let mut scratch = vec![DVec3::zero(); n];
            let mut collisions = 0;
            for i in outer {
                for j in (i + 1)..n {
                    let (force, touching) = {
                        let a = cells[i].read();
                        let b = cells[j].read();
                        (compute_force(&a, &b, params), in_contact(&a, &b))
                    };
                    scratch[i] += force;
                    scratch[j] -= force;

                    if touching {
                        let mut a = cells[i].write();
                        let mut b = cells[j].write();
                        // another worker may have separated them meanwhile
                        collisions += resolve_collision(&mut a, &mut b, params) as usize;
                    }
                }
            }
            (scratch, collisions)
        })
        .collect();
    drop(cells);

    let mut collisions = 0;
    for (scratch, count) in &partials {
        for (body, force) in bodies.iter_mut().zip(scratch) {
            body.add_force(*force);
        }
        collisions += count;
    }

    TickReport {
        pairs: pair_count(n),
        collisions,
    }
}
