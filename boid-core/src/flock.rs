//! Flock drivers: own a fixed set of boids and advance all of them once per
//! tick, in insertion order.

#[cfg(feature = "std")]
use rand::{rngs::StdRng, SeedableRng};

use crate::boid::{Boid, Kinematics};
use crate::bounds::Bounds;
use crate::config::{BoidConfig, UpdateMode};
use crate::error::BoidError;

/// Every kinematics entry except the one at `index`.
fn others(snapshot: &[Kinematics], index: usize) -> impl Iterator<Item = Kinematics> + '_ {
    snapshot[..index]
        .iter()
        .chain(snapshot[index + 1..].iter())
        .copied()
}

/// Computes the next state of every boid from `snapshot` without touching
/// `boids`, so the caller decides whether to commit.
fn plan_tick<'a>(
    boids: &'a [Boid],
    snapshot: &'a [Kinematics],
    config: &'a BoidConfig,
) -> impl Iterator<Item = Result<Boid, BoidError>> + 'a {
    boids.iter().enumerate().map(move |(i, boid)| {
        let mut next = boid.clone();
        next.update(others(snapshot, i), config)?;
        Ok(next)
    })
}

/// Advances boids one after the other. Boid `i` reads boids `0..i` in their
/// already advanced state.
fn step_in_place(boids: &mut [Boid], config: &BoidConfig) -> Result<(), BoidError> {
    for i in 0..boids.len() {
        let (before, rest) = boids.split_at_mut(i);
        if let Some((current, after)) = rest.split_first_mut() {
            let neighbors = before.iter().chain(after.iter()).map(Boid::kinematics);
            current.update(neighbors, config)?;
        }
    }
    Ok(())
}

/// Fails unless `boid` clamps to the same box as its flock.
fn check_bounds(bounds: &Bounds, boid: &Boid, index: usize) -> Result<(), BoidError> {
    if boid.bounds() == bounds {
        Ok(())
    } else {
        Err(BoidError::BoundsMismatch { index })
    }
}

/// Logs the outcome of a tick and advances the counter on success.
fn finish_tick(tick_count: &mut u64, result: Result<(), BoidError>) -> Result<(), BoidError> {
    match result {
        Ok(()) => {
            *tick_count += 1;
            log::trace!("tick {} done", tick_count);
            Ok(())
        }
        Err(e) => {
            log::warn!("tick {} failed: {}", *tick_count + 1, e);
            Err(e)
        }
    }
}

/// A collection of boids for embedded (no_std) environments
pub struct Flock<const N: usize> {
    boids: heapless::Vec<Boid, N>,
    bounds: Bounds,
    config: BoidConfig,
    tick_count: u64,
}

impl<const N: usize> Flock<N> {
    pub fn new(bounds: Bounds, config: BoidConfig) -> Result<Self, BoidError> {
        config.validate()?;
        log::debug!("created fixed flock with capacity {}", N);
        Ok(Self {
            boids: heapless::Vec::new(),
            bounds,
            config,
            tick_count: 0,
        })
    }

    /// Registers `boid`, which must use the flock's bounds.
    pub fn add_boid(&mut self, boid: Boid) -> Result<(), BoidError> {
        check_bounds(&self.bounds, &boid, self.boids.len())?;
        self.boids
            .push(boid)
            .map_err(|_| BoidError::FlockFull { capacity: N })
    }

    /// Advances every boid by one tick.
    ///
    /// In [`UpdateMode::Snapshot`] a failed tick leaves the flock untouched.
    pub fn tick(&mut self) -> Result<(), BoidError> {
        let result = match self.config.update_mode {
            UpdateMode::Snapshot => {
                let snapshot: heapless::Vec<Kinematics, N> =
                    self.boids.iter().map(Boid::kinematics).collect();
                let next: Result<heapless::Vec<Boid, N>, _> =
                    plan_tick(&self.boids, &snapshot, &self.config).collect();
                next.map(|next| self.boids = next)
            }
            UpdateMode::InPlace => step_in_place(&mut self.boids, &self.config),
        };
        finish_tick(&mut self.tick_count, result)
    }

    pub fn run(&mut self, ticks: u64) -> Result<(), BoidError> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn config(&self) -> &BoidConfig {
        &self.config
    }
}

/// A collection of boids for std environments
#[cfg(feature = "std")]
pub struct FlockStd {
    boids: Vec<Boid>,
    bounds: Bounds,
    config: BoidConfig,
    rng: StdRng,
    tick_count: u64,
}

#[cfg(feature = "std")]
impl FlockStd {
    /// Creates `count` random boids from an entropy seeded generator.
    pub fn new(bounds: Bounds, count: usize, config: BoidConfig) -> Result<Self, BoidError> {
        Self::build(bounds, count, config, StdRng::from_entropy())
    }

    /// Creates `count` random boids; the same seed yields the same flock.
    pub fn with_seed(
        bounds: Bounds,
        count: usize,
        config: BoidConfig,
        seed: u64,
    ) -> Result<Self, BoidError> {
        Self::build(bounds, count, config, StdRng::seed_from_u64(seed))
    }

    /// Wraps boids that were built elsewhere. Every boid must use `bounds`.
    pub fn from_boids(
        bounds: Bounds,
        boids: Vec<Boid>,
        config: BoidConfig,
    ) -> Result<Self, BoidError> {
        config.validate()?;
        for (index, boid) in boids.iter().enumerate() {
            check_bounds(&bounds, boid, index)?;
        }
        Ok(Self {
            boids,
            bounds,
            config,
            rng: StdRng::from_entropy(),
            tick_count: 0,
        })
    }

    fn build(
        bounds: Bounds,
        count: usize,
        config: BoidConfig,
        rng: StdRng,
    ) -> Result<Self, BoidError> {
        config.validate()?;
        let mut flock = Self {
            boids: Vec::with_capacity(count),
            bounds,
            config,
            rng,
            tick_count: 0,
        };
        for _ in 0..count {
            flock.spawn();
        }
        log::debug!(
            "created flock of {} boids in {:?} ({:?} updates)",
            count,
            bounds,
            config.update_mode
        );
        Ok(flock)
    }

    /// Creates a random boid inside the flock bounds and registers it.
    pub fn spawn(&mut self) -> &Boid {
        let boid = Boid::random(self.bounds, &mut self.rng);
        self.boids.push(boid);
        &self.boids[self.boids.len() - 1]
    }

    /// Registers `boid`, which must use the flock's bounds.
    pub fn add_boid(&mut self, boid: Boid) -> Result<(), BoidError> {
        check_bounds(&self.bounds, &boid, self.boids.len())?;
        self.boids.push(boid);
        Ok(())
    }

    /// Advances every boid by one tick.
    ///
    /// In [`UpdateMode::Snapshot`] a failed tick leaves the flock untouched.
    pub fn tick(&mut self) -> Result<(), BoidError> {
        let result = match self.config.update_mode {
            UpdateMode::Snapshot => {
                let snapshot: Vec<Kinematics> = self.boids.iter().map(Boid::kinematics).collect();
                let next: Result<Vec<Boid>, _> =
                    plan_tick(&self.boids, &snapshot, &self.config).collect();
                next.map(|next| self.boids = next)
            }
            UpdateMode::InPlace => step_in_place(&mut self.boids, &self.config),
        };
        finish_tick(&mut self.tick_count, result)
    }

    pub fn run(&mut self, ticks: u64) -> Result<(), BoidError> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn config(&self) -> &BoidConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3D;

    const EPS: f64 = 1e-9;

    fn screen() -> Bounds {
        Bounds::new((0.0, 1000.0), (0.0, 800.0), (0.0, 255.0)).unwrap()
    }

    fn line_of_boids(bounds: Bounds) -> Vec<Boid> {
        let velocity = Vector3D::new(0.0, 12.0, 0.0);
        (0..3)
            .map(|i| Boid::new(Vector3D::new(20.0 * i as f64, 0.0, 500.0), velocity, bounds))
            .collect()
    }

    fn assert_invariants(flock: &FlockStd) {
        let config = flock.config();
        for boid in flock.boids() {
            assert!(flock.bounds().contains(&boid.position), "{:?}", boid.position);
            let speed = boid.speed();
            assert!(
                speed >= config.min_speed - EPS && speed <= config.max_speed + EPS,
                "speed {} out of range",
                speed
            );
        }
    }

    #[test]
    fn test_flock_creation() {
        let flock = FlockStd::new(screen(), 50, BoidConfig::default()).unwrap();
        assert_eq!(flock.len(), 50);
        assert_eq!(flock.tick_count(), 0);
        assert_eq!(flock.bounds().width(), 1000.0);
    }

    #[test]
    fn test_flock_rejects_invalid_config() {
        let config = BoidConfig {
            max_speed: 1.0,
            ..BoidConfig::default()
        };
        assert!(matches!(
            FlockStd::new(screen(), 5, config),
            Err(BoidError::InvalidConfig(_))
        ));
        assert!(Flock::<4>::new(screen(), config).is_err());
    }

    #[test]
    fn test_seeded_flocks_are_reproducible() {
        let mut a = FlockStd::with_seed(screen(), 10, BoidConfig::default(), 7).unwrap();
        let mut b = FlockStd::with_seed(screen(), 10, BoidConfig::default(), 7).unwrap();
        a.run(25).unwrap();
        b.run(25).unwrap();
        assert_eq!(a.boids(), b.boids());
    }

    #[test]
    fn test_flock_spawn_registers_boid() {
        let mut flock = FlockStd::with_seed(screen(), 3, BoidConfig::default(), 1).unwrap();
        let spawned = flock.spawn().clone();
        assert_eq!(flock.len(), 4);
        assert_eq!(flock.boids()[3], spawned);

        flock.add_boid(Boid::seeded(screen(), 99)).unwrap();
        assert_eq!(flock.len(), 5);
    }

    #[test]
    fn test_flock_update() {
        let mut flock = FlockStd::new(screen(), 10, BoidConfig::default()).unwrap();
        let initial_positions: Vec<_> = flock.boids().iter().map(|b| b.position).collect();

        flock.tick().unwrap();

        let changed = flock
            .boids()
            .iter()
            .zip(initial_positions.iter())
            .any(|(b, initial)| b.position != *initial);
        assert!(changed);
        assert_eq!(flock.tick_count(), 1);
    }

    #[test]
    fn test_invariants_hold_over_many_ticks() {
        let mut flock = FlockStd::with_seed(screen(), 10, BoidConfig::default(), 2024).unwrap();
        for _ in 0..1000 {
            flock.tick().unwrap();
            assert_invariants(&flock);
        }
        assert_eq!(flock.tick_count(), 1000);
    }

    #[test]
    fn test_in_place_invariants_hold_over_many_ticks() {
        let config = BoidConfig {
            update_mode: UpdateMode::InPlace,
            ..BoidConfig::default()
        };
        let mut flock = FlockStd::with_seed(screen(), 30, config, 5).unwrap();
        for _ in 0..300 {
            flock.tick().unwrap();
            assert_invariants(&flock);
        }
    }

    #[test]
    fn test_snapshot_tick_reads_start_of_tick_state() {
        let bounds = Bounds::cube(1000.0).unwrap();
        let boids = line_of_boids(bounds);

        let mut flock = FlockStd::from_boids(bounds, boids.clone(), BoidConfig::default()).unwrap();
        flock.tick().unwrap();

        // Each boid must match an update against the untouched originals.
        for (i, boid) in boids.iter().enumerate() {
            let mut expected = boid.clone();
            let neighbors = boids
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, b)| b.kinematics());
            expected.update(neighbors, &BoidConfig::default()).unwrap();
            assert_eq!(flock.boids()[i], expected);
        }
    }

    #[test]
    fn test_in_place_tick_reads_advanced_neighbors() {
        let bounds = Bounds::cube(1000.0).unwrap();
        let boids = line_of_boids(bounds);
        let in_place = BoidConfig {
            update_mode: UpdateMode::InPlace,
            ..BoidConfig::default()
        };

        let mut snapshot_flock =
            FlockStd::from_boids(bounds, boids.clone(), BoidConfig::default()).unwrap();
        let mut in_place_flock = FlockStd::from_boids(bounds, boids, in_place).unwrap();
        snapshot_flock.tick().unwrap();
        in_place_flock.tick().unwrap();

        // The first boid sees the same flock either way.
        assert_eq!(snapshot_flock.boids()[0], in_place_flock.boids()[0]);
        // Later boids see their predecessors after they moved.
        assert_ne!(
            snapshot_flock.boids()[1].position,
            in_place_flock.boids()[1].position
        );
    }

    #[test]
    fn test_snapshot_tick_is_order_independent() {
        let bounds = screen();
        let mut forward = FlockStd::with_seed(bounds, 12, BoidConfig::default(), 11).unwrap();
        let reversed_boids: Vec<Boid> = forward.boids().iter().rev().cloned().collect();
        let mut reversed =
            FlockStd::from_boids(bounds, reversed_boids, BoidConfig::default()).unwrap();

        forward.tick().unwrap();
        reversed.tick().unwrap();

        for (a, b) in forward.boids().iter().zip(reversed.boids().iter().rev()) {
            assert!((a.position - b.position).magnitude() < EPS);
            assert!((a.velocity - b.velocity).magnitude() < EPS);
        }
    }

    #[test]
    fn test_failed_snapshot_tick_leaves_flock_unchanged() {
        let bounds = Bounds::cube(1000.0).unwrap();
        let mut boids = line_of_boids(bounds);
        // Isolated and motionless: nothing can give it a heading.
        boids.push(Boid::new(
            Vector3D::new(0.0, 0.0, 200.0),
            Vector3D::ZERO,
            bounds,
        ));

        let mut flock = FlockStd::from_boids(bounds, boids.clone(), BoidConfig::default()).unwrap();
        assert_eq!(flock.tick(), Err(BoidError::ZeroVelocity));
        assert_eq!(flock.boids(), boids.as_slice());
        assert_eq!(flock.tick_count(), 0);
    }

    #[test]
    fn test_two_boids_repel_along_separating_axis() {
        let bounds = Bounds::cube(1000.0).unwrap();
        let velocity = Vector3D::new(0.0, 12.0, 0.0);
        let boids = vec![
            Boid::new(Vector3D::new(0.0, 0.0, 500.0), velocity, bounds),
            Boid::new(Vector3D::new(5.0, 0.0, 500.0), velocity, bounds),
        ];
        let mut flock = FlockStd::from_boids(bounds, boids, BoidConfig::default()).unwrap();

        flock.tick().unwrap();

        let a = &flock.boids()[0];
        let b = &flock.boids()[1];
        assert!(a.velocity.x < 0.0);
        assert!(b.velocity.x > 0.0);
        assert!((a.velocity.x + b.velocity.x).abs() < EPS);
        assert!(a.position.distance(&b.position) > 5.0);
    }

    #[test]
    fn test_fixed_flock_capacity() {
        let mut flock = Flock::<2>::new(screen(), BoidConfig::default()).unwrap();
        assert!(flock.is_empty());
        flock.add_boid(Boid::seeded(screen(), 1)).unwrap();
        flock.add_boid(Boid::seeded(screen(), 2)).unwrap();
        assert_eq!(
            flock.add_boid(Boid::seeded(screen(), 3)),
            Err(BoidError::FlockFull { capacity: 2 })
        );
        assert_eq!(flock.len(), 2);
    }

    #[test]
    fn test_fixed_flock_matches_std_flock() {
        let bounds = screen();
        let mut std_flock = FlockStd::with_seed(bounds, 8, BoidConfig::default(), 3).unwrap();
        let mut fixed = Flock::<8>::new(bounds, BoidConfig::default()).unwrap();
        for boid in std_flock.boids() {
            fixed.add_boid(boid.clone()).unwrap();
        }

        for _ in 0..50 {
            std_flock.tick().unwrap();
            fixed.tick().unwrap();
        }

        assert_eq!(std_flock.boids(), fixed.boids());
        assert_eq!(fixed.tick_count(), 50);
    }

    #[test]
    fn test_failed_in_place_tick_keeps_earlier_moves() {
        let bounds = Bounds::cube(1000.0).unwrap();
        let mover = Boid::new(
            Vector3D::new(0.0, 0.0, 100.0),
            Vector3D::new(12.0, 0.0, 0.0),
            bounds,
        );
        let stuck = Boid::new(Vector3D::new(500.0, 500.0, 500.0), Vector3D::ZERO, bounds);
        let config = BoidConfig {
            update_mode: UpdateMode::InPlace,
            ..BoidConfig::default()
        };
        let mut flock = FlockStd::from_boids(bounds, vec![mover, stuck.clone()], config).unwrap();

        assert_eq!(flock.tick(), Err(BoidError::ZeroVelocity));

        // The first boid already moved; the failing one and the counter did not.
        assert_eq!(flock.boids()[0].position, Vector3D::new(12.0, 0.0, 100.0));
        assert_eq!(flock.boids()[1].position, stuck.position);
        assert_eq!(flock.boids()[1].velocity, Vector3D::ZERO);
        assert_eq!(flock.tick_count(), 0);
    }

    #[test]
    fn test_flock_rejects_boids_with_other_bounds() {
        let flock_bounds = Bounds::cube(100.0).unwrap();
        let wide = Bounds::cube(1000.0).unwrap();
        let stray = Boid::new(
            Vector3D::new(90.0, 0.0, 50.0),
            Vector3D::new(12.0, 0.0, 0.0),
            wide,
        );

        assert_eq!(
            FlockStd::from_boids(flock_bounds, vec![stray.clone()], BoidConfig::default()).err(),
            Some(BoidError::BoundsMismatch { index: 0 })
        );

        let mut flock = FlockStd::with_seed(flock_bounds, 2, BoidConfig::default(), 4).unwrap();
        assert_eq!(
            flock.add_boid(stray.clone()),
            Err(BoidError::BoundsMismatch { index: 2 })
        );
        assert_eq!(flock.len(), 2);

        let mut fixed = Flock::<4>::new(flock_bounds, BoidConfig::default()).unwrap();
        assert_eq!(
            fixed.add_boid(stray),
            Err(BoidError::BoundsMismatch { index: 0 })
        );
        assert!(fixed.is_empty());
    }

    #[test]
    fn test_fixed_flock_run_and_failed_tick() {
        let bounds = Bounds::cube(1000.0).unwrap();
        let mut fixed = Flock::<4>::new(bounds, BoidConfig::default()).unwrap();
        for boid in line_of_boids(bounds) {
            fixed.add_boid(boid).unwrap();
        }
        fixed.run(10).unwrap();
        assert_eq!(fixed.tick_count(), 10);

        fixed
            .add_boid(Boid::new(Vector3D::new(0.0, 0.0, 200.0), Vector3D::ZERO, bounds))
            .unwrap();
        let before: Vec<Boid> = fixed.boids().to_vec();
        assert_eq!(fixed.run(5), Err(BoidError::ZeroVelocity));
        assert_eq!(fixed.boids(), before.as_slice());
        assert_eq!(fixed.tick_count(), 10);
    }
}
