//! A single boid and the ordered steering stages that make up its tick.
//!
//! Each tick runs, in order:
//! 1. [`Boid::fly_with_flock`]: scan the other boids and accumulate
//! 2. [`Boid::avoid_other_boids`]: separation
//! 3. [`Boid::follow_neighbors`]: alignment and cohesion
//! 4. [`Boid::avoid_edges`]
//! 5. [`Boid::constrain_speed`]
//! 6. [`Boid::integrate`]
//! 7. [`Boid::constrain_position`]
//!
//! Later stages consume what earlier ones left in the accumulators.

#[cfg(feature = "std")]
use rand::Rng;

use crate::bounds::Bounds;
use crate::config::BoidConfig;
use crate::error::BoidError;
use crate::vector::Vector3D;

/// Position and velocity of a boid, as seen by its neighbors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vector3D,
    pub velocity: Vector3D,
}

/// A single boid entity
#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Vector3D,
    pub velocity: Vector3D,
    bounds: Bounds,
    closeness: Vector3D,
    avg_velocity: Vector3D,
    avg_position: Vector3D,
    num_neighbors: usize,
}

impl Boid {
    /// Creates a boid with an explicit state.
    ///
    /// The velocity must be non-zero, otherwise the first speed clamp fails
    /// with [`BoidError::ZeroVelocity`].
    pub fn new(position: Vector3D, velocity: Vector3D, bounds: Bounds) -> Self {
        Self {
            position,
            velocity,
            bounds,
            closeness: Vector3D::ZERO,
            avg_velocity: Vector3D::ZERO,
            avg_position: Vector3D::ZERO,
            num_neighbors: 0,
        }
    }

    /// Creates a boid anywhere inside `bounds`, moving towards +x/+y.
    ///
    /// The x and y velocity components are at least 5, so the initial
    /// velocity is never zero.
    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Self {
        let position = Vector3D::new(
            bounds.left() + bounds.width() * rng.gen::<f64>(),
            bounds.top() + bounds.height() * rng.gen::<f64>(),
            bounds.back() + bounds.depth() * rng.gen::<f64>(),
        );
        let velocity = Vector3D::new(
            5.0 * (1.0 + rng.gen::<f64>()),
            5.0 * (1.0 + rng.gen::<f64>()),
            10.0 * rng.gen::<f64>(),
        );
        Self::new(position, velocity, bounds)
    }

    /// Same as [`Boid::random`] with a deterministic generator.
    #[cfg(feature = "std")]
    pub fn seeded(bounds: Bounds, seed: u64) -> Self {
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self::random(bounds, &mut rng)
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            position: self.position,
            velocity: self.velocity,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    /// Sum of displacements away from boids inside the protected range.
    pub fn closeness(&self) -> Vector3D {
        self.closeness
    }

    pub fn avg_velocity(&self) -> Vector3D {
        self.avg_velocity
    }

    pub fn avg_position(&self) -> Vector3D {
        self.avg_position
    }

    pub fn num_neighbors(&self) -> usize {
        self.num_neighbors
    }

    /// Resets the accumulators and scans `others`, which must not include
    /// this boid.
    pub fn fly_with_flock<I>(&mut self, others: I, config: &BoidConfig)
    where
        I: IntoIterator<Item = Kinematics>,
    {
        self.closeness = Vector3D::ZERO;
        self.avg_velocity = Vector3D::ZERO;
        self.avg_position = Vector3D::ZERO;
        self.num_neighbors = 0;

        for other in others {
            let distance = self.position.distance(&other.position);
            if distance < config.protected_range {
                self.closeness += self.position - other.position;
            }
            if distance < config.visible_range {
                self.avg_velocity += other.velocity;
                self.avg_position += other.position;
                self.num_neighbors += 1;
            }
        }
    }

    /// Separation: push away from boids inside the protected range.
    pub fn avoid_other_boids(&mut self, config: &BoidConfig) {
        self.velocity = self.velocity + self.closeness * config.avoid_factor;
    }

    /// Alignment and cohesion. A no-op without visible neighbors.
    pub fn follow_neighbors(&mut self, config: &BoidConfig) {
        if self.num_neighbors == 0 {
            return;
        }

        let count = self.num_neighbors as f64;
        self.avg_velocity /= count;
        self.avg_position /= count;
        self.velocity = self.velocity + (self.avg_velocity - self.velocity) * config.matching_factor;
        self.velocity =
            self.velocity + (self.avg_position - self.position) * config.centering_factor;
    }

    /// Turns away from walls, each axis checked on its own.
    pub fn avoid_edges(&mut self, config: &BoidConfig) {
        let b = &self.bounds;
        let p = self.position;
        let mut v = self.velocity;

        if p.x < b.left() + config.margin {
            v.x += config.turn_factor;
        }
        if p.x > b.right() - config.margin {
            v.x -= config.turn_factor;
        }
        if p.y < b.top() + config.margin {
            v.y += config.turn_factor;
        }
        if p.y > b.bottom() - config.margin {
            v.y -= config.turn_factor;
        }
        if p.z < b.back() + config.margin {
            v.z += config.turn_factor;
        }
        if p.z > b.front() - config.front_margin {
            v.z -= config.turn_factor;
        }

        self.velocity = v;
    }

    /// Rescales the velocity into `[min_speed, max_speed]`.
    pub fn constrain_speed(&mut self, config: &BoidConfig) -> Result<(), BoidError> {
        let speed = self.velocity.magnitude();
        if speed == 0.0 || !speed.is_finite() {
            return Err(BoidError::ZeroVelocity);
        }

        if speed > config.max_speed {
            self.velocity = (self.velocity * config.max_speed) / speed;
        } else if speed < config.min_speed {
            self.velocity = (self.velocity * config.min_speed) / speed;
        }
        Ok(())
    }

    /// Explicit Euler step with a unit timestep.
    pub fn integrate(&mut self) {
        self.position = self.position + self.velocity;
    }

    pub fn constrain_position(&mut self) {
        self.position = self.bounds.clamp(self.position);
    }

    /// Runs every stage of one tick against `others`.
    pub fn update<I>(&mut self, others: I, config: &BoidConfig) -> Result<(), BoidError>
    where
        I: IntoIterator<Item = Kinematics>,
    {
        self.fly_with_flock(others, config);
        self.avoid_other_boids(config);
        self.follow_neighbors(config);
        self.avoid_edges(config);
        self.constrain_speed(config)?;
        self.integrate();
        self.constrain_position();
        Ok(())
    }
}
