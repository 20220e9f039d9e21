#![cfg_attr(not(feature = "std"), no_std)]

//! Core of the 3D flocking simulation: vector algebra, the per-boid steering
//! rules and the flock driver that advances every boid once per tick.
//!
//! The crate builds without `std` (using `libm` and `heapless`) so the same
//! rules can run on embedded targets through [`Flock`]. With the default
//! `std` feature, [`FlockStd`] adds a heap backed flock and random spawning.

mod float;

pub mod boid;
pub mod bounds;
pub mod config;
pub mod error;
pub mod flock;
pub mod vector;

pub use boid::{Boid, Kinematics};
pub use bounds::{Axis, Bounds};
pub use config::{BoidConfig, UpdateMode};
pub use error::BoidError;
pub use flock::Flock;
#[cfg(feature = "std")]
pub use flock::FlockStd;
pub use vector::Vector3D;
