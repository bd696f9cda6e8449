//! Primitive random draws shared by the game and player models.
//!
//! Every helper consumes a fixed number of values from the generator
//! regardless of its parameters, except [`poisson`] with a non-positive mean.

use rand::Rng;
use rand_distr::{Distribution, Poisson, StandardNormal};

use crate::config::FlooredNormal;

#[inline]
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

/// `N(mean, std)`; `std = 0` still consumes one draw.
#[inline]
pub fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std: f64) -> f64 {
    mean + std * standard_normal(rng)
}

#[inline]
pub fn floored<R: Rng + ?Sized>(rng: &mut R, prior: FlooredNormal) -> f64 {
    normal(rng, prior.mean, prior.std).max(prior.floor)
}

/// Poisson count as f64. Zero for a non-positive or non-finite mean.
pub fn poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> f64 {
    if !(lambda > 0.0 && lambda.is_finite()) {
        return 0.0;
    }
    match Poisson::new(lambda) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0.0,
    }
}

/// `exp(N(mu, sigma))`.
#[inline]
pub fn log_normal<R: Rng + ?Sized>(rng: &mut R, mu: f64, sigma: f64) -> f64 {
    normal(rng, mu, sigma).exp()
}

/// Uniform on `[low, high)`; returns `low` when the range is empty.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    let u: f64 = rng.gen();
    if high > low {
        low + (high - low) * u
    } else {
        low
    }
}

#[inline]
pub fn bernoulli<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    let u: f64 = rng.gen();
    u < p
}
