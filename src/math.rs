//! Provides the scalar functions shared by the units and the trainers.
//!
//! The vector and matrix work is done with [ndarray][ndarray], these are the
//! element-wise pieces that get mapped over its arrays. All functions are
//! generic over [num::Float][float].
//!
//! [ndarray]: https://docs.rs/ndarray/0.15/ndarray/
//! [float]: https://docs.rs/num/0.1/num/trait.Float.html
use num::Float;

/// Logistic sigmoid: y = (1 + e^(-x))^(-1)
pub fn sigmoid<F: Float>(x: F) -> F {
    F::one() / (F::one() + (-x).exp())
}

/// Numerically stable softplus: y = log(1 + e^x)
pub fn softplus<F: Float>(x: F) -> F {
    if x > F::zero() {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Returns the sign of `x`, zero for zero.
pub fn sign<F: Float>(x: F) -> F {
    if x > F::zero() {
        F::one()
    } else if x < F::zero() {
        -F::one()
    } else {
        F::zero()
    }
}
