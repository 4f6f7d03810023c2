//! Erlang-B loss metrics for M/M/n/n systems.
//!
//! An M/M/n/n system has Poisson arrivals, exponential service, `n` servers,
//! and no waiting room: an arrival that finds every server busy is lost, not
//! delayed. The Erlang loss formula gives the blocking probability; from it
//! follow the carried (effective) arrival rate and the server utilization.
//! Because blocking absorbs excess load, the system is stable for any
//! offered traffic and no stability precondition applies.

use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Frequency, Ratio},
    frequency::hertz,
    ratio::ratio,
};

use crate::{error::DomainError, series::poisson_partial_sum};

/// Validated inputs for an M/M/n/n loss calculation.
///
/// # Examples
///
/// ```
/// use teletraffic::FiniteSourceParams;
/// use uom::si::{f64::Frequency, frequency::hertz, ratio::ratio};
///
/// let params = FiniteSourceParams::new(
///     20,
///     Frequency::new::<hertz>(1.541087),
///     Frequency::new::<hertz>(1.0 / 30.0),
/// )?;
///
/// let p_loss = params.blocking_probability();
/// let metrics = params.effective_metrics(p_loss);
///
/// assert!(p_loss.get::<ratio>() > 0.0 && p_loss.get::<ratio>() < 1.0);
/// assert!(metrics.effective_arrival_rate < params.arrival_rate());
/// # Ok::<(), teletraffic::DomainError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiniteSourceParams {
    capacity: u32,
    arrival_rate: Frequency,
    service_rate: Frequency,
}

/// Carried-traffic figures derived from a blocking probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveMetrics {
    /// The carried arrival rate `λ′ = λ · (1 − pLoss)`.
    pub effective_arrival_rate: Frequency,

    /// Per-server utilization `λ′ / (n·μ)`.
    pub utilization: Ratio,
}

impl FiniteSourceParams {
    /// Creates parameters for an M/M/n/n system with `capacity` servers,
    /// arrival rate `λ`, and per-server service rate `μ`.
    ///
    /// A capacity of zero is degenerate but accepted: every arrival is
    /// blocked and the carried rate is zero.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if `capacity` is negative or either rate is
    /// not strictly positive and finite.
    pub fn new(
        capacity: i32,
        arrival_rate: Frequency,
        service_rate: Frequency,
    ) -> Result<Self, DomainError> {
        let capacity = u32::try_from(capacity).map_err(|_| DomainError::NegativeCapacity(capacity))?;

        let lambda = arrival_rate.get::<hertz>();
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(DomainError::NonPositiveRate {
                rate: "arrival rate",
                value: lambda,
            });
        }

        let mu = service_rate.get::<hertz>();
        if !mu.is_finite() || mu <= 0.0 {
            return Err(DomainError::NonPositiveRate {
                rate: "service rate",
                value: mu,
            });
        }

        Ok(Self {
            capacity,
            arrival_rate,
            service_rate,
        })
    }

    /// Number of servers, `n`.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Arrival rate `λ`.
    #[must_use]
    pub fn arrival_rate(&self) -> Frequency {
        self.arrival_rate
    }

    /// Per-server service rate `μ`.
    #[must_use]
    pub fn service_rate(&self) -> Frequency {
        self.service_rate
    }

    /// Offered traffic `a = λ/μ` in Erlang.
    #[must_use]
    pub fn offered_traffic(&self) -> Ratio {
        self.arrival_rate / self.service_rate
    }

    /// Steady-state probability `p0` that all servers are idle,
    /// `1 / Σ_{i=0}^{n} a^i/i!`.
    #[must_use]
    pub fn empty_probability(&self) -> Ratio {
        let a = self.offered_traffic().get::<ratio>();
        let (below, term_n) = poisson_partial_sum(a, self.capacity);
        Ratio::new::<ratio>(1.0 / (below + term_n))
    }

    /// Blocking probability `pLoss` (Erlang B).
    ///
    /// With `a = λ/μ` and `n` servers:
    ///
    /// ```text
    /// pLoss = (a^n/n!) / Σ_{i=0}^{n} a^i/i!
    /// ```
    ///
    /// Lies in `(0, 1)` for any positive capacity; a zero capacity blocks
    /// everything and yields exactly one.
    #[must_use]
    pub fn blocking_probability(&self) -> Ratio {
        let a = self.offered_traffic().get::<ratio>();
        let (below, term_n) = poisson_partial_sum(a, self.capacity);
        Ratio::new::<ratio>(term_n / (below + term_n))
    }

    /// Carried arrival rate and utilization for a given blocking
    /// probability, as returned by
    /// [`blocking_probability`](Self::blocking_probability).
    #[must_use]
    pub fn effective_metrics(&self, p_loss: Ratio) -> EffectiveMetrics {
        let effective_arrival_rate = self.arrival_rate * (1.0 - p_loss.get::<ratio>());

        let utilization = if self.capacity == 0 {
            // No servers to utilize.
            Ratio::new::<ratio>(0.0)
        } else {
            effective_arrival_rate / (f64::from(self.capacity) * self.service_rate)
        };

        EffectiveMetrics {
            effective_arrival_rate,
            utilization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn params(capacity: i32, lambda: f64, mu: f64) -> FiniteSourceParams {
        FiniteSourceParams::new(
            capacity,
            Frequency::new::<hertz>(lambda),
            Frequency::new::<hertz>(mu),
        )
        .unwrap()
    }

    #[test]
    fn single_server_at_unit_traffic_blocks_half() {
        // n = 1, a = 1: pLoss = a/(1 + a) = 1/2.
        let p = params(1, 2.0, 2.0);
        assert_relative_eq!(
            p.blocking_probability().get::<ratio>(),
            0.5,
            max_relative = 1e-12
        );
    }

    #[test]
    fn two_servers_at_unit_traffic_block_one_fifth() {
        // n = 2, a = 1: pLoss = (a²/2)/(1 + a + a²/2) = 1/5.
        let p = params(2, 1.0, 1.0);
        assert_relative_eq!(
            p.blocking_probability().get::<ratio>(),
            0.2,
            max_relative = 1e-12
        );
    }

    #[test]
    fn blocking_decreases_as_capacity_grows() {
        let mut previous = 1.0;
        for n in [1, 2, 5, 10, 20] {
            let p_loss = params(n, 1.0, 0.5).blocking_probability().get::<ratio>();
            assert!(p_loss < previous, "pLoss({n}) = {p_loss} not below {previous}");
            previous = p_loss;
        }
    }

    #[test]
    fn empty_probability_is_the_series_reciprocal() {
        let p = params(3, 1.5, 1.0);
        let a: f64 = 1.5;
        let series = 1.0 + a + a.powi(2) / 2.0 + a.powi(3) / 6.0;
        assert_relative_eq!(
            p.empty_probability().get::<ratio>(),
            1.0 / series,
            max_relative = 1e-12
        );
    }

    #[test]
    fn effective_metrics_match_hand_calculation() {
        let p = params(2, 1.0, 1.0);
        let metrics = p.effective_metrics(p.blocking_probability());

        assert_relative_eq!(
            metrics.effective_arrival_rate.get::<hertz>(),
            0.8,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            metrics.utilization.get::<ratio>(),
            0.8 / 2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn carried_rate_never_exceeds_the_offered_rate() {
        for n in [1, 5, 20] {
            let p = params(n, 3.0, 0.25);
            let metrics = p.effective_metrics(p.blocking_probability());
            assert!(metrics.effective_arrival_rate < p.arrival_rate());
            assert!(metrics.utilization.get::<ratio>() < 1.0);
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn zero_capacity_blocks_everything() {
        let p = params(0, 1.0, 1.0);
        let p_loss = p.blocking_probability();
        assert_eq!(p_loss.get::<ratio>(), 1.0);

        let metrics = p.effective_metrics(p_loss);
        assert_eq!(metrics.effective_arrival_rate.get::<hertz>(), 0.0);
        assert_eq!(metrics.utilization.get::<ratio>(), 0.0);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let p = params(20, 1.541087, 1.0 / 30.0);
        assert_eq!(p.blocking_probability(), p.blocking_probability());
        assert_eq!(
            p.effective_metrics(p.blocking_probability()),
            p.effective_metrics(p.blocking_probability())
        );
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let result = FiniteSourceParams::new(
            -1,
            Frequency::new::<hertz>(1.0),
            Frequency::new::<hertz>(1.0),
        );
        assert_eq!(result, Err(DomainError::NegativeCapacity(-1)));
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        let zero_lambda = FiniteSourceParams::new(
            1,
            Frequency::new::<hertz>(0.0),
            Frequency::new::<hertz>(1.0),
        );
        assert_eq!(
            zero_lambda,
            Err(DomainError::NonPositiveRate {
                rate: "arrival rate",
                value: 0.0
            })
        );

        let negative_mu = FiniteSourceParams::new(
            1,
            Frequency::new::<hertz>(1.0),
            Frequency::new::<hertz>(-0.5),
        );
        assert_eq!(
            negative_mu,
            Err(DomainError::NonPositiveRate {
                rate: "service rate",
                value: -0.5
            })
        );
    }

    #[test]
    fn params_serialize_round_trip() {
        let p = params(20, 1.541087, 1.0 / 30.0);

        let json = serde_json::to_string(&p).unwrap();
        let back: FiniteSourceParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
