//! Erlang-C delay metrics for M/M/m queues.
//!
//! An M/M/m queue has Poisson arrivals, exponentially distributed service
//! times, `m` identical servers, and an unbounded waiting room. The Erlang-C
//! formula gives the steady-state probability that an arriving request finds
//! every server busy and must wait; from it follow the expected queueing
//! delay and the expected total time in system.
//!
//! All inputs are validated once, when an [`ErlangCParams`] is constructed.
//! The metric methods on a constructed value are total.

use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Ratio, Time},
    ratio::ratio,
    time::second,
};

use crate::{error::DomainError, series::poisson_partial_sum};

/// Validated inputs for an M/M/m delay calculation.
///
/// Construction enforces the model's domain: at least one server, a finite
/// non-negative offered load, a positive mean service time, and stability
/// (utilization `ρ = a/m` strictly below one).
///
/// # Examples
///
/// ```
/// use teletraffic::ErlangCParams;
/// use uom::si::{f64::{Ratio, Time}, ratio::ratio, time::second};
///
/// let params = ErlangCParams::new(
///     1,
///     Ratio::new::<ratio>(0.844224),
///     Time::new::<second>(75.0),
/// )?;
///
/// // For a single server, the Erlang-C formula collapses to Pq = ρ.
/// let pq = params.delay_probability();
/// assert!((pq.get::<ratio>() - 0.844224).abs() < 1e-12);
///
/// let etq = params.expected_wait(pq);
/// let ets = params.expected_time_in_system(etq);
/// assert!(ets > etq);
/// # Ok::<(), teletraffic::DomainError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErlangCParams {
    servers: u32,
    offered_load: Ratio,
    service_time: Time,
    service_time_variance_ratio: Option<Ratio>,
}

impl ErlangCParams {
    /// Creates parameters for an M/M/m queue.
    ///
    /// `offered_load` is the total traffic intensity `a = λ · E[s]` in
    /// Erlang, across all `servers`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if `servers` is zero, `offered_load` is
    /// negative or not finite, `service_time` is not strictly positive, or
    /// the system is unstable (`offered_load >= servers`).
    pub fn new(servers: u32, offered_load: Ratio, service_time: Time) -> Result<Self, DomainError> {
        if servers == 0 {
            return Err(DomainError::NoServers);
        }

        let a = offered_load.get::<ratio>();
        if !a.is_finite() || a < 0.0 {
            return Err(DomainError::InvalidOfferedLoad(a));
        }

        let s = service_time.get::<second>();
        if !s.is_finite() || s <= 0.0 {
            return Err(DomainError::NonPositiveServiceTime(s));
        }

        if a >= f64::from(servers) {
            return Err(DomainError::Unstable {
                offered_load: a,
                servers,
            });
        }

        Ok(Self {
            servers,
            offered_load,
            service_time,
            service_time_variance_ratio: None,
        })
    }

    /// Attaches the squared coefficient of variation of service time,
    /// `c² = Var[s] / E[s]²`, enabling [`expected_wait_heavy_traffic`].
    ///
    /// [`expected_wait_heavy_traffic`]: Self::expected_wait_heavy_traffic
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidVarianceRatio`] if the ratio is
    /// negative or not finite.
    pub fn with_service_time_variance_ratio(
        mut self,
        variance_ratio: Ratio,
    ) -> Result<Self, DomainError> {
        let c2 = variance_ratio.get::<ratio>();
        if !c2.is_finite() || c2 < 0.0 {
            return Err(DomainError::InvalidVarianceRatio(c2));
        }
        self.service_time_variance_ratio = Some(variance_ratio);
        Ok(self)
    }

    /// Number of servers, `m`.
    #[must_use]
    pub fn servers(&self) -> u32 {
        self.servers
    }

    /// Offered load `a` in Erlang.
    #[must_use]
    pub fn offered_load(&self) -> Ratio {
        self.offered_load
    }

    /// Mean service time `E[s]`.
    #[must_use]
    pub fn service_time(&self) -> Time {
        self.service_time
    }

    /// Squared coefficient of variation of service time, if one was attached.
    #[must_use]
    pub fn service_time_variance_ratio(&self) -> Option<Ratio> {
        self.service_time_variance_ratio
    }

    /// Per-server utilization `ρ = a / m`, guaranteed to lie in `[0, 1)`.
    #[must_use]
    pub fn utilization(&self) -> Ratio {
        self.offered_load / f64::from(self.servers)
    }

    /// Probability `Pq` that an arriving request must wait (Erlang C).
    ///
    /// With `a` the offered load, `m` the server count, and `ρ = a/m`:
    ///
    /// ```text
    /// Pq = (a^m / (m!·(1−ρ))) / (Σ_{i=0}^{m−1} a^i/i! + a^m / (m!·(1−ρ)))
    /// ```
    ///
    /// The steady-state sum runs over `i = 0..=m−1` only; the m-th term
    /// appears exactly once, scaled by the `1/(1−ρ)` waiting-state tail.
    /// The result lies in `[0, 1)` for every constructible parameter set.
    #[must_use]
    pub fn delay_probability(&self) -> Ratio {
        let a = self.offered_load.get::<ratio>();
        let rho = a / f64::from(self.servers);

        let (below, term_m) = poisson_partial_sum(a, self.servers);
        let waiting = term_m / (1.0 - rho);

        Ratio::new::<ratio>(waiting / (below + waiting))
    }

    /// Expected time in queue, `Etq = Pq · E[s] / (m·(1−ρ))`.
    ///
    /// `pq` is the delay probability for these parameters, as returned by
    /// [`delay_probability`](Self::delay_probability).
    #[must_use]
    pub fn expected_wait(&self, pq: Ratio) -> Time {
        let rho = self.utilization().get::<ratio>();
        pq * self.service_time / (f64::from(self.servers) * (1.0 - rho))
    }

    /// Expected time in queue under the heavy-traffic approximation for
    /// general service time distributions.
    ///
    /// Scales the exact M/M/m wait by the Allen–Cunneen correction
    /// `(1 + c²)/2`, where `c²` is the squared coefficient of variation
    /// attached via
    /// [`with_service_time_variance_ratio`](Self::with_service_time_variance_ratio).
    /// At `c² = 1` (exponential service) this reduces to
    /// [`expected_wait`](Self::expected_wait). It is an alternate formula
    /// for non-exponential service, never a default.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingVarianceRatio`] if the parameters carry
    /// no variance ratio.
    pub fn expected_wait_heavy_traffic(&self, pq: Ratio) -> Result<Time, DomainError> {
        let c2 = self
            .service_time_variance_ratio
            .ok_or(DomainError::MissingVarianceRatio)?;

        let correction = (1.0 + c2.get::<ratio>()) / 2.0;
        Ok(self.expected_wait(pq) * correction)
    }

    /// Expected total time in system, `Ets = Etq + E[s]`.
    #[must_use]
    pub fn expected_time_in_system(&self, etq: Time) -> Time {
        etq + self.service_time
    }
}

/// Expected wait for a two-population mix sharing one pool of servers.
///
/// A fraction `weight_a` of arrivals experience the load regime described by
/// `params_a`, the remainder the regime described by `params_b`; the two
/// parameter sets normally differ only in offered load and share a server
/// count. Each side's exact expected wait is computed with
/// [`ErlangCParams::expected_wait`] and the result is the weighted average
/// `w·EtqA + (1−w)·EtqB`.
///
/// At `weight_a = 1` the result equals the A-side wait exactly; at
/// `weight_a = 0`, the B-side wait.
///
/// # Errors
///
/// Returns [`DomainError::WeightOutOfRange`] if `weight_a` is outside the
/// closed interval `[0, 1]` or is NaN.
pub fn blended_expected_wait(
    params_a: &ErlangCParams,
    pq_a: Ratio,
    weight_a: Ratio,
    params_b: &ErlangCParams,
    pq_b: Ratio,
) -> Result<Time, DomainError> {
    let w = weight_a.get::<ratio>();
    if !(0.0..=1.0).contains(&w) {
        return Err(DomainError::WeightOutOfRange(w));
    }

    let wait_a = params_a.expected_wait(pq_a);
    let wait_b = params_b.expected_wait(pq_b);

    Ok(w * wait_a + (1.0 - w) * wait_b)
}
