use thiserror::Error;

/// Errors returned when queueing inputs fall outside a model's domain.
///
/// Every variant corresponds to one violated precondition and carries the
/// offending value, so the message identifies exactly what the caller got
/// wrong. Invalid input is a caller bug: there is nothing to retry and no
/// partial result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DomainError {
    /// An M/M/m queue needs at least one server.
    #[error("at least one server is required")]
    NoServers,

    /// The offered load was negative, infinite, or NaN.
    #[error("offered load must be finite and non-negative (got {0} Erlang)")]
    InvalidOfferedLoad(f64),

    /// The system is unstable: utilization a/m must lie in `[0, 1)`.
    #[error(
        "system unstable: offered load must be less than the server count \
         (a = {offered_load} Erlang, m = {servers})"
    )]
    Unstable { offered_load: f64, servers: u32 },

    /// The mean service time was zero, negative, infinite, or NaN.
    #[error("service time must be finite and positive (got {0} s)")]
    NonPositiveServiceTime(f64),

    /// The squared coefficient of variation of service time was negative,
    /// infinite, or NaN.
    #[error("squared coefficient of variation must be finite and non-negative (got {0})")]
    InvalidVarianceRatio(f64),

    /// The heavy-traffic wait approximation was requested on parameters that
    /// carry no service time variance ratio.
    #[error("the heavy-traffic approximation requires a service time variance ratio")]
    MissingVarianceRatio,

    /// A population blend weight was outside the closed unit interval.
    #[error("blend weight must lie in [0, 1] (got {0})")]
    WeightOutOfRange(f64),

    /// A finite-source system was given a negative capacity.
    #[error("capacity must be non-negative (got {0})")]
    NegativeCapacity(i32),

    /// An arrival or service rate was zero, negative, infinite, or NaN.
    #[error("{rate} must be finite and positive (got {value} Hz)")]
    NonPositiveRate { rate: &'static str, value: f64 },
}
