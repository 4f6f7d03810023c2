//! Classical teletraffic formulas for dimensioning service systems.
//!
//! This crate evaluates two closed-form queueing models:
//!
//! - **Erlang C** ([`ErlangCParams`]): M/M/m queues with an unbounded
//!   waiting room. Yields the probability an arrival must wait, the expected
//!   time in queue (exact, or under a heavy-traffic correction for
//!   non-exponential service), the expected time in system, and a weighted
//!   blend of the expected waits of two arrival populations.
//! - **Erlang B** ([`FiniteSourceParams`]): M/M/n/n loss systems with no
//!   waiting room. Yields the blocking probability and the carried arrival
//!   rate and utilization that follow from it.
//!
//! Inputs are dimensioned [`uom`] quantities. All preconditions are checked
//! when a parameter record is constructed, surfacing a [`DomainError`]; the
//! metric methods on a constructed record are total, deterministic, and free
//! of shared state. Presentation of results is left entirely to the caller.
//!
//! # Examples
//!
//! Dimensioning a 20-trunk line group:
//!
//! ```
//! use teletraffic::FiniteSourceParams;
//! use uom::si::{f64::Frequency, frequency::hertz, ratio::ratio};
//!
//! let trunks = FiniteSourceParams::new(
//!     20,
//!     Frequency::new::<hertz>(1.541087),
//!     Frequency::new::<hertz>(1.0 / 30.0),
//! )?;
//!
//! let p_loss = trunks.blocking_probability();
//! let metrics = trunks.effective_metrics(p_loss);
//!
//! assert!((p_loss.get::<ratio>() - 0.582106).abs() < 1e-6);
//! assert!(metrics.utilization.get::<ratio>() < 1.0);
//! # Ok::<(), teletraffic::DomainError>(())
//! ```

mod erlang_c;
mod error;
mod finite_source;
mod series;

pub use erlang_c::{ErlangCParams, blended_expected_wait};
pub use error::DomainError;
pub use finite_source::{EffectiveMetrics, FiniteSourceParams};
