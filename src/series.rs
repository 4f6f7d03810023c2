//! Truncated Taylor series of `e^a`, shared by the Erlang formulas.

/// Evaluates the Poisson terms `a^i / i!` up to `i = n`.
///
/// Returns `(Σ_{i=0}^{n-1} a^i / i!, a^n / n!)`: the sum of the terms below
/// the threshold, and the n-th term by itself. Erlang C adds the separated
/// term back after scaling it by the waiting-state tail, Erlang B adds it
/// back unscaled; keeping the split here means neither caller can count the
/// boundary term twice.
///
/// Each term is derived from its predecessor (`t_i = t_{i-1} · a / i`)
/// instead of evaluating powers and factorials independently, which stays
/// well conditioned for offered traffic well past the point where `n!`
/// alone would overflow.
pub(crate) fn poisson_partial_sum(a: f64, n: u32) -> (f64, f64) {
    let mut term = 1.0;
    let mut below = 0.0;
    for i in 1..=n {
        below += term;
        term *= a / f64::from(i);
    }
    (below, term)
}
