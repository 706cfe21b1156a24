//! loglik_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for L-BFGS solvers used by the
//! log-likelihood optimizer. These helpers hide Argmin’s generic wiring
//! and apply crate-level options (tolerances, memory size) so that
//! higher-level code can request a configured solver without touching
//! Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct L-BFGS solvers with Hager–Zhang, More–Thuente, or Armijo
//!   backtracking line search.
//! - Apply optional gradient and cost-change tolerances from
//!   [`MLEOptions`] via the shared [`configure_lbfgs`] helper.
//! - Leave the initial parameter vector and maximum iterations to the
//!   runner, keeping these builders side-effect free.
//!
//! Invariants & assumptions
//! ------------------------
//! - All solvers operate on [`Theta`], [`Grad`], and [`Cost`].
//! - The L-BFGS memory (`m`) is either `opts.lbfgs_mem` or
//!   [`DEFAULT_LBFGS_MEM`].
//! - The backtracking variant uses [`DEFAULT_ARMIJO_C`] and
//!   [`DEFAULT_BACKTRACK_RHO`]. It evaluates only costs at trial points,
//!   which is what objectives with a `+∞` domain sentinel need.
//!
//! Testing notes
//! -------------
//! - Unit tests check that every builder succeeds with default and
//!   explicit memory, and that tolerances are applied.
//! - Full solves are exercised in the `api` tests and the tilting model.
use argmin::solver::{linesearch::condition::ArmijoCondition, quasinewton::LBFGS};

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            BacktrackingLS, Cost, Grad, HagerZhangLS, LbfgsBacktracking, LbfgsHagerZhang,
            LbfgsMoreThuente, MoreThuenteLS, Theta, DEFAULT_ARMIJO_C, DEFAULT_BACKTRACK_RHO,
            DEFAULT_LBFGS_MEM,
        },
    },
};

/// Construct L-BFGS with Hager–Zhang line search.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
///   tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with More–Thuente line search.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
///   tolerance.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with Armijo backtracking line search.
///
/// The sufficient-decrease constant is [`DEFAULT_ARMIJO_C`] and the step is
/// multiplied by [`DEFAULT_BACKTRACK_RHO`] after every rejected trial.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects the
///   Armijo constant, the contraction factor, or a tolerance.
pub fn build_optimizer_backtracking(opts: &MLEOptions) -> OptResult<LbfgsBacktracking> {
    let condition = ArmijoCondition::new(DEFAULT_ARMIJO_C)?;
    let backtracking = BacktrackingLS::new(condition).rho(DEFAULT_BACKTRACK_RHO)?;
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsBacktracking::new(backtracking, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional gradient and cost-change tolerances to an L-BFGS solver.
///
/// When a tolerance is `None` the corresponding `with_tolerance_*` method is
/// not called and Argmin’s default remains in effect.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
///   tolerance.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction of L-BFGS solvers for all three line searches.
    // - Propagation of `lbfgs_mem` (Some vs None) into the builder paths.
    // - Application of tolerances via `configure_lbfgs`.
    //
    // They intentionally DO NOT cover:
    // - End-to-end executor behavior, tested through `maximize`.
    // -------------------------------------------------------------------------

    fn options(line_searcher: LineSearcher, mem: Option<usize>) -> MLEOptions {
        let tols =
            Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).expect("Tolerances should be valid");
        MLEOptions::new(tols, line_searcher, mem).expect("MLEOptions should be valid")
    }

    #[test]
    // Purpose
    // -------
    // Every builder succeeds with the default L-BFGS memory.
    //
    // Given
    // -----
    // - Valid tolerances and `lbfgs_mem = None` for each line search.
    //
    // Expect
    // ------
    // - All three builders return `Ok(_)`.
    fn builders_succeed_with_default_memory() {
        assert!(build_optimizer_hager_zhang(&options(LineSearcher::HagerZhang, None)).is_ok());
        assert!(build_optimizer_more_thuente(&options(LineSearcher::MoreThuente, None)).is_ok());
        assert!(build_optimizer_backtracking(&options(LineSearcher::Backtracking, None)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Every builder accepts an explicit memory size.
    //
    // Given
    // -----
    // - Valid tolerances and `lbfgs_mem = Some(11)`.
    //
    // Expect
    // ------
    // - All three builders return `Ok(_)`.
    fn builders_respect_explicit_memory() {
        assert!(build_optimizer_hager_zhang(&options(LineSearcher::HagerZhang, Some(11))).is_ok());
        assert!(
            build_optimizer_more_thuente(&options(LineSearcher::MoreThuente, Some(11))).is_ok()
        );
        assert!(
            build_optimizer_backtracking(&options(LineSearcher::Backtracking, Some(11))).is_ok()
        );
    }

    #[test]
    // Purpose
    // -------
    // `configure_lbfgs` works both with and without tolerances.
    //
    // Given
    // -----
    // - A raw backtracking L-BFGS and options with both tolerances set,
    //   then options with both unset.
    //
    // Expect
    // ------
    // - Both calls return `Ok(_)`.
    fn configure_lbfgs_handles_present_and_absent_tolerances() {
        // Arrange
        let make_raw = || {
            let cond = ArmijoCondition::new(DEFAULT_ARMIJO_C).expect("valid Armijo constant");
            LBFGS::new(BacktrackingLS::new(cond), DEFAULT_LBFGS_MEM)
        };
        let tols = Tolerances::new(None, None, Some(50)).expect("Tolerances should be valid");
        let bare = MLEOptions::new(tols, LineSearcher::Backtracking, None)
            .expect("MLEOptions should be valid");

        // Act
        let with_tols = configure_lbfgs(make_raw(), &options(LineSearcher::Backtracking, None));
        let without_tols = configure_lbfgs(make_raw(), &bare);

        // Assert
        assert!(with_tols.is_ok());
        assert!(without_tols.is_ok());
    }
}
