//! Co-solver for the travelling thief problem.
//!
//! Treats the tour and the picking plan as two coupled subproblems and
//! improves them in turn: the tour with the plan fixed, then the plan with
//! the tour fixed. Rounds repeat while the best objective keeps rising.
//!
//! # Usage
//!
//! ```no_run
//! use u_ttp::cosolver::{CoSolver, CoSolverConfig};
//! use u_ttp::io::load_ttp;
//!
//! let instance = load_ttp("a280_n279_bounded-strongly-corr_01.ttp").unwrap();
//! let result = CoSolver::solve(&instance, &CoSolverConfig::default().with_seed(1));
//! println!("{:.2}", result.best_objective);
//! ```

mod config;
mod runner;

pub use config::CoSolverConfig;
pub use runner::{CoSolver, CoSolverResult};
