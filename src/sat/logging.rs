//! Log targets.
//!
//! The library only emits records through the [`log`] facade and installs no
//! logger. The binary uses `env_logger`, so a target can be singled out with,
//! e.g., `RUST_LOG=analysis=trace`.

/// Targets for the `target:` argument of the [`log`] macros.
pub mod targets {
    /// Unit assignments.
    pub const PROPAGATION: &str = "propagation";

    /// Free decisions.
    pub const DECISION: &str = "decision";

    /// Resolution steps during conflict analysis.
    pub const ANALYSIS: &str = "analysis";

    /// Trail retraction and the literal asserted afterwards.
    pub const BACKJUMP: &str = "backjump";

    /// Formula construction, learning and restarts.
    pub const FORMULA: &str = "formula";

    /// DIMACS reading.
    pub const PARSE: &str = "parse";
}
