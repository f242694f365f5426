//! # regent-report — Scores, Roadmap, and the Final Report
//!
//! Everything in this crate is a pure, deterministic function of the
//! validated gap list: no I/O, no clock reads inside the scoring math,
//! trivially testable. The scorer and the roadmap generator are
//! independent of each other — both consume only the gap list — and
//! the report assembler combines their outputs with the content hash
//! that keys the audit log.

pub mod report;
pub mod roadmap;
pub mod score;

pub use report::{build_report, ComplianceReport};
pub use roadmap::{build_roadmap, CostBand, Milestone, TimelineBand};
pub use score::{score_gaps, ScoreBreakdown};
