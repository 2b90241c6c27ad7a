pub mod assignment_pass;
pub mod ordering;
pub mod scoring;

pub use assignment_pass::{
    AssignmentPass, AssignmentSummary, Decision, collect_unassignment_reasons,
};
pub use ordering::{compare_for_dispatch, priority_order};
pub use scoring::{ScoreBreakdown, rank_fit_score, score_employee, select_best};
