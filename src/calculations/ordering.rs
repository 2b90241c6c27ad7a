use crate::task::Task;
use std::cmp::Ordering;

/// Processing order for a pass: priority descending, then deadline ascending
/// with missing deadlines last. Ties keep collection order.
pub fn priority_order(tasks: &[Task]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    // `sort_by` is stable, which makes collection order the final tie-break.
    order.sort_by(|&a, &b| compare_for_dispatch(&tasks[a], &tasks[b]));
    order
}

pub fn compare_for_dispatch(a: &Task, b: &Task) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| match (a.deadline, b.deadline) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
