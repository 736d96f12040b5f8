// src/pipeline/queue.rs

//! FIFO queue of pending claim tasks.

use std::collections::VecDeque;

/// One pending claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimTask {
    pub code: String,
}

/// Pending claims, drained front to back.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<ClaimTask>,
}

impl TaskQueue {
    /// Enqueue one task per code, keeping their order.
    pub fn extend_codes<I, S>(&mut self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks
            .extend(codes.into_iter().map(|code| ClaimTask { code: code.into() }));
    }

    pub fn pop(&mut self) -> Option<ClaimTask> {
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop everything still pending.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_insertion_order() {
        let mut queue = TaskQueue::default();
        queue.extend_codes(["AAAA1111", "BBBB2222"]);
        queue.extend_codes(vec!["CCCC3333".to_string()]);

        assert_eq!(queue.len(), 3);
        let order: Vec<_> = std::iter::from_fn(|| queue.pop()).map(|t| t.code).collect();
        assert_eq!(order, vec!["AAAA1111", "BBBB2222", "CCCC3333"]);
        assert!(queue.is_empty());
    }
}
