//! Order reconciliation
//!
//! Merges a requested dependency list into the previously recorded order.

use std::collections::{HashMap, HashSet};

/// Result of merging a request into a recorded order.
///
/// The step list is both the install order handed to the image builder and
/// the order to record for the next build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledPlan {
    steps: Vec<String>,
    /// Number of leading steps that were already in the recorded order
    known: usize,
    /// Number of leading steps identical to the recorded order, position by position
    reusable: usize,
    dropped: Vec<String>,
}

impl ReconciledPlan {
    /// Install steps in final order
    pub fn build_steps(&self) -> &[String] {
        &self.steps
    }

    /// Order to persist for the next build (same sequence as the steps)
    pub fn new_order(&self) -> &[String] {
        &self.steps
    }

    /// Steps whose position was taken from the recorded order
    pub fn known(&self) -> &[String] {
        &self.steps[..self.known]
    }

    /// Steps that were not in the recorded order, in request order
    pub fn added(&self) -> &[String] {
        &self.steps[self.known..]
    }

    /// Recorded entries no longer requested
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    /// Length of the leading run that matches the recorded order exactly.
    ///
    /// Layers up to this point can be served from the builder cache.
    pub fn reusable(&self) -> usize {
        self.reusable
    }

    /// Whether the plan differs from the recorded order
    pub fn is_changed(&self) -> bool {
        self.reusable != self.steps.len() || !self.dropped.is_empty()
    }

    pub fn into_steps(self) -> Vec<String> {
        self.steps
    }
}

/// Merge `requested` into `cached`.
///
/// Requested entries found in `cached` are emitted first, in their cached
/// order. Entries not found are appended in request order. Cached entries
/// that are not requested are dropped. Repeated entries count once, at
/// their first occurrence, in either input.
///
/// The function is total: any pair of sequences yields a plan.
pub fn reconcile<C, R>(cached: &[C], requested: &[R]) -> ReconciledPlan
where
    C: AsRef<str>,
    R: AsRef<str>,
{
    let cached: Vec<&str> = cached.iter().map(AsRef::as_ref).collect();

    let mut position: HashMap<&str, usize> = HashMap::with_capacity(cached.len());
    for (index, entry) in cached.iter().enumerate() {
        position.entry(*entry).or_insert(index);
    }

    let mut slots: Vec<Option<&str>> = vec![None; cached.len()];
    let mut added: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(requested.len());

    for entry in requested {
        let entry: &str = entry.as_ref();
        if !seen.insert(entry) {
            continue;
        }
        match position.get(entry) {
            Some(&index) => slots[index] = Some(entry),
            None => added.push(entry),
        }
    }

    let dropped: Vec<String> = cached
        .iter()
        .enumerate()
        .filter(|&(index, entry)| position.get(entry) == Some(&index) && slots[index].is_none())
        .map(|(_, entry)| entry.to_string())
        .collect();

    let mut steps: Vec<String> = slots.iter().flatten().map(|s| s.to_string()).collect();
    let known = steps.len();
    steps.extend(added.into_iter().map(str::to_string));

    let reusable = steps
        .iter()
        .zip(&cached)
        .take_while(|&(step, entry)| step == entry)
        .count();

    ReconciledPlan {
        steps,
        known,
        reusable,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn known_keep_cache_order_new_appended() {
        let plan = reconcile(&["a", "b", "c"], &["c", "d", "a"]);
        assert_eq!(plan.build_steps(), ["a", "c", "d"]);
        assert_eq!(plan.known(), ["a", "c"]);
        assert_eq!(plan.added(), ["d"]);
        assert_eq!(plan.dropped(), ["b"]);
        assert_eq!(plan.reusable(), 1);
    }

    #[test]
    fn empty_cache_keeps_request_order() {
        let plan = reconcile(&NONE, &["x==1", "y"]);
        assert_eq!(plan.build_steps(), ["x==1", "y"]);
        assert!(plan.known().is_empty());
        assert_eq!(plan.added(), ["x==1", "y"]);
        assert_eq!(plan.reusable(), 0);
    }

    #[test]
    fn removed_entry_is_dropped() {
        let plan = reconcile(&["a", "b"], &["b"]);
        assert_eq!(plan.build_steps(), ["b"]);
        assert_eq!(plan.dropped(), ["a"]);
        assert_eq!(plan.reusable(), 0);
        assert!(plan.is_changed());
    }

    #[test]
    fn removal_at_tail_keeps_prefix_reusable() {
        let plan = reconcile(&["a", "b", "c"], &["b", "a"]);
        assert_eq!(plan.build_steps(), ["a", "b"]);
        assert_eq!(plan.reusable(), 2);
        assert_eq!(plan.dropped(), ["c"]);
    }

    #[test]
    fn unchanged_request_is_fully_reusable() {
        let plan = reconcile(&["a", "b", "c"], &["c", "b", "a"]);
        assert_eq!(plan.build_steps(), ["a", "b", "c"]);
        assert_eq!(plan.reusable(), 3);
        assert!(!plan.is_changed());
    }

    #[test]
    fn version_bump_is_a_new_entry() {
        let plan = reconcile(&["flask==3.0.0", "gunicorn"], &["flask==3.0.2", "gunicorn"]);
        assert_eq!(plan.build_steps(), ["gunicorn", "flask==3.0.2"]);
        assert_eq!(plan.dropped(), ["flask==3.0.0"]);
    }

    #[test]
    fn empty_request_drops_everything() {
        let plan = reconcile(&["a", "b"], &NONE);
        assert!(plan.build_steps().is_empty());
        assert_eq!(plan.dropped(), ["a", "b"]);
    }

    #[test]
    fn duplicate_request_entries_count_once() {
        let plan = reconcile(&["b"], &["a", "b", "a"]);
        assert_eq!(plan.build_steps(), ["b", "a"]);
    }

    #[test]
    fn duplicate_cache_entries_use_first_position() {
        let plan = reconcile(&["a", "b", "a"], &["b", "a"]);
        assert_eq!(plan.build_steps(), ["a", "b"]);
        assert!(plan.dropped().is_empty());
    }

    #[test]
    fn accepts_owned_strings() {
        let cached = vec!["a".to_string(), "b".to_string()];
        let requested = vec!["b".to_string(), "c".to_string()];
        let plan = reconcile(&cached, &requested);
        assert_eq!(plan.into_steps(), vec!["b", "c"]);
    }

    fn dedup(items: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        items
            .iter()
            .filter(|item| seen.insert(item.as_str()))
            .cloned()
            .collect()
    }

    fn tokens() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-h](==[12])?", 0..12)
    }

    proptest! {
        #[test]
        fn empty_cache_is_identity(requested in tokens()) {
            let plan = reconcile(&NONE, &requested);
            let expected = dedup(&requested);
            prop_assert_eq!(plan.build_steps(), expected.as_slice());
        }

        #[test]
        fn every_requested_entry_appears_once(cached in tokens(), requested in tokens()) {
            let plan = reconcile(&cached, &requested);
            let steps = plan.build_steps();
            for entry in &requested {
                prop_assert_eq!(steps.iter().filter(|s| *s == entry).count(), 1);
            }
            for step in steps {
                prop_assert!(requested.contains(step));
            }
        }

        #[test]
        fn known_entries_keep_cached_order(cached in tokens(), requested in tokens()) {
            let plan = reconcile(&cached, &requested);
            let first_index = |s: &String| cached.iter().position(|c| c == s);
            let indices: Vec<usize> = plan.known().iter().filter_map(first_index).collect();
            prop_assert_eq!(indices.len(), plan.known().len());
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn new_entries_follow_in_request_order(cached in tokens(), requested in tokens()) {
            let plan = reconcile(&cached, &requested);
            let expected: Vec<String> = dedup(&requested)
                .into_iter()
                .filter(|r| !cached.contains(r))
                .collect();
            prop_assert_eq!(plan.added(), expected.as_slice());
            for step in plan.known() {
                prop_assert!(cached.contains(step));
            }
        }

        #[test]
        fn reconciling_twice_is_a_fixed_point(cached in tokens(), requested in tokens()) {
            let first = reconcile(&cached, &requested);
            let second = reconcile(first.new_order(), &requested);
            prop_assert_eq!(second.build_steps(), first.build_steps());
            prop_assert_eq!(second.reusable(), second.build_steps().len());
            prop_assert!(!second.is_changed());
        }
    }
}
