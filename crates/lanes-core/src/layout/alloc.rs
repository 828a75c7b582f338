//! Online lane allocation.
//!
//! # Overview
//!
//! The allocator walks the commit sequence once, child before parent, and
//! keeps a vector of lane slots. A slot is either *free* (`None`) or holds a
//! *reservation*: the id of the commit expected to arrive in that lane next.
//!
//! For each commit `C` with parents `[p0, p1, ..]`:
//!
//! 1. `C` takes the first lane reserved for `C.id`; a new head takes the
//!    lowest free lane, or a freshly appended one.
//! 2. `C`'s lane is cleared.
//! 3. `p0` reserves `C`'s lane unless it is already reserved somewhere, which
//!    keeps a first-parent chain vertical.
//! 4. Every other parent not already reserved takes the lowest free lane, or
//!    a freshly appended one.
//! 5. Trailing free lanes are trimmed.
//!
//! Lowest-index-first wins every tie, so the assignment is fully determined
//! by the input order.
//!
//! ## Malformed input
//!
//! A parent that never arrives keeps its reservation until it becomes the
//! trailing lane and is trimmed. A duplicated commit id is matched against
//! the first lane found; nothing is rejected.

#![allow(clippy::module_name_repetitions)]

use tracing::trace;

use crate::model::Commit;

/// Where one commit landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Lane assigned to the commit.
    pub lane: usize,
    /// `true` when the lane was reserved for this commit by a child.
    pub fulfilled: bool,
    /// Lanes (other than `lane`) that held a reservation while this row was
    /// placed; a renderer draws a pass-through line in each of them.
    pub through: Vec<usize>,
    /// Number of reservations this commit's parents created.
    pub new_reservations: usize,
}

/// Transient per-pass allocator state.
#[derive(Debug, Default, Clone)]
pub struct LaneAllocator {
    lanes: Vec<Option<String>>,
}

impl LaneAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self { lanes: Vec::new() }
    }

    /// Current lane slots: `Some(id)` is a reservation, `None` a free lane.
    #[must_use]
    pub fn lanes(&self) -> &[Option<String>] {
        &self.lanes
    }

    /// Number of lanes currently holding a reservation.
    #[must_use]
    pub fn reserved_count(&self) -> usize {
        self.lanes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Lane currently reserved for `id`, if any (first match wins).
    #[must_use]
    pub fn lane_of(&self, id: &str) -> Option<usize> {
        self.lanes.iter().position(|slot| slot.as_deref() == Some(id))
    }

    /// Assign a lane to `commit` and reserve lanes for its parents.
    pub fn place(&mut self, commit: &Commit) -> Placement {
        let reserved = self.lane_of(&commit.id);
        let fulfilled = reserved.is_some();
        let lane = reserved.unwrap_or_else(|| self.claim_free_lane());

        let through = self
            .lanes
            .iter()
            .enumerate()
            .filter(|&(idx, slot)| idx != lane && slot.is_some())
            .map(|(idx, _)| idx)
            .collect();

        self.lanes[lane] = None;

        let mut new_reservations = 0;
        if let Some(primary) = commit.primary_parent() {
            if self.lane_of(primary).is_none() {
                self.lanes[lane] = Some(primary.to_string());
                new_reservations += 1;
            }
        }

        for parent in commit.merge_parents() {
            if self.lane_of(parent).is_some() {
                continue;
            }
            let target = self.claim_free_lane();
            self.lanes[target] = Some(parent.clone());
            new_reservations += 1;
        }

        self.trim();

        trace!(
            id = %commit.id,
            lane,
            fulfilled,
            active = self.lanes.len(),
            "placed commit"
        );

        Placement {
            lane,
            fulfilled,
            through,
            new_reservations,
        }
    }

    /// Lowest free lane index, appending a lane if none is free.
    fn claim_free_lane(&mut self) -> usize {
        if let Some(idx) = self.lanes.iter().position(Option::is_none) {
            return idx;
        }
        self.lanes.push(None);
        self.lanes.len() - 1
    }

    fn trim(&mut self) {
        while matches!(self.lanes.last(), Some(None)) {
            self.lanes.pop();
        }
    }
}

/// Assign lanes to every commit in order.
///
/// Returns one [`Placement`] per commit, in input order.
#[must_use]
pub fn allocate_lanes(commits: &[Commit]) -> Vec<Placement> {
    let mut allocator = LaneAllocator::new();
    commits.iter().map(|c| allocator.place(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(id: &str, parents: &[&str]) -> Commit {
        Commit::new(id, parents.iter().copied())
    }

    fn lanes(commits: &[Commit]) -> Vec<usize> {
        allocate_lanes(commits).into_iter().map(|p| p.lane).collect()
    }

    #[test]
    fn empty_input_places_nothing() {
        assert!(allocate_lanes(&[]).is_empty());
    }

    #[test]
    fn linear_history_stays_in_lane_zero() {
        let commits = [c("c3", &["c2"]), c("c2", &["c1"]), c("c1", &[])];
        assert_eq!(lanes(&commits), [0, 0, 0]);
    }

    #[test]
    fn merge_parent_gets_new_lane() {
        let mut alloc = LaneAllocator::new();
        let p = alloc.place(&c("c3", &["c2", "c1"]));
        assert_eq!(p.lane, 0);
        assert!(!p.fulfilled);
        assert_eq!(p.new_reservations, 2);
        assert_eq!(
            alloc.lanes(),
            [Some("c2".to_string()), Some("c1".to_string())]
        );

        let p = alloc.place(&c("c2", &[]));
        assert_eq!(p.lane, 0);
        assert!(p.fulfilled);
        assert_eq!(p.through, [1]);

        let p = alloc.place(&c("c1", &[]));
        assert_eq!(p.lane, 1);
        assert!(p.fulfilled);
        assert!(alloc.lanes().is_empty(), "all lanes trimmed");
    }

    #[test]
    fn new_head_takes_lowest_free_lane() {
        let mut alloc = LaneAllocator::new();
        // a reserves lane 0 for p and lane 1 for q
        alloc.place(&c("a", &["p", "q"]));
        // p arrives with no parents: lane 0 becomes free, lane 1 still held
        alloc.place(&c("p", &[]));
        assert_eq!(alloc.lanes(), [None, Some("q".to_string())]);
        // an unrelated head reuses the hole at lane 0
        let p = alloc.place(&c("h", &[]));
        assert_eq!(p.lane, 0);
        assert!(!p.fulfilled);
    }

    #[test]
    fn primary_parent_already_reserved_is_left_alone() {
        let mut alloc = LaneAllocator::new();
        alloc.place(&c("a", &["base"]));
        // b is a new head whose primary parent is already expected in lane 0
        let p = alloc.place(&c("b", &["base"]));
        assert_eq!(p.lane, 1);
        assert_eq!(p.new_reservations, 0);
        // b's lane was freed and trimmed
        assert_eq!(alloc.lanes(), [Some("base".to_string())]);
    }

    #[test]
    fn merge_parent_can_reuse_own_lane_when_primary_is_elsewhere() {
        let mut alloc = LaneAllocator::new();
        alloc.place(&c("a", &["x"]));
        let p = alloc.place(&c("m", &["x", "y"]));
        assert_eq!(p.lane, 1);
        // x stays in lane 0; y takes m's freed lane 1
        assert_eq!(
            alloc.lanes(),
            [Some("x".to_string()), Some("y".to_string())]
        );
    }

    #[test]
    fn duplicate_parents_reserve_once() {
        let mut alloc = LaneAllocator::new();
        let p = alloc.place(&c("m", &["x", "x", "y", "y"]));
        assert_eq!(p.new_reservations, 2);
        assert_eq!(alloc.reserved_count(), 2);
    }

    #[test]
    fn dangling_parent_is_trimmed_once_trailing() {
        let mut alloc = LaneAllocator::new();
        alloc.place(&c("a", &["b", "ghost"]));
        alloc.place(&c("b", &[]));
        // ghost never arrives; it still holds lane 1
        assert_eq!(alloc.lanes(), [None, Some("ghost".to_string())]);
        let p = alloc.place(&c("z", &[]));
        assert_eq!(p.lane, 0);
        assert_eq!(p.through, [1]);
    }

    #[test]
    fn no_trailing_free_lanes_after_each_commit() {
        let commits = [
            c("m2", &["a", "f1"]),
            c("f1", &["f0", "g0"]),
            c("a", &["b"]),
            c("g0", &[]),
            c("f0", &["b"]),
            c("b", &[]),
        ];
        let mut alloc = LaneAllocator::new();
        for commit in &commits {
            alloc.place(commit);
            assert!(
                !matches!(alloc.lanes().last(), Some(None)),
                "trailing free lane after {}",
                commit.id
            );
        }
        assert!(alloc.lanes().is_empty());
    }

    #[test]
    fn duplicate_ids_fulfil_first_reservation_found() {
        let mut alloc = LaneAllocator::new();
        alloc.place(&c("a", &["x"]));
        let first = alloc.place(&c("x", &[]));
        let second = alloc.place(&c("x", &[]));
        assert_eq!(first.lane, 0);
        assert!(first.fulfilled);
        assert_eq!(second.lane, 0);
        assert!(!second.fulfilled);
    }
}
