//! Targets and the shared target set
//!
//! The set keeps targets in insertion order (ids are allocated monotonically)
//! and maintains one "closest eligible target" slot per lane, so input
//! resolution never has to scan the whole set.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::LANE_COUNT;
use crate::lane_center_y;
use crate::tuning::Tuning;

/// The four player actions. Each is bound to exactly one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    SlashBlue,
    ParryBlue,
    ParryRed,
    SlashRed,
}

impl Action {
    /// All actions in lane order
    pub const ALL: [Action; LANE_COUNT] = [
        Action::SlashBlue,
        Action::ParryBlue,
        Action::ParryRed,
        Action::SlashRed,
    ];

    /// Lane (1-based) this action belongs to
    pub fn lane(self) -> u8 {
        match self {
            Action::SlashBlue => 1,
            Action::ParryBlue => 2,
            Action::ParryRed => 3,
            Action::SlashRed => 4,
        }
    }

    /// Inverse of [`Action::lane`]
    pub fn from_lane(lane: u8) -> Option<Action> {
        match lane {
            1 => Some(Action::SlashBlue),
            2 => Some(Action::ParryBlue),
            3 => Some(Action::ParryRed),
            4 => Some(Action::SlashRed),
            _ => None,
        }
    }

    pub fn is_parry(self) -> bool {
        matches!(self, Action::ParryBlue | Action::ParryRed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::SlashBlue => "slash-blue",
            Action::ParryBlue => "parry-blue",
            Action::ParryRed => "parry-red",
            Action::SlashRed => "slash-red",
        }
    }
}

/// Target archetypes (affect speed and size only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    Normal,
    Fast,
    Tank,
}

impl TargetKind {
    pub const ALL: [TargetKind; 3] = [TargetKind::Normal, TargetKind::Fast, TargetKind::Tank];
}

/// A timed object travelling down its lane toward the miss boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    /// 1..=4, derived from `required_action`
    pub lane: u8,
    pub required_action: Action,
    pub kind: TargetKind,
    /// Travel-axis position (decreases every movement tick)
    pub position: f32,
    /// Travel per movement tick
    pub speed: f32,
    pub size: f32,
    /// Vertical center of the lane band
    pub lane_y: f32,
    pub hit: bool,
    /// Cached `position ∈ [range_near, range_far]`
    pub in_range: bool,
}

impl Target {
    /// Eligible for input resolution
    #[inline]
    pub fn is_eligible(&self) -> bool {
        self.in_range && !self.hit
    }

    /// Screen position (travel axis, lane center)
    pub fn screen_pos(&self) -> Vec2 {
        Vec2::new(self.position, self.lane_y)
    }

    /// Advance one movement tick and refresh the hit-window flag
    pub fn advance(&mut self, tuning: &Tuning) {
        self.position -= self.speed;
        self.in_range = tuning.in_range(self.position);
    }
}

/// Why a target left the set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    Missed,
    Offscreen,
}

/// Ordering used for selection: closest to the miss boundary first,
/// then insertion order.
fn selection_order(a: &Target, b: &Target) -> Ordering {
    a.position
        .total_cmp(&b.position)
        .then_with(|| a.id.cmp(&b.id))
}

/// Shared collection of in-flight targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSet {
    /// Keyed by id, so iteration is insertion order
    targets: BTreeMap<u32, Target>,
    /// Closest eligible target id per lane (index = lane - 1)
    slots: [Option<u32>; LANE_COUNT],
    next_id: u32,
}

impl Default for TargetSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetSet {
    pub fn new() -> Self {
        Self {
            targets: BTreeMap::new(),
            slots: [None; LANE_COUNT],
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn get(&self, id: u32) -> Option<&Target> {
        self.targets.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.targets.contains_key(&id)
    }

    /// Remove everything (ids keep counting up)
    pub fn clear(&mut self) {
        self.targets.clear();
        self.slots = [None; LANE_COUNT];
    }

    /// Create and insert a target for `action` at `position`. Returns its id.
    pub fn insert(
        &mut self,
        action: Action,
        kind: TargetKind,
        position: f32,
        tuning: &Tuning,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let stats = tuning.kind_stats(kind);
        let lane = action.lane();
        self.targets.insert(
            id,
            Target {
                id,
                lane,
                required_action: action,
                kind,
                position,
                speed: stats.speed,
                size: stats.size,
                lane_y: lane_center_y(lane, tuning.play_height),
                hit: false,
                in_range: tuning.in_range(position),
            },
        );
        self.refresh_lane(lane);
        id
    }

    /// Remove a target. Returns `None` if it is already gone, which makes
    /// every removal path exclusive: only the first caller gets the target.
    pub fn take(&mut self, id: u32) -> Option<Target> {
        let target = self.targets.remove(&id)?;
        self.refresh_lane(target.lane);
        Some(target)
    }

    /// Move every target one tick and rebuild all lane slots in a single pass
    pub fn advance_all(&mut self, tuning: &Tuning) {
        for target in self.targets.values_mut() {
            target.advance(tuning);
        }
        self.refresh_slots();
    }

    /// Remove targets past the miss or offscreen boundary, in insertion order
    pub fn drain_expired(&mut self, tuning: &Tuning) -> Vec<(Target, RemovalCause)> {
        let doomed: Vec<(u32, RemovalCause)> = self
            .targets
            .values()
            .filter_map(|t| {
                if !t.hit && t.position < tuning.miss_threshold {
                    Some((t.id, RemovalCause::Missed))
                } else if t.position < tuning.offscreen_threshold {
                    Some((t.id, RemovalCause::Offscreen))
                } else {
                    None
                }
            })
            .collect();

        let expired: Vec<(Target, RemovalCause)> = doomed
            .into_iter()
            .filter_map(|(id, cause)| self.targets.remove(&id).map(|t| (t, cause)))
            .collect();
        if !expired.is_empty() {
            self.refresh_slots();
        }
        expired
    }

    /// Closest eligible target in a lane
    pub fn eligible_in_lane(&self, lane: u8) -> Option<&Target> {
        let slot = self.slots.get(usize::from(lane).checked_sub(1)?)?;
        (*slot).and_then(|id| self.get(id))
    }

    /// The target an input would resolve against: the eligible target closest
    /// to the miss boundary across all lanes (ties by insertion order).
    pub fn select(&self) -> Option<&Target> {
        (1..=LANE_COUNT as u8)
            .filter_map(|lane| self.eligible_in_lane(lane))
            .min_by(|a, b| selection_order(a, b))
    }

    fn refresh_lane(&mut self, lane: u8) {
        let Some(index) = usize::from(lane).checked_sub(1) else {
            return;
        };
        if index >= LANE_COUNT {
            return;
        }
        self.slots[index] = self
            .targets
            .values()
            .filter(|t| t.lane == lane && t.is_eligible())
            .min_by(|a, b| selection_order(a, b))
            .map(|t| t.id);
    }

    fn refresh_slots(&mut self) {
        let mut best: [Option<&Target>; LANE_COUNT] = [None; LANE_COUNT];
        for target in self.targets.values().filter(|t| t.is_eligible()) {
            let index = usize::from(target.lane) - 1;
            let replace = match best[index] {
                Some(current) => selection_order(target, current) == Ordering::Less,
                None => true,
            };
            if replace {
                best[index] = Some(target);
            }
        }
        self.slots = best.map(|t| t.map(|t| t.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    #[test]
    fn test_action_lane_mapping_is_bijective() {
        for action in Action::ALL {
            assert_eq!(Action::from_lane(action.lane()), Some(action));
        }
        assert_eq!(Action::from_lane(0), None);
        assert_eq!(Action::from_lane(5), None);
    }

    #[test]
    fn test_insert_derives_lane_and_range() {
        let tuning = tuning();
        let mut set = TargetSet::new();
        let id = set.insert(Action::ParryRed, TargetKind::Tank, 100.0, &tuning);
        let target = set.get(id).unwrap();
        assert_eq!(target.lane, 3);
        assert_eq!(target.lane_y, 250.0);
        assert_eq!(target.speed, tuning.tank.speed);
        assert!(target.in_range);
        assert_eq!(set.eligible_in_lane(3).map(|t| t.id), Some(id));
    }

    #[test]
    fn test_take_is_exclusive() {
        let tuning = tuning();
        let mut set = TargetSet::new();
        let id = set.insert(Action::SlashBlue, TargetKind::Normal, 100.0, &tuning);
        assert!(set.take(id).is_some());
        assert!(set.take(id).is_none());
        assert!(set.select().is_none());
    }

    #[test]
    fn test_select_prefers_lowest_position_across_lanes() {
        let tuning = tuning();
        let mut set = TargetSet::new();
        set.insert(Action::SlashBlue, TargetKind::Normal, 150.0, &tuning);
        let closest = set.insert(Action::SlashRed, TargetKind::Normal, 90.0, &tuning);
        set.insert(Action::ParryBlue, TargetKind::Normal, 120.0, &tuning);
        // Out of window, closer to the boundary but not eligible
        set.insert(Action::ParryRed, TargetKind::Normal, 70.0, &tuning);

        assert_eq!(set.select().map(|t| t.id), Some(closest));
    }

    #[test]
    fn test_select_ties_break_by_insertion_order() {
        let tuning = tuning();
        let mut set = TargetSet::new();
        let first = set.insert(Action::ParryRed, TargetKind::Normal, 100.0, &tuning);
        set.insert(Action::SlashBlue, TargetKind::Normal, 100.0, &tuning);
        assert_eq!(set.select().map(|t| t.id), Some(first));
    }

    #[test]
    fn test_slots_follow_movement() {
        let tuning = tuning();
        let mut set = TargetSet::new();
        let id = set.insert(Action::SlashBlue, TargetKind::Normal, 165.0, &tuning);
        assert!(set.select().is_none());

        set.advance_all(&tuning);
        assert_eq!(set.select().map(|t| t.id), Some(id));
    }

    #[test]
    fn test_drain_expired_classifies_causes() {
        let tuning = tuning();
        let mut set = TargetSet::new();
        let missed = set.insert(Action::SlashBlue, TargetKind::Normal, 59.0, &tuning);
        let kept = set.insert(Action::ParryBlue, TargetKind::Normal, 300.0, &tuning);

        let expired = set.drain_expired(&tuning);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].0.id, missed);
        assert_eq!(expired[0].1, RemovalCause::Missed);
        assert!(set.contains(kept));
    }

    #[test]
    fn test_hit_targets_past_boundary_are_offscreen_cleanup() {
        let tuning = tuning();
        let mut set = TargetSet::new();
        let id = set.insert(Action::SlashBlue, TargetKind::Normal, -60.0, &tuning);
        if let Some(target) = set.targets.get_mut(&id) {
            target.hit = true;
        }

        let expired = set.drain_expired(&tuning);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].0.id, id);
        assert_eq!(expired[0].1, RemovalCause::Offscreen);
    }
}
