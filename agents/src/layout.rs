// ═══════════════════════════════════════════════════════════════════════
// Layout presets: every fixed coordinate table the strategy uses.
//
// Tables are data, not code: a preset can be loaded from JSON so a
// different board plan (or a tiny synthetic one in tests) needs no code
// change. `LayoutPreset::standard()` is the built-in plan.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use td_engine::error::{EngineError, Result};
use td_engine::map;
use td_engine::types::*;

/// A group of cells that all receive the same structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub unit: UnitKind,
    pub cells: Vec<Location>,
}

impl Placement {
    pub fn new(unit: UnitKind, cells: Vec<Location>) -> Self {
        Placement { unit, cells }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPreset {
    /// Corner points placed every turn, including turn 0.
    pub corner: Vec<Placement>,
    /// Secondary corner/edge points added from turn 1 on.
    pub corner_extended: Vec<Placement>,
    /// The two rows just behind the front line, front row first.
    pub rows: [Placement; 2],
    /// Interior funnel, used only when neither row could be completed.
    pub fallback: Vec<Placement>,
    pub left_wall: Vec<Location>,
    pub right_wall: Vec<Location>,
    /// Structure used for the two diagonal walls.
    pub diagonal_wall_unit: UnitKind,
    /// Attack launch points, in priority order.
    pub release_locations: Vec<Location>,
    /// Launch points that only open up once a corner is blocked.
    pub blocked_corner_candidates: Vec<Location>,
    /// Structure placed behind cells we were scored on.
    pub reactive_unit: UnitKind,
    /// Mobile unit sent on attacks.
    pub attack_unit: UnitKind,
}

impl LayoutPreset {
    pub fn standard() -> Self {
        use UnitKind::*;

        let row = |y: i32, xs: &mut dyn Iterator<Item = i32>| -> Vec<Location> {
            xs.map(|x| Location::new(x, y)).collect()
        };
        // Two interior columns on each side of the centre lane.
        let column = |xs: [i32; 2], ys: std::ops::RangeInclusive<i32>| -> Vec<Location> {
            ys.rev().flat_map(|y| xs.map(|x| Location::new(x, y))).collect()
        };

        let mut fallback_turrets = column([11, 16], 5..=11);
        fallback_turrets.extend(locs(&[[12, 4], [15, 4], [12, 3], [15, 3]]));

        LayoutPreset {
            corner: vec![
                Placement::new(Wall, locs(&[[1, 13], [26, 13], [6, 13], [21, 13], [11, 13], [16, 13]])),
                Placement::new(Turret, locs(&[[1, 12], [26, 12], [6, 12], [21, 12], [11, 12], [16, 12]])),
            ],
            corner_extended: vec![
                Placement::new(Wall, locs(&[
                    [0, 13], [27, 13], [2, 13], [25, 13], [8, 13], [19, 13], [17, 13], [10, 13], [23, 13],
                ])),
                Placement::new(Turret, locs(&[
                    [3, 13], [24, 13], [3, 12], [24, 12], [7, 12], [20, 12], [22, 12], [10, 12], [5, 12],
                ])),
            ],
            rows: [
                Placement::new(Wall, row(13, &mut (0..=12).chain(15..=27))),
                Placement::new(Turret, row(12, &mut (1..=11).chain(16..=26))),
            ],
            fallback: vec![
                Placement::new(Wall, column([12, 15], 5..=12)),
                Placement::new(Turret, fallback_turrets),
            ],
            left_wall: locs(&[[12, 3], [11, 4], [10, 5], [9, 6], [8, 7], [7, 8], [6, 9], [5, 10], [4, 11]]),
            right_wall: locs(&[[15, 3], [16, 4], [17, 5], [18, 6], [19, 7], [20, 8], [21, 9], [22, 10], [23, 11]]),
            diagonal_wall_unit: Wall,
            release_locations: locs(&[[15, 1], [12, 1]]),
            blocked_corner_candidates: locs(&[[2, 11], [25, 11]]),
            reactive_unit: Turret,
            attack_unit: Scout,
        }
    }

    /// Corner placements for one turn. With `extended`, each structure's
    /// extra cells follow its base cells, so every corner wall is tried
    /// before any corner turret.
    pub fn corner_tier(&self, extended: bool) -> Vec<Placement> {
        let mut tier = self.corner.clone();
        if !extended {
            return tier;
        }
        for extra in &self.corner_extended {
            match tier.iter_mut().find(|p| p.unit == extra.unit) {
                Some(base) => base.cells.extend_from_slice(&extra.cells),
                None => tier.push(extra.clone()),
            }
        }
        tier
    }

    /// Parse a preset from JSON and check it against the arena.
    pub fn from_json(text: &str) -> Result<Self> {
        let preset: LayoutPreset = serde_json::from_str(text)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Every structure cell must be inside our half, and every launch
    /// point must be on one of our edges.
    pub fn validate(&self) -> Result<()> {
        let placements = self.corner.iter()
            .chain(&self.corner_extended)
            .chain(&self.rows)
            .chain(&self.fallback);
        for p in placements {
            if !p.unit.is_stationary() {
                return Err(EngineError::Config(format!("{} cannot be built as a structure", p.unit)));
            }
            check_own_half(&p.cells)?;
        }
        check_own_half(&self.left_wall)?;
        check_own_half(&self.right_wall)?;
        for unit in [self.diagonal_wall_unit, self.reactive_unit] {
            if !unit.is_stationary() {
                return Err(EngineError::Config(format!("{} is not a structure", unit)));
            }
        }
        if !self.attack_unit.is_mobile() {
            return Err(EngineError::Config(format!("{} cannot attack", self.attack_unit)));
        }
        if self.release_locations.is_empty() {
            return Err(EngineError::Config("no release locations".to_string()));
        }
        for &loc in self.release_locations.iter().chain(&self.blocked_corner_candidates) {
            if !map::edge_of(loc).is_some_and(|e| e.owner() == Player::Me) {
                return Err(EngineError::Config(format!("release point {} is not on our edge", loc)));
            }
        }
        Ok(())
    }
}

impl Default for LayoutPreset {
    fn default() -> Self {
        LayoutPreset::standard()
    }
}

fn check_own_half(cells: &[Location]) -> Result<()> {
    match cells.iter().find(|&&loc| !map::in_arena(loc) || map::half_owner(loc) != Player::Me) {
        Some(loc) => Err(EngineError::Config(format!("{} is outside our half", loc))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_preset_is_valid() {
        let preset = LayoutPreset::standard();
        preset.validate().unwrap();
        assert_eq!(preset.corner[0].cells.len(), 6);
        assert_eq!(preset.corner[1].cells.len(), 6);
        assert_eq!(preset.rows[0].cells.len(), 26);
        assert_eq!(preset.rows[1].cells.len(), 22);
        assert_eq!(preset.fallback[0].cells.len(), 16);
        assert_eq!(preset.fallback[1].cells.len(), 18);
        assert_eq!(preset.fallback[0].cells[0], Location::new(12, 12));
        assert_eq!(preset.fallback[1].cells[0], Location::new(11, 11));
    }

    #[test]
    fn preset_survives_json() {
        let preset = LayoutPreset::standard();
        let text = serde_json::to_string(&preset).unwrap();
        assert_eq!(LayoutPreset::from_json(&text).unwrap(), preset);
    }

    #[test]
    fn cells_on_enemy_half_are_rejected() {
        let mut preset = LayoutPreset::standard();
        preset.left_wall.push(Location::new(13, 14));
        assert!(matches!(preset.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn release_points_must_be_on_our_edge() {
        let mut preset = LayoutPreset::standard();
        preset.release_locations = vec![Location::new(13, 5)];
        assert!(preset.validate().is_err());
    }
}
