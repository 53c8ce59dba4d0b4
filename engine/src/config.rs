// ═══════════════════════════════════════════════════════════════════════
// Game config: the unit table and resource rules, loaded once at game
// start and immutable afterwards.
//
// The live game sends this as JSON on the first line of stdin. Local
// matches and tests use `GameConfig::standard()`.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{EngineError, Result};
use crate::types::UnitKind;
use serde::{Deserialize, Serialize};

/// Static stats for one unit kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStats {
    #[serde(default)]
    pub shorthand: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default, alias = "stability", alias = "startHealth")]
    pub health: f64,
    /// Per-shot damage against mobile units.
    #[serde(default, rename = "damageI", alias = "damage")]
    pub damage_to_mobiles: f64,
    /// Per-shot damage against stationary structures.
    #[serde(default, rename = "damageF")]
    pub damage_to_structures: f64,
    #[serde(default, alias = "attackRange")]
    pub range: f64,
    /// Shield granted to each friendly mobile passing within range.
    #[serde(default, alias = "shieldAmount")]
    pub shield: f64,
    /// Health the opponent loses when this unit breaches.
    #[serde(default = "default_breach_damage")]
    pub breach_damage: f64,
}

fn default_breach_damage() -> f64 {
    1.0
}

/// Starting values and per-turn economy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceConfig {
    pub starting_health: f64,
    pub starting_structure_points: f64,
    pub starting_mobile_points: f64,
    pub structure_income: f64,
    pub mobile_income: f64,
    /// Mobile income grows by one every this many turns.
    pub mobile_growth_period: u32,
    /// Fraction of unspent mobile points lost at turn end.
    pub mobile_decay: f64,
    /// Structure points awarded to the attacker per breach.
    pub breach_reward: f64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceConfig {
            starting_health: 30.0,
            starting_structure_points: 40.0,
            starting_mobile_points: 5.0,
            structure_income: 5.0,
            mobile_income: 5.0,
            mobile_growth_period: 10,
            mobile_decay: 0.25,
            breach_reward: 1.0,
        }
    }
}

/// Kind ↔ shorthand lookup plus stats, resolved once per game.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCatalog {
    stats: Vec<UnitStats>,
}

impl UnitCatalog {
    /// Build from the config's unit table. Entries past the six unit
    /// kinds (removal, upgrade) are not units and are dropped.
    pub fn new(mut stats: Vec<UnitStats>) -> Result<Self> {
        if stats.len() < UnitKind::ALL.len() {
            return Err(EngineError::Config(format!(
                "expected at least {} unit entries, got {}",
                UnitKind::ALL.len(),
                stats.len()
            )));
        }
        stats.truncate(UnitKind::ALL.len());
        for (i, s) in stats.iter().enumerate() {
            if s.shorthand.is_empty() {
                return Err(EngineError::Config(format!("unit entry {} has no shorthand", i)));
            }
            if stats[..i].iter().any(|o| o.shorthand == s.shorthand) {
                return Err(EngineError::Config(format!("duplicate shorthand '{}'", s.shorthand)));
            }
        }
        Ok(UnitCatalog { stats })
    }

    pub fn stats(&self, kind: UnitKind) -> &UnitStats {
        &self.stats[kind.index()]
    }

    pub fn shorthand(&self, kind: UnitKind) -> &str {
        &self.stats(kind).shorthand
    }

    pub fn kind_for(&self, shorthand: &str) -> Result<UnitKind> {
        self.stats.iter()
            .position(|s| s.shorthand == shorthand)
            .and_then(UnitKind::from_index)
            .ok_or_else(|| EngineError::UnknownShorthand(shorthand.to_string()))
    }

    /// Largest attack range of any stationary damage dealer.
    pub fn max_structure_range(&self) -> f64 {
        UnitKind::ALL.iter()
            .filter(|k| k.is_stationary())
            .map(|&k| self.stats(k).range)
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub catalog: UnitCatalog,
    pub resources: ResourceConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    unit_information: Vec<UnitStats>,
    #[serde(default)]
    resources: ResourceConfig,
}

impl GameConfig {
    /// Parse the game-start config line.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(text)?;
        Ok(GameConfig {
            catalog: UnitCatalog::new(raw.unit_information)?,
            resources: raw.resources,
        })
    }

    /// Built-in table for local play.
    pub fn standard() -> Self {
        let unit = |shorthand: &str, cost, health, dmg_m, dmg_s, range, shield| UnitStats {
            shorthand: shorthand.to_string(),
            cost,
            health,
            damage_to_mobiles: dmg_m,
            damage_to_structures: dmg_s,
            range,
            shield,
            breach_damage: 1.0,
        };
        let stats = vec![
            unit("FF", 1.0, 60.0, 0.0, 0.0, 0.0, 0.0),
            unit("EF", 4.0, 30.0, 0.0, 0.0, 3.0, 10.0),
            unit("DF", 3.0, 75.0, 4.0, 0.0, 3.0, 0.0),
            unit("PI", 1.0, 15.0, 2.0, 2.0, 3.0, 0.0),
            unit("EI", 3.0, 5.0, 3.0, 3.0, 4.5, 0.0),
            unit("SI", 1.0, 40.0, 4.0, 0.0, 3.5, 0.0),
        ];
        GameConfig {
            // Six distinct shorthands, always valid.
            catalog: UnitCatalog { stats },
            resources: ResourceConfig::default(),
        }
    }

    pub fn stats(&self, kind: UnitKind) -> &UnitStats {
        self.catalog.stats(kind)
    }
}
