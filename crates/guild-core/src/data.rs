//! Static balance data - difficulty tiers, monsters, traits, hunters.
//!
//! Loaded once from JSON and never mutated. Hunter definitions reference
//! traits by id; [`GameData::hunter_profiles`] resolves those references into
//! shared, immutable [`HunterProfile`]s that roster entities point at.

use std::collections::HashSet;
use std::sync::Arc;

use guild_logic::constants::{generation, hunters};
use guild_logic::progression::LevelCurve;
use guild_logic::stats::{
    aggregate_traits, combat_strength, BaseStats, StatGrowth, TraitModifiers, TraitTotals,
};
use serde::{Deserialize, Serialize};

use crate::error::DataError;

fn default_weight() -> u32 {
    1
}

fn default_min_party() -> usize {
    generation::DEFAULT_MIN_PARTY
}

fn default_max_party() -> usize {
    generation::DEFAULT_MAX_PARTY
}

fn default_starting_level() -> u32 {
    hunters::STARTING_LEVEL
}

fn default_xp_per_level() -> u32 {
    hunters::XP_PER_LEVEL
}

/// Order template for a band of standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    pub min_standing: i64,
    pub max_standing: i64,
    pub difficulty: i32,
    pub staffing_secs: f64,
    pub mission_secs: f64,
    pub gold_reward: i64,
    pub xp_reward: u32,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default = "default_min_party")]
    pub min_party: usize,
    #[serde(default = "default_max_party")]
    pub max_party: usize,
    #[serde(default)]
    pub difficulty_variance: i32,
    #[serde(default)]
    pub gold_variance: i64,
    #[serde(default)]
    pub xp_variance: u32,
    #[serde(default)]
    pub staffing_variance: f64,
    #[serde(default)]
    pub mission_variance: f64,
}

impl DifficultyTier {
    /// Whether `standing` falls inside `[min_standing, max_standing]`.
    pub fn admits(&self, standing: i64) -> bool {
        (self.min_standing..=self.max_standing).contains(&standing)
    }

    fn check(&self) -> Result<(), String> {
        if self.min_standing > self.max_standing {
            return Err(format!(
                "standing range {}..={} is inverted",
                self.min_standing, self.max_standing
            ));
        }
        if self.min_party < 1 || self.min_party > self.max_party {
            return Err(format!(
                "party bounds {}..={} are invalid",
                self.min_party, self.max_party
            ));
        }
        if !(self.staffing_secs > 0.0) || !(self.mission_secs > 0.0) {
            return Err("durations must be positive".to_string());
        }
        if self.difficulty_variance < 0
            || self.gold_variance < 0
            || self.staffing_variance < 0.0
            || self.mission_variance < 0.0
        {
            return Err("variances must be non-negative".to_string());
        }
        Ok(())
    }
}

/// A monster variant an order can target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterDef {
    pub id: String,
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Descriptive monster trait ids.
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A hunter trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitDef {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub modifiers: TraitModifiers,
    /// Monster traits this one is good against. Descriptive only.
    #[serde(default)]
    pub counters: Vec<String>,
}

/// A recruitable hunter as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HunterDef {
    pub id: String,
    pub name: String,
    pub class: String,
    pub base: BaseStats,
    #[serde(default)]
    pub growth: StatGrowth,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub daily_upkeep: i64,
    #[serde(default = "default_starting_level")]
    pub starting_level: u32,
    #[serde(default)]
    pub starting_xp: u32,
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u32,
    #[serde(default)]
    pub unlock_standing: i64,
}

/// Immutable hunter profile with traits resolved, shared by roster entities.
#[derive(Debug, Clone, PartialEq)]
pub struct HunterProfile {
    pub definition_id: String,
    pub name: String,
    pub class: String,
    pub base: BaseStats,
    pub growth: StatGrowth,
    pub trait_names: Vec<String>,
    pub traits: Vec<TraitModifiers>,
    pub daily_upkeep: i64,
    pub starting_level: u32,
    pub starting_xp: u32,
    pub curve: LevelCurve,
    pub unlock_standing: i64,
}

impl HunterProfile {
    pub fn strength_at(&self, level: u32) -> i32 {
        combat_strength(&self.base, &self.growth, level, &self.traits)
    }

    pub fn trait_totals(&self) -> TraitTotals {
        aggregate_traits(&self.traits)
    }
}

/// The full balance bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameData {
    pub difficulty_tiers: Vec<DifficultyTier>,
    pub monsters: Vec<MonsterDef>,
    pub traits: Vec<TraitDef>,
    pub hunters: Vec<HunterDef>,
}

impl GameData {
    /// Parse and validate.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        for (index, tier) in self.difficulty_tiers.iter().enumerate() {
            tier.check()
                .map_err(|reason| DataError::InvalidTier { index, reason })?;
        }

        let mut seen = HashSet::new();
        for def in &self.hunters {
            let invalid = |reason: &str| DataError::InvalidHunter {
                hunter: def.id.clone(),
                reason: reason.to_string(),
            };
            if !seen.insert(def.id.as_str()) {
                return Err(invalid("duplicate id"));
            }
            if def.starting_level < 1 {
                return Err(invalid("starting level must be at least 1"));
            }
            if def.xp_per_level < 1 {
                return Err(invalid("xp per level must be at least 1"));
            }
            if def.daily_upkeep < 0 {
                return Err(invalid("daily upkeep must be non-negative"));
            }
            for trait_id in &def.traits {
                if self.trait_def(trait_id).is_none() {
                    return Err(DataError::UnknownTrait {
                        hunter: def.id.clone(),
                        trait_id: trait_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn trait_def(&self, id: &str) -> Option<&TraitDef> {
        self.traits.iter().find(|t| t.id == id)
    }

    /// Tiers whose standing band contains `standing`, in data order.
    pub fn eligible_tiers(&self, standing: i64) -> Vec<&DifficultyTier> {
        self.difficulty_tiers
            .iter()
            .filter(|t| t.admits(standing))
            .collect()
    }

    /// Resolve every hunter definition into a shared profile.
    pub fn hunter_profiles(&self) -> Result<Vec<Arc<HunterProfile>>, DataError> {
        self.hunters
            .iter()
            .map(|def| self.resolve_profile(def).map(Arc::new))
            .collect()
    }

    fn resolve_profile(&self, def: &HunterDef) -> Result<HunterProfile, DataError> {
        let mut traits = Vec::with_capacity(def.traits.len());
        let mut trait_names = Vec::with_capacity(def.traits.len());
        for trait_id in &def.traits {
            let t = self.trait_def(trait_id).ok_or_else(|| DataError::UnknownTrait {
                hunter: def.id.clone(),
                trait_id: trait_id.clone(),
            })?;
            traits.push(t.modifiers);
            trait_names.push(t.name.clone());
        }
        Ok(HunterProfile {
            definition_id: def.id.clone(),
            name: def.name.clone(),
            class: def.class.clone(),
            base: def.base,
            growth: def.growth,
            trait_names,
            traits,
            daily_upkeep: def.daily_upkeep,
            starting_level: def.starting_level,
            starting_xp: def.starting_xp,
            curve: LevelCurve::flat(def.xp_per_level),
            unlock_standing: def.unlock_standing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "difficulty_tiers": [
            { "min_standing": 0, "max_standing": 10, "difficulty": 12,
              "staffing_secs": 600, "mission_secs": 900,
              "gold_reward": 100, "xp_reward": 40 }
        ],
        "monsters": [ { "id": "wolf", "name": "Dire Wolf" } ],
        "traits": [
            { "id": "brave", "name": "Brave", "power": 0.1, "success_chance_bonus": 3 }
        ],
        "hunters": [
            { "id": "ash", "name": "Ash", "class": "Warrior",
              "base": { "power": 6, "defense": 4, "resolve": 3 },
              "traits": ["brave"], "daily_upkeep": 10 }
        ]
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let data = GameData::from_json_str(SAMPLE).unwrap();
        let tier = &data.difficulty_tiers[0];
        assert_eq!(tier.weight, 1);
        assert_eq!((tier.min_party, tier.max_party), (1, 3));
        assert_eq!(tier.difficulty_variance, 0);
        assert_eq!(data.monsters[0].weight, 1);
        let hunter = &data.hunters[0];
        assert_eq!(hunter.starting_level, 1);
        assert_eq!(hunter.xp_per_level, 100);
        assert_eq!(hunter.growth, StatGrowth::default());
    }

    #[test]
    fn test_flattened_trait_modifiers() {
        let data = GameData::from_json_str(SAMPLE).unwrap();
        let brave = data.trait_def("brave").unwrap();
        assert_eq!(brave.modifiers.power, 0.1);
        assert_eq!(brave.modifiers.success_chance_bonus, 3.0);
        // unspecified risk modifiers stay neutral
        assert_eq!(brave.modifiers.death_risk, 1.0);
    }

    #[test]
    fn test_profiles_resolve_traits() {
        let data = GameData::from_json_str(SAMPLE).unwrap();
        let profiles = data.hunter_profiles().unwrap();
        let ash = &profiles[0];
        assert_eq!(ash.trait_names, vec!["Brave".to_string()]);
        // power 6 * 1.1 rounds to 7
        assert_eq!(ash.strength_at(1), 14);
        assert_eq!(ash.trait_totals().success_bonus, 3.0);
    }

    #[test]
    fn test_unknown_trait_rejected() {
        let json = SAMPLE.replace(r#"["brave"]"#, r#"["clumsy"]"#);
        let err = GameData::from_json_str(&json).unwrap_err();
        assert!(matches!(
            err,
            DataError::UnknownTrait { ref trait_id, .. } if trait_id == "clumsy"
        ));
    }

    #[test]
    fn test_inverted_tier_rejected() {
        let json = SAMPLE.replace(r#""max_standing": 10"#, r#""max_standing": -1"#);
        let err = GameData::from_json_str(&json).unwrap_err();
        assert!(matches!(err, DataError::InvalidTier { index: 0, .. }));
    }

    #[test]
    fn test_bad_party_bounds_rejected() {
        let json = SAMPLE.replace(r#""xp_reward": 40"#, r#""xp_reward": 40, "min_party": 4"#);
        assert!(matches!(
            GameData::from_json_str(&json),
            Err(DataError::InvalidTier { .. })
        ));
    }

    #[test]
    fn test_eligible_tiers() {
        let data = GameData::from_json_str(SAMPLE).unwrap();
        assert_eq!(data.eligible_tiers(0).len(), 1);
        assert_eq!(data.eligible_tiers(10).len(), 1);
        assert!(data.eligible_tiers(11).is_empty());
    }

    #[test]
    fn test_empty_document_is_valid() {
        let data = GameData::from_json_str("{}").unwrap();
        assert!(data.hunter_profiles().unwrap().is_empty());
    }
}
