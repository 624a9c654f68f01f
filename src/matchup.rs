// matchup.rs
// Defensive type matchups for a creature with one or more types.

use std::collections::BTreeMap;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::api::PokeApi;
use crate::pokemon::DamageRelations;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Matchup {
    pub type_name: String,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Effectiveness {
    /// Multiplier above 1, highest first.
    pub weaknesses: Vec<Matchup>,
    /// Multiplier strictly between 0 and 1, lowest first.
    pub resistances: Vec<Matchup>,
    pub immunities: Vec<Matchup>,
}

impl Effectiveness {
    pub fn is_empty(&self) -> bool {
        self.weaknesses.is_empty() && self.resistances.is_empty() && self.immunities.is_empty()
    }
}

/// Combines the damage relations of each of a creature's types into one
/// classification. A single "no damage" relation makes the attacking type 0x
/// no matter what the other types say.
pub fn combine<'a, I>(relations: I) -> Effectiveness
where
    I: IntoIterator<Item = &'a DamageRelations>,
{
    let mut multipliers: BTreeMap<&'a str, f64> = BTreeMap::new();

    for relation in relations {
        for attacker in &relation.double_damage_from {
            *multipliers.entry(attacker.name.as_str()).or_insert(1.0) *= 2.0;
        }
        for attacker in &relation.half_damage_from {
            *multipliers.entry(attacker.name.as_str()).or_insert(1.0) *= 0.5;
        }
        for attacker in &relation.no_damage_from {
            multipliers.insert(attacker.name.as_str(), 0.0);
        }
    }

    let mut result = Effectiveness::default();
    for (type_name, multiplier) in multipliers {
        let entry = Matchup {
            type_name: type_name.to_string(),
            multiplier,
        };
        if multiplier == 0.0 {
            result.immunities.push(entry);
        } else if multiplier > 1.0 {
            result.weaknesses.push(entry);
        } else if multiplier < 1.0 {
            result.resistances.push(entry);
        }
    }

    result
        .weaknesses
        .sort_by(|a, b| b.multiplier.total_cmp(&a.multiplier));
    result
        .resistances
        .sort_by(|a, b| a.multiplier.total_cmp(&b.multiplier));

    result
}

/// Fetches the relations of every type concurrently and combines them.
/// Types that fail to load are left out; this never fails.
pub async fn aggregate<A: PokeApi>(api: &A, type_names: &[String]) -> Effectiveness {
    let responses = join_all(type_names.iter().map(|name| api.type_relations(name))).await;

    let relations: Vec<DamageRelations> = type_names
        .iter()
        .zip(responses)
        .filter_map(|(name, response)| match response {
            Ok(info) => Some(info.damage_relations),
            Err(e) => {
                tracing::warn!("Leaving type {} out of matchups: {}", name, e);
                None
            }
        })
        .collect();

    tracing::debug!(
        "Combining damage relations for {} of {} types",
        relations.len(),
        type_names.len()
    );
    combine(&relations)
}
