// evolution.rs
// Flattens evolution chains into display-ready stages. Every chain link except
// the root carries the conditions of the edge leading into it; stages come out
// in depth-first pre-order, so a stage follows its parent and precedes its own
// evolutions.

use serde::{Deserialize, Serialize};

use crate::pokemon::{ChainLink, EvolutionDetail, resource_id};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvolutionStage {
    pub id: u32,
    pub name: String,
    pub sprite: String,
    /// How this stage is reached from its parent. Absent for the root.
    pub method: Option<String>,
}

pub fn sprite_url(sprite_base: &str, id: u32) -> String {
    format!("{}/{}.png", sprite_base.trim_end_matches('/'), id)
}

/// Flattens `root` into stages in pre-order.
///
/// A link whose species URL carries no numeric id is dropped together with
/// everything that evolves from it; the remaining branches are still emitted.
pub fn flatten(root: &ChainLink, sprite_base: &str) -> Vec<EvolutionStage> {
    let mut stages = Vec::new();
    // (link, edge into it)
    let mut stack: Vec<(&ChainLink, Option<&EvolutionDetail>)> = vec![(root, None)];

    while let Some((link, edge)) = stack.pop() {
        let id = match resource_id(&link.species.url) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Skipping evolution branch at {}: {}", link.species.name, e);
                continue;
            }
        };

        stages.push(EvolutionStage {
            id,
            name: link.species.name.clone(),
            sprite: sprite_url(sprite_base, id),
            method: edge.and_then(describe),
        });

        // Reversed so the first child is popped first.
        for child in link.evolves_to.iter().rev() {
            stack.push((child, child.evolution_details.first()));
        }
    }

    stages
}

enum Trigger<'a> {
    LevelUp,
    UseItem,
    Trade,
    Shed,
    Other(&'a str),
}

impl<'a> Trigger<'a> {
    fn from_name(name: &'a str) -> Self {
        match name {
            "level-up" => Trigger::LevelUp,
            "use-item" => Trigger::UseItem,
            "trade" => Trigger::Trade,
            "shed" => Trigger::Shed,
            other => Trigger::Other(other),
        }
    }
}

fn humanize(slug: &str) -> String {
    slug.replace(['-', '_'], " ")
}

/// Human-readable description of an evolution edge, or `None` if nothing in
/// the record produces text.
pub fn describe(detail: &EvolutionDetail) -> Option<String> {
    let mut clauses: Vec<String> = Vec::new();

    match Trigger::from_name(&detail.trigger.name) {
        Trigger::LevelUp => {
            // A zero threshold means no threshold.
            let set = |value: Option<u32>| value.filter(|v| *v > 0);
            let clause = if let Some(level) = set(detail.min_level) {
                format!("Level {}", level)
            } else if set(detail.min_happiness).is_some() {
                "High friendship".to_string()
            } else if set(detail.min_beauty).is_some() {
                "High beauty".to_string()
            } else if let Some(known) = &detail.known_move {
                format!("Knowing {}", humanize(&known.name))
            } else if let Some(known_type) = &detail.known_move_type {
                format!("Knowing {} move", humanize(&known_type.name))
            } else if let Some(location) = &detail.location {
                format!("At {}", humanize(&location.name))
            } else {
                "Level up".to_string()
            };
            clauses.push(clause);
        }
        Trigger::UseItem => {
            if let Some(item) = &detail.item {
                clauses.push(format!("Use {}", humanize(&item.name)));
            }
        }
        Trigger::Trade => {
            clauses.push("Trade".to_string());
            if let Some(held) = &detail.held_item {
                clauses.push(format!("holding {}", humanize(&held.name)));
            }
        }
        Trigger::Shed => clauses.push("Level 20, empty slot, Poké Ball".to_string()),
        Trigger::Other(name) if !name.is_empty() => clauses.push(humanize(name)),
        Trigger::Other(_) => {}
    }

    if let Some(time) = detail.time_of_day.as_deref().filter(|t| !t.is_empty()) {
        clauses.push(format!("({})", time));
    }
    match detail.gender {
        Some(1) => clauses.push("(female)".to_string()),
        Some(_) => clauses.push("(male)".to_string()),
        None => {}
    }
    if detail.needs_overworld_rain {
        clauses.push("(while raining)".to_string());
    }
    if detail.turn_upside_down {
        clauses.push("(hold device upside down)".to_string());
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" "))
    }
}
