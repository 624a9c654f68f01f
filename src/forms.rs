// forms.rs
// Mega and regional variety classification.

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::api::PokeApi;
use crate::evolution::sprite_url;
use crate::pokemon::{Variety, resource_id};

struct Region {
    marker: &'static str,
    label: &'static str,
    glyph: &'static str,
}

const REGIONS: [Region; 4] = [
    Region { marker: "-alola", label: "Alolan", glyph: "🌺" },
    Region { marker: "-galar", label: "Galarian", glyph: "⚔️" },
    Region { marker: "-hisui", label: "Hisuian", glyph: "🏯" },
    Region { marker: "-paldea", label: "Paldean", glyph: "🌮" },
];

const MEGA_MARKER: &str = "-mega";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MegaVariant {
    X,
    Y,
}

impl MegaVariant {
    fn suffix(self) -> &'static str {
        match self {
            MegaVariant::X => " X",
            MegaVariant::Y => " Y",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormKind {
    Mega {
        stone: String,
        variant: Option<MegaVariant>,
    },
    Regional {
        region: String,
        glyph: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlternateForm {
    pub slug: String,
    pub id: u32,
    pub sprite: String,
    pub display_name: String,
    #[serde(flatten)]
    pub kind: FormKind,
    /// Filled in for regional forms by [`enrich_regional_types`].
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedForms {
    pub mega_forms: Vec<AlternateForm>,
    pub regional_forms: Vec<AlternateForm>,
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn mega_kind(slug: &str, base: &str) -> Option<(FormKind, String)> {
    if !slug.contains(MEGA_MARKER) {
        return None;
    }
    let variant = if slug.ends_with("-mega-x") {
        Some(MegaVariant::X)
    } else if slug.ends_with("-mega-y") {
        Some(MegaVariant::Y)
    } else {
        None
    };
    let suffix = variant.map(MegaVariant::suffix).unwrap_or("");

    let kind = FormKind::Mega {
        stone: format!("{}ite{}", base, suffix),
        variant,
    };
    Some((kind, format!("Mega {}{}", base, suffix)))
}

fn regional_kind(slug: &str, base: &str) -> Option<(FormKind, String)> {
    let region = REGIONS.iter().find(|r| slug.contains(r.marker))?;
    let kind = FormKind::Regional {
        region: region.label.to_string(),
        glyph: region.glyph.to_string(),
    };
    Some((kind, format!("{} {}", region.label, base)))
}

/// Splits a species' non-default varieties into mega and regional forms.
/// Varieties matching neither, or without a numeric id in their URL, are left out.
pub fn classify(varieties: &[Variety], base_name: &str, sprite_base: &str) -> ClassifiedForms {
    let base = capitalize(base_name);
    let mut forms = ClassifiedForms::default();

    for variety in varieties.iter().filter(|v| !v.is_default) {
        let slug = variety.pokemon.name.as_str();
        let (kind, display_name) = match mega_kind(slug, &base) {
            Some(found) => found,
            None => match regional_kind(slug, &base) {
                Some(found) => found,
                None => continue,
            },
        };

        let id = match resource_id(&variety.pokemon.url) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Skipping form {}: {}", slug, e);
                continue;
            }
        };

        let form = AlternateForm {
            slug: slug.to_string(),
            id,
            sprite: sprite_url(sprite_base, id),
            display_name,
            kind,
            types: Vec::new(),
        };
        match form.kind {
            FormKind::Mega { .. } => forms.mega_forms.push(form),
            FormKind::Regional { .. } => forms.regional_forms.push(form),
        }
    }

    forms
}

/// Looks up the types of every regional form concurrently. A form whose
/// lookup fails keeps an empty type list.
pub async fn enrich_regional_types<A: PokeApi>(api: &A, forms: &mut [AlternateForm]) {
    let lookups = join_all(forms.iter().map(|form| api.pokemon(&form.slug))).await;

    for (form, lookup) in forms.iter_mut().zip(lookups) {
        match lookup {
            Ok(pokemon) => form.types = pokemon.type_names(),
            Err(e) => tracing::warn!("No types for form {}: {}", form.slug, e),
        }
    }
}
