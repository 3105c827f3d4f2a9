use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde_json::Number;
use std::collections::BTreeMap;

use crate::api::{Element, OverpassResponse};
use crate::config::SynthesisConfig;
use crate::domain::Record;
use tracing::trace;

const DEFAULT_CATEGORY: &str = "general";
const HOUSE_NUMBERS: std::ops::RangeInclusive<u32> = 1..=200;
const PHONE_DIGITS: std::ops::RangeInclusive<u32> = 800_000_000..=999_999_999;

/// Records that survived normalization plus how many elements were dropped
#[derive(Debug, Default)]
pub struct Normalized {
    pub records: Vec<Record>,
    pub skipped: usize,
    /// Dropped elements keyed by OSM element type (`node`, `way`, ...)
    pub skipped_by_kind: BTreeMap<String, usize>,
}

/// Turns raw Overpass elements into [`Record`]s
///
/// Placeholder fields (address, phone) are drawn from `rng`, so a seeded
/// generator gives reproducible output.
pub struct Normalizer<R> {
    synthesis: SynthesisConfig,
    rng: R,
}

impl Normalizer<StdRng> {
    /// Seeded when `seed` is given, otherwise seeded from OS entropy
    pub fn from_seed(synthesis: SynthesisConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(synthesis, rng)
    }
}

impl<R: Rng> Normalizer<R> {
    pub fn new(synthesis: SynthesisConfig, rng: R) -> Self {
        Self { synthesis, rng }
    }

    /// Normalize a single element at zero-based position `index`
    ///
    /// Returns `None` when the element has no usable coordinates.
    pub fn normalize(
        &mut self,
        element: &Element,
        index: usize,
        type_name: &str,
        category_key: &str,
    ) -> Option<Record> {
        let (lat, lon) = coordinates(element)?;

        let tags = element.tags.clone().unwrap_or_default();
        let ordinal = index + 1;

        let category = tags
            .get(category_key)
            .cloned()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let name = tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| format!("{} {}", title_case(type_name), ordinal));

        Some(Record {
            id: format!("{}-{}", type_name, ordinal),
            type_: type_name.to_string(),
            name,
            category,
            lat,
            lon,
            address: self.address(),
            phone: self.phone(),
            website: String::new(),
            opening_hours: self.synthesis.opening_hours.clone(),
            description: format!("Data hasil scraping {} dari OpenStreetMap", type_name),
            tags,
        })
    }

    /// Normalize every element of a response, keeping input order
    ///
    /// Ids are numbered by position in the response, so skipped elements
    /// leave gaps.
    pub fn normalize_all(
        &mut self,
        response: &OverpassResponse,
        type_name: &str,
        category_key: &str,
    ) -> Normalized {
        let mut normalized = Normalized::default();

        for (index, element) in response.elements.iter().enumerate() {
            match self.normalize(element, index, type_name, category_key) {
                Some(record) => normalized.records.push(record),
                None => {
                    let kind = element.type_.as_deref().unwrap_or("unknown");
                    trace!(kind, id = element.id, index, "Element has no coordinates");
                    normalized.skipped += 1;
                    *normalized
                        .skipped_by_kind
                        .entry(kind.to_string())
                        .or_default() += 1;
                }
            }
        }

        normalized
    }

    fn address(&mut self) -> String {
        let street = self
            .synthesis
            .streets
            .choose(&mut self.rng)
            .map(String::as_str)
            .unwrap_or_default();
        let number = self.rng.gen_range(HOUSE_NUMBERS);
        format!("Jl. {} No. {}", street, number)
    }

    fn phone(&mut self) -> String {
        let digits = self.rng.gen_range(PHONE_DIGITS);
        format!("{}{}", self.synthesis.phone_prefix, digits)
    }
}

/// Pick coordinates: direct `lat`/`lon` first, then the `center` point
///
/// Each axis falls back independently; zero counts as missing. The numbers
/// are returned as sent, so `-7` stays an integer.
pub fn coordinates(element: &Element) -> Option<(Number, Number)> {
    let center = element.center.as_ref();
    let lat = truthy(element.lat.as_ref())
        .or_else(|| truthy(center.and_then(|c| c.lat.as_ref())))?;
    let lon = truthy(element.lon.as_ref())
        .or_else(|| truthy(center.and_then(|c| c.lon.as_ref())))?;
    Some((lat.clone(), lon.clone()))
}

fn truthy(value: Option<&Number>) -> Option<&Number> {
    value.filter(|n| n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()))
}

/// Upper-case the first letter of each word, lower-case the rest
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }

    out
}
