use crate::api::{FilterClause, TagFilter};

/// Amenity values that count as a training facility
const TRAINING_AMENITIES: [&str; 5] = [
    "training",
    "school",
    "college",
    "community_centre",
    "workshop",
];

/// The entity categories scraped on every run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Small businesses (any `shop`)
    Umkm,
    /// Tourist attractions (any `tourism`)
    Wisata,
    /// Schools, colleges, community centres and workshops
    Pelatihan,
}

impl Category {
    /// Run order
    pub const ALL: [Category; 3] = [Category::Umkm, Category::Wisata, Category::Pelatihan];

    /// Label written to `type` and used for ids and fallback names
    pub fn label(self) -> &'static str {
        match self {
            Category::Umkm => "umkm",
            Category::Wisata => "wisata",
            Category::Pelatihan => "pelatihan",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Category::Umkm => "umkm.json",
            Category::Wisata => "wisata.json",
            Category::Pelatihan => "pelatihan.json",
        }
    }

    /// Tag whose value becomes the record's `category`
    pub fn category_key(self) -> &'static str {
        match self {
            Category::Umkm => "shop",
            Category::Wisata => "tourism",
            Category::Pelatihan => "amenity",
        }
    }

    /// Overpass filter clauses; an element matching any clause is fetched
    pub fn clauses(self) -> Vec<FilterClause> {
        match self {
            Category::Umkm | Category::Wisata => vec![vec![TagFilter::has(self.category_key())]],
            Category::Pelatihan => TRAINING_AMENITIES
                .iter()
                .map(|value| vec![TagFilter::equals("amenity", value)])
                .collect(),
        }
    }
}
