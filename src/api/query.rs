use std::fmt;

/// Geometry kinds requested for every filter clause
const ELEMENT_KINDS: [&str; 3] = ["node", "way", "relation"];

/// A single Overpass tag filter, e.g. `["shop"]` or `["amenity"="school"]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: Option<String>,
}

impl TagFilter {
    /// Matches any element carrying `key`
    pub fn has(key: &str) -> Self {
        Self {
            key: key.to_string(),
            value: None,
        }
    }

    /// Matches elements where `key` equals `value`
    pub fn equals(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: Some(value.to_string()),
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are not escaped: a quote in the input ends up in the query as-is
        match &self.value {
            Some(value) => write!(f, r#"["{}"="{}"]"#, self.key, value),
            None => write!(f, r#"["{}"]"#, self.key),
        }
    }
}

/// Filters that must all match the same element
pub type FilterClause = Vec<TagFilter>;

/// Where to search
#[derive(Debug, Clone, PartialEq)]
pub enum AreaScope {
    /// An administrative area looked up by its `name` tag
    Named(String),
    /// A circle of `radius_m` meters around a (lat, lon) point
    Around {
        lat: f64,
        lon: f64,
        radius_m: u32,
    },
}

impl AreaScope {
    fn statement_suffix(&self) -> String {
        match self {
            AreaScope::Named(_) => "(area.area)".to_string(),
            AreaScope::Around { lat, lon, radius_m } => {
                format!("(around:{},{},{})", radius_m, lat, lon)
            }
        }
    }
}

impl fmt::Display for AreaScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaScope::Named(name) => write!(f, "{}", name),
            AreaScope::Around { lat, lon, radius_m } => {
                write!(f, "{}m around ({:.4}, {:.4})", radius_m, lat, lon)
            }
        }
    }
}

/// Build an Overpass QL query for elements inside `scope`
///
/// Every clause is expanded into node, way and relation statements; the
/// statements are unioned, so an element matching any clause is returned.
/// `out center` makes the server emit a center point for ways and relations.
pub fn build_query(scope: &AreaScope, clauses: &[FilterClause]) -> String {
    let mut query = String::from("[out:json];\n");

    if let AreaScope::Named(name) = scope {
        query.push_str(&format!("area[\"name\"=\"{}\"]->.area;\n", name));
    }

    let suffix = scope.statement_suffix();

    query.push_str("(\n");
    for clause in clauses {
        let filters: String = clause.iter().map(TagFilter::to_string).collect();
        for kind in ELEMENT_KINDS {
            query.push_str(&format!("  {}{}{};\n", kind, filters, suffix));
        }
    }
    query.push_str(");\nout center;\n");

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_filter_display() {
        assert_eq!(TagFilter::has("shop").to_string(), r#"["shop"]"#);
        assert_eq!(
            TagFilter::equals("amenity", "school").to_string(),
            r#"["amenity"="school"]"#
        );
    }

    #[test]
    fn test_single_filter_query() {
        let scope = AreaScope::Named("Kota Bandung".to_string());
        let query = build_query(&scope, &[vec![TagFilter::has("shop")]]);

        let expected = r#"[out:json];
area["name"="Kota Bandung"]->.area;
(
  node["shop"](area.area);
  way["shop"](area.area);
  relation["shop"](area.area);
);
out center;
"#;
        assert_eq!(query, expected);
    }

    #[test]
    fn test_multi_clause_query_is_a_union() {
        let scope = AreaScope::Named("Kota Bandung".to_string());
        let values = ["training", "school", "college", "community_centre", "workshop"];
        let clauses: Vec<FilterClause> = values
            .iter()
            .map(|v| vec![TagFilter::equals("amenity", v)])
            .collect();

        let query = build_query(&scope, &clauses);

        for value in values {
            for kind in ["node", "way", "relation"] {
                let statement = format!(r#"  {}["amenity"="{}"](area.area);"#, kind, value);
                assert!(query.contains(&statement), "missing {statement}");
            }
        }
        // One union block, not five separate ones
        assert_eq!(query.matches("(\n").count(), 1);
        assert_eq!(query.lines().filter(|l| l.starts_with("  ")).count(), 15);
    }

    #[test]
    fn test_filters_in_one_clause_are_combined() {
        let scope = AreaScope::Named("X".to_string());
        let clause = vec![TagFilter::has("shop"), TagFilter::equals("name", "Braga")];
        let query = build_query(&scope, &[clause]);

        assert!(query.contains(r#"  node["shop"]["name"="Braga"](area.area);"#));
    }

    #[test]
    fn test_around_scope() {
        let scope = AreaScope::Around {
            lat: -6.9,
            lon: 107.6,
            radius_m: 5000,
        };
        let query = build_query(&scope, &[vec![TagFilter::has("tourism")]]);

        assert!(!query.contains("area["));
        assert!(query.contains(r#"  way["tourism"](around:5000,-6.9,107.6);"#));
    }

    #[test]
    fn test_area_name_is_not_escaped() {
        let scope = AreaScope::Named(r#"Bad"Name"#.to_string());
        let query = build_query(&scope, &[vec![TagFilter::has("shop")]]);

        assert!(query.contains(r#"area["name"="Bad"Name"]->.area;"#));
    }
}
