//! Dataset placeholder table
//!
//! Maps dataset IDs to name-derived slugs and back. A placeholder has the
//! form `{{#dataset.<slug>#}}`.

use crate::domain::{DatasetId, DatasetMapping};
use std::collections::{HashMap, HashSet};

const PLACEHOLDER_PREFIX: &str = "{{#dataset.";
const PLACEHOLDER_SUFFIX: &str = "#}}";

/// Slug used when a dataset name has no usable characters
const EMPTY_SLUG: &str = "unnamed";

/// Derive the placeholder slug for a dataset name
///
/// Lower-cases the name, turns whitespace runs into `-` and every other
/// character that is not alphanumeric, `-` or `_` into `_`.
///
/// ```
/// use dsl_exporter::core::transform::dataset_slug;
///
/// assert_eq!(dataset_slug("Product FAQ"), "product-faq");
/// assert_eq!(dataset_slug("Sales/2024 (JP)"), "sales_2024-_jp_");
/// assert_eq!(dataset_slug("   "), "unnamed");
/// ```
pub fn dataset_slug(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;

        if c.is_alphanumeric() || c == '-' || c == '_' {
            slug.push(c);
        } else {
            slug.push('_');
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Render the placeholder token for a slug
pub fn format_placeholder(slug: &str) -> String {
    format!("{PLACEHOLDER_PREFIX}{slug}{PLACEHOLDER_SUFFIX}")
}

/// Extract the slug from a placeholder token, if `value` is one
pub fn parse_placeholder(value: &str) -> Option<&str> {
    let slug = value
        .strip_prefix(PLACEHOLDER_PREFIX)?
        .strip_suffix(PLACEHOLDER_SUFFIX)?;
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

/// Bidirectional dataset ID / slug table for one environment
///
/// Built once per run from the datasets visible to the knowledge API key.
/// Slugs are unique within a table: when several names produce the same
/// slug, entries are ordered by (name, id), the first keeps the bare slug
/// and the others get `-2`, `-3`, ... skipping suffixes that are another
/// dataset's natural slug.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderTable {
    slugs_by_id: HashMap<String, String>,
    ids_by_slug: HashMap<String, DatasetId>,
}

impl PlaceholderTable {
    /// Build the table from the dataset listing
    pub fn from_datasets(datasets: &[DatasetMapping]) -> Self {
        let mut entries: Vec<&DatasetMapping> = datasets.iter().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        entries.dedup_by(|a, b| a.id == b.id);

        let natural: Vec<String> = entries.iter().map(|d| dataset_slug(&d.name)).collect();
        let reserved: HashSet<&str> = natural.iter().map(String::as_str).collect();

        let mut table = Self::default();

        for (dataset, base) in entries.iter().zip(natural.iter()) {
            if table.slugs_by_id.contains_key(dataset.id.as_str()) {
                continue;
            }

            let slug = if table.ids_by_slug.contains_key(base) {
                let mut n = 2usize;
                loop {
                    let candidate = format!("{base}-{n}");
                    if !reserved.contains(candidate.as_str())
                        && !table.ids_by_slug.contains_key(&candidate)
                    {
                        break candidate;
                    }
                    n += 1;
                }
            } else {
                base.clone()
            };

            if &slug != base {
                tracing::warn!(
                    dataset_id = %dataset.id,
                    dataset_name = %dataset.name,
                    slug = %slug,
                    "Dataset name collides with another dataset, using suffixed placeholder"
                );
            }

            table
                .slugs_by_id
                .insert(dataset.id.as_str().to_string(), slug.clone());
            table.ids_by_slug.insert(slug, dataset.id.clone());
        }

        table
    }

    /// Number of datasets in the table
    pub fn len(&self) -> usize {
        self.slugs_by_id.len()
    }

    /// Whether the table has no datasets
    pub fn is_empty(&self) -> bool {
        self.slugs_by_id.is_empty()
    }

    /// Dataset IDs in the table, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.slugs_by_id.keys().map(String::as_str)
    }

    /// Slug assigned to a dataset ID
    pub fn slug_for(&self, dataset_id: &str) -> Option<&str> {
        self.slugs_by_id.get(dataset_id).map(String::as_str)
    }

    /// Placeholder token for a dataset ID
    pub fn placeholder_for(&self, dataset_id: &str) -> Option<String> {
        self.slug_for(dataset_id).map(format_placeholder)
    }

    /// Dataset ID bound to a slug
    pub fn id_for_slug(&self, slug: &str) -> Option<&DatasetId> {
        self.ids_by_slug.get(slug)
    }
}
