//! Dataset ID normalization for DSL documents
//!
//! Exported DSL documents reference knowledge bases by environment-specific
//! IDs. [`replace_dataset_ids`] swaps each ID found at a dataset reference
//! site for a placeholder derived from the dataset name, and
//! [`restore_dataset_ids`] binds the placeholders to the datasets of another
//! environment.
//!
//! Only reference sites are touched (see [`scanner`]); an ID that shows up in
//! a prompt or description stays as it is, and the rest of the document is
//! kept byte for byte.

pub mod placeholder;
pub mod scanner;

pub use placeholder::{dataset_slug, format_placeholder, parse_placeholder, PlaceholderTable};
pub use scanner::{rewrite_reference_sites, Rewritten};

/// Replace dataset IDs at reference sites with `{{#dataset.<slug>#}}`
///
/// Placeholders are written as single-quoted scalars so the document stays
/// valid YAML. IDs that are not in `table` are left alone, and running the
/// function on its own output changes nothing.
///
/// # Examples
///
/// ```
/// use dsl_exporter::core::transform::{replace_dataset_ids, PlaceholderTable};
/// use dsl_exporter::domain::{DatasetId, DatasetMapping};
///
/// let table = PlaceholderTable::from_datasets(&[DatasetMapping::new(
///     DatasetId::new("6f1c2d3e").unwrap(),
///     "FAQ",
/// )]);
///
/// let dsl = "dataset_ids:\n- 6f1c2d3e\n";
/// assert_eq!(
///     replace_dataset_ids(dsl, &table),
///     "dataset_ids:\n- '{{#dataset.faq#}}'\n"
/// );
/// ```
pub fn replace_dataset_ids(document: &str, table: &PlaceholderTable) -> String {
    let result = rewrite_reference_sites(document, |value| {
        table
            .placeholder_for(value)
            .map(|placeholder| format!("'{placeholder}'"))
    });

    tracing::debug!(
        replacements = result.replacements,
        "Replaced dataset IDs with placeholders"
    );

    let residual = residual_id_lines(&result.text, table);
    if residual > 0 {
        tracing::warn!(
            replacements = result.replacements,
            residual_lines = residual,
            "Known dataset IDs remain in the normalized document outside recognized reference sites"
        );
    }

    result.text
}

/// Count lines whose value is nothing but a dataset ID from `table`
///
/// A sequence dash, a `key:` prefix, flow brackets and quotes are ignored,
/// and each comma-separated piece is checked on its own. IDs inside running
/// text do not count.
pub fn residual_id_lines(document: &str, table: &PlaceholderTable) -> usize {
    if table.is_empty() {
        return 0;
    }

    document
        .lines()
        .filter(|line| {
            let mut value = line.trim();
            while let Some(rest) = value.strip_prefix('-') {
                if !(rest.is_empty() || rest.starts_with(' ')) {
                    break;
                }
                value = rest.trim_start();
            }
            if let Some((_, rest)) = value.split_once(": ") {
                value = rest;
            }
            if let Some(pos) = value.find(" #") {
                value = &value[..pos];
            }
            value.split(',').any(|piece| {
                let piece = piece.trim_matches(|c: char| {
                    c.is_whitespace() || matches!(c, '[' | ']' | '\'' | '"')
                });
                table.slug_for(piece).is_some()
            })
        })
        .count()
}

/// Replace placeholders at reference sites with the IDs bound in `table`
///
/// Placeholders whose slug is not in `table` are left alone. A quoted
/// placeholder is replaced together with its quotes.
pub fn restore_dataset_ids(document: &str, table: &PlaceholderTable) -> String {
    let result = rewrite_reference_sites(document, |value| {
        let slug = parse_placeholder(value)?;
        table.id_for_slug(slug).map(|id| yaml_scalar(id.as_str()))
    });

    tracing::debug!(
        replacements = result.replacements,
        "Restored dataset IDs from placeholders"
    );

    result.text
}

/// Render an ID as a YAML scalar, quoting it only when it is not plain-safe
fn yaml_scalar(value: &str) -> String {
    let plain_safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if plain_safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}
