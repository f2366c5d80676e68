//! Filesystem-safe names for exported documents
//!
//! Application display names are free text. [`sanitize_filename`] turns one
//! into a deterministic slug, and [`FilenameAllocator`] keeps slugs unique
//! within a single run.

use crate::domain::AppId;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Characters that are invalid in file names on at least one common platform
const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Number of hex characters of the app ID digest appended on collision
const COLLISION_SUFFIX_LEN: usize = 8;

/// Convert a display name into a filesystem-safe slug
///
/// Rules, applied in order:
/// 1. each of `< > : " / \ | ? *` becomes `_`
/// 2. each run of whitespace becomes a single `-`
/// 3. the result is lower-cased as a whole string, so context-dependent
///    mappings such as the Greek final sigma apply
///
/// There is no length limit.
///
/// # Examples
///
/// ```
/// use dsl_exporter::core::sanitize::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Test App"), "my-test-app");
/// assert_eq!(sanitize_filename("App: \"Test\" <Version>"), "app_-_test_-_version_");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let lowered = name.to_lowercase();
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

        slug.push(if RESERVED_CHARS.contains(&c) { '_' } else { c });
    }

    slug
}

/// Hands out unique base filenames for the applications of one run
///
/// The first application to claim a slug keeps it. Later applications with
/// the same slug get `<slug>-<first 8 hex chars of SHA-256(app id)>`, which is
/// stable across runs for the same app.
#[derive(Debug, Default)]
pub struct FilenameAllocator {
    taken: HashSet<String>,
}

impl FilenameAllocator {
    /// Create an allocator with no names claimed
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a base filename (without extension) for an application
    ///
    /// An application whose name sanitizes to nothing is named after its ID.
    pub fn allocate(&mut self, app_id: &AppId, display_name: &str) -> String {
        let mut slug = sanitize_filename(display_name);
        if slug.is_empty() {
            slug = sanitize_filename(app_id.as_str());
        }
        if self.taken.insert(slug.clone()) {
            return slug;
        }

        let digest = app_id_digest(app_id);
        let mut candidate = format!("{slug}-{}", &digest[..COLLISION_SUFFIX_LEN]);

        // Full digest if the short suffix is taken as well
        if !self.taken.insert(candidate.clone()) {
            candidate = format!("{slug}-{digest}");
            self.taken.insert(candidate.clone());
        }

        tracing::warn!(
            app_id = %app_id,
            app_name = %display_name,
            filename = %candidate,
            "Filename collision, using hash-suffixed name"
        );

        candidate
    }
}

fn app_id_digest(app_id: &AppId) -> String {
    let mut hasher = Sha256::new();
    hasher.update(app_id.as_str().as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}
