// crates/docserve-core/src/core/prefix.rs
// ============================================================================
// Module: URL Path Segments
// Description: Prefix normalization and segment-aware path arithmetic.
// Purpose: Shared helpers for composing and decomposing documentation paths.
// Dependencies: percent-encoding
// ============================================================================

//! ## Overview
//! Prefixes are compared as path segments, never as raw strings: `/prefix/`
//! is an ancestor of `/prefix/es/` but not of `/prefixed/`. Every helper here
//! is pure and allocation-light so that resolver and unresolver can share the
//! exact same arithmetic.
//!
//! Paths are composed and matched in decoded form. Percent-encoding happens
//! only at the URL boundary, one segment at a time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes a configured prefix to a single leading and trailing slash.
///
/// Blank input, `/`, and runs of slashes all normalize to `/`.
#[must_use]
pub fn normalize_prefix(raw: &str) -> String {
    let segments: Vec<&str> = path_segments(raw.trim()).collect();
    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}/", segments.join("/"))
}

/// Collapses runs of `/` into a single slash.
#[must_use]
pub fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(ch);
    }
    out
}

/// Joins path parts into an absolute path with exactly one `/` between parts.
///
/// Empty parts are skipped. A trailing slash on the final non-empty part is
/// preserved, which keeps directory-style URLs intact.
#[must_use]
pub fn join_url_path(parts: &[&str]) -> String {
    let mut out = String::from("/");
    for part in parts {
        let part = part.trim_start_matches('/');
        if part.is_empty() {
            continue;
        }
        if !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(part);
    }
    collapse_slashes(&out)
}

// ============================================================================
// SECTION: Segment Arithmetic
// ============================================================================

/// Returns the non-empty `/`-separated segments of `path`.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Removes a normalized `prefix` from `path` on a segment boundary.
///
/// Returns the remainder with its leading slash (`/` when nothing remains),
/// or `None` when `path` does not live under `prefix`.
#[must_use]
pub fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(trimmed)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Splits the first segment off an absolute path.
///
/// Returns the segment and the remainder (with its leading slash, or empty
/// when the segment was last).
#[must_use]
pub fn split_first_segment(path: &str) -> Option<(&str, &str)> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.find('/') {
        Some(index) => Some((&trimmed[.. index], &trimmed[index ..])),
        None => Some((trimmed, "")),
    }
}

/// Returns true when `child` lies strictly below `parent`, segment-wise.
///
/// Both prefixes are normalized before comparison.
#[must_use]
pub fn is_segment_descendant(child: &str, parent: &str) -> bool {
    let child = normalize_prefix(child);
    let parent = normalize_prefix(parent);
    child != parent && strip_path_prefix(&child, &parent).is_some()
}

/// Returns the number of segments in a prefix.
#[must_use]
pub fn segment_count(prefix: &str) -> usize {
    path_segments(prefix).count()
}

// ============================================================================
// SECTION: Percent-Encoding
// ============================================================================

/// Bytes escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encodes each segment of a decoded path, keeping the separators.
#[must_use]
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-decodes each segment of an encoded path, keeping the separators.
///
/// An encoded `/` inside a segment stays escaped as `%2F` so that decoding
/// never changes how a path splits into segments.
#[must_use]
pub fn decode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().replace('/', "%2F"))
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// SECTION: Language Codes
// ============================================================================

/// Returns true when `segment` is shaped like a language code.
///
/// Accepts two or three lowercase ASCII letters, optionally followed by `-`
/// or `_` and a two to four character alphanumeric region (`en`, `ja`,
/// `pt_BR`, `zh-hans`).
#[must_use]
pub fn looks_like_language_code(segment: &str) -> bool {
    let (base, region) = match segment.split_once(['-', '_']) {
        Some((base, region)) => (base, Some(region)),
        None => (segment, None),
    };
    let base_ok = (2 ..= 3).contains(&base.len()) && base.bytes().all(|b| b.is_ascii_lowercase());
    let region_ok = region.is_none_or(|region| {
        (2 ..= 4).contains(&region.len()) && region.bytes().all(|b| b.is_ascii_alphanumeric())
    });
    base_ok && region_ok
}

// ============================================================================
// SECTION: Tests
// ============================================================================
