//! Brand attribution of document bodies.
//!
//! Strategies run in a fixed order and each one only touches text the
//! previous ones left as `unknown`:
//!
//! 1. `【brand】` header lines.
//! 2. Occurrences of configured known brand names.
//! 3. The classifier segmenter, when one is injected.
//!
//! Whatever is still unattributed stays an `unknown` segment holding its
//! original text, so the output is never empty.

use std::sync::LazyLock;

use cupofdata_core::{Segment, UNKNOWN_BRAND};
use regex::Regex;

use crate::capability::{Capabilities, Capability};

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^【([^】\n]+)】").expect("valid header regex"));

#[derive(Debug, Clone, Default)]
pub struct BrandSegmenter {
    known_brands: Vec<String>,
    known_re: Option<Regex>,
}

impl BrandSegmenter {
    /// Create a segmenter; `known_brands` enables the known-brand strategy.
    #[must_use]
    pub fn new(known_brands: Vec<String>) -> Self {
        let mut known_brands: Vec<String> = known_brands
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();
        known_brands.dedup();

        let known_re = if known_brands.is_empty() {
            None
        } else {
            let mut by_length: Vec<&String> = known_brands.iter().collect();
            by_length.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
            let pattern = by_length
                .iter()
                .map(|b| regex::escape(b))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&pattern).expect("escaped literal alternation is a valid regex"))
        };

        Self {
            known_brands,
            known_re,
        }
    }

    #[must_use]
    pub fn known_brands(&self) -> &[String] {
        &self.known_brands
    }

    /// Segment `body`, consulting the classifier for any unattributed residue.
    pub async fn segment(&self, body: &str, caps: &Capabilities) -> Vec<Segment> {
        let mut out = Vec::new();
        for segment in self.segment_deterministic(body) {
            if !segment.is_unknown() {
                out.push(segment);
                continue;
            }
            out.extend(classifier_segments(&segment.content, caps).await);
        }
        out
    }

    /// Header markers, then known brands, without any external call.
    #[must_use]
    pub fn segment_deterministic(&self, body: &str) -> Vec<Segment> {
        let mut out = Vec::new();
        for segment in split_by_headers(body) {
            if segment.is_unknown() {
                out.extend(self.split_by_known_brands(&segment.content));
            } else {
                out.push(segment);
            }
        }
        out
    }

    /// Split `text` at each occurrence of a known brand name.
    ///
    /// Each brand takes the text up to the next brand occurrence; text before
    /// the first occurrence stays `unknown`. With no known brand present the
    /// whole text comes back as one `unknown` segment.
    #[must_use]
    pub fn split_by_known_brands(&self, text: &str) -> Vec<Segment> {
        let Some(re) = &self.known_re else {
            return vec![Segment::unknown(text)];
        };

        let matches: Vec<_> = re.find_iter(text).collect();
        if matches.is_empty() {
            return vec![Segment::unknown(text)];
        }

        let mut out = Vec::new();
        let preamble = text[..matches[0].start()].trim();
        if !preamble.is_empty() {
            out.push(Segment::unknown(preamble));
        }
        for (i, m) in matches.iter().enumerate() {
            let end = matches.get(i + 1).map_or(text.len(), regex::Match::start);
            let content = text[m.end()..end].trim();
            if !content.is_empty() {
                out.push(Segment::new(m.as_str(), content));
            }
        }

        if out.is_empty() {
            vec![Segment::unknown(text)]
        } else {
            out
        }
    }
}

/// Split on `【brand】` header lines.
///
/// Content runs from the header to the next header line or the end of the
/// text. Text before the first header becomes an `unknown` segment.
#[must_use]
pub fn split_by_headers(text: &str) -> Vec<Segment> {
    let headers: Vec<_> = HEADER_RE.captures_iter(text).collect();
    if headers.is_empty() {
        return vec![Segment::unknown(text)];
    }

    let mut out = Vec::new();
    let first_start = headers[0].get(0).map_or(0, |m| m.start());
    let preamble = text[..first_start].trim();
    if !preamble.is_empty() {
        out.push(Segment::unknown(preamble));
    }

    for (i, cap) in headers.iter().enumerate() {
        let (Some(whole), Some(label)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let brand = label.as_str().trim();
        let content = text[whole.end()..end].trim();
        if !brand.is_empty() && !content.is_empty() {
            out.push(Segment::new(brand, content));
        }
    }

    if out.is_empty() {
        vec![Segment::unknown(text)]
    } else {
        out
    }
}

/// Ask the classifier to attribute `text`, falling back to one `unknown` segment.
async fn classifier_segments(text: &str, caps: &Capabilities) -> Vec<Segment> {
    let fallback = || vec![Segment::unknown(text)];

    let Some(segmenter) = &caps.segmenter else {
        return fallback();
    };
    if text.trim().is_empty() {
        return fallback();
    }

    match caps
        .call(Capability::Segmentation, segmenter.segment(text))
        .await
    {
        Ok(segments) => match usable_segments(segments) {
            Some(usable) => {
                tracing::debug!(count = usable.len(), "classifier segmentation accepted");
                usable
            }
            None => {
                tracing::debug!("classifier segmentation unusable; keeping unknown segment");
                fallback()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "segmentation failed; keeping unknown segment");
            fallback()
        }
    }
}

/// Drop blank pairs; reject output that attributes nothing to a real brand.
fn usable_segments(segments: Vec<Segment>) -> Option<Vec<Segment>> {
    let cleaned: Vec<Segment> = segments
        .into_iter()
        .filter_map(|s| {
            let brand = s.brand.trim();
            let content = s.content.trim();
            if content.is_empty() {
                return None;
            }
            let brand = if brand.is_empty() { UNKNOWN_BRAND } else { brand };
            Some(Segment::new(brand, content))
        })
        .collect();

    if cleaned.iter().any(|s| !s.is_unknown()) {
        Some(cleaned)
    } else {
        None
    }
}
