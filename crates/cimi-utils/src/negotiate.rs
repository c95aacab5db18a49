//! content type negotiation
//!
//! Pick the best representation for an `Accept`-style header among the content types the API
//! can produce. Anything unexpected falls back to [JSON].
pub const JSON: &str = "application/json";
pub const XML: &str = "application/xml";

/// Content types the API can produce, in order of preference
pub const CONTENT_TYPES: [&str; 2] = [JSON, XML];

/// Best match for `accept` among [CONTENT_TYPES]
///
/// The content type with the highest quality wins and ties go to the earlier entry of
/// [CONTENT_TYPES]. Falls back to [JSON] when nothing matches or `accept` does not parse.
///
/// ```
/// # use cimi_utils::negotiate::best_match;
/// assert_eq!(best_match("application/xml"), "application/xml");
/// assert_eq!(best_match("application/json;q=0.5, application/xml"), "application/xml");
/// assert_eq!(best_match("text/html"), "application/json");
/// ```
pub fn best_match(accept: &str) -> &'static str {
    let ranges = match parse_accept(&accept.to_lowercase()) {
        Ok(ranges) => ranges,
        Err(e) => {
            tracing::debug!(accept, error = %e, "unable to parse accept header");
            return JSON;
        }
    };

    let mut best: Option<(&'static str, f32)> = None;
    for offer in CONTENT_TYPES {
        let quality = ranges
            .iter()
            .filter(|range| range.matches(offer))
            .map(|range| range.quality)
            .reduce(f32::max);

        if let Some(quality) = quality {
            if best.map_or(true, |(_, best_quality)| quality > best_quality) {
                best = Some((offer, quality));
            }
        }
    }

    best.map(|(offer, _)| offer).unwrap_or(JSON)
}

#[derive(Debug, PartialEq)]
struct MediaRange {
    mime: String,
    quality: f32,
}

impl MediaRange {
    fn matches(&self, offer: &str) -> bool {
        if self.mime == "*/*" || self.mime == offer {
            return true;
        }

        match self.mime.strip_suffix("/*") {
            Some(main_type) => offer
                .split_once('/')
                .is_some_and(|(offer_type, _)| offer_type == main_type),
            None => false,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
enum AcceptError {
    #[error("Media range {0:?} is not of the form type/subtype")]
    MalformedRange(String),
    #[error("Quality {0:?} is not a number between 0 and 1")]
    InvalidQuality(String),
}

/// Media ranges with a non-zero quality
fn parse_accept(accept: &str) -> Result<Vec<MediaRange>, AcceptError> {
    let mut ranges = vec![];

    for entry in accept.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let mut parts = entry.split(';').map(str::trim);
        let mime = parts.next().unwrap_or_default();
        match mime.split_once('/') {
            Some((main, sub)) if !main.is_empty() && !sub.is_empty() => {}
            _ => return Err(AcceptError::MalformedRange(mime.to_string())),
        }

        let mut quality = 1.0;
        for parameter in parts {
            let Some((name, value)) = parameter.split_once('=') else {
                continue;
            };
            if name.trim() != "q" {
                continue;
            }

            let value = value.trim();
            quality = value
                .parse::<f32>()
                .ok()
                .filter(|q| (0.0..=1.0).contains(q))
                .ok_or_else(|| AcceptError::InvalidQuality(value.to_string()))?;
        }

        if quality > 0.0 {
            ranges.push(MediaRange {
                mime: mime.to_string(),
                quality,
            });
        }
    }

    Ok(ranges)
}
