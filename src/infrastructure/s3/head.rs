// SPDX-License-Identifier: MPL-2.0
//! User metadata carried by `HEAD` response headers.

use crate::domain::gallery::{ItemMetadata, Position, CAPTION_KEY, POSITION_KEY};
use reqwest::header::HeaderMap;

/// Prefix object stores put in front of user metadata header names.
pub const USER_METADATA_PREFIX: &str = "x-amz-meta-";

/// Reads caption and position from `x-amz-meta-*` headers.
///
/// Header lookup is case-insensitive. A missing caption reads as empty and a
/// missing or unparsable position as [`Position::UNSET`].
#[must_use]
pub fn metadata_from_headers(headers: &HeaderMap) -> ItemMetadata {
    let caption = user_metadata(headers, CAPTION_KEY).unwrap_or_default();
    let position = user_metadata(headers, POSITION_KEY)
        .and_then(|raw| Position::parse(&raw))
        .unwrap_or_default();
    ItemMetadata { caption, position }
}

fn user_metadata(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(format!("{USER_METADATA_PREFIX}{name}"))
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).expect("header name"),
                HeaderValue::from_str(value).expect("header value"),
            );
        }
        map
    }

    #[test]
    fn reads_caption_and_position() {
        let metadata = metadata_from_headers(&headers(&[
            ("X-Amz-Meta-Caption", "Ben, bass"),
            ("x-amz-meta-position", " 4 "),
            ("content-type", "image/png"),
        ]));
        assert_eq!(metadata, ItemMetadata::new("Ben, bass", Position::new(4)));
    }

    #[test]
    fn missing_headers_use_defaults() {
        assert_eq!(metadata_from_headers(&HeaderMap::new()), ItemMetadata::default());
    }

    #[test]
    fn unparsable_position_is_unset() {
        let metadata = metadata_from_headers(&headers(&[("x-amz-meta-position", "first")]));
        assert_eq!(metadata.position, Position::UNSET);
    }
}
