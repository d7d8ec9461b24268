// SPDX-License-Identifier: MPL-2.0
//! `ListObjectsV2` response parsing.

use crate::application::port::TransportError;
use crate::domain::storage::ObjectSummary;
use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

/// One page of a bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub objects: Vec<ObjectSummary>,
    pub is_truncated: bool,
    /// Token for the next page; only meaningful when `is_truncated`.
    pub next_token: Option<String>,
}

#[derive(Default)]
struct PendingObject {
    key: Option<String>,
    size: u64,
    last_modified: Option<DateTime<Utc>>,
}

/// Parses a `ListBucketResult` document.
///
/// `Contents` entries without a `Key` are skipped. Missing or unparsable
/// `Size` reads as 0 and an unparsable `LastModified` as absent.
///
/// # Errors
///
/// Returns [`TransportError::Decode`] for malformed XML.
pub fn parse_list_response(xml: &str) -> Result<ListPage, TransportError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut page = ListPage::default();
    let mut current: Option<PendingObject> = None;
    let mut element = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                element = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if element == "Contents" {
                    current = Some(PendingObject::default());
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| TransportError::Decode(err.to_string()))?;
                let text = text.trim();
                match (element.as_str(), current.as_mut()) {
                    ("Key", Some(object)) => object.key = Some(text.to_string()),
                    ("Size", Some(object)) => object.size = text.parse().unwrap_or(0),
                    ("LastModified", Some(object)) => {
                        object.last_modified = DateTime::parse_from_rfc3339(text)
                            .ok()
                            .map(|time| time.with_timezone(&Utc));
                    }
                    ("IsTruncated", None) => page.is_truncated = text == "true",
                    ("NextContinuationToken", None) => {
                        page.next_token = Some(text.to_string());
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"Contents" {
                    if let Some(PendingObject {
                        key: Some(key),
                        size,
                        last_modified,
                    }) = current.take()
                    {
                        page.objects.push(ObjectSummary {
                            key,
                            size,
                            last_modified,
                        });
                    }
                }
                element.clear();
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(TransportError::Decode(format!(
                    "invalid listing at byte {}: {err}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    Ok(page)
}

/// Extracts `<Message>` from an S3 error document, if there is one.
#[must_use]
pub fn error_message(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut in_message = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => in_message = e.local_name().as_ref() == b"Message",
            Ok(Event::Text(e)) if in_message => {
                return e.unescape().ok().map(|text| text.trim().to_string());
            }
            Ok(Event::End(_)) => in_message = false,
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>tabs.14strings.com</Name>
  <Prefix>roster/</Prefix>
  <KeyCount>2</KeyCount>
  <MaxKeys>1000</MaxKeys>
  <IsTruncated>true</IsTruncated>
  <Contents>
    <Key>roster/amy.jpg</Key>
    <LastModified>2024-03-01T12:30:00.000Z</LastModified>
    <ETag>&quot;d41d8cd98f00b204e9800998ecf8427e&quot;</ETag>
    <Size>48211</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
  <Contents>
    <Key>roster/Ben &amp; Co.png</Key>
    <Size>oops</Size>
  </Contents>
  <NextContinuationToken>1ueGcxLPRx1Tr/XYExHnhbYLgveDs2J/wm36Hy4vbOwM=</NextContinuationToken>
</ListBucketResult>"#;

    #[test]
    fn parses_contents_and_pagination() {
        let page = parse_list_response(PAGE).expect("valid listing");

        assert!(page.is_truncated);
        assert_eq!(
            page.next_token.as_deref(),
            Some("1ueGcxLPRx1Tr/XYExHnhbYLgveDs2J/wm36Hy4vbOwM=")
        );
        assert_eq!(page.objects.len(), 2);

        let amy = &page.objects[0];
        assert_eq!(amy.key, "roster/amy.jpg");
        assert_eq!(amy.size, 48_211);
        assert_eq!(
            amy.last_modified.map(|t| t.to_rfc3339()),
            Some("2024-03-01T12:30:00+00:00".to_string())
        );
    }

    #[test]
    fn missing_fields_fall_back() {
        let page = parse_list_response(PAGE).expect("valid listing");
        let ben = &page.objects[1];
        assert_eq!(ben.key, "roster/Ben & Co.png");
        assert_eq!(ben.size, 0);
        assert_eq!(ben.last_modified, None);
    }

    #[test]
    fn empty_listing_has_no_objects() {
        let page = parse_list_response(
            "<ListBucketResult><IsTruncated>false</IsTruncated><KeyCount>0</KeyCount></ListBucketResult>",
        )
        .expect("valid listing");
        assert_eq!(page, ListPage::default());
    }

    #[test]
    fn malformed_xml_is_a_decode_error() {
        let result = parse_list_response("<ListBucketResult><Contents></Key></ListBucketResult>");
        assert!(matches!(result, Err(TransportError::Decode(_))));
    }

    #[test]
    fn error_document_message_is_extracted() {
        let xml = "<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>";
        assert_eq!(error_message(xml).as_deref(), Some("Access Denied"));
        assert_eq!(error_message("not xml at all"), None);
    }
}
