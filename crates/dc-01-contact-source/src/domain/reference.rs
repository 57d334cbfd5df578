//! App-specific references embedded in contact URL fields
//!
//! A contact references an internal user when one of its URL fields carries
//! `RESERVED_REFERENCE_LABEL` and its value parses as
//! `messenger://user?id=<peer id>`.

use shared_types::{ExtendedContactData, LabeledValue, PeerId};

/// Label reserved for the app-specific reference URL field.
pub const RESERVED_REFERENCE_LABEL: &str = "messenger-peer";

const REFERENCE_PREFIX: &str = "messenger://user?id=";

/// Decode a reference URL value into a peer id.
///
/// Returns `None` for malformed or foreign values.
pub fn parse_app_specific_reference(value: &str) -> Option<PeerId> {
    let id = value.trim().strip_prefix(REFERENCE_PREFIX)?;
    // Trailing query parameters are tolerated.
    let id = id.split('&').next().unwrap_or(id);
    id.parse().ok()
}

/// Encode a peer id as a reference URL value.
pub fn encode_app_specific_reference(peer: PeerId) -> String {
    format!("{}{}", REFERENCE_PREFIX, peer.0)
}

/// The peer referenced by `urls`, if any.
///
/// Only fields with the reserved label are considered; the first one that
/// decodes wins.
pub fn reference_in(urls: &[LabeledValue<String>]) -> Option<PeerId> {
    urls.iter()
        .filter(|url| url.label == RESERVED_REFERENCE_LABEL)
        .find_map(|url| {
            let peer = parse_app_specific_reference(&url.value);
            if peer.is_none() {
                tracing::trace!(value = %url.value, "Skipping malformed reference field");
            }
            peer
        })
}

/// Attach a reference field for `peer` unless one is already present.
pub fn with_app_specific_reference(mut data: ExtendedContactData, peer: PeerId) -> ExtendedContactData {
    if reference_in(&data.urls) != Some(peer) {
        data.urls.push(LabeledValue::new(
            RESERVED_REFERENCE_LABEL,
            encode_app_specific_reference(peer),
        ));
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_reference() {
        assert_eq!(
            parse_app_specific_reference("messenger://user?id=12345"),
            Some(PeerId(12345))
        );
        assert_eq!(
            parse_app_specific_reference("messenger://user?id=9&source=share"),
            Some(PeerId(9))
        );
    }

    #[test]
    fn test_parse_rejects_malformed_and_foreign() {
        assert_eq!(parse_app_specific_reference("messenger://user?id="), None);
        assert_eq!(parse_app_specific_reference("messenger://user?id=abc"), None);
        assert_eq!(parse_app_specific_reference("messenger://user?id=-4"), None);
        assert_eq!(parse_app_specific_reference("https://example.org/?id=4"), None);
    }

    #[test]
    fn test_encode_parse_inverse() {
        let peer = PeerId(777);
        assert_eq!(
            parse_app_specific_reference(&encode_app_specific_reference(peer)),
            Some(peer)
        );
    }

    #[test]
    fn test_reference_in_requires_reserved_label() {
        let urls = vec![
            LabeledValue::new("homepage", encode_app_specific_reference(PeerId(1))),
            LabeledValue::new(RESERVED_REFERENCE_LABEL, "garbage".to_string()),
            LabeledValue::new(RESERVED_REFERENCE_LABEL, encode_app_specific_reference(PeerId(2))),
        ];
        assert_eq!(reference_in(&urls), Some(PeerId(2)));
    }

    #[test]
    fn test_with_reference_is_idempotent() {
        let data = with_app_specific_reference(ExtendedContactData::default(), PeerId(5));
        let data = with_app_specific_reference(data, PeerId(5));
        assert_eq!(data.urls.len(), 1);
        assert_eq!(reference_in(&data.urls), Some(PeerId(5)));
    }
}
