// Presentation: flat, serializable view of a certificate with chain times.

use chrono::{DateTime, Months, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::cert::Certificate;

/// Block height to block timestamp lookup, injected by the caller.
pub trait ChainClock {
    /// Unix time (seconds) of the block at `height`, or `None` if the chain
    /// has not reached it.
    fn block_time(&self, height: u32) -> Option<i64>;
}

impl<F> ChainClock for F
where
    F: Fn(u32) -> Option<i64>,
{
    fn block_time(&self, height: u32) -> Option<i64> {
        self(height)
    }
}

/// Add calendar months to a block time. Days past the end of the target
/// month clamp to its last day; time of day is kept.
pub fn add_months_to_block_time(block_time: i64, months: u16) -> Option<i64> {
    let start: DateTime<Utc> = DateTime::from_timestamp(block_time, 0)?;
    start
        .checked_add_months(Months::new(u32::from(months)))
        .map(|end| end.timestamp())
}

/// A list rendered as `{ "<prefix>1": .., "<prefix>2": .. }` in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratedList {
    prefix: &'static str,
    items: Vec<String>,
}

impl EnumeratedList {
    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl Serialize for EnumeratedList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for (i, item) in self.items.iter().enumerate() {
            map.serialize_entry(&format!("{}{}", self.prefix, i + 1), item)?;
        }
        map.end()
    }
}

/// Presentation of a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateView {
    pub version: u32,
    pub signature_algorithm: String,
    pub signature_hash_algorithm: String,
    /// Hex.
    pub fingerprint: String,
    pub months_valid: u16,
    pub subject: String,
    /// Base64.
    pub subject_signature: String,
    pub issuer: String,
    /// Hex.
    pub public_key: String,
    /// Base64.
    pub signature_value: String,
    pub approved: bool,
    pub self_signed: bool,
    pub serial_number: u64,
    /// Hash160 of the public key, byte-reversed hex.
    pub certificate_keyid: String,
    pub key_usage: EnumeratedList,
    pub txid_request: String,
    pub txid_approve: String,
    pub request_time: i64,
    pub request_height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approve_height: Option<u32>,
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl CertificateView {
    /// Build the view. Heights the clock cannot resolve yet render as time 0,
    /// as does a validity end past the calendar range. The validity window
    /// and approve height are present exactly when the certificate is approved.
    pub fn build(cert: &Certificate, clock: &impl ChainClock) -> Self {
        let request_time = clock.block_time(cert.height_request).unwrap_or(0);

        let (valid_from, valid_until, approve_height) = if cert.is_approved() {
            let approve_time = clock.block_time(cert.height_approve).unwrap_or(0);
            (
                Some(approve_time),
                Some(add_months_to_block_time(approve_time, cert.months_valid).unwrap_or(0)),
                Some(cert.height_approve),
            )
        } else {
            (None, None, None)
        };

        Self {
            version: cert.version,
            signature_algorithm: text(&cert.signature_algorithm),
            signature_hash_algorithm: text(&cert.signature_hash_algorithm),
            fingerprint: cert.fingerprint_hex(),
            months_valid: cert.months_valid,
            subject: text(&cert.subject),
            subject_signature: cert.subject_signature_base64(),
            issuer: text(&cert.issuer),
            public_key: cert.public_key_hex(),
            signature_value: cert.signature_value_base64(),
            approved: cert.is_approved(),
            self_signed: cert.is_self_signed(),
            serial_number: cert.serial_number,
            certificate_keyid: cert.key_id().to_hex(),
            key_usage: EnumeratedList {
                prefix: "key_usage",
                items: cert.key_usage.iter().map(|k| text(k)).collect(),
            },
            txid_request: cert.tx_hash_request.to_hex(),
            txid_approve: cert.tx_hash_approve.to_hex(),
            request_time,
            request_height: cert.height_request,
            valid_from,
            valid_until,
            approve_height,
        }
    }

    /// JSON object in field order; `key_usage` entries stay in list order.
    pub fn to_json(&self) -> serde_json::Value {
        // A struct of strings, integers and string maps always serializes.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::Hash256;

    // 2024-01-31T12:00:00Z
    const JAN_31_2024: i64 = 1_706_702_400;

    fn clock(height: u32) -> Option<i64> {
        match height {
            100 => Some(1_700_000_000),
            150 => Some(JAN_31_2024),
            _ => None,
        }
    }

    #[test]
    fn add_months_clamps_to_month_end() {
        // 2024-01-31 + 1 month = 2024-02-29 (leap year), same time of day
        let feb_29 = add_months_to_block_time(JAN_31_2024, 1).unwrap();
        assert_eq!(feb_29 - JAN_31_2024, 29 * 86_400);
        assert_eq!(add_months_to_block_time(JAN_31_2024, 0), Some(JAN_31_2024));
    }

    #[test]
    fn add_twelve_months() {
        // 2024-01-31 -> 2025-01-31, 366 days in 2024
        let next = add_months_to_block_time(JAN_31_2024, 12).unwrap();
        assert_eq!(next - JAN_31_2024, 366 * 86_400);
    }

    #[test]
    fn unapproved_view_has_no_validity() {
        let mut cert = Certificate::new();
        cert.subject = b"alice".to_vec();
        cert.height_request = 100;
        let view = CertificateView::build(&cert, &clock);
        assert!(!view.approved);
        assert_eq!(view.request_time, 1_700_000_000);
        assert_eq!(view.valid_from, None);
        let json = view.to_json();
        assert!(json.get("valid_until").is_none());
        assert!(json.get("approve_height").is_none());
        assert_eq!(json["subject"], "alice");
    }

    #[test]
    fn approved_view_has_validity_window() {
        let mut cert = Certificate::new();
        cert.months_valid = 1;
        cert.height_request = 100;
        cert.height_approve = 150;
        cert.tx_hash_approve = Hash256::from_bytes([7; 32]);
        let view = CertificateView::build(&cert, &clock);
        assert!(view.approved);
        assert_eq!(view.valid_from, Some(JAN_31_2024));
        assert_eq!(view.valid_until, Some(JAN_31_2024 + 29 * 86_400));
        assert_eq!(view.approve_height, Some(150));
        assert_eq!(view.txid_approve, cert.tx_hash_approve.to_hex());
    }

    #[test]
    fn unresolved_heights_default_to_zero() {
        let mut cert = Certificate::new();
        cert.height_request = 5_000;
        cert.height_approve = 6_000;
        let view = CertificateView::build(&cert, &clock);
        assert_eq!(view.request_time, 0);
        assert_eq!(view.valid_from, Some(0));
    }

    #[test]
    fn key_usage_enumerated_in_order() {
        let mut cert = Certificate::new();
        cert.key_usage = (1..=10).map(|i| format!("usage{i}").into_bytes()).collect();
        let view = CertificateView::build(&cert, &clock);
        let json = view.to_json_pretty().unwrap();
        let first = json.find("\"key_usage1\"").unwrap();
        let second = json.find("\"key_usage2\"").unwrap();
        let tenth = json.find("\"key_usage10\"").unwrap();
        assert!(first < second && second < tenth);
        assert_eq!(view.key_usage.items().len(), 10);
    }

    #[test]
    fn validity_end_out_of_range_renders_zero() {
        let far = i64::MAX / 2;
        let mut cert = Certificate::new();
        cert.months_valid = 12;
        cert.height_approve = 1;
        let view = CertificateView::build(&cert, &|_: u32| Some(far));
        assert!(view.approved);
        assert_eq!(view.valid_from, Some(far));
        assert_eq!(view.valid_until, Some(0));
        assert_eq!(view.to_json()["valid_until"], 0);
    }

    #[test]
    fn json_value_keeps_key_usage_order() {
        let mut cert = Certificate::new();
        cert.key_usage = (1..=10).map(|i| format!("usage{i}").into_bytes()).collect();
        let json = CertificateView::build(&cert, &clock).to_json();
        let keys: Vec<&str> = json["key_usage"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let expected: Vec<String> = (1..=10).map(|i| format!("key_usage{i}")).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn key_id_exported() {
        let mut cert = Certificate::new();
        cert.public_key = vec![0x02; 32];
        let view = CertificateView::build(&cert, &clock);
        assert_eq!(view.certificate_keyid, cert.key_id().to_hex());
        assert_eq!(view.to_json()["certificate_keyid"], cert.key_id().to_hex());
    }

    #[test]
    fn binary_fields_are_encoded() {
        let mut cert = Certificate::new();
        cert.public_key = vec![0xAB, 0xCD];
        cert.subject_signature = vec![0xFF; 3];
        let view = CertificateView::build(&cert, &clock);
        assert_eq!(view.public_key, "abcd");
        assert_eq!(view.subject_signature, "////");
    }
}
