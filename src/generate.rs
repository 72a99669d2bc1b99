//! Bulk generation of records

use crate::content::{ContentRecord, random_id};

/// Format an archive serial number as used by Paperless-ngx, e.g. `ASN00042`
pub fn format_asn(number: u32) -> String {
    format!("ASN{number:05}")
}

/// `count` consecutive archive serial numbers starting at `start`, each used
/// as both the printed text and the QR payload
pub fn asn_records<R: ContentRecord>(start: u32, count: usize) -> Vec<R> {
    (0..count)
        .map_while(|offset| u32::try_from(offset).ok().and_then(|o| start.checked_add(o)))
        .map(|number| {
            let asn = format_asn(number);
            R::from_parts(Some(asn.clone()), Some(asn), random_id())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::QrTextRecord;

    #[test]
    fn test_format_asn() {
        assert_eq!(format_asn(1), "ASN00001");
        assert_eq!(format_asn(12345), "ASN12345");
        assert_eq!(format_asn(123456), "ASN123456");
    }

    #[test]
    fn test_asn_records() {
        let records: Vec<QrTextRecord> = asn_records(7, 3);
        let texts: Vec<_> = records.iter().map(|r| r.text.as_deref().unwrap()).collect();
        assert_eq!(texts, vec!["ASN00007", "ASN00008", "ASN00009"]);
        assert!(records.iter().all(|r| r.text == r.qr_code_content));
    }

    #[test]
    fn test_asn_records_stop_at_u32_max() {
        let records: Vec<QrTextRecord> = asn_records(u32::MAX - 1, 5);
        assert_eq!(records.len(), 2);
    }
}
