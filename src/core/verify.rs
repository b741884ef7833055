//! Whole-store consistency scan
//!
//! Walks every record once and reports records whose contents cannot be
//! interpreted: unknown highway classes, undefined transport or property
//! bits, bits missing from the header summary, and names that cannot be
//! resolved. I/O failures abort the scan.

use std::fmt;

use log::debug;
use serde::Serialize;

use super::error::{Result, StoreError};
use super::store::WayStore;
use super::types::{all_properties_mask, all_transports_mask};

/// A problem found in one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    UnknownHighway { index: u32, code: u8 },
    UnknownBits { index: u32, field: &'static str, bits: u16 },
    MissingFromHeader { index: u32, field: &'static str, bits: u16 },
    BadName { index: u32, offset: u32, reason: String },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::UnknownHighway { index, code } => {
                write!(f, "way {index}: unknown highway class {code}")
            }
            Issue::UnknownBits { index, field, bits } => {
                write!(f, "way {index}: undefined {field} bits 0x{bits:04x}")
            }
            Issue::MissingFromHeader { index, field, bits } => {
                write!(f, "way {index}: {field} bits 0x{bits:04x} missing from header summary")
            }
            Issue::BadName { index, offset, reason } => {
                write!(f, "way {index}: bad name at offset {offset}: {reason}")
            }
        }
    }
}

/// Outcome of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub ways: u32,
    pub issues: u64,
    /// Highway classes seen, as a summary mask
    pub highways: u16,
    pub allow: u16,
    pub props: u8,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.issues == 0
    }
}

/// Scan every way in `store`, calling `on_issue` per problem and
/// `on_progress` with the number of ways checked so far
pub fn verify_store<I, P>(store: &WayStore, mut on_issue: I, mut on_progress: P) -> Result<VerifyReport>
where
    I: FnMut(&Issue),
    P: FnMut(u32),
{
    let header = *store.header();
    let known_transports = all_transports_mask();
    let known_props = all_properties_mask() as u16;
    let mut report = VerifyReport::default();

    let mut emit = |issue: Issue, report: &mut VerifyReport| {
        report.issues += 1;
        on_issue(&issue);
    };

    for (index, way) in store.iter().enumerate() {
        let index = index as u32;
        let way = way?;

        match way.highway() {
            Some(highway) => {
                report.highways |= highway.bit();
                if header.highways & highway.bit() == 0 {
                    emit(
                        Issue::MissingFromHeader { index, field: "highway", bits: highway.bit() },
                        &mut report,
                    );
                }
            }
            None => emit(
                Issue::UnknownHighway { index, code: way.highway_code() },
                &mut report,
            ),
        }

        let allow = way.allow();
        report.allow |= allow;
        if allow & !known_transports != 0 {
            emit(
                Issue::UnknownBits { index, field: "allow", bits: allow & !known_transports },
                &mut report,
            );
        }
        if allow & !header.allow != 0 {
            emit(
                Issue::MissingFromHeader { index, field: "allow", bits: allow & !header.allow },
                &mut report,
            );
        }

        let props = way.props() as u16;
        report.props |= way.props();
        if props & !known_props != 0 {
            emit(
                Issue::UnknownBits { index, field: "props", bits: props & !known_props },
                &mut report,
            );
        }
        if props & !(header.props as u16) != 0 {
            emit(
                Issue::MissingFromHeader {
                    index,
                    field: "props",
                    bits: props & !(header.props as u16),
                },
                &mut report,
            );
        }

        let offset = way.name_offset();
        match store.name_at(offset) {
            Ok(_) => {}
            Err(e @ StoreError::NameOffset { .. }) | Err(e @ StoreError::Format { .. }) => emit(
                Issue::BadName { index, offset, reason: e.to_string() },
                &mut report,
            ),
            Err(e) => return Err(e),
        }

        report.ways += 1;
        on_progress(report.ways);
    }

    debug!(
        "Verified {} ways in {}: {} issues",
        report.ways,
        store.path().display(),
        report.issues
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::fixtures::write_raw;
    use crate::core::layout::{FileHeader, WayRecord};
    use crate::core::types::{Highway, Transport};

    #[test]
    fn test_clean_store() {
        let ways = [
            WayRecord::new(Highway::Primary as u8, Transport::Motorcar.bit()).with_name(1),
            WayRecord::new(Highway::Path as u8, Transport::Foot.bit()),
        ];
        let file = write_raw(FileHeader::summarize(&ways), &ways, b"\0Avenue\0");
        let store = WayStore::open_mapped(file.path()).unwrap();

        let mut progress = Vec::new();
        let report = verify_store(&store, |_| panic!("no issues expected"), |n| progress.push(n)).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.ways, 2);
        assert_eq!(progress, vec![1, 2]);
        assert_eq!(report.highways, Highway::Primary.bit() | Highway::Path.bit());
        assert_eq!(report.allow, Transport::Motorcar.bit() | Transport::Foot.bit());
    }

    #[test]
    fn test_reports_each_problem() {
        let ways = [
            WayRecord::new(0x1f, 0x8000),
            WayRecord::new(Highway::Track as u8, Transport::Horse.bit()).with_props(0x80),
            WayRecord::new(Highway::Track as u8, 0).with_name(40),
        ];
        // header summary deliberately omits everything
        let header = FileHeader::new(3, 0, 0, 0);
        let file = write_raw(header, &ways, b"\0");
        let store = WayStore::open_slim(file.path(), 1).unwrap();

        let mut issues = Vec::new();
        let report = verify_store(&store, |issue| issues.push(issue.clone()), |_| {}).unwrap();

        assert!(issues.contains(&Issue::UnknownHighway { index: 0, code: 0x1f }));
        assert!(issues.contains(&Issue::UnknownBits { index: 0, field: "allow", bits: 0x8000 }));
        assert!(issues.contains(&Issue::UnknownBits { index: 1, field: "props", bits: 0x80 }));
        assert!(issues.contains(&Issue::MissingFromHeader {
            index: 1,
            field: "highway",
            bits: Highway::Track.bit()
        }));
        assert!(issues
            .iter()
            .any(|i| matches!(i, Issue::BadName { index: 2, offset: 40, .. })));
        assert_eq!(report.issues, issues.len() as u64);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::UnknownBits { index: 4, field: "allow", bits: 0x0400 };
        assert_eq!(issue.to_string(), "way 4: undefined allow bits 0x0400");
    }
}
