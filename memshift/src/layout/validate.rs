//! Structural validation of a source/destination layout pair

use log::debug;

use crate::domain::{LayoutMismatch, Mismatch, Region};
use crate::maps::{is_special, RegionGroups};

/// Regions of one normalized path paired between the two layouts
#[derive(Debug, Clone)]
pub struct MatchedGroup {
    pub key: String,
    /// `(source, destination)` in listing order
    pub pairs: Vec<(Region, Region)>,
}

impl MatchedGroup {
    /// Backing path of the first source region (the un-normalized name)
    #[must_use]
    pub fn src_path(&self) -> Option<&str> {
        self.pairs.first().map(|(src, _)| src.path.as_str())
    }

    /// Backing path of the first destination region
    #[must_use]
    pub fn dst_path(&self) -> Option<&str> {
        self.pairs.first().map(|(_, dst)| dst.path.as_str())
    }
}

/// Successful pairing of two layouts
#[derive(Debug, Clone, Default)]
pub struct ValidatedLayout {
    /// Matched groups in source key order
    pub groups: Vec<MatchedGroup>,
    /// Problems found on special paths
    pub warnings: Vec<Mismatch>,
}

impl ValidatedLayout {
    /// Matched groups ordered by key
    #[must_use]
    pub fn sorted_groups(&self) -> Vec<&MatchedGroup> {
        let mut groups: Vec<&MatchedGroup> = self.groups.iter().collect();
        groups.sort_by(|a, b| a.key.cmp(&b.key));
        groups
    }

    /// Total number of matched region pairs
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.groups.iter().map(|g| g.pairs.len()).sum()
    }
}

/// Collects problems, routing special paths to warnings
#[derive(Default)]
struct Findings {
    fatal: Vec<Mismatch>,
    warnings: Vec<Mismatch>,
}

impl Findings {
    fn record(&mut self, mismatch: Mismatch) {
        if is_special(mismatch.path()) {
            debug!("warning: {mismatch}");
            self.warnings.push(mismatch);
        } else {
            debug!("fatal: {mismatch}");
            self.fatal.push(mismatch);
        }
    }
}

/// Validate that source and destination groups describe the same libraries
///
/// Checks path-set equality, per-path region counts and per-pair sizes.
///
/// # Errors
/// Returns [`LayoutMismatch`] listing every fatal problem if any non-special
/// path is missing on one side, has a different region count, or has a
/// region pair of different sizes.
pub fn validate(src: &RegionGroups, dst: &RegionGroups) -> Result<ValidatedLayout, LayoutMismatch> {
    let src_keys = src.key_set();
    let dst_keys = dst.key_set();
    let mut findings = Findings::default();

    for key in src.keys().filter(|k| !dst_keys.contains(k)) {
        findings.record(Mismatch::MissingInDestination { path: key.to_string() });
    }
    for key in dst.keys().filter(|k| !src_keys.contains(k)) {
        findings.record(Mismatch::MissingInSource { path: key.to_string() });
    }

    let mut groups = Vec::new();
    for (key, src_regions) in src.iter() {
        let Some(dst_regions) = dst.get(key) else {
            continue;
        };

        if src_regions.len() != dst_regions.len() {
            findings.record(Mismatch::CountMismatch {
                path: key.to_string(),
                src_count: src_regions.len(),
                src_path: src_regions[0].path.clone(),
                dst_count: dst_regions.len(),
                dst_path: dst_regions[0].path.clone(),
            });
            continue;
        }

        let mut sizes_match = true;
        for (idx, (s, d)) in src_regions.iter().zip(dst_regions).enumerate() {
            if s.size() != d.size() {
                sizes_match = false;
                findings.record(Mismatch::SizeMismatch {
                    path: key.to_string(),
                    index: idx + 1,
                    src: s.clone(),
                    dst: d.clone(),
                });
            }
        }
        // A special path with any size mismatch contributes no pairs
        if sizes_match {
            let pairs = src_regions.iter().cloned().zip(dst_regions.iter().cloned()).collect();
            groups.push(MatchedGroup { key: key.to_string(), pairs });
        }
    }

    if findings.fatal.is_empty() {
        Ok(ValidatedLayout { groups, warnings: findings.warnings })
    } else {
        Err(LayoutMismatch { mismatches: findings.fatal, warnings: findings.warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::group_by_path;

    fn region(start: u64, end: u64, path: &str) -> Region {
        Region::new(start, end, "r--p", 0, path).unwrap()
    }

    #[test]
    fn test_versioned_paths_validate() {
        let src = group_by_path(&[region(0x1000, 0x2000, "libfoo.so.1")]);
        let dst = group_by_path(&[region(0x5000, 0x6000, "libfoo.so.2")]);

        let layout = validate(&src, &dst).unwrap();
        assert!(layout.warnings.is_empty());
        assert_eq!(layout.groups.len(), 1);
        assert_eq!(layout.groups[0].key, "libfoo.so");
        assert_eq!(layout.groups[0].src_path(), Some("libfoo.so.1"));
        assert_eq!(layout.groups[0].dst_path(), Some("libfoo.so.2"));
    }

    #[test]
    fn test_count_mismatch_is_fatal() {
        let src = group_by_path(&[region(0x1000, 0x2000, "libbar.so"), region(0x2000, 0x3000, "libbar.so")]);
        let dst = group_by_path(&[region(0x5000, 0x6000, "libbar.so")]);

        let err = validate(&src, &dst).unwrap_err();
        assert_eq!(err.mismatches.len(), 1);
        assert!(matches!(
            err.mismatches[0],
            Mismatch::CountMismatch { src_count: 2, dst_count: 1, .. }
        ));
    }

    #[test]
    fn test_missing_special_is_warning() {
        let src = group_by_path(&[region(0x1000, 0x2000, "/lib/x.so"), region(0x7000, 0x8000, "[stack]")]);
        let dst = group_by_path(&[region(0x4000, 0x5000, "/lib/x.so")]);

        let layout = validate(&src, &dst).unwrap();
        assert_eq!(layout.warnings, vec![Mismatch::MissingInDestination { path: "[stack]".to_string() }]);
        assert_eq!(layout.groups.len(), 1);
        assert_eq!(layout.pair_count(), 1);
    }

    #[test]
    fn test_special_count_mismatch_contributes_no_pairs() {
        let src = group_by_path(&[region(0x1000, 0x2000, "[heap]"), region(0x3000, 0x4000, "[heap]")]);
        let dst = group_by_path(&[region(0x5000, 0x6000, "[heap]")]);

        let layout = validate(&src, &dst).unwrap();
        assert_eq!(layout.warnings.len(), 1);
        assert!(layout.groups.is_empty());
    }

    #[test]
    fn test_special_size_mismatch_contributes_no_pairs() {
        let src = group_by_path(&[region(0x10000, 0x30000, "[heap]"), region(0x1000, 0x2000, "/bin/app")]);
        let dst = group_by_path(&[region(0x90000, 0x91000, "[heap]"), region(0x5000, 0x6000, "/bin/app")]);

        let layout = validate(&src, &dst).unwrap();
        assert_eq!(layout.warnings.len(), 1);
        assert!(matches!(layout.warnings[0], Mismatch::SizeMismatch { index: 1, .. }));
        assert_eq!(layout.pair_count(), 1);
        assert!(layout.groups.iter().all(|g| g.key != "[heap]"));
    }

    #[test]
    fn test_anonymous_mismatch_is_warning() {
        let src = group_by_path(&[region(0x1000, 0x2000, ""), region(0x9000, 0xa000, "/bin/app")]);
        let dst = group_by_path(&[region(0x19000, 0x1a000, "/bin/app")]);

        let layout = validate(&src, &dst).unwrap();
        assert_eq!(layout.warnings.len(), 1);
    }

    #[test]
    fn test_collects_all_fatal_problems() {
        let src = group_by_path(&[
            region(0x1000, 0x2000, "/lib/a.so"),
            region(0x2000, 0x3000, "/lib/b.so"),
            region(0x3000, 0x5000, "/lib/c.so"),
            region(0x8000, 0x9000, "[vdso]"),
        ]);
        let dst = group_by_path(&[
            region(0x12000, 0x13000, "/lib/b.so"),
            region(0x13000, 0x14000, "/lib/c.so"),
            region(0x14000, 0x15000, "/lib/d.so"),
        ]);

        let err = validate(&src, &dst).unwrap_err();
        assert_eq!(
            err.mismatches.iter().map(Mismatch::path).collect::<Vec<_>>(),
            vec!["/lib/a.so", "/lib/d.so", "/lib/c.so"]
        );
        assert!(matches!(err.mismatches[2], Mismatch::SizeMismatch { .. }));
        assert_eq!(err.warnings.len(), 1);
    }

    #[test]
    fn test_pairs_follow_listing_order_not_address() {
        // Destination lists the library's segments at descending addresses
        let src = group_by_path(&[
            region(0x1000, 0x2000, "/lib/x.so"),
            region(0x2000, 0x4000, "/lib/x.so"),
        ]);
        let dst = group_by_path(&[
            region(0x9000, 0xa000, "/lib/x.so"),
            region(0x5000, 0x7000, "/lib/x.so"),
        ]);

        let layout = validate(&src, &dst).unwrap();
        let pairs = &layout.groups[0].pairs;
        assert_eq!((pairs[0].0.start, pairs[0].1.start), (0x1000, 0x9000));
        assert_eq!((pairs[1].0.start, pairs[1].1.start), (0x2000, 0x5000));
    }

    #[test]
    fn test_sorted_groups() {
        let src = group_by_path(&[region(0x1000, 0x2000, "/z.so"), region(0x3000, 0x4000, "/a.so")]);
        let dst = group_by_path(&[region(0x1000, 0x2000, "/z.so"), region(0x3000, 0x4000, "/a.so")]);

        let layout = validate(&src, &dst).unwrap();
        let keys: Vec<_> = layout.sorted_groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["/a.so", "/z.so"]);
    }
}
