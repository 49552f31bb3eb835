//! Size bucketing and duplicate group bookkeeping.
//!
//! # Overview
//!
//! ## Size Buckets (Phase 1)
//!
//! Size bucketing is the first phase of duplicate detection. It groups files
//! by their exact size; a file whose size occurs only once cannot have a
//! duplicate, and zero-length files are not worth reporting.
//!
//! ## Duplicate Groups (Phase 3)
//!
//! [`DuplicateGroups`] maps full-content fingerprints to [`DuplicateGroup`]s.
//! Groups are stored in the order they were founded. Because candidates are
//! hashed in ascending path order, that is also ascending order of canonical
//! path.
//!
//! # Example
//!
//! ```
//! use dupsweep::scanner::CandidateFile;
//! use dupsweep::duplicates::SizeBuckets;
//! use std::path::PathBuf;
//!
//! let buckets: SizeBuckets = vec![
//!     CandidateFile::new(PathBuf::from("/b.txt"), 1024),
//!     CandidateFile::new(PathBuf::from("/a.txt"), 1024),
//!     CandidateFile::new(PathBuf::from("/c.txt"), 2048),
//! ]
//! .into_iter()
//! .collect();
//!
//! let candidates = buckets.into_candidates();
//! assert_eq!(candidates.len(), 2);
//! assert_eq!(candidates[0].path, PathBuf::from("/a.txt"));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::{CandidateFile, Fingerprint};

/// Paths grouped by exact byte length.
#[derive(Debug, Default)]
pub struct SizeBuckets {
    buckets: HashMap<u64, Vec<PathBuf>>,
    files: usize,
}

impl SizeBuckets {
    /// Create an empty bucket map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the bucket for its size.
    pub fn add(&mut self, file: CandidateFile) {
        self.buckets.entry(file.size).or_default().push(file.path);
        self.files += 1;
    }

    /// Number of files added so far.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files
    }

    /// Number of distinct sizes seen.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Extract every file that shares a non-zero size with another file.
    ///
    /// Consumes the buckets so the map is released as soon as the candidates
    /// exist. The result is sorted by path, and a path reached twice (for
    /// example through overlapping roots) is kept once.
    #[must_use]
    pub fn into_candidates(self) -> Vec<CandidateFile> {
        let mut candidates: Vec<CandidateFile> = self
            .buckets
            .into_iter()
            .filter(|(size, paths)| *size > 0 && paths.len() > 1)
            .flat_map(|(size, paths)| {
                paths
                    .into_iter()
                    .map(move |path| CandidateFile::new(path, size))
            })
            .collect();

        candidates.sort_by(|a, b| a.path.cmp(&b.path));
        candidates.dedup_by(|a, b| a.path == b.path);
        candidates
    }
}

impl FromIterator<CandidateFile> for SizeBuckets {
    fn from_iter<I: IntoIterator<Item = CandidateFile>>(iter: I) -> Self {
        let mut buckets = Self::new();
        for file in iter {
            buckets.add(file);
        }
        buckets
    }
}

/// Files sharing one full-content fingerprint.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// Content fingerprint shared by every member
    pub fingerprint: Fingerprint,
    /// File size in bytes, shared by every member
    pub size: u64,
    members: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Found a group with its first (canonical) member.
    #[must_use]
    pub fn new(fingerprint: Fingerprint, size: u64, first: PathBuf) -> Self {
        Self {
            fingerprint,
            size,
            members: vec![first],
        }
    }

    /// The member that is kept when redundant copies are removed.
    ///
    /// This is the first member added. Candidates are processed in ascending
    /// lexicographic path order, so it is the smallest path in the group.
    #[must_use]
    pub fn canonical(&self) -> &Path {
        &self.members[0]
    }

    /// All members, canonical first.
    #[must_use]
    pub fn members(&self) -> &[PathBuf] {
        &self.members
    }

    /// Members other than the canonical one.
    #[must_use]
    pub fn redundant(&self) -> &[PathBuf] {
        &self.members[1..]
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; a group is founded with one member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check if this group holds actual duplicates (2+ files).
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }

    fn push(&mut self, path: PathBuf) {
        self.members.push(path);
    }
}

/// Where a newly fingerprinted file ended up.
#[derive(Debug)]
pub enum Placement<'a> {
    /// The file founded a new group.
    Founded,
    /// The file joined an existing group (shown after the append).
    Joined(&'a DuplicateGroup),
}

/// All groups of one fingerprinting pass, keyed by fingerprint.
#[derive(Debug, Default)]
pub struct DuplicateGroups {
    index: HashMap<Fingerprint, usize>,
    groups: Vec<DuplicateGroup>,
}

impl DuplicateGroups {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a file by fingerprint.
    ///
    /// An unseen fingerprint founds a new group with `size`; a seen one
    /// appends `path` to the existing group.
    pub fn insert(&mut self, fingerprint: Fingerprint, size: u64, path: PathBuf) -> Placement<'_> {
        match self.index.get(&fingerprint) {
            Some(&idx) => {
                let group = &mut self.groups[idx];
                debug_assert_eq!(group.size, size, "fingerprint match with size mismatch");
                group.push(path);
                Placement::Joined(&self.groups[idx])
            }
            None => {
                self.index.insert(fingerprint, self.groups.len());
                self.groups.push(DuplicateGroup::new(fingerprint, size, path));
                Placement::Founded
            }
        }
    }

    /// Look up the group for a fingerprint.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&DuplicateGroup> {
        self.index.get(fingerprint).map(|&idx| &self.groups[idx])
    }

    /// Number of groups, including single-member ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no file has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every group in founding order.
    pub fn iter(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter()
    }

    /// Groups with two or more members, in ascending canonical path order.
    pub fn duplicates(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter().filter(|g| g.is_duplicate())
    }

    /// Consume the collection, keeping only groups with two or more members.
    #[must_use]
    pub fn into_duplicates(self) -> Vec<DuplicateGroup> {
        self.groups
            .into_iter()
            .filter(DuplicateGroup::is_duplicate)
            .collect()
    }
}
