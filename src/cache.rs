//! Solutions of already solved problems, addressed by the MD5 digest of the problem file
//!
//! Two problem files with identical content share one entry, whatever their names.
//! The cache is bounded: registering a new problem while it is full drops every entry.
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;
use md5::{Digest, Md5};
use tempfile::TempPath;

use crate::error::Result;
use crate::solvers::{SolutionType, Status};

/// MD5 digest of the content of a problem file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProblemDigest([u8; 16]);

impl ProblemDigest {
    /// Digest of a byte buffer
    ///
    /// ```
    /// use lp_bridge::cache::ProblemDigest;
    ///
    /// assert_eq!(
    ///     ProblemDigest::of_bytes(b"").to_string(),
    ///     "d41d8cd98f00b204e9800998ecf8427e"
    /// );
    /// ```
    pub fn of_bytes(bytes: &[u8]) -> ProblemDigest {
        let mut hasher = Md5::new();
        hasher.update(bytes);
        ProblemDigest(hasher.finalize().into())
    }

    /// Digest of the content of a file
    pub fn of_file(path: &Path) -> Result<ProblemDigest> {
        let bytes = fs::read(path)?;
        Ok(ProblemDigest::of_bytes(&bytes))
    }
}

impl fmt::Display for ProblemDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// A solution file kept by the cache together with what the solver reported
#[derive(Debug)]
pub struct KnownSolution {
    solution_file: TempPath,
    status: Status,
    solution_type: SolutionType,
}

impl KnownSolution {
    /// Copy of the solution, owned by the cache
    pub fn solution_file(&self) -> &Path {
        &self.solution_file
    }

    /// status of the run that produced the solution
    pub fn status(&self) -> Status {
        self.status
    }

    /// kind of the stored solution
    pub fn solution_type(&self) -> SolutionType {
        self.solution_type
    }
}

/// In-memory map from problem digests to known solutions
#[derive(Debug)]
pub struct SolutionCache {
    capacity: usize,
    solutions: HashMap<ProblemDigest, KnownSolution>,
}

impl Default for SolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SolutionCache {
    /// Number of entries kept when no capacity is given
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Empty cache holding up to [SolutionCache::DEFAULT_CAPACITY] solutions
    pub fn new() -> SolutionCache {
        SolutionCache::with_capacity(SolutionCache::DEFAULT_CAPACITY)
    }

    /// Empty cache holding up to `capacity` solutions
    pub fn with_capacity(capacity: usize) -> SolutionCache {
        SolutionCache {
            capacity,
            solutions: HashMap::new(),
        }
    }

    /// maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// number of entries
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// whether the cache has no entries
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Drop all entries, deleting their solution files
    pub fn clear(&mut self) {
        self.solutions.clear();
    }

    /// Whether a solution is known for this digest
    pub fn contains(&self, digest: &ProblemDigest) -> bool {
        self.solutions.contains_key(digest)
    }

    /// Known solution for this digest
    pub fn get(&self, digest: &ProblemDigest) -> Option<&KnownSolution> {
        self.solutions.get(digest)
    }

    /// Record the solution of `problem_file`. The cache takes ownership of
    /// `solution_file`, which is deleted when its entry is dropped.
    pub fn register(
        &mut self,
        problem_file: &Path,
        solution_file: TempPath,
        status: Status,
        solution_type: SolutionType,
    ) -> Result<()> {
        let digest = ProblemDigest::of_file(problem_file)?;
        if !self.contains(&digest) && self.len() >= self.capacity {
            debug!(
                "solution cache: capacity {} reached, dropping all entries",
                self.capacity
            );
            self.clear();
        }
        debug!(
            "solution cache: registering {} solution of '{}' ({}) as {}",
            status,
            problem_file.display(),
            digest,
            solution_file.display()
        );
        self.solutions.insert(
            digest,
            KnownSolution {
                solution_file,
                status,
                solution_type,
            },
        );
        Ok(())
    }
}
