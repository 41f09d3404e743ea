use crate::DecodeError;
use crate::parse::parse_patches;
use crate::patch::Patch;
use crate::scrub::scrub_string;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Ordered list of per-file patches.
///
/// Derefs to `Vec<Patch>`, so indexing, iteration, `len` and `push` work as on
/// a plain vector. Entries keep the order in which files appear in the diff and
/// are never merged, even when a path shows up twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patches(Vec<Patch>);

impl Patches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `git diff` output.
    ///
    /// Never fails: unrecognized lines are skipped, and a section without a
    /// `+++` line produces no patch.
    ///
    /// # Examples
    ///
    /// ```
    /// use git_diff_parser::{DiffType, Patches};
    ///
    /// let diff = "\
    /// diff --git a/zsh.nix b/zsh.nix
    /// index 6f2e06d..110fff0 100644
    /// --- a/zsh.nix
    /// +++ b/zsh.nix
    /// @@ -15 +14,0 @@ line 14
    /// -      enableAutosuggestions = true;
    /// ";
    /// let patches = Patches::parse(diff);
    /// assert_eq!(patches.files(), vec!["zsh.nix"]);
    /// assert_eq!(patches[0].diff_type(), DiffType::Change);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        parse_patches(text)
    }

    /// Parse diff output that must be valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidUtf8`] if `bytes` is not valid UTF-8.
    pub fn from_utf8(bytes: &[u8]) -> Result<Self, DecodeError> {
        let text = std::str::from_utf8(bytes).map_err(|e| DecodeError::InvalidUtf8 {
            message: e.to_string(),
        })?;
        Ok(Self::parse(text))
    }

    /// Parse diff output after dropping invalid UTF-8 sequences
    #[must_use]
    pub fn parse_lossy(bytes: &[u8]) -> Self {
        Self::parse(&scrub_string(bytes))
    }

    /// File paths in patch order
    pub fn files(&self) -> Vec<&str> {
        self.iter().map(Patch::file).collect()
    }

    /// Secure hashes in patch order (`None` where none was supplied)
    pub fn secure_hashes(&self) -> Vec<Option<&str>> {
        self.iter().map(Patch::secure_hash).collect()
    }

    /// First patch for `file`
    pub fn find_patch_by_file(&self, file: &str) -> Option<&Patch> {
        self.iter().find(|patch| patch.file() == file)
    }

    /// First patch carrying `secure_hash`
    pub fn find_patch_by_secure_hash(&self, secure_hash: &str) -> Option<&Patch> {
        self.iter()
            .find(|patch| patch.secure_hash() == Some(secure_hash))
    }

    pub fn into_inner(self) -> Vec<Patch> {
        self.0
    }
}

impl Deref for Patches {
    type Target = Vec<Patch>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Patches {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Patch>> for Patches {
    fn from(patches: Vec<Patch>) -> Self {
        Self(patches)
    }
}

impl FromIterator<Patch> for Patches {
    fn from_iter<I: IntoIterator<Item = Patch>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Patch> for Patches {
    fn extend<I: IntoIterator<Item = Patch>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Patches {
    type Item = Patch;
    type IntoIter = std::vec::IntoIter<Patch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Patches {
    type Item = &'a Patch;
    type IntoIter = std::slice::Iter<'a, Patch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
