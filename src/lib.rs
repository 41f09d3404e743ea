//! Split `git diff` output into per-file patches.
//!
//! ```
//! use git_diff_parser::DiffType;
//!
//! let diff = "\
//! diff --git a/flake.nix b/flake.nix
//! index abc1234..def5678 100644
//! --- a/flake.nix
//! +++ b/flake.nix
//! @@ -136,0 +137 @@
//! +      debug = true;
//! diff --git a/home.nix b/home.nix
//! new file mode 100644
//! index 0000000..3b18e51
//! --- /dev/null
//! +++ b/home.nix
//! @@ -0,0 +1 @@
//! +{ }
//! ";
//!
//! let patches = git_diff_parser::parse(diff);
//! assert_eq!(patches.files(), vec!["flake.nix", "home.nix"]);
//!
//! let added = patches.find_patch_by_file("home.nix").unwrap();
//! assert_eq!(added.diff_type(), DiffType::Add);
//! assert_eq!(added.orig_file(), None);
//! assert_eq!(added.body(), "@@ -0,0 +1 @@\n+{ }\n");
//! ```

use error_set::error_set;

mod hunk;
mod parse;
mod patch;
mod patches;
mod scrub;

pub use hunk::{HunkHeader, Range};
pub use parse::{LineKind, Scanner, classify};
pub use patch::{DiffType, Line, Patch};
pub use patches::Patches;
pub use scrub::scrub_string;

error_set! {
    /// Errors from turning raw bytes into diff text
    DecodeError := {
        #[display("Invalid UTF-8 in diff input: {message}")]
        InvalidUtf8 { message: String },
    }
}

/// Parse `git diff` output into patches, one per file section
#[must_use]
pub fn parse(text: &str) -> Patches {
    Patches::parse(text)
}
