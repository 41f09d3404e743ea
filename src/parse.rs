//! Line classification and the section scanner behind [`Patches::parse`].
//!
//! Parsing happens in two steps. [`classify`] maps a single line of
//! `git diff` output to a [`LineKind`] without looking at any other line.
//! [`Scanner`] then folds those kinds into per-file [`Patch`] records.
//!
//! # Recognized lines
//!
//! Checked in this order:
//! - `diff ...` - start of a new file section
//! - `--- a/PATH` - path before the change
//! - `--- /dev/null` - file did not exist before the change
//! - `+++ b/PATH` - path after the change, hunk body follows
//! - `+++ /dev/null` - file was deleted, hunk body follows
//! - lines starting with space, `@`, `+`, `-` or `\` - hunk body
//!
//! Everything else (`index` lines, mode lines, blank lines) is ignored.
//!
//! # Examples
//!
//! ```
//! use git_diff_parser::{LineKind, classify};
//!
//! assert_eq!(classify("diff --git a/x b/x"), LineKind::SectionStart);
//! assert_eq!(classify("+++ b/src/lib.rs"), LineKind::NewFileNamed("src/lib.rs"));
//! assert_eq!(classify("--- /dev/null"), LineKind::PriorFileAbsent);
//! assert_eq!(classify("index 6f2e06d..110fff0 100644"), LineKind::Other);
//! ```

use crate::patch::{DiffType, Patch};
use crate::patches::Patches;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::one_of,
    combinator::{all_consuming, peek, rest, value},
    sequence::preceded,
};
use tracing::{debug, trace};

/// Classification of a single diff line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `diff ...` header opening a file section
    SectionStart,
    /// `--- a/PATH`
    PriorFileNamed(&'a str),
    /// `--- /dev/null`
    PriorFileAbsent,
    /// `+++ b/PATH`
    NewFileNamed(&'a str),
    /// `+++ /dev/null`
    NewFileAbsent,
    /// Hunk header, context, added, removed or "\ No newline" line
    BodyContent(&'a str),
    Other,
}

/// Classify one line of diff output (without its line terminator)
#[must_use]
pub fn classify(line: &str) -> LineKind<'_> {
    line_kind(line)
        .map(|(_, kind)| kind)
        .unwrap_or(LineKind::Other)
}

fn line_kind(input: &str) -> IResult<&str, LineKind<'_>> {
    alt((
        value(LineKind::SectionStart, tag("diff")),
        preceded(tag("--- a/"), rest).map(|path| LineKind::PriorFileNamed(trim_path(path))),
        value(LineKind::PriorFileAbsent, all_consuming(tag("--- /dev/null"))),
        preceded(tag("+++ b/"), rest).map(|path| LineKind::NewFileNamed(trim_path(path))),
        value(LineKind::NewFileAbsent, all_consuming(tag("+++ /dev/null"))),
        preceded(peek(one_of(" @+-\\")), rest).map(LineKind::BodyContent),
    ))
    .parse(input)
}

/// git terminates paths containing spaces with a TAB on `---`/`+++` lines
fn trim_path(path: &str) -> &str {
    path.strip_suffix('\t').unwrap_or(path)
}

/// State of the file section currently being scanned
#[derive(Debug)]
struct Section<'a> {
    opened: bool,
    in_body: bool,
    file: &'a str,
    orig_file: Option<&'a str>,
    diff_type: DiffType,
    lines: Vec<&'a str>,
}

impl Default for Section<'_> {
    fn default() -> Self {
        Self {
            opened: false,
            in_body: false,
            file: "",
            // Empty but present: only `--- /dev/null` marks the prior file absent
            orig_file: Some(""),
            diff_type: DiffType::Change,
            lines: Vec::new(),
        }
    }
}

impl Section<'_> {
    fn into_patch(self) -> Patch {
        let mut body = self.lines.join("\n");
        body.push('\n');
        Patch::new(
            body,
            self.file,
            self.orig_file.map(str::to_string),
            self.diff_type,
        )
    }
}

/// Incremental state machine turning diff lines into patches.
///
/// Feed lines in order with [`Scanner::feed`], then call [`Scanner::finish`]
/// to flush the last section.
///
/// # Examples
///
/// ```
/// use git_diff_parser::{DiffType, Scanner};
///
/// let mut scanner = Scanner::new();
/// for line in ["diff --git a/x b/x", "--- /dev/null", "+++ b/x", "@@ -0,0 +1 @@", "+hi"] {
///     scanner.feed(line);
/// }
/// let patches = scanner.finish();
/// assert_eq!(patches.len(), 1);
/// assert_eq!(patches[0].diff_type(), DiffType::Add);
/// assert_eq!(patches[0].body(), "@@ -0,0 +1 @@\n+hi\n");
/// ```
#[derive(Debug, Default)]
pub struct Scanner<'a> {
    section: Section<'a>,
    patches: Patches,
}

impl<'a> Scanner<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one line to the state machine
    pub fn feed(&mut self, line: &'a str) {
        let kind = classify(line);
        if kind == LineKind::SectionStart {
            self.flush();
            self.section.opened = true;
            return;
        }

        let section = &mut self.section;
        match kind {
            LineKind::SectionStart | LineKind::Other => {}
            LineKind::PriorFileNamed(path) => section.orig_file = Some(path),
            LineKind::PriorFileAbsent => section.orig_file = None,
            LineKind::NewFileNamed(path) => {
                section.file = path;
                section.in_body = true;
                section.diff_type = if section.orig_file.is_none() {
                    DiffType::Add
                } else {
                    DiffType::Change
                };
            }
            LineKind::NewFileAbsent => {
                section.file = section.orig_file.unwrap_or_default();
                section.in_body = true;
                section.diff_type = DiffType::Delete;
            }
            LineKind::BodyContent(text) => {
                if section.in_body {
                    section.lines.push(text);
                }
            }
        }
    }

    /// Flush the section still open at end of input and return the patches
    pub fn finish(mut self) -> Patches {
        self.flush();
        self.patches
    }

    /// Emit the open section if it reached its body.
    ///
    /// Paths and change type carry over to the next section when nothing was
    /// emitted.
    fn flush(&mut self) {
        if !self.section.in_body {
            if self.section.opened {
                trace!("skipping section without a +++ line");
            }
            return;
        }

        let section = std::mem::take(&mut self.section);
        debug!(
            file = section.file,
            diff_type = %section.diff_type,
            lines = section.lines.len(),
            "parsed patch"
        );
        self.patches.push(section.into_patch());
    }
}

/// Split a complete diff into patches
pub(crate) fn parse_patches(text: &str) -> Patches {
    let mut scanner = Scanner::new();
    for line in text.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}
