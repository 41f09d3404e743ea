use crate::hunk::HunkHeader;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a file changed between the two sides of a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffType {
    /// File did not exist before (`--- /dev/null`)
    Add,
    /// File exists on both sides
    #[default]
    Change,
    /// File does not exist after (`+++ /dev/null`)
    Delete,
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiffType::Add => "add",
            DiffType::Change => "change",
            DiffType::Delete => "delete",
        })
    }
}

/// A changed or removed line located inside a patch body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// Line number in the new file (changed lines) or old file (removed lines)
    pub number: u32,
    /// Line text without its `+`/`-` marker
    pub content: String,
    /// Index of the line within the patch body; the first hunk header is 0
    pub patch_position: usize,
}

/// The diff of a single file.
///
/// Holds the raw hunk text for one file together with the paths on both sides
/// of the change. The body never includes the `diff`, `index`, `---` or `+++`
/// header lines, only the lines that follow them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    file: String,
    orig_file: Option<String>,
    diff_type: DiffType,
    body: String,
    secure_hash: Option<String>,
}

impl Patch {
    /// Create a patch from its raw body and file metadata.
    ///
    /// `orig_file` is `None` when the file did not exist before the change.
    pub fn new(
        body: impl Into<String>,
        file: impl Into<String>,
        orig_file: Option<String>,
        diff_type: DiffType,
    ) -> Self {
        Self {
            file: file.into(),
            orig_file,
            diff_type,
            body: body.into(),
            secure_hash: None,
        }
    }

    /// Attach an externally supplied identifier (e.g. the commit the diff came from)
    #[must_use]
    pub fn with_secure_hash(mut self, secure_hash: impl Into<String>) -> Self {
        self.secure_hash = Some(secure_hash.into());
        self
    }

    pub fn set_secure_hash(&mut self, secure_hash: impl Into<String>) {
        self.secure_hash = Some(secure_hash.into());
    }

    /// Path of the file after the change (the prior path for deletions)
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn orig_file(&self) -> Option<&str> {
        self.orig_file.as_deref()
    }

    pub fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    /// Raw hunk text, newline-terminated
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn secure_hash(&self) -> Option<&str> {
        self.secure_hash.as_deref()
    }

    /// Added lines, numbered by their position in the new file
    pub fn changed_lines(&self) -> Vec<Line> {
        self.collect_lines(Side::New)
            .into_iter()
            .map(|(_, line)| line)
            .collect()
    }

    /// Deleted lines, numbered by their position in the old file
    pub fn removed_lines(&self) -> Vec<Line> {
        self.collect_lines(Side::Old)
            .into_iter()
            .map(|(_, line)| line)
            .collect()
    }

    pub fn changed_line_numbers(&self) -> Vec<u32> {
        self.changed_lines().into_iter().map(|line| line.number).collect()
    }

    pub fn removed_line_numbers(&self) -> Vec<u32> {
        self.removed_lines().into_iter().map(|line| line.number).collect()
    }

    /// Find where an added line sits inside the patch body.
    ///
    /// Review tools anchor comments by patch position rather than by file line.
    pub fn find_patch_position_by_line_number(&self, line_number: u32) -> Option<usize> {
        self.changed_lines()
            .into_iter()
            .find(|line| line.number == line_number)
            .map(|line| line.patch_position)
    }

    /// Render changed lines with explicit line numbers.
    ///
    /// Lines appear in patch order, blank line between hunks:
    /// ```text
    /// flake.nix:
    ///   -15:	old
    ///   +15:	new
    /// ```
    pub fn format_changes(&self) -> String {
        let mut lines: Vec<(char, usize, Line)> = self
            .collect_lines(Side::Old)
            .into_iter()
            .map(|(hunk, line)| ('-', hunk, line))
            .chain(
                self.collect_lines(Side::New)
                    .into_iter()
                    .map(|(hunk, line)| ('+', hunk, line)),
            )
            .collect();
        lines.sort_by_key(|(_, _, line)| line.patch_position);

        let mut result = format!("{}:\n", self.file);
        let mut previous_hunk = None;
        for (marker, hunk, line) in lines {
            if previous_hunk.is_some_and(|prev| prev != hunk) {
                result.push('\n');
            }
            result.push_str(&format!("  {}{}:\t{}\n", marker, line.number, line.content));
            previous_hunk = Some(hunk);
        }
        result
    }

    /// Lines of one side, each tagged with the index of its hunk
    fn collect_lines(&self, side: Side) -> Vec<(usize, Line)> {
        let marker = match side {
            Side::Old => '-',
            Side::New => '+',
        };
        let mut number = 0u32;
        let mut hunk = 0usize;
        let mut lines = Vec::new();

        for (patch_position, text) in self.body.lines().enumerate() {
            if text.starts_with("@@") {
                hunk += 1;
                // Malformed headers keep the running counter
                if let Some(header) = HunkHeader::parse(text) {
                    number = match side {
                        Side::Old => header.old.start,
                        Side::New => header.new.start,
                    };
                }
            } else if let Some(content) = text.strip_prefix(marker) {
                lines.push((
                    hunk,
                    Line {
                        number,
                        content: content.to_string(),
                        patch_position,
                    },
                ));
                number = number.saturating_add(1);
            } else if text.starts_with(' ') {
                number = number.saturating_add(1);
            }
            // Lines for the other side and "\ No newline" markers don't advance
        }

        lines
    }
}

#[derive(Clone, Copy)]
enum Side {
    Old,
    New,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn modified(body: &str) -> Patch {
        Patch::new(body, "gtk.nix", Some("gtk.nix".to_string()), DiffType::Change)
    }

    #[test]
    fn accessors_expose_construction_arguments() {
        let patch = Patch::new(
            "@@ -1 +1 @@\n-a\n+b\n",
            "new.txt",
            Some("old.txt".into()),
            DiffType::Change,
        );
        assert_eq!(patch.file(), "new.txt");
        assert_eq!(patch.orig_file(), Some("old.txt"));
        assert_eq!(patch.diff_type(), DiffType::Change);
        assert_eq!(patch.body(), "@@ -1 +1 @@\n-a\n+b\n");
        assert_eq!(patch.secure_hash(), None);
    }

    #[test]
    fn secure_hash_is_supplied_externally() {
        let mut patch = modified("@@ -1 +1 @@\n-a\n+b\n").with_secure_hash("abc123");
        assert_eq!(patch.secure_hash(), Some("abc123"));
        patch.set_secure_hash("def456");
        assert_eq!(patch.secure_hash(), Some("def456"));
    }

    #[test]
    fn diff_type_display() {
        assert_eq!(DiffType::Add.to_string(), "add");
        assert_eq!(DiffType::Change.to_string(), "change");
        assert_eq!(DiffType::Delete.to_string(), "delete");
    }

    #[test]
    fn changed_lines_with_context() {
        let patch = modified(
            "@@ -1,4 +1,5 @@\n context 1\n-old 2\n+new 2\n+new 3\n context 3\n context 4\n",
        );
        assert_eq!(
            patch.changed_lines(),
            vec![
                Line {
                    number: 2,
                    content: "new 2".to_string(),
                    patch_position: 3,
                },
                Line {
                    number: 3,
                    content: "new 3".to_string(),
                    patch_position: 4,
                },
            ]
        );
    }

    #[test]
    fn removed_lines_with_context() {
        let patch = modified(
            "@@ -1,4 +1,5 @@\n context 1\n-old 2\n+new 2\n+new 3\n context 3\n-old 4\n",
        );
        assert_eq!(patch.removed_line_numbers(), vec![2, 4]);
        assert_eq!(patch.removed_lines()[1].content, "old 4");
        assert_eq!(patch.removed_lines()[1].patch_position, 6);
    }

    #[test]
    fn line_numbers_restart_at_each_hunk() {
        let patch = modified(
            "@@ -136,0 +137 @@\n+      debug = true;\n@@ -140,0 +142 @@\n+        ./flake-modules/home-manager.nix\n",
        );
        assert_eq!(patch.changed_line_numbers(), vec![137, 142]);
        assert_eq!(patch.find_patch_position_by_line_number(142), Some(3));
        assert_eq!(patch.find_patch_position_by_line_number(138), None);
    }

    #[test]
    fn header_without_counts() {
        // git omits ",1" counts
        let patch = modified("@@ -15 +14,0 @@ line 14\n-      enableAutosuggestions = true;\n");
        assert_eq!(patch.removed_line_numbers(), vec![15]);
        assert!(patch.changed_lines().is_empty());
    }

    #[test]
    fn no_newline_marker_does_not_advance() {
        let patch = modified("@@ -1 +1,2 @@\n-last\n\\ No newline at end of file\n+last\n+extra\n");
        assert_eq!(patch.changed_line_numbers(), vec![1, 2]);
        assert_eq!(patch.removed_line_numbers(), vec![1]);
    }

    #[test]
    fn added_content_starting_with_plus() {
        let patch = modified("@@ -0,0 +1,2 @@\n++x\n+++ counter\n");
        let contents: Vec<String> = patch.changed_lines().into_iter().map(|l| l.content).collect();
        assert_eq!(contents, vec!["+x".to_string(), "++ counter".to_string()]);
    }

    #[test]
    fn malformed_header_keeps_counter() {
        let patch = modified("@@ -1 +5 @@\n+a\n@@ broken @@\n+b\n");
        assert_eq!(patch.changed_line_numbers(), vec![5, 6]);
    }

    #[test]
    fn line_numbers_saturate_at_u32_max() {
        let patch = modified("@@ -1 +4294967295,3 @@\n+a\n context\n+b\n");
        assert_eq!(patch.changed_line_numbers(), vec![u32::MAX, u32::MAX]);
        assert_eq!(patch.removed_line_numbers(), Vec::<u32>::new());
    }

    #[test]
    fn format_single_hunk() {
        let patch = modified("@@ -10,2 +10,2 @@ line 9\n-    gtk.theme.name = \"Adwaita\";\n-    gtk.iconTheme.name = \"Papirus\";\n+    # Theme managed by Stylix\n+    gtk.iconTheme.name = \"Papirus-Dark\";\n");
        insta::assert_snapshot!(patch.format_changes(), @r#"
        gtk.nix:
          -10:	    gtk.theme.name = "Adwaita";
          -11:	    gtk.iconTheme.name = "Papirus";
          +10:	    # Theme managed by Stylix
          +11:	    gtk.iconTheme.name = "Papirus-Dark";
        "#);
    }

    #[test]
    fn format_separates_hunks() {
        let patch = Patch::new(
            "@@ -136,0 +137 @@\n+      debug = true;\n@@ -140,0 +142 @@\n+        ./flake-modules/home-manager.nix\n",
            "flake.nix",
            Some("flake.nix".to_string()),
            DiffType::Change,
        );
        assert_eq!(
            patch.format_changes(),
            "flake.nix:\n  +137:\t      debug = true;\n\n  +142:\t        ./flake-modules/home-manager.nix\n"
        );
    }

    #[test]
    fn format_separates_hunks_across_sides() {
        let patch = modified("@@ -1 +0,0 @@\n-a\n@@ -5,0 +5 @@\n+b\n@@ -9 +9 @@\n-c\n+d\n");
        assert_eq!(
            patch.format_changes(),
            "gtk.nix:\n  -1:\ta\n\n  +5:\tb\n\n  -9:\tc\n  +9:\td\n"
        );
    }

    #[test]
    fn serializes_as_json() {
        let patch = Patch::new("@@ -0,0 +1 @@\n+hello\n", "greeting.txt", None, DiffType::Add);
        insta::assert_json_snapshot!(patch, @r#"
        {
          "file": "greeting.txt",
          "orig_file": null,
          "diff_type": "add",
          "body": "@@ -0,0 +1 @@\n+hello\n",
          "secure_hash": null
        }
        "#);
    }
}
