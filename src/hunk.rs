use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete,
    combinator::opt,
    sequence::preceded,
};

/// One side of a hunk header, `start[,count]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: u32,
    /// Defaults to 1 when the header omits it
    pub count: u32,
}

/// Parsed `@@ -old +new @@` hunk header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old: Range,
    pub new: Range,
}

impl HunkHeader {
    /// Parse a hunk header line.
    ///
    /// Anything after the closing `@@` (git's function context) is ignored.
    /// Returns `None` for lines that are not well-formed hunk headers.
    ///
    /// # Examples
    ///
    /// ```
    /// use git_diff_parser::{HunkHeader, Range};
    ///
    /// let header = HunkHeader::parse("@@ -136,0 +137 @@ line 136").unwrap();
    /// assert_eq!(header.old, Range { start: 136, count: 0 });
    /// assert_eq!(header.new, Range { start: 137, count: 1 });
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        header(line).ok().map(|(_, header)| header)
    }
}

fn range(input: &str) -> IResult<&str, Range> {
    (complete::u32, opt(preceded(complete::char(','), complete::u32)))
        .map(|(start, count)| Range {
            start,
            count: count.unwrap_or(1),
        })
        .parse(input)
}

fn header(input: &str) -> IResult<&str, HunkHeader> {
    (tag("@@ -"), range, tag(" +"), range, tag(" @@"))
        .map(|(_, old, _, new, _)| HunkHeader { old, new })
        .parse(input)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn parse_counts_on_both_sides() {
        let header = HunkHeader::parse("@@ -10,2 +10,3 @@ line 9").unwrap();
        assert_eq!(header.old, Range { start: 10, count: 2 });
        assert_eq!(header.new, Range { start: 10, count: 3 });
    }

    #[test]
    fn parse_omitted_counts_default_to_one() {
        let header = HunkHeader::parse("@@ -15 +14,0 @@").unwrap();
        assert_eq!(header.old, Range { start: 15, count: 1 });
        assert_eq!(header.new, Range { start: 14, count: 0 });
    }

    #[test]
    fn parse_new_file_header() {
        let header = HunkHeader::parse("@@ -0,0 +1,3 @@").unwrap();
        assert_eq!(header.old, Range { start: 0, count: 0 });
        assert_eq!(header.new, Range { start: 1, count: 3 });
    }

    #[test]
    fn reject_malformed_headers() {
        assert_eq!(HunkHeader::parse("@@ garbage @@"), None);
        assert_eq!(HunkHeader::parse("@@ -1,2 @@"), None);
        assert_eq!(HunkHeader::parse("@@ -a +1 @@"), None);
        assert_eq!(HunkHeader::parse("+@@ -1 +1 @@"), None);
        assert_eq!(HunkHeader::parse(""), None);
    }
}
