//! Line-range extraction from fetched file content.

use crate::types::LineRange;

/// Select the one-based inclusive `range` from `content` and join it with `\n`.
///
/// Lines end at `\r\n`, `\n`, or a bare `\r`. A trailing terminator leaves an
/// empty final line, the same as a plain split. Ranges running past the end
/// are clamped; a range starting past the end, or an inverted range, selects
/// nothing and yields an empty string.
pub fn line_range(content: &str, range: LineRange) -> String {
    let skip = usize::try_from(range.start).unwrap_or(usize::MAX).saturating_sub(1);
    let end = usize::try_from(range.end).unwrap_or(usize::MAX);
    let take = end.saturating_sub(skip);

    return split_lines(content).skip(skip).take(take).collect::<Vec<_>>().join("\n");
}

/// Split `content` on any of the three common line terminators.
pub fn split_lines(content: &str) -> SplitLines<'_> {
    return SplitLines { rest: Some(content) };
}

/// Iterator over the lines of a string, splitting on `\r\n`, `\n`, or `\r`.
pub struct SplitLines<'a> {
    /// Unconsumed input; `None` once the final line has been yielded.
    rest: Option<&'a str>,
}

impl<'a> Iterator for SplitLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        let Some(at) = rest.find(['\r', '\n']) else {
            self.rest = None;
            return Some(rest);
        };

        let (line, tail) = rest.split_at(at);
        let tail = tail
            .strip_prefix("\r\n")
            .or_else(|| return tail.strip_prefix('\r'))
            .or_else(|| return tail.strip_prefix('\n'))
            .unwrap_or(tail);
        self.rest = Some(tail);
        return Some(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn lines(start: u32, end: u32) -> LineRange {
        return LineRange { end, start };
    }

    #[test]
    fn selects_inclusive_one_based_range() {
        assert_eq!(line_range("one\ntwo\nthree\nfour", lines(2, 3)), "two\nthree");
        assert_eq!(line_range("one\ntwo\nthree\nfour", lines(1, 1)), "one");
        assert_eq!(line_range("one\ntwo\nthree\nfour", lines(4, 4)), "four");
    }

    #[test]
    fn line_endings_do_not_matter() {
        let lf = line_range("a\nb\nc\nd", lines(2, 4));
        let crlf = line_range("a\r\nb\r\nc\r\nd", lines(2, 4));
        let cr = line_range("a\rb\rc\rd", lines(2, 4));
        let mixed = line_range("a\r\nb\rc\nd", lines(2, 4));
        assert_eq!(lf, "b\nc\nd");
        assert_eq!(crlf, lf);
        assert_eq!(cr, lf);
        assert_eq!(mixed, lf);
    }

    #[test]
    fn range_past_the_end_is_empty() {
        assert_eq!(line_range("a\nb\nc\nd\ne", lines(10, 12)), "");
    }

    #[test]
    fn range_overlapping_the_end_is_clamped() {
        assert_eq!(line_range("a\nb\nc", lines(2, 40)), "b\nc");
    }

    #[test]
    fn inverted_range_is_empty() {
        assert_eq!(line_range("a\nb\nc\nd", lines(3, 2)), "");
    }

    #[test]
    fn trailing_newline_leaves_an_empty_last_line() {
        let split: Vec<&str> = split_lines("a\nb\n").collect();
        assert_eq!(split, vec!["a", "b", ""]);
        assert_eq!(line_range("a\nb\n", lines(2, 3)), "b\n");
    }

    #[test]
    fn blank_lines_survive() {
        let split: Vec<&str> = split_lines("a\r\n\r\nb\n\nc").collect();
        assert_eq!(split, vec!["a", "", "b", "", "c"]);
    }

    #[test]
    fn empty_content_is_one_empty_line() {
        let split: Vec<&str> = split_lines("").collect();
        assert_eq!(split, vec![""]);
        assert_eq!(line_range("", lines(1, 1)), "");
    }
}
