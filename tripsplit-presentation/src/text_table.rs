use std::{borrow::Cow, fmt::Write};

const COLUMN_GAP: &str = "  ";
const RULE: char = '-';

#[derive(Default)]
pub struct TextTableBuilder<'a, Seq> {
    headers: &'a [Cow<'a, str>],
    rows: Vec<Seq>,
    alignments: Cow<'a, [Alignment]>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl<'a, Seq> TextTableBuilder<'a, Seq>
where
    Seq: AsRef<[Cow<'a, str>]> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = Cow::Borrowed(alignments);
        self
    }

    pub fn headers(mut self, headers: &'a [Cow<'a, str>]) -> Self {
        self.headers = headers;
        if self.alignments.is_empty() {
            self.alignments = Cow::Owned(vec![Alignment::default(); self.headers.len()]);
        }
        self
    }

    pub fn row(mut self, row: Seq) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Seq>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Renders the header, a rule under it and every row; cells past the
    /// header count are dropped. Lines end with `\n` and carry no trailing
    /// spaces.
    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.as_ref().iter().take(col_count).enumerate() {
                col_widths[i] = col_widths[i].max(display_width(cell));
            }
        }

        let mut table = String::with_capacity(64 * (self.rows.len() + 2));
        let alignment = |i: usize| self.alignments.get(i).copied().unwrap_or_default();

        push_line(
            &mut table,
            self.headers.iter().enumerate().map(|(i, header)| {
                pad(header, col_widths[i], alignment(i))
            }),
        );
        push_line(
            &mut table,
            col_widths
                .iter()
                .map(|width| RULE.to_string().repeat(*width)),
        );
        for row in &self.rows {
            push_line(
                &mut table,
                (0..col_count).map(|i| {
                    let cell = row.as_ref().get(i).map_or("", |cell| cell.as_ref());
                    pad(cell, col_widths[i], alignment(i))
                }),
            );
        }

        table
    }
}

fn push_line(out: &mut String, cells: impl Iterator<Item = String>) {
    let line = cells.collect::<Vec<_>>().join(COLUMN_GAP);
    let _ = writeln!(out, "{}", line.trim_end());
}

fn pad(text: &str, width: usize, alignment: Alignment) -> String {
    let fill = width.saturating_sub(display_width(text));
    let (left, right) = match alignment {
        Alignment::Left => (0, fill),
        Alignment::Center => (fill / 2, fill - fill / 2),
        Alignment::Right => (fill, 0),
    };
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

/// Monospace width, counting East Asian wide and fullwidth characters twice.
fn display_width(text: &str) -> usize {
    text.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x1F300..=0x1F64F
            | 0x20000..=0x3FFFD
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn aligns_columns_under_a_rule() {
        let headers = [Cow::Borrowed("Member"), Cow::Borrowed("Balance")];
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&headers)
            .row([Cow::Borrowed("Ana"), Cow::Borrowed("+60.00")])
            .row([Cow::Borrowed("Bartholomew"), Cow::Borrowed("-5.00")])
            .build();

        let expected = "\
Member       Balance
-----------  -------
Ana           +60.00
Bartholomew    -5.00
";
        assert_eq!(table, expected);
    }

    #[test]
    fn no_headers_renders_nothing() {
        let table: String = TextTableBuilder::<Vec<Cow<'static, str>>>::new().build();
        assert!(table.is_empty());
    }

    #[rstest]
    #[case::left("ab", Alignment::Left, "ab   ")]
    #[case::center("ab", Alignment::Center, " ab  ")]
    #[case::right("ab", Alignment::Right, "   ab")]
    #[case::too_long("abcdefg", Alignment::Right, "abcdefg")]
    fn pad_cases(#[case] text: &str, #[case] alignment: Alignment, #[case] expected: &str) {
        assert_eq!(pad(text, 5, alignment), expected);
    }

    #[test]
    fn wide_characters_count_twice() {
        assert_eq!(display_width("東京"), 4);
        assert_eq!(display_width("€5"), 2);
        assert_eq!(pad("東京", 6, Alignment::Left), "東京  ");
    }
}
