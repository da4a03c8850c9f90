//! Output formatting for match reports

use crate::visitor::MatchRecord;
use std::collections::BTreeMap;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn color_choice(color: bool) -> ColorChoice {
    if color { ColorChoice::Auto } else { ColorChoice::Never }
}

/// Print one line per match: `idA:offA+lenA  idB:offB+lenB`
pub fn print_matches(records: &[MatchRecord], color: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color_choice(color));
    write_matches(&mut stdout, records)
}

/// Print one JSON object per match
pub fn print_json_lines(records: &[MatchRecord]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json_lines(&mut lock, records)
}

/// Print match counts per text pair (for --count)
pub fn print_pair_counts(records: &[MatchRecord], color: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color_choice(color));
    write_pair_counts(&mut stdout, records)
}

fn write_side<W: WriteColor>(out: &mut W, text: &str, offset: usize, len: usize) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
    write!(out, "{}", text)?;
    out.reset()?;
    write!(out, ":")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "{}", offset)?;
    out.reset()?;
    write!(out, "+")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "{}", len)?;
    out.reset()
}

fn write_matches<W: WriteColor>(out: &mut W, records: &[MatchRecord]) -> io::Result<()> {
    for r in records {
        write_side(out, &r.text_a, r.offset_a, r.len_a)?;
        write!(out, "  ")?;
        write_side(out, &r.text_b, r.offset_b, r.len_b)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_json_lines<W: Write>(out: &mut W, records: &[MatchRecord]) -> io::Result<()> {
    for r in records {
        serde_json::to_writer(&mut *out, r)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_pair_counts<W: WriteColor>(out: &mut W, records: &[MatchRecord]) -> io::Result<()> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for r in records {
        *counts.entry((r.text_a.as_str(), r.text_b.as_str())).or_insert(0) += 1;
    }

    for ((a, b), count) in counts {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", a)?;
        out.reset()?;
        write!(out, "  ")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", b)?;
        out.reset()?;
        write!(out, ":")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "{}", count)?;
        out.reset()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    fn record(a: &str, oa: usize, b: &str, ob: usize) -> MatchRecord {
        MatchRecord {
            text_a: a.to_string(),
            offset_a: oa,
            len_a: 4,
            text_b: b.to_string(),
            offset_b: ob,
            len_b: 5,
        }
    }

    fn render(f: impl FnOnce(&mut NoColor<Vec<u8>>) -> io::Result<()>) -> String {
        let mut out = NoColor::new(Vec::new());
        f(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_lines() {
        let records = [record("a", 0, "b", 7), record("a", 3, "c", 1)];
        let text = render(|out| write_matches(out, &records));
        assert_eq!(text, "a:0+4  b:7+5\na:3+4  c:1+5\n");
    }

    #[test]
    fn test_json_lines() {
        let records = [record("a", 0, "b", 7)];
        let mut out = Vec::new();
        write_json_lines(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["text_b"], "b");
        assert_eq!(value["offset_b"], 7);
        assert_eq!(value["len_a"], 4);
    }

    #[test]
    fn test_pair_counts_sorted() {
        let records = [
            record("b", 0, "c", 0),
            record("a", 0, "b", 1),
            record("a", 2, "b", 3),
        ];
        let text = render(|out| write_pair_counts(out, &records));
        assert_eq!(text, "a  b:2\nb  c:1\n");
    }
}
