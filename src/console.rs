//! Console stream decoration: line-buffered scanning and bold markup.
//!
//! The host hands each unit of work a console sink. `LineScanner` wraps such a
//! sink, rewriting the stream one line at a time before it reaches its final
//! destination. The rendering hint is in-band ANSI, so stripping it restores
//! the plain stream exactly.

use std::borrow::Cow;
use std::io::{self, Write};

use regex::bytes::Regex;

/// Start of the bold rendering hint understood by ANSI-capable consoles.
pub const BOLD: &str = "\x1b[1m";
/// End of the bold rendering hint.
pub const RESET: &str = "\x1b[0m";

/// Wrap `text` in the bold rendering hint.
pub fn bold(text: &str) -> String {
    format!("{}{}{}", BOLD, text, RESET)
}

/// Remove every bold rendering hint from `text`, restoring the plain stream.
pub fn strip_markup(text: &str) -> String {
    text.replace(BOLD, "").replace(RESET, "")
}

/// `io::Write` decorator between a producer and a downstream sink.
///
/// Bytes are buffered until a full newline-terminated line is available. Each
/// complete line is scanned once for non-overlapping occurrences of the
/// pattern, left to right; every occurrence is counted and wrapped in the bold
/// hint, and the rewritten line is forwarded downstream. Nothing beyond the
/// current line is held back.
pub struct LineScanner<W: Write> {
    inner: W,
    pattern: Regex,
    buf: Vec<u8>,
    count: u64,
}

impl<W: Write> LineScanner<W> {
    pub fn new(pattern: Regex, inner: W) -> Self {
        Self {
            inner,
            pattern,
            buf: Vec::new(),
            count: 0,
        }
    }

    /// Occurrences seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Scan and forward any buffered partial line, flush the sink, and return
    /// the final count. A trailing line is scanned even without a terminator.
    pub fn finish(mut self) -> io::Result<u64> {
        if !self.buf.is_empty() {
            let rest = std::mem::take(&mut self.buf);
            self.eol(&rest)?;
        }
        self.inner.flush()?;
        Ok(self.count)
    }

    /// Invoked once per line, terminator included when one arrived.
    fn eol(&mut self, line: &[u8]) -> io::Result<()> {
        let (annotated, hits) = annotate(&self.pattern, line);
        self.count += hits;
        self.inner.write_all(&annotated)
    }
}

impl<W: Write> Write for LineScanner<W> {
    fn write(&mut self, chunk: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(chunk);
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            self.eol(&line)?;
        }
        Ok(chunk.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // A partial line stays buffered; only the sink is flushed.
        self.inner.flush()
    }
}

/// Rewrite one line, wrapping every non-overlapping pattern occurrence in the
/// bold hint. Returns the rewritten line and the occurrence count; a line
/// without occurrences is passed through untouched.
fn annotate<'a>(pattern: &Regex, line: &'a [u8]) -> (Cow<'a, [u8]>, u64) {
    let mut out: Vec<u8> = Vec::new();
    let mut hits = 0;
    let mut tail = 0;
    for m in pattern.find_iter(line) {
        out.extend_from_slice(&line[tail..m.start()]);
        out.extend_from_slice(BOLD.as_bytes());
        out.extend_from_slice(m.as_bytes());
        out.extend_from_slice(RESET.as_bytes());
        tail = m.end();
        hits += 1;
    }
    if hits == 0 {
        return (Cow::Borrowed(line), 0);
    }
    out.extend_from_slice(&line[tail..]);
    (Cow::Owned(out), hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(target: &str) -> Regex {
        Regex::new(&regex::escape(target)).unwrap()
    }

    fn scan(target: &str, chunks: &[&[u8]]) -> (u64, Vec<u8>) {
        let mut sink = Vec::new();
        let mut scanner = LineScanner::new(literal(target), &mut sink);
        for chunk in chunks {
            scanner.write_all(chunk).unwrap();
        }
        let count = scanner.finish().unwrap();
        (count, sink)
    }

    #[test]
    fn counts_non_overlapping_left_to_right() {
        assert_eq!(scan("aa", &[b"aaa\n"]).0, 1);
        assert_eq!(scan("ab", &[b"abab\n"]).0, 2);
        assert_eq!(scan("Jesse", &[b"Jesse! How are you, Jesse?\n"]).0, 2);
    }

    #[test]
    fn matches_are_literal_not_pattern_syntax() {
        assert_eq!(scan("a.b", &[b"axb\n"]).0, 0);
        assert_eq!(scan("a.b", &[b"a.b\n"]).0, 1);
        assert_eq!(scan("(*)", &[b"f(*) = (*)\n"]).0, 2);
    }

    #[test]
    fn annotates_each_occurrence_in_place() {
        let (count, out) = scan("Jesse", &[b"Hello, Jesse!\n"]);
        assert_eq!(count, 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("Hello, {}!\n", bold("Jesse")));
    }

    #[test]
    fn stripping_markup_restores_the_original_line() {
        let original = "Jesse! How are you, Jesse?\n";
        let (_, out) = scan("Jesse", &[original.as_bytes()]);
        let text = String::from_utf8(out).unwrap();
        assert_ne!(text, original);
        assert_eq!(strip_markup(&text), original);
    }

    #[test]
    fn lines_without_matches_pass_through_unchanged() {
        let (count, out) = scan("Jesse", &[b"nothing to see here\n"]);
        assert_eq!(count, 0);
        assert_eq!(out, b"nothing to see here\n");
    }

    #[test]
    fn non_utf8_bytes_pass_through_unchanged() {
        let line: &[u8] = b"\xff\xfe raw bytes \xff\n";
        let (count, out) = scan("Jesse", &[line]);
        assert_eq!(count, 0);
        assert_eq!(out, line);
    }

    #[test]
    fn buffers_until_a_full_line_is_available() {
        let (count, out) = scan("Jesse", &[b"Hel", b"lo, Jes", b"se!\n"]);
        assert_eq!(count, 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(strip_markup(&text), "Hello, Jesse!\n");
    }

    #[test]
    fn scans_every_line_in_a_single_write() {
        let (count, out) = scan("Jesse", &[b"Jesse\nno match\nJesse again\n"]);
        assert_eq!(count, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(strip_markup(&text), "Jesse\nno match\nJesse again\n");
    }

    #[test]
    fn flush_does_not_release_a_partial_line() {
        let mut sink = Vec::new();
        let mut scanner = LineScanner::new(literal("Jesse"), &mut sink);
        scanner.write_all(b"Jes").unwrap();
        scanner.flush().unwrap();
        assert_eq!(scanner.count(), 0);
        drop(scanner);
        assert!(sink.is_empty());
    }

    #[test]
    fn finish_scans_the_trailing_partial_line() {
        let (count, out) = scan("Jesse", &[b"farewell from Jesse"]);
        assert_eq!(count, 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(strip_markup(&text), "farewell from Jesse");
    }

    #[test]
    fn crlf_terminators_are_preserved() {
        let (count, out) = scan("Jesse", &[b"Hello, Jesse!\r\n"]);
        assert_eq!(count, 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(strip_markup(&text), "Hello, Jesse!\r\n");
        assert!(text.ends_with("\r\n"));
    }

    #[test]
    fn bold_and_strip_are_inverses() {
        assert_eq!(strip_markup(&bold("Jesse")), "Jesse");
        assert_eq!(strip_markup("no markup at all"), "no markup at all");
    }
}
