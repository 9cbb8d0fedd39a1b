#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the DIMACS CNF (Conjunctive Normal Form) file format.
//!
//! The format:
//! - Comment lines start with `c` or `C`; blank lines are skipped.
//! - The first content line is the problem line `p cnf <num_variables> <num_clauses>`.
//! - The rest is whitespace-separated integers, each clause closed by `0`.
//!
//! The parser is deliberately lax about the clause section:
//! - A token starting with `c`/`C` discards the rest of its physical line.
//! - A token that is not an integer counts as `0`, i.e. it closes the clause.
//! - Parsing stops as soon as the declared number of clauses has been read;
//!   anything after that is ignored.
//! - If the input ends early, the store simply holds fewer clauses. A clause
//!   left open at end of input is dropped.
//!
//! Two variants produce the two storage layouts, [`parse_dimacs`] (one heap
//! array per clause) and [`parse_dimacs_pooled`] (one shared literal pool).
//! Both run the same scanner and differ only in where literals are put, so for
//! the same input they report the same variable count and clause sequence.

use crate::sat::cnf::Cnf;
use crate::sat::error::{AllocError, ParseError};
use crate::sat::literal::Literal;
use crate::sat::pooled::PooledCnf;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// The counts declared by the problem line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Declared number of variables.
    pub num_vars: u32,
    /// Declared number of clauses.
    pub num_clauses: usize,
}

/// Line-at-a-time reader reusing one buffer, tracking 1-based line numbers.
///
/// Lines are raw bytes: input need not be valid UTF-8.
struct Lines<R> {
    reader: R,
    buf: Vec<u8>,
    number: usize,
}

impl<R: BufRead> Lines<R> {
    const fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            number: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, &[u8])>, ParseError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.number += 1;
        Ok(Some((self.number, self.buf.as_slice())))
    }
}

/// Whitespace-separated tokens of a raw line.
fn tokens(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(u8::is_ascii_whitespace).filter(|t| !t.is_empty())
}

/// Reads a literal token; anything that is not an integer reads as `0`.
fn literal_token(token: &[u8]) -> Literal {
    std::str::from_utf8(token)
        .ok()
        .and_then(|t| t.parse().ok())
        .unwrap_or(0)
}

/// Parses a problem line of the form `p cnf <vars> <clauses>`.
///
/// `p` may be upper case; the format word must read `cnf` or `CNF`. Anything
/// after the two counts is ignored.
///
/// # Errors
///
/// [`ParseError::MalformedHeader`] if the line has another shape or the counts
/// are not integers, [`ParseError::NegativeCount`] if either count is negative.
pub fn parse_header(text: &str, line: usize) -> Result<Header, ParseError> {
    let malformed = || ParseError::MalformedHeader {
        line,
        text: text.trim().to_owned(),
    };

    let mut tokens = text.split_whitespace();
    if !matches!(tokens.next(), Some("p" | "P")) {
        return Err(malformed());
    }
    if !matches!(tokens.next(), Some("cnf" | "CNF")) {
        return Err(malformed());
    }

    let num_vars: i64 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(malformed)?;
    let num_clauses: i64 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(malformed)?;

    if num_vars < 0 || num_clauses < 0 {
        return Err(ParseError::NegativeCount { line });
    }

    // Literals are i32, so variable ids must stay within i32::MAX.
    let num_vars = i32::try_from(num_vars)
        .ok()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(malformed)?;
    let num_clauses = usize::try_from(num_clauses).map_err(|_| malformed())?;

    Ok(Header {
        num_vars,
        num_clauses,
    })
}

/// Skips blank and comment lines up to the problem line and parses it.
fn read_header<R: BufRead>(lines: &mut Lines<R>) -> Result<Header, ParseError> {
    loop {
        let Some((line, text)) = lines.next_line()? else {
            return Err(ParseError::MissingHeader {
                line: lines.number + 1,
            });
        };
        let trimmed = text.trim_ascii_start();
        match trimmed.first() {
            None | Some(b'c' | b'C') => {}
            Some(b'p' | b'P') => return parse_header(&String::from_utf8_lossy(trimmed), line),
            Some(_) => return Err(ParseError::MissingHeader { line }),
        }
    }
}

/// Destination of scanned clauses; one implementation per storage layout.
trait ClauseSink {
    fn literal(&mut self, lit: Literal) -> Result<(), AllocError>;
    fn end_clause(&mut self) -> Result<(), AllocError>;
    /// Drops a clause that was never closed.
    fn abandon(&mut self);
}

/// Scans clause tokens into `sink` until `declared` clauses are stored or the
/// input ends. Returns the number of clauses stored.
fn read_clauses<R: BufRead, S: ClauseSink>(
    lines: &mut Lines<R>,
    declared: usize,
    sink: &mut S,
) -> Result<usize, ParseError> {
    let mut stored = 0;

    'lines: while stored < declared {
        let Some((_, text)) = lines.next_line()? else {
            break;
        };
        for token in tokens(text) {
            if matches!(token.first(), Some(b'c' | b'C')) {
                continue 'lines;
            }
            match literal_token(token) {
                0 => {
                    sink.end_clause()?;
                    stored += 1;
                    if stored == declared {
                        break 'lines;
                    }
                }
                lit => sink.literal(lit)?,
            }
        }
    }

    sink.abandon();

    if stored < declared {
        warn!(declared, found = stored, "input ended before the declared clause count");
    }
    Ok(stored)
}

/// Collects each clause into its own exactly-sized allocation.
struct DirectSink {
    cnf: Cnf,
    pending: Vec<Literal>,
}

impl ClauseSink for DirectSink {
    fn literal(&mut self, lit: Literal) -> Result<(), AllocError> {
        if self.pending.len() == self.pending.capacity() {
            let extra = self.pending.capacity().max(8);
            self.pending.try_reserve_exact(extra)?;
        }
        self.pending.push(lit);
        Ok(())
    }

    fn end_clause(&mut self) -> Result<(), AllocError> {
        self.cnf.push_clause(&self.pending)?;
        self.pending.clear();
        Ok(())
    }

    fn abandon(&mut self) {
        self.pending.clear();
    }
}

/// Writes literals straight into the shared pool.
struct PooledSink {
    store: PooledCnf,
    open: bool,
}

impl ClauseSink for PooledSink {
    fn literal(&mut self, lit: Literal) -> Result<(), AllocError> {
        if !self.open {
            self.store.begin_clause()?;
            self.open = true;
        }
        self.store.push_literal(lit)
    }

    fn end_clause(&mut self) -> Result<(), AllocError> {
        if !self.open {
            self.store.begin_clause()?;
        }
        self.open = false;
        Ok(())
    }

    fn abandon(&mut self) {
        if self.open {
            self.store.abandon_last_clause();
            self.open = false;
        }
    }
}

/// Parses DIMACS text into the direct (per-clause array) layout.
///
/// # Errors
///
/// [`ParseError`] for unreadable input, a missing or malformed header, or a
/// failed allocation. No partial store is returned.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf, ParseError> {
    let mut lines = Lines::new(reader);
    let header = read_header(&mut lines)?;

    let mut sink = DirectSink {
        cnf: Cnf::with_vars(header.num_vars),
        pending: Vec::new(),
    };
    read_clauses(&mut lines, header.num_clauses, &mut sink)?;

    debug!(
        vars = sink.cnf.num_vars,
        clauses = sink.cnf.clauses.len(),
        "parsed CNF (direct layout)"
    );
    Ok(sink.cnf)
}

/// Parses DIMACS text into the pooled layout.
///
/// # Errors
///
/// Same as [`parse_dimacs`].
pub fn parse_dimacs_pooled<R: BufRead>(reader: R) -> Result<PooledCnf, ParseError> {
    let mut lines = Lines::new(reader);
    let header = read_header(&mut lines)?;

    let mut sink = PooledSink {
        store: PooledCnf::with_vars(header.num_vars)?,
        open: false,
    };
    read_clauses(&mut lines, header.num_clauses, &mut sink)?;

    debug!(
        vars = header.num_vars,
        clauses = sink.store.spans().len(),
        pool = sink.store.pool_len(),
        "parsed CNF (pooled layout)"
    );
    Ok(sink.store)
}

/// Parses a DIMACS CNF file into the direct layout.
///
/// # Errors
///
/// [`ParseError::Io`] if the file cannot be opened, otherwise as [`parse_dimacs`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Cnf, ParseError> {
    let file = File::open(path)?;
    parse_dimacs(BufReader::new(file))
}

/// Parses a DIMACS CNF file into the pooled layout.
///
/// # Errors
///
/// As [`parse_file`].
pub fn parse_file_pooled<P: AsRef<Path>>(path: P) -> Result<PooledCnf, ParseError> {
    let file = File::open(path)?;
    parse_dimacs_pooled(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause_storage::ClauseStore;
    use itertools::Itertools;
    use std::io::Cursor;

    fn direct(text: &str) -> Cnf {
        parse_dimacs(Cursor::new(text)).unwrap()
    }

    fn pooled(text: &str) -> PooledCnf {
        parse_dimacs_pooled(Cursor::new(text)).unwrap()
    }

    fn clauses_of<S: ClauseStore>(store: &S) -> Vec<Vec<Literal>> {
        store.clauses().map(<[Literal]>::to_vec).collect_vec()
    }

    #[test]
    fn test_parse_simple_dimacs() {
        let cnf = direct(
            "c This is a comment\n\
             p cnf 3 2\n\
             1 -2 0\n\
             2 3 0\n",
        );
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(clauses_of(&cnf), vec![vec![1, -2], vec![2, 3]]);
    }

    #[test]
    fn test_header_after_blank_and_upper_case_comments() {
        let cnf = direct("\n   \nC shouting\nc quiet\nP cnf 2 1\n1 2 0\n");
        assert_eq!(cnf.num_vars, 2);
        assert_eq!(cnf.num_clauses(), 1);
    }

    #[test]
    fn test_header_upper_case_format_word() {
        let cnf = direct("p CNF 1 1\n-1 0\n");
        assert_eq!(clauses_of(&cnf), vec![vec![-1]]);
    }

    #[test]
    fn test_header_rejects_other_format_word() {
        let err = parse_dimacs(Cursor::new("p wcnf 1 1\n1 0\n")).unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_header_rejects_non_numeric_counts() {
        let err = parse_dimacs(Cursor::new("p cnf x 1\n1 0\n")).unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { .. }));
    }

    #[test]
    fn test_negative_counts_are_rejected() {
        let err = parse_dimacs(Cursor::new("c\np cnf -1 2\n")).unwrap_err();
        assert!(matches!(err, ParseError::NegativeCount { line: 2 }));
        let err = parse_dimacs_pooled(Cursor::new("p cnf 1 -2\n")).unwrap_err();
        assert!(matches!(err, ParseError::NegativeCount { line: 1 }));
    }

    #[test]
    fn test_missing_header() {
        let err = parse_dimacs(Cursor::new("c comment\n1 2 0\n")).unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader { line: 2 }));
        let err = parse_dimacs_pooled(Cursor::new("c only comments\n")).unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader { .. }));
    }

    #[test]
    fn test_clauses_may_span_lines_and_share_lines() {
        let cnf = direct("p cnf 4 3\n1 2\n 3 0 -4 0\n0\n");
        assert_eq!(clauses_of(&cnf), vec![vec![1, 2, 3], vec![-4], vec![]]);
    }

    #[test]
    fn test_inline_comment_discards_rest_of_line() {
        let cnf = direct("p cnf 3 2\n1 2 c 9 9 0\n0\n-3 0\n");
        // "c 9 9 0" is dropped, so the first clause runs on to the next line.
        assert_eq!(clauses_of(&cnf), vec![vec![1, 2], vec![-3]]);
    }

    #[test]
    fn test_non_numeric_token_terminates_clause() {
        let cnf = direct("p cnf 3 3\n1 x 2 3 0\n-1 0\n");
        assert_eq!(clauses_of(&cnf), vec![vec![1], vec![2, 3], vec![-1]]);
    }

    #[test]
    fn test_non_utf8_comment_is_skipped() {
        let text: &[u8] = b"c caf\xe9 instance\np cnf 2 1\n1 2 0\n";
        let cnf = parse_dimacs(Cursor::new(text)).unwrap();
        assert_eq!(clauses_of(&cnf), vec![vec![1, 2]]);
        let store = parse_dimacs_pooled(Cursor::new(text)).unwrap();
        assert_eq!(clauses_of(&store), vec![vec![1, 2]]);
    }

    #[test]
    fn test_non_utf8_token_terminates_clause() {
        let text: &[u8] = b"p cnf 2 2\n1 \xff 2 0\n";
        let cnf = parse_dimacs(Cursor::new(text)).unwrap();
        assert_eq!(clauses_of(&cnf), vec![vec![1], vec![2]]);
        let store = parse_dimacs_pooled(Cursor::new(text)).unwrap();
        assert_eq!(clauses_of(&store), vec![vec![1], vec![2]]);
    }

    #[test]
    fn test_non_utf8_header_is_malformed() {
        let err = parse_dimacs(Cursor::new(&b"p cnf \xff 1\n1 0\n"[..])).unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_stops_at_declared_count() {
        let cnf = direct("p cnf 2 1\n1 0\n2 0\nthis is never read\n");
        assert_eq!(clauses_of(&cnf), vec![vec![1]]);
    }

    #[test]
    fn test_fewer_clauses_than_declared_truncates() {
        let cnf = direct("p cnf 3 5\n1 0\n2 3 0\n");
        assert_eq!(cnf.num_clauses(), 2);
        let store = pooled("p cnf 3 5\n1 0\n2 3 0\n");
        assert_eq!(store.num_clauses(), 2);
    }

    #[test]
    fn test_unterminated_last_clause_is_dropped() {
        let cnf = direct("p cnf 3 2\n1 0\n2 3\n");
        assert_eq!(clauses_of(&cnf), vec![vec![1]]);
        let store = pooled("p cnf 3 2\n1 0\n2 3\n");
        assert_eq!(clauses_of(&store), vec![vec![1]]);
        assert_eq!(store.pool_len(), 1);
    }

    #[test]
    fn test_empty_clause_is_stored() {
        let cnf = direct("p cnf 1 2\n0\n1 0\n");
        assert_eq!(clauses_of(&cnf), vec![vec![], vec![1]]);
    }

    #[test]
    fn test_zero_declared_clauses() {
        let cnf = direct("p cnf 0 0\n1 2 0\n");
        assert_eq!(cnf.num_vars, 0);
        assert!(cnf.is_empty());
    }

    #[test]
    fn test_end_marker_behaves_as_terminator() {
        let cnf = direct("p cnf 2 3\n1 0\n-2 0\n%\n0\n");
        assert_eq!(clauses_of(&cnf), vec![vec![1], vec![-2], vec![]]);
    }

    #[test]
    fn test_layouts_are_equivalent() {
        let inputs = [
            "p cnf 3 2\n1 -2 0\n2 3 0\n",
            "c x\np cnf 5 4\n1 2 3 4 5 0 -1 0\n0\n c trailing\n2 c 3\n -3 0\n",
            "p cnf 3 6\n1 a -2 0\n3\n0\n",
            "p cnf 2 10\n1 2 0\n",
            "p cnf 4 2\n1 2\n3 4\n",
        ];
        for text in inputs {
            let a = direct(text);
            let b = pooled(text);
            assert_eq!(a.num_vars(), b.num_vars(), "{text:?}");
            assert_eq!(clauses_of(&a), clauses_of(&b), "{text:?}");
        }
    }

    #[test]
    fn test_layouts_agree_on_large_input() {
        let mut text = String::from("p cnf 50 3000\n");
        for i in 0..3000_i32 {
            let width = i % 11;
            for j in 0..width {
                let lit = (i * 7 + j * 13) % 50 + 1;
                text.push_str(&format!("{} ", if (i + j) % 2 == 0 { lit } else { -lit }));
            }
            text.push_str("0\n");
        }
        let a = direct(&text);
        let b = pooled(&text);
        assert_eq!(a.num_clauses(), 3000);
        assert_eq!(clauses_of(&a), clauses_of(&b));
    }

    #[test]
    fn test_print_round_trip() {
        let original = direct("c x\np cnf 4 4\n1  -2 0\n\n0\n3 4 -1 0 c tail\n-4 0\n");
        let printed = original.to_string();
        let reparsed = direct(&printed);
        assert_eq!(reparsed, original);

        let pooled_reparsed = pooled(&pooled(&printed).to_string());
        assert_eq!(clauses_of(&pooled_reparsed), clauses_of(&original));
    }
}
