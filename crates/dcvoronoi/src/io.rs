//! Text formats: the persisted diagram file and the batch site input.
//!
//! Diagram file
//! - `P x y` per site, sorted by `(x, y)`.
//! - `E x1 y1 x2 y2` per edge, endpoints canonicalized so the smaller
//!   `(x, y)` comes first; edges sorted by first endpoint, then by the second
//!   endpoint's `y` (then `x`).
//! - Numbers use Rust's shortest round-trip `f64` formatting, so parsing the
//!   output reproduces it bit for bit.
//!
//! Batch site input
//! - `#` starts a comment (whole line or trailing); blank lines are skipped.
//! - A line with one integer `n` opens a case of `n` following `x y` lines.
//! - `n = 0` ends the input; anything after it is ignored.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::dcel::Diagram;
use crate::geometry::{cmp_xy, Point};

/// Why a line failed to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnknownTag(String),
    /// Wrong number of fields for the line's role.
    FieldCount { expected: usize, got: usize },
    BadNumber(String),
    /// Input ended inside a case.
    TruncatedCase { expected: usize, got: usize },
}

/// A parse failure at a 1-based line number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            ParseErrorKind::UnknownTag(t) => write!(f, "unknown record tag {t:?}"),
            ParseErrorKind::FieldCount { expected, got } => {
                write!(f, "expected {expected} fields, got {got}")
            }
            ParseErrorKind::BadNumber(s) => write!(f, "not a number: {s:?}"),
            ParseErrorKind::TruncatedCase { expected, got } => {
                write!(f, "case declares {expected} sites but only {got} follow")
            }
        }
    }
}

impl std::error::Error for ParseError {}

fn number<T: FromStr>(line: usize, word: &str) -> Result<T, ParseError> {
    word.parse().map_err(|_| ParseError {
        line,
        kind: ParseErrorKind::BadNumber(word.to_string()),
    })
}

fn fields(line: usize, words: &[&str], expected: usize) -> Result<(), ParseError> {
    if words.len() == expected {
        Ok(())
    } else {
        Err(ParseError {
            line,
            kind: ParseErrorKind::FieldCount {
                expected,
                got: words.len(),
            },
        })
    }
}

/// Canonical, byte-comparable form of a diagram.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiagramFile {
    pub sites: Vec<Point>,
    pub segments: Vec<(Point, Point)>,
}

fn cmp_segment(a: &(Point, Point), b: &(Point, Point)) -> Ordering {
    cmp_xy(&a.0, &b.0)
        .then_with(|| a.1.y.total_cmp(&b.1.y))
        .then_with(|| a.1.x.total_cmp(&b.1.x))
}

impl DiagramFile {
    /// Canonicalize `diagram`; infinite endpoints are written at their
    /// placeholder positions.
    pub fn from_diagram(diagram: &Diagram) -> Self {
        let sites = diagram.sites().iter().map(|s| s.pos).collect();
        let segments = diagram
            .edge_ids()
            .map(|e| {
                let (s, t) = diagram.endpoints(e);
                (s.pos, t.pos)
            })
            .collect();
        Self::from_parts(sites, segments)
    }

    /// Sort sites and canonicalize and sort segments.
    pub fn from_parts(mut sites: Vec<Point>, segments: Vec<(Point, Point)>) -> Self {
        sites.sort_by(cmp_xy);
        let mut segments: Vec<(Point, Point)> = segments
            .into_iter()
            .map(|(a, b)| {
                if cmp_xy(&b, &a) == Ordering::Less {
                    (b, a)
                } else {
                    (a, b)
                }
            })
            .collect();
        segments.sort_by(cmp_segment);
        Self { sites, segments }
    }

    pub fn to_text(&self) -> String {
        let sites = self.sites.iter().map(|p| format!("P {} {}\n", p.x, p.y));
        let segments = self
            .segments
            .iter()
            .map(|(a, b)| format!("E {} {} {} {}\n", a.x, a.y, b.x, b.y));
        sites.chain(segments).collect()
    }

    /// Read the diagram format back. The result is re-canonicalized, so
    /// hand-written files in any order compare equal to generated ones.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut sites = Vec::new();
        let mut segments = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let words: Vec<&str> = raw.split_whitespace().collect();
            let Some(&tag) = words.first() else {
                continue;
            };
            match tag {
                "P" => {
                    fields(line, &words, 3)?;
                    sites.push(Point::new(number(line, words[1])?, number(line, words[2])?));
                }
                "E" => {
                    fields(line, &words, 5)?;
                    let a = Point::new(number(line, words[1])?, number(line, words[2])?);
                    let b = Point::new(number(line, words[3])?, number(line, words[4])?);
                    segments.push((a, b));
                }
                other => {
                    return Err(ParseError {
                        line,
                        kind: ParseErrorKind::UnknownTag(other.to_string()),
                    })
                }
            }
        }
        Ok(Self::from_parts(sites, segments))
    }
}

/// Parse batch site input into one site list per case.
pub fn parse_cases(text: &str) -> Result<Vec<Vec<Point>>, ParseError> {
    let mut cases = Vec::new();
    // (declared size, sites so far)
    let mut open: Option<(usize, Vec<Point>)> = None;
    let mut last_line = 0;
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        last_line = line;
        let body = raw.split('#').next().unwrap_or("");
        let words: Vec<&str> = body.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        match open.as_mut() {
            None => {
                fields(line, &words, 1)?;
                let n: usize = number(line, words[0])?;
                if n == 0 {
                    return Ok(cases);
                }
                open = Some((n, Vec::with_capacity(n)));
            }
            Some((n, sites)) => {
                fields(line, &words, 2)?;
                sites.push(Point::new(number(line, words[0])?, number(line, words[1])?));
                if sites.len() == *n {
                    if let Some((_, done)) = open.take() {
                        cases.push(done);
                    }
                }
            }
        }
    }
    if let Some((expected, sites)) = open {
        return Err(ParseError {
            line: last_line,
            kind: ParseErrorKind::TruncatedCase {
                expected,
                got: sites.len(),
            },
        });
    }
    Ok(cases)
}

/// Write cases in the batch input format, terminated by `0`.
pub fn write_cases(cases: &[Vec<Point>]) -> String {
    let mut out = String::new();
    for case in cases {
        out.push_str(&format!("{}\n", case.len()));
        for p in case {
            out.push_str(&format!("{} {}\n", p.x, p.y));
        }
    }
    out.push_str("0\n");
    out
}
