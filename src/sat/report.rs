//! The `.res` result file written after every solve.
//!
//! ```text
//! s 1
//! v 1 -2 3
//! t 12
//! ```
//!
//! `s` carries the status code (`1` SAT, `0` UNSAT, `-1` TIMEOUT or ERROR).
//! The `v` line is only present for SAT and lists every variable once, in
//! order, each followed by a space; an unassigned variable is written as its
//! positive literal. `t` is the solve time in whole milliseconds.

use crate::sat::solver::{SolveReport, Status};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A renderable result record.
#[derive(Debug, Clone, Copy)]
pub struct ResultFile<'a> {
    /// Outcome of the solve.
    pub status: &'a Status,
    /// Wall-clock solve time.
    pub elapsed: Duration,
}

impl<'a> From<&'a SolveReport> for ResultFile<'a> {
    fn from(report: &'a SolveReport) -> Self {
        Self {
            status: &report.status,
            elapsed: report.elapsed,
        }
    }
}

impl ResultFile<'_> {
    /// Writes the three-line record.
    ///
    /// # Errors
    ///
    /// Propagates any error from the writer.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "s {}", self.status.code())?;
        if let Some(model) = self.status.model() {
            out.write_all(b"v ")?;
            for lit in model.model_literals() {
                write!(out, "{lit} ")?;
            }
            writeln!(out)?;
        }
        writeln!(out, "t {:.0}", self.elapsed.as_secs_f64() * 1000.0)?;
        out.flush()
    }

    /// Creates (or truncates) `path` and writes the record to it.
    ///
    /// # Errors
    ///
    /// If the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    /// The record as text, as written by [`Self::write_to`].
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Where the result for `input` goes: the last extension replaced by `.res`,
/// or `.res` appended when the file name has none.
#[must_use]
pub fn result_path<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension("res")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::assignment::Assignment;
    use crate::sat::solver::SolverStats;

    fn report(status: Status, millis: u64) -> SolveReport {
        SolveReport {
            status,
            elapsed: Duration::from_millis(millis),
            stats: SolverStats::default(),
        }
    }

    #[test]
    fn test_sat_record() {
        let mut model = Assignment::new(4).unwrap();
        model.assign(1);
        model.assign(-2);
        model.assign(4);
        let report = report(Status::Sat(model), 12);
        assert_eq!(
            ResultFile::from(&report).render(),
            "s 1\nv 1 -2 3 4 \nt 12\n"
        );
    }

    #[test]
    fn test_unsat_record_has_no_model_line() {
        let report = report(Status::Unsat, 3);
        assert_eq!(ResultFile::from(&report).render(), "s 0\nt 3\n");
    }

    #[test]
    fn test_timeout_record() {
        let report = report(Status::Timeout, 30_000);
        assert_eq!(ResultFile::from(&report).render(), "s -1\nt 30000\n");
    }

    #[test]
    fn test_time_is_rounded() {
        let report = SolveReport {
            status: Status::Unsat,
            elapsed: Duration::from_micros(1_700),
            stats: SolverStats::default(),
        };
        assert_eq!(ResultFile::from(&report).render(), "s 0\nt 2\n");
    }

    #[test]
    fn test_result_path() {
        assert_eq!(result_path("bench/uf20.cnf"), PathBuf::from("bench/uf20.res"));
        assert_eq!(result_path("a.b.cnf"), PathBuf::from("a.b.res"));
        assert_eq!(result_path("plain"), PathBuf::from("plain.res"));
    }

    #[test]
    fn test_save_writes_file() {
        let path = std::env::temp_dir().join(format!("percent-sat-report-{}.res", std::process::id()));
        let report = report(Status::Unsat, 0);
        ResultFile::from(&report).save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "s 0\nt 0\n");
        std::fs::remove_file(&path).unwrap();
    }
}
