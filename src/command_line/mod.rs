//! The console front end: argument parsing, reporting and file output.

pub(crate) mod cli;
