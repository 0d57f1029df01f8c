//! Core result pipeline for qaport.
//!
//! Three stages, each consuming the immutable output of the previous one:
//!
//! - [`junit`]: read a JUnit XML report into flat [`TestRecord`]s plus [`RunCounts`]
//! - [`aggregate`]: collapse parametrized variations per clean name and match
//!   them against a name → key mapping
//! - [`report`]: summaries, descriptions and the persisted [`RunInfo`] record
//!
//! Nothing in this crate performs network I/O.

pub mod aggregate;
pub mod error;
pub mod junit;
pub mod report;
pub mod status;

pub use aggregate::{aggregate, AggregatedResult, Aggregation, ResultEntry, TestMapping};
pub use error::{ParseError, ParseResult};
pub use junit::{clean_name, parse_file, parse_str, ParsedResults, RunCounts, TestRecord};
pub use report::{browse_url, description, summary, RunInfo, RunParams, RunResultsInfo};
pub use status::TestStatus;
