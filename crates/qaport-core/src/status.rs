//! Test status as understood by the test-management system.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a single test or of an aggregated group of variations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
    /// Skipped; the test still needs to be run.
    Todo,
    /// Expected failure that failed as expected.
    #[serde(rename = "CONDITIONALPASS")]
    ConditionalPass,
}

impl TestStatus {
    /// Wire name used in API payloads and comments.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Todo => "TODO",
            Self::ConditionalPass => "CONDITIONALPASS",
        }
    }

    /// Bracketed token shown in front of each variation line.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Pass => "[PASS]",
            Self::Fail => "[FAIL]",
            Self::Todo => "[SKIP]",
            Self::ConditionalPass => "[XFAIL]",
        }
    }

    /// Combine a group status with one more variation.
    ///
    /// FAIL sticks once reached, TODO beats CONDITIONALPASS and PASS, and
    /// CONDITIONALPASS only replaces PASS. The result does not depend on the
    /// order variations arrive in.
    pub fn merge(self, other: Self) -> Self {
        use TestStatus::*;
        if self == Fail || other == Fail {
            Fail
        } else if self == Todo || other == Todo {
            Todo
        } else if self == ConditionalPass || other == ConditionalPass {
            ConditionalPass
        } else {
            Pass
        }
    }

    /// Whether this status counts toward the `passed` counter.
    pub fn counts_as_passed(self) -> bool {
        matches!(self, Self::Pass | Self::ConditionalPass)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
