//! Status derivation from milestone dates.
//!
//! Rules are evaluated strictly in order and the first hit wins, so an
//! issue that is both listed and inside its window reports `Open`.

use crate::models::IpoStatus;
use chrono::NaiveDate;

/// Milestones known for one row plus the reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestones {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub listed: Option<NaiveDate>,
    pub today: NaiveDate,
}

struct StatusRule {
    status: IpoStatus,
    applies: fn(&Milestones) -> bool,
}

const STATUS_RULES: &[StatusRule] = &[
    StatusRule {
        status: IpoStatus::Open,
        applies: |m| matches!((m.start, m.end), (Some(s), Some(e)) if s <= m.today && m.today <= e),
    },
    StatusRule {
        status: IpoStatus::Upcoming,
        applies: |m| m.start.is_some_and(|s| m.today < s),
    },
    StatusRule {
        status: IpoStatus::Listed,
        applies: |m| m.listed.is_some_and(|l| m.today >= l),
    },
];

/// Returns the first matching status, or `Pending`.
#[must_use]
pub fn compute_status(milestones: &Milestones) -> IpoStatus {
    STATUS_RULES
        .iter()
        .find(|rule| (rule.applies)(milestones))
        .map_or(IpoStatus::Pending, |rule| rule.status)
}
