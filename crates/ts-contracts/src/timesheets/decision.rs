//! Approval decision contract

use ts_core::{Email, TsError, TsResult, ValidationErrors};
use ts_models::{Decision, Timesheet};

use crate::base::{Capabilities, Capability, Contract};

/// A proposed decision by one approver
///
/// `reason` must already be normalized: blank text and the "not applicable"
/// sentinel are `None`.
pub struct DecisionData<'t> {
    pub timesheet: &'t Timesheet,
    pub approver: &'t Email,
    pub decision: Decision,
    pub reason: Option<&'t str>,
}

/// Contract for recording an approver's decision
pub struct RecordDecisionContract<'a, C: Capabilities + ?Sized> {
    actor: &'a C,
}

impl<'a, C: Capabilities + ?Sized> RecordDecisionContract<'a, C> {
    pub fn new(actor: &'a C) -> Self {
        Self { actor }
    }

    /// Every guard except the rejection reason
    ///
    /// The lifecycle runs this first so that a rejection lacking a reason can
    /// be deferred instead of failing.
    pub fn validate_without_reason(&self, target: &DecisionData<'_>) -> TsResult<()> {
        let timesheet = target.timesheet;

        if !timesheet.status.awaits_decision() {
            return Err(TsError::InvalidTransition {
                timesheet_id: timesheet.id,
                action: "decide on",
                status: timesheet.status.label(),
            });
        }
        if !timesheet.has_approver(target.approver) {
            return Err(TsError::unknown_approver(target.approver.as_str()));
        }
        self.actor.ensure(Capability::Decide, timesheet)?;
        if !self.actor.acts_for(target.approver) {
            return Err(TsError::Forbidden {
                message: format!(
                    "You cannot decide on timesheet {} as {}",
                    timesheet.id, target.approver
                ),
            });
        }

        if !target.decision.is_final() {
            let mut errors = ValidationErrors::new();
            errors.add("decision", "must be approved or rejected");
            return Err(errors.into());
        }
        if timesheet
            .approval_for(target.approver)
            .map(|record| !record.is_pending())
            .unwrap_or(false)
        {
            let mut errors = ValidationErrors::new();
            errors.add_base(format!(
                "{} has already decided on this submission",
                target.approver
            ));
            return Err(errors.into());
        }

        Ok(())
    }

    pub fn reason_missing(&self, target: &DecisionData<'_>) -> bool {
        target.decision == Decision::Rejected && target.reason.is_none()
    }
}

impl<'a, 't, C: Capabilities + ?Sized> Contract<DecisionData<'t>> for RecordDecisionContract<'a, C> {
    fn validate(&self, target: &DecisionData<'t>) -> TsResult<()> {
        self.validate_without_reason(target)?;

        if self.reason_missing(target) {
            return Err(TsError::MissingRejectionReason {
                timesheet_id: target.timesheet.id,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ts_core::DateScope;
    use crate::base::Actor;
    use ts_models::{ApprovalRecord, TimesheetStatus};

    fn allow_all(_: Capability, _: &Timesheet) -> bool {
        true
    }

    fn boss() -> Email {
        Email::parse("boss@example.com").unwrap()
    }

    fn sent_sheet() -> Timesheet {
        let mut ts = Timesheet::new(
            1,
            42,
            Email::parse("dev@example.com").unwrap(),
            DateScope::day(NaiveDate::from_ymd_opt(2025, 1, 27).unwrap()),
        );
        ts.status = TimesheetStatus::SentForApproval;
        ts.cycle = 1;
        ts.approvers.push(boss());
        ts.approvals.push(ApprovalRecord::pending(1, boss(), 1));
        ts
    }

    #[test]
    fn test_approve() {
        let ts = sent_sheet();
        let approver = boss();
        let contract = RecordDecisionContract::new(&allow_all);
        let data = DecisionData {
            timesheet: &ts,
            approver: &approver,
            decision: Decision::Approved,
            reason: None,
        };
        assert!(contract.validate(&data).is_ok());
    }

    #[test]
    fn test_reject_requires_reason() {
        let ts = sent_sheet();
        let approver = boss();
        let contract = RecordDecisionContract::new(&allow_all);
        let data = DecisionData {
            timesheet: &ts,
            approver: &approver,
            decision: Decision::Rejected,
            reason: None,
        };
        assert!(contract.validate_without_reason(&data).is_ok());
        assert!(contract.reason_missing(&data));
        let err = contract.validate(&data).unwrap_err();
        assert_eq!(err, TsError::MissingRejectionReason { timesheet_id: 1 });
    }

    #[test]
    fn test_unknown_approver() {
        let ts = sent_sheet();
        let stranger = Email::parse("who@example.com").unwrap();
        let contract = RecordDecisionContract::new(&allow_all);
        let data = DecisionData {
            timesheet: &ts,
            approver: &stranger,
            decision: Decision::Approved,
            reason: None,
        };
        assert_eq!(contract.validate(&data).unwrap_err().error_code(), "unknown_approver");
    }

    #[test]
    fn test_not_sent_cannot_be_decided() {
        let mut ts = sent_sheet();
        ts.status = TimesheetStatus::NotSent;
        let approver = boss();
        let contract = RecordDecisionContract::new(&allow_all);
        let data = DecisionData {
            timesheet: &ts,
            approver: &approver,
            decision: Decision::Approved,
            reason: None,
        };
        assert_eq!(contract.validate(&data).unwrap_err().error_code(), "invalid_transition");
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        let ts = sent_sheet();
        let approver = boss();
        let contract = RecordDecisionContract::new(&allow_all);
        let data = DecisionData {
            timesheet: &ts,
            approver: &approver,
            decision: Decision::Pending,
            reason: None,
        };
        assert_eq!(contract.validate(&data).unwrap_err().error_code(), "validation_failed");
    }

    #[test]
    fn test_cannot_decide_twice() {
        let mut ts = sent_sheet();
        ts.approvals[0].decision = Decision::Approved;
        let approver = boss();
        let contract = RecordDecisionContract::new(&allow_all);
        let data = DecisionData {
            timesheet: &ts,
            approver: &approver,
            decision: Decision::Rejected,
            reason: Some("Changed my mind"),
        };
        assert!(contract.validate(&data).is_err());
    }

    #[test]
    fn test_cannot_decide_for_another_approver() {
        let mut ts = sent_sheet();
        let peer = Email::parse("peer@example.com").unwrap();
        ts.approvers.push(peer.clone());
        ts.approvals.push(ApprovalRecord::pending(1, peer.clone(), 1));
        let approver = boss();
        let actor = Actor::approver(peer);
        let contract = RecordDecisionContract::new(&actor);
        let data = DecisionData {
            timesheet: &ts,
            approver: &approver,
            decision: Decision::Approved,
            reason: None,
        };
        assert_eq!(contract.validate(&data).unwrap_err().error_code(), "forbidden");

        let own = Actor::approver(boss());
        assert!(RecordDecisionContract::new(&own).validate(&data).is_ok());
    }
}
