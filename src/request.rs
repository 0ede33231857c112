//! Payment request model and approval state machine
use crate::error::WorkflowError;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::fmt;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum RequestType {
    #[n(0)]
    Overtime,
    #[n(1)]
    Bonus,
    #[n(2)]
    Reimbursement,
    #[n(3)]
    SalaryAdvance,
    #[n(4)]
    Commission,
}

impl RequestType {
    /// Wire name, stable for interop with other consumers of the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overtime => "overtime",
            Self::Bonus => "bonus",
            Self::Reimbursement => "reimbursement",
            Self::SalaryAdvance => "salary_advance",
            Self::Commission => "commission",
        }
    }

    pub fn parse(s: &str) -> Result<Self, WorkflowError> {
        match s {
            "overtime" => Ok(Self::Overtime),
            "bonus" => Ok(Self::Bonus),
            "reimbursement" => Ok(Self::Reimbursement),
            "salary_advance" => Ok(Self::SalaryAdvance),
            "commission" => Ok(Self::Commission),
            other => Err(WorkflowError::UnknownRequestType(other.to_string())),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum RequestStatus {
    #[n(0)]
    Pending,
    /// First level approval
    #[n(1)]
    ApprovedL1,
    /// Second level approval (if needed)
    #[n(2)]
    ApprovedL2,
    /// Final approval
    #[n(3)]
    ApprovedFinal,
    #[n(4)]
    Rejected,
    #[n(5)]
    Paid,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ApprovedL1 => "approved_l1",
            Self::ApprovedL2 => "approved_l2",
            Self::ApprovedFinal => "approved_final",
            Self::Rejected => "rejected",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Result<Self, WorkflowError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved_l1" => Ok(Self::ApprovedL1),
            "approved_l2" => Ok(Self::ApprovedL2),
            "approved_final" => Ok(Self::ApprovedFinal),
            "rejected" => Ok(Self::Rejected),
            "paid" => Ok(Self::Paid),
            other => Err(WorkflowError::UnknownStatus(other.to_string())),
        }
    }

    /// No further approval decision is possible from these states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ApprovedFinal | Self::Rejected | Self::Paid)
    }

    /// A decision (approve or reject) may be taken on the request.
    pub fn is_decidable(&self) -> bool {
        matches!(self, Self::Pending | Self::ApprovedL1 | Self::ApprovedL2)
    }

    /// Whether a decision may move a request from `self` to `next`.
    ///
    /// Rejection is allowed from any decidable state, as is jumping straight
    /// to final approval; the intermediate tiers only advance one step at a
    /// time. Strict tier sequencing is deliberately not enforced. `paid` is
    /// reached through the payment action, never through a decision.
    pub fn allows_transition_to(&self, next: RequestStatus) -> bool {
        if !self.is_decidable() {
            return false;
        }
        match next {
            Self::Rejected | Self::ApprovedFinal => true,
            Self::ApprovedL1 => *self == Self::Pending,
            Self::ApprovedL2 => *self == Self::ApprovedL1,
            Self::Pending | Self::Paid => false,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl<T: TimeZone> PartialEq for TimeStamp<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: TimeZone> Eq for TimeStamp<T> {}

impl<T: TimeZone> PartialOrd for TimeStamp<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TimeZone> Ord for TimeStamp<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

// Decimal lacks minicbor impls; its canonical string form is stable, which
// the store's compare-and-swap relies on.
pub(crate) mod cbor_decimal {
    use rust_decimal::Decimal;
    use std::str::FromStr;

    pub fn encode<C, W: minicbor::encode::Write>(
        v: &Decimal,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.str(&v.to_string())?.ok()
    }

    pub fn decode<'b, C>(
        d: &mut minicbor::Decoder<'b>,
        _: &mut C,
    ) -> Result<Decimal, minicbor::decode::Error> {
        let s = d.str()?;
        Decimal::from_str(s)
            .map_err(|_| minicbor::decode::Error::message("invalid decimal amount"))
    }
}

/// One approval or rejection taken on a request. Entries are append-only and
/// never edited or removed.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct ApprovalHistory {
    #[n(0)]
    pub approver_id: String,
    #[n(1)]
    pub approver_name: String,
    #[n(2)]
    pub status: RequestStatus,
    #[n(3)]
    pub comments: Option<String>,
    #[n(4)]
    pub approved_at: TimeStamp<Utc>,
}

/// A single payroll-adjacent request moving through the approval workflow.
///
/// Employee name and email are denormalized onto the request for display and
/// notification, matching what the rest of the system expects to read.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub employee_id: String,
    #[n(2)]
    pub employee_name: String,
    #[n(3)]
    pub employee_email: String,
    #[n(4)]
    pub request_type: RequestType,
    #[cbor(n(5), with = "crate::request::cbor_decimal")]
    pub amount: Decimal,
    #[n(6)]
    pub description: String,
    #[n(7)]
    pub supporting_documents: Vec<String>,
    #[n(8)]
    pub status: RequestStatus,
    #[n(9)]
    pub approval_history: Vec<ApprovalHistory>,
    #[n(10)]
    pub current_approver_id: Option<String>,
    #[n(11)]
    pub rejection_reason: Option<String>,
    #[n(12)]
    pub requested_payment_date: Option<TimeStamp<Utc>>,
    #[n(13)]
    pub actual_payment_date: Option<TimeStamp<Utc>>,
    #[n(14)]
    pub created_at: TimeStamp<Utc>,
    #[n(15)]
    pub updated_at: TimeStamp<Utc>,
}

impl PaymentRequest {
    /// Record a decision on this request: append the history entry, move the
    /// status and keep the approver/rejection bookkeeping consistent.
    ///
    /// The current approver is cleared on every terminal status, not only on
    /// rejection.
    pub fn apply_decision(&mut self, entry: ApprovalHistory) {
        self.status = entry.status;
        self.updated_at = entry.approved_at.clone();
        if entry.status == RequestStatus::Rejected {
            self.rejection_reason = entry.comments.clone();
        }
        if entry.status.is_terminal() {
            self.current_approver_id = None;
        }
        self.approval_history.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_encoding() {
        let original = TimeStamp::new();

        let encoding = minicbor::to_vec(&original).unwrap();
        let decode: TimeStamp<Utc> = minicbor::decode(&encoding).unwrap();

        assert_eq!(original, decode);
    }

    #[test]
    fn status_wire_names_roundtrip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::ApprovedL1,
            RequestStatus::ApprovedL2,
            RequestStatus::ApprovedFinal,
            RequestStatus::Rejected,
            RequestStatus::Paid,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()).unwrap(), status);
        }

        assert!(matches!(
            RequestStatus::parse("authorised"),
            Err(WorkflowError::UnknownStatus(_))
        ));
    }
}
