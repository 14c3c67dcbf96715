//! Result of a single "add user to guild" call.

/// How the platform answered a membership request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipOutcome {
    /// The user was newly added (HTTP 201).
    Added,
    /// The user was already a member (HTTP 204).
    AlreadyMember,
    /// The platform refused the request with any other status.
    Rejected { status: u16, body: String },
    /// The request never produced a response.
    Failed(String),
}

impl MembershipOutcome {
    /// Already being a member counts as success.
    pub fn is_success(&self) -> bool {
        matches!(self, MembershipOutcome::Added | MembershipOutcome::AlreadyMember)
    }

    pub fn message(&self) -> String {
        match self {
            MembershipOutcome::Added => "Added to guild".to_string(),
            MembershipOutcome::AlreadyMember => "Already a member of guild".to_string(),
            MembershipOutcome::Rejected { status, body } => format!("HTTP {}: {}", status, body),
            MembershipOutcome::Failed(reason) => reason.clone(),
        }
    }
}
