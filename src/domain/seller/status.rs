//! Seller status lifecycle.
//!
//! Statuses are stored as ids in `seller_statuses`; the allowed operator actions are
//! derived from the status name and never persisted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SellerStatus {
    #[serde(rename = "Pending onboarding")]
    PendingOnboarding,
    #[serde(rename = "Onboarded")]
    Onboarded,
    #[serde(rename = "Suspended")]
    Suspended,
    #[serde(rename = "Pending termination")]
    PendingTermination,
    #[serde(rename = "Terminated")]
    Terminated,
    #[serde(rename = "Onboarding rejected")]
    OnboardingRejected,
}

impl SellerStatus {
    pub const ALL: [SellerStatus; 6] = [
        SellerStatus::PendingOnboarding,
        SellerStatus::Onboarded,
        SellerStatus::Suspended,
        SellerStatus::PendingTermination,
        SellerStatus::Terminated,
        SellerStatus::OnboardingRejected,
    ];

    /// Primary key in `seller_statuses`.
    pub fn id(self) -> i32 {
        match self {
            SellerStatus::PendingOnboarding => 1,
            SellerStatus::Onboarded => 2,
            SellerStatus::Suspended => 3,
            SellerStatus::PendingTermination => 4,
            SellerStatus::Terminated => 5,
            SellerStatus::OnboardingRejected => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SellerStatus::PendingOnboarding => "Pending onboarding",
            SellerStatus::Onboarded => "Onboarded",
            SellerStatus::Suspended => "Suspended",
            SellerStatus::PendingTermination => "Pending termination",
            SellerStatus::Terminated => "Terminated",
            SellerStatus::OnboardingRejected => "Onboarding rejected",
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn allowed_actions(self) -> &'static [SellerAction] {
        use SellerAction::*;
        match self {
            SellerStatus::Onboarded => &[RequestSuspension, ProcessTerminationRequest],
            SellerStatus::PendingOnboarding => &[ApproveOnboarding, RejectOnboarding],
            SellerStatus::Suspended => &[LiftSuspension, ProcessTerminationRequest],
            SellerStatus::PendingTermination => &[
                RequestSuspension,
                ConfirmTermination,
                WithdrawTerminationRequest,
            ],
            SellerStatus::Terminated | SellerStatus::OnboardingRejected => &[],
        }
    }

    pub fn allows(self, action: SellerAction) -> bool {
        self.allowed_actions().contains(&action)
    }
}

/// Actions offered for a seller name in the listing; unknown names offer nothing.
pub fn actions_for_status_name(name: Option<&str>) -> Vec<SellerAction> {
    name.and_then(SellerStatus::from_name)
        .map(|s| s.allowed_actions().to_vec())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SellerAction {
    #[serde(rename = "Request suspension")]
    RequestSuspension,
    #[serde(rename = "Process termination request")]
    ProcessTerminationRequest,
    #[serde(rename = "Approve onboarding")]
    ApproveOnboarding,
    #[serde(rename = "Reject onboarding")]
    RejectOnboarding,
    #[serde(rename = "Lift suspension")]
    LiftSuspension,
    #[serde(rename = "Confirm termination")]
    ConfirmTermination,
    #[serde(rename = "Withdraw termination request")]
    WithdrawTerminationRequest,
}

impl SellerAction {
    pub fn label(self) -> &'static str {
        match self {
            SellerAction::RequestSuspension => "Request suspension",
            SellerAction::ProcessTerminationRequest => "Process termination request",
            SellerAction::ApproveOnboarding => "Approve onboarding",
            SellerAction::RejectOnboarding => "Reject onboarding",
            SellerAction::LiftSuspension => "Lift suspension",
            SellerAction::ConfirmTermination => "Confirm termination",
            SellerAction::WithdrawTerminationRequest => "Withdraw termination request",
        }
    }

    pub fn target_status(self) -> SellerStatus {
        match self {
            SellerAction::RequestSuspension => SellerStatus::Suspended,
            SellerAction::ProcessTerminationRequest => SellerStatus::PendingTermination,
            SellerAction::ApproveOnboarding => SellerStatus::Onboarded,
            SellerAction::RejectOnboarding => SellerStatus::OnboardingRejected,
            SellerAction::LiftSuspension => SellerStatus::Onboarded,
            SellerAction::ConfirmTermination => SellerStatus::Terminated,
            SellerAction::WithdrawTerminationRequest => SellerStatus::Onboarded,
        }
    }
}
