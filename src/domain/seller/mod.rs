//! Seller profiles, their version chain and status lifecycle.

pub mod filter;
pub mod status;
pub mod version;

pub use filter::{contains_pattern, escape_like, Page, SellerListFilter, SellerSummary};
pub use status::{actions_for_status_name, SellerAction, SellerStatus};
pub use version::{
    first_chain_break, open_close_time, validate_managers, AccountId, ManagerInfo, NameMatch,
    NewManager, ProfileFields, SellerDetail, SellerId, SellerInfoVersion, SellerProfile,
    SellerTypeOption, StatusChange, VersionId, VersionSpan, MAX_MANAGERS, OPEN_CLOSE_TIME_SQL,
};
