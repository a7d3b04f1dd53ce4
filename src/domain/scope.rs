//! Ownership scope applied to listings.

use crate::domain::types::UserId;

/// Which owners' records a listing may return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OwnerScope {
    /// Every owner. Reserved for staff and superusers.
    #[default]
    All,
    /// Only records owned by this user.
    Owner(UserId),
}

impl OwnerScope {
    /// The owner filter to apply, if any.
    pub const fn owner(self) -> Option<UserId> {
        match self {
            OwnerScope::All => None,
            OwnerScope::Owner(user_id) => Some(user_id),
        }
    }

    /// Whether a record owned by `owner` falls inside the scope.
    pub fn permits(self, owner: UserId) -> bool {
        self.owner().is_none_or(|user_id| user_id == owner)
    }
}
