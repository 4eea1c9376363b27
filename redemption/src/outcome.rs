//! Successful redemption results.

use badged_types::Badge;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedemptionOutcome {
    /// First redemption of this serial; the badge was just recorded.
    NewBadge(Badge),
    /// The serial was redeemed before; the stored badge is returned as is.
    AlreadyRedeemed(Badge),
}

impl RedemptionOutcome {
    pub fn badge(&self) -> &Badge {
        match self {
            Self::NewBadge(b) | Self::AlreadyRedeemed(b) => b,
        }
    }

    pub fn into_badge(self) -> Badge {
        match self {
            Self::NewBadge(b) | Self::AlreadyRedeemed(b) => b,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::NewBadge(_))
    }

    pub fn status_message(&self) -> &'static str {
        match self {
            Self::NewBadge(_) => "Voucher redeemed successfully!",
            Self::AlreadyRedeemed(_) => "This voucher was already redeemed",
        }
    }
}
