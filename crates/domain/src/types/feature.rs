//! Server-version feature gates

use crate::impl_domain_enum_conversions;

/// A capability that older Horizon instances do not implement.
///
/// Such servers signal the gap through the response content type (plain
/// text) rather than through the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Trust chain building for a certificate (`/api/v1/rfc5280/tc/`).
    TrustchainDecoding,
}

impl Feature {
    /// First Horizon version implementing the feature.
    #[must_use]
    pub fn implemented_in(self) -> &'static str {
        match self {
            Self::TrustchainDecoding => "2.2.2",
        }
    }
}

impl_domain_enum_conversions!(Feature {
    TrustchainDecoding => "trustchain_decoding",
});
