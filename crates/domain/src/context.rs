//! Per-request caller context.
//!
//! Every engine operation receives the caller explicitly; there is no
//! process-wide "current user".

use std::fmt;

/// An identity vouched for by the external identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    /// The provider's stable subject for this person.
    pub external_id: String,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field(
                "external_id",
                &shared::crypto::identity_fingerprint(&self.external_id),
            )
            .finish()
    }
}

/// Who is calling, if anyone.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identity: Option<Identity>,
}

impl RequestContext {
    /// Context for a request that carried no identity.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Context for a request authenticated as `external_id`.
    pub fn authenticated(external_id: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity {
                external_id: external_id.into(),
            }),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}
