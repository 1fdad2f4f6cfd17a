//! Session state domain models.

use serde::{Deserialize, Serialize};

/// Snapshot of the authenticated user's identity.
///
/// Every field is optional on purpose: the store accepts whatever shape the
/// backend (or a caller) supplies and performs no validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserIdentity {
    pub id: Option<String>,
    /// Pre-composed display name, when the caller has one.
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

impl UserIdentity {
    /// Best-effort display name: `name`, else "first last", else the id.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => self.id.clone(),
        }
    }
}

/// Cross-cutting UI state held once per process.
///
/// Only the token and the cart are persisted elsewhere; this whole aggregate
/// is memory-only and resets on restart unless re-derived from a "who am I"
/// call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Global UI-busy flag. Not reference-counted: any caller setting it
    /// false clears another caller's in-flight indicator (last writer wins).
    pub loading: bool,
    /// `None` means unauthenticated — and also "not yet determined"; callers
    /// that need to distinguish the two must track their own fetch-in-flight
    /// state.
    pub user: Option<UserIdentity>,
    /// Visibility flag for the cart overlay surface.
    pub is_cart_open: bool,
    /// Earned promotional code, if any.
    pub coupon_code: Option<String>,
}

impl SessionState {
    /// True iff a coupon code has been earned.
    pub fn coupon_won(&self) -> bool {
        self.coupon_code.is_some()
    }
}
