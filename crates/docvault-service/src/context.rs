//! Request context carrying the acting user and the vault scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docvault_core::types::UserScope;

/// Context for the current request.
///
/// Supplied by the authentication layer and passed into every operation so
/// the layer knows *who* is acting and *whose* vault is being operated on.
/// The two differ only when an authorized professional views a client's
/// vault — a capability granted and validated by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated acting user.
    pub user_id: Uuid,
    /// The vault this request operates on.
    pub scope: UserScope,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for a user working in their own vault.
    pub fn for_own_vault(user_id: Uuid) -> Self {
        Self {
            user_id,
            scope: UserScope::new(user_id),
            request_time: Utc::now(),
        }
    }

    /// Context for a professional viewing a specific client's vault.
    pub fn for_client_vault(professional_id: Uuid, client_id: Uuid) -> Self {
        Self {
            user_id: professional_id,
            scope: UserScope::new(client_id),
            request_time: Utc::now(),
        }
    }

    /// Whether the acting user is working in someone else's vault.
    pub fn is_delegated(&self) -> bool {
        self.scope.owner_id() != self.user_id
    }
}
