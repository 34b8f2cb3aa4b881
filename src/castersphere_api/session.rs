use crate::castersphere_api::types::Principal;
use std::sync::Arc;

/// Source of the principal a call is made for
///
/// Consulted once per operation, so a provider backed by the host
/// application's session always reflects the current user.
pub trait PrincipalProvider: Send + Sync {
    fn current_principal(&self) -> Option<Principal>;
}

/// Provider for calls made without a signed-in user
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl PrincipalProvider for Anonymous {
    fn current_principal(&self) -> Option<Principal> {
        None
    }
}

impl PrincipalProvider for Principal {
    fn current_principal(&self) -> Option<Principal> {
        Some(self.clone())
    }
}

impl PrincipalProvider for Option<Principal> {
    fn current_principal(&self) -> Option<Principal> {
        self.clone()
    }
}

impl<T: PrincipalProvider + ?Sized> PrincipalProvider for Arc<T> {
    fn current_principal(&self) -> Option<Principal> {
        (**self).current_principal()
    }
}
