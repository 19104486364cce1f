//! Authenticated caller identity.

/// Opaque, stable identifier of the caller supplied by an
/// [`crate::application::services::Authenticator`].
///
/// Links store the creator's `owner_id`; mutations compare it against this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    pub owner_id: i64,
}

impl Identity {
    pub fn new(owner_id: i64) -> Self {
        Self { owner_id }
    }

    /// Returns true if this caller created the link with the given owner.
    ///
    /// Anonymous links (`None`) are owned by nobody.
    pub fn owns(&self, owner_id: Option<i64>) -> bool {
        owner_id == Some(self.owner_id)
    }
}
