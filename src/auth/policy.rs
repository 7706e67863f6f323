use crate::error::{AppError, Result};

/// A persisted resource with an immutable owning user.
pub trait Owned {
    /// Human-readable resource name used in error messages.
    const KIND: &'static str;

    fn owner_id(&self) -> i64;
}

/// Only the owner may mutate. There are no roles and no admin override.
pub fn can_mutate(actor_id: i64, owner_id: i64) -> bool {
    actor_id == owner_id
}

/// Gate for update/delete: the resource must exist (`NotFound`) before
/// ownership is checked (`Forbidden`), so a missing id never reveals
/// anything about ownership.
pub fn authorize_mutation<T: Owned>(actor_id: i64, resource: Option<T>) -> Result<T> {
    let resource = resource.ok_or_else(|| AppError::NotFound(format!("{} not found", T::KIND)))?;

    if !can_mutate(actor_id, resource.owner_id()) {
        tracing::warn!(
            actor_id,
            owner_id = resource.owner_id(),
            kind = T::KIND,
            "mutation denied: actor is not the owner"
        );
        return Err(AppError::Forbidden(format!(
            "you do not have permission to modify this {}",
            T::KIND
        )));
    }

    Ok(resource)
}
