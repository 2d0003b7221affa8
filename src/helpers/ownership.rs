use crate::errors::ApiError;

/// A user may mutate a resource iff they own it. No roles, no ACLs.
pub fn can_mutate(acting_user_id: i32, resource_owner_id: i32) -> bool {
    acting_user_id == resource_owner_id
}

pub fn ensure_owner(
    acting_user_id: i32,
    resource_owner_id: i32,
    message: &str,
) -> Result<(), ApiError> {
    if can_mutate(acting_user_id, resource_owner_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(message.to_string()))
    }
}
