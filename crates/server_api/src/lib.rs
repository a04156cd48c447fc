use shared::{
    domain::CONTACT_TABLE,
    error::{ApiError, ErrorCode},
    protocol::{ContactRequestRecord, InsertContactResponse, NewContactRequest},
};
use storage::Storage;
use tracing::{error, info};

pub const MAX_LIST_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub fn contact_route() -> &'static str {
    "/contact"
}

/// Persists one contact request. Field contents are stored as received.
pub async fn insert_contact_request(
    ctx: &ApiContext,
    request: &NewContactRequest,
) -> Result<InsertContactResponse, ApiError> {
    let id = ctx
        .storage
        .insert_contact_request(request)
        .await
        .map_err(|err| {
            error!(table = CONTACT_TABLE, error = %err, "contact insert failed");
            internal(err)
        })?;
    info!(table = CONTACT_TABLE, id = id.0, "contact request stored");
    Ok(InsertContactResponse { id })
}

pub async fn list_contact_requests(
    ctx: &ApiContext,
    limit: u32,
) -> Result<Vec<ContactRequestRecord>, ApiError> {
    ctx.storage
        .list_contact_requests(limit.clamp(1, MAX_LIST_LIMIT))
        .await
        .map_err(internal)
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
