use tracing::{debug, warn};

use crate::domain::{
    error::DiffError,
    object_type::ObjectFilter,
    ports::Connector,
    record::RawRecord,
};

/// Open a session, fetch, and release the session on every exit path.
///
/// A release failure is logged and dropped: it never replaces the fetch
/// result, and never masks a fetch failure.
pub async fn fetch_scoped(
    connector: &dyn Connector,
    filter: &ObjectFilter,
) -> Result<Vec<RawRecord>, DiffError> {
    let session = connector.open().await?;
    debug!(source = connector.name(), object_type = %filter.object_type, "session opened");

    let result = session.fetch(filter).await;

    if let Err(e) = session.release().await {
        warn!(source = connector.name(), error = %e, "failed to release session");
    }

    result
}
