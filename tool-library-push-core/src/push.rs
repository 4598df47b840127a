//! Top-level call graph replacing the add-in's button handler:
//! gather inputs from the catalog, build a [`PublishRequest`], publish, notify.

use tracing::info;

use crate::contract::{
    Catalog, ContentStore, CredentialSource, PublishOutcome, PublishRequest, ResourceName,
    UserNotifier,
};
use crate::error::PublishError;
use crate::publisher::RemoteJsonPublisher;

/// Serialize the named library from `catalog` and publish it.
pub async fn push_library<K, S, C>(
    catalog: &K,
    publisher: &RemoteJsonPublisher<S, C>,
    name: &str,
) -> Result<PublishOutcome, PublishError>
where
    K: Catalog,
    S: ContentStore,
    C: CredentialSource,
{
    let name = ResourceName::new(name)?;
    info!(name = %name, "Gathering tool library for push");
    let content = catalog.serialize(name.as_str())?;
    publisher.publish(PublishRequest { name, content }).await
}

/// Hand the terminal outcome of a push to the notifier.
pub fn report<N: UserNotifier>(notifier: &N, result: &Result<PublishOutcome, PublishError>) {
    match result {
        Ok(outcome) => notifier.published(outcome),
        Err(e) => notifier.failed(e),
    }
}
