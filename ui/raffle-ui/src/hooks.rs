use std::time::Duration;

use dioxus::prelude::*;

use crate::contract::{with_client, ReadQuery};
use crate::reads::{read_all, DrawSnapshot, QueryRegistry};
use crate::state::SharedRaffleClient;

/// Keep `queries` polled while the calling component is mounted.
///
/// Only the first render's queries count; a component that needs different
/// queries must be remounted.
pub fn use_contract_reads(queries: Vec<ReadQuery>) {
    let mut registry = use_context::<Signal<QueryRegistry>>();
    let subscription = use_hook(move || registry.write().subscribe(queries));
    use_drop(move || registry.write().unsubscribe(&subscription));
}

/// Poll every subscribed query on a fixed interval and publish the results
/// into the shared [`DrawSnapshot`].
pub fn use_poller(client: SharedRaffleClient, interval: Duration) {
    let registry = use_context::<Signal<QueryRegistry>>();
    let mut snapshot = use_context::<Signal<DrawSnapshot>>();

    use_future(move || {
        let client = client.clone();
        async move {
            loop {
                let queries = registry.peek().active();
                if !queries.is_empty() {
                    let results =
                        with_client(client.clone(), move |c| Ok(read_all(c, &queries))).await;
                    match results {
                        Ok(results) => snapshot.write().apply(results, &registry.peek()),
                        Err(e) => tracing::warn!(error = %e, "poll skipped"),
                    }
                }
                tokio::time::sleep(interval).await;
            }
        }
    });
}
