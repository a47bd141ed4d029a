use crate::{NetworkPolicy, Pod};
use kube::{
    api::{Api, ListParams},
    Client,
};
use tracing::debug;

/// Fetches the named policy from the cluster. A missing resource surfaces as
/// kube's not-found error.
pub async fn get_policy(
    client: &Client,
    namespace: &str,
    name: &str,
) -> Result<NetworkPolicy, kube::Error> {
    Api::<NetworkPolicy>::namespaced(client.clone(), namespace)
        .get(name)
        .await
}

/// Lists every policy in the namespace, preserving API-server order.
pub async fn list_policies(
    client: &Client,
    namespace: &str,
) -> Result<Vec<NetworkPolicy>, kube::Error> {
    let list = Api::<NetworkPolicy>::namespaced(client.clone(), namespace)
        .list(&ListParams::default())
        .await?;
    debug!(namespace, policies = list.items.len(), "listed policies");
    Ok(list.items)
}

/// Lists the pods a selector applies to, filtered server side.
pub async fn selected_pods(
    client: &Client,
    namespace: &str,
    selector: &str,
) -> Result<Vec<Pod>, kube::Error> {
    let mut params = ListParams::default();
    if !selector.is_empty() {
        params = params.labels(selector);
    }
    let list = Api::<Pod>::namespaced(client.clone(), namespace)
        .list(&params)
        .await?;
    debug!(namespace, selector, pods = list.items.len(), "listed pods");
    Ok(list.items)
}
