#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod args;

pub use self::args::{Args, Command};

use anyhow::{Context, Result};
use clap::Parser;
use netpol_inspect_core::{classify, report, PodRecord, PolicyRecord, PolicySet};
use netpol_inspect_k8s::{self as k8s, ResourceExt};
use tracing::debug;

// === impl Args ===

impl Args {
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            namespace,
            command,
        } = self;

        log_format
            .try_init(log_level)
            .expect("must configure logging");

        let client = k8s::Client::try_default()
            .await
            .context("failed to configure Kubernetes client")?;

        match command {
            Command::Describe { name } => {
                let policy = k8s::cluster::get_policy(&client, &namespace, &name)
                    .await
                    .with_context(|| format!("failed to get network policy {namespace}/{name}"))?;
                describe(&client, &namespace, &policy).await
            }
            Command::Apply { file } => {
                let policy = k8s::load_policy(&file)?;
                // A namespace in the manifest wins over the flag.
                let namespace = policy.namespace().unwrap_or(namespace);
                describe(&client, &namespace, &policy).await
            }
        }
    }
}

/// Explains how `policy` would change the isolation of the pods it selects,
/// measured against the namespace's other policies.
async fn describe(
    client: &k8s::Client,
    namespace: &str,
    policy: &k8s::NetworkPolicy,
) -> Result<()> {
    let candidate = k8s::policy_record(policy, namespace)?;

    let pods = k8s::cluster::selected_pods(client, namespace, &candidate.selector)
        .await
        .context("failed to list pods")?;
    if pods.is_empty() {
        println!(
            "{} does not apply to any running pods; has no effect",
            candidate.name
        );
        return Ok(());
    }
    let pods = pods.iter().map(k8s::pod_record).collect::<Vec<PodRecord>>();

    let policies = k8s::cluster::list_policies(client, namespace)
        .await
        .context("failed to list network policies")?
        .iter()
        .map(|np| k8s::policy_record(np, namespace))
        .collect::<Result<Vec<PolicyRecord>, _>>()?;

    let others = PolicySet::build(&policies, Some(&candidate))?;
    debug!(
        pods = pods.len(),
        selectors = others.distinct_selectors(),
        "classifying"
    );
    let before = classify(&pods, &others);

    for line in report(candidate.directions(), &before) {
        println!("{line}");
    }
    Ok(())
}
