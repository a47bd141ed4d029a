use crate::{Error, NetworkPolicy, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::ResourceExt;
use netpol_inspect_core::{Labels, PodRecord, PolicyRecord, PolicyType};
use std::collections::BTreeSet;

/// Converts a decoded NetworkPolicy into the core's record form.
///
/// `default_namespace` fills in manifests that omit one, matching kubectl's
/// namespace defaulting.
pub fn policy_record(np: &NetworkPolicy, default_namespace: &str) -> Result<PolicyRecord, Error> {
    let spec = np.spec.clone().unwrap_or_default();

    let mut types = Vec::new();
    for marker in spec.policy_types.iter().flatten() {
        match marker.as_str() {
            "Ingress" => types.push(PolicyType::Ingress),
            "Egress" => types.push(PolicyType::Egress),
            other => return Err(Error::UnknownPolicyType(other.to_string())),
        }
    }

    Ok(PolicyRecord {
        name: np.name_any(),
        namespace: np
            .namespace()
            .unwrap_or_else(|| default_namespace.to_string()),
        selector: selector_text(&spec.pod_selector)?,
        types,
        ingress_rules: spec.ingress.as_ref().map_or(0, Vec::len),
        egress_rules: spec.egress.as_ref().map_or(0, Vec::len),
    })
}

pub fn pod_record(pod: &Pod) -> PodRecord {
    PodRecord {
        name: pod.name_any(),
        labels: Labels::from(pod.labels().clone()),
    }
}

/// Renders a `LabelSelector` in canonical text form: sorted `matchLabels`
/// first, then `matchExpressions` in declared order with sorted values.
///
/// The empty selector renders as the empty string and selects everything.
pub fn selector_text(selector: &LabelSelector) -> Result<String, Error> {
    let mut clauses = Vec::new();

    for (key, value) in selector.match_labels.iter().flatten() {
        clauses.push(format!("{key}={value}"));
    }

    for expr in selector.match_expressions.iter().flatten() {
        let clause = match expr.operator.as_str() {
            "In" | "NotIn" => {
                let values: BTreeSet<&str> = expr
                    .values
                    .iter()
                    .flatten()
                    .map(String::as_str)
                    .collect();
                if values.is_empty() {
                    return Err(Error::EmptyValues {
                        key: expr.key.clone(),
                        operator: expr.operator.clone(),
                    });
                }
                let values = values.into_iter().collect::<Vec<_>>().join(",");
                let op = if expr.operator == "In" { "in" } else { "notin" };
                format!("{} {op} ({values})", expr.key)
            }
            "Exists" => expr.key.clone(),
            "DoesNotExist" => format!("!{}", expr.key),
            other => return Err(Error::UnknownOperator(other.to_string())),
        };
        clauses.push(clause);
    }

    Ok(clauses.join(","))
}
