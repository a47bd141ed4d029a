use crate::{Classification, Directions, IsolationClass};
use std::fmt;

/// One line of impact output: a message and the pods it applies to, rendered
/// as the message followed by an indented, comma-separated name list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportLine {
    pub message: &'static str,
    pub pods: Vec<String>,
}

/// One row of the decision table: a message and the "before" buckets whose
/// pods it covers, concatenated in the order listed.
type Row = (&'static str, &'static [IsolationClass]);

const INGRESS_AND_EGRESS: &[Row] = &[
    (
        "Would allow all ingress and egress if not for this whitelist",
        &[IsolationClass::None],
    ),
    (
        "Would allow all egress if not for this whitelist, may be allowed new ingress:",
        &[IsolationClass::IngressOnly],
    ),
    (
        "Would allow all ingress if not for this whitelist, may be allowed new egress:",
        &[IsolationClass::EgressOnly],
    ),
    (
        "May be allowed new ingress or egress:",
        &[IsolationClass::Both],
    ),
];

const INGRESS_ONLY: &[Row] = &[
    (
        "Would allow all ingress if not for this whitelist:",
        &[IsolationClass::None, IsolationClass::EgressOnly],
    ),
    (
        "May be allowed new ingress:",
        &[IsolationClass::Both, IsolationClass::IngressOnly],
    ),
];

const EGRESS_ONLY: &[Row] = &[
    (
        "Would allow all egress if not for this whitelist:",
        &[IsolationClass::None, IsolationClass::IngressOnly],
    ),
    (
        "May be allowed new egress:",
        &[IsolationClass::Both, IsolationClass::EgressOnly],
    ),
];

/// Renders what would change if a candidate policy resolving to `candidate`
/// were added to the cluster state captured in `before`.
///
/// `before` must have been classified without the candidate. Rows whose
/// combined bucket is empty are suppressed; a candidate isolating neither
/// direction produces no lines at all.
pub fn report(candidate: Directions, before: &Classification) -> Vec<ReportLine> {
    let rows: &[Row] = match (candidate.ingress, candidate.egress) {
        (true, true) => INGRESS_AND_EGRESS,
        (true, false) => INGRESS_ONLY,
        (false, true) => EGRESS_ONLY,
        (false, false) => &[],
    };

    rows.iter()
        .copied()
        .filter_map(|(message, classes)| {
            let pods: Vec<String> = classes
                .iter()
                .flat_map(|class| before.pods(*class))
                .cloned()
                .collect();
            if pods.is_empty() {
                return None;
            }
            Some(ReportLine { message, pods })
        })
        .collect()
}

// === impl ReportLine ===

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n  {}", self.message, self.pods.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn before(buckets: Vec<(IsolationClass, Vec<&str>)>) -> Classification {
        let mut classification = Classification::default();
        for (class, pods) in buckets {
            for pod in pods {
                classification.push(class, pod.to_string());
            }
        }
        classification
    }

    #[test]
    fn degenerate_candidate_reports_nothing() {
        let before = before(vec![
            (IsolationClass::None, vec!["a"]),
            (IsolationClass::Both, vec!["b"]),
        ]);
        assert!(report(Directions::default(), &before).is_empty());
    }

    #[test]
    fn restricts_open_pods_in_both_directions() {
        // The candidate selects only the open pod; the egress-isolated pods
        // were classified out of its scope.
        let before = before(vec![(IsolationClass::None, vec!["frontend-1"])]);
        let candidate = Directions {
            ingress: true,
            egress: true,
        };

        let lines = report(candidate, &before);
        assert_eq!(lines.len(), 1, "empty buckets are suppressed");
        assert_eq!(
            lines[0].message,
            "Would allow all ingress and egress if not for this whitelist"
        );
        assert_eq!(lines[0].pods, ["frontend-1"]);
    }

    #[test]
    fn dual_direction_candidate_covers_all_four_buckets() {
        let before = before(vec![
            (IsolationClass::None, vec!["a"]),
            (IsolationClass::IngressOnly, vec!["b"]),
            (IsolationClass::EgressOnly, vec!["c"]),
            (IsolationClass::Both, vec!["d"]),
        ]);
        let candidate = Directions {
            ingress: true,
            egress: true,
        };

        let lines = report(candidate, &before);
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0].message,
            "Would allow all ingress and egress if not for this whitelist"
        );
        assert_eq!(lines[0].pods, ["a"]);
        assert_eq!(
            lines[1].message,
            "Would allow all egress if not for this whitelist, may be allowed new ingress:"
        );
        assert_eq!(lines[1].pods, ["b"]);
        assert_eq!(
            lines[2].message,
            "Would allow all ingress if not for this whitelist, may be allowed new egress:"
        );
        assert_eq!(lines[2].pods, ["c"]);
        assert_eq!(lines[3].message, "May be allowed new ingress or egress:");
        assert_eq!(lines[3].pods, ["d"]);
    }

    #[test]
    fn single_direction_candidate_combines_open_buckets_in_table_order() {
        let before = before(vec![
            (IsolationClass::None, vec!["a"]),
            (IsolationClass::IngressOnly, vec!["b"]),
            (IsolationClass::EgressOnly, vec!["c"]),
            (IsolationClass::Both, vec!["d"]),
        ]);

        let ingress = report(
            Directions {
                ingress: true,
                egress: false,
            },
            &before,
        );
        assert_eq!(ingress.len(), 2);
        assert_eq!(
            ingress[0].message,
            "Would allow all ingress if not for this whitelist:"
        );
        assert_eq!(ingress[0].pods, ["a", "c"]);
        assert_eq!(ingress[1].message, "May be allowed new ingress:");
        assert_eq!(ingress[1].pods, ["d", "b"]);

        let egress = report(
            Directions {
                ingress: false,
                egress: true,
            },
            &before,
        );
        assert_eq!(egress.len(), 2);
        assert_eq!(
            egress[0].message,
            "Would allow all egress if not for this whitelist:"
        );
        assert_eq!(egress[0].pods, ["a", "b"]);
        assert_eq!(egress[1].message, "May be allowed new egress:");
        assert_eq!(egress[1].pods, ["d", "c"]);
    }

    #[test]
    fn manifest_flow_reports_only_the_selected_pods() {
        use crate::{classify, PodRecord, PolicyRecord, PolicySet, PolicyType, Selector};

        fn pod(name: &str, tier: &'static str) -> PodRecord {
            PodRecord {
                name: name.to_string(),
                labels: Some(("tier", tier)).into_iter().collect(),
            }
        }
        fn policy(name: &str, selector: &str, types: Vec<PolicyType>, egress_rules: usize) -> PolicyRecord {
            PolicyRecord {
                name: name.to_string(),
                namespace: "default".to_string(),
                selector: selector.to_string(),
                types,
                ingress_rules: 0,
                egress_rules,
            }
        }

        let pods = vec![
            pod("backend-1", "backend"),
            pod("backend-2", "backend"),
            pod("frontend-1", "frontend"),
        ];
        let existing = vec![policy(
            "backend-egress",
            "tier=backend",
            vec![PolicyType::Egress],
            1,
        )];
        let candidate = policy(
            "frontend-isolate",
            "tier=frontend",
            vec![PolicyType::Ingress, PolicyType::Egress],
            0,
        );

        // The flow classifies only the pods the candidate selects.
        let selector = Selector::parse(&candidate.selector).expect("selector must parse");
        let selected: Vec<PodRecord> = pods
            .iter()
            .filter(|pod| selector.matches(&pod.labels))
            .cloned()
            .collect();
        let set = PolicySet::build(&existing, Some(&candidate)).expect("selectors must parse");
        let lines = report(candidate.directions(), &classify(&selected, &set));

        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].message,
            "Would allow all ingress and egress if not for this whitelist"
        );
        assert_eq!(lines[0].pods, ["frontend-1"]);
    }

    #[test]
    fn display_renders_header_and_indented_names() {
        let line = ReportLine {
            message: "May be allowed new ingress:",
            pods: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(line.to_string(), "May be allowed new ingress:\n  a, b");
    }
}
