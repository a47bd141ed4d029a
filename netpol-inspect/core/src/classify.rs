use crate::{selector::InvalidSelector, Directions, PodRecord, PolicyRecord, Selector};
use std::collections::HashMap;
use tracing::{debug, trace};

/// One of the four mutually exclusive isolation states a pod can be in under
/// the union of the policies that select it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IsolationClass {
    None,
    IngressOnly,
    EgressOnly,
    Both,
}

/// Pod names bucketed by isolation class, preserving input pod order within
/// each bucket. The four buckets partition the classified pods.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    none: Vec<String>,
    ingress_only: Vec<String>,
    egress_only: Vec<String>,
    both: Vec<String>,
}

/// Policies grouped by identical selector text, with each distinct selector
/// parsed exactly once and ready for matching.
///
/// The grouping is purely a performance index, not a semantic merge: every
/// policy in a group still contributes its own resolved directions. The
/// candidate under evaluation is excluded by name and namespace so the
/// classification reflects the cluster without it.
#[derive(Clone, Debug)]
pub struct PolicySet<'a> {
    groups: Vec<SelectorGroup<'a>>,
}

#[derive(Clone, Debug)]
struct SelectorGroup<'a> {
    selector: Selector,
    policies: Vec<&'a PolicyRecord>,
}

// === impl IsolationClass ===

impl From<Directions> for IsolationClass {
    fn from(directions: Directions) -> Self {
        match (directions.ingress, directions.egress) {
            (false, false) => IsolationClass::None,
            (true, false) => IsolationClass::IngressOnly,
            (false, true) => IsolationClass::EgressOnly,
            (true, true) => IsolationClass::Both,
        }
    }
}

// === impl Classification ===

impl Classification {
    pub fn pods(&self, class: IsolationClass) -> &[String] {
        match class {
            IsolationClass::None => &self.none,
            IsolationClass::IngressOnly => &self.ingress_only,
            IsolationClass::EgressOnly => &self.egress_only,
            IsolationClass::Both => &self.both,
        }
    }

    pub fn len(&self) -> usize {
        self.none.len() + self.ingress_only.len() + self.egress_only.len() + self.both.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn push(&mut self, class: IsolationClass, pod: String) {
        match class {
            IsolationClass::None => self.none.push(pod),
            IsolationClass::IngressOnly => self.ingress_only.push(pod),
            IsolationClass::EgressOnly => self.egress_only.push(pod),
            IsolationClass::Both => self.both.push(pod),
        }
    }
}

// === impl PolicySet ===

impl<'a> PolicySet<'a> {
    /// Groups `policies` by selector text, leaving out the candidate under
    /// evaluation (matched by name and namespace) when one is given.
    ///
    /// A selector that fails to parse aborts the build; bad syntax must never
    /// degrade into "matches nothing".
    pub fn build(
        policies: &'a [PolicyRecord],
        candidate: Option<&PolicyRecord>,
    ) -> Result<Self, InvalidSelector> {
        let mut groups: Vec<SelectorGroup<'a>> = Vec::new();
        let mut by_text: HashMap<&'a str, usize> = HashMap::new();

        for policy in policies {
            if candidate.is_some_and(|c| c.same_policy(policy)) {
                continue;
            }
            match by_text.get(policy.selector.as_str()) {
                Some(&group) => groups[group].policies.push(policy),
                None => {
                    let selector = Selector::parse(&policy.selector)?;
                    by_text.insert(&policy.selector, groups.len());
                    groups.push(SelectorGroup {
                        selector,
                        policies: vec![policy],
                    });
                }
            }
        }

        debug!(
            policies = policies.len(),
            groups = groups.len(),
            "grouped policies by selector"
        );
        Ok(Self { groups })
    }

    /// Number of distinct selector texts; each is matched once per pod.
    pub fn distinct_selectors(&self) -> usize {
        self.groups.len()
    }
}

/// Buckets every pod by the union of directions of all policies whose
/// selector matches its labels.
///
/// A pod matched by no policy lands in `IsolationClass::None` (fully open).
/// An empty pod list is a valid, empty result.
pub fn classify(pods: &[PodRecord], policies: &PolicySet<'_>) -> Classification {
    let mut result = Classification::default();
    for pod in pods {
        let mut directions = Directions::default();
        for group in &policies.groups {
            if !group.selector.matches(&pod.labels) {
                continue;
            }
            for policy in &group.policies {
                directions = directions.or(policy.directions());
            }
        }
        let class = IsolationClass::from(directions);
        trace!(pod = %pod.name, ?class, "classified");
        result.push(class, pod.name.clone());
    }
    result
}
