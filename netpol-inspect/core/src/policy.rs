use crate::Labels;

/// A declared policy-type marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyType {
    Ingress,
    Egress,
}

/// The traffic directions a policy isolates; also the per-pod accumulator the
/// classifier folds matching policies into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Directions {
    pub ingress: bool,
    pub egress: bool,
}

/// An immutable snapshot of one network policy, as the core consumes it.
///
/// Rule contents are never evaluated; only the egress-rule count feeds the
/// default-type inference.
#[derive(Clone, Debug)]
pub struct PolicyRecord {
    pub name: String,
    pub namespace: String,

    /// Canonical text of the selector governing which pods the policy
    /// applies to. Identical text is the grouping key in `PolicySet`.
    pub selector: String,

    /// Declared policy-type markers; may be empty.
    pub types: Vec<PolicyType>,

    pub ingress_rules: usize,
    pub egress_rules: usize,
}

/// An immutable snapshot of one running pod.
#[derive(Clone, Debug)]
pub struct PodRecord {
    pub name: String,
    pub labels: Labels,
}

// === impl Directions ===

impl Directions {
    pub fn or(self, other: Self) -> Self {
        Self {
            ingress: self.ingress || other.ingress,
            egress: self.egress || other.egress,
        }
    }
}

// === impl PolicyRecord ===

impl PolicyRecord {
    /// Resolves the directions this policy isolates.
    ///
    /// Mirrors the platform's default-type inference: with no declared
    /// markers, ingress is always isolated and egress only when the policy
    /// carries egress rules. Declared markers override rule presence
    /// entirely, so a policy declaring only `Egress` does not isolate
    /// ingress no matter what rules it holds.
    pub fn directions(&self) -> Directions {
        if self.types.is_empty() {
            return Directions {
                ingress: true,
                egress: self.egress_rules > 0,
            };
        }

        Directions {
            ingress: self.types.contains(&PolicyType::Ingress),
            egress: self.types.contains(&PolicyType::Egress),
        }
    }

    /// Identity is name plus namespace, never name alone.
    pub(crate) fn same_policy(&self, other: &PolicyRecord) -> bool {
        self.name == other.name && self.namespace == other.namespace
    }
}
