//! Classifies the isolation state of pods under a set of network policies and
//! explains how a candidate policy would change it.
//!
//! - Each `PolicyRecord` carries the canonical text of its pod selector. The
//!   `PolicySet` builder groups records sharing identical text and parses each
//!   distinct selector exactly once, so matching runs once per pod per
//!   distinct selector no matter how many policies share it.
//! - `classify` folds the resolved direction of every matching policy into a
//!   per-pod `(ingress, egress)` accumulator and buckets pods into the four
//!   `IsolationClass`es. The fold is a monotonic OR: policy order never
//!   affects the result.
//! - `report` renders a fixed decision table describing which buckets would
//!   gain or lose implicit allow-all behavior once the candidate applies.
//!
//! ```text
//! [ PolicyRecord ] -> [ PolicySet ] -> classify [ PodRecord ] -> [ Classification ] -> report
//! ```
//!
//! The crate performs no I/O; callers hand it already-decoded policy and pod
//! snapshots and nothing is retained across calls.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod classify;
mod labels;
mod policy;
mod report;
mod selector;

pub use self::{
    classify::{classify, Classification, IsolationClass, PolicySet},
    labels::Labels,
    policy::{Directions, PodRecord, PolicyRecord, PolicyType},
    report::{report, ReportLine},
    selector::{InvalidSelector, Selector},
};
