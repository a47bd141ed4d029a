//! Kubernetes-facing collaborators of the classifier core: listing live
//! resources, decoding manifest files, and converting both into the core's
//! record types.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod cluster;
mod convert;
mod manifest;

pub use self::{
    convert::{pod_record, policy_record, selector_text},
    manifest::load_policy,
};
pub use k8s_openapi::api::{core::v1::Pod, networking::v1::NetworkPolicy};
pub use kube::{Client, ResourceExt};

use std::path::PathBuf;
use thiserror::Error;

/// Input failures: manifests and resources the core cannot accept. All are
/// fatal; nothing here is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read {}: {source}", path.display())]
    ReadManifest {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not decode document in {}: {source}", path.display())]
    DecodeManifest {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("could not find a network policy in file {}", path.display())]
    PolicyNotInManifest { path: PathBuf },

    #[error("unknown policy type {0:?}")]
    UnknownPolicyType(String),

    #[error("unknown selector operator {0:?}")]
    UnknownOperator(String),

    #[error("selector operator {operator:?} on {key:?} requires values")]
    EmptyValues { key: String, operator: String },
}
