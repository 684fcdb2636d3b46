//! Controller module for argocd-attach-webhook.
//!
//! Contains the hook decision logic: related-resource selection for the
//! customize hook and attachment synthesis for the sync hook, plus the
//! failure taxonomy shared by both.

pub mod customize;
pub mod error;
pub mod sync;

pub use customize::related_resource_rules;
pub use error::{Error, Result};
pub use sync::{desired_attachments, parent_identity};
