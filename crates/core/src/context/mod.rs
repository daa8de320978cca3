//! Context loading and aggregation.
//!
//! A context file is a YAML document whose top-level keys declare
//! variables, with an optional reserved `defaults` block describing
//! fallbacks and coercions. Sources are folded in order into one
//! namespace, later sources overriding earlier ones, with the ambient
//! variables re-exposed under the reserved `env` key.

mod aggregator;
mod discovery;
mod source;

pub use aggregator::{Context, AMBIENT_KEY};
pub use discovery::{collect_context_files, DiscoveryError};
pub use source::{ContextError, ContextSource, LoadOptions};
