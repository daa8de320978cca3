//! Parsing and resolution of the reserved `defaults` block.
//!
//! A context document may carry a `defaults` mapping that describes, per
//! variable, how a supplied raw value is coerced and what value stands in
//! when the ambient variables do not supply one. The block is validated
//! eagerly into a [`DefaultsSpec`] when the document is loaded and resolved
//! against the ambient variables afterwards.

mod resolver;
mod spec;

pub use resolver::{resolve, ResolveError, Variables};
pub use spec::{DefaultDecl, DefaultsSpec, SpecError};
