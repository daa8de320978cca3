//! Template discovery, destination planning, and output writing.

mod discovery;
mod output;

pub use discovery::{plan_jobs, PlanError, TemplateJob, TEMPLATE_EXTENSION};
pub use output::{OutputError, TemplateFile};
