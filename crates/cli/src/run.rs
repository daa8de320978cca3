//! Orchestration of one render run: config, variables, contexts, templates.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use stencil_core::config::{ConfigError, ConfigLoader};
use stencil_core::context::{collect_context_files, Context, ContextError, DiscoveryError, LoadOptions};
use stencil_core::render::UndefinedPolicy;
use stencil_core::template::{plan_jobs, OutputError, PlanError, TemplateFile};

use crate::Cli;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub fn run(cli: &Cli) -> Result<(), RunError> {
    let defaults = ConfigLoader::load(cli.config.as_deref())?;

    // flags win over config-file defaults
    let prerender = cli.dynamic_contextfiles || defaults.dynamic_contextfiles;
    let strict_types = cli.defaults_type_check || defaults.defaults_type_check;
    let policy = if cli.ignore_undefined_variables || defaults.ignore_undefined {
        UndefinedPolicy::Silent
    } else {
        UndefinedPolicy::Strict
    };
    let file_mode = cli.mode.clone().or_else(|| defaults.mode.clone());

    // ambient variables: process environment, overridden by --var
    let mut vars: HashMap<String, String> = env::vars().collect();
    for (name, value) in &cli.var {
        vars.insert(name.clone(), value.clone());
    }

    let mut context_paths: Vec<PathBuf> = defaults.contextfiles.clone();
    context_paths.extend(cli.contextfile.iter().cloned());
    let context_files = collect_context_files(&context_paths)?;
    debug!("using {} context file(s)", context_files.len());

    let options = LoadOptions { prerender, undefined: policy, strict_types };
    let context = Context::from_files(&context_files, &options, &vars)?;
    debug!("aggregated {} top-level variable(s)", context.namespace().len());

    let jobs = plan_jobs(&cli.template, &cli.destination)?;
    info!("rendering {} template(s)", jobs.len());
    for job in jobs {
        let template = TemplateFile {
            src: job.src,
            dest: job.dest,
            file_mode: file_mode.clone(),
            remove_template: cli.remove_templates,
            force_overwrite: cli.force,
        };
        template.render(context.namespace(), policy)?;
    }

    Ok(())
}
