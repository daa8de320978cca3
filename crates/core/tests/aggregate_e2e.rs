use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde_yaml::Value;
use tempfile::TempDir;

use stencil_core::context::{Context, ContextError, LoadOptions, AMBIENT_KEY};
use stencil_core::render::{render_str, UndefinedPolicy};

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn later_sources_override_earlier_ones_end_to_end() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yml", "host: a\n");
    let b = write(&dir, "b.yml", "host: b\nport: 9090\n");

    let ctx = Context::from_files(&[a, b], &LoadOptions::default(), &vars(&[])).unwrap();

    assert_eq!(ctx.namespace().get(Value::from("host")), Some(&Value::from("b")));
    assert_eq!(ctx.namespace().get(Value::from("port")), Some(&Value::from(9090_i64)));
}

#[test]
fn defaults_coerce_ambient_values_through_the_whole_pipeline() {
    let dir = TempDir::new().unwrap();
    let ctx_file = write(
        &dir,
        "ctx.yml",
        concat!(
            "defaults:\n",
            "  debug: false\n",
            "  workers: 4\n",
            "  features:\n",
            "    type: list\n",
            "    delimiter: \",\"\n",
            "    default: []\n",
        ),
    );

    let ambient = vars(&[("debug", "Yes"), ("workers", "16"), ("features", "a, b,c")]);
    let options = LoadOptions { strict_types: true, ..LoadOptions::default() };
    let ctx = Context::from_files(&[ctx_file], &options, &ambient).unwrap();

    assert_eq!(ctx.namespace().get(Value::from("debug")), Some(&Value::Bool(true)));
    assert_eq!(ctx.namespace().get(Value::from("workers")), Some(&Value::from(16_i64)));
    assert_eq!(
        ctx.namespace().get(Value::from("features")),
        Some(&Value::Sequence(vec![
            Value::from("a"),
            Value::from("b"),
            Value::from("c"),
        ]))
    );
}

#[test]
fn strict_type_failure_aborts_the_whole_pass() {
    let dir = TempDir::new().unwrap();
    let ctx_file = write(&dir, "ctx.yml", "defaults:\n  workers: 4\n");

    let ambient = vars(&[("workers", "many")]);
    let options = LoadOptions { strict_types: true, ..LoadOptions::default() };
    let err = Context::from_files(&[ctx_file], &options, &ambient).unwrap_err();

    assert!(matches!(err, ContextError::Resolve { .. }));
}

#[test]
fn lenient_mode_passes_uncoercible_values_through() {
    let dir = TempDir::new().unwrap();
    let ctx_file = write(&dir, "ctx.yml", "defaults:\n  workers: 4\n");

    let ambient = vars(&[("workers", "many")]);
    let ctx = Context::from_files(&[ctx_file], &LoadOptions::default(), &ambient).unwrap();

    assert_eq!(ctx.namespace().get(Value::from("workers")), Some(&Value::from("many")));
}

#[test]
fn variation_block_activates_only_with_its_trigger() {
    let dir = TempDir::new().unwrap();
    let ctx_file = write(
        &dir,
        "ctx.yml",
        concat!(
            "defaults:\n",
            "  prod:\n",
            "    type: variation\n",
            "    defaults:\n",
            "      replicas: 3\n",
        ),
    );

    let without = Context::from_files(
        &[ctx_file.clone()],
        &LoadOptions::default(),
        &vars(&[]),
    )
    .unwrap();
    assert_eq!(without.namespace().get(Value::from("replicas")), None);

    let with = Context::from_files(
        &[ctx_file],
        &LoadOptions::default(),
        &vars(&[("prod", "1")]),
    )
    .unwrap();
    assert_eq!(with.namespace().get(Value::from("replicas")), Some(&Value::from(3_i64)));
}

#[test]
fn ambient_variables_are_reexposed_under_the_reserved_key() {
    let dir = TempDir::new().unwrap();
    let ctx_file = write(&dir, "ctx.yml", "USER: shadowed\n");

    let ambient = vars(&[("USER", "svc")]);
    let ctx = Context::from_files(&[ctx_file], &LoadOptions::default(), &ambient).unwrap();

    // the source wins at the top level, the ambient value under `env`
    assert_eq!(ctx.namespace().get(Value::from("USER")), Some(&Value::from("shadowed")));
    let env = ctx.namespace().get(Value::from(AMBIENT_KEY)).unwrap().as_mapping().unwrap();
    assert_eq!(env.get(Value::from("USER")), Some(&Value::from("svc")));
}

#[test]
fn aggregated_namespace_renders_templates() {
    let dir = TempDir::new().unwrap();
    let ctx_file = write(&dir, "ctx.yml", "defaults:\n  name: world\n");

    let ctx =
        Context::from_files(&[ctx_file], &LoadOptions::default(), &vars(&[("LANG", "C")]))
            .unwrap();

    let out = render_str(
        "hello {{name}} ({{env.LANG}})",
        ctx.namespace(),
        UndefinedPolicy::Strict,
    )
    .unwrap();
    assert_eq!(out, "hello world (C)");
}

#[test]
fn nested_mappings_merge_across_sources() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yml", "db:\n  host: localhost\n  port: 5432\n");
    let b = write(&dir, "b.yml", "db:\n  port: 6432\n");

    let ctx = Context::from_files(&[a, b], &LoadOptions::default(), &vars(&[])).unwrap();

    let db = ctx.namespace().get(Value::from("db")).unwrap().as_mapping().unwrap();
    assert_eq!(db.get(Value::from("host")), Some(&Value::from("localhost")));
    assert_eq!(db.get(Value::from("port")), Some(&Value::from(6432_i64)));
}
