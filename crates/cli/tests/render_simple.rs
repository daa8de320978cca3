use assert_cmd::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write(path: &PathBuf, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn stencil(tmp: &tempfile::TempDir) -> std::process::Command {
    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin!("stencil"));
    // keep the user's real config out of the test
    cmd.env("XDG_CONFIG_HOME", tmp.path().join("xdg"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn renders_a_template_with_a_context_file() {
    let tmp = tempdir().unwrap();
    let ctx = tmp.path().join("ctx.yml");
    let tpl = tmp.path().join("motd.tpl");
    let out = tmp.path().join("motd.txt");

    write(&ctx, "greeting: hello\nname: world\n");
    write(&tpl, "{{greeting}}, {{name}}!");

    stencil(&tmp)
        .args(["-c", ctx.to_str().unwrap()])
        .arg(&tpl)
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&out).unwrap(), "hello, world!\n");
}

#[test]
fn cli_vars_override_environment_and_context_defaults() {
    let tmp = tempdir().unwrap();
    let ctx = tmp.path().join("ctx.yml");
    let tpl = tmp.path().join("who.tpl");
    let out = tmp.path().join("who.txt");

    write(&ctx, "defaults:\n  name: nobody\n");
    write(&tpl, "{{name}}");

    stencil(&tmp)
        .env("name", "from-env")
        .args(["-c", ctx.to_str().unwrap(), "--var", "name=from-cli"])
        .arg(&tpl)
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&out).unwrap(), "from-cli\n");
}

#[test]
fn ambient_variables_are_reachable_under_env() {
    let tmp = tempdir().unwrap();
    let ctx = tmp.path().join("ctx.yml");
    let tpl = tmp.path().join("user.tpl");
    let out = tmp.path().join("user.txt");

    // the source shadows the top-level name
    write(&ctx, "DEPLOY_USER: shadowed\n");
    write(&tpl, "top={{DEPLOY_USER}} ambient={{env.DEPLOY_USER}}");

    stencil(&tmp)
        .env("DEPLOY_USER", "svc")
        .args(["-c", ctx.to_str().unwrap()])
        .arg(&tpl)
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&out).unwrap(), "top=shadowed ambient=svc\n");
}

#[test]
fn renders_a_directory_of_templates_into_a_destination_directory() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("templates");
    let out = tmp.path().join("rendered");

    write(&src.join("a.tpl"), "A");
    write(&src.join("sub/b.tpl"), "B");

    stencil(&tmp)
        .args(["--var", "unused=x"])
        .arg(&src)
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(out.join("a")).unwrap(), "A\n");
    assert_eq!(fs::read_to_string(out.join("sub/b")).unwrap(), "B\n");
}

#[test]
fn later_context_files_override_earlier_ones() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a.yml");
    let b = tmp.path().join("b.yml");
    let tpl = tmp.path().join("host.tpl");
    let out = tmp.path().join("host.txt");

    write(&a, "host: a\n");
    write(&b, "host: b\nport: 9090\n");
    write(&tpl, "{{host}}:{{port}}");

    stencil(&tmp)
        .args(["-c", a.to_str().unwrap(), "-c", b.to_str().unwrap()])
        .arg(&tpl)
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&out).unwrap(), "b:9090\n");
}

#[test]
fn dynamic_contextfiles_are_prerendered_with_ambient_variables() {
    let tmp = tempdir().unwrap();
    let ctx = tmp.path().join("ctx.yml");
    let tpl = tmp.path().join("host.tpl");
    let out = tmp.path().join("host.txt");

    write(&ctx, "host: \"{{HOSTNAME}}.example.org\"\n");
    write(&tpl, "{{host}}");

    stencil(&tmp)
        .env("HOSTNAME", "web1")
        .args(["-d", "-c", ctx.to_str().unwrap()])
        .arg(&tpl)
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&out).unwrap(), "web1.example.org\n");
}
