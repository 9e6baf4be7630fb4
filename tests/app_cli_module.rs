use samlocal::app::run_cli;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::tempdir;

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write script");
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod");
}

#[test]
fn empty_args_print_help() {
    let help = run_cli(Vec::new()).expect("help");
    assert!(help.contains("invoke"));
    assert!(run_cli(vec!["deploy".to_string()]).is_err());
}

#[test]
fn invoke_runs_build_then_local_invoke_with_handler_config() {
    let dir = tempdir().expect("tempdir");
    let project = dir.path().join("project");
    let code_root = project.join("src");
    fs::create_dir_all(code_root.join("sub")).expect("code root");
    fs::write(code_root.join("sub/index.js"), "exports.handler = async () => 1;\n")
        .expect("handler source");
    fs::create_dir_all(project.join(".samlocal")).expect("handler config dir");
    fs::write(
        project.join(".samlocal/handlers.yaml"),
        "handlers:\n  app.handler:\n    event:\n      source: cli\n",
    )
    .expect("handler config");

    let journal = dir.path().join("journal.txt");
    let sam = dir.path().join("sam-mock");
    write_script(
        &sam,
        &format!(
            "#!/bin/sh\nif [ \"$1\" = \"build\" ]; then\n  echo build >> '{journal}'\n  exit 0\nfi\necho \"$1 $2 $3\" >> '{journal}'\ncat \"$7\" >> '{journal}'\nexit 0\n",
            journal = journal.display()
        ),
    );
    let config = dir.path().join("config.yaml");
    fs::write(&config, format!("samcli.location: {}\n", sam.display())).expect("config");
    let log = dir.path().join("samlocal.log");

    let args: Vec<String> = vec![
        "invoke".to_string(),
        "--document".to_string(),
        code_root.join("sub/index.js").display().to_string(),
        "--handler".to_string(),
        "app.handler".to_string(),
        "--runtime".to_string(),
        "nodejs20.x".to_string(),
        "--code-root".to_string(),
        code_root.display().to_string(),
        "--workspace".to_string(),
        project.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--log-file".to_string(),
        log.display().to_string(),
    ];
    let output = run_cli(args).expect("invoke");
    assert!(output.contains("started=true"));
    assert!(output.contains("exit_code=0"));

    let recorded = fs::read_to_string(&journal).expect("journal");
    let lines: Vec<&str> = recorded.lines().collect();
    assert_eq!(lines[0], "build");
    assert_eq!(lines[1], "local invoke samlocalFunctionResource");
    assert_eq!(lines[2], r#"{"source":"cli"}"#);

    let log_raw = fs::read_to_string(&log).expect("log");
    assert!(log_raw.contains("build.complete"));
    assert!(!log_raw.contains("run.failed"));
}

#[test]
fn invoke_reports_build_failure_without_starting() {
    let dir = tempdir().expect("tempdir");
    let sam = dir.path().join("sam-fail");
    write_script(&sam, "#!/bin/sh\necho 'Build Failed' 1>&2\nexit 1\n");
    let config = dir.path().join("config.yaml");
    fs::write(&config, format!("samcli.location: {}\n", sam.display())).expect("config");
    let log = dir.path().join("samlocal.log");

    let args: Vec<String> = [
        "invoke",
        "--document",
        "/proj/src/index.js",
        "--handler",
        "index.handler",
        "--runtime",
        "nodejs20.x",
        "--config",
    ]
    .iter()
    .map(|s| s.to_string())
    .chain([
        config.display().to_string(),
        "--log-file".to_string(),
        log.display().to_string(),
    ])
    .collect();

    let output = run_cli(args).expect("failures are reported, not returned");
    assert!(output.contains("started=false"));
    let log_raw = fs::read_to_string(&log).expect("log");
    assert!(log_raw.contains("run.failed"));
    assert!(log_raw.contains("Build Failed"));
}
