use samlocal::invoke::{BuildArgs, InvokeError, LocalInvokeArgs, SamCli, SamCliProcess};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write script");
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod");
}

fn build_args(base: &Path) -> BuildArgs {
    BuildArgs {
        build_dir: base.join("output"),
        base_dir: base.to_path_buf(),
        template_path: base.join("input/input-template.yaml"),
        manifest_path: None,
    }
}

#[test]
fn build_success_runs_to_completion() {
    let dir = tempdir().expect("tempdir");
    let bin = dir.path().join("sam-mock");
    let record = dir.path().join("args.txt");
    write_script(
        &bin,
        &format!(
            "#!/bin/sh\necho \"$@\" > '{}'\necho 'Build Succeeded'\n",
            record.display()
        ),
    );

    let output = SamCliProcess::new(bin.display().to_string())
        .build(&build_args(dir.path()))
        .expect("build");
    assert_eq!(output.stdout.trim(), "Build Succeeded");
    assert!(output.stderr.is_empty());

    let recorded = fs::read_to_string(&record).expect("args");
    assert!(recorded.starts_with("build --build-dir"));
    assert!(recorded.contains(&format!("--base-dir {}", dir.path().display())));
}

#[test]
fn build_non_zero_exit_is_explicit() {
    let dir = tempdir().expect("tempdir");
    let bin = dir.path().join("sam-fail");
    write_script(&bin, "#!/bin/sh\necho 'Build Failed' 1>&2\nexit 3\n");

    let err = SamCliProcess::new(bin.display().to_string())
        .build(&build_args(dir.path()))
        .expect_err("expected failure");
    match err {
        InvokeError::BuildFailed { exit_code, stderr } => {
            assert_eq!(exit_code, 3);
            assert_eq!(stderr, "Build Failed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_executable_is_reported() {
    let dir = tempdir().expect("tempdir");
    let err = SamCliProcess::new("/nonexistent/samlocal-sam")
        .build(&build_args(dir.path()))
        .expect_err("missing binary");
    assert!(matches!(err, InvokeError::MissingBinary { .. }));
}

#[test]
fn local_invoke_is_launched_and_left_running() {
    let dir = tempdir().expect("tempdir");
    let bin = dir.path().join("sam-run");
    let record = dir.path().join("run-args.txt");
    write_script(
        &bin,
        &format!(
            "#!/bin/sh\necho \"$@\" > '{}'\nsleep 1\nexit 4\n",
            record.display()
        ),
    );

    let args = LocalInvokeArgs {
        resource_name: "Fn".to_string(),
        template_path: PathBuf::from("/w/output/template.yaml"),
        event_path: PathBuf::from("/w/event.json"),
        env_vars_path: PathBuf::from("/w/env-vars.json"),
        debug_port: Some("5858".to_string()),
    };
    let mut task = SamCliProcess::new(bin.display().to_string())
        .launch_local_invoke(&args)
        .expect("launch");

    assert!(task.id().is_some());
    assert!(task.is_running());
    assert_eq!(task.wait().expect("wait"), Some(4));
    assert!(!task.is_running());

    let recorded = fs::read_to_string(&record).expect("args");
    assert_eq!(
        recorded.trim(),
        "local invoke Fn --template /w/output/template.yaml --event /w/event.json \
         --env-vars /w/env-vars.json -d 5858"
    );
}

#[test]
fn resident_task_can_be_terminated() {
    let dir = tempdir().expect("tempdir");
    let bin = dir.path().join("sam-forever");
    write_script(&bin, "#!/bin/sh\nexec sleep 30\n");

    let args = LocalInvokeArgs {
        resource_name: "Fn".to_string(),
        template_path: dir.path().join("template.yaml"),
        event_path: dir.path().join("event.json"),
        env_vars_path: dir.path().join("env-vars.json"),
        debug_port: None,
    };
    let mut task = SamCliProcess::new(bin.display().to_string())
        .launch_local_invoke(&args)
        .expect("launch");
    task.terminate().expect("terminate");
    assert!(!task.is_running());
}
