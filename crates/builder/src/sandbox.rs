//! Ephemeral build sandbox
//!
//! Prepares the `build/work` tree, hands the build script an explicit
//! environment map (the parent process environment is never mutated) and
//! captures the script's output in full. Both streams are persisted to log
//! files in the package root regardless of outcome.

use crate::context::BuildContext;
use evoke_errors::{BuildError, Error, Result};
use evoke_metadata::paths;
use std::collections::HashMap;
use std::path::Path;
use tokio::process::Command;

/// Captured result of one build script invocation
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    /// Exit code; `None` when the script was killed by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ScriptOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Prepare a fresh build tree.
///
/// A stale `build/` directory left by a previous failed run is removed
/// first, so a retry needs no manual cleanup. Old log files from the
/// previous attempt are removed as well.
///
/// # Errors
///
/// Returns `BuildError::PrepareFailed` when directories cannot be created
/// or the stale tree cannot be removed.
pub async fn prepare(ctx: &BuildContext) -> Result<()> {
    for log in [paths::STDOUT_LOG, paths::STDERR_LOG] {
        match tokio::fs::remove_file(ctx.package_root.join(log)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(prepare_failed(&e)),
        }
    }

    if ctx.build_dir.exists() {
        tokio::fs::remove_dir_all(&ctx.build_dir)
            .await
            .map_err(|e| prepare_failed(&e))?;
    }
    tokio::fs::create_dir_all(&ctx.work_dir)
        .await
        .map_err(|e| prepare_failed(&e))?;
    tokio::fs::create_dir_all(&ctx.data_dir)
        .await
        .map_err(|e| prepare_failed(&e))?;
    Ok(())
}

fn prepare_failed(e: &std::io::Error) -> Error {
    BuildError::PrepareFailed {
        message: e.to_string(),
    }
    .into()
}

/// The environment contract exported to the build script.
///
/// `jobs` is the ambient concurrency hint (the `JOBS` variable); when
/// present it is forwarded as `MAKEFLAGS` and `NINJAJOBS`.
#[must_use]
pub fn script_environment(ctx: &BuildContext, jobs: Option<&str>) -> HashMap<String, String> {
    let mut env = HashMap::new();
    let build_dir = ctx.build_dir.display().to_string();
    let data_dir = ctx.data_dir.display().to_string();

    env.insert("EVOKE_BUILD_DIR".to_string(), build_dir.clone());
    env.insert("SRC".to_string(), build_dir);
    env.insert(
        "EVOKE_WORK_DIR".to_string(),
        ctx.work_dir.display().to_string(),
    );
    env.insert("PKG".to_string(), data_dir.clone());
    env.insert("EVOKE_PKG_DIR".to_string(), data_dir);
    env.insert("name".to_string(), ctx.id.name.clone());
    env.insert("version".to_string(), ctx.id.version.clone());

    if let Some(jobs) = jobs {
        env.insert("MAKEFLAGS".to_string(), format!("-j{jobs}"));
        env.insert("NINJAJOBS".to_string(), jobs.to_string());
    }
    env
}

/// Run the build script with `build/work` as its working directory,
/// capturing both output streams in full.
///
/// # Errors
///
/// Returns `BuildError::MissingScript` when `scripts/PKGBUILD` does not
/// exist and `BuildError::SpawnFailed` when the subprocess cannot start.
/// A non-zero exit is NOT an error here; see [`check_status`].
pub async fn run_script(
    ctx: &BuildContext,
    env: &HashMap<String, String>,
) -> Result<ScriptOutput> {
    let script = ctx.script_path();
    if !script.is_file() {
        return Err(BuildError::MissingScript {
            path: script.display().to_string(),
        }
        .into());
    }

    let output = Command::new("bash")
        .arg(&script)
        .current_dir(&ctx.work_dir)
        .envs(env)
        .output()
        .await
        .map_err(|e| BuildError::SpawnFailed {
            script: script.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(ScriptOutput {
        code: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Persist captured output to the two log files in the package root,
/// overwriting any previous attempt's logs.
///
/// # Errors
///
/// Returns an I/O error when a log file cannot be written.
pub async fn persist_logs(ctx: &BuildContext, output: &ScriptOutput) -> Result<()> {
    write_log(&ctx.package_root, paths::STDOUT_LOG, &output.stdout).await?;
    write_log(&ctx.package_root, paths::STDERR_LOG, &output.stderr).await?;
    Ok(())
}

async fn write_log(root: &Path, name: &str, data: &[u8]) -> Result<()> {
    let path = root.join(name);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}

/// Turn a script exit status into a pipeline verdict.
///
/// # Errors
///
/// Returns `BuildError::ScriptFailed` for a non-zero exit and
/// `BuildError::ScriptKilled` when the script died on a signal.
pub fn check_status(output: &ScriptOutput) -> Result<()> {
    match output.code {
        Some(0) => Ok(()),
        Some(code) => Err(BuildError::ScriptFailed { code }.into()),
        None => Err(BuildError::ScriptKilled.into()),
    }
}

/// Remove the ephemeral build directory.
///
/// Called only after the tree snapshot has captured the output.
///
/// # Errors
///
/// Returns an I/O error when the directory cannot be removed.
pub async fn teardown(ctx: &BuildContext) -> Result<()> {
    tokio::fs::remove_dir_all(&ctx.build_dir)
        .await
        .map_err(|e| Error::io_with_path(&e, &ctx.build_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evoke_types::PackageId;

    fn context(dir: &Path) -> BuildContext {
        BuildContext::new(dir, PackageId::new("demo", "1.0")).unwrap()
    }

    async fn write_script(root: &Path, body: &str) {
        let dir = root.join("scripts");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("PKGBUILD"), body).await.unwrap();
    }

    #[tokio::test]
    async fn test_prepare_removes_stale_build_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());

        tokio::fs::create_dir_all(ctx.build_dir.join("leftover"))
            .await
            .unwrap();
        tokio::fs::write(ctx.build_dir.join("leftover/file"), b"x")
            .await
            .unwrap();

        prepare(&ctx).await.unwrap();
        assert!(ctx.work_dir.is_dir());
        assert!(ctx.data_dir.is_dir());
        assert!(!ctx.build_dir.join("leftover").exists());
    }

    #[test]
    fn test_environment_contract() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());

        let env = script_environment(&ctx, None);
        assert_eq!(env["EVOKE_BUILD_DIR"], ctx.build_dir.display().to_string());
        assert_eq!(env["SRC"], env["EVOKE_BUILD_DIR"]);
        assert_eq!(env["PKG"], ctx.data_dir.display().to_string());
        assert_eq!(env["EVOKE_PKG_DIR"], env["PKG"]);
        assert_eq!(env["name"], "demo");
        assert_eq!(env["version"], "1.0");
        assert!(!env.contains_key("MAKEFLAGS"));

        let env = script_environment(&ctx, Some("8"));
        assert_eq!(env["MAKEFLAGS"], "-j8");
        assert_eq!(env["NINJAJOBS"], "8");
    }

    #[tokio::test]
    async fn test_script_sees_contract_and_installs() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());
        prepare(&ctx).await.unwrap();
        write_script(tmp.path(), "echo \"$name $version\" > \"$PKG/built.txt\"\n").await;

        let env = script_environment(&ctx, None);
        let output = run_script(&ctx, &env).await.unwrap();
        check_status(&output).unwrap();

        let text = tokio::fs::read_to_string(ctx.data_dir.join("built.txt"))
            .await
            .unwrap();
        assert_eq!(text.trim(), "demo 1.0");
    }

    #[tokio::test]
    async fn test_failing_script_reports_code_and_keeps_logs() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());
        prepare(&ctx).await.unwrap();
        write_script(tmp.path(), "echo progress; echo broken >&2; exit 3\n").await;

        let env = script_environment(&ctx, None);
        let output = run_script(&ctx, &env).await.unwrap();
        persist_logs(&ctx, &output).await.unwrap();

        let err = check_status(&output).unwrap_err();
        assert!(matches!(
            err,
            evoke_errors::Error::Build(BuildError::ScriptFailed { code: 3 })
        ));

        let stdout = tokio::fs::read_to_string(tmp.path().join(paths::STDOUT_LOG))
            .await
            .unwrap();
        let stderr = tokio::fs::read_to_string(tmp.path().join(paths::STDERR_LOG))
            .await
            .unwrap();
        assert!(stdout.contains("progress"));
        assert!(stderr.contains("broken"));
    }

    #[tokio::test]
    async fn test_missing_script_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());
        prepare(&ctx).await.unwrap();

        let env = script_environment(&ctx, None);
        let err = run_script(&ctx, &env).await.unwrap_err();
        assert!(matches!(
            err,
            evoke_errors::Error::Build(BuildError::MissingScript { .. })
        ));
    }
}
