//! The provisioning routine
//!
//! `Scaffolder::run` walks a fixed sequence of steps, each built only from
//! the executor primitives. Steps never overlap, and a failing step ends the
//! run immediately. Nothing done by earlier steps is rolled back.

use crate::config::{render, ScaffoldConfig, SetupCommands};
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::executor::{CommandRunner, Executor, FileSystem};
use crate::manifest;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Provisioning steps in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    InitPackage,
    InstallDependencies,
    CompilerConfig,
    AuxiliaryFiles,
    WatcherConfig,
    AmendManifest,
    EntryPoint,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::InitPackage,
        Step::InstallDependencies,
        Step::CompilerConfig,
        Step::AuxiliaryFiles,
        Step::WatcherConfig,
        Step::AmendManifest,
        Step::EntryPoint,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Step::InitPackage => "Initializing package",
            Step::InstallDependencies => "Installing dependencies",
            Step::CompilerConfig => "Configuring compiler",
            Step::AuxiliaryFiles => "Writing environment and ignore files",
            Step::WatcherConfig => "Configuring file watcher",
            Step::AmendManifest => "Adding scripts to manifest",
            Step::EntryPoint => "Creating entry point",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Receives progress notifications while the routine runs.
///
/// A reporter error ends the run like any other step failure.
pub trait Reporter {
    fn step_started(&self, step: Step) -> io::Result<()>;

    fn step_skipped(&self, _step: Step, _reason: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Discards all notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn step_started(&self, _step: Step) -> io::Result<()> {
        Ok(())
    }
}

/// What a completed run did, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub commands: Vec<String>,
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

/// Runs the provisioning steps through an `Executor`
pub struct Scaffolder<'a, R, F, P> {
    executor: &'a Executor<R, F>,
    reporter: &'a P,
    report: ScaffoldReport,
}

impl<'a, R: CommandRunner, F: FileSystem, P: Reporter> Scaffolder<'a, R, F, P> {
    pub fn new(executor: &'a Executor<R, F>, reporter: &'a P) -> Self {
        Self {
            executor,
            reporter,
            report: ScaffoldReport::default(),
        }
    }

    /// Provision a project in the executor's root according to `config`
    pub async fn run(mut self, config: &ScaffoldConfig) -> ScaffoldResult<ScaffoldReport> {
        for step in Step::ALL {
            self.step(step, config).await?;
        }
        Ok(self.report)
    }

    async fn step(&mut self, step: Step, config: &ScaffoldConfig) -> ScaffoldResult<()> {
        let vars = config.render_vars();

        match step {
            Step::InitPackage => {
                self.started(step)?;
                self.command(&config.commands.init).await?;
            }
            Step::InstallDependencies => {
                let installs = [
                    SetupCommands::install_command(
                        &config.commands.install_runtime,
                        &config.runtime_dependencies,
                    ),
                    SetupCommands::install_command(
                        &config.commands.install_dev,
                        &config.dev_dependencies,
                    ),
                ];
                if installs.iter().all(Option::is_none) {
                    self.reporter
                        .step_skipped(step, "no dependencies listed")
                        .map_err(ScaffoldError::Report)?;
                    return Ok(());
                }
                self.started(step)?;
                for install in installs.iter().flatten() {
                    self.command(install).await?;
                }
            }
            Step::CompilerConfig => {
                self.started(step)?;
                self.command(&config.commands.compiler_init).await?;
                let compiler = &config.templates.compiler_config;
                self.write(&compiler.path, &render(&compiler.body, &vars))
                    .await?;
                for tooling in &config.commands.tooling {
                    self.command(tooling).await?;
                }
            }
            Step::AuxiliaryFiles => {
                self.started(step)?;
                self.write(&config.layout.env_file, &config.env_file_contents())
                    .await?;
                for ignore in &config.templates.ignore_rules {
                    self.write(&ignore.path, &render(&ignore.body, &vars)).await?;
                }
            }
            Step::WatcherConfig => {
                self.started(step)?;
                let watcher = &config.templates.watcher_config;
                self.write(&watcher.path, &render(&watcher.body, &vars))
                    .await?;
            }
            Step::AmendManifest => {
                self.started(step)?;
                self.amend_manifest(config).await?;
            }
            Step::EntryPoint => {
                self.started(step)?;
                let dir = self
                    .executor
                    .create_directory(&config.layout.source_dir)
                    .await?;
                self.report.directories.push(dir);
                let entry = &config.templates.entry_point;
                self.write(&config.entry_point_path(), &render(&entry.body, &vars))
                    .await?;
            }
        }

        Ok(())
    }

    fn started(&self, step: Step) -> ScaffoldResult<()> {
        self.reporter
            .step_started(step)
            .map_err(ScaffoldError::Report)
    }

    /// Read the manifest, merge the scripts overlay and write it back in canonical form
    async fn amend_manifest(&mut self, config: &ScaffoldConfig) -> ScaffoldResult<()> {
        let path = &config.layout.manifest;
        let source = self.executor.read_file(path).await?;

        let amended = manifest::amend(&source, &config.scripts_overlay, config.unknown_fields)
            .map_err(|source| ScaffoldError::MalformedManifest {
                path: self.executor.resolve(path),
                source,
            })?;

        self.write(path, &amended).await
    }

    async fn command(&mut self, command: &str) -> ScaffoldResult<()> {
        self.executor.run_command(command).await?;
        self.report.commands.push(command.to_string());
        Ok(())
    }

    async fn write(&mut self, path: &str, content: &str) -> ScaffoldResult<()> {
        let written = self.executor.write_file(path, content).await?;
        self.report.files.push(written);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Layout, TemplateFile, Templates};
    use crate::executor::fake::RecordingRunner;
    use crate::executor::LocalFs;
    use crate::manifest::{PackageManifest, UnknownFields};
    use std::collections::BTreeMap;
    use std::path::Path;

    const ENTRY_TEMPLATE: &str = "app.listen(process.env.PORT || {{port}});";

    fn test_config() -> ScaffoldConfig {
        ScaffoldConfig {
            port: 8080,
            runtime_dependencies: vec!["alpha".to_string()],
            dev_dependencies: vec!["beta".to_string()],
            scripts_overlay: [("build", "compile")].into_iter().collect(),
            commands: SetupCommands::default(),
            layout: Layout::default(),
            templates: Templates {
                compiler_config: TemplateFile::new("tsconfig.json", "{\"rootDir\": \"./{{source_dir}}\"}"),
                watcher_config: TemplateFile::new("nodemon.json", "{\"watch\": [\"{{source_dir}}\"]}"),
                ignore_rules: vec![TemplateFile::new(".gitignore", "/node_modules")],
                entry_point: TemplateFile::new("index.ts", ENTRY_TEMPLATE),
            },
            unknown_fields: UnknownFields::Drop,
        }
    }

    /// Stands in for `npm init -y` by dropping a bare manifest
    fn npm_runner() -> RecordingRunner {
        RecordingRunner::new().writes("npm init -y", "package.json", r#"{"name": "demo"}"#)
    }

    fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
        let mut files = BTreeMap::new();
        for entry in std::fs::read_dir(root).unwrap() {
            let path = entry.unwrap().path();
            if path.is_file() {
                files.insert(path.clone(), std::fs::read_to_string(&path).unwrap());
            }
        }
        files
    }

    #[tokio::test]
    async fn test_provisions_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Executor::with_backends(dir.path(), npm_runner(), LocalFs);
        let config = test_config();

        let report = Scaffolder::new(&executor, &SilentReporter)
            .run(&config)
            .await
            .unwrap();

        assert_eq!(
            executor.runner().calls(),
            vec!["npm init -y", "npm i -S alpha", "npm i -D beta", "npx tsc --init"]
        );
        assert_eq!(report.commands, executor.runner().calls());

        let manifest = std::fs::read_to_string(dir.path().join("package.json")).unwrap();
        let scripts = PackageManifest::parse(&manifest).unwrap().scripts.unwrap();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts["build"], "compile");

        let entry = std::fs::read_to_string(dir.path().join("src/index.ts")).unwrap();
        assert_eq!(entry, "app.listen(process.env.PORT || 8080);");
        assert_eq!(std::fs::read_dir(dir.path().join("src")).unwrap().count(), 1);

        let env = std::fs::read_to_string(dir.path().join(".env")).unwrap();
        assert_eq!(env, "PORT=8080");

        let tsconfig = std::fs::read_to_string(dir.path().join("tsconfig.json")).unwrap();
        assert_eq!(tsconfig, "{\"rootDir\": \"./src\"}");

        assert_eq!(report.directories, vec![dir.path().join("src")]);
        assert_eq!(report.files.last(), Some(&dir.path().join("src/index.ts")));
    }

    #[tokio::test]
    async fn test_second_run_fails_at_directory_creation() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config();

        let first = Executor::with_backends(dir.path(), npm_runner(), LocalFs);
        Scaffolder::new(&first, &SilentReporter)
            .run(&config)
            .await
            .unwrap();
        let before = snapshot(dir.path());
        let entry_before = std::fs::read_to_string(dir.path().join("src/index.ts")).unwrap();

        let second = Executor::with_backends(dir.path(), npm_runner(), LocalFs);
        let err = Scaffolder::new(&second, &SilentReporter)
            .run(&config)
            .await
            .unwrap_err();

        match err {
            ScaffoldError::AlreadyExists { path } => assert_eq!(path, dir.path().join("src")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(snapshot(dir.path()), before);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("src/index.ts")).unwrap(),
            entry_before
        );
    }

    #[tokio::test]
    async fn test_failed_command_stops_without_rollback() {
        let dir = tempfile::tempdir().unwrap();
        let runner = npm_runner().fail_on("npm i -D beta", 1);
        let executor = Executor::with_backends(dir.path(), runner, LocalFs);

        let err = Scaffolder::new(&executor, &SilentReporter)
            .run(&test_config())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ScaffoldError::ExternalCommandFailed { code: Some(1), .. }
        ));
        // Nothing after the failing install ran, and the manifest from init stays
        assert_eq!(
            executor.runner().calls(),
            vec!["npm init -y", "npm i -S alpha", "npm i -D beta"]
        );
        assert!(dir.path().join("package.json").exists());
        assert!(!dir.path().join(".env").exists());
    }

    #[tokio::test]
    async fn test_tooling_commands_run_after_compiler_config() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Executor::with_backends(dir.path(), npm_runner(), LocalFs);
        let mut config = test_config();
        config.commands.tooling = vec!["npm init @eslint/config".to_string()];

        Scaffolder::new(&executor, &SilentReporter)
            .run(&config)
            .await
            .unwrap();

        assert_eq!(
            executor.runner().calls().last().map(String::as_str),
            Some("npm init @eslint/config")
        );
    }

    #[tokio::test]
    async fn test_empty_dependency_lists_skip_installs() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Executor::with_backends(dir.path(), npm_runner(), LocalFs);
        let mut config = test_config();
        config.runtime_dependencies.clear();
        config.dev_dependencies.clear();

        Scaffolder::new(&executor, &SilentReporter)
            .run(&config)
            .await
            .unwrap();

        assert_eq!(
            executor.runner().calls(),
            vec!["npm init -y", "npx tsc --init"]
        );
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new().writes("npm init -y", "package.json", "{ not json");
        let executor = Executor::with_backends(dir.path(), runner, LocalFs);

        let err = Scaffolder::new(&executor, &SilentReporter)
            .run(&test_config())
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::MalformedManifest { .. }));
    }

    #[tokio::test]
    async fn test_missing_manifest_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Executor::with_backends(dir.path(), RecordingRunner::new(), LocalFs);

        let err = Scaffolder::new(&executor, &SilentReporter)
            .run(&test_config())
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::NotFound { .. }));
    }

    struct BrokenTerminal;

    impl Reporter for BrokenTerminal {
        fn step_started(&self, _step: Step) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[tokio::test]
    async fn test_reporter_failure_ends_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Executor::with_backends(dir.path(), npm_runner(), LocalFs);

        let err = Scaffolder::new(&executor, &BrokenTerminal)
            .run(&test_config())
            .await
            .unwrap_err();

        match err {
            ScaffoldError::Report(source) => assert_eq!(source.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error: {other}"),
        }
        assert!(executor.runner().calls().is_empty());
    }
}
