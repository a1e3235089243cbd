//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{CatalogService, LoadReport};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::shell::InteractiveShell;
use crate::config::{expand_path, global_config_path, Settings};
use crate::domain::{normalize_id, CatalogWarning};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        return cmd_completion(*shell);
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);
    let file = cli.file.as_deref();

    match &cli.command {
        None | Some(Commands::Shell) => cmd_shell(&container, file),
        Some(Commands::List) => cmd_list(&container, file),
        Some(Commands::Show { course }) => cmd_show(&container, file, course),
        Some(Commands::Tree) => cmd_tree(&container, file),
        Some(Commands::Config { command }) => cmd_config(&container, cli.config.as_deref(), command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
    }
}

/// Explicit `--file` wins over `catalog_file` from settings.
fn catalog_path(container: &ServiceContainer, file: Option<&Path>) -> Option<PathBuf> {
    file.map(expand_path)
        .or_else(|| container.settings.catalog_file.clone())
}

fn resolve_catalog(container: &ServiceContainer, file: Option<&Path>) -> CliResult<PathBuf> {
    catalog_path(container, file).ok_or_else(|| {
            CliError::Usage("no catalog file given: use --file or set catalog_file in config".into())
        })
}

fn load_catalog(container: &ServiceContainer, file: Option<&Path>) -> CliResult<CatalogService> {
    let path = resolve_catalog(container, file)?;
    let mut service = container.catalog_service();
    let report = service.load(&path)?;
    report_warnings(container, &report);
    Ok(service)
}

fn report_warnings(container: &ServiceContainer, report: &LoadReport) {
    for warning in &report.warnings {
        match warning {
            CatalogWarning::UndefinedPrerequisite { .. }
                if !container.settings.warn_undefined_prerequisites => {}
            _ => output::warning(warning),
        }
    }
}

#[instrument(skip(container))]
fn cmd_shell(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let mut service = container.catalog_service();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = InteractiveShell::new(
        &mut service,
        &container.settings,
        stdin.lock(),
        stdout.lock(),
    );
    if let Some(path) = catalog_path(container, file) {
        shell.preload(&path)?;
    }
    shell.run()
}

#[instrument(skip(container))]
fn cmd_list(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let service = load_catalog(container, file)?;
    for course in service.courses()? {
        output::info(course);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, file: Option<&Path>, course: &str) -> CliResult<()> {
    let service = load_catalog(container, file)?;
    match service.course(course)? {
        Some(record) => {
            output::header(record);
            output::info(&output::prerequisites_line(record));
            Ok(())
        }
        None => Err(CliError::CourseNotFound(normalize_id(course))),
    }
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let service = load_catalog(container, file)?;
    let store = service.store();
    debug!("tree: {} nodes, height {}", store.len(), store.height());
    match store.shape() {
        Some(tree) => {
            output::info(&tree);
            output::success(&format!(
                "{} courses, height {}",
                store.len(),
                store.height()
            ));
        }
        None => output::info("(empty catalog)"),
    }
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    config_file: Option<&Path>,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let path = config_file
                .map(Path::to_path_buf)
                .or_else(global_config_path)
                .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
            output::info(&path.display());
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    use crate::exitcode;
    use crate::infrastructure::traits::FileSystem;

    /// In-memory filesystem keyed by path.
    #[derive(Default)]
    struct MemoryFileSystem {
        files: HashMap<PathBuf, String>,
    }

    impl MemoryFileSystem {
        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(PathBuf::from(path), content.to_string());
            self
        }
    }

    impl FileSystem for MemoryFileSystem {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }

        fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
            Ok(path.to_path_buf())
        }
    }

    /// Counts events at WARN or ERROR.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() <= Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn container(settings: Settings) -> ServiceContainer {
        let fs = MemoryFileSystem::default()
            .with_file("/catalogs/main.csv", "CS300,Algorithms,CS200\nCS200,Data Structures\n")
            .with_file("/catalogs/other.csv", "MATH201,Discrete Mathematics\n")
            .with_file("/catalogs/undefined.csv", "CS300,Algorithms,CS250\n");
        ServiceContainer::with_deps(settings, Arc::new(fs))
    }

    fn settings_with_catalog(path: &str) -> Settings {
        Settings {
            catalog_file: Some(PathBuf::from(path)),
            ..Settings::default()
        }
    }

    #[test]
    fn given_file_flag_and_configured_catalog_when_loading_then_flag_wins() {
        let container = container(settings_with_catalog("/catalogs/main.csv"));
        let file = Path::new("/catalogs/other.csv");

        let path = resolve_catalog(&container, Some(file)).unwrap();
        let service = load_catalog(&container, Some(file)).unwrap();

        assert_eq!(path, PathBuf::from("/catalogs/other.csv"));
        assert!(service.course("MATH201").unwrap().is_some());
        assert!(service.course("CS300").unwrap().is_none());
    }

    #[test]
    fn given_only_configured_catalog_when_loading_then_uses_settings() {
        let container = container(settings_with_catalog("/catalogs/main.csv"));

        let service = load_catalog(&container, None).unwrap();

        assert_eq!(service.source(), Some(Path::new("/catalogs/main.csv")));
        assert_eq!(service.courses().unwrap().len(), 2);
    }

    #[test]
    fn given_no_file_and_no_configured_catalog_when_resolving_then_usage_error() {
        let container = container(Settings::default());

        let err = resolve_catalog(&container, None).unwrap_err();

        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(err.exit_code(), exitcode::USAGE);
        assert!(catalog_path(&container, None).is_none());
    }

    #[test]
    fn given_missing_course_when_showing_then_course_not_found_with_dataerr() {
        let container = container(settings_with_catalog("/catalogs/main.csv"));

        let err = cmd_show(&container, None, " cs999 ").unwrap_err();

        assert!(matches!(&err, CliError::CourseNotFound(id) if id == "CS999"));
        assert_eq!(err.exit_code(), exitcode::DATAERR);
    }

    #[test]
    fn given_existing_course_when_showing_then_succeeds() {
        let container = container(settings_with_catalog("/catalogs/main.csv"));

        assert!(cmd_show(&container, None, "cs300").is_ok());
    }

    #[test]
    fn given_missing_catalog_file_when_loading_then_noinput() {
        let container = container(Settings::default());

        let err = load_catalog(&container, Some(Path::new("/catalogs/absent.csv"))).unwrap_err();

        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_configured_catalog_when_starting_shell_then_preloads_it() {
        let container = container(settings_with_catalog("/catalogs/main.csv"));

        assert_eq!(
            catalog_path(&container, None),
            Some(PathBuf::from("/catalogs/main.csv"))
        );
        assert_eq!(
            catalog_path(&container, Some(Path::new("/catalogs/other.csv"))),
            Some(PathBuf::from("/catalogs/other.csv"))
        );
    }

    #[test]
    fn given_undefined_prerequisite_warnings_disabled_when_loading_then_nothing_logged_at_warn() {
        let settings = Settings {
            warn_undefined_prerequisites: false,
            ..settings_with_catalog("/catalogs/undefined.csv")
        };
        let container = container(settings);
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));

        let service = tracing::subscriber::with_default(subscriber, || load_catalog(&container, None))
            .unwrap();

        assert_eq!(warnings.load(Ordering::SeqCst), 0);
        assert!(service.course("CS300").unwrap().is_some());
    }
}
