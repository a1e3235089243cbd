//! Interactive menu loop
//!
//! Reads commands from any `BufRead` and writes plain text to any `Write`,
//! so the loop runs unchanged against stdin/stdout or in-memory buffers.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::services::CatalogService;
use crate::cli::error::CliResult;
use crate::cli::output::prerequisites_line;
use crate::config::Settings;
use crate::domain::CatalogWarning;
use crate::infrastructure::InfraError;

pub const LOAD_FIRST: &str = "Error: Please load the data structure first (Option 1).";

/// A parsed menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Load,
    List,
    Show,
    Exit,
    /// A number that is not on the menu
    Unknown(i64),
    /// Not a number at all
    Invalid,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<i64>() {
            Ok(1) => MenuChoice::Load,
            Ok(2) => MenuChoice::List,
            Ok(3) => MenuChoice::Show,
            Ok(9) => MenuChoice::Exit,
            Ok(n) => MenuChoice::Unknown(n),
            Err(_) => MenuChoice::Invalid,
        }
    }
}

pub struct InteractiveShell<'a, R, W> {
    service: &'a mut CatalogService,
    settings: &'a Settings,
    input: R,
    output: W,
}

fn write_err(e: io::Error) -> InfraError {
    InfraError::io("write shell output", e)
}

impl<'a, R: BufRead, W: Write> InteractiveShell<'a, R, W> {
    pub fn new(service: &'a mut CatalogService, settings: &'a Settings, input: R, output: W) -> Self {
        Self {
            service,
            settings,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu until `9` or end of input.
    #[instrument(level = "debug", skip(self))]
    pub fn run(&mut self) -> CliResult<()> {
        self.writeln("Welcome to the course planner.")?;
        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("What would you like to do?")? else {
                debug!("run: end of input");
                break;
            };
            match MenuChoice::parse(&line) {
                MenuChoice::Load => self.load()?,
                MenuChoice::List => self.list()?,
                MenuChoice::Show => self.show()?,
                MenuChoice::Exit => {
                    self.writeln("Thank you for using the course planner!")?;
                    break;
                }
                MenuChoice::Unknown(n) => self.writeln(&format!("{} is not a valid option.", n))?,
                MenuChoice::Invalid => self.writeln("That is not a valid option.")?,
            }
        }
        self.output.flush().map_err(write_err)?;
        Ok(())
    }

    /// Load a catalog before the menu starts. Failures are reported, not returned.
    pub fn preload(&mut self, path: &Path) -> CliResult<()> {
        self.load_path(path)
    }

    fn print_menu(&mut self) -> CliResult<()> {
        self.writeln("1. Load Data Structure.")?;
        self.writeln("2. Print Course List.")?;
        self.writeln("3. Print Course.")?;
        self.writeln("9. Exit")
    }

    fn load(&mut self) -> CliResult<()> {
        let Some(name) = self.prompt("Enter the file name:")? else {
            return Ok(());
        };
        let settings = self.settings;
        let path = if name.is_empty() {
            match &settings.catalog_file {
                Some(default) => default.clone(),
                None => return self.writeln("Error: No file name given."),
            }
        } else {
            PathBuf::from(name)
        };
        self.load_path(&path)
    }

    fn load_path(&mut self, path: &Path) -> CliResult<()> {
        match self.service.load(path) {
            Ok(report) => {
                for warning in &report.warnings {
                    let show = match warning {
                        CatalogWarning::UndefinedPrerequisite { .. } => {
                            self.settings.warn_undefined_prerequisites
                        }
                        CatalogWarning::DuplicateCourse { .. } => true,
                    };
                    if show {
                        writeln!(self.output, "Warning: {}.", warning).map_err(write_err)?;
                    }
                }
                writeln!(
                    self.output,
                    "Loaded {} courses from {}.",
                    report.courses,
                    report.path.display()
                )
                .map_err(write_err)?;
                Ok(())
            }
            Err(e) => self.writeln(&format!("Error: {}", e)),
        }
    }

    fn list(&mut self) -> CliResult<()> {
        if !self.service.is_loaded() {
            return self.writeln(LOAD_FIRST);
        }
        let courses = self.service.courses()?;
        writeln!(self.output, "Here is a sample schedule:").map_err(write_err)?;
        for course in courses {
            writeln!(self.output, "{}", course).map_err(write_err)?;
        }
        Ok(())
    }

    fn show(&mut self) -> CliResult<()> {
        if !self.service.is_loaded() {
            return self.writeln(LOAD_FIRST);
        }
        let Some(query) = self.prompt("What course do you want to know about?")? else {
            return Ok(());
        };
        match self.service.course(&query)? {
            Some(course) => {
                writeln!(self.output, "{}", course).map_err(write_err)?;
                writeln!(self.output, "{}", prerequisites_line(course)).map_err(write_err)?;
                Ok(())
            }
            None => {
                writeln!(self.output, "Course not found.").map_err(write_err)?;
                Ok(())
            }
        }
    }

    /// Write `msg` and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, msg: &str) -> CliResult<Option<String>> {
        write!(self.output, "{} ", msg).map_err(write_err)?;
        self.output.flush().map_err(write_err)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| InfraError::io("read shell input", e))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn writeln(&mut self, msg: &str) -> CliResult<()> {
        writeln!(self.output, "{}", msg).map_err(write_err)?;
        Ok(())
    }
}
