use crate::cli::main_types::{Commands, ConfigCommands, ExportFormat};
use crate::display::TableDisplay;
use crate::error::{AppError, CliError, DisplayError};
use crate::layout::{Interpreter, LayoutDescriptor, render};
use crate::layout::units::Units;
use crate::storage::config::Config;
use crate::utils::logging::VerboseLogger;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    units: Units,
    logger: VerboseLogger,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        verbose: bool,
        grid_unit_override: Option<f64>,
    ) -> Self {
        let mut units = config.to_units();
        if let Some(grid_unit) = grid_unit_override {
            units.set("gridUnit", grid_unit);
        }

        Self {
            config,
            config_path,
            units,
            logger: VerboseLogger::new(verbose),
        }
    }

    pub fn dispatch(mut self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Validate { file } => self.handle_validate(&file),
            Commands::Export {
                file,
                format,
                output,
            } => self.handle_export(&file, format, output.as_deref()),
            Commands::Inspect { file, json } => self.handle_inspect(&file, json),
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    fn parse_file(&self, file: &Path) -> Result<LayoutDescriptor, AppError> {
        self.logger
            .log(&format!("Reading layout script: {}", file.display()));
        let source = fs::read_to_string(file).map_err(|source| CliError::FileIo {
            path: file.to_string_lossy().to_string(),
            source,
        })?;

        self.logger.log(&format!(
            "Parsing with gridUnit = {}",
            self.units.grid_unit()
        ));
        let descriptor = Interpreter::new(&self.units).parse(&source)?;
        Ok(descriptor)
    }

    fn handle_validate(&self, file: &Path) -> Result<(), AppError> {
        match self.parse_file(file) {
            Ok(descriptor) => {
                println!(
                    "✅ {}: OK ({} widgets)",
                    file.display(),
                    descriptor.widgets.len()
                );
                Ok(())
            }
            Err(e) => {
                println!("❌ {}: {}", file.display(), e);
                Err(e)
            }
        }
    }

    fn handle_export(
        &self,
        file: &Path,
        format: ExportFormat,
        output: Option<&Path>,
    ) -> Result<(), AppError> {
        let descriptor = self.parse_file(file)?;

        let rendered = match format {
            ExportFormat::Script => render(&descriptor),
            ExportFormat::Json => {
                let mut json = serde_json::to_string_pretty(&descriptor)
                    .map_err(|e| DisplayError::Serialization(e.to_string()))?;
                json.push('\n');
                json
            }
        };

        match output {
            Some(path) => {
                fs::write(path, rendered).map_err(|source| CliError::FileIo {
                    path: path.to_string_lossy().to_string(),
                    source,
                })?;
                self.logger
                    .log(&format!("Wrote export to {}", path.display()));
            }
            None => print!("{}", rendered),
        }
        Ok(())
    }

    fn handle_inspect(&self, file: &Path, json: bool) -> Result<(), AppError> {
        let descriptor = self.parse_file(file)?;

        if json {
            let rendered = serde_json::to_string_pretty(&descriptor)
                .map_err(|e| DisplayError::Serialization(e.to_string()))?;
            println!("{}", rendered);
            return Ok(());
        }

        let display = TableDisplay::new();
        println!("Panel:");
        println!("{}", display.render_panel(&descriptor.panel)?);
        println!("Widgets:");
        println!("{}", display.render_widget_list(&descriptor.widgets)?);
        Ok(())
    }

    fn handle_config_command(&mut self, command: ConfigCommands) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                println!("Current Configuration:");
                println!("=====================");
                println!("grid_unit:     {}", self.config.units.grid_unit);
                println!("small_spacing: {}", self.config.units.small_spacing);
                println!("large_spacing: {}", self.config.units.large_spacing);
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                self.logger.log(&format!(
                    "Attempting config set - key: {}, value: {}",
                    key, value
                ));
                self.config.set_value(&key, &value)?;
                self.config.save(self.config_path.clone())?;
                println!("✅ Set {} = {}", key, value);
                Ok(())
            }
        }
    }
}
