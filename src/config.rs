//! Configuration management for geogof.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::dataset::DatasetOptions;
use crate::error::{GeogofError, Result};
use crate::plot::PlotOptions;
use crate::projection::Projection;

/// Command-line arguments for geogof
#[derive(Parser, Debug)]
#[command(name = "geogof")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to JSON configuration file
    #[arg(short, long, env = "GEOGOF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GEOGOF_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: CommandArgs,
}

/// Input file and dataset options shared by all commands
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Point data: a JSON array of records or a NetCDF file
    pub input: PathBuf,

    /// NetCDF variable to read
    #[arg(long)]
    pub variable: Option<String>,

    /// Latitude column name
    #[arg(long)]
    pub lat: Option<String>,

    /// Longitude column name
    #[arg(long)]
    pub lon: Option<String>,

    /// Objective (value) column name
    #[arg(long)]
    pub obj: Option<String>,

    /// Raise objective values below this bound
    #[arg(long, allow_hyphen_values = true)]
    pub lower_clip: Option<f64>,

    /// Lower objective values above this bound
    #[arg(long, allow_hyphen_values = true)]
    pub upper_clip: Option<f64>,

    /// Replacement for missing objective values
    #[arg(long, allow_hyphen_values = true)]
    pub fill_na: Option<f64>,
}

/// Subcommands as parsed from the command line
#[derive(Subcommand, Debug)]
pub enum CommandArgs {
    /// Render the static point plot to a PNG file
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Output PNG path
        #[arg(short, long, default_value = "plot.png")]
        output: PathBuf,

        /// GeoJSON outline drawn beneath the points
        #[arg(long)]
        outline: Option<PathBuf>,

        /// Projection (laea, laea:<lon>,<lat>, platecarree[:<lon>], eurocentric, americas, pacific)
        #[arg(long)]
        projection: Option<String>,

        /// Image width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Image height in pixels
        #[arg(long)]
        height: Option<u32>,
    },

    /// Export the styled interactive layer as GeoJSON
    Layer {
        #[command(flatten)]
        input: InputArgs,

        /// Output GeoJSON path
        #[arg(short, long, default_value = "layer.geojson")]
        output: PathBuf,
    },

    /// Serve the interactive map and plot over HTTP
    Serve {
        #[command(flatten)]
        input: InputArgs,

        /// Host address to bind to
        #[arg(short = 'H', long, env = "GEOGOF_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "GEOGOF_PORT")]
        port: Option<u16>,

        /// GeoJSON outline drawn beneath the points in /plot
        #[arg(long)]
        outline: Option<PathBuf>,
    },
}

/// What to run once configuration is resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Render {
        input: PathBuf,
        output: PathBuf,
        outline: Option<PathBuf>,
    },
    Layer {
        input: PathBuf,
        output: PathBuf,
    },
    Serve {
        input: PathBuf,
        outline: Option<PathBuf>,
    },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Data loading and conditioning configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Column names and conditioning
    #[serde(flatten)]
    pub options: DatasetOptions,

    /// NetCDF variable to read
    #[serde(default)]
    pub variable: Option<String>,
}

/// Static plot configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Canvas and marker options
    #[serde(flatten)]
    pub plot: PlotOptions,

    /// Projection description; `None` centres LAEA on the data
    #[serde(default)]
    pub projection: Option<String>,
}

impl RenderConfig {
    /// Parse the configured projection, if any
    pub fn projection(&self) -> Result<Option<Projection>> {
        self.projection
            .as_deref()
            .map(Projection::parse_projection)
            .transpose()
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data configuration
    #[serde(default)]
    pub dataset: DataConfig,

    /// Render configuration
    #[serde(default)]
    pub render: RenderConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Command)> {
        Self::from_args(Args::parse())
    }

    /// Resolve configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, Command)> {
        let mut config = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => Config::default(),
        };

        if let Some(level) = args.log_level {
            config.log_level = level;
        }

        let command = match args.command {
            CommandArgs::Render {
                input,
                output,
                outline,
                projection,
                width,
                height,
            } => {
                config.apply_input(&input);
                if projection.is_some() {
                    config.render.projection = projection;
                }
                if let Some(width) = width {
                    config.render.plot.width = width;
                }
                if let Some(height) = height {
                    config.render.plot.height = height;
                }
                Command::Render {
                    input: input.input,
                    output,
                    outline,
                }
            }
            CommandArgs::Layer { input, output } => {
                config.apply_input(&input);
                Command::Layer {
                    input: input.input,
                    output,
                }
            }
            CommandArgs::Serve {
                input,
                host,
                port,
                outline,
            } => {
                config.apply_input(&input);
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                Command::Serve {
                    input: input.input,
                    outline,
                }
            }
        };

        Ok((config, command))
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn apply_input(&mut self, input: &InputArgs) {
        let options = &mut self.dataset.options;
        if let Some(lat) = &input.lat {
            options.lat_name = lat.clone();
        }
        if let Some(lon) = &input.lon {
            options.lon_name = lon.clone();
        }
        if let Some(obj) = &input.obj {
            options.obj_name = obj.clone();
        }
        if input.lower_clip.is_some() {
            options.lower_clip = input.lower_clip;
        }
        if input.upper_clip.is_some() {
            options.upper_clip = input.upper_clip;
        }
        if let Some(fill) = input.fill_na {
            options.fill_na_value = fill;
        }
        if input.variable.is_some() {
            self.dataset.variable = input.variable.clone();
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let options = &self.dataset.options;
        let names = [&options.lat_name, &options.lon_name, &options.obj_name];

        if names.iter().any(|n| n.is_empty()) {
            return Err(GeogofError::Config {
                message: "Column names cannot be empty".to_string(),
            });
        }

        if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
            return Err(GeogofError::Config {
                message: format!(
                    "Latitude, longitude and objective columns must differ: {}, {}, {}",
                    names[0], names[1], names[2]
                ),
            });
        }

        for (name, bound) in [
            ("lower_clip", options.lower_clip),
            ("upper_clip", options.upper_clip),
            ("fill_na_value", Some(options.fill_na_value)),
        ] {
            if let Some(value) = bound {
                if !value.is_finite() {
                    return Err(GeogofError::Config {
                        message: format!("{} must be finite, got {}", name, value),
                    });
                }
            }
        }

        self.render.plot.validate().map_err(|e| GeogofError::Config {
            message: e.to_string(),
        })?;
        self.render.projection().map_err(|e| GeogofError::Config {
            message: e.to_string(),
        })?;

        if self.server.host.is_empty() {
            return Err(GeogofError::Config {
                message: "Server host cannot be empty".to_string(),
            });
        }

        // 0 would bind an ephemeral port
        if self.server.port == 0 {
            return Err(GeogofError::Config {
                message: "Server port cannot be 0".to_string(),
            });
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(GeogofError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DataConfig::default(),
            render: RenderConfig::default(),
            server: ServerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn parse(argv: &[&str]) -> (Config, Command) {
        Config::from_args(Args::try_parse_from(argv).unwrap()).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.dataset.options.lat_name, "lat");
        assert_eq!(config.dataset.options.obj_name, "obj");
        assert_eq!(config.dataset.options.fill_na_value, 0.0);
        assert_eq!(config.render.plot.width, 800);
        assert_eq!(config.render.projection, None);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_render_args_override() {
        let (config, command) = parse(&[
            "geogof",
            "render",
            "points.json",
            "--obj",
            "release",
            "--lower-clip",
            "-5",
            "--width",
            "320",
            "--projection",
            "platecarree",
        ]);

        assert_eq!(config.dataset.options.obj_name, "release");
        assert_eq!(config.dataset.options.lower_clip, Some(-5.0));
        assert_eq!(config.render.plot.width, 320);
        assert_eq!(config.render.plot.height, 600);
        assert_eq!(
            command,
            Command::Render {
                input: PathBuf::from("points.json"),
                output: PathBuf::from("plot.png"),
                outline: None,
            }
        );
    }

    #[test]
    fn test_file_then_args() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geogof.json");
        std::fs::write(
            &path,
            r#"{
                "dataset": {"lat_name": "y", "upper_clip": 10, "variable": "t2m"},
                "render": {"height": 200, "projection": "laea:0,45"},
                "server": {"port": 9000},
                "log_level": "debug"
            }"#,
        )
        .unwrap();

        let config_arg = path.to_str().unwrap();
        let (config, command) = parse(&[
            "geogof", "--config", config_arg, "serve", "grid.nc", "--port", "9100",
        ]);

        assert_eq!(config.dataset.options.lat_name, "y");
        assert_eq!(config.dataset.options.lon_name, "lon");
        assert_eq!(config.dataset.options.upper_clip, Some(10.0));
        assert_eq!(config.dataset.variable.as_deref(), Some("t2m"));
        assert_eq!(config.render.plot.height, 200);
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.log_level, "debug");
        assert!(matches!(command, Command::Serve { .. }));
        assert!(config.render.projection().unwrap().is_some());
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.dataset.options.obj_name = "lat".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dataset.options.lon_name = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dataset.options.lower_clip = Some(f64::INFINITY);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.render.plot.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.render.plot.marker_radius = u32::MAX;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.render.projection = Some("mercator".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.host = "".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }
}
