//! Timetable configuration.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::clock::parse_clock;
use crate::day::DayMatching;
use crate::error::{TimetableError, TimetableResult};
use crate::mapper::{DEFAULT_REFERENCE_MONDAY, ReferenceWeek, WeekView};

static DEFAULT_DATA_DIR: &str = "~/.local/share/timetable";
static DEFAULT_LISTEN: &str = "127.0.0.1:5001";
static DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5001";

/// What `DELETE /api/slots/{id}` answers for an id that doesn't exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeletePolicy {
    /// Report success whether or not the slot existed.
    #[default]
    Idempotent,
    /// Answer 404 when there was nothing to delete.
    ReportMissing,
}

/// Configuration at ~/.config/timetable/config.toml, overridable with
/// `TIMETABLE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    /// Directory of the slot collection.
    pub data_dir: PathBuf,
    /// Address the server listens on.
    pub listen: String,
    /// Base URL the client talks to.
    pub server_url: String,
    pub reference_monday: NaiveDate,
    pub day_start: String,
    pub day_end: String,
    pub step_minutes: u32,
    pub delete_policy: DeletePolicy,
    pub case_insensitive_days: bool,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        TimetableConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            listen: DEFAULT_LISTEN.to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            reference_monday: ReferenceWeek::default().monday(),
            day_start: "08:00".to_string(),
            day_end: "18:00".to_string(),
            step_minutes: 30,
            delete_policy: DeletePolicy::default(),
            case_insensitive_days: false,
        }
    }
}

impl TimetableConfig {
    pub fn config_path() -> TimetableResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TimetableError::Config("Could not determine config directory".into()))?
            .join("timetable");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template there
    /// first if it doesn't exist yet.
    pub fn load() -> TimetableResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> TimetableResult<Self> {
        let config: TimetableConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("TIMETABLE").try_parsing(true))
            .build()
            .map_err(|e| TimetableError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TimetableError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> TimetableResult<()> {
        let view = self.week_view()?;
        if view.day_end <= view.day_start {
            return Err(TimetableError::Config(format!(
                "day_end ({}) must be after day_start ({})",
                self.day_end, self.day_start
            )));
        }
        if self.step_minutes == 0 {
            return Err(TimetableError::Config("step_minutes must be positive".into()));
        }
        Ok(())
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn day_matching(&self) -> DayMatching {
        if self.case_insensitive_days {
            DayMatching::CaseInsensitive
        } else {
            DayMatching::Exact
        }
    }

    pub fn reference_week(&self) -> TimetableResult<ReferenceWeek> {
        Ok(ReferenceWeek::new(self.reference_monday)
            .map_err(|e| TimetableError::Config(e.to_string()))?
            .with_day_matching(self.day_matching()))
    }

    pub fn week_view(&self) -> TimetableResult<WeekView> {
        let bad_time = |e: TimetableError| TimetableError::Config(e.to_string());

        Ok(WeekView {
            week: self.reference_week()?,
            day_start: parse_clock(&self.day_start).map_err(bad_time)?,
            day_end: parse_clock(&self.day_end).map_err(bad_time)?,
            step_minutes: self.step_minutes,
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TimetableResult<()> {
        let contents = format!(
            "\
# timetable configuration

# Where the slot collection is stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Server listen address, and the URL the client uses to reach it:
# listen = \"{DEFAULT_LISTEN}\"
# server_url = \"{DEFAULT_SERVER_URL}\"

# Week the calendar grid is drawn on, and its visible hours:
# reference_monday = \"{DEFAULT_REFERENCE_MONDAY}\"
# day_start = \"08:00\"
# day_end = \"18:00\"
# step_minutes = 30

# Answer for deleting a slot that doesn't exist: \"idempotent\" or \"report-missing\"
# delete_policy = \"idempotent\"

# Match day names like \"monday\" as \"Monday\":
# case_insensitive_days = false
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TimetableError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TimetableError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
