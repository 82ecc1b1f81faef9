use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Savestate file extension, compared case-insensitively.
pub const SAVESTATE_EXTENSION: &str = "uss";

const HOME_OVERRIDE_VAR: &str = "AMIBERRY_HOME";

/// Filesystem layout of an Amiberry installation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub platform: String,
    pub emulator_binary: PathBuf,
    pub amiberry_home: PathBuf,
    pub config_dir: PathBuf,
    /// Only Linux keeps a separate XDG configuration directory.
    pub system_config_dir: Option<PathBuf>,
    pub savestate_dir: PathBuf,
    pub screenshot_dir: PathBuf,
    pub disk_image_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformInfo {
    pub platform: String,
    pub emulator_binary: String,
    pub amiberry_home: String,
    pub config_dir: String,
    pub savestate_dir: String,
    pub screenshot_dir: String,
    pub disk_image_dirs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_config_dir: Option<String>,
}

impl Config {
    /// Layout for the running platform. `AMIBERRY_HOME` replaces the default
    /// home directory.
    pub fn from_env() -> Self {
        let user_home = user_home();
        let amiberry_home = env::var_os(HOME_OVERRIDE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| user_home.join("Amiberry"));

        if cfg!(target_os = "macos") {
            Self::macos(amiberry_home)
        } else {
            let xdg_config_home = env::var_os("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| user_home.join(".config"));
            Self::linux(amiberry_home, &xdg_config_home)
        }
    }

    pub fn macos(amiberry_home: PathBuf) -> Self {
        Config {
            platform: "Darwin".to_string(),
            emulator_binary: PathBuf::from("/Applications/Amiberry.app/Contents/MacOS/Amiberry"),
            config_dir: amiberry_home.join("Configurations"),
            system_config_dir: None,
            savestate_dir: amiberry_home.join("Savestates"),
            screenshot_dir: amiberry_home.join("Screenshots"),
            disk_image_dirs: vec![
                amiberry_home.join("Floppies"),
                amiberry_home.join("Harddrives"),
                amiberry_home.join("Lha"),
            ],
            amiberry_home,
        }
    }

    pub fn linux(amiberry_home: PathBuf, xdg_config_home: &Path) -> Self {
        Config {
            platform: "Linux".to_string(),
            emulator_binary: PathBuf::from("amiberry"),
            config_dir: amiberry_home.join("conf"),
            system_config_dir: Some(xdg_config_home.join("amiberry")),
            savestate_dir: amiberry_home.join("savestates"),
            screenshot_dir: amiberry_home.join("screenshots"),
            disk_image_dirs: vec![
                amiberry_home.join("floppies"),
                amiberry_home.join("harddrives"),
                amiberry_home.join("lha"),
            ],
            amiberry_home,
        }
    }

    pub fn with_savestate_dir(mut self, savestate_dir: PathBuf) -> Self {
        self.savestate_dir = savestate_dir;
        self
    }

    pub fn platform_info(&self) -> PlatformInfo {
        PlatformInfo {
            platform: self.platform.clone(),
            emulator_binary: display(&self.emulator_binary),
            amiberry_home: display(&self.amiberry_home),
            config_dir: display(&self.config_dir),
            savestate_dir: display(&self.savestate_dir),
            screenshot_dir: display(&self.screenshot_dir),
            disk_image_dirs: self.disk_image_dirs.iter().map(|dir| display(dir)).collect(),
            system_config_dir: self.system_config_dir.as_deref().map(display),
        }
    }
}

fn user_home() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
