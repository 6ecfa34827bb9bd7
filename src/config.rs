// config.rs: viewer tunables
//
// Values come from, in order of precedence:
// - CLI: --video <path> --offset <n> --length <n>
// - Env: SPHERE_VIDEO (video path only)
// - JSON: --config <path>, else <exe_dir>/assets/viewer.json, else ./assets/viewer.json
// - Built-in defaults
//
// A missing file is fine; an unreadable or invalid one is logged and ignored.

use crate::error::ConfigError;
use crate::video::MediaSource;
use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "viewer.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub sphere_radius: f32,
    pub tetta_steps: usize,
    pub phi_steps: usize,
    /// Degrees of rotation per dragged pixel.
    pub touch_sensitivity: f32,
    /// Height of the overlay strip, percent of the viewport.
    pub overlay_percentage: f32,
    pub clear_color: [f64; 4],
    pub vsync: bool,
    pub show_hud: bool,
    pub looping: bool,
    pub video: Option<PathBuf>,
    pub video_offset: u64,
    pub video_length: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 5.0,
            tetta_steps: 10,
            phi_steps: 18,
            touch_sensitivity: 180.0 / 320.0 / 3.8,
            overlay_percentage: 20.0,
            clear_color: [0.0, 1.0, 0.0, 1.0],
            vsync: true,
            show_hud: true,
            looping: true,
            video: None,
            video_offset: 0,
            video_length: None,
        }
    }
}

impl ViewerConfig {
    /// Overlay height as a fraction of the viewport.
    pub fn split_fraction(&self) -> f32 {
        self.overlay_percentage / 100.0
    }

    pub fn media_source(&self) -> Option<MediaSource> {
        self.video.as_ref().map(|path| MediaSource {
            path: path.clone(),
            offset: self.video_offset,
            length: self.video_length,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sphere_radius.is_finite() && self.sphere_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sphere_radius must be positive, got {}",
                self.sphere_radius
            )));
        }
        if self.tetta_steps == 0 || self.phi_steps == 0 {
            return Err(ConfigError::Invalid(format!(
                "tetta_steps and phi_steps must be at least 1, got {} and {}",
                self.tetta_steps, self.phi_steps
            )));
        }
        if !(self.overlay_percentage > 0.0 && self.overlay_percentage < 100.0) {
            return Err(ConfigError::Invalid(format!(
                "overlay_percentage must be inside (0, 100), got {}",
                self.overlay_percentage
            )));
        }
        if !self.touch_sensitivity.is_finite() {
            return Err(ConfigError::Invalid("touch_sensitivity must be finite".into()));
        }
        Ok(())
    }

    /// Loads the config file (if any) and applies CLI/env overrides.
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let path = arg_value(&args, "--config").map(PathBuf::from).or_else(find_config_file);

        let mut config = match path {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring config: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        let env_video = std::env::var("SPHERE_VIDEO").ok().filter(|v| !v.trim().is_empty());
        config.apply_overrides(&args, env_video);
        config
    }

    pub fn apply_overrides(&mut self, args: &[String], env_video: Option<String>) {
        if let Some(video) = arg_value(args, "--video").or(env_video) {
            self.video = Some(PathBuf::from(video));
        }
        if let Some(offset) = arg_value(args, "--offset") {
            match offset.parse() {
                Ok(v) => self.video_offset = v,
                Err(_) => warn!("Ignoring --offset {}: not a byte count", offset),
            }
        }
        if let Some(length) = arg_value(args, "--length") {
            match length.parse() {
                Ok(v) => self.video_length = Some(v),
                Err(_) => warn!("Ignoring --length {}: not a byte count", length),
            }
        }
    }
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == flag {
            return it.next().cloned();
        }
    }
    None
}

/// Find assets/viewer.json by searching:
/// 1) <exe_dir>/assets/viewer.json
/// 2) ./assets/viewer.json  (dev working dir)
fn find_config_file() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join(CONFIG_FILE);
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from("assets").join(CONFIG_FILE);
    if p.exists() {
        return Some(p);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_match_reference_tunables() {
        let config = ViewerConfig::default();
        assert_eq!(config.sphere_radius, 5.0);
        assert_eq!((config.tetta_steps, config.phi_steps), (10, 18));
        assert!((config.touch_sensitivity - 0.148_026_3).abs() < 1e-6);
        assert!((config.split_fraction() - 0.2).abs() < 1e-6);
        assert!(config.validate().is_ok());
        assert!(config.media_source().is_none());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(r#"{ "phi_steps": 36, "vsync": false }"#).unwrap();
        assert_eq!(config.phi_steps, 36);
        assert!(!config.vsync);
        assert_eq!(config.tetta_steps, 10);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for json in [
            r#"{ "tetta_steps": 0 }"#,
            r#"{ "overlay_percentage": 100 }"#,
            r#"{ "sphere_radius": -1 }"#,
        ] {
            assert!(matches!(ViewerConfig::from_json(json), Err(ConfigError::Invalid(_))), "{}", json);
        }
        assert!(matches!(ViewerConfig::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ViewerConfig::from_file(Path::new("/nonexistent/viewer.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn cli_overrides_env_and_file() {
        let mut config = ViewerConfig::default();
        config.apply_overrides(
            &args(&["--video", "clip.gif", "--offset", "128", "--length", "4096"]),
            Some("env.gif".into()),
        );
        let source = config.media_source().unwrap();
        assert_eq!(source.path, PathBuf::from("clip.gif"));
        assert_eq!(source.offset, 128);
        assert_eq!(source.length, Some(4096));

        let mut config = ViewerConfig::default();
        config.apply_overrides(&args(&["--offset", "abc"]), Some("env.gif".into()));
        assert_eq!(config.video, Some(PathBuf::from("env.gif")));
        assert_eq!(config.video_offset, 0);
    }
}
