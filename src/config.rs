//! User configuration loaded from TOML.
//!
//! Lookup order: `--config PATH`, `$CASTE_CONFIG`, the user config dir,
//! then [`SYSTEM_CONFIG_PATH`]. A missing default file means defaults; a
//! file the user pointed at explicitly must exist.

use crate::data::{gib, GpuKind, HardwareFacts, GIB};
use crate::error::{CasteError, Result};
use dirs::config_dir;
use serde::Deserialize;
use std::{env, fs, path::{Path, PathBuf}};
use tracing::debug;

pub const CONFIG_ENV: &str = "CASTE_CONFIG";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/caste/config.toml";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub overrides: Overrides,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Print the reason trail even without `--reason`
    pub reason: bool,
    pub separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            reason: false,
            separator: ": ".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset, e.g. `warn` or `caste=debug`
    pub level: Option<String>,
}

/// Hand corrections for facts the probe gets wrong (VMs, exotic drivers).
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    pub ram_gib: Option<u64>,
    pub physical_cores: Option<u32>,
    pub logical_threads: Option<u32>,
    pub gpu_kind: Option<GpuKind>,
    /// Ignored unless the resulting GPU kind is discrete
    pub vram_gib: Option<u64>,
    pub vendor_special: Option<bool>,
    /// Applied last; `true` wins over `gpu_kind`
    pub unified_memory: Option<bool>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Overrides::default()
    }

    /// Reject sizes that do not fit in a byte count.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [("ram_gib", self.ram_gib), ("vram_gib", self.vram_gib)] {
            if let Some(n) = value {
                if n.checked_mul(GIB).is_none() {
                    return Err(CasteError::Config(format!(
                        "overrides.{} = {} is too large",
                        key, n
                    )));
                }
            }
        }
        Ok(())
    }

    /// Replace probed values and re-establish the data-model invariants.
    pub fn apply(&self, facts: HardwareFacts) -> HardwareFacts {
        let mut hw = facts;
        if let Some(ram) = self.ram_gib {
            hw.ram_bytes = gib(ram);
        }
        if let Some(cores) = self.physical_cores {
            hw.physical_cores = cores;
        }
        if let Some(threads) = self.logical_threads {
            hw.logical_threads = threads;
        }
        if let Some(kind) = self.gpu_kind {
            hw.gpu.kind = kind;
            if kind != GpuKind::Unified {
                hw.is_unified_memory_platform = false;
            }
        }
        if let Some(vram) = self.vram_gib {
            hw.gpu.vram_bytes = gib(vram);
        }
        if let Some(hint) = self.vendor_special {
            hw.gpu.has_vendor_arc_hint = hint;
        }
        hw.gpu = hw.gpu.normalized();
        if let Some(unified) = self.unified_memory {
            hw = hw.with_unified_memory(unified);
        }
        if !self.is_empty() {
            debug!(overrides = ?self, "applied hardware overrides");
        }
        hw
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("caste/config.toml"))
}

/// Parse config text.
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::de::from_str(text)?;
    config.overrides.validate()?;
    Ok(config)
}

/// Read and parse one config file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .map_err(|err| CasteError::Config(format!("cannot read {}: {}", path.display(), err)))?;
    parse_config(&text)
        .map_err(|err| CasteError::Config(format!("{}: {}", path.display(), err)))
}

/// Load the effective configuration.
pub fn load_config(explicit: Option<&str>) -> Result<Config> {
    let explicit = explicit
        .map(str::to_string)
        .or_else(|| env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty()));

    if let Some(path) = explicit {
        let path = PathBuf::from(shellexpand::tilde(&path).into_owned());
        return load_config_from(&path);
    }

    let candidates = user_config_path()
        .into_iter()
        .chain(std::iter::once(PathBuf::from(SYSTEM_CONFIG_PATH)));
    for path in candidates {
        if path.exists() {
            debug!(path = %path.display(), "loading config");
            return load_config_from(&path);
        }
    }
    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GpuSummary;

    #[test]
    fn empty_file_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.separator, ": ");
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn full_file_parses() {
        let config = parse_config(
            r#"
[output]
reason = true
separator = " - "

[logging]
level = "debug"

[overrides]
ram_gib = 32
physical_cores = 8
gpu_kind = "discrete"
vram_gib = 24
"#,
        )
        .unwrap();
        assert!(config.output.reason);
        assert_eq!(config.output.separator, " - ");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.overrides.gpu_kind, Some(GpuKind::Discrete));
        assert_eq!(config.overrides.vram_gib, Some(24));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config("[overrides]\nram_gb = 32\n").unwrap_err();
        assert!(matches!(err, CasteError::Config(_)));
    }

    #[test]
    fn bad_gpu_kind_is_rejected() {
        assert!(parse_config("[overrides]\ngpu_kind = \"dedicated\"\n").is_err());
    }

    #[test]
    fn overrides_keep_invariants() {
        let probed = HardwareFacts::new(gib(16), 4, 8, GpuSummary::discrete(gib(8)));

        let integrated = Overrides {
            gpu_kind: Some(GpuKind::Integrated),
            ..Default::default()
        }
        .apply(probed);
        assert_eq!(integrated.gpu.vram_bytes, 0);
        assert!(!integrated.gpu.has_discrete);

        let unified = Overrides {
            gpu_kind: Some(GpuKind::Discrete),
            unified_memory: Some(true),
            ..Default::default()
        }
        .apply(probed);
        assert_eq!(unified.gpu.kind, GpuKind::Unified);
        assert!(unified.is_unified_memory_platform);
    }

    #[test]
    fn overrides_replace_scalars() {
        let probed = HardwareFacts::default();
        let hw = Overrides {
            ram_gib: Some(64),
            physical_cores: Some(16),
            logical_threads: Some(32),
            gpu_kind: Some(GpuKind::Discrete),
            vram_gib: Some(24),
            ..Default::default()
        }
        .apply(probed);
        assert_eq!(hw.ram_bytes, gib(64));
        assert_eq!(hw.gpu, GpuSummary::discrete(gib(24)));
        assert_eq!(hw.logical_threads, 32);
    }

    #[test]
    fn oversized_override_is_a_config_error() {
        let err = parse_config("[overrides]\nram_gib = 20000000000\n").unwrap_err();
        assert!(matches!(err, CasteError::Config(_)));
        assert!(err.to_string().contains("ram_gib"));

        let err = parse_config("[overrides]\nvram_gib = 18446744073709551615\n").unwrap_err();
        assert!(err.to_string().contains("vram_gib"));
    }

    #[test]
    fn oversized_override_saturates_when_applied_directly() {
        let hw = Overrides {
            ram_gib: Some(20_000_000_000),
            ..Default::default()
        }
        .apply(HardwareFacts::default());
        assert_eq!(hw.ram_bytes, u64::MAX);
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\nreason = true\n").unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert!(config.output.reason);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config(Some("/nonexistent/caste.toml")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
