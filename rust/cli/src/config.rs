//! Layered CLI configuration: defaults, then the TOML file named by
//! `LOWDRAW_CONFIG`, then `LOWDRAW_*` environment variables. Command-line
//! flags override all three in the individual commands.

use lowdraw_ai::POLICY_NAMES;
use lowdraw_engine::hand::TieRule;
use lowdraw_engine::rules::BettingStructure;
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_ENV: &str = "LOWDRAW_CONFIG";
pub const SEED_ENV: &str = "LOWDRAW_SEED";
pub const STACK_ENV: &str = "LOWDRAW_STARTING_STACK";
pub const TIE_RULE_ENV: &str = "LOWDRAW_TIE_RULE";
pub const POLICY_ENV: &str = "LOWDRAW_POLICY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub starting_stack: u32,
    pub seed: Option<u64>,
    pub tie_rule: TieRule,
    pub policy: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub starting_stack: ValueSource,
    pub seed: ValueSource,
    pub tie_rule: ValueSource,
    pub policy: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_stack: ValueSource::Default,
            seed: ValueSource::Default,
            tie_rule: ValueSource::Default,
            policy: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_stack: 100,
            seed: None,
            tie_rule: TieRule::default(),
            policy: "baseline".into(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.tie_rule {
            cfg.tie_rule = v;
            sources.tie_rule = ValueSource::File;
        }
        if let Some(v) = f.policy {
            cfg.policy = v;
            sources.policy = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var(SEED_ENV)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {}", seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(stack) = std::env::var(STACK_ENV)
        && !stack.is_empty()
    {
        cfg.starting_stack = stack
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid starting stack: {}", stack)))?;
        sources.starting_stack = ValueSource::Env;
    }
    if let Ok(rule) = std::env::var(TIE_RULE_ENV)
        && !rule.is_empty()
    {
        cfg.tie_rule = TieRule::parse(&rule)
            .ok_or_else(|| ConfigError::Invalid(format!("Invalid tie rule: {}", rule)))?;
        sources.tie_rule = ValueSource::Env;
    }
    if let Ok(policy) = std::env::var(POLICY_ENV)
        && !policy.is_empty()
    {
        cfg.policy = policy;
        sources.policy = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    tie_rule: Option<TieRule>,
    #[serde(default)]
    policy: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let required = BettingStructure::default().max_exposure();
    if cfg.starting_stack < required {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: starting_stack must be >= {} to cover a hand",
            required
        )));
    }
    let policy = cfg.policy.trim().to_ascii_lowercase();
    if !POLICY_NAMES.contains(&policy.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: unknown policy '{}' (expected one of: {})",
            cfg.policy,
            POLICY_NAMES.join(", ")
        )));
    }
    Ok(())
}
