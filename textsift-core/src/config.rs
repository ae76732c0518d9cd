//! Configuration management for `textsift-core`.
//!
//! This module defines the core data structures for recognizer rules and
//! engine configuration. It handles serialization/deserialization of YAML
//! configurations and provides utilities for loading, merging, and
//! validating these configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::recognizers::compiler::substitute_marker;

/// Maximum allowed length for a recognizer pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Currency marker used when the configuration does not specify one.
pub const DEFAULT_CURRENCY_MARKER: &str = "Rwf";

/// The fixed set of entity categories the engine recognizes.
///
/// Each kind maps to exactly one recognizer rule; the mapping is immutable
/// once the rules are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Email,
    Url,
    PhoneNumber,
    CreditCard,
    Time,
    CurrencyAmount,
}

impl EntityKind {
    /// All kinds, in the order results are reported.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Email,
        EntityKind::Url,
        EntityKind::PhoneNumber,
        EntityKind::CreditCard,
        EntityKind::Time,
        EntityKind::CurrencyAmount,
    ];

    /// The snake_case wire name of the kind (singular form).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Email => "email",
            EntityKind::Url => "url",
            EntityKind::PhoneNumber => "phone_number",
            EntityKind::CreditCard => "credit_card",
            EntityKind::Time => "time",
            EntityKind::CurrencyAmount => "currency_amount",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_author() -> String {
    "Relay Team".to_string()
}

/// Represents a single recognizer rule used by the extraction engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RecognizerRule {
    /// The entity kind this rule recognizes.
    pub kind: EntityKind,
    /// Human-readable description of what the rule targets.
    #[serde(default)]
    pub description: Option<String>,
    /// The regex pattern string. May contain the `{marker}` placeholder,
    /// which is substituted with the escaped currency marker at compile time.
    pub pattern: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_author")]
    pub author: String,
    /// If true, enables multiline mode for the regex engine.
    #[serde(default)]
    pub multiline: bool,
    /// If true, the dot character `.` in regex will match newlines.
    #[serde(default)]
    pub dot_matches_new_line: bool,
    /// If true, matches are passed through the email local-part mask
    /// before reporting.
    #[serde(default)]
    pub mask_output: bool,
    /// If true, the rule is disabled unless explicitly enabled.
    #[serde(default)]
    pub opt_in: bool,
    /// Explicit override for enabling/disabling the rule.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Configuration settings specific to the CurrencyAmount recognizer.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CurrencyConfig {
    /// The literal currency marker prefixing amounts (e.g. `Rwf` or `$`).
    /// Escaped and substituted into the rule's `{marker}` placeholder.
    pub marker: Option<String>,
}

/// Container for all recognizer-specific configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct RecognizerSettings {
    pub currency: CurrencyConfig,
}

/// Represents the top-level configuration structure for TextSift.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// One recognizer rule per entity kind.
    pub rules: Vec<RecognizerRule>,
    /// Recognizer-specific settings (currency marker).
    #[serde(default)]
    pub recognizers: RecognizerSettings,
}

impl ExtractionConfig {
    /// Loads recognizer rules from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom recognizer rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ExtractionConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_rules(&config.rules, config.currency_marker())?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());

        Ok(config)
    }

    /// Loads the default recognizer rules from the embedded configuration.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default recognizer rules from embedded string...");
        let default_yaml = include_str!("../config/default_recognizers.yaml");
        let config: ExtractionConfig = serde_yml::from_str(default_yaml)
            .context("Failed to parse default recognizer rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// The effective currency marker for this configuration.
    pub fn currency_marker(&self) -> &str {
        self.recognizers
            .currency
            .marker
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY_MARKER)
    }

    /// Filters active rules based on enable/disable kind lists.
    ///
    /// Disabled kinds still appear in results as empty sequences; removing
    /// a rule here only means its recognizer never runs.
    pub fn set_active_kinds(&mut self, enable_kinds: &[EntityKind], disable_kinds: &[EntityKind]) {
        let enable_set: HashSet<EntityKind> = enable_kinds.iter().copied().collect();
        let disable_set: HashSet<EntityKind> = disable_kinds.iter().copied().collect();

        debug!("Initial rules count before filtering: {}", self.rules.len());

        let all_rule_kinds: HashSet<EntityKind> = self.rules.iter().map(|r| r.kind).collect();

        for kind in enable_set.difference(&all_rule_kinds) {
            warn!("Kind '{}' in the enable list has no configured rule.", kind);
        }

        for kind in disable_set.difference(&all_rule_kinds) {
            warn!("Kind '{}' in the disable list has no configured rule.", kind);
        }

        self.rules.retain(|rule| {
            !disable_set.contains(&rule.kind) && (!rule.opt_in || enable_set.contains(&rule.kind))
        });

        debug!("Final active rules count after filtering: {}", self.rules.len());
    }
}

/// Merges user-defined rules and recognizer settings with defaults.
///
/// A user rule replaces the default rule of the same kind; a user currency
/// marker overrides the default marker.
pub fn merge_configs(
    default_config: ExtractionConfig,
    user_config: Option<ExtractionConfig>,
) -> ExtractionConfig {
    debug!(
        "merge_configs called. Initial default rules count: {}",
        default_config.rules.len()
    );

    let mut final_rules_map: HashMap<EntityKind, RecognizerRule> = default_config
        .rules
        .into_iter()
        .map(|rule| (rule.kind, rule))
        .collect();

    let mut final_settings = default_config.recognizers;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
        for user_rule in user_cfg.rules {
            final_rules_map.insert(user_rule.kind, user_rule);
        }

        if let Some(user_marker) = user_cfg.recognizers.currency.marker {
            debug!("Overriding currency marker with user value: {}", user_marker);
            final_settings.currency.marker = Some(user_marker);
        }
    }

    let mut final_rules: Vec<RecognizerRule> = final_rules_map.into_values().collect();
    // Deterministic rule order regardless of map iteration.
    final_rules.sort_by_key(|r| r.kind);
    debug!("Final total rules after merge: {}", final_rules.len());

    ExtractionConfig {
        rules: final_rules,
        recognizers: final_settings,
    }
}

/// Validates rule integrity (unique kinds, pattern length, regex compilation).
///
/// Patterns are validated after marker substitution, so what is checked is
/// exactly what the compiler will build.
pub fn validate_rules(rules: &[RecognizerRule], currency_marker: &str) -> Result<()> {
    let mut rule_kinds = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if !rule_kinds.insert(rule.kind) {
            errors.push(format!("Duplicate rule for kind '{}'.", rule.kind));
        }

        if rule.pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.kind));
            continue;
        }

        if rule.pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
                rule.kind,
                rule.pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        let effective_pattern = substitute_marker(&rule.pattern, currency_marker);
        if let Err(e) = regex::Regex::new(&effective_pattern) {
            errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.kind, e));
        }
    }

    if !errors.is_empty() {
        let full_error_message = format!("Rule validation failed:\n{}", errors.join("\n"));
        Err(anyhow!(full_error_message))
    } else {
        Ok(())
    }
}
