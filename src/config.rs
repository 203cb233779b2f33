use crate::campaign::{Campaign, CampaignSpec, CampaignTable, CampaignTemplate, MatchRule, TemplateSpec};
use crate::error::{Error, Result};
use crate::options::TopicPreference;
use crate::types::CampaignInfo;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name prefix prefilled in the form
pub const DEFAULT_PREFIX: &str = "Ms.";

/// Configuration for preparing message forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Prefix prefilled in the form, independent of user input
    pub default_prefix: String,
    /// Campaign block attached to every outgoing message
    pub campaign_info: CampaignInfo,
    /// Topic preselection heuristics
    pub topics: TopicPreference,
    /// Campaign entries tried before the built-in ones
    pub campaigns: Vec<CampaignSpec>,
    /// Append the built-in campaigns after the configured ones
    pub include_builtin_campaigns: bool,
    /// Replaces the built-in fallback template
    pub fallback_campaign: Option<TemplateSpec>,
}

impl FormConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self {
            default_prefix: DEFAULT_PREFIX.to_string(),
            campaign_info: CampaignInfo::default(),
            topics: TopicPreference::default(),
            campaigns: Vec::new(),
            include_builtin_campaigns: true,
            fallback_campaign: None,
        }
    }

    /// Parse a configuration from YAML
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: FormConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_prefix.trim().is_empty() {
            return Err(Error::Config("Default prefix must not be empty".to_string()));
        }

        if self.topics.keywords.iter().any(|k| k.is_empty()) {
            return Err(Error::Config(
                "Empty topic keyword would match every option".to_string(),
            ));
        }

        self.campaign_table().map(|_| ())
    }

    /// Compile the campaign table: configured entries first, then the
    /// built-in ones unless disabled
    pub fn campaign_table(&self) -> Result<CampaignTable> {
        let builtin = CampaignTable::builtin();

        let mut entries = self
            .campaigns
            .iter()
            .map(Campaign::try_from)
            .collect::<Result<Vec<_>>>()?;

        if self.include_builtin_campaigns {
            entries.extend(builtin.entries().iter().cloned());
        }

        let fallback = match &self.fallback_campaign {
            Some(spec) => CampaignTemplate::try_from(spec)?,
            None => builtin.fallback().clone(),
        };

        Ok(CampaignTable::new(entries, fallback))
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone, Default)]
pub struct FormConfigBuilder {
    config: FormConfig,
}

impl FormConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: FormConfig::new(),
        }
    }

    /// Set the prefilled name prefix
    pub fn default_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.default_prefix = prefix.into();
        self
    }

    /// Set the campaign block attached to outgoing messages
    pub fn campaign_info(mut self, info: CampaignInfo) -> Self {
        self.config.campaign_info = info;
        self
    }

    /// Set the topic keywords, tried in order
    pub fn topic_keywords(mut self, keywords: Vec<String>) -> Self {
        self.config.topics.keywords = keywords;
        self
    }

    /// Set the topic index used when no keyword matches
    pub fn topic_fallback_index(mut self, index: usize) -> Self {
        self.config.topics.fallback_index = index;
        self
    }

    /// Add a campaign entry ahead of the built-in ones
    pub fn add_campaign(
        mut self,
        rule: MatchRule,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.config.campaigns.push(CampaignSpec {
            rule,
            subject: subject.into(),
            body: body.into(),
        });
        self
    }

    /// Drop the built-in campaigns
    pub fn without_builtin_campaigns(mut self) -> Self {
        self.config.include_builtin_campaigns = false;
        self
    }

    /// Replace the fallback template
    pub fn fallback_campaign(mut self, subject: impl Into<String>, body: impl Into<String>) -> Self {
        self.config.fallback_campaign = Some(TemplateSpec {
            subject: subject.into(),
            body: body.into(),
        });
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<FormConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
