//! Campaign URL lookup table.
//!
//! Each advocacy campaign maps a URL matcher to a subject and body template.
//! Entries are tried in order and the first match wins; a fallback template
//! applies when nothing matches.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Placeholders a template may reference
pub const PLACEHOLDERS: &[&str] = &["title", "first_name", "last_name", "message", "campaign_url"];

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([A-Za-z_]+)\}").expect("valid placeholder pattern"))
}

/// How a campaign URL is recognised, as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    Exact(String),
    Contains(String),
    Pattern(String),
}

/// Compiled campaign URL matcher
#[derive(Debug, Clone)]
pub enum UrlMatcher {
    Exact(String),
    Contains(String),
    Pattern(Regex),
}

impl UrlMatcher {
    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlMatcher::Exact(expected) => url == expected,
            UrlMatcher::Contains(fragment) => url.contains(fragment.as_str()),
            UrlMatcher::Pattern(regex) => regex.is_match(url),
        }
    }

    /// Human-readable description of the matcher
    pub fn describe(&self) -> String {
        match self {
            UrlMatcher::Exact(expected) => format!("exact: {}", expected),
            UrlMatcher::Contains(fragment) => format!("contains: {}", fragment),
            UrlMatcher::Pattern(regex) => format!("pattern: {}", regex.as_str()),
        }
    }
}

impl TryFrom<&MatchRule> for UrlMatcher {
    type Error = Error;

    fn try_from(rule: &MatchRule) -> Result<Self> {
        Ok(match rule {
            MatchRule::Exact(url) => UrlMatcher::Exact(url.clone()),
            MatchRule::Contains(fragment) => {
                if fragment.is_empty() {
                    return Err(Error::Config(
                        "Empty 'contains' matcher would match every campaign".to_string(),
                    ));
                }
                UrlMatcher::Contains(fragment.clone())
            }
            MatchRule::Pattern(pattern) => UrlMatcher::Pattern(Regex::new(pattern)?),
        })
    }
}

/// A text template with `{placeholder}` substitutions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(String);

impl Template {
    /// Parse a template, rejecting unknown placeholders
    pub fn parse(source: &str) -> Result<Self> {
        for cap in placeholder_regex().captures_iter(source) {
            let name = &cap[1];
            if !PLACEHOLDERS.contains(&name) {
                return Err(Error::Template(format!(
                    "Unknown placeholder '{{{}}}'. Allowed placeholders are: {}",
                    name,
                    PLACEHOLDERS.join(", ")
                )));
            }
        }
        Ok(Self(source.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute placeholders in a single pass, so substituted values are
    /// never expanded again
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        placeholder_regex()
            .replace_all(&self.0, |cap: &regex::Captures| {
                vars.get(&cap[1])
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| cap[0].to_string())
            })
            .into_owned()
    }
}

/// Subject and body templates, as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub subject: String,
    pub body: String,
}

/// One campaign table entry, as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSpec {
    #[serde(rename = "match", with = "serde_yaml::with::singleton_map")]
    pub rule: MatchRule,
    pub subject: String,
    pub body: String,
}

/// Compiled subject and body templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignTemplate {
    pub subject: Template,
    pub body: Template,
}

impl CampaignTemplate {
    pub fn parse(subject: &str, body: &str) -> Result<Self> {
        Ok(Self {
            subject: Template::parse(subject)?,
            body: Template::parse(body)?,
        })
    }
}

impl TryFrom<&TemplateSpec> for CampaignTemplate {
    type Error = Error;

    fn try_from(spec: &TemplateSpec) -> Result<Self> {
        CampaignTemplate::parse(&spec.subject, &spec.body)
    }
}

/// A matcher together with the templates it selects
#[derive(Debug, Clone)]
pub struct Campaign {
    pub matcher: UrlMatcher,
    pub template: CampaignTemplate,
}

impl TryFrom<&CampaignSpec> for Campaign {
    type Error = Error;

    fn try_from(spec: &CampaignSpec) -> Result<Self> {
        Ok(Self {
            matcher: UrlMatcher::try_from(&spec.rule)?,
            template: CampaignTemplate::parse(&spec.subject, &spec.body)?,
        })
    }
}

/// Ordered campaign table with a fallback template
#[derive(Debug, Clone)]
pub struct CampaignTable {
    entries: Vec<Campaign>,
    fallback: CampaignTemplate,
}

impl CampaignTable {
    pub fn new(entries: Vec<Campaign>, fallback: CampaignTemplate) -> Self {
        Self { entries, fallback }
    }

    /// The built-in Affordable Housing Online campaigns
    pub fn builtin() -> Self {
        Self::new(builtin_campaigns(), builtin_fallback())
    }

    /// Templates for a campaign URL; the fallback when no entry matches
    pub fn lookup(&self, campaign_url: &str) -> &CampaignTemplate {
        self.entries
            .iter()
            .find(|campaign| campaign.matcher.matches(campaign_url))
            .map(|campaign| &campaign.template)
            .unwrap_or(&self.fallback)
    }

    pub fn entries(&self) -> &[Campaign] {
        &self.entries
    }

    pub fn fallback(&self) -> &CampaignTemplate {
        &self.fallback
    }
}

impl Default for CampaignTable {
    fn default() -> Self {
        Self::builtin()
    }
}

const SALUTATION: &str = "Dear {title} {last_name}, \n";

fn builtin_template(subject: &str, body: &str) -> CampaignTemplate {
    CampaignTemplate {
        subject: Template(subject.to_string()),
        body: Template(format!("{}{}{{message}}", SALUTATION, body)),
    }
}

fn builtin_campaigns() -> Vec<Campaign> {
    vec![
        Campaign {
            matcher: UrlMatcher::Exact(
                "https://affordablehousingonline.com/advocacy/issues/fy19-hud-budget".to_string(),
            ),
            template: builtin_template(
                "Ignore Trump Budget and Fully Fund Housing Programs",
                concat!(
                    "The FY19 Trump Budget came out on February 12, 2018 and proposes to decimate ",
                    "affordable housing funding. Historically productive programs like Section 8 ",
                    "Housing Choice Vouchers, Public Housing and CDBG/HOME are being drastically ",
                    "reduced or eliminated.\n\n",
                    " Please, please, please. Ignore the Trump Budget and do the right thing by ",
                    "fully funding the HUD budget. \n\n",
                    " For more info and analysis, see this page on Affordable Housing Online: ",
                    "https://affordablehousingonline.com/fy19-hud-budget-cuts",
                    "?utm_source=email&utm_medium=advocacy_dio&utm_campaign=embedlink \n\n",
                ),
            ),
        },
        Campaign {
            matcher: UrlMatcher::Exact(
                "https://affordablehousingonline.com/advocacy/issues/affordable-housing-credit-improvement-act"
                    .to_string(),
            ),
            template: builtin_template(
                "Include Provisions of S.548 in Budget Deal",
                concat!(
                    "S.548, the Affordable Housing Credit Improvement Act (sponsored by Senators ",
                    "Maria Cantwell and Orrin Hatch) is bipartisan legislation that will increase ",
                    "the production of affordable rental housing while stimulating economic growth ",
                    "in the construction sector. The Senate is now considering making the ",
                    "provisions of S.548 part of the budget deal now being negotiated.\n\n",
                    "Please help increase housing production and stimulate our local economy by ",
                    "asking Senate and House leadership to include the provisions of S.548 in the ",
                    "budget deal \n\n",
                ),
            ),
        },
        Campaign {
            matcher: UrlMatcher::Exact(
                "https://affordablehousingonline.com/advocacy/issues/2017-tax-reform-bill"
                    .to_string(),
            ),
            template: builtin_template(
                "2017 Tax Reform Hurts Low-Income Renters",
                concat!(
                    "The tax reform legislation currently under consideration by Congress will ",
                    "harm low-income renters in America. Low-income housing is already hard to ",
                    "find and obtain. Please don\u{2019}t make it harder. Please vote \u{201c}No\u{201d} ",
                    "on any tax reform legislation that comes before you that doesn\u{2019}t ",
                    "consider low-income Americans and their struggle to find affordable housing. ",
                    "You can read more about how the legislation impacts low-income renters here:\n",
                    " https://affordablehousingonline.com/blog/proposed-tax-reform-not-good-low-income-renters. \n",
                ),
            ),
        },
    ]
}

fn builtin_fallback() -> CampaignTemplate {
    builtin_template(
        "Affordable Housing Data",
        "This web page has interesting data regarding affordable housing for our area:\n {campaign_url}. \n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_parse() {
        let table = CampaignTable::builtin();
        for campaign in table.entries() {
            assert_eq!(
                CampaignTemplate::parse(
                    campaign.template.subject.as_str(),
                    campaign.template.body.as_str()
                )
                .unwrap(),
                campaign.template
            );
        }
        assert!(Template::parse(table.fallback().body.as_str()).is_ok());
        assert_eq!(table.entries().len(), 3);
    }

    #[test]
    fn test_lookup_exact_matches() {
        let table = CampaignTable::builtin();
        let template =
            table.lookup("https://affordablehousingonline.com/advocacy/issues/2017-tax-reform-bill");
        assert_eq!(
            template.subject.as_str(),
            "2017 Tax Reform Hurts Low-Income Renters"
        );

        // Exact matchers do not fire on a longer URL
        let template = table
            .lookup("https://affordablehousingonline.com/advocacy/issues/2017-tax-reform-bill?x=1");
        assert_eq!(template.subject.as_str(), "Affordable Housing Data");
    }

    #[test]
    fn test_contains_and_pattern_matchers() {
        let contains = UrlMatcher::try_from(&MatchRule::Contains("hud-budget".to_string())).unwrap();
        assert!(contains.matches("https://example.org/issues/fy20-hud-budget"));
        assert!(!contains.matches("https://example.org/issues/tax"));

        let pattern =
            UrlMatcher::try_from(&MatchRule::Pattern(r"/issues/fy\d{2}-hud".to_string())).unwrap();
        assert!(pattern.matches("https://example.org/issues/fy21-hud-budget"));
        assert!(!pattern.matches("https://example.org/issues/fyxx-hud-budget"));
        assert_eq!(pattern.describe(), r"pattern: /issues/fy\d{2}-hud");
    }

    #[test]
    fn test_invalid_matchers_rejected() {
        assert!(matches!(
            UrlMatcher::try_from(&MatchRule::Pattern("(unclosed".to_string())),
            Err(Error::Regex(_))
        ));
        assert!(matches!(
            UrlMatcher::try_from(&MatchRule::Contains(String::new())),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let specs = vec![
            CampaignSpec {
                rule: MatchRule::Contains("housing".to_string()),
                subject: "first".to_string(),
                body: "{message}".to_string(),
            },
            CampaignSpec {
                rule: MatchRule::Contains("housing-credit".to_string()),
                subject: "second".to_string(),
                body: "{message}".to_string(),
            },
        ];
        let entries = specs
            .iter()
            .map(Campaign::try_from)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        let table = CampaignTable::new(entries, CampaignTemplate::parse("none", "{message}").unwrap());

        assert_eq!(table.lookup("/housing-credit").subject.as_str(), "first");
        assert_eq!(table.lookup("/tax").subject.as_str(), "none");
    }

    #[test]
    fn test_campaign_spec_match_forms_from_yaml() {
        let specs: Vec<CampaignSpec> = serde_yaml::from_str(
            r#"
- match:
    exact: "https://example.org/a"
  subject: "A"
  body: "{message}"
- match: { contains: "/issues/" }
  subject: "B"
  body: "{message}"
- match:
    pattern: "fy\\d+"
  subject: "C"
  body: "{message}"
"#,
        )
        .unwrap();

        assert_eq!(specs[0].rule, MatchRule::Exact("https://example.org/a".to_string()));
        assert_eq!(specs[1].rule, MatchRule::Contains("/issues/".to_string()));
        assert_eq!(specs[2].rule, MatchRule::Pattern(r"fy\d+".to_string()));

        let yaml = serde_yaml::to_string(&specs[1]).unwrap();
        let back: CampaignSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, specs[1]);
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let err = Template::parse("Dear {title} {nickname}").unwrap_err();
        assert!(err.to_string().contains("nickname"));
    }

    #[test]
    fn test_render_single_pass() {
        let template = Template::parse("Dear {title} {last_name}, {message}").unwrap();
        let vars = HashMap::from([
            ("title", "Rep"),
            ("last_name", "Quigley"),
            ("message", "see {title}"),
        ]);
        assert_eq!(template.render(&vars), "Dear Rep Quigley, see {title}");
    }
}
