//! Topic and county option parsing.
//!
//! Both parsers take the raw `FormElement` declared in a legislator's contact
//! form and derive the option labels shown to the user together with a
//! preselected default.

use serde::{Deserialize, Serialize};

use crate::types::{CountySelection, FormElement, Legislator, TopicSelection};

/// Keyword heuristics used to preselect a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicPreference {
    /// Keywords tried in order; the first option containing one
    /// (case-insensitive) is selected
    pub keywords: Vec<String>,
    /// Index selected when no keyword matches
    pub fallback_index: usize,
}

impl Default for TopicPreference {
    fn default() -> Self {
        Self {
            keywords: vec!["hou".to_string(), "oth".to_string()],
            fallback_index: 1,
        }
    }
}

impl TopicPreference {
    /// Pick the default option.
    ///
    /// Returns `None` when no keyword matches and the fallback index is out of
    /// range, e.g. a single unmatched option.
    pub fn select(&self, options: &[String]) -> Option<String> {
        for keyword in &self.keywords {
            let keyword = keyword.to_lowercase();
            if let Some(found) = options
                .iter()
                .find(|option| option.to_lowercase().contains(&keyword))
            {
                return Some(found.clone());
            }
        }

        options.get(self.fallback_index).cloned()
    }
}

/// Parse out the topic options for a given legislator
pub fn parse_topic_options(topic_elem: &FormElement, legislator: &Legislator) -> TopicSelection {
    parse_topic_options_with(topic_elem, legislator, &TopicPreference::default())
}

/// Parse out the topic options using custom selection heuristics
pub fn parse_topic_options_with(
    topic_elem: &FormElement,
    legislator: &Legislator,
    preference: &TopicPreference,
) -> TopicSelection {
    let options = topic_elem.options_hash.labels();
    let selected = preference.select(&options);

    TopicSelection {
        bioguide_id: legislator.bioguide_id.clone(),
        name: format!("{}. {}", legislator.title, legislator.last_name),
        options,
        options_hash: topic_elem.options_hash.clone(),
        selected,
    }
}

/// Parse out the county options, guessing the selection from the address county.
///
/// The first option equal to, or starting with, the address county wins.
/// Otherwise the first option is selected.
pub fn parse_county_options(county_elem: &FormElement, address_county: &str) -> CountySelection {
    let options = county_elem.options_hash.labels();

    let selected = options
        .iter()
        .find(|option| option.as_str() == address_county || option.starts_with(address_county))
        .or_else(|| options.first())
        .cloned();

    CountySelection { selected, options }
}
