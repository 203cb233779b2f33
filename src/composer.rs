use std::collections::HashMap;

use crate::campaign::CampaignTable;
use crate::types::{FormData, Legislator, MessageInfo, TopicSelection};

/// Compose the subject, body and topic value for one legislator using the
/// built-in campaign table
pub fn make_message_info(
    legislator: &Legislator,
    form_data: &FormData,
    campaign_url: &str,
    topic: Option<&TopicSelection>,
) -> MessageInfo {
    compose_with(&CampaignTable::builtin(), legislator, form_data, campaign_url, topic)
}

/// Compose a message against an explicit campaign table
pub fn compose_with(
    table: &CampaignTable,
    legislator: &Legislator,
    form_data: &FormData,
    campaign_url: &str,
    topic: Option<&TopicSelection>,
) -> MessageInfo {
    let template = table.lookup(campaign_url);
    let vars = HashMap::from([
        ("title", legislator.title.as_str()),
        ("first_name", legislator.first_name.as_str()),
        ("last_name", legislator.last_name.as_str()),
        ("message", form_data.message.as_str()),
        ("campaign_url", campaign_url),
    ]);

    MessageInfo {
        topic: topic.and_then(TopicSelection::value),
        subject: template.subject.render(&vars),
        message: template.body.render(&vars),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Options;
    use indexmap::IndexMap;

    fn legislator() -> Legislator {
        Legislator {
            bioguide_id: "Q000023".to_string(),
            title: "Rep".to_string(),
            first_name: "Mike".to_string(),
            last_name: "Quigley".to_string(),
        }
    }

    fn form_data() -> FormData {
        FormData {
            message: "Please act.".to_string(),
            ..FormData::default()
        }
    }

    fn topic(options_hash: Options, selected: &str) -> TopicSelection {
        TopicSelection {
            bioguide_id: "Q000023".to_string(),
            name: "Rep. Quigley".to_string(),
            options: options_hash.labels(),
            options_hash,
            selected: Some(selected.to_string()),
        }
    }

    #[test]
    fn test_unknown_campaign_uses_default_template() {
        let info = make_message_info(
            &legislator(),
            &form_data(),
            "https://affordablehousingonline.com/housing-search/Illinois/Chicago",
            None,
        );

        assert_eq!(info.topic, None);
        assert_eq!(info.subject, "Affordable Housing Data");
        assert_eq!(
            info.message,
            "Dear Rep Quigley, \nThis web page has interesting data regarding affordable housing for our area:\n https://affordablehousingonline.com/housing-search/Illinois/Chicago. \nPlease act."
        );
    }

    #[test]
    fn test_known_campaign_template() {
        let info = make_message_info(
            &legislator(),
            &form_data(),
            "https://affordablehousingonline.com/advocacy/issues/affordable-housing-credit-improvement-act",
            None,
        );

        assert_eq!(info.subject, "Include Provisions of S.548 in Budget Deal");
        assert!(info.message.starts_with("Dear Rep Quigley, \nS.548, the Affordable Housing Credit"));
        assert!(info.message.ends_with("in the budget deal \n\nPlease act."));
    }

    #[test]
    fn test_fy19_campaign_template() {
        let info = make_message_info(
            &legislator(),
            &form_data(),
            "https://affordablehousingonline.com/advocacy/issues/fy19-hud-budget",
            None,
        );

        assert_eq!(
            info.subject,
            "Ignore Trump Budget and Fully Fund Housing Programs"
        );
        assert!(info
            .message
            .contains("reduced or eliminated.\n\n Please, please, please."));
        assert!(info
            .message
            .ends_with("utm_campaign=embedlink \n\nPlease act."));
    }

    #[test]
    fn test_topic_value_from_list() {
        let list = Options::List(vec!["Budget".to_string(), "Housing".to_string()]);
        let info = make_message_info(
            &legislator(),
            &form_data(),
            "https://example.org",
            Some(&topic(list, "Housing")),
        );
        assert_eq!(info.topic.as_deref(), Some("Housing"));
    }

    #[test]
    fn test_topic_value_from_mapping() {
        let mut map = IndexMap::new();
        map.insert("Budget".to_string(), "BUD".to_string());
        map.insert("Housing".to_string(), "HOU".to_string());

        let info = make_message_info(
            &legislator(),
            &form_data(),
            "https://example.org",
            Some(&topic(Options::Map(map), "Housing")),
        );
        assert_eq!(info.topic.as_deref(), Some("HOU"));
    }

    #[test]
    fn test_topic_without_selection_has_no_value() {
        let mut selection = topic(Options::List(vec!["Budget".to_string()]), "Budget");
        selection.selected = None;

        let info = make_message_info(&legislator(), &form_data(), "https://example.org", Some(&selection));
        assert_eq!(info.topic, None);
    }
}
