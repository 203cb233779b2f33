//! Message assembly and form field orchestration.
//!
//! [`MessageForm`] carries a validated [`FormConfig`] and its compiled
//! campaign table. The free functions in this module use the default
//! configuration.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::campaign::CampaignTable;
use crate::composer::compose_with;
use crate::config::FormConfig;
use crate::error::Result;
use crate::options::{parse_county_options, parse_topic_options_with};
use crate::types::{
    Address, CampaignInfo, CountySelection, DefaultFormData, FormData, FormFields, Legislator,
    LegislatorFormElements, OutgoingMessage, SenderInfo, TopicSelection, COUNTY_KEY, TOPIC_KEY,
};

/// Prepares form fields and outgoing messages for a configuration
#[derive(Debug, Clone)]
pub struct MessageForm {
    config: FormConfig,
    campaigns: CampaignTable,
}

impl Default for MessageForm {
    fn default() -> Self {
        Self {
            config: FormConfig::default(),
            campaigns: CampaignTable::builtin(),
        }
    }
}

impl MessageForm {
    /// Create a message form from a configuration, compiling its campaign table
    pub fn new(config: FormConfig) -> Result<Self> {
        config.validate()?;
        let campaigns = config.campaign_table()?;
        Ok(Self { config, campaigns })
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn campaigns(&self) -> &CampaignTable {
        &self.campaigns
    }

    /// The campaign block attached to outgoing messages
    pub fn campaign_info(&self) -> CampaignInfo {
        self.config.campaign_info.clone()
    }

    /// Gets data to populate a county field.
    ///
    /// Scans every legislator; when more than one declares a county field the
    /// last one scanned wins.
    pub fn county_data(
        &self,
        legislators_form_elements: &[LegislatorFormElements],
        address_county: &str,
    ) -> Option<CountySelection> {
        let mut county_elem = None;
        for form in legislators_form_elements {
            if let Some(elem) = form.find(COUNTY_KEY) {
                if county_elem.is_some() {
                    debug!(
                        bioguide_id = %form.bioguide_id,
                        "county field declared by more than one legislator; using the later one"
                    );
                }
                county_elem = Some(elem);
            }
        }

        let county = county_elem.map(|elem| parse_county_options(elem, address_county));
        if let Some(county) = &county {
            debug!(selected = ?county.selected, options = county.options.len(), "county data");
        }
        county
    }

    /// Topic options keyed by bioguide id, for every legislator whose form
    /// declares a topic field
    pub fn topic_options(
        &self,
        legislators_form_elements: &[LegislatorFormElements],
        legislators: &[Legislator],
    ) -> IndexMap<String, TopicSelection> {
        let mut topic_options = IndexMap::new();

        for form in legislators_form_elements {
            let Some(topic_elem) = form.find(TOPIC_KEY) else {
                continue;
            };

            let Some(legislator) = legislators
                .iter()
                .find(|legislator| legislator.bioguide_id == form.bioguide_id)
            else {
                warn!(
                    bioguide_id = %form.bioguide_id,
                    "topic field declared for an unknown legislator; skipping"
                );
                continue;
            };

            let topic = parse_topic_options_with(topic_elem, legislator, &self.config.topics);
            debug!(
                bioguide_id = %form.bioguide_id,
                selected = ?topic.selected,
                "topic options"
            );
            topic_options.insert(form.bioguide_id.clone(), topic);
        }

        topic_options
    }

    /// Create supplementary form fields from the legislators' form metadata
    pub fn create_form_fields(
        &self,
        legislators_form_elements: &[LegislatorFormElements],
        legislators: &[Legislator],
        address: &Address,
    ) -> FormFields {
        let county_data = self.county_data(legislators_form_elements, &address.county);
        let county = county_data
            .as_ref()
            .and_then(|county| county.selected.clone());

        FormFields {
            county_data,
            form_data: DefaultFormData {
                prefix: self.config.default_prefix.clone(),
                county,
            },
            topic_options: self.topic_options(legislators_form_elements, legislators),
        }
    }

    /// Build the outgoing message for one legislator.
    ///
    /// `topic` is only set when the legislator has a topic selection that
    /// resolves to a value.
    pub fn make_message(
        &self,
        legislator: &Legislator,
        form_data: &FormData,
        phone_value: &str,
        topic_options: &IndexMap<String, TopicSelection>,
        address: &Address,
        campaign_url: &str,
    ) -> OutgoingMessage {
        let info = compose_with(
            &self.campaigns,
            legislator,
            form_data,
            campaign_url,
            topic_options.get(&legislator.bioguide_id),
        );

        OutgoingMessage {
            bioguide_id: legislator.bioguide_id.clone(),
            subject: info.subject,
            message: info.message,
            sender: make_sender_info(form_data, phone_value),
            canonical_address: address.clone(),
            campaign: self.campaign_info(),
            topic: info.topic,
        }
    }
}

/// Build the sender block.
///
/// Only the first "(" and ")" are removed and only the first space becomes a
/// dash, so "(555) 123-4567" becomes "555-123-4567". Input shape is not
/// validated.
pub fn make_sender_info(form_data: &FormData, paren_phone: &str) -> SenderInfo {
    let phone = paren_phone
        .replacen('(', "", 1)
        .replacen(')', "", 1)
        .replacen(' ', "-", 1);

    SenderInfo {
        name_prefix: form_data.prefix.clone(),
        first_name: form_data.first_name.clone(),
        last_name: form_data.last_name.clone(),
        email: form_data.email.clone(),
        phone,
        paren_phone: paren_phone.to_string(),
        county: form_data.county.clone(),
    }
}

/// The default campaign block, all fields empty
pub fn make_campaign_info() -> CampaignInfo {
    CampaignInfo::default()
}

pub fn make_message(
    legislator: &Legislator,
    form_data: &FormData,
    phone_value: &str,
    topic_options: &IndexMap<String, TopicSelection>,
    address: &Address,
    campaign_url: &str,
) -> OutgoingMessage {
    MessageForm::default().make_message(
        legislator,
        form_data,
        phone_value,
        topic_options,
        address,
        campaign_url,
    )
}

pub fn get_county_data(
    legislators_form_elements: &[LegislatorFormElements],
    address_county: &str,
) -> Option<CountySelection> {
    MessageForm::default().county_data(legislators_form_elements, address_county)
}

pub fn get_topic_options(
    legislators_form_elements: &[LegislatorFormElements],
    legislators: &[Legislator],
) -> IndexMap<String, TopicSelection> {
    MessageForm::default().topic_options(legislators_form_elements, legislators)
}

pub fn create_form_fields(
    legislators_form_elements: &[LegislatorFormElements],
    legislators: &[Legislator],
    address: &Address,
) -> FormFields {
    MessageForm::default().create_form_fields(legislators_form_elements, legislators, address)
}
