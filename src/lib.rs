//! Helpers for constructing a "contact your legislator" message form.
//!
//! This library derives topic and county options from each legislator's
//! contact form metadata, composes the message subject and body for a
//! campaign, and assembles the outgoing message records.

pub mod assembler;
pub mod campaign;
pub mod composer;
pub mod config;
pub mod error;
pub mod options;
pub mod types;

pub use assembler::{
    create_form_fields, get_county_data, get_topic_options, make_campaign_info, make_message,
    make_sender_info, MessageForm,
};
pub use campaign::{CampaignTable, MatchRule, UrlMatcher};
pub use composer::make_message_info;
pub use config::{FormConfig, FormConfigBuilder};
pub use error::{Error, Result};
pub use options::{parse_county_options, parse_topic_options, TopicPreference};
pub use types::{
    Address, CampaignInfo, CountySelection, FormData, FormElement, FormFields, Legislator,
    LegislatorFormElements, MessageInfo, Options, OutgoingMessage, SenderInfo, TopicSelection,
};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::assembler::MessageForm;
    pub use crate::config::{FormConfig, FormConfigBuilder};
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        Address, FormData, FormFields, Legislator, LegislatorFormElements, OutgoingMessage,
        TopicSelection,
    };
}
