use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel value marking a form element as the advocacy topic selector
pub const TOPIC_KEY: &str = "$TOPIC";

/// Sentinel value marking a form element as the county selector
pub const COUNTY_KEY: &str = "$ADDRESS_COUNTY";

/// Options declared by a form element: either a plain list of labels or a
/// mapping from label to submitted value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Options {
    List(Vec<String>),
    Map(IndexMap<String, String>),
}

impl Options {
    /// Option labels in declaration order
    pub fn labels(&self) -> Vec<String> {
        match self {
            Options::List(items) => items.clone(),
            Options::Map(map) => map.keys().cloned().collect(),
        }
    }

    /// Value submitted for a selected label.
    /// Lists submit the label itself, mappings submit the entry keyed by it.
    pub fn resolve(&self, selected: &str) -> Option<String> {
        match self {
            Options::List(_) => Some(selected.to_string()),
            Options::Map(map) => map.get(selected).cloned(),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::List(Vec::new())
    }
}

/// One configurable field in a legislator's contact form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormElement {
    pub value: String,
    /// `null` for fields that are not select boxes
    #[serde(default, deserialize_with = "null_as_default")]
    pub options_hash: Options,
}

/// The contact form fields declared for one legislator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislatorFormElements {
    pub bioguide_id: String,
    #[serde(default)]
    pub form_elements: Vec<FormElement>,
}

impl LegislatorFormElements {
    /// First form element whose value equals the given sentinel
    pub fn find(&self, key: &str) -> Option<&FormElement> {
        self.form_elements.iter().find(|elem| elem.value == key)
    }
}

/// Legislator reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legislator {
    pub bioguide_id: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
}

/// User supplied address. Fields other than the county are carried through
/// untouched into the outgoing message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, deserialize_with = "null_as_default")]
    pub county: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Topic options and default selection for one legislator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSelection {
    pub bioguide_id: String,
    pub name: String,
    pub options: Vec<String>,
    pub options_hash: Options,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

impl TopicSelection {
    /// Value to submit for the selected topic, if any
    pub fn value(&self) -> Option<String> {
        self.selected
            .as_deref()
            .and_then(|selected| self.options_hash.resolve(selected))
    }
}

/// County options and default selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountySelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    pub options: Vec<String>,
}

/// Fields submitted by the user through the message form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub prefix: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub county: String,
    pub message: String,
}

/// Subject, body and topic value composed for one legislator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Sender block of an outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderInfo {
    pub name_prefix: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub paren_phone: String,
    pub county: String,
}

/// Campaign block of an outgoing message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignInfo {
    pub uuid: String,
    #[serde(rename = "orgURL")]
    pub org_url: String,
    pub org_name: String,
}

/// A message ready for submission to one legislator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub bioguide_id: String,
    pub subject: String,
    pub message: String,
    pub sender: SenderInfo,
    pub canonical_address: Address,
    pub campaign: CampaignInfo,
    /// Absent rather than null when no topic applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// Prefilled form values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultFormData {
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
}

/// Supplementary form fields built from the legislators' form metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    /// Serialized as `{}` when no legislator declares a county field
    #[serde(serialize_with = "empty_object_if_none")]
    pub county_data: Option<CountySelection>,
    pub form_data: DefaultFormData,
    pub topic_options: IndexMap<String, TopicSelection>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_object_if_none<S>(
    value: &Option<CountySelection>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;

    match value {
        Some(county) => county.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
