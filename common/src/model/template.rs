use crate::model::badge::BadgeConfig;
use crate::model::field::FieldPlacement;
use serde::{Deserialize, Serialize};

/// A saved badge design: the configuration plus its fields, without CSV data
/// or background pixels.
///
/// The JSON form is flat (configuration keys at the top level next to a
/// `fields` array), matching the files written by the desktop designer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(flatten)]
    pub config: BadgeConfig,
    #[serde(default)]
    pub fields: Vec<FieldPlacement>,
}
