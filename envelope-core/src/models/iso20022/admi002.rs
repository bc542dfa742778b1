use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::clock::iso_datetime;

/// admi.002.001.01 message reject. The body element carries the message
/// identifier itself as its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "String::is_empty")]
    pub xmlns: String,
    #[serde(rename = "admi.002.001.01")]
    pub admi_002_001_01: Admi00200101,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Admi00200101 {
    pub rltd_ref: MessageReference,
    pub rsn: RejectionReason2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReference {
    #[serde(rename = "Ref")]
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RejectionReason2 {
    pub rjctg_pty_rsn: String,
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub rjctn_dt_tm: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_lctn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsn_desc: Option<String>,
}
