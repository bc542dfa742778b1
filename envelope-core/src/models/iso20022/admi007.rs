use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::clock::iso_datetime;

/// admi.007.001.01 receipt acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "String::is_empty")]
    pub xmlns: String,
    #[serde(rename = "RctAck")]
    pub rct_ack: ReceiptAcknowledgementV01,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiptAcknowledgementV01 {
    pub msg_id: MessageHeader10,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rpt: Vec<ReceiptAcknowledgementReport2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageHeader10 {
    pub msg_id: String,
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub cre_dt_tm: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qry_nm: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiptAcknowledgementReport2 {
    pub rltd_ref: MessageReference1,
    pub req_hdlg: RequestHandling2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageReference1 {
    #[serde(rename = "Ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_nm: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestHandling2 {
    pub sts_cd: String,
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub sts_dt_tm: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}
