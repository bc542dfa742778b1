use serde::{Deserialize, Serialize};
use time::Date;

use super::camt056::CaseAssignment5;
use super::{ActiveCurrencyAndAmount, OriginalGroupInformation29, Party40Choice};
use crate::models::clock::iso_date;

/// camt.029.001.09 resolution of investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "String::is_empty")]
    pub xmlns: String,
    #[serde(rename = "RsltnOfInvstgtn")]
    pub rsltn_of_invstgtn: ResolutionOfInvestigationV09,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResolutionOfInvestigationV09 {
    pub assgnmt: CaseAssignment5,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rslvd_case: Option<Case5>,
    pub sts: InvestigationStatus5Choice,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cxl_dtls: Vec<UnderlyingTransaction22>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Case5 {
    pub id: String,
    pub cretr: Party40Choice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvestigationStatus5Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dplct_of: Option<Case5>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assgnmt_cxl_conf: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnderlyingTransaction22 {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tx_inf_and_sts: Vec<PaymentTransaction102>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentTransaction102 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_grp_inf: Option<OriginalGroupInformation29>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_instr_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_end_to_end_id: Option<String>,
    #[serde(rename = "OrgnlUETR", default, skip_serializing_if = "Option::is_none")]
    pub orgnl_uetr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsltn_rltd_inf: Option<ResolutionData1>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResolutionData1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_to_end_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    #[serde(rename = "UETR", default, skip_serializing_if = "Option::is_none")]
    pub uetr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intr_bk_sttlm_amt: Option<ActiveCurrencyAndAmount>,
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub intr_bk_sttlm_dt: Option<Date>,
}
