use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{BranchAndFinancialInstitutionIdentification6, DateAndDateTime2Choice, OriginalGroupInformation29};
use crate::models::clock::iso_datetime;

/// pacs.002.001.10 FI to FI payment status report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "String::is_empty")]
    pub xmlns: String,
    #[serde(rename = "FIToFIPmtStsRpt")]
    pub fi_to_fi_pmt_sts_rpt: FIToFIPaymentStatusReportV10,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FIToFIPaymentStatusReportV10 {
    pub grp_hdr: GroupHeader91,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tx_inf_and_sts: Vec<PaymentTransaction110>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupHeader91 {
    pub msg_id: String,
    #[serde(with = "iso_datetime")]
    pub cre_dt_tm: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentTransaction110 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_grp_inf: Option<OriginalGroupInformation29>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_instr_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_end_to_end_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_tx_id: Option<String>,
    #[serde(rename = "OrgnlUETR", default, skip_serializing_if = "Option::is_none")]
    pub orgnl_uetr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_sts: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sts_rsn_inf: Vec<StatusReasonInformation12>,
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub accptnc_dt_tm: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fctv_intr_bk_sttlm_dt: Option<DateAndDateTime2Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instg_agt: Option<BranchAndFinancialInstitutionIdentification6>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instd_agt: Option<BranchAndFinancialInstitutionIdentification6>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusReasonInformation12 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsn: Option<StatusReason6Choice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addtl_inf: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusReason6Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prtry: Option<String>,
}
