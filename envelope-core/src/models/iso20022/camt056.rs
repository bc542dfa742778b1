use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{BranchAndFinancialInstitutionIdentification6, Party40Choice};
use crate::models::clock::iso_datetime;

/// camt.056.001.08 FI to FI payment cancellation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "String::is_empty")]
    pub xmlns: String,
    #[serde(rename = "FIToFIPmtCxlReq")]
    pub fi_to_fi_pmt_cxl_req: FIToFIPaymentCancellationRequestV08,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FIToFIPaymentCancellationRequestV08 {
    pub assgnmt: CaseAssignment5,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub undrlyg: Vec<UnderlyingTransaction23>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaseAssignment5 {
    pub id: String,
    pub assgnr: Party40Choice,
    pub assgne: Party40Choice,
    #[serde(with = "iso_datetime")]
    pub cre_dt_tm: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnderlyingTransaction23 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_grp_inf_and_cxl: Option<OriginalGroupHeader15>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tx_inf: Vec<PaymentTransaction106>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginalGroupHeader15 {
    pub orgnl_msg_id: String,
    pub orgnl_msg_nm_id: String,
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub orgnl_cre_dt_tm: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cxl_rsn_inf: Vec<PaymentCancellationReason5>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentTransaction106 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_instr_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_end_to_end_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_tx_id: Option<String>,
    #[serde(rename = "OrgnlUETR", default, skip_serializing_if = "Option::is_none")]
    pub orgnl_uetr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assgnr: Option<BranchAndFinancialInstitutionIdentification6>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assgne: Option<BranchAndFinancialInstitutionIdentification6>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cxl_rsn_inf: Vec<PaymentCancellationReason5>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentCancellationReason5 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsn: Option<CancellationReason33Choice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addtl_inf: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancellationReason33Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prtry: Option<String>,
}
