use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::{
    ActiveCurrencyAndAmount, BranchAndFinancialInstitutionIdentification6, CashAccount38, LocalInstrument2Choice,
    OriginalGroupInformation29, Party40Choice, SettlementInstruction7,
};
use crate::models::clock::{iso_date, iso_datetime};

/// pacs.004.001.10 payment return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "String::is_empty")]
    pub xmlns: String,
    #[serde(rename = "PmtRtr")]
    pub pmt_rtr: PaymentReturnV10,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentReturnV10 {
    pub grp_hdr: GroupHeader90,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tx_inf: Vec<PaymentTransaction118>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupHeader90 {
    pub msg_id: String,
    #[serde(with = "iso_datetime")]
    pub cre_dt_tm: OffsetDateTime,
    pub nb_of_txs: String,
    pub sttlm_inf: SettlementInstruction7,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentTransaction118 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtr_id: Option<String>,
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
    pub orgnl_intr_bk_sttlm_amt: Option<ActiveCurrencyAndAmount>,
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub orgnl_intr_bk_sttlm_dt: Option<Date>,
    pub rtrd_intr_bk_sttlm_amt: ActiveCurrencyAndAmount,
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub intr_bk_sttlm_dt: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrg_br: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instg_agt: Option<BranchAndFinancialInstitutionIdentification6>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instd_agt: Option<BranchAndFinancialInstitutionIdentification6>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtr_chain: Option<TransactionParties8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rtr_rsn_inf: Vec<PaymentReturnReason6>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgnl_tx_ref: Option<OriginalTransactionReference32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionParties8 {
    pub dbtr: Party40Choice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbtr_acct: Option<CashAccount38>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbtr_agt: Option<BranchAndFinancialInstitutionIdentification6>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdtr_agt: Option<BranchAndFinancialInstitutionIdentification6>,
    pub cdtr: Party40Choice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdtr_acct: Option<CashAccount38>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentReturnReason6 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsn: Option<ReturnReason5Choice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addtl_inf: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReturnReason5Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prtry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginalTransactionReference32 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmt_tp_inf: Option<PaymentTypeInformation27>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentTypeInformation27 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcl_instrm: Option<LocalInstrument2Choice>,
}
