use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::{
    ActiveCurrencyAndAmount, BranchAndFinancialInstitutionIdentification6, CashAccount38, PartyIdentification135,
    PaymentTypeInformation28, SettlementInstruction7,
};
use crate::models::clock::{iso_date, iso_datetime};

/// pacs.008.001.08 FI to FI customer credit transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "String::is_empty")]
    pub xmlns: String,
    #[serde(rename = "FIToFICstmrCdtTrf")]
    pub fi_to_fi_cstmr_cdt_trf: FIToFICustomerCreditTransferV08,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FIToFICustomerCreditTransferV08 {
    pub grp_hdr: GroupHeader93,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cdt_trf_tx_inf: Vec<CreditTransferTransaction39>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupHeader93 {
    pub msg_id: String,
    #[serde(with = "iso_datetime")]
    pub cre_dt_tm: OffsetDateTime,
    pub nb_of_txs: String,
    pub sttlm_inf: SettlementInstruction7,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreditTransferTransaction39 {
    pub pmt_id: PaymentIdentification7,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmt_tp_inf: Option<PaymentTypeInformation28>,
    pub intr_bk_sttlm_amt: ActiveCurrencyAndAmount,
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub intr_bk_sttlm_dt: Option<Date>,
    pub chrg_br: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instg_agt: Option<BranchAndFinancialInstitutionIdentification6>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instd_agt: Option<BranchAndFinancialInstitutionIdentification6>,
    pub dbtr: PartyIdentification135,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbtr_acct: Option<CashAccount38>,
    pub dbtr_agt: BranchAndFinancialInstitutionIdentification6,
    pub cdtr_agt: BranchAndFinancialInstitutionIdentification6,
    pub cdtr: PartyIdentification135,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdtr_acct: Option<CashAccount38>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentIdentification7 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instr_id: Option<String>,
    pub end_to_end_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    #[serde(rename = "UETR", default, skip_serializing_if = "Option::is_none")]
    pub uetr: Option<String>,
}
