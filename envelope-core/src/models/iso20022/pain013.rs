use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{
    ActiveCurrencyAndAmount, BranchAndFinancialInstitutionIdentification6, CashAccount38, DateAndDateTime2Choice,
    PartyIdentification135, PaymentTypeInformation28,
};
use crate::models::clock::iso_datetime;

/// pain.013.001.07 creditor payment activation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "String::is_empty")]
    pub xmlns: String,
    #[serde(rename = "CdtrPmtActvtnReq")]
    pub cdtr_pmt_actvtn_req: CreditorPaymentActivationRequestV07,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreditorPaymentActivationRequestV07 {
    pub grp_hdr: GroupHeader78,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pmt_inf: Vec<PaymentInstruction31>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupHeader78 {
    pub msg_id: String,
    #[serde(with = "iso_datetime")]
    pub cre_dt_tm: OffsetDateTime,
    pub nb_of_txs: String,
    pub initg_pty: PartyIdentification135,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentInstruction31 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmt_inf_id: Option<String>,
    pub pmt_mtd: String,
    pub reqd_exctn_dt: DateAndDateTime2Choice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpry_dt: Option<DateAndDateTime2Choice>,
    pub dbtr: PartyIdentification135,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbtr_acct: Option<CashAccount38>,
    pub dbtr_agt: BranchAndFinancialInstitutionIdentification6,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cdt_trf_tx: Vec<CreditTransferTransaction35>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreditTransferTransaction35 {
    pub pmt_id: PaymentIdentification6,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmt_tp_inf: Option<PaymentTypeInformation28>,
    pub amt: AmountType4Choice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrg_br: Option<String>,
    pub cdtr_agt: BranchAndFinancialInstitutionIdentification6,
    pub cdtr: PartyIdentification135,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdtr_acct: Option<CashAccount38>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentIdentification6 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instr_id: Option<String>,
    pub end_to_end_id: String,
    #[serde(rename = "UETR", default, skip_serializing_if = "Option::is_none")]
    pub uetr: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AmountType4Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instd_amt: Option<ActiveCurrencyAndAmount>,
}
