//! Schema-typed ISO 20022 documents. Field order follows the XSD sequence
//! order because the serializer emits elements in declaration order.

pub mod admi002;
pub mod admi007;
pub mod camt029;
pub mod camt056;
pub mod head;
pub mod pacs002;
pub mod pacs004;
pub mod pacs008;
pub mod pain013;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::clock::{iso_date, iso_datetime};

pub const HEADER_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:head.001.001.02";

pub fn document_namespace(kind: &str) -> String {
    format!("urn:iso:std:iso:20022:tech:xsd:{}", kind)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClearingSystemIdentification2Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prtry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClearingSystemMemberIdentification2 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clr_sys_id: Option<ClearingSystemIdentification2Choice>,
    pub mmb_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinancialInstitutionIdentification18 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clr_sys_mmb_id: Option<ClearingSystemMemberIdentification2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BranchAndFinancialInstitutionIdentification6 {
    pub fin_instn_id: FinancialInstitutionIdentification18,
}

impl BranchAndFinancialInstitutionIdentification6 {
    /// Agent identified by its clearing-system member id.
    pub fn member(member_id: &str, clearing_system_id: &str, name: Option<String>) -> Self {
        let clr_sys_id = (!clearing_system_id.is_empty()).then(|| ClearingSystemIdentification2Choice {
            cd: Some(clearing_system_id.to_string()),
            prtry: None,
        });
        Self {
            fin_instn_id: FinancialInstitutionIdentification18 {
                clr_sys_mmb_id: Some(ClearingSystemMemberIdentification2 {
                    clr_sys_id,
                    mmb_id: member_id.to_string(),
                }),
                nm: name,
            },
        }
    }

    pub fn member_id(&self) -> String {
        self.fin_instn_id
            .clr_sys_mmb_id
            .as_ref()
            .map(|m| m.mmb_id.clone())
            .unwrap_or_default()
    }

    pub fn name(&self) -> Option<String> {
        self.fin_instn_id.nm.clone()
    }
}

pub fn agent_member_id(agent: &Option<BranchAndFinancialInstitutionIdentification6>) -> String {
    agent.as_ref().map(|a| a.member_id()).unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostalAddress24 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strt_nm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bldg_nb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pst_bx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pst_cd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twn_nm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctry_sub_dvsn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartyIdentification135 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pstl_adr: Option<PostalAddress24>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenericAccountIdentification1 {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountIdentification4Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub othr: Option<GenericAccountIdentification1>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CashAccount38 {
    pub id: AccountIdentification4Choice,
}

impl CashAccount38 {
    pub fn other(id: &str) -> Option<Self> {
        (!id.is_empty()).then(|| Self {
            id: AccountIdentification4Choice {
                othr: Some(GenericAccountIdentification1 { id: id.to_string() }),
            },
        })
    }
}

pub fn account_id(account: &Option<CashAccount38>) -> String {
    account
        .as_ref()
        .and_then(|a| a.id.othr.as_ref())
        .map(|o| o.id.clone())
        .unwrap_or_default()
}

/// Amount with its currency attribute, e.g. `<IntrBkSttlmAmt Ccy="USD">10.00</IntrBkSttlmAmt>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveCurrencyAndAmount {
    #[serde(rename = "@Ccy")]
    pub ccy: String,
    #[serde(rename = "$text")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClearingSystemIdentification3Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cd: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SettlementInstruction7 {
    pub sttlm_mtd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clr_sys: Option<ClearingSystemIdentification3Choice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalInstrument2Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prtry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryPurpose1Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prtry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentTypeInformation28 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcl_instrm: Option<LocalInstrument2Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctgy_purp: Option<CategoryPurpose1Choice>,
}

impl PaymentTypeInformation28 {
    pub fn category_purpose(&self) -> Option<String> {
        self.ctgy_purp.as_ref().and_then(|c| c.prtry.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Party40Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pty: Option<PartyIdentification135>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agt: Option<BranchAndFinancialInstitutionIdentification6>,
}

impl Party40Choice {
    pub fn agent(agent: BranchAndFinancialInstitutionIdentification6) -> Self {
        Self { pty: None, agt: Some(agent) }
    }

    pub fn party(party: PartyIdentification135) -> Self {
        Self { pty: Some(party), agt: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginalGroupInformation29 {
    pub orgnl_msg_id: String,
    pub orgnl_msg_nm_id: String,
    #[serde(
        default,
        with = "iso_datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub orgnl_cre_dt_tm: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateAndDateTime2Choice {
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub dt: Option<Date>,
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub dt_tm: Option<OffsetDateTime>,
}

