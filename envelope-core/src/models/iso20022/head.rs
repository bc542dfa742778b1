use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{
    BranchAndFinancialInstitutionIdentification6, ClearingSystemMemberIdentification2,
    FinancialInstitutionIdentification18, HEADER_NAMESPACE,
};
use crate::models::clock::iso_datetime;
use crate::models::config::Config;

/// head.001.001.02 business application header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessApplicationHeaderV02 {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "String::is_empty")]
    pub xmlns: String,
    pub fr: Party44Choice,
    pub to: Party44Choice,
    pub biz_msg_idr: String,
    pub msg_def_idr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mkt_prctc: Option<ImplementationSpecification1>,
    #[serde(with = "iso_datetime")]
    pub cre_dt: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party44Choice {
    #[serde(rename = "FIId", default, skip_serializing_if = "Option::is_none")]
    pub fi_id: Option<BranchAndFinancialInstitutionIdentification6>,
}

impl Party44Choice {
    fn member(member_id: &str) -> Self {
        Self {
            fi_id: Some(BranchAndFinancialInstitutionIdentification6 {
                fin_instn_id: FinancialInstitutionIdentification18 {
                    clr_sys_mmb_id: Some(ClearingSystemMemberIdentification2 {
                        clr_sys_id: None,
                        mmb_id: member_id.to_string(),
                    }),
                    nm: None,
                },
            }),
        }
    }

    pub fn member_id(&self) -> String {
        super::agent_member_id(&self.fi_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImplementationSpecification1 {
    pub regy: String,
    pub id: String,
}

impl BusinessApplicationHeaderV02 {
    /// Header routed from this institution to the counterparty.
    pub fn new(business_message_id: &str, kind: &str, config: &Config, created: OffsetDateTime) -> Self {
        Self {
            xmlns: HEADER_NAMESPACE.to_string(),
            fr: Party44Choice::member(&config.own_routing_id),
            to: Party44Choice::member(&config.counterparty_routing_id),
            biz_msg_idr: business_message_id.to_string(),
            msg_def_idr: kind.to_string(),
            mkt_prctc: Some(ImplementationSpecification1 {
                regy: config.market_practice_registry().to_string(),
                id: config.market_practice_id().to_string(),
            }),
            cre_dt: created,
        }
    }
}
