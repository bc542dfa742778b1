use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::common::{end_to_end_or_placeholder, present, Amount, DepositoryInstitution, Identifier, Violations};
use super::{Iso20022Message, Message};
use crate::models::clock::{iso_date, iso_datetime, reference_now};
use crate::models::config::Config;
use crate::models::errors::ConversionResult;
use crate::models::iso20022::camt029::{
    Case5, Document, InvestigationStatus5Choice, PaymentTransaction102, ResolutionData1, ResolutionOfInvestigationV09,
    UnderlyingTransaction22,
};
use crate::models::iso20022::camt056::CaseAssignment5;
use crate::models::iso20022::head::BusinessApplicationHeaderV02;
use crate::models::iso20022::{document_namespace, OriginalGroupInformation29, Party40Choice};

/// Resolution of a cancellation request or information request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResponse {
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<OffsetDateTime>,

    #[serde(default)]
    pub identifier: Identifier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_case: Option<Case>,

    #[serde(default)]
    pub investigation_status: InvestigationStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cancellation_details: Vec<CancellationDetail>,

    #[serde(rename = "senderDepositoryInstitution", default)]
    pub sender: DepositoryInstitution,

    #[serde(rename = "receiverDepositoryInstitution", default)]
    pub receiver: DepositoryInstitution,

    /// Envelope wrapper to use instead of the one resolved from the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_wrapper: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    #[serde(default)]
    pub case_id: String,

    #[serde(rename = "creatorDepositoryInstitution", default)]
    pub creator: DepositoryInstitution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationStatus {
    /// Confirmation code, e.g. `CNCL` or `RJCR`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<Case>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_cancellation_confirmation: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_group_information: Option<OriginalGroupInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_instruction_id: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original_end_to_end_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_uetr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_related_information: Option<ResolutionRelatedInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginalGroupInfo {
    #[serde(rename = "originalMessageId", default)]
    pub message_id: String,

    #[serde(rename = "originalMessageType", default)]
    pub message_type: String,

    #[serde(
        rename = "originalCreationDateTime",
        default,
        with = "iso_datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date_time: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionRelatedInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_to_end_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uetr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interbank_settlement_amount: Option<Amount>,

    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub interbank_settlement_date: Option<Date>,
}

impl InvestigationStatus {
    fn is_empty(&self) -> bool {
        present(&self.confirmation).is_none()
            && self.duplicate_of.is_none()
            && self.assignment_cancellation_confirmation.is_none()
    }
}

impl Case {
    fn to_document(&self, config: &Config) -> Case5 {
        let creator = DepositoryInstitution::sender(self.creator.routing_id())
            .with_short_name(self.creator.short_name.clone())
            .sender_agent(config, true);
        Case5 {
            id: self.case_id.clone(),
            cretr: Party40Choice::agent(creator),
        }
    }

    fn from_document(case: Case5) -> Self {
        let creator = case.cretr.agt.unwrap_or_default();
        Self {
            case_id: case.id,
            creator: DepositoryInstitution::sender(creator.member_id()).with_short_name(creator.name()),
        }
    }
}

impl Iso20022Message for CancellationResponse {
    const KIND: &'static str = "camt.029.001.09";
    type Document = Document;

    fn business_message_id(&self) -> &str {
        self.identifier.header_id()
    }

    fn set_creation_date_time(&mut self, at: OffsetDateTime) {
        self.creation_date_time = Some(at);
    }

    fn preferred_wrapper(&self) -> Option<&str> {
        self.preferred_wrapper.as_deref().filter(|w| !w.trim().is_empty())
    }

    fn build(&self, config: &Config) -> ConversionResult<Document> {
        let mut violations = Violations::default();
        violations.require(!self.identifier.message_id.trim().is_empty(), "identifier.messageId is required");
        violations.require(!self.investigation_status.is_empty(), "investigationStatus carries no status");

        let mut details = Vec::with_capacity(self.cancellation_details.len());
        for (index, detail) in self.cancellation_details.iter().enumerate() {
            violations.uetr(&format!("cancellationDetails[{}].originalUetr", index), &detail.original_uetr);
            let resolution = detail.resolution_related_information.as_ref().map(|info| {
                violations.uetr(&format!("cancellationDetails[{}].resolutionRelatedInformation.uetr", index), &info.uetr);
                let amount = info.interbank_settlement_amount.as_ref().map(|amount| {
                    let label = format!("cancellationDetails[{}].resolutionRelatedInformation.interbankSettlementAmount", index);
                    let rendered = violations.amount(&label, amount);
                    amount.to_document(rendered, config)
                });
                ResolutionData1 {
                    end_to_end_id: present(&info.end_to_end_id),
                    tx_id: present(&info.transaction_id),
                    uetr: present(&info.uetr),
                    intr_bk_sttlm_amt: amount,
                    intr_bk_sttlm_dt: info.interbank_settlement_date,
                }
            });
            details.push(PaymentTransaction102 {
                orgnl_grp_inf: detail.original_group_information.as_ref().map(|group| OriginalGroupInformation29 {
                    orgnl_msg_id: group.message_id.clone(),
                    orgnl_msg_nm_id: group.message_type.clone(),
                    orgnl_cre_dt_tm: group.creation_date_time,
                }),
                orgnl_instr_id: present(&detail.original_instruction_id),
                orgnl_end_to_end_id: Some(end_to_end_or_placeholder(&detail.original_end_to_end_id)),
                orgnl_uetr: present(&detail.original_uetr),
                rsltn_rltd_inf: resolution,
            });
        }
        violations.finish()?;

        let status = &self.investigation_status;
        Ok(Document {
            xmlns: document_namespace(Self::KIND),
            rsltn_of_invstgtn: ResolutionOfInvestigationV09 {
                assgnmt: CaseAssignment5 {
                    id: self.identifier.message_id.clone(),
                    assgnr: Party40Choice::agent(self.sender.sender_agent(config, true)),
                    assgne: Party40Choice::agent(self.receiver.receiver_agent(config, true)),
                    cre_dt_tm: self.creation_date_time.unwrap_or_else(reference_now),
                },
                rslvd_case: self.resolved_case.as_ref().map(|case| case.to_document(config)),
                sts: InvestigationStatus5Choice {
                    conf: present(&status.confirmation),
                    dplct_of: status.duplicate_of.as_ref().map(|case| case.to_document(config)),
                    assgnmt_cxl_conf: status.assignment_cancellation_confirmation,
                },
                cxl_dtls: if details.is_empty() {
                    Vec::new()
                } else {
                    vec![UnderlyingTransaction22 { tx_inf_and_sts: details }]
                },
            },
        })
    }

    fn parse(header: &BusinessApplicationHeaderV02, document: Document) -> ConversionResult<Self> {
        let body = document.rsltn_of_invstgtn;
        let assigner = body.assgnmt.assgnr.agt.unwrap_or_default();
        let assignee = body.assgnmt.assgne.agt.unwrap_or_default();

        let cancellation_details = body
            .cxl_dtls
            .into_iter()
            .flat_map(|underlying| underlying.tx_inf_and_sts)
            .map(|tx| CancellationDetail {
                original_group_information: tx.orgnl_grp_inf.map(|group| OriginalGroupInfo {
                    message_id: group.orgnl_msg_id,
                    message_type: group.orgnl_msg_nm_id,
                    creation_date_time: group.orgnl_cre_dt_tm,
                }),
                original_instruction_id: tx.orgnl_instr_id,
                original_end_to_end_id: tx.orgnl_end_to_end_id.unwrap_or_default(),
                original_uetr: tx.orgnl_uetr,
                resolution_related_information: tx.rsltn_rltd_inf.map(|info| ResolutionRelatedInfo {
                    end_to_end_id: info.end_to_end_id,
                    transaction_id: info.tx_id,
                    uetr: info.uetr,
                    interbank_settlement_amount: info.intr_bk_sttlm_amt.as_ref().map(Amount::from_document),
                    interbank_settlement_date: info.intr_bk_sttlm_dt,
                }),
            })
            .collect();

        Ok(Self {
            creation_date_time: Some(body.assgnmt.cre_dt_tm),
            identifier: Identifier {
                business_message_id: header.biz_msg_idr.clone(),
                message_id: body.assgnmt.id,
                message_type: header.msg_def_idr.clone(),
                creation_date_time: Some(header.cre_dt),
                ..Identifier::default()
            },
            resolved_case: body.rslvd_case.map(Case::from_document),
            investigation_status: InvestigationStatus {
                confirmation: body.sts.conf,
                duplicate_of: body.sts.dplct_of.map(Case::from_document),
                assignment_cancellation_confirmation: body.sts.assgnmt_cxl_conf,
            },
            cancellation_details,
            sender: DepositoryInstitution::sender(assigner.member_id()).with_short_name(assigner.name()),
            receiver: DepositoryInstitution::receiver(assignee.member_id()).with_short_name(assignee.name()),
            preferred_wrapper: None,
        })
    }

    fn into_message(self) -> Message {
        Message::CancellationResponse(self)
    }

    fn from_message(message: Message) -> Result<Self, Message> {
        match message {
            Message::CancellationResponse(m) => Ok(m),
            other => Err(other),
        }
    }
}
