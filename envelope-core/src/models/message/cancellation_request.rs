use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::common::{end_to_end_or_placeholder, present, DepositoryInstitution, Identifier, Violations};
use super::{Iso20022Message, Message};
use crate::models::clock::{iso_datetime, reference_now};
use crate::models::config::Config;
use crate::models::errors::{ConversionError, ConversionResult};
use crate::models::iso20022::camt056::{
    CancellationReason33Choice, CaseAssignment5, Document, FIToFIPaymentCancellationRequestV08, OriginalGroupHeader15,
    PaymentCancellationReason5, PaymentTransaction106, UnderlyingTransaction23,
};
use crate::models::iso20022::head::BusinessApplicationHeaderV02;
use crate::models::iso20022::{document_namespace, Party40Choice};

/// Request to cancel or return a previously sent credit transfer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationRequest {
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<OffsetDateTime>,

    /// `messageId` doubles as the case assignment id.
    #[serde(default)]
    pub identifier: Identifier,

    #[serde(default)]
    pub original_identifier: Identifier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,

    #[serde(rename = "senderDepositoryInstitution", default)]
    pub sender: DepositoryInstitution,

    #[serde(rename = "receiverDepositoryInstitution", default)]
    pub receiver: DepositoryInstitution,
}

impl Iso20022Message for CancellationRequest {
    const KIND: &'static str = "camt.056.001.08";
    type Document = Document;

    fn business_message_id(&self) -> &str {
        self.identifier.header_id()
    }

    fn set_creation_date_time(&mut self, at: OffsetDateTime) {
        self.creation_date_time = Some(at);
    }

    fn build(&self, config: &Config) -> ConversionResult<Document> {
        let mut violations = Violations::default();
        violations.require(!self.identifier.message_id.trim().is_empty(), "identifier.messageId is required");
        violations.uetr("originalIdentifier.uetr", &self.original_identifier.uetr);
        violations.finish()?;

        let original = &self.original_identifier;
        let reason = present(&self.cancellation_reason);
        let additional = present(&self.additional_information);
        let cxl_rsn_inf = if reason.is_some() || additional.is_some() {
            vec![PaymentCancellationReason5 {
                rsn: reason.map(|cd| CancellationReason33Choice { cd: Some(cd), prtry: None }),
                addtl_inf: additional.into_iter().collect(),
            }]
        } else {
            Vec::new()
        };

        Ok(Document {
            xmlns: document_namespace(Self::KIND),
            fi_to_fi_pmt_cxl_req: FIToFIPaymentCancellationRequestV08 {
                assgnmt: CaseAssignment5 {
                    id: self.identifier.message_id.clone(),
                    assgnr: Party40Choice::agent(self.sender.sender_agent(config, true)),
                    assgne: Party40Choice::agent(self.receiver.receiver_agent(config, true)),
                    cre_dt_tm: self.creation_date_time.unwrap_or_else(reference_now),
                },
                undrlyg: vec![UnderlyingTransaction23 {
                    orgnl_grp_inf_and_cxl: Some(OriginalGroupHeader15 {
                        orgnl_msg_id: original.message_id.clone(),
                        orgnl_msg_nm_id: original.message_type.clone(),
                        orgnl_cre_dt_tm: original.creation_date_time,
                        cxl_rsn_inf: Vec::new(),
                    }),
                    tx_inf: vec![PaymentTransaction106 {
                        orgnl_instr_id: present(&original.instruction_id),
                        orgnl_end_to_end_id: Some(end_to_end_or_placeholder(&original.end_to_end_id)),
                        orgnl_tx_id: present(&original.transaction_id),
                        orgnl_uetr: present(&original.uetr),
                        assgnr: None,
                        assgne: None,
                        cxl_rsn_inf,
                    }],
                }],
            },
        })
    }

    fn parse(header: &BusinessApplicationHeaderV02, document: Document) -> ConversionResult<Self> {
        let body = document.fi_to_fi_pmt_cxl_req;
        let underlying = body
            .undrlyg
            .into_iter()
            .next()
            .ok_or_else(|| ConversionError::Parse("cancellation request carries no underlying transaction".to_string()))?;
        let group = underlying.orgnl_grp_inf_and_cxl.unwrap_or_default();
        let tx = underlying.tx_inf.into_iter().next().unwrap_or_default();

        // Reasons may sit on the transaction or on the original group.
        let reason = tx
            .cxl_rsn_inf
            .into_iter()
            .next()
            .or_else(|| group.cxl_rsn_inf.into_iter().next())
            .unwrap_or_default();

        let assigner = body.assgnmt.assgnr.agt.unwrap_or_default();
        let assignee = body.assgnmt.assgne.agt.unwrap_or_default();

        Ok(Self {
            creation_date_time: Some(body.assgnmt.cre_dt_tm),
            identifier: Identifier {
                business_message_id: header.biz_msg_idr.clone(),
                message_id: body.assgnmt.id,
                message_type: header.msg_def_idr.clone(),
                creation_date_time: Some(header.cre_dt),
                ..Identifier::default()
            },
            original_identifier: Identifier {
                message_id: group.orgnl_msg_id,
                message_type: group.orgnl_msg_nm_id,
                instruction_id: tx.orgnl_instr_id,
                end_to_end_id: tx.orgnl_end_to_end_id.unwrap_or_default(),
                transaction_id: tx.orgnl_tx_id,
                uetr: tx.orgnl_uetr,
                creation_date_time: group.orgnl_cre_dt_tm,
                ..Identifier::default()
            },
            cancellation_reason: reason.rsn.and_then(|r| r.cd.or(r.prtry)),
            additional_information: reason.addtl_inf.into_iter().next(),
            sender: DepositoryInstitution::sender(assigner.member_id()).with_short_name(assigner.name()),
            receiver: DepositoryInstitution::receiver(assignee.member_id()).with_short_name(assignee.name()),
        })
    }

    fn into_message(self) -> Message {
        Message::CancellationRequest(self)
    }

    fn from_message(message: Message) -> Result<Self, Message> {
        match message {
            Message::CancellationRequest(m) => Ok(m),
            other => Err(other),
        }
    }
}
