use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::common::{end_to_end_or_placeholder, present, DepositoryInstitution, Identifier, Violations};
use super::{Iso20022Message, Message};
use crate::models::clock::{iso_datetime, reference_now};
use crate::models::config::Config;
use crate::models::errors::{ConversionError, ConversionResult};
use crate::models::iso20022::head::BusinessApplicationHeaderV02;
use crate::models::iso20022::pacs002::{
    Document, FIToFIPaymentStatusReportV10, GroupHeader91, PaymentTransaction110, StatusReason6Choice,
    StatusReasonInformation12,
};
use crate::models::iso20022::{agent_member_id, document_namespace, DateAndDateTime2Choice, OriginalGroupInformation29};

/// Status of a previously sent payment, reported back to its sender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<OffsetDateTime>,

    #[serde(default)]
    pub identifier: Identifier,

    #[serde(default)]
    pub original_identifier: Identifier,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    #[serde(rename = "senderDepositoryInstitution", default)]
    pub sender: DepositoryInstitution,

    #[serde(rename = "receiverDepositoryInstitution", default)]
    pub receiver: DepositoryInstitution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    /// ISO external status code, e.g. `ACSC` or `RJCT`.
    #[serde(rename = "paymentStatus", default)]
    pub status: String,

    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub acceptance_date_time: Option<OffsetDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Accepted,
    Rejected,
    Pending,
}

impl PaymentStatus {
    pub fn class(&self) -> StatusClass {
        match self.status.trim() {
            "ACSC" | "ACWP" => StatusClass::Accepted,
            "RJCT" => StatusClass::Rejected,
            _ => StatusClass::Pending,
        }
    }
}

impl Iso20022Message for StatusReport {
    const KIND: &'static str = "pacs.002.001.10";
    type Document = Document;

    fn business_message_id(&self) -> &str {
        self.identifier.header_id()
    }

    fn set_creation_date_time(&mut self, at: OffsetDateTime) {
        self.creation_date_time = Some(at);
    }

    fn build(&self, config: &Config) -> ConversionResult<Document> {
        let status = &self.payment_status;
        let class = status.class();

        let mut violations = Violations::default();
        violations.require(!status.status.trim().is_empty(), "paymentStatus is required");
        if class == StatusClass::Rejected {
            violations.require(
                present(&status.status_reason).is_some(),
                "statusReason is required when paymentStatus is RJCT",
            );
        }
        violations.uetr("originalIdentifier.uetr", &self.original_identifier.uetr);
        violations.finish()?;

        let original = &self.original_identifier;
        let mut transaction = PaymentTransaction110 {
            orgnl_grp_inf: Some(OriginalGroupInformation29 {
                orgnl_msg_id: original.message_id.clone(),
                orgnl_msg_nm_id: original.message_type.clone(),
                orgnl_cre_dt_tm: original.creation_date_time,
            }),
            orgnl_instr_id: present(&original.instruction_id),
            orgnl_end_to_end_id: Some(end_to_end_or_placeholder(&original.end_to_end_id)),
            orgnl_tx_id: present(&original.transaction_id),
            orgnl_uetr: present(&original.uetr),
            tx_sts: Some(status.status.trim().to_string()),
            instg_agt: Some(self.sender.sender_agent(config, false)),
            instd_agt: Some(self.receiver.receiver_agent(config, false)),
            ..PaymentTransaction110::default()
        };

        match class {
            StatusClass::Accepted => {
                if let Some(accepted) = status.acceptance_date_time {
                    transaction.accptnc_dt_tm = Some(accepted);
                    transaction.fctv_intr_bk_sttlm_dt = Some(DateAndDateTime2Choice {
                        dt: Some(accepted.date()),
                        dt_tm: None,
                    });
                }
            }
            StatusClass::Rejected => {
                transaction.sts_rsn_inf = vec![StatusReasonInformation12 {
                    rsn: Some(StatusReason6Choice {
                        cd: present(&status.status_reason),
                        prtry: None,
                    }),
                    addtl_inf: present(&status.additional_information).into_iter().collect(),
                }];
            }
            StatusClass::Pending => {}
        }

        Ok(Document {
            xmlns: document_namespace(Self::KIND),
            fi_to_fi_pmt_sts_rpt: FIToFIPaymentStatusReportV10 {
                grp_hdr: GroupHeader91 {
                    msg_id: self.identifier.message_id.clone(),
                    cre_dt_tm: self.creation_date_time.unwrap_or_else(reference_now),
                },
                tx_inf_and_sts: vec![transaction],
            },
        })
    }

    fn parse(header: &BusinessApplicationHeaderV02, document: Document) -> ConversionResult<Self> {
        let body = document.fi_to_fi_pmt_sts_rpt;
        let tx = body
            .tx_inf_and_sts
            .into_iter()
            .next()
            .ok_or_else(|| ConversionError::Parse("status report carries no transaction status".to_string()))?;

        let mut payment_status = PaymentStatus {
            status: tx.tx_sts.clone().unwrap_or_default(),
            ..PaymentStatus::default()
        };
        match payment_status.class() {
            StatusClass::Accepted => payment_status.acceptance_date_time = tx.accptnc_dt_tm,
            StatusClass::Rejected => {
                if let Some(reason) = tx.sts_rsn_inf.first() {
                    payment_status.status_reason = reason.rsn.as_ref().and_then(|r| r.cd.clone().or(r.prtry.clone()));
                    payment_status.additional_information = reason.addtl_inf.first().cloned();
                }
            }
            StatusClass::Pending => {}
        }

        let original_group = tx.orgnl_grp_inf.clone().unwrap_or_default();

        Ok(Self {
            creation_date_time: Some(body.grp_hdr.cre_dt_tm),
            identifier: Identifier {
                business_message_id: header.biz_msg_idr.clone(),
                message_id: body.grp_hdr.msg_id,
                message_type: header.msg_def_idr.clone(),
                creation_date_time: Some(header.cre_dt),
                ..Identifier::default()
            },
            original_identifier: Identifier {
                message_id: original_group.orgnl_msg_id,
                message_type: original_group.orgnl_msg_nm_id,
                instruction_id: tx.orgnl_instr_id,
                end_to_end_id: tx.orgnl_end_to_end_id.unwrap_or_default(),
                transaction_id: tx.orgnl_tx_id,
                uetr: tx.orgnl_uetr,
                creation_date_time: original_group.orgnl_cre_dt_tm,
                ..Identifier::default()
            },
            payment_status,
            sender: DepositoryInstitution::sender(agent_member_id(&tx.instg_agt)),
            receiver: DepositoryInstitution::receiver(agent_member_id(&tx.instd_agt)),
        })
    }

    fn into_message(self) -> Message {
        Message::StatusReport(self)
    }

    fn from_message(message: Message) -> Result<Self, Message> {
        match message {
            Message::StatusReport(m) => Ok(m),
            other => Err(other),
        }
    }
}
