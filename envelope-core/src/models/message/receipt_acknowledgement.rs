use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::common::{present, Identifier, Violations};
use super::{Iso20022Message, Message};
use crate::models::clock::{iso_datetime, reference_now};
use crate::models::config::Config;
use crate::models::errors::ConversionResult;
use crate::models::iso20022::admi007::{
    Document, MessageHeader10, MessageReference1, ReceiptAcknowledgementReport2, ReceiptAcknowledgementV01,
    RequestHandling2,
};
use crate::models::iso20022::document_namespace;
use crate::models::iso20022::head::BusinessApplicationHeaderV02;

/// Acknowledges receipt of one or more earlier messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptAcknowledgement {
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<OffsetDateTime>,

    #[serde(default)]
    pub identifier: Identifier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_name: Option<String>,

    #[serde(default)]
    pub reports: Vec<AcknowledgementReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgementReport {
    #[serde(default)]
    pub related_reference: RelatedReference,

    #[serde(default)]
    pub request_handling: RequestHandling,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedReference {
    #[serde(default)]
    pub reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHandling {
    #[serde(default)]
    pub status_code: String,

    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub status_date_time: Option<OffsetDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Iso20022Message for ReceiptAcknowledgement {
    const KIND: &'static str = "admi.007.001.01";
    type Document = Document;

    fn business_message_id(&self) -> &str {
        self.identifier.header_id()
    }

    fn set_creation_date_time(&mut self, at: OffsetDateTime) {
        self.creation_date_time = Some(at);
    }

    fn build(&self, _config: &Config) -> ConversionResult<Document> {
        let mut violations = Violations::default();
        violations.require(!self.identifier.message_id.trim().is_empty(), "identifier.messageId is required");
        violations.require(!self.reports.is_empty(), "reports must not be empty");
        for (index, report) in self.reports.iter().enumerate() {
            violations.require(
                !report.related_reference.reference.trim().is_empty(),
                &format!("reports[{}].relatedReference.reference is required", index),
            );
            violations.require(
                !report.request_handling.status_code.trim().is_empty(),
                &format!("reports[{}].requestHandling.statusCode is required", index),
            );
        }
        violations.finish()?;

        Ok(Document {
            xmlns: document_namespace(Self::KIND),
            rct_ack: ReceiptAcknowledgementV01 {
                msg_id: MessageHeader10 {
                    msg_id: self.identifier.message_id.clone(),
                    cre_dt_tm: Some(self.creation_date_time.unwrap_or_else(reference_now)),
                    qry_nm: present(&self.query_name),
                },
                rpt: self
                    .reports
                    .iter()
                    .map(|report| ReceiptAcknowledgementReport2 {
                        rltd_ref: MessageReference1 {
                            reference: report.related_reference.reference.clone(),
                            msg_nm: present(&report.related_reference.message_name),
                        },
                        req_hdlg: RequestHandling2 {
                            sts_cd: report.request_handling.status_code.clone(),
                            sts_dt_tm: report.request_handling.status_date_time,
                            desc: present(&report.request_handling.description),
                        },
                    })
                    .collect(),
            },
        })
    }

    fn parse(header: &BusinessApplicationHeaderV02, document: Document) -> ConversionResult<Self> {
        let body = document.rct_ack;
        Ok(Self {
            creation_date_time: Some(body.msg_id.cre_dt_tm.unwrap_or(header.cre_dt)),
            identifier: Identifier {
                business_message_id: header.biz_msg_idr.clone(),
                message_id: body.msg_id.msg_id,
                message_type: header.msg_def_idr.clone(),
                creation_date_time: Some(header.cre_dt),
                ..Identifier::default()
            },
            query_name: body.msg_id.qry_nm,
            reports: body
                .rpt
                .into_iter()
                .map(|report| AcknowledgementReport {
                    related_reference: RelatedReference {
                        reference: report.rltd_ref.reference,
                        message_name: report.rltd_ref.msg_nm,
                    },
                    request_handling: RequestHandling {
                        status_code: report.req_hdlg.sts_cd,
                        status_date_time: report.req_hdlg.sts_dt_tm,
                        description: report.req_hdlg.desc,
                    },
                })
                .collect(),
        })
    }

    fn into_message(self) -> Message {
        Message::ReceiptAcknowledgement(self)
    }

    fn from_message(message: Message) -> Result<Self, Message> {
        match message {
            Message::ReceiptAcknowledgement(m) => Ok(m),
            other => Err(other),
        }
    }
}
