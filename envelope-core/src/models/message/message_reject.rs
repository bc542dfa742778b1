use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::common::{present, Identifier, Violations};
use super::{Iso20022Message, Message};
use crate::models::clock::iso_datetime;
use crate::models::config::Config;
use crate::models::errors::ConversionResult;
use crate::models::iso20022::admi002::{Admi00200101, Document, MessageReference, RejectionReason2};
use crate::models::iso20022::document_namespace;
use crate::models::iso20022::head::BusinessApplicationHeaderV02;

/// Rejection of a message that could not be processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReject {
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<OffsetDateTime>,

    #[serde(default)]
    pub identifier: Identifier,

    /// Identifier of the rejected message.
    #[serde(default)]
    pub reference: String,

    #[serde(default)]
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionReason {
    #[serde(default)]
    pub rejection_reason: String,

    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub rejection_date_time: Option<OffsetDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Iso20022Message for MessageReject {
    const KIND: &'static str = "admi.002.001.01";
    type Document = Document;

    fn business_message_id(&self) -> &str {
        self.identifier.header_id()
    }

    fn set_creation_date_time(&mut self, at: OffsetDateTime) {
        self.creation_date_time = Some(at);
    }

    fn build(&self, _config: &Config) -> ConversionResult<Document> {
        let mut violations = Violations::default();
        violations.require(!self.reference.trim().is_empty(), "reference is required");
        violations.require(
            !self.reason.rejection_reason.trim().is_empty(),
            "reason.rejectionReason is required",
        );
        violations.finish()?;

        Ok(Document {
            xmlns: document_namespace(Self::KIND),
            admi_002_001_01: Admi00200101 {
                rltd_ref: MessageReference {
                    reference: self.reference.clone(),
                },
                rsn: RejectionReason2 {
                    rjctg_pty_rsn: self.reason.rejection_reason.clone(),
                    rjctn_dt_tm: self.reason.rejection_date_time,
                    err_lctn: present(&self.reason.error_location),
                    rsn_desc: present(&self.reason.description),
                },
            },
        })
    }

    /// The reject body has no message id of its own; the header's stands in.
    fn parse(header: &BusinessApplicationHeaderV02, document: Document) -> ConversionResult<Self> {
        let body = document.admi_002_001_01;
        Ok(Self {
            creation_date_time: Some(header.cre_dt),
            identifier: Identifier {
                business_message_id: header.biz_msg_idr.clone(),
                message_id: header.biz_msg_idr.clone(),
                message_type: header.msg_def_idr.clone(),
                creation_date_time: Some(header.cre_dt),
                ..Identifier::default()
            },
            reference: body.rltd_ref.reference,
            reason: RejectionReason {
                rejection_reason: body.rsn.rjctg_pty_rsn,
                rejection_date_time: body.rsn.rjctn_dt_tm,
                error_location: body.rsn.err_lctn,
                description: body.rsn.rsn_desc,
            },
        })
    }

    fn into_message(self) -> Message {
        Message::MessageReject(self)
    }

    fn from_message(message: Message) -> Result<Self, Message> {
        match message {
            Message::MessageReject(m) => Ok(m),
            other => Err(other),
        }
    }
}
