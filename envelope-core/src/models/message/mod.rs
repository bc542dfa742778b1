mod cancellation_request;
mod cancellation_response;
mod common;
mod credit_transfer;
mod message_reject;
mod payment_request;
mod payment_return;
mod receipt_acknowledgement;
mod status_report;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::config::Config;
use crate::models::errors::{ConversionError, ConversionResult};
use crate::models::iso20022::head::BusinessApplicationHeaderV02;

pub use self::cancellation_request::CancellationRequest;
pub use self::cancellation_response::{
    CancellationDetail, CancellationResponse, Case, InvestigationStatus, OriginalGroupInfo, ResolutionRelatedInfo,
};
pub use self::common::{
    end_to_end_or_placeholder, Amount, DepositoryInstitution, Identifier, Party, PaymentType, Personal, PostalAddress,
    END_TO_END_PLACEHOLDER,
};
pub use self::credit_transfer::CreditTransfer;
pub use self::message_reject::{MessageReject, RejectionReason};
pub use self::payment_request::{ExecutionInfo, PaymentRequest};
pub use self::payment_return::{PaymentReturn, ReturnDetails};
pub use self::receipt_acknowledgement::{AcknowledgementReport, ReceiptAcknowledgement, RelatedReference, RequestHandling};
pub use self::status_report::{PaymentStatus, StatusClass, StatusReport};

/// JSON carrier shared by every message kind: `{"fedNowMessage": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FedNowEnvelope<T> {
    #[serde(rename = "fedNowMessage")]
    pub fed_now_message: T,
}

/// Conversion between a domain message and its ISO 20022 document.
pub trait Iso20022Message: Sized + Serialize + DeserializeOwned {
    /// Message definition identifier, e.g. `pacs.008.001.08`.
    const KIND: &'static str;

    type Document: Serialize + DeserializeOwned;

    /// Value written to `BizMsgIdr`.
    fn business_message_id(&self) -> &str;

    fn set_creation_date_time(&mut self, at: OffsetDateTime);

    /// Validates the message and maps it onto the document, applying config defaults.
    fn build(&self, config: &Config) -> ConversionResult<Self::Document>;

    /// Maps a received document back onto the domain message.
    fn parse(header: &BusinessApplicationHeaderV02, document: Self::Document) -> ConversionResult<Self>;

    fn into_message(self) -> Message;

    /// Hands the message back unchanged when it is another kind.
    fn from_message(message: Message) -> Result<Self, Message>;

    /// Wrapper element requested by the message itself, overriding the schema's.
    fn preferred_wrapper(&self) -> Option<&str> {
        None
    }
}

/// Any supported message, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    CreditTransfer(CreditTransfer),
    StatusReport(StatusReport),
    PaymentReturn(PaymentReturn),
    CancellationRequest(CancellationRequest),
    CancellationResponse(CancellationResponse),
    ReceiptAcknowledgement(ReceiptAcknowledgement),
    PaymentRequest(PaymentRequest),
    MessageReject(MessageReject),
}

impl Message {
    pub fn kind(&self) -> &'static str {
        match self {
            Message::CreditTransfer(_) => CreditTransfer::KIND,
            Message::StatusReport(_) => StatusReport::KIND,
            Message::PaymentReturn(_) => PaymentReturn::KIND,
            Message::CancellationRequest(_) => CancellationRequest::KIND,
            Message::CancellationResponse(_) => CancellationResponse::KIND,
            Message::ReceiptAcknowledgement(_) => ReceiptAcknowledgement::KIND,
            Message::PaymentRequest(_) => PaymentRequest::KIND,
            Message::MessageReject(_) => MessageReject::KIND,
        }
    }

    /// Decodes the JSON carrier for a known message type.
    pub fn from_json<T: Iso20022Message>(bytes: &[u8]) -> ConversionResult<Message> {
        let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
        let envelope: FedNowEnvelope<T> = serde_path_to_error::deserialize(deserializer)?;
        Ok(envelope.fed_now_message.into_message())
    }

    /// Renders the message inside the JSON carrier.
    pub fn to_json(&self) -> ConversionResult<String> {
        match self {
            Message::CreditTransfer(m) => wrap(m),
            Message::StatusReport(m) => wrap(m),
            Message::PaymentReturn(m) => wrap(m),
            Message::CancellationRequest(m) => wrap(m),
            Message::CancellationResponse(m) => wrap(m),
            Message::ReceiptAcknowledgement(m) => wrap(m),
            Message::PaymentRequest(m) => wrap(m),
            Message::MessageReject(m) => wrap(m),
        }
    }
}

fn wrap<T: Serialize>(message: &T) -> ConversionResult<String> {
    serde_json::to_string_pretty(&FedNowEnvelope { fed_now_message: message })
        .map_err(|e| ConversionError::Serialization(e.to_string()))
}
