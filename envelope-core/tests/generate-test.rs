use std::fs;

use envelope_core::models::config::Config;
use envelope_core::models::errors::ConversionError;
use envelope_core::models::message::*;
use envelope_core::models::registry::MessageRegistry;
use envelope_core::models::schema::SchemaResource;
use time::macros::datetime;
use time::OffsetDateTime;

const SCHEMA_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/outgoing.xsd");
const CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/config.json");
const CREDIT_TRANSFER_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/credit_transfer.json");

fn fixed_clock() -> OffsetDateTime {
    datetime!(2024-06-03 14:30:00 -04:00)
}

fn registry() -> MessageRegistry {
    MessageRegistry::with_default_kinds().with_clock(fixed_clock)
}

fn config() -> Config {
    Config::from_file(CONFIG_PATH).expect("Failed to load config fixture")
}

fn credit_transfer() -> CreditTransfer {
    let bytes = fs::read(CREDIT_TRANSFER_PATH).expect("Failed to read credit transfer fixture");
    let envelope: FedNowEnvelope<CreditTransfer> = serde_json::from_slice(&bytes).expect("Failed to decode fixture");
    envelope.fed_now_message
}

fn generate(registry: &MessageRegistry, kind: &str, message: Message) -> Result<String, ConversionError> {
    let bytes = registry.generate(&SchemaResource::file(SCHEMA_PATH), kind, &config(), message)?;
    Ok(String::from_utf8(bytes).expect("Output is not UTF-8"))
}

#[test]
fn test_credit_transfer_end_to_end() {
    // Stage 1: Decode the JSON carrier through the registry
    let registry = registry();
    let json = fs::read(CREDIT_TRANSFER_PATH).expect("Failed to read credit transfer fixture");
    let message = registry.decode("pacs.008.001.08", &json).expect("Failed to decode message");
    assert_eq!(message.kind(), "pacs.008.001.08");

    // Stage 2: Generate the enveloped document
    let xml = generate(&registry, "pacs.008.001.08", message).expect("Failed to generate message");

    // Stage 3: Verify nesting order
    assert!(xml.starts_with(
        "<FedNowOutgoing xmlns=\"urn:fednow:outgoing\">\n    <FedNowOutgoingMessage>\n        <FedNowCustomerCreditTransfer>\n<AppHdr"
    ));
    assert!(xml.ends_with("        </FedNowCustomerCreditTransfer>\n    </FedNowOutgoingMessage>\n</FedNowOutgoing>"));
    let header_at = xml.find("<AppHdr").expect("Missing header");
    let body_at = xml.find("<Document").expect("Missing body");
    assert!(header_at < body_at);

    // Stage 4: Verify header and body content
    assert!(xml.contains("<AppHdr xmlns=\"urn:iso:std:iso:20022:tech:xsd:head.001.001.02\">"));
    assert!(xml.contains("<Document xmlns=\"urn:iso:std:iso:20022:tech:xsd:pacs.008.001.08\">"));
    assert!(xml.contains("<MsgDefIdr>pacs.008.001.08</MsgDefIdr>"));
    assert!(xml.contains("<BizMsgIdr>20240603121182904A1B2C3D4E5F6</BizMsgIdr>"));
    assert!(xml.contains("<MmbId>011104238</MmbId>"), "header sender comes from config");
    assert!(xml.contains("<MmbId>021150706</MmbId>"), "header receiver comes from config");
    assert!(xml.contains("<MmbId>121182904</MmbId>"));
    assert!(xml.contains("<MmbId>084106768</MmbId>"));
    assert!(xml.contains("<IntrBkSttlmAmt Ccy=\"USD\">1000.00</IntrBkSttlmAmt>"));
    assert!(xml.contains("<IntrBkSttlmDt>2024-06-03</IntrBkSttlmDt>"));
    assert!(xml.contains("<CreDt>2024-06-03T14:30:00-04:00</CreDt>"));
    assert!(xml.contains("<CreDtTm>2024-06-03T14:30:00-04:00</CreDtTm>"));
    assert!(xml.contains("<SttlmMtd>CLRG</SttlmMtd>"));
    assert!(xml.contains("<Prtry>FDNA</Prtry>"));
    assert!(xml.contains("<UETR>8a562c67-ca16-48ba-b074-65581be6f011</UETR>"));
    assert!(xml.contains("<Id>frb.fednow.01</Id>"));
}

#[test]
fn test_creation_time_is_always_stamped() {
    let mut transfer = credit_transfer();
    transfer.creation_date_time = Some(datetime!(2020-01-01 00:00:00 -05:00));

    let xml = generate(&registry(), "pacs.008.001.08", Message::CreditTransfer(transfer)).expect("Failed to generate");
    assert!(!xml.contains("2020-01-01"));
    assert!(xml.contains("<CreDtTm>2024-06-03T14:30:00-04:00</CreDtTm>"));
}

#[test]
fn test_missing_end_to_end_id_uses_placeholder() {
    let mut transfer = credit_transfer();
    transfer.identifier.end_to_end_id = String::new();
    transfer.identifier.business_message_id = String::new();

    let xml = generate(&registry(), "pacs.008.001.08", Message::CreditTransfer(transfer)).expect("Failed to generate");
    assert!(xml.contains("<EndToEndId>NOTPROVIDED</EndToEndId>"));
    // business message id falls back to the message id
    assert!(xml.contains("<BizMsgIdr>20240603121182904A1B2C3D4E5F6</BizMsgIdr>"));
}

#[test]
fn test_unsupported_kind_fails_before_resolution() {
    let registry = registry();
    let err = generate(&registry, "pacs.009.001.08", Message::CreditTransfer(credit_transfer()))
        .expect_err("Generation should fail");
    assert!(matches!(err, ConversionError::UnsupportedMessageKind(ref kind) if kind == "pacs.009.001.08"));
    assert!(registry.cache().is_empty());
}

#[test]
fn test_variant_mismatch_is_rejected() {
    let err = generate(&registry(), "pacs.002.001.10", Message::CreditTransfer(credit_transfer()))
        .expect_err("Generation should fail");
    match err {
        ConversionError::TypeMismatch { expected, found } => {
            assert_eq!(expected, "pacs.002.001.10");
            assert_eq!(found, "pacs.008.001.08");
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_validation_reports_every_missing_field() {
    let mut transfer = credit_transfer();
    transfer.originator.personal.postal_address.postal_code = None;
    transfer.beneficiary.personal.postal_address.country = Some(String::new());
    transfer.amount.amount = "one thousand".to_string();
    transfer.identifier.uetr = Some("not-a-uuid".to_string());

    let err = generate(&registry(), "pacs.008.001.08", Message::CreditTransfer(transfer))
        .expect_err("Generation should fail");
    let violations = err.violations();
    assert_eq!(violations.len(), 4, "{:?}", violations);
    assert_eq!(violations[0], "originator address missing PostalCode");
    assert_eq!(violations[1], "beneficiary address missing Country");
    assert!(violations[2].starts_with("amount 'one thousand'"));
    assert!(violations[3].contains("not-a-uuid"));
}

#[test]
fn test_cancellation_response_wrappers() {
    let response = CancellationResponse {
        identifier: Identifier {
            message_id: "20240603CASE0001".to_string(),
            ..Identifier::default()
        },
        investigation_status: InvestigationStatus {
            confirmation: Some("CNCL".to_string()),
            ..InvestigationStatus::default()
        },
        sender: DepositoryInstitution::sender("084106768"),
        receiver: DepositoryInstitution::receiver("121182904"),
        ..CancellationResponse::default()
    };
    let registry = registry();

    // First wrapper in the schema wins by default
    let xml = generate(&registry, "camt.029.001.09", Message::CancellationResponse(response.clone()))
        .expect("Failed to generate");
    assert!(xml.contains("<FedNowReturnRequestResponse>"));
    assert!(xml.contains("<Conf>CNCL</Conf>"));

    // A preferred wrapper overrides the cached one for this document only
    let preferred = CancellationResponse {
        preferred_wrapper: Some("FedNowInformationRequestResponse".to_string()),
        ..response
    };
    let xml = generate(&registry, "camt.029.001.09", Message::CancellationResponse(preferred))
        .expect("Failed to generate");
    assert!(xml.contains("<FedNowInformationRequestResponse>"));
    assert!(!xml.contains("FedNowReturnRequestResponse"));

    let cached = registry.cache().get("camt.029.001.09").expect("Descriptor should be cached");
    assert_eq!(cached.wrapper_element, "FedNowReturnRequestResponse");
    assert_eq!(registry.cache().computations(), 1);
}

#[test]
fn test_undeclared_preferred_wrapper_is_rejected() {
    let response = CancellationResponse {
        identifier: Identifier {
            message_id: "20240603CASE0002".to_string(),
            ..Identifier::default()
        },
        investigation_status: InvestigationStatus {
            confirmation: Some("CNCL".to_string()),
            ..InvestigationStatus::default()
        },
        sender: DepositoryInstitution::sender("084106768"),
        receiver: DepositoryInstitution::receiver("121182904"),
        preferred_wrapper: Some("NotInSchema foo=\"bar\"><Injected/".to_string()),
        ..CancellationResponse::default()
    };

    let err = generate(&registry(), "camt.029.001.09", Message::CancellationResponse(response))
        .expect_err("Generation should fail");
    let violations = err.violations();
    assert_eq!(violations.len(), 1, "{:?}", violations);
    assert!(violations[0].contains("NotInSchema"));
    assert!(violations[0].contains("FedNowInformationRequestResponse"));
}

#[test]
fn test_rejected_status_requires_reason() {
    let report = StatusReport {
        identifier: Identifier {
            message_id: "20240603STS0001".to_string(),
            ..Identifier::default()
        },
        payment_status: PaymentStatus {
            status: "RJCT".to_string(),
            ..PaymentStatus::default()
        },
        ..StatusReport::default()
    };
    let err = generate(&registry(), "pacs.002.001.10", Message::StatusReport(report.clone()))
        .expect_err("Generation should fail");
    assert!(matches!(err, ConversionError::Validation { .. }));

    let with_reason = StatusReport {
        payment_status: PaymentStatus {
            status: "RJCT".to_string(),
            status_reason: Some("AC03".to_string()),
            additional_information: Some("Invalid creditor account".to_string()),
            ..PaymentStatus::default()
        },
        ..report
    };
    let xml = generate(&registry(), "pacs.002.001.10", Message::StatusReport(with_reason)).expect("Failed to generate");
    assert!(xml.contains("<TxSts>RJCT</TxSts>"));
    assert!(xml.contains("<Cd>AC03</Cd>"));
    assert!(xml.contains("<AddtlInf>Invalid creditor account</AddtlInf>"));
}
