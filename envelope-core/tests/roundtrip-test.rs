use envelope_core::models::config::Config;
use envelope_core::models::message::*;
use envelope_core::models::registry::MessageRegistry;
use envelope_core::models::schema::SchemaResource;
use time::macros::{date, datetime};
use time::OffsetDateTime;

const SCHEMA_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/outgoing.xsd");
const CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/config.json");

const STAMP: OffsetDateTime = datetime!(2024-06-03 14:30:00 -04:00);

fn fixed_clock() -> OffsetDateTime {
    STAMP
}

/// Generates the message, parses the document back and returns both the XML and the result.
fn round_trip(message: Message) -> (String, Message) {
    let registry = MessageRegistry::with_default_kinds().with_clock(fixed_clock);
    let config = Config::from_file(CONFIG_PATH).expect("Failed to load config fixture");
    let kind = message.kind();

    let bytes = registry
        .generate(&SchemaResource::file(SCHEMA_PATH), kind, &config, message)
        .expect("Failed to generate message");
    let parsed = registry.parse(&bytes).expect("Failed to parse generated message");
    (String::from_utf8(bytes).expect("Output is not UTF-8"), parsed)
}

fn identifier(kind: &str, message_id: &str) -> Identifier {
    Identifier {
        business_message_id: format!("B{}", message_id),
        message_id: message_id.to_string(),
        message_type: kind.to_string(),
        creation_date_time: Some(STAMP),
        ..Identifier::default()
    }
}

fn original(kind: &str) -> Identifier {
    Identifier {
        message_id: "20240603121182904ORIGINAL01".to_string(),
        message_type: kind.to_string(),
        instruction_id: Some("INSTR-0001".to_string()),
        end_to_end_id: "E2E-0001".to_string(),
        transaction_id: Some("TX-0001".to_string()),
        uetr: Some("8a562c67-ca16-48ba-b074-65581be6f011".to_string()),
        creation_date_time: Some(datetime!(2024-06-03 09:15:00 -04:00)),
        ..Identifier::default()
    }
}

fn party(name: &str, account: &str) -> Party {
    Party {
        personal: Personal {
            name: Some(name.to_string()),
            postal_address: PostalAddress {
                street_name: Some("Main Street".to_string()),
                building_number: Some("100".to_string()),
                post_box: None,
                town_name: Some("San Francisco".to_string()),
                country_subdivision: Some("CA".to_string()),
                postal_code: Some("94105".to_string()),
                country: Some("US".to_string()),
            },
            identifier: account.to_string(),
        },
    }
}

fn sender() -> DepositoryInstitution {
    DepositoryInstitution::sender("121182904").with_short_name(Some("Pacific Bank".to_string()))
}

fn receiver() -> DepositoryInstitution {
    DepositoryInstitution::receiver("084106768").with_short_name(Some("Delta Savings".to_string()))
}

#[test]
fn test_credit_transfer_round_trip() {
    let transfer = CreditTransfer {
        creation_date_time: Some(STAMP),
        identifier: Identifier {
            instruction_id: Some("INSTR-0001".to_string()),
            end_to_end_id: "E2E-0001".to_string(),
            transaction_id: Some("TX-0001".to_string()),
            uetr: Some("8a562c67-ca16-48ba-b074-65581be6f011".to_string()),
            ..identifier("pacs.008.001.08", "20240603121182904CT01")
        },
        payment_type: PaymentType {
            category_purpose: Some("CONS".to_string()),
        },
        amount: Amount::new("1000.00", "USD"),
        sender: sender(),
        receiver: receiver(),
        originator: party("Jane Doe", "567876543"),
        beneficiary: party("John Roe", "1234567890"),
    };

    let (xml, parsed) = round_trip(Message::CreditTransfer(transfer.clone()));
    assert!(xml.contains("<FedNowCustomerCreditTransfer>"));
    assert_eq!(parsed, Message::CreditTransfer(transfer));
}

#[test]
fn test_status_report_round_trip() {
    let report = StatusReport {
        creation_date_time: Some(STAMP),
        identifier: identifier("pacs.002.001.10", "20240603084106768ST01"),
        original_identifier: original("pacs.008.001.08"),
        payment_status: PaymentStatus {
            status: "ACSC".to_string(),
            acceptance_date_time: Some(datetime!(2024-06-03 09:15:05 -04:00)),
            ..PaymentStatus::default()
        },
        sender: DepositoryInstitution::sender("084106768"),
        receiver: DepositoryInstitution::receiver("121182904"),
    };

    let (xml, parsed) = round_trip(Message::StatusReport(report.clone()));
    assert!(xml.contains("<FctvIntrBkSttlmDt>"));
    assert_eq!(parsed, Message::StatusReport(report));
}

#[test]
fn test_rejected_status_round_trip() {
    let report = StatusReport {
        creation_date_time: Some(STAMP),
        identifier: identifier("pacs.002.001.10", "20240603084106768ST02"),
        original_identifier: original("pacs.008.001.08"),
        payment_status: PaymentStatus {
            status: "RJCT".to_string(),
            status_reason: Some("AC03".to_string()),
            additional_information: Some("Invalid creditor account".to_string()),
            ..PaymentStatus::default()
        },
        sender: DepositoryInstitution::sender("084106768"),
        receiver: DepositoryInstitution::receiver("121182904"),
    };

    let (_, parsed) = round_trip(Message::StatusReport(report.clone()));
    assert_eq!(parsed, Message::StatusReport(report));
}

#[test]
fn test_payment_return_round_trip() {
    let payment_return = PaymentReturn {
        creation_date_time: Some(STAMP),
        identifier: Identifier {
            transaction_id: Some("RTR-0001".to_string()),
            ..identifier("pacs.004.001.10", "20240603084106768RT01")
        },
        original_identifier: original("pacs.008.001.08"),
        amount: Amount::new("1000.00", "USD"),
        payment_return: ReturnDetails {
            return_reason: "AC04".to_string(),
            additional_information: Some("Account closed".to_string()),
            returned_amount: Amount::new("1000.00", "USD"),
        },
        sender: sender(),
        receiver: receiver(),
        originator: party("Jane Doe", "567876543"),
        beneficiary: party("John Roe", "1234567890"),
    };

    let (xml, parsed) = round_trip(Message::PaymentReturn(payment_return.clone()));
    assert!(xml.contains("<RtrdIntrBkSttlmAmt Ccy=\"USD\">1000.00</RtrdIntrBkSttlmAmt>"));
    assert_eq!(parsed, Message::PaymentReturn(payment_return));
}

#[test]
fn test_cancellation_request_round_trip() {
    let request = CancellationRequest {
        creation_date_time: Some(STAMP),
        identifier: identifier("camt.056.001.08", "20240603121182904RR01"),
        original_identifier: original("pacs.008.001.08"),
        cancellation_reason: Some("DUPL".to_string()),
        additional_information: Some("Sent twice".to_string()),
        sender: sender(),
        receiver: receiver(),
    };

    let (xml, parsed) = round_trip(Message::CancellationRequest(request.clone()));
    assert!(xml.contains("<FedNowReturnRequest>"));
    assert_eq!(parsed, Message::CancellationRequest(request));
}

#[test]
fn test_cancellation_response_round_trip() {
    let response = CancellationResponse {
        creation_date_time: Some(STAMP),
        identifier: identifier("camt.029.001.09", "20240603084106768RS01"),
        resolved_case: Some(Case {
            case_id: "20240603121182904RR01".to_string(),
            creator: DepositoryInstitution::sender("121182904"),
        }),
        investigation_status: InvestigationStatus {
            confirmation: Some("CNCL".to_string()),
            ..InvestigationStatus::default()
        },
        cancellation_details: vec![CancellationDetail {
            original_group_information: Some(OriginalGroupInfo {
                message_id: "20240603121182904ORIGINAL01".to_string(),
                message_type: "pacs.008.001.08".to_string(),
                creation_date_time: Some(datetime!(2024-06-03 09:15:00 -04:00)),
            }),
            original_instruction_id: Some("INSTR-0001".to_string()),
            original_end_to_end_id: "E2E-0001".to_string(),
            original_uetr: Some("8a562c67-ca16-48ba-b074-65581be6f011".to_string()),
            resolution_related_information: Some(ResolutionRelatedInfo {
                end_to_end_id: Some("E2E-0001".to_string()),
                transaction_id: Some("TX-0001".to_string()),
                uetr: Some("8a562c67-ca16-48ba-b074-65581be6f011".to_string()),
                interbank_settlement_amount: Some(Amount::new("250.00", "USD")),
                interbank_settlement_date: Some(date!(2024 - 06 - 03)),
            }),
        }],
        sender: DepositoryInstitution::sender("084106768"),
        receiver: DepositoryInstitution::receiver("121182904"),
        preferred_wrapper: None,
    };

    let (xml, parsed) = round_trip(Message::CancellationResponse(response.clone()));
    assert!(xml.contains("<FedNowReturnRequestResponse>"));
    assert_eq!(parsed, Message::CancellationResponse(response));
}

#[test]
fn test_receipt_acknowledgement_round_trip() {
    let acknowledgement = ReceiptAcknowledgement {
        creation_date_time: Some(STAMP),
        identifier: identifier("admi.007.001.01", "20240603021150706AK01"),
        query_name: Some("Broadcast".to_string()),
        reports: vec![AcknowledgementReport {
            related_reference: RelatedReference {
                reference: "20240603121182904CT01".to_string(),
                message_name: Some("pacs.008.001.08".to_string()),
            },
            request_handling: RequestHandling {
                status_code: "TS01".to_string(),
                status_date_time: Some(datetime!(2024-06-03 14:29:58 -04:00)),
                description: Some("Received".to_string()),
            },
        }],
    };

    let (xml, parsed) = round_trip(Message::ReceiptAcknowledgement(acknowledgement.clone()));
    assert!(xml.contains("<FedNowReceiptAcknowledgement>"));
    assert_eq!(parsed, Message::ReceiptAcknowledgement(acknowledgement));
}

#[test]
fn test_payment_request_round_trip() {
    let request = PaymentRequest {
        creation_date_time: Some(STAMP),
        identifier: Identifier {
            instruction_id: Some("INSTR-0002".to_string()),
            end_to_end_id: "E2E-0002".to_string(),
            transaction_id: Some("PMTINF-0002".to_string()),
            uetr: Some("1c7b5f16-3c3f-4b43-9a3c-2b1a1e0f4d21".to_string()),
            ..identifier("pain.013.001.07", "20240603121182904RP01")
        },
        payment_type: PaymentType {
            category_purpose: Some("CONS".to_string()),
        },
        execution_info: ExecutionInfo {
            initiating_party: Some("Jane Doe".to_string()),
            initiating_party_address: Some(party("Jane Doe", "").personal.postal_address),
            execution_date: Some(datetime!(2024-06-04 09:00:00 -04:00)),
            expiry_date: Some(datetime!(2024-06-10 17:00:00 -04:00)),
        },
        amount: Amount::new("75.25", "USD"),
        sender: sender(),
        receiver: receiver(),
        originator: party("Jane Doe", "567876543"),
        beneficiary: party("John Roe", "1234567890"),
    };

    let (xml, parsed) = round_trip(Message::PaymentRequest(request.clone()));
    assert!(xml.contains("<FedNowRequestForPayment>"));
    assert!(xml.contains("<InstdAmt Ccy=\"USD\">75.25</InstdAmt>"));
    assert!(xml.contains("<EndToEndId>E2E-0002</EndToEndId>"));
    assert_eq!(parsed, Message::PaymentRequest(request));
}

#[test]
fn test_message_reject_round_trip() {
    let reject = MessageReject {
        creation_date_time: Some(STAMP),
        identifier: Identifier {
            business_message_id: "20240603021150706MR01".to_string(),
            ..identifier("admi.002.001.01", "20240603021150706MR01")
        },
        reference: "20240603121182904CT01".to_string(),
        reason: RejectionReason {
            rejection_reason: "TS02".to_string(),
            rejection_date_time: Some(datetime!(2024-06-03 14:29:59 -04:00)),
            error_location: Some("Document/FIToFICstmrCdtTrf/GrpHdr/MsgId".to_string()),
            description: Some("Duplicate message".to_string()),
        },
    };

    let (xml, parsed) = round_trip(Message::MessageReject(reject.clone()));
    assert!(xml.contains("<admi.002.001.01>"));
    assert_eq!(parsed, Message::MessageReject(reject));
}
