use std::fs;

use envelope_core::models::errors::SchemaError;
use envelope_core::models::schema::*;

const SCHEMA_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/outgoing.xsd");

#[test]
fn test_resolves_every_outgoing_wrapper() {
    let schema = SchemaResource::file(SCHEMA_PATH);
    let expected = [
        ("pacs.008.001.08", "FedNowCustomerCreditTransfer"),
        ("pacs.002.001.10", "FedNowPaymentStatus"),
        ("pacs.004.001.10", "FedNowPaymentReturn"),
        ("camt.056.001.08", "FedNowReturnRequest"),
        ("admi.007.001.01", "FedNowReceiptAcknowledgement"),
        ("pain.013.001.07", "FedNowRequestForPayment"),
        ("admi.002.001.01", "FedNowMessageReject"),
    ];

    for (kind, wrapper) in expected {
        let descriptor = SchemaWalker::resolve(&schema, kind).expect("Failed to resolve envelope");
        assert_eq!(descriptor.root_element, "FedNowOutgoing");
        assert_eq!(descriptor.message_element, "FedNowOutgoingMessage", "optional header must be skipped");
        assert_eq!(descriptor.wrapper_element, wrapper, "wrapper for {}", kind);
        assert_eq!(descriptor.root_namespace, "urn:fednow:outgoing");
    }
}

#[test]
fn test_first_wrapper_in_document_order_wins() {
    // camt.029 is accepted by both response wrappers
    let schema = SchemaResource::file(SCHEMA_PATH);
    let descriptor = SchemaWalker::resolve(&schema, "camt.029.001.09").expect("Failed to resolve envelope");
    assert_eq!(descriptor.wrapper_element, "FedNowReturnRequestResponse");
    assert_eq!(
        descriptor.alternatives,
        vec!["FedNowReturnRequestResponse".to_string(), "FedNowInformationRequestResponse".to_string()]
    );
}

#[test]
fn test_inline_and_file_resources_agree() {
    let text = fs::read(SCHEMA_PATH).expect("Failed to read schema fixture");
    let inline = SchemaWalker::resolve(&SchemaResource::inline(text), "pacs.004.001.10").expect("Failed to resolve inline");
    let file = SchemaWalker::resolve(&SchemaResource::file(SCHEMA_PATH), "pacs.004.001.10").expect("Failed to resolve file");
    assert_eq!(inline, file);
}

#[test]
fn test_unknown_kind_names_the_missing_wrapper() {
    let schema = SchemaResource::file(SCHEMA_PATH);
    match SchemaWalker::resolve(&schema, "pacs.009.001.08") {
        Err(SchemaError::ElementNotFound { element, root, message, wrapper }) => {
            assert_eq!(element, "wrapper");
            assert_eq!(root, "FedNowOutgoing");
            assert_eq!(message, "FedNowOutgoingMessage");
            assert!(wrapper.is_empty());
        }
        other => panic!("expected ElementNotFound, got {:?}", other),
    }
}

#[test]
fn test_schema_without_choice_reports_all_missing_elements() {
    let schema = SchemaResource::inline(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:element name="Lonely" type="xs:string"/>
        </xs:schema>"#,
    );
    let err = SchemaWalker::resolve(&schema, "pacs.008.001.08").expect_err("Resolution should fail");
    assert!(err.to_string().contains("message, wrapper"), "{}", err);
    assert!(err.to_string().contains("root: 'Lonely'"), "{}", err);
}

#[test]
fn test_missing_schema_file_is_unreadable() {
    let schema = SchemaResource::file("tests/fixtures/does-not-exist.xsd");
    assert!(matches!(
        SchemaWalker::resolve(&schema, "pacs.008.001.08"),
        Err(SchemaError::Unreadable(_))
    ));
}

#[test]
fn test_resolves_schema_written_to_disk() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("incoming.xsd");
    fs::write(
        &path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                   xmlns:pacs002="urn:iso:std:iso:20022:tech:xsd:pacs.002.001.10"
                   targetNamespace="urn:fednow:incoming">
            <xs:element name="FedNowIncoming">
                <xs:complexType>
                    <xs:sequence>
                        <xs:element ref="FedNowIncomingMessage"/>
                    </xs:sequence>
                </xs:complexType>
            </xs:element>
            <xs:element name="FedNowIncomingMessage">
                <xs:complexType>
                    <xs:choice>
                        <xs:element ref="FedNowPaymentStatus"/>
                    </xs:choice>
                </xs:complexType>
            </xs:element>
            <xs:element name="FedNowPaymentStatus">
                <xs:complexType>
                    <xs:sequence>
                        <xs:element ref="pacs002:Document"/>
                    </xs:sequence>
                </xs:complexType>
            </xs:element>
        </xs:schema>"#,
    )
    .expect("Failed to write schema");

    let schema = SchemaResource::file(path.to_string_lossy().into_owned());
    let descriptor = SchemaWalker::resolve(&schema, "pacs.002.001.10").expect("Failed to resolve");
    assert_eq!(descriptor.root_element, "FedNowIncoming");
    assert_eq!(descriptor.message_element, "FedNowIncomingMessage");
    assert_eq!(descriptor.wrapper_element, "FedNowPaymentStatus");
    assert_eq!(descriptor.root_namespace, "urn:fednow:incoming");
}
