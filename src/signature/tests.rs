use std::collections::BTreeMap;

use chrono::NaiveDate;
use validator::Validate as _;

use super::*;
use crate::{
    method::{MethodName, Params, RemoteMethod},
    xmlrpc::{DateTime, Value, from_value, to_value},
};

fn signer() -> TransactionSigner {
    TransactionSigner::person("Jane", "Doe", "jane.doe@example.com")
}

fn document() -> TransactionDocument {
    TransactionDocument::from_content("doc-1", "contract.pdf", b"%PDF-1.7".to_vec())
}

fn sepa_data() -> SepaData {
    SepaData {
        rum: "RUM-001".to_string(),
        ics: "FR00ZZZ000000".to_string(),
        iban: "FR7630006000011234567890189".to_string(),
        bic: "AGRIFRPP".to_string(),
        recurring: false,
        debtor: SepaThirdParty::new("Jane Doe", "1 rue de Paris", "75001", "Paris", "France"),
        creditor: SepaThirdParty::new("ACME", "2 avenue Foch", "75016", "Paris", "France"),
    }
}

#[test]
fn test_method_table_wire_names() {
    let expected = [
        (SignatureMethod::Sign, "signer.sign"),
        (SignatureMethod::SignWithOptions, "signer.signWithOptions"),
        (SignatureMethod::RequestTransaction, "requester.requestTransaction"),
        (SignatureMethod::GetDocuments, "requester.getDocuments"),
        (SignatureMethod::GetDocumentsByCustomId, "requester.getDocumentsByCustomId"),
        (SignatureMethod::GetTransactionInfo, "requester.getTransactionInfo"),
        (
            SignatureMethod::GetTransactionInfoByCustomId,
            "requester.getTransactionInfoByCustomId",
        ),
        (SignatureMethod::RelaunchTransaction, "requester.relaunchTransaction"),
        (SignatureMethod::CancelTransaction, "requester.cancelTransaction"),
        (SignatureMethod::CancelRegistration, "requester.cancelRegistration"),
    ];

    assert_eq!(SignatureMethod::ALL.len(), expected.len());
    for (method, wire) in expected {
        assert_eq!(method.as_str(), wire);
        assert!(SignatureMethod::ALL.contains(&method));
    }
}

#[test]
fn test_sign_with_options_is_positional() {
    let options = SignOptions::new()
        .with_reason("approval")
        .with_signature_format(SignatureFormat::PadesComp);
    let params =
        SignWithOptions::encode_params(&(Blob::new(b"%PDF".to_vec()), options)).unwrap();

    assert_eq!(params.len(), 2);
    assert_eq!(params[0], Value::Base64(b"%PDF".to_vec()));
    assert_eq!(params[1].get("reason").and_then(Value::as_str), Some("approval"));
    assert_eq!(
        params[1].get("signatureFormat").and_then(Value::as_str),
        Some("PADES-COMP")
    );
}

#[test]
fn test_transaction_request_wire_shape() {
    let request = TransactionRequest::new(vec![signer()], vec![document()])
        .with_custom_id("order-17")
        .with_language(Language::Fr)
        .with_chaining_mode(ChainingMode::Email)
        .with_success_url("https://shop.example/ok")
        .with_registration_callback_url("https://shop.example/registered")
        .with_final_doc_sent(true);

    let value = to_value(&request).unwrap();

    assert_eq!(value.get("customId").and_then(Value::as_str), Some("order-17"));
    assert_eq!(value.get("language").and_then(Value::as_str), Some("fr"));
    assert_eq!(value.get("chainingMode").and_then(Value::as_str), Some("email"));
    assert_eq!(
        value.get("successURL").and_then(Value::as_str),
        Some("https://shop.example/ok")
    );
    assert_eq!(
        value.get("registrationCallbackURL").and_then(Value::as_str),
        Some("https://shop.example/registered")
    );
    assert_eq!(value.get("finalDocSent"), Some(&Value::Boolean(true)));
    // unset options are not sent at all
    assert!(value.get("profile").is_none());
    assert!(value.get("cancelURL").is_none());

    let signers = value.get("signers").and_then(Value::as_array).unwrap();
    assert_eq!(
        signers[0].get("emailAddress").and_then(Value::as_str),
        Some("jane.doe@example.com")
    );
    assert_eq!(signers[0].get("firstname").and_then(Value::as_str), Some("Jane"));

    let documents = value.get("documents").and_then(Value::as_array).unwrap();
    assert_eq!(
        documents[0].get("content"),
        Some(&Value::Base64(b"%PDF-1.7".to_vec()))
    );
    assert_eq!(
        documents[0].get("fileName").and_then(Value::as_str),
        Some("contract.pdf")
    );
}

#[test]
fn test_signer_fields_are_kept() {
    let birth_date = DateTime::from_date(NaiveDate::from_ymd_opt(1984, 3, 12).unwrap());
    let signer = signer()
        .with_role(SignerRole::Observer)
        .with_phone_num("+33600000000")
        .with_birth_date(birth_date)
        .with_certificate_type(CertificateType::Certified)
        .with_success_redirection(RedirectionConfig::new("https://shop.example/done", "Back"))
        .with_redirect_policy(RedirectPolicy::Dashboard)
        .with_redirect_wait(5u32);

    assert_eq!(signer.firstname.as_deref(), Some("Jane"));
    assert_eq!(signer.lastname.as_deref(), Some("Doe"));
    assert_eq!(signer.role, Some(SignerRole::Observer));
    assert_eq!(signer.birth_date, Some(birth_date));
    assert!(signer.validate().is_ok());

    let value = to_value(&signer).unwrap();
    assert_eq!(value.get("role").and_then(Value::as_str), Some("observer"));
    assert!(matches!(value.get("birthDate"), Some(Value::DateTime(_))));
    let redirection = value.get("successRedirection").unwrap();
    assert_eq!(
        redirection.get("URL").and_then(Value::as_str),
        Some("https://shop.example/done")
    );
    assert_eq!(redirection.get("displayName").and_then(Value::as_str), Some("Back"));
}

#[test]
fn test_request_needs_signers_and_documents() {
    let empty = TransactionRequest::new(vec![], vec![]);
    let errors = empty.check().unwrap_err();
    let fields = errors.field_errors();
    assert!(fields.contains_key("signers"));
    assert!(fields.contains_key("documents"));

    let valid = TransactionRequest::new(vec![signer()], vec![document()]);
    assert!(valid.check().is_ok());
}

#[test]
fn test_document_needs_content_or_url() {
    let bare = TransactionDocument::new("doc-1", "contract.pdf");
    assert!(bare.validate().is_err());

    let by_url =
        TransactionDocument::from_url("doc-1", "contract.pdf", "https://files.example/c.pdf");
    assert!(by_url.validate().is_ok());

    let request = TransactionRequest::new(vec![signer()], vec![bare]);
    assert!(request.check().is_err());
}

#[test]
fn test_sepa_document_needs_sepa_data() {
    let mandate = TransactionDocument::sepa("doc-2", "mandate.pdf", sepa_data());
    assert!(mandate.validate().is_ok());

    let value = to_value(&mandate).unwrap();
    assert_eq!(value.get("documentType").and_then(Value::as_str), Some("sepa"));
    let sepa = value.get("SEPAData").unwrap();
    assert_eq!(sepa.get("rum").and_then(Value::as_str), Some("RUM-001"));
    assert_eq!(
        sepa.get("debtor")
            .and_then(|debtor| debtor.get("postalCode"))
            .and_then(Value::as_str),
        Some("75001")
    );

    let mut missing = mandate.clone();
    missing.sepa_data = None;
    assert!(missing.validate().is_err());
}

#[test]
fn test_redirect_wait_rules() {
    let too_long = signer().with_redirect_wait(45u32);
    assert!(too_long.validate().is_err());

    let with_quick = signer()
        .with_redirect_policy(RedirectPolicy::Quick)
        .with_redirect_wait(5u32);
    assert!(with_quick.validate().is_err());

    let request = TransactionRequest::new(vec![signer()], vec![document()])
        .with_redirect_policy(RedirectPolicy::Quick)
        .with_redirect_wait(10u32);
    assert!(request.check().is_err());
}

#[test]
fn test_invalid_signer_email_rejected() {
    let signer = TransactionSigner::person("Jane", "Doe", "not-an-email");
    let request = TransactionRequest::new(vec![signer], vec![document()]);
    assert!(request.check().is_err());
}

#[test]
fn test_document_signature_fields() {
    let field = DocSignatureField::new(1, 2, 100, 650)
        .with_label("Buyer")
        .with_image(b"\x89PNG".to_vec());
    let mut meta = BTreeMap::new();
    meta.insert("order".to_string(), Value::Int(17));
    let document = document()
        .with_signature_fields(vec![field])
        .with_check_box_texts(vec!["I agree".to_string()])
        .with_meta_data(meta)
        .with_title("Contract");

    let value = to_value(&document).unwrap();
    let fields = value.get("signatureFields").and_then(Value::as_array).unwrap();
    assert_eq!(fields[0].get("signerIndex"), Some(&Value::Int(1)));
    assert_eq!(fields[0].get("label").and_then(Value::as_str), Some("Buyer"));
    assert!(fields[0].get("patternName").is_none());
    assert_eq!(
        value.get("metaData").and_then(|meta| meta.get("order")),
        Some(&Value::Int(17))
    );
}

#[test]
fn test_documents_decode_from_response() {
    let value = Value::Array(vec![Value::Struct(BTreeMap::from([
        ("id".to_string(), Value::from("doc-1")),
        ("fileName".to_string(), Value::from("contract.pdf")),
        ("content".to_string(), Value::Base64(b"%PDF-1.7".to_vec())),
        ("documentType".to_string(), Value::from("pdf")),
    ]))]);

    let documents: Vec<TransactionDocument> = from_value(value).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].document_type, Some(DocumentType::Pdf));
    assert_eq!(
        documents[0].content.as_ref().map(Blob::as_bytes),
        Some(&b"%PDF-1.7"[..])
    );
}

#[test]
fn test_document_metadata_keeps_value_types() {
    let signed_at = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let xml = r#"<methodResponse><params><param><value><array><data><value><struct>
        <member><name>id</name><value>doc-1</value></member>
        <member><name>fileName</name><value>contract.pdf</value></member>
        <member><name>url</name><value>https://files.example/contract.pdf</value></member>
        <member><name>metaData</name><value><struct>
            <member><name>signedAt</name><value><dateTime.iso8601>20240501T10:00:00</dateTime.iso8601></value></member>
            <member><name>pages</name><value><int>3</int></value></member>
        </struct></value></member>
    </struct></value></data></array></value></param></params></methodResponse>"#;

    let crate::xmlrpc::Response::Success(value) = crate::xmlrpc::decode_response(xml).unwrap()
    else {
        panic!("expected a success response");
    };
    let documents: Vec<TransactionDocument> = from_value(value).unwrap();
    let meta_data = documents[0].meta_data.as_ref().unwrap();

    assert_eq!(meta_data.get("signedAt"), Some(&Value::DateTime(signed_at)));
    assert_eq!(meta_data.get("pages"), Some(&Value::Int(3)));

    // sent back unchanged
    let resent = to_value(&documents[0]).unwrap();
    assert_eq!(
        resent.get("metaData").and_then(|m| m.get("signedAt")),
        Some(&Value::DateTime(signed_at))
    );
}

#[test]
fn test_transaction_info_decoding() {
    let signer_info = Value::Struct(BTreeMap::from([
        ("status".to_string(), Value::from("code-sent")),
        ("url".to_string(), Value::from("https://sign.example/s1")),
        ("id".to_string(), Value::from("s1")),
        ("email".to_string(), Value::from("jane.doe@example.com")),
        ("firstName".to_string(), Value::from("Jane")),
        ("lastName".to_string(), Value::from("Doe")),
        ("refusedDocs".to_string(), Value::Array(vec![])),
    ]));
    let observer_info = Value::Struct(BTreeMap::from([
        ("status".to_string(), Value::from("on-hold")),
        ("email".to_string(), Value::from("audit@example.com")),
    ]));
    let value = Value::Struct(BTreeMap::from([
        ("status".to_string(), Value::from("ready")),
        (
            "signerInfos".to_string(),
            Value::Array(vec![signer_info, observer_info]),
        ),
        ("currentSigner".to_string(), Value::Int(0)),
        (
            "creationDate".to_string(),
            Value::DateTime(
                NaiveDate::from_ymd_opt(2024, 5, 2)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
            ),
        ),
        ("description".to_string(), Value::from("Sale")),
        (
            "initiatorInfo".to_string(),
            Value::Struct(BTreeMap::from([
                ("email".to_string(), Value::from("sales@example.com")),
                ("firstName".to_string(), Value::from("Sam")),
                ("lastName".to_string(), Value::from("Seller")),
            ])),
        ),
        ("eachField".to_string(), Value::Boolean(false)),
        ("customerId".to_string(), Value::from("order-17")),
        ("transactionId".to_string(), Value::from("tx-1")),
    ]));

    let info: TransactionInfo = from_value(value).unwrap();
    assert_eq!(info.status, TransactionStatus::Ready);
    assert_eq!(info.transaction_id, "tx-1");
    assert_eq!(info.customer_id.as_deref(), Some("order-17"));
    assert_eq!(info.signer_infos.len(), 2);
    assert_eq!(info.signer_infos[0].status, SignerStatus::CodeSent);
    assert_eq!(info.signer_infos[1].status, SignerStatus::Unknown);
    assert_eq!(
        info.current_signer_info().map(|s| s.id.as_str()),
        Some("s1")
    );
    assert_eq!(
        info.initiator_info.map(|i| i.email),
        Some("sales@example.com".to_string())
    );
    assert_eq!(info.creation_date.date(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
}

#[test]
fn test_convenience_methods_use_markers() {
    assert_eq!(<Sign as RemoteMethod>::METHOD, SignatureMethod::Sign);
    assert_eq!(
        <CancelRegistration as RemoteMethod>::METHOD.to_string(),
        "requester.cancelRegistration"
    );
}
