use std::collections::BTreeMap;

use chrono::NaiveDate;
use validator::Validate as _;

use super::*;
use crate::{
    method::{MethodName, Params, RemoteMethod},
    xmlrpc::{Value, from_value, to_value},
};

fn members(entries: &[(&str, Value)]) -> Value {
    Value::Struct(
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn validation_request() -> ValidationRequest {
    ValidationRequest::new(
        IdDocument::new(IdDocumentType::PassportEu, vec![Blob::new(b"front".to_vec())]),
        PersonalInfo::new(
            "Jane",
            "Doe",
            NaiveDate::from_ymd_opt(1984, 3, 12).unwrap(),
        ),
    )
}

#[test]
fn test_method_table_wire_names() {
    let expected = [
        (RegistrationAuthorityMethod::MatchAccount, "matcher.matchAccount"),
        (RegistrationAuthorityMethod::Validate, "validator.validate"),
        (RegistrationAuthorityMethod::GetResult, "validator.getResult"),
        (RegistrationAuthorityMethod::CheckOperatorStatus, "ra.checkOperatorStatus"),
        (
            RegistrationAuthorityMethod::GetCertificateAgreement,
            "ra.getCertificateAgreement",
        ),
        (RegistrationAuthorityMethod::RevokeCertificate, "ra.revokeCertificate"),
        (RegistrationAuthorityMethod::RevokeMyCertificate, "ra.revokeMyCertificate"),
    ];

    assert_eq!(RegistrationAuthorityMethod::ALL.len(), expected.len());
    for (method, wire) in expected {
        assert_eq!(method.as_str(), wire);
    }
}

#[test]
fn test_revoke_my_certificate_sends_no_params() {
    assert!(RevokeMyCertificate::encode_params(&()).unwrap().is_empty());
    assert_eq!(
        GetResult::encode_params(&"session-1".to_string()).unwrap(),
        vec![Value::from("session-1")]
    );
}

#[test]
fn test_matching_filter_fields_are_kept() {
    let filter = MatchingFilter::new("Jane", "Doe").with_email("j@d.com");

    assert_eq!(filter.firstname, "Jane");
    assert_eq!(filter.lastname, "Doe");
    assert_eq!(filter.email.as_deref(), Some("j@d.com"));
    assert!(filter.mobile.is_none());
    assert!(filter.check().is_ok());

    assert_eq!(
        to_value(&filter).unwrap(),
        members(&[
            ("firstname", Value::from("Jane")),
            ("lastname", Value::from("Doe")),
            ("email", Value::from("j@d.com")),
        ])
    );
}

#[test]
fn test_matching_filter_needs_contact() {
    assert!(MatchingFilter::new("Jane", "Doe").check().is_err());
    assert!(
        MatchingFilter::new("Jane", "Doe")
            .with_mobile("+33600000000")
            .check()
            .is_ok()
    );
    assert!(
        MatchingFilter::new("Jane", "Doe")
            .with_email("not-an-email")
            .check()
            .is_err()
    );
}

#[test]
fn test_validation_request_wire_shape() {
    let request = validation_request()
        .with_allow_manual(true)
        .with_callback_url("https://shop.example/validated");

    let value = to_value(&request).unwrap();
    let id_document = value.get("idDocument").unwrap();
    assert_eq!(id_document.get("type"), Some(&Value::Int(1)));
    assert_eq!(
        id_document.get("photos"),
        Some(&Value::Array(vec![Value::Base64(b"front".to_vec())]))
    );

    let personal_info = value.get("personalInfo").unwrap();
    assert_eq!(personal_info.get("firstname").and_then(Value::as_str), Some("Jane"));
    assert_eq!(
        personal_info.get("birthDate"),
        Some(&Value::DateTime(
            NaiveDate::from_ymd_opt(1984, 3, 12)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        ))
    );
    assert_eq!(value.get("allowManual"), Some(&Value::Boolean(true)));
    assert_eq!(
        value.get("callbackURL").and_then(Value::as_str),
        Some("https://shop.example/validated")
    );
}

#[test]
fn test_validation_request_needs_photos() {
    assert!(validation_request().check().is_ok());

    let mut request = validation_request();
    request.id_document.photos.clear();
    assert!(request.check().is_err());

    let request = validation_request().with_callback_url("not a url");
    assert!(request.validate().is_err());
}

#[test]
fn test_id_document_type_codes() {
    assert_eq!(to_value(&IdDocumentType::IdCardFr).unwrap(), Value::Int(0));
    assert_eq!(to_value(&IdDocumentType::ResidencePermit).unwrap(), Value::Int(2));
    assert_eq!(
        from_value::<IdDocumentType>(Value::Int(1)).unwrap(),
        IdDocumentType::PassportEu
    );
    assert!(from_value::<IdDocumentType>(Value::Int(9)).is_err());
}

#[test]
fn test_matching_result_decoding() {
    let value = Value::Array(vec![
        members(&[
            ("lastname", Value::from("Doe")),
            ("firstname", Value::from("Jane")),
            ("mobile", Value::Nil),
            ("email", Value::from("j@d.com")),
            ("certificateLevel", Value::from("certified")),
            ("certificateStatus", Value::from("awaiting-agreement")),
            (
                "certificateInfo",
                members(&[
                    ("subjectDN", Value::from("CN=Jane Doe")),
                    ("serialNumber", Value::from("0A1B")),
                    (
                        "chain",
                        Value::Array(vec![Value::Base64(vec![0x30, 0x82])]),
                    ),
                ]),
            ),
        ]),
        members(&[
            ("email", Value::from("other@d.com")),
            ("certificateLevel", Value::from("none")),
        ]),
    ]);

    let results: Vec<MatchingResult> = from_value(value).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].certificate_level, CertificateLevel::Certified);
    assert_eq!(
        results[0].certificate_status,
        Some(CertificateStatus::AwaitingAgreement)
    );
    assert!(results[0].mobile.is_none());
    let info = results[0].certificate_info.as_ref().unwrap();
    assert_eq!(info.subject_dn, "CN=Jane Doe");
    assert_eq!(info.chain, vec![Blob::new(vec![0x30, 0x82])]);

    assert_eq!(results[1].certificate_level, CertificateLevel::None);
    assert!(results[1].firstname.is_none());
    assert!(results[1].certificate_info.is_none());
}

#[test]
fn test_validator_result_pending() {
    let value = members(&[
        ("id", Value::from("session-1")),
        ("status", Value::Int(0)),
        ("reason", Value::Int(0)),
        ("result", members(&[])),
    ]);

    let result: ValidatorResult = from_value(value).unwrap();
    assert_eq!(result.status, ValidationStatus::Pending);
    assert!(result.reason.is_none());
    assert!(result.result.is_none());
    assert!(!result.is_valid());
}

#[test]
fn test_validator_result_failure() {
    let check = |valid: bool| {
        members(&[
            ("expected", Value::from("DOE")),
            ("found", Value::from(if valid { "DOE" } else { "DOË" })),
            ("valid", Value::Boolean(valid)),
        ])
    };
    let value = members(&[
        ("id", Value::from("session-2")),
        ("status", Value::Int(2)),
        ("reason", Value::Int(2)),
        ("reasonMessage", Value::from("Information mismatched")),
        (
            "result",
            members(&[("lastname", check(false)), ("firstname", check(true))]),
        ),
    ]);

    let result: ValidatorResult = from_value(value).unwrap();
    assert_eq!(result.status, ValidationStatus::Invalid);
    assert_eq!(result.reason, Some(ValidationFailure::InformationMismatched));
    assert_eq!(result.reason_message.as_deref(), Some("Information mismatched"));

    let checks = result.result.unwrap();
    assert!(!checks.lastname.unwrap().valid);
    assert!(checks.firstname.unwrap().valid);
    assert!(checks.birthdate.is_none());
}

#[test]
fn test_validator_result_unknown_reason() {
    let value = members(&[
        ("id", Value::from("session-3")),
        ("status", Value::Int(2)),
        ("reason", Value::Int(42)),
    ]);
    assert!(from_value::<ValidatorResult>(value).is_err());
}

#[test]
fn test_operator_status_is_passed_through() {
    let status: OperatorStatus = from_value(Value::Int(5)).unwrap();
    assert_eq!(status.code(), 5);
}

#[test]
fn test_validation_callback_parsing() {
    let callback =
        ValidationCallback::from_url("https://shop.example/validated?id=session-1&status=1")
            .unwrap();
    assert_eq!(callback.id, "session-1");
    assert_eq!(callback.status, ValidationStatus::Valid);

    let callback = ValidationCallback::from_url("/validated?status=2&id=abc%20def").unwrap();
    assert_eq!(callback.id, "abc def");
    assert_eq!(callback.status, ValidationStatus::Invalid);

    assert!(matches!(
        ValidationCallback::from_url("/validated?status=1"),
        Err(CallbackError::MissingParameter("id"))
    ));
    assert!(matches!(
        ValidationCallback::from_url("/validated?id=x&status=valid"),
        Err(CallbackError::InvalidStatus(_))
    ));
}

#[test]
fn test_markers_belong_to_service() {
    assert_eq!(
        <MatchAccount as RemoteMethod>::METHOD,
        RegistrationAuthorityMethod::MatchAccount
    );
    assert_eq!(
        <Validate as RemoteMethod>::METHOD.to_string(),
        "validator.validate"
    );
}
