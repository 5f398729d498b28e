use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    method::Params,
    xmlrpc::{Blob, DateTime},
};

/// Integer code received that matches no known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum IdDocumentType {
    /// French national identity card
    IdCardFr,
    /// European passport
    PassportEu,
    ResidencePermit,
}

impl From<IdDocumentType> for i32 {
    fn from(kind: IdDocumentType) -> Self {
        match kind {
            IdDocumentType::IdCardFr => 0,
            IdDocumentType::PassportEu => 1,
            IdDocumentType::ResidencePermit => 2,
        }
    }
}

impl TryFrom<i32> for IdDocumentType {
    type Error = UnknownCode;

    fn try_from(code: i32) -> Result<Self, UnknownCode> {
        match code {
            0 => Ok(IdDocumentType::IdCardFr),
            1 => Ok(IdDocumentType::PassportEu),
            2 => Ok(IdDocumentType::ResidencePermit),
            code => Err(UnknownCode {
                kind: "id document type",
                code,
            }),
        }
    }
}

/// Photos of an identity document, front side first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IdDocument {
    #[validate(length(min = 1))]
    pub photos: Vec<Blob>,
    #[serde(rename = "type")]
    pub kind: IdDocumentType,
}

impl IdDocument {
    pub fn new(kind: IdDocumentType, photos: Vec<Blob>) -> Self {
        Self { photos, kind }
    }

    pub fn with_photo(mut self, photo: impl Into<Blob>) -> Self {
        self.photos.push(photo.into());
        self
    }
}

/// Personal data checked against the identity document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[validate(length(min = 1))]
    pub firstname: String,
    #[validate(length(min = 1))]
    pub lastname: String,
    pub birth_date: DateTime,
}

impl PersonalInfo {
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        birth_date: impl Into<DateTime>,
    ) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
            birth_date: birth_date.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    #[validate(nested)]
    pub id_document: IdDocument,
    #[validate(nested)]
    pub personal_info: PersonalInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_manual: Option<bool>,
    /// Requested with `GET` once the session is valid or invalid, see
    /// [`ValidationCallback`]
    #[serde(rename = "callbackURL", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub callback_url: Option<String>,
}

impl ValidationRequest {
    pub fn new(id_document: IdDocument, personal_info: PersonalInfo) -> Self {
        Self {
            id_document,
            personal_info,
            allow_manual: None,
            callback_url: None,
        }
    }

    optional_setters! {
        with_allow_manual => allow_manual: bool;
        with_callback_url => callback_url: String;
    }
}

impl Params for ValidationRequest {
    fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()
    }
}

fn check_contact(filter: &MatchingFilter) -> Result<(), ValidationError> {
    if filter.mobile.is_none() && filter.email.is_none() {
        return Err(ValidationError::new("mobile_or_email_required"));
    }
    Ok(())
}

/// Account lookup; at least one of mobile or email is required
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_contact"))]
pub struct MatchingFilter {
    pub lastname: String,
    pub firstname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
}

impl MatchingFilter {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            lastname: lastname.into(),
            firstname: firstname.into(),
            mobile: None,
            email: None,
        }
    }

    optional_setters! {
        with_mobile => mobile: String;
        with_email => email: String;
    }
}

impl Params for MatchingFilter {
    fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfo {
    #[serde(rename = "subjectDN")]
    pub subject_dn: String,
    pub serial_number: String,
    /// DER certificates, leaf first
    #[serde(default)]
    pub chain: Vec<Blob>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateLevel {
    None,
    Advanced,
    Certified,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertificateStatus {
    Valid,
    AwaitingValidation,
    AwaitingAgreement,
    #[serde(other)]
    Unknown,
}

/// An account matching a [`MatchingFilter`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingResult {
    pub lastname: Option<String>,
    pub firstname: Option<String>,
    pub mobile: Option<String>,
    pub email: String,
    pub certificate_level: CertificateLevel,
    pub certificate_status: Option<CertificateStatus>,
    pub certificate_info: Option<CertificateInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ValidationStatus {
    Pending,
    Valid,
    Invalid,
}

impl From<ValidationStatus> for i32 {
    fn from(status: ValidationStatus) -> Self {
        match status {
            ValidationStatus::Pending => 0,
            ValidationStatus::Valid => 1,
            ValidationStatus::Invalid => 2,
        }
    }
}

impl TryFrom<i32> for ValidationStatus {
    type Error = UnknownCode;

    fn try_from(code: i32) -> Result<Self, UnknownCode> {
        match code {
            0 => Ok(ValidationStatus::Pending),
            1 => Ok(ValidationStatus::Valid),
            2 => Ok(ValidationStatus::Invalid),
            code => Err(UnknownCode {
                kind: "validation status",
                code,
            }),
        }
    }
}

/// Why a validation session failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationFailure {
    /// Not fully readable or altered
    Unclear,
    InformationMismatched,
    UnsupportedType,
    Unreadable,
    Expired,
}

impl TryFrom<i32> for ValidationFailure {
    type Error = UnknownCode;

    fn try_from(code: i32) -> Result<Self, UnknownCode> {
        match code {
            1 => Ok(ValidationFailure::Unclear),
            2 => Ok(ValidationFailure::InformationMismatched),
            3 => Ok(ValidationFailure::UnsupportedType),
            4 => Ok(ValidationFailure::Unreadable),
            5 => Ok(ValidationFailure::Expired),
            code => Err(UnknownCode {
                kind: "validation failure",
                code,
            }),
        }
    }
}

// 0 stands for "no failure"
fn failure_code<'de, D>(deserializer: D) -> Result<Option<ValidationFailure>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<i32>::deserialize(deserializer)? {
        None | Some(0) => Ok(None),
        Some(code) => ValidationFailure::try_from(code)
            .map(Some)
            .map_err(de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct FieldCheck {
    #[serde(default)]
    pub expected: String,
    #[serde(default)]
    pub found: String,
    #[serde(default)]
    pub valid: bool,
}

/// Per-field comparison between the declared data and the document
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct FieldChecks {
    pub firstname: Option<FieldCheck>,
    pub lastname: Option<FieldCheck>,
    pub secondlastname: Option<FieldCheck>,
    pub birthdate: Option<FieldCheck>,
}

impl FieldChecks {
    pub fn is_empty(&self) -> bool {
        self == &FieldChecks::default()
    }
}

fn non_empty_checks<'de, D>(deserializer: D) -> Result<Option<FieldChecks>, D::Error>
where
    D: Deserializer<'de>,
{
    let checks = Option::<FieldChecks>::deserialize(deserializer)?;
    Ok(checks.filter(|checks| !checks.is_empty()))
}

/// Outcome of a validation session
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorResult {
    pub id: String,
    pub status: ValidationStatus,
    #[serde(default, deserialize_with = "failure_code")]
    pub reason: Option<ValidationFailure>,
    pub reason_message: Option<String>,
    #[serde(default, deserialize_with = "non_empty_checks")]
    pub result: Option<FieldChecks>,
}

impl ValidatorResult {
    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

/// Status code of an operator, passed through as sent by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct OperatorStatus(pub i32);

impl OperatorStatus {
    pub fn code(&self) -> i32 {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("invalid callback url: {0}")]
    InvalidUrl(String),
    #[error("callback url has no {0} parameter")]
    MissingParameter(&'static str),
    #[error("invalid callback status {0:?}")]
    InvalidStatus(String),
}

/// Query parameters of the request made to a validation `callbackURL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationCallback {
    pub id: String,
    pub status: ValidationStatus,
}

impl ValidationCallback {
    /// Parses an absolute url, or a path and query as seen by an HTTP server
    pub fn from_url(raw: &str) -> Result<Self, CallbackError> {
        let url = Url::parse("http://callback.invalid/")
            .and_then(|base| base.join(raw))
            .map_err(|e| CallbackError::InvalidUrl(e.to_string()))?;

        let mut id = None;
        let mut status = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "id" => id = Some(value.into_owned()),
                "status" => status = Some(value.into_owned()),
                _ => {}
            }
        }

        let id = id.ok_or(CallbackError::MissingParameter("id"))?;
        let raw_status = status.ok_or(CallbackError::MissingParameter("status"))?;
        let status = raw_status
            .trim()
            .parse::<i32>()
            .ok()
            .and_then(|code| ValidationStatus::try_from(code).ok())
            .ok_or_else(|| CallbackError::InvalidStatus(raw_status.clone()))?;

        Ok(Self { id, status })
    }
}
