use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    method::Params,
    xmlrpc::{Blob, DateTime, Value},
};

/// Interface and email language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Bg,
    Ca,
    De,
    #[default]
    En,
    Es,
    Fr,
    It,
    Nl,
    Pl,
    Pt,
    Ro,
}

/// Where a signer lands once the transaction is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectPolicy {
    /// The Universign dashboard
    Dashboard,
    /// Straight to the configured redirection url
    Quick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationDocumentType {
    #[serde(rename = "id_card_fr")]
    IdCardFr,
    #[serde(rename = "passport_eu")]
    PassportEu,
    #[serde(rename = "titre_sejour")]
    ResidencePermit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureFormat {
    #[serde(rename = "PADES")]
    Pades,
    #[serde(rename = "PADES-COMP")]
    PadesComp,
    #[serde(rename = "ISO-32000-1")]
    Iso32000,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignerRole {
    Signer,
    /// Follows the transaction without signing
    Observer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateType {
    Certified,
    Advanced,
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    Pdf,
    PdfForPresentation,
    PdfOptional,
    /// SEPA mandate generated from [`SepaData`]
    Sepa,
}

/// How signers are invited one after the other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainingMode {
    None,
    Email,
    Web,
}

fn check_redirect(
    policy: Option<RedirectPolicy>,
    wait: Option<u32>,
) -> Result<(), ValidationError> {
    if policy == Some(RedirectPolicy::Quick) && wait.is_some() {
        return Err(ValidationError::new("redirect_wait_with_quick_policy"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedirectionConfig {
    #[serde(rename = "URL")]
    #[validate(url)]
    pub url: String,
    pub display_name: String,
}

impl RedirectionConfig {
    pub fn new(url: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            display_name: display_name.into(),
        }
    }
}

/// Identity documents sent along with a signer for registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 1))]
    pub documents: Vec<Blob>,
    #[serde(rename = "type")]
    pub kind: RegistrationDocumentType,
}

impl RegistrationRequest {
    pub fn new(kind: RegistrationDocumentType, documents: Vec<Blob>) -> Self {
        Self { documents, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SepaThirdParty {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

impl SepaThirdParty {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            postal_code: postal_code.into(),
            city: city.into(),
            country: country.into(),
        }
    }
}

/// Content of a SEPA mandate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SepaData {
    /// Unique mandate reference
    #[validate(length(min = 1))]
    pub rum: String,
    /// Creditor identifier
    #[validate(length(min = 1))]
    pub ics: String,
    #[validate(length(min = 1))]
    pub iban: String,
    #[validate(length(min = 1))]
    pub bic: String,
    pub recurring: bool,
    pub debtor: SepaThirdParty,
    pub creditor: SepaThirdParty,
}

/// Position of a signature field; `x` and `y` are in points from the top left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub page: i32,
    pub x: i32,
    pub y: i32,
}

impl SignatureField {
    pub fn new(page: i32, x: i32, y: i32) -> Self {
        Self {
            name: None,
            page,
            x,
            y,
        }
    }

    optional_setters! {
        with_name => name: String;
    }
}

/// Signature field of a transaction document, bound to one signer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocSignatureField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub page: i32,
    pub x: i32,
    pub y: i32,
    /// Index of the signer in the transaction, starting at 0
    pub signer_index: u32,
    /// `"invisible"` hides the field in the PDF
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// JPG or PNG shown in place of the default logo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Blob>,
}

impl DocSignatureField {
    pub fn new(signer_index: u32, page: i32, x: i32, y: i32) -> Self {
        Self {
            name: None,
            page,
            x,
            y,
            signer_index,
            pattern_name: None,
            label: None,
            image: None,
        }
    }

    optional_setters! {
        with_name => name: String;
        with_pattern_name => pattern_name: String;
        with_label => label: String;
        with_image => image: Blob;
    }
}

/// Options of a server-side signature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_field: Option<SignatureField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_format: Option<SignatureFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_name: Option<String>,
}

impl SignOptions {
    pub fn new() -> Self {
        Self::default()
    }

    optional_setters! {
        with_profile => profile: String;
        with_signature_field => signature_field: SignatureField;
        with_reason => reason: String;
        with_location => location: String;
        with_signature_format => signature_format: SignatureFormat;
        with_language => language: Language;
        with_pattern_name => pattern_name: String;
    }
}

fn check_signer(signer: &TransactionSigner) -> Result<(), ValidationError> {
    check_redirect(signer.redirect_policy, signer.redirect_wait)
}

/// A signer or observer of a transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_signer"))]
pub struct TransactionSigner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email_address: Option<String>,
    /// International format, e.g. `+33...`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<SignerRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universign_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub success_redirection: Option<RedirectionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub cancel_redirection: Option<RedirectionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub fail_redirection: Option<RedirectionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_type: Option<CertificateType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub id_documents: Option<RegistrationRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_policy: Option<RedirectPolicy>,
    /// Seconds before redirection, between 2 and 30
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 2, max = 30))]
    pub redirect_wait: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_send_agreements: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation_message: Option<String>,
}

impl TransactionSigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signer identified by name and email address
    pub fn person(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self::new()
            .with_firstname(firstname)
            .with_lastname(lastname)
            .with_email_address(email_address)
    }

    optional_setters! {
        with_firstname => firstname: String;
        with_lastname => lastname: String;
        with_organization => organization: String;
        with_profile => profile: String;
        with_email_address => email_address: String;
        with_phone_num => phone_num: String;
        with_language => language: Language;
        with_role => role: SignerRole;
        with_birth_date => birth_date: DateTime;
        with_universign_id => universign_id: String;
        with_success_redirection => success_redirection: RedirectionConfig;
        with_cancel_redirection => cancel_redirection: RedirectionConfig;
        with_fail_redirection => fail_redirection: RedirectionConfig;
        with_certificate_type => certificate_type: CertificateType;
        with_id_documents => id_documents: RegistrationRequest;
        with_validation_session_id => validation_session_id: String;
        with_redirect_policy => redirect_policy: RedirectPolicy;
        with_redirect_wait => redirect_wait: u32;
        with_auto_send_agreements => auto_send_agreements: bool;
        with_invitation_message => invitation_message: String;
    }
}

fn check_document(document: &TransactionDocument) -> Result<(), ValidationError> {
    if document.document_type == Some(DocumentType::Sepa) {
        if document.sepa_data.is_none() {
            return Err(ValidationError::new("sepa_document_without_sepa_data"));
        }
    } else if document.content.is_none() && document.url.is_none() {
        return Err(ValidationError::new("document_without_content_or_url"));
    }
    Ok(())
}

/// A document of a transaction, given inline or by url
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_document"))]
pub struct TransactionDocument {
    #[serde(default)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Blob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub url: Option<String>,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_fields: Option<Vec<DocSignatureField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_box_texts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<BTreeMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "SEPAData", skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub sepa_data: Option<SepaData>,
}

impl TransactionDocument {
    pub fn new(id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            document_type: None,
            content: None,
            url: None,
            file_name: file_name.into(),
            signature_fields: None,
            check_box_texts: None,
            meta_data: None,
            title: None,
            sepa_data: None,
        }
    }

    pub fn from_content(
        id: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Blob>,
    ) -> Self {
        Self::new(id, file_name).with_content(content)
    }

    pub fn from_url(
        id: impl Into<String>,
        file_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::new(id, file_name).with_url(url)
    }

    /// A SEPA mandate, rendered by the service from `data`
    pub fn sepa(id: impl Into<String>, file_name: impl Into<String>, data: SepaData) -> Self {
        Self::new(id, file_name)
            .with_document_type(DocumentType::Sepa)
            .with_sepa_data(data)
    }

    optional_setters! {
        with_document_type => document_type: DocumentType;
        with_content => content: Blob;
        with_url => url: String;
        with_signature_fields => signature_fields: Vec<DocSignatureField>;
        with_check_box_texts => check_box_texts: Vec<String>;
        with_meta_data => meta_data: BTreeMap<String, Value>;
        with_title => title: String;
        with_sepa_data => sepa_data: SepaData;
    }
}

fn check_request(request: &TransactionRequest) -> Result<(), ValidationError> {
    check_redirect(request.redirect_policy, request.redirect_wait)
}

/// A signature transaction: who signs which documents, and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_request"))]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[validate(length(min = 1), nested)]
    pub signers: Vec<TransactionSigner>,
    #[validate(length(min = 1), nested)]
    pub documents: Vec<TransactionDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_contact_first_signer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_doc_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_doc_requester_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_doc_observer_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_type: Option<CertificateType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chaining_mode: Option<ChainingMode>,
    #[serde(rename = "successURL", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub success_url: Option<String>,
    #[serde(rename = "cancelURL", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub cancel_url: Option<String>,
    #[serde(rename = "failURL", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub fail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_policy: Option<RedirectPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 2, max = 30))]
    pub redirect_wait: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_send_agreements: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(rename = "registrationCallbackURL", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub registration_callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation_message: Option<String>,
}

impl TransactionRequest {
    pub fn new(signers: Vec<TransactionSigner>, documents: Vec<TransactionDocument>) -> Self {
        Self {
            profile: None,
            custom_id: None,
            signers,
            documents,
            language: None,
            must_contact_first_signer: None,
            final_doc_sent: None,
            final_doc_requester_sent: None,
            final_doc_observer_sent: None,
            description: None,
            certificate_type: None,
            chaining_mode: None,
            success_url: None,
            cancel_url: None,
            fail_url: None,
            redirect_policy: None,
            redirect_wait: None,
            auto_send_agreements: None,
            operator: None,
            registration_callback_url: None,
            invitation_message: None,
        }
    }

    pub fn with_signer(mut self, signer: TransactionSigner) -> Self {
        self.signers.push(signer);
        self
    }

    pub fn with_document(mut self, document: TransactionDocument) -> Self {
        self.documents.push(document);
        self
    }

    optional_setters! {
        with_profile => profile: String;
        with_custom_id => custom_id: String;
        with_language => language: Language;
        with_must_contact_first_signer => must_contact_first_signer: bool;
        with_final_doc_sent => final_doc_sent: bool;
        with_final_doc_requester_sent => final_doc_requester_sent: bool;
        with_final_doc_observer_sent => final_doc_observer_sent: bool;
        with_description => description: String;
        with_certificate_type => certificate_type: CertificateType;
        with_chaining_mode => chaining_mode: ChainingMode;
        with_success_url => success_url: String;
        with_cancel_url => cancel_url: String;
        with_fail_url => fail_url: String;
        with_redirect_policy => redirect_policy: RedirectPolicy;
        with_redirect_wait => redirect_wait: u32;
        with_auto_send_agreements => auto_send_agreements: bool;
        with_operator => operator: String;
        with_registration_callback_url => registration_callback_url: String;
        with_invitation_message => invitation_message: String;
    }
}

impl Params for TransactionRequest {
    fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()
    }
}

impl Params for (Blob, SignOptions) {}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionResponse {
    /// Where the first signer signs
    pub url: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CertificateInfo {
    pub subject: String,
    pub issuer: String,
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatorInfo {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Progress of a signer, observers only reach `accessed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignerStatus {
    Waiting,
    Ready,
    Accessed,
    CodeSent,
    Signed,
    PendingIdDocs,
    PendingValidation,
    Canceled,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerInfo {
    pub status: SignerStatus,
    pub error: Option<String>,
    pub certificate_info: Option<CertificateInfo>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub action_date: Option<DateTime>,
    /// Indexes of the documents the signer refused to sign
    #[serde(default)]
    pub refused_docs: Vec<u32>,
    pub refusal_comment: Option<String>,
    pub redirect_policy: Option<RedirectPolicy>,
    pub redirect_wait: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Ready,
    Expired,
    Canceled,
    Failed,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub status: TransactionStatus,
    #[serde(default)]
    pub signer_infos: Vec<SignerInfo>,
    /// Index of the signer the transaction waits for
    #[serde(default)]
    pub current_signer: i32,
    pub creation_date: DateTime,
    #[serde(default)]
    pub description: String,
    pub initiator_info: Option<InitiatorInfo>,
    #[serde(default)]
    pub each_field: bool,
    pub customer_id: Option<String>,
    pub transaction_id: String,
    pub redirect_policy: Option<RedirectPolicy>,
    pub redirect_wait: Option<u32>,
}

impl TransactionInfo {
    /// The signer currently expected to act, if any
    pub fn current_signer_info(&self) -> Option<&SignerInfo> {
        usize::try_from(self.current_signer)
            .ok()
            .and_then(|index| self.signer_infos.get(index))
    }
}
