use super::{
    RegistrationAuthority,
    models::{MatchingFilter, MatchingResult, OperatorStatus, ValidationRequest, ValidatorResult},
};
use crate::{
    remote_methods,
    xmlrpc::{Ack, Blob},
};

remote_methods! {
    RegistrationAuthority => enum RegistrationAuthorityMethod {
        /// Looks up existing accounts; no match is an empty list
        MatchAccount = "matcher.matchAccount" (Single: MatchingFilter) -> Vec<MatchingResult>;
        /// Starts a validation session
        Validate = "validator.validate" (Single: ValidationRequest) -> ValidatorResult;
        GetResult = "validator.getResult" (Single: String) -> ValidatorResult;
        CheckOperatorStatus = "ra.checkOperatorStatus" (Single: String) -> OperatorStatus;
        GetCertificateAgreement = "ra.getCertificateAgreement" (Single: String) -> Blob;
        RevokeCertificate = "ra.revokeCertificate" (Single: String) -> Ack;
        /// Revokes the certificate of the authenticated account
        RevokeMyCertificate = "ra.revokeMyCertificate" (Empty: ()) -> Ack;
    }
}
