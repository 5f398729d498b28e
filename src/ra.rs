//! Registration authority service: account matching, identity validation and
//! certificate management.

mod methods;
mod models;
#[cfg(test)]
mod tests;

pub use methods::*;
pub use models::*;

use crate::{
    RpcClient,
    error::Error,
    method::Service,
    xmlrpc::{Ack, Blob},
};

/// Marker of the registration authority service (`matcher.*`,
/// `validator.*` and `ra.*` methods)
#[derive(Debug)]
pub enum RegistrationAuthority {}

impl Service for RegistrationAuthority {
    const NAME: &'static str = "registration-authority";
    const DEFAULT_PATH: &'static str = "/ra/rpc/";
    type Method = RegistrationAuthorityMethod;
}

pub type RegistrationAuthorityClient = RpcClient<RegistrationAuthority>;

impl RpcClient<RegistrationAuthority> {
    pub async fn match_account(
        &self,
        filter: MatchingFilter,
    ) -> Result<Vec<MatchingResult>, Error> {
        self.call(MatchAccount, filter).await
    }

    pub async fn validate(&self, request: ValidationRequest) -> Result<ValidatorResult, Error> {
        self.call(Validate, request).await
    }

    pub async fn get_result(
        &self,
        validation_id: impl Into<String>,
    ) -> Result<ValidatorResult, Error> {
        self.call(GetResult, validation_id.into()).await
    }

    pub async fn check_operator_status(
        &self,
        email: impl Into<String>,
    ) -> Result<OperatorStatus, Error> {
        self.call(CheckOperatorStatus, email.into()).await
    }

    pub async fn get_certificate_agreement(&self, email: impl Into<String>) -> Result<Blob, Error> {
        self.call(GetCertificateAgreement, email.into()).await
    }

    pub async fn revoke_certificate(&self, email: impl Into<String>) -> Result<Ack, Error> {
        self.call(RevokeCertificate, email.into()).await
    }

    pub async fn revoke_my_certificate(&self) -> Result<Ack, Error> {
        self.call(RevokeMyCertificate, ()).await
    }
}
