//! Signature service: server-side signing and signature transactions.

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

/// Marker of the signature service (`signer.*` and `requester.*` methods)
#[derive(Debug)]
pub enum Signature {}

impl Service for Signature {
    const NAME: &'static str = "signature";
    const DEFAULT_PATH: &'static str = "/sign/rpc/";
    type Method = SignatureMethod;
}

pub type SignatureClient = RpcClient<Signature>;

impl RpcClient<Signature> {
    pub async fn sign(&self, document: impl Into<Blob>) -> Result<Blob, Error> {
        self.call(Sign, document.into()).await
    }

    pub async fn sign_with_options(
        &self,
        document: impl Into<Blob>,
        options: SignOptions,
    ) -> Result<Blob, Error> {
        self.call(SignWithOptions, (document.into(), options)).await
    }

    /// Creates a transaction and returns the url of its first signer
    pub async fn request_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionResponse, Error> {
        self.call(RequestTransaction, request).await
    }

    pub async fn get_documents(
        &self,
        transaction_id: impl Into<String>,
    ) -> Result<Vec<TransactionDocument>, Error> {
        self.call(GetDocuments, transaction_id.into()).await
    }

    pub async fn get_documents_by_custom_id(
        &self,
        custom_id: impl Into<String>,
    ) -> Result<Vec<TransactionDocument>, Error> {
        self.call(GetDocumentsByCustomId, custom_id.into()).await
    }

    pub async fn get_transaction_info(
        &self,
        transaction_id: impl Into<String>,
    ) -> Result<TransactionInfo, Error> {
        self.call(GetTransactionInfo, transaction_id.into()).await
    }

    pub async fn get_transaction_info_by_custom_id(
        &self,
        custom_id: impl Into<String>,
    ) -> Result<TransactionInfo, Error> {
        self.call(GetTransactionInfoByCustomId, custom_id.into()).await
    }

    pub async fn relaunch_transaction(
        &self,
        transaction_id: impl Into<String>,
    ) -> Result<Ack, Error> {
        self.call(RelaunchTransaction, transaction_id.into()).await
    }

    pub async fn cancel_transaction(
        &self,
        transaction_id: impl Into<String>,
    ) -> Result<Ack, Error> {
        self.call(CancelTransaction, transaction_id.into()).await
    }

    pub async fn cancel_registration(
        &self,
        transaction_id: impl Into<String>,
    ) -> Result<Ack, Error> {
        self.call(CancelRegistration, transaction_id.into()).await
    }
}
