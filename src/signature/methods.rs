use super::{
    Signature,
    models::{
        SignOptions, TransactionDocument, TransactionInfo, TransactionRequest, TransactionResponse,
    },
};
use crate::{
    remote_methods,
    xmlrpc::{Ack, Blob},
};

remote_methods! {
    Signature => enum SignatureMethod {
        /// Signs a PDF server-side with the account's certificate
        Sign = "signer.sign" (Single: Blob) -> Blob;
        SignWithOptions = "signer.signWithOptions" (Positional: (Blob, SignOptions)) -> Blob;
        RequestTransaction = "requester.requestTransaction"
            (Single: TransactionRequest) -> TransactionResponse;
        GetDocuments = "requester.getDocuments" (Single: String) -> Vec<TransactionDocument>;
        GetDocumentsByCustomId = "requester.getDocumentsByCustomId"
            (Single: String) -> Vec<TransactionDocument>;
        GetTransactionInfo = "requester.getTransactionInfo" (Single: String) -> TransactionInfo;
        GetTransactionInfoByCustomId = "requester.getTransactionInfoByCustomId"
            (Single: String) -> TransactionInfo;
        /// Sends the invitation email again to the current signer
        RelaunchTransaction = "requester.relaunchTransaction" (Single: String) -> Ack;
        CancelTransaction = "requester.cancelTransaction" (Single: String) -> Ack;
        CancelRegistration = "requester.cancelRegistration" (Single: String) -> Ack;
    }
}
