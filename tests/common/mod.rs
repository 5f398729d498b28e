#![allow(dead_code)]

use universign_rpc::{
    ClientConfig, Credentials,
    xmlrpc::{self, Response, Value},
};
use wiremock::{MockServer, Request, ResponseTemplate};

pub const EMAIL: &str = "jane@example.com";
pub const PASSWORD: &str = "s3cret";

// Client configuration pointing at a mock server over plain HTTP
pub fn config_for(server: &MockServer) -> ClientConfig {
    universign_rpc::telemetry::init_tracing();
    ClientConfig::new(Credentials::new(EMAIL, PASSWORD))
        .with_url(server.uri())
        .with_secure(false)
}

pub fn xml_response(value: Value) -> ResponseTemplate {
    let body = xmlrpc::encode_response(&Response::Success(value)).unwrap();
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/xml")
        .set_body_string(body)
}

pub fn fault_response(code: i32, message: &str) -> ResponseTemplate {
    let body = xmlrpc::encode_response(&Response::Fault {
        code,
        message: message.to_string(),
    })
    .unwrap();
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/xml")
        .set_body_string(body)
}

// Method name and parameters of every call the server received
pub async fn received_calls(server: &MockServer) -> Vec<(String, Vec<Value>)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(decode_request)
        .collect()
}

pub fn decode_request(request: &Request) -> (String, Vec<Value>) {
    let body = String::from_utf8(request.body.clone()).unwrap();
    xmlrpc::decode_call(&body).unwrap()
}
