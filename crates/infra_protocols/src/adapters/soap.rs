//! SOAP Identity Adapter
//!
//! Implements [`IdentityPort`] against the identity service's
//! `verifyIdentity(customerId, fullName, policyNumber)` operation.
//!
//! The service is described by a WSDL document. On first use the adapter
//! fetches the WSDL, resolves the SOAP address and target namespace, and keeps
//! the result in a [`ClientCache`] keyed by the WSDL URL. Adapters sharing a
//! cache fetch a given WSDL once.

use std::sync::Arc;

use async_trait::async_trait;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info, instrument};

use core_kernel::{bounded_call, AdapterConfig, AdapterError, ClientCache, DomainPort};
use domain_claims::ports::{IdentityCheck, IdentityPort, IdentityVerification};

use crate::error::ProtocolError;
use crate::http::{expect_success, HttpEndpoint};

/// Name of the identity verification operation
pub const VERIFY_IDENTITY_OPERATION: &str = "verifyIdentity";

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Service binding resolved from a WSDL document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsdlClient {
    /// `location` of the service's `soap:address`
    pub endpoint: String,
    /// `targetNamespace` of the WSDL definitions
    pub target_namespace: String,
}

impl WsdlClient {
    /// Parses the first SOAP address and the target namespace out of a WSDL
    pub fn parse(wsdl: &str) -> Result<Self, ProtocolError> {
        let mut reader = Reader::from_str(wsdl);
        let mut endpoint = None;
        let mut target_namespace = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"definitions" if target_namespace.is_none() => {
                        target_namespace = attribute(&e, b"targetNamespace")?;
                    }
                    b"address" if endpoint.is_none() => {
                        endpoint = attribute(&e, b"location")?;
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self {
            endpoint: endpoint
                .ok_or_else(|| ProtocolError::Malformed("WSDL has no soap:address location".to_string()))?,
            target_namespace: target_namespace
                .ok_or_else(|| ProtocolError::Malformed("WSDL has no targetNamespace".to_string()))?,
        })
    }

    /// Builds the request envelope for `verifyIdentity`
    pub fn verify_identity_envelope(&self, check: &IdentityCheck) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<soapenv:Envelope xmlns:soapenv="{envelope}" xmlns:tns="{ns}">"#,
                "<soapenv:Header/>",
                "<soapenv:Body>",
                "<tns:{operation}>",
                "<customerId>{customer_id}</customerId>",
                "<fullName>{full_name}</fullName>",
                "<policyNumber>{policy_number}</policyNumber>",
                "</tns:{operation}>",
                "</soapenv:Body>",
                "</soapenv:Envelope>",
            ),
            envelope = SOAP_ENVELOPE_NS,
            ns = escape(self.target_namespace.as_str()),
            operation = VERIFY_IDENTITY_OPERATION,
            customer_id = escape(check.customer_id.as_str()),
            full_name = escape(check.full_name.as_str()),
            policy_number = escape(check.policy_number.as_str()),
        )
    }
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, ProtocolError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ProtocolError::Malformed(format!("invalid XML attribute: {e}")))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| ProtocolError::Malformed(format!("invalid XML attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Reads a `verifyIdentity` response envelope
///
/// A `Fault` element becomes [`ProtocolError::Fault`] with its `faultstring`.
pub fn parse_verification(body: &str) -> Result<IdentityVerification, ProtocolError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut current: Vec<u8> = Vec::new();
    let mut fault = false;
    let mut fault_string = None;
    let mut verified = None;
    let mut reason = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                current = e.local_name().as_ref().to_vec();
                if current == b"Fault" {
                    fault = true;
                }
            }
            Event::Empty(e) if e.local_name().as_ref() == b"Fault" => fault = true,
            Event::End(_) => current.clear(),
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ProtocolError::Malformed(format!("invalid XML text: {e}")))?;
                match current.as_slice() {
                    b"faultstring" | b"Text" => fault_string = Some(text.into_owned()),
                    b"verified" => verified = Some(text.trim().eq_ignore_ascii_case("true")),
                    b"reason" => reason = text.into_owned(),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if fault {
        return Err(ProtocolError::Fault(
            fault_string.unwrap_or_else(|| "SOAP fault".to_string()),
        ));
    }

    let verified = verified.ok_or_else(|| {
        ProtocolError::Malformed(format!("{VERIFY_IDENTITY_OPERATION} response has no verified element"))
    })?;
    Ok(IdentityVerification { verified, reason })
}

/// SOAP client for the identity service
pub struct SoapIdentityVerifier {
    http: HttpEndpoint,
    wsdl_url: String,
    clients: Arc<ClientCache<WsdlClient>>,
}

impl SoapIdentityVerifier {
    /// Creates a verifier with its own client cache
    pub fn new(config: &AdapterConfig) -> Result<Self, ProtocolError> {
        Self::with_cache(config, Arc::new(ClientCache::new()))
    }

    /// Creates a verifier resolving its WSDL through a shared cache
    pub fn with_cache(config: &AdapterConfig, clients: Arc<ClientCache<WsdlClient>>) -> Result<Self, ProtocolError> {
        Ok(Self {
            http: HttpEndpoint::new(config)?,
            wsdl_url: config.endpoint.clone(),
            clients,
        })
    }

    /// The resolved service binding, fetching the WSDL on first use
    pub async fn client(&self) -> Result<Arc<WsdlClient>, ProtocolError> {
        self.clients
            .get_or_try_build(&self.wsdl_url, || async {
                info!(wsdl = %self.wsdl_url, "fetching WSDL");
                let request = self.http.client().get(self.http.base().clone());
                let response = self.http.send("fetchWsdl", request).await?;
                let response = expect_success(response).await?;
                let wsdl = response
                    .text()
                    .await
                    .map_err(|e| ProtocolError::http("fetchWsdl", e))?;
                let client = WsdlClient::parse(&wsdl)?;
                debug!(endpoint = %client.endpoint, namespace = %client.target_namespace, "WSDL resolved");
                Ok(client)
            })
            .await
    }

    async fn verify(&self, check: &IdentityCheck) -> Result<IdentityVerification, ProtocolError> {
        let client = self.client().await?;
        let request = self
            .http
            .client()
            .post(client.endpoint.as_str())
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(client.verify_identity_envelope(check));

        let response = self.http.send(VERIFY_IDENTITY_OPERATION, request).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProtocolError::http(VERIFY_IDENTITY_OPERATION, e))?;

        // Faults usually arrive with HTTP 500, so the envelope is read first.
        match parse_verification(&body) {
            Err(ProtocolError::Malformed(_)) if !status.is_success() => Err(ProtocolError::Status {
                status: status.as_u16(),
                body,
            }),
            result => result,
        }
    }
}

impl DomainPort for SoapIdentityVerifier {}

#[async_trait]
impl IdentityPort for SoapIdentityVerifier {
    #[instrument(skip(self, check), fields(customer_id = %check.customer_id))]
    async fn verify_identity(&self, check: &IdentityCheck) -> Result<IdentityVerification, AdapterError> {
        bounded_call(VERIFY_IDENTITY_OPERATION, self.http.timeout(), async {
            let verification = self.verify(check).await?;
            debug!(verified = verification.verified, reason = %verification.reason, "identity verified");
            Ok(verification)
        })
        .await
    }
}
