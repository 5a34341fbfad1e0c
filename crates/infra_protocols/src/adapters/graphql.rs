//! GraphQL Policy Adapter
//!
//! Implements [`PolicyPort`] with the `validatePolicy` query. The endpoint is
//! the full GraphQL URL (e.g. `http://policy-graphql:8083/graphql`).
//!
//! A 2xx response carrying a non-empty `errors` array is a protocol error
//! even if `data` is present. A non-2xx response means the service itself is
//! not serving and surfaces as a transport error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use core_kernel::{bounded_call, AdapterConfig, AdapterError, DomainPort};
use domain_claims::ports::{PolicyCheck, PolicyPort, PolicyValidation};

use crate::error::ProtocolError;
use crate::http::{read_json, HttpEndpoint};

const VALIDATE_POLICY_OPERATION: &str = "validatePolicy";

/// Query sent for every validation
pub const VALIDATE_POLICY_QUERY: &str = "query Validate($policyNumber: String!, $claimType: String!) { validatePolicy(policyNumber: $policyNumber, claimType: $claimType) { valid covered message } }";

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateVariables<'a> {
    policy_number: &'a str,
    claim_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<D> {
    data: Option<D>,
    errors: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateData {
    validate_policy: Option<PolicyValidation>,
}

/// GraphQL client for the policy service
#[derive(Debug, Clone)]
pub struct GraphqlPolicyValidator {
    http: HttpEndpoint,
}

impl GraphqlPolicyValidator {
    pub fn new(config: &AdapterConfig) -> Result<Self, ProtocolError> {
        Ok(Self {
            http: HttpEndpoint::new(config)?,
        })
    }

    async fn validate(&self, check: &PolicyCheck) -> Result<PolicyValidation, ProtocolError> {
        let body = GraphqlRequest {
            query: VALIDATE_POLICY_QUERY,
            variables: ValidateVariables {
                policy_number: &check.policy_number,
                claim_type: check.claim_type.as_str(),
            },
        };
        let request = self.http.client().post(self.http.base().clone()).json(&body);

        let response = self.http.send(VALIDATE_POLICY_OPERATION, request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProtocolError::Unreachable(format!(
                "policy service answered HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let response: GraphqlResponse<ValidateData> = read_json(VALIDATE_POLICY_OPERATION, response).await?;
        match response.errors {
            Some(errors) if !errors.is_empty() => {
                let errors = serde_json::to_string(&errors)
                    .map_err(|e| ProtocolError::Malformed(e.to_string()))?;
                return Err(ProtocolError::GraphqlErrors(errors));
            }
            _ => {}
        }

        response
            .data
            .and_then(|data| data.validate_policy)
            .ok_or_else(|| ProtocolError::Malformed("response has no data.validatePolicy".to_string()))
    }
}

impl DomainPort for GraphqlPolicyValidator {}

#[async_trait]
impl PolicyPort for GraphqlPolicyValidator {
    #[instrument(skip(self, check), fields(policy_number = %check.policy_number, claim_type = %check.claim_type))]
    async fn validate_policy(&self, check: &PolicyCheck) -> Result<PolicyValidation, AdapterError> {
        bounded_call(VALIDATE_POLICY_OPERATION, self.http.timeout(), async {
            let validation = self.validate(check).await?;
            debug!(valid = validation.valid, covered = validation.covered, "policy validated");
            Ok(validation)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::claim::ClaimType;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = GraphqlRequest {
            query: VALIDATE_POLICY_QUERY,
            variables: ValidateVariables {
                policy_number: "POL-1001",
                claim_type: ClaimType::Health.as_str(),
            },
        };

        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["variables"], json!({"policyNumber": "POL-1001", "claimType": "HEALTH"}));
        assert!(value["query"].as_str().unwrap().contains("validatePolicy"));
    }

    #[test]
    fn test_response_with_null_message() {
        let response: GraphqlResponse<ValidateData> = serde_json::from_value(json!({
            "data": {"validatePolicy": {"valid": true, "covered": false, "message": null}}
        }))
        .unwrap();

        let validation = response.data.unwrap().validate_policy.unwrap();
        assert!(validation.valid);
        assert!(!validation.covered);
        assert_eq!(validation.message, None);
    }
}
