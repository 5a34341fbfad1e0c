// Messages of the fraud scoring service (`fraud.FraudDetectionService`).
// Kept in sync with fraud.proto by hand.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FraudRequest {
    #[prost(string, tag = "1")]
    pub claim_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub policy_number: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub claim_type: ::prost::alloc::string::String,
    #[prost(double, tag = "4")]
    pub claimed_amount: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FraudReply {
    #[prost(string, tag = "1")]
    pub risk: ::prost::alloc::string::String,
    #[prost(double, tag = "2")]
    pub score: f64,
    #[prost(string, tag = "3")]
    pub explanation: ::prost::alloc::string::String,
}
