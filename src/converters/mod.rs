pub mod azure_response;
pub mod kea_to_azure;
