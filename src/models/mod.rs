pub mod azure;
pub mod kea;
