//! The dashboard's own endpoint table: auth, the five record types, uploads.

use crate::config::{resolve, EndpointConfig, EndpointRegistry, HttpMethod};
use crate::error::ConfigError;

/// Symbolic endpoint names used by the typed endpoints and list screens.
pub mod names {
    pub const LOGIN: &str = "auth.login";
    pub const FORGET_PASSWORD: &str = "auth.forget_password";
    pub const VERIFY_OTP: &str = "auth.verify_otp";
    pub const RESET_PASSWORD: &str = "auth.reset_password";
    pub const PROFILE: &str = "auth.profile";

    pub const UPLOAD_IMAGE: &str = "upload.image";
    pub const UPLOAD_FILES: &str = "upload.files";
}

/// (resource prefix, url collection segment)
const RESOURCES: [(&str, &str); 5] = [
    ("employees", "employees"),
    ("contractors", "contractors"),
    ("consultants", "consultants"),
    ("projects", "projects"),
    ("requests", "operational-requests"),
];

pub fn dashboard_endpoints() -> Vec<EndpointConfig> {
    let mut endpoints = vec![
        EndpointConfig::new(names::LOGIN, HttpMethod::Post, "auth/login"),
        EndpointConfig::new(names::FORGET_PASSWORD, HttpMethod::Post, "auth/forget-password"),
        EndpointConfig::new(names::VERIFY_OTP, HttpMethod::Post, "auth/verify-otp"),
        EndpointConfig::new(names::RESET_PASSWORD, HttpMethod::Post, "auth/reset-password"),
        EndpointConfig::new(names::PROFILE, HttpMethod::Get, "auth/profile"),
        EndpointConfig::new(names::UPLOAD_IMAGE, HttpMethod::Post, "upload/image"),
        EndpointConfig::new(names::UPLOAD_FILES, HttpMethod::Post, "upload/files"),
    ];
    for (prefix, segment) in RESOURCES {
        let item = format!("{}/{{id}}", segment);
        endpoints.extend([
            EndpointConfig::new(format!("{}.list", prefix), HttpMethod::Get, segment),
            EndpointConfig::new(format!("{}.get", prefix), HttpMethod::Get, item.clone()),
            EndpointConfig::new(format!("{}.create", prefix), HttpMethod::Post, segment),
            EndpointConfig::new(format!("{}.update", prefix), HttpMethod::Put, item.clone()),
            EndpointConfig::new(format!("{}.delete", prefix), HttpMethod::Delete, item),
        ]);
    }
    endpoints
}

pub fn dashboard_registry() -> Result<EndpointRegistry, ConfigError> {
    resolve(&dashboard_endpoints())
}
