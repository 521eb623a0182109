//! Typed registry: each endpoint name is paired with its request and response types.

use crate::config::builtin::names;
use crate::envelope::{Envelope, ListData};
use crate::models::{
    Consultant, Contractor, Employee, IdRequest, ListRequest, OperationalRequest, Project, User,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub trait Endpoint {
    const NAME: &'static str;
    type Request: Serialize + Send + Sync;
    type Response: DeserializeOwned + Send;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
    pub confirm_password: String,
}

/// Stored asset path(s) returned by the upload endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadedPaths {
    One(String),
    Many(Vec<String>),
}

impl UploadedPaths {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            UploadedPaths::One(p) => vec![p],
            UploadedPaths::Many(v) => v,
        }
    }
}

macro_rules! endpoint {
    ($ty:ident, $name:expr, $req:ty => $resp:ty) => {
        #[derive(Clone, Copy, Debug)]
        pub struct $ty;

        impl Endpoint for $ty {
            const NAME: &'static str = $name;
            type Request = $req;
            type Response = $resp;
        }
    };
}

/// List/Get/Create/Update/Delete for one record type under `<prefix>.*`.
macro_rules! crud_endpoints {
    ($prefix:literal, $record:ty, $list:ident, $get:ident, $create:ident, $update:ident, $delete:ident) => {
        endpoint!($list, concat!($prefix, ".list"), ListRequest => Envelope<ListData<$record>>);
        endpoint!($get, concat!($prefix, ".get"), IdRequest => Envelope<$record>);
        endpoint!($create, concat!($prefix, ".create"), $record => Envelope<$record>);
        // `id` must be set: it fills the `{id}` placeholder.
        endpoint!($update, concat!($prefix, ".update"), $record => Envelope<$record>);
        endpoint!($delete, concat!($prefix, ".delete"), IdRequest => Envelope<Value>);
    };
}

endpoint!(Login, names::LOGIN, LoginRequest => Envelope<LoginData>);
endpoint!(ForgetPassword, names::FORGET_PASSWORD, EmailRequest => Envelope<Value>);
endpoint!(VerifyOtp, names::VERIFY_OTP, OtpRequest => Envelope<Value>);
endpoint!(ResetPassword, names::RESET_PASSWORD, ResetPasswordRequest => Envelope<Value>);
endpoint!(Profile, names::PROFILE, () => Envelope<User>);
endpoint!(UploadImage, names::UPLOAD_IMAGE, () => Envelope<UploadedPaths>);
endpoint!(UploadFiles, names::UPLOAD_FILES, () => Envelope<UploadedPaths>);

crud_endpoints!("employees", Employee, ListEmployees, GetEmployee, CreateEmployee, UpdateEmployee, DeleteEmployee);
crud_endpoints!("contractors", Contractor, ListContractors, GetContractor, CreateContractor, UpdateContractor, DeleteContractor);
crud_endpoints!("consultants", Consultant, ListConsultants, GetConsultant, CreateConsultant, UpdateConsultant, DeleteConsultant);
crud_endpoints!("projects", Project, ListProjects, GetProject, CreateProject, UpdateProject, DeleteProject);
crud_endpoints!("requests", OperationalRequest, ListRequests, GetRequest, CreateRequest, UpdateRequest, DeleteRequest);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::dashboard_registry;

    #[test]
    fn every_typed_endpoint_is_registered() {
        let registry = dashboard_registry().unwrap();
        for name in [
            Login::NAME,
            ForgetPassword::NAME,
            VerifyOtp::NAME,
            ResetPassword::NAME,
            Profile::NAME,
            UploadImage::NAME,
            UploadFiles::NAME,
            ListEmployees::NAME,
            UpdateContractor::NAME,
            GetConsultant::NAME,
            CreateProject::NAME,
            DeleteRequest::NAME,
        ] {
            assert!(registry.get(name).is_some(), "{} missing from registry", name);
        }
    }

    #[test]
    fn uploaded_paths_accept_one_or_many() {
        let one: UploadedPaths = serde_json::from_str(r#""uploads/a.png""#).unwrap();
        let many: UploadedPaths = serde_json::from_str(r#"["uploads/a.pdf","uploads/b.pdf"]"#).unwrap();
        assert_eq!(one.into_vec(), vec!["uploads/a.png".to_string()]);
        assert_eq!(many.into_vec().len(), 2);
    }
}
