mod common;

use common::harness;
use dashboard_sdk::models::Role;
use dashboard_sdk::{AuthFlow, AuthStep, ClientError};
use mockito::Matcher;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn login_stores_token_user_and_remembered_email() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({ "email": "admin@site.io", "password": "secret" })))
        .with_status(200)
        .with_body(
            r#"{"data":{"token":"jwt-1","user":{"id":1,"name":"Admin","email":"admin@site.io","role":"Admin"}},"message":"welcome"}"#,
        )
        .create_async()
        .await;

    let h = harness(&server.url());
    let mut flow = AuthFlow::new(h.dispatcher.clone());
    let user = flow.login("  admin@site.io ", "secret", true).await.unwrap();

    assert_eq!(user.unwrap().role, Role::Admin);
    assert!(h.session.is_authenticated());
    assert!(h.session.has_role(Role::Admin));
    assert_eq!(h.session.context().authorization().as_deref(), Some("Bearer jwt-1"));
    assert_eq!(flow.remembered_email().as_deref(), Some("admin@site.io"));
    m.assert_async().await;
}

#[tokio::test]
async fn login_without_user_loads_profile_and_forgets_email() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_body(r#"{"data":{"token":"jwt-2"}}"#)
        .create_async()
        .await;
    let profile = server
        .mock("GET", "/auth/profile")
        .match_header("authorization", "Bearer jwt-2")
        .with_status(200)
        .with_body(r#"{"data":{"id":7,"email":"eng@site.io","role":"employee"}}"#)
        .create_async()
        .await;

    let h = harness(&server.url());
    h.session.remember_email(Some("old@site.io".into()));
    let mut flow = AuthFlow::new(h.dispatcher.clone());
    let user = flow.login("eng@site.io", "pw", false).await.unwrap().unwrap();

    assert_eq!(user.id, 7);
    assert_eq!(h.session.user().unwrap().role, Role::Employee);
    assert_eq!(h.session.remembered_email(), None);
    profile.assert_async().await;
}

#[tokio::test]
async fn wrong_password_is_reported_without_touching_the_session() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"message":"Incorrect username or password"}"#)
        .create_async()
        .await;

    let h = harness(&server.url());
    h.session.remember_email(Some("admin@site.io".into()));
    let mut flow = AuthFlow::new(h.dispatcher.clone());
    let err = flow.login("admin@site.io", "nope", true).await.unwrap_err();

    match err {
        ClientError::Server { status, message, .. } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Incorrect username or password");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!h.session.is_authenticated());
    assert_eq!(h.session.remembered_email().as_deref(), Some("admin@site.io"));
    assert!(h.navigator.routes().is_empty());
    assert_eq!(flow.step(), &AuthStep::SignIn);
}

#[tokio::test]
async fn forget_password_then_otp_then_reset() {
    let mut server = mockito::Server::new_async().await;
    let forget = server
        .mock("POST", "/auth/forget-password")
        .match_body(Matcher::Json(json!({ "email": "eng@site.io" })))
        .with_status(200)
        .with_body(r#"{"data":null,"message":"OTP sent"}"#)
        .create_async()
        .await;
    let verify = server
        .mock("POST", "/auth/verify-otp")
        .match_body(Matcher::Json(json!({ "email": "eng@site.io", "otp": "123456" })))
        .with_status(200)
        .with_body(r#"{"data":null}"#)
        .create_async()
        .await;
    let reset = server
        .mock("POST", "/auth/reset-password")
        .match_body(Matcher::Json(json!({
            "email": "eng@site.io",
            "otp": "123456",
            "password": "n3w-pass",
            "confirmPassword": "n3w-pass"
        })))
        .with_status(200)
        .with_body(r#"{"data":null,"message":"Password updated"}"#)
        .create_async()
        .await;

    let h = harness(&server.url());
    let mut flow = AuthFlow::new(h.dispatcher.clone());

    flow.start_reset().unwrap();
    assert_eq!(flow.step(), &AuthStep::ForgetPassword);

    let message = flow.request_otp("eng@site.io").await.unwrap();
    assert_eq!(message.as_deref(), Some("OTP sent"));
    assert_eq!(
        flow.step(),
        &AuthStep::VerifyOtp {
            email: "eng@site.io".into()
        }
    );

    flow.verify_otp(" 123456 ").await.unwrap();
    flow.reset_password("n3w-pass", "n3w-pass").await.unwrap();
    assert_eq!(flow.step(), &AuthStep::SignIn);

    forget.assert_async().await;
    verify.assert_async().await;
    reset.assert_async().await;
}

#[tokio::test]
async fn mismatched_confirmation_is_rejected_locally() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/forget-password")
        .with_status(200)
        .with_body(r#"{"data":null}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/verify-otp")
        .with_status(200)
        .with_body(r#"{"data":null}"#)
        .create_async()
        .await;
    let reset = server
        .mock("POST", "/auth/reset-password")
        .expect(0)
        .create_async()
        .await;

    let h = harness(&server.url());
    let mut flow = AuthFlow::new(h.dispatcher.clone());
    flow.start_reset().unwrap();
    flow.request_otp("eng@site.io").await.unwrap();
    flow.verify_otp("999999").await.unwrap();

    let err = flow.reset_password("one", "two").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(matches!(flow.step(), AuthStep::ResetPassword { .. }));
    reset.assert_async().await;
}

#[tokio::test]
async fn steps_out_of_order_are_rejected() {
    let h = harness("http://127.0.0.1:1");
    let mut flow = AuthFlow::new(h.dispatcher.clone());

    let err = flow.verify_otp("123456").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::InvalidStep {
            expected: "verify_otp",
            actual: "sign_in"
        }
    ));

    flow.start_reset().unwrap();
    let err = flow.login("a@b.c", "pw", false).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidStep { actual: "forget_password", .. }));

    let err = flow.request_otp("   ").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    flow.back_to_sign_in();
    assert_eq!(flow.step(), &AuthStep::SignIn);
    assert!(h.notifier.notifications().is_empty());
}
