//! Tests for the postback handler.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockMappingImportCommand, MockPostbackCommand};
use crate::domain::{Aim, PostbackRecord};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;

fn state_with(command: MockPostbackCommand) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(command),
        Arc::new(MockMappingImportCommand::new()),
    ))
}

fn accepting(expected: fn(&PostbackRequest) -> bool) -> MockPostbackCommand {
    let mut command = MockPostbackCommand::new();
    command
        .expect_record()
        .times(1)
        .withf(move |request| expected(request))
        .returning(|request| {
            Ok(PostbackRecord::new(
                "42",
                "abc",
                Aim::Deposit,
                request.source,
            ))
        });
    command
}

async fn send(
    command: MockPostbackCommand,
    request: actix_test::TestRequest,
) -> (StatusCode, String) {
    let app = actix_test::init_service(
        App::new()
            .app_data(state_with(command))
            .service(receive_postback),
    )
    .await;
    let res = actix_test::call_service(&app, request.to_request()).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
}

#[actix_web::test]
async fn get_passes_query_parameters() {
    let command = accepting(|request| {
        request.source.as_ref() == "acme"
            && request.parameters.get("uid") == Some("42")
            && request.parameters.get("goal") == Some("dep")
    });

    let (status, body) = send(
        command,
        actix_test::TestRequest::get().uri("/acme?uid=42&clk=abc&goal=dep"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[actix_web::test]
async fn post_merges_form_fields_after_query() {
    let command = accepting(|request| {
        request.parameters.get("uid") == Some("from-query")
            && request.parameters.get("clk") == Some("abc")
            && request.parameters.get("goal") == Some("reg")
    });

    let (status, _) = send(
        command,
        actix_test::TestRequest::post()
            .uri("/acme?uid=from-query")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("uid=from-form&clk=abc&goal=reg"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn non_form_bodies_are_ignored() {
    let command = accepting(|request| request.parameters.get("uid").is_none());

    let (status, _) = send(
        command,
        actix_test::TestRequest::post()
            .uri("/acme")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(r#"{"uid":"42"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn repeated_query_keys_keep_the_first_value() {
    let command = accepting(|request| request.parameters.get("uid") == Some("1"));

    let (status, _) = send(
        command,
        actix_test::TestRequest::get().uri("/acme?uid=1&uid=2"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[case(
    Error::invalid_request("Not enough parameters: goal"),
    StatusCode::BAD_REQUEST,
    "Not enough parameters: goal"
)]
#[case(Error::not_found("no mapping for source acme"), StatusCode::NOT_FOUND, "")]
#[case(Error::internal("postback insert failed"), StatusCode::INTERNAL_SERVER_ERROR, "")]
#[actix_web::test]
async fn domain_errors_map_to_responses(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] body: &str,
) {
    let mut command = MockPostbackCommand::new();
    command
        .expect_record()
        .times(1)
        .return_once(move |_| Err(error));

    let (actual_status, actual_body) =
        send(command, actix_test::TestRequest::get().uri("/acme?uid=42")).await;

    assert_eq!(actual_status, status);
    assert_eq!(actual_body, body);
}
