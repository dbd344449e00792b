//! Dispatch behavior of routers: matching, pipelines, nesting and failures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::StatusCode;
use regex::Regex;

use switchyard::http::error_page::ErrorPage;
use switchyard::http::ResponseError;
use switchyard::routing::handler::{error_fn, from_fn, no_content, raise, status, sync, sync_error, unset};
use switchyard::routing::{RouteShape, Verb};
use switchyard::{Failure, PathFilter, Reply, Router, Routes};

mod common;
use common::{request, statuses};

fn code(n: u16) -> StatusCode {
    StatusCode::from_u16(n).unwrap()
}

fn pattern(re: &str) -> PathFilter {
    PathFilter::from(Regex::new(re).unwrap())
}

#[tokio::test]
async fn test_no_handler_is_501() {
    let r = Router::new();
    assert_eq!(statuses(&r, vec![request("GET", "urn:example")]).await, vec![501]);
}

#[tokio::test]
async fn test_paths_respond_with_handler_status() {
    let r = Router::new();
    r.get("example/foo", status(code(200)))
        .post("example/foo", status(code(201)))
        .put("example/foo", no_content())
        .patch("example/foo", unset())
        .route("TEST", "example/foo", status(code(404)))
        .use_middleware(
            pattern("^example/bar$"),
            sync(|_, _, _| Ok(Reply::Response(common::response(599, Body::empty())))),
        );

    let responses = statuses(
        &r,
        vec![
            request("GET", "urn:example/foo"),
            request("POST", "urn:example/foo"),
            request("PUT", "urn:example/foo"),
            request("PATCH", "urn:example/foo"),
            request("TEST", "urn:example/foo"),
            request("XXX", "urn:example/foo"),
            request("GET", "urn:example/bar"),
            request("XXX", "urn:example/bar"),
            request("GET", "urn:example/baz"),
        ],
    )
    .await;

    assert_eq!(responses, vec![200, 201, 204, 501, 404, 501, 599, 599, 501]);
}

#[tokio::test]
async fn test_handler_called_for_configured_method_only() {
    let r = Router::new();
    r.get(PathFilter::Any, status(code(200)))
        .get("example/foo", status(code(201)))
        .get("example/bar", status(code(400)))
        .get("example/bar", status(code(202)))
        .get(pattern("^example/baz$"), status(code(203)));

    let responses = statuses(
        &r,
        vec![
            request("GET", "urn:example/"),
            request("GET", "urn:example/foo"),
            request("GET", "urn:example/bar"),
            request("GET", "urn:example/baz"),
            request("POST", "urn:example/foo"),
        ],
    )
    .await;

    assert_eq!(responses, vec![200, 201, 202, 203, 501]);
}

#[tokio::test]
async fn test_last_middleware_wins() {
    let r = Router::new();
    r.get(PathFilter::Any, status(code(999)))
        .get("example/foo", status(code(201)))
        .get("example/bar", status(code(400)))
        .get("example/bar", status(code(202)))
        .get(pattern("^example/baz$"), status(code(203)))
        .use_middleware(PathFilter::Any, status(code(299)));

    let responses = statuses(
        &r,
        vec![
            request("GET", "urn:example/"),
            request("GET", "urn:example/foo"),
            request("GET", "urn:example/bar"),
            request("GET", "urn:example/baz"),
            request("POST", "urn:example/foo"),
        ],
    )
    .await;

    assert_eq!(responses, vec![299; 5]);
}

#[tokio::test]
async fn test_nested_routers() {
    let r = Router::new();
    let child = Router::new();
    let grandchild = Router::new();

    r.get(PathFilter::Any, status(code(200)))
        .get(pattern("^example/"), child.clone());
    child
        .get("example/bar", status(code(201)))
        .get("example/baz", grandchild.clone());
    grandchild.register(RouteShape::resolve(None, None, Some(status(code(202)))).unwrap());

    let responses = statuses(
        &r,
        vec![
            request("GET", "urn:example/"),
            request("GET", "urn:example/foo"),
            request("GET", "urn:example/bar"),
            request("GET", "urn:example/baz"),
            request("POST", "urn:example/foo"),
        ],
    )
    .await;

    assert_eq!(responses, vec![501, 501, 201, 202, 501]);
}

#[tokio::test]
async fn test_nested_no_match_lets_parent_continue() {
    let r = Router::new();
    let child = Router::new();
    child.get("elsewhere", status(code(201)));

    r.use_middleware(PathFilter::Any, child)
        .get("example/foo", sync(|_, prior, _| {
            assert_eq!(prior.status(), StatusCode::NOT_IMPLEMENTED);
            Ok(Reply::Status(StatusCode::OK))
        }));

    assert_eq!(statuses(&r, vec![request("GET", "urn:example/foo")]).await, vec![200]);
}

#[tokio::test]
async fn test_different_routers() {
    let r1 = Router::new();
    let r2 = Router::new();
    let r3 = Router::new();
    let r4 = Router::new();

    r1.register(RouteShape::PathHandler("example/bar".into(), status(code(444))));
    r2.register(RouteShape::Handler(status(code(403))));
    r3.use_middleware("example/bar", status(code(432)));
    r4.use_middleware(
        PathFilter::Any,
        sync(|_, _, _| Ok(Reply::Response(common::response(234, Body::empty())))),
    );

    let mut responses = Vec::new();
    for r in [&r1, &r2, &r3, &r4] {
        let batch = statuses(
            r,
            vec![
                request("GET", "urn:example/bar"),
                request("PUT", "urn:example/bar"),
                request("GET", "urn:example/foo"),
            ],
        )
        .await;
        responses.extend(batch);
    }

    assert_eq!(
        responses,
        vec![444, 444, 501, 403, 403, 403, 432, 432, 501, 234, 234, 234]
    );
}

#[tokio::test]
async fn test_response_formats() {
    let r = Router::new();
    r.use_middleware(PathFilter::Any, status(code(222)))
        .get("example/foo", raise(code(201)))
        .get(
            "example/bar",
            sync(|_, _, _| Err(Failure::Response(common::response(202, Body::empty())))),
        )
        .get("example/baz", sync(|_, _, _| Err(Failure::error("opaque failure"))))
        .use_middleware(PathFilter::Any, status(code(200)));

    let responses = statuses(
        &r,
        vec![
            request("GET", "urn:example/"),
            request("GET", "urn:example/foo"),
            request("GET", "urn:example/bar"),
            request("GET", "urn:example/baz"),
            request("POST", "urn:example/foo"),
            request("POST", "urn:example/bar"),
        ],
    )
    .await;

    assert_eq!(responses, vec![200, 201, 202, 500, 200, 200]);
}

#[tokio::test]
async fn test_concrete_verb_scenario() {
    let r = Router::new();
    r.get("/foo", status(code(200)))
        .post("/foo", status(code(201)))
        .put("/foo", no_content())
        .patch("/foo", unset());

    let responses = statuses(
        &r,
        ["GET", "POST", "PUT", "PATCH", "DELETE"]
            .into_iter()
            .map(|m| request(m, "http://example.com/foo"))
            .collect(),
    )
    .await;

    assert_eq!(responses, vec![200, 201, 204, 501, 501]);
}

#[tokio::test]
async fn test_every_verb_shortcut() {
    let r = Router::new();
    for verb in Verb::ALL {
        r.on(*verb, "/dav", status(code(200)));
    }
    r.move_("/moved", status(code(201)));

    let requests = Verb::ALL
        .iter()
        .map(|v| request(v.as_str(), "http://example.com/dav"))
        .chain([
            request("BREW", "http://example.com/dav"),
            request("MOVE", "http://example.com/moved"),
        ])
        .collect();

    let mut expected = vec![200; Verb::ALL.len()];
    expected.extend([501, 201]);
    assert_eq!(statuses(&r, requests).await, expected);
}

#[tokio::test]
async fn test_registration_order_is_execution_order() {
    let r = Router::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let first = calls.clone();
    let second = calls.clone();
    r.use_middleware(
        PathFilter::Any,
        from_fn(move |_req, prior: Reply, _url| {
            let calls = first.clone();
            async move {
                assert!(prior.is_unset());
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                assert_eq!(calls.fetch_add(1, Ordering::SeqCst), 0);
                Ok::<_, Failure>(Reply::Status(StatusCode::ACCEPTED))
            }
        }),
    )
    .use_middleware(
        PathFilter::Any,
        sync(move |_, prior, _| {
            assert_eq!(second.fetch_add(1, Ordering::SeqCst), 1);
            assert_eq!(prior.status(), StatusCode::ACCEPTED);
            Ok(prior)
        }),
    );

    assert_eq!(statuses(&r, vec![request("GET", "urn:x")]).await, vec![202]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_raised_response_short_circuits() {
    let r = Router::new();
    let later = Arc::new(AtomicUsize::new(0));
    let counter = later.clone();

    r.use_middleware(
        PathFilter::Any,
        sync(|_, _, _| Err(Failure::Response(common::response(203, "early")))),
    )
    .use_middleware(
        PathFilter::Any,
        sync(move |_, prior, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(prior)
        }),
    );

    let response = r.dispatch(request("GET", "urn:x")).await.unwrap();
    assert_eq!(response.status().as_u16(), 203);
    assert_eq!(common::text(response).await, "early");
    assert_eq!(later.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concrete_response_body_round_trip() {
    let r = Router::new();
    r.get("/x", sync(|_, _, _| Ok(Reply::Response(common::response(200, "X")))));

    let response = r.dispatch(request("GET", "http://h/x")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::text(response).await, "X");
}

#[tokio::test]
async fn test_error_pipeline_resolves_raised_406() {
    let r = Router::new();
    r.use_middleware("/eh/406", raise(code(406)))
        .use_error(
            "/eh/406",
            sync_error(|failure, _, _, _| {
                assert_eq!(failure.status(), Some(StatusCode::NOT_ACCEPTABLE));
                Ok(Reply::Status(StatusCode::IM_A_TEAPOT))
            }),
        );

    assert_eq!(statuses(&r, vec![request("GET", "http://h/eh/406")]).await, vec![418]);
}

#[tokio::test]
async fn test_error_page_renders_raised_status() {
    let r = Router::new();
    r.use_middleware("/eh/406", raise(code(406)))
        .use_error("/eh/406", ErrorPage);

    let response = r.dispatch(request("GET", "http://h/eh/406")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert!(common::text(response).await.to_lowercase().starts_with("<!doctype html>"));
}

#[tokio::test]
async fn test_raised_redirect_survives_error_page() {
    let r = Router::new();
    r.get(
        "/old",
        sync(|_, _, _| {
            let mut response = common::response(302, Body::empty());
            response
                .headers_mut()
                .insert("location", "/new".parse().unwrap());
            Err(Failure::Response(response))
        }),
    )
    .use_error(PathFilter::Any, ErrorPage);

    let response = r.dispatch(request("GET", "http://h/old")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()["location"], "/new");
    assert!(!response.headers().contains_key("content-security-policy"));
    assert_eq!(common::text(response).await, "");
}

#[tokio::test]
async fn test_error_pipeline_threads_accumulator() {
    let r = Router::new();
    r.get("/a", raise(code(406)))
        .use_error(PathFilter::Any, sync_error(|_, _, _, _| Ok(Reply::Status(StatusCode::IM_A_TEAPOT))))
        .use_error(
            PathFilter::Any,
            sync_error(|failure, _, prior, _| {
                assert_eq!(failure.status(), Some(StatusCode::NOT_ACCEPTABLE));
                assert_eq!(prior.status(), StatusCode::IM_A_TEAPOT);
                Ok(Reply::NoContent)
            }),
        );

    assert_eq!(statuses(&r, vec![request("GET", "http://h/a")]).await, vec![204]);
}

#[tokio::test]
async fn test_unhandled_failures_are_guarded() {
    let r = Router::new();
    r.get("/status", raise(code(406)))
        .get("/error", sync(|_, _, _| Err(Failure::error("opaque"))))
        .get("/typed", sync(|_, _, _| Err(ResponseError::new(StatusCode::CONFLICT).into())));

    let responses = statuses(
        &r,
        vec![
            request("GET", "http://h/status"),
            request("GET", "http://h/error"),
            request("GET", "http://h/typed"),
        ],
    )
    .await;

    assert_eq!(responses, vec![406, 500, 500]);
}

#[tokio::test]
async fn test_error_handler_for_other_path_does_not_match() {
    let r = Router::unguarded();
    r.get("/a", raise(code(406)))
        .use_error("/b", sync_error(|_, _, _, _| Ok(Reply::Status(StatusCode::OK))));

    let failure = r.dispatch(request("GET", "http://h/a")).await.unwrap_err();
    assert!(matches!(failure, Failure::Status(s) if s == StatusCode::NOT_ACCEPTABLE));
}

#[tokio::test]
async fn test_failing_error_handler_keeps_original() {
    let r = Router::unguarded();
    r.get("/a", raise(code(406)))
        .use_error(
            PathFilter::Any,
            error_fn(|_failure, _req, _prior, _url| async { Err::<Reply, _>(Failure::error("secondary")) }),
        )
        .use_error(PathFilter::Any, sync_error(|_, _, _, _| Ok(Reply::Status(StatusCode::OK))));

    let failure = r.dispatch(request("GET", "http://h/a")).await.unwrap_err();
    assert_eq!(failure.status(), Some(StatusCode::NOT_ACCEPTABLE));
}

#[tokio::test]
async fn test_unguarded_rethrows_opaque_error_verbatim() {
    let r = Router::unguarded();
    r.get("/a", sync(|_, _, _| Err(Failure::error("opaque failure"))));

    let failure = r.dispatch(request("GET", "http://h/a")).await.unwrap_err();
    assert!(matches!(failure, Failure::Error(ref e) if e.to_string() == "opaque failure"));
}

#[tokio::test]
async fn test_error_verb_shortcut_filters_method() {
    let r = Router::new();
    r.use_middleware("/a", raise(code(409)))
        .post_error("/a", sync_error(|_, _, _, _| Ok(Reply::NoContent)));

    let responses = statuses(
        &r,
        vec![request("POST", "http://h/a"), request("GET", "http://h/a")],
    )
    .await;
    assert_eq!(responses, vec![204, 409]);
}

#[tokio::test]
async fn test_registration_during_dispatch_is_not_observed() {
    let r = Router::new();
    let target = r.clone();
    let registered = Arc::new(AtomicUsize::new(0));
    let once = registered.clone();

    r.get(
        "/grow",
        sync(move |_, _, _| {
            if once.fetch_add(1, Ordering::SeqCst) == 0 {
                target.get("/grow", status(StatusCode::CREATED));
            }
            Ok(Reply::Status(StatusCode::OK))
        }),
    );

    assert_eq!(statuses(&r, vec![request("GET", "http://h/grow")]).await, vec![200]);
    assert_eq!(statuses(&r, vec![request("GET", "http://h/grow")]).await, vec![201]);
}
