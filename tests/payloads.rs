//! Arbitrary values as failure details.

use lazytest::{handlers, prelude::*};
use serde_json::json;

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("status {status} from {url}")]
struct HttpStatus {
    url: &'static str,
    status: u16,
}

#[derive(Debug, PartialEq, derive_more::Display, derive_more::Error)]
enum Drift {
    #[display("clock drifted by {_0}ms")]
    Clock(#[error(not(source))] u64),
    #[display("no reference clock")]
    NoReference,
}

#[test]
fn json_value_is_returned_unchanged() {
    let body = json!({ "id": 7, "tags": ["a", "b"], "owner": null });
    let failure = failure!(body.clone());
    assert_eq!(failure.detail(), Some(&body));
    assert_eq!(failure.detail().unwrap()["tags"][1], "b");
    assert!(format!("{failure:#}").contains(r#""owner":null"#));
}

#[test]
fn json_null_detail_is_not_an_absent_detail() {
    let null = AssertionFailed::with_detail(serde_json::Value::Null);
    let absent: AssertionFailed<serde_json::Value> = AssertionFailed::new();
    assert_eq!(null.detail(), Some(&serde_json::Value::Null));
    assert!(absent.detail().is_none());
}

#[test]
fn error_types_render_with_display() {
    let failure = failure!(HttpStatus {
        url: "/health",
        status: 503,
    });
    assert_eq!(format!("{failure:#}"), "assertion failed: status 503 from /health");
    assert_eq!(failure.detail().map(|error| error.status), Some(503));

    let failure = failure!(Drift::Clock(40));
    assert_eq!(format!("{failure:#}"), "assertion failed: clock drifted by 40ms");
    assert!(format!("{failure:#?}").ends_with("Clock(40)"));
}

#[test]
fn custom_details_propagate_with_question_mark() {
    fn synchronize(drift: Option<u64>) -> Result<(), AssertionFailed<Drift>> {
        match drift {
            None => fail!(Drift::NoReference),
            Some(ms) if ms > 10 => fail!(Drift::Clock(ms)),
            Some(_) => Ok(()),
        }
    }

    fn run() -> Result<(), AssertionFailed<Drift>> {
        synchronize(Some(3))?;
        synchronize(None)?;
        Ok(())
    }

    assert_eq!(run().unwrap_err().detail(), Some(&Drift::NoReference));
}

#[test]
fn detail_handler_can_be_chosen_explicitly() {
    let failure: AssertionFailed<HttpStatus> =
        AssertionFailed::with_detail_custom::<handlers::Debug>(HttpStatus {
            url: "/",
            status: 200,
        });
    assert_eq!(
        format!("{failure:#}"),
        r#"assertion failed: HttpStatus { url: "/", status: 200 }"#
    );
}

#[test]
fn custom_detail_can_join_the_default_type() {
    let failure = failure!(Drift::Clock(12)).note("node b").into_message();
    let result: lazytest::Result<()> = Err(failure);
    let failure = result.unwrap_err();
    assert_eq!(
        failure.detail().unwrap().to_string(),
        "clock drifted by 12ms"
    );
    assert_eq!(failure.notes(), ["node b"]);
}
