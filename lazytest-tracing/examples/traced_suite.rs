//! Logs a small test run through `tracing`.
//!
//! Run with `LAZYTEST_TRACING=ascii` to switch the failure layout in the
//! logged events.

use lazytest::{
    prelude::*,
    runner::{Runner, RunnerConfig, Suite},
};
use lazytest_tracing::{LazytestLayer, SpanExt, TracingReporter};
use tracing::instrument;
use tracing_subscriber::{Registry, layer::SubscriberExt};

#[derive(Debug, thiserror::Error)]
#[error("quota of {limit} exceeded by {excess}")]
struct QuotaExceeded {
    limit: u32,
    excess: u32,
}

#[instrument(skip(used))]
fn check_quota(user_id: u64, used: u32) -> Result<(), AssertionFailed<QuotaExceeded>> {
    let limit = 100;
    if used > limit {
        let failure = failure!(QuotaExceeded {
            limit,
            excess: used - limit,
        });
        return Err(failure.attach_span());
    }
    Ok(())
}

#[instrument]
fn totals() -> Result<(), AssertionFailed> {
    expect([1, 2, 3].iter().sum::<i32>())
        .because("the ledger must balance")
        .to_equal(7)
        .attach_span()
}

fn main() {
    let subscriber = Registry::default()
        .with(LazytestLayer)
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber).expect("failed to set default subscriber");

    let mut suite = Suite::new();
    suite
        .case("quota", || {
            check_quota(42, 130).map_err(AssertionFailed::into_message)
        })
        .and_then(|suite| suite.case("totals", totals))
        .expect("case names are unique");

    let summary =
        Runner::new(RunnerConfig::from_env()).run_reporting(&suite, &mut TracingReporter::new());
    println!("{summary}");
}
