//! Chains and pipelines assembled from the canned test handlers.

use baton::prelude::*;
use baton_test::{CallLog, Failing, Halting, OutcomeProbe, Raising, Recording, COMPLETE, ERROR};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Step {
    Advance,
    Fail,
    Raise,
    Halt,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => Just(Step::Advance),
        1 => Just(Step::Fail),
        1 => Just(Step::Raise),
        1 => Just(Step::Halt),
    ]
}

const NAMES: [&str; 8] = ["h0", "h1", "h2", "h3", "h4", "h5", "h6", "h7"];

/// Log a correct run of `steps` must leave behind.
fn expected_log(steps: &[Step]) -> Vec<String> {
    let mut expected = Vec::new();
    for (&name, step) in NAMES.iter().zip(steps) {
        expected.push(name.to_string());
        match step {
            Step::Advance => {}
            Step::Fail | Step::Raise => {
                expected.push(ERROR.to_string());
                return expected;
            }
            Step::Halt => return expected,
        }
    }
    expected.push(COMPLETE.to_string());
    expected
}

fn build_chain(steps: &[Step], log: &CallLog, probe: &OutcomeProbe<String>) -> Chain<(), String> {
    let mut chain = probe.chain();
    for (&name, step) in NAMES.iter().zip(steps) {
        match step {
            Step::Advance => chain.append(Recording::new(name, log)),
            Step::Fail => chain.append(Failing::new(name, log, format!("{name} failed"))),
            Step::Raise => chain.append(Raising::new(name, log, format!("{name} failed"))),
            Step::Halt => chain.append(Halting::new(name, log)),
        }
    }
    chain
}

fn build_pipeline(
    steps: &[Step],
    log: &CallLog,
    probe: &OutcomeProbe<String>,
) -> Pipeline<(), String> {
    let mut pipeline = probe.pipeline();
    for (&name, step) in NAMES.iter().zip(steps) {
        match step {
            Step::Advance => pipeline.append(Recording::new(name, log)),
            Step::Fail => pipeline.append(Failing::new(name, log, format!("{name} failed"))),
            Step::Raise => pipeline.append(Raising::new(name, log, format!("{name} failed"))),
            Step::Halt => pipeline.append(Halting::new(name, log)),
        }
    }
    pipeline
}

proptest! {
    #[test]
    fn prop_chain_matches_model(steps in prop::collection::vec(step(), 0..8)) {
        let log = CallLog::new();
        let probe = OutcomeProbe::with_log(&log);
        build_chain(&steps, &log, &probe).run(&mut ());

        prop_assert_eq!(log.entries(), expected_log(&steps));
        probe.outcome().assert_single_outcome();
    }

    #[test]
    fn prop_pipeline_matches_chain(steps in prop::collection::vec(step(), 0..8)) {
        let chain_log = CallLog::new();
        let chain_probe = OutcomeProbe::with_log(&chain_log);
        build_chain(&steps, &chain_log, &chain_probe).run(&mut ());

        let pipeline_log = CallLog::new();
        let pipeline_probe = OutcomeProbe::with_log(&pipeline_log);
        tokio_test::block_on(build_pipeline(&steps, &pipeline_log, &pipeline_probe).run(&mut ()));

        prop_assert_eq!(chain_log.entries(), pipeline_log.entries());
        prop_assert_eq!(chain_probe.outcome(), pipeline_probe.outcome());
    }
}

#[test]
fn test_shared_handler_in_two_chains() {
    let log = CallLog::new();
    let shared: Arc<dyn Handler<(), String>> = Arc::new(Recording::new("audit", &log));

    let probe = OutcomeProbe::<String>::with_log(&log);
    let mut first = probe.chain();
    first.append_shared(Arc::clone(&shared));
    let mut second = probe.chain();
    second.append_shared(shared);
    second.append(Raising::new("deny", &log, "denied".to_string()));

    first.run(&mut ());
    second.run(&mut ());

    log.assert_order(&["audit", COMPLETE, "audit", "deny", ERROR]);
    assert_eq!(probe.completions(), 1);
    assert_eq!(probe.error_count(), 1);
}

#[test]
fn test_closure_after_halting_never_runs() {
    let log = CallLog::new();
    let probe = OutcomeProbe::<String>::with_log(&log);
    let mut chain = probe.chain::<Vec<u8>>();
    chain.append_fn("push", |mut next: Next<'_, Vec<u8>, String>| {
        next.context_mut().push(1);
        next.run();
        Ok(())
    });
    chain.append(Halting::new("gate", &log));
    chain.append_fn("unreachable", |mut next: Next<'_, Vec<u8>, String>| {
        next.context_mut().push(2);
        next.run();
        Ok(())
    });

    let mut ctx = Vec::new();
    chain.run(&mut ctx);

    assert_eq!(ctx, vec![1]);
    log.assert_order(&["gate"]);
    probe.outcome().assert_halted();
}

#[tokio::test]
async fn test_pipeline_mixes_canned_and_async_closures() {
    let log = CallLog::new();
    let probe = OutcomeProbe::<String>::with_log(&log);
    let mut pipeline = probe.pipeline::<Exchange<String, usize>>();

    pipeline.append(Recording::new("first", &log));
    pipeline.append_fn("measure", |mut next: AsyncNext<'_, Exchange<String, usize>, String>| {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let len = next.context().request().len();
            next.context_mut().set_response(len);
            next.run().await;
            Ok(())
        })
    });
    pipeline.append(Recording::new("last", &log));

    let mut exchange = Exchange::new("hello".to_string());
    pipeline.run(&mut exchange).await;

    assert_eq!(exchange.response(), Some(&5));
    log.assert_order(&["first", "last", COMPLETE]);
    probe.outcome().assert_completed();
}
