//! End-to-end tests for the async pipeline.

use baton_core::{AsyncNext, Exchange, Pipeline};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct User {
    name: String,
    age: Option<u32>,
}

type Request = Exchange<&'static str, u16>;

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Completed(Option<u16>),
    Failed(String),
}

fn recording_pipeline(outcomes: &Arc<Mutex<Vec<Outcome>>>) -> Pipeline<Request, String> {
    let (complete, error) = (outcomes.clone(), outcomes.clone());
    Pipeline::new(
        move |exchange: &mut Request| {
            complete
                .lock()
                .unwrap()
                .push(Outcome::Completed(exchange.response().copied()));
        },
        move |err: String, _exchange: &mut Request| {
            error.lock().unwrap().push(Outcome::Failed(err));
        },
    )
}

#[tokio::test(start_paused = true)]
async fn test_extensions_flow_through_awaiting_handlers() {
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let mut pipeline = recording_pipeline(&outcomes);

    pipeline.append_fn("authenticate", |mut next: AsyncNext<'_, Request, String>| {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            next.context_mut().set_extension(User {
                name: "kim".to_string(),
                age: None,
            });
            next.run().await;
            Ok(())
        })
    });
    pipeline.append_fn("profile", |mut next: AsyncNext<'_, Request, String>| {
        Box::pin(async move {
            let user = next
                .context_mut()
                .get_extension_mut::<User>()
                .ok_or_else(|| "unauthenticated".to_string())?;
            user.age = Some(2);
            next.run().await;
            Ok(())
        })
    });
    pipeline.append_fn("respond", |mut next: AsyncNext<'_, Request, String>| {
        Box::pin(async move {
            let exchange = next.context_mut();
            let user = exchange.get_extension::<User>().cloned();
            assert_eq!(
                user,
                Some(User {
                    name: "kim".to_string(),
                    age: Some(2),
                })
            );
            exchange.set_response(200);
            next.run().await;
            Ok(())
        })
    });

    let mut exchange = Exchange::new("GET /profile");
    pipeline.run(&mut exchange).await;

    assert_eq!(*outcomes.lock().unwrap(), vec![Outcome::Completed(Some(200))]);
    assert_eq!(exchange.into_parts(), ("GET /profile", Some(200)));
}

#[tokio::test]
async fn test_failure_after_await_skips_remaining_handlers() {
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let mut pipeline = recording_pipeline(&outcomes);

    pipeline.append_fn("pass", |next: AsyncNext<'_, Request, String>| {
        Box::pin(async move {
            next.run().await;
            Ok(())
        })
    });
    pipeline.append_fn("boom", |next: AsyncNext<'_, Request, String>| {
        Box::pin(async move {
            tokio::task::yield_now().await;
            next.fail("boom".to_string());
            Ok(())
        })
    });
    let reached = Arc::new(AtomicBool::new(false));
    let flag = reached.clone();
    pipeline.append_fn("unreachable", move |_next: AsyncNext<'_, Request, String>| {
        flag.store(true, Ordering::SeqCst);
        Box::pin(async move { Ok(()) })
    });

    pipeline.run(&mut Exchange::new("POST /")).await;

    assert!(!reached.load(Ordering::SeqCst));

    assert_eq!(
        *outcomes.lock().unwrap(),
        vec![Outcome::Failed("boom".to_string())]
    );
}

#[tokio::test]
async fn test_pipeline_runs_are_independent() {
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let mut pipeline = recording_pipeline(&outcomes);

    pipeline.append_fn("count", |mut next: AsyncNext<'_, Request, String>| {
        Box::pin(async move {
            let exchange = next.context_mut();
            let seen = exchange.response().copied().unwrap_or(0);
            exchange.set_response(seen + 1);
            next.run().await;
            Ok(())
        })
    });

    pipeline.run(&mut Exchange::new("a")).await;
    pipeline.run(&mut Exchange::new("b")).await;

    assert_eq!(
        *outcomes.lock().unwrap(),
        vec![Outcome::Completed(Some(1)), Outcome::Completed(Some(1))]
    );
}
