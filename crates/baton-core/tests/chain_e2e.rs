//! End-to-end chain tests.
//!
//! These exercise whole runs through the public API: ordering, context
//! identity, short-circuiting on failure, raise/fail equivalence and
//! repeated or concurrent runs of one chain.

use baton_core::{Chain, Handler, Next};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default, PartialEq)]
struct User {
    name: String,
    age: Option<u32>,
}

#[derive(Debug, Default)]
struct Ctx {
    user: Option<User>,
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Handler(&'static str),
    Completed(Option<User>),
    Failed(String),
}

type Events = Arc<Mutex<Vec<Event>>>;

/// Builds a chain whose terminal callbacks record into `events`.
fn recording_chain(events: &Events) -> Chain<Ctx, String> {
    let (complete, error) = (events.clone(), events.clone());
    Chain::new(
        move |ctx: &mut Ctx| {
            complete
                .lock()
                .unwrap()
                .push(Event::Completed(ctx.user.clone()));
        },
        move |err: String, _ctx: &mut Ctx| error.lock().unwrap().push(Event::Failed(err)),
    )
}

fn log(events: &Events, name: &'static str) {
    events.lock().unwrap().push(Event::Handler(name));
}

// =============================================================================
// Example scenarios
// =============================================================================

#[test]
fn test_user_is_enriched_across_handlers() {
    let events: Events = Arc::default();
    let mut chain = recording_chain(&events);

    let e = events.clone();
    chain.append_fn("h1", move |mut next| {
        log(&e, "h1");
        next.context_mut().user = Some(User {
            name: "kim".to_string(),
            age: None,
        });
        next.run();
        Ok(())
    });

    let e = events.clone();
    chain.append_fn("h2", move |mut next| {
        log(&e, "h2");
        let user = next.context_mut().user.as_mut().ok_or("no user")?;
        assert_eq!(user.name, "kim");
        user.age = Some(2);
        next.run();
        Ok(())
    });

    let e = events.clone();
    chain.append_fn("h3", move |next| {
        log(&e, "h3");
        let user = next.context().user.clone().unwrap_or_default();
        assert_eq!(user.name, "kim");
        assert_eq!(user.age, Some(2));
        next.run();
        Ok(())
    });

    chain.run(&mut Ctx::default());

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            Event::Handler("h1"),
            Event::Handler("h2"),
            Event::Handler("h3"),
            Event::Completed(Some(User {
                name: "kim".to_string(),
                age: Some(2),
            })),
        ]
    );
}

#[test]
fn test_raised_error_reaches_error_handler_once() {
    let events: Events = Arc::default();
    let mut chain = recording_chain(&events);

    let e = events.clone();
    chain.append_fn("h1", move |next| {
        log(&e, "h1");
        next.run();
        Ok(())
    });

    let e = events.clone();
    chain.append_fn("h2", move |_next| {
        log(&e, "h2");
        Err("boom".to_string())
    });

    chain.run(&mut Ctx::default());

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            Event::Handler("h1"),
            Event::Handler("h2"),
            Event::Failed("boom".to_string()),
        ]
    );
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_every_step_sees_the_callers_context() {
    let addresses = Arc::new(Mutex::new(Vec::new()));

    let sink = addresses.clone();
    let mut chain: Chain<Ctx, String> = Chain::new(
        move |ctx: &mut Ctx| sink.lock().unwrap().push((ctx as *const Ctx) as usize),
        |_err: String, _ctx: &mut Ctx| {},
    );
    for _ in 0..3 {
        let sink = addresses.clone();
        chain.append_fn("address", move |next| {
            sink.lock()
                .unwrap()
                .push((next.context() as *const Ctx) as usize);
            next.run();
            Ok(())
        });
    }

    let mut ctx = Ctx::default();
    let expected = (&ctx as *const Ctx) as usize;
    chain.run(&mut ctx);

    let addresses = addresses.lock().unwrap();
    assert_eq!(addresses.len(), 4);
    assert!(addresses.iter().all(|&address| address == expected));
}

#[test]
fn test_explicit_fail_matches_raise() {
    fn observe(fail_explicitly: bool) -> Vec<Event> {
        let events: Events = Arc::default();
        let mut chain = recording_chain(&events);

        let e = events.clone();
        chain.append_fn("reject", move |next| {
            log(&e, "reject");
            if fail_explicitly {
                next.fail("denied".to_string());
                Ok(())
            } else {
                Err("denied".to_string())
            }
        });
        let e = events.clone();
        chain.append_fn("after", move |next| {
            log(&e, "after");
            next.run();
            Ok(())
        });

        chain.run(&mut Ctx::default());
        let observed = events.lock().unwrap().clone();
        observed
    }

    assert_eq!(observe(true), observe(false));
    assert_eq!(
        observe(true),
        vec![Event::Handler("reject"), Event::Failed("denied".to_string())]
    );
}

#[test]
fn test_post_processing_sees_downstream_mutations() {
    let mut chain: Chain<Vec<&'static str>, ()> = Chain::new(
        |trail: &mut Vec<&'static str>| trail.push("complete"),
        |_err: (), _trail: &mut Vec<&'static str>| {},
    );
    chain.append_fn("outer", |next| {
        let trail = next.run();
        assert_eq!(trail.as_slice(), ["inner", "complete"]);
        trail.push("outer-after");
        Ok(())
    });
    chain.append_fn("inner", |mut next| {
        next.context_mut().push("inner");
        next.run();
        Ok(())
    });

    let mut trail = Vec::new();
    chain.run(&mut trail);

    assert_eq!(trail, vec!["inner", "complete", "outer-after"]);
}

#[test]
fn test_deferred_continuation_resumes_in_place() {
    let mut chain: Chain<Vec<String>, ()> = Chain::new(
        |trail: &mut Vec<String>| trail.push("complete".to_string()),
        |_err: (), _trail: &mut Vec<String>| {},
    );
    chain.append_fn("deferred", |mut next| {
        next.context_mut().push("before".to_string());
        let resume = move || next.run();
        let later = "computed later".to_string();
        resume().push(later);
        Ok(())
    });
    chain.append_fn("second", |mut next| {
        let position = next.position();
        next.context_mut().push(format!("second@{position}"));
        next.run();
        Ok(())
    });

    let mut trail = Vec::new();
    chain.run(&mut trail);

    assert_eq!(trail, vec!["before", "second@1", "complete", "computed later"]);
}

#[test]
fn test_dropped_continuation_halts() {
    let events: Events = Arc::default();
    let mut chain = recording_chain(&events);

    let e = events.clone();
    chain.append_fn("gate", move |next| {
        log(&e, "gate");
        drop(next);
        Ok(())
    });
    let e = events.clone();
    chain.append_fn("behind-gate", move |next| {
        log(&e, "behind-gate");
        next.run();
        Ok(())
    });

    chain.run(&mut Ctx::default());

    assert_eq!(*events.lock().unwrap(), vec![Event::Handler("gate")]);
}

#[test]
fn test_independent_runs() {
    let events: Events = Arc::default();
    let mut chain = recording_chain(&events);
    chain.append_fn("count", |mut next| {
        let ctx = next.context_mut();
        let age = ctx.user.get_or_insert_with(User::default).age.get_or_insert(0);
        *age += 1;
        next.run();
        Ok(())
    });

    chain.run(&mut Ctx::default());
    chain.run(&mut Ctx::default());

    let once = Event::Completed(Some(User {
        name: String::new(),
        age: Some(1),
    }));
    assert_eq!(*events.lock().unwrap(), vec![once.clone(), once]);
}

#[test]
fn test_concurrent_runs_share_one_chain() {
    struct Tag;

    impl Handler<Vec<usize>, ()> for Tag {
        fn name(&self) -> &'static str {
            "tag"
        }

        fn handle(&self, mut next: Next<'_, Vec<usize>, ()>) -> Result<(), ()> {
            let position = next.position();
            next.context_mut().push(position);
            next.run();
            Ok(())
        }
    }

    let chain = Chain::<Vec<usize>, ()>::builder()
        .name("concurrent")
        .handler(Tag)
        .handler(Tag)
        .handler(Tag)
        .on_complete(|trail: &mut Vec<usize>| trail.push(usize::MAX))
        .on_error(|_err: (), _trail: &mut Vec<usize>| {})
        .build()
        .unwrap();

    let trails: Vec<Vec<usize>> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let mut trail = Vec::new();
                    chain.run(&mut trail);
                    trail
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    for trail in trails {
        assert_eq!(trail, vec![0, 1, 2, usize::MAX]);
    }
}

proptest! {
    #[test]
    fn prop_handlers_run_in_order_until_failure(
        len in 0usize..12,
        fail_at in proptest::option::of(0usize..12),
    ) {
        let outcome = Arc::new(Mutex::new(Vec::new()));
        let (complete, error) = (outcome.clone(), outcome.clone());
        let mut chain: Chain<Vec<usize>, usize> = Chain::new(
            move |_trail: &mut Vec<usize>| complete.lock().unwrap().push("complete"),
            move |_err: usize, _trail: &mut Vec<usize>| error.lock().unwrap().push("error"),
        );
        for index in 0..len {
            chain.append_fn("step", move |mut next| {
                next.context_mut().push(index);
                if fail_at == Some(index) {
                    return Err(index);
                }
                next.run();
                Ok(())
            });
        }

        let mut trail = Vec::new();
        chain.run(&mut trail);

        let failing = fail_at.filter(|&at| at < len);
        let ran = failing.map_or(len, |at| at + 1);
        prop_assert_eq!(trail, (0..ran).collect::<Vec<_>>());

        let expected = if failing.is_some() { "error" } else { "complete" };
        prop_assert_eq!(outcome.lock().unwrap().clone(), vec![expected]);
    }
}
