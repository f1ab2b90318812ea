//! # Submission Flows
//!
//! The submission orchestrator observed from outside: each submit
//! dispatches its external effect, races the completion pair, and lands
//! a terminal action in the store. Flows cover payload delivery, server
//! error distribution, caller callbacks, and resubmission.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{attach, TestHarness};
    use formwork_actions::{
        CompletionRoute, ExternalAction, FormAction, SubmitCallback, SubmitMeta, SubmitPayload,
    };
    use formwork_state::selectors;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn submit(id: &str, effect: &str, meta: SubmitMeta) -> FormAction {
        FormAction::Submit(SubmitPayload {
            id: id.to_string(),
            action: ExternalAction::with_payload(effect, json!({ "form": id })),
            meta,
        })
    }

    fn routed(ok: &str, err: &str) -> SubmitMeta {
        SubmitMeta::routed(CompletionRoute::new(ok, err))
    }

    #[tokio::test]
    async fn test_success_delivers_payload_to_callback() {
        let mut h = TestHarness::start();

        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let meta = routed("API_OK", "API_ERR").on_success(SubmitCallback::new(move |payload| {
            if let Ok(mut slot) = sink.lock() {
                *slot = Some(payload.clone());
            }
        }));

        h.dispatch(attach("signup", "email", None)).await;
        h.dispatch(FormAction::change("signup", "email", "a@b.c")).await;
        h.dispatch(submit("signup", "API_SUBMIT", meta)).await;

        // The effect carries the caller's payload verbatim
        let effect = h.expect_effect("API_SUBMIT").await;
        assert_eq!(effect.payload["form"], "signup");

        h.complete("API_OK", json!({ "id": 42 })).await;
        let state = h.settled(|s| !selectors::form_is_submitting(s, "signup")).await;
        assert!(selectors::form_level_errors(&state, "signup").is_empty());

        // The callback fires concurrently with the store applying the
        // terminal action, so poll rather than watch state
        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while seen.lock().map(|s| s.is_none()).unwrap_or(true) {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("success callback never invoked");
        let payload = seen.lock().expect("callback lock").clone().expect("payload recorded");
        assert_eq!(payload["id"], 42);

        h.finish().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_failure_distributes_server_errors_and_fires_callback() {
        let mut h = TestHarness::start();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let meta = routed("API_OK", "API_ERR").on_failure(SubmitCallback::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        h.dispatch(attach("signup", "email", None)).await;
        h.dispatch(attach("signup", "password", None)).await;
        h.dispatch(submit("signup", "API_SUBMIT", meta)).await;
        h.expect_effect("API_SUBMIT").await;

        h.complete(
            "API_ERR",
            json!({ "error": { "errors": { "email": ["taken"], "form": ["rejected"] } } }),
        )
        .await;

        let state = h
            .settled(|s| selectors::form_level_errors(s, "signup").contains("rejected"))
            .await;
        assert!(!selectors::form_is_submitting(&state, "signup"));
        assert!(selectors::field_server_errors(&state, "signup", "email").contains("taken"));
        assert!(selectors::field_server_errors(&state, "signup", "password").is_empty());

        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while calls.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("failure callback never invoked");

        h.finish().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_resubmit_clears_previous_server_errors() {
        let mut h = TestHarness::start();

        h.dispatch(attach("signup", "email", None)).await;
        h.dispatch(submit("signup", "API_SUBMIT", routed("API_OK", "API_ERR"))).await;
        h.expect_effect("API_SUBMIT").await;
        h.complete(
            "API_ERR",
            json!({ "error": { "errors": { "email": ["taken"] } } }),
        )
        .await;
        h.settled(|s| selectors::field_server_errors(s, "signup", "email").contains("taken"))
            .await;

        // The retry wipes the stale verdict while in flight
        h.dispatch(submit("signup", "API_SUBMIT", routed("API_OK", "API_ERR"))).await;
        h.expect_effect("API_SUBMIT").await;
        let state = h.settled(|s| selectors::form_is_submitting(s, "signup")).await;
        assert!(selectors::field_server_errors(&state, "signup", "email").is_empty());

        h.complete("API_OK", Value::Null).await;
        let state = h.settled(|s| !selectors::form_is_submitting(s, "signup")).await;
        assert!(selectors::field_server_errors(&state, "signup", "email").is_empty());

        h.finish().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_two_forms_submit_independently() {
        let mut h = TestHarness::start();

        for id in ["alpha", "beta"] {
            h.dispatch(attach(id, "field", None)).await;
            h.dispatch(submit(
                id,
                &format!("SUBMIT_{id}"),
                routed(&format!("OK_{id}"), &format!("ERR_{id}")),
            ))
            .await;
        }
        h.expect_effect("SUBMIT_alpha").await;
        h.expect_effect("SUBMIT_beta").await;
        h.settled(|s| {
            ["alpha", "beta"]
                .iter()
                .all(|id| selectors::form_is_submitting(s, id))
        })
        .await;

        h.complete("ERR_beta", json!({ "error": { "errors": { "form": ["down"] } } }))
            .await;
        let state = h.settled(|s| !selectors::form_is_submitting(s, "beta")).await;
        assert!(selectors::form_is_submitting(&state, "alpha"));
        assert!(selectors::form_level_errors(&state, "beta").contains("down"));

        h.complete("OK_alpha", Value::Null).await;
        let state = h.settled(|s| !selectors::form_is_submitting(s, "alpha")).await;
        assert!(selectors::form_level_errors(&state, "alpha").is_empty());

        h.finish().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_unmatched_external_actions_leave_state_untouched() {
        let mut h = TestHarness::start();

        h.dispatch(attach("signup", "email", None)).await;
        h.dispatch(submit("signup", "API_SUBMIT", routed("API_OK", "API_ERR"))).await;
        h.expect_effect("API_SUBMIT").await;

        // Noise on the stream with foreign action types is ignored by
        // the race and by the store
        h.complete("SOMETHING_ELSE", json!({ "noise": true })).await;
        h.complete("ANALYTICS_PING", Value::Null).await;
        let state = h.settled(|s| selectors::form_is_submitting(s, "signup")).await;
        assert_eq!(state.forms.len(), 1);

        h.complete("API_OK", Value::Null).await;
        h.settled(|s| !selectors::form_is_submitting(s, "signup")).await;

        h.finish().await.expect("clean shutdown");
    }
}
