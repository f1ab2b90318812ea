//! # Form Lifecycle Flows
//!
//! Registry and edit actions round-tripped through a running engine:
//! dispatch, store fold, snapshot observation. The synchronous validation
//! pass runs inside the store, so these flows also pin down rule-string
//! parsing and cross-field revalidation end to end.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{attach, TestHarness};
    use formwork_actions::FormAction;
    use formwork_state::selectors;

    #[tokio::test]
    async fn test_register_attach_change_unregister() {
        let h = TestHarness::start();

        h.dispatch(FormAction::RegisterForm {
            id: "signup".to_string(),
        })
        .await;
        h.dispatch(attach("signup", "email", Some("required"))).await;
        h.dispatch(FormAction::change("signup", "email", "a@b.c")).await;

        let state = h
            .settled(|s| selectors::field_value(s, "signup", "email") == "a@b.c")
            .await;
        assert!(selectors::form_is_valid(&state, "signup"));

        h.dispatch(FormAction::UnregisterForm {
            id: "signup".to_string(),
        })
        .await;
        let state = h.settled(|s| !s.forms.contains_key("signup")).await;
        assert!(state.forms.is_empty());

        h.finish().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_attach_without_register_creates_form() {
        let h = TestHarness::start();

        h.dispatch(attach("implicit", "field", None)).await;
        let state = h.settled(|s| s.forms.contains_key("implicit")).await;
        assert!(state.forms["implicit"].fields.contains_key("field"));

        h.finish().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_compound_rule_string_end_to_end() {
        let h = TestHarness::start();

        h.dispatch(attach("signup", "username", Some("required|length:3,8"))).await;
        let state = h.settled(|s| s.forms.contains_key("signup")).await;
        // Empty input fails required only; length passes on empty
        assert!(selectors::field_sync_errors(&state, "signup", "username").contains("required"));
        assert!(!selectors::field_sync_errors(&state, "signup", "username").contains("length"));

        h.dispatch(FormAction::change("signup", "username", "ab")).await;
        let state = h
            .settled(|s| selectors::field_value(s, "signup", "username") == "ab")
            .await;
        assert!(selectors::field_sync_errors(&state, "signup", "username").contains("length"));
        assert!(!selectors::field_sync_errors(&state, "signup", "username").contains("required"));

        h.dispatch(FormAction::change("signup", "username", "abcd")).await;
        let state = h
            .settled(|s| selectors::field_value(s, "signup", "username") == "abcd")
            .await;
        assert!(selectors::form_is_valid(&state, "signup"));

        h.finish().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_cross_field_matches_revalidates_dependent() {
        let h = TestHarness::start();

        h.dispatch(attach("signup", "password", None)).await;
        h.dispatch(attach("signup", "confirm", Some("matches:password"))).await;
        h.dispatch(FormAction::change("signup", "confirm", "hunter2")).await;

        // Only the sibling was edited, yet confirm's verdict must update
        h.dispatch(FormAction::change("signup", "password", "hunter2")).await;
        let state = h
            .settled(|s| selectors::field_value(s, "signup", "password") == "hunter2")
            .await;
        assert!(selectors::field_sync_errors(&state, "signup", "confirm").is_empty());

        h.dispatch(FormAction::change("signup", "password", "different")).await;
        let state = h
            .settled(|s| selectors::field_value(s, "signup", "password") == "different")
            .await;
        assert!(selectors::field_sync_errors(&state, "signup", "confirm").contains("matches"));

        h.finish().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_blur_and_touch_projection() {
        let h = TestHarness::start();

        h.dispatch(attach("signup", "email", None)).await;
        h.dispatch(attach("signup", "name", None)).await;
        h.dispatch(FormAction::Blur {
            id: "signup".to_string(),
            name: "email".to_string(),
        })
        .await;

        let state = h.settled(|s| selectors::field_touched(s, "signup", "email")).await;
        assert!(!selectors::field_touched(&state, "signup", "name"));

        h.dispatch(FormAction::Touch {
            id: "signup".to_string(),
            fields: None,
        })
        .await;
        let state = h.settled(|s| selectors::field_touched(s, "signup", "name")).await;
        assert!(
            selectors::form_touched_fields(&state, "signup")
                .values()
                .all(|t| *t)
        );

        h.finish().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_clear_form_resets_targeted_fields() {
        let h = TestHarness::start();

        h.dispatch(attach("signup", "a", None)).await;
        h.dispatch(attach("signup", "b", None)).await;
        h.dispatch(FormAction::change("signup", "a", "1")).await;
        h.dispatch(FormAction::change("signup", "b", "2")).await;
        h.dispatch(FormAction::ClearForm {
            id: "signup".to_string(),
            fields: Some(vec!["a".to_string()]),
        })
        .await;

        let state = h
            .settled(|s| selectors::field_value(s, "signup", "a").is_empty())
            .await;
        assert_eq!(selectors::field_value(&state, "signup", "b"), "2");

        h.finish().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_detach_after_unregister_is_harmless() {
        let h = TestHarness::start();

        h.dispatch(attach("signup", "email", None)).await;
        h.dispatch(FormAction::UnregisterForm {
            id: "signup".to_string(),
        })
        .await;
        h.dispatch(FormAction::DetachFromForm {
            id: "signup".to_string(),
            name: "email".to_string(),
        })
        .await;
        // A marker edit on another form proves the store is still folding
        h.dispatch(attach("other", "field", None)).await;

        let state = h.settled(|s| s.forms.contains_key("other")).await;
        assert!(
            !state.forms.contains_key("signup"),
            "detach must not resurrect an unregistered form"
        );

        h.finish().await.expect("clean shutdown");
    }
}
