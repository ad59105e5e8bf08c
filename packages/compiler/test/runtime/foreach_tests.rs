/**
 * ForEach Reconciliation Tests
 *
 * Positional reconciliation of loop children across renders.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use flavour_compiler::error::RenderError;
    use flavour_compiler::runtime::{Component, ForEachComponent, Slot};

    fn strings(events: &[&str]) -> Vec<String> {
        events.iter().map(|event| event.to_string()).collect()
    }

    mod reconciliation {
        use super::*;

        #[test]
        fn should_create_children_on_first_render() {
            let mut harness = ForEachHarness::new();
            assert_eq!(
                harness.render(&["a", "b", "c"]),
                strings(&[
                    "create 0", "render 0 a@0", "create 1", "render 1 b@1", "create 2",
                    "render 2 c@2",
                ])
            );
            assert_eq!(harness.child_ids(), "012");
            assert_eq!(harness.component.computed_collection(), ["a", "b", "c"]);
        }

        #[test]
        fn should_append_single_child_when_growing() {
            let mut harness = ForEachHarness::new();
            harness.render(&["a", "b", "c"]);
            assert_eq!(
                harness.render(&["a", "b", "c", "d"]),
                strings(&[
                    "render 0 a@0", "render 1 b@1", "render 2 c@2", "create 3", "render 3 d@3",
                ])
            );
            assert_eq!(harness.child_ids(), "0123");
            assert_eq!(harness.component.child_count(), 4);
        }

        #[test]
        fn should_destroy_only_surplus_children_when_shrinking() {
            let mut harness = ForEachHarness::new();
            harness.render(&["a", "b", "c"]);
            assert_eq!(
                harness.render(&["a", "b"]),
                strings(&["render 0 a@0", "render 1 b@1", "destroy 2"])
            );
            assert_eq!(harness.child_ids(), "01");
            assert_eq!(harness.component.child_count(), 2);
            assert_eq!(harness.component.computed_collection(), ["a", "b"]);
        }

        #[test]
        fn should_rerender_without_churn_for_same_sequence() {
            let mut harness = ForEachHarness::new();
            harness.render(&["a", "b", "c"]);
            assert_eq!(
                harness.render(&["a", "b", "c"]),
                strings(&["render 0 a@0", "render 1 b@1", "render 2 c@2"])
            );
            assert_eq!(harness.child_ids(), "012");
        }

        #[test]
        fn should_rebind_positionally_without_moves() {
            let mut harness = ForEachHarness::new();
            harness.render(&["a", "b", "c"]);
            assert_eq!(
                harness.render(&["c", "a"]),
                strings(&["render 0 c@0", "render 1 a@1", "destroy 2"])
            );
            assert_eq!(harness.child_ids(), "01");
        }

        #[test]
        fn should_handle_empty_sequences() {
            let mut harness = ForEachHarness::new();
            assert!(harness.render(&[]).is_empty());
            harness.render(&["a", "b"]);
            assert_eq!(harness.render(&[]), strings(&["destroy 0", "destroy 1"]));
            assert_eq!(harness.child_ids(), "");
            assert_eq!(
                harness.render(&["x"]),
                strings(&["create 2", "render 2 x@0"])
            );
        }
    }

    mod failing_children {
        use super::*;

        #[test]
        fn should_finish_pass_when_new_child_fails() {
            let mut harness = ForEachHarness::new();
            harness.render(&["a"]);
            harness.set_data(&["a", "b", "!c"]);
            assert_eq!(
                harness.component.render(),
                Err(RenderError::MissingBinding("value"))
            );
            assert_eq!(
                harness.log.take(),
                strings(&["render 0 a@0", "create 1", "render 1 b@1", "create 2", "render 2 !c@2"])
            );
            assert_eq!(harness.component.child_count(), 3);
            assert_eq!(harness.component.computed_collection(), ["a", "b", "!c"]);
            assert_eq!(harness.child_ids(), "012");

            assert_eq!(
                harness.render(&["a"]),
                strings(&["render 0 a@0", "destroy 1", "destroy 2"])
            );
        }

        #[test]
        fn should_drop_surplus_when_reused_child_fails() {
            let mut harness = ForEachHarness::new();
            harness.render(&["a", "b", "c"]);
            harness.set_data(&["!a"]);
            assert_eq!(
                harness.component.render(),
                Err(RenderError::MissingBinding("value"))
            );
            assert_eq!(
                harness.log.take(),
                strings(&["render 0 !a@0", "destroy 1", "destroy 2"])
            );
            assert_eq!(harness.component.child_count(), 1);
            assert_eq!(harness.component.computed_collection(), ["!a"]);
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn should_cascade_destroy_and_detach() {
            let parent = Slot::container();
            let mut harness = ForEachHarness::new();
            parent.append(harness.component.slot());
            harness.render(&["a", "b"]);

            harness.component.destroy();
            assert_eq!(harness.log.take(), strings(&["destroy 0", "destroy 1"]));
            assert_eq!(parent.child_count(), 0);

            harness.component.destroy();
            assert!(harness.log.take().is_empty());
        }

        #[test]
        fn should_refuse_render_after_destroy() {
            let mut harness = ForEachHarness::new();
            harness.render(&["a"]);
            harness.component.destroy();
            harness.set_data(&["a", "b"]);
            assert_eq!(harness.component.render(), Err(RenderError::Destroyed));
            assert_eq!(harness.log.take(), strings(&["destroy 0"]));
        }

        #[test]
        fn should_require_bindings() {
            let mut component: ForEachComponent<String> = ForEachComponent::new(Slot::container());
            assert_eq!(
                component.render(),
                Err(RenderError::MissingBinding("collection"))
            );
            component.set_collection(Vec::new);
            assert_eq!(
                component.render(),
                Err(RenderError::MissingBinding("element_variable"))
            );
            component.set_element_variable(|_: String| {});
            assert_eq!(component.render(), Err(RenderError::MissingBinding("body")));
        }
    }
}
