/**
 * Interpreter Tests
 *
 * Compile templates with the path expression compiler and render them
 * against JSON models.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use flavour_compiler::error::RenderError;
    use flavour_compiler::expression::{PathEvaluator, PathExpressionCompiler, Plan};
    use flavour_compiler::runtime::{
        Action, Component, ComponentBase, DirectiveFactories, Environment, Evaluator, Interpreter,
        Slot,
    };
    use flavour_compiler::template_parser::TemplateParser;
    use flavour_compiler::tree::TemplateNode;
    use serde_json::{json, Value};

    fn compile(source: &str) -> Vec<TemplateNode> {
        let classes = test_classes();
        let resources = test_resources();
        let compiler = PathExpressionCompiler::new();
        let result = TemplateParser::new(&classes, &resources, &compiler)
            .parse(source, "app.Page")
            .unwrap();
        assert!(result.is_successful(), "{:?}", result.diagnostics);
        result.nodes
    }

    const LIST: &str = "<ul class=\"items\"><std:foreach var=\"item\" in=\"this.items\"><li><std:text value=\"item.name\"/></li></std:foreach></ul>";

    fn items(names: &[&str]) -> Value {
        json!({ "items": names.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>() })
    }

    mod rendering {
        use super::*;

        #[test]
        fn should_render_foreach_over_model() {
            let nodes = compile(LIST);
            let mut instance = Interpreter::new(PathEvaluator).instantiate(&nodes, items(&["a", "b"]));
            instance.render().unwrap();
            assert_eq!(
                instance.to_html(),
                "<ul class=\"items\"><li>a</li><li>b</li></ul>"
            );
        }

        #[test]
        fn should_follow_model_changes_positionally() {
            let nodes = compile(LIST);
            let mut instance = Interpreter::new(PathEvaluator).instantiate(&nodes, items(&["a", "b"]));
            instance.render().unwrap();

            instance.set_model(items(&["a", "b", "c"]));
            instance.render().unwrap();
            assert_eq!(
                instance.to_html(),
                "<ul class=\"items\"><li>a</li><li>b</li><li>c</li></ul>"
            );

            instance.set_model(items(&["x"]));
            instance.render().unwrap();
            assert_eq!(instance.to_html(), "<ul class=\"items\"><li>x</li></ul>");
        }

        #[test]
        fn should_expose_index_variable() {
            let nodes = compile(
                "<std:foreach var=\"item\" index=\"i\" in=\"this.items\"><std:text value=\"i\"/>:<std:text value=\"item.name\"/>;</std:foreach>",
            );
            let mut instance = Interpreter::new(PathEvaluator).instantiate(&nodes, items(&["a", "b"]));
            instance.render().unwrap();
            assert_eq!(instance.to_html(), "0:a;1:b;");
        }

        #[test]
        fn should_toggle_if_content() {
            let nodes = compile("<p><std:if condition=\"this.show\"><b>yes</b></std:if></p>");
            let mut instance =
                Interpreter::new(PathEvaluator).instantiate(&nodes, json!({ "show": true }));
            instance.render().unwrap();
            assert_eq!(instance.to_html(), "<p><b>yes</b></p>");

            instance.set_model(json!({ "show": false }));
            instance.render().unwrap();
            assert_eq!(instance.to_html(), "<p></p>");
        }

        #[test]
        fn should_escape_computed_text_only() {
            let nodes = compile("<p>&amp; <std:text value=\"this.name\"/></p>");
            let mut instance =
                Interpreter::new(PathEvaluator).instantiate(&nodes, json!({ "name": "<x>" }));
            instance.render().unwrap();
            assert_eq!(instance.to_html(), "<p>&amp; &lt;x&gt;</p>");
        }

        #[test]
        fn should_treat_missing_collection_as_empty() {
            let nodes = compile(LIST);
            let mut instance = Interpreter::new(PathEvaluator).instantiate(&nodes, json!({}));
            instance.render().unwrap();
            assert_eq!(instance.to_html(), "<ul class=\"items\"></ul>");
        }
    }

    mod directives {
        use super::*;

        /// Evaluator counting executed actions.
        struct CountingEvaluator {
            executed: Rc<Cell<usize>>,
        }

        impl Evaluator for CountingEvaluator {
            fn evaluate(&self, plan: &Plan, env: &Environment) -> Value {
                PathEvaluator.evaluate(plan, env)
            }

            fn execute(&self, _plan: &Plan, _env: &Environment) {
                self.executed.set(self.executed.get() + 1);
            }
        }

        /// Performs its handler on every render.
        struct ClickComponent {
            base: ComponentBase,
            handler: Box<dyn Action>,
        }

        impl Component for ClickComponent {
            fn slot(&self) -> &Slot {
                self.base.slot()
            }

            fn render(&mut self) -> Result<(), RenderError> {
                self.base.ensure_alive()?;
                self.handler.perform();
                self.base.mark_rendered();
                Ok(())
            }

            fn destroy(&mut self) {
                self.base.destroy();
            }
        }

        #[test]
        fn should_fail_render_of_unregistered_directive() {
            let nodes = compile("<?use t:test.directives?><t:pair first=\"a\"></t:pair>");
            let mut instance = Interpreter::new(PathEvaluator).instantiate(&nodes, Value::Null);
            assert_eq!(
                instance.render(),
                Err(RenderError::UnknownDirective(PAIR_CLASS.to_string()))
            );
        }

        #[test]
        fn should_use_registered_factories() {
            let executed = Rc::new(Cell::new(0));
            let mut factories = DirectiveFactories::with_builtins();
            factories.register(CLICK_CLASS, |mut context| -> Box<dyn Component> {
                let handler = context
                    .take_action("set_handler")
                    .expect("handler binding");
                Box::new(ClickComponent {
                    base: ComponentBase::new(context.slot.clone()),
                    handler,
                })
            });
            let interpreter = Interpreter::new(CountingEvaluator {
                executed: Rc::clone(&executed),
            })
            .with_factories(factories);

            let nodes = compile("<?use t:test.directives?><t:click handler=\"this.save\"/><std:text value=\"this.title\"/>");
            let mut instance = interpreter.instantiate(&nodes, json!({ "title": "T" }));
            instance.render().unwrap();
            instance.render().unwrap();
            assert_eq!(executed.get(), 2);
            assert_eq!(instance.to_html(), "T");
        }

        #[test]
        fn should_refuse_render_after_destroy() {
            let nodes = compile(LIST);
            let mut instance = Interpreter::new(PathEvaluator).instantiate(&nodes, items(&["a"]));
            instance.render().unwrap();
            instance.destroy();
            assert_eq!(instance.render(), Err(RenderError::Destroyed));
        }
    }
}
