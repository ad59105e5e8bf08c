/**
 * Directive Package Tests
 *
 * `<?use?>` and `<?import?>` instructions, descriptor reading and the
 * handling of unreadable descriptors.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use flavour_compiler::config::{ParserConfig, ResourceErrorPolicy};
    use flavour_compiler::error::CompileError;
    use flavour_compiler::expression::PathExpressionCompiler;
    use flavour_compiler::parse_util::Diagnostic;
    use flavour_compiler::template_parser::{
        ResourceProvider, TemplateParseResult, TemplateParser,
    };

    fn parse_with(
        source: &str,
        resources: &dyn ResourceProvider,
        config: ParserConfig,
    ) -> Result<TemplateParseResult, CompileError> {
        let classes = test_classes();
        let compiler = PathExpressionCompiler::new();
        TemplateParser::new(&classes, resources, &compiler)
            .with_config(config)
            .parse(source, "app.Page")
    }

    fn parse(source: &str) -> TemplateParseResult {
        parse_with(source, &test_resources(), ParserConfig::default()).unwrap()
    }

    /// Span of the content of the first processing instruction in `source`.
    fn content_span(source: &str, content: &str) -> (usize, usize) {
        let start = source.find(content).unwrap();
        (start, start + content.len())
    }

    mod use_instruction {
        use super::*;

        #[test]
        fn should_register_package_under_prefix() {
            let result = parse("<?use t:test.directives?><t:pair first=\"a\"></t:pair><t:click handler=\"this\"/>");
            assert!(result.is_successful(), "{:?}", result.diagnostics);
            assert_eq!(result.nodes.len(), 2);
        }

        #[test]
        fn should_trim_prefix_and_package() {
            let result = parse("<?use  t : test . directives ?><t:pair/>");
            assert!(result.is_successful(), "{:?}", result.diagnostics);
        }

        #[test]
        fn should_reject_malformed_use() {
            for content in ["test.directives", ":test.directives", "t:"] {
                let source = format!("<?use {}?>", content);
                let result = parse(&source);
                let (start, end) = content_span(&source, content);
                assert_eq!(
                    result.diagnostics,
                    vec![Diagnostic::new(start, end, "Illegal syntax for 'use' instruction")],
                    "for {:?}",
                    content
                );
            }
        }

        #[test]
        fn should_report_missing_package() {
            let source = "<?use x:no.such?><x:a/>";
            let result = parse(source);
            let (start, end) = content_span(source, "x:no.such");
            assert_eq!(
                result.diagnostics,
                vec![
                    Diagnostic::new(start, end, "Directive package was not found: no.such"),
                    Diagnostic::new(18, 21, "Undefined directive x:a"),
                ]
            );
        }

        #[test]
        fn should_report_bad_descriptor_entries_and_continue() {
            let source = "<?use b:test.broken?><b:valid/>";
            let result = parse(source);
            let (start, end) = content_span(source, "b:test.broken");
            assert_eq!(
                result.diagnostics,
                vec![
                    Diagnostic::new(
                        start,
                        end,
                        "Class test.broken.Missing declared by directive package was not found"
                    ),
                    Diagnostic::new(start, end, "Class test.broken.Plain is not a directive"),
                ]
            );
            assert_eq!(result.nodes.len(), 1);
        }

        #[test]
        fn should_add_to_existing_prefix() {
            let result = parse("<?use std:test.directives?><std:pair/><std:foreach var=\"i\" in=\"this\"></std:foreach>");
            assert!(result.is_successful(), "{:?}", result.diagnostics);
            assert_eq!(result.nodes.len(), 2);
        }
    }

    mod default_package {
        use super::*;

        #[test]
        fn should_register_configured_default_package() {
            let config = ParserConfig {
                default_prefix: "t".to_string(),
                default_package: "test.directives".to_string(),
                ..ParserConfig::default()
            };
            let result = parse_with("<t:pair/><std:text value=\"this\"/>", &test_resources(), config).unwrap();
            assert_eq!(
                result.diagnostics,
                vec![Diagnostic::new(10, 18, "Undefined directive std:text")]
            );
        }

        #[test]
        fn should_report_missing_default_package_at_start() {
            let config = ParserConfig {
                default_package: "nope".to_string(),
                ..ParserConfig::default()
            };
            let result = parse_with("<p></p>", &test_resources(), config).unwrap();
            assert_eq!(
                result.diagnostics,
                vec![Diagnostic::new(0, 0, "Directive package was not found: nope")]
            );
        }
    }

    mod import_instruction {
        use super::*;

        #[test]
        fn should_import_known_classes_and_packages() {
            let result = parse("<?import app.model.Item?><?import app . model . *?><p></p>");
            assert!(result.is_successful(), "{:?}", result.diagnostics);
        }

        #[test]
        fn should_report_unknown_class() {
            let source = "<?import  app.model.Missing ?>";
            let result = parse(source);
            let (start, end) = content_span(source, "app.model.Missing");
            assert_eq!(
                result.diagnostics,
                vec![Diagnostic::new(start, end, "Class was not found: app.model.Missing")]
            );
        }

        #[test]
        fn should_ignore_other_instructions() {
            let result = parse("<?xml version=\"1.0\"?><p></p>");
            assert!(result.is_successful());
            assert_eq!(result.nodes.len(), 1);
        }
    }

    mod io_failures {
        use super::*;

        const SOURCE: &str = "<?use f:test.failing?><f:partial/>";

        #[test]
        fn should_abort_under_fatal_policy() {
            let result = parse_with(SOURCE, &FailingResources::new(), ParserConfig::default());
            match result {
                Err(CompileError::ResourceRead { resource, source }) => {
                    assert_eq!(resource, descriptor("test.failing"));
                    assert_eq!(source.to_string(), "device not ready");
                }
                other => panic!("expected resource error, got {:?}", other),
            }
        }

        #[test]
        fn should_report_under_report_policy() {
            let config = ParserConfig::default().with_resource_errors(ResourceErrorPolicy::Report);
            let result = parse_with(SOURCE, &FailingResources::new(), config).unwrap();
            let (start, end) = content_span(SOURCE, "f:test.failing");
            assert_eq!(
                result.diagnostics,
                vec![Diagnostic::new(
                    start,
                    end,
                    "Error reading directive package test.failing: device not ready"
                )]
            );
            // entries read before the failure stay registered
            assert_eq!(result.nodes.len(), 1);
        }

        #[test]
        fn should_report_unopenable_descriptor_under_fatal_policy() {
            let source = "<?use d:test.denied?><p></p>";
            let result = parse_with(source, &FailingResources::new(), ParserConfig::default()).unwrap();
            let (start, end) = content_span(source, "d:test.denied");
            assert_eq!(
                result.diagnostics,
                vec![Diagnostic::new(
                    start,
                    end,
                    "Error opening directive package test.denied: access denied"
                )]
            );
            assert_eq!(result.nodes.len(), 1);
        }

        #[test]
        fn should_report_unopenable_descriptor_under_report_policy() {
            let config = ParserConfig::default().with_resource_errors(ResourceErrorPolicy::Report);
            let result = parse_with("<?use d:test.denied?>", &FailingResources::new(), config).unwrap();
            assert_eq!(result.diagnostics.len(), 1);
            assert!(result.diagnostics[0].message.starts_with("Error opening directive package"));
        }

        #[test]
        fn should_decode_descriptor_leniently() {
            let source = "<?use e:test.encoded?><e:latin/>";
            let result = parse_with(source, &FailingResources::new(), ParserConfig::default()).unwrap();
            assert!(result.is_successful(), "{:?}", result.diagnostics);
            assert_eq!(result.nodes.len(), 1);
        }
    }
}
