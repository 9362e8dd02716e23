//! End-to-end tests: source text in, report JSON out.

use ecmatree_syntax::{Dialect, Options, Pipeline, Report, Strategy, TreeShape};
use serde_json::Value;

fn run(source: &str) -> Value {
    run_with(Options::default(), source)
}

fn run_with(options: Options, source: &str) -> Value {
    let report = Pipeline::new(options).run(source);
    serde_json::to_value(&report).expect("report serializes")
}

fn keys(value: &Value) -> Vec<String> {
    value.as_object().expect("object").keys().cloned().collect()
}

/// Every key of every object, depth first.
fn all_keys(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                out.push(key.clone());
                all_keys(child, out);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| all_keys(item, out)),
        _ => {}
    }
}

// ============================================================================
// Typed dialect
// ============================================================================

mod typed {
    use super::*;

    #[test]
    fn interface_declaration() {
        let report = run("interface Point { x: number; y: number; }");
        assert_eq!(keys(&report), ["parser", "ast"]);
        assert_eq!(report["parser"], "typescript");

        let ast = &report["ast"];
        assert_eq!(ast["kind"], "program");
        let statements = ast["children"].as_array().expect("children");
        assert_eq!(statements.len(), 1);

        let interface = &statements[0];
        assert_eq!(interface["kind"], "interface_declaration");
        assert_eq!(interface["name"]["name"], "Point");

        let members = interface["members"].as_array().expect("members");
        assert_eq!(members.len(), 2);
        for (member, name) in members.iter().zip(["x", "y"]) {
            assert_eq!(member["kind"], "property_signature");
            assert_eq!(member["name"]["name"], name);
            assert!(member["type"].is_object());
        }
    }

    #[test]
    fn every_node_has_kind_and_number() {
        let report = run("const greet = (who: string): string => `hi ${who}`;");
        fn check(node: &Value) {
            assert!(node["kind"].is_string(), "{node}");
            assert!(node["kindNumber"].is_u64(), "{node}");
            if let Some(children) = node["children"].as_array() {
                children.iter().for_each(check);
            }
        }
        check(&report["ast"]);
    }

    #[test]
    fn no_engine_internals_leak() {
        let report = run("class A<T> { private items: T[] = []; }");
        let mut found = Vec::new();
        all_keys(&report, &mut found);
        for internal in ["parent", "flags", "symbol", "id"] {
            assert!(!found.iter().any(|k| k == internal), "leaked `{internal}`");
        }
    }

    #[test]
    fn operators_and_declaration_keywords_are_kept() {
        assert_ne!(
            run("let x: number = a + b;")["ast"],
            run("let x: number = a - b;")["ast"]
        );
        assert_ne!(
            run("let x: number = 1;")["ast"],
            run("const x: number = 1;")["ast"]
        );
    }

    #[test]
    fn readonly_property_is_typed() {
        let report = run("class C { readonly id = 1; }");
        assert_eq!(report["parser"], "typescript");
    }
}

// ============================================================================
// Plain dialect
// ============================================================================

mod plain {
    use super::*;

    #[test]
    fn function_declaration_uses_native_tree() {
        let report = run("function add(a, b) { return a + b; }");
        assert_eq!(report["parser"], "javascript");
        assert_eq!(report["ast"]["type"], "program");
        assert!(report["ast"].get("kind").is_none());
    }

    #[test]
    fn arithmetic_is_plain() {
        let report = run("let x = 1 + 2;");
        assert_eq!(report["parser"], "javascript");
    }

    #[test]
    fn native_tree_shape() {
        let report = run("x;");
        insta::assert_json_snapshot!(report, @r#"
        {
          "parser": "javascript",
          "ast": {
            "type": "program",
            "start": 0,
            "end": 2,
            "children": [
              {
                "type": "expression_statement",
                "start": 0,
                "end": 2,
                "children": [
                  {
                    "type": "identifier",
                    "start": 0,
                    "end": 1,
                    "text": "x"
                  }
                ]
              }
            ]
          }
        }
        "#);
    }

    #[test]
    fn operators_and_declaration_keywords_are_kept() {
        let plus = run("a + b;");
        assert_ne!(plus, run("a - b;"));
        assert_eq!(plus["ast"]["children"][0]["children"][0]["operator"], "+");

        let declaration = &run("const x = 1;")["ast"]["children"][0];
        assert_eq!(declaration["kind"], "const");
    }

    #[test]
    fn normalized_operators_are_kept() {
        let options = Options {
            plain_tree: TreeShape::Normalized,
            ..Options::default()
        };
        assert_ne!(run_with(options, "a + b;"), run_with(options, "a - b;"));
        assert_ne!(run_with(options, "let x = 1;"), run_with(options, "const x = 1;"));
    }

    #[test]
    fn normalized_on_request() {
        let options = Options {
            plain_tree: TreeShape::Normalized,
            ..Options::default()
        };
        let report = run_with(options, "function add(a, b) { return a + b; }");
        assert_eq!(report["parser"], "javascript");
        let function = &report["ast"]["children"][0];
        assert_eq!(function["kind"], "function_declaration");
        assert_eq!(function["name"]["name"], "add");
        assert_eq!(function["parameters"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn empty_source() {
        let report = run("");
        assert_eq!(report["parser"], "javascript");
        assert_eq!(report["ast"]["type"], "program");
    }
}

// ============================================================================
// Failures
// ============================================================================

mod failures {
    use super::*;

    #[test]
    fn incomplete_function_reports_error() {
        let report = run("function (");
        assert_eq!(keys(&report), ["error"]);
        let message = report["error"].as_str().expect("message");
        assert!(!message.is_empty());
    }

    #[test]
    fn misclassified_typescript_fails_on_plain_engine() {
        // A non-null assertion matches no trigger.
        let report = run("let a = b!;");
        assert_eq!(keys(&report), ["error"]);
    }

    #[test]
    fn fallback_recovers_misclassified_typescript() {
        let options = Options {
            strategy: Strategy::Fallback,
            ..Options::default()
        };
        let report = run_with(options, "let a = b!;");
        assert_eq!(report["parser"], "typescript");
    }

    #[test]
    fn forced_dialect_is_honored() {
        let options = Options {
            dialect: Some(Dialect::Plain),
            ..Options::default()
        };
        let report = run_with(options, "interface A { x: number }");
        assert_eq!(keys(&report), ["error"]);
    }

    #[test]
    fn deep_nesting_is_an_error_report() {
        let source = format!("x = {}{};", "[".repeat(50_000), "]".repeat(50_000));
        for strategy in [Strategy::Heuristic, Strategy::Fallback] {
            let options = Options {
                strategy,
                ..Options::default()
            };
            let report = run_with(options, &source);
            assert_eq!(keys(&report), ["error"]);
            assert!(report["error"].as_str().unwrap().contains("nesting too deep"));
        }
    }

    #[test]
    fn report_is_exclusive() {
        for source in ["interface A {}", "let a = 1;", "function (", "}{"] {
            let report = Pipeline::new(Options::default()).run(source);
            let json = serde_json::to_value(&report).unwrap();
            match report {
                Report::Parsed { .. } => assert_eq!(keys(&json), ["parser", "ast"]),
                Report::Failed { .. } => assert_eq!(keys(&json), ["error"]),
            }
        }
    }
}
