// Injection Safety Contract Tests
//
// These tests verify that caller-supplied values never become query syntax.
// Builders emit command text that only names variables; values are rendered
// by the parameterized statement, escaped for their kind.
//
// **Problem**: Someone "simplifies" a builder by formatting a value straight into the command
// **Solution**: Contract tests that inspect command text and compiled text separately

use indexmap::IndexMap;
use owlq_core::query::{standard_prefixes, ParameterizedStatement};
use owlq_core::{AskBuilder, InsertBuilder, InsertParam, OntologyError, Operator, ParamValue, SelectBuilder};

fn defaults() -> IndexMap<String, String> {
    let mut prefixes = IndexMap::new();
    prefixes.insert("mci".to_string(), "http://www.semanticweb.org/mci#".to_string());
    prefixes.extend(standard_prefixes());
    prefixes
}

/// WHY: Command text must only ever contain variable names
/// FORBIDDEN: literal values, IRIs or numbers formatted into the command
/// REASON: Bindings are the single place values get escaped
/// BREAKS: Every caller passing user text, if a value leaks into the command unescaped
/// SACRIFICES: If this fails, a builder bypassed the binding table
#[test]
fn builder_commands_never_contain_values() {
    let secret = "needle\" } DROP ALL { \"";

    let select = SelectBuilder::new()
        .select(&["w"])
        .add_literal_param("text", secret)
        .add_iri_param("hasValue", "mci:hasValue")
        .where_has_type("w", "mci:Word")
        .where_("w", "hasValue", "text")
        .filter_value("text", Operator::Contains, ParamValue::string(secret))
        .unwrap()
        .regex_filter("text", secret, Some("i"))
        .build()
        .unwrap();

    let ask = AskBuilder::new()
        .add_literal_param("text", secret)
        .is("w", "p", "text")
        .filter_value("w", Operator::Eq, ParamValue::iri("mci:word1"))
        .unwrap()
        .build()
        .unwrap();

    let insert = InsertBuilder::new()
        .insert_entry(InsertParam::iri("w", "mci:word1"), "mci:Word")
        .add_relation(InsertParam::iri("p", "mci:hasValue"), InsertParam::string("o", secret))
        .add_relation(InsertParam::iri("lvl", "mci:hasLevel"), InsertParam::long("n", 42))
        .build()
        .unwrap();

    for command in [select.command(), ask.command(), insert.command()] {
        assert!(!command.contains("needle"), "value leaked into command: {}", command);
        assert!(!command.contains("mci:"), "IRI leaked into command: {}", command);
        assert!(!command.contains("42"), "number leaked into command: {}", command);
        assert!(!command.contains("DROP"), "value leaked into command: {}", command);
    }

    // If this test fails:
    // - A builder formats values into text
    // - Escaping is no longer centralized
}

/// WHY: A string value must compile to exactly one literal token
/// REASON: Quotes, backslashes and line breaks must not terminate the literal early
/// BREAKS: Any query built from user-entered text
#[test]
fn string_values_compile_to_one_escaped_literal() {
    let query = SelectBuilder::new()
        .add_literal_param("text", "a \"quoted\" \\ value\nwith } braces")
        .where_("s", "p", "text")
        .build()
        .unwrap();

    let text = ParameterizedStatement::new(query.command(), &defaults())
        .with_prefixes(query.prefixes())
        .bind(query.bindings())
        .compile()
        .unwrap();

    assert!(text.contains(r#"?s ?p "a \"quoted\" \\ value\nwith } braces" ."#));
    // The literal did not break out of the WHERE group
    assert_eq!(text.matches("WHERE {").count(), 1);
    assert!(text.ends_with("}\n"));
}

/// WHY: An IRI parameter may only ever become one `<...>` token
/// FORBIDDEN: angle brackets, quotes, braces or whitespace inside an IRI value
/// REASON: `<` `>` `{` `}` would let a value close the IRI and open new syntax
/// BREAKS: Any query taking an entity name from outside
/// SACRIFICES: Odd but legal IRIs containing these characters are refused
#[test]
fn iri_values_with_syntax_characters_are_rejected() {
    for hostile in [
        "http://x/a> . ?s ?p <http://x/b",
        "mci:word1> } ; DROP ALL ; {",
        "mci:with space",
        "http://x/\"quoted\"",
    ] {
        let query = SelectBuilder::new()
            .add_iri_param("s", hostile)
            .where_("s", "p", "o")
            .build()
            .unwrap();
        let result = ParameterizedStatement::new(query.command(), &defaults())
            .bind(query.bindings())
            .compile();
        assert!(
            matches!(result, Err(OntologyError::QueryConstruction(_))),
            "hostile IRI compiled: {}",
            hostile
        );
    }
}

/// WHY: A prefixed name must resolve through the prefix table or fail
/// REASON: Silently passing `unknown:x` to the store hides typos until runtime
#[test]
fn unknown_prefixes_fail_at_compile_time() {
    let query = AskBuilder::new()
        .add_iri_param("s", "nope:word1")
        .is("s", "p", "o")
        .build()
        .unwrap();

    let result = ParameterizedStatement::new(query.command(), &defaults())
        .bind(query.bindings())
        .compile();
    assert!(matches!(result, Err(OntologyError::QueryConstruction(_))));
}

/// WHY: One name bound to two kinds of value is a construction error
/// REASON: Otherwise which rendering wins depends on call order
/// BREAKS: Queries that silently compare an IRI against a string
#[test]
fn conflicting_bindings_fail_at_build() {
    let result = SelectBuilder::new()
        .add_iri_param("x", "mci:word1")
        .add_literal_param("x", "word1")
        .where_("s", "p", "x")
        .build();
    assert!(matches!(result, Err(OntologyError::QueryConstruction(_))));

    // Same kind twice is a plain rebind
    let query = SelectBuilder::new()
        .add_literal_param("x", "first")
        .add_literal_param("x", "second")
        .where_("s", "p", "x")
        .build()
        .unwrap();
    assert_eq!(query.bindings().get("x"), Some(&ParamValue::string("second")));
}

/// WHY: Substitution replaces whole variable tokens only
/// REASON: Binding `?s` must not rewrite `?subject` or `?s2`
#[test]
fn substitution_matches_whole_variable_names() {
    let query = SelectBuilder::new()
        .select(&["subject", "s2"])
        .add_iri_param("s", "mci:word1")
        .where_("subject", "p", "s2")
        .where_("s", "p", "o")
        .build()
        .unwrap();

    let text = ParameterizedStatement::new(query.command(), &defaults())
        .bind(query.bindings())
        .compile()
        .unwrap();

    assert!(text.contains("SELECT ?subject ?s2 \n"));
    assert!(text.contains("?subject ?p ?s2 ."));
    assert!(text.contains("<http://www.semanticweb.org/mci#word1> ?p ?o ."));
}
