//! Integration tests for query execution against a live SPARQL endpoint
//!
//! Each test starts an in-process SPARQL 1.1 protocol endpoint backed by an
//! Oxigraph store and drives it through `HttpDriver`:
//! - SELECT with typed conditions and filters
//! - ASK true and false
//! - INSERT DATA followed by a read back
//! - Transport failures surfacing as errors

use oxigraph::model::Term;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use owlq_core::ontology::local_name;
use owlq_core::{
    AskBuilder, DatasetProperties, HttpDriver, InsertBuilder, InsertParam, OntologyError,
    Operator, ParamValue, QueryExecutor, SelectBuilder,
};
use serde_json::{json, Map, Value};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

const NS: &str = "http://www.semanticweb.org/mci#";

const SEED: &str = r#"
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX mci: <http://www.semanticweb.org/mci#>
INSERT DATA {
    mci:word1 rdf:type mci:Word ;
        mci:hasValue "apple" .
    mci:word2 rdf:type mci:Word ;
        mci:hasValue "banana" .
    mci:player1 rdf:type mci:Player ;
        mci:hasValue "anna" .
}
"#;

/// Start a SPARQL endpoint on an ephemeral port; returns the dataset URL
fn start_endpoint(store: Store) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            handle(&store, stream);
        }
    });

    format!("http://{}/mci", addr)
}

fn handle(store: &Store, mut stream: TcpStream) {
    let (path, body) = read_request(&mut stream);
    let form: Vec<(String, String)> = url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect();
    let field = |name: &str| {
        form.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };

    let (status, reply) = if path.ends_with("/query") {
        match store.query(field("query").as_str()) {
            Ok(results) => ("200 OK", results_json(results).to_string()),
            Err(e) => ("400 Bad Request", e.to_string()),
        }
    } else if path.ends_with("/update") {
        match store.update(field("update").as_str()) {
            Ok(()) => ("204 No Content", String::new()),
            Err(e) => ("400 Bad Request", e.to_string()),
        }
    } else {
        ("404 Not Found", String::new())
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/sparql-results+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reply.len(),
        reply
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Request path and body of one HTTP/1.1 request
fn read_request(stream: &mut TcpStream) -> (String, String) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).unwrap_or(0);
        request.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&request).to_string();
        if let Some(idx) = text.find("\r\n\r\n") {
            let length = text[..idx]
                .lines()
                .find_map(|l| {
                    l.to_ascii_lowercase()
                        .strip_prefix("content-length:")
                        .and_then(|v| v.trim().parse::<usize>().ok())
                })
                .unwrap_or(0);
            if request.len() >= idx + 4 + length {
                let path = text.split_whitespace().nth(1).unwrap_or("/").to_string();
                return (path, text[idx + 4..].to_string());
            }
        }
        if n == 0 {
            return (String::new(), String::new());
        }
    }
}

/// SPARQL 1.1 JSON results
fn results_json(results: QueryResults) -> Value {
    match results {
        QueryResults::Boolean(value) => json!({ "head": {}, "boolean": value }),
        QueryResults::Solutions(solutions) => {
            let vars: Vec<String> = solutions
                .variables()
                .iter()
                .map(|v| v.as_str().to_string())
                .collect();
            let mut bindings = Vec::new();
            for solution in solutions {
                let solution = solution.unwrap();
                let mut row = Map::new();
                for (var, term) in solution.iter() {
                    row.insert(var.as_str().to_string(), term_json(term));
                }
                bindings.push(Value::Object(row));
            }
            json!({ "head": { "vars": vars }, "results": { "bindings": bindings } })
        }
        QueryResults::Graph(_) => json!({ "head": {} }),
    }
}

fn term_json(term: &Term) -> Value {
    match term {
        Term::NamedNode(node) => json!({ "type": "uri", "value": node.as_str() }),
        Term::BlankNode(node) => json!({ "type": "bnode", "value": node.as_str() }),
        Term::Literal(literal) => match literal.language() {
            Some(lang) => json!({ "type": "literal", "value": literal.value(), "xml:lang": lang }),
            None => json!({
                "type": "literal",
                "value": literal.value(),
                "datatype": literal.datatype().as_str()
            }),
        },
        #[allow(unreachable_patterns)]
        _ => json!({ "type": "literal", "value": term.to_string() }),
    }
}

fn driver_with(seed: &str) -> HttpDriver {
    let store = Store::new().unwrap();
    store.update(seed).unwrap();
    let url = start_endpoint(store);

    let props = DatasetProperties::new(url, NS, "mci");
    HttpDriver::from_config(&props).unwrap()
}

fn seeded_driver() -> HttpDriver {
    driver_with(SEED)
}

#[test]
fn test_single_triple_select_all_positions() {
    let driver = driver_with(
        r#"
        PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
        PREFIX mci: <http://www.semanticweb.org/mci#>
        INSERT DATA { mci:word1 rdf:type mci:Word . }
        "#,
    );

    let query = SelectBuilder::new()
        .select(&["s", "p", "o"])
        .where_has_type("s", "mci:Word")
        .where_("s", "p", "o")
        .build()
        .unwrap();
    let rows = driver.select(&query).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(local_name(&rows[0]["s"]), "word1");
    assert_eq!(local_name(&rows[0]["p"]), "type");
    assert_eq!(local_name(&rows[0]["o"]), "Word");
}

#[test]
fn test_select_typed_individuals() {
    let driver = seeded_driver();

    let query = SelectBuilder::new()
        .select(&["w", "v"])
        .add_iri_param("hasValue", "mci:hasValue")
        .where_has_type("w", "mci:Word")
        .where_("w", "hasValue", "v")
        .order_by_asc("v")
        .build()
        .unwrap();
    let rows = driver.select(&query).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["w"], format!("{}word1", NS));
    assert_eq!(rows[0]["v"], "apple");
    assert_eq!(rows[1]["v"], "banana");

    // Columns follow the projection
    let columns: Vec<&String> = rows[0].keys().collect();
    assert_eq!(columns, vec!["w", "v"]);
}

#[test]
fn test_select_with_bound_literal_returns_one_row() {
    let driver = seeded_driver();

    let query = SelectBuilder::new()
        .select(&["w"])
        .add_iri_param("hasValue", "mci:hasValue")
        .add_literal_param("text", "banana")
        .where_has_type("w", "mci:Word")
        .where_("w", "hasValue", "text")
        .build()
        .unwrap();
    let rows = driver.select(&query).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["w"], format!("{}word2", NS));
}

#[test]
fn test_contains_filter_with_empty_string_matches_all() {
    let driver = seeded_driver();

    let base = || {
        SelectBuilder::new()
            .select(&["v"])
            .add_iri_param("hasValue", "mci:hasValue")
            .where_("s", "hasValue", "v")
    };

    let everything = base()
        .filter_value("v", Operator::Contains, ParamValue::string(""))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(driver.select(&everything).unwrap().len(), 3);

    let with_n = base()
        .filter_value("v", Operator::Contains, ParamValue::string("n"))
        .unwrap()
        .build()
        .unwrap();
    let values: Vec<String> = driver
        .select(&with_n)
        .unwrap()
        .into_iter()
        .filter_map(|mut row| row.shift_remove("v"))
        .collect();
    assert_eq!(values.len(), 2);
    assert!(values.contains(&"banana".to_string()));
    assert!(values.contains(&"anna".to_string()));
}

#[test]
fn test_minus_and_limit() {
    let driver = seeded_driver();

    let query = SelectBuilder::new()
        .select(&["s"])
        .add_iri_param("hasValue", "mci:hasValue")
        .where_("s", "hasValue", "v")
        .minus("s", "rdfType", "player")
        .add_iri_param("rdfType", "rdf:type")
        .add_iri_param("player", "mci:Player")
        .limit(5)
        .build()
        .unwrap();
    let rows = driver.select(&query).unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| !row["s"].ends_with("player1")));
}

#[test]
fn test_ask_true_and_false() {
    let driver = seeded_driver();

    let present = AskBuilder::new()
        .add_literal_param("text", "apple")
        .add_iri_param("hasValue", "mci:hasValue")
        .is_type("w", "mci:Word")
        .is("w", "hasValue", "text")
        .build()
        .unwrap();
    assert!(driver.ask(&present).unwrap());

    let absent = AskBuilder::new()
        .add_literal_param("text", "cherry")
        .add_iri_param("hasValue", "mci:hasValue")
        .is("w", "hasValue", "text")
        .build()
        .unwrap();
    assert!(!driver.ask(&absent).unwrap());
}

#[test]
fn test_insert_then_select() {
    let driver = seeded_driver();

    let insert = InsertBuilder::new()
        .insert_entry(InsertParam::iri("game", "mci:game1"), "mci:Game")
        .add_relation(
            InsertParam::iri("hasWord", "mci:hasWord"),
            InsertParam::iri("w1", "mci:word1"),
        )
        .add_relation(
            InsertParam::iri("hasWord", "mci:hasWord"),
            InsertParam::iri("w2", "mci:word2"),
        )
        .add_relation(InsertParam::iri("hasLevel", "mci:hasLevel"), InsertParam::long("lvl", 3))
        .add_relation(InsertParam::iri("isRanked", "mci:isRanked"), InsertParam::boolean("ranked", true))
        .build()
        .unwrap();
    assert!(driver.insert(&insert).unwrap());

    let words = SelectBuilder::new()
        .select(&["w"])
        .add_iri_param("hasWord", "mci:hasWord")
        .where_has_type("g", "mci:Game")
        .where_("g", "hasWord", "w")
        .order_by_asc("w")
        .build()
        .unwrap();
    let rows = driver.select(&words).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["w"], format!("{}word2", NS));

    let level = AskBuilder::new()
        .add_iri_param("game", "mci:game1")
        .add_iri_param("hasLevel", "mci:hasLevel")
        .add_long_param("lvl", 3)
        .is("game", "hasLevel", "lvl")
        .build()
        .unwrap();
    assert!(driver.ask(&level).unwrap());
}

#[test]
fn test_literal_with_quotes_round_trips() {
    let driver = seeded_driver();
    let tricky = "say \"hi\" } ; DROP ALL";

    let insert = InsertBuilder::new()
        .insert_entry(InsertParam::iri("w", "mci:word3"), "mci:Word")
        .add_relation(
            InsertParam::iri("hasValue", "mci:hasValue"),
            InsertParam::string("text", tricky),
        )
        .build()
        .unwrap();
    assert!(driver.insert(&insert).unwrap());

    let query = SelectBuilder::new()
        .select(&["v"])
        .add_iri_param("w", "mci:word3")
        .add_iri_param("hasValue", "mci:hasValue")
        .where_("w", "hasValue", "v")
        .build()
        .unwrap();
    let rows = driver.select(&query).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["v"], tricky);

    // Seed data survived
    let count = SelectBuilder::new()
        .add_iri_param("hasValue", "mci:hasValue")
        .where_("s", "hasValue", "v")
        .build()
        .unwrap();
    assert_eq!(driver.select(&count).unwrap().len(), 4);
}

#[test]
fn test_store_rejection_is_http_status_error() {
    let driver = seeded_driver();

    // Variable names are not validated; malformed text reaches the store
    let malformed = SelectBuilder::new().where_("s", "p", "o}").build().unwrap();
    let err = driver.select(&malformed).unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(err, OntologyError::HttpStatus { status: 400, .. }));
}

#[test]
fn test_unknown_prefix_fails_before_sending() {
    let driver = seeded_driver();

    let query = SelectBuilder::new()
        .add_iri_param("s", "nosuchprefix:thing")
        .where_("s", "p", "o")
        .build()
        .unwrap();
    let err = driver.select(&query).unwrap_err();
    assert!(matches!(err, OntologyError::QueryConstruction(_)));
}
