//! Build-time and query-time tokenization must agree.
//!
//! `fixtures/tokenizer_cases.json` lists inputs with their expected terms.
//! The Rust tokenizer is checked against it directly. The bundled
//! `search-engine.js` is checked against the same list when `node` is on the
//! `PATH`.

use std::{path::Path, process::Command};

use bookdex_search::tokenizer::tokenize;
use serde::Deserialize;

const CASES: &str = include_str!("fixtures/tokenizer_cases.json");

const NODE_RUNNER: &str = r#"
const fs = require("fs");
const vm = require("vm");
const ctx = {};
ctx.window = ctx;
vm.createContext(ctx);
vm.runInContext(fs.readFileSync(process.argv[1], "utf8"), ctx);
const cases = JSON.parse(fs.readFileSync(process.argv[2], "utf8"));
process.stdout.write(JSON.stringify(cases.map((c) => ctx.BookdexSearch.tokenize(c.input))));
"#;

#[derive(Debug, Deserialize)]
struct Case {
    input: String,
    terms: Vec<String>,
}

fn cases() -> Vec<Case> {
    serde_json::from_str(CASES).unwrap()
}

#[test]
fn test_rust_tokenizer_matches_cases() {
    let cases = cases();
    assert!(cases.iter().any(|c| !c.input.is_ascii()));

    for case in cases {
        assert_eq!(tokenize(&case.input), case.terms, "input: {:?}", case.input);
    }
}

#[test]
fn test_js_tokenizer_matches_cases() {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    let engine = manifest.join("assets/search-engine.js");
    let fixture = manifest.join("tests/fixtures/tokenizer_cases.json");

    let output = match Command::new("node")
        .arg("-e")
        .arg(NODE_RUNNER)
        .arg(&engine)
        .arg(&fixture)
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            eprintln!("skipping JS tokenizer check, node unavailable: {e}");
            return;
        }
    };
    assert!(
        output.status.success(),
        "node failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let js_terms: Vec<Vec<String>> = serde_json::from_slice(&output.stdout).unwrap();
    let cases = cases();
    assert_eq!(js_terms.len(), cases.len());

    for (case, terms) in cases.iter().zip(js_terms) {
        assert_eq!(terms, case.terms, "input: {:?}", case.input);
        assert_eq!(terms, tokenize(&case.input));
    }
}
