#![no_main]

use docql_core::query::parser::Parser;
use docql_core::query::{PassThroughObserver, QueryType, SelectQueryParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (ignore invalid UTF-8)
    if let Ok(text) = std::str::from_utf8(data) {
        // Parsing and classification must never panic
        if let Ok(mut parser) = Parser::new(text) {
            if let Ok(statement) = parser.parse() {
                let _ = statement.to_string();
            }
        }
        let _ = QueryType::classify(text);

        // Nor may translation of whatever parses
        let _ = SelectQueryParser::new().compile(text, &PassThroughObserver);
    }
});
