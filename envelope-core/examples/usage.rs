use std::fs;
use std::time::Instant;

use envelope_core::models::config::Config;
use envelope_core::models::registry::MessageRegistry;
use envelope_core::models::schema::SchemaResource;

fn main() {
    let config = Config::from_file("tests/fixtures/config.json").expect("Failed to load config");
    let schema = SchemaResource::file("tests/fixtures/outgoing.xsd");
    let json = fs::read("tests/fixtures/credit_transfer.json").expect("Failed to read JSON file");

    let registry = MessageRegistry::with_default_kinds();

    let start = Instant::now();
    let message = registry.decode("pacs.008.001.08", &json).expect("Failed to decode message");
    let xml = registry
        .generate(&schema, "pacs.008.001.08", &config, message)
        .expect("Failed to generate message");
    println!("Generated in {:?}\n{}", start.elapsed(), String::from_utf8_lossy(&xml));

    let start = Instant::now();
    let parsed = registry.parse(&xml).expect("Failed to parse message");
    println!("Parsed in {:?}\n{}", start.elapsed(), parsed.to_json().expect("Failed to render JSON"));
}
