#![no_main]

use libfuzzer_sys::fuzz_target;
use result_catalog::prelude::*;

fuzz_target!(|data: &[u8]| {
    // Every line that parses as a JSON object becomes a stored metadata entity
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let entities: Vec<Document> = text
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    let documents = InMemoryDocumentStore::new();
    let store = DocumentEntityStore::new(&documents);
    if store.store_entities("fuzz", entities).is_err() {
        return;
    }

    // Loading must fail with an error, never panic
    if let Ok(catalog) = ResultCatalog::load("fuzz", &store) {
        let _ = catalog.campaign().check_consistency();
        let _ = OverviewTable::for_campaign(catalog.campaign()).to_string();
        let _ = validate_collection("fuzz", &documents, &store);
    }
});
