#![allow(dead_code)]

use folio_content::{ContentConfig, ContentEngine, CurrentActor, Model};
use folio_types::{Fields, Languages, ModelId, ModelKind};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn engine() -> Arc<ContentEngine> {
    init_tracing();
    Arc::new(ContentEngine::default())
}

/// An engine whose current actor can be switched by the test.
pub fn engine_with_actor(config: ContentConfig) -> (Arc<ContentEngine>, Arc<CurrentActor>) {
    init_tracing();
    let actor = Arc::new(CurrentActor::new());
    let engine = ContentEngine::new(config).unwrap().with_actor(actor.clone());
    (Arc::new(engine), actor)
}

pub fn languages() -> Languages {
    Languages::from_codes(["en", "de"]).unwrap()
}

pub fn page(engine: &Arc<ContentEngine>) -> Arc<Model> {
    engine
        .model(ModelId::generate(), ModelKind::Page)
        .languages(languages())
        .build()
}

pub fn title(value: &str) -> Fields {
    Fields::from([("title", value)])
}
