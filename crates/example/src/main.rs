//! Example dashboard binary.
//!
//! Composes a small application from a declarative definition and realizes
//! it into an in-memory document.
//!
//! ```bash
//! cargo run -p example --bin dashboard
//! ```

use std::sync::Arc;

use example::{definition, dump, markup, resolver};
use weft_app::{Application, TelemetryConfig, TelemetryFormat};
use weft_dom::{Document, shared};
use weft_realize::DomDriver;

#[tokio::main]
async fn main() {
    TelemetryConfig::new()
        .with_format(TelemetryFormat::Compact)
        .with_env_filter("weft=debug,example=info")
        .init();

    let app = Application::with_resolver(Arc::new(resolver()));
    let batch = match app.load_definition(definition()) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut doc = Document::new();
    let root = markup(&mut doc);
    let doc = shared(doc);
    tracing::info!("before realize:\n{}", dump(&doc.read(), root));

    let handle = match app.realize(&doc, root, &DomDriver).await {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("after realize:\n{}", dump(&doc.read(), root));

    handle.destroy();
    batch.destroy();
}
