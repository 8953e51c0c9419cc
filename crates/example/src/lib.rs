//! Shared pieces of the dashboard example.

use std::sync::Arc;

use futures::FutureExt;
use futures::future;
use serde_json::json;
use weft_dom::{Document, NodeId, el};
use weft_loader::{
    ActionDef, ApplicationDefinition, CustomElementDef, ModuleExport, StaticResolver, StoreDef,
    WidgetDef,
};
use weft_registry::stock::{BlockWidget, FnAction, MemoryStore};
use weft_registry::{ArcWidget, CustomElementFactory};

/// The declarative composition of the dashboard.
///
/// The masthead widget is supplied inline; the menu custom element comes
/// from the "module" `mod:menu` to show lazy resolution.
#[must_use]
pub fn definition() -> ApplicationDefinition {
    ApplicationDefinition::new()
        .store(StoreDef::instance(
            "session",
            MemoryStore::with_state(json!({ "user": "ada" })),
        ))
        .action(ActionDef::instance(
            "log-click",
            FnAction::new(|payload| {
                tracing::info!(%payload, "click dispatched");
                payload
            }),
        ))
        .widget(
            WidgetDef::instance("masthead", BlockWidget::with_id("header", "masthead"))
        )
        .widget(
            WidgetDef::factory(
                "status-panel",
                Arc::new(|_, _| {
                    let widget: ArcWidget = BlockWidget::with_id("section", "status-panel");
                    future::ready(Ok(widget)).boxed()
                }),
            )
            .state_from("session")
            .listener("click", "log-click"),
        )
        .custom_element(CustomElementDef::factory_module("app-menu", "mod:menu"))
}

/// The resolver backing `mod:menu`.
#[must_use]
pub fn resolver() -> StaticResolver {
    let factory: CustomElementFactory = Arc::new(|| {
        let widget: ArcWidget = BlockWidget::new("ul");
        future::ready(Ok(widget)).boxed()
    });
    let resolver = StaticResolver::new();
    resolver.insert("mod:menu", ModuleExport::CustomElementFactory(factory));
    resolver
}

/// Builds the dashboard markup: one surface holding the masthead
/// placeholder, the status panel, and a menu element.
pub fn markup(doc: &mut Document) -> NodeId {
    el("projection-surface")
        .child(el("attach-widget").attr("id", "masthead"))
        .child(el("attach-widget").attr("data-widget-id", "status-panel"))
        .child(el("app-menu"))
        .build(doc)
}

/// Renders the subtree under `node` as indented text.
#[must_use]
pub fn dump(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    dump_into(doc, node, 0, &mut out);
    out
}

fn dump_into(doc: &Document, node: NodeId, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push('<');
    out.push_str(doc.tag(node));
    out.push_str(">\n");
    for child in doc.children(node) {
        dump_into(doc, *child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_app::Application;
    use weft_realize::DomDriver;
    use weft_dom::shared;

    #[tokio::test]
    async fn dashboard_realizes() {
        let app = Application::with_resolver(Arc::new(resolver()));
        app.load_definition(definition()).unwrap();

        let mut doc = Document::new();
        let root = markup(&mut doc);
        let doc = shared(doc);

        let handle = app.realize(&doc, root, &DomDriver).await.unwrap();
        let d = doc.read();
        assert_eq!(d.children(root).len(), 3);
        drop(d);
        handle.destroy();
    }
}
