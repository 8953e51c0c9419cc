//! The realization engine.
//!
//! `realize` reconciles a markup subtree with live widget instances: it
//! reconstructs the projection-surface forest, resolves every custom element
//! to a widget (attachment or factory creation) in parallel, validates the
//! complete resolved set, assembles the widget hierarchy bottom-up, attaches
//! one projector per surface, and swaps the placeholder elements for the
//! rendered output. Any failure rejects the whole call; the document is
//! untouched until projector attachment begins.

use std::collections::VecDeque;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use hashbrown::{HashMap, HashSet};
use tracing::debug;
use weft_dom::{NodeId, SharedDocument};
use weft_registry::{ATTACH_WIDGET, Appendable, ArcWidget, CombinedRegistry, Widget};

use crate::error::RealizeError;
use crate::handle::RealizationHandle;
use crate::projector::{Projector, RenderDriver};
use crate::tree::{SurfaceForest, custom_elements_by_surface};

struct SurfacePlan {
    projector: Box<dyn Projector>,
    surface: usize,
    placeholders: Vec<NodeId>,
}

type WidgetResolution = BoxFuture<'static, Result<(usize, ArcWidget, bool), RealizeError>>;

/// Realizes the subtree under `root` against `registry`, rendering through
/// `driver`.
///
/// Returns a handle owning every projector and factory-created widget; see
/// [`RealizationHandle`]. The document is only mutated once every widget has
/// resolved and validated.
///
/// # Errors
///
/// Structural errors ([`RealizeError::UnrootedCustomTag`],
/// [`RealizeError::NestedSurface`]), resolution failures, and attachment
/// validation failures ([`RealizeError::DuplicateWidget`],
/// [`RealizeError::AlreadyParented`]) all reject the call.
pub async fn realize(
    registry: &CombinedRegistry,
    doc: &SharedDocument,
    root: NodeId,
    driver: &dyn RenderDriver,
) -> Result<RealizationHandle, RealizeError> {
    let forest = {
        let d = doc.read();
        custom_elements_by_surface(&d, root, registry)?
    };
    debug!(
        surfaces = forest.surfaces.len(),
        custom_elements = forest.nodes.len(),
        "realizing subtree"
    );

    // One projector per surface; the surface's immediate custom elements are
    // the placeholders replaced after rendering.
    let mut plans: Vec<SurfacePlan> = forest
        .surfaces
        .iter()
        .map(|&surface| SurfacePlan {
            projector: driver.create_projector(doc.clone(), forest.nodes[surface].element),
            surface,
            placeholders: forest.child_elements(surface),
        })
        .collect();

    let (pending, append_order) = queue_resolutions(registry, doc, &forest)?;

    // Parallel, unordered completion; the step succeeds only when all do.
    let resolved = future::try_join_all(pending).await?;

    let mut widgets: HashMap<usize, ArcWidget> = HashMap::with_capacity(resolved.len());
    let mut managed: Vec<ArcWidget> = Vec::new();
    for (index, widget, is_managed) in resolved {
        if is_managed {
            managed.push(widget.clone());
        }
        widgets.insert(index, widget);
    }

    // Validate the complete set before any mutation, so a failure leaves no
    // partial hierarchy behind.
    let mut seen: HashSet<usize> = HashSet::with_capacity(widgets.len());
    for widget in widgets.values() {
        let identity = std::sync::Arc::as_ptr(widget).cast::<()>() as usize;
        if !seen.insert(identity) {
            return Err(RealizeError::DuplicateWidget);
        }
        if widget.parent_id().is_some() {
            return Err(RealizeError::AlreadyParented);
        }
    }

    // Hierarchy assembly, children before parents.
    for &index in append_order.iter().rev() {
        let parent = widgets[&index].clone();
        for &child in &forest.nodes[index].children {
            parent.append(widgets[&child].clone())?;
        }
    }

    // Hand each surface's top-level widgets to its projector, then attach
    // all surfaces in parallel.
    for plan in &mut plans {
        for &child in &forest.nodes[plan.surface].children {
            plan.projector.append(widgets[&child].clone());
        }
    }
    future::try_join_all(plans.iter_mut().map(|plan| plan.projector.merge())).await?;

    swap_placeholders(doc, &forest, &plans)?;

    Ok(RealizationHandle::new(
        plans.into_iter().map(|plan| plan.projector).collect(),
        managed,
    ))
}

/// Walks each surface's children breadth-first, building one resolution
/// future per custom element plus the append queue (parents in visit order;
/// the caller walks it in reverse so children are assembled first).
fn queue_resolutions(
    registry: &CombinedRegistry,
    doc: &SharedDocument,
    forest: &SurfaceForest,
) -> Result<(Vec<WidgetResolution>, Vec<usize>), RealizeError> {
    let d = doc.read();
    let mut queue: VecDeque<usize> = VecDeque::new();
    for &surface in &forest.surfaces {
        queue.extend(forest.nodes[surface].children.iter().copied());
    }

    let mut pending: Vec<WidgetResolution> = Vec::new();
    let mut append_order: Vec<usize> = Vec::new();

    while let Some(index) = queue.pop_front() {
        let node = &forest.nodes[index];
        if node.is == ATTACH_WIDGET {
            let widget_id = d
                .attribute(node.element, "data-widget-id")
                .or_else(|| d.attribute(node.element, "id"))
                .ok_or(RealizeError::MissingWidgetId)?
                .to_string();
            let resolution = registry.get_widget(&widget_id);
            pending.push(
                async move { Ok((index, resolution.await?, false)) }.boxed(),
            );
        } else {
            let factory =
                registry
                    .get_custom_element_factory(&node.is)
                    .ok_or_else(|| RealizeError::MissingFactory {
                        name: node.is.clone(),
                    })?;
            pending.push(async move { Ok((index, factory().await?, true)) }.boxed());
        }

        if !node.children.is_empty() {
            append_order.push(index);
            queue.extend(node.children.iter().copied());
        }
    }

    Ok((pending, append_order))
}

/// Replaces each surface's placeholders, in order, with the rendered nodes
/// at the tail of the surface root's children. Render order matches append
/// order, so the mapping is positional.
fn swap_placeholders(
    doc: &SharedDocument,
    forest: &SurfaceForest,
    plans: &[SurfacePlan],
) -> Result<(), RealizeError> {
    let mut d = doc.write();
    for plan in plans {
        let count = plan.placeholders.len();
        if count == 0 {
            continue;
        }
        let surface_element = forest.nodes[plan.surface].element;
        let children = d.children(surface_element);
        if children.len() < count {
            return Err(RealizeError::RenderShortfall {
                surface: surface_element,
            });
        }
        let rendered: Vec<NodeId> = children[children.len() - count..].to_vec();
        for (&placeholder, fresh) in plan.placeholders.iter().zip(rendered) {
            d.replace_with(placeholder, fresh)?;
        }
    }
    Ok(())
}
