//! Depth-first crawlers driving visitors over a tree.
//!
//! Children are always visited in their stored order. The crawl is
//! synchronous and stops at the first error a callback returns.

use tracing::trace;

use super::tree::{Component, ComponentType};
use super::visitor::{Order, Path, PathAwareVisitor, TypeAwareVisitor};
use crate::Result;

fn dispatch<V: TypeAwareVisitor + ?Sized>(visitor: &mut V, component: &Component) -> Result<()> {
    visitor.visit_any(component)?;
    match component.component_type() {
        ComponentType::Project => visitor.visit_project(component),
        ComponentType::Module => visitor.visit_module(component),
        ComponentType::Directory => visitor.visit_directory(component),
        ComponentType::File => visitor.visit_file(component),
        ComponentType::View => visitor.visit_view(component),
        ComponentType::Subview => visitor.visit_subview(component),
        ComponentType::ProjectView => visitor.visit_project_view(component),
    }
}

fn dispatch_path<V: PathAwareVisitor>(
    visitor: &mut V,
    component: &Component,
    path: &mut Path<'_, V::Element>,
) -> Result<()> {
    visitor.visit_any(component, path)?;
    match component.component_type() {
        ComponentType::Project => visitor.visit_project(component, path),
        ComponentType::Module => visitor.visit_module(component, path),
        ComponentType::Directory => visitor.visit_directory(component, path),
        ComponentType::File => visitor.visit_file(component, path),
        ComponentType::View => visitor.visit_view(component, path),
        ComponentType::Subview => visitor.visit_subview(component, path),
        ComponentType::ProjectView => visitor.visit_project_view(component, path),
    }
}

/// Crawler for a single [`TypeAwareVisitor`].
pub struct TypeAwareCrawler<'v, V: TypeAwareVisitor + ?Sized> {
    visitor: &'v mut V,
}

impl<'v, V: TypeAwareVisitor + ?Sized> TypeAwareCrawler<'v, V> {
    pub fn new(visitor: &'v mut V) -> Self {
        Self { visitor }
    }

    /// Visit `root` and its descendants down to the visitor's depth limit.
    pub fn visit(&mut self, root: &Component) -> Result<()> {
        if !self.visitor.max_depth().allows(root.component_type()) {
            return Ok(());
        }
        self.visit_node(root)
    }

    fn visit_node(&mut self, component: &Component) -> Result<()> {
        trace!(component = component.key(), "visiting");
        let order = self.visitor.order();
        let max_depth = self.visitor.max_depth();

        if order == Order::PreOrder {
            dispatch(self.visitor, component)?;
        }
        for child in component.children() {
            if max_depth.allows(child.component_type()) {
                self.visit_node(child)?;
            }
        }
        if order == Order::PostOrder {
            dispatch(self.visitor, component)?;
        }
        Ok(())
    }
}

/// Crawler for a single [`PathAwareVisitor`].
pub struct PathAwareCrawler<'v, V: PathAwareVisitor> {
    visitor: &'v mut V,
}

impl<'v, V: PathAwareVisitor> PathAwareCrawler<'v, V> {
    pub fn new(visitor: &'v mut V) -> Self {
        Self { visitor }
    }

    /// Visit `root` and its descendants down to the visitor's depth limit.
    pub fn visit(&mut self, root: &Component) -> Result<()> {
        if !self.visitor.max_depth().allows(root.component_type()) {
            return Ok(());
        }
        let element = self.visitor.create_element(root);
        let mut path = Path::new(root, element);
        self.visit_node(root, &mut path)
    }

    fn visit_node<'a>(
        &mut self,
        component: &'a Component,
        path: &mut Path<'a, V::Element>,
    ) -> Result<()> {
        trace!(component = component.key(), depth = path.depth(), "visiting");
        let order = self.visitor.order();
        let max_depth = self.visitor.max_depth();

        if order == Order::PreOrder {
            dispatch_path(self.visitor, component, path)?;
        }
        for child in component.children() {
            if !max_depth.allows(child.component_type()) {
                continue;
            }
            let element = self.visitor.create_element(child);
            path.push(child, element);
            let result = self.visit_node(child, path);
            path.pop();
            result?;
        }
        if order == Order::PostOrder {
            dispatch_path(self.visitor, component, path)?;
        }
        Ok(())
    }
}

/// Runs several type-aware visitors in a single walk of the tree.
///
/// At each component, pre-order visitors run in registration order before
/// the children are visited, post-order visitors after. Each visitor only
/// sees components within its own depth limit.
pub struct VisitorsCrawler<'v> {
    visitors: Vec<&'v mut dyn TypeAwareVisitor>,
}

impl<'v> VisitorsCrawler<'v> {
    pub fn new(visitors: Vec<&'v mut dyn TypeAwareVisitor>) -> Self {
        Self { visitors }
    }

    pub fn visit(&mut self, root: &Component) -> Result<()> {
        self.visit_node(root)
    }

    fn visit_node(&mut self, component: &Component) -> Result<()> {
        let component_type = component.component_type();
        if !self
            .visitors
            .iter()
            .any(|v| v.max_depth().allows(component_type))
        {
            return Ok(());
        }

        self.dispatch_all(component, Order::PreOrder)?;
        for child in component.children() {
            self.visit_node(child)?;
        }
        self.dispatch_all(component, Order::PostOrder)
    }

    fn dispatch_all(&mut self, component: &Component, order: Order) -> Result<()> {
        for visitor in self.visitors.iter_mut() {
            if visitor.order() == order && visitor.max_depth().allows(component.component_type()) {
                dispatch(&mut **visitor, component)?;
            }
        }
        Ok(())
    }
}
