//! Visitors over the component tree.
//!
//! A visitor declares the order it wants components in and how deep the
//! crawler may go. Type-aware visitors receive one callback per visited
//! component; path-aware visitors additionally see the chain of components
//! from the root down to the current one, each carrying a value of the
//! visitor's choosing (used to fold results bottom-up).

use serde::{Deserialize, Serialize};

use super::tree::{Component, ComponentType};
use crate::Result;

/// When a component's callback fires relative to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    /// Parent before its children
    PreOrder,
    /// Parent after all of its children
    PostOrder,
}

/// Deepest component type a crawler descends to, per tree family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlerDepthLimit {
    report: ComponentType,
    views: ComponentType,
}

impl CrawlerDepthLimit {
    pub const PROJECT: Self = Self {
        report: ComponentType::Project,
        views: ComponentType::View,
    };
    pub const MODULE: Self = Self {
        report: ComponentType::Module,
        views: ComponentType::Subview,
    };
    pub const DIRECTORY: Self = Self {
        report: ComponentType::Directory,
        views: ComponentType::Subview,
    };
    pub const FILE: Self = Self {
        report: ComponentType::File,
        views: ComponentType::ProjectView,
    };
    /// Deepest possible crawl.
    pub const LEAVES: Self = Self::FILE;

    /// Deepest type visited in a report tree.
    pub fn report_max_depth(&self) -> ComponentType {
        self.report
    }

    /// Deepest type visited in a views tree.
    pub fn views_max_depth(&self) -> ComponentType {
        self.views
    }

    fn limit_for(&self, component_type: ComponentType) -> ComponentType {
        if component_type.is_report_type() {
            self.report
        } else {
            self.views
        }
    }

    /// Whether components of this type are visited.
    pub fn allows(&self, component_type: ComponentType) -> bool {
        !component_type.is_deeper_than(self.limit_for(component_type))
    }

    /// Whether this type is exactly at the limit, i.e. a leaf of the crawl.
    pub fn is_leaf_depth(&self, component_type: ComponentType) -> bool {
        component_type == self.limit_for(component_type)
    }
}

impl Default for CrawlerDepthLimit {
    fn default() -> Self {
        Self::FILE
    }
}

/// Visitor called once per visited component, by type.
///
/// The crawler calls [`visit_any`](Self::visit_any) then the callback
/// matching the component's type. Any error aborts the crawl.
pub trait TypeAwareVisitor {
    fn order(&self) -> Order;

    fn max_depth(&self) -> CrawlerDepthLimit;

    fn visit_any(&mut self, _component: &Component) -> Result<()> {
        Ok(())
    }

    fn visit_project(&mut self, _project: &Component) -> Result<()> {
        Ok(())
    }

    fn visit_module(&mut self, _module: &Component) -> Result<()> {
        Ok(())
    }

    fn visit_directory(&mut self, _directory: &Component) -> Result<()> {
        Ok(())
    }

    fn visit_file(&mut self, _file: &Component) -> Result<()> {
        Ok(())
    }

    fn visit_view(&mut self, _view: &Component) -> Result<()> {
        Ok(())
    }

    fn visit_subview(&mut self, _subview: &Component) -> Result<()> {
        Ok(())
    }

    fn visit_project_view(&mut self, _project_view: &Component) -> Result<()> {
        Ok(())
    }
}

/// Visitor that also sees the path from the root to the current component.
pub trait PathAwareVisitor {
    /// Value attached to each component of the path
    type Element;

    fn order(&self) -> Order;

    fn max_depth(&self) -> CrawlerDepthLimit;

    /// Value for a component, created when the crawler enters it.
    fn create_element(&mut self, component: &Component) -> Self::Element;

    fn visit_any(
        &mut self,
        _component: &Component,
        _path: &mut Path<'_, Self::Element>,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_project(
        &mut self,
        _project: &Component,
        _path: &mut Path<'_, Self::Element>,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_module(
        &mut self,
        _module: &Component,
        _path: &mut Path<'_, Self::Element>,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_directory(
        &mut self,
        _directory: &Component,
        _path: &mut Path<'_, Self::Element>,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_file(&mut self, _file: &Component, _path: &mut Path<'_, Self::Element>) -> Result<()> {
        Ok(())
    }

    fn visit_view(&mut self, _view: &Component, _path: &mut Path<'_, Self::Element>) -> Result<()> {
        Ok(())
    }

    fn visit_subview(
        &mut self,
        _subview: &Component,
        _path: &mut Path<'_, Self::Element>,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_project_view(
        &mut self,
        _project_view: &Component,
        _path: &mut Path<'_, Self::Element>,
    ) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct PathElement<'a, T> {
    component: &'a Component,
    element: T,
}

/// Components from the root down to the current one, with their elements.
#[derive(Debug)]
pub struct Path<'a, T> {
    ancestors: Vec<PathElement<'a, T>>,
    current: PathElement<'a, T>,
}

impl<'a, T> Path<'a, T> {
    pub(crate) fn new(root: &'a Component, element: T) -> Self {
        Self {
            ancestors: Vec::new(),
            current: PathElement {
                component: root,
                element,
            },
        }
    }

    pub(crate) fn push(&mut self, component: &'a Component, element: T) {
        let parent = std::mem::replace(&mut self.current, PathElement { component, element });
        self.ancestors.push(parent);
    }

    /// Leave the current component, returning its element. No-op on the root.
    pub(crate) fn pop(&mut self) -> Option<T> {
        let parent = self.ancestors.pop()?;
        Some(std::mem::replace(&mut self.current, parent).element)
    }

    pub fn current(&self) -> &T {
        &self.current.element
    }

    pub fn current_mut(&mut self) -> &mut T {
        &mut self.current.element
    }

    pub fn current_component(&self) -> &'a Component {
        self.current.component
    }

    /// Element of the parent; `None` on the root.
    pub fn parent(&self) -> Option<&T> {
        self.ancestors.last().map(|p| &p.element)
    }

    pub fn parent_mut(&mut self) -> Option<&mut T> {
        self.ancestors.last_mut().map(|p| &mut p.element)
    }

    /// Current element together with the parent's, for folding one into the other.
    pub fn current_and_parent_mut(&mut self) -> (&T, Option<&mut T>) {
        (
            &self.current.element,
            self.ancestors.last_mut().map(|p| &mut p.element),
        )
    }

    pub fn root(&self) -> &T {
        self.ancestors
            .first()
            .map_or(&self.current.element, |root| &root.element)
    }

    pub fn is_root(&self) -> bool {
        self.ancestors.is_empty()
    }

    /// Number of ancestors of the current component.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Components of the path, root first.
    pub fn components(&self) -> impl Iterator<Item = &'a Component> + '_ {
        self.ancestors
            .iter()
            .map(|p| p.component)
            .chain(std::iter::once(self.current.component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(component_type: ComponentType, reference: i32) -> Component {
        Component::report_builder(component_type, reference).build().unwrap()
    }

    #[test]
    fn test_depth_limit_allows() {
        let limit = CrawlerDepthLimit::DIRECTORY;

        assert!(limit.allows(ComponentType::Project));
        assert!(limit.allows(ComponentType::Directory));
        assert!(!limit.allows(ComponentType::File));
        assert!(limit.allows(ComponentType::Subview));
        assert!(!limit.allows(ComponentType::ProjectView));
    }

    #[test]
    fn test_leaf_depth() {
        let limit = CrawlerDepthLimit::FILE;

        assert!(limit.is_leaf_depth(ComponentType::File));
        assert!(limit.is_leaf_depth(ComponentType::ProjectView));
        assert!(!limit.is_leaf_depth(ComponentType::Directory));
        assert_eq!(CrawlerDepthLimit::default(), CrawlerDepthLimit::FILE);
    }

    #[test]
    fn test_path_push_pop() {
        let project = component(ComponentType::Project, 1);
        let directory = component(ComponentType::Directory, 2);
        let file = component(ComponentType::File, 3);

        let mut path = Path::new(&project, 1);
        assert!(path.is_root());
        assert_eq!(path.parent(), None);

        path.push(&directory, 2);
        path.push(&file, 3);
        assert_eq!(*path.current(), 3);
        assert_eq!(path.parent(), Some(&2));
        assert_eq!(*path.root(), 1);
        assert_eq!(path.depth(), 2);
        assert_eq!(
            path.components().map(|c| c.key()).collect::<Vec<_>>(),
            vec!["1", "2", "3"]
        );

        let (current, parent) = path.current_and_parent_mut();
        if let Some(parent) = parent {
            *parent += *current;
        }
        assert_eq!(path.pop(), Some(3));
        assert_eq!(*path.current(), 5);
        assert_eq!(path.pop(), Some(5));
        assert_eq!(path.pop(), None);
        assert_eq!(*path.current(), 1);
    }
}
