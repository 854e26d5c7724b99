//! The component tree measures are computed over.
//!
//! A tree is either a report tree (project → module → directory → file) or a
//! views tree (view → sub-view → project-view). Each node owns its children;
//! the tree is built once and never reshaped afterwards.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;
use crate::Result;

/// Type of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    Project,
    Module,
    Directory,
    File,
    View,
    Subview,
    ProjectView,
}

impl ComponentType {
    pub fn is_report_type(self) -> bool {
        matches!(
            self,
            ComponentType::Project
                | ComponentType::Module
                | ComponentType::Directory
                | ComponentType::File
        )
    }

    pub fn is_views_type(self) -> bool {
        !self.is_report_type()
    }

    /// Depth of the type within its own family, the root type being 0.
    pub fn depth(self) -> u8 {
        match self {
            ComponentType::Project | ComponentType::View => 0,
            ComponentType::Module | ComponentType::Subview => 1,
            ComponentType::Directory | ComponentType::ProjectView => 2,
            ComponentType::File => 3,
        }
    }

    /// Whether both types belong to the same family (report or views).
    pub fn is_same_family(self, other: ComponentType) -> bool {
        self.is_report_type() == other.is_report_type()
    }

    /// `true` if `self` sits strictly below `other` in the same family.
    pub fn is_deeper_than(self, other: ComponentType) -> bool {
        self.is_same_family(other) && self.depth() > other.depth()
    }

    /// `true` if `self` sits strictly above `other` in the same family.
    pub fn is_higher_than(self, other: ComponentType) -> bool {
        self.is_same_family(other) && self.depth() < other.depth()
    }

    /// Whether a component of this type can have a child of type `child`.
    ///
    /// Children sit deeper in the same family; only modules and sub-views
    /// nest within their own type. Files and project views have no children.
    pub fn can_contain(self, child: ComponentType) -> bool {
        child.is_deeper_than(self)
            || (child == self && matches!(self, ComponentType::Module | ComponentType::Subview))
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentType::Project => "PROJECT",
            ComponentType::Module => "MODULE",
            ComponentType::Directory => "DIRECTORY",
            ComponentType::File => "FILE",
            ComponentType::View => "VIEW",
            ComponentType::Subview => "SUBVIEW",
            ComponentType::ProjectView => "PROJECT_VIEW",
        };
        f.write_str(name)
    }
}

/// Attributes of components coming from an analysis report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAttributes {
    /// Reference of the component in the report
    pub reference: i32,
    /// Version of the project or module
    pub version: Option<String>,
    /// Path relative to the module base directory
    pub path: Option<String>,
}

/// Attributes only files carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttributes {
    pub unit_test: bool,
    pub language_key: Option<String>,
}

/// Attributes of a project referenced from a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectViewAttributes {
    /// Uuid of the referenced project
    pub project_uuid: String,
}

#[derive(Debug, Clone)]
enum Variant {
    Report {
        report: ReportAttributes,
        file: Option<FileAttributes>,
    },
    Views {
        project_view: Option<ProjectViewAttributes>,
    },
}

/// One node of the tree.
///
/// Two components are equal when their keys are equal.
#[derive(Debug, Clone)]
pub struct Component {
    component_type: ComponentType,
    key: String,
    uuid: Option<String>,
    name: String,
    children: Vec<Component>,
    variant: Variant,
}

impl Component {
    /// Start building a report component.
    pub fn report_builder(component_type: ComponentType, reference: i32) -> ReportComponentBuilder {
        ReportComponentBuilder::new(component_type, reference)
    }

    /// Start building a views component.
    pub fn views_builder(
        component_type: ComponentType,
        key: impl Into<String>,
    ) -> ViewsComponentBuilder {
        ViewsComponentBuilder::new(component_type, key.into())
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Uuid assigned by the tree source, if any.
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn report_attributes(&self) -> Result<&ReportAttributes> {
        match &self.variant {
            Variant::Report { report, .. } => Ok(report),
            Variant::Views { .. } => Err(self.unavailable("report")),
        }
    }

    pub fn file_attributes(&self) -> Result<&FileAttributes> {
        match &self.variant {
            Variant::Report {
                file: Some(file), ..
            } => Ok(file),
            _ => Err(self.unavailable("file")),
        }
    }

    pub fn project_view_attributes(&self) -> Result<&ProjectViewAttributes> {
        match &self.variant {
            Variant::Views {
                project_view: Some(attributes),
            } => Ok(attributes),
            _ => Err(self.unavailable("project view")),
        }
    }

    fn unavailable(&self, attributes: &'static str) -> MeasureError {
        MeasureError::AttributesUnavailable {
            component_type: self.component_type,
            attributes,
        }
    }

    fn check_children(&self) -> Result<()> {
        for child in &self.children {
            if !self.component_type.can_contain(child.component_type) {
                return Err(MeasureError::InvalidComponent {
                    key: self.key.clone(),
                    message: format!(
                        "child '{}' of type {} can not be added to a {}",
                        child.key, child.component_type, self.component_type
                    ),
                });
            }
        }
        Ok(())
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Component {}

impl Hash for Component {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Builder for components of a report tree.
///
/// The key defaults to the reference, the name to the key.
#[derive(Debug, Clone)]
pub struct ReportComponentBuilder {
    component_type: ComponentType,
    reference: i32,
    key: Option<String>,
    uuid: Option<String>,
    name: Option<String>,
    version: Option<String>,
    path: Option<String>,
    file_attributes: Option<FileAttributes>,
    children: Vec<Component>,
}

impl ReportComponentBuilder {
    fn new(component_type: ComponentType, reference: i32) -> Self {
        Self {
            component_type,
            reference,
            key: None,
            uuid: None,
            name: None,
            version: None,
            path: None,
            file_attributes: None,
            children: Vec::new(),
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn file_attributes(mut self, attributes: FileAttributes) -> Self {
        self.file_attributes = Some(attributes);
        self
    }

    pub fn child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Component>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn build(self) -> Result<Component> {
        let key = self.key.unwrap_or_else(|| self.reference.to_string());
        if !self.component_type.is_report_type() {
            return Err(MeasureError::InvalidComponent {
                key,
                message: format!("{} is not a report type", self.component_type),
            });
        }
        if self.file_attributes.is_some() && self.component_type != ComponentType::File {
            return Err(MeasureError::InvalidComponent {
                key,
                message: "only files carry file attributes".to_string(),
            });
        }
        let file = match self.component_type {
            ComponentType::File => Some(self.file_attributes.unwrap_or_default()),
            _ => None,
        };
        let component = Component {
            component_type: self.component_type,
            name: self.name.unwrap_or_else(|| key.clone()),
            key,
            uuid: self.uuid,
            children: self.children,
            variant: Variant::Report {
                report: ReportAttributes {
                    reference: self.reference,
                    version: self.version,
                    path: self.path,
                },
                file,
            },
        };
        component.check_children()?;
        Ok(component)
    }
}

/// Builder for components of a views tree.
#[derive(Debug, Clone)]
pub struct ViewsComponentBuilder {
    component_type: ComponentType,
    key: String,
    uuid: Option<String>,
    name: Option<String>,
    project_view_attributes: Option<ProjectViewAttributes>,
    children: Vec<Component>,
}

impl ViewsComponentBuilder {
    fn new(component_type: ComponentType, key: String) -> Self {
        Self {
            component_type,
            key,
            uuid: None,
            name: None,
            project_view_attributes: None,
            children: Vec::new(),
        }
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn project_view_attributes(mut self, attributes: ProjectViewAttributes) -> Self {
        self.project_view_attributes = Some(attributes);
        self
    }

    pub fn child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Component>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn build(self) -> Result<Component> {
        if !self.component_type.is_views_type() {
            return Err(MeasureError::InvalidComponent {
                key: self.key,
                message: format!("{} is not a views type", self.component_type),
            });
        }
        let is_project_view = self.component_type == ComponentType::ProjectView;
        match (is_project_view, &self.project_view_attributes) {
            (true, None) => {
                return Err(MeasureError::InvalidComponent {
                    key: self.key,
                    message: "a project view requires project view attributes".to_string(),
                })
            }
            (false, Some(_)) => {
                return Err(MeasureError::InvalidComponent {
                    key: self.key,
                    message: "only project views carry project view attributes".to_string(),
                })
            }
            _ => {}
        }
        let component = Component {
            component_type: self.component_type,
            name: self.name.unwrap_or_else(|| self.key.clone()),
            key: self.key,
            uuid: self.uuid,
            children: self.children,
            variant: Variant::Views {
                project_view: self.project_view_attributes,
            },
        };
        component.check_children()?;
        Ok(component)
    }
}

/// Holder of the root of the tree, with lookups by key and by report reference.
#[derive(Debug, Clone)]
pub struct ComponentTree {
    root: Component,
    // child indexes leading from the root to each component
    paths_by_key: HashMap<String, Vec<usize>>,
    keys_by_ref: HashMap<i32, String>,
}

impl ComponentTree {
    /// Wrap a fully built tree. Keys must be unique across the tree.
    pub fn new(root: Component) -> Result<Self> {
        let mut paths_by_key = HashMap::new();
        let mut keys_by_ref = HashMap::new();
        let mut path = Vec::new();
        index(&root, &mut path, &mut paths_by_key, &mut keys_by_ref)?;
        Ok(Self {
            root,
            paths_by_key,
            keys_by_ref,
        })
    }

    pub fn root(&self) -> &Component {
        &self.root
    }

    pub fn component_by_key(&self, key: &str) -> Result<&Component> {
        let path = self
            .paths_by_key
            .get(key)
            .ok_or_else(|| MeasureError::ComponentNotFound(key.to_string()))?;
        Ok(path
            .iter()
            .fold(&self.root, |component, &index| &component.children[index]))
    }

    pub fn component_by_ref(&self, reference: i32) -> Result<&Component> {
        let key = self
            .keys_by_ref
            .get(&reference)
            .ok_or(MeasureError::ComponentRefNotFound(reference))?;
        self.component_by_key(key)
    }

    /// Number of components in the tree.
    pub fn len(&self) -> usize {
        self.paths_by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths_by_key.is_empty()
    }
}

fn index(
    component: &Component,
    path: &mut Vec<usize>,
    paths_by_key: &mut HashMap<String, Vec<usize>>,
    keys_by_ref: &mut HashMap<i32, String>,
) -> Result<()> {
    if paths_by_key
        .insert(component.key.clone(), path.clone())
        .is_some()
    {
        return Err(MeasureError::DuplicateComponent(component.key.clone()));
    }
    if let Variant::Report { report, .. } = &component.variant {
        if keys_by_ref
            .insert(report.reference, component.key.clone())
            .is_some()
        {
            return Err(MeasureError::DuplicateComponentRef(report.reference));
        }
    }
    for (i, child) in component.children.iter().enumerate() {
        path.push(i);
        index(child, path, paths_by_key, keys_by_ref)?;
        path.pop();
    }
    Ok(())
}
