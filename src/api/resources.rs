//! Registry of resources shown in the admin navigation.
//!
//! Owned by the [`AdminApp`](crate::api::app::AdminApp) that builds the
//! router; there is no process-wide registry.

use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource {
    /// A page bound to a model, keyed by the model's name.
    Model { label: String, model: String },
    /// An external or custom link.
    Link { label: String, url: String },
    /// A menu group.
    Dropdown {
        label: String,
        resources: Vec<Resource>,
    },
}

impl Resource {
    pub fn model(label: impl Into<String>, model: impl Into<String>) -> Self {
        Self::Model {
            label: label.into(),
            model: model.into(),
        }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Link {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn dropdown(label: impl Into<String>, resources: Vec<Resource>) -> Self {
        Self::Dropdown {
            label: label.into(),
            resources,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Model { label, .. } | Self::Link { label, .. } | Self::Dropdown { label, .. } => {
                label
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
    // model name -> path of indices into `resources`
    by_model: HashMap<String, Vec<usize>>,
}

impl ResourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource and index every model it contains.
    ///
    /// A later registration for the same model wins the lookup.
    pub fn register(&mut self, resource: Resource) {
        let index = self.resources.len();
        Self::index_models(&mut self.by_model, &resource, vec![index]);
        self.resources.push(resource);
    }

    fn index_models(
        by_model: &mut HashMap<String, Vec<usize>>,
        resource: &Resource,
        path: Vec<usize>,
    ) {
        match resource {
            Resource::Model { model, .. } => {
                by_model.insert(model.clone(), path);
            }
            Resource::Dropdown { resources, .. } => {
                for (i, child) in resources.iter().enumerate() {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    Self::index_models(by_model, child, child_path);
                }
            }
            Resource::Link { .. } => {}
        }
    }

    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// The model resource registered for `model`, searching inside dropdowns.
    #[must_use]
    pub fn model_resource(&self, model: &str) -> Option<&Resource> {
        let path = self.by_model.get(model)?;
        let (first, rest) = path.split_first()?;
        let mut current = self.resources.get(*first)?;
        for index in rest {
            match current {
                Resource::Dropdown { resources, .. } => current = resources.get(*index)?,
                _ => return None,
            }
        }
        Some(current)
    }
}
