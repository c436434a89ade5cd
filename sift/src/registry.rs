use crate::schema::FieldDescriptor;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Introspection record for one searchable shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDescriptor {
    pub shape: &'static str,
    pub fields: Vec<FieldDescriptor>,
    pub text_search_fields: &'static [&'static str],
    pub default_sort: Option<&'static str>,
}

static REGISTRY: OnceLock<RwLock<HashMap<String, ShapeDescriptor>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, ShapeDescriptor>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

fn shape_key(shape: &str) -> String {
    shape.to_ascii_lowercase()
}

pub fn register_shape(descriptor: ShapeDescriptor) {
    let key = shape_key(descriptor.shape);
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, descriptor);
}

/// Look a registered shape up by name, ignoring ASCII case.
pub fn get_shape(shape: &str) -> Option<ShapeDescriptor> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&shape_key(shape))
        .cloned()
}

/// All registered shapes, sorted by name.
pub fn registered_shapes() -> Vec<ShapeDescriptor> {
    let mut shapes: Vec<ShapeDescriptor> = registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .values()
        .cloned()
        .collect();
    shapes.sort_by(|a, b| a.shape.cmp(b.shape));
    shapes
}
