use super::VisitMut;
use crate::document::{Document, Object};

/// Recursively visit all mappings of a [Document] mutably
///
/// A mapping is handed to the visitor before its values are descended into, so
/// entries the visitor removes are never visited.
pub trait VisitObjectsMut {
    fn visit_objects_mut(&mut self, visitor: &mut dyn VisitMut<Object>);
}

impl VisitObjectsMut for Document {
    fn visit_objects_mut(&mut self, visitor: &mut dyn VisitMut<Object>) {
        match self {
            Document::Object(object) => object.visit_objects_mut(visitor),
            Document::Array(array) => {
                for element in array {
                    element.visit_objects_mut(visitor);
                }
            }
            Document::Null | Document::Bool(_) | Document::Number(_) | Document::String(_) => {}
        }
    }
}

impl VisitObjectsMut for Object {
    fn visit_objects_mut(&mut self, visitor: &mut dyn VisitMut<Object>) {
        visitor.visit_mut(self);
        for value in self.values_mut() {
            value.visit_objects_mut(visitor);
        }
    }
}
