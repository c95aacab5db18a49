//! visitor pattern helpers
mod visit_objects;
pub use visit_objects::VisitObjectsMut;

/// Visitor that mutates the nodes it is handed
pub trait VisitMut<T> {
    fn visit_mut(&mut self, value: &mut T);
}

// blanket impl for FnMut
impl<T, F> VisitMut<T> for F
where
    F: FnMut(&mut T),
{
    fn visit_mut(&mut self, value: &mut T) {
        self(value)
    }
}
