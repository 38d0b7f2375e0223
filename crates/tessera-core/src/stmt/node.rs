use super::{Visit, VisitMut};

/// A visitable node of the query IR.
pub trait Node {
    fn visit<V: Visit>(&self, visit: V);
    fn visit_mut<V: VisitMut>(&mut self, visit: V);
}
