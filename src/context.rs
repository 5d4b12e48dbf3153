//! Per-algorithm context containers.
//!
//! A context binds to a fragment when it is created; from then on the
//! fragment's inner vertices are the sole valid addressing domain for
//! its accessors.

use crate::fragment::Fragment;
use crate::vertex::{Vertex, VertexValues};
use derive_more::Display;

pub const CONTEXT_TYPE_VERTEX_DATA: &str = "vertex_data";
pub const CONTEXT_TYPE_VOID: &str = "void";
pub const CONTEXT_TYPE_TENSOR: &str = "tensor";

#[derive(Debug, Display, PartialEq)]
pub enum ContextError {
    #[display(fmt = "empty tensor shape")]
    EmptyShape,
}

impl std::error::Error for ContextError {}

pub type Result<T> = std::result::Result<T, ContextError>;

pub trait ContextBase {
    fn context_type(&self) -> &'static str;
}

/// A context holding one value per inner vertex of its fragment.
pub struct VertexDataContext<'a, F: Fragment, T> {
    fragment: &'a F,
    data: VertexValues<T, F::Id>,
}

impl<'a, F: Fragment, T: Default + Clone> VertexDataContext<'a, F, T> {
    pub fn new(fragment: &'a F) -> Self {
        let mut data = VertexValues::new();
        data.init(fragment.inner_vertices());
        Self { fragment, data }
    }

    pub fn fragment(&self) -> &F {
        self.fragment
    }

    pub fn set_all(&mut self, value: &T) {
        self.data.set_value_all(value);
    }

    pub fn set_value(&mut self, v: Vertex<F::Id>, value: T) {
        self.data[v] = value;
    }

    pub fn get_value(&self, v: Vertex<F::Id>) -> &T {
        &self.data[v]
    }

    pub fn data(&self) -> &VertexValues<T, F::Id> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut VertexValues<T, F::Id> {
        &mut self.data
    }
}

impl<'a, F: Fragment, T> ContextBase for VertexDataContext<'a, F, T> {
    fn context_type(&self) -> &'static str {
        CONTEXT_TYPE_VERTEX_DATA
    }
}

/// A context for algorithms that keep no per-vertex results.
pub struct VoidContext<'a, F> {
    fragment: &'a F,
}

impl<'a, F: Fragment> VoidContext<'a, F> {
    pub fn new(fragment: &'a F) -> Self {
        Self { fragment }
    }

    pub fn fragment(&self) -> &F {
        self.fragment
    }
}

impl<'a, F> ContextBase for VoidContext<'a, F> {
    fn context_type(&self) -> &'static str {
        CONTEXT_TYPE_VOID
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Element types a [`TensorContext`] can hold. Sealed, so an
/// unsupported type is a compile error rather than a runtime failure.
pub trait TensorData: Copy + Default + sealed::Sealed {}

impl<T: Copy + Default + sealed::Sealed> TensorData for T {}

/// A context holding a tensor-shaped result.
pub struct TensorContext<'a, F, T: TensorData> {
    fragment: &'a F,
    data: Vec<T>,
    shape: Vec<i64>,
}

impl<'a, F: Fragment, T: TensorData> TensorContext<'a, F, T> {
    pub fn new(fragment: &'a F) -> Self {
        Self {
            fragment,
            data: Vec::new(),
            shape: Vec::new(),
        }
    }

    pub fn fragment(&self) -> &F {
        self.fragment
    }

    /// Establishes the result shape, reserving room for its elements.
    ///
    /// An empty shape comes from external input and is rejected as an
    /// explicit invalid-argument error, not a crash.
    pub fn set_shape(&mut self, shape: Vec<i64>) -> Result<()> {
        if shape.is_empty() {
            return Err(ContextError::EmptyShape);
        }
        let size: i64 = shape.iter().product();
        self.data.reserve(size as usize);
        self.shape = shape;
        Ok(())
    }

    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    pub fn data(&self) -> &Vec<T> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Vec<T> {
        &mut self.data
    }
}

impl<'a, F, T: TensorData> ContextBase for TensorContext<'a, F, T> {
    fn context_type(&self) -> &'static str {
        CONTEXT_TYPE_TENSOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::SimpleFragment;

    #[test]
    fn test_vertex_data_context() {
        let frag = SimpleFragment::from_ids(vec![2u32, 4, 7]);
        let mut ctx = VertexDataContext::new(&frag);
        assert_eq!(ctx.context_type(), "vertex_data");
        ctx.set_all(&1i64);
        ctx.set_value(Vertex::new(4), 9);
        assert_eq!(*ctx.get_value(Vertex::new(2)), 1);
        assert_eq!(*ctx.get_value(Vertex::new(4)), 9);
        assert_eq!(*ctx.get_value(Vertex::new(7)), 1);
    }

    #[test]
    fn test_void_context() {
        let frag = SimpleFragment::from_ids(vec![0u32, 1]);
        let ctx = VoidContext::new(&frag);
        assert_eq!(ctx.context_type(), "void");
        assert_eq!(ctx.fragment().inner_vertices().len(), 2);
    }

    #[test]
    fn test_tensor_shape_validation() {
        let frag = SimpleFragment::from_ids(vec![0u32, 1]);
        let mut ctx: TensorContext<_, f64> = TensorContext::new(&frag);
        assert_eq!(ctx.context_type(), "tensor");
        assert_eq!(ctx.set_shape(vec![]), Err(ContextError::EmptyShape));
        assert_eq!(ctx.set_shape(vec![2, 3]), Ok(()));
        assert_eq!(ctx.shape(), &[2, 3]);
        ctx.data_mut().extend(std::iter::repeat(0.5).take(6));
        assert_eq!(ctx.data().len(), 6);
    }
}
