//! The tree model a [`Pointer`](crate::Pointer) is evaluated against.
//!
//! Evaluation only needs to know whether a node is an object, an array, or a
//! leaf, and how to reach a child. [`Node`] captures exactly that, which
//! lets the evaluator walk `serde_json::Value` and, with the `"toml"` feature,
//! `toml::Value`.

/// The structural kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A mapping from string keys to child nodes.
    Object,
    /// An ordered sequence of child nodes.
    Array {
        /// Number of elements.
        len: usize,
    },
    /// Any leaf value, including null.
    Scalar,
}

/// A tree-structured value which can be navigated by JSON Pointer tokens.
///
/// The `Clone` bound lets evaluation results be either borrowed from the
/// input document or owned when a recovery policy supplied a replacement.
/// Input nodes are never mutated by evaluation. Nodes supplied by a policy are
/// owned, so their children are moved out with [`Node::into_key`] and
/// [`Node::into_index`] rather than cloned.
pub trait Node: Clone {
    /// The structural kind of this node.
    fn shape(&self) -> Shape;

    /// Returns the child bound to `key` if this node is an object.
    fn get_key(&self, key: &str) -> Option<&Self>;

    /// Returns the element at `index` if this node is an array.
    fn get_index(&self, index: usize) -> Option<&Self>;

    /// Moves out the child bound to `key` if this node is an object,
    /// otherwise hands the node back unchanged.
    ///
    /// ## Errors
    /// Returns `self` if there is no such child.
    fn into_key(self, key: &str) -> Result<Self, Self>;

    /// Moves out the element at `index` if this node is an array, otherwise
    /// hands the node back unchanged.
    ///
    /// ## Errors
    /// Returns `self` if there is no such element.
    fn into_index(self, index: usize) -> Result<Self, Self>;
}

mod json_impl {
    use super::{Node, Shape};
    use serde_json::Value;

    impl Node for Value {
        fn shape(&self) -> Shape {
            match self {
                Value::Object(_) => Shape::Object,
                Value::Array(array) => Shape::Array { len: array.len() },
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                    Shape::Scalar
                }
            }
        }

        fn get_key(&self, key: &str) -> Option<&Self> {
            self.as_object()?.get(key)
        }

        fn get_index(&self, index: usize) -> Option<&Self> {
            self.as_array()?.get(index)
        }

        fn into_key(self, key: &str) -> Result<Self, Self> {
            match self {
                Value::Object(mut map) => map.remove(key).ok_or(Value::Object(map)),
                other => Err(other),
            }
        }

        fn into_index(self, index: usize) -> Result<Self, Self> {
            match self {
                Value::Array(mut array) if index < array.len() => Ok(array.swap_remove(index)),
                other => Err(other),
            }
        }
    }
}

#[cfg(feature = "toml")]
mod toml_impl {
    use super::{Node, Shape};
    use ::toml::Value;

    impl Node for Value {
        fn shape(&self) -> Shape {
            match self {
                Value::Table(_) => Shape::Object,
                Value::Array(array) => Shape::Array { len: array.len() },
                Value::String(_)
                | Value::Integer(_)
                | Value::Float(_)
                | Value::Boolean(_)
                | Value::Datetime(_) => Shape::Scalar,
            }
        }

        fn get_key(&self, key: &str) -> Option<&Self> {
            self.as_table()?.get(key)
        }

        fn get_index(&self, index: usize) -> Option<&Self> {
            self.as_array()?.get(index)
        }

        fn into_key(self, key: &str) -> Result<Self, Self> {
            match self {
                Value::Table(mut table) => table.remove(key).ok_or(Value::Table(table)),
                other => Err(other),
            }
        }

        fn into_index(self, index: usize) -> Result<Self, Self> {
            match self {
                Value::Array(mut array) if index < array.len() => Ok(array.swap_remove(index)),
                other => Err(other),
            }
        }
    }
}
