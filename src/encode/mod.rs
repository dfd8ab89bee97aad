//! PNG encoding of layers.

pub(crate) mod png;
