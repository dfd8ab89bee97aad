//! Per-layer timing, curves and the layer animator state machine.

pub(crate) mod animator;
pub(crate) mod clock;
pub(crate) mod curves;
pub(crate) mod ease;
pub(crate) mod interval;
