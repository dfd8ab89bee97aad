//! Software compositing of effect frames.

pub(crate) mod composite;
