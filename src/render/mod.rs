pub(crate) mod batch;
pub(crate) mod fit;
pub(crate) mod pipeline;
