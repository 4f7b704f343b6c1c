pub(crate) mod cache;
pub(crate) mod math;
pub(crate) mod parse;
