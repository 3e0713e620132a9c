pub(crate) mod christofides;
pub(crate) mod euler;
pub(crate) mod local_search;
pub(crate) mod matching;
pub(crate) mod mst;
