pub(crate) mod post_service;
pub(crate) mod retry;
