pub(crate) mod cache;
pub(crate) mod coins;
pub(crate) mod health;
pub(crate) mod overview;
pub(crate) mod queries;
