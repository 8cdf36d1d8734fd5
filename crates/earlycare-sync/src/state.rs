use crate::error::QueryError;

/// What a consumer sees for one cache entry.
///
/// `Loading` is a fetch in flight, or a prerequisite not ready yet for reads
/// that wait on one. `Unloaded` means nothing has been fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Unloaded,
    Loading,
    Loaded(T),
    Errored(QueryError),
}

impl<T> From<Result<T, QueryError>> for QueryState<T> {
    fn from(res: Result<T, QueryError>) -> Self {
        match res {
            Ok(v) => QueryState::Loaded(v),
            Err(e) => QueryState::Errored(e),
        }
    }
}
