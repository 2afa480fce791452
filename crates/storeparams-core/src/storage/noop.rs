use super::ParamStore;
use crate::error::StoreResult;

/// Backend bound for unrecognized storage kinds. Stores nothing, reads nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl ParamStore for NoopStore {
    fn store(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
        Ok(())
    }

    fn read(&self, _key: &str) -> StoreResult<Option<String>> {
        Ok(None)
    }

    fn erase(&mut self, _key: &str) -> StoreResult<()> {
        Ok(())
    }
}
