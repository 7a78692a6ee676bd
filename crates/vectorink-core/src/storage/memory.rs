//! In-memory storage backend.

use super::{BoxFuture, StorageBackend, StorageError, StorageResult};
use std::sync::RwLock;

/// Holds the collection payload in memory, for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryBackend {
    payload: RwLock<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> BoxFuture<'_, StorageResult<Option<String>>> {
        Box::pin(async move {
            let payload = self
                .payload
                .read()
                .map_err(|e| StorageError::Backend(format!("lock error: {}", e)))?;
            Ok(payload.clone())
        })
    }

    fn write(&self, payload: String) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut slot = self
                .payload
                .write()
                .map_err(|e| StorageError::Backend(format!("lock error: {}", e)))?;
            *slot = Some(payload);
            Ok(())
        })
    }

    fn clear(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut slot = self
                .payload
                .write()
                .map_err(|e| StorageError::Backend(format!("lock error: {}", e)))?;
            *slot = None;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    #[test]
    fn test_missing_payload_reads_none() {
        let backend = MemoryBackend::new();
        assert_eq!(block_on(backend.read()).unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let backend = MemoryBackend::new();
        block_on(backend.write("[1,2,3]".to_string())).unwrap();
        assert_eq!(block_on(backend.read()).unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn test_clear() {
        let backend = MemoryBackend::new();
        block_on(backend.write("data".to_string())).unwrap();
        block_on(backend.clear()).unwrap();
        assert_eq!(block_on(backend.read()).unwrap(), None);
    }
}
