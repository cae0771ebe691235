//! Load gate for asynchronously decoded resources.

use crate::error::WallError;

/// State of one externally loaded resource. Consumers only see the value once
/// it is `Ready`; a failed load keeps the consumer disabled for good.
#[derive(Debug, Default)]
pub enum AssetSlot<T> {
    #[default]
    Pending,
    Ready(T),
    Failed,
}

impl<T> AssetSlot<T> {
    /// Settle the slot from a load result, logging the failure if any.
    pub fn resolve(&mut self, label: &str, result: Result<T, WallError>) {
        *self = match result {
            Ok(v) => AssetSlot::Ready(v),
            Err(e) => {
                log::warn!("{label}: {e}; skipping");
                AssetSlot::Failed
            }
        };
    }

    #[inline]
    pub fn ready(&self) -> Option<&T> {
        match self {
            AssetSlot::Ready(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            AssetSlot::Ready(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, AssetSlot::Pending)
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, AssetSlot::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_moves_from_pending_to_ready_or_failed() {
        let mut a: AssetSlot<u32> = AssetSlot::default();
        assert!(a.is_pending());
        assert_eq!(a.ready(), None);
        a.resolve("a", Ok(3));
        assert_eq!(a.ready(), Some(&3));

        let mut b: AssetSlot<u32> = AssetSlot::Pending;
        b.resolve("b", Err(WallError::EmptyAsset));
        assert!(b.is_failed());
        assert_eq!(b.ready(), None);
    }
}
