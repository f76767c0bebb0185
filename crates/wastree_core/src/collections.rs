//! Growable-array helpers.
//!
//! Every entry list, type list and child list in the toolchain is a `Vec`.
//! Construction paths grow them through [`TryGrow`] so that an allocation
//! failure comes back as [`AllocError`] instead of aborting.

use crate::error::AllocError;

/// Fallible growth for `Vec`.
pub trait TryGrow<T> {
    /// Push `value`, reserving room first.
    fn try_push(&mut self, value: T) -> Result<(), AllocError>;

    /// Append a copy of `items`, reserving room first.
    fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), AllocError>
    where
        T: Clone;
}

impl<T> TryGrow<T> for Vec<T> {
    fn try_push(&mut self, value: T) -> Result<(), AllocError> {
        self.try_reserve(1)
            .map_err(|source| AllocError::reserve(1, source))?;
        self.push(value);
        Ok(())
    }

    fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
    {
        self.try_reserve(items.len())
            .map_err(|source| AllocError::reserve(items.len(), source))?;
        self.extend_from_slice(items);
        Ok(())
    }
}

/// Convert a collection length into a 32-bit index.
#[inline]
pub fn index_of_len(len: usize) -> Result<u32, AllocError> {
    u32::try_from(len).map_err(|_| AllocError::CapacityOverflow(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_push_appends() {
        let mut v = vec![1, 2];
        v.try_push(3).unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn test_try_extend_from_slice() {
        let mut v = vec!['a'];
        v.try_extend_from_slice(&['b', 'c']).unwrap();
        assert_eq!(v, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_index_of_len() {
        assert_eq!(index_of_len(7), Ok(7));
        assert!(matches!(
            index_of_len(usize::MAX),
            Err(AllocError::CapacityOverflow(_))
        ));
    }
}
