//! The [`devector!`](crate::devector!) literal macro.

/// Build a [`Devector`](crate::Devector) on the global heap.
///
/// ```
/// use devec::devector;
///
/// let empty: devec::Devector<u8> = devector![];
/// let listed = devector![1, 2, 3];
/// let repeated = devector![0u8; 4];
/// assert!(empty.is_empty());
/// assert_eq!(listed, [1, 2, 3]);
/// assert_eq!(repeated, [0, 0, 0, 0]);
/// ```
///
/// # Panics
///
/// Panics if the allocation fails.
#[macro_export]
macro_rules! devector {
    () => {
        $crate::Devector::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Devector::from_elem($n, $elem)
            .unwrap_or_else(|err| $crate::__allocation_panic(err))
    };
    ($($x:expr),+ $(,)?) => {
        <$crate::Devector<_>>::from([$($x),+])
    };
}
