use ndarray::{ArrayBase, Data, DataMut, Ix1};
use signalsense_core::{Error, Result};

/// Contiguous 1D sample input: slices, arrays, vectors, and ndarray vectors
/// whose memory is laid out in order.
pub trait Read1D<T> {
    /// Borrow the samples as one contiguous slice.
    fn read_slice(&self) -> Result<&[T]>;
}

/// Contiguous 1D sample output, the mutable counterpart of [`Read1D`].
pub trait Write1D<T> {
    /// Borrow the destination as one mutable contiguous slice.
    fn write_slice_mut(&mut self) -> Result<&mut [T]>;
}

/// Fails with [`Error::LengthMismatch`] unless a caller buffer holds exactly
/// the `expected` number of samples.
pub(crate) fn check_out_len(arg: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(Error::LengthMismatch { arg, expected, got });
    }
    Ok(())
}

macro_rules! contiguous_adapters {
    ($([$($generics:tt)*] $ty:ty),* $(,)?) => {$(
        impl<$($generics)*> Read1D<T> for $ty {
            fn read_slice(&self) -> Result<&[T]> {
                Ok(&self[..])
            }
        }

        impl<$($generics)*> Write1D<T> for $ty {
            fn write_slice_mut(&mut self) -> Result<&mut [T]> {
                Ok(&mut self[..])
            }
        }
    )*};
}

contiguous_adapters!([T] [T], [T, const N: usize] [T; N], [T] Vec<T>);

// Owned arrays, views and mutable views share one impl; strided views fail.
impl<S, T> Read1D<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
{
    fn read_slice(&self) -> Result<&[T]> {
        self.as_slice().ok_or(Error::NonContiguous { arg: "array" })
    }
}

impl<S, T> Write1D<T> for ArrayBase<S, Ix1>
where
    S: DataMut<Elem = T>,
{
    fn write_slice_mut(&mut self) -> Result<&mut [T]> {
        self.as_slice_mut()
            .ok_or(Error::NonContiguous { arg: "array" })
    }
}
