use signalsense_core::Result;

/// Validate a plain config once and turn it into a runnable kernel.
///
/// Implementors reject every invalid parameter in `try_new`, so running a
/// constructed kernel only fails on bad input buffers.
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self>;
}
