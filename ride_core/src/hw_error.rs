//! Maps `Box<dyn Error>` from trait boundaries to typed `FusionError`.
//!
//! The traits in `ride_traits` return `Box<dyn Error + Send + Sync>`; this
//! module converts those to the core error enum, with an optional
//! feature-gated path for `ride_hardware::HwError` downcasting.

use crate::error::FusionError;

/// Map a trait-boundary error to a typed `FusionError`.
///
/// Known hardware error types are downcast first, then the message is
/// inspected as a fallback.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> FusionError {
    #[cfg(feature = "hardware-errors")]
    {
        use ride_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Timeout | HwError::DataReadyTimeout => FusionError::Timeout,
                other => FusionError::HardwareFault(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        FusionError::Timeout
    } else {
        FusionError::Hardware(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_errors_fall_back_to_message() {
        let e = std::io::Error::other("bus reset");
        assert_eq!(map_hw_error(&e), FusionError::Hardware("bus reset".into()));
        let e = std::io::Error::other("read Timeout after 50ms");
        assert_eq!(map_hw_error(&e), FusionError::Timeout);
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn hw_errors_are_downcast() {
        use ride_hardware::error::HwError;
        assert_eq!(map_hw_error(&HwError::DataReadyTimeout), FusionError::Timeout);
        assert_eq!(
            map_hw_error(&HwError::Bus("nack".into())),
            FusionError::HardwareFault("i2c bus error: nack".into())
        );
    }
}
