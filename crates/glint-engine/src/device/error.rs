use std::fmt;

/// Failure during device session acquisition.
///
/// Every variant is fatal for that acquisition attempt: it is reported on the
/// log and initialization halts. Nothing here is retried automatically; only
/// device *loss* after a successful acquisition triggers re-acquisition.
#[derive(Debug)]
pub enum AcquireError {
    /// No usable GPU backend in the host environment.
    Unsupported,
    /// No adapter satisfied the request.
    NoAdapter(wgpu::RequestAdapterError),
    /// The adapter refused to create a logical device.
    Device(wgpu::RequestDeviceError),
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "no GPU backend is available on this host"),
            Self::NoAdapter(e) => write!(f, "no suitable GPU adapter found: {e}"),
            Self::Device(e) => write!(f, "failed to create a logical device: {e}"),
        }
    }
}

impl std::error::Error for AcquireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unsupported => None,
            Self::NoAdapter(e) => Some(e),
            Self::Device(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_the_host_capability() {
        let msg = AcquireError::Unsupported.to_string();
        assert!(msg.contains("no GPU backend"), "{msg}");
    }

    #[test]
    fn unsupported_has_no_source() {
        use std::error::Error;
        assert!(AcquireError::Unsupported.source().is_none());
    }
}
