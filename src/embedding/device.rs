use candle_core::Device;
use tracing::{debug, warn};

use super::error::EmbeddingError;

/// Picks Metal or CUDA when compiled in and present, otherwise the CPU.
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            tracing::info!("Using Metal GPU acceleration");
            return Ok(device);
        }
        Err(e) => {
            warn!(error = %e, "Metal device unavailable");
            failures.push(format!("metal failed: {e}"));
        }
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            tracing::info!("Using CUDA GPU acceleration");
            return Ok(device);
        }
        Err(e) => {
            warn!(error = %e, "CUDA device unavailable");
            failures.push(format!("cuda failed: {e}"));
        }
    }

    if cfg!(any(feature = "metal", feature = "cuda")) {
        warn!(reason = %failures.join("; "), "Falling back to CPU device");
    } else {
        debug!("No GPU backend compiled, using CPU device");
    }

    Ok(Device::Cpu)
}
