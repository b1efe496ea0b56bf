//! Headless device acquisition shared by every hero layer.

use std::sync::Arc;
use wgpu::{Adapter, Device, Instance, Queue, TextureFormat};

/// Errors that can occur during GPU operations.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
    #[error("Device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("Buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),
    #[error("Readback failed: {0}")]
    Readback(String),
}

/// How to pick an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    pub power_preference: wgpu::PowerPreference,
    /// Fall back to a software adapter when no hardware one is found.
    pub allow_software: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::LowPower,
            allow_software: true,
        }
    }
}

/// Device and queue shared by the planet and mesh renderers.
pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Arc<Adapter>,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
}

impl GpuContext {
    /// Acquire a headless device with default options.
    pub async fn new() -> Result<Self, GpuError> {
        Self::with_options(ContextOptions::default()).await
    }

    /// Acquire a headless device.
    ///
    /// Backends come from `WGPU_BACKEND` when set.
    pub async fn with_options(options: ContextOptions) -> Result<Self, GpuError> {
        let backends = wgpu::Backends::from_env()
            .unwrap_or(wgpu::Backends::METAL | wgpu::Backends::VULKAN | wgpu::Backends::GL);
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = match Self::pick_adapter(&instance, options.power_preference, false).await {
            Some(adapter) => adapter,
            None if options.allow_software => {
                log::warn!("No hardware adapter, trying a software fallback");
                Self::pick_adapter(&instance, options.power_preference, true)
                    .await
                    .ok_or(GpuError::NoAdapter)?
            }
            None => return Err(GpuError::NoAdapter),
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("hero-graphics"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        let info = adapter.get_info();
        log::info!("Hero graphics on {} ({:?})", info.name, info.backend);

        Ok(Self {
            instance,
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// Blocking variant of [`GpuContext::new`].
    pub fn new_blocking() -> Result<Self, GpuError> {
        pollster::block_on(Self::new())
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Largest square layer the device can render.
    pub fn max_layer_size(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// `requested` when the adapter can multisample `format` at that count,
    /// otherwise 1.
    pub fn msaa_samples(&self, format: TextureFormat, requested: u32) -> u32 {
        if requested <= 1 {
            return 1;
        }
        let flags = self.adapter.get_texture_format_features(format).flags;
        if flags.sample_count_supported(requested) {
            requested
        } else {
            log::debug!("{}x MSAA unsupported for {:?}, rendering aliased", requested, format);
            1
        }
    }

    async fn pick_adapter(
        instance: &Instance,
        power_preference: wgpu::PowerPreference,
        software: bool,
    ) -> Option<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                force_fallback_adapter: software,
                compatible_surface: None,
            })
            .await
            .ok()
    }
}
