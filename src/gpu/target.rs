//! Where the render stage draws.
//!
//! A window surface hands out one texture per frame that must be presented;
//! an offscreen texture is drawn into directly. Both look the same to the
//! frame loop through [`RenderTarget`].

use std::sync::Arc;

/// One acquired frame.
pub struct TargetFrame {
    pub view: wgpu::TextureView,
    surface_texture: Option<wgpu::SurfaceTexture>,
}

impl TargetFrame {
    /// Show the frame. No-op for offscreen targets.
    pub fn present(self) {
        if let Some(texture) = self.surface_texture {
            texture.present();
        }
    }
}

/// Provider of a texture to draw each frame into.
pub trait RenderTarget {
    fn acquire(&mut self) -> Result<TargetFrame, wgpu::SurfaceError>;

    fn format(&self) -> wgpu::TextureFormat;
}

/// A configured window surface.
pub struct SurfaceTarget {
    surface: Arc<wgpu::Surface<'static>>,
    format: wgpu::TextureFormat,
}

impl SurfaceTarget {
    pub fn new(surface: Arc<wgpu::Surface<'static>>, format: wgpu::TextureFormat) -> Self {
        Self { surface, format }
    }
}

impl RenderTarget for SurfaceTarget {
    fn acquire(&mut self) -> Result<TargetFrame, wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok(TargetFrame {
            view,
            surface_texture: Some(output),
        })
    }

    fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// An owned texture for headless rendering.
pub struct TextureTarget {
    texture: wgpu::Texture,
}

impl TextureTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        Self { texture }
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

impl RenderTarget for TextureTarget {
    fn acquire(&mut self) -> Result<TargetFrame, wgpu::SurfaceError> {
        Ok(TargetFrame {
            view: self
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            surface_texture: None,
        })
    }

    fn format(&self) -> wgpu::TextureFormat {
        Self::FORMAT
    }
}
