//! The agent buffer pair.

use wgpu::util::DeviceExt;

use crate::ping_pong::PingPong;
use crate::uniforms::WormRecord;

/// Two storage buffers with identical initial contents.
///
/// The compute and render stages only ever address them through a
/// [`PingPong`] index.
pub struct PingPongBuffers {
    buffers: [wgpu::Buffer; 2],
    byte_len: u64,
    destroyed: bool,
}

impl PingPongBuffers {
    pub fn new(device: &wgpu::Device, worms: &[WormRecord]) -> Self {
        let contents: &[u8] = bytemuck::cast_slice(worms);
        let buffers = PingPong::ALL.map(|pp| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Worms[{}]", pp.index())),
                contents,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::VERTEX,
            })
        });

        log::debug!(
            "allocated worm buffer pair: {} agents, {} bytes each",
            worms.len(),
            contents.len()
        );

        Self {
            buffers,
            byte_len: contents.len() as u64,
            destroyed: false,
        }
    }

    /// Buffer read at `index` by both stages.
    pub fn current(&self, index: PingPong) -> &wgpu::Buffer {
        &self.buffers[index.current()]
    }

    /// Buffer the compute stage writes at `index`.
    pub fn next(&self, index: PingPong) -> &wgpu::Buffer {
        &self.buffers[index.next()]
    }

    /// Size of each buffer in bytes.
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Free both buffers. Later calls do nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        for buffer in &self.buffers {
            buffer.destroy();
        }
        self.destroyed = true;
    }
}
