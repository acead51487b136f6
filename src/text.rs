//! Overlay text rendered with glyphon.
//!
//! Label buffers are pooled by position: the n-th label of a frame reuses the
//! n-th buffer and is only reshaped when its text or the window width changed.
//! Labels are shaped in logical pixels and scaled to the surface when drawn.

use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
};

use crate::{config, render::Label};

struct ShapedLabel {
    text: String,
    width: f32,
    buffer: Buffer,
}

pub struct TextOverlay {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    metrics: Metrics,
    labels: Vec<ShapedLabel>,
    prepared: usize,
}

impl TextOverlay {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let renderer =
            TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            renderer,
            metrics: Metrics::new(config::FONT_SIZE, config::LINE_HEIGHT),
            labels: Vec::new(),
            prepared: 0,
        }
    }

    /// Shape `labels` and upload their glyphs. Must run before the overlay pass begins.
    ///
    /// `width` and `height` are the physical surface size, `scale` the window's scale factor.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        labels: &[Label],
        [width, height]: [u32; 2],
        scale: f32,
    ) -> anyhow::Result<()> {
        self.viewport.update(queue, Resolution { width, height });
        let scale = if scale > 0.0 { scale } else { 1.0 };
        let logical_width = width as f32 / scale;

        while self.labels.len() < labels.len() {
            let buffer = Buffer::new(&mut self.font_system, self.metrics);
            self.labels.push(ShapedLabel {
                text: String::new(),
                width: 0.0,
                buffer,
            });
        }

        for (label, shaped) in labels.iter().zip(self.labels.iter_mut()) {
            if shaped.text != label.text || shaped.width != logical_width {
                shaped.buffer.set_size(
                    &mut self.font_system,
                    Some(logical_width),
                    Some(self.metrics.line_height),
                );
                shaped.buffer.set_text(
                    &mut self.font_system,
                    label.text,
                    &Attrs::new().family(Family::SansSerif),
                    Shaping::Advanced,
                    None,
                );
                shaped.buffer.shape_until_scroll(&mut self.font_system, false);
                shaped.text = label.text.to_string();
                shaped.width = logical_width;
            }
        }

        let areas = labels
            .iter()
            .zip(self.labels.iter())
            .map(|(label, shaped)| TextArea {
                buffer: &shaped.buffer,
                left: label.left * scale,
                top: label.top * scale,
                scale,
                bounds: TextBounds {
                    left: 0,
                    top: 0,
                    right: width as i32,
                    bottom: height as i32,
                },
                default_color: Color::rgb(255, 255, 255),
                custom_glyphs: &[],
            });

        self.renderer
            .prepare(
                device,
                queue,
                &mut self.font_system,
                &mut self.atlas,
                &self.viewport,
                areas,
                &mut self.swash_cache,
            )
            .map_err(|e| anyhow::anyhow!("preparing overlay text: {e:?}"))?;
        self.prepared = labels.len();
        Ok(())
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) -> anyhow::Result<()> {
        if self.prepared == 0 {
            return Ok(());
        }
        self.renderer
            .render(&self.atlas, &self.viewport, pass)
            .map_err(|e| anyhow::anyhow!("drawing overlay text: {e:?}"))
    }

    /// Drop glyphs that were not used this frame from the atlas.
    pub fn trim(&mut self) {
        self.atlas.trim();
        self.prepared = 0;
    }
}
