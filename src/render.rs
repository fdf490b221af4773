//! The frame orchestrator: turns a [`SceneState`] into batched draw calls.

use glam::Mat4;

use crate::batch::BatchBuffer;
use crate::config::{OverflowPolicy, RendererConfig};
use crate::device::Device;
use crate::error::RenderError;
use crate::scene::{QuadDesc, SceneState};
use crate::shaders::{ShaderSource, MVP_UNIFORM};
use crate::types::Quad;

/// Where a frame is in its lifecycle.
///
/// A frame always runs `Idle → Building → Uploaded → Submitted → Idle`. When
/// a batch fills up under [`OverflowPolicy::Flush`], the frame continues
/// `Submitted → Building` with a fresh batch before finishing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameState {
    /// No frame in progress.
    Idle,
    /// Quads are being staged into the batch.
    Building,
    /// The staged vertices have been written to the GPU.
    Uploaded,
    /// The draw call for the batch has been issued.
    Submitted,
}

impl FrameState {
    fn can_advance_to(self, next: Self) -> bool {
        use FrameState::{Building, Idle, Submitted, Uploaded};
        matches!(
            (self, next),
            (Idle, Building)
                | (Building, Uploaded)
                | (Uploaded, Submitted)
                | (Submitted, Idle | Building)
        )
    }
}

/// Work done after the batch is drawn.
///
/// Both methods default to no-ops, and `()` implements the trait for
/// callers with no overlay.
pub trait FrameHooks {
    /// Render an overlay (e.g. a debug UI) into the same framebuffer.
    fn render_overlay(&mut self) {}
    /// Present the finished frame (e.g. swap buffers).
    fn present(&mut self) {}
}

impl FrameHooks for () {}

/// Outcome of one [`BatchRenderer::render_frame`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Quads that reached a draw call.
    pub quads_submitted: usize,
    /// Draw calls issued; more than one only when a batch was flushed.
    pub draw_calls: usize,
    /// Scene indices of quads rejected under [`OverflowPolicy::Drop`].
    pub dropped: Vec<usize>,
}

/// Dynamic batch renderer for unit quads.
///
/// Owns the device, the batch, and the shader program. Every frame the
/// batch is rebuilt from scratch from the scene, uploaded with a full
/// overwrite, and drawn with a single indexed call per batch.
///
/// A `BatchRenderer` cannot exist without a linked program, so a shader
/// compile failure surfaces from [`new`](Self::new) or
/// [`reload_shader`](Self::reload_shader) and never reaches a draw.
///
/// # Example
///
/// ```no_run
/// # use quad_batch_renderer::{BatchRenderer, GlDevice, RendererConfig, SceneState};
/// # use std::sync::Arc;
/// # fn example(gl: Arc<glow::Context>) -> Result<(), quad_batch_renderer::RenderError> {
/// // During setup (with a current GL context):
/// let device = unsafe { GlDevice::new(gl) };
/// let mut renderer = BatchRenderer::new(device, RendererConfig::default())?;
///
/// let mut scene = SceneState::grid(5, 5);
/// scene.push([0.1, 0.1], 0);
///
/// // Each frame:
/// let stats = renderer.render_frame(&scene, &mut ())?;
/// assert_eq!(stats.quads_submitted, 26);
/// # Ok(())
/// # }
/// ```
pub struct BatchRenderer<D: Device> {
    device: D,
    batch: BatchBuffer<D>,
    program: D::Program,
    config: RendererConfig,
    /// Projection * view * model.
    mvp: Mat4,
    state: FrameState,
}

impl<D: Device> BatchRenderer<D> {
    /// Compile the program named by `config` (or the built-in one) and
    /// allocate the batch.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Config`] if `config` is invalid,
    /// [`RenderError::Shader`] if the shader cannot be read, compiled, or
    /// linked, and [`RenderError::Device`] if GPU allocation fails or the
    /// program lacks the `u_MVP` uniform.
    pub fn new(device: D, config: RendererConfig) -> Result<Self, RenderError> {
        let source = match &config.shader_path {
            Some(path) => ShaderSource::from_path(path)?,
            None => ShaderSource::builtin(),
        };
        Self::with_shader(device, config, &source)
    }

    /// Like [`new`](Self::new), with explicit shader source.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn with_shader(
        mut device: D,
        config: RendererConfig,
        source: &ShaderSource,
    ) -> Result<Self, RenderError> {
        config.validate()?;

        let program = device.compile_program(&source.vertex, &source.fragment)?;
        let view = Mat4::IDENTITY;
        let model = Mat4::IDENTITY;
        let mvp = config.projection.matrix() * view * model;

        device.use_program(program);
        if let Err(e) = device.set_uniform_mat4(program, MVP_UNIFORM, &mvp) {
            device.delete_program(program);
            return Err(e.into());
        }

        let batch = match BatchBuffer::new(&mut device, config.max_quads) {
            Ok(batch) => batch,
            Err(e) => {
                device.delete_program(program);
                return Err(e.into());
            }
        };

        log::debug!(
            "batch renderer ready: {} quads per batch, overflow {:?}",
            config.max_quads,
            config.overflow
        );

        Ok(Self {
            device,
            batch,
            program,
            config,
            mvp,
            state: FrameState::Idle,
        })
    }

    /// Draw every quad in `scene`, then run the overlay and present.
    ///
    /// Quads are drawn in scene order. When the batch fills up, the
    /// configured [`OverflowPolicy`] decides whether the batch is flushed
    /// and continued or the remaining quads are dropped; either way the
    /// frame completes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Device`] if the projection uniform cannot be
    /// set. The renderer is back in [`FrameState::Idle`] afterwards.
    pub fn render_frame(
        &mut self,
        scene: &SceneState,
        hooks: &mut impl FrameHooks,
    ) -> Result<FrameStats, RenderError> {
        let stats = match self.build_and_submit(scene.quads()) {
            Ok(stats) => stats,
            Err(e) => {
                self.state = FrameState::Idle;
                return Err(e);
            }
        };

        hooks.render_overlay();
        hooks.present();
        self.advance(FrameState::Idle);

        if !stats.dropped.is_empty() {
            log::warn!(
                "dropped {} of {} quads: batch capacity is {}",
                stats.dropped.len(),
                scene.len(),
                self.batch.capacity()
            );
        }
        log::trace!(
            "frame: {} quads in {} draw call(s)",
            stats.quads_submitted,
            stats.draw_calls
        );
        Ok(stats)
    }

    fn build_and_submit(&mut self, quads: &[QuadDesc]) -> Result<FrameStats, RenderError> {
        let mut stats = FrameStats::default();

        self.device.clear(self.config.clear_color);
        self.advance(FrameState::Building);
        self.batch.begin_frame();

        for (i, desc) in quads.iter().enumerate() {
            let quad = self.lower(desc);
            if self.batch.push_quad(&quad).is_ok() {
                continue;
            }
            match self.config.overflow {
                OverflowPolicy::Drop => stats.dropped.push(i),
                OverflowPolicy::Flush => {
                    self.submit(&mut stats)?;
                    self.advance(FrameState::Building);
                    self.batch.begin_frame();
                    if self.batch.push_quad(&quad).is_err() {
                        stats.dropped.push(i);
                    }
                }
            }
        }

        self.submit(&mut stats)?;
        Ok(stats)
    }

    /// Upload the staged batch and draw it.
    fn submit(&mut self, stats: &mut FrameStats) -> Result<(), RenderError> {
        self.batch.upload(&mut self.device);
        self.advance(FrameState::Uploaded);

        self.device.use_program(self.program);
        self.device
            .set_uniform_mat4(self.program, MVP_UNIFORM, &self.mvp)?;
        self.batch.draw(&mut self.device);
        self.advance(FrameState::Submitted);

        let submitted = self.batch.quad_count() as usize;
        if submitted > 0 {
            stats.draw_calls += 1;
            stats.quads_submitted += submitted;
        }
        Ok(())
    }

    fn lower(&self, desc: &QuadDesc) -> Quad {
        #[expect(clippy::cast_precision_loss)]
        let texture_slot = desc.texture_slot as f32;
        Quad {
            anchor: desc.anchor,
            size: self.config.quad_size,
            texture_slot,
            color: self.config.quad_color,
        }
    }

    fn advance(&mut self, next: FrameState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid frame transition {:?} -> {next:?}",
            self.state
        );
        self.state = next;
    }

    /// Compile `source` and swap it in for the current program.
    ///
    /// # Errors
    ///
    /// Returns the compile, link, or uniform error; the previous program
    /// stays in use.
    pub fn reload_shader(&mut self, source: &ShaderSource) -> Result<(), RenderError> {
        let program = self
            .device
            .compile_program(&source.vertex, &source.fragment)?;

        self.device.use_program(program);
        if let Err(e) = self
            .device
            .set_uniform_mat4(program, MVP_UNIFORM, &self.mvp)
        {
            self.device.delete_program(program);
            self.device.use_program(self.program);
            return Err(e.into());
        }

        self.device.delete_program(self.program);
        self.program = program;
        log::info!("shader program reloaded");
        Ok(())
    }

    /// Set the viewport to the framebuffer size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.device.set_viewport(width, height);
    }

    /// Current frame state; [`FrameState::Idle`] between frames.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// The projection-view-model matrix uploaded to `u_MVP`.
    pub fn mvp(&self) -> Mat4 {
        self.mvp
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The batch as left by the last submission.
    pub fn batch(&self) -> &BatchBuffer<D> {
        &self.batch
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the device, e.g. for the overlay pass.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Release all GPU resources and return the device.
    pub fn destroy(self) -> D {
        let Self {
            mut device,
            batch,
            program,
            ..
        } = self;
        batch.destroy(&mut device);
        device.delete_program(program);
        device
    }
}
