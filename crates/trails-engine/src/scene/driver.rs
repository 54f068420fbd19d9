use anyhow::{Context, Result};
use glam::{Mat4, Vec3, Vec4};

use crate::config::{MAX_FRAME_DT, PARTICLE_CAPACITY, RING_DEPTH, SceneConfig};
use crate::core::{App, AppControl, FrameCtx, Present};
use crate::gl::{Blend, Gpu};
use crate::model::{shapes, Model, Usage};
use crate::particles::{field, ParticlePool, Spawner};
use crate::pipeline::{FramebufferRing, RenderTarget};
use crate::resource::{Texture, TextureTarget, TextureUnits};
use crate::transform::{aspect_ortho, TransformStack};

use super::materials::{
    MaterialSources, Materials, U_ALPHA, U_COLOR, U_DT, U_PROJ, U_TEXTURE, U_TRANSFORM, U_VIEW,
    U_WORLD,
};

const CIRCLE_SEGMENTS: u32 = 64;
const FAR_PLANE: f32 = 100.0;
const FIELD_LINE_WIDTH: f32 = 0.005;
const FIELD_LINE_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const FIELD_LINE_DEPTH: f32 = -0.1;

/// Counters for one rendered frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    /// Ring slot rendered into and presented.
    pub ring_slot: usize,
    /// Ring slot fed back into the composite.
    pub sampled_slot: usize,
    pub spawned: usize,
    pub replaced_live: usize,
    pub drawn: usize,
}

/// Fixed geometry shared by the passes.
#[derive(Debug)]
struct Models {
    blit_quad: Model,
    background_quad: Model,
    circle: Model,
    field_lines: Model,
}

/// The demo: particles drawn into an off-screen layer, composited over a
/// decaying copy of the previous frame.
#[derive(Debug)]
pub struct Scene {
    gpu: Gpu,
    config: SceneConfig,
    materials: Materials,
    models: Models,
    white: TextureUnits,

    ring: FramebufferRing,
    particle_layer: RenderTarget,

    pool: ParticlePool,
    spawner: Spawner,

    projection: Mat4,
    inverse_projection: Mat4,
    view: Mat4,

    size: (u32, u32),
    last_time: f64,
    frame: u64,
}

impl Scene {
    /// Links materials, builds geometry and allocates targets at `size`.
    pub fn new(
        gpu: &Gpu,
        sources: &MaterialSources,
        config: SceneConfig,
        size: (u32, u32),
    ) -> Result<Self> {
        let materials = Materials::link(gpu, sources).context("failed to set up materials")?;

        let models = Models {
            blit_quad: Model::from_mesh(gpu, &shapes::blit_quad(0.0, Vec3::ONE), Usage::Static)?,
            background_quad: Model::from_mesh(
                gpu,
                &shapes::blit_quad(1.0, Vec3::ZERO),
                Usage::Static,
            )?,
            circle: Model::from_mesh(
                gpu,
                &shapes::circle_fan(CIRCLE_SEGMENTS, Vec3::ONE),
                Usage::Static,
            )?,
            field_lines: Model::from_mesh(
                gpu,
                &shapes::stroke_polylines(&[], FIELD_LINE_WIDTH, FIELD_LINE_COLOR),
                Usage::Dynamic,
            )?,
        };

        let mut white = TextureUnits::new();
        white
            .add(0, TextureTarget::Texture2D, Texture::new(gpu)?)
            .bind(0, TextureTarget::Texture2D)?
            .fill_color(Vec4::ONE)?;

        let ring = FramebufferRing::new(gpu, RING_DEPTH)?;
        let particle_layer = RenderTarget::new(gpu)?;

        let mut scene = Self {
            gpu: gpu.clone(),
            spawner: Spawner::new(config.seed),
            config,
            materials,
            models,
            white,
            ring,
            particle_layer,
            pool: ParticlePool::new(PARTICLE_CAPACITY),
            projection: Mat4::IDENTITY,
            inverse_projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            size: (0, 0),
            last_time: 0.0,
            frame: 0,
        };

        scene.resize(size.0, size.1)?;
        Ok(scene)
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn ring(&self) -> &FramebufferRing {
        &self.ring
    }

    pub fn particle_layer(&self) -> &RenderTarget {
        &self.particle_layer
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Reallocates every target at the new size and redraws the ring
    /// baselines. Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            log::debug!("ignoring resize to {width}x{height}");
            return Ok(());
        }
        log::debug!("resize to {width}x{height}");

        self.size = (width, height);
        self.projection = aspect_ortho(width, height, self.config.view_scale, FAR_PLANE);
        self.inverse_projection = self.projection.inverse();
        self.view = TransformStack::new().current();

        let materials = &self.materials;
        let white = &self.white;
        let quad = &self.models.background_quad;
        self.ring
            .resize(&self.gpu, width, height, |_, _| {
                draw_background(materials, white, quad, 1.0)
            })
            .context("failed to resize feedback ring")?;

        self.particle_layer
            .resize(width, height)
            .context("failed to resize particle layer")?;
        Ok(())
    }

    /// Renders and presents one frame at simulation time `time` (seconds).
    pub fn render(&mut self, time: f64, present: &mut dyn Present) -> Result<FrameStats> {
        let dt = (time - self.last_time).clamp(0.0, MAX_FRAME_DT);

        let mut stats = FrameStats {
            frame: self.frame,
            ring_slot: self.ring.current_index(),
            sampled_slot: self.ring.previous_index(),
            ..FrameStats::default()
        };

        self.particle_pass(time, dt as f32, &mut stats)
            .context("particle pass failed")?;
        self.composite_pass(dt as f32).context("composite pass failed")?;
        self.present_pass().context("present pass failed")?;
        present.present().context("failed to present frame")?;

        self.ring.advance();
        self.last_time = time;
        self.frame += 1;

        log::trace!("{stats:?}");
        Ok(stats)
    }

    fn particle_pass(&mut self, time: f64, dt: f32, stats: &mut FrameStats) -> Result<()> {
        let gpu = &self.gpu;
        let _fb = self.particle_layer.bind()?;

        gpu.clear(Vec4::ZERO);
        gpu.set_back_face_culling(true);
        gpu.set_depth_test(false);
        gpu.set_blend(Blend::Additive);

        if self.config.show_field_lines {
            let transform = self.projection * self.view;
            draw_field_lines(
                &mut self.models.field_lines,
                &self.materials,
                &self.white,
                transform,
                time,
            )?;
        }

        let report = self
            .spawner
            .spawn(&mut self.pool, time, &self.inverse_projection);
        stats.spawned = report.spawned;
        stats.replaced_live = report.replaced_live;

        let pgm = self.materials.particle.use_program()?;
        let circle = self.models.circle.select()?;
        pgm.uniform(U_PROJ)?.set_mat4(&self.projection);
        pgm.uniform(U_VIEW)?.set_mat4(&self.view);
        let world = pgm.uniform(U_WORLD)?;
        let color = pgm.uniform(U_COLOR)?;

        let mut ts = TransformStack::new();
        stats.drawn = self.pool.step(dt, time, field::velocity, |p| {
            ts.save();
            ts.push(Mat4::from_translation(p.position.extend(0.0)))
                .push(Mat4::from_scale(Vec3::splat(p.scale())));
            world.set_mat4(&ts);
            color.set_vec4(p.rgba());
            let drawn = circle.draw();
            ts.restore();
            drawn
        })?;

        Ok(())
    }

    fn composite_pass(&self, dt: f32) -> Result<()> {
        let gpu = &self.gpu;
        let _fb = self.ring.current().bind()?;

        gpu.clear(self.config.background);
        gpu.set_back_face_culling(false);
        gpu.set_depth_test(false);
        gpu.set_blend(Blend::Disabled);

        {
            let pgm = self.materials.blit_feedback.use_program()?;
            let _tex = self.ring.previous().sampler().select()?;
            pgm.uniform(U_TRANSFORM)?.set_mat4(&Mat4::IDENTITY);
            pgm.uniform(U_TEXTURE)?.set_i32(0);
            pgm.uniform(U_DT)?.set_f32(dt);
            self.models.blit_quad.select()?.draw()?;
        }

        gpu.set_blend(Blend::Premultiplied);

        {
            let pgm = self.materials.blit.use_program()?;
            let _tex = self.particle_layer.sampler().select()?;
            pgm.uniform(U_TRANSFORM)?.set_mat4(&Mat4::IDENTITY);
            pgm.uniform(U_TEXTURE)?.set_i32(0);
            pgm.uniform(U_ALPHA)?.set_f32(1.0);
            self.models.blit_quad.select()?.draw()?;
        }

        Ok(())
    }

    /// Copies the current ring slot to the default framebuffer.
    fn present_pass(&self) -> Result<()> {
        let gpu = &self.gpu;
        gpu.viewport(self.size.0, self.size.1)?;
        gpu.clear(self.config.background);
        gpu.set_back_face_culling(false);
        gpu.set_depth_test(false);
        gpu.set_blend(Blend::Disabled);

        let pgm = self.materials.blit.use_program()?;
        let _tex = self.ring.current().sampler().select()?;
        pgm.uniform(U_TRANSFORM)?.set_mat4(&Mat4::IDENTITY);
        pgm.uniform(U_TEXTURE)?.set_i32(0);
        pgm.uniform(U_ALPHA)?.set_f32(1.0);
        self.models.blit_quad.select()?.draw()?;
        Ok(())
    }
}

/// Flat background quad through the white texture.
fn draw_background(
    materials: &Materials,
    white: &TextureUnits,
    quad: &Model,
    alpha: f32,
) -> crate::error::Result<()> {
    let pgm = materials.blit.use_program()?;
    let _tex = white.select()?;
    pgm.uniform(U_TRANSFORM)?.set_mat4(&Mat4::IDENTITY);
    pgm.uniform(U_TEXTURE)?.set_i32(0);
    pgm.uniform(U_ALPHA)?.set_f32(alpha);
    quad.select()?.draw()
}

/// Field streamlines at `time`, restroked every call.
fn draw_field_lines(
    model: &mut Model,
    materials: &Materials,
    white: &TextureUnits,
    view_projection: Mat4,
    time: f64,
) -> crate::error::Result<()> {
    let mesh = shapes::stroke_polylines(
        &field::field_lines(time),
        FIELD_LINE_WIDTH,
        FIELD_LINE_COLOR,
    );
    model.replace(&mesh.vertices)?;

    let pgm = materials.blit.use_program()?;
    let _tex = white.select()?;

    let mut ts = TransformStack::new();
    ts.push(view_projection)
        .push(Mat4::from_translation(Vec3::new(0.0, 0.0, FIELD_LINE_DEPTH)));

    pgm.uniform(U_TRANSFORM)?.set_mat4(&ts);
    pgm.uniform(U_TEXTURE)?.set_i32(0);
    pgm.uniform(U_ALPHA)?.set_f32(1.0);
    model.select()?.draw()
}

impl App for Scene {
    fn on_resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.resize(width, height)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> Result<AppControl> {
        self.render(ctx.time.time, ctx.surface)?;
        Ok(AppControl::Continue)
    }
}
