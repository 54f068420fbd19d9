//! In-memory GL double.
//!
//! `Headless` hands out object names, tracks bindings, texture and
//! renderbuffer storage, framebuffer attachments and completeness, shader
//! sources, uniform values and fixed-function state, and records the calls
//! that matter for pass sequencing. It never touches a driver, so the whole
//! resource and pipeline layer can run in unit tests or on machines without a
//! display.
//!
//! Clones share state: keep one clone for inspection and move the other into
//! [`crate::gl::Gpu::new`].

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::api::{Gl, RawId};
use super::consts::FRAMEBUFFER_INCOMPLETE_DIMENSIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Texture,
    Framebuffer,
    Renderbuffer,
    Buffer,
    Shader,
    Program,
}

/// What a framebuffer attachment point refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attached {
    Texture { texture: RawId, level: i32 },
    Renderbuffer { renderbuffer: RawId },
}

/// Last value written to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    I32(i32),
    F32(f32),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

/// Snapshot of the state a draw call ran with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub framebuffer: RawId,
    pub program: RawId,
    /// Texture bound to `TEXTURE_2D` on unit 0.
    pub texture: RawId,
    pub buffer: RawId,
    pub mode: u32,
    pub count: i32,
    pub blend: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BindTexture { unit: u32, target: u32, texture: RawId },
    BindFramebuffer { framebuffer: RawId },
    BindRenderbuffer { renderbuffer: RawId },
    BindBuffer { buffer: RawId },
    UseProgram { program: RawId },
    TexImage { texture: RawId, level: i32, width: i32, height: i32 },
    Clear { framebuffer: RawId, mask: u32 },
    Draw(DrawCall),
    Delete { ty: ObjectType, id: RawId },
}

#[derive(Debug, Default)]
struct State {
    next_name: RawId,
    live: HashMap<RawId, ObjectType>,
    deleted: Vec<(ObjectType, RawId)>,

    active_unit: u32,
    textures: HashMap<(u32, u32), RawId>,
    framebuffer: RawId,
    renderbuffer: RawId,
    buffer: RawId,
    program: RawId,

    tex_images: HashMap<(RawId, i32), (i32, i32, u32)>,
    tex_params: HashMap<(RawId, u32), Vec<f32>>,
    rb_storage: HashMap<RawId, (i32, i32, u32)>,
    attachments: HashMap<(RawId, u32), Attached>,
    buffer_sizes: HashMap<RawId, usize>,

    sources: HashMap<RawId, String>,
    compiled: HashSet<RawId>,
    attached_shaders: HashMap<RawId, Vec<RawId>>,
    linked: HashSet<RawId>,
    /// Shader sources captured at the last successful link.
    linked_sources: HashMap<RawId, Vec<String>>,
    uniform_locations: HashMap<(RawId, String), u32>,
    uniform_values: HashMap<(RawId, u32), UniformValue>,

    capabilities: HashSet<u32>,
    clear_color: [f32; 4],
    viewport: (i32, i32, i32, i32),

    fail_compile: bool,
    fail_link: bool,

    calls: Vec<Call>,
}

impl State {
    fn allocate(&mut self, ty: ObjectType) -> RawId {
        self.next_name += 1;
        let id = self.next_name;
        self.live.insert(id, ty);
        id
    }

    fn delete(&mut self, ty: ObjectType, id: RawId) {
        if id == 0 || self.live.get(&id) != Some(&ty) {
            return;
        }
        self.live.remove(&id);
        self.deleted.push((ty, id));
        self.calls.push(Call::Delete { ty, id });

        match ty {
            ObjectType::Texture => {
                self.tex_images.retain(|(t, _), _| *t != id);
                self.tex_params.retain(|(t, _), _| *t != id);
                self.textures.retain(|_, t| *t != id);
                self.attachments
                    .retain(|_, a| !matches!(a, Attached::Texture { texture, .. } if *texture == id));
            }
            ObjectType::Renderbuffer => {
                self.rb_storage.remove(&id);
                if self.renderbuffer == id {
                    self.renderbuffer = 0;
                }
                self.attachments.retain(
                    |_, a| !matches!(a, Attached::Renderbuffer { renderbuffer } if *renderbuffer == id),
                );
            }
            ObjectType::Framebuffer => {
                self.attachments.retain(|(f, _), _| *f != id);
                if self.framebuffer == id {
                    self.framebuffer = 0;
                }
            }
            ObjectType::Buffer => {
                self.buffer_sizes.remove(&id);
                if self.buffer == id {
                    self.buffer = 0;
                }
            }
            ObjectType::Shader => {
                self.sources.remove(&id);
                self.compiled.remove(&id);
            }
            ObjectType::Program => {
                self.attached_shaders.remove(&id);
                self.linked.remove(&id);
                self.linked_sources.remove(&id);
                self.uniform_locations.retain(|(p, _), _| *p != id);
                self.uniform_values.retain(|(p, _), _| *p != id);
                if self.program == id {
                    self.program = 0;
                }
            }
        }
    }

    fn attachment_size(&self, attached: Attached) -> Option<(i32, i32)> {
        match attached {
            Attached::Texture { texture, level } => {
                self.tex_images.get(&(texture, level)).map(|&(w, h, _)| (w, h))
            }
            Attached::Renderbuffer { renderbuffer } => {
                self.rb_storage.get(&renderbuffer).map(|&(w, h, _)| (w, h))
            }
        }
    }

    fn framebuffer_status(&self) -> u32 {
        let fb = self.framebuffer;
        if fb == 0 {
            return glow::FRAMEBUFFER_COMPLETE;
        }

        let attached: Vec<Attached> = self
            .attachments
            .iter()
            .filter(|((f, _), _)| *f == fb)
            .map(|(_, a)| *a)
            .collect();

        if attached.is_empty() {
            return glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT;
        }

        let mut size = None;
        for a in attached {
            let Some(s) = self.attachment_size(a) else {
                return glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT;
            };
            if s.0 <= 0 || s.1 <= 0 {
                return glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT;
            }
            match size {
                None => size = Some(s),
                Some(prev) if prev != s => return FRAMEBUFFER_INCOMPLETE_DIMENSIONS,
                Some(_) => {}
            }
        }

        glow::FRAMEBUFFER_COMPLETE
    }

    fn program_mentions(&self, program: RawId, ident: &str) -> bool {
        self.linked_sources
            .get(&program)
            .into_iter()
            .flatten()
            .any(|src| src.contains(ident))
    }
}

/// Recording GL double. See the module docs.
#[derive(Debug, Clone, Default)]
pub struct Headless {
    state: Rc<RefCell<State>>,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent shader compilation fail.
    pub fn set_compile_failure(&self, fail: bool) {
        self.state.borrow_mut().fail_compile = fail;
    }

    /// Makes every subsequent program link fail.
    pub fn set_link_failure(&self, fail: bool) {
        self.state.borrow_mut().fail_link = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    /// Forgets recorded calls; object and binding state is kept.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn is_live(&self, id: RawId) -> bool {
        self.state.borrow().live.contains_key(&id)
    }

    pub fn live_count(&self, ty: ObjectType) -> usize {
        self.state.borrow().live.values().filter(|t| **t == ty).count()
    }

    pub fn deletions(&self) -> Vec<(ObjectType, RawId)> {
        self.state.borrow().deleted.clone()
    }

    pub fn texture_size(&self, texture: RawId, level: i32) -> Option<(i32, i32)> {
        self.state
            .borrow()
            .tex_images
            .get(&(texture, level))
            .map(|&(w, h, _)| (w, h))
    }

    pub fn texture_format(&self, texture: RawId, level: i32) -> Option<u32> {
        self.state
            .borrow()
            .tex_images
            .get(&(texture, level))
            .map(|&(_, _, f)| f)
    }

    /// Last value set for a texture parameter, scalar or vector.
    pub fn texture_param(&self, texture: RawId, name: u32) -> Option<Vec<f32>> {
        self.state.borrow().tex_params.get(&(texture, name)).cloned()
    }

    pub fn renderbuffer_size(&self, renderbuffer: RawId) -> Option<(i32, i32)> {
        self.state
            .borrow()
            .rb_storage
            .get(&renderbuffer)
            .map(|&(w, h, _)| (w, h))
    }

    pub fn attachment(&self, framebuffer: RawId, point: u32) -> Option<Attached> {
        self.state
            .borrow()
            .attachments
            .get(&(framebuffer, point))
            .copied()
    }

    pub fn buffer_size(&self, buffer: RawId) -> Option<usize> {
        self.state.borrow().buffer_sizes.get(&buffer).copied()
    }

    pub fn bound_framebuffer(&self) -> RawId {
        self.state.borrow().framebuffer
    }

    pub fn bound_texture(&self, unit: u32, target: u32) -> RawId {
        self.state
            .borrow()
            .textures
            .get(&(unit, target))
            .copied()
            .unwrap_or(0)
    }

    pub fn current_program(&self) -> RawId {
        self.state.borrow().program
    }

    pub fn is_enabled(&self, capability: u32) -> bool {
        self.state.borrow().capabilities.contains(&capability)
    }

    pub fn viewport_size(&self) -> (i32, i32) {
        let (_, _, w, h) = self.state.borrow().viewport;
        (w, h)
    }

    pub fn uniform(&self, program: RawId, uniform: &str) -> Option<UniformValue> {
        let state = self.state.borrow();
        let loc = state
            .uniform_locations
            .get(&(program, uniform.to_string()))?;
        state.uniform_values.get(&(program, *loc)).copied()
    }

    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }

    fn set_uniform(&self, location: u32, value: UniformValue) {
        self.with(|s| {
            let program = s.program;
            if program != 0 {
                s.uniform_values.insert((program, location), value);
            }
        });
    }
}

impl Gl for Headless {
    fn create_texture(&self) -> Result<RawId, String> {
        Ok(self.with(|s| s.allocate(ObjectType::Texture)))
    }

    fn delete_texture(&self, texture: RawId) {
        self.with(|s| s.delete(ObjectType::Texture, texture));
    }

    fn active_texture(&self, unit: u32) {
        self.with(|s| s.active_unit = unit.saturating_sub(glow::TEXTURE0));
    }

    fn bind_texture(&self, target: u32, texture: RawId) {
        self.with(|s| {
            let unit = s.active_unit;
            if texture == 0 {
                s.textures.remove(&(unit, target));
            } else {
                s.textures.insert((unit, target), texture);
            }
            s.calls.push(Call::BindTexture {
                unit,
                target,
                texture,
            });
        });
    }

    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        format: u32,
        width: i32,
        height: i32,
        _ty: u32,
        _pixels: Option<&[u8]>,
    ) {
        self.with(|s| {
            let Some(&texture) = s.textures.get(&(s.active_unit, target)) else {
                return;
            };
            s.tex_images.insert((texture, level), (width, height, format));
            s.calls.push(Call::TexImage {
                texture,
                level,
                width,
                height,
            });
        });
    }

    fn tex_parameter_i32(&self, target: u32, name: u32, value: i32) {
        self.tex_parameter_f32_slice(target, name, &[value as f32]);
    }

    fn tex_parameter_f32(&self, target: u32, name: u32, value: f32) {
        self.tex_parameter_f32_slice(target, name, &[value]);
    }

    fn tex_parameter_i32_slice(&self, target: u32, name: u32, values: &[i32]) {
        let values: Vec<f32> = values.iter().map(|v| *v as f32).collect();
        self.tex_parameter_f32_slice(target, name, &values);
    }

    fn tex_parameter_f32_slice(&self, target: u32, name: u32, values: &[f32]) {
        self.with(|s| {
            if let Some(&texture) = s.textures.get(&(s.active_unit, target)) {
                s.tex_params.insert((texture, name), values.to_vec());
            }
        });
    }

    fn pixel_store_i32(&self, _name: u32, _value: i32) {}

    fn create_framebuffer(&self) -> Result<RawId, String> {
        Ok(self.with(|s| s.allocate(ObjectType::Framebuffer)))
    }

    fn delete_framebuffer(&self, framebuffer: RawId) {
        self.with(|s| s.delete(ObjectType::Framebuffer, framebuffer));
    }

    fn bind_framebuffer(&self, _target: u32, framebuffer: RawId) {
        self.with(|s| {
            s.framebuffer = framebuffer;
            s.calls.push(Call::BindFramebuffer { framebuffer });
        });
    }

    fn framebuffer_texture_2d(
        &self,
        _target: u32,
        attachment: u32,
        _texture_target: u32,
        texture: RawId,
        level: i32,
    ) {
        self.with(|s| {
            let fb = s.framebuffer;
            if fb == 0 {
                return;
            }
            if texture == 0 {
                s.attachments.remove(&(fb, attachment));
            } else {
                s.attachments
                    .insert((fb, attachment), Attached::Texture { texture, level });
            }
        });
    }

    fn framebuffer_renderbuffer(
        &self,
        _target: u32,
        attachment: u32,
        _renderbuffer_target: u32,
        renderbuffer: RawId,
    ) {
        self.with(|s| {
            let fb = s.framebuffer;
            if fb == 0 {
                return;
            }
            if renderbuffer == 0 {
                s.attachments.remove(&(fb, attachment));
            } else {
                s.attachments
                    .insert((fb, attachment), Attached::Renderbuffer { renderbuffer });
            }
        });
    }

    fn check_framebuffer_status(&self, _target: u32) -> u32 {
        self.state.borrow().framebuffer_status()
    }

    fn create_renderbuffer(&self) -> Result<RawId, String> {
        Ok(self.with(|s| s.allocate(ObjectType::Renderbuffer)))
    }

    fn delete_renderbuffer(&self, renderbuffer: RawId) {
        self.with(|s| s.delete(ObjectType::Renderbuffer, renderbuffer));
    }

    fn bind_renderbuffer(&self, _target: u32, renderbuffer: RawId) {
        self.with(|s| {
            s.renderbuffer = renderbuffer;
            s.calls.push(Call::BindRenderbuffer { renderbuffer });
        });
    }

    fn renderbuffer_storage(&self, _target: u32, format: u32, width: i32, height: i32) {
        self.with(|s| {
            let rb = s.renderbuffer;
            if rb != 0 {
                s.rb_storage.insert(rb, (width, height, format));
            }
        });
    }

    fn create_buffer(&self) -> Result<RawId, String> {
        Ok(self.with(|s| s.allocate(ObjectType::Buffer)))
    }

    fn delete_buffer(&self, buffer: RawId) {
        self.with(|s| s.delete(ObjectType::Buffer, buffer));
    }

    fn bind_buffer(&self, _target: u32, buffer: RawId) {
        self.with(|s| {
            s.buffer = buffer;
            s.calls.push(Call::BindBuffer { buffer });
        });
    }

    fn buffer_data(&self, _target: u32, data: &[u8], _usage: u32) {
        self.with(|s| {
            let b = s.buffer;
            if b != 0 {
                s.buffer_sizes.insert(b, data.len());
            }
        });
    }

    fn enable_vertex_attrib_array(&self, _index: u32) {}

    fn disable_vertex_attrib_array(&self, _index: u32) {}

    fn vertex_attrib_pointer_f32(
        &self,
        _index: u32,
        _size: i32,
        _normalized: bool,
        _stride: i32,
        _offset: i32,
    ) {
    }

    fn draw_arrays(&self, mode: u32, _first: i32, count: i32) {
        self.with(|s| {
            let texture = s
                .textures
                .get(&(0, glow::TEXTURE_2D))
                .copied()
                .unwrap_or(0);
            let call = DrawCall {
                framebuffer: s.framebuffer,
                program: s.program,
                texture,
                buffer: s.buffer,
                mode,
                count,
                blend: s.capabilities.contains(&glow::BLEND),
            };
            s.calls.push(Call::Draw(call));
        });
    }

    fn create_shader(&self, _stage: u32) -> Result<RawId, String> {
        Ok(self.with(|s| s.allocate(ObjectType::Shader)))
    }

    fn delete_shader(&self, shader: RawId) {
        self.with(|s| s.delete(ObjectType::Shader, shader));
    }

    fn shader_source(&self, shader: RawId, source: &str) {
        self.with(|s| {
            s.sources.insert(shader, source.to_string());
        });
    }

    fn compile_shader(&self, shader: RawId) {
        self.with(|s| {
            let has_source = s.sources.get(&shader).is_some_and(|src| !src.trim().is_empty());
            if has_source && !s.fail_compile {
                s.compiled.insert(shader);
            }
        });
    }

    fn shader_compile_status(&self, shader: RawId) -> bool {
        self.state.borrow().compiled.contains(&shader)
    }

    fn shader_info_log(&self, shader: RawId) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            "headless: compilation rejected".to_string()
        }
    }

    fn create_program(&self) -> Result<RawId, String> {
        Ok(self.with(|s| s.allocate(ObjectType::Program)))
    }

    fn delete_program(&self, program: RawId) {
        self.with(|s| s.delete(ObjectType::Program, program));
    }

    fn attach_shader(&self, program: RawId, shader: RawId) {
        self.with(|s| s.attached_shaders.entry(program).or_default().push(shader));
    }

    fn detach_shader(&self, program: RawId, shader: RawId) {
        self.with(|s| {
            if let Some(list) = s.attached_shaders.get_mut(&program) {
                list.retain(|x| *x != shader);
            }
        });
    }

    fn bind_attrib_location(&self, _program: RawId, _index: u32, _name: &str) {}

    fn link_program(&self, program: RawId) {
        self.with(|s| {
            let shaders = s.attached_shaders.get(&program).cloned().unwrap_or_default();
            let ok = !s.fail_link
                && !shaders.is_empty()
                && shaders.iter().all(|sh| s.compiled.contains(sh));
            if ok {
                let sources = shaders
                    .iter()
                    .filter_map(|sh| s.sources.get(sh).cloned())
                    .collect();
                s.linked.insert(program);
                s.linked_sources.insert(program, sources);
                s.uniform_locations.retain(|(p, _), _| *p != program);
            } else {
                s.linked.remove(&program);
                s.linked_sources.remove(&program);
            }
        });
    }

    fn program_link_status(&self, program: RawId) -> bool {
        self.state.borrow().linked.contains(&program)
    }

    fn program_info_log(&self, program: RawId) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "headless: link rejected".to_string()
        }
    }

    fn use_program(&self, program: RawId) {
        self.with(|s| {
            s.program = program;
            s.calls.push(Call::UseProgram { program });
        });
    }

    fn uniform_location(&self, program: RawId, uniform: &str) -> Option<u32> {
        self.with(|s| {
            if !s.linked.contains(&program) || !s.program_mentions(program, uniform) {
                return None;
            }
            let next = s
                .uniform_locations
                .keys()
                .filter(|(p, _)| *p == program)
                .count() as u32;
            Some(
                *s.uniform_locations
                    .entry((program, uniform.to_string()))
                    .or_insert(next),
            )
        })
    }

    fn uniform_1_i32(&self, location: u32, value: i32) {
        self.set_uniform(location, UniformValue::I32(value));
    }

    fn uniform_1_f32(&self, location: u32, value: f32) {
        self.set_uniform(location, UniformValue::F32(value));
    }

    fn uniform_4_f32(&self, location: u32, value: [f32; 4]) {
        self.set_uniform(location, UniformValue::Vec4(value));
    }

    fn uniform_matrix_4_f32(&self, location: u32, value: &[f32; 16]) {
        self.set_uniform(location, UniformValue::Mat4(*value));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.with(|s| s.viewport = (x, y, width, height));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.with(|s| s.clear_color = [r, g, b, a]);
    }

    fn clear_depth(&self, _depth: f32) {}

    fn clear(&self, mask: u32) {
        self.with(|s| {
            let framebuffer = s.framebuffer;
            s.calls.push(Call::Clear { framebuffer, mask });
        });
    }

    fn enable(&self, capability: u32) {
        self.with(|s| {
            s.capabilities.insert(capability);
        });
    }

    fn disable(&self, capability: u32) {
        self.with(|s| {
            s.capabilities.remove(&capability);
        });
    }

    fn cull_face(&self, _mode: u32) {}

    fn blend_equation(&self, _mode: u32) {}

    fn blend_func(&self, _src: u32, _dst: u32) {}

    fn blend_func_separate(&self, _src_rgb: u32, _dst_rgb: u32, _src_alpha: u32, _dst_alpha: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_fb(gl: &Headless) -> RawId {
        let fb = gl.create_framebuffer().unwrap();
        gl.bind_framebuffer(glow::FRAMEBUFFER, fb);
        fb
    }

    #[test]
    fn names_are_unique_and_nonzero() {
        let gl = Headless::new();
        let a = gl.create_texture().unwrap();
        let b = gl.create_framebuffer().unwrap();
        assert_ne!(a, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn framebuffer_without_attachments_is_incomplete() {
        let gl = Headless::new();
        bound_fb(&gl);
        assert_eq!(
            gl.check_framebuffer_status(glow::FRAMEBUFFER),
            glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT
        );
    }

    #[test]
    fn mismatched_attachment_sizes_are_incomplete() {
        let gl = Headless::new();
        let fb = bound_fb(&gl);

        let tex = gl.create_texture().unwrap();
        gl.bind_texture(glow::TEXTURE_2D, tex);
        gl.tex_image_2d(glow::TEXTURE_2D, 0, glow::RGBA, 64, 32, glow::UNSIGNED_BYTE, None);
        gl.framebuffer_texture_2d(glow::FRAMEBUFFER, glow::COLOR_ATTACHMENT0, glow::TEXTURE_2D, tex, 0);

        let rb = gl.create_renderbuffer().unwrap();
        gl.bind_renderbuffer(glow::RENDERBUFFER, rb);
        gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH_COMPONENT16, 32, 32);
        gl.framebuffer_renderbuffer(glow::FRAMEBUFFER, glow::DEPTH_ATTACHMENT, glow::RENDERBUFFER, rb);

        assert_eq!(
            gl.check_framebuffer_status(glow::FRAMEBUFFER),
            FRAMEBUFFER_INCOMPLETE_DIMENSIONS
        );

        gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH_COMPONENT16, 64, 32);
        assert_eq!(gl.check_framebuffer_status(glow::FRAMEBUFFER), glow::FRAMEBUFFER_COMPLETE);
        assert_eq!(
            gl.attachment(fb, glow::DEPTH_ATTACHMENT),
            Some(Attached::Renderbuffer { renderbuffer: rb })
        );
    }

    #[test]
    fn deleting_a_texture_detaches_it() {
        let gl = Headless::new();
        let fb = bound_fb(&gl);
        let tex = gl.create_texture().unwrap();
        gl.bind_texture(glow::TEXTURE_2D, tex);
        gl.framebuffer_texture_2d(glow::FRAMEBUFFER, glow::COLOR_ATTACHMENT0, glow::TEXTURE_2D, tex, 0);

        gl.delete_texture(tex);

        assert!(!gl.is_live(tex));
        assert_eq!(gl.attachment(fb, glow::COLOR_ATTACHMENT0), None);
        assert_eq!(gl.bound_texture(0, glow::TEXTURE_2D), 0);
        assert_eq!(gl.deletions(), vec![(ObjectType::Texture, tex)]);
    }

    #[test]
    fn uniforms_resolve_only_when_mentioned_by_linked_sources() {
        let gl = Headless::new();
        let sh = gl.create_shader(glow::VERTEX_SHADER).unwrap();
        gl.shader_source(sh, "uniform float u_FLT_ALPHA;");
        gl.compile_shader(sh);
        let p = gl.create_program().unwrap();
        gl.attach_shader(p, sh);

        assert_eq!(gl.uniform_location(p, "u_FLT_ALPHA"), None);

        gl.link_program(p);
        let loc = gl.uniform_location(p, "u_FLT_ALPHA").unwrap();
        assert_eq!(gl.uniform_location(p, "u_FLT_ALPHA"), Some(loc));
        assert_eq!(gl.uniform_location(p, "u_MISSING"), None);

        gl.use_program(p);
        gl.uniform_1_f32(loc, 0.5);
        assert_eq!(gl.uniform(p, "u_FLT_ALPHA"), Some(UniformValue::F32(0.5)));
    }

    #[test]
    fn uniforms_survive_shader_detach_and_delete() {
        let gl = Headless::new();
        let sh = gl.create_shader(glow::FRAGMENT_SHADER).unwrap();
        gl.shader_source(sh, "uniform float u_FLT_DT;");
        gl.compile_shader(sh);
        let p = gl.create_program().unwrap();
        gl.attach_shader(p, sh);
        gl.link_program(p);

        gl.detach_shader(p, sh);
        gl.delete_shader(sh);

        let loc = gl.uniform_location(p, "u_FLT_DT").unwrap();
        gl.use_program(p);
        gl.uniform_1_f32(loc, 0.1);
        assert_eq!(gl.uniform(p, "u_FLT_DT"), Some(UniformValue::F32(0.1)));
    }
}
