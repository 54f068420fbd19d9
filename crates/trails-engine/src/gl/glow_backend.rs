use std::num::NonZeroU32;

use glow::HasContext;

use super::api::{Gl, RawId};

/// [`Gl`] implementation over a current `glow` context.
///
/// Every method issues the matching `glow` call. They are sound under the
/// invariant established by [`GlowBackend::new`].
pub struct GlowBackend {
    gl: glow::Context,
}

impl GlowBackend {
    /// Wraps a loaded GL context.
    ///
    /// # Safety
    ///
    /// `gl` must have been loaded from a context that is current on this thread
    /// and stays current (and alive) for as long as the backend is used.
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Driver version string, for startup diagnostics.
    pub fn version(&self) -> String {
        let v = self.gl.version();
        format!("{}.{} {}", v.major, v.minor, v.vendor_info)
    }
}

fn name(id: RawId) -> Option<NonZeroU32> {
    NonZeroU32::new(id)
}

fn created<T>(r: Result<T, String>, raw: impl FnOnce(T) -> NonZeroU32) -> Result<RawId, String> {
    r.map(|obj| raw(obj).get())
}

impl Gl for GlowBackend {
    fn create_texture(&self) -> Result<RawId, String> {
        created(unsafe { self.gl.create_texture() }, |t| t.0)
    }

    fn delete_texture(&self, texture: RawId) {
        if let Some(n) = name(texture) {
            unsafe { self.gl.delete_texture(glow::NativeTexture(n)) }
        }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(unit) }
    }

    fn bind_texture(&self, target: u32, texture: RawId) {
        unsafe { self.gl.bind_texture(target, name(texture).map(glow::NativeTexture)) }
    }

    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        format: u32,
        width: i32,
        height: i32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        // GLES2 requires the internal format to equal the client format.
        unsafe {
            self.gl.tex_image_2d(
                target,
                level,
                format as i32,
                width,
                height,
                0,
                format,
                ty,
                pixels,
            )
        }
    }

    fn tex_parameter_i32(&self, target: u32, name: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, name, value) }
    }

    fn tex_parameter_f32(&self, target: u32, name: u32, value: f32) {
        unsafe { self.gl.tex_parameter_f32(target, name, value) }
    }

    fn tex_parameter_i32_slice(&self, target: u32, name: u32, values: &[i32]) {
        unsafe { self.gl.tex_parameter_i32_slice(target, name, values) }
    }

    fn tex_parameter_f32_slice(&self, target: u32, name: u32, values: &[f32]) {
        unsafe { self.gl.tex_parameter_f32_slice(target, name, values) }
    }

    fn pixel_store_i32(&self, name: u32, value: i32) {
        unsafe { self.gl.pixel_store_i32(name, value) }
    }

    fn create_framebuffer(&self) -> Result<RawId, String> {
        created(unsafe { self.gl.create_framebuffer() }, |f| f.0)
    }

    fn delete_framebuffer(&self, framebuffer: RawId) {
        if let Some(n) = name(framebuffer) {
            unsafe { self.gl.delete_framebuffer(glow::NativeFramebuffer(n)) }
        }
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: RawId) {
        unsafe {
            self.gl
                .bind_framebuffer(target, name(framebuffer).map(glow::NativeFramebuffer))
        }
    }

    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: RawId,
        level: i32,
    ) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                target,
                attachment,
                texture_target,
                name(texture).map(glow::NativeTexture),
                level,
            )
        }
    }

    fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: RawId,
    ) {
        unsafe {
            self.gl.framebuffer_renderbuffer(
                target,
                attachment,
                renderbuffer_target,
                name(renderbuffer).map(glow::NativeRenderbuffer),
            )
        }
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn create_renderbuffer(&self) -> Result<RawId, String> {
        created(unsafe { self.gl.create_renderbuffer() }, |r| r.0)
    }

    fn delete_renderbuffer(&self, renderbuffer: RawId) {
        if let Some(n) = name(renderbuffer) {
            unsafe { self.gl.delete_renderbuffer(glow::NativeRenderbuffer(n)) }
        }
    }

    fn bind_renderbuffer(&self, target: u32, renderbuffer: RawId) {
        unsafe {
            self.gl
                .bind_renderbuffer(target, name(renderbuffer).map(glow::NativeRenderbuffer))
        }
    }

    fn renderbuffer_storage(&self, target: u32, format: u32, width: i32, height: i32) {
        unsafe { self.gl.renderbuffer_storage(target, format, width, height) }
    }

    fn create_buffer(&self) -> Result<RawId, String> {
        created(unsafe { self.gl.create_buffer() }, |b| b.0)
    }

    fn delete_buffer(&self, buffer: RawId) {
        if let Some(n) = name(buffer) {
            unsafe { self.gl.delete_buffer(glow::NativeBuffer(n)) }
        }
    }

    fn bind_buffer(&self, target: u32, buffer: RawId) {
        unsafe { self.gl.bind_buffer(target, name(buffer).map(glow::NativeBuffer)) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, glow::FLOAT, normalized, stride, offset)
        }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, first, count) }
    }

    fn create_shader(&self, stage: u32) -> Result<RawId, String> {
        created(unsafe { self.gl.create_shader(stage) }, |s| s.0)
    }

    fn delete_shader(&self, shader: RawId) {
        if let Some(n) = name(shader) {
            unsafe { self.gl.delete_shader(glow::NativeShader(n)) }
        }
    }

    fn shader_source(&self, shader: RawId, source: &str) {
        if let Some(n) = name(shader) {
            unsafe { self.gl.shader_source(glow::NativeShader(n), source) }
        }
    }

    fn compile_shader(&self, shader: RawId) {
        if let Some(n) = name(shader) {
            unsafe { self.gl.compile_shader(glow::NativeShader(n)) }
        }
    }

    fn shader_compile_status(&self, shader: RawId) -> bool {
        name(shader)
            .map(|n| unsafe { self.gl.get_shader_compile_status(glow::NativeShader(n)) })
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: RawId) -> String {
        name(shader)
            .map(|n| unsafe { self.gl.get_shader_info_log(glow::NativeShader(n)) })
            .unwrap_or_default()
    }

    fn create_program(&self) -> Result<RawId, String> {
        created(unsafe { self.gl.create_program() }, |p| p.0)
    }

    fn delete_program(&self, program: RawId) {
        if let Some(n) = name(program) {
            unsafe { self.gl.delete_program(glow::NativeProgram(n)) }
        }
    }

    fn attach_shader(&self, program: RawId, shader: RawId) {
        if let (Some(p), Some(s)) = (name(program), name(shader)) {
            unsafe {
                self.gl
                    .attach_shader(glow::NativeProgram(p), glow::NativeShader(s))
            }
        }
    }

    fn detach_shader(&self, program: RawId, shader: RawId) {
        if let (Some(p), Some(s)) = (name(program), name(shader)) {
            unsafe {
                self.gl
                    .detach_shader(glow::NativeProgram(p), glow::NativeShader(s))
            }
        }
    }

    fn bind_attrib_location(&self, program: RawId, index: u32, attribute: &str) {
        if let Some(p) = name(program) {
            unsafe {
                self.gl
                    .bind_attrib_location(glow::NativeProgram(p), index, attribute)
            }
        }
    }

    fn link_program(&self, program: RawId) {
        if let Some(p) = name(program) {
            unsafe { self.gl.link_program(glow::NativeProgram(p)) }
        }
    }

    fn program_link_status(&self, program: RawId) -> bool {
        name(program)
            .map(|p| unsafe { self.gl.get_program_link_status(glow::NativeProgram(p)) })
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: RawId) -> String {
        name(program)
            .map(|p| unsafe { self.gl.get_program_info_log(glow::NativeProgram(p)) })
            .unwrap_or_default()
    }

    fn use_program(&self, program: RawId) {
        unsafe { self.gl.use_program(name(program).map(glow::NativeProgram)) }
    }

    fn uniform_location(&self, program: RawId, uniform: &str) -> Option<u32> {
        let p = name(program)?;
        unsafe { self.gl.get_uniform_location(glow::NativeProgram(p), uniform) }.map(|l| l.0)
    }

    fn uniform_1_i32(&self, location: u32, value: i32) {
        let loc = glow::NativeUniformLocation(location);
        unsafe { self.gl.uniform_1_i32(Some(&loc), value) }
    }

    fn uniform_1_f32(&self, location: u32, value: f32) {
        let loc = glow::NativeUniformLocation(location);
        unsafe { self.gl.uniform_1_f32(Some(&loc), value) }
    }

    fn uniform_4_f32(&self, location: u32, [x, y, z, w]: [f32; 4]) {
        let loc = glow::NativeUniformLocation(location);
        unsafe { self.gl.uniform_4_f32(Some(&loc), x, y, z, w) }
    }

    fn uniform_matrix_4_f32(&self, location: u32, value: &[f32; 16]) {
        let loc = glow::NativeUniformLocation(location);
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(&loc), false, value) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear_depth(&self, depth: f32) {
        unsafe { self.gl.clear_depth_f32(depth) }
    }

    fn clear(&self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn enable(&self, capability: u32) {
        unsafe { self.gl.enable(capability) }
    }

    fn disable(&self, capability: u32) {
        unsafe { self.gl.disable(capability) }
    }

    fn cull_face(&self, mode: u32) {
        unsafe { self.gl.cull_face(mode) }
    }

    fn blend_equation(&self, mode: u32) {
        unsafe { self.gl.blend_equation(mode) }
    }

    fn blend_func(&self, src: u32, dst: u32) {
        unsafe { self.gl.blend_func(src, dst) }
    }

    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        unsafe {
            self.gl
                .blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha)
        }
    }
}
