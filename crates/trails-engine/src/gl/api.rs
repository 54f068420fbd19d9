/// Native GL object name. `0` never names a live object; binding `0` unbinds.
pub type RawId = u32;

/// The GLES2 subset the engine issues.
///
/// Enum-valued arguments are the raw GL constants (`glow::TEXTURE_2D`, ...).
/// Implementations must only be used from the thread that owns the context.
pub trait Gl {
    // ── textures ──────────────────────────────────────────────────────────
    fn create_texture(&self) -> Result<RawId, String>;
    fn delete_texture(&self, texture: RawId);
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: RawId);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        format: u32,
        width: i32,
        height: i32,
        ty: u32,
        pixels: Option<&[u8]>,
    );
    fn tex_parameter_i32(&self, target: u32, name: u32, value: i32);
    fn tex_parameter_f32(&self, target: u32, name: u32, value: f32);
    fn tex_parameter_i32_slice(&self, target: u32, name: u32, values: &[i32]);
    fn tex_parameter_f32_slice(&self, target: u32, name: u32, values: &[f32]);
    fn pixel_store_i32(&self, name: u32, value: i32);

    // ── framebuffers ──────────────────────────────────────────────────────
    fn create_framebuffer(&self) -> Result<RawId, String>;
    fn delete_framebuffer(&self, framebuffer: RawId);
    fn bind_framebuffer(&self, target: u32, framebuffer: RawId);
    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: RawId,
        level: i32,
    );
    fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: RawId,
    );
    fn check_framebuffer_status(&self, target: u32) -> u32;

    // ── renderbuffers ─────────────────────────────────────────────────────
    fn create_renderbuffer(&self) -> Result<RawId, String>;
    fn delete_renderbuffer(&self, renderbuffer: RawId);
    fn bind_renderbuffer(&self, target: u32, renderbuffer: RawId);
    fn renderbuffer_storage(&self, target: u32, format: u32, width: i32, height: i32);

    // ── vertex buffers ────────────────────────────────────────────────────
    fn create_buffer(&self) -> Result<RawId, String>;
    fn delete_buffer(&self, buffer: RawId);
    fn bind_buffer(&self, target: u32, buffer: RawId);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn disable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);

    // ── shaders & programs ────────────────────────────────────────────────
    fn create_shader(&self, stage: u32) -> Result<RawId, String>;
    fn delete_shader(&self, shader: RawId);
    fn shader_source(&self, shader: RawId, source: &str);
    fn compile_shader(&self, shader: RawId);
    fn shader_compile_status(&self, shader: RawId) -> bool;
    fn shader_info_log(&self, shader: RawId) -> String;
    fn create_program(&self) -> Result<RawId, String>;
    fn delete_program(&self, program: RawId);
    fn attach_shader(&self, program: RawId, shader: RawId);
    fn detach_shader(&self, program: RawId, shader: RawId);
    fn bind_attrib_location(&self, program: RawId, index: u32, name: &str);
    fn link_program(&self, program: RawId);
    fn program_link_status(&self, program: RawId) -> bool;
    fn program_info_log(&self, program: RawId) -> String;
    fn use_program(&self, program: RawId);
    fn uniform_location(&self, program: RawId, name: &str) -> Option<u32>;
    fn uniform_1_i32(&self, location: u32, value: i32);
    fn uniform_1_f32(&self, location: u32, value: f32);
    fn uniform_4_f32(&self, location: u32, value: [f32; 4]);
    fn uniform_matrix_4_f32(&self, location: u32, value: &[f32; 16]);

    // ── fixed-function state ──────────────────────────────────────────────
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear_depth(&self, depth: f32);
    fn clear(&self, mask: u32);
    fn enable(&self, capability: u32);
    fn disable(&self, capability: u32);
    fn cull_face(&self, mode: u32);
    fn blend_equation(&self, mode: u32);
    fn blend_func(&self, src: u32, dst: u32);
    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);
}
