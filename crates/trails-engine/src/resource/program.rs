use std::cell::RefCell;
use std::collections::HashMap;

use glam::{Mat4, Vec4};

use crate::error::{Error, Result};
use crate::gl::{Gpu, RawId};

use super::guard::{guard_common, SlotGuard};
use super::handle::{Handle, ProgramObject};
use super::slot::Slot;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub fn gl(self) -> u32 {
        match self {
            Stage::Vertex => glow::VERTEX_SHADER,
            Stage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

#[derive(Debug, Clone)]
struct StageSource {
    stage: Stage,
    source: String,
    origin: String,
}

/// Shader stages and attribute bindings that make up one program.
#[derive(Debug, Clone, Default)]
pub struct ProgramSource {
    stages: Vec<StageSource>,
    attributes: Vec<(u32, String)>,
}

impl ProgramSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stage. `origin` names the source in compile errors.
    pub fn stage(
        mut self,
        stage: Stage,
        source: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        self.stages.push(StageSource {
            stage,
            source: source.into(),
            origin: origin.into(),
        });
        self
    }

    /// Binds vertex attribute `name` to `index` before linking.
    pub fn attribute(mut self, index: u32, name: impl Into<String>) -> Self {
        self.attributes.push((index, name.into()));
        self
    }
}

/// A compiled shader that lives only until its program is linked.
struct Shader<'g> {
    gpu: &'g Gpu,
    id: RawId,
}

impl<'g> Shader<'g> {
    fn compile(gpu: &'g Gpu, src: &StageSource) -> Result<Self> {
        let gl = gpu.gl();
        let id = gl
            .create_shader(src.stage.gl())
            .map_err(|reason| Error::Allocation {
                object: "shader",
                reason,
            })?;
        let shader = Self { gpu, id };

        gl.shader_source(id, &src.source);
        gl.compile_shader(id);
        if !gl.shader_compile_status(id) {
            return Err(Error::ShaderCompile {
                origin: src.origin.clone(),
                log: gl.shader_info_log(id),
            });
        }
        Ok(shader)
    }
}

impl Drop for Shader<'_> {
    fn drop(&mut self) {
        self.gpu.gl().delete_shader(self.id);
    }
}

/// A linked shader program.
#[derive(Debug, Default)]
pub struct Program {
    handle: Handle<ProgramObject>,
    uniforms: RefCell<HashMap<String, Option<u32>>>,
}

impl Program {
    /// Compiles every stage, binds attributes and links.
    ///
    /// Intermediate shader objects are deleted whether or not linking
    /// succeeds.
    pub fn link(gpu: &Gpu, source: &ProgramSource) -> Result<Self> {
        let handle = Handle::<ProgramObject>::create(gpu)?;
        let gl = gpu.gl();
        let id = handle.raw();

        let shaders = source
            .stages
            .iter()
            .map(|s| Shader::compile(gpu, s))
            .collect::<Result<Vec<_>>>()?;

        for shader in &shaders {
            gl.attach_shader(id, shader.id);
        }
        for (index, name) in &source.attributes {
            gl.bind_attrib_location(id, *index, name);
        }

        gl.link_program(id);
        let linked = gl.program_link_status(id);

        for shader in &shaders {
            gl.detach_shader(id, shader.id);
        }
        drop(shaders);

        if !linked {
            return Err(Error::ProgramLink {
                log: gl.program_info_log(id),
            });
        }

        Ok(Self {
            handle,
            uniforms: RefCell::default(),
        })
    }

    pub fn raw(&self) -> RawId {
        self.handle.raw()
    }

    /// Installs the program for drawing until the guard is dropped.
    pub fn use_program(&self) -> Result<UseProgram<'_>> {
        let gpu = self.handle.require()?;
        let guard = SlotGuard::bind(gpu, Slot::program(), self.raw())?;
        Ok(UseProgram {
            guard,
            program: Some(self),
        })
    }

    fn location(&self, gpu: &Gpu, name: &str) -> Option<u32> {
        if let Some(loc) = self.uniforms.borrow().get(name) {
            return *loc;
        }
        let loc = gpu.gl().uniform_location(self.raw(), name);
        if loc.is_none() {
            log::debug!("program {}: no active uniform '{name}'", self.raw());
        }
        self.uniforms.borrow_mut().insert(name.to_string(), loc);
        loc
    }
}

#[derive(Debug)]
pub struct UseProgram<'r> {
    guard: SlotGuard,
    program: Option<&'r Program>,
}

guard_common!(UseProgram, Program, program, "program");

impl UseProgram<'_> {
    /// Looks up a uniform of the installed program.
    ///
    /// Names the program does not use resolve to an inert uniform whose
    /// setters do nothing.
    pub fn uniform(&self, name: &str) -> Result<Uniform<'_>> {
        let (gpu, _) = self.live()?;
        let location = self
            .program
            .and_then(|p| p.location(gpu, name));
        Ok(Uniform { gpu, location })
    }
}

/// A uniform location of the program currently in use.
#[derive(Debug, Clone, Copy)]
pub struct Uniform<'u> {
    gpu: &'u Gpu,
    location: Option<u32>,
}

impl Uniform<'_> {
    pub fn is_active(&self) -> bool {
        self.location.is_some()
    }

    pub fn set_i32(&self, value: i32) {
        if let Some(loc) = self.location {
            self.gpu.gl().uniform_1_i32(loc, value);
        }
    }

    pub fn set_f32(&self, value: f32) {
        if let Some(loc) = self.location {
            self.gpu.gl().uniform_1_f32(loc, value);
        }
    }

    pub fn set_vec4(&self, value: Vec4) {
        if let Some(loc) = self.location {
            self.gpu.gl().uniform_4_f32(loc, value.to_array());
        }
    }

    /// Uploads a column-major matrix.
    pub fn set_mat4(&self, value: &Mat4) {
        if let Some(loc) = self.location {
            self.gpu.gl().uniform_matrix_4_f32(loc, &value.to_cols_array());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::headless::{ObjectType, UniformValue};
    use crate::gl::Headless;

    const VERT: &str = "attribute vec3 in_POSITION;\nuniform mat4 u_MAT_TRANSFORM;\nvoid main() {}";
    const FRAG: &str = "uniform float u_FLT_ALPHA;\nvoid main() {}";

    fn source() -> ProgramSource {
        ProgramSource::new()
            .stage(Stage::Vertex, VERT, "test.vert")
            .stage(Stage::Fragment, FRAG, "test.frag")
            .attribute(0, "in_POSITION")
    }

    #[test]
    fn link_deletes_intermediate_shaders() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let program = Program::link(&gpu, &source()).unwrap();

        assert!(gl.is_live(program.raw()));
        assert_eq!(gl.live_count(ObjectType::Shader), 0);
    }

    #[test]
    fn compile_failure_names_the_stage_and_cleans_up() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let broken = ProgramSource::new()
            .stage(Stage::Vertex, VERT, "ok.vert")
            .stage(Stage::Fragment, "", "empty.frag");

        let err = Program::link(&gpu, &broken).unwrap_err();
        assert!(matches!(err, Error::ShaderCompile { ref origin, .. } if origin == "empty.frag"));
        assert_eq!(gl.live_count(ObjectType::Shader), 0);
        assert_eq!(gl.live_count(ObjectType::Program), 0);
    }

    #[test]
    fn link_failure_is_reported() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        gl.set_link_failure(true);
        assert!(matches!(
            Program::link(&gpu, &source()),
            Err(Error::ProgramLink { .. })
        ));
        assert_eq!(gl.live_count(ObjectType::Program), 0);
    }

    #[test]
    fn uniforms_are_set_on_the_installed_program() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let program = Program::link(&gpu, &source()).unwrap();

        let pgm = program.use_program().unwrap();
        pgm.uniform("u_FLT_ALPHA").unwrap().set_f32(0.25);
        pgm.uniform("u_MAT_TRANSFORM").unwrap().set_mat4(&Mat4::IDENTITY);

        assert_eq!(
            gl.uniform(program.raw(), "u_FLT_ALPHA"),
            Some(UniformValue::F32(0.25))
        );
        assert_eq!(
            gl.uniform(program.raw(), "u_MAT_TRANSFORM"),
            Some(UniformValue::Mat4(Mat4::IDENTITY.to_cols_array()))
        );
    }

    #[test]
    fn unknown_uniform_is_inert_and_cached() {
        let gpu = Gpu::new(Headless::new());
        let program = Program::link(&gpu, &source()).unwrap();
        let pgm = program.use_program().unwrap();

        let u = pgm.uniform("u_VEC_COLOR").unwrap();
        assert!(!u.is_active());
        u.set_vec4(Vec4::ONE);

        assert_eq!(program.uniforms.borrow().get("u_VEC_COLOR"), Some(&None));
    }

    #[test]
    fn released_program_guard_rejects_lookups() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let program = Program::link(&gpu, &source()).unwrap();

        let mut pgm = program.use_program().unwrap();
        assert_eq!(gl.current_program(), program.raw());
        pgm.release();
        assert_eq!(gl.current_program(), 0);
        assert!(matches!(
            pgm.uniform("u_FLT_ALPHA"),
            Err(Error::ReleasedGuard { object: "program" })
        ));
    }
}
