use gl::types::{GLenum, GLuint};
use std::ffi::{c_char, CString};
use thiserror::Error;

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    pub fn build(self) -> Result<Program, ProgramError> {
        let vert_src = CString::new(self.vert).map_err(|_| ProgramError::NulInSource)?;
        let frag_src = CString::new(self.frag).map_err(|_| ProgramError::NulInSource)?;

        unsafe {
            let vert = compile_shader(gl::VERTEX_SHADER, &vert_src)
                .map_err(ProgramError::VertexCompilation)?;

            let frag = match compile_shader(gl::FRAGMENT_SHADER, &frag_src) {
                Ok(v) => v,
                Err(log) => {
                    gl::DeleteShader(vert);
                    return Err(ProgramError::FragmentCompilation(log));
                }
            };

            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            let mut success: i32 = 0;
            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut i32);

            gl::DetachShader(program, vert);
            gl::DetachShader(program, frag);
            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            if success != 1 {
                let log = info_log(|buf, len| unsafe {
                    gl::GetProgramInfoLog(program, len, std::ptr::null_mut(), buf)
                });
                gl::DeleteProgram(program);
                return Err(ProgramError::Linking(log));
            }

            Ok(Program { id: program })
        }
    }
}

unsafe fn compile_shader(kind: GLenum, src: &CString) -> Result<GLuint, String> {
    let shader = gl::CreateShader(kind);

    gl::ShaderSource(
        shader,
        1,
        (&src.as_ptr()) as *const *const c_char,
        std::ptr::null(),
    );

    gl::CompileShader(shader);

    let mut success: i32 = 0;
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut i32);
    if success != 1 {
        let log = info_log(|buf, len| unsafe {
            gl::GetShaderInfoLog(shader, len, std::ptr::null_mut(), buf)
        });
        gl::DeleteShader(shader);
        return Err(log);
    }

    Ok(shader)
}

fn info_log(fill: impl FnOnce(*mut c_char, i32)) -> String {
    let mut buf = [0_u8; 1024];

    fill(buf.as_mut_ptr() as *mut c_char, 1024);

    let data = if buf.contains(&0) {
        buf.split(|a| *a == 0).next().unwrap()
    } else {
        &buf[..]
    };

    String::from_utf8_lossy(data).to_string()
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("vertex shader: {0}")]
    VertexCompilation(String),
    #[error("fragment shader: {0}")]
    FragmentCompilation(String),
    #[error("program link: {0}")]
    Linking(String),
    #[error("shader source contains an interior NUL byte")]
    NulInSource,
    #[error("no active attribute named {0:?}")]
    UnknownAttribute(String),
    #[error("no active uniform named {0:?}")]
    UnknownUniform(String),
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn attrib_location(&self, name: &str) -> Result<u32, ProgramError> {
        let c_name =
            CString::new(name).map_err(|_| ProgramError::UnknownAttribute(name.to_string()))?;

        let location = unsafe { gl::GetAttribLocation(self.id, c_name.as_ptr()) };
        if location < 0 {
            return Err(ProgramError::UnknownAttribute(name.to_string()));
        }

        Ok(location as u32)
    }

    pub fn uniform_location(&self, name: &str) -> Result<i32, ProgramError> {
        let c_name =
            CString::new(name).map_err(|_| ProgramError::UnknownUniform(name.to_string()))?;

        let location = unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) };
        if location < 0 {
            return Err(ProgramError::UnknownUniform(name.to_string()));
        }

        Ok(location)
    }

    /// The program must be in use.
    pub fn set_mat4(&self, location: i32, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) }
    }

    /// The program must be in use.
    pub fn set_int(&self, location: i32, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}
