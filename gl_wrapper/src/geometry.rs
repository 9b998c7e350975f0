use std::ffi::c_void;
use thiserror::Error;

struct AttributeArray<'a> {
    location: u32,
    attribute: VertexAttribute,
    data: &'a [f32],
}

pub struct GeometryBuilder<'a> {
    indices: &'a [u16],
    arrays: Vec<AttributeArray<'a>>,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(indices: &'a [u16]) -> Self {
        Self {
            indices,
            arrays: Vec::new(),
        }
    }

    pub fn with_array(mut self, location: u32, attribute: VertexAttribute, data: &'a [f32]) -> Self {
        self.arrays.push(AttributeArray {
            location,
            attribute,
            data,
        });
        self
    }

    pub fn build(self) -> Result<IndexedGeometry, GeometryError> {
        let vertices = vertex_count(&self.arrays)?;
        check_indices(self.indices, vertices)?;

        let mut vao = 0;
        let mut ebo = 0;
        let mut vbos = Vec::with_capacity(self.arrays.len());

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::BindVertexArray(vao);

            for array in &self.arrays {
                let mut vbo = 0;
                gl::GenBuffers(1, (&mut vbo) as *mut u32);
                gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

                gl::BufferData(
                    gl::ARRAY_BUFFER,
                    (array.data.len() * std::mem::size_of::<f32>()) as isize,
                    array.data.as_ptr() as *const c_void,
                    gl::STATIC_DRAW,
                );

                let size = array.attribute.size();
                gl::VertexAttribPointer(
                    array.location,
                    size as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    (size * std::mem::size_of::<f32>()) as i32,
                    std::ptr::null(),
                );
                gl::EnableVertexAttribArray(array.location);

                vbos.push(vbo);
            }

            gl::GenBuffers(1, (&mut ebo) as *mut u32);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                (self.indices.len() * std::mem::size_of::<u16>()) as isize,
                self.indices.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            // the element buffer binding is part of VAO state
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0);
        }

        Ok(IndexedGeometry {
            vao,
            vbos,
            ebo,
            indices: self.indices.len(),
        })
    }
}

fn vertex_count(arrays: &[AttributeArray]) -> Result<usize, GeometryError> {
    let mut count = None;

    for array in arrays {
        let size = array.attribute.size();

        if array.data.is_empty() || array.data.len() % size != 0 {
            return Err(GeometryError::InvalidDataLength {
                location: array.location,
            });
        }

        let vertices = array.data.len() / size;

        match count {
            None => count = Some(vertices),
            Some(c) if c != vertices => return Err(GeometryError::VertexCountMismatch),
            Some(_) => (),
        }
    }

    count.ok_or(GeometryError::NoAttributes)
}

fn check_indices(indices: &[u16], vertices: usize) -> Result<(), GeometryError> {
    match indices.iter().find(|i| **i as usize >= vertices) {
        Some(i) => Err(GeometryError::IndexOutOfRange {
            index: *i,
            vertices,
        }),
        None => Ok(()),
    }
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("no attribute arrays given")]
    NoAttributes,
    #[error("invalid data length for attribute at location {location}")]
    InvalidDataLength { location: u32 },
    #[error("attribute arrays disagree on vertex count")]
    VertexCountMismatch,
    #[error("index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u16, vertices: usize },
}

pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

pub struct IndexedGeometry {
    vao: u32,
    vbos: Vec<u32>,
    ebo: u32,
    indices: usize,
}

impl IndexedGeometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn index_count(&self) -> usize {
        self.indices
    }
}

impl Drop for IndexedGeometry {
    fn drop(&mut self) {
        unsafe {
            for vbo in &self.vbos {
                gl::DeleteBuffers(1, vbo as *const u32);
            }
            gl::DeleteBuffers(1, (&self.ebo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_separate_arrays() {
        let positions = [0.0_f32; 12];
        let tex_coords = [0.0_f32; 8];

        let arrays = [
            AttributeArray {
                location: 0,
                attribute: VertexAttribute::Vec3,
                data: &positions,
            },
            AttributeArray {
                location: 1,
                attribute: VertexAttribute::Vec2,
                data: &tex_coords,
            },
        ];

        assert_eq!(vertex_count(&arrays).unwrap(), 4);
    }

    #[test]
    fn vertex_count_rejects_truncated_array() {
        let positions = [0.0_f32; 11];

        let arrays = [AttributeArray {
            location: 0,
            attribute: VertexAttribute::Vec3,
            data: &positions,
        }];

        assert!(matches!(
            vertex_count(&arrays),
            Err(GeometryError::InvalidDataLength { location: 0 })
        ));
    }

    #[test]
    fn vertex_count_rejects_mismatched_arrays() {
        let positions = [0.0_f32; 12];
        let tex_coords = [0.0_f32; 6];

        let arrays = [
            AttributeArray {
                location: 0,
                attribute: VertexAttribute::Vec3,
                data: &positions,
            },
            AttributeArray {
                location: 1,
                attribute: VertexAttribute::Vec2,
                data: &tex_coords,
            },
        ];

        assert!(matches!(
            vertex_count(&arrays),
            Err(GeometryError::VertexCountMismatch)
        ));
    }

    #[test]
    fn vertex_count_rejects_empty() {
        assert!(matches!(
            vertex_count(&[]),
            Err(GeometryError::NoAttributes)
        ));
    }

    #[test]
    fn indices_within_vertex_range() {
        assert!(check_indices(&[0, 1, 2, 0, 2, 3], 4).is_ok());
        assert!(matches!(
            check_indices(&[0, 1, 4], 4),
            Err(GeometryError::IndexOutOfRange {
                index: 4,
                vertices: 4
            })
        ));
    }
}
