//! A CPU software rasterizer with programmable shaders and skeletal
//! animation.
//!
//! Vertex data lives in a [`BufferStore`] and is referenced by typed
//! handles. Each frame a [`Renderer`] clears its colour and depth targets and
//! draws meshes through a [`Shader`]; skinned meshes get their bone
//! transforms from [`animation::evaluate`].
//!
//! # Quick Start
//!
//! ```ignore
//! use skinraster::prelude::*;
//!
//! let config = RenderConfig::default();
//! let mut renderer = Renderer::new(config.width, config.height);
//! let mut model = Model::from_obj("assets/monkey.obj")?;
//! model.upload(renderer.buffers_mut());
//!
//! renderer.clear_color(config.clear_color());
//! renderer.clear_depth();
//! let uniforms = Uniforms::new(view, config.projection(), config.z_near, config.z_far)
//!     .ok_or("singular model-view")?;
//! model.draw(&mut renderer, &PhongShader, uniforms, &config.point_lights(), Primitive::Triangle, 0.0)?;
//! ```

pub mod animation;
pub mod buffer;
pub mod camera;
pub mod colors;
pub mod config;
pub mod error;
pub mod light;
pub mod material;
pub mod math;
pub mod model;
pub mod render;
pub mod texture;

// Re-export commonly needed types at crate root for convenience
pub use buffer::BufferStore;
pub use error::{LoadError, RenderError};
pub use model::{Mesh, Model};
pub use render::{Renderer, Shader};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use skinraster::prelude::*;
/// ```
pub mod prelude {
    // Animation
    pub use crate::animation::{Animation, Keyframe, NodeChannel, NodeTree, Skeleton};

    // Buffers
    pub use crate::buffer::{BufferStore, VertexWeight};

    // Camera & Config
    pub use crate::camera::Camera;
    pub use crate::config::RenderConfig;

    // Errors
    pub use crate::error::{LoadError, RenderError};

    // Scene
    pub use crate::light::PointLight;
    pub use crate::material::Material;
    pub use crate::model::{Mesh, Model};
    pub use crate::texture::{Texture, TextureRegistry};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::quat::Quat;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Rendering
    pub use crate::render::{
        DrawParams, FlatShader, MeshBuffers, PhongShader, Primitive, Renderer, Shader, Uniforms,
    };
}
